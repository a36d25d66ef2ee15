//! OneMap client.
//!
//! OneMap is Singapore's national map service. This module covers the two
//! services the planner needs: cycling routes (primary plus alternates) and
//! free-text location search.
//!
//! Key characteristics of OneMap:
//! - Every request carries a bearer token obtained from account credentials
//! - Tokens expire after a few days and are refreshed ahead of expiry
//! - Coordinates are passed as `"lat,lon"` strings

mod client;
mod convert;
mod error;
mod provider;
mod token;
mod types;

pub use client::{DEFAULT_BASE_URL, OneMapClient, OneMapConfig};
pub use convert::{convert_route, convert_route_response};
pub use error::OneMapError;
pub use provider::RouteProvider;
pub use token::{AccessToken, PasswordTokenSource, REFRESH_BUFFER, TokenCache, TokenSource};
pub use types::{RouteDto, RouteResponse, RouteSummaryDto, SearchResponse};
