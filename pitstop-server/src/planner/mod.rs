//! Route-to-parking correlation.
//!
//! This module answers: "if I stop every N minutes along this route, where
//! can I park my bicycle?"
//!
//! Each route's geometry is decoded into coordinates, turned into a
//! cumulative great-circle distance profile, and sampled at checkpoints one
//! stop interval apart (at an assumed average cycling speed). Every
//! checkpoint is matched to its nearest coordinate and resolved to the
//! closest parking spot within a radius that widens once on a miss.

mod annotate;
pub mod checkpoints;
mod config;
mod rank;
mod resolver;

pub use annotate::{AnnotateError, RouteAnnotator};
pub use config::PlannerConfig;
pub use rank::rank_routes;
pub use resolver::{NearestFacilityResolver, SpatialError, SpatialOracle};
