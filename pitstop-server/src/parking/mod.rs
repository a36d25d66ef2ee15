//! Bicycle parking catalogue.
//!
//! The catalogue lives in a PostGIS table populated offline from the LTA
//! DataMall feed, and answers nearest-spot lookups for the planner.

pub mod datamall;
mod error;
pub mod ingest;
mod memory;
mod schema;
mod store;

pub use datamall::{DataMallClient, DataMallConfig, FetchReport, SeedLocation};
pub use error::{DataMallError, IngestError};
pub use ingest::{DEFAULT_BATCH_SIZE, IngestReport, ParkingRecord};
pub use memory::InMemoryParkingStore;
pub use schema::{SCHEMA, TABLE_NAME};
pub use store::PgParkingStore;
