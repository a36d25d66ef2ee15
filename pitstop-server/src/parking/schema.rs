//! Spatial store schema.

/// Table holding the parking catalogue.
pub const TABLE_NAME: &str = "parking_spots";

/// DDL for the parking catalogue. Safe to run repeatedly.
///
/// Points are stored in SRID 4326 in `(longitude, latitude)` order.
/// Descriptions are unique so that reloading the feed upserts in place.
pub const SCHEMA: &str = r#"

CREATE EXTENSION IF NOT EXISTS postgis;

CREATE TABLE IF NOT EXISTS parking_spots (
    id SERIAL PRIMARY KEY,
    description TEXT NOT NULL UNIQUE,
    coordinates geometry(Point, 4326) NOT NULL,
    rack_type TEXT,
    rack_count INTEGER,
    shelter_indicator BOOLEAN
);

CREATE INDEX IF NOT EXISTS parking_spots_coordinates_geog_idx
    ON parking_spots USING GIST ((coordinates::geography));

"#;
