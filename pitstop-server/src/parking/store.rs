//! PostGIS-backed parking store.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::trace;

use crate::config::DatabaseConfig;
use crate::domain::{Coordinate, ParkingSpot, UNKNOWN, parse_point_wkt};
use crate::planner::{SpatialError, SpatialOracle};

use super::schema::SCHEMA;

/// Nearest spot within a radius. Casting to `geography` makes distances meters.
const NEAREST_QUERY: &str = r#"
    SELECT
        id,
        description,
        ST_AsText(coordinates) AS coord,
        rack_type,
        rack_count,
        shelter_indicator,
        ST_Distance(
            coordinates::geography,
            ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
        ) AS deviation
    FROM parking_spots
    WHERE ST_DWithin(
        coordinates::geography,
        ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
        $3
    )
    ORDER BY deviation ASC
    LIMIT 1;
"#;

/// Row returned by [`NEAREST_QUERY`].
#[derive(Debug, sqlx::FromRow)]
struct NearestRow {
    id: i32,
    description: String,
    coord: String,
    rack_type: Option<String>,
    rack_count: Option<i32>,
    shelter_indicator: Option<bool>,
    deviation: f64,
}

impl NearestRow {
    fn into_spot(self) -> Result<ParkingSpot, SpatialError> {
        let coordinate = parse_point_wkt(&self.coord)?;

        Ok(ParkingSpot {
            id: self.id,
            description: self.description,
            coordinate,
            rack_type: self.rack_type.unwrap_or_else(|| UNKNOWN.to_string()),
            rack_count: self
                .rack_count
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            shelter_indicator: self.shelter_indicator.unwrap_or(false),
            deviation_m: self.deviation,
        })
    }
}

/// Parking store backed by a pooled PostgreSQL/PostGIS connection.
///
/// The pool is shared by every concurrent lookup; its size bounds how many
/// route annotations actually query the database at once.
#[derive(Debug, Clone)]
pub struct PgParkingStore {
    pool: PgPool,
}

impl PgParkingStore {
    /// Open a connection pool for the given database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options())
            .await?;

        Ok(Self { pool })
    }

    /// Open a pool without connecting until the first query.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(config.connect_options());

        Self { pool }
    }

    /// Create the catalogue table and index if missing.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl SpatialOracle for PgParkingStore {
    async fn nearest(
        &self,
        coordinate: Coordinate,
        radius_m: f64,
    ) -> Result<Option<ParkingSpot>, SpatialError> {
        trace!(%coordinate, radius_m, "querying nearest parking spot");

        let row: Option<NearestRow> = sqlx::query_as(NEAREST_QUERY)
            .bind(coordinate.lon)
            .bind(coordinate.lat)
            .bind(radius_m)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SpatialError::Unavailable {
                message: e.to_string(),
            })?;

        row.map(NearestRow::into_spot).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(coord: &str) -> NearestRow {
        NearestRow {
            id: 7,
            description: "BLK 123 ANG MO KIO".to_string(),
            coord: coord.to_string(),
            rack_type: Some("Yellow Box".to_string()),
            rack_count: Some(12),
            shelter_indicator: Some(true),
            deviation: 42.5,
        }
    }

    #[test]
    fn row_converts_to_spot() {
        let spot = row("POINT(103.84 1.37)").into_spot().unwrap();

        assert_eq!(spot.id, 7);
        assert_eq!(spot.description, "BLK 123 ANG MO KIO");
        assert_eq!(spot.coordinate, Coordinate::from_raw(103.84, 1.37));
        assert_eq!(spot.rack_type, "Yellow Box");
        assert_eq!(spot.rack_count, 12);
        assert!(spot.shelter_indicator);
        assert_eq!(spot.deviation_m, 42.5);
    }

    #[test]
    fn missing_columns_get_defaults() {
        let mut r = row("POINT(103.84 1.37)");
        r.rack_type = None;
        r.rack_count = Some(-3);
        r.shelter_indicator = None;

        let spot = r.into_spot().unwrap();
        assert_eq!(spot.rack_type, "N/A");
        assert_eq!(spot.rack_count, 0);
        assert!(!spot.shelter_indicator);
    }

    #[test]
    fn unparseable_point_is_spot_parse_error() {
        let err = row("POINT EMPTY").into_spot().unwrap_err();
        assert!(matches!(err, SpatialError::SpotParse(_)));
    }
}
