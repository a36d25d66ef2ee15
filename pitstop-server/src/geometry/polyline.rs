//! Encoded polyline decoding.
//!
//! Routes arrive as Google encoded polylines with 5 decimal places of
//! precision. Each value is a zigzag-encoded delta from the previous
//! point, split into 5-bit chunks offset by 63, with `0x20` marking
//! continuation. The encoding stores `(lat, lon)` pairs; decoded points
//! are returned in `(lon, lat)` order.

use crate::domain::Coordinate;

/// Fixed precision of the encoding.
const PRECISION: f64 = 1e5;

/// Offset added to every encoded chunk.
const CHUNK_OFFSET: u8 = 63;

/// Continuation flag within a chunk.
const CONTINUATION: i64 = 0x20;

/// Longest chunk run that still fits an `i64`.
const MAX_SHIFT: u32 = 60;

/// Error decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// Input ended in the middle of a value
    #[error("truncated polyline at byte {0}")]
    Truncated(usize),

    /// Byte outside the polyline alphabet
    #[error("invalid polyline byte {byte:#04x} at {index}")]
    InvalidByte { byte: u8, index: usize },

    /// A value or running coordinate does not fit in range
    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

/// Decode an encoded polyline into `(lon, lat)` coordinates.
///
/// An empty string decodes to an empty sequence.
///
/// # Examples
///
/// ```
/// use pitstop_server::geometry::polyline;
///
/// let coords = polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(coords.len(), 3);
/// assert_eq!((coords[0].lon, coords[0].lat), (-120.2, 38.5));
/// assert_eq!((coords[2].lon, coords[2].lat), (-126.453, 43.252));
///
/// assert!(polyline::decode("").unwrap().is_empty());
/// assert!(polyline::decode("_p~iF").is_err());
/// ```
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut coords = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        let dlat = next_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated(index));
        }
        let dlon = next_value(bytes, &mut index)?;

        lat = lat.checked_add(dlat).ok_or(PolylineError::Overflow(index))?;
        lon = lon.checked_add(dlon).ok_or(PolylineError::Overflow(index))?;

        coords.push(Coordinate::from_raw(
            lon as f64 / PRECISION,
            lat as f64 / PRECISION,
        ));
    }

    Ok(coords)
}

/// Read one zigzag-encoded delta starting at `index`, advancing it.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated(*index));
        };
        if !(CHUNK_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                index: *index,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow(*index));
        }

        let chunk = i64::from(byte - CHUNK_OFFSET);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *index += 1;

        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode `(lon, lat)` coordinates, for building test fixtures.
#[cfg(test)]
pub(crate) fn encode(coords: &[Coordinate]) -> String {
    fn push_value(out: &mut String, value: i64) {
        let mut v = if value < 0 { !(value << 1) } else { value << 1 };
        while v >= CONTINUATION {
            out.push(char::from((CONTINUATION | (v & 0x1f)) as u8 + CHUNK_OFFSET));
            v >>= 5;
        }
        out.push(char::from(v as u8 + CHUNK_OFFSET));
    }

    let mut out = String::new();
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);
    for c in coords {
        let lat = (c.lat * PRECISION).round() as i64;
        let lon = (c.lon * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_reference() {
        let coords = [
            Coordinate::from_raw(-120.2, 38.5),
            Coordinate::from_raw(-120.95, 40.7),
            Coordinate::from_raw(-126.453, 43.252),
        ];
        assert_eq!(encode(&coords), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decodes_reference_polyline() {
        let coords = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        let expected = [(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)];

        assert_eq!(coords.len(), expected.len());
        for (c, (lon, lat)) in coords.iter().zip(expected) {
            assert!(approx(c.lon, lon), "lon {} != {}", c.lon, lon);
            assert!(approx(c.lat, lat), "lat {} != {}", c.lat, lat);
        }
    }

    #[test]
    fn empty_string_is_empty_path() {
        assert_eq!(decode(""), Ok(Vec::new()));
    }

    #[test]
    fn single_zero_point() {
        // "?" encodes 0
        let coords = decode("??").unwrap();
        assert_eq!(coords, vec![Coordinate::from_raw(0.0, 0.0)]);
    }

    #[test]
    fn repeated_point_decodes_to_identical_coordinates() {
        let coords = decode("_p~iF~ps|U??").unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], coords[1]);
    }

    #[test]
    fn truncated_mid_value() {
        // Continuation chunk with nothing after it
        assert_eq!(decode("_p~i"), Err(PolylineError::Truncated(4)));
    }

    #[test]
    fn truncated_missing_longitude() {
        assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated(5)));
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        assert_eq!(
            decode("_p~iF ps|U"),
            Err(PolylineError::InvalidByte {
                byte: b' ',
                index: 5
            })
        );
    }

    #[test]
    fn rejects_overlong_values() {
        let encoded = "~".repeat(20);
        assert!(matches!(decode(&encoded), Err(PolylineError::Overflow(_))));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            PolylineError::Truncated(3).to_string(),
            "truncated polyline at byte 3"
        );
        assert_eq!(
            PolylineError::InvalidByte {
                byte: b' ',
                index: 5
            }
            .to_string(),
            "invalid polyline byte 0x20 at 5"
        );
    }
}
