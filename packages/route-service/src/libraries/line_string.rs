use std::fmt::Write;

use crate::models::{Coordinate, Route};

/// Straight two-point path from origin to destination, ready for storage.
///
/// Takes latitude first, like the map layer that calls it, but writes
/// `LINESTRING(lng1 lat1, lng2 lat2)` like every other geometry text.
pub fn generate_straight_line_route(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> String {
    let route = Route::straight_line(Coordinate::new(lng1, lat1), Coordinate::new(lng2, lat2));
    route_to_line_string(&route)
}

/// Serialize the full route geometry as `LINESTRING(lng lat, ...)`
pub fn route_to_line_string(route: &Route) -> String {
    coordinates_to_line_string(&route.geometry)
}

pub fn coordinates_to_line_string(coordinates: &[Coordinate]) -> String {
    let mut text = String::from("LINESTRING(");
    for (i, point) in coordinates.iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        // Writing into a String cannot fail
        let _ = write!(text, "{} {}", point.longitude, point.latitude);
    }
    text.push(')');
    text
}

/// Route geometry as `[lat, lng]` pairs for map rendering
pub fn route_to_lat_lng_array(route: &Route) -> Vec<[f64; 2]> {
    route
        .geometry
        .iter()
        .map(|point| [point.latitude, point.longitude])
        .collect()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineStringError {
    #[error("Expected LINESTRING(...) text, got {0:?}")]
    NotALineString(String),

    #[error("Invalid point {0:?} in LINESTRING")]
    InvalidPoint(String),

    #[error("LINESTRING needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Read stored `LINESTRING(lng lat, ...)` text back into coordinates
pub fn parse_line_string(text: &str) -> Result<Vec<Coordinate>, LineStringError> {
    let trimmed = text.trim();
    let not_a_line_string = || LineStringError::NotALineString(text.to_string());

    let keyword = trimmed.get(..10).ok_or_else(not_a_line_string)?;
    if !keyword.eq_ignore_ascii_case("LINESTRING") {
        return Err(not_a_line_string());
    }

    let body = trimmed[10..]
        .trim_start()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(not_a_line_string)?;

    let points = body
        .split(',')
        .map(|pair| {
            let mut values = pair.split_whitespace().map(str::parse::<f64>);
            match (values.next(), values.next(), values.next()) {
                (Some(Ok(lng)), Some(Ok(lat)), None) => Ok(Coordinate::new(lng, lat)),
                _ => Err(LineStringError::InvalidPoint(pair.trim().to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if points.len() < 2 {
        return Err(LineStringError::TooFewPoints(points.len()));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin_to_potsdam() -> Route {
        Route {
            distance_meters: 35_200.0,
            duration_seconds: 2_400.0,
            geometry: vec![
                Coordinate::new(13.405, 52.52),
                Coordinate::new(13.2846, 52.4563),
                Coordinate::new(13.1, 52.4),
                Coordinate::new(13.0645, 52.3906),
            ],
        }
    }

    #[test]
    fn test_straight_line_starts_and_ends_at_endpoints() {
        let text = generate_straight_line_route(52.52, 13.405, 48.8566, 2.3522);
        assert_eq!(text, "LINESTRING(13.405 52.52, 2.3522 48.8566)");
    }

    #[test]
    fn test_straight_line_integer_and_negative_values() {
        let text = generate_straight_line_route(-33.0, 151.0, 37.7749, -122.4194);
        assert_eq!(text, "LINESTRING(151 -33, -122.4194 37.7749)");
    }

    #[test]
    fn test_straight_line_parses_back_to_exact_endpoints() {
        let cases = [
            (37.7749, -122.4194, 37.4419, -122.143),
            (0.1 + 0.2, 179.999999, -89.5, -0.000001),
            (51.5074, -0.1278, 51.5074, -0.1278),
        ];

        for (lat1, lng1, lat2, lng2) in cases {
            let text = generate_straight_line_route(lat1, lng1, lat2, lng2);
            let points = parse_line_string(&text).unwrap();
            assert_eq!(points, vec![Coordinate::new(lng1, lat1), Coordinate::new(lng2, lat2)]);
        }
    }

    #[test]
    fn test_line_string_keeps_every_point_in_order() {
        let text = route_to_line_string(&berlin_to_potsdam());
        assert_eq!(
            text,
            "LINESTRING(13.405 52.52, 13.2846 52.4563, 13.1 52.4, 13.0645 52.3906)"
        );
    }

    #[test]
    fn test_lat_lng_array_swaps_axes() {
        let pairs = route_to_lat_lng_array(&berlin_to_potsdam());
        assert_eq!(pairs[0], [52.52, 13.405]);
        assert_eq!(pairs[3], [52.3906, 13.0645]);
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_axis_swaps_compose_to_identity() {
        let route = berlin_to_potsdam();

        let from_text = parse_line_string(&route_to_line_string(&route)).unwrap();
        let from_array: Vec<Coordinate> = route_to_lat_lng_array(&route)
            .into_iter()
            .map(|[lat, lng]| Coordinate::new(lng, lat))
            .collect();

        assert_eq!(from_text, route.geometry);
        assert_eq!(from_array, route.geometry);
    }

    #[test]
    fn test_parse_accepts_loose_formatting() {
        let points = parse_line_string("  linestring ( 1.5 2.5 ,3 4 ) ").unwrap();
        assert_eq!(points, vec![Coordinate::new(1.5, 2.5), Coordinate::new(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        assert!(matches!(
            parse_line_string("POINT(1 2)"),
            Err(LineStringError::NotALineString(_))
        ));
        assert!(matches!(
            parse_line_string("LINESTRING(1 2, 3 4"),
            Err(LineStringError::NotALineString(_))
        ));
        assert!(matches!(
            parse_line_string("LINESTRING(1 2, 3)"),
            Err(LineStringError::InvalidPoint(_))
        ));
        assert!(matches!(
            parse_line_string("LINESTRING(1 2 3, 4 5)"),
            Err(LineStringError::InvalidPoint(_))
        ));
        assert_eq!(
            parse_line_string("LINESTRING(1 2)"),
            Err(LineStringError::TooFewPoints(1))
        );
    }
}
