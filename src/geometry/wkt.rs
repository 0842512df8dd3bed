use std::fmt;

use super::{GeometryError, Ordinate, preview};

const LINESTRING_PREFIX: &str = "LINESTRING(";

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: Ordinate,
    pub y: Ordinate,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x: Ordinate::from(x),
            y: Ordinate::from(y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub points: Vec<Point>,
}

/// Parse a 2D `LINESTRING(x1 y1, x2 y2, ...)` as produced by `ST_AsText`.
///
/// Only the flat form is accepted. `LINESTRING Z`, `MULTILINESTRING` and
/// anything with nested parentheses is rejected instead of being truncated.
pub fn parse_linestring(wkt: &str) -> Result<LineString, GeometryError> {
    let wkt = wkt.trim();

    let body = match wkt.get(..LINESTRING_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(LINESTRING_PREFIX) => {
            &wkt[LINESTRING_PREFIX.len()..]
        }
        _ => {
            return Err(GeometryError::NotLineString { wkt: preview(wkt) });
        }
    };

    let body = body
        .strip_suffix(')')
        .ok_or_else(|| GeometryError::MissingClosingParen { wkt: preview(wkt) })?;

    if body.contains(['(', ')']) {
        return Err(GeometryError::NestedParens { wkt: preview(wkt) });
    }

    let mut points = Vec::new();
    for pair in body.split(',') {
        let ordinates: Vec<&str> = pair.split_whitespace().collect();
        if ordinates.len() != 2 {
            return Err(GeometryError::BadDimension {
                pair: pair.trim().to_string(),
                found: ordinates.len(),
            });
        }
        points.push(Point {
            x: Ordinate::parse(ordinates[0])?,
            y: Ordinate::parse(ordinates[1])?,
        });
    }

    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints {
            count: points.len(),
        });
    }

    Ok(LineString { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_linestring() {
        let line = parse_linestring("LINESTRING(0 0, 1 1, 2 2)").unwrap();
        assert_eq!(line.points.len(), 3);
        assert_eq!(line.points[2], Point::new(2.0, 2.0));
    }

    #[test]
    fn test_parse_postgis_style_without_spaces() {
        let line = parse_linestring("LINESTRING(351234.5 5601234.25,351300 5601300.75)").unwrap();
        assert_eq!(line.points[0].x.value(), 351234.5);
        assert_eq!(line.points[1].y.value(), 5601300.75);
    }

    #[test]
    fn test_point_display_keeps_source_text() {
        let line = parse_linestring("LINESTRING(0 0, 1.5 -2.25)").unwrap();
        assert_eq!(line.points[0].to_string(), "0 0");
        assert_eq!(line.points[1].to_string(), "1.5 -2.25");

        let line =
            parse_linestring("LINESTRING(351234.123456789012345 5601234.10, 1e2 -0.0)").unwrap();
        assert_eq!(line.points[0].to_string(), "351234.123456789012345 5601234.10");
        assert_eq!(line.points[1].to_string(), "1e2 -0.0");
        assert_eq!(line.points[1].x.value(), 100.0);
    }

    #[test]
    fn test_missing_closing_paren() {
        let result = parse_linestring("LINESTRING(0 0, 1 1");
        assert!(matches!(
            result,
            Err(GeometryError::MissingClosingParen { .. })
        ));
    }

    #[test]
    fn test_rejects_3d() {
        assert!(matches!(
            parse_linestring("LINESTRING Z (0 0 0, 1 1 1)"),
            Err(GeometryError::NotLineString { .. })
        ));
        assert!(matches!(
            parse_linestring("LINESTRING(0 0 0, 1 1 1)"),
            Err(GeometryError::BadDimension { found: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_multi_geometry() {
        assert!(matches!(
            parse_linestring("MULTILINESTRING((0 0, 1 1),(2 2, 3 3))"),
            Err(GeometryError::NotLineString { .. })
        ));
        assert!(matches!(
            parse_linestring("LINESTRING((0 0, 1 1))"),
            Err(GeometryError::NestedParens { .. })
        ));
    }

    #[test]
    fn test_rejects_single_point() {
        assert!(matches!(
            parse_linestring("LINESTRING(0 0)"),
            Err(GeometryError::TooFewPoints { count: 1 })
        ));
    }

    #[test]
    fn test_rejects_empty_pair_and_bad_number() {
        assert!(matches!(
            parse_linestring("LINESTRING()"),
            Err(GeometryError::BadDimension { found: 0, .. })
        ));
        assert!(matches!(
            parse_linestring("LINESTRING(0 0, 1 x)"),
            Err(GeometryError::InvalidOrdinate { .. })
        ));
    }
}
