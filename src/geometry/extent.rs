use std::fmt;

use serde::Serialize;

use super::{GeometryError, Ordinate, Point, preview};

/// Axis-aligned bounding box of a set of geometries.
///
/// Each bound keeps the text of the ordinate it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtentBox {
    pub xmin: Ordinate,
    pub ymin: Ordinate,
    pub xmax: Ordinate,
    pub ymax: Ordinate,
}

impl ExtentBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        ExtentBox {
            xmin: xmin.into(),
            ymin: ymin.into(),
            xmax: xmax.into(),
            ymax: ymax.into(),
        }
    }

    pub fn from_point(point: &Point) -> Self {
        ExtentBox {
            xmin: point.x.clone(),
            ymin: point.y.clone(),
            xmax: point.x.clone(),
            ymax: point.y.clone(),
        }
    }

    /// Grow the box to cover `point`. On a tie the bound seen first is kept.
    pub fn expand(&mut self, point: &Point) {
        if point.x.value() < self.xmin.value() {
            self.xmin = point.x.clone();
        }
        if point.y.value() < self.ymin.value() {
            self.ymin = point.y.clone();
        }
        if point.x.value() > self.xmax.value() {
            self.xmax = point.x.clone();
        }
        if point.y.value() > self.ymax.value() {
            self.ymax = point.y.clone();
        }
    }

    /// Parse `BOX(xmin ymin,xmax ymax)` text as returned by `ST_Extent`.
    ///
    /// The minimum corner sits between the first `(` and the first `,`, the
    /// maximum corner between that comma and the first `)`.
    pub fn parse_box(text: &str) -> Result<Self, GeometryError> {
        let malformed = || GeometryError::MalformedBox {
            text: preview(text),
        };

        let open = text.find('(').ok_or_else(malformed)?;
        let comma = text.find(',').ok_or_else(malformed)?;
        let close = text.find(')').ok_or_else(malformed)?;
        if !(open < comma && comma < close) {
            return Err(malformed());
        }

        let min = corner(&text[open + 1..comma]).ok_or_else(malformed)??;
        let max = corner(&text[comma + 1..close]).ok_or_else(malformed)??;

        Ok(ExtentBox {
            xmin: min.x,
            ymin: min.y,
            xmax: max.x,
            ymax: max.y,
        })
    }
}

/// Returns None when the corner does not have exactly two ordinates.
fn corner(text: &str) -> Option<Result<Point, GeometryError>> {
    match text.split_whitespace().collect::<Vec<_>>()[..] {
        [x, y] => Some(
            Ordinate::parse(x).and_then(|x| Ordinate::parse(y).map(|y| Point { x, y })),
        ),
        _ => None,
    }
}

impl fmt::Display for ExtentBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BOX({} {},{} {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_box() {
        let extent = ExtentBox::parse_box("BOX(10 20,30 40)").unwrap();
        assert_eq!(extent, ExtentBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_parse_box_with_decimals() {
        let extent = ExtentBox::parse_box("BOX(351200.5 5601100.25,352000 5602000.75)").unwrap();
        assert_eq!(extent.xmin.value(), 351200.5);
        assert_eq!(extent.ymax.value(), 5602000.75);
    }

    #[test]
    fn test_parse_box_keeps_ordinate_text() {
        let text = "BOX(351234.123456789012345 -0.0,1e2 5601234.10)";
        let extent = ExtentBox::parse_box(text).unwrap();
        assert_eq!(extent.xmin.as_str(), "351234.123456789012345");
        assert_eq!(extent.ymin.as_str(), "-0.0");
        assert_eq!(extent.xmax.as_str(), "1e2");
        assert_eq!(extent.ymax.as_str(), "5601234.10");
        assert_eq!(extent.to_string(), text);
    }

    #[test]
    fn test_parse_box_missing_delimiters() {
        for text in ["BOX 10 20 30 40", "BOX(10 20 30 40)", "BOX(10 20,30 40", "", "BOX)10 20,30 40("] {
            assert!(
                matches!(
                    ExtentBox::parse_box(text),
                    Err(GeometryError::MalformedBox { .. })
                ),
                "expected MalformedBox for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_parse_box_rejects_3d() {
        assert!(matches!(
            ExtentBox::parse_box("BOX3D(0 0 0,1 1 1)"),
            Err(GeometryError::MalformedBox { .. })
        ));
    }

    #[test]
    fn test_parse_box_bad_number() {
        assert!(matches!(
            ExtentBox::parse_box("BOX(a 20,30 40)"),
            Err(GeometryError::InvalidOrdinate { .. })
        ));
    }

    #[test]
    fn test_display_parses_back() {
        let extent = ExtentBox::new(-1.5, 2.0, 3.25, 4.0);
        assert_eq!(extent.to_string(), "BOX(-1.5 2,3.25 4)");
        assert_eq!(ExtentBox::parse_box(&extent.to_string()).unwrap(), extent);
    }

    #[test]
    fn test_expand_keeps_bound_text() {
        let point = |x: &str, y: &str| Point {
            x: Ordinate::parse(x).unwrap(),
            y: Ordinate::parse(y).unwrap(),
        };

        let mut extent = ExtentBox::from_point(&point("5", "5"));
        extent.expand(&point("1.000", "9.50"));
        extent.expand(&point("7", "3e0"));
        extent.expand(&point("1", "9.5"));
        assert_eq!(extent.to_string(), "BOX(1.000 3e0,7 9.50)");
        assert_eq!(extent.xmin.value(), 1.0);
        assert_eq!(extent.ymax.value(), 9.5);
    }
}
