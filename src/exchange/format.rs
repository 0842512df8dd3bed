use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FormatError;
use crate::geometry::ExtentBox;

/// First-line tool name used when none is configured.
pub const DEFAULT_GENERATOR: &str = concat!("rasgis ", env!("CARGO_PKG_VERSION"));

pub const STREAM_LAYER: &str = "StreamCenterlines";
pub const XS_LAYER: &str = "XSCutLines";

/// One row of the stream centerline layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachRecord {
    pub stream_id: String,
    pub reach_id: String,
    pub from_node: i64,
    pub to_node: i64,
    pub centerline_wkt: String,
}

/// One row of the nodes table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    pub node_id: i64,
    pub x: f64,
    pub y: f64,
}

/// Everything the header needs, passed explicitly into the formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportContext {
    pub generator: String,
    pub database_name: String,
    pub host_name: String,
    pub schema_name: String,
    pub spatial_unit: String,
    pub reach_count: u64,
    pub cross_section_count: u64,
    pub extent: ExtentBox,
}

impl ExportContext {
    /// `<db>@<host>/<schema>/<layer>`
    pub fn layer_path(&self, layer: &str) -> String {
        format!(
            "{}@{}/{}/{}",
            self.database_name, self.host_name, self.schema_name, layer
        )
    }

    /// Check that every text field can be written into the header.
    pub fn validate(&self) -> Result<(), FormatError> {
        let fields = [
            ("generator", &self.generator),
            ("database_name", &self.database_name),
            ("host_name", &self.host_name),
            ("schema_name", &self.schema_name),
            ("spatial_unit", &self.spatial_unit),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(FormatError::MissingField { field });
            }
            check_single_line(field, value)?;
        }
        Ok(())
    }
}

pub(crate) fn check_single_line(field: &'static str, value: &str) -> Result<(), FormatError> {
    if value.contains(['\n', '\r']) {
        return Err(FormatError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Map units of the model's coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapUnit {
    #[default]
    Meters,
    Feet,
    Degrees,
    NauticalMiles,
    Unknown,
}

impl MapUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapUnit::Meters => "METERS",
            MapUnit::Feet => "FEET",
            MapUnit::Degrees => "DEGREES",
            MapUnit::NauticalMiles => "NAUTICAL MILES",
            MapUnit::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MapUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "meters" | "metres" | "meter" | "metre" | "m" => Ok(MapUnit::Meters),
            "feet" | "foot" | "ft" => Ok(MapUnit::Feet),
            "degrees" | "degree" | "deg" => Ok(MapUnit::Degrees),
            "nautical miles" | "nmi" => Ok(MapUnit::NauticalMiles),
            "unknown" => Ok(MapUnit::Unknown),
            _ => Err(format!("Unknown map unit: {}", s)),
        }
    }
}
