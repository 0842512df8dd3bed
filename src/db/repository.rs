use rusqlite::types::Value;
use rusqlite::{Connection, Row, params};
use tracing::{debug, trace};

use crate::error::{FormatError, RasError, Result};
use crate::exchange::format::{NodeRecord, ReachRecord, STREAM_LAYER, XS_LAYER};
use crate::geometry::ExtentBox;

use super::schema::quote_ident;

/// Reach columns as they come out of the database, before required fields
/// are checked.
struct RawReach {
    reach_id: i64,
    stream_id: Option<String>,
    reach_code: Option<String>,
    from_node: Option<i64>,
    to_node: Option<i64>,
    wkt: Option<String>,
}

/// Map a database row to RawReach. Expects columns in order:
/// ReachID, RiverCode, ReachCode, FromNode, ToNode, ST_AsText(geom)
fn map_row_to_raw_reach(row: &Row) -> rusqlite::Result<RawReach> {
    Ok(RawReach {
        reach_id: row.get(0)?,
        stream_id: value_to_text(row.get(1)?),
        reach_code: value_to_text(row.get(2)?),
        from_node: row.get(3)?,
        to_node: row.get(4)?,
        wkt: row.get(5)?,
    })
}

/// Render a code column the way it would print, whatever its storage class.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
    }
}

impl RawReach {
    fn into_record(self) -> std::result::Result<ReachRecord, FormatError> {
        trace!("Reach {} loaded", self.reach_id);
        Ok(ReachRecord {
            stream_id: self.stream_id.ok_or(FormatError::MissingField {
                field: "RiverCode",
            })?,
            reach_id: self.reach_code.ok_or(FormatError::MissingField {
                field: "ReachCode",
            })?,
            from_node: self.from_node.ok_or(FormatError::MissingField {
                field: "FromNode",
            })?,
            to_node: self
                .to_node
                .ok_or(FormatError::MissingField { field: "ToNode" })?,
            centerline_wkt: self
                .wkt
                .ok_or(FormatError::MissingField { field: "geom" })?,
        })
    }
}

/// Convert a `COUNT(...)` result, which must be a non-negative integer.
pub(crate) fn parse_count(layer: &str, value: Value) -> std::result::Result<u64, FormatError> {
    match value {
        Value::Integer(n) if n >= 0 => Ok(n as u64),
        other => Err(FormatError::NonNumericCount {
            layer: layer.to_string(),
            value: format!("{:?}", other),
        }),
    }
}

/// Read-only queries against one model schema.
pub struct Repository<'a> {
    conn: &'a Connection,
    schema: &'a str,
}

impl<'a> Repository<'a> {
    pub fn new(conn: &'a Connection, schema: &'a str) -> Self {
        Repository { conn, schema }
    }

    pub fn schema(&self) -> &str {
        self.schema
    }

    fn table(&self, name: &str) -> String {
        format!("{}.{}", quote_ident(self.schema), quote_ident(name))
    }

    fn count_rows(&self, column: &str, layer: &str) -> Result<u64> {
        let qry = format!(
            "SELECT COUNT({}) FROM {};",
            quote_ident(column),
            self.table(layer)
        );
        let value: Value = self.conn.query_row(&qry, [], |row| row.get(0))?;
        Ok(parse_count(layer, value)?)
    }

    pub fn number_of_reaches(&self) -> Result<u64> {
        let nor = self.count_rows("ReachID", STREAM_LAYER)?;
        debug!("Nr of reaches: {}", nor);
        Ok(nor)
    }

    pub fn number_of_xsections(&self) -> Result<u64> {
        let nox = self.count_rows("XsecID", XS_LAYER)?;
        debug!("Nr of cross-sections: {}", nox);
        Ok(nox)
    }

    /// Raw `ST_Extent` text over the cross-section cut lines. None when the
    /// layer holds no geometry.
    pub fn spatial_extent_text(&self) -> Result<Option<String>> {
        let qry = format!("SELECT ST_Extent(geom) FROM {};", self.table(XS_LAYER));
        let text: Option<String> = self.conn.query_row(&qry, [], |row| row.get(0))?;
        Ok(text)
    }

    pub fn spatial_extent(&self) -> Result<ExtentBox> {
        let text = self
            .spatial_extent_text()?
            .ok_or_else(|| RasError::UnexpectedResult {
                query: format!("ST_Extent over {}", self.table(XS_LAYER)),
                detail: "no cross-section geometry to compute an extent from".to_string(),
            })?;
        let extent = ExtentBox::parse_box(&text)?;
        debug!(
            "XMIN: {} YMIN: {} XMAX: {} YMAX: {}",
            extent.xmin, extent.ymin, extent.xmax, extent.ymax
        );
        Ok(extent)
    }

    pub fn load_nodes(&self) -> Result<Vec<NodeRecord>> {
        let qry = format!(
            r#"SELECT "NodeID", "X", "Y" FROM {} ORDER BY "NodeID";"#,
            self.table("NodesTable")
        );
        let mut stmt = self.conn.prepare(&qry)?;

        let rows = stmt.query_map([], |row| {
            Ok(NodeRecord {
                node_id: row.get(0)?,
                x: row.get(1)?,
                y: row.get(2)?,
            })
        })?;

        let mut nodes = Vec::new();
        for row in rows {
            nodes.push(row?);
        }
        Ok(nodes)
    }

    pub fn load_reaches(&self) -> Result<Vec<ReachRecord>> {
        let qry = format!(
            r#"SELECT "ReachID", "RiverCode", "ReachCode", "FromNode", "ToNode", ST_AsText(geom) FROM {} ORDER BY "ReachID";"#,
            self.table(STREAM_LAYER)
        );
        let mut stmt = self.conn.prepare(&qry)?;

        let rows = stmt.query_map([], map_row_to_raw_reach)?;

        let mut reaches = Vec::new();
        for row in rows {
            reaches.push(row?.into_record()?);
        }
        Ok(reaches)
    }

    pub fn insert_node(&self, node: &NodeRecord) -> Result<()> {
        self.conn.execute(
            &format!(
                r#"INSERT INTO {} ("NodeID", "X", "Y") VALUES (?1, ?2, ?3)"#,
                self.table("NodesTable")
            ),
            params![node.node_id, node.x, node.y],
        )?;
        Ok(())
    }

    pub fn insert_reach(&self, reach: &ReachRecord) -> Result<i64> {
        self.conn.execute(
            &format!(
                r#"INSERT INTO {} ("RiverCode", "ReachCode", "FromNode", "ToNode", "geom")
                 VALUES (?1, ?2, ?3, ?4, ?5)"#,
                self.table(STREAM_LAYER)
            ),
            params![
                &reach.stream_id,
                &reach.reach_id,
                reach.from_node,
                reach.to_node,
                &reach.centerline_wkt,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_cross_section(&self, reach_id: Option<i64>, station: f64, wkt: &str) -> Result<i64> {
        self.conn.execute(
            &format!(
                r#"INSERT INTO {} ("ReachID", "Station", "geom") VALUES (?1, ?2, ?3)"#,
                self.table(XS_LAYER)
            ),
            params![reach_id, station, wkt],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
