//! Spatial SQL functions for model files that store geometry as WKT text.
//!
//! `ST_AsText(geom)` returns the stored text and `ST_Extent(geom)` aggregates
//! line geometries into `BOX(xmin ymin,xmax ymax)`, so the exporter can issue
//! the same queries it would against a PostGIS schema.

use rusqlite::Connection;
use rusqlite::functions::{Aggregate, Context, FunctionFlags};

use crate::geometry::{ExtentBox, parse_linestring};

pub fn register_spatial_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("ST_AsText", 1, flags, |ctx| {
        let wkt: Option<String> = ctx.get(0)?;
        Ok(wkt.map(|w| w.trim().to_string()))
    })?;

    conn.create_aggregate_function("ST_Extent", 1, flags, StExtent)?;
    Ok(())
}

struct StExtent;

impl Aggregate<Option<ExtentBox>, Option<String>> for StExtent {
    fn init(&self, _ctx: &mut Context<'_>) -> rusqlite::Result<Option<ExtentBox>> {
        Ok(None)
    }

    fn step(&self, ctx: &mut Context<'_>, acc: &mut Option<ExtentBox>) -> rusqlite::Result<()> {
        let wkt: Option<String> = ctx.get(0)?;
        // NULL geometries do not contribute, as in PostGIS
        let Some(wkt) = wkt else {
            return Ok(());
        };

        let line =
            parse_linestring(&wkt).map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
        for point in &line.points {
            acc.get_or_insert_with(|| ExtentBox::from_point(point))
                .expand(point);
        }
        Ok(())
    }

    fn finalize(
        &self,
        _ctx: &mut Context<'_>,
        acc: Option<Option<ExtentBox>>,
    ) -> rusqlite::Result<Option<String>> {
        Ok(acc.flatten().map(|extent| extent.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_spatial_functions(&conn).unwrap();
        conn.execute_batch("CREATE TABLE lines (geom TEXT);").unwrap();
        conn
    }

    #[test]
    fn test_st_extent_over_lines() {
        let conn = setup_conn();
        conn.execute_batch(
            "INSERT INTO lines VALUES ('LINESTRING(10 25, 20 40)');
             INSERT INTO lines VALUES ('LINESTRING(15 20, 30 30)');
             INSERT INTO lines VALUES (NULL);",
        )
        .unwrap();

        let text: Option<String> = conn
            .query_row("SELECT ST_Extent(geom) FROM lines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(text.as_deref(), Some("BOX(10 20,30 40)"));
    }

    #[test]
    fn test_st_extent_keeps_ordinate_text() {
        let conn = setup_conn();
        conn.execute_batch(
            "INSERT INTO lines VALUES ('LINESTRING(351234.123456789012345 5601234.10, 1e2 -0.0)');",
        )
        .unwrap();

        let text: String = conn
            .query_row("SELECT ST_Extent(geom) FROM lines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "BOX(1e2 -0.0,351234.123456789012345 5601234.10)");
    }

    #[test]
    fn test_st_extent_empty_table_is_null() {
        let conn = setup_conn();
        let text: Option<String> = conn
            .query_row("SELECT ST_Extent(geom) FROM lines", [], |row| row.get(0))
            .unwrap();
        assert!(text.is_none());
    }

    #[test]
    fn test_st_extent_rejects_malformed_geometry() {
        let conn = setup_conn();
        conn.execute_batch("INSERT INTO lines VALUES ('POINT(1 2)');")
            .unwrap();

        let result: rusqlite::Result<Option<String>> =
            conn.query_row("SELECT ST_Extent(geom) FROM lines", [], |row| row.get(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_st_astext_trims() {
        let conn = setup_conn();
        let text: String = conn
            .query_row("SELECT ST_AsText('  LINESTRING(0 0, 1 1) ')", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(text, "LINESTRING(0 0, 1 1)");
    }
}
