use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

use crate::error::Result;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let migrations = Migrations::new(vec![M::up(include_str!(
        "../../migrations/001_initial.sql"
    ))]);

    migrations.to_latest(conn)?;
    Ok(())
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_create_model_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('NodesTable', 'StreamCenterlines', 'XSCutLines')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("start"), "\"start\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
