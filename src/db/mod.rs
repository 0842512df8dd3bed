pub mod functions;
pub mod repository;
pub mod schema;

pub use repository::Repository;
pub use schema::{quote_ident, run_migrations};

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{RasError, Result};

/// A model file opened under its schema name.
///
/// The `main` schema opens the file directly. Any other name attaches the
/// file to an in-memory catalog so queries can qualify tables as
/// `"<schema>"."StreamCenterlines"`. Models opened with [`ModelDatabase::open`]
/// are read-only.
pub struct ModelDatabase {
    conn: Connection,
    schema: String,
}

impl ModelDatabase {
    /// Create a new, empty model file and keep it open for writing.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        run_migrations(&mut conn)?;
        functions::register_spatial_functions(&conn)?;
        debug!("Created model file {}", path.display());

        Ok(ModelDatabase {
            conn,
            schema: "main".to_string(),
        })
    }

    /// Open an existing model for reading.
    pub fn open(path: &Path, schema: &str) -> Result<Self> {
        if !path.exists() {
            return Err(RasError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if schema.trim().is_empty() {
            return Err(RasError::Config("schema name must not be empty".into()));
        }

        let conn = if schema.eq_ignore_ascii_case("main") {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            // URI filenames must be enabled for the attached file's mode=ro
            let conn = Connection::open_in_memory_with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.execute(
                &format!("ATTACH DATABASE ?1 AS {}", quote_ident(schema)),
                rusqlite::params![read_only_uri(path)],
            )?;
            conn
        };
        functions::register_spatial_functions(&conn)?;
        debug!("Opened {} read-only as schema {}", path.display(), schema);

        Ok(ModelDatabase {
            conn,
            schema: schema.to_string(),
        })
    }

    pub fn repository(&self) -> Repository<'_> {
        Repository::new(&self.conn, &self.schema)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

/// `file:` URI opening `path` read-only. Characters with a meaning in a URI
/// are percent-encoded.
fn read_only_uri(path: &Path) -> String {
    let mut uri = String::from("file:");
    for c in path.to_string_lossy().chars() {
        match c {
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3f"),
            '#' => uri.push_str("%23"),
            _ => uri.push(c),
        }
    }
    uri.push_str("?mode=ro");
    uri
}
