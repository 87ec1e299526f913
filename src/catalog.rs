//! Course metadata store: which courses may appear in discovery.
//!
//! Course visibility lives in a relational table
//! `course_overviews(id, catalog_visibility)`. Discovery search reads it on
//! every call, so a visibility change takes effect on the next request.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::path::Path;
use std::str::FromStr;

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchApiError};

/// Where a course may be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogVisibility {
    /// Listed in the catalog and its about page is reachable.
    Both,
    /// Only its about page is reachable.
    About,
    /// Hidden everywhere.
    None,
}

impl CatalogVisibility {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogVisibility::Both => "both",
            CatalogVisibility::About => "about",
            CatalogVisibility::None => "none",
        }
    }
}

impl fmt::Display for CatalogVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogVisibility {
    type Err = SearchApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(CatalogVisibility::Both),
            "about" => Ok(CatalogVisibility::About),
            "none" => Ok(CatalogVisibility::None),
            other => Err(SearchApiError::invalid_argument(format!(
                "unknown catalog visibility '{other}'"
            ))),
        }
    }
}

/// Read access to course visibility.
pub trait CourseCatalog: Send + Sync + Debug {
    /// Ids of every course whose visibility is not `both`.
    fn hidden_from_discovery(&self) -> Result<Vec<String>>;

    /// Ids of every course not in `keep`.
    fn course_ids_not_in(&self, keep: &HashSet<String>) -> Result<Vec<String>>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS course_overviews (
    id TEXT PRIMARY KEY,
    catalog_visibility TEXT DEFAULT 'both'
)";

/// A [`CourseCatalog`] backed by SQLite.
pub struct SqliteCourseCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCourseCatalog {
    /// Open a catalog database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory catalog with the schema in place.
    pub fn open_in_memory() -> Result<Self> {
        let catalog = Self::from_connection(Connection::open_in_memory()?);
        catalog.create_schema()?;
        Ok(catalog)
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        SqliteCourseCatalog {
            conn: Mutex::new(conn),
        }
    }

    /// Create the `course_overviews` table if it is missing.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.lock().execute(SCHEMA, [])?;
        Ok(())
    }

    /// Insert a course or update its visibility.
    pub fn upsert_course(&self, course_id: &str, visibility: CatalogVisibility) -> Result<()> {
        self.conn.lock().execute(
            "INSERT INTO course_overviews(id, catalog_visibility) VALUES(?1, ?2)
             ON CONFLICT(id) DO UPDATE SET catalog_visibility=excluded.catalog_visibility",
            params![course_id, visibility.as_str()],
        )?;
        Ok(())
    }

    /// Number of courses in the catalog.
    pub fn course_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .lock()
                .query_row("SELECT COUNT(*) FROM course_overviews", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_ids(&self, sql: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl CourseCatalog for SqliteCourseCatalog {
    fn hidden_from_discovery(&self) -> Result<Vec<String>> {
        // NULL visibility counts as "not both".
        self.query_ids(
            "SELECT id FROM course_overviews
             WHERE catalog_visibility IS NULL OR catalog_visibility != 'both'
             ORDER BY id",
        )
    }

    fn course_ids_not_in(&self, keep: &HashSet<String>) -> Result<Vec<String>> {
        let ids = self.query_ids("SELECT id FROM course_overviews ORDER BY id")?;
        Ok(ids.into_iter().filter(|id| !keep.contains(id)).collect())
    }
}

impl Debug for SqliteCourseCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCourseCatalog").finish_non_exhaustive()
    }
}
