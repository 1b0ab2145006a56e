//! In-memory SQLite store for palm oil yield and climate data.
//!
//! Source tables are loaded once from CSV text (optionally gzip-compressed
//! on disk) and then only read. Every consumer works off the typed query
//! methods; nothing outside this crate touches SQL.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper, cheaply cloneable, single-threaded
//! - In-memory SQLite via `rusqlite` with the bundled library
//! - Rows are parsed into `palm_core` records before insertion, so malformed
//!   input fails at load time rather than at query time
//!
//! # Usage
//!
//! ```rust
//! use palm_core::ClimateSource;
//! use palm_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_yield("Year,Month,FFB_Yield,CPO_Yield,FFB_production\n2023,1,1.2,0.25,1200000\n").unwrap();
//! db.load_climate(
//!     ClimateSource::Historical,
//!     "Year,Month,pr,tas,tasmin,tasmax,hurs\n2023,1,210.5,26.8,23.1,31.2,84.0\n",
//! )
//! .unwrap();
//!
//! let yields = db.query_yield_records().unwrap();
//! let climate = db.query_climate_records(ClimateSource::Historical).unwrap();
//! assert_eq!((yields.len(), climate.len()), (1, 1));
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

pub use loader::read_table;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the yield and climate tables.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one
/// connection.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
