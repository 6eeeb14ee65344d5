use crate::db::migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "acadmate.db";

/// Owns the application's SQLite connection.
///
/// `new()` opens (or creates) the database file under the platform data
/// directory, applies any pending schema migrations, and turns on
/// foreign-key enforcement. Domain modules are constructed from a `Db` and take
/// ownership of the connection, so a module that exists is always backed by
/// an open, migrated database.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let mut conn = Connection::open(db_file_path)?;

        // The finance seed rows reference the onboarding user, which does
        // not exist yet on a fresh database, so enforcement must be off
        // while migrations run. The bundled SQLite can have it on from
        // open, hence the explicit OFF rather than relying on the default.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        migrations::init_with_migrations(&mut conn)?;

        // Cascade and set-null semantics depend on this pragma; SQLite
        // leaves it off by default per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Db { conn })
    }
}
