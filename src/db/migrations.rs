//! Database schema migration management.
//!
//! Versioned, transactional schema evolution in the same shape the rest of
//! the crate uses: a registry of numbered migrations, a `migrations`
//! bookkeeping table, and automatic application during database
//! initialization. Individual domain modules additionally ensure their own
//! tables with `CREATE ... IF NOT EXISTS`; running both is harmless because
//! everything here is idempotent.
//!
//! Migrations expect foreign-key enforcement to be off;
//! [`crate::db::db::Db::new`] disables the pragma before applying them and
//! switches it on afterwards, so seed rows may reference users created later.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
#[cfg(debug_assertions)]
use crate::{msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// Bookkeeping table recording every applied migration.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change: version, descriptive name, and the DDL to apply.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: identity and AI chat history
        self.add_migration(1, "create_core_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    firstname TEXT NOT NULL,
                    lastname TEXT NOT NULL,
                    email TEXT UNIQUE,
                    profile_pic TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            // A whole conversation is one JSON blob per row; there is no
            // per-message table.
            tx.execute(
                "CREATE TABLE IF NOT EXISTS messages (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    conversation TEXT NOT NULL,
                    timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: to-do system with projects, subtasks and tags
        self.add_migration(2, "add_todo_system", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    color TEXT DEFAULT '#3498db',
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    project_id INTEGER,
                    title TEXT NOT NULL,
                    description TEXT DEFAULT NULL,
                    due_date DATETIME DEFAULT NULL,
                    priority INTEGER DEFAULT 0,
                    is_completed INTEGER DEFAULT 0,
                    is_important INTEGER DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    completed_at DATETIME DEFAULT NULL,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE SET NULL
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS subtasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    is_completed INTEGER DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS tags (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    color TEXT DEFAULT '#95a5a6',
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS task_tags (
                    task_id INTEGER NOT NULL,
                    tag_id INTEGER NOT NULL,
                    PRIMARY KEY (task_id, tag_id),
                    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
                    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_is_completed ON tasks(is_completed)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_subtasks_task_id ON subtasks(task_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_tags_task_id ON task_tags(task_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_tags_tag_id ON task_tags(tag_id)", [])?;

            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_tasks_updated_at
                AFTER UPDATE ON tasks
                FOR EACH ROW
                BEGIN
                    UPDATE tasks SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
                END",
                [],
            )?;

            // Completing the last open subtask completes the parent task.
            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_parent_task_completion
                AFTER UPDATE ON subtasks
                FOR EACH ROW
                WHEN NEW.is_completed != OLD.is_completed
                BEGIN
                    UPDATE tasks
                    SET is_completed = 1, completed_at = CURRENT_TIMESTAMP
                    WHERE id = NEW.task_id AND NOT EXISTS (
                        SELECT 1 FROM subtasks WHERE task_id = NEW.task_id AND is_completed = 0
                    );
                END",
                [],
            )?;
            Ok(())
        });

        // Version 3: notes
        self.add_migration(3, "add_notes", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    tags TEXT DEFAULT NULL,
                    is_pinned INTEGER DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes(created_at)", [])?;

            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_notes_updated_at
                AFTER UPDATE ON notes
                FOR EACH ROW
                BEGIN
                    UPDATE notes SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
                END",
                [],
            )?;
            Ok(())
        });

        // Version 4: flashcard decks and cards
        self.add_migration(4, "add_flashcards", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS decks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    is_important BOOLEAN DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS flashcards (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    deck_id INTEGER NOT NULL,
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    image BLOB,
                    audio BLOB,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (deck_id) REFERENCES decks(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 5: finance tables, triggers and seed data.
        // Income and expenses are deliberately separate tables; the merged
        // transaction view is produced at query time with UNION ALL.
        self.add_migration(5, "add_finance", |tx| {
            // UNIQUE(user_id, name) on accounts and categories gives the
            // INSERT OR IGNORE seeds below something to ignore against, so
            // re-running initialization never duplicates seed rows.
            tx.execute(
                "CREATE TABLE IF NOT EXISTS accounts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    type TEXT NOT NULL,
                    current_balance REAL DEFAULT 0,
                    color TEXT DEFAULT '#3498db',
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    is_active INTEGER DEFAULT 1,
                    UNIQUE(user_id, name),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS expense_categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    icon TEXT NOT NULL,
                    color TEXT NOT NULL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE(user_id, name),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS income_categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    icon TEXT NOT NULL,
                    color TEXT NOT NULL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE(user_id, name),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS expenses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    account_id INTEGER NOT NULL,
                    category_id INTEGER,
                    amount REAL NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    date DATETIME DEFAULT CURRENT_TIMESTAMP,
                    is_need INTEGER DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE,
                    FOREIGN KEY (category_id) REFERENCES expense_categories(id) ON DELETE SET NULL
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS income (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    account_id INTEGER NOT NULL,
                    category_id INTEGER,
                    amount REAL NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    date DATETIME DEFAULT CURRENT_TIMESTAMP,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE,
                    FOREIGN KEY (category_id) REFERENCES income_categories(id) ON DELETE SET NULL
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS budgets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    period TEXT NOT NULL DEFAULT 'monthly',
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (category_id) REFERENCES expense_categories(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets(user_id)", [])?;

            // Account balances are maintained exclusively by these triggers;
            // application code never writes current_balance directly.
            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_account_balance_income
                AFTER INSERT ON income
                FOR EACH ROW
                BEGIN
                    UPDATE accounts SET current_balance = current_balance + NEW.amount
                    WHERE id = NEW.account_id;
                END",
                [],
            )?;

            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_account_balance_expense
                AFTER INSERT ON expenses
                FOR EACH ROW
                BEGIN
                    UPDATE accounts SET current_balance = current_balance - NEW.amount
                    WHERE id = NEW.account_id;
                END",
                [],
            )?;

            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_income_timestamp
                AFTER UPDATE ON income
                FOR EACH ROW
                BEGIN
                    UPDATE income SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
                END",
                [],
            )?;

            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS update_expense_timestamp
                AFTER UPDATE ON expenses
                FOR EACH ROW
                BEGIN
                    UPDATE expenses SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
                END",
                [],
            )?;

            // Seed the fixed category taxonomy and a default wallet.
            tx.execute(
                "INSERT OR IGNORE INTO expense_categories (user_id, name, icon, color) VALUES
                    (1, 'Food', 'fast-food', '#e74c3c'),
                    (1, 'Transport', 'bus', '#f39c12'),
                    (1, 'Entertainment', 'film', '#3498db'),
                    (1, 'Education', 'book', '#2ecc71'),
                    (1, 'Other', 'pricetag', '#9b59b6')",
                [],
            )?;

            tx.execute(
                "INSERT OR IGNORE INTO income_categories (user_id, name, icon, color) VALUES
                    (1, 'Allowance', 'cash', '#27ae60'),
                    (1, 'Part-time Job', 'briefcase', '#16a085'),
                    (1, 'Other', 'wallet', '#1abc9c')",
                [],
            )?;

            tx.execute(
                "INSERT OR IGNORE INTO accounts (user_id, name, type, current_balance, color) VALUES
                    (1, 'Main Wallet', 'cash', 0, '#3498db')",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    ///
    /// All pending migrations run inside one transaction: either the
    /// database reaches the latest version or it stays where it was.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;

        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    /// Whether a particular migration version has already been applied.
    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Chronological list of `(version, name, applied_at)` records.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Development-only rollback: forgets migration records past the target
    /// version without reversing the schema changes themselves.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;

        if target_version >= current_version {
            msg_info!(Message::NothingToRollback);
            return Ok(());
        }

        msg_info!(Message::RollingBack(current_version, target_version));

        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;

        msg_success!(Message::RollbackCompleted(target_version));
        Ok(())
    }
}

/// Brings a connection to the latest schema version.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

/// Current schema version of the given connection.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

/// Whether the connection is behind the latest registered migration.
pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    let latest = manager.migrations.last().map(|m| m.version).unwrap_or(0);
    Ok(current < latest)
}
