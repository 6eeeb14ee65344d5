#[cfg(test)]
mod tests {
    use acadmate::db::db::Db;
    use acadmate::db::migrations::{get_db_version, MigrationManager};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME and the database path, so they run one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct MigrationTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            MigrationTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_reaches_latest_version(_ctx: &mut MigrationTestContext) {
        let db = Db::new().unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), 5);

        let manager = MigrationManager::new();
        let history = manager.get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].0, 1);
        assert_eq!(history[4].0, 5);
    }

    // The finance seeds reference user id 1 before any user row exists;
    // initialization must still succeed and hand out a connection with
    // foreign-key enforcement on.
    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_seeds_before_any_user_exists(_ctx: &mut MigrationTestContext) {
        let db = Db::new().unwrap();

        let users: i64 = db.conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)).unwrap();
        assert_eq!(users, 0);
        let accounts: i64 = db.conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0)).unwrap();
        assert_eq!(accounts, 1);

        let foreign_keys: i64 = db.conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_all_tables_exist(_ctx: &mut MigrationTestContext) {
        let db = Db::new().unwrap();
        let expected = [
            "users",
            "messages",
            "projects",
            "tasks",
            "subtasks",
            "tags",
            "task_tags",
            "notes",
            "decks",
            "flashcards",
            "accounts",
            "expense_categories",
            "income_categories",
            "expenses",
            "income",
            "budgets",
        ];
        for table in expected {
            let count: i64 = db
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopening_does_not_duplicate_seeds(_ctx: &mut MigrationTestContext) {
        {
            let _db = Db::new().unwrap();
        }
        let db = Db::new().unwrap();

        let expense_categories: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM expense_categories", [], |row| row.get(0))
            .unwrap();
        let income_categories: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM income_categories", [], |row| row.get(0))
            .unwrap();
        let accounts: i64 = db.conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0)).unwrap();

        assert_eq!(expense_categories, 5);
        assert_eq!(income_categories, 3);
        assert_eq!(accounts, 1);

        assert_eq!(get_db_version(&db.conn).unwrap(), 5);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_versions_are_recorded_once(_ctx: &mut MigrationTestContext) {
        let _first = Db::new().unwrap();
        let db = Db::new().unwrap();

        let recorded: i64 = db.conn.query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0)).unwrap();
        assert_eq!(recorded, 5);
    }
}
