#[cfg(test)]
mod tests {
    use acadmate::db::users::{User, Users};
    use acadmate::libs::config::Config;
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME and the database path, so they run one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct UserTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for UserTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            UserTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_user_round_trip(_ctx: &mut UserTestContext) {
        let mut users = Users::new().unwrap();

        let id = users.insert(&User::new("Hana", "Velasco", "hana@example.com", None)).unwrap();
        let fetched = users.get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.firstname, "Hana");
        assert_eq!(fetched.email, "hana@example.com");
        assert!(fetched.created_at.is_some());

        assert!(users.get_by_id(id + 1).unwrap().is_none());

        let all = users.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].lastname, "Velasco");
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_duplicate_email_rejected(_ctx: &mut UserTestContext) {
        let mut users = Users::new().unwrap();

        users.insert(&User::new("Iris", "Wong", "iris@example.com", None)).unwrap();
        let duplicate = users.insert(&User::new("Other", "Person", "iris@example.com", None));
        assert!(duplicate.is_err());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_get_by_email(_ctx: &mut UserTestContext) {
        let mut users = Users::new().unwrap();

        users.insert(&User::new("Kim", "Reyes", "kim@example.com", None)).unwrap();
        let found = users.get_by_email("kim@example.com").unwrap().unwrap();
        assert_eq!(found.firstname, "Kim");

        assert!(users.get_by_email("absent@example.com").unwrap().is_none());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_user_update(_ctx: &mut UserTestContext) {
        let mut users = Users::new().unwrap();

        let id = users.insert(&User::new("Jo", "Diaz", "jo@example.com", None)).unwrap();
        let mut user = users.get_by_id(id).unwrap().unwrap();
        user.profile_pic = Some("avatar.png".to_string());
        assert!(users.update(id, &user).unwrap());

        let updated = users.get_by_id(id).unwrap().unwrap();
        assert_eq!(updated.profile_pic.as_deref(), Some("avatar.png"));

        assert!(!users.update(id + 10, &user).unwrap());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_config_defaults_and_round_trip(_ctx: &mut UserTestContext) {
        // Absent file yields defaults
        let config = Config::read().unwrap();
        assert!(config.user_id.is_none());
        assert_eq!(config.currency, "₱");
        assert!(config.require_user().is_err());

        let mut config = config;
        config.user_id = Some(7);
        config.currency = "$".to_string();
        config.save().unwrap();

        let reread = Config::read().unwrap();
        assert_eq!(reread.user_id, Some(7));
        assert_eq!(reread.currency, "$");
        assert_eq!(reread.require_user().unwrap(), 7);
    }
}
