#[cfg(test)]
mod tests {
    use acadmate::db::chat::{Chat, Exchange};
    use acadmate::db::users::{User, Users};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME and the database path, so they run one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct ChatTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ChatTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ChatTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn create_user() -> i64 {
        let mut users = Users::new().unwrap();
        users.insert(&User::new("Eva", "Tan", "eva@example.com", None)).unwrap()
    }

    #[test_context(ChatTestContext)]
    #[test]
    fn test_conversation_round_trip(_ctx: &mut ChatTestContext) {
        let user_id = create_user();
        let mut chat = Chat::new().unwrap();

        let conversation = vec![
            Exchange {
                role: "user".to_string(),
                content: "Explain osmosis".to_string(),
            },
            Exchange {
                role: "assistant".to_string(),
                content: "Water moves across a membrane toward higher solute concentration.".to_string(),
            },
        ];
        let id = chat.insert_message(user_id, &conversation).unwrap();
        assert!(id > 0);

        let stored = chat.messages_by_user(user_id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].conversation, conversation);
        assert!(stored[0].timestamp.is_some());
    }

    #[test_context(ChatTestContext)]
    #[test]
    fn test_conversations_scoped_to_user(_ctx: &mut ChatTestContext) {
        let user_id = create_user();
        let mut users = Users::new().unwrap();
        let other_id = users.insert(&User::new("Finn", "Ong", "finn@example.com", None)).unwrap();

        let mut chat = Chat::new().unwrap();
        chat.insert_message(
            user_id,
            &vec![Exchange {
                role: "user".to_string(),
                content: "mine".to_string(),
            }],
        )
        .unwrap();

        assert_eq!(chat.messages_by_user(user_id).unwrap().len(), 1);
        assert!(chat.messages_by_user(other_id).unwrap().is_empty());
    }
}
