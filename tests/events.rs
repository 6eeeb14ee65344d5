#[cfg(test)]
mod tests {
    use acadmate::db::notes::{Note, Notes};
    use acadmate::db::todo::{Tag, Todo};
    use acadmate::db::users::{User, Users};
    use acadmate::libs::events::{self, ChangeOp, Entity};
    use parking_lot::{Mutex, MutexGuard};
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME, the database path, and the global bus, so they run
    // one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct EventTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for EventTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            EventTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn create_user() -> i64 {
        let mut users = Users::new().unwrap();
        users.insert(&User::new("Gail", "Uy", "gail@example.com", None)).unwrap()
    }

    // The bus is process-wide and tests run in parallel, so assertions key
    // on the specific row ids this test created.
    #[test_context(EventTestContext)]
    #[test]
    fn test_mutations_publish_change_events(_ctx: &mut EventTestContext) {
        let user_id = create_user();
        let mut notes = Notes::new().unwrap();

        let seen: Arc<Mutex<Vec<(ChangeOp, Option<i64>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = events::subscribe(Entity::Notes, move |event| {
            sink.lock().push((event.op, event.id));
        });

        let id = notes.insert(&Note::new(user_id, "Event check", "body")).unwrap();
        assert!(seen.lock().contains(&(ChangeOp::Created, Some(id))));

        let note = notes.get_by_id(id).unwrap().unwrap();
        assert!(notes.update(id, &note).unwrap());
        assert!(seen.lock().contains(&(ChangeOp::Updated, Some(id))));

        // An update that matches no row publishes nothing
        assert!(!notes.update(999_999, &note).unwrap());
        assert!(!seen.lock().iter().any(|(_, event_id)| *event_id == Some(999_999)));

        subscription.unsubscribe();

        // After unsubscribing the callback no longer fires
        let unheard = notes.insert(&Note::new(user_id, "Unheard", "body")).unwrap();
        assert!(!seen.lock().iter().any(|(_, event_id)| *event_id == Some(unheard)));
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_delete_publishes_with_row_id(_ctx: &mut EventTestContext) {
        let user_id = create_user();
        let mut notes = Notes::new().unwrap();
        let id = notes.insert(&Note::new(user_id, "Doomed", "body")).unwrap();

        let seen: Arc<Mutex<Vec<(ChangeOp, Option<i64>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = events::subscribe(Entity::Notes, move |event| {
            sink.lock().push((event.op, event.id));
        });

        assert!(notes.delete(id).unwrap());
        assert!(seen.lock().contains(&(ChangeOp::Deleted, Some(id))));

        // A second delete affects nothing and stays silent
        assert!(!notes.delete(id).unwrap());
        assert_eq!(seen.lock().iter().filter(|(op, event_id)| *op == ChangeOp::Deleted && *event_id == Some(id)).count(), 1);
    }

    // Project and tag rowids are not task ids, so their creation events
    // must not carry one.
    #[test_context(EventTestContext)]
    #[test]
    fn test_project_and_tag_creation_publish_without_row_id(_ctx: &mut EventTestContext) {
        let user_id = create_user();
        let mut todo = Todo::new().unwrap();

        let seen: Arc<Mutex<Vec<(ChangeOp, Option<i64>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = events::subscribe(Entity::Tasks, move |event| {
            sink.lock().push((event.op, event.id));
        });

        let project_id = todo.insert_project(user_id, "Thesis", "#3498db").unwrap();
        let tag_id = todo.insert_tag(&Tag::new(user_id, "urgent", "#95a5a6")).unwrap();

        let events = seen.lock();
        assert_eq!(events.iter().filter(|(op, event_id)| *op == ChangeOp::Created && event_id.is_none()).count(), 2);
        assert!(!events.iter().any(|(_, event_id)| *event_id == Some(project_id) || *event_id == Some(tag_id)));
    }
}
