#[cfg(test)]
mod tests {
    use acadmate::db::flashcards::{Deck, Flashcard, Flashcards};
    use acadmate::db::users::{User, Users};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME and the database path, so they run one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct FlashcardTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for FlashcardTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            FlashcardTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn create_user() -> i64 {
        let mut users = Users::new().unwrap();
        users.insert(&User::new("Cara", "Lim", "cara@example.com", None)).unwrap()
    }

    #[test_context(FlashcardTestContext)]
    #[test]
    fn test_deck_and_card_round_trip(_ctx: &mut FlashcardTestContext) {
        let user_id = create_user();
        let mut flashcards = Flashcards::new().unwrap();

        let deck_id = flashcards
            .insert_deck(&Deck::new(user_id, "Spanish vocab", Some("Week 3".to_string())))
            .unwrap();

        let mut card = Flashcard::new(deck_id, "perro", "dog");
        card.image = Some(vec![0x89, 0x50, 0x4e, 0x47]);
        let card_id = flashcards.insert_card(&card).unwrap();

        let fetched = flashcards.get_card_by_id(card_id).unwrap().unwrap();
        assert_eq!(fetched.question, "perro");
        assert_eq!(fetched.answer, "dog");
        assert_eq!(fetched.image.as_deref(), Some(&[0x89u8, 0x50, 0x4e, 0x47][..]));
        assert!(fetched.audio.is_none());
    }

    #[test_context(FlashcardTestContext)]
    #[test]
    fn test_deck_counts(_ctx: &mut FlashcardTestContext) {
        let user_id = create_user();
        let mut flashcards = Flashcards::new().unwrap();

        let full = flashcards.insert_deck(&Deck::new(user_id, "Anatomy", None)).unwrap();
        let empty = flashcards.insert_deck(&Deck::new(user_id, "History", None)).unwrap();

        for i in 0..3 {
            flashcards
                .insert_card(&Flashcard::new(full, &format!("Q{}", i), &format!("A{}", i)))
                .unwrap();
        }

        let summaries = flashcards.get_decks_with_counts(user_id).unwrap();
        assert_eq!(summaries.len(), 2);
        let count_of = |id: i64| summaries.iter().find(|s| s.deck.id == Some(id)).unwrap().total_cards;
        assert_eq!(count_of(full), 3);
        assert_eq!(count_of(empty), 0);
    }

    #[test_context(FlashcardTestContext)]
    #[test]
    fn test_deleting_deck_cascades_to_cards(_ctx: &mut FlashcardTestContext) {
        let user_id = create_user();
        let mut flashcards = Flashcards::new().unwrap();

        let deck_id = flashcards.insert_deck(&Deck::new(user_id, "Physics", None)).unwrap();
        let card_id = flashcards.insert_card(&Flashcard::new(deck_id, "F = ?", "ma")).unwrap();

        assert!(flashcards.delete_deck(deck_id).unwrap());
        assert!(flashcards.get_deck_by_id(deck_id).unwrap().is_none());
        assert!(flashcards.get_card_by_id(card_id).unwrap().is_none());
    }

    #[test_context(FlashcardTestContext)]
    #[test]
    fn test_card_update_and_delete(_ctx: &mut FlashcardTestContext) {
        let user_id = create_user();
        let mut flashcards = Flashcards::new().unwrap();

        let deck_id = flashcards.insert_deck(&Deck::new(user_id, "Chemistry", None)).unwrap();
        let card_id = flashcards.insert_card(&Flashcard::new(deck_id, "H2O", "wather")).unwrap();

        let mut card = flashcards.get_card_by_id(card_id).unwrap().unwrap();
        card.answer = "water".to_string();
        assert!(flashcards.update_card(card_id, &card).unwrap());
        assert_eq!(flashcards.get_card_by_id(card_id).unwrap().unwrap().answer, "water");

        assert!(flashcards.delete_card(card_id).unwrap());
        assert_eq!(flashcards.get_cards(deck_id).unwrap().len(), 0);
    }
}
