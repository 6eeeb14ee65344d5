//! Flashcard domain: decks and their cards.
//!
//! Deck deletion cascades to cards through the foreign key. Listing decks
//! with counts issues one COUNT query per deck, matching the shipped
//! behavior of the app this layer was extracted from; a single aggregate
//! join would serve the same result set.

use crate::db::db::Db;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::libs::events::{self, ChangeEvent, ChangeOp, Entity};

const SCHEMA_DECKS: &str = "CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    is_important BOOLEAN DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)";
const SCHEMA_FLASHCARDS: &str = "CREATE TABLE IF NOT EXISTS flashcards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    deck_id INTEGER NOT NULL,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    image BLOB,
    audio BLOB,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (deck_id) REFERENCES decks(id) ON DELETE CASCADE
)";

const INSERT_DECK: &str = "INSERT INTO decks (user_id, title, description, is_important) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_DECK: &str = "UPDATE decks SET title = ?2, description = ?3, is_important = ?4 WHERE id = ?1";
const SELECT_DECK_COLUMNS: &str = "SELECT id, user_id, title, description, is_important, created_at FROM decks";
const DELETE_DECK: &str = "DELETE FROM decks WHERE id = ?1";
const COUNT_CARDS: &str = "SELECT COUNT(*) FROM flashcards WHERE deck_id = ?1";

const INSERT_CARD: &str = "INSERT INTO flashcards (deck_id, question, answer, image, audio) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_CARD: &str = "UPDATE flashcards SET question = ?2, answer = ?3, image = ?4, audio = ?5 WHERE id = ?1";
const SELECT_CARD_COLUMNS: &str = "SELECT id, deck_id, question, answer, image, audio, created_at FROM flashcards";
const DELETE_CARD: &str = "DELETE FROM flashcards WHERE id = ?1";

#[derive(Debug, Clone)]
pub struct Deck {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub created_at: Option<String>,
}

impl Deck {
    pub fn new(user_id: i64, title: &str, description: Option<String>) -> Self {
        Self {
            id: None,
            user_id,
            title: title.to_string(),
            description,
            is_important: false,
            created_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            is_important: row.get::<_, i64>(4)? == 1,
            created_at: row.get(5)?,
        })
    }
}

/// A deck together with its card count for list screens.
#[derive(Debug, Clone)]
pub struct DeckSummary {
    pub deck: Deck,
    pub total_cards: i64,
}

#[derive(Debug, Clone)]
pub struct Flashcard {
    pub id: Option<i64>,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub image: Option<Vec<u8>>,
    pub audio: Option<Vec<u8>>,
    pub created_at: Option<String>,
}

impl Flashcard {
    pub fn new(deck_id: i64, question: &str, answer: &str) -> Self {
        Self {
            id: None,
            deck_id,
            question: question.to_string(),
            answer: answer.to_string(),
            image: None,
            audio: None,
            created_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            deck_id: row.get(1)?,
            question: row.get(2)?,
            answer: row.get(3)?,
            image: row.get(4)?,
            audio: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

pub struct Flashcards {
    conn: Connection,
}

impl Flashcards {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_DECKS, [])?;
        db.conn.execute(SCHEMA_FLASHCARDS, [])?;
        Ok(Self { conn: db.conn })
    }

    // === DECKS ===

    pub fn insert_deck(&mut self, deck: &Deck) -> Result<i64> {
        self.conn.execute(
            INSERT_DECK,
            params![deck.user_id, deck.title, deck.description, deck.is_important as i64],
        )?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Decks, id));
        Ok(id)
    }

    pub fn update_deck(&mut self, id: i64, deck: &Deck) -> Result<bool> {
        let affected = self
            .conn
            .execute(UPDATE_DECK, params![id, deck.title, deck.description, deck.is_important as i64])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Decks, id));
        }
        Ok(affected > 0)
    }

    pub fn get_deck_by_id(&mut self, id: i64) -> Result<Option<Deck>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_DECK_COLUMNS), params![id], Deck::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_decks(&mut self, user_id: i64) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(&format!("{} WHERE user_id = ?1", SELECT_DECK_COLUMNS))?;
        let deck_iter = stmt.query_map(params![user_id], Deck::from_row)?;

        let mut decks = Vec::new();
        for deck in deck_iter {
            decks.push(deck?);
        }
        Ok(decks)
    }

    /// Decks with per-deck card counts, one COUNT query per deck.
    pub fn get_decks_with_counts(&mut self, user_id: i64) -> Result<Vec<DeckSummary>> {
        let decks = self.get_decks(user_id)?;

        let mut summaries = Vec::with_capacity(decks.len());
        for deck in decks {
            let total_cards = match deck.id {
                Some(id) => self.conn.query_row(COUNT_CARDS, params![id], |row| row.get(0))?,
                None => 0,
            };
            summaries.push(DeckSummary { deck, total_cards });
        }
        Ok(summaries)
    }

    /// Deletes a deck; its flashcards go with it via the cascade.
    pub fn delete_deck(&mut self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_DECK, params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::deleted(Entity::Decks, id));
        }
        Ok(affected > 0)
    }

    // === CARDS ===

    pub fn insert_card(&mut self, card: &Flashcard) -> Result<i64> {
        self.conn.execute(
            INSERT_CARD,
            params![card.deck_id, card.question, card.answer, card.image, card.audio],
        )?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::updated(Entity::Decks, card.deck_id));
        Ok(id)
    }

    pub fn update_card(&mut self, id: i64, card: &Flashcard) -> Result<bool> {
        let affected = self
            .conn
            .execute(UPDATE_CARD, params![id, card.question, card.answer, card.image, card.audio])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Decks, card.deck_id));
        }
        Ok(affected > 0)
    }

    pub fn get_card_by_id(&mut self, id: i64) -> Result<Option<Flashcard>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_CARD_COLUMNS), params![id], Flashcard::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_cards(&mut self, deck_id: i64) -> Result<Vec<Flashcard>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE deck_id = ?1 ORDER BY created_at ASC", SELECT_CARD_COLUMNS))?;
        let card_iter = stmt.query_map(params![deck_id], Flashcard::from_row)?;

        let mut cards = Vec::new();
        for card in card_iter {
            cards.push(card?);
        }
        Ok(cards)
    }

    pub fn delete_card(&mut self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_CARD, params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::bulk(Entity::Decks, ChangeOp::Updated));
        }
        Ok(affected > 0)
    }
}
