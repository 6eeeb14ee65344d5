//! Stored assistant conversations.
//!
//! A row holds an entire conversation serialized as one JSON text blob,
//! not one message per row. Readers deserialize the blob back into the
//! typed exchange list.

use crate::db::db::Db;
use anyhow::Result;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::libs::events::{self, ChangeEvent, Entity};

const SCHEMA_MESSAGES: &str = "CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    conversation TEXT NOT NULL,
    timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)";
const INSERT_MESSAGE: &str = "INSERT INTO messages (user_id, conversation) VALUES (?1, ?2)";
const SELECT_BY_USER: &str =
    "SELECT id, user_id, conversation, timestamp FROM messages WHERE user_id = ?1 ORDER BY timestamp DESC";

/// One turn of a stored conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    pub role: String,
    pub content: String,
}

pub type Conversation = Vec<Exchange>;

/// A conversation row with its blob already deserialized.
#[derive(Debug, Clone)]
pub struct StoredConversation {
    pub id: i64,
    pub user_id: i64,
    pub conversation: Conversation,
    pub timestamp: Option<String>,
}

impl StoredConversation {
    fn from_row(row: &Row) -> rusqlite::Result<(i64, i64, String, Option<String>)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }
}

pub struct Chat {
    conn: Connection,
}

impl Chat {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_MESSAGES, [])?;
        Ok(Self { conn: db.conn })
    }

    /// Serializes the conversation and stores it as a single row.
    pub fn insert_message(&mut self, user_id: i64, conversation: &Conversation) -> Result<i64> {
        let blob = serde_json::to_string(conversation)?;
        self.conn.execute(INSERT_MESSAGE, params![user_id, blob])?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Messages, id));
        Ok(id)
    }

    /// All stored conversations of a user, newest first.
    pub fn messages_by_user(&mut self, user_id: i64) -> Result<Vec<StoredConversation>> {
        let mut stmt = self.conn.prepare(SELECT_BY_USER)?;
        let row_iter = stmt.query_map(params![user_id], StoredConversation::from_row)?;

        let mut conversations = Vec::new();
        for row in row_iter {
            let (id, user_id, blob, timestamp) = row?;
            conversations.push(StoredConversation {
                id,
                user_id,
                conversation: serde_json::from_str(&blob)?,
                timestamp,
            });
        }
        Ok(conversations)
    }
}
