use crate::db::db::Db;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::libs::events::{self, ChangeEvent, Entity};

const SCHEMA_NOTES: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    tags TEXT DEFAULT NULL,
    is_pinned INTEGER DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)";
const INSERT_NOTE: &str = "INSERT INTO notes (user_id, title, content, tags, is_pinned) VALUES (?1, ?2, ?3, ?4, ?5)";
// updated_at is maintained by the update_notes_updated_at trigger, so the
// statement leaves it alone.
const UPDATE_NOTE: &str = "UPDATE notes SET title = ?2, content = ?3, tags = ?4, is_pinned = ?5 WHERE id = ?1";
const SELECT_NOTE_COLUMNS: &str = "SELECT id, user_id, title, content, tags, is_pinned, created_at, updated_at FROM notes";
const DELETE_NOTE: &str = "DELETE FROM notes WHERE id = ?1";

#[derive(Debug, Clone)]
pub struct Note {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    /// Free-form comma-separated labels, not related to task tags.
    pub tags: Option<String>,
    pub is_pinned: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Note {
    pub fn new(user_id: i64, title: &str, content: &str) -> Self {
        Self {
            id: None,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            tags: None,
            is_pinned: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            tags: row.get(4)?,
            is_pinned: row.get::<_, i64>(5)? == 1,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

pub struct Notes {
    conn: Connection,
}

impl Notes {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_NOTES, [])?;
        Ok(Self { conn: db.conn })
    }

    pub fn insert(&mut self, note: &Note) -> Result<i64> {
        self.conn.execute(
            INSERT_NOTE,
            params![note.user_id, note.title, note.content, note.tags, note.is_pinned as i64],
        )?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Notes, id));
        Ok(id)
    }

    pub fn update(&mut self, id: i64, note: &Note) -> Result<bool> {
        let affected = self
            .conn
            .execute(UPDATE_NOTE, params![id, note.title, note.content, note.tags, note.is_pinned as i64])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Notes, id));
        }
        Ok(affected > 0)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Note>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_NOTE_COLUMNS), params![id], Note::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// All notes of a user, newest first.
    pub fn get_all(&mut self, user_id: i64) -> Result<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE user_id = ?1 ORDER BY created_at DESC", SELECT_NOTE_COLUMNS))?;
        let note_iter = stmt.query_map(params![user_id], Note::from_row)?;

        let mut notes = Vec::new();
        for note in note_iter {
            notes.push(note?);
        }
        Ok(notes)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_NOTE, params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::deleted(Entity::Notes, id));
        }
        Ok(affected > 0)
    }
}
