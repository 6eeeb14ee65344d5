use crate::db::db::Db;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::libs::events::{self, ChangeEvent, Entity};

const SCHEMA_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstname TEXT NOT NULL,
    lastname TEXT NOT NULL,
    email TEXT UNIQUE,
    profile_pic TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";
const INSERT_USER: &str = "INSERT INTO users (firstname, lastname, email, profile_pic) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_USER: &str = "UPDATE users SET firstname = ?2, lastname = ?3, email = ?4, profile_pic = ?5 WHERE id = ?1";
const SELECT_ALL_USERS: &str = "SELECT id, firstname, lastname, email, profile_pic, created_at FROM users";
const SELECT_USER_BY_ID: &str = "SELECT id, firstname, lastname, email, profile_pic, created_at FROM users WHERE id = ?1";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, firstname, lastname, email, profile_pic, created_at FROM users WHERE email = ?1";

/// Identity record created once at onboarding; never hard-deleted.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub profile_pic: Option<String>,
    pub created_at: Option<String>,
}

impl User {
    pub fn new(firstname: &str, lastname: &str, email: &str, profile_pic: Option<String>) -> Self {
        Self {
            id: None,
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            profile_pic,
            created_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            firstname: row.get(1)?,
            lastname: row.get(2)?,
            email: row.get(3)?,
            profile_pic: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_USERS, [])?;
        Ok(Self { conn: db.conn })
    }

    /// Inserts a user and returns the assigned id.
    pub fn insert(&mut self, user: &User) -> Result<i64> {
        self.conn
            .execute(INSERT_USER, params![user.firstname, user.lastname, user.email, user.profile_pic])?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Users, id));
        Ok(id)
    }

    /// Replaces the profile fields of an existing user.
    pub fn update(&mut self, id: i64, user: &User) -> Result<bool> {
        let affected = self
            .conn
            .execute(UPDATE_USER, params![id, user.firstname, user.lastname, user.email, user.profile_pic])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Users, id));
        }
        Ok(affected > 0)
    }

    pub fn get_all(&mut self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_USERS)?;
        let user_iter = stmt.query_map([], User::from_row)?;

        let mut users = Vec::new();
        for user in user_iter {
            users.push(user?);
        }
        Ok(users)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(SELECT_USER_BY_ID, params![id], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Email is unique, so at most one row matches.
    pub fn get_by_email(&mut self, email: &str) -> Result<Option<User>> {
        self.conn
            .query_row(SELECT_USER_BY_EMAIL, params![email], User::from_row)
            .optional()
            .map_err(Into::into)
    }
}
