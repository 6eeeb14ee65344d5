//! To-do domain: tasks, subtasks, projects, and tags.
//!
//! Two behaviors live in the schema rather than here: `updated_at` is
//! stamped by a trigger on every task update, and completing the last open
//! subtask marks the parent task completed with `completed_at` set. The
//! query layer must not write those fields itself.

use crate::db::db::Db;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::libs::events::{self, ChangeEvent, ChangeOp, Entity};

const SCHEMA_PROJECTS: &str = "CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    color TEXT DEFAULT '#3498db',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)";
const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
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
)";
const SCHEMA_SUBTASKS: &str = "CREATE TABLE IF NOT EXISTS subtasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    is_completed INTEGER DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
)";
const SCHEMA_TAGS: &str = "CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    color TEXT DEFAULT '#95a5a6',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)";
const SCHEMA_TASK_TAGS: &str = "CREATE TABLE IF NOT EXISTS task_tags (
    task_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (task_id, tag_id),
    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
)";

const INSERT_TASK: &str = "INSERT INTO tasks (user_id, project_id, title, description, due_date, priority, is_completed, is_important)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const UPDATE_TASK: &str = "UPDATE tasks SET
    project_id = ?2, title = ?3, description = ?4, due_date = ?5, priority = ?6,
    is_completed = ?7, is_important = ?8,
    completed_at = CASE WHEN ?7 = 1 THEN CURRENT_TIMESTAMP ELSE NULL END
    WHERE id = ?1";
const SELECT_TASK_COLUMNS: &str = "SELECT id, user_id, project_id, title, description, due_date, priority,
    is_completed, is_important, created_at, updated_at, completed_at FROM tasks";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

const INSERT_SUBTASK: &str = "INSERT INTO subtasks (task_id, title, is_completed) VALUES (?1, ?2, ?3)";
const UPDATE_SUBTASK: &str = "UPDATE subtasks SET title = ?2, is_completed = ?3 WHERE id = ?1";
const SELECT_SUBTASKS: &str = "SELECT id, task_id, title, is_completed, created_at FROM subtasks WHERE task_id = ?1 ORDER BY created_at ASC";
const SELECT_SUBTASK_BY_ID: &str = "SELECT id, task_id, title, is_completed, created_at FROM subtasks WHERE id = ?1";
const DELETE_SUBTASK: &str = "DELETE FROM subtasks WHERE id = ?1";

const INSERT_PROJECT: &str = "INSERT INTO projects (user_id, name, color) VALUES (?1, ?2, ?3)";
const SELECT_PROJECTS: &str = "SELECT id, user_id, name, color, created_at FROM projects WHERE user_id = ?1 ORDER BY name ASC";

const INSERT_TAG: &str = "INSERT INTO tags (user_id, name, color) VALUES (?1, ?2, ?3)";
const SELECT_TAGS: &str = "SELECT id, user_id, name, color, created_at FROM tags WHERE user_id = ?1 ORDER BY name ASC";
const SELECT_TAG_BY_NAME: &str = "SELECT id, user_id, name, color, created_at FROM tags WHERE user_id = ?1 AND name = ?2";
const SELECT_TAGS_BY_TASK: &str = "SELECT tags.id, tags.user_id, tags.name, tags.color, tags.created_at FROM tags
    JOIN task_tags ON tags.id = task_tags.tag_id
    WHERE task_tags.task_id = ?1";
const INSERT_TASK_TAG: &str = "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)";
const DELETE_TASK_TAG: &str = "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2";
const DELETE_ALL_TASK_TAGS: &str = "DELETE FROM task_tags WHERE task_id = ?1";

#[derive(Debug, Clone)]
pub struct Task {
    pub id: Option<i64>,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    /// 0 = none, 1 = low, 2 = medium, 3 = high.
    pub priority: i64,
    pub is_completed: bool,
    pub is_important: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub completed_at: Option<String>,
}

impl Task {
    pub fn new(user_id: i64, title: &str) -> Self {
        Self {
            id: None,
            user_id,
            project_id: None,
            title: title.to_string(),
            description: None,
            due_date: None,
            priority: 0,
            is_completed: false,
            is_important: false,
            created_at: None,
            updated_at: None,
            completed_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            project_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            due_date: row.get(5)?,
            priority: row.get(6)?,
            is_completed: row.get::<_, i64>(7)? == 1,
            is_important: row.get::<_, i64>(8)? == 1,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
            completed_at: row.get(11)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Subtask {
    pub id: Option<i64>,
    pub task_id: i64,
    pub title: String,
    pub is_completed: bool,
    pub created_at: Option<String>,
}

impl Subtask {
    pub fn new(task_id: i64, title: &str) -> Self {
        Self {
            id: None,
            task_id,
            title: title.to_string(),
            is_completed: false,
            created_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            task_id: row.get(1)?,
            title: row.get(2)?,
            is_completed: row.get::<_, i64>(3)? == 1,
            created_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub color: String,
    pub created_at: Option<String>,
}

impl Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            color: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub color: String,
    pub created_at: Option<String>,
}

impl Tag {
    pub fn new(user_id: i64, name: &str, color: &str) -> Self {
        Self {
            id: None,
            user_id,
            name: name.to_string(),
            color: color.to_string(),
            created_at: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            color: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Optional narrowing for task listings.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub is_completed: Option<bool>,
}

pub struct Todo {
    conn: Connection,
}

impl Todo {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        // Migration v2 creates these, but we ensure here too.
        db.conn.execute(SCHEMA_PROJECTS, [])?;
        db.conn.execute(SCHEMA_TASKS, [])?;
        db.conn.execute(SCHEMA_SUBTASKS, [])?;
        db.conn.execute(SCHEMA_TAGS, [])?;
        db.conn.execute(SCHEMA_TASK_TAGS, [])?;
        Ok(Self { conn: db.conn })
    }

    // === TASKS ===

    pub fn insert_task(&mut self, task: &Task) -> Result<i64> {
        self.conn.execute(
            INSERT_TASK,
            params![
                task.user_id,
                task.project_id,
                task.title,
                task.description,
                task.due_date,
                task.priority,
                task.is_completed as i64,
                task.is_important as i64
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Tasks, id));
        Ok(id)
    }

    /// Full-row update. `updated_at` is stamped by the schema trigger;
    /// `completed_at` follows the completion flag.
    pub fn update_task(&mut self, id: i64, task: &Task) -> Result<bool> {
        let affected = self.conn.execute(
            UPDATE_TASK,
            params![
                id,
                task.project_id,
                task.title,
                task.description,
                task.due_date,
                task.priority,
                task.is_completed as i64,
                task.is_important as i64
            ],
        )?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Tasks, id));
        }
        Ok(affected > 0)
    }

    pub fn get_task_by_id(&mut self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_TASK_COLUMNS), params![id], Task::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_tasks(&mut self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query = format!("{} WHERE user_id = ?", SELECT_TASK_COLUMNS);
        let mut params: Vec<i64> = vec![user_id];

        if let Some(project_id) = filter.project_id {
            query.push_str(" AND project_id = ?");
            params.push(project_id);
        }
        if let Some(is_completed) = filter.is_completed {
            query.push_str(" AND is_completed = ?");
            params.push(is_completed as i64);
        }
        query.push_str(" ORDER BY is_completed ASC, due_date ASC");

        let mut stmt = self.conn.prepare(&query)?;
        let task_iter = stmt.query_map(rusqlite::params_from_iter(params.iter()), Task::from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::deleted(Entity::Tasks, id));
        }
        Ok(affected > 0)
    }

    // === SUBTASKS ===

    pub fn insert_subtask(&mut self, subtask: &Subtask) -> Result<i64> {
        self.conn
            .execute(INSERT_SUBTASK, params![subtask.task_id, subtask.title, subtask.is_completed as i64])?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::updated(Entity::Tasks, subtask.task_id));
        Ok(id)
    }

    /// Setting the last open subtask to completed fires the schema trigger
    /// that completes the parent task.
    pub fn update_subtask(&mut self, id: i64, subtask: &Subtask) -> Result<bool> {
        let affected = self.conn.execute(UPDATE_SUBTASK, params![id, subtask.title, subtask.is_completed as i64])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Tasks, subtask.task_id));
        }
        Ok(affected > 0)
    }

    pub fn get_subtasks(&mut self, task_id: i64) -> Result<Vec<Subtask>> {
        let mut stmt = self.conn.prepare(SELECT_SUBTASKS)?;
        let subtask_iter = stmt.query_map(params![task_id], Subtask::from_row)?;

        let mut subtasks = Vec::new();
        for subtask in subtask_iter {
            subtasks.push(subtask?);
        }
        Ok(subtasks)
    }

    pub fn get_subtask_by_id(&mut self, id: i64) -> Result<Option<Subtask>> {
        self.conn
            .query_row(SELECT_SUBTASK_BY_ID, params![id], Subtask::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn delete_subtask(&mut self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_SUBTASK, params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::bulk(Entity::Tasks, ChangeOp::Updated));
        }
        Ok(affected > 0)
    }

    // === PROJECTS ===

    pub fn insert_project(&mut self, user_id: i64, name: &str, color: &str) -> Result<i64> {
        self.conn.execute(INSERT_PROJECT, params![user_id, name, color])?;
        let id = self.conn.last_insert_rowid();
        // Project rowids are not task ids, so no id goes on the event.
        events::publish(ChangeEvent::bulk(Entity::Tasks, ChangeOp::Created));
        Ok(id)
    }

    pub fn get_projects(&mut self, user_id: i64) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(SELECT_PROJECTS)?;
        let project_iter = stmt.query_map(params![user_id], Project::from_row)?;

        let mut projects = Vec::new();
        for project in project_iter {
            projects.push(project?);
        }
        Ok(projects)
    }

    // === TAGS ===

    pub fn insert_tag(&mut self, tag: &Tag) -> Result<i64> {
        self.conn.execute(INSERT_TAG, params![tag.user_id, tag.name, tag.color])?;
        let id = self.conn.last_insert_rowid();
        // Tag rowids are not task ids, so no id goes on the event.
        events::publish(ChangeEvent::bulk(Entity::Tasks, ChangeOp::Created));
        Ok(id)
    }

    pub fn get_tags(&mut self, user_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(SELECT_TAGS)?;
        let tag_iter = stmt.query_map(params![user_id], Tag::from_row)?;

        let mut tags = Vec::new();
        for tag in tag_iter {
            tags.push(tag?);
        }
        Ok(tags)
    }

    pub fn get_tag_by_name(&mut self, user_id: i64, name: &str) -> Result<Option<Tag>> {
        self.conn
            .query_row(SELECT_TAG_BY_NAME, params![user_id, name], Tag::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_tags_for_task(&mut self, task_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(SELECT_TAGS_BY_TASK)?;
        let tag_iter = stmt.query_map(params![task_id], Tag::from_row)?;

        let mut tags = Vec::new();
        for tag in tag_iter {
            tags.push(tag?);
        }
        Ok(tags)
    }

    pub fn add_tag_to_task(&mut self, task_id: i64, tag_id: i64) -> Result<bool> {
        let affected = self.conn.execute(INSERT_TASK_TAG, params![task_id, tag_id])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Tasks, task_id));
        }
        Ok(affected > 0)
    }

    pub fn remove_tag_from_task(&mut self, task_id: i64, tag_id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_TASK_TAG, params![task_id, tag_id])?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Tasks, task_id));
        }
        Ok(affected > 0)
    }

    /// Replaces the task's tag set atomically: all existing associations
    /// are deleted and the new set inserted within one transaction, so a
    /// failure part-way leaves the previous set intact.
    pub fn update_task_tags(&mut self, task_id: i64, tag_ids: &[i64]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(DELETE_ALL_TASK_TAGS, params![task_id])?;
        for tag_id in tag_ids {
            tx.execute("INSERT INTO task_tags (task_id, tag_id) VALUES (?1, ?2)", params![task_id, tag_id])?;
        }

        tx.commit()?;
        events::publish(ChangeEvent::updated(Entity::Tasks, task_id));
        Ok(())
    }
}
