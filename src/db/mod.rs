//! Database layer for the acadmate application.
//!
//! A complete persistence layer built on SQLite with type-safe operations
//! for every application entity. Schema setup is idempotent and happens two
//! ways that coexist: versioned migrations applied on every connection, and
//! per-module `CREATE TABLE IF NOT EXISTS` guards in each constructor.
//!
//! ## Modules
//!
//! - **Core Infrastructure**: connection management and migrations
//! - **Identity**: the single onboarded user profile
//! - **Productivity**: tasks, subtasks, projects, and tags
//! - **Knowledge**: notes and flashcard decks
//! - **Finance**: accounts, transactions, categories, and budgets
//! - **Assistant**: stored conversation history
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acadmate::db::todo::{Task, Todo};
//!
//! fn add_review_task() -> anyhow::Result<i64> {
//!     let mut todo = Todo::new()?;
//!     let id = todo.insert_task(&Task::new(1, "Review lecture notes"))?;
//!     Ok(id)
//! }
//! ```
//!
//! Every mutation that changes at least one row publishes a
//! [`crate::libs::events::ChangeEvent`] so interested callers can refresh.

/// Core database connection and initialization.
///
/// Provides the `Db` struct that opens the SQLite file, applies migrations,
/// and enables foreign-key enforcement.
pub mod db;

/// Versioned schema migration system.
///
/// Tracks applied versions in a bookkeeping table and carries all DDL,
/// triggers, and seed data.
pub mod migrations;

/// User profile operations.
pub mod users;

/// Task management: tasks, subtasks, projects, and the tag taxonomy.
///
/// Includes the many-to-many task/tag junction and the wipe-and-replace
/// retagging transaction.
pub mod todo;

/// Free-form notes with pin support.
pub mod notes;

/// Flashcard decks and cards, including binary image and audio payloads.
pub mod flashcards;

/// Personal finance: income, expenses, accounts, categories, budgets,
/// and the monthly summary and budget progress reports.
pub mod finance;

/// Stored assistant conversations, one JSON blob per row.
pub mod chat;
