//! # Acadmate - Student Life Organizer
//!
//! A command-line companion for students: tasks with subtasks and tags,
//! quick notes, flashcard decks, personal finance tracking, and saved
//! conversation history, all persisted in a local SQLite database.
//!
//! ## Features
//!
//! - **Task Management**: tasks, subtasks, projects, priorities, and tags
//! - **Notes**: pinned, labeled, free-form notes
//! - **Flashcards**: decks of question/answer cards with media attachments
//! - **Finance**: accounts, income and expense tracking, budgets, summaries
//! - **History**: stored conversations replayable from the terminal
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acadmate::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
