//! Command-line interface for acadmate.
//!
//! Each subcommand lives in its own module and exposes a `cmd` function
//! taking its parsed arguments. The dispatcher below is the only place
//! that knows about all of them.

pub mod chat;
pub mod deck;
pub mod finance;
pub mod init;
pub mod note;
pub mod task;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the user profile and configuration")]
    Init(init::InitArgs),
    #[command(about = "Manage tasks, subtasks, projects, and tags")]
    Task(task::TaskArgs),
    #[command(about = "Manage notes")]
    Note(note::NoteArgs),
    #[command(about = "Manage flashcard decks and cards")]
    Deck(deck::DeckArgs),
    #[command(about = "Track income, expenses, and budgets")]
    Finance(finance::FinanceArgs),
    #[command(about = "Save and browse conversation history")]
    Chat(chat::ChatArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Note(args) => note::cmd(args),
            Commands::Deck(args) => deck::cmd(args),
            Commands::Finance(args) => finance::cmd(args),
            Commands::Chat(args) => chat::cmd(args),
        }
    }
}
