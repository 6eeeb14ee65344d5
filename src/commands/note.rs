//! Notes command.

use crate::{
    db::notes::{Note, Notes},
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct NoteArgs {
    #[command(subcommand)]
    command: NoteCommand,
}

#[derive(Debug, Subcommand)]
enum NoteCommand {
    /// Add a note
    Add {
        title: String,
        content: String,
        /// Comma-separated labels
        #[arg(short, long)]
        tags: Option<String>,
        /// Pin the note
        #[arg(short, long)]
        pin: bool,
    },
    /// List notes, newest first
    List,
    /// Print a note's content
    Show { id: i64 },
    /// Toggle a note's pin
    Pin { id: i64 },
    /// Delete a note
    Delete { id: i64 },
}

pub fn cmd(args: NoteArgs) -> Result<()> {
    let user_id = Config::read()?.require_user()?;
    let mut notes = Notes::new()?;

    match args.command {
        NoteCommand::Add { title, content, tags, pin } => {
            let mut note = Note::new(user_id, &title, &content);
            note.tags = tags;
            note.is_pinned = pin;
            notes.insert(&note)?;
            msg_success!(Message::NoteCreated(title));
        }
        NoteCommand::List => {
            let all = notes.get_all(user_id)?;
            if all.is_empty() {
                msg_info!(Message::NotesEmpty);
            } else {
                View::notes(&all)?;
            }
        }
        NoteCommand::Show { id } => match notes.get_by_id(id)? {
            Some(note) => {
                msg_print!(Message::Custom(note.title), true);
                println!("{}", note.content);
            }
            None => msg_error!(Message::NoteNotFound(id)),
        },
        NoteCommand::Pin { id } => match notes.get_by_id(id)? {
            Some(mut note) => {
                note.is_pinned = !note.is_pinned;
                notes.update(id, &note)?;
                msg_success!(Message::NotePinned(note.is_pinned));
            }
            None => msg_error!(Message::NoteNotFound(id)),
        },
        NoteCommand::Delete { id } => {
            let note = match notes.get_by_id(id)? {
                Some(note) => note,
                None => {
                    msg_error!(Message::NoteNotFound(id));
                    return Ok(());
                }
            };
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteNote(note.title).to_string())
                .default(false)
                .interact()?;
            if confirmed {
                notes.delete(id)?;
                msg_success!(Message::NoteDeleted);
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
    }
    Ok(())
}
