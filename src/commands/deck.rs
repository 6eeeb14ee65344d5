//! Flashcard deck command.
//!
//! Cards can carry image and audio attachments; on the command line these
//! are read from files and stored as blobs.

use crate::{
    db::flashcards::{Deck, Flashcard, Flashcards},
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DeckArgs {
    #[command(subcommand)]
    command: DeckCommand,
}

#[derive(Debug, Subcommand)]
enum DeckCommand {
    /// Create a deck
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Mark the deck as important
        #[arg(short, long)]
        important: bool,
    },
    /// List decks with card counts
    List,
    /// Delete a deck and all its cards
    Delete { id: i64 },
    /// Add a card to a deck
    Card {
        deck_id: i64,
        question: String,
        answer: String,
        /// Image file stored with the card
        #[arg(long)]
        image: Option<PathBuf>,
        /// Audio file stored with the card
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    /// List a deck's cards
    Cards { deck_id: i64 },
    /// Delete a card
    DeleteCard { id: i64 },
}

pub fn cmd(args: DeckArgs) -> Result<()> {
    let user_id = Config::read()?.require_user()?;
    let mut flashcards = Flashcards::new()?;

    match args.command {
        DeckCommand::Create {
            title,
            description,
            important,
        } => {
            let mut deck = Deck::new(user_id, &title, description);
            deck.is_important = important;
            flashcards.insert_deck(&deck)?;
            msg_success!(Message::DeckCreated(title));
        }
        DeckCommand::List => {
            let decks = flashcards.get_decks_with_counts(user_id)?;
            if decks.is_empty() {
                msg_info!(Message::DecksEmpty);
            } else {
                View::decks(&decks)?;
            }
        }
        DeckCommand::Delete { id } => {
            let deck = match flashcards.get_deck_by_id(id)? {
                Some(deck) => deck,
                None => {
                    msg_error!(Message::DeckNotFound(id));
                    return Ok(());
                }
            };
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteDeck(deck.title).to_string())
                .default(false)
                .interact()?;
            if confirmed {
                flashcards.delete_deck(id)?;
                msg_success!(Message::DeckDeleted);
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
        DeckCommand::Card {
            deck_id,
            question,
            answer,
            image,
            audio,
        } => {
            if flashcards.get_deck_by_id(deck_id)?.is_none() {
                msg_error!(Message::DeckNotFound(deck_id));
                return Ok(());
            }
            let mut card = Flashcard::new(deck_id, &question, &answer);
            card.image = image.map(fs::read).transpose()?;
            card.audio = audio.map(fs::read).transpose()?;
            flashcards.insert_card(&card)?;
            msg_success!(Message::CardCreated);
        }
        DeckCommand::Cards { deck_id } => {
            let deck = match flashcards.get_deck_by_id(deck_id)? {
                Some(deck) => deck,
                None => {
                    msg_error!(Message::DeckNotFound(deck_id));
                    return Ok(());
                }
            };
            let cards = flashcards.get_cards(deck_id)?;
            if cards.is_empty() {
                msg_info!(Message::DeckCardsEmpty(deck.title));
            } else {
                View::cards(&cards)?;
            }
        }
        DeckCommand::DeleteCard { id } => {
            if flashcards.get_card_by_id(id)?.is_none() {
                msg_error!(Message::CardNotFound(id));
                return Ok(());
            }
            flashcards.delete_card(id)?;
            msg_success!(Message::CardDeleted);
        }
    }
    Ok(())
}
