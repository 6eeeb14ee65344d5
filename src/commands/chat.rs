//! Conversation history command.
//!
//! Stores each exchange as a complete conversation blob and lists what has
//! been saved. Generating assistant replies is out of scope here; the
//! command records and replays history only.

use crate::{
    db::chat::{Chat, Exchange},
    libs::{config::Config, messages::Message},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[command(subcommand)]
    command: ChatCommand,
}

#[derive(Debug, Subcommand)]
enum ChatCommand {
    /// Save a message as a new conversation
    Save {
        /// Message text; prompted for when omitted
        message: Option<String>,
    },
    /// Show saved conversations, newest first
    History,
}

pub fn cmd(args: ChatArgs) -> Result<()> {
    let user_id = Config::read()?.require_user()?;
    let mut chat = Chat::new()?;

    match args.command {
        ChatCommand::Save { message } => {
            let content: String = match message {
                Some(text) => text,
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptChatMessage.to_string())
                    .interact_text()?,
            };
            let conversation = vec![Exchange {
                role: "user".to_string(),
                content,
            }];
            let id = chat.insert_message(user_id, &conversation)?;
            msg_success!(Message::ConversationSaved(id));
        }
        ChatCommand::History => {
            let conversations = chat.messages_by_user(user_id)?;
            if conversations.is_empty() {
                msg_info!(Message::ConversationsEmpty);
                return Ok(());
            }
            for stored in conversations {
                msg_print!(
                    Message::Custom(format!(
                        "#{} ({})",
                        stored.id,
                        stored.timestamp.as_deref().unwrap_or("-")
                    )),
                    true
                );
                for exchange in stored.conversation {
                    println!("  [{}] {}", exchange.role, exchange.content);
                }
            }
        }
    }
    Ok(())
}
