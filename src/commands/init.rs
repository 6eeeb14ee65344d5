//! First-run setup command.
//!
//! Creates the user profile row and writes the configuration file that
//! every other command reads to know which user it acts as. Running it
//! again with an already-initialized configuration just updates the
//! profile fields.

use crate::{
    db::users::{User, Users},
    libs::{config::Config, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// First name; prompted for when omitted
    #[arg(long)]
    firstname: Option<String>,
    /// Last name; prompted for when omitted
    #[arg(long)]
    lastname: Option<String>,
    /// Email address; prompted for when omitted
    #[arg(long)]
    email: Option<String>,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let firstname = prompt_or(init_args.firstname, Message::PromptFirstName)?;
    let lastname = prompt_or(init_args.lastname, Message::PromptLastName)?;
    let email = prompt_or(init_args.email, Message::PromptEmail)?;

    let mut config = Config::read()?;
    let currency: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptCurrencySymbol.to_string())
        .default(config.currency.clone())
        .interact_text()?;

    let mut users = Users::new()?;
    let user = User::new(&firstname, &lastname, &email, None);

    match config.user_id {
        Some(id) => {
            users.update(id, &user)?;
            msg_success!(Message::UserUpdated(firstname));
        }
        None => {
            if users.get_by_email(&email)?.is_some() {
                msg_error!(Message::EmailAlreadyRegistered(email));
                return Ok(());
            }
            let id = users.insert(&user)?;
            config.user_id = Some(id);
            msg_success!(Message::UserCreated(firstname));
        }
    }

    config.currency = currency;
    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}

fn prompt_or(value: Option<String>, prompt: Message) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .interact_text()?),
    }
}
