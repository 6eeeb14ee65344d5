//! Finance command.
//!
//! Records income and expenses against the user's account, shows merged
//! transaction listings, monthly summaries, and budget progress. When the
//! category tables cannot be read, the built-in taxonomy is shown instead
//! so category selection still works.

use crate::{
    db::finance::{default_categories, month_range, Budget, BudgetPeriod, Finance, Transaction, TransactionKind},
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::{Datelike, Local};
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct FinanceArgs {
    #[command(subcommand)]
    command: FinanceCommand,
}

#[derive(Debug, Subcommand)]
enum FinanceCommand {
    /// Record a transaction
    Add {
        #[arg(value_enum)]
        kind: TransactionKind,
        title: String,
        amount: f64,
        /// Category id
        #[arg(short, long)]
        category: Option<i64>,
        /// Transaction date, YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Mark an expense as a need rather than a want
        #[arg(long)]
        need: bool,
        #[arg(long)]
        description: Option<String>,
    },
    /// List transactions for a month
    List {
        /// Month 1-12; defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,
        /// Year; defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
        /// Restrict to one kind
        #[arg(short, long, value_enum)]
        kind: Option<TransactionKind>,
    },
    /// Delete a transaction
    Delete {
        #[arg(value_enum)]
        kind: TransactionKind,
        id: i64,
    },
    /// Income, expenses, and balance for a month
    Summary {
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Set a budget for an expense category
    Budget {
        category_id: i64,
        amount: f64,
        #[arg(short, long, value_enum, default_value_t = BudgetPeriod::Monthly)]
        period: BudgetPeriod,
    },
    /// List configured budgets
    Budgets,
    /// Spend against each monthly budget
    Progress {
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Delete a budget
    DeleteBudget { id: i64 },
    /// List categories of a kind
    Categories {
        #[arg(value_enum)]
        kind: TransactionKind,
    },
}

pub fn cmd(args: FinanceArgs) -> Result<()> {
    let config = Config::read()?;
    let user_id = config.require_user()?;
    let mut finance = Finance::new()?;

    let today = Local::now().date_naive();

    match args.command {
        FinanceCommand::Add {
            kind,
            title,
            amount,
            category,
            date,
            need,
            description,
        } => {
            let account = match finance.get_accounts(user_id)?.into_iter().next() {
                Some(account) => account,
                None => {
                    msg_error!(Message::AccountNotFound);
                    return Ok(());
                }
            };
            let transaction = Transaction {
                id: None,
                user_id,
                kind,
                title: title.clone(),
                amount,
                category_id: category,
                date: date.unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
                is_need: match kind {
                    TransactionKind::Expense => Some(need),
                    TransactionKind::Income => None,
                },
                description,
                account_id: account.id.unwrap_or_default(),
            };
            finance.insert_transaction(&transaction)?;
            msg_success!(Message::TransactionRecorded(title, amount));
        }
        FinanceCommand::List { month, year, kind } => {
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            let Some((start, end)) = month_range(year, month) else {
                msg_info!(Message::TransactionsEmpty);
                return Ok(());
            };
            let transactions = finance.get_transactions(user_id, &start, &end, kind)?;
            if transactions.is_empty() {
                msg_info!(Message::TransactionsEmpty);
            } else {
                View::transactions(&transactions, &config.currency)?;
            }
        }
        FinanceCommand::Delete { kind, id } => {
            let transaction = match finance.get_transaction_by_id(id, kind)? {
                Some(transaction) => transaction,
                None => {
                    msg_error!(Message::TransactionNotFound(id));
                    return Ok(());
                }
            };
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteTransaction(transaction.title).to_string())
                .default(false)
                .interact()?;
            if confirmed {
                finance.delete_transaction(id, kind)?;
                msg_success!(Message::TransactionDeleted);
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
        FinanceCommand::Summary { month, year } => {
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            match finance.monthly_summary(user_id, year, month)? {
                Some(summary) => msg_print!(
                    Message::MonthlySummary {
                        month: format!("{:04}-{:02}", year, month),
                        income: summary.income,
                        expenses: summary.expenses,
                        balance: summary.balance,
                    },
                    true
                ),
                None => msg_info!(Message::TransactionsEmpty),
            }
        }
        FinanceCommand::Budget {
            category_id,
            amount,
            period,
        } => {
            let budget = Budget {
                id: None,
                user_id,
                category_id,
                amount,
                period,
            };
            finance.insert_budget(&budget)?;
            let name = finance
                .get_categories(user_id, TransactionKind::Expense)
                .unwrap_or_default()
                .into_iter()
                .find(|c| c.id == Some(category_id))
                .map(|c| c.name)
                .unwrap_or_else(|| format!("category {}", category_id));
            msg_success!(Message::BudgetSet(name, amount));
        }
        FinanceCommand::Budgets => {
            let budgets = finance.get_budgets(user_id)?;
            if budgets.is_empty() {
                msg_info!(Message::BudgetsEmpty);
            } else {
                View::budgets(&budgets, &config.currency)?;
            }
        }
        FinanceCommand::Progress { month, year } => {
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            let progress = finance.budget_progress(user_id, year, month)?;
            if progress.is_empty() {
                msg_info!(Message::BudgetsEmpty);
            } else {
                View::budget_progress(&progress, &config.currency)?;
            }
        }
        FinanceCommand::DeleteBudget { id } => {
            if finance.delete_budget(id, user_id)? {
                msg_success!(Message::BudgetDeleted);
            } else {
                msg_error!(Message::BudgetNotFound(id));
            }
        }
        FinanceCommand::Categories { kind } => {
            // Read failures fall back to the built-in taxonomy; an empty
            // result is shown as-is.
            let categories = match finance.get_categories(user_id, kind) {
                Ok(categories) => categories,
                Err(_) => {
                    msg_warning!(Message::CategoriesUnavailable);
                    default_categories(kind)
                }
            };
            for category in categories {
                println!(
                    "{:>4}  {} ({})",
                    category.id.map_or("-".to_string(), |id| id.to_string()),
                    category.name,
                    category.color
                );
            }
        }
    }
    Ok(())
}
