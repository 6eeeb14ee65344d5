use crate::db::finance::{Budget, BudgetProgress, Transaction};
use crate::db::flashcards::{DeckSummary, Flashcard};
use crate::db::notes::Note;
use crate::db::todo::{Subtask, Task};
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DUE", "PRIORITY", "DONE", "IMPORTANT"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.due_date.as_deref().unwrap_or("-"),
                task.priority,
                if task.is_completed { "x" } else { "" },
                if task.is_important { "!" } else { "" }
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn subtasks(subtasks: &[Subtask]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DONE"]);
        for subtask in subtasks {
            table.add_row(row![subtask.id.unwrap_or(0), subtask.title, if subtask.is_completed { "x" } else { "" }]);
        }
        table.printstd();

        Ok(())
    }

    pub fn notes(notes: &[Note]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "TAGS", "PINNED", "UPDATED"]);
        for note in notes {
            table.add_row(row![
                note.id.unwrap_or(0),
                note.title,
                note.tags.as_deref().unwrap_or(""),
                if note.is_pinned { "📌" } else { "" },
                note.updated_at.as_deref().unwrap_or("-")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn decks(decks: &[DeckSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DESCRIPTION", "CARDS", "CREATED"]);
        for summary in decks {
            table.add_row(row![
                summary.deck.id.unwrap_or(0),
                summary.deck.title,
                summary.deck.description.as_deref().unwrap_or(""),
                summary.total_cards,
                summary.deck.created_at.as_deref().unwrap_or("-")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn cards(cards: &[Flashcard]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "QUESTION", "ANSWER", "MEDIA"]);
        for card in cards {
            let media = match (card.image.is_some(), card.audio.is_some()) {
                (true, true) => "image+audio",
                (true, false) => "image",
                (false, true) => "audio",
                (false, false) => "",
            };
            table.add_row(row![card.id.unwrap_or(0), card.question, card.answer, media]);
        }
        table.printstd();

        Ok(())
    }

    pub fn transactions(transactions: &[Transaction], currency: &str) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TYPE", "TITLE", "AMOUNT", "DATE", "NEED"]);
        for transaction in transactions {
            let need = match transaction.is_need {
                Some(true) => "need",
                Some(false) => "want",
                None => "-",
            };
            table.add_row(row![
                transaction.id.unwrap_or(0),
                transaction.kind,
                transaction.title,
                format!("{}{:.2}", currency, transaction.amount),
                transaction.date,
                need
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn budgets(budgets: &[Budget], currency: &str) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "CATEGORY", "AMOUNT", "PERIOD"]);
        for budget in budgets {
            table.add_row(row![
                budget.id.unwrap_or(0),
                budget.category_id,
                format!("{}{:.2}", currency, budget.amount),
                budget.period
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn budget_progress(progress: &[BudgetProgress], currency: &str) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["CATEGORY", "BUDGET", "SPENT", "PROGRESS"]);
        for entry in progress {
            table.add_row(row![
                entry.category_name,
                format!("{}{:.2}", currency, entry.budget_amount),
                format!("{}{:.2}", currency, entry.spent_amount),
                format!("{:.0}%", entry.progress)
            ]);
        }
        table.printstd();

        Ok(())
    }
}
