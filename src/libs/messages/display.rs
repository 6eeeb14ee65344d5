//! Text rendering for [`Message`] variants.
//!
//! Keeping every user-facing string in one `Display` impl gives a single
//! place to adjust wording and keeps the command layer free of literals.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === USER MESSAGES ===
            Message::UserCreated(name) => format!("Welcome aboard, {}!", name),
            Message::UserUpdated(name) => format!("Profile updated for {}", name),
            Message::EmailAlreadyRegistered(email) => format!("The email '{}' is already registered", email),

            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task '{}' created", title),
            Message::TaskUpdated => "Task updated".to_string(),
            Message::TaskCompleted(title) => format!("Task '{}' marked as completed", title),
            Message::TaskDeleted => "Task deleted".to_string(),
            Message::TaskNotFound(id) => format!("No task with id {}", id),
            Message::TasksEmpty => "No tasks yet".to_string(),
            Message::TaskTagsReplaced(count) => format!("Task now has {} tag(s)", count),
            Message::SubtaskCreated(title) => format!("Subtask '{}' added", title),
            Message::SubtaskNotFound(id) => format!("No subtask with id {}", id),
            Message::ProjectCreated(name) => format!("Project '{}' created", name),
            Message::TagCreated(name) => format!("Tag '{}' created", name),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}' and all its subtasks?", title),

            // === NOTE MESSAGES ===
            Message::NoteCreated(title) => format!("Note '{}' saved", title),
            Message::NoteDeleted => "Note deleted".to_string(),
            Message::NoteNotFound(id) => format!("No note with id {}", id),
            Message::NotesEmpty => "No notes yet".to_string(),
            Message::NotePinned(pinned) => {
                if *pinned {
                    "Note pinned".to_string()
                } else {
                    "Note unpinned".to_string()
                }
            }
            Message::ConfirmDeleteNote(title) => format!("Delete note '{}'?", title),

            // === FLASHCARD MESSAGES ===
            Message::DeckCreated(title) => format!("Deck '{}' created", title),
            Message::DeckDeleted => "Deck deleted (cards removed with it)".to_string(),
            Message::DeckNotFound(id) => format!("No deck with id {}", id),
            Message::DecksEmpty => "No decks yet".to_string(),
            Message::CardCreated => "Flashcard added".to_string(),
            Message::CardDeleted => "Flashcard deleted".to_string(),
            Message::CardNotFound(id) => format!("No flashcard with id {}", id),
            Message::DeckCardsEmpty(title) => format!("Deck '{}' has no cards yet", title),
            Message::ConfirmDeleteDeck(title) => format!("Delete deck '{}' and all its cards?", title),

            // === FINANCE MESSAGES ===
            Message::TransactionRecorded(title, amount) => format!("Recorded '{}' ({:.2})", title, amount),
            Message::TransactionDeleted => "Transaction deleted".to_string(),
            Message::TransactionNotFound(id) => format!("No transaction with id {}", id),
            Message::TransactionsEmpty => "No transactions in this period".to_string(),
            Message::ConfirmDeleteTransaction(title) => format!("Delete transaction '{}'?", title),
            Message::BudgetSet(category, amount) => format!("Budget of {:.2} set for '{}'", amount, category),
            Message::BudgetDeleted => "Budget deleted".to_string(),
            Message::BudgetNotFound(id) => format!("No budget with id {}", id),
            Message::BudgetsEmpty => "No budgets configured".to_string(),
            Message::AccountNotFound => "No account found for this user".to_string(),
            Message::CategoriesUnavailable => "Could not read categories from the database, using built-in defaults".to_string(),
            Message::MonthlySummary {
                month,
                income,
                expenses,
                balance,
            } => {
                format!(
                    "Summary for {}: income {:.2}, expenses {:.2}, balance {:.2}",
                    month, income, expenses, balance
                )
            }

            // === CHAT MESSAGES ===
            Message::ConversationSaved(id) => format!("Conversation saved with id {}", id),
            Message::ConversationsEmpty => "No saved conversations".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigParseError => "Failed to parse configuration file".to_string(),
            Message::NotInitialized => "acadmate is not initialized. Run 'acadmate init' first".to_string(),

            // === DATABASE MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Applying migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "Database schema is up to date".to_string(),
            Message::NothingToRollback => "Nothing to roll back".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rolled back to v{}", version),

            // === PROMPTS ===
            Message::PromptFirstName => "First name".to_string(),
            Message::PromptLastName => "Last name".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptCurrencySymbol => "Currency symbol".to_string(),
            Message::PromptChatMessage => "Message".to_string(),

            // === GENERIC ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::Custom(text) => text.clone(),
        };
        write!(f, "{}", text)
    }
}
