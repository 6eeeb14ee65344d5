/// All user-facing messages, one variant per distinct line of output.
///
/// Text lives in the `Display` impl in `display.rs`; commands and the
/// `msg_*!` macros only ever reference variants, never literal strings.
#[derive(Debug, Clone)]
pub enum Message {
    // === USER MESSAGES ===
    UserCreated(String),
    UserUpdated(String),
    EmailAlreadyRegistered(String),

    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskUpdated,
    TaskCompleted(String),
    TaskDeleted,
    TaskNotFound(i64),
    TasksEmpty,
    TaskTagsReplaced(usize),
    SubtaskCreated(String),
    SubtaskNotFound(i64),
    ProjectCreated(String),
    TagCreated(String),
    ConfirmDeleteTask(String),

    // === NOTE MESSAGES ===
    NoteCreated(String),
    NoteDeleted,
    NoteNotFound(i64),
    NotesEmpty,
    NotePinned(bool),
    ConfirmDeleteNote(String),

    // === FLASHCARD MESSAGES ===
    DeckCreated(String),
    DeckDeleted,
    DeckNotFound(i64),
    DecksEmpty,
    CardCreated,
    CardDeleted,
    CardNotFound(i64),
    DeckCardsEmpty(String),
    ConfirmDeleteDeck(String),

    // === FINANCE MESSAGES ===
    TransactionRecorded(String, f64),
    TransactionDeleted,
    TransactionNotFound(i64),
    TransactionsEmpty,
    ConfirmDeleteTransaction(String),
    BudgetSet(String, f64),
    BudgetDeleted,
    BudgetNotFound(i64),
    BudgetsEmpty,
    AccountNotFound,
    CategoriesUnavailable,
    MonthlySummary {
        month: String,
        income: f64,
        expenses: f64,
        balance: f64,
    },

    // === CHAT MESSAGES ===
    ConversationSaved(i64),
    ConversationsEmpty,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    NotInitialized,

    // === DATABASE MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),

    // === PROMPTS ===
    PromptFirstName,
    PromptLastName,
    PromptEmail,
    PromptCurrencySymbol,
    PromptChatMessage,

    // === GENERIC ===
    OperationCancelled,
    Custom(String),
}
