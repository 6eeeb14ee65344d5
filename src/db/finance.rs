//! Finance domain: accounts, income, expenses, categories, and budgets.
//!
//! Income and expenses are two separate tables; the merged "transaction"
//! listing is produced at query time by a UNION ALL with a literal kind
//! column. Account balances are adjusted exclusively by the insert triggers
//! created in migration v5; nothing here writes `current_balance`.

use crate::db::db::Db;
use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt;

use crate::libs::events::{self, ChangeEvent, Entity};

const INSERT_EXPENSE: &str = "INSERT INTO expenses
    (user_id, account_id, category_id, amount, title, description, date, is_need)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_INCOME: &str = "INSERT INTO income
    (user_id, account_id, category_id, amount, title, description, date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
// updated_at is stamped by the per-table triggers.
const UPDATE_EXPENSE: &str = "UPDATE expenses SET
    account_id = ?2, category_id = ?3, amount = ?4, title = ?5, description = ?6, date = ?7, is_need = ?8
    WHERE id = ?1";
const UPDATE_INCOME: &str = "UPDATE income SET
    account_id = ?2, category_id = ?3, amount = ?4, title = ?5, description = ?6, date = ?7
    WHERE id = ?1";

const SELECT_INCOME: &str = "SELECT id, user_id, 'income' AS kind, title, amount, category_id, date,
    NULL AS is_need, description, account_id FROM income";
const SELECT_EXPENSES: &str = "SELECT id, user_id, 'expense' AS kind, title, amount, category_id, date,
    is_need, description, account_id FROM expenses";
const WHERE_USER_DATE: &str = "WHERE user_id = ? AND date BETWEEN ? AND ?";

const INSERT_BUDGET: &str = "INSERT INTO budgets (user_id, category_id, amount, period) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_BUDGET: &str = "UPDATE budgets SET category_id = ?3, amount = ?4, period = ?5, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND user_id = ?2";
const DELETE_BUDGET: &str = "DELETE FROM budgets WHERE id = ?1 AND user_id = ?2";
const SELECT_BUDGETS: &str = "SELECT id, user_id, category_id, amount, period FROM budgets WHERE user_id = ?1";
const SELECT_BUDGET_BY_ID: &str = "SELECT id, user_id, category_id, amount, period FROM budgets WHERE id = ?1 AND user_id = ?2";

const SELECT_ACCOUNTS: &str = "SELECT id, user_id, name, type, current_balance, color, created_at, is_active
    FROM accounts WHERE user_id = ?1";

const SELECT_BUDGET_PROGRESS: &str = "SELECT
    b.category_id,
    ec.name,
    b.amount,
    COALESCE((
        SELECT SUM(e.amount)
        FROM expenses e
        WHERE e.category_id = b.category_id
        AND e.user_id = b.user_id
        AND e.date BETWEEN ?1 AND ?2
    ), 0),
    COALESCE((
        SELECT (SUM(e.amount) / b.amount) * 100
        FROM expenses e
        WHERE e.category_id = b.category_id
        AND e.user_id = b.user_id
        AND e.date BETWEEN ?1 AND ?2
    ), 0)
    FROM budgets b
    JOIN expense_categories ec ON b.category_id = ec.id
    WHERE b.user_id = ?3
    AND b.period = 'monthly'";

/// Which of the two transaction tables a record lives in.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn table(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expenses",
        }
    }

    pub fn categories_table(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income_categories",
            TransactionKind::Expense => "expense_categories",
        }
    }

    fn from_sql(value: &str) -> Self {
        if value == "income" {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub title: String,
    pub amount: f64,
    pub category_id: Option<i64>,
    /// ISO date string, `YYYY-MM-DD`; stored and compared as TEXT.
    pub date: String,
    /// Need-vs-want flag; only meaningful for expenses.
    pub is_need: Option<bool>,
    pub description: Option<String>,
    pub account_id: i64,
}

impl Transaction {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: TransactionKind::from_sql(&row.get::<_, String>(2)?),
            title: row.get(3)?,
            amount: row.get(4)?,
            category_id: row.get(5)?,
            date: row.get(6)?,
            is_need: row.get::<_, Option<i64>>(7)?.map(|v| v == 1),
            description: row.get(8)?,
            account_id: row.get(9)?,
        })
    }
}

/// Budget cadence; only monthly budgets feed the progress report.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    fn as_sql(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    fn from_sql(value: &str) -> Self {
        match value {
            "weekly" => BudgetPeriod::Weekly,
            "yearly" => BudgetPeriod::Yearly,
            _ => BudgetPeriod::Monthly,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            amount: row.get(3)?,
            period: BudgetPeriod::from_sql(&row.get::<_, String>(4)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub kind: TransactionKind,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub kind: String,
    pub current_balance: f64,
    pub color: String,
    pub created_at: Option<String>,
    pub is_active: bool,
}

impl Account {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            kind: row.get(3)?,
            current_balance: row.get(4)?,
            color: row.get(5)?,
            created_at: row.get(6)?,
            is_active: row.get::<_, i64>(7)? == 1,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct BudgetProgress {
    pub category_id: i64,
    pub category_name: String,
    pub budget_amount: f64,
    pub spent_amount: f64,
    /// Percentage of the budget already spent.
    pub progress: f64,
}

/// The built-in category taxonomy, used to seed the database and as the
/// fallback when categories cannot be read back.
pub fn default_categories(kind: TransactionKind) -> Vec<Category> {
    let entries: &[(&str, &str, &str)] = match kind {
        TransactionKind::Expense => &[
            ("Food", "fast-food", "#e74c3c"),
            ("Transport", "bus", "#f39c12"),
            ("Entertainment", "film", "#3498db"),
            ("Education", "book", "#2ecc71"),
            ("Other", "pricetag", "#9b59b6"),
        ],
        TransactionKind::Income => &[
            ("Allowance", "cash", "#27ae60"),
            ("Part-time Job", "briefcase", "#16a085"),
            ("Other", "wallet", "#1abc9c"),
        ],
    };
    entries
        .iter()
        .map(|(name, icon, color)| Category {
            id: None,
            name: name.to_string(),
            icon: icon.to_string(),
            kind,
            color: color.to_string(),
        })
        .collect()
}

/// First and last day of a calendar month as ISO date strings.
///
/// The last day is the real month end, not a blanket `-31`; dates are TEXT
/// so the comparison stays a string BETWEEN.
pub fn month_range(year: i32, month: u32) -> Option<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_first.pred_opt()?;
    Some((first.format("%Y-%m-%d").to_string(), last.format("%Y-%m-%d").to_string()))
}

pub struct Finance {
    conn: Connection,
}

impl Finance {
    pub fn new() -> Result<Self> {
        // Tables, triggers and seeds come from migration v5.
        let db = Db::new()?;
        Ok(Self { conn: db.conn })
    }

    // === TRANSACTIONS ===

    pub fn insert_transaction(&mut self, transaction: &Transaction) -> Result<i64> {
        match transaction.kind {
            TransactionKind::Expense => {
                self.conn.execute(
                    INSERT_EXPENSE,
                    params![
                        transaction.user_id,
                        transaction.account_id,
                        transaction.category_id,
                        transaction.amount,
                        transaction.title,
                        transaction.description,
                        transaction.date,
                        transaction.is_need.unwrap_or(false) as i64
                    ],
                )?;
            }
            TransactionKind::Income => {
                self.conn.execute(
                    INSERT_INCOME,
                    params![
                        transaction.user_id,
                        transaction.account_id,
                        transaction.category_id,
                        transaction.amount,
                        transaction.title,
                        transaction.description,
                        transaction.date
                    ],
                )?;
            }
        }
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Transactions, id));
        Ok(id)
    }

    pub fn update_transaction(&mut self, id: i64, transaction: &Transaction) -> Result<bool> {
        let affected = match transaction.kind {
            TransactionKind::Expense => self.conn.execute(
                UPDATE_EXPENSE,
                params![
                    id,
                    transaction.account_id,
                    transaction.category_id,
                    transaction.amount,
                    transaction.title,
                    transaction.description,
                    transaction.date,
                    transaction.is_need.unwrap_or(false) as i64
                ],
            )?,
            TransactionKind::Income => self.conn.execute(
                UPDATE_INCOME,
                params![
                    id,
                    transaction.account_id,
                    transaction.category_id,
                    transaction.amount,
                    transaction.title,
                    transaction.description,
                    transaction.date
                ],
            )?,
        };
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Transactions, id));
        }
        Ok(affected > 0)
    }

    /// Deleting a transaction does not rebalance the account; the balance
    /// triggers fire on insert only, matching the source system.
    pub fn delete_transaction(&mut self, id: i64, kind: TransactionKind) -> Result<bool> {
        let affected = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), params![id])?;
        if affected > 0 {
            events::publish(ChangeEvent::deleted(Entity::Transactions, id));
        }
        Ok(affected > 0)
    }

    pub fn get_transaction_by_id(&mut self, id: i64, kind: TransactionKind) -> Result<Option<Transaction>> {
        let query = match kind {
            TransactionKind::Income => format!("{} WHERE id = ?1", SELECT_INCOME),
            TransactionKind::Expense => format!("{} WHERE id = ?1", SELECT_EXPENSES),
        };
        self.conn
            .query_row(&query, params![id], Transaction::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Transactions for a user within `[start_date, end_date]`, newest
    /// first. Without a kind both tables are merged via UNION ALL with a
    /// literal discriminator column.
    pub fn get_transactions(
        &mut self,
        user_id: i64,
        start_date: &str,
        end_date: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>> {
        let (query, params): (String, Vec<&dyn rusqlite::ToSql>) = match kind {
            Some(TransactionKind::Income) => (
                format!("{} {} ORDER BY date DESC", SELECT_INCOME, WHERE_USER_DATE),
                vec![&user_id, &start_date, &end_date],
            ),
            Some(TransactionKind::Expense) => (
                format!("{} {} ORDER BY date DESC", SELECT_EXPENSES, WHERE_USER_DATE),
                vec![&user_id, &start_date, &end_date],
            ),
            None => (
                format!(
                    "{} {} UNION ALL {} {} ORDER BY date DESC",
                    SELECT_INCOME, WHERE_USER_DATE, SELECT_EXPENSES, WHERE_USER_DATE
                ),
                vec![&user_id, &start_date, &end_date, &user_id, &start_date, &end_date],
            ),
        };

        let mut stmt = self.conn.prepare(&query)?;
        let transaction_iter = stmt.query_map(&params[..], Transaction::from_row)?;

        let mut transactions = Vec::new();
        for transaction in transaction_iter {
            transactions.push(transaction?);
        }
        Ok(transactions)
    }

    // === BUDGETS ===

    pub fn insert_budget(&mut self, budget: &Budget) -> Result<i64> {
        self.conn.execute(
            INSERT_BUDGET,
            params![budget.user_id, budget.category_id, budget.amount, budget.period.as_sql()],
        )?;
        let id = self.conn.last_insert_rowid();
        events::publish(ChangeEvent::created(Entity::Budgets, id));
        Ok(id)
    }

    pub fn update_budget(&mut self, id: i64, budget: &Budget) -> Result<bool> {
        let affected = self.conn.execute(
            UPDATE_BUDGET,
            params![id, budget.user_id, budget.category_id, budget.amount, budget.period.as_sql()],
        )?;
        if affected > 0 {
            events::publish(ChangeEvent::updated(Entity::Budgets, id));
        }
        Ok(affected > 0)
    }

    pub fn delete_budget(&mut self, id: i64, user_id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_BUDGET, params![id, user_id])?;
        if affected > 0 {
            events::publish(ChangeEvent::deleted(Entity::Budgets, id));
        }
        Ok(affected > 0)
    }

    pub fn get_budgets(&mut self, user_id: i64) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(SELECT_BUDGETS)?;
        let budget_iter = stmt.query_map(params![user_id], Budget::from_row)?;

        let mut budgets = Vec::new();
        for budget in budget_iter {
            budgets.push(budget?);
        }
        Ok(budgets)
    }

    pub fn get_budget_by_id(&mut self, id: i64, user_id: i64) -> Result<Option<Budget>> {
        self.conn
            .query_row(SELECT_BUDGET_BY_ID, params![id, user_id], Budget::from_row)
            .optional()
            .map_err(Into::into)
    }

    // === CATEGORIES ===

    pub fn get_categories(&mut self, user_id: i64, kind: TransactionKind) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT id, name, icon, color FROM {} WHERE user_id = ?1",
            kind.categories_table()
        );
        let mut stmt = self.conn.prepare(&query)?;
        let category_iter = stmt.query_map(params![user_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                kind,
                color: row.get(3)?,
            })
        })?;

        let mut categories = Vec::new();
        for category in category_iter {
            categories.push(category?);
        }
        Ok(categories)
    }

    // === ACCOUNTS ===

    pub fn get_accounts(&mut self, user_id: i64) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(SELECT_ACCOUNTS)?;
        let account_iter = stmt.query_map(params![user_id], Account::from_row)?;

        let mut accounts = Vec::new();
        for account in account_iter {
            accounts.push(account?);
        }
        Ok(accounts)
    }

    // === SUMMARIES ===

    pub fn monthly_summary(&mut self, user_id: i64, year: i32, month: u32) -> Result<Option<MonthlySummary>> {
        let Some((start_date, end_date)) = month_range(year, month) else {
            return Ok(None);
        };

        let income: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM income WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            params![user_id, start_date, end_date],
            |row| row.get(0),
        )?;

        let expenses: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            params![user_id, start_date, end_date],
            |row| row.get(0),
        )?;

        let balance: f64 = self
            .conn
            .query_row(
                "SELECT current_balance FROM accounts WHERE user_id = ?1 LIMIT 1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0.0);

        Ok(Some(MonthlySummary { income, expenses, balance }))
    }

    /// Spend against every monthly budget for the given month.
    pub fn budget_progress(&mut self, user_id: i64, year: i32, month: u32) -> Result<Vec<BudgetProgress>> {
        let Some((start_date, end_date)) = month_range(year, month) else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(SELECT_BUDGET_PROGRESS)?;
        let progress_iter = stmt.query_map(params![start_date, end_date, user_id], |row| {
            Ok(BudgetProgress {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
                budget_amount: row.get(2)?,
                spent_amount: row.get(3)?,
                progress: row.get(4)?,
            })
        })?;

        let mut progress = Vec::new();
        for entry in progress_iter {
            progress.push(entry?);
        }
        Ok(progress)
    }
}
