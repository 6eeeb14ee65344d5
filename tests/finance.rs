#[cfg(test)]
mod tests {
    use acadmate::db::finance::{
        default_categories, month_range, Budget, BudgetPeriod, Finance, Transaction, TransactionKind,
    };
    use acadmate::db::users::{User, Users};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // Tests share HOME and the database path, so they run one at a time.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    struct FinanceTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for FinanceTestContext {
        fn setup() -> Self {
            let guard = DB_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            FinanceTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    // The seeded account and categories belong to user 1; the first user
    // created in a fresh database gets that id.
    fn create_user() -> i64 {
        let mut users = Users::new().unwrap();
        users.insert(&User::new("Dan", "Santos", "dan@example.com", None)).unwrap()
    }

    fn transaction(user_id: i64, account_id: i64, kind: TransactionKind, title: &str, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: None,
            user_id,
            kind,
            title: title.to_string(),
            amount,
            category_id: None,
            date: date.to_string(),
            is_need: match kind {
                TransactionKind::Expense => Some(false),
                TransactionKind::Income => None,
            },
            description: None,
            account_id,
        }
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_seeded_account_and_categories(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();

        let accounts = finance.get_accounts(user_id).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Main Wallet");
        assert_eq!(accounts[0].current_balance, 0.0);

        let expense = finance.get_categories(user_id, TransactionKind::Expense).unwrap();
        assert_eq!(expense.len(), 5);
        assert!(expense.iter().any(|c| c.name == "Food"));

        let income = finance.get_categories(user_id, TransactionKind::Income).unwrap();
        assert_eq!(income.len(), 3);
        assert!(income.iter().any(|c| c.name == "Allowance"));
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_insert_triggers_adjust_balance(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let account_id = finance.get_accounts(user_id).unwrap()[0].id.unwrap();

        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Income, "Allowance", 100.0, "2026-08-01"))
            .unwrap();
        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Lunch", 30.0, "2026-08-02"))
            .unwrap();

        let balance = finance.get_accounts(user_id).unwrap()[0].current_balance;
        assert!((balance - 70.0).abs() < f64::EPSILON);
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_merged_listing_orders_by_date_desc(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let account_id = finance.get_accounts(user_id).unwrap()[0].id.unwrap();

        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Books", 50.0, "2026-08-10"))
            .unwrap();
        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Income, "Allowance", 200.0, "2026-08-20"))
            .unwrap();
        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Bus", 5.0, "2026-08-15"))
            .unwrap();

        let merged = finance.get_transactions(user_id, "2026-08-01", "2026-08-31", None).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].title, "Allowance");
        assert_eq!(merged[0].kind, TransactionKind::Income);
        assert_eq!(merged[1].title, "Bus");
        assert_eq!(merged[2].title, "Books");

        let expenses_only = finance
            .get_transactions(user_id, "2026-08-01", "2026-08-31", Some(TransactionKind::Expense))
            .unwrap();
        assert_eq!(expenses_only.len(), 2);
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_update_and_delete_transaction(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let account_id = finance.get_accounts(user_id).unwrap()[0].id.unwrap();

        let id = finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Snacks", 12.0, "2026-08-05"))
            .unwrap();

        let mut updated = transaction(user_id, account_id, TransactionKind::Expense, "Snacks and drinks", 18.0, "2026-08-05");
        updated.is_need = Some(true);
        assert!(finance.update_transaction(id, &updated).unwrap());

        let fetched = finance.get_transaction_by_id(id, TransactionKind::Expense).unwrap().unwrap();
        assert_eq!(fetched.title, "Snacks and drinks");
        assert_eq!(fetched.amount, 18.0);
        assert_eq!(fetched.is_need, Some(true));

        assert!(finance.delete_transaction(id, TransactionKind::Expense).unwrap());
        assert!(finance.get_transaction_by_id(id, TransactionKind::Expense).unwrap().is_none());
        assert!(!finance.delete_transaction(id, TransactionKind::Expense).unwrap());
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_month_range_uses_real_month_end(_ctx: &mut FinanceTestContext) {
        assert_eq!(month_range(2025, 3).unwrap(), ("2025-03-01".to_string(), "2025-03-31".to_string()));
        assert_eq!(month_range(2025, 2).unwrap(), ("2025-02-01".to_string(), "2025-02-28".to_string()));
        assert_eq!(month_range(2024, 2).unwrap(), ("2024-02-01".to_string(), "2024-02-29".to_string()));
        assert_eq!(month_range(2025, 12).unwrap(), ("2025-12-01".to_string(), "2025-12-31".to_string()));
        assert!(month_range(2025, 13).is_none());
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_monthly_summary(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let account_id = finance.get_accounts(user_id).unwrap()[0].id.unwrap();

        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Income, "Part-time pay", 500.0, "2025-03-31"))
            .unwrap();
        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Groceries", 120.0, "2025-03-15"))
            .unwrap();
        // Next month, must not count
        finance
            .insert_transaction(&transaction(user_id, account_id, TransactionKind::Expense, "Rent", 300.0, "2025-04-01"))
            .unwrap();

        let groceries = finance
            .get_transactions(user_id, "2025-03-01", "2025-03-31", Some(TransactionKind::Expense))
            .unwrap()
            .remove(0);

        let summary = finance.monthly_summary(user_id, 2025, 3).unwrap().unwrap();
        assert_eq!(summary.income, 500.0);
        assert_eq!(summary.expenses, 120.0);
        // Balance reflects every insert, not just the month's
        assert_eq!(summary.balance, 80.0);

        // Deleting the expense removes it from the sums; the account
        // balance stays where the inserts left it
        finance.delete_transaction(groceries.id.unwrap(), TransactionKind::Expense).unwrap();
        let summary = finance.monthly_summary(user_id, 2025, 3).unwrap().unwrap();
        assert_eq!(summary.expenses, 0.0);
        assert_eq!(summary.balance, 80.0);
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_budget_crud_is_scoped_to_user(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let food = finance
            .get_categories(user_id, TransactionKind::Expense)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Food")
            .unwrap();

        let budget = Budget {
            id: None,
            user_id,
            category_id: food.id.unwrap(),
            amount: 1000.0,
            period: BudgetPeriod::Monthly,
        };
        let id = finance.insert_budget(&budget).unwrap();
        assert_eq!(finance.get_budgets(user_id).unwrap().len(), 1);

        // Another user cannot touch it
        assert!(finance.get_budget_by_id(id, user_id + 1).unwrap().is_none());
        assert!(!finance.delete_budget(id, user_id + 1).unwrap());

        let mut changed = budget.clone();
        changed.amount = 1500.0;
        assert!(finance.update_budget(id, &changed).unwrap());
        assert_eq!(finance.get_budget_by_id(id, user_id).unwrap().unwrap().amount, 1500.0);

        assert!(finance.delete_budget(id, user_id).unwrap());
        assert!(finance.get_budgets(user_id).unwrap().is_empty());
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_budget_progress(_ctx: &mut FinanceTestContext) {
        let user_id = create_user();
        let mut finance = Finance::new().unwrap();
        let account_id = finance.get_accounts(user_id).unwrap()[0].id.unwrap();
        let food = finance
            .get_categories(user_id, TransactionKind::Expense)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Food")
            .unwrap();

        finance
            .insert_budget(&Budget {
                id: None,
                user_id,
                category_id: food.id.unwrap(),
                amount: 1000.0,
                period: BudgetPeriod::Monthly,
            })
            .unwrap();

        let mut groceries = transaction(user_id, account_id, TransactionKind::Expense, "Groceries", 250.0, "2026-08-10");
        groceries.category_id = food.id;
        finance.insert_transaction(&groceries).unwrap();

        let progress = finance.budget_progress(user_id, 2026, 8).unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].category_name, "Food");
        assert_eq!(progress[0].budget_amount, 1000.0);
        assert_eq!(progress[0].spent_amount, 250.0);
        assert!((progress[0].progress - 25.0).abs() < 1e-9);
    }

    #[test_context(FinanceTestContext)]
    #[test]
    fn test_default_categories_match_seeds(_ctx: &mut FinanceTestContext) {
        let expense = default_categories(TransactionKind::Expense);
        assert_eq!(expense.len(), 5);
        assert_eq!(expense[0].name, "Food");

        let income = default_categories(TransactionKind::Income);
        assert_eq!(income.len(), 3);
        assert_eq!(income[1].name, "Part-time Job");
    }
}
