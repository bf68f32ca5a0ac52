use uuid::Uuid;

use outlay_api::domain::types::{ExpenseFilter, ExpensePatch};
use outlay_api::error::ApiError;
use outlay_api::usecase::expense::{
    CreateExpenseInput, CreateExpenseUseCase, DeleteExpenseUseCase, ExpenseSummaryUseCase,
    ListExpensesUseCase, UpdateExpenseUseCase,
};
use outlay_domain::{Category, PaymentMethod};

use crate::helpers::{MockExpenseRepo, date, test_expense};

// ── Create / list ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_an_expense_for_the_caller() {
    let repo = MockExpenseRepo::empty();
    let expenses_handle = repo.expenses_handle();
    let uc = CreateExpenseUseCase { expenses: repo };
    let owner = Uuid::new_v4();

    let expense = uc
        .execute(
            owner,
            CreateExpenseInput {
                title: "Lunch at the taqueria".to_owned(),
                amount: 18.5,
                category: Category::FoodAndDining,
                date: date(2026, 6, 15),
                payment_method: PaymentMethod::CreditCard,
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(expense.user_id, owner);
    assert_eq!(expense.title, "Lunch at the taqueria");
    assert_eq!(expense.amount, 18.5);

    let stored = expenses_handle.lock().unwrap();
    assert_eq!(stored.len(), 1, "expected exactly one persisted expense");
    assert_eq!(stored[0].id, expense.id);
}

#[tokio::test]
async fn should_list_only_the_callers_expenses_newest_first() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let repo = MockExpenseRepo::new(vec![
        test_expense(owner, Category::FoodAndDining, 12.0, date(2026, 6, 1)),
        test_expense(owner, Category::Groceries, 54.0, date(2026, 6, 20)),
        test_expense(stranger, Category::FoodAndDining, 99.0, date(2026, 6, 10)),
    ]);
    let uc = ListExpensesUseCase { expenses: repo };

    let rows = uc.execute(owner, ExpenseFilter::default()).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.user_id == owner));
    assert_eq!(rows[0].date, date(2026, 6, 20));
    assert_eq!(rows[1].date, date(2026, 6, 1));
}

#[tokio::test]
async fn should_filter_by_category() {
    let owner = Uuid::new_v4();
    let repo = MockExpenseRepo::new(vec![
        test_expense(owner, Category::FoodAndDining, 12.0, date(2026, 6, 1)),
        test_expense(owner, Category::Groceries, 54.0, date(2026, 6, 20)),
        test_expense(owner, Category::FoodAndDining, 30.0, date(2026, 7, 5)),
    ]);
    let uc = ListExpensesUseCase { expenses: repo };

    let rows = uc
        .execute(
            owner,
            ExpenseFilter {
                category: Some(Category::FoodAndDining),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.category == Category::FoodAndDining));
}

#[tokio::test]
async fn should_bound_the_date_window_inclusively() {
    let owner = Uuid::new_v4();
    let repo = MockExpenseRepo::new(vec![
        test_expense(owner, Category::FoodAndDining, 12.0, date(2026, 6, 1)),
        test_expense(owner, Category::Groceries, 54.0, date(2026, 6, 20)),
        test_expense(owner, Category::FoodAndDining, 30.0, date(2026, 7, 5)),
    ]);
    let uc = ListExpensesUseCase { expenses: repo };

    // Both bounds land exactly on a row's date.
    let rows = uc
        .execute(
            owner,
            ExpenseFilter {
                start_date: Some(date(2026, 6, 20)),
                end_date: Some(date(2026, 6, 20)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, date(2026, 6, 20));
}

#[tokio::test]
async fn should_match_search_in_title_and_description() {
    let owner = Uuid::new_v4();
    let mut cab = test_expense(owner, Category::Transportation, 23.0, date(2026, 6, 2));
    cab.title = "Taxi to the airport".to_owned();
    let mut dinner = test_expense(owner, Category::FoodAndDining, 80.0, date(2026, 6, 4));
    dinner.description = Some("Split the shared taxi after dinner".to_owned());
    let groceries = test_expense(owner, Category::Groceries, 61.0, date(2026, 6, 3));

    let repo = MockExpenseRepo::new(vec![cab, dinner, groceries]);
    let uc = ListExpensesUseCase { expenses: repo };

    let rows = uc
        .execute(
            owner,
            ExpenseFilter {
                search: Some("taxi".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2, "search should hit title and description");
}

// ── Update / delete ownership ────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_a_partial_update() {
    let owner = Uuid::new_v4();
    let expense = test_expense(owner, Category::FoodAndDining, 20.0, date(2026, 6, 15));
    let repo = MockExpenseRepo::new(vec![expense.clone()]);
    let uc = UpdateExpenseUseCase { expenses: repo };

    let updated = uc
        .execute(
            owner,
            expense.id,
            ExpensePatch {
                amount: Some(25.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, 25.0);
    assert_eq!(updated.title, expense.title, "untouched fields keep their values");
    assert_eq!(updated.category, expense.category);
}

#[tokio::test]
async fn should_refuse_to_update_someone_elses_expense() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let expense = test_expense(owner, Category::FoodAndDining, 20.0, date(2026, 6, 15));
    let repo = MockExpenseRepo::new(vec![expense.clone()]);
    let uc = UpdateExpenseUseCase { expenses: repo };

    let result = uc
        .execute(
            stranger,
            expense.id,
            ExpensePatch {
                amount: Some(25.0),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_a_missing_expense() {
    let owner = Uuid::new_v4();
    let uc = UpdateExpenseUseCase {
        expenses: MockExpenseRepo::empty(),
    };

    let result = uc
        .execute(
            owner,
            Uuid::new_v4(),
            ExpensePatch {
                amount: Some(25.0),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_an_expense_once() {
    let owner = Uuid::new_v4();
    let expense = test_expense(owner, Category::FoodAndDining, 20.0, date(2026, 6, 15));
    let repo = MockExpenseRepo::new(vec![expense.clone()]);
    let expenses_handle = repo.expenses_handle();
    let uc = DeleteExpenseUseCase { expenses: repo };

    uc.execute(owner, expense.id).await.unwrap();
    assert!(expenses_handle.lock().unwrap().is_empty());

    let result = uc.execute(owner, expense.id).await;
    assert!(
        matches!(result, Err(ApiError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_to_delete_someone_elses_expense() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let expense = test_expense(owner, Category::FoodAndDining, 20.0, date(2026, 6, 15));
    let repo = MockExpenseRepo::new(vec![expense.clone()]);
    let expenses_handle = repo.expenses_handle();
    let uc = DeleteExpenseUseCase { expenses: repo };

    let result = uc.execute(stranger, expense.id).await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert_eq!(
        expenses_handle.lock().unwrap().len(),
        1,
        "the expense should survive"
    );
}

// ── ExpenseSummaryUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_rank_summary_categories_by_total_spend() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let repo = MockExpenseRepo::new(vec![
        test_expense(owner, Category::FoodAndDining, 120.0, date(2026, 6, 5)),
        test_expense(owner, Category::FoodAndDining, 80.0, date(2026, 6, 12)),
        test_expense(owner, Category::Transportation, 150.0, date(2026, 6, 8)),
        test_expense(owner, Category::Groceries, 50.0, date(2026, 6, 9)),
        test_expense(stranger, Category::FoodAndDining, 999.0, date(2026, 6, 5)),
    ]);
    let uc = ExpenseSummaryUseCase { expenses: repo };

    let summary = uc.execute(owner, None, None).await.unwrap();

    assert_eq!(summary.total_spent, 400.0);
    assert_eq!(summary.total_count, 4);

    let order: Vec<Category> = summary.by_category.iter().map(|row| row.category).collect();
    assert_eq!(
        order,
        vec![
            Category::FoodAndDining,
            Category::Transportation,
            Category::Groceries
        ]
    );
    assert_eq!(summary.by_category[0].total, 200.0);
    assert_eq!(summary.by_category[0].count, 2);
}

#[tokio::test]
async fn should_scope_the_summary_to_the_window() {
    let owner = Uuid::new_v4();
    let repo = MockExpenseRepo::new(vec![
        test_expense(owner, Category::FoodAndDining, 120.0, date(2026, 6, 1)),
        test_expense(owner, Category::FoodAndDining, 80.0, date(2026, 6, 30)),
        test_expense(owner, Category::Groceries, 50.0, date(2026, 7, 1)),
    ]);
    let uc = ExpenseSummaryUseCase { expenses: repo };

    let summary = uc
        .execute(owner, Some(date(2026, 6, 1)), Some(date(2026, 6, 30)))
        .await
        .unwrap();

    // Both June rows sit on the window edges and count; July does not.
    assert_eq!(summary.total_spent, 200.0);
    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.by_category.len(), 1);
}

#[tokio::test]
async fn should_return_an_empty_summary_for_no_expenses() {
    let uc = ExpenseSummaryUseCase {
        expenses: MockExpenseRepo::empty(),
    };

    let summary = uc.execute(Uuid::new_v4(), None, None).await.unwrap();

    assert!(summary.by_category.is_empty());
    assert_eq!(summary.total_spent, 0.0);
    assert_eq!(summary.total_count, 0);
}
