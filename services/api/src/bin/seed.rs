//! Development seeder: wipes the ledger tables and loads three sample
//! accounts, each with randomized expenses over the trailing 90 days and a
//! set of monthly budgets.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Months, Utc};
use rand::RngExt;
use sea_orm::{Database, EntityTrait};
use uuid::Uuid;

use outlay_api::domain::repository::{BudgetRepository, ExpenseRepository, UserRepository};
use outlay_api::domain::types::{Budget, Expense, NotificationPrefs, User};
use outlay_api::infra::db::{DbBudgetRepository, DbExpenseRepository, DbUserRepository};
use outlay_domain::{BudgetPeriod, Category, PaymentMethod};
use outlay_schema::{budgets, expenses, users};

struct SampleUser {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    monthly_income: f64,
    currency: &'static str,
    notifications: NotificationPrefs,
}

const SAMPLE_USERS: [SampleUser; 3] = [
    SampleUser {
        name: "John Doe",
        email: "john@example.com",
        phone: "+1234567890",
        monthly_income: 5_000.0,
        currency: "USD",
        notifications: NotificationPrefs {
            budget_alerts: true,
            weekly_reports: true,
            expense_reminders: false,
        },
    },
    SampleUser {
        name: "Jane Smith",
        email: "jane@example.com",
        phone: "+1234567891",
        monthly_income: 6_500.0,
        currency: "USD",
        notifications: NotificationPrefs {
            budget_alerts: true,
            weekly_reports: false,
            expense_reminders: true,
        },
    },
    SampleUser {
        name: "Mike Johnson",
        email: "mike@example.com",
        phone: "+1234567892",
        monthly_income: 4_000.0,
        currency: "EUR",
        notifications: NotificationPrefs {
            budget_alerts: false,
            weekly_reports: true,
            expense_reminders: true,
        },
    },
];

const SAMPLE_PASSWORD: &str = "password123";

fn titles_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::FoodAndDining => {
            &["Restaurant Bill", "Coffee Shop", "Lunch", "Dinner", "Fast Food"]
        }
        Category::Transportation => {
            &["Uber Ride", "Gas Station", "Parking", "Car Maintenance", "Public Transport"]
        }
        Category::Shopping => {
            &["Online Shopping", "Clothing Store", "Electronics", "Home Goods", "Books"]
        }
        Category::Entertainment => {
            &["Movie Tickets", "Concert", "Streaming Service", "Gaming", "Sports Event"]
        }
        Category::BillsAndUtilities => {
            &["Electricity Bill", "Internet Bill", "Water Bill", "Phone Bill", "Rent"]
        }
        Category::Healthcare => {
            &["Pharmacy", "Doctor Visit", "Medicine", "Health Insurance", "Gym Membership"]
        }
        Category::Education => {
            &["Course Fee", "Books", "Online Class", "Tuition", "Study Materials"]
        }
        Category::Travel => {
            &["Flight Ticket", "Hotel", "Vacation", "Travel Insurance", "Tour Package"]
        }
        Category::PersonalCare => &["Salon", "Spa", "Cosmetics", "Haircut", "Beauty Products"],
        Category::Groceries => {
            &["Supermarket", "Weekly Groceries", "Fresh Produce", "Dairy Products", "Snacks"]
        }
        Category::Investment => {
            &["Index Fund", "Stock Purchase", "Recurring Deposit", "Gold", "Crypto"]
        }
        Category::Other => &["Gift", "Donation", "Miscellaneous", "Emergency", "Subscription"],
    }
}

fn sample_expense(owner: Uuid) -> Expense {
    let mut rng = rand::rng();

    let days_ago = rng.random_range(0..90);
    let date = Utc::now().date_naive() - Duration::days(days_ago);
    let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
    let amount = (rng.random_range(10.0..510.0_f64) * 100.0).round() / 100.0;
    let payment_method = PaymentMethod::ALL[rng.random_range(0..PaymentMethod::ALL.len())];
    let titles = titles_for(category);
    let title = titles[rng.random_range(0..titles.len())];

    Expense {
        id: Uuid::now_v7(),
        user_id: owner,
        title: title.to_owned(),
        amount,
        category,
        date,
        payment_method,
        description: Some(format!("Sample {} expense", category.as_str().to_lowercase())),
        created_at: Utc::now(),
    }
}

fn sample_budgets(owner: Uuid) -> Result<Vec<Budget>> {
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).context("first day of month")?;
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .context("last day of month")?;

    let plans = [
        (Category::FoodAndDining, 500.0, 80),
        (Category::Transportation, 300.0, 75),
        (Category::Shopping, 400.0, 85),
        (Category::Entertainment, 200.0, 90),
        (Category::BillsAndUtilities, 600.0, 70),
    ];

    Ok(plans
        .into_iter()
        .map(|(category, limit, alert_threshold)| Budget {
            id: Uuid::now_v7(),
            user_id: owner,
            category,
            limit,
            period: BudgetPeriod::Monthly,
            start_date: month_start,
            end_date: month_end,
            alert_threshold,
            created_at: Utc::now(),
        })
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
    let db = Database::connect(&database_url)
        .await
        .context("connect to database")?;
    println!("✓ connected to database");

    expenses::Entity::delete_many()
        .exec(&db)
        .await
        .context("clear expenses")?;
    budgets::Entity::delete_many()
        .exec(&db)
        .await
        .context("clear budgets")?;
    users::Entity::delete_many()
        .exec(&db)
        .await
        .context("clear users")?;
    println!("✓ cleared existing data");

    let user_repo = DbUserRepository { db: db.clone() };
    let expense_repo = DbExpenseRepository { db: db.clone() };
    let budget_repo = DbBudgetRepository { db: db.clone() };

    for sample in SAMPLE_USERS {
        let password_hash = bcrypt::hash(SAMPLE_PASSWORD, bcrypt::DEFAULT_COST)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: sample.name.to_owned(),
            email: sample.email.to_owned(),
            phone: Some(sample.phone.to_owned()),
            password_hash,
            monthly_income: sample.monthly_income,
            currency: sample.currency.to_owned(),
            notifications: sample.notifications,
            created_at: now,
            updated_at: now,
        };
        user_repo.create(&user).await?;

        for _ in 0..30 {
            expense_repo.create(&sample_expense(user.id)).await?;
        }
        for budget in sample_budgets(user.id)? {
            budget_repo.create(&budget).await?;
        }
        println!("✓ seeded {} (30 expenses, 5 budgets)", sample.email);
    }

    println!("done — sample login: john@example.com / {SAMPLE_PASSWORD}");
    Ok(())
}
