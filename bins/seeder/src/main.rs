//! Database seeder for HRMS development and testing.
//!
//! Seeds an admin account, the dropdown lookups and the standard leave
//! types. Safe to run repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder
//!
//! `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD` override the admin credentials.

use anyhow::Context;
use hrms_core::auth::{UserRole, hash_password};
use hrms_core::employee::details::{EMPLOYMENT_TYPES, PAY_METHODS, PROFICIENCY_LEVELS};
use hrms_core::employee::{GENDERS, IDENTIFICATION_TYPES, MARITAL_STATUSES, ORGANIZATIONS, STATUSES};
use hrms_core::leave::LeaveTypeInput;
use hrms_core::lookup::LookupInput;
use hrms_db::{LeaveTypeRepository, LookupRepository, UserRepository};
use hrms_shared::AppConfig;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

const DEFAULT_ADMIN_EMAIL: &str = "admin@hrms.local";
const DEFAULT_ADMIN_PASSWORD: &str = "change-me-now";

/// Lookup values keyed by type.
const LOOKUPS: &[(&str, &[&str])] = &[
    ("gender", GENDERS),
    ("organization", ORGANIZATIONS),
    ("employee_status", STATUSES),
    ("identification_type", IDENTIFICATION_TYPES),
    ("marital_status", MARITAL_STATUSES),
    ("military_status", &["Exempted", "Completed", "Not Applicable"]),
    ("nationality", &["Thai", "Burmese", "Karen", "Other"]),
    ("religion", &["Buddhist", "Christian", "Muslim", "Hindu", "Other"]),
    ("employment_type", EMPLOYMENT_TYPES),
    ("pay_method", PAY_METHODS),
    ("language_proficiency", PROFICIENCY_LEVELS),
    ("bank_name", &["Bangkok Bank", "Kasikorn Bank", "Siam Commercial Bank", "Krungthai Bank"]),
];

/// (name, default days, needs attachment)
const LEAVE_TYPES: &[(&str, i64, bool)] = &[
    ("Annual Leave", 26, false),
    ("Sick Leave", 30, true),
    ("Maternity Leave", 98, true),
    ("Compassionate Leave", 5, false),
    ("Unpaid Leave", 0, false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = hrms_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    hrms_db::migrate(&db).await?;

    println!("Seeding admin user...");
    seed_admin(&db).await?;

    println!("Seeding lookups...");
    seed_lookups(&db).await?;

    println!("Seeding leave types...");
    seed_leave_types(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into());

    let users = UserRepository::new(db.clone());
    if users.email_exists(&email).await? {
        println!("  {email} already exists, skipping...");
        return Ok(());
    }

    let hash = hash_password(&password).context("Failed to hash admin password")?;
    users
        .create(&email, &hash, "Administrator", &UserRole::Admin.to_string())
        .await?;
    println!("  Created {email}");
    Ok(())
}

async fn seed_lookups(db: &DatabaseConnection) -> anyhow::Result<()> {
    let lookups = LookupRepository::new(db.clone());
    for (lookup_type, values) in LOOKUPS {
        let existing: Vec<String> = lookups
            .by_type(lookup_type)
            .await?
            .into_iter()
            .map(|l| l.value)
            .collect();

        let mut created = 0;
        for value in values.iter().filter(|v| !existing.iter().any(|e| e == *v)) {
            let input = LookupInput {
                lookup_type: Some((*lookup_type).to_string()),
                value: Some((*value).to_string()),
            };
            lookups
                .create(input, None)
                .await
                .with_context(|| format!("Failed to seed lookup {lookup_type}: {value}"))?;
            created += 1;
        }
        println!("  {lookup_type}: {created} added");
    }
    Ok(())
}

async fn seed_leave_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    let leave_types = LeaveTypeRepository::new(db.clone());
    let existing: Vec<String> = leave_types.list().await?.into_iter().map(|t| t.name).collect();

    for (name, days, requires_attachment) in LEAVE_TYPES {
        if existing.iter().any(|e| e == name) {
            println!("  {name} already exists, skipping...");
            continue;
        }
        let input = LeaveTypeInput {
            name: Some((*name).to_string()),
            default_duration: Some(Decimal::from(*days)),
            description: None,
            requires_attachment: Some(*requires_attachment),
        };
        leave_types
            .create(input, None)
            .await
            .with_context(|| format!("Failed to seed leave type {name}"))?;
        println!("  Created {name}");
    }
    Ok(())
}
