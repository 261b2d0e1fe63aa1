//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for the org structure and HMO records.

mod repository;
mod seed;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = db_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::warn!("Could not create database directory {:?}: {}", parent, e);
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS divisions (
            division_id INTEGER PRIMARY KEY AUTOINCREMENT,
            division_name TEXT NOT NULL,
            division_head TEXT,
            description TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // parent_department_id is not a foreign key; dangling parents surface as orphans.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            department_id INTEGER PRIMARY KEY AUTOINCREMENT,
            department_name TEXT NOT NULL,
            department_code TEXT,
            department_type TEXT NOT NULL DEFAULT 'Administrative',
            parent_department_id INTEGER,
            division_id INTEGER,
            manager_id INTEGER,
            description TEXT,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            role_id INTEGER PRIMARY KEY AUTOINCREMENT,
            role_title TEXT NOT NULL,
            department_id INTEGER,
            salary_grade TEXT,
            headcount_budget INTEGER NOT NULL DEFAULT 0,
            pay_grade_min INTEGER,
            pay_grade_max INTEGER
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            employee_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            job_title TEXT,
            email TEXT,
            department_id INTEGER,
            role_id INTEGER,
            monthly_salary INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coordinators (
            coordinator_id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL,
            department_id INTEGER,
            area TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hmo_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            provider TEXT NOT NULL,
            monthly_premium REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS hmo_enrollments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL,
            plan_id INTEGER NOT NULL,
            status TEXT NOT NULL,
            monthly_contribution REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS hmo_claims (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            claim_number TEXT NOT NULL,
            enrollment_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            status TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            approved_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_departments_parent ON departments(parent_department_id);
        CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department_id);
        CREATE INDEX IF NOT EXISTS idx_employees_role ON employees(role_id);
        CREATE INDEX IF NOT EXISTS idx_roles_department ON roles(department_id);
        CREATE INDEX IF NOT EXISTS idx_hmo_claims_status ON hmo_claims(status);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
