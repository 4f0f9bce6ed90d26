use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

/// Открывает (создает при необходимости) файл SQLite и поднимает схему
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Connecting to database: {}", db_url);
    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// In-memory SQLite с той же схемой (для тестов).
///
/// Пул ограничен одним соединением: каждое соединение к `:memory:` видит
/// собственную пустую БД.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "members",
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY NOT NULL,
            join_date TEXT NOT NULL,
            date_of_birth TEXT,
            city TEXT NOT NULL,
            no_of_child INTEGER NOT NULL DEFAULT 0,
            eldest_kid_dob TEXT,
            youngest_kid_dob TEXT,
            password TEXT NOT NULL
        );
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            level TEXT NOT NULL
        );
        "#,
    ),
    (
        "product_grammages",
        r#"
        CREATE TABLE IF NOT EXISTS product_grammages (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT,
            point INTEGER,
            price REAL
        );
        "#,
    ),
    (
        "product_transactions",
        r#"
        CREATE TABLE IF NOT EXISTS product_transactions (
            id TEXT PRIMARY KEY NOT NULL,
            member_id TEXT NOT NULL REFERENCES members(id),
            product_id INTEGER NOT NULL REFERENCES products(id),
            product_grammage_id INTEGER NOT NULL REFERENCES product_grammages(id),
            source TEXT NOT NULL,
            qty INTEGER NOT NULL,
            price_per_unit REAL,
            created_at TEXT NOT NULL,
            is_training_data INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "roles",
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE
        );
        "#,
    ),
    (
        "companies",
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE
        );
        "#,
    ),
    (
        "branches",
        r#"
        CREATE TABLE IF NOT EXISTS branches (
            id TEXT PRIMARY KEY NOT NULL,
            company_id TEXT NOT NULL REFERENCES companies(id),
            name TEXT NOT NULL
        );
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            role_id TEXT NOT NULL REFERENCES roles(id),
            company_id TEXT REFERENCES companies(id),
            branch_id TEXT REFERENCES branches(id),
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );
        "#,
    ),
    (
        "app_logs",
        r#"
        CREATE TABLE IF NOT EXISTS app_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            app_id TEXT NOT NULL,
            log_level TEXT NOT NULL,
            info TEXT,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ),
];

/// Ensure required tables exist (minimal schema bootstrap)
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;".to_string(),
    ))
    .await?;

    for (table, ddl) in SCHEMA {
        tracing::debug!("Ensuring table {}", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}
