// src/cli/migrate.rs — Database migration command
//
// Migrations run automatically whenever the store is opened; this command
// shows where the schema stands and can undo the latest step.

use std::path::Path;

use rusqlite::Connection;

use crate::infra::config::Config;
use crate::memory::schema;

pub fn run_migrate(config: &Config, status_only: bool, rollback: bool) -> anyhow::Result<()> {
    let db_path = config.storage.resolved_db_path();

    if !db_path.exists() && (status_only || rollback) {
        println!("No database found at: {}", db_path.display());
        println!("Run `mockprep start` to create it.");
        return Ok(());
    }
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(&db_path)?;

    if status_only {
        return show_migration_status(&conn, &db_path);
    }

    if rollback {
        match schema::rollback_last(&conn)? {
            Some(version) => {
                println!("Rolled back migration v{}.", version);
                println!("Saved sessions in the dropped tables are gone.");
            }
            None => println!("No migrations to roll back."),
        }
        return show_migration_status(&conn, &db_path);
    }

    println!("Running database migrations...");
    schema::run_migrations(&conn)?;
    println!("Migrations complete.");
    show_migration_status(&conn, &db_path)
}

/// (version, name, applied_at) for every applied migration, oldest first.
fn applied_migrations(conn: &Connection) -> anyhow::Result<Vec<(u32, String, String)>> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='_migrations'",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Ok(Vec::new());
    }

    let mut stmt =
        conn.prepare("SELECT version, name, applied_at FROM _migrations ORDER BY version")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
    let mut applied = Vec::new();
    for row in rows {
        applied.push(row?);
    }
    Ok(applied)
}

fn show_migration_status(conn: &Connection, db_path: &Path) -> anyhow::Result<()> {
    let applied = applied_migrations(conn)?;
    println!("Database: {}", db_path.display());
    if applied.is_empty() {
        println!("No migrations have been applied.");
        return Ok(());
    }

    println!("Current schema version: {}", schema::current_version(conn)?);
    println!();
    println!("Applied migrations:");
    for (version, name, applied_at) in applied {
        println!("  v{}: {} (applied {})", version, name, applied_at);
    }
    Ok(())
}
