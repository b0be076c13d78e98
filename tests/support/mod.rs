//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;

/// Creates a crawler day database with the standard `news_items` /
/// `platforms` schema. Rows are `(title, url, source)` tuples; insertion
/// order becomes crawl-time order (later rows are more recent).
pub async fn write_day_db(path: &Path, rows: &[(&str, Option<&str>, &str)]) {
    let db_url = format!("sqlite:{}?mode=rwc", path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .unwrap();

    sqlx::query("CREATE TABLE platforms (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE news_items (
             id INTEGER PRIMARY KEY,
             platform_id INTEGER NOT NULL,
             title TEXT NOT NULL,
             url TEXT,
             first_crawl_time TEXT NOT NULL
         )",
    )
    .execute(&pool)
    .await
    .unwrap();

    for (i, (title, url, source)) in rows.iter().enumerate() {
        let platform_id = i64::try_from(i).unwrap() + 1;
        sqlx::query("INSERT INTO platforms (id, name) VALUES (?, ?)")
            .bind(platform_id)
            .bind(source)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO news_items (platform_id, title, url, first_crawl_time) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(platform_id)
        .bind(title)
        .bind(*url)
        .bind(format!("09:{i:02}:00"))
        .execute(&pool)
        .await
        .unwrap();
    }

    pool.close().await;
}

/// Writes a topics.yaml file.
pub fn write_topics(path: &Path, yaml: &str) {
    std::fs::write(path, yaml).unwrap();
}

/// Dates of the `## YYYY-MM-DD` sections, in document order.
pub fn section_dates(document: &str) -> Vec<String> {
    document
        .lines()
        .filter_map(|line| line.strip_prefix("## "))
        .map(ToString::to_string)
        .collect()
}
