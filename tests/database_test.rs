//! History store tests against a temporary SQLite database

#![cfg(feature = "server")]

use anyhow::Result;
use equipviz::database::entities::{upload_history, UploadHistory};
use equipviz::database::setup_database;
use equipviz::history::{HistoryStore, NewUploadRecord, SqliteHistoryStore};
use equipviz::server::{migrate_database, MigrateDirection};
use equipviz::summary::ColumnAverages;
use sea_orm::{Database, DatabaseConnection, EntityTrait, QueryOrder};
use tempfile::NamedTempFile;

async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

fn record(filename: &str, pressure: f64) -> NewUploadRecord {
    NewUploadRecord {
        filename: filename.to_string(),
        total_count: 3,
        averages: ColumnAverages {
            pressure,
            temperature: 100.0 / 3.0,
            flowrate: 2.0,
        },
    }
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let rows = UploadHistory::find().all(&db).await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_append_keeps_full_precision() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let store = SqliteHistoryStore::new(db.clone());

    let id = store.append(record("thirds.csv", 4.0 / 3.0)).await?;

    let model = UploadHistory::find_by_id(id.value() as i32)
        .one(&db)
        .await?
        .expect("record was written");
    assert_eq!(model.filename, "thirds.csv");
    assert_eq!(model.total_count, 3);
    assert_eq!(model.avg_pressure, 4.0 / 3.0);
    assert_eq!(model.avg_temperature, 100.0 / 3.0);

    Ok(())
}

#[tokio::test]
async fn test_most_recent_is_newest_first() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let store = SqliteHistoryStore::new(db);

    for i in 0..7 {
        store.append(record(&format!("{i}.csv"), f64::from(i))).await?;
    }

    let recent = store.most_recent(5).await?;
    let names: Vec<&str> = recent.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["6.csv", "5.csv", "4.csv", "3.csv", "2.csv"]);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].uploaded_at >= pair[1].uploaded_at));

    assert_eq!(store.most_recent(100).await?.len(), 7);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_keep_timestamps_in_id_order() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let store = SqliteHistoryStore::new(db.clone());

    let appends: Vec<_> = (0..100)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append(record(&format!("{i}.csv"), 1.0)).await })
        })
        .collect();
    for append in appends {
        append.await??;
    }

    let rows = UploadHistory::find()
        .order_by_asc(upload_history::Column::Id)
        .all(&db)
        .await?;
    assert_eq!(rows.len(), 100);
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].uploaded_at <= pair[1].uploaded_at));

    let newest = store.most_recent(1).await?;
    assert_eq!(newest[0].id.value(), i64::from(rows[99].id));

    Ok(())
}

#[tokio::test]
async fn test_negative_count_is_rejected_on_read() -> Result<()> {
    use sea_orm::{ActiveModelTrait, Set};

    let (db, _temp_file) = setup_test_db().await?;
    upload_history::ActiveModel {
        filename: Set("corrupt.csv".to_string()),
        uploaded_at: Set(chrono::Utc::now()),
        total_count: Set(-1),
        avg_pressure: Set(0.0),
        avg_temperature: Set(0.0),
        avg_flowrate: Set(0.0),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let store = SqliteHistoryStore::new(db);
    assert!(store.most_recent(5).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_migrate_fresh_clears_history() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let path = temp_file.path().display().to_string();

    migrate_database(&path, MigrateDirection::Up).await?;
    let db = Database::connect(format!("sqlite://{path}?mode=rwc")).await?;
    SqliteHistoryStore::new(db.clone())
        .append(record("before.csv", 1.0))
        .await?;

    migrate_database(&path, MigrateDirection::Fresh).await?;
    let db = Database::connect(format!("sqlite://{path}?mode=rwc")).await?;
    assert!(UploadHistory::find().all(&db).await?.is_empty());

    Ok(())
}
