//! SQLite storage implementation.
//!
//! Embedded relational backend over `sqlx`. The schema is created on open
//! (there is no migration story): a `valid_bills` table keyed by serial
//! number and an append-only `tracked_bills` table with an autoincrement
//! id and a serial-number index.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use billtrace_core::{NewTrackingEvent, TrackingEvent, ValidBill};

use crate::error::{Result, StoreError};
use crate::Store;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS valid_bills (
        serial_number TEXT PRIMARY KEY,
        bill_value INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tracked_bills (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        serial_number TEXT NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        date TEXT NOT NULL,
        recorded_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_tracked_bills_serial
        ON tracked_bills (serial_number, recorded_at)",
];

/// SQLite-backed storage implementation.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    fn event_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TrackingEvent> {
        Ok(TrackingEvent {
            id: row.try_get("id")?,
            serial_number: row.try_get("serial_number")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            date: row.try_get("date")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_valid_bill(&self, serial: &str) -> Result<Option<ValidBill>> {
        let row = sqlx::query(
            "SELECT serial_number, bill_value FROM valid_bills WHERE serial_number = ?",
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(ValidBill {
                serial_number: row.try_get("serial_number")?,
                bill_value: row.try_get("bill_value")?,
            })
        })
        .transpose()
    }

    async fn put_valid_bill(&self, bill: &ValidBill) -> Result<()> {
        let result = sqlx::query("INSERT INTO valid_bills (serial_number, bill_value) VALUES (?, ?)")
            .bind(&bill.serial_number)
            .bind(bill.bill_value)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation()) =>
            {
                Err(StoreError::DuplicateSerial {
                    serial: bill.serial_number.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_last_event(&self, serial: &str) -> Result<Option<TrackingEvent>> {
        let row = sqlx::query(
            "SELECT id, serial_number, city, state, date, recorded_at
             FROM tracked_bills
             WHERE serial_number = ?
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1",
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::event_from_row(&row)).transpose()
    }

    async fn append_event(&self, event: NewTrackingEvent) -> Result<TrackingEvent> {
        let recorded_at = chrono::Utc::now();

        let row = sqlx::query(
            "INSERT INTO tracked_bills (serial_number, city, state, date, recorded_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&event.serial_number)
        .bind(&event.city)
        .bind(&event.state)
        .bind(event.date)
        .bind(recorded_at)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.try_get("id")?;
        tracing::debug!(serial = %event.serial_number, id, "Appended tracking event");

        Ok(TrackingEvent {
            id,
            serial_number: event.serial_number,
            city: event.city,
            state: event.state,
            date: event.date,
            recorded_at,
        })
    }

    async fn get_history(&self, serial: &str) -> Result<Vec<TrackingEvent>> {
        let rows = sqlx::query(
            "SELECT id, serial_number, city, state, date, recorded_at
             FROM tracked_bills
             WHERE serial_number = ?
             ORDER BY recorded_at DESC, id DESC",
        )
        .bind(serial)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::event_from_row).collect()
    }

    async fn count_by_serial(&self) -> Result<HashMap<String, u64>> {
        let rows = sqlx::query(
            "SELECT serial_number, COUNT(*) AS tracked_count
             FROM tracked_bills
             GROUP BY serial_number",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let serial: String = row.try_get("serial_number")?;
                let count: i64 = row.try_get("tracked_count")?;
                Ok((serial, count.unsigned_abs()))
            })
            .collect()
    }

    async fn count_by_city_state(&self) -> Result<HashMap<(String, String), u64>> {
        let rows = sqlx::query(
            "SELECT city, state, COUNT(*) AS tracked_count
             FROM tracked_bills
             GROUP BY city, state",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let city: String = row.try_get("city")?;
                let state: String = row.try_get("state")?;
                let count: i64 = row.try_get("tracked_count")?;
                Ok(((city, state), count.unsigned_abs()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> SqliteStore {
        SqliteStore::open(dir.path().join("billtrace.db"))
            .await
            .expect("open sqlite store")
    }

    fn new_event(serial: &str, city: &str, state: &str) -> NewTrackingEvent {
        NewTrackingEvent {
            serial_number: serial.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn put_and_get_valid_bill() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let bill = ValidBill {
            serial_number: "AB12345678".to_string(),
            bill_value: 5,
        };
        store.put_valid_bill(&bill).await.unwrap();

        let found = store.get_valid_bill("AB12345678").await.unwrap().unwrap();
        assert_eq!(found, bill);
        assert!(store.get_valid_bill("ZZ00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_serial_maps_to_duplicate_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let bill = ValidBill {
            serial_number: "AB12345678".to_string(),
            bill_value: 5,
        };
        store.put_valid_bill(&bill).await.unwrap();

        let err = store.put_valid_bill(&bill).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSerial { .. }));
    }

    #[tokio::test]
    async fn append_and_history_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let first = store
            .append_event(new_event("AB12345678", "Austin", "Texas"))
            .await
            .unwrap();
        let second = store
            .append_event(new_event("AB12345678", "Dallas", "Texas"))
            .await
            .unwrap();
        store
            .append_event(new_event("CD00000001", "Boston", "Massachusetts"))
            .await
            .unwrap();

        assert!(second.id > first.id);

        let history = store.get_history("AB12345678").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let last = store.get_last_event("AB12345678").await.unwrap().unwrap();
        assert_eq!(last.id, second.id);
    }

    #[tokio::test]
    async fn counts_group_by_serial_and_city() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store
            .append_event(new_event("AB12345678", "Austin", "Texas"))
            .await
            .unwrap();
        store
            .append_event(new_event("AB12345678", "Austin", "Texas"))
            .await
            .unwrap();
        store
            .append_event(new_event("CD00000001", "Boston", "Massachusetts"))
            .await
            .unwrap();

        let by_serial = store.count_by_serial().await.unwrap();
        assert_eq!(by_serial["AB12345678"], 2);

        let by_city = store.count_by_city_state().await.unwrap();
        assert_eq!(by_city[&("Austin".to_string(), "Texas".to_string())], 2);
    }
}
