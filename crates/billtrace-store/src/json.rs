//! Flat-file JSON storage implementation.
//!
//! Two documents under one data directory, matching the original
//! deployment format:
//!
//! - `valid_bills.json`: `{ "valid_bills": [...] }`
//! - `tracked_bills.json`: `{ "tracked_bills": [...] }`
//!
//! Every operation re-reads the relevant file; writes rewrite the whole
//! document to a temp file and rename it into place so a failed write
//! never leaves a half-written log. A single `RwLock` serializes
//! read-modify-write cycles against concurrent handlers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;

use billtrace_core::{NewTrackingEvent, TrackingEvent, ValidBill};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ValidBillsFile {
    valid_bills: Vec<ValidBill>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackedBillsFile {
    tracked_bills: Vec<TrackingEvent>,
}

/// JSON flat-file storage implementation.
pub struct JsonStore {
    valid_bills_path: PathBuf,
    tracked_bills_path: PathBuf,
    lock: RwLock<()>,
}

impl JsonStore {
    /// Create a store rooted at the given data directory.
    ///
    /// Missing files are treated as empty documents and created on first
    /// write.
    #[must_use]
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            valid_bills_path: data_dir.join("valid_bills.json"),
            tracked_bills_path: data_dir.join("tracked_bills.json"),
            lock: RwLock::new(()),
        }
    }

    async fn read_file<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    async fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;

        // Temp-then-rename keeps the document intact if the write dies
        // partway through.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_valid_bills(&self) -> Result<ValidBillsFile> {
        Self::read_file(&self.valid_bills_path).await
    }

    async fn read_tracked_bills(&self) -> Result<TrackedBillsFile> {
        Self::read_file(&self.tracked_bills_path).await
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn get_valid_bill(&self, serial: &str) -> Result<Option<ValidBill>> {
        let _guard = self.lock.read().await;
        let data = self.read_valid_bills().await?;
        Ok(data
            .valid_bills
            .into_iter()
            .find(|bill| bill.serial_number == serial))
    }

    async fn put_valid_bill(&self, bill: &ValidBill) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut data = self.read_valid_bills().await?;

        if data
            .valid_bills
            .iter()
            .any(|existing| existing.serial_number == bill.serial_number)
        {
            return Err(StoreError::DuplicateSerial {
                serial: bill.serial_number.clone(),
            });
        }

        data.valid_bills.push(bill.clone());
        Self::write_file(&self.valid_bills_path, &data).await
    }

    async fn get_last_event(&self, serial: &str) -> Result<Option<TrackingEvent>> {
        let _guard = self.lock.read().await;
        let data = self.read_tracked_bills().await?;
        Ok(data
            .tracked_bills
            .into_iter()
            .filter(|event| event.serial_number == serial)
            .max_by_key(|event| (event.recorded_at, event.id)))
    }

    async fn append_event(&self, event: NewTrackingEvent) -> Result<TrackingEvent> {
        let _guard = self.lock.write().await;
        let mut data = self.read_tracked_bills().await?;

        let next_id = data
            .tracked_bills
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            + 1;

        let event = TrackingEvent {
            id: next_id,
            serial_number: event.serial_number,
            city: event.city,
            state: event.state,
            date: event.date,
            recorded_at: chrono::Utc::now(),
        };

        data.tracked_bills.push(event.clone());
        Self::write_file(&self.tracked_bills_path, &data).await?;

        tracing::debug!(
            serial = %event.serial_number,
            id = event.id,
            "Appended tracking event"
        );
        Ok(event)
    }

    async fn get_history(&self, serial: &str) -> Result<Vec<TrackingEvent>> {
        let _guard = self.lock.read().await;
        let data = self.read_tracked_bills().await?;
        let mut events: Vec<TrackingEvent> = data
            .tracked_bills
            .into_iter()
            .filter(|event| event.serial_number == serial)
            .collect();
        events.sort_unstable_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(events)
    }

    async fn count_by_serial(&self) -> Result<HashMap<String, u64>> {
        let _guard = self.lock.read().await;
        let data = self.read_tracked_bills().await?;
        let mut counts = HashMap::new();
        for event in data.tracked_bills {
            *counts.entry(event.serial_number).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_by_city_state(&self) -> Result<HashMap<(String, String), u64>> {
        let _guard = self.lock.read().await;
        let data = self.read_tracked_bills().await?;
        let mut counts = HashMap::new();
        for event in data.tracked_bills {
            *counts.entry((event.city, event.state)).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
