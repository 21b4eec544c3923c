use crate::domain::model::{NewReading, Reading, User};
use crate::domain::ports::{ReadingStore, Storage};
use crate::utils::error::{Result, TarotError};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const LEDGER_FILE: &str = "readings.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ledger {
    last_id: u64,
    users: Vec<User>,
    readings: Vec<Reading>,
}

/// Readings and users kept as a single JSON document in a [`Storage`].
///
/// Every operation loads the ledger, so several processes can share a data
/// directory as long as they do not write at the same moment. Within one
/// process, reads and writes are serialized by `lock`.
pub struct JsonFileStore<S: Storage> {
    storage: S,
    lock: Mutex<()>,
}

impl<S: Storage> JsonFileStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Ledger> {
        match self.storage.read_file(LEDGER_FILE).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(TarotError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No reading ledger yet, starting empty");
                Ok(Ledger::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let data = serde_json::to_vec_pretty(ledger)?;
        tracing::debug!("Writing reading ledger ({} bytes)", data.len());
        self.storage.write_file(LEDGER_FILE, &data).await
    }
}

#[async_trait]
impl<S: Storage> ReadingStore for JsonFileStore<S> {
    async fn ensure_user(&self, wallet_address: &str) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;

        if let Some(user) = ledger
            .users
            .iter()
            .find(|u| u.wallet_address == wallet_address)
        {
            return Ok(user.clone());
        }

        let user = User {
            wallet_address: wallet_address.to_string(),
            created_at: Utc::now(),
        };
        ledger.users.push(user.clone());
        self.save(&ledger).await?;
        tracing::info!(wallet = %wallet_address, "Registered new user");
        Ok(user)
    }

    async fn insert_reading(&self, reading: NewReading) -> Result<Reading> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;

        ledger.last_id += 1;
        let stored = Reading {
            id: ledger.last_id,
            wallet_address: reading.wallet_address,
            spread_type: reading.spread_type,
            drawn_cards: reading.drawn_cards,
            ai_interpretation: reading.ai_interpretation,
            image_cid: None,
            mint_address: None,
            is_minted: false,
            created_at: Utc::now(),
        };
        ledger.readings.push(stored.clone());
        self.save(&ledger).await?;
        Ok(stored)
    }

    async fn readings_by_wallet(&self, wallet_address: &str) -> Result<Vec<Reading>> {
        let ledger = {
            let _guard = self.lock.lock().await;
            self.load().await?
        };
        let mut readings: Vec<Reading> = ledger
            .readings
            .into_iter()
            .filter(|r| r.wallet_address == wallet_address)
            .collect();
        readings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(readings)
    }

    async fn reading_by_id(&self, id: u64) -> Result<Option<Reading>> {
        let _guard = self.lock.lock().await;
        let ledger = self.load().await?;
        Ok(ledger.readings.into_iter().find(|r| r.id == id))
    }

    async fn mark_minted(&self, id: u64, mint_address: &str, image_cid: &str) -> Result<Reading> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;

        let reading = ledger
            .readings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TarotError::ReadingNotFound { id })?;
        if reading.is_minted {
            return Err(TarotError::InvalidRequest {
                message: format!("Reading {} is already minted", id),
            });
        }

        reading.is_minted = true;
        reading.mint_address = Some(mint_address.to_string());
        reading.image_cid = Some(image_cid.to_string());
        let minted = reading.clone();
        self.save(&ledger).await?;
        Ok(minted)
    }
}
