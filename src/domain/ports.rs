use crate::domain::model::{DrawnCardPayload, NewReading, Reading, User};
use crate::domain::spreads::SpreadKind;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Byte storage keyed by relative path. Writes need not be atomic; callers
/// serialize readers against writers themselves.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Produces the interpretation text for a finished draw.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, cards: &[DrawnCardPayload], spread: SpreadKind) -> Result<String>;
}

#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Returns the user for `wallet_address`, creating it on first sight.
    async fn ensure_user(&self, wallet_address: &str) -> Result<User>;
    async fn insert_reading(&self, reading: NewReading) -> Result<Reading>;
    /// Newest first.
    async fn readings_by_wallet(&self, wallet_address: &str) -> Result<Vec<Reading>>;
    async fn reading_by_id(&self, id: u64) -> Result<Option<Reading>>;
    /// Records a mint on an unminted reading as one step, so two callers can
    /// never both succeed. Fails with `InvalidRequest` if already minted.
    async fn mark_minted(&self, id: u64, mint_address: &str, image_cid: &str) -> Result<Reading>;
}
