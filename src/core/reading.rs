use crate::core::cards::name_to_index;
use crate::core::nft::NftMetadata;
use crate::domain::model::{NewReading, Reading, ReadingRequest};
use crate::domain::ports::{Interpreter, ReadingStore};
use crate::domain::spreads::{SpreadKind, CARDS_PER_SPREAD};
use crate::utils::error::{Result, TarotError};
use crate::utils::validation::validate_wallet_address;
use std::collections::HashSet;

/// Stored in place of an interpretation when the interpreter fails.
pub const FALLBACK_INTERPRETATION: &str =
    "The AI interpretation service is currently unavailable. Please try again shortly.";

pub struct ReadingService<I: Interpreter, S: ReadingStore> {
    interpreter: I,
    store: S,
}

impl<I: Interpreter, S: ReadingStore> ReadingService<I, S> {
    pub fn new(interpreter: I, store: S) -> Self {
        Self { interpreter, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates a finished draw, interprets it and persists the reading.
    pub async fn create_reading(&self, request: ReadingRequest) -> Result<Reading> {
        let spread = validate_request(&request)?;

        tracing::info!(
            wallet = %request.wallet_address,
            spread = %spread,
            "Creating reading"
        );
        self.store.ensure_user(&request.wallet_address).await?;

        let ai_interpretation = match self
            .interpreter
            .interpret(&request.drawn_cards, spread)
            .await
        {
            Ok(text) => text,
            Err(e) if e.is_transient() => {
                tracing::warn!("Interpretation temporarily unavailable, storing fallback: {}", e);
                FALLBACK_INTERPRETATION.to_string()
            }
            Err(e) => {
                tracing::error!(
                    "Interpretation failed (Category: {:?}, Severity: {:?}): {}",
                    e.category(),
                    e.severity(),
                    e
                );
                FALLBACK_INTERPRETATION.to_string()
            }
        };

        let reading = self
            .store
            .insert_reading(NewReading {
                wallet_address: request.wallet_address,
                spread_type: request.spread_type,
                drawn_cards: request.drawn_cards,
                ai_interpretation,
            })
            .await?;

        tracing::info!(id = reading.id, "Reading saved");
        Ok(reading)
    }

    pub async fn readings_by_wallet(&self, wallet_address: &str) -> Result<Vec<Reading>> {
        validate_wallet_address("walletAddress", wallet_address)?;
        self.store.readings_by_wallet(wallet_address).await
    }

    pub async fn reading_by_id(&self, id: u64) -> Result<Reading> {
        self.store
            .reading_by_id(id)
            .await?
            .ok_or(TarotError::ReadingNotFound { id })
    }

    /// Marks a reading as minted once the external minter reports success.
    /// Only the first call for a reading succeeds.
    pub async fn record_mint(&self, id: u64, mint_address: &str, image_cid: &str) -> Result<Reading> {
        validate_wallet_address("mintAddress", mint_address).map_err(|e| invalid(e.to_string()))?;
        if image_cid.trim().is_empty() {
            return Err(invalid("Image CID cannot be empty"));
        }

        let reading = self.store.mark_minted(id, mint_address, image_cid).await?;
        tracing::info!(id, mint = %mint_address, "Reading minted");
        Ok(reading)
    }

    pub async fn nft_metadata(&self, id: u64, image_cid: &str) -> Result<NftMetadata> {
        let reading = self.reading_by_id(id).await?;
        NftMetadata::for_reading(&reading, image_cid)
    }
}

fn invalid(message: impl Into<String>) -> TarotError {
    TarotError::InvalidRequest {
        message: message.into(),
    }
}

/// Checks the request shape and returns its spread.
pub fn validate_request(request: &ReadingRequest) -> Result<SpreadKind> {
    validate_wallet_address("walletAddress", &request.wallet_address)?;
    let spread: SpreadKind = request.spread_type.parse()?;

    if request.drawn_cards.len() != CARDS_PER_SPREAD {
        return Err(invalid(format!(
            "Expected {} cards, got {}",
            CARDS_PER_SPREAD,
            request.drawn_cards.len()
        )));
    }

    let mut seen_cards = HashSet::new();
    for (i, card) in request.drawn_cards.iter().enumerate() {
        if card.position as usize != i + 1 {
            return Err(invalid(format!(
                "Card {} has position {}, expected {}",
                card.card_name,
                card.position,
                i + 1
            )));
        }
        let index = name_to_index(&card.card_name)?;
        if !seen_cards.insert(index) {
            return Err(invalid(format!("Card {} drawn twice", card.card_name)));
        }
    }

    Ok(spread)
}
