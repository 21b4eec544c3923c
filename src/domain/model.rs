use crate::core::cards::CardIndex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card committed to one question slot of a draw session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub card_index: CardIndex,
    pub canonical_name: String,
    /// 1-based question ordinal.
    pub position: u8,
    pub is_reversed: bool,
}

impl DrawnCard {
    pub fn new(card_index: CardIndex, position: u8, is_reversed: bool) -> Self {
        Self {
            card_index,
            canonical_name: card_index.name(),
            position,
            is_reversed,
        }
    }

    pub fn to_payload(&self) -> DrawnCardPayload {
        DrawnCardPayload {
            card_name: self.canonical_name.clone(),
            position: self.position,
            is_reversed: self.is_reversed,
        }
    }
}

/// Per-card shape exchanged with the reading service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCardPayload {
    pub card_name: String,
    pub position: u8,
    pub is_reversed: bool,
}

impl DrawnCardPayload {
    pub fn direction(&self) -> &'static str {
        if self.is_reversed {
            "reversed"
        } else {
            "upright"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRequest {
    pub wallet_address: String,
    pub spread_type: String,
    pub drawn_cards: Vec<DrawnCardPayload>,
}

/// A reading as handed to the store, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub wallet_address: String,
    pub spread_type: String,
    pub drawn_cards: Vec<DrawnCardPayload>,
    pub ai_interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: u64,
    pub wallet_address: String,
    pub spread_type: String,
    pub drawn_cards: Vec<DrawnCardPayload>,
    pub ai_interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_address: Option<String>,
    #[serde(default)]
    pub is_minted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

/// Structured form of the interpretation text the model is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub full_message: String,
    #[serde(default)]
    pub cards: Vec<CardInterpretation>,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInterpretation {
    pub position: String,
    pub card_name: String,
    pub direction: String,
    pub interpretation: String,
}

impl Interpretation {
    /// Parses stored interpretation text; `None` when it is free-form prose.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(strip_code_fence(text)).ok()
    }
}

/// Returns the body of a ```json fenced block, or the trimmed text as-is.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}
