//! Metaplex-style JSON metadata for minting a reading as an NFT.

use crate::domain::model::Reading;
use crate::domain::spreads::SpreadKind;
use crate::utils::error::{Result, TarotError};
use serde::{Deserialize, Serialize};

pub const NFT_SYMBOL: &str = "SOLTAROT";
pub const SELLER_FEE_BASIS_POINTS: u16 = 500;
pub const IPFS_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub seller_fee_basis_points: u16,
    pub attributes: Vec<NftAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

impl NftAttribute {
    fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

pub fn ipfs_uri(cid: &str) -> String {
    format!("{}/{}", IPFS_GATEWAY, cid)
}

impl NftMetadata {
    pub fn for_reading(reading: &Reading, image_cid: &str) -> Result<Self> {
        if image_cid.trim().is_empty() {
            return Err(TarotError::InvalidRequest {
                message: "Image CID cannot be empty".to_string(),
            });
        }
        let spread: SpreadKind = reading.spread_type.parse()?;

        let mut attributes = vec![NftAttribute::new("Spread", spread.name())];
        for card in &reading.drawn_cards {
            attributes.push(NftAttribute::new(
                spread.position_name(card.position),
                format!("{} ({})", card.card_name, card.direction()),
            ));
        }

        Ok(Self {
            name: format!("Tarot Reading #{:03}", reading.id),
            symbol: NFT_SYMBOL.to_string(),
            description: format!("{}: {}", spread.name(), spread.description()),
            image: ipfs_uri(image_cid),
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DrawnCardPayload;
    use chrono::Utc;

    fn reading() -> Reading {
        Reading {
            id: 7,
            wallet_address: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".to_string(),
            spread_type: "careerGrowth".to_string(),
            drawn_cards: vec![
                DrawnCardPayload {
                    card_name: "the-star".to_string(),
                    position: 1,
                    is_reversed: false,
                },
                DrawnCardPayload {
                    card_name: "page-of-cups".to_string(),
                    position: 2,
                    is_reversed: true,
                },
                DrawnCardPayload {
                    card_name: "10-of-pentacles".to_string(),
                    position: 3,
                    is_reversed: false,
                },
            ],
            ai_interpretation: "{}".to_string(),
            image_cid: None,
            mint_address: None,
            is_minted: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_metadata_for_reading() {
        let metadata = NftMetadata::for_reading(&reading(), "bafyimage").unwrap();

        assert_eq!(metadata.name, "Tarot Reading #007");
        assert_eq!(metadata.symbol, "SOLTAROT");
        assert_eq!(metadata.image, "https://gateway.pinata.cloud/ipfs/bafyimage");
        assert_eq!(metadata.seller_fee_basis_points, 500);
        assert_eq!(metadata.attributes.len(), 4);
        assert_eq!(metadata.attributes[0].value, "Career Growth");
        assert_eq!(metadata.attributes[2].trait_type, "Growth opportunity");
        assert_eq!(metadata.attributes[2].value, "page-of-cups (reversed)");
    }

    #[test]
    fn test_metadata_requires_image_cid() {
        assert!(NftMetadata::for_reading(&reading(), " ").is_err());
    }
}
