use crate::core::cards::DECK_SIZE;
use crate::domain::spreads::CARDS_PER_SPREAD;
use crate::utils::error::{Result, TarotError};
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::collections::HashSet;

#[derive(Debug, Clone, Parser)]
#[command(name = "sol-tarot")]
#[command(about = "Draw three-card tarot readings and keep them by wallet")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the reading ledger (overrides storage.path)
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the available spreads and their questions
    Spreads {
        /// Only show one category (love, money, health, overall)
        #[arg(long)]
        category: Option<String>,
    },

    /// Look up a card by deck index or canonical name
    Card { card: String },

    /// Draw three cards for a spread and request an interpretation
    Draw {
        #[arg(long)]
        spread: String,

        #[arg(long)]
        wallet: String,

        /// Fan positions (0-77) to pick, one per question; random when omitted
        #[arg(long, value_delimiter = ',')]
        picks: Vec<usize>,

        /// Seed for a reproducible shuffle and orientation
        #[arg(long)]
        seed: Option<u64>,

        /// Print the drawn cards without contacting the interpreter or store
        #[arg(long)]
        offline: bool,
    },

    /// List stored readings for a wallet, newest first
    History {
        #[arg(long)]
        wallet: String,
    },

    /// Show one stored reading
    Show {
        #[arg(long)]
        id: u64,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.data_dir {
            validation::validate_path("data_dir", dir)?;
        }

        match &self.command {
            Command::Draw { wallet, picks, .. } => {
                validation::validate_wallet_address("wallet", wallet)?;
                validate_picks(picks)
            }
            Command::History { wallet } => validation::validate_wallet_address("wallet", wallet),
            _ => Ok(()),
        }
    }
}

fn validate_picks(picks: &[usize]) -> Result<()> {
    if picks.is_empty() {
        return Ok(());
    }
    if picks.len() != CARDS_PER_SPREAD {
        return Err(TarotError::InvalidConfigValueError {
            field: "picks".to_string(),
            value: format!("{:?}", picks),
            reason: format!("Expected exactly {} fan positions", CARDS_PER_SPREAD),
        });
    }

    let mut seen = HashSet::new();
    for &pick in picks {
        validation::validate_range("picks", pick, 0, DECK_SIZE - 1)?;
        if !seen.insert(pick) {
            return Err(TarotError::InvalidConfigValueError {
                field: "picks".to_string(),
                value: pick.to_string(),
                reason: "Each fan position can only be picked once".to_string(),
            });
        }
    }
    Ok(())
}
