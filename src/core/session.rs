//! Three-question draw session.
//!
//! A [`DrawSession`] is a plain value; every transition consumes it and
//! returns the next value, so a driver (CLI, UI event loop, test) holds one
//! binding and reassigns it:
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use sol_tarot::core::cards::CardIndex;
//! use sol_tarot::core::session::{DrawSession, SessionState};
//! use sol_tarot::core::shuffle::identity_deck;
//! use sol_tarot::domain::spreads::SpreadKind;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut session = DrawSession::new().start(SpreadKind::LoveFortune, identity_deck());
//! for index in [5, 40, 70] {
//!     session = session.pick(CardIndex::new(index).unwrap()).confirm(&mut rng);
//! }
//! assert_eq!(session.state(), SessionState::Completed);
//! ```

use crate::core::cards::CardIndex;
use crate::domain::model::{DrawnCard, ReadingRequest};
use crate::domain::spreads::{SpreadKind, CARDS_PER_SPREAD};
use crate::utils::error::{Result, TarotError};
use rand::Rng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SelectingSpread,
    /// `question` is 0-based.
    AnsweringQuestion { question: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start {
        spread: SpreadKind,
        shuffled_order: Vec<CardIndex>,
    },
    Pick(CardIndex),
    Cancel,
    Confirm,
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawSession {
    spread: Option<SpreadKind>,
    shuffled_order: Vec<CardIndex>,
    current_question: usize,
    drawn_cards: Vec<DrawnCard>,
    used_indices: BTreeSet<CardIndex>,
    tentative: Option<CardIndex>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match self.spread {
            None => SessionState::SelectingSpread,
            Some(_) if self.drawn_cards.len() == CARDS_PER_SPREAD => SessionState::Completed,
            Some(_) => SessionState::AnsweringQuestion {
                question: self.current_question,
            },
        }
    }

    /// Binds the session to a spread and a fan order, discarding any progress.
    #[must_use]
    pub fn start(self, spread: SpreadKind, shuffled_order: Vec<CardIndex>) -> Self {
        tracing::debug!(spread = %spread, "Starting draw session");
        Self {
            spread: Some(spread),
            shuffled_order,
            ..Self::default()
        }
    }

    /// Highlights `index` for the current question, or un-highlights it if it
    /// is already the tentative pick. Only cards laid out in the fan can be
    /// picked; used cards, cards outside the fan and finished sessions ignore
    /// the pick.
    #[must_use]
    pub fn pick(mut self, index: CardIndex) -> Self {
        if !matches!(self.state(), SessionState::AnsweringQuestion { .. }) {
            tracing::debug!(%index, "Ignoring pick outside of a question");
            return self;
        }
        if !self.shuffled_order.contains(&index) {
            tracing::debug!(%index, "Ignoring pick of a card not in the fan");
            return self;
        }
        if self.used_indices.contains(&index) {
            tracing::debug!(%index, "Ignoring pick of a card already drawn");
            return self;
        }

        self.tentative = if self.tentative == Some(index) {
            None
        } else {
            Some(index)
        };
        self
    }

    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.tentative = None;
        self
    }

    /// Commits the tentative pick with a fresh upright/reversed coin flip.
    #[must_use]
    pub fn confirm<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let Some(index) = self.tentative.take() else {
            return self;
        };

        let is_reversed = rng.gen_bool(0.5);
        let position = (self.current_question + 1) as u8;
        let card = DrawnCard::new(index, position, is_reversed);
        tracing::debug!(
            card = %card.canonical_name,
            position,
            is_reversed,
            "Card drawn"
        );

        self.drawn_cards.push(card);
        self.used_indices.insert(index);
        if self.current_question < CARDS_PER_SPREAD - 1 {
            self.current_question += 1;
        }
        self
    }

    #[must_use]
    pub fn reset(self) -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reduce<R: Rng + ?Sized>(self, event: SessionEvent, rng: &mut R) -> Self {
        match event {
            SessionEvent::Start {
                spread,
                shuffled_order,
            } => self.start(spread, shuffled_order),
            SessionEvent::Pick(index) => self.pick(index),
            SessionEvent::Cancel => self.cancel(),
            SessionEvent::Confirm => self.confirm(rng),
            SessionEvent::Reset => self.reset(),
        }
    }

    pub fn spread(&self) -> Option<SpreadKind> {
        self.spread
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    /// Prompt for the question being answered, if any.
    pub fn question_text(&self) -> Option<&'static str> {
        match self.state() {
            SessionState::AnsweringQuestion { question } => {
                self.spread.map(|spread| spread.questions()[question])
            }
            _ => None,
        }
    }

    pub fn drawn_cards(&self) -> &[DrawnCard] {
        &self.drawn_cards
    }

    pub fn tentative(&self) -> Option<CardIndex> {
        self.tentative
    }

    pub fn is_used(&self, index: CardIndex) -> bool {
        self.used_indices.contains(&index)
    }

    pub fn shuffled_order(&self) -> &[CardIndex] {
        &self.shuffled_order
    }

    /// Card laid out at `fan_position` in the shuffled fan.
    pub fn card_at(&self, fan_position: usize) -> Option<CardIndex> {
        self.shuffled_order.get(fan_position).copied()
    }

    /// Payload for the reading service; only a completed session has one.
    pub fn to_request(&self, wallet_address: &str) -> Result<ReadingRequest> {
        let (SessionState::Completed, Some(spread)) = (self.state(), self.spread) else {
            return Err(TarotError::InvalidRequest {
                message: format!(
                    "Draw session is not complete ({} of {} cards drawn)",
                    self.drawn_cards.len(),
                    CARDS_PER_SPREAD
                ),
            });
        };

        Ok(ReadingRequest {
            wallet_address: wallet_address.to_string(),
            spread_type: spread.key().to_string(),
            drawn_cards: self.drawn_cards.iter().map(DrawnCard::to_payload).collect(),
        })
    }
}
