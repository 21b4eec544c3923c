//! Conversion between flat deck positions (0..=77) and canonical card names.
//!
//! Layout of the deck:
//!
//! | indices | cards                                   |
//! |---------|-----------------------------------------|
//! | 0..=21  | major arcana, `the-fool` .. `the-world` |
//! | 22..=35 | wands: 1..10, page, knight, queen, king |
//! | 36..=49 | cups                                    |
//! | 50..=63 | swords                                  |
//! | 64..=77 | pentacles                               |

use crate::utils::error::{Result, TarotError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const DECK_SIZE: usize = 78;
pub const MAJOR_ARCANA_COUNT: usize = 22;
const SUIT_SIZE: usize = 14;

pub const IMAGE_ROOT: &str = "/src/assets/WaiteTarot";

const MAJOR_NAMES: [&str; MAJOR_ARCANA_COUNT] = [
    "the-fool",
    "the-magician",
    "the-high-priestess",
    "the-empress",
    "the-emperor",
    "the-hierophant",
    "the-lovers",
    "the-chariot",
    "strength",
    "the-hermit",
    "wheel-of-fortune",
    "justice",
    "the-hanged-man",
    "death",
    "temperance",
    "the-devil",
    "the-tower",
    "the-star",
    "the-moon",
    "the-sun",
    "judgement",
    "the-world",
];

/// A position in the unshuffled deck. Always `< DECK_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardIndex(u8);

impl CardIndex {
    pub const FOOL: CardIndex = CardIndex(0);

    pub fn new(index: usize) -> Result<Self> {
        if index < DECK_SIZE {
            Ok(Self(index as u8))
        } else {
            Err(TarotError::InvalidIndex { index })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Every index in deck order.
    pub fn all() -> impl Iterator<Item = CardIndex> {
        (0..DECK_SIZE as u8).map(CardIndex)
    }

    pub fn card(self) -> Card {
        let i = self.as_usize();
        if i < MAJOR_ARCANA_COUNT {
            return Card::Major { number: self.0 };
        }
        let suit = Suit::ALL[(i - MAJOR_ARCANA_COUNT) / SUIT_SIZE];
        let ordinal = i - suit.base_offset();
        Card::Minor {
            suit,
            rank: Rank::from_ordinal(ordinal),
        }
    }

    pub fn name(self) -> String {
        self.card().to_string()
    }

    pub fn image_path(self) -> String {
        self.card().image_path()
    }
}

impl TryFrom<u8> for CardIndex {
    type Error = TarotError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value as usize)
    }
}

impl From<CardIndex> for u8 {
    fn from(index: CardIndex) -> u8 {
        index.0
    }
}

impl fmt::Display for CardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Pentacles];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Wands => "wands",
            Suit::Cups => "cups",
            Suit::Swords => "swords",
            Suit::Pentacles => "pentacles",
        }
    }

    fn from_name(name: &str) -> Option<Suit> {
        Suit::ALL.into_iter().find(|suit| suit.name() == name)
    }

    /// Index of the card just before this suit's ace, so `ace = base + 1`.
    pub fn base_offset(self) -> usize {
        match self {
            Suit::Wands => 21,
            Suit::Cups => 35,
            Suit::Swords => 49,
            Suit::Pentacles => 63,
        }
    }

    fn image_prefix(self) -> char {
        match self {
            Suit::Wands => 'w',
            Suit::Cups => 'c',
            Suit::Swords => 's',
            Suit::Pentacles => 'p',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Pip cards 1 (ace) through 10.
    Number(u8),
    Page,
    Knight,
    Queen,
    King,
}

impl Rank {
    const COURTS: [Rank; 4] = [Rank::Page, Rank::Knight, Rank::Queen, Rank::King];

    /// `ordinal` runs 1..=14 within a suit.
    fn from_ordinal(ordinal: usize) -> Rank {
        if ordinal <= 10 {
            Rank::Number(ordinal as u8)
        } else {
            Rank::COURTS[ordinal - 11]
        }
    }

    fn ordinal(self) -> usize {
        match self {
            Rank::Number(n) => n as usize,
            Rank::Page => 11,
            Rank::Knight => 12,
            Rank::Queen => 13,
            Rank::King => 14,
        }
    }

    fn court_name(self) -> Option<&'static str> {
        match self {
            Rank::Number(_) => None,
            Rank::Page => Some("page"),
            Rank::Knight => Some("knight"),
            Rank::Queen => Some("queen"),
            Rank::King => Some("king"),
        }
    }

    fn image_suffix(self) -> String {
        match self {
            Rank::Number(n) => n.to_string(),
            Rank::Page => "p".to_string(),
            Rank::Knight => "n".to_string(),
            Rank::Queen => "q".to_string(),
            Rank::King => "k".to_string(),
        }
    }

    fn parse(token: &str) -> Option<Rank> {
        if let Some(court) = Rank::COURTS.into_iter().find(|r| r.court_name() == Some(token)) {
            return Some(court);
        }
        let n: u8 = token.parse().ok()?;
        // "01" would alias "1", so only the canonical spelling is accepted
        if (1..=10).contains(&n) && n.to_string() == token {
            Some(Rank::Number(n))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    Major { number: u8 },
    Minor { suit: Suit, rank: Rank },
}

impl Card {
    pub fn index(self) -> CardIndex {
        match self {
            Card::Major { number } => CardIndex(number),
            Card::Minor { suit, rank } => CardIndex((suit.base_offset() + rank.ordinal()) as u8),
        }
    }

    pub fn suit(self) -> Option<Suit> {
        match self {
            Card::Major { .. } => None,
            Card::Minor { suit, .. } => Some(suit),
        }
    }

    pub fn is_major(self) -> bool {
        matches!(self, Card::Major { .. })
    }

    pub fn image_path(self) -> String {
        let file = match self {
            Card::Major { number } => format!("m {}", number),
            Card::Minor { suit, rank } => format!("{} {}", suit.image_prefix(), rank.image_suffix()),
        };
        format!("{}/{}.jpg", IMAGE_ROOT, file)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Card::Major { number } => f.write_str(MAJOR_NAMES[number as usize]),
            Card::Minor { suit, rank } => match rank.court_name() {
                Some(court) => write!(f, "{}-of-{}", court, suit.name()),
                None => write!(f, "{}-of-{}", rank.ordinal(), suit.name()),
            },
        }
    }
}

fn minor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+|page|knight|queen|king)-of-(wands|cups|swords|pentacles)$")
            .expect("minor arcana pattern is valid")
    })
}

impl FromStr for Card {
    type Err = TarotError;

    fn from_str(name: &str) -> Result<Self> {
        if let Some(number) = MAJOR_NAMES.iter().position(|major| *major == name) {
            return Ok(Card::Major { number: number as u8 });
        }

        let unknown = || TarotError::UnknownCardName {
            name: name.to_string(),
        };
        let caps = minor_pattern().captures(name).ok_or_else(unknown)?;
        let rank = Rank::parse(&caps[1]).ok_or_else(unknown)?;
        let suit = Suit::from_name(&caps[2]).ok_or_else(unknown)?;
        Ok(Card::Minor { suit, rank })
    }
}

pub fn index_to_name(index: usize) -> Result<String> {
    CardIndex::new(index).map(CardIndex::name)
}

pub fn name_to_index(name: &str) -> Result<CardIndex> {
    name.parse::<Card>().map(Card::index)
}

pub fn index_to_image_path(index: usize) -> Result<String> {
    CardIndex::new(index).map(CardIndex::image_path)
}

/// Like [`index_to_name`], but renders `the-fool` for out-of-range input.
pub fn index_to_name_or_fool(index: usize) -> String {
    index_to_name(index).unwrap_or_else(|e| {
        tracing::warn!("{}; rendering the-fool instead", e);
        CardIndex::FOOL.name()
    })
}

/// Like [`name_to_index`], but resolves unknown names to index 0.
pub fn name_to_index_or_fool(name: &str) -> CardIndex {
    name_to_index(name).unwrap_or_else(|e| {
        tracing::warn!("{}; using index 0 instead", e);
        CardIndex::FOOL
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_arcana_names() {
        assert_eq!(index_to_name(0).unwrap(), "the-fool");
        assert_eq!(index_to_name(8).unwrap(), "strength");
        assert_eq!(index_to_name(10).unwrap(), "wheel-of-fortune");
        assert_eq!(index_to_name(21).unwrap(), "the-world");
    }

    #[test]
    fn test_wands_names() {
        assert_eq!(index_to_name(22).unwrap(), "1-of-wands");
        assert_eq!(index_to_name(31).unwrap(), "10-of-wands");
        assert_eq!(index_to_name(32).unwrap(), "page-of-wands");
        assert_eq!(index_to_name(33).unwrap(), "knight-of-wands");
        assert_eq!(index_to_name(34).unwrap(), "queen-of-wands");
        assert_eq!(index_to_name(35).unwrap(), "king-of-wands");
    }

    #[test]
    fn test_suit_boundaries() {
        assert_eq!(index_to_name(36).unwrap(), "1-of-cups");
        assert_eq!(index_to_name(49).unwrap(), "king-of-cups");
        assert_eq!(index_to_name(50).unwrap(), "1-of-swords");
        assert_eq!(index_to_name(63).unwrap(), "king-of-swords");
        assert_eq!(index_to_name(64).unwrap(), "1-of-pentacles");
        assert_eq!(index_to_name(77).unwrap(), "king-of-pentacles");
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        match index_to_name(78) {
            Err(TarotError::InvalidIndex { index }) => assert_eq!(index, 78),
            other => panic!("expected InvalidIndex, got {:?}", other),
        }
        assert!(index_to_image_path(usize::MAX).is_err());
        assert!(CardIndex::try_from(200u8).is_err());
    }

    #[test]
    fn test_name_to_index() {
        assert_eq!(name_to_index("the-fool").unwrap().get(), 0);
        assert_eq!(name_to_index("judgement").unwrap().get(), 20);
        assert_eq!(name_to_index("3-of-cups").unwrap().get(), 38);
        assert_eq!(name_to_index("queen-of-swords").unwrap().get(), 62);
        assert_eq!(name_to_index("king-of-pentacles").unwrap().get(), 77);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        for name in [
            "",
            "the-joker",
            "two-of-cups",
            "11-of-wands",
            "0-of-cups",
            "01-of-cups",
            "x-3-of-cups",
            "3-of-cups-extra",
            "page-of-coins",
            "The-Fool",
        ] {
            assert!(
                matches!(name_to_index(name), Err(TarotError::UnknownCardName { .. })),
                "{:?} should not resolve",
                name
            );
        }
    }

    #[test]
    fn test_image_paths() {
        assert_eq!(index_to_image_path(0).unwrap(), "/src/assets/WaiteTarot/m 0.jpg");
        assert_eq!(index_to_image_path(21).unwrap(), "/src/assets/WaiteTarot/m 21.jpg");
        assert_eq!(index_to_image_path(22).unwrap(), "/src/assets/WaiteTarot/w 1.jpg");
        assert_eq!(index_to_image_path(32).unwrap(), "/src/assets/WaiteTarot/w p.jpg");
        assert_eq!(index_to_image_path(47).unwrap(), "/src/assets/WaiteTarot/c n.jpg");
        assert_eq!(index_to_image_path(62).unwrap(), "/src/assets/WaiteTarot/s q.jpg");
        assert_eq!(index_to_image_path(77).unwrap(), "/src/assets/WaiteTarot/p k.jpg");
    }

    #[test]
    fn test_lenient_lookups_fall_back_to_the_fool() {
        assert_eq!(index_to_name_or_fool(99), "the-fool");
        assert_eq!(index_to_name_or_fool(5), "the-hierophant");
        assert_eq!(name_to_index_or_fool("ace-of-cups"), CardIndex::FOOL);
        assert_eq!(name_to_index_or_fool("2-of-cups").get(), 37);
    }

    #[test]
    fn test_card_index_serde_rejects_out_of_range() {
        let index: CardIndex = serde_json::from_str("40").unwrap();
        assert_eq!(index.get(), 40);
        assert!(serde_json::from_str::<CardIndex>("78").is_err());
        assert_eq!(serde_json::to_string(&index).unwrap(), "40");
    }
}
