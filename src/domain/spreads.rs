use crate::utils::error::{Result, TarotError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CARDS_PER_SPREAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Love,
    Money,
    Health,
    Overall,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Love,
        Category::Money,
        Category::Health,
        Category::Overall,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Love => "love",
            Category::Money => "money",
            Category::Health => "health",
            Category::Overall => "overall",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Love => "Love & Relationships",
            Category::Money => "Money & Career",
            Category::Health => "Health & Self-care",
            Category::Overall => "General Fortune",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Love => "Readings about love, relationships and compatibility",
            Category::Money => "Readings about finances, work and success",
            Category::Health => "Readings about health, energy and daily habits",
            Category::Overall => "Readings about the overall flow of life and its opportunities",
        }
    }
}

impl FromStr for Category {
    type Err = TarotError;

    fn from_str(key: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| TarotError::InvalidRequest {
                message: format!("Unknown spread category: {:?}", key),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A three-question spread. Serialized by its key, e.g. `"loveFortune"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpreadKind {
    LoveFortune,
    CrushSomething,
    RelationshipCompatibility,
    BreakupReunion,
    MoneyFortune,
    CareerChoice,
    CareerGrowth,
    WealthFlow,
    HealthFortune,
    EnergyState,
    LifestyleAdvice,
    MentalStability,
    TodayMonthFortune,
    OverallFlow,
    OpportunityChallenge,
    LifeTurningPoint,
}

struct SpreadInfo {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    category: Category,
    questions: [&'static str; CARDS_PER_SPREAD],
    positions: [&'static str; CARDS_PER_SPREAD],
    position_details: [&'static str; CARDS_PER_SPREAD],
}

// Same order as the `SpreadKind` variants.
static SPREADS: [SpreadInfo; 16] = [
    SpreadInfo {
        key: "loveFortune",
        name: "Love Fortune",
        description: "Where your love life stands and where it is heading",
        category: Category::Love,
        questions: [
            "Think about your current love worries and draw the first card",
            "Next, let's see how your luck in love will unfold",
            "Finally, let's see what it takes for this love to work out",
        ],
        positions: ["Current love energy", "Romantic opportunity", "Love advice"],
        position_details: [
            "your current romantic energy and charm",
            "romantic opportunities and chances of meeting someone ahead",
            "the universe's advice and direction for fulfilling love",
        ],
    },
    SpreadInfo {
        key: "crushSomething",
        name: "Crush / Situationship",
        description: "The other person's feelings and where this could go",
        category: Category::Love,
        questions: [
            "Hold your feelings for that person in mind and draw the first card",
            "Next, let's check how that person sees you",
            "Finally, let's find out whether this can grow",
        ],
        positions: ["My heart", "Their heart", "Relationship growth"],
        position_details: [
            "your true feelings toward the other person",
            "how the other person thinks about you",
            "the chance this relationship develops and where it heads",
        ],
    },
    SpreadInfo {
        key: "relationshipCompatibility",
        name: "Relationship Compatibility",
        description: "Compatibility in love, friendship and fate",
        category: Category::Love,
        questions: [
            "Think about your current state of mind and draw the first card",
            "Next, let's look into the other person's heart",
            "Finally, let's check how well you two match",
        ],
        positions: ["My state", "The other person", "Compatibility"],
        position_details: [
            "your current state and energy in this relationship",
            "the other person's nature and attitude toward the relationship",
            "how well you match and how the relationship can grow in harmony",
        ],
    },
    SpreadInfo {
        key: "breakupReunion",
        name: "Breakup / Reunion",
        description: "The breakup and the chance of getting back together",
        category: Category::Love,
        questions: [
            "Think about the situation and your feelings now and draw the first card",
            "Next, let's look back on your past with that person",
            "Finally, let's see what fate has in store",
        ],
        positions: ["Current situation", "Past relationship", "Future direction"],
        position_details: [
            "the breakup as it stands and your emotional state",
            "what the past relationship meant and the ties that remain",
            "the chance of reunion and where the relationship goes from here",
        ],
    },
    SpreadInfo {
        key: "moneyFortune",
        name: "Money Fortune",
        description: "Your finances and the flow of money",
        category: Category::Money,
        questions: [
            "Think about your money worries and draw the first card",
            "Next, let's see whether a chance for income is coming",
            "Finally, let's get advice on managing your money",
        ],
        positions: ["Current finances", "Flow of money", "Financial advice"],
        position_details: [
            "your current financial state and energy around money",
            "how money flows in and out and the opportunities in it",
            "the universe's advice for managing money better",
        ],
    },
    SpreadInfo {
        key: "careerChoice",
        name: "Career Choice",
        description: "The best job and career direction",
        category: Category::Money,
        questions: [
            "Think about your career dilemma and draw the first card",
            "Next, let's find out your abilities and aptitude",
            "Finally, let's find the choice that suits you",
        ],
        positions: ["Career dilemma", "My aptitude", "Best choice"],
        position_details: [
            "the core of your worry about work or career path",
            "your real abilities, aptitude and natural talent",
            "the most fitting direction and advice for choosing it",
        ],
    },
    SpreadInfo {
        key: "careerGrowth",
        name: "Career Growth",
        description: "Professional development and growth strategy",
        category: Category::Money,
        questions: [
            "Think about your current job situation and draw the first card",
            "Next, let's look for opportunities to grow",
            "Finally, let's confirm the direction to develop in",
        ],
        positions: ["Current career", "Growth opportunity", "Development strategy"],
        position_details: [
            "your current professional position and growth",
            "growth opportunities and challenges ahead",
            "concrete strategy and methods for advancing your career",
        ],
    },
    SpreadInfo {
        key: "wealthFlow",
        name: "Wealth Flow",
        description: "Where money comes from and how to grow it",
        category: Category::Money,
        questions: [
            "Think about your fortune with wealth and draw the first card",
            "Next, let's trace where money will come from",
            "Finally, let's learn how to grow your money",
        ],
        positions: ["Wealth energy", "Income path", "Growth method"],
        position_details: [
            "the wealth energy around you right now",
            "the paths and ways money can come in",
            "how to increase your wealth and build prosperity",
        ],
    },
    SpreadInfo {
        key: "healthFortune",
        name: "Health Fortune",
        description: "Physical and mental wellbeing",
        category: Category::Health,
        questions: [
            "Think about your current health and draw the first card",
            "Next, let's check the balance between body and mind",
            "Finally, let's get advice on taking care of your health",
        ],
        positions: ["Current health", "Body-mind balance", "Health advice"],
        position_details: [
            "your current physical and mental health",
            "the balance of body and mind and the flow of energy",
            "the universe's advice for a healthier life",
        ],
    },
    SpreadInfo {
        key: "energyState",
        name: "Energy State",
        description: "Your energy level and how to recharge",
        category: Category::Health,
        questions: [
            "Think about your energy lately and draw the first card",
            "Next, let's find out why you feel tired",
            "Finally, let's learn how to recharge",
        ],
        positions: ["Energy level", "What drains you", "How to recharge"],
        position_details: [
            "your overall energy level right now",
            "the main causes draining your energy",
            "the best way to recover and recharge",
        ],
    },
    SpreadInfo {
        key: "lifestyleAdvice",
        name: "Lifestyle Advice",
        description: "Improvements for a better daily life",
        category: Category::Health,
        questions: [
            "Think about your daily routine and draw the first card",
            "Next, let's find what needs to change",
            "Finally, let's get advice for a better life",
        ],
        positions: ["Current lifestyle", "Points to improve", "Lifestyle advice"],
        position_details: [
            "the state of your daily patterns and habits",
            "what needs to change and can be improved",
            "concrete practices for a better life",
        ],
    },
    SpreadInfo {
        key: "mentalStability",
        name: "Mental Stability",
        description: "Peace of mind and stress management",
        category: Category::Health,
        questions: [
            "Think about your state of mind and draw the first card",
            "Next, let's look at the causes of stress and worry",
            "Finally, let's learn how to find peace of mind",
        ],
        positions: ["State of mind", "Stress", "Inner peace"],
        position_details: [
            "your current mental and emotional state",
            "the causes of stress and anxiety",
            "how to find peace of mind",
        ],
    },
    SpreadInfo {
        key: "todayMonthFortune",
        name: "Today / This Month",
        description: "The overall fortune for the short term",
        category: Category::Overall,
        questions: [
            "Keep today or this month in mind and draw the first card",
            "Next, let's check what to watch out for",
            "Finally, let's learn how to get a good outcome",
        ],
        positions: ["Overall flow", "Opportunities and cautions", "Advice for success"],
        position_details: [
            "the overall flow of today or this month",
            "opportunities not to miss and things to be careful about",
            "how to act for the best result",
        ],
    },
    SpreadInfo {
        key: "overallFlow",
        name: "Overall Flow",
        description: "The big currents and direction of your life",
        category: Category::Overall,
        questions: [
            "Think about the flow of your life lately and draw the first card",
            "Next, let's see what changes lie ahead",
            "Finally, let's find how to ride the flow",
        ],
        positions: ["Current flow", "Coming changes", "Using the flow"],
        position_details: [
            "the general flow and direction of your life now",
            "changes and new phases ahead",
            "how to make the most of this flow",
        ],
    },
    SpreadInfo {
        key: "opportunityChallenge",
        name: "Opportunity and Challenge",
        description: "Opportunities ahead and challenges to overcome",
        category: Category::Overall,
        questions: [
            "Think about the opportunities ahead and draw the first card",
            "Next, let's check in advance what difficulties may come",
            "Finally, let's learn the strategy for success",
        ],
        positions: ["Coming opportunity", "Challenge to face", "Strategy for success"],
        position_details: [
            "good opportunities coming your way",
            "challenges and trials to overcome",
            "how to seize the opportunity and overcome the challenge",
        ],
    },
    SpreadInfo {
        key: "lifeTurningPoint",
        name: "Life Turning Point",
        description: "A message from the universe for a new beginning",
        category: Category::Overall,
        questions: [
            "Look back on your life so far and draw the first card",
            "Next, let's check for signs of change",
            "Finally, let's receive a message for a new start",
        ],
        positions: ["Where I stand", "Signs of a turning point", "New beginning"],
        position_details: [
            "where you stand in life right now",
            "signs of change and omens of a turning point",
            "the universe's message and direction for a new start",
        ],
    },
];

impl SpreadKind {
    pub const ALL: [SpreadKind; 16] = [
        SpreadKind::LoveFortune,
        SpreadKind::CrushSomething,
        SpreadKind::RelationshipCompatibility,
        SpreadKind::BreakupReunion,
        SpreadKind::MoneyFortune,
        SpreadKind::CareerChoice,
        SpreadKind::CareerGrowth,
        SpreadKind::WealthFlow,
        SpreadKind::HealthFortune,
        SpreadKind::EnergyState,
        SpreadKind::LifestyleAdvice,
        SpreadKind::MentalStability,
        SpreadKind::TodayMonthFortune,
        SpreadKind::OverallFlow,
        SpreadKind::OpportunityChallenge,
        SpreadKind::LifeTurningPoint,
    ];

    fn info(self) -> &'static SpreadInfo {
        &SPREADS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    pub fn category(self) -> Category {
        self.info().category
    }

    pub fn questions(self) -> &'static [&'static str; CARDS_PER_SPREAD] {
        &self.info().questions
    }

    pub fn position_names(self) -> &'static [&'static str; CARDS_PER_SPREAD] {
        &self.info().positions
    }

    /// Name of a 1-based card position, or `"Position n"` outside the spread.
    pub fn position_name(self, position: u8) -> String {
        (position as usize)
            .checked_sub(1)
            .and_then(|i| self.info().positions.get(i))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Position {}", position))
    }

    /// Describes what each position stands for, for the interpretation prompt.
    pub fn prompt_outline(self) -> String {
        let info = self.info();
        let mut outline = format!("This is a three-card {} spread:", info.name);
        for (i, (position, detail)) in info.positions.iter().zip(info.position_details).enumerate() {
            outline.push_str(&format!("\n- Card {} ({}): {}", i + 1, position, detail));
        }
        outline
    }

    pub fn by_category(category: Category) -> Vec<SpreadKind> {
        SpreadKind::ALL
            .into_iter()
            .filter(|spread| spread.category() == category)
            .collect()
    }
}

impl FromStr for SpreadKind {
    type Err = TarotError;

    fn from_str(key: &str) -> Result<Self> {
        SpreadKind::ALL
            .into_iter()
            .find(|spread| spread.key() == key)
            .ok_or_else(|| TarotError::UnknownSpread {
                key: key.to_string(),
            })
    }
}

impl fmt::Display for SpreadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
