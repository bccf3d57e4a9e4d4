//! Severity-tiered keyword table used as the deterministic safety floor.

use super::RiskLevel;

const CRITICAL_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "better off dead",
    "no reason to live",
    "goodbye world",
    "final goodbye",
];

const HIGH_PHRASES: &[&str] = &[
    "self harm",
    "cut myself",
    "hurt myself",
    "overdose",
    "jump off",
    "hang myself",
    "planning to",
    "going to hurt",
];

const MEDIUM_PHRASES: &[&str] = &[
    "hopeless",
    "worthless",
    "cant go on",
    "no point",
    "give up",
    "ending it",
    "rather be dead",
    "disappear forever",
];

const LOW_PHRASES: &[&str] = &[
    "depressed",
    "anxious",
    "scared",
    "alone",
    "struggling",
    "hard time",
    "overwhelming",
    "cant cope",
];

/// Result of scanning one text against the lexicon
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexiconMatch {
    /// Highest tier with at least one hit
    pub level: RiskLevel,
    /// Every phrase that matched, most severe tier first
    pub phrases: Vec<&'static str>,
}

/// Keyword table, tiers ordered from most to least severe
#[derive(Debug, Clone)]
pub struct RiskLexicon {
    tiers: Vec<(RiskLevel, &'static [&'static str])>,
}

impl Default for RiskLexicon {
    fn default() -> Self {
        Self {
            tiers: vec![
                (RiskLevel::Critical, CRITICAL_PHRASES),
                (RiskLevel::High, HIGH_PHRASES),
                (RiskLevel::Medium, MEDIUM_PHRASES),
                (RiskLevel::Low, LOW_PHRASES),
            ],
        }
    }
}

impl RiskLexicon {
    /// Case-insensitive substring scan over all four tiers.
    pub fn scan(&self, text: &str) -> LexiconMatch {
        let lowered = text.to_lowercase();
        let mut result = LexiconMatch::default();

        for (level, phrases) in &self.tiers {
            for phrase in phrases.iter().copied().filter(|p| lowered.contains(p)) {
                result.phrases.push(phrase);
                result.level = result.level.max(*level);
            }
        }

        result
    }
}
