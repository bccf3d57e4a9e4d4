//! Crisis verdict and the merge of emotion scores with keyword hits.
//!
//! The keyword tier is a floor: remote scores may raise the final level but
//! never lower it.

use super::{EmotionScore, LexiconMatch, RiskLevel};

/// Confidence reported when only keywords decided the verdict
pub const KEYWORD_CONFIDENCE: f64 = 0.7;

const HIGH_RISK_EMOTIONS: &[&str] = &["sadness", "fear", "anger"];
const MEDIUM_RISK_EMOTIONS: &[&str] = &["disgust", "surprise"];

/// Risk verdict for one message
#[derive(Debug, Clone, PartialEq)]
pub struct CrisisVerdict {
    pub risk_level: RiskLevel,
    /// In `[0, 1]`
    pub confidence: f64,
    pub triggered_keywords: Vec<String>,
    /// Labels returned by the remote classifier, when it ran
    pub detected_emotions: Option<Vec<String>>,
}

impl CrisisVerdict {
    pub fn is_crisis(&self) -> bool {
        self.risk_level != RiskLevel::None
    }
}

/// Risk candidate derived from remote emotion scores
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionAssessment {
    pub candidate: RiskLevel,
    pub max_score: f64,
    pub labels: Vec<String>,
}

/// Scan scores in order without short-circuiting.
///
/// A high-risk emotion above 0.5 sets the candidate to `High` (above 0.7) or
/// `Medium`; a medium-risk emotion above 0.6 only lifts a `None` candidate to
/// `Low`.
pub fn assess_emotions(scores: &[EmotionScore]) -> EmotionAssessment {
    let mut candidate = RiskLevel::None;
    let mut max_score: f64 = 0.0;

    for emotion in scores {
        max_score = max_score.max(emotion.score);

        let label = emotion.label.as_str();
        if HIGH_RISK_EMOTIONS.contains(&label) && emotion.score > 0.5 {
            candidate = if emotion.score > 0.7 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };
        } else if MEDIUM_RISK_EMOTIONS.contains(&label)
            && emotion.score > 0.6
            && candidate == RiskLevel::None
        {
            candidate = RiskLevel::Low;
        }
    }

    EmotionAssessment {
        candidate,
        max_score: max_score.clamp(0.0, 1.0),
        labels: scores.iter().map(|e| e.label.clone()).collect(),
    }
}

/// Combine the optional remote assessment with the keyword scan.
pub fn merge_verdict(remote: Option<EmotionAssessment>, keywords: LexiconMatch) -> CrisisVerdict {
    let triggered_keywords: Vec<String> =
        keywords.phrases.iter().map(|p| p.to_string()).collect();

    match remote {
        Some(assessment) => CrisisVerdict {
            risk_level: assessment.candidate.max(keywords.level),
            confidence: assessment.max_score,
            triggered_keywords,
            detected_emotions: Some(assessment.labels),
        },
        None => CrisisVerdict {
            risk_level: keywords.level,
            confidence: if triggered_keywords.is_empty() {
                0.0
            } else {
                KEYWORD_CONFIDENCE
            },
            triggered_keywords,
            detected_emotions: None,
        },
    }
}
