//! 感情推定コラボレータのインターフェース
//!
//! 推定結果は「スコアあり」か「利用不可」のどちらかで返し、失敗もマージ処理の
//! 一分岐として扱えるようにしています。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::InferenceError;

/// One label/score pair returned by the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Outcome of one inference call
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionInference {
    /// Non-empty scores, in the order the endpoint returned them
    Scores(Vec<EmotionScore>),
    /// Endpoint failed, timed out or returned nothing usable
    Unavailable(InferenceError),
}

/// Remote emotion classifier
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify `text`. Must not panic; every failure maps to `Unavailable`.
    async fn classify(&self, text: &str) -> EmotionInference;
}
