//! HuggingFace Inference API を使った EmotionClassifier 実装
//!
//! 1 メッセージにつき 1 回だけ呼び出し、リトライはしません。失敗はすべて
//! `EmotionInference::Unavailable` として返し、呼び出し側はキーワード判定に
//! フォールバックします。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::InferenceConfig,
    domain::{EmotionClassifier, EmotionInference, EmotionScore, InferenceError},
};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// The endpoint answers `[[{label, score}, ...]]` for a single input; some
/// deployments return the inner list directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<EmotionScore> {
        match self {
            InferenceResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

/// HuggingFace emotion model client
pub struct HuggingFaceEmotionClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl HuggingFaceEmotionClassifier {
    /// Build a client with the configured request timeout
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_token: config.api_token,
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<EmotionScore>, InferenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status(status.as_u16()));
        }

        let scores = response
            .json::<InferenceResponse>()
            .await
            .map_err(|e| InferenceError::Decode(e.to_string()))?
            .into_scores();

        if scores.is_empty() {
            return Err(InferenceError::Empty);
        }
        Ok(scores)
    }
}

#[async_trait]
impl EmotionClassifier for HuggingFaceEmotionClassifier {
    async fn classify(&self, text: &str) -> EmotionInference {
        match self.request(text).await {
            Ok(scores) => EmotionInference::Scores(scores),
            Err(e) => {
                tracing::warn!("Emotion inference unavailable, using keyword fallback: {}", e);
                EmotionInference::Unavailable(e)
            }
        }
    }
}
