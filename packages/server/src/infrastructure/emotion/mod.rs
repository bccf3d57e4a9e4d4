//! EmotionClassifier の実装
//!
//! - `huggingface`: HuggingFace Inference API を使った実装

pub mod huggingface;

pub use huggingface::HuggingFaceEmotionClassifier;
