//! Domain layer: value objects, entities, crisis screening rules and the
//! interfaces of the collaborators the relay depends on.

mod auth;
mod crisis;
mod crisis_resources;
mod emotion;
mod entity;
mod error;
mod repository;
mod risk_level;
mod risk_lexicon;
mod room_registry;
mod session;
mod value_object;

pub use auth::TokenValidator;
pub use crisis::{
    CrisisVerdict, EmotionAssessment, KEYWORD_CONFIDENCE, assess_emotions, merge_verdict,
};
pub use crisis_resources::resources_for;
pub use emotion::{EmotionClassifier, EmotionInference, EmotionScore};
pub use entity::{
    AuthorProfile, Identity, NewMessage, NewReport, Report, ReportStatus, ReportedMessage, Role,
    StoredMessage,
};
pub use error::{AuthError, InferenceError, MessagePushError, RepositoryError, ValueObjectError};
pub use repository::MessageStore;
pub use risk_level::RiskLevel;
pub use risk_lexicon::{LexiconMatch, RiskLexicon};
pub use room_registry::{RoomRegistry, RoomSummary};
pub use session::{
    Member, Outbound, PusherChannel, RoomContext, Session, SessionDirectory, SessionHandle,
    SessionState,
};
pub use value_object::{MessageContent, Nickname, RoomId, SessionId, Timestamp, UserId};

#[cfg(test)]
pub use emotion::MockEmotionClassifier;
#[cfg(test)]
pub use repository::MockMessageStore;
