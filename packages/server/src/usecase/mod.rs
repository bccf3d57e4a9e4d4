//! UseCase layer: one struct per operation, wired with the domain traits.

mod authenticate;
mod classify_message;
mod create_report;
pub mod error;
mod get_flagged_messages;
mod get_reports;
mod get_room_history;
mod get_rooms;
mod join_room;
mod leave_room;
mod liveness;
mod send_message;

pub use authenticate::AuthenticateUseCase;
pub use classify_message::ClassifyMessageUseCase;
pub use create_report::CreateReportUseCase;
pub use error::{HistoryError, ReportError, SendMessageError};
pub use get_flagged_messages::GetFlaggedMessagesUseCase;
pub use get_reports::GetReportsUseCase;
pub use get_room_history::GetRoomHistoryUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use leave_room::LeaveRoomUseCase;
pub use liveness::{LivenessMonitor, SweepReport};
pub use send_message::{SendMessageUseCase, SentMessage};
