//! Repository trait 定義
//!
//! ドメイン層が必要とするメッセージストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    AuthorProfile, NewMessage, NewReport, Report, RepositoryError, RiskLevel, RoomId,
    StoredMessage, UserId,
};

/// Message Store trait
///
/// メッセージと通報の id・タイムスタンプはストアが採番する。
/// 取得したメッセージには投稿者の表示情報（profile）が付与される。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを保存し、採番済みのレコードを返す
    async fn append(&self, message: NewMessage) -> Result<StoredMessage, RepositoryError>;

    /// ルームの最新 `limit` 件を新しい順で取得
    async fn fetch_recent(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;

    /// 全ルームから `min_level` 以上のメッセージを新しい順で取得
    async fn fetch_flagged(
        &self,
        min_level: RiskLevel,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;

    /// 投稿者の表示情報を登録・更新する（保存済みメッセージの取得結果にも反映される）
    async fn upsert_profile(
        &self,
        user_id: &UserId,
        profile: AuthorProfile,
    ) -> Result<(), RepositoryError>;

    /// 通報を保存する。対象メッセージが存在しなければ `MessageNotFound`
    async fn append_report(&self, report: NewReport) -> Result<Report, RepositoryError>;

    /// 全通報を新しい順で取得
    async fn fetch_reports(&self) -> Result<Vec<Report>, RepositoryError>;
}
