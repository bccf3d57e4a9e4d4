//! UseCase: メッセージの通報
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateReportUseCase::execute() メソッド
//! - 入力の検証とストアへの保存
//!
//! ### なぜこのテストが必要か
//! - 空の messageId / reason がストアに届かないことを保証
//! - 存在しないメッセージへの通報とストア障害を区別できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存済みメッセージへの通報
//! - 異常系：必須項目の欠落、存在しないメッセージ、ストア障害

use std::sync::Arc;

use crate::domain::{MessageStore, NewReport, RepositoryError, Report, UserId};

use super::error::ReportError;

/// 通報作成のユースケース
pub struct CreateReportUseCase {
    store: Arc<dyn MessageStore>,
}

impl CreateReportUseCase {
    /// 新しい CreateReportUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 通報を保存する
    ///
    /// # Arguments
    ///
    /// * `reported_by` - 通報した利用者（認証済み）
    /// * `message_id` - 通報対象のメッセージ ID
    /// * `reason` - 通報理由
    ///
    /// # Returns
    ///
    /// * `Ok(Report)` - 保存済みの通報（status は pending）
    /// * `Err(ReportError)` - 入力不備、対象メッセージなし、保存失敗
    pub async fn execute(
        &self,
        reported_by: UserId,
        message_id: &str,
        reason: &str,
    ) -> Result<Report, ReportError> {
        let (message_id, reason) = (message_id.trim(), reason.trim());
        if message_id.is_empty() || reason.is_empty() {
            return Err(ReportError::MissingFields);
        }

        self.store
            .append_report(NewReport {
                message_id: message_id.to_string(),
                reported_by,
                reason: reason.to_string(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::MessageNotFound(id) => ReportError::MessageNotFound(id),
                other => ReportError::StoreUnavailable(other),
            })
    }
}
