//! UseCase: モデレーション向けの通報一覧
//!
//! 全通報を新しい順で、対象メッセージと通報者の表示情報付きで返します。

use std::sync::Arc;

use crate::domain::{MessageStore, Report};

use super::error::ReportError;

/// 通報一覧取得のユースケース
pub struct GetReportsUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetReportsUseCase {
    /// 新しい GetReportsUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Vec<Report>, ReportError> {
        self.store
            .fetch_reports()
            .await
            .map_err(ReportError::StoreUnavailable)
    }
}
