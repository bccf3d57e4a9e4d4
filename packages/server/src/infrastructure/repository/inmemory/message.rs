//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! 挿入順に Vec へ積み、id（UUID v4）と created_at はここで採番します。
//! 通報も同じストアで保持し、取得時に対象メッセージと通報者の表示情報を付与します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;
use yorisoi_shared::time::{Clock, SystemClock};

use crate::domain::{
    AuthorProfile, MessageStore, NewMessage, NewReport, Report, ReportStatus, ReportedMessage,
    RepositoryError, RiskLevel, RoomId, StoredMessage, Timestamp, UserId,
};

/// インメモリ Message Store 実装
pub struct InMemoryMessageStore {
    /// 保存済みメッセージ（挿入順 = 時刻順）
    messages: Mutex<Vec<StoredMessage>>,
    /// 投稿者の表示情報
    profiles: RwLock<HashMap<UserId, AuthorProfile>>,
    /// 通報（挿入順）
    reports: Mutex<Vec<Report>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            profiles: RwLock::new(HashMap::new()),
            reports: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    async fn hydrate(&self, mut messages: Vec<StoredMessage>) -> Vec<StoredMessage> {
        let profiles = self.profiles.read().await;
        for message in &mut messages {
            message.profile = profiles.get(&message.user_id).cloned();
        }
        messages
    }

    async fn hydrate_reports(&self, mut reports: Vec<Report>) -> Vec<Report> {
        {
            let messages = self.messages.lock().await;
            for report in &mut reports {
                report.message = messages
                    .iter()
                    .find(|m| m.id == report.message_id)
                    .map(|m| ReportedMessage {
                        content: m.content.clone(),
                        risk_level: m.risk_level,
                    });
            }
        }
        let profiles = self.profiles.read().await;
        for report in &mut reports {
            report.reporter = profiles.get(&report.reported_by).cloned();
        }
        reports
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: NewMessage) -> Result<StoredMessage, RepositoryError> {
        let stored = StoredMessage {
            id: Uuid::new_v4().to_string(),
            room_id: message.room_id,
            user_id: message.user_id,
            content: message.content,
            risk_level: message.risk_level,
            created_at: Timestamp::new(self.clock.now_millis()),
            profile: None,
        };

        self.messages.lock().await.push(stored.clone());
        tracing::debug!(
            "Stored message '{}' in room '{}' (risk: {})",
            stored.id,
            stored.room_id,
            stored.risk_level
        );

        let mut hydrated = self.hydrate(vec![stored]).await;
        hydrated
            .pop()
            .ok_or_else(|| RepositoryError::Unavailable("stored record vanished".to_string()))
    }

    async fn fetch_recent(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let recent: Vec<StoredMessage> = {
            let messages = self.messages.lock().await;
            messages
                .iter()
                .rev()
                .filter(|m| &m.room_id == room_id)
                .take(limit)
                .cloned()
                .collect()
        };
        Ok(self.hydrate(recent).await)
    }

    async fn fetch_flagged(
        &self,
        min_level: RiskLevel,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let flagged: Vec<StoredMessage> = {
            let messages = self.messages.lock().await;
            messages
                .iter()
                .rev()
                .filter(|m| m.risk_level >= min_level)
                .take(limit)
                .cloned()
                .collect()
        };
        Ok(self.hydrate(flagged).await)
    }

    async fn upsert_profile(
        &self,
        user_id: &UserId,
        profile: AuthorProfile,
    ) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(user_id) {
            Some(existing) => {
                // avatar の指定がなければ登録済みのものを残す
                existing.nickname = profile.nickname;
                if profile.avatar.is_some() {
                    existing.avatar = profile.avatar;
                }
            }
            None => {
                profiles.insert(user_id.clone(), profile);
            }
        }
        Ok(())
    }

    async fn append_report(&self, report: NewReport) -> Result<Report, RepositoryError> {
        let known = self
            .messages
            .lock()
            .await
            .iter()
            .any(|m| m.id == report.message_id);
        if !known {
            return Err(RepositoryError::MessageNotFound(report.message_id));
        }

        let stored = Report {
            id: Uuid::new_v4().to_string(),
            message_id: report.message_id,
            reported_by: report.reported_by,
            reason: report.reason,
            status: ReportStatus::Pending,
            created_at: Timestamp::new(self.clock.now_millis()),
            message: None,
            reporter: None,
        };
        self.reports.lock().await.push(stored.clone());
        tracing::info!(
            "Stored report '{}' for message '{}' by '{}'",
            stored.id,
            stored.message_id,
            stored.reported_by
        );

        let mut hydrated = self.hydrate_reports(vec![stored]).await;
        hydrated
            .pop()
            .ok_or_else(|| RepositoryError::Unavailable("stored report vanished".to_string()))
    }

    async fn fetch_reports(&self) -> Result<Vec<Report>, RepositoryError> {
        let reports: Vec<Report> = self.reports.lock().await.iter().rev().cloned().collect();
        Ok(self.hydrate_reports(reports).await)
    }
}
