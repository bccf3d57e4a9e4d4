//! UseCase: 接続の生存確認（Liveness Monitor）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LivenessMonitor::sweep() メソッド
//!
//! ### なぜこのテストが必要か
//! - 前回の ping に応答しなかったセッションだけが切断されることを保証
//! - 応答したセッションには次の ping が送られることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：応答済みのセッション
//! - 異常系：応答のないセッション
//! - エッジケース：書き込みタスクが既に終了したセッション

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::domain::SessionDirectory;

/// 1 回の走査の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// ping を送ったセッション数
    pub pinged: usize,
    /// 切断したセッション数
    pub terminated: usize,
}

/// 生存確認のユースケース
pub struct LivenessMonitor {
    directory: Arc<dyn SessionDirectory>,
    interval: Duration,
}

impl LivenessMonitor {
    /// 新しい LivenessMonitor を作成
    pub fn new(directory: Arc<dyn SessionDirectory>, interval: Duration) -> Self {
        Self {
            directory,
            interval,
        }
    }

    /// 登録中のセッションを 1 回走査する
    ///
    /// 生存フラグが落ちたままのセッションは切断し、それ以外はフラグを落として
    /// ping を送る。フラグは pong（または任意の受信フレーム）で再び立つ。
    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for session in self.directory.snapshot().await {
            if session.is_terminated() {
                continue;
            }

            if !session.take_alive() {
                tracing::info!("Session '{}' missed its liveness ping, terminating", session.id());
                session.terminate();
                report.terminated += 1;
                continue;
            }

            match session.ping() {
                Ok(()) => report.pinged += 1,
                Err(e) => {
                    tracing::debug!("Liveness ping not delivered: {}", e);
                    session.terminate();
                    report.terminated += 1;
                }
            }
        }

        report
    }

    /// 一定間隔で走査するタスクを起動する（最初の走査は 1 周期後）
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 初回の tick は即座に完了する
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let report = self.sweep().await;
                if report.terminated > 0 {
                    tracing::info!(
                        "Liveness sweep: {} pinged, {} terminated",
                        report.pinged,
                        report.terminated
                    );
                } else {
                    tracing::debug!("Liveness sweep: {} pinged", report.pinged);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Outbound, SessionHandle},
        infrastructure::session::WebSocketSessionDirectory,
    };
    use tokio::sync::mpsc;

    fn create_monitor() -> (LivenessMonitor, Arc<WebSocketSessionDirectory>) {
        let directory = Arc::new(WebSocketSessionDirectory::new());
        (
            LivenessMonitor::new(directory.clone(), Duration::from_secs(30)),
            directory,
        )
    }

    #[tokio::test]
    async fn test_responsive_session_is_pinged() {
        // テスト項目: 生存フラグが立っているセッションには ping が送られ、フラグが落ちる
        // given (前提条件):
        let (monitor, directory) = create_monitor();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(tx);
        directory.register(handle.clone()).await;

        // when (操作):
        let report = monitor.sweep().await;

        // then (期待する結果):
        assert_eq!(
            report,
            SweepReport {
                pinged: 1,
                terminated: 0
            }
        );
        assert_eq!(rx.recv().await, Some(Outbound::Ping));
        assert!(!handle.is_terminated());
        assert!(!handle.take_alive());
    }

    #[tokio::test]
    async fn test_unresponsive_session_is_terminated() {
        // テスト項目: 前回の ping に応答がなければ次の走査で切断される
        // given (前提条件):
        let (monitor, directory) = create_monitor();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(tx);
        directory.register(handle.clone()).await;
        monitor.sweep().await;

        // when (操作):
        let report = monitor.sweep().await;

        // then (期待する結果):
        assert_eq!(report.terminated, 1);
        assert!(handle.is_terminated());
    }

    #[tokio::test]
    async fn test_pong_keeps_session_alive() {
        // テスト項目: ping の後に応答があれば切断されない
        // given (前提条件):
        let (monitor, directory) = create_monitor();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(tx);
        directory.register(handle.clone()).await;
        monitor.sweep().await;

        // when (操作):
        handle.mark_alive();
        let report = monitor.sweep().await;

        // then (期待する結果):
        assert_eq!(report.terminated, 0);
        assert_eq!(report.pinged, 1);
        assert!(!handle.is_terminated());
    }

    #[tokio::test]
    async fn test_session_with_closed_writer_is_terminated() {
        // テスト項目: 書き込みタスクが終了していて ping を送れないセッションは切断される
        // given (前提条件):
        let (monitor, directory) = create_monitor();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(tx);
        directory.register(handle.clone()).await;
        drop(rx);

        // when (操作):
        let report = monitor.sweep().await;

        // then (期待する結果):
        assert_eq!(report.terminated, 1);
        assert!(handle.is_terminated());
    }
}
