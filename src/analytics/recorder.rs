//! 点击事件记录器
//!
//! 跳转处理器在重定向成功后调用这里；落库是 best-effort 遥测，
//! 任何失败只记日志，绝不反馈给跳转路径。

use std::sync::Arc;

use tracing::{trace, warn};

use crate::errors::{LinktallyError, Result};
use crate::storage::{AnalyticsStorage, LinkAnalyticsRepository, NewInteraction};

pub struct InteractionRecorder<R> {
    storage: Arc<AnalyticsStorage>,
    repo: Arc<R>,
}

impl<R> Clone for InteractionRecorder<R> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: LinkAnalyticsRepository + 'static> InteractionRecorder<R> {
    pub fn new(storage: Arc<AnalyticsStorage>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// 同步写入一条点击事件（独立短事务，时间戳由存储层分配）
    pub async fn record(&self, link_id: i64, client_ip: &str, user_agent: &str) -> Result<()> {
        let txn = self.storage.begin().await?;

        let result = self
            .repo
            .record_interaction(
                &txn,
                NewInteraction {
                    link_id,
                    client_ip: client_ip.to_string(),
                    user_agent: user_agent.to_string(),
                },
            )
            .await;

        match result {
            Ok(()) => {
                txn.commit().await.map_err(|e| {
                    LinktallyError::database_operation(format!("提交事务失败: {}", e))
                })?;
                trace!("Interaction recorded for link {}", link_id);
                Ok(())
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    /// 跳转成功后调用：异步落库，与跳转响应解耦。
    /// 丢一条点击计数不能让跳转失败，所以错误在这里吞掉。
    pub fn record_detached(&self, link_id: i64, client_ip: String, user_agent: String) {
        let recorder = self.clone();
        tokio::spawn(async move {
            if let Err(e) = recorder.record(link_id, &client_ip, &user_agent).await {
                warn!("Interaction dropped for link {}: {}", link_id, e);
            }
        });
    }
}
