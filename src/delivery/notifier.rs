// ==========================================
// 啤酒库存对账系统 - 通知发送 Trait
// ==========================================
// 职责: 定义通知通道接口,交付层按配置选择实现
// 实现:
// - TelegramNotifier: 真实发送（telegram.rs）
// - DryRunNotifier: 仅写日志（试运行/未配置凭据）
// ==========================================

use crate::config::AppConfig;
use crate::delivery::error::DeliveryResult;
use crate::delivery::telegram::TelegramNotifier;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// Notifier Trait
// ==========================================
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 通道名称（日志用）
    fn name(&self) -> &str;

    /// 发送文本消息
    ///
    /// # 参数
    /// - title: 标题（加粗显示）
    /// - body: 正文（纯文本,由实现负责转义）
    async fn send_message(&self, title: &str, body: &str) -> DeliveryResult<()>;

    /// 发送附件
    async fn send_document(&self, path: &Path, caption: &str) -> DeliveryResult<()>;
}

/// 试运行通知: 只记录将要发送的内容
#[derive(Debug, Clone, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn send_message(&self, title: &str, body: &str) -> DeliveryResult<()> {
        info!(title = %title, "[DRY_RUN] 跳过消息发送\n{}", body);
        Ok(())
    }

    async fn send_document(&self, path: &Path, caption: &str) -> DeliveryResult<()> {
        info!(path = %path.display(), caption = %caption, "[DRY_RUN] 跳过附件发送");
        Ok(())
    }
}

/// 按配置选择通知通道
pub fn notifier_from_config(config: &AppConfig) -> DeliveryResult<Arc<dyn Notifier>> {
    if config.dry_run {
        info!("DRY_RUN 已开启,通知只写日志");
        return Ok(Arc::new(DryRunNotifier));
    }
    match config.telegram() {
        Some(telegram) => Ok(Arc::new(TelegramNotifier::new(telegram)?)),
        None => {
            warn!("未配置 TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID,通知只写日志");
            Ok(Arc::new(DryRunNotifier))
        }
    }
}
