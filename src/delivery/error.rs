// ==========================================
// 啤酒库存对账系统 - 交付层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 范围: 导出文件 / Telegram 通知 / 配置
// ==========================================

use thiserror::Error;

/// 交付层错误类型
#[derive(Error, Debug)]
pub enum DeliveryError {
    // ===== 导出错误 =====
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    // ===== 通知错误 =====
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API 返回错误 (status={status}): {description}")]
    TelegramApi { status: u16, description: String },

    #[error("通知未配置: {0}")]
    NotConfigured(String),

    // ===== 配置错误 =====
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result 类型别名
pub type DeliveryResult<T> = Result<T, DeliveryError>;
