// ==========================================
// 啤酒库存对账系统 - 配置层
// ==========================================
// 职责: 运行配置加载,支持多级覆写
// 来源: 默认值 / 配置文件 / 环境变量 / 命令行
// ==========================================

pub mod app_config;

// 重导出核心配置
pub use app_config::{
    AppConfig, ConfigOverrides, TelegramConfig, DEFAULT_CONFIG_FILE, DEFAULT_TELEGRAM_API,
};
