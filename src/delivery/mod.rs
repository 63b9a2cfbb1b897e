// ==========================================
// 啤酒库存对账系统 - 交付层
// ==========================================
// 职责: 串联导入/计算/摘要, 写出文件并发送通知
// 红线: 配置只在本层使用, 核心层保持纯计算
// ==========================================

pub mod error;
pub mod exporter;
pub mod notifier;
pub mod pipeline;
pub mod telegram;

// 重导出核心类型
pub use error::{DeliveryError, DeliveryResult};
pub use exporter::{order_file_name, ExportedFiles, OrderExporter, MISSING_SUPPLIERS_FILE, REPORT_FILE};
pub use notifier::{notifier_from_config, DryRunNotifier, Notifier};
pub use pipeline::{OrderPipeline, RunOutcome};
pub use telegram::TelegramNotifier;
