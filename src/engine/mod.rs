// ==========================================
// 啤酒库存对账系统 - 引擎层
// ==========================================
// 职责: 采购订单计算与摘要生成
// 红线: 纯内存计算, 不做文件读写与网络调用
// ==========================================

pub mod order_computer;
pub mod summary_formatter;

// 重导出核心引擎
pub use order_computer::{order_quantity, OrderComputer};
pub use summary_formatter::{format_amount, SummaryFormatter, TOP_ITEMS};
