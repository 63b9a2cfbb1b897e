// ==========================================
// 啤酒库存对账系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读写,不含引擎逻辑
// ==========================================

pub mod order;
pub mod stock;
pub mod supplier;
pub mod types;

// 重导出核心类型
pub use order::{LocationOrder, MissingSupplierRow, OrderLine, PurchaseOrders};
pub use stock::{split_limit, CellWarning, Location, StockRow, StockTable};
pub use supplier::{SupplierMatch, SupplierRecord, UNKNOWN_SUPPLIER};
pub use types::{ParsedValue, RawCell, Unit};
