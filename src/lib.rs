// ==========================================
// 啤酒库存对账系统 - 核心库
// ==========================================
// 输入: 库存表（Excel/CSV）+ 供应商目录
// 输出: 各门店采购订单表 + 缺供应商清单 + 摘要
// 分层: domain → importer → engine → delivery
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "uk");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 订单计算与摘要
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 交付层 - 导出与通知
pub mod delivery;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ParsedValue, RawCell, Unit};

// 领域实体
pub use domain::{
    CellWarning, Location, LocationOrder, MissingSupplierRow, OrderLine, PurchaseOrders,
    StockRow, StockTable, SupplierMatch, SupplierRecord,
};

// 导入
pub use importer::{
    HeaderResolver, ImportError, StockTableBuilder, StockVocabulary, SupplierDirectory,
    ValueParser,
};

// 引擎
pub use engine::{OrderComputer, SummaryFormatter};

// 交付
pub use config::AppConfig;
pub use delivery::{OrderExporter, OrderPipeline};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "AI Beer Stock Manager";
