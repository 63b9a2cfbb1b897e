// ==========================================
// 啤酒库存对账系统 - 导入层
// ==========================================
// 职责: 外部表格导入,生成标准化库存表与供应商目录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod header_resolver;
pub mod importer_trait;
pub mod stock_table_builder;
pub mod supplier_directory;
pub mod value_parser;

// 重导出核心类型
pub use column_resolver::{
    ColumnResolver, ColumnRole, ResolvedColumns, RoleSpec, StockVocabulary, SupplierVocabulary,
};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, TableFormat, UniversalFileParser};
pub use header_resolver::{HeaderResolver, StockColumns, DEFAULT_MAX_SCAN, HEADER_HIT_THRESHOLD};
pub use stock_table_builder::StockTableBuilder;
pub use supplier_directory::SupplierDirectory;
pub use value_parser::ValueParser;

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FileParser, RawTable};
