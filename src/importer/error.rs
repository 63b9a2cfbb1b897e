// ==========================================
// 啤酒库存对账系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 单元格解析失败不是错误（降级为 0）
// ==========================================

use crate::importer::column_resolver::ColumnRole;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表头/列角色错误 =====
    #[error("库存表缺少必需列: {missing:?}，实际列: {found:?}")]
    MalformedSpreadsheet {
        missing: Vec<ColumnRole>,
        found: Vec<String>,
    },

    #[error("供应商目录缺少必需列: {missing:?}，实际列: {found:?}")]
    MalformedSupplierDirectory {
        missing: Vec<ColumnRole>,
        found: Vec<String>,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 缺失的列角色（仅表头类错误）
    pub fn missing_roles(&self) -> &[ColumnRole] {
        match self {
            ImportError::MalformedSpreadsheet { missing, .. }
            | ImportError::MalformedSupplierDirectory { missing, .. } => missing,
            _ => &[],
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
