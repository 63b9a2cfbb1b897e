// ==========================================
// 啤酒库存对账系统 - 导入 Trait
// ==========================================
// 职责: 定义导入组件接口（不包含实现）
// 流程: 文件解析 → 文本清洗 → 表头定位 → 列映射 → 数值解析
// ==========================================

use crate::domain::types::RawCell;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// RawTable - 无表头的原始二维表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        Self { rows }
    }

    /// 由字符串网格构建（测试与 CSV 场景）
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|v| RawCell::from(v.as_ref())).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 取单元格（越界视为空）
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析字节流为原始二维表（不识别表头）
    fn parse_bytes(&self, data: &[u8]) -> ImportResult<RawTable>;

    /// 解析文件为原始二维表
    fn parse_path(&self, file_path: &Path) -> ImportResult<RawTable> {
        let data = std::fs::read(file_path)?;
        self.parse_bytes(&data)
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本清洗（NFKC / 不换行空格 / 空白折叠）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本: NFKC + 空白标准化 + TRIM
    fn clean_text(&self, value: &str) -> String;

    /// 清洗后为空则返回 None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 清洗并转为小写（用于关键词匹配）
    fn match_key(&self, value: &str) -> String {
        self.clean_text(value).to_lowercase()
    }
}
