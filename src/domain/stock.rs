// ==========================================
// 啤酒库存对账系统 - 库存领域模型
// ==========================================
// 职责: 门店定义 / 标准化库存行 / 库存表
// 用途: 导入层写入,引擎层只读
// ==========================================

use crate::domain::types::Unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Location - 门店（独立库存列）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,           // 门店标识（用于文件名）
    pub display_name: String, // 展示名称
    #[serde(skip)]
    pub keywords: Vec<String>, // 表头关键词片段（小写）
}

impl Location {
    pub fn new(id: &str, display_name: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

// ==========================================
// StockRow - 标准化库存行
// ==========================================
// 红线: limit_per_location = ceil(limit_total / 门店数), 只向上取整
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub row_number: usize,               // 源表行号（1 起）
    pub product_name: String,            // 商品名（已清洗）
    pub category: String,                // 分类
    pub stock: BTreeMap<String, f64>,    // 门店 id → 库存量
    pub limit_total: f64,                // 全部门店合计上限
    pub limit_per_location: u64,         // 单店上限
    pub unit: Unit,                      // 工作单位
}

impl StockRow {
    /// 指定门店库存（缺失按 0 计）
    pub fn stock_at(&self, location_id: &str) -> f64 {
        self.stock.get(location_id).copied().unwrap_or(0.0)
    }
}

// ==========================================
// CellWarning - 非阻断的单元格告警
// ==========================================
// 非空单元格未识别出数量时记录,不影响计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWarning {
    pub row_number: usize,
    pub column: String,
    pub raw_value: String,
}

// ==========================================
// StockTable - 库存表
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockTable {
    pub locations: Vec<Location>,
    pub rows: Vec<StockRow>,
    pub warnings: Vec<CellWarning>,
}

impl StockTable {
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 单店上限: 合计上限按门店数均分并向上取整
///
/// 超出 u64 范围（含 +inf）时封顶为 `u64::MAX`, 不会因溢出变小
pub fn split_limit(limit_total: f64, location_count: usize) -> u64 {
    if location_count == 0 || limit_total.is_nan() || limit_total <= 0.0 {
        return 0;
    }
    let per_location = (limit_total / location_count as f64).ceil();
    if per_location >= u64::MAX as f64 {
        u64::MAX
    } else {
        per_location as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_limit_rounds_up() {
        assert_eq!(split_limit(10.0, 2), 5);
        assert_eq!(split_limit(11.0, 2), 6);
        assert_eq!(split_limit(1.0, 2), 1);
        assert_eq!(split_limit(7.5, 3), 3);
    }

    #[test]
    fn test_split_limit_degenerate_inputs() {
        assert_eq!(split_limit(0.0, 2), 0);
        assert_eq!(split_limit(10.0, 0), 0);
        assert_eq!(split_limit(f64::NAN, 2), 0);
        assert_eq!(split_limit(f64::NEG_INFINITY, 2), 0);
    }

    #[test]
    fn test_split_limit_saturates_huge_limits() {
        assert_eq!(split_limit(f64::INFINITY, 2), u64::MAX);
        assert_eq!(split_limit(4e19, 2), u64::MAX);
        assert_eq!(split_limit(4e19, 1), u64::MAX);
        // 未越界的大数照常均分
        assert_eq!(split_limit(2e18, 2), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_split_limit_covers_half() {
        for limit in 0..50 {
            let per_location = split_limit(limit as f64, 2);
            assert!(per_location as f64 >= limit as f64 / 2.0);
        }
    }

    #[test]
    fn test_stock_at_missing_location() {
        let row = StockRow {
            row_number: 1,
            product_name: "Сік".to_string(),
            category: "Напої".to_string(),
            stock: BTreeMap::new(),
            limit_total: 4.0,
            limit_per_location: 2,
            unit: Unit::Liters,
        };
        assert_eq!(row.stock_at("a"), 0.0);
    }
}
