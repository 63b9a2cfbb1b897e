// ==========================================
// 啤酒库存对账系统 - 领域类型定义
// ==========================================
// 职责: 单元格原始值 / 解析值 / 计量单位
// 红线: 解析失败以 None 表达,不在算术中隐式置零
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 计量单位 (Unit)
// ==========================================
// 顺序即摘要展示优先级: 升 < 千克 < 件
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Unit {
    #[serde(rename = "л")]
    Liters, // 升
    #[serde(rename = "кг")]
    Kilograms, // 千克
    #[serde(rename = "шт")]
    #[default]
    Pieces, // 件
}

impl Unit {
    /// 表格中使用的单位符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Liters => "л",
            Unit::Kilograms => "кг",
            Unit::Pieces => "шт",
        }
    }

    /// 从单位记号解析（大小写不敏感）
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "л" => Some(Unit::Liters),
            "кг" => Some(Unit::Kilograms),
            "шт" => Some(Unit::Pieces),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ==========================================
// RawCell - 原始单元格
// ==========================================
// 用途: 文件解析层输出,解析完成后即丢弃
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(n) => n.is_nan(),
        }
    }

    /// 单元格文本表示（数字按原值输出）
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) if n.is_nan() => String::new(),
            RawCell::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

// ==========================================
// ParsedValue - 单元格解析结果
// ==========================================
// quantity: None 表示无法识别数量（空白/非数字）
// 红线: 数量恒 >= 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedValue {
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
}

impl ParsedValue {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 参与计算的数量（未识别按 0 计）
    pub fn amount(&self) -> f64 {
        self.quantity.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_priority_order() {
        let mut units = vec![Unit::Pieces, Unit::Liters, Unit::Kilograms];
        units.sort();
        assert_eq!(units, vec![Unit::Liters, Unit::Kilograms, Unit::Pieces]);
    }

    #[test]
    fn test_unit_from_token() {
        assert_eq!(Unit::from_token("Л"), Some(Unit::Liters));
        assert_eq!(Unit::from_token("кг"), Some(Unit::Kilograms));
        assert_eq!(Unit::from_token("ШТ"), Some(Unit::Pieces));
        assert_eq!(Unit::from_token("ящ"), None);
    }

    #[test]
    fn test_raw_cell_blank() {
        assert!(RawCell::Empty.is_blank());
        assert!(RawCell::Text("  ".to_string()).is_blank());
        assert!(RawCell::Number(f64::NAN).is_blank());
        assert!(!RawCell::Number(0.0).is_blank());
    }

    #[test]
    fn test_parsed_value_amount() {
        assert_eq!(ParsedValue::empty().amount(), 0.0);
        let value = ParsedValue {
            quantity: Some(2.5),
            unit: Some(Unit::Liters),
        };
        assert_eq!(value.amount(), 2.5);
    }
}
