// ==========================================
// 啤酒库存对账系统 - 单元格数值解析器
// ==========================================
// 职责: 单元格 → (数量, 单位)
// 规则:
// 1. 空白/NaN → (None, None)
// 2. NFKC + 空白标准化, 去除数字组间空格 ("2 000,000" → 2000.000)
// 3. 逗号后紧跟数字视为小数点
// 4. 数量取首个带符号小数（模式搜索,容忍前后文字）, 负数按 0
// 5. 单位取首个命中的 шт / л / кг（大小写不敏感）
// 红线: 任何输入都不报错
// ==========================================

use crate::domain::types::{ParsedValue, RawCell, Unit};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::DataCleaner as _;
use regex::Regex;
use std::sync::OnceLock;

const NUMBER_PATTERN: &str = r"-?\d+(?:\.\d+)?";
const DECIMAL_COMMA_PATTERN: &str = r",(\d)";
const UNIT_PATTERN: &str = r"(?i)(шт|л|кг)";

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, NUMBER_PATTERN)
}

fn decimal_comma_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, DECIMAL_COMMA_PATTERN)
}

fn unit_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, UNIT_PATTERN)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ValueParser;

impl ValueParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析原始单元格
    pub fn parse(&self, raw: &RawCell) -> ParsedValue {
        match raw {
            RawCell::Empty => ParsedValue::empty(),
            RawCell::Number(n) => ParsedValue {
                quantity: non_negative(*n),
                unit: None,
            },
            RawCell::Text(s) => self.parse_text(s),
        }
    }

    /// 解析文本单元格
    pub fn parse_text(&self, raw: &str) -> ParsedValue {
        let cleaned = self.normalize_numeric_text(raw);
        if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
            return ParsedValue::empty();
        }

        let quantity = number_re()
            .and_then(|re| re.find(&cleaned))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .and_then(non_negative);

        let unit = unit_re()
            .and_then(|re| re.find(&cleaned))
            .and_then(|m| Unit::from_token(m.as_str()));

        ParsedValue { quantity, unit }
    }

    /// 清洗 + 去千分位空格 + 小数逗号转点
    pub fn normalize_numeric_text(&self, raw: &str) -> String {
        let cleaner = DataCleaner;
        let text = cleaner.clean_text(raw);
        let text = cleaner.strip_digit_group_spaces(&text);
        match decimal_comma_re() {
            Some(re) => re.replace_all(&text, ".$1").into_owned(),
            None => text,
        }
    }
}

fn non_negative(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value.max(0.0))
    }
}
