// ==========================================
// 啤酒库存对账系统 - 数据清洗器实现
// ==========================================
// 职责: NFKC 标准化 / 不换行空格与换行替换 / 空白折叠 / NULL 标准化
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use unicode_normalization::UnicodeNormalization;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        let normalized: String = value
            .nfkc()
            .map(|c| match c {
                '\u{a0}' | '\n' | '\r' | '\t' => ' ',
                other => other,
            })
            .collect();
        normalized.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let cleaned = self.clean_text(v);
            if cleaned.is_empty() || is_null_marker(&cleaned) {
                None
            } else {
                Some(cleaned)
            }
        })
    }
}

impl DataCleaner {
    /// 去除数字组之间的空白（千分位空格）
    ///
    /// # 示例
    /// - "2 000,000" → "2000,000"
    /// - "1 2 3 л" → "123 л"
    pub fn strip_digit_group_spaces(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let mut result = String::with_capacity(value.len());
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() && result.chars().last().is_some_and(|p| p.is_ascii_digit()) {
                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    continue;
                }
            }
            result.push(c);
            i += 1;
        }
        result
    }
}

// 电子表格导出常见的空值占位
fn is_null_marker(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "nan" | "none" | "null" | "#n/a")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  Пиво   світле  "), "Пиво світле");
        assert_eq!(cleaner.clean_text("Склад\nБоголюбова"), "Склад Боголюбова");
        assert_eq!(cleaner.clean_text("Солод\u{a0}Pilsner"), "Солод Pilsner");
    }

    #[test]
    fn test_clean_text_nfkc() {
        let cleaner = DataCleaner;
        // 全角字符与组合字符
        assert_eq!(cleaner.clean_text("ＡＢＣ"), "ABC");
        assert_eq!(cleaner.clean_text("Ї"), "\u{407}");
        assert_eq!(cleaner.clean_text("І\u{308}"), "\u{407}");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ")), None);
        assert_eq!(cleaner.normalize_null(Some("nan")), None);
        assert_eq!(cleaner.normalize_null(None), None);
        assert_eq!(
            cleaner.normalize_null(Some("  Хміль  ")),
            Some("Хміль".to_string())
        );
    }

    #[test]
    fn test_match_key_lowercase() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.match_key(" Склад БОГОЛЮБОВА "), "склад боголюбова");
    }

    #[test]
    fn test_strip_digit_group_spaces() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.strip_digit_group_spaces("2 000,000"), "2000,000");
        assert_eq!(cleaner.strip_digit_group_spaces("1 2 3 л"), "123 л");
        assert_eq!(cleaner.strip_digit_group_spaces("5 кг"), "5 кг");
        assert_eq!(cleaner.strip_digit_group_spaces("кг 5"), "кг 5");
    }
}
