// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持乌克兰语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 摘要/导出使用 t_in 显式传入语言,不依赖全局 locale
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: &[&str] = &["uk", "en"];

/// 默认语言
pub const DEFAULT_LOCALE: &str = "uk";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"uk" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 语言代码是否受支持
pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 翻译消息（无参数,当前语言）
///
/// # 示例
/// ```no_run
/// use beer_stock_manager::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数,当前语言）
///
/// # 示例
/// ```no_run
/// use beer_stock_manager::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let result = rust_i18n::t!(key).to_string();
    fill_placeholders(result, args)
}

/// 翻译消息（指定语言,带参数）
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let result = rust_i18n::t!(key, locale = locale).to_string();
    fill_placeholders(result, args)
}

fn fill_placeholders(mut text: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        text = text.replace(&placeholder, v);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale(DEFAULT_LOCALE);
        assert_eq!(current_locale(), "uk");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("uk");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert!(msg.contains("/tmp/test.csv"));
        assert!(msg.contains("Файл не знайдено"));

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale(DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_explicit_locale() {
        let msg = t_in("en", "digest.no_order", &[("store", "A")]);
        assert!(msg.starts_with("Store A:"));

        let msg = t_in("uk", "export.order_qty", &[]);
        assert_eq!(msg, "Замовити");
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("uk"));
        assert!(is_supported("en"));
        assert!(!is_supported("zh-CN"));
    }
}
