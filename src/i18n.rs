// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use shop_import_export::i18n::t;
/// let msg = t("cronjob.no_files");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use shop_import_export::i18n::t_with_args;
/// let msg = t_with_args("profile.not_found", &[("id", "42")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 翻译消息，缺少翻译时返回给定的兜底文本
///
/// rust-i18n 对未知 key 原样返回 key（或 `locale.key`），据此判断是否命中
pub fn t_or(key: &str, fallback: &str) -> String {
    let translated = t(key);
    let missing = translated == key || translated == format!("{}.{}", current_locale(), key);
    if missing || translated.is_empty() {
        fallback.to_string()
    } else {
        translated
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("cronjob.no_files"), "未找到待导入文件");

        set_locale("en");
        assert_eq!(t("cronjob.no_files"), "No import files are found.");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("profile.not_found", &[("id", "42")]);
        assert_eq!(msg, "Profile 不存在: id=42");

        set_locale("en");
        let msg = t_with_args("profile.not_found", &[("id", "42")]);
        assert_eq!(msg, "Profile with id 42 not found");

        set_locale("zh-CN");
    }

    #[test]
    fn test_t_or_uses_fallback_for_unknown_key() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t_or("adapters.no_such_snippet", "Fallback text"), "Fallback text");
        assert_eq!(
            t_or("adapters.ordernumber_required", "ignored"),
            "Order number is required"
        );
        set_locale("zh-CN");
    }
}
