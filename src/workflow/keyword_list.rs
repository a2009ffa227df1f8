//! 关键词列表规范化

/// 关键词分隔符
pub const KEYWORD_DELIMITER: char = ',';

/// 按逗号拆分原始输入，去掉首尾空白并丢弃空项
///
/// 保持原始顺序，允许重复。没有有效关键词时返回空列表，由调用方判断并提前结束
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    raw.split(KEYWORD_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_drops_empty() {
        assert_eq!(normalize_keywords(" a, b ,, c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_keeps_order_and_duplicates() {
        assert_eq!(
            normalize_keywords("photo editor, collage,photo editor"),
            vec!["photo editor", "collage", "photo editor"]
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_keywords("").is_empty());
        assert!(normalize_keywords(" ,  ,\t, ").is_empty());
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize_keywords("  habit   tracker  "), vec!["habit   tracker"]);
    }
}
