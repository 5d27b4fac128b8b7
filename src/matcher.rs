//! 关键词匹配引擎
//!
//! 模式按配置顺序逐个评估；每个模式内按 title、feed、authors、content 的
//! 固定优先级检查启用的字段，第一个命中的 (模式, 字段) 对立即终止全部迭代。
//!
//! 模式先尝试按正则编译并匹配，编译失败或未命中时回退为字面子串查找，
//! 用户无需区分两种写法。

use std::fmt;

use regex::Regex;

use crate::article::Article;
use crate::config::SearchFields;

/// 命中的文章字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Feed,
    Authors,
    Content,
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchField::Title => write!(f, "title"),
            MatchField::Feed => write!(f, "feed"),
            MatchField::Authors => write!(f, "authors"),
            MatchField::Content => write!(f, "content"),
        }
    }
}

/// 匹配结果，仅用于日志注解
#[derive(Debug, Clone)]
pub struct MatchInfo {
    pub field: MatchField,
    pub pattern: String,
    /// 命中字段在匹配时刻的值快照
    pub value: String,
}

/// 在启用的字段上寻找第一个命中的模式
///
/// 纯函数，无副作用；没有任何命中时返回 `None`。
pub fn find_match(
    patterns: &[String],
    article: &Article,
    search: &SearchFields,
) -> Option<MatchInfo> {
    for pattern in patterns {
        let fields = [
            (search.title, MatchField::Title, article.title.as_str()),
            (search.feed, MatchField::Feed, article.feed_name.as_str()),
            (search.authors, MatchField::Authors, article.authors.as_str()),
            (search.content, MatchField::Content, article.content.as_str()),
        ];
        for (enabled, field, value) in fields {
            if enabled && pattern_found(pattern, value) {
                return Some(MatchInfo {
                    field,
                    pattern: pattern.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
    None
}

fn pattern_found(pattern: &str, text: &str) -> bool {
    if text.is_empty() || pattern.is_empty() {
        return false;
    }
    if let Ok(re) = Regex::new(pattern) {
        if re.is_match(text) {
            return true;
        }
    }
    text.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_only() -> SearchFields {
        SearchFields {
            title: true,
            feed: false,
            authors: false,
            content: false,
        }
    }

    fn all_fields() -> SearchFields {
        SearchFields {
            title: true,
            feed: true,
            authors: true,
            content: true,
        }
    }

    #[test]
    fn test_regex_pattern_matches() {
        let article = Article::new("Rust 1.80 released");
        let info = find_match(&[r"\d+\.\d+".to_string()], &article, &title_only()).unwrap();
        assert_eq!(info.field, MatchField::Title);
        assert_eq!(info.pattern, r"\d+\.\d+");
        assert_eq!(info.value, "Rust 1.80 released");
    }

    #[test]
    fn test_literal_fallback_when_regex_misses() {
        // 合法正则但未命中，回退为子串查找
        let article = Article::new("prices (usd)");
        let info = find_match(&["(usd)".to_string()], &article, &title_only());
        assert!(info.is_some());
    }

    #[test]
    fn test_literal_fallback_when_regex_invalid() {
        let article = Article::new("broken [pattern here");
        let info = find_match(&["[pattern".to_string()], &article, &title_only());
        assert!(info.is_some());
    }

    #[test]
    fn test_empty_text_never_matches() {
        let article = Article::new("");
        assert!(find_match(&[".*".to_string()], &article, &title_only()).is_none());
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let article = Article::new("anything");
        assert!(find_match(&[String::new()], &article, &title_only()).is_none());
    }

    #[test]
    fn test_no_match_returns_none() {
        let article = Article::new("quiet news day");
        assert!(find_match(&["rust".to_string()], &article, &all_fields()).is_none());
    }

    #[test]
    fn test_title_wins_over_content() {
        let article = Article::new("rust in the title").with_content("rust in the content");
        let info = find_match(&["rust".to_string()], &article, &all_fields()).unwrap();
        assert_eq!(info.field, MatchField::Title);
    }

    #[test]
    fn test_field_priority_order() {
        let article = Article::new("plain title")
            .with_feed("rust feed")
            .with_content("rust content");
        let info = find_match(&["rust".to_string()], &article, &all_fields()).unwrap();
        assert_eq!(info.field, MatchField::Feed);
    }

    #[test]
    fn test_pattern_order_wins_over_field_priority() {
        // 第一个模式命中 content 后即停止，第二个模式不再评估
        let article = Article::new("second pattern would hit this").with_content("first");
        let info = find_match(
            &["first".to_string(), "second".to_string()],
            &article,
            &all_fields(),
        )
        .unwrap();
        assert_eq!(info.pattern, "first");
        assert_eq!(info.field, MatchField::Content);
    }

    #[test]
    fn test_disabled_field_is_skipped() {
        let article = Article::new("no hit here").with_content("rust content");
        assert!(find_match(&["rust".to_string()], &article, &title_only()).is_none());
    }
}
