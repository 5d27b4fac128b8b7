//! Body 模板渲染
//!
//! 模板被一次扫描编译为（字面量，占位符）片段序列，渲染时只做单遍拼接，
//! 已替换进去的字段值不会被二次替换。未知的 `__X__` 序列原样保留。

use crate::article::Article;

/// 支持的占位符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Title,
    Feed,
    Url,
    Content,
    Date,
    DateTimestamp,
    Authors,
    Tags,
}

// __DATE_TIMESTAMP__ 在 __DATE__ 之前，同一位置优先取更长的占位符
const TOKENS: &[(&str, Token)] = &[
    ("__TITLE__", Token::Title),
    ("__FEED__", Token::Feed),
    ("__URL__", Token::Url),
    ("__CONTENT__", Token::Content),
    ("__DATE_TIMESTAMP__", Token::DateTimestamp),
    ("__DATE__", Token::Date),
    ("__AUTHORS__", Token::Authors),
    ("__TAGS__", Token::Tags),
];

#[derive(Debug)]
enum Segment {
    Literal(String),
    Token(Token),
}

/// 编译后的 body 模板
#[derive(Debug)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = input;
        loop {
            let hit = TOKENS
                .iter()
                .filter_map(|(literal, token)| {
                    rest.find(literal).map(|pos| (pos, *literal, *token))
                })
                .min_by_key(|(pos, literal, _)| (*pos, std::cmp::Reverse(literal.len())));
            match hit {
                Some((pos, literal, token)) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(rest[..pos].to_string()));
                    }
                    segments.push(Segment::Token(token));
                    rest = &rest[pos + literal.len()..];
                }
                None => {
                    if !rest.is_empty() {
                        segments.push(Segment::Literal(rest.to_string()));
                    }
                    break;
                }
            }
        }
        Self { segments }
    }

    pub fn render(&self, article: &Article) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(token) => {
                    let value = match token {
                        Token::Title => sanitize(&article.title),
                        Token::Feed => sanitize(&article.feed_name),
                        Token::Url => sanitize(&article.link),
                        Token::Content => sanitize(&article.content),
                        Token::Date => sanitize(&article.date),
                        Token::DateTimestamp => article.date_timestamp.to_string(),
                        Token::Authors => sanitize(&article.authors),
                        Token::Tags => sanitize(&article.tags),
                    };
                    out.push_str(&value);
                }
            }
        }
        out
    }
}

/// 字段值清洗
///
/// 数值原样输出；其余值去掉字面双引号并解码 HTML 实体，
/// 使结果可以直接嵌入 JSON 字符串字面量。这只是窄化的安全网，
/// 不是完整的 JSON 转义。
fn sanitize(raw: &str) -> String {
    if is_numeric(raw) {
        return raw.to_string();
    }
    let stripped = raw.replace('"', "");
    match quick_xml::escape::unescape(&stripped) {
        Ok(decoded) => decoded.into_owned(),
        // 残缺实体（孤立的 & 等）按原样保留
        Err(_) => stripped,
    }
}

/// 数值判定：可选符号 + 十进制整数 / 小数
///
/// `inf`、`NaN`、指数形式不算数值，走文本清洗分支。
fn is_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1
}
