//! WebHook 请求分发器
//!
//! 对单个已渲染 body 执行一次出站 HTTP 调用：按 body type 编码载荷、
//! 解析 header、同步等待响应。所有失败在此处记录日志并以
//! [`DispatchOutcome`] 返回，绝不向调用方抛出。无重试。

use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::Client;
use serde_json::Value;
use url::form_urlencoded;

use crate::config::{BodyType, HttpMethod};
use crate::error::{HookError, Result};
use crate::logging::{log_error, log_warn};

/// 单次分发的结果
#[derive(Debug)]
pub enum DispatchOutcome {
    /// 请求已发出并取回响应
    Delivered { status: u16, response: String },
    /// 连接 / DNS / TLS 层失败
    TransportFailed(String),
    /// body 无法解析为 JSON，未发出请求
    BodyParseFailed(String),
    /// body 形状与声明的 body type 不符，未发出请求
    BodyTypeMismatch(String),
    /// 请求已发出但响应体读取失败
    MetadataFailed(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }

    /// 失败结果到错误分类的映射，供嵌入方（如测试请求路径）向上呈现
    pub fn as_error(&self) -> Option<HookError> {
        match self {
            DispatchOutcome::Delivered { .. } => None,
            DispatchOutcome::TransportFailed(msg) => Some(HookError::Transport(msg.clone())),
            DispatchOutcome::BodyParseFailed(msg) => Some(HookError::BodyParse(msg.clone())),
            DispatchOutcome::BodyTypeMismatch(msg) => {
                Some(HookError::BodyTypeMismatch(msg.clone()))
            }
            DispatchOutcome::MetadataFailed(msg) => Some(HookError::Metadata(msg.clone())),
        }
    }
}

/// 单次分发的全部输入，全部显式传参，分发器自身无可变状态
#[derive(Debug)]
pub struct DispatchRequest<'a> {
    pub url: &'a str,
    pub method: HttpMethod,
    pub body_type: BodyType,
    /// 已渲染的 body 模板
    pub body: &'a str,
    /// 原始 "Name: Value" header 行
    pub headers: &'a [String],
    pub logging_enabled: bool,
    /// 匹配注解，仅进入发送前日志行
    pub annotation: &'a str,
}

/// WebHook 分发器，持有复用的 HTTP 客户端
pub struct WebhookDispatcher {
    client: Client,
}

impl WebhookDispatcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| HookError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// 执行一次分发
    pub async fn deliver(&self, req: &DispatchRequest<'_>) -> DispatchOutcome {
        let decoded: Value = match serde_json::from_str(req.body) {
            Ok(value) => value,
            Err(err) => {
                log_error(
                    req.logging_enabled,
                    format!("body is not valid JSON: {err} | body: {}", req.body),
                );
                return DispatchOutcome::BodyParseFailed(err.to_string());
            }
        };

        let payload = match encode_body(req.body_type, &decoded) {
            Ok(payload) => payload,
            Err(reason) => {
                log_error(
                    req.logging_enabled,
                    format!(
                        "body shape does not match body type | type: {}, body: {}",
                        req.body_type, req.body
                    ),
                );
                return DispatchOutcome::BodyTypeMismatch(reason);
            }
        };

        let mut request = self.client.request(req.method.as_reqwest(), req.url);
        if !req.body.is_empty() && req.method != HttpMethod::Get {
            request = request.body(payload.clone());
        }

        let headers = resolve_headers(req.headers, req.body_type, req.logging_enabled);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        log_warn(
            req.logging_enabled,
            format!(
                "{} | sendReq {} {} | {} | {} | {:?}",
                req.annotation,
                req.method,
                percent_decode_str(req.url).decode_utf8_lossy(),
                req.body_type,
                payload,
                headers,
            ),
        );

        match request.send().await {
            Err(err) => {
                log_error(req.logging_enabled, format!("request failed: {err}"));
                DispatchOutcome::TransportFailed(err.to_string())
            }
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(text) => {
                        log_warn(
                            req.logging_enabled,
                            format!("response ({status}): {text}"),
                        );
                        DispatchOutcome::Delivered {
                            status,
                            response: text,
                        }
                    }
                    Err(err) => {
                        log_warn(
                            req.logging_enabled,
                            format!("failed to read response body: {err}"),
                        );
                        DispatchOutcome::MetadataFailed(err.to_string())
                    }
                }
            }
        }
    }
}

/// 按 body type 编码出站载荷
///
/// json 要求解码出对象，form 接受对象或数组；其余形状视为配置错误。
fn encode_body(body_type: BodyType, value: &Value) -> std::result::Result<String, String> {
    match body_type {
        BodyType::Json => match value {
            Value::Object(_) => serde_json::to_string(value).map_err(|err| err.to_string()),
            other => Err(format!(
                "json body type requires a JSON object, got {}",
                json_kind(other)
            )),
        },
        BodyType::Form => match value {
            Value::Object(_) | Value::Array(_) => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                append_form_pairs(&mut serializer, None, value);
                Ok(serializer.finish())
            }
            other => Err(format!(
                "form body type requires a JSON object or array, got {}",
                json_kind(other)
            )),
        },
    }
}

/// form 键值对展开：嵌套的对象 / 数组递归展开为 `parent[child]=value`，
/// 数组元素以下标作为 child
fn append_form_pairs(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    prefix: Option<&str>,
    value: &Value,
) {
    match value {
        Value::Object(map) => {
            for (child, item) in map {
                let key = match prefix {
                    Some(parent) => format!("{parent}[{child}]"),
                    None => child.clone(),
                };
                append_form_pairs(serializer, Some(&key), item);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let key = match prefix {
                    Some(parent) => format!("{parent}[{index}]"),
                    None => index.to_string(),
                };
                append_form_pairs(serializer, Some(&key), item);
            }
        }
        scalar => {
            // 顶层标量在 encode_body 已被拒绝，prefix 此处必然存在
            if let Some(key) = prefix {
                serializer.append_pair(key, &scalar_form_value(scalar));
            }
        }
    }
}

/// form 编码中标量值的字符串形式
fn scalar_form_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// header 解析
///
/// 配置为空时合成唯一一个与 body type 匹配的 Content-Type；
/// 一旦配置了任何 header，配置内容原样生效，不再做任何补充。
fn resolve_headers(
    configured: &[String],
    body_type: BodyType,
    logging_enabled: bool,
) -> Vec<(String, String)> {
    if configured.is_empty() {
        return vec![(
            "Content-Type".to_string(),
            body_type.content_type().to_string(),
        )];
    }
    let mut headers = Vec::new();
    for line in configured {
        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            _ => log_warn(
                logging_enabled,
                format!("ignoring malformed header line: {line}"),
            ),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_json_object() {
        let value = json!({"a": 1});
        assert_eq!(encode_body(BodyType::Json, &value).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_json_rejects_non_object() {
        assert!(encode_body(BodyType::Json, &json!([1, 2])).is_err());
        assert!(encode_body(BodyType::Json, &json!("text")).is_err());
        assert!(encode_body(BodyType::Json, &json!(null)).is_err());
    }

    #[test]
    fn test_encode_form_object() {
        let value = json!({"a": "x y"});
        assert_eq!(encode_body(BodyType::Form, &value).unwrap(), "a=x+y");
    }

    #[test]
    fn test_encode_form_mixed_values() {
        let value = json!({"n": 7, "flag": true, "empty": null});
        assert_eq!(
            encode_body(BodyType::Form, &value).unwrap(),
            "n=7&flag=true&empty="
        );
    }

    #[test]
    fn test_encode_form_nested_values_bracket_expanded() {
        let value = json!({"a": {"b": "c"}, "list": ["x", "y"]});
        assert_eq!(
            encode_body(BodyType::Form, &value).unwrap(),
            "a%5Bb%5D=c&list%5B0%5D=x&list%5B1%5D=y"
        );
    }

    #[test]
    fn test_encode_form_deeply_nested_object() {
        let value = json!({"a": {"b": {"c": "d"}}});
        assert_eq!(
            encode_body(BodyType::Form, &value).unwrap(),
            "a%5Bb%5D%5Bc%5D=d"
        );
    }

    #[test]
    fn test_encode_form_array_indexed() {
        let value = json!(["first", "second"]);
        assert_eq!(
            encode_body(BodyType::Form, &value).unwrap(),
            "0=first&1=second"
        );
    }

    #[test]
    fn test_form_rejects_scalar() {
        assert!(encode_body(BodyType::Form, &json!(42)).is_err());
    }

    #[test]
    fn test_default_header_synthesized() {
        assert_eq!(
            resolve_headers(&[], BodyType::Json, false),
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            resolve_headers(&[], BodyType::Form, false),
            vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )]
        );
    }

    #[test]
    fn test_configured_headers_used_verbatim() {
        let configured = vec![
            "X-Custom: yes".to_string(),
            "Authorization: Bearer a:b:c".to_string(),
        ];
        let headers = resolve_headers(&configured, BodyType::Json, false);
        assert_eq!(
            headers,
            vec![
                ("X-Custom".to_string(), "yes".to_string()),
                ("Authorization".to_string(), "Bearer a:b:c".to_string()),
            ]
        );
    }

    #[test]
    fn test_outcome_error_mapping() {
        let delivered = DispatchOutcome::Delivered {
            status: 200,
            response: String::new(),
        };
        assert!(delivered.as_error().is_none());

        let failed = DispatchOutcome::TransportFailed("connection refused".to_string());
        assert!(matches!(failed.as_error(), Some(HookError::Transport(_))));

        let mismatch = DispatchOutcome::BodyTypeMismatch("not an object".to_string());
        assert!(matches!(
            mismatch.as_error(),
            Some(HookError::BodyTypeMismatch(_))
        ));

        let parse = DispatchOutcome::BodyParseFailed("bad json".to_string());
        assert!(matches!(parse.as_error(), Some(HookError::BodyParse(_))));

        let metadata = DispatchOutcome::MetadataFailed("read failed".to_string());
        assert!(matches!(metadata.as_error(), Some(HookError::Metadata(_))));
    }

    #[test]
    fn test_malformed_header_line_skipped() {
        let configured = vec!["no colon here".to_string(), "Ok: fine".to_string()];
        let headers = resolve_headers(&configured, BodyType::Json, false);
        assert_eq!(headers, vec![("Ok".to_string(), "fine".to_string())]);
    }
}
