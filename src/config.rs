//! WebHook 配置模块
//!
//! 配置为强类型记录，每次 Hook 调用都从文件重新加载（不缓存），
//! 保证两次投递之间的配置修改立即生效。

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{HookError, Result};

/// 出站请求使用的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        };
        write!(f, "{name}")
    }
}

/// 出站 body 的线上编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Json,
    Form,
}

impl BodyType {
    /// 未配置任何 header 时合成的默认 Content-Type
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyType::Json => "application/json",
            BodyType::Form => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyType::Json => write!(f, "json"),
            BodyType::Form => write!(f, "form"),
        }
    }
}

/// 参与关键词匹配的文章字段开关
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchFields {
    pub title: bool,
    pub feed: bool,
    pub authors: bool,
    pub content: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            title: true,
            feed: false,
            authors: false,
            content: false,
        }
    }
}

/// WebHook 配置记录（由设置表单写入，每次调用读取）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// 关键词模式，有序；每项是正则体或字面子串
    pub keywords: Vec<String>,
    /// 参与匹配的字段集合
    pub search_in: SearchFields,
    /// 匹配后是否把文章标记为已读
    pub mark_as_read: bool,
    /// 已见文章的更新是否整体跳过
    pub ignore_updated: bool,
    /// 目标端点
    pub webhook_url: String,
    pub webhook_method: HttpMethod,
    pub webhook_body_type: BodyType,
    /// 含占位符的 body 模板
    pub webhook_body: String,
    /// 原始 "Name: Value" header 行，有序
    pub webhook_headers: Vec<String>,
    /// 日志总开关
    pub enable_logging: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            search_in: SearchFields::default(),
            mark_as_read: false,
            ignore_updated: false,
            webhook_url: String::new(),
            webhook_method: HttpMethod::Post,
            webhook_body_type: BodyType::Json,
            webhook_body: DEFAULT_BODY_TEMPLATE.to_string(),
            webhook_headers: Vec::new(),
            enable_logging: false,
        }
    }
}

const DEFAULT_BODY_TEMPLATE: &str = r#"{
	"title": "__TITLE__",
	"feed": "__FEED__",
	"url": "__URL__",
	"created": "__DATE_TIMESTAMP__"
}"#;

impl WebhookConfig {
    /// 加载时校验，避免每个使用点各自容错
    pub fn validate(&self) -> Result<()> {
        if self.webhook_url.is_empty() {
            return Err(HookError::Config("webhook_url is empty".to_string()));
        }
        Ok(())
    }
}

/// 配置加载器
///
/// 每次 `load` 都重新读取并解析文件，类型错误（例如 keywords 不是数组）
/// 在这里暴露为 [`HookError::Config`]，不会流入后续环节。
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<WebhookConfig> {
        let content = fs::read_to_string(&self.path).map_err(|err| {
            HookError::Config(format!(
                "failed to read webhook config: path={}, err={err}",
                self.path.display()
            ))
        })?;
        let config: WebhookConfig = toml::from_str(&content).map_err(|err| {
            HookError::Config(format!(
                "invalid webhook config format: path={}, err={err}",
                self.path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}
