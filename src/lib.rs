//! 订阅文章 WebHook 推送引擎
//!
//! - 关键词规则匹配：正则优先、字面子串回退，按 title / feed / authors / content
//!   固定优先级取第一个命中
//! - body 模板渲染：占位符单遍替换，值做窄化清洗后可嵌入 JSON 字符串
//! - HTTP 分发：json / form 两种编码，header 可完全自定义，失败只记日志
//!
//! host 聚合器在文章入库路径上内联调用 [`EntryHook::on_new_entry`]，
//! 引擎在两次调用之间除配置文件外不保留任何状态。

pub mod article;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hook;
pub mod logging;
pub mod matcher;
pub mod template;

pub use article::Article;
pub use config::{BodyType, ConfigLoader, HttpMethod, SearchFields, WebhookConfig};
pub use dispatch::{DispatchOutcome, DispatchRequest, WebhookDispatcher};
pub use error::{HookError, Result};
pub use hook::EntryHook;
pub use logging::{LOG_TAG, init_tracing, log_error, log_warn};
pub use matcher::{MatchField, MatchInfo, find_match};
pub use template::Template;
