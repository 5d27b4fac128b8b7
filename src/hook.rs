//! 新文章入口 Hook
//!
//! host 聚合器在每篇文章入库时调用 [`EntryHook::on_new_entry`]。
//! 该入口对 host 是不可失败的：配置损坏、模板非法、传输失败都只产生
//! 日志，绝不中断 host 的入库流水线。
//!
//! 注意：关键词匹配结果目前不决定是否投递——每篇未被跳过的文章都会
//! 触发一次 WebHook 调用，匹配只影响日志注解。设置表单的措辞暗示
//! 过滤语义，这里保留现状行为，由集成测试
//! `dispatches_even_without_keyword_match` 固定。

use crate::article::Article;
use crate::config::{ConfigLoader, WebhookConfig};
use crate::dispatch::{DispatchOutcome, DispatchRequest, WebhookDispatcher};
use crate::error::Result;
use crate::logging::{log_error, log_warn};
use crate::matcher::find_match;
use crate::template::Template;

/// 入口 Hook 编排器
pub struct EntryHook {
    loader: ConfigLoader,
    dispatcher: WebhookDispatcher,
}

impl EntryHook {
    pub fn new(loader: ConfigLoader) -> Result<Self> {
        Ok(Self {
            loader,
            dispatcher: WebhookDispatcher::new()?,
        })
    }

    /// host 每插入一篇新文章调用一次
    pub async fn on_new_entry(&self, article: &mut Article) {
        // 配置每次重新读取；读不到日志开关时按开启处理
        let config = match self.loader.load() {
            Ok(config) => config,
            Err(err) => {
                log_error(true, format!("failed to load webhook config: {err}"));
                return;
            }
        };

        if config.ignore_updated && article.is_updated {
            log_warn(
                true,
                format!("ignore_updated: {} | {}", article.link, article.title),
            );
            return;
        }

        let annotation = match find_match(&config.keywords, article, &config.search_in) {
            Some(info) => {
                let line = format!(
                    "matched pattern /{}/ on {} \"{}\" | link: {}",
                    info.pattern, info.field, info.value, article.link
                );
                log_warn(config.enable_logging, &line);
                line
            }
            None => String::new(),
        };

        if config.mark_as_read {
            article.mark_read();
        }

        let body = Template::parse(&config.webhook_body).render(article);
        let request = DispatchRequest {
            url: &config.webhook_url,
            method: config.webhook_method,
            body_type: config.webhook_body_type,
            body: &body,
            headers: &config.webhook_headers,
            logging_enabled: config.enable_logging,
            annotation: &annotation,
        };
        // 结果已在分发器内部记录，这里不再向 host 传播任何失败
        let _ = self.dispatcher.deliver(&request).await;
    }

    /// 设置表单的测试请求：用待保存的配置立即触发一次分发
    ///
    /// 不经过任何真实文章，body 模板原样发送（与正式路径共用同一分发器）。
    pub async fn send_test_request(&self, config: &WebhookConfig) -> DispatchOutcome {
        let request = DispatchRequest {
            url: &config.webhook_url,
            method: config.webhook_method,
            body_type: config.webhook_body_type,
            body: &config.webhook_body,
            headers: &config.webhook_headers,
            logging_enabled: config.enable_logging,
            annotation: "test request",
        };
        let outcome = self.dispatcher.deliver(&request).await;
        if let Some(err) = outcome.as_error() {
            log_error(
                config.enable_logging,
                format!("error when sending test webhook: {err}"),
            );
        }
        outcome
    }
}
