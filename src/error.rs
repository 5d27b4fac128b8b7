//! 统一异常处理模块

use thiserror::Error;

/// 推送引擎错误类型
#[derive(Debug, Error)]
pub enum HookError {
    /// 配置错误（文件不可读、格式非法、关键字段缺失）
    #[error("Configuration error: {0}")]
    Config(String),

    /// 渲染后的 body 模板无法解析为 JSON
    #[error("Body template parse error: {0}")]
    BodyParse(String),

    /// 解码后的 body 形状与声明的 body type 不符
    #[error("Body type mismatch: {0}")]
    BodyTypeMismatch(String),

    /// 传输层错误（连接 / DNS / TLS）
    #[error("Transport error: {0}")]
    Transport(String),

    /// 响应元数据读取失败
    #[error("Response metadata error: {0}")]
    Metadata(String),
}

pub type Result<T> = std::result::Result<T, HookError>;
