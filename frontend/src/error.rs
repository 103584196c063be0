//! 错误类型模块
//!
//! - `SourceError`: 数据源（API / 本地存储）统一的失败类型
//! - `FormError`: 表单校验错误，在产生处即确定为纯文本或结构化问题列表

use serde::Deserialize;
use thiserror::Error;

// =========================================================
// 数据源错误
// =========================================================

/// 两种数据源实现共用的错误类型
///
/// API 实现按 HTTP 状态码映射，本地实现直接构造对应变体，
/// UI 层只需要处理这一种类型。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// 401: 凭据无效或会话过期，UI 需跳转到登录页
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,

    /// 403: 无权操作该资源
    #[error("{0}")]
    Forbidden(String),

    /// 404: 资源不存在
    #[error("{0}")]
    NotFound(String),

    /// 409: 资源冲突（用户名已占用、重复邀请等）
    #[error("{0}")]
    Conflict(String),

    /// 400 / 422: 请求内容未通过校验
    #[error("{0}")]
    Invalid(String),

    /// 请求未能到达服务器
    #[error("Network error: {0}")]
    Network(String),

    /// 其它非 2xx 响应
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 响应体无法解析
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// 本地存储读写失败
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for data source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// 后端错误响应体中可能出现的消息字段
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    title: Option<String>,
}

impl SourceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SourceError::Unauthorized)
    }

    /// 根据 HTTP 状态码和响应体构造错误
    ///
    /// 优先使用响应体中的 `message` / `error` / `title` 字段，
    /// 其次使用非 JSON 的纯文本响应体，最后退回到默认描述。
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        let or_default = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_string());

        match status {
            401 => SourceError::Unauthorized,
            403 => SourceError::Forbidden(or_default("You are not allowed to do that")),
            404 => SourceError::NotFound(or_default("The requested resource was not found")),
            409 => SourceError::Conflict(or_default("The resource already exists")),
            400 | 422 => SourceError::Invalid(or_default("The request was invalid")),
            _ => SourceError::Server {
                status,
                message: or_default("Unexpected server error"),
            },
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed.message.or(parsed.error).or(parsed.title),
        Err(_) if !trimmed.starts_with('{') && !trimmed.starts_with('[') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode(e.to_string())
    }
}

// =========================================================
// 表单错误
// =========================================================

/// 结构化校验问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 表单字段错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Plain(String),
    Structured(Vec<Issue>),
}

impl FormError {
    pub fn plain(message: impl Into<String>) -> Self {
        FormError::Plain(message.into())
    }

    /// 该错误要展示的消息
    pub fn message(&self) -> Option<&str> {
        match self {
            FormError::Plain(message) => Some(message.as_str()),
            FormError::Structured(issues) => issues.first().map(|issue| issue.message.as_str()),
        }
    }
}

impl From<&SourceError> for FormError {
    fn from(e: &SourceError) -> Self {
        FormError::Plain(e.to_string())
    }
}

/// 将一组错误归约为单条展示消息；没有消息时返回 `None`（不渲染）
pub fn first_message(errors: &[FormError]) -> Option<String> {
    errors
        .first()
        .and_then(FormError::message)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_distinct() {
        assert!(SourceError::from_status(401, "").is_unauthorized());
        assert!(!SourceError::from_status(403, "").is_unauthorized());
        assert!(!SourceError::from_status(500, "").is_unauthorized());
    }

    #[test]
    fn test_status_mapping_uses_body_message() {
        assert_eq!(
            SourceError::from_status(409, r#"{"message":"Username is taken"}"#),
            SourceError::Conflict("Username is taken".to_string())
        );
        assert_eq!(
            SourceError::from_status(400, r#"{"title":"One or more validation errors occurred."}"#),
            SourceError::Invalid("One or more validation errors occurred.".to_string())
        );
        assert_eq!(
            SourceError::from_status(404, "Quiz not found"),
            SourceError::NotFound("Quiz not found".to_string())
        );
    }

    #[test]
    fn test_status_mapping_falls_back_to_default() {
        match SourceError::from_status(503, "{}") {
            SourceError::Server { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Unexpected server error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            SourceError::from_status(422, "[1,2]"),
            SourceError::Invalid("The request was invalid".to_string())
        );
    }

    #[test]
    fn test_first_message_empty_renders_nothing() {
        assert_eq!(first_message(&[]), None);
        assert_eq!(first_message(&[FormError::Structured(vec![])]), None);
        assert_eq!(first_message(&[FormError::plain("")]), None);
    }

    #[test]
    fn test_first_message_plain() {
        let errors = vec![FormError::plain("Title is required"), FormError::plain("ignored")];
        assert_eq!(first_message(&errors).as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_first_message_structured() {
        let errors = vec![FormError::Structured(vec![
            Issue::new("Question 1 needs text"),
            Issue::new("Question 3 needs text"),
        ])];
        assert_eq!(first_message(&errors).as_deref(), Some("Question 1 needs text"));
    }
}
