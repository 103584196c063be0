//! HTTP 请求封装模块
//!
//! 基于 `gloo-net` 提供简洁的 HTTP 客户端接口，
//! 并把响应统一转换为 `SourceResult`。

use gloo_net::http::{Request, RequestBuilder};
use quizhub_shared::HEADER_AUTHORIZATION;
use quizhub_shared::protocol::HttpMethod;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{SourceError, SourceResult};

/// HTTP 响应封装
///
/// 响应体在发送阶段就被完整读取，后续处理不再依赖浏览器对象。
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析响应
    ///
    /// 非 2xx 状态转换为对应的 `SourceError`；
    /// 空响应体（如 204）按 JSON `null` 解析，以支持 `()` 响应类型。
    pub fn decode<T: DeserializeOwned>(self) -> SourceResult<T> {
        if !self.ok() {
            return Err(SourceError::from_status(self.status, &self.body));
        }

        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        serde_json::from_str(body).map_err(SourceError::from)
    }
}

/// HTTP 请求构建器
pub struct HttpRequestBuilder {
    url: String,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl HttpRequestBuilder {
    fn new(url: String, method: HttpMethod) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 添加请求头
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 添加 Bearer Token 认证头
    pub fn bearer(self, token: &str) -> Self {
        self.header(HEADER_AUTHORIZATION, &format!("Bearer {}", token))
    }

    /// 设置 JSON 请求体
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> SourceResult<Self> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    fn into_gloo(self) -> (RequestBuilder, Option<String>) {
        let mut builder = match self.method {
            HttpMethod::Get => Request::get(&self.url),
            HttpMethod::Post => Request::post(&self.url),
            HttpMethod::Put => Request::put(&self.url),
            HttpMethod::Delete => Request::delete(&self.url),
        };

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        (builder, self.body)
    }

    /// 发送请求并读取完整响应体
    pub async fn send(self) -> SourceResult<HttpResponse> {
        let method = self.method;
        let url = self.url.clone();
        let (builder, body) = self.into_gloo();

        let response = match body {
            Some(body) => {
                let request = builder
                    .body(body)
                    .map_err(|e| SourceError::Network(format!("failed to build request: {}", e)))?;
                request.send().await
            }
            None => builder.send().await,
        }
        .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        leptos::logging::log!("[Http] {} {} -> {}", method.as_str(), url, status);
        Ok(HttpResponse::new(status, text))
    }
}

/// 轻量级 HTTP 客户端
pub struct HttpClient;

impl HttpClient {
    /// 按方法创建请求
    pub fn request(method: HttpMethod, url: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(url.to_string(), method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_body() {
        let response = HttpResponse::new(200, "[1, 2, 3]");
        assert_eq!(response.decode::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_empty_body_as_unit() {
        HttpResponse::new(204, "").decode::<()>().unwrap();
        HttpResponse::new(200, "  ").decode::<()>().unwrap();
    }

    #[test]
    fn test_decode_unauthorized() {
        let err = HttpResponse::new(401, "").decode::<Vec<u8>>().unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = HttpResponse::new(200, "<html>").decode::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_json_sets_content_type() {
        let builder = HttpClient::request(HttpMethod::Post, "http://x/api")
            .bearer("abc")
            .json(&vec!["a"])
            .unwrap();
        assert_eq!(builder.body.as_deref(), Some(r#"["a"]"#));
        assert!(
            builder
                .headers
                .contains(&("Authorization".to_string(), "Bearer abc".to_string()))
        );
        assert!(
            builder
                .headers
                .contains(&("Content-Type".to_string(), "application/json".to_string()))
        );
    }
}
