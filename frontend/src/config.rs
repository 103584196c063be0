//! 构建期配置
//!
//! 与 `NEXT_PUBLIC_*` 类似，配置在编译时通过环境变量注入：
//! - `QUIZHUB_API_URL`: 后端 API 地址
//! - `QUIZHUB_STORAGE`: 数据源选择（`api` / `local`）

use leptos::logging::warn;
use std::fmt::Display;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// 数据源模式，进程生命周期内不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// 远程 API
    #[default]
    Api,
    /// 浏览器本地存储
    Local,
}

impl StorageMode {
    /// 解析存储模式开关
    ///
    /// 未设置或无法识别时使用 API 模式。
    pub fn parse(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Api;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "local" | "localstorage" | "local_storage" | "true" | "1" => Self::Local,
            "" | "api" | "remote" | "false" | "0" => Self::Api,
            other => {
                warn!("[Config] Unknown storage mode '{}', falling back to api", other);
                Self::Api
            }
        }
    }
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Api => write!(f, "Remote API"),
            StorageMode::Local => write!(f, "Local storage"),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub storage: StorageMode,
}

impl AppConfig {
    /// 读取构建期注入的环境变量
    pub fn from_env() -> Self {
        Self::from_values(option_env!("QUIZHUB_API_URL"), option_env!("QUIZHUB_STORAGE"))
    }

    pub fn from_values(api_url: Option<&str>, storage: Option<&str>) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_url,
            storage: StorageMode::parse(storage),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}
