//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use quizhub_shared::QuizId;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (需要认证)
    #[default]
    Home,
    /// 登录 / 注册页面
    Login,
    Account,
    Settings,
    Quizzes,
    CreateQuiz,
    EditQuiz(QuizId),
    PlayQuiz(QuizId),
    Leaderboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["account"] => Self::Account,
            ["settings"] => Self::Settings,
            ["quizzes"] => Self::Quizzes,
            ["create-quiz"] => Self::CreateQuiz,
            ["edit-quiz", id] => id.parse().map(Self::EditQuiz).unwrap_or(Self::NotFound),
            ["play", id] => id.parse().map(Self::PlayQuiz).unwrap_or(Self::NotFound),
            ["leaderboard"] => Self::Leaderboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Account => "/account".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::Quizzes => "/quizzes".to_string(),
            Self::CreateQuiz => "/create-quiz".to_string(),
            Self::EditQuiz(id) => format!("/edit-quiz/{}", id),
            Self::PlayQuiz(id) => format!("/play/{}", id),
            Self::Leaderboard => "/leaderboard".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }

    /// 根据认证状态决定实际要进入的路由
    pub fn guard(self, is_authenticated: bool) -> Self {
        if self.requires_auth() && !is_authenticated {
            Self::auth_failure_redirect()
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            Self::auth_success_redirect()
        } else {
            self
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests;
