//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use leptos::logging::{log, warn};
use leptos::prelude::*;
use quizhub_shared::{LoginRequest, RegisterRequest};

use crate::AppContext;
use crate::data_source::{AuthSession, QuizSource};
use crate::error::{SourceError, SourceResult};

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// 当前会话（仅在认证成功后存在）
    pub session: Option<AuthSession>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    ///
    /// 只在登录/退出切换时通知订阅者，会话内容变化不会触发。
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Memo::new(move |_| state.with(AuthState::is_authenticated)).into()
    }

    /// 当前用户名，未登录时为空
    pub fn username(&self) -> Signal<String> {
        let state = self.state;
        Signal::derive(move || {
            state.with(|s| {
                s.session
                    .as_ref()
                    .map(|session| session.username.clone())
                    .unwrap_or_default()
            })
        })
    }

    fn set_session(&self, session: Option<AuthSession>) {
        self.set_state.set(AuthState { session });
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从存储中恢复上次的会话；token 是否仍然有效由后续请求决定，
/// 失效时会收到 `Unauthorized` 并退出登录。
pub fn init_auth(ctx: &AuthContext, app: &AppContext) {
    let session = app.sessions.load();
    if let Some(session) = &session {
        log!("[Auth] Restored session for {}", session.username);
    }
    ctx.set_session(session);
}

/// 保存会话并更新状态
fn sign_in(ctx: &AuthContext, app: &AppContext, session: AuthSession) -> SourceResult<()> {
    app.sessions.save(&session)?;
    log!("[Auth] Signed in as {}", session.username);
    ctx.set_session(Some(session));
    Ok(())
}

/// 登录
pub async fn login(ctx: &AuthContext, app: &AppContext, request: LoginRequest) -> SourceResult<()> {
    let response = app.source.login(request).await?;
    sign_in(ctx, app, response.into())
}

/// 注册后直接登录
pub async fn register(
    ctx: &AuthContext,
    app: &AppContext,
    request: RegisterRequest,
) -> SourceResult<()> {
    let response = app.source.register(request).await?;
    sign_in(ctx, app, response.into())
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext, app: &AppContext) {
    app.sessions.clear();
    ctx.set_session(None);
    log!("[Auth] Signed out");
}

/// 处理页面操作返回的错误
///
/// `Unauthorized` 表示会话已失效，直接退出登录（路由会重定向到登录页），
/// 返回 `true` 表示错误已被处理，调用方无需再展示。
pub fn handle_unauthorized(ctx: &AuthContext, app: &AppContext, error: &SourceError) -> bool {
    if error.is_unauthorized() {
        warn!("[Auth] Session rejected, signing out");
        logout(ctx, app);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(username: &str) -> AuthSession {
        AuthSession {
            token: "token".to_string(),
            user_id: 1,
            username: username.to_string(),
            email: format!("{}@example.com", username),
        }
    }

    #[test]
    fn test_starts_signed_out() {
        Owner::new().with(|| {
            let ctx = AuthContext::new();
            assert_eq!(ctx.state.get_untracked(), AuthState::default());
            assert!(!ctx.is_authenticated_signal().get_untracked());
            assert_eq!(ctx.username().get_untracked(), "");
        });
    }

    #[test]
    fn test_session_drives_authenticated_signal() {
        Owner::new().with(|| {
            let ctx = AuthContext::new();
            let is_authenticated = ctx.is_authenticated_signal();

            ctx.set_session(Some(session("alice")));
            assert!(is_authenticated.get_untracked());
            assert_eq!(ctx.username().get_untracked(), "alice");

            ctx.set_session(None);
            assert!(!is_authenticated.get_untracked());
        });
    }
}
