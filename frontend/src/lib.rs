#![recursion_limit = "256"]
//! QuizHub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `data_source`: 数据源（远程 API / 浏览器本地存储），启动时选定
//! - `auth`: 认证状态管理
//! - `pages` / `components`: UI 层

mod auth;
mod config;
mod data_source;
mod error;
mod validation;

mod components {
    pub mod icons;
    pub mod layout;
    pub mod ui {
        pub mod checkbox;
        pub mod divider;
        pub mod form;
    }
}

mod hooks {
    pub mod card_color;
    pub mod date;
    pub mod medal;
    pub mod notifications;
}

mod pages {
    pub mod account;
    pub mod create_quiz;
    pub mod edit_quiz;
    pub mod home;
    pub mod leaderboard;
    pub mod login;
    pub mod not_found;
    pub mod play;
    pub mod quiz_form;
    pub mod quizzes;
    pub mod settings;
}

// 浏览器 API 封装模块
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    mod timer;

    pub use http::HttpClient;
    pub use timer::Interval;
}

use leptos::logging::log;
use leptos::prelude::*;

use crate::auth::{AuthContext, init_auth};
use crate::config::AppConfig;
use crate::data_source::{DataSource, SessionStore};
use crate::hooks::notifications::use_invite_notifications;
use crate::pages::{
    account::AccountPage, create_quiz::CreateQuizPage, edit_quiz::EditQuizPage, home::HomePage,
    leaderboard::LeaderboardPage, login::LoginPage, not_found::NotFoundPage, play::PlayPage,
    quizzes::QuizzesPage, settings::SettingsPage,
};
use crate::web::storage::JsonStore;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 应用级依赖，启动时创建一次
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub source: DataSource,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn new(config: AppConfig, store: JsonStore) -> Self {
        let source = DataSource::from_config(&config, store.clone());
        Self {
            config,
            source,
            sessions: SessionStore::new(store),
        }
    }
}

/// 从 Context 获取应用依赖
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Account => view! { <AccountPage /> }.into_any(),
        AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
        AppRoute::Quizzes => view! { <QuizzesPage /> }.into_any(),
        AppRoute::CreateQuiz => view! { <CreateQuizPage /> }.into_any(),
        AppRoute::EditQuiz(id) => view! { <EditQuizPage id=id /> }.into_any(),
        AppRoute::PlayQuiz(id) => view! { <PlayPage id=id /> }.into_any(),
        AppRoute::Leaderboard => view! { <LeaderboardPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置并选定数据源
    let config = AppConfig::from_env();
    log!("[Config] Storage mode: {}, API: {}", config.storage, config.api_url);
    let app = AppContext::new(config, JsonStore::browser());
    provide_context(app.clone());

    // 2. 创建认证上下文并恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx, &app);

    // 3. 邀请通知轮询，整个应用共享一份
    provide_context(use_invite_notifications());

    // 4. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
