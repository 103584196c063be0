//! 页面框架：导航栏、提示横幅与加载指示

use leptos::prelude::*;

use crate::AppContext;
use crate::auth::{AuthContext, handle_unauthorized, logout, use_auth};
use crate::components::icons::*;
use crate::error::SourceError;
use crate::hooks::notifications::use_pending_invites;
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 已登录页面的外壳
#[component]
pub fn AppShell(
    /// 页面标题
    #[prop(into)]
    title: String,
    children: Children,
) -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let notifications = use_pending_invites();

    let on_logout = move |_| logout(&auth, &app.read_value());

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-xl">
                <div class="flex-1">
                    <Link to=AppRoute::Home class="btn btn-ghost text-xl gap-2">
                        <Trophy attr:class="h-6 w-6 text-primary" />
                        "QuizHub"
                    </Link>
                </div>
                <div class="flex-none gap-1">
                    <Link to=AppRoute::Quizzes class="btn btn-ghost btn-sm gap-2">
                        <BookOpen attr:class="h-4 w-4" />
                        <span class="hidden md:inline">"Quizzes"</span>
                    </Link>
                    <Link to=AppRoute::Leaderboard class="btn btn-ghost btn-sm gap-2">
                        <Trophy attr:class="h-4 w-4" />
                        <span class="hidden md:inline">"Leaderboard"</span>
                    </Link>
                    <Link to=AppRoute::Account class="btn btn-ghost btn-sm gap-2">
                        <div class="indicator">
                            <Show when=move || notifications.has_pending.get()>
                                <span class="indicator-item badge badge-secondary badge-xs">
                                    {move || notifications.pending_count.get()}
                                </span>
                            </Show>
                            <Users attr:class="h-4 w-4" />
                        </div>
                        <span class="hidden md:inline">"Account"</span>
                    </Link>
                    <Link to=AppRoute::Settings class="btn btn-ghost btn-sm gap-2">
                        <Cog attr:class="h-4 w-4" />
                        <span class="hidden md:inline">"Settings"</span>
                    </Link>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" />
                        <span class="hidden md:inline">"Log out"</span>
                    </button>
                </div>
            </div>

            <main class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
                <h1 class="text-3xl font-bold">{title}</h1>
                {children()}
            </main>
        </div>
    }
}

/// 错误提示横幅；没有消息时不渲染
#[component]
pub fn AlertBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div role="alert" class="alert alert-error shadow">
                    <CircleAlert attr:class="h-5 w-5 shrink-0" />
                    <span>{text}</span>
                </div>
            }
        })
    }
}

/// 成功提示横幅
#[component]
pub fn SuccessBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div role="status" class="alert alert-success shadow">
                    <Check attr:class="h-5 w-5 shrink-0" />
                    <span>{text}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 页面操作失败时的统一处理
///
/// 会话失效时退出登录（路由随之跳转到登录页），其余错误显示在横幅中。
pub fn report_error(
    auth: &AuthContext,
    app: &AppContext,
    banner: RwSignal<Option<String>>,
    error: SourceError,
) {
    if !handle_unauthorized(auth, app, &error) {
        banner.try_set(Some(error.to_string()));
    }
}
