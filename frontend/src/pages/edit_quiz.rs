use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::{QuizDraft, QuizId};

use crate::auth::use_auth;
use crate::components::layout::{AlertBanner, AppShell, Spinner, report_error};
use crate::data_source::QuizSource;
use crate::pages::quiz_form::{QuizForm, QuizFormState};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 编辑页的加载阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Loading,
    Ready,
    /// 加载失败或无权编辑
    Unavailable,
}

#[component]
pub fn EditQuizPage(id: QuizId) -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let router = use_router();

    let state = QuizFormState::new();
    let load_state = RwSignal::new(LoadState::Loading);
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    Effect::new(move |_| {
        let app = app.get_value();
        let user_id = auth.state.with_untracked(|s| s.session.as_ref().map(|s| s.user_id));
        spawn_local(async move {
            match app.source.get_quiz(id).await {
                Ok(quiz) if user_id.is_some_and(|uid| quiz.is_owned_by(uid)) => {
                    state.load(QuizDraft::from(&quiz));
                    load_state.try_set(LoadState::Ready);
                }
                Ok(_) => {
                    error_msg.try_set(Some("You can only edit quizzes you created.".to_string()));
                    load_state.try_set(LoadState::Unavailable);
                }
                Err(e) => {
                    report_error(&auth, &app, error_msg, e);
                    load_state.try_set(LoadState::Unavailable);
                }
            }
        });
    });

    let handle_submit = Callback::new(move |draft: QuizDraft| {
        is_submitting.set(true);
        error_msg.set(None);
        let app = app.get_value();
        spawn_local(async move {
            match app.source.update_quiz(id, draft).await {
                Ok(_) => router.navigate_to(AppRoute::Quizzes),
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            is_submitting.try_set(false);
        });
    });

    view! {
        <AppShell title="Edit quiz">
            <AlertBanner message=error_msg />
            {move || match load_state.get() {
                LoadState::Loading => view! { <Spinner /> }.into_any(),
                LoadState::Ready => view! {
                    <QuizForm
                        state=state
                        submit_label="Save changes"
                        on_submit=handle_submit
                        is_submitting=is_submitting
                    />
                }
                .into_any(),
                LoadState::Unavailable => view! {
                    <Link to=AppRoute::Quizzes class="btn btn-ghost">"Back to quizzes"</Link>
                }
                .into_any(),
            }}
        </AppShell>
    }
}
