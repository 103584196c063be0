use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::QuizDraft;

use crate::auth::use_auth;
use crate::components::layout::{AlertBanner, AppShell, report_error};
use crate::data_source::QuizSource;
use crate::pages::quiz_form::{QuizForm, QuizFormState};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn CreateQuizPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let router = use_router();

    let state = QuizFormState::new();
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let handle_submit = Callback::new(move |draft: QuizDraft| {
        is_submitting.set(true);
        error_msg.set(None);
        let app = app.get_value();
        spawn_local(async move {
            match app.source.create_quiz(draft).await {
                Ok(quiz) => {
                    log!("[Quiz] Created quiz {}", quiz.id);
                    router.navigate_to(AppRoute::Quizzes);
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            is_submitting.try_set(false);
        });
    });

    view! {
        <AppShell title="Create a quiz">
            <AlertBanner message=error_msg />
            <QuizForm
                state=state
                submit_label="Create quiz"
                on_submit=handle_submit
                is_submitting=is_submitting
            />
        </AppShell>
    }
}
