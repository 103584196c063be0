use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::{Quiz, QuizId};

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::components::layout::{AlertBanner, AppShell, Spinner, SuccessBanner, report_error};
use crate::data_source::QuizSource;
use crate::hooks::card_color::card_color;
use crate::hooks::date::time_ago;
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn QuizzesPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());

    let quizzes = RwSignal::new(Vec::<Quiz>::new());
    let loading = RwSignal::new(true);
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<String>::None);

    let current_user = move || auth.state.with(|s| s.session.as_ref().map(|s| s.user_id));

    let load_quizzes = move || {
        let app = app.get_value();
        loading.set(true);
        spawn_local(async move {
            match app.source.list_quizzes().await {
                Ok(data) => {
                    quizzes.try_set(data);
                    error_msg.try_set(None);
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            loading.try_set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| load_quizzes());

    let handle_delete = move |id: QuizId| {
        let confirmed = window()
            .confirm_with_message("Delete this quiz? This cannot be undone.")
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let app = app.get_value();
        spawn_local(async move {
            match app.source.delete_quiz(id).await {
                Ok(()) => {
                    quizzes.try_update(|list| list.retain(|q| q.id != id));
                    notice.try_set(Some("Quiz deleted".to_string()));
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
        });
    };

    view! {
        <AppShell title="Quizzes">
            <div class="flex items-center justify-between">
                <p class="text-base-content/70">"Pick a quiz to play, or manage the ones you created."</p>
                <div class="flex gap-2">
                    <button
                        class="btn btn-ghost btn-circle"
                        on:click=move |_| load_quizzes()
                        disabled=move || loading.get()
                    >
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                    <Link to=AppRoute::CreateQuiz class="btn btn-primary gap-2">
                        <Plus attr:class="h-4 w-4" />
                        "New quiz"
                    </Link>
                </div>
            </div>

            <AlertBanner message=error_msg />
            <SuccessBanner message=notice />

            <Show when=move || loading.get() && quizzes.with(Vec::is_empty)>
                <Spinner />
            </Show>

            <Show when=move || !loading.get() && quizzes.with(Vec::is_empty)>
                <div class="text-center py-12 text-base-content/50">
                    "No quizzes yet. Create one to get started."
                </div>
            </Show>

            <div class="grid gap-4 md:grid-cols-2">
                <For
                    each=move || quizzes.get()
                    key=|quiz| (quiz.id, quiz.title.clone(), quiz.questions.len())
                    let:quiz
                >
                    <QuizCard
                        is_owner=current_user() == Some(quiz.owner.id)
                        quiz=quiz
                        on_delete=Callback::new(handle_delete)
                    />
                </For>
            </div>
        </AppShell>
    }
}

#[component]
fn QuizCard(quiz: Quiz, is_owner: bool, on_delete: Callback<QuizId>) -> impl IntoView {
    let router = use_router();
    let id = quiz.id;
    let question_count = quiz.questions.len();

    let actions = if is_owner {
        view! {
            <span class="badge badge-ghost">"Yours"</span>
            <button class="btn btn-sm btn-ghost gap-1" on:click=move |_| router.navigate_to(AppRoute::EditQuiz(id))>
                <Pencil attr:class="h-4 w-4" />
                "Edit"
            </button>
            <button class="btn btn-sm btn-ghost text-error gap-1" on:click=move |_| on_delete.run(id)>
                <Trash attr:class="h-4 w-4" />
                "Delete"
            </button>
        }
        .into_any()
    } else {
        view! {
            <button class="btn btn-sm btn-primary gap-1" on:click=move |_| router.navigate_to(AppRoute::PlayQuiz(id))>
                <Play attr:class="h-4 w-4" />
                "Play"
            </button>
        }
        .into_any()
    };

    view! {
        <div class="card bg-base-100 shadow-xl overflow-hidden">
            <div class=format!("h-3 {}", card_color(id))></div>
            <div class="card-body">
                <h2 class="card-title">{quiz.title}</h2>
                <p class="text-base-content/70 line-clamp-2">{quiz.description}</p>
                <div class="flex flex-wrap gap-2 text-xs text-base-content/60">
                    <span>"by " {quiz.owner.username}</span>
                    <span>"·"</span>
                    <span title=crate::hooks::date::format_date(quiz.created_at)>{time_ago(quiz.created_at)}</span>
                    <span>"·"</span>
                    <span>{question_count} {if question_count == 1 { " question" } else { " questions" }}</span>
                </div>
                <div class="card-actions justify-end items-center mt-2">{actions}</div>
            </div>
        </div>
    }
}
