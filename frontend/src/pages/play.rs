use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::{
    AnswerSubmission, PlayQuestion, PlayResult, PlaySubmission, PlayableQuiz, QuestionId, QuizId,
};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::icons::{Check, RefreshCw, Trophy, X};
use crate::components::layout::{AlertBanner, AppShell, Spinner, report_error};
use crate::data_source::QuizSource;
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 按题目顺序生成提交内容；未作答的题目不提交
fn build_submission(quiz: &PlayableQuiz, answers: &HashMap<QuestionId, bool>) -> PlaySubmission {
    PlaySubmission {
        answers: quiz
            .questions
            .iter()
            .filter_map(|q| {
                answers.get(&q.id).map(|&answer| AnswerSubmission {
                    question_id: q.id,
                    answer,
                })
            })
            .collect(),
    }
}

#[component]
pub fn PlayPage(id: QuizId) -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());

    let quiz = RwSignal::new(Option::<PlayableQuiz>::None);
    let answers = RwSignal::new(HashMap::<QuestionId, bool>::new());
    let result = RwSignal::new(Option::<PlayResult>::None);
    let loading = RwSignal::new(true);
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    Effect::new(move |_| {
        let app = app.get_value();
        spawn_local(async move {
            match app.source.get_playable_quiz(id).await {
                Ok(data) => {
                    quiz.try_set(Some(data));
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            loading.try_set(false);
        });
    });

    let all_answered = move || {
        quiz.with(|q| {
            q.as_ref()
                .is_some_and(|q| answers.with(|a| q.questions.iter().all(|x| a.contains_key(&x.id))))
        })
    };

    let handle_submit = move |_| {
        let Some(submission) = quiz.with_untracked(|q| {
            q.as_ref()
                .map(|q| answers.with_untracked(|a| build_submission(q, a)))
        }) else {
            return;
        };

        is_submitting.set(true);
        error_msg.set(None);
        let app = app.get_value();
        spawn_local(async move {
            match app.source.submit_play(id, submission).await {
                Ok(outcome) => {
                    result.try_set(Some(outcome));
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            is_submitting.try_set(false);
        });
    };

    let play_again = move |_| {
        answers.set(HashMap::new());
        result.set(None);
    };

    let title = move || quiz.with(|q| q.as_ref().map(|q| q.title.clone()).unwrap_or_default());

    view! {
        <AppShell title="Play">
            <AlertBanner message=error_msg />

            <Show when=move || loading.get()>
                <Spinner />
            </Show>

            {move || result.get().map(|outcome| view! {
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body items-center text-center">
                        <Trophy attr:class="h-12 w-12 text-warning" />
                        <h2 class="card-title text-2xl">{title()}</h2>
                        <p class="text-5xl font-bold my-4">
                            {outcome.score} " / " {outcome.total}
                        </p>
                        <progress
                            class="progress progress-primary w-56"
                            value=outcome.score
                            max=outcome.total.max(1)
                        ></progress>
                        <div class="card-actions mt-4">
                            <button class="btn btn-outline gap-2" on:click=play_again>
                                <RefreshCw attr:class="h-4 w-4" />
                                "Play again"
                            </button>
                            <Link to=AppRoute::Leaderboard class="btn btn-primary">"Leaderboard"</Link>
                            <Link to=AppRoute::Quizzes class="btn btn-ghost">"More quizzes"</Link>
                        </div>
                    </div>
                </div>
            })}

            <Show when=move || quiz.with(Option::is_some) && result.with(Option::is_none)>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title text-2xl">{title}</h2>
                        <p class="text-base-content/70">
                            {move || quiz.with(|q| q.as_ref().map(|q| q.description.clone()).unwrap_or_default())}
                        </p>
                        <p class="text-sm text-base-content/60">
                            "by " {move || quiz.with(|q| q.as_ref().map(|q| q.owner.username.clone()).unwrap_or_default())}
                        </p>
                    </div>
                </div>

                <div class="space-y-3">
                    <For
                        each=move || {
                            quiz.with(|q| q.as_ref().map(|q| q.questions.clone()).unwrap_or_default())
                                .into_iter()
                                .enumerate()
                        }
                        key=|(_, question)| question.id
                        let:item
                    >
                        <QuestionCard index=item.0 question=item.1 answers=answers />
                    </For>
                </div>

                <div class="flex justify-end">
                    <button
                        class="btn btn-primary"
                        on:click=handle_submit
                        disabled=move || !all_answered() || is_submitting.get()
                    >
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                        } else {
                            "Submit answers".into_any()
                        }}
                    </button>
                </div>
            </Show>
        </AppShell>
    }
}

#[component]
fn QuestionCard(
    index: usize,
    question: PlayQuestion,
    answers: RwSignal<HashMap<QuestionId, bool>>,
) -> impl IntoView {
    let id = question.id;
    let selected = move || answers.with(|a| a.get(&id).copied());
    let choose = move |value: bool| answers.update(|a| {
        a.insert(id, value);
    });

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body flex-col md:flex-row md:items-center gap-4">
                <p class="flex-1">
                    <span class="font-semibold mr-2">{format!("{}.", index + 1)}</span>
                    {question.text}
                </p>
                <div class="join">
                    <button
                        class=move || if selected() == Some(true) { "btn join-item btn-success gap-1" } else { "btn join-item gap-1" }
                        on:click=move |_| choose(true)
                    >
                        <Check attr:class="h-4 w-4" />
                        "True"
                    </button>
                    <button
                        class=move || if selected() == Some(false) { "btn join-item btn-error gap-1" } else { "btn join-item gap-1" }
                        on:click=move |_| choose(false)
                    >
                        <X attr:class="h-4 w-4" />
                        "False"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_shared::UserRef;

    #[test]
    fn test_submission_follows_question_order_and_skips_unanswered() {
        let quiz = PlayableQuiz {
            id: 1,
            title: "T".to_string(),
            description: String::new(),
            owner: UserRef {
                id: 1,
                username: "owner".to_string(),
            },
            questions: (1..=3)
                .map(|id| PlayQuestion {
                    id,
                    text: format!("Q{}", id),
                })
                .collect(),
        };
        let answers = HashMap::from([(3, false), (1, true)]);

        let submission = build_submission(&quiz, &answers);
        assert_eq!(
            submission.answers,
            vec![
                AnswerSubmission {
                    question_id: 1,
                    answer: true
                },
                AnswerSubmission {
                    question_id: 3,
                    answer: false
                },
            ]
        );
    }
}
