use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::LeaderboardEntry;

use crate::auth::use_auth;
use crate::components::icons::RefreshCw;
use crate::components::layout::{AlertBanner, AppShell, report_error};
use crate::data_source::QuizSource;
use crate::hooks::medal::Medal;
use crate::use_app;

#[component]
pub fn LeaderboardPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());

    let entries = RwSignal::new(Vec::<LeaderboardEntry>::new());
    let loading = RwSignal::new(true);
    let error_msg = RwSignal::new(Option::<String>::None);

    let current_user = move || auth.state.with(|s| s.session.as_ref().map(|s| s.user_id));

    let load = move || {
        let app = app.get_value();
        loading.set(true);
        spawn_local(async move {
            match app.source.leaderboard().await {
                Ok(data) => {
                    entries.try_set(data);
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            loading.try_set(false);
        });
    };

    Effect::new(move |_| load());

    view! {
        <AppShell title="Leaderboard">
            <AlertBanner message=error_msg />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"Top players"</h3>
                            <p class="text-base-content/70 text-sm">"Total score across every quiz played."</p>
                        </div>
                        <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                            <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th class="w-20">"Rank"</th>
                                    <th>"Player"</th>
                                    <th class="text-right">"Score"</th>
                                    <th class="text-right hidden md:table-cell">"Quizzes played"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || !loading.get() && entries.with(Vec::is_empty)>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            "Nobody has played yet. Be the first!"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || entries.get()
                                    key=|entry| (entry.rank, entry.user_id, entry.total_score)
                                    let:entry
                                >
                                    <tr class=if current_user() == Some(entry.user_id) { "font-semibold bg-primary/10" } else { "" }>
                                        <td>
                                            {match Medal::for_rank(entry.rank) {
                                                Some(medal) => view! {
                                                    <span class="text-2xl" title=medal.label()>{medal.emoji()}</span>
                                                }
                                                .into_any(),
                                                None => view! { <span class="pl-2">{entry.rank}</span> }.into_any(),
                                            }}
                                        </td>
                                        <td>{entry.username}</td>
                                        <td class="text-right">{entry.total_score}</td>
                                        <td class="text-right hidden md:table-cell">{entry.quizzes_played}</td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
