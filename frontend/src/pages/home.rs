use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::components::layout::AppShell;
use crate::hooks::notifications::use_pending_invites;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn HomePage() -> impl IntoView {
    let username = use_auth().username();
    let notifications = use_pending_invites();

    view! {
        <AppShell title="Home">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title text-2xl">
                        "Welcome back, " {move || username.get()} "!"
                    </h2>
                    <p class="text-base-content/70">
                        "Create true/false quizzes, challenge your friends and climb the leaderboard."
                    </p>
                    <Show when=move || notifications.has_pending.get()>
                        <Link to=AppRoute::Account class="alert alert-info mt-2">
                            <Bell attr:class="h-5 w-5" />
                            <span>
                                "You have " {move || notifications.pending_count.get()}
                                {move || if notifications.pending_count.get() == 1 { " pending friend invite" } else { " pending friend invites" }}
                            </span>
                        </Link>
                    </Show>
                </div>
            </div>

            <div class="grid gap-4 md:grid-cols-2">
                <Shortcut to=AppRoute::Quizzes title="Browse quizzes" description="Play quizzes created by other players.">
                    <BookOpen attr:class="h-8 w-8 text-primary" />
                </Shortcut>
                <Shortcut to=AppRoute::CreateQuiz title="Create a quiz" description="Write your own true/false questions.">
                    <Plus attr:class="h-8 w-8 text-secondary" />
                </Shortcut>
                <Shortcut to=AppRoute::Leaderboard title="Leaderboard" description="See who has the highest total score.">
                    <Trophy attr:class="h-8 w-8 text-accent" />
                </Shortcut>
                <Shortcut to=AppRoute::Account title="Friends" description="Manage friends and pending invites.">
                    <UserPlus attr:class="h-8 w-8 text-info" />
                </Shortcut>
            </div>
        </AppShell>
    }
}

#[component]
fn Shortcut(
    to: AppRoute,
    title: &'static str,
    description: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <Link to=to class="card bg-base-100 shadow hover:shadow-xl transition-shadow">
            <div class="card-body flex-row items-center gap-4">
                {children()}
                <div>
                    <h3 class="card-title">{title}</h3>
                    <p class="text-sm text-base-content/70">{description}</p>
                </div>
            </div>
        </Link>
    }
}
