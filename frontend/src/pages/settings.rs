use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::icons::LogOut;
use crate::components::layout::AppShell;
use crate::config::StorageMode;
use crate::use_app;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let username = auth.username();

    let (mode, api_url) = {
        let app = app.read_value();
        (app.source.mode(), app.config.api_url.clone())
    };
    let mode_hint = match mode {
        StorageMode::Api => "Quizzes, scores and friendships are stored on the QuizHub server.",
        StorageMode::Local => "Everything is stored in this browser. Clearing site data removes it.",
    };

    let on_logout = move |_| logout(&auth, &app.read_value());

    view! {
        <AppShell title="Settings">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Data storage"</h3>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <tbody>
                                <tr>
                                    <th class="w-40">"Mode"</th>
                                    <td><span class="badge badge-primary badge-outline">{mode.to_string()}</span></td>
                                </tr>
                                <Show when=move || mode == StorageMode::Api>
                                    <tr>
                                        <th>"API URL"</th>
                                        <td><code class="text-sm">{api_url.clone()}</code></td>
                                    </tr>
                                </Show>
                                <tr>
                                    <th>"Signed in as"</th>
                                    <td>{move || username.get()}</td>
                                </tr>
                            </tbody>
                        </table>
                    </div>
                    <p class="text-sm text-base-content/70">{mode_hint}</p>
                    <p class="text-xs text-base-content/50">
                        "The storage mode is chosen when the app is built and cannot be changed here."
                    </p>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body flex-row items-center justify-between">
                    <div>
                        <h3 class="card-title">"Session"</h3>
                        <p class="text-sm text-base-content/70">"Log out of QuizHub on this device."</p>
                    </div>
                    <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                        <LogOut attr:class="h-4 w-4" />
                        "Log out"
                    </button>
                </div>
            </div>
        </AppShell>
    }
}
