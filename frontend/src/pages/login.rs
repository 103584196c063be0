use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::{LoginRequest, RegisterRequest};

use crate::auth::{self, use_auth};
use crate::components::icons::ShieldCheck;
use crate::components::layout::AlertBanner;
use crate::components::ui::divider::Divider;
use crate::components::ui::form::{FormField, FormInput, FormLabel, FormMessage};
use crate::config::StorageMode;
use crate::error::{FormError, SourceError};
use crate::use_app;
use crate::validation::{
    FIELD_CONFIRM, FIELD_EMAIL, FIELD_PASSWORD, FIELD_USERNAME, FieldErrors, validate_login,
    validate_registration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let is_local = app.read_value().source.mode() == StorageMode::Local;

    let mode = RwSignal::new(Mode::Login);
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());

    let field_errors = RwSignal::new(FieldErrors::new());
    let error_msg = RwSignal::new(Option::<String>::None);
    let is_submitting = RwSignal::new(false);

    let errors_for = move |field: &'static str| -> Signal<Vec<FormError>> {
        Signal::derive(move || field_errors.with(|e| e.get(field)))
    };

    let toggle_mode = move |_| {
        mode.update(|m| {
            *m = match m {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            }
        });
        field_errors.set(FieldErrors::new());
        error_msg.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let current_mode = mode.get_untracked();

        let errors = match current_mode {
            Mode::Login => validate_login(&username.get_untracked(), &password.get_untracked()),
            Mode::Register => validate_registration(
                &username.get_untracked(),
                &email.get_untracked(),
                &password.get_untracked(),
                &confirm.get_untracked(),
            ),
        };
        let has_errors = !errors.is_empty();
        field_errors.set(errors);
        if has_errors {
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let app = app.get_value();
        let username = username.get_untracked().trim().to_string();
        let password = password.get_untracked();
        let email = email.get_untracked().trim().to_string();
        spawn_local(async move {
            let result = match current_mode {
                Mode::Login => {
                    auth::login(&auth, &app, LoginRequest { username, password }).await
                }
                Mode::Register => {
                    auth::register(
                        &auth,
                        &app,
                        RegisterRequest {
                            username,
                            email,
                            password,
                        },
                    )
                    .await
                }
            };

            // 成功后路由监听认证状态自动跳转到首页
            if let Err(e) = result {
                let message = match e {
                    SourceError::Unauthorized => "Invalid username or password".to_string(),
                    other => other.to_string(),
                };
                error_msg.try_set(Some(message));
            }
            is_submitting.try_set(false);
        });
    };

    let is_register = move || mode.get() == Mode::Register;

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"QuizHub"</h1>
                        <p class="text-base-content/70">
                            {move || if is_register() {
                                "Create an account to start building quizzes"
                            } else {
                                "Log in to play and create quizzes"
                            }}
                        </p>
                        <Show when=move || is_local>
                            <span class="badge badge-outline">"Offline mode: data stays in this browser"</span>
                        </Show>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <AlertBanner message=error_msg />

                        <FormField name="username" errors=errors_for(FIELD_USERNAME)>
                            <FormLabel>"Username"</FormLabel>
                            <FormInput value=username autocomplete="username" />
                            <FormMessage />
                        </FormField>

                        <Show when=is_register>
                            <FormField name="email" errors=errors_for(FIELD_EMAIL)>
                                <FormLabel>"Email"</FormLabel>
                                <FormInput value=email input_type="email" autocomplete="email" placeholder="you@example.com" />
                                <FormMessage />
                            </FormField>
                        </Show>

                        <FormField name="password" errors=errors_for(FIELD_PASSWORD)>
                            <FormLabel>"Password"</FormLabel>
                            <FormInput value=password input_type="password" placeholder="••••••••" />
                            <FormMessage />
                        </FormField>

                        <Show when=is_register>
                            <FormField name="confirm" errors=errors_for(FIELD_CONFIRM)>
                                <FormLabel>"Confirm password"</FormLabel>
                                <FormInput value=confirm input_type="password" placeholder="••••••••" />
                                <FormMessage />
                            </FormField>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), is_register()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                    (false, true) => "Create account".into_any(),
                                    (false, false) => "Log in".into_any(),
                                }}
                            </button>
                        </div>

                        <Divider text="or" />

                        <button type="button" class="btn btn-ghost btn-sm" on:click=toggle_mode>
                            {move || if is_register() {
                                "Already have an account? Log in"
                            } else {
                                "New here? Create an account"
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
