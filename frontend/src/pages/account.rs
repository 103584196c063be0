//! 账户页：个人资料、修改密码、好友与邀请

use leptos::prelude::*;
use leptos::task::spawn_local;
use quizhub_shared::{
    ChangePasswordRequest, Friend, FriendshipInvite, InviteId, InviteRequest, UserProfile,
};

use crate::auth::{handle_unauthorized, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AlertBanner, AppShell, SuccessBanner, report_error};
use crate::components::ui::divider::Divider;
use crate::components::ui::form::{
    FormDescription, FormField, FormInput, FormLabel, FormMessage,
};
use crate::data_source::QuizSource;
use crate::error::FormError;
use crate::hooks::date::{format_date, time_ago};
use crate::hooks::notifications::use_pending_invites;
use crate::use_app;
use crate::validation::{
    FIELD_CONFIRM, FIELD_CURRENT_PASSWORD, FIELD_PASSWORD, FieldErrors, MIN_PASSWORD_LEN,
    validate_password_change,
};

#[component]
pub fn AccountPage() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());
    let notifications = use_pending_invites();

    let profile = RwSignal::new(Option::<UserProfile>::None);
    let friends = RwSignal::new(Vec::<Friend>::new());
    let invites = RwSignal::new(Vec::<FriendshipInvite>::new());
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<String>::None);

    let load_profile = move || {
        let app = app.get_value();
        spawn_local(async move {
            match app.source.profile().await {
                Ok(data) => {
                    profile.try_set(Some(data));
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
        });
    };

    let load_friendships = move || {
        let app = app.get_value();
        spawn_local(async move {
            match app.source.pending_invites().await {
                Ok(data) => {
                    invites.try_set(data);
                }
                Err(e) => return report_error(&auth, &app, error_msg, e),
            }
            match app.source.friends().await {
                Ok(data) => {
                    friends.try_set(data);
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
        });
    };

    Effect::new(move |_| {
        load_profile();
        load_friendships();
    });

    let respond = Callback::new(move |(id, accept): (InviteId, bool)| {
        let app = app.get_value();
        spawn_local(async move {
            match app.source.respond_invite(id, accept).await {
                Ok(()) => {
                    notice.try_set(Some(
                        if accept { "Invite accepted" } else { "Invite declined" }.to_string(),
                    ));
                    load_friendships();
                    notifications.refresh.run(());
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
        });
    });

    let on_invite_sent = Callback::new(move |invite: FriendshipInvite| {
        notice.set(Some(format!("Invite sent to {}", invite.to_user.username)));
    });

    view! {
        <AppShell title="Account">
            <AlertBanner message=error_msg />
            <SuccessBanner message=notice />

            <ProfileCard profile=profile />

            <div class="grid gap-6 md:grid-cols-2">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title gap-2">
                            <Bell attr:class="h-5 w-5" />
                            "Pending invites"
                        </h3>
                        <Show when=move || invites.with(Vec::is_empty)>
                            <p class="text-base-content/50 text-sm">"No pending invites."</p>
                        </Show>
                        <ul class="space-y-2">
                            <For each=move || invites.get() key=|invite| invite.id let:invite>
                                <InviteRow invite=invite on_respond=respond />
                            </For>
                        </ul>

                        <Divider text="Invite a friend" />
                        <SendInviteForm on_sent=on_invite_sent />
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title gap-2">
                            <Users attr:class="h-5 w-5" />
                            "Friends"
                        </h3>
                        <Show when=move || friends.with(Vec::is_empty)>
                            <p class="text-base-content/50 text-sm">"No friends yet. Send an invite to get started."</p>
                        </Show>
                        <ul class="space-y-2">
                            <For each=move || friends.get() key=|friend| friend.user.id let:friend>
                                <li class="flex items-center justify-between p-2 rounded-box bg-base-200">
                                    <span class="font-medium">{friend.user.username}</span>
                                    <span class="text-xs text-base-content/60">"since " {format_date(friend.since)}</span>
                                </li>
                            </For>
                        </ul>
                    </div>
                </div>
            </div>

            <ChangePasswordCard />
        </AppShell>
    }
}

#[component]
fn ProfileCard(profile: RwSignal<Option<UserProfile>>) -> impl IntoView {
    move || {
        profile.get().map(|p| {
            view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Signed in as"</div>
                        <div class="stat-value text-2xl">{p.username}</div>
                        <div class="stat-desc">{p.email} " · joined " {format_date(p.created_at)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Quizzes created"</div>
                        <div class="stat-value text-primary">{p.quizzes_created}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Quizzes played"</div>
                        <div class="stat-value text-secondary">{p.quizzes_played}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total score"</div>
                        <div class="stat-value text-accent">{p.total_score}</div>
                    </div>
                </div>
            }
        })
    }
}

#[component]
fn InviteRow(invite: FriendshipInvite, on_respond: Callback<(InviteId, bool)>) -> impl IntoView {
    let id = invite.id;
    view! {
        <li class="flex items-center justify-between gap-2 p-2 rounded-box bg-base-200">
            <div>
                <span class="font-medium">{invite.from_user.username}</span>
                <span class="text-xs text-base-content/60 ml-2">{time_ago(invite.created_at)}</span>
            </div>
            <div class="flex gap-1">
                <button class="btn btn-xs btn-success gap-1" on:click=move |_| on_respond.run((id, true))>
                    <Check attr:class="h-3 w-3" />
                    "Accept"
                </button>
                <button class="btn btn-xs btn-ghost gap-1" on:click=move |_| on_respond.run((id, false))>
                    <X attr:class="h-3 w-3" />
                    "Decline"
                </button>
            </div>
        </li>
    }
}

#[component]
fn SendInviteForm(on_sent: Callback<FriendshipInvite>) -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());

    let username = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FormError>::new());
    let is_submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let target = username.get_untracked().trim().to_string();
        if target.is_empty() {
            errors.set(vec![FormError::plain("Enter a username")]);
            return;
        }

        errors.set(Vec::new());
        is_submitting.set(true);
        let app = app.get_value();
        spawn_local(async move {
            match app.source.send_invite(InviteRequest { username: target }).await {
                Ok(invite) => {
                    username.try_set(String::new());
                    on_sent.run(invite);
                }
                Err(e) => {
                    if !handle_unauthorized(&auth, &app, &e) {
                        errors.try_set(vec![FormError::from(&e)]);
                    }
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <form class="flex flex-col gap-2" on:submit=on_submit novalidate>
            <FormField name="invite" errors=errors>
                <FormLabel>"Username"</FormLabel>
                <div class="join w-full">
                    <FormInput value=username placeholder="friend_username" />
                    <button type="submit" class="btn btn-primary join-item gap-1" disabled=move || is_submitting.get()>
                        <UserPlus attr:class="h-4 w-4" />
                        "Invite"
                    </button>
                </div>
                <FormMessage />
            </FormField>
        </form>
    }
}

#[component]
fn ChangePasswordCard() -> impl IntoView {
    let auth = use_auth();
    let app = StoredValue::new(use_app());

    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let field_errors = RwSignal::new(FieldErrors::new());
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<String>::None);
    let is_submitting = RwSignal::new(false);

    let errors_for = move |field: &'static str| -> Signal<Vec<FormError>> {
        Signal::derive(move || field_errors.with(|e| e.get(field)))
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = ChangePasswordRequest {
            current_password: current.get_untracked(),
            new_password: new_password.get_untracked(),
        };
        let errors = validate_password_change(
            &request.current_password,
            &request.new_password,
            &confirm.get_untracked(),
        );
        let has_errors = !errors.is_empty();
        field_errors.set(errors);
        if has_errors {
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);
        notice.set(None);
        let app = app.get_value();
        spawn_local(async move {
            match app.source.change_password(request).await {
                Ok(()) => {
                    current.try_set(String::new());
                    new_password.try_set(String::new());
                    confirm.try_set(String::new());
                    notice.try_set(Some("Password updated".to_string()));
                }
                Err(e) => report_error(&auth, &app, error_msg, e),
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit novalidate>
            <div class="card-body">
                <h3 class="card-title gap-2">
                    <ShieldCheck attr:class="h-5 w-5" />
                    "Change password"
                </h3>
                <AlertBanner message=error_msg />
                <SuccessBanner message=notice />

                <div class="grid gap-4 md:grid-cols-3">
                    <FormField name="current-password" errors=errors_for(FIELD_CURRENT_PASSWORD)>
                        <FormLabel>"Current password"</FormLabel>
                        <FormInput value=current input_type="password" autocomplete="current-password" />
                        <FormMessage />
                    </FormField>
                    <FormField name="new-password" errors=errors_for(FIELD_PASSWORD)>
                        <FormLabel>"New password"</FormLabel>
                        <FormInput value=new_password input_type="password" autocomplete="new-password" />
                        <FormDescription>{format!("At least {} characters.", MIN_PASSWORD_LEN)}</FormDescription>
                        <FormMessage />
                    </FormField>
                    <FormField name="confirm-password" errors=errors_for(FIELD_CONFIRM)>
                        <FormLabel>"Confirm new password"</FormLabel>
                        <FormInput value=confirm input_type="password" autocomplete="new-password" />
                        <FormMessage />
                    </FormField>
                </div>

                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Update password"
                    </button>
                </div>
            </div>
        </form>
    }
}
