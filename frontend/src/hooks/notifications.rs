//! 好友邀请通知轮询
//!
//! 登录期间每 30 秒拉取一次待处理邀请数量。
//! 拉取失败只记录警告，不影响界面，保留上一次的数量。

use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::auth::use_auth;
use crate::data_source::QuizSource;
use crate::use_app;
use crate::web::Interval;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// 轮询结果快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub pending_count: usize,
    pub is_loading: bool,
}

impl NotificationState {
    /// 首次拉取前的状态
    pub fn initial() -> Self {
        Self {
            pending_count: 0,
            is_loading: true,
        }
    }

    /// 未登录：数量清零
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count > 0
    }
}

/// 执行一次拉取，返回新的状态
pub async fn poll_pending_invites<S: QuizSource + ?Sized>(
    source: &S,
    authenticated: bool,
    previous: NotificationState,
) -> NotificationState {
    if !authenticated {
        return NotificationState::signed_out();
    }

    match source.pending_invites().await {
        Ok(invites) => NotificationState {
            pending_count: invites.len(),
            is_loading: false,
        },
        Err(e) => {
            warn!("[Notifications] Failed to fetch pending invites: {}", e);
            NotificationState {
                is_loading: false,
                ..previous
            }
        }
    }
}

/// 一次拉取的凭证，记录发起时所在的登录周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket(u64);

/// 轮询状态机
///
/// 每次登录状态切换都会进入新的周期并清空在途请求，
/// 旧周期发出的请求返回后结果直接丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    snapshot: NotificationState,
    epoch: u64,
    in_flight: Option<PollTicket>,
}

impl PollState {
    pub fn new(authenticated: bool) -> Self {
        Self {
            snapshot: if authenticated {
                NotificationState::initial()
            } else {
                NotificationState::signed_out()
            },
            epoch: 0,
            in_flight: None,
        }
    }

    pub fn snapshot(&self) -> NotificationState {
        self.snapshot
    }

    /// 登录状态变化
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.epoch += 1;
        self.in_flight = None;
        self.snapshot = Self::new(authenticated).snapshot;
    }

    /// 发起拉取；已有请求在途时返回 `None`
    pub fn begin(&mut self) -> Option<PollTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let ticket = PollTicket(self.epoch);
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// 写回拉取结果，凭证已过期时返回 `false`
    pub fn finish(&mut self, ticket: PollTicket, next: NotificationState) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.snapshot = next;
        true
    }
}

/// 暴露给组件的通知信号
#[derive(Clone, Copy)]
pub struct InviteNotifications {
    pub pending_count: Signal<usize>,
    pub has_pending: Signal<bool>,
    pub is_loading: Signal<bool>,
    /// 立即拉取一次
    pub refresh: Callback<()>,
}

pub fn use_invite_notifications() -> InviteNotifications {
    let source = StoredValue::new(use_app().source);
    let is_authenticated = use_auth().is_authenticated_signal();

    let state = RwSignal::new(PollState::new(is_authenticated.get_untracked()));

    let fetch = move || {
        if !is_authenticated.get_untracked() {
            return;
        }
        // 上一次请求尚未返回时跳过本次
        let Some(ticket) = state.try_update(PollState::begin).flatten() else {
            return;
        };

        let source = source.get_value();
        let previous = state.with_untracked(PollState::snapshot);
        spawn_local(async move {
            let next = poll_pending_invites(&source, true, previous).await;
            let applied = state.try_update(|s| s.finish(ticket, next));
            if applied == Some(false) {
                log!("[Notifications] Dropped result from a previous session");
            }
        });
    };

    let timer = StoredValue::new_local(None::<Interval>);

    Effect::new(move |_| {
        let authenticated = is_authenticated.get();
        state.update(|s| s.set_authenticated(authenticated));
        if authenticated {
            fetch();
            timer.set_value(Some(Interval::new(POLL_INTERVAL, fetch)));
        } else {
            timer.set_value(None);
        }
    });

    on_cleanup(move || {
        timer.try_update_value(|t| t.take());
    });

    let snapshot = Memo::new(move |_| state.with(PollState::snapshot));
    InviteNotifications {
        pending_count: Signal::derive(move || snapshot.get().pending_count),
        has_pending: Signal::derive(move || snapshot.get().has_pending()),
        is_loading: Signal::derive(move || snapshot.get().is_loading),
        refresh: Callback::new(move |_| fetch()),
    }
}

/// 获取应用根部创建的通知信号，避免每个页面各自轮询
pub fn use_pending_invites() -> InviteNotifications {
    use_context::<InviteNotifications>().expect("InviteNotifications should be provided")
}
