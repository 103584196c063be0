//! 会话持久化
//!
//! 登录后签发的 token 与用户身份保存在同一个存储键中，
//! 页面重新加载时恢复。两种数据源都从这里读取当前会话。

use leptos::logging::warn;
use quizhub_shared::{AuthResponse, UserId};
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};
use crate::web::storage::JsonStore;

const SESSION_KEY: &str = "quizhub:session";

/// 当前登录会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

impl From<AuthResponse> for AuthSession {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user_id: response.user_id,
            username: response.username,
            email: response.email,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    store: JsonStore,
}

impl SessionStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// 读取已保存的会话；内容损坏时视为未登录并清除
    pub fn load(&self) -> Option<AuthSession> {
        match self.store.get::<AuthSession>(SESSION_KEY) {
            Ok(session) => session.filter(|s| !s.token.is_empty()),
            Err(e) => {
                warn!("[Session] Discarding unreadable session: {}", e);
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &AuthSession) -> SourceResult<()> {
        self.store.set(SESSION_KEY, session)
    }

    pub fn clear(&self) {
        self.store.delete(SESSION_KEY);
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    /// 需要认证的操作调用，未登录时返回 `Unauthorized`
    pub fn require(&self) -> SourceResult<AuthSession> {
        self.load().ok_or(SourceError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::{KeyValueStore, MemoryStorage};

    fn session() -> AuthSession {
        AuthSession {
            token: "t-1".to_string(),
            user_id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_require_without_session_is_unauthorized() {
        let sessions = SessionStore::new(JsonStore::new(MemoryStorage::new()));
        assert_eq!(sessions.require(), Err(SourceError::Unauthorized));
        assert_eq!(sessions.token(), None);
    }

    #[test]
    fn test_session_survives_reload_and_clears() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(JsonStore::new(storage.clone()));
        sessions.save(&session()).unwrap();

        let reloaded = SessionStore::new(JsonStore::new(storage));
        assert_eq!(reloaded.load(), Some(session()));
        assert_eq!(reloaded.token().as_deref(), Some("t-1"));

        reloaded.clear();
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set_item(SESSION_KEY, "not-json").unwrap();
        let sessions = SessionStore::new(JsonStore::new(storage.clone()));
        assert_eq!(sessions.load(), None);
        assert_eq!(storage.get_item(SESSION_KEY), None);
    }
}
