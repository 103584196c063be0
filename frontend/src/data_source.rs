//! 数据源抽象
//!
//! `QuizSource` 定义了应用所需的全部能力；`DataSource` 是它仅有的两个实现
//! （远程 API / 浏览器本地存储）的封装，在启动时按配置选择一次，之后不再切换。

mod api;
mod local;
mod session;

pub use api::ApiSource;
pub use local::LocalSource;
pub use session::{AuthSession, SessionStore};

use async_trait::async_trait;
use quizhub_shared::{
    AuthResponse, ChangePasswordRequest, Friend, FriendshipInvite, InviteId, InviteRequest,
    LeaderboardEntry, LoginRequest, PlayResult, PlaySubmission, PlayableQuiz, Quiz, QuizDraft,
    QuizId, RegisterRequest, UserProfile,
};

use crate::config::{AppConfig, StorageMode};
use crate::error::SourceResult;
use crate::web::storage::JsonStore;

/// 测验、认证与好友操作的统一能力接口
#[async_trait(?Send)]
pub trait QuizSource {
    // --- 认证 ---
    async fn login(&self, request: LoginRequest) -> SourceResult<AuthResponse>;
    async fn register(&self, request: RegisterRequest) -> SourceResult<AuthResponse>;
    async fn change_password(&self, request: ChangePasswordRequest) -> SourceResult<()>;
    async fn profile(&self) -> SourceResult<UserProfile>;

    // --- 测验 ---
    async fn list_quizzes(&self) -> SourceResult<Vec<Quiz>>;
    async fn get_quiz(&self, id: QuizId) -> SourceResult<Quiz>;
    async fn get_playable_quiz(&self, id: QuizId) -> SourceResult<PlayableQuiz>;
    async fn create_quiz(&self, draft: QuizDraft) -> SourceResult<Quiz>;
    async fn update_quiz(&self, id: QuizId, draft: QuizDraft) -> SourceResult<Quiz>;
    async fn delete_quiz(&self, id: QuizId) -> SourceResult<()>;

    // --- 答题与排行 ---
    async fn submit_play(&self, id: QuizId, submission: PlaySubmission) -> SourceResult<PlayResult>;
    async fn leaderboard(&self) -> SourceResult<Vec<LeaderboardEntry>>;

    // --- 好友 ---
    async fn pending_invites(&self) -> SourceResult<Vec<FriendshipInvite>>;
    async fn send_invite(&self, request: InviteRequest) -> SourceResult<FriendshipInvite>;
    async fn respond_invite(&self, id: InviteId, accept: bool) -> SourceResult<()>;
    async fn friends(&self) -> SourceResult<Vec<Friend>>;
}

/// 启动时选定的数据源
#[derive(Clone)]
pub enum DataSource {
    Api(ApiSource),
    Local(LocalSource),
}

impl DataSource {
    /// 按配置构造数据源
    pub fn from_config(config: &AppConfig, store: JsonStore) -> Self {
        let sessions = SessionStore::new(store.clone());
        match config.storage {
            StorageMode::Api => Self::Api(ApiSource::new(&config.api_url, sessions)),
            StorageMode::Local => Self::Local(LocalSource::new(store, sessions)),
        }
    }

    pub fn mode(&self) -> StorageMode {
        match self {
            Self::Api(_) => StorageMode::Api,
            Self::Local(_) => StorageMode::Local,
        }
    }
}

/// 将调用分发到当前选定的实现
macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            DataSource::Api(source) => source.$method($($arg),*).await,
            DataSource::Local(source) => source.$method($($arg),*).await,
        }
    };
}

#[async_trait(?Send)]
impl QuizSource for DataSource {
    async fn login(&self, request: LoginRequest) -> SourceResult<AuthResponse> {
        dispatch!(self.login(request))
    }

    async fn register(&self, request: RegisterRequest) -> SourceResult<AuthResponse> {
        dispatch!(self.register(request))
    }

    async fn change_password(&self, request: ChangePasswordRequest) -> SourceResult<()> {
        dispatch!(self.change_password(request))
    }

    async fn profile(&self) -> SourceResult<UserProfile> {
        dispatch!(self.profile())
    }

    async fn list_quizzes(&self) -> SourceResult<Vec<Quiz>> {
        dispatch!(self.list_quizzes())
    }

    async fn get_quiz(&self, id: QuizId) -> SourceResult<Quiz> {
        dispatch!(self.get_quiz(id))
    }

    async fn get_playable_quiz(&self, id: QuizId) -> SourceResult<PlayableQuiz> {
        dispatch!(self.get_playable_quiz(id))
    }

    async fn create_quiz(&self, draft: QuizDraft) -> SourceResult<Quiz> {
        dispatch!(self.create_quiz(draft))
    }

    async fn update_quiz(&self, id: QuizId, draft: QuizDraft) -> SourceResult<Quiz> {
        dispatch!(self.update_quiz(id, draft))
    }

    async fn delete_quiz(&self, id: QuizId) -> SourceResult<()> {
        dispatch!(self.delete_quiz(id))
    }

    async fn submit_play(&self, id: QuizId, submission: PlaySubmission) -> SourceResult<PlayResult> {
        dispatch!(self.submit_play(id, submission))
    }

    async fn leaderboard(&self) -> SourceResult<Vec<LeaderboardEntry>> {
        dispatch!(self.leaderboard())
    }

    async fn pending_invites(&self) -> SourceResult<Vec<FriendshipInvite>> {
        dispatch!(self.pending_invites())
    }

    async fn send_invite(&self, request: InviteRequest) -> SourceResult<FriendshipInvite> {
        dispatch!(self.send_invite(request))
    }

    async fn respond_invite(&self, id: InviteId, accept: bool) -> SourceResult<()> {
        dispatch!(self.respond_invite(id, accept))
    }

    async fn friends(&self) -> SourceResult<Vec<Friend>> {
        dispatch!(self.friends())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::web::storage::MemoryStorage;

    fn source_for(storage: Option<&str>) -> DataSource {
        let config = AppConfig::from_values(Some("http://localhost:5000"), storage);
        DataSource::from_config(&config, JsonStore::new(MemoryStorage::new()))
    }

    #[test]
    fn test_flag_selects_implementation() {
        assert_eq!(source_for(None).mode(), StorageMode::Api);
        assert_eq!(source_for(Some("api")).mode(), StorageMode::Api);
        assert_eq!(source_for(Some("local")).mode(), StorageMode::Local);
        assert!(matches!(source_for(Some("true")), DataSource::Local(_)));
    }

    /// 两个分支都通过同一接口暴露，且未登录时以相同的方式失败
    #[tokio::test]
    async fn test_both_branches_share_the_same_contract() {
        for flag in [Some("api"), Some("local")] {
            let source = source_for(flag);
            let as_trait: &dyn QuizSource = &source;
            assert_eq!(as_trait.list_quizzes().await, Err(SourceError::Unauthorized));
            assert_eq!(as_trait.pending_invites().await, Err(SourceError::Unauthorized));
            assert_eq!(as_trait.profile().await, Err(SourceError::Unauthorized));
            assert_eq!(as_trait.friends().await, Err(SourceError::Unauthorized));
        }
    }
}
