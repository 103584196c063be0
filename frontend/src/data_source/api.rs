//! 远程 API 数据源

use async_trait::async_trait;
use quizhub_shared::protocol::{
    ApiRequest, DeleteQuizRequest, GetQuizRequest, LeaderboardRequest, ListFriendsRequest,
    ListQuizzesRequest, PendingInvitesRequest, PlayableQuizRequest, ProfileRequest,
    RespondInviteRequest, SubmitPlayRequest, UpdateQuizRequest,
};
use quizhub_shared::{
    AuthResponse, ChangePasswordRequest, Friend, FriendshipInvite, InviteId, InviteRequest,
    LeaderboardEntry, LoginRequest, PlayResult, PlaySubmission, PlayableQuiz, Quiz, QuizDraft,
    QuizId, RegisterRequest, UserProfile,
};

use super::QuizSource;
use super::session::SessionStore;
use crate::error::{SourceError, SourceResult};
use crate::web::HttpClient;

#[derive(Clone)]
pub struct ApiSource {
    base_url: String,
    session: SessionStore,
}

impl ApiSource {
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, session }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个协议请求
    ///
    /// 需要认证的请求在没有 token 时直接返回 `Unauthorized`，不发出网络请求。
    async fn call<R: ApiRequest>(&self, request: R) -> SourceResult<R::Response> {
        let mut builder = HttpClient::request(R::METHOD, &self.url(&request.path()));

        if R::AUTHENTICATED {
            let token = self.session.token().ok_or(SourceError::Unauthorized)?;
            builder = builder.bearer(&token);
        }

        if R::METHOD.has_body() {
            builder = builder.json(&request)?;
        }

        builder.send().await?.decode()
    }
}

#[async_trait(?Send)]
impl QuizSource for ApiSource {
    async fn login(&self, request: LoginRequest) -> SourceResult<AuthResponse> {
        self.call(request).await
    }

    async fn register(&self, request: RegisterRequest) -> SourceResult<AuthResponse> {
        self.call(request).await
    }

    async fn change_password(&self, request: ChangePasswordRequest) -> SourceResult<()> {
        self.call(request).await
    }

    async fn profile(&self) -> SourceResult<UserProfile> {
        self.call(ProfileRequest).await
    }

    async fn list_quizzes(&self) -> SourceResult<Vec<Quiz>> {
        self.call(ListQuizzesRequest).await
    }

    async fn get_quiz(&self, id: QuizId) -> SourceResult<Quiz> {
        self.call(GetQuizRequest { id }).await
    }

    async fn get_playable_quiz(&self, id: QuizId) -> SourceResult<PlayableQuiz> {
        self.call(PlayableQuizRequest { id }).await
    }

    async fn create_quiz(&self, draft: QuizDraft) -> SourceResult<Quiz> {
        self.call(draft).await
    }

    async fn update_quiz(&self, id: QuizId, draft: QuizDraft) -> SourceResult<Quiz> {
        self.call(UpdateQuizRequest { id, draft }).await
    }

    async fn delete_quiz(&self, id: QuizId) -> SourceResult<()> {
        self.call(DeleteQuizRequest { id }).await
    }

    async fn submit_play(&self, id: QuizId, submission: PlaySubmission) -> SourceResult<PlayResult> {
        self.call(SubmitPlayRequest {
            quiz_id: id,
            submission,
        })
        .await
    }

    async fn leaderboard(&self) -> SourceResult<Vec<LeaderboardEntry>> {
        self.call(LeaderboardRequest).await
    }

    async fn pending_invites(&self) -> SourceResult<Vec<FriendshipInvite>> {
        self.call(PendingInvitesRequest).await
    }

    async fn send_invite(&self, request: InviteRequest) -> SourceResult<FriendshipInvite> {
        self.call(request).await
    }

    async fn respond_invite(&self, id: InviteId, accept: bool) -> SourceResult<()> {
        self.call(RespondInviteRequest {
            invite_id: id,
            accept,
        })
        .await
    }

    async fn friends(&self) -> SourceResult<Vec<Friend>> {
        self.call(ListFriendsRequest).await
    }
}
