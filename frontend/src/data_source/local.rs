//! 浏览器本地数据源
//!
//! 所有集合以 JSON 数组的形式保存在带前缀的存储键下，不依赖网络。
//! 规则尽量简单：不复用的自增 id、加盐 SHA-256 密码摘要、UUID token。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leptos::logging::log;
use quizhub_shared::{
    AuthResponse, ChangePasswordRequest, Friend, FriendshipInvite, InviteId, InviteRequest,
    LeaderboardEntry, LoginRequest, PREFIX_STORAGE, PlayResult, PlaySubmission, PlayableQuiz,
    Question, Quiz, QuizDraft, QuizId, RegisterRequest, UserId, UserProfile, UserRef,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

use super::QuizSource;
use super::session::{AuthSession, SessionStore};
use crate::error::{SourceError, SourceResult};
use crate::validation::{MIN_PASSWORD_LEN, validate_quiz_draft};
use crate::web::storage::JsonStore;

// =========================================================
// 存储记录
// =========================================================

const USERS: &str = "users";
const QUIZZES: &str = "quizzes";
const PLAYS: &str = "plays";
const INVITES: &str = "invites";
const FRIENDSHIPS: &str = "friendships";
/// 各集合已签发的最大 id，删除记录后 id 也不会被重新使用
const ID_COUNTERS: &str = "ids";

fn storage_key(collection: &str) -> String {
    format!("{}{}", PREFIX_STORAGE, collection)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    id: UserId,
    username: String,
    email: String,
    password_salt: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl StoredUser {
    fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
        }
    }

    fn verify_password(&self, password: &str) -> bool {
        hash_password(&self.password_salt, password) == self.password_hash
    }

    fn set_password(&mut self, password: &str) {
        self.password_salt = Uuid::new_v4().simple().to_string();
        self.password_hash = hash_password(&self.password_salt, password);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPlay {
    user_id: UserId,
    quiz_id: QuizId,
    score: u32,
    total: u32,
    played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredInvite {
    id: InviteId,
    from_user: UserId,
    to_user: UserId,
    created_at: DateTime<Utc>,
}

impl StoredInvite {
    fn connects(&self, a: UserId, b: UserId) -> bool {
        (self.from_user == a && self.to_user == b) || (self.from_user == b && self.to_user == a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFriendship {
    user_a: UserId,
    user_b: UserId,
    since: DateTime<Utc>,
}

impl StoredFriendship {
    /// 若 `user` 参与了这段好友关系，返回另一方
    fn other(&self, user: UserId) -> Option<UserId> {
        if self.user_a == user {
            Some(self.user_b)
        } else if self.user_b == user {
            Some(self.user_a)
        } else {
            None
        }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn next_id(last_issued: i64, ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0).max(last_issued) + 1
}

fn user_ref(users: &[StoredUser], id: UserId) -> UserRef {
    users
        .iter()
        .find(|u| u.id == id)
        .map(StoredUser::to_ref)
        .unwrap_or_else(|| UserRef {
            id,
            username: "unknown".to_string(),
        })
}

fn build_questions(draft: &QuizDraft) -> Vec<Question> {
    draft
        .questions
        .iter()
        .zip(1..)
        .map(|(q, id)| Question {
            id,
            text: q.text.trim().to_string(),
            correct_answer: q.correct_answer,
        })
        .collect()
}

fn ensure_valid(draft: &QuizDraft) -> SourceResult<()> {
    match validate_quiz_draft(draft).first_message() {
        Some(message) => Err(SourceError::Invalid(message)),
        None => Ok(()),
    }
}

/// 按总分降序、用户名升序排列，名次从 1 开始
fn rank_players(users: &[StoredUser], plays: &[StoredPlay]) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<UserId, (u32, u32)> = HashMap::new();
    for play in plays {
        let entry = totals.entry(play.user_id).or_default();
        entry.0 += play.score;
        entry.1 += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(user_id, (total_score, quizzes_played))| LeaderboardEntry {
            rank: 0,
            user_id,
            username: user_ref(users, user_id).username,
            total_score,
            quizzes_played,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.username.cmp(&b.username))
    });
    for (entry, rank) in entries.iter_mut().zip(1..) {
        entry.rank = rank;
    }
    entries
}

// =========================================================
// LocalSource
// =========================================================

#[derive(Clone)]
pub struct LocalSource {
    store: JsonStore,
    session: SessionStore,
}

impl LocalSource {
    pub fn new(store: JsonStore, session: SessionStore) -> Self {
        Self { store, session }
    }

    fn load<T: DeserializeOwned>(&self, collection: &str) -> SourceResult<Vec<T>> {
        Ok(self.store.get(&storage_key(collection))?.unwrap_or_default())
    }

    fn save<T: Serialize>(&self, collection: &str, items: &[T]) -> SourceResult<()> {
        self.store.set(&storage_key(collection), items)
    }

    /// 为集合分配新 id 并记录下来
    fn allocate_id(&self, collection: &str, ids: impl Iterator<Item = i64>) -> SourceResult<i64> {
        let key = storage_key(ID_COUNTERS);
        let mut counters: HashMap<String, i64> = self.store.get(&key)?.unwrap_or_default();
        let last_issued = counters.get(collection).copied().unwrap_or(0);
        let id = next_id(last_issued, ids);
        counters.insert(collection.to_string(), id);
        self.store.set(&key, &counters)?;
        Ok(id)
    }

    /// 当前会话对应的用户；会话缺失或用户已不存在时返回 `Unauthorized`
    fn current_user(&self) -> SourceResult<StoredUser> {
        let session = self.session.require()?;
        self.load::<StoredUser>(USERS)?
            .into_iter()
            .find(|u| u.id == session.user_id)
            .ok_or(SourceError::Unauthorized)
    }

    fn find_quiz(&self, id: QuizId) -> SourceResult<(Vec<Quiz>, usize)> {
        let quizzes: Vec<Quiz> = self.load(QUIZZES)?;
        let index = quizzes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| SourceError::NotFound(format!("Quiz {} was not found", id)))?;
        Ok((quizzes, index))
    }

    /// 签发新 token 并写入会话
    fn issue_session(&self, user: &StoredUser) -> SourceResult<AuthResponse> {
        let response = AuthResponse {
            token: Uuid::new_v4().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        };
        self.session.save(&AuthSession::from(response.clone()))?;
        Ok(response)
    }
}

#[async_trait(?Send)]
impl QuizSource for LocalSource {
    async fn login(&self, request: LoginRequest) -> SourceResult<AuthResponse> {
        let username = request.username.trim();
        let user = self
            .load::<StoredUser>(USERS)?
            .into_iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .filter(|u| u.verify_password(&request.password))
            .ok_or(SourceError::Unauthorized)?;

        log!("[LocalSource] {} logged in", user.username);
        self.issue_session(&user)
    }

    async fn register(&self, request: RegisterRequest) -> SourceResult<AuthResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();
        if username.is_empty() || email.is_empty() {
            return Err(SourceError::Invalid(
                "Username and email are required".to_string(),
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SourceError::Invalid(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut users: Vec<StoredUser> = self.load(USERS)?;
        if users.iter().any(|u| u.username.eq_ignore_ascii_case(&username)) {
            return Err(SourceError::Conflict("Username is already taken".to_string()));
        }
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(SourceError::Conflict("Email is already registered".to_string()));
        }

        let mut user = StoredUser {
            id: self.allocate_id(USERS, users.iter().map(|u| u.id))?,
            username,
            email,
            password_salt: String::new(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        user.set_password(&request.password);
        users.push(user.clone());
        self.save(USERS, &users)?;

        log!("[LocalSource] Registered user {} ({})", user.username, user.id);
        self.issue_session(&user)
    }

    async fn change_password(&self, request: ChangePasswordRequest) -> SourceResult<()> {
        let current = self.current_user()?;
        if !current.verify_password(&request.current_password) {
            return Err(SourceError::Invalid(
                "Current password is incorrect".to_string(),
            ));
        }
        if request.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SourceError::Invalid(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut users: Vec<StoredUser> = self.load(USERS)?;
        if let Some(user) = users.iter_mut().find(|u| u.id == current.id) {
            user.set_password(&request.new_password);
        }
        self.save(USERS, &users)
    }

    async fn profile(&self) -> SourceResult<UserProfile> {
        let user = self.current_user()?;
        let quizzes: Vec<Quiz> = self.load(QUIZZES)?;
        let plays: Vec<StoredPlay> = self.load(PLAYS)?;
        let own_plays = plays.iter().filter(|p| p.user_id == user.id);

        Ok(UserProfile {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            quizzes_created: quizzes.iter().filter(|q| q.is_owned_by(user.id)).count() as u32,
            quizzes_played: own_plays.clone().count() as u32,
            total_score: own_plays.map(|p| p.score).sum(),
        })
    }

    async fn list_quizzes(&self) -> SourceResult<Vec<Quiz>> {
        self.current_user()?;
        let mut quizzes: Vec<Quiz> = self.load(QUIZZES)?;
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quizzes)
    }

    async fn get_quiz(&self, id: QuizId) -> SourceResult<Quiz> {
        self.current_user()?;
        let (mut quizzes, index) = self.find_quiz(id)?;
        Ok(quizzes.swap_remove(index))
    }

    async fn get_playable_quiz(&self, id: QuizId) -> SourceResult<PlayableQuiz> {
        self.get_quiz(id).await.map(|quiz| quiz.to_playable())
    }

    async fn create_quiz(&self, draft: QuizDraft) -> SourceResult<Quiz> {
        let user = self.current_user()?;
        ensure_valid(&draft)?;

        let mut quizzes: Vec<Quiz> = self.load(QUIZZES)?;
        let quiz = Quiz {
            id: self.allocate_id(QUIZZES, quizzes.iter().map(|q| q.id))?,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            owner: user.to_ref(),
            created_at: Utc::now(),
            questions: build_questions(&draft),
        };
        quizzes.push(quiz.clone());
        self.save(QUIZZES, &quizzes)?;

        log!("[LocalSource] Created quiz {} ({})", quiz.title, quiz.id);
        Ok(quiz)
    }

    async fn update_quiz(&self, id: QuizId, draft: QuizDraft) -> SourceResult<Quiz> {
        let user = self.current_user()?;
        let (mut quizzes, index) = self.find_quiz(id)?;
        if !quizzes[index].is_owned_by(user.id) {
            return Err(SourceError::Forbidden(
                "Only the owner can edit this quiz".to_string(),
            ));
        }
        ensure_valid(&draft)?;

        let quiz = &mut quizzes[index];
        quiz.title = draft.title.trim().to_string();
        quiz.description = draft.description.trim().to_string();
        quiz.questions = build_questions(&draft);
        let updated = quiz.clone();
        self.save(QUIZZES, &quizzes)?;
        Ok(updated)
    }

    async fn delete_quiz(&self, id: QuizId) -> SourceResult<()> {
        let user = self.current_user()?;
        let (mut quizzes, index) = self.find_quiz(id)?;
        if !quizzes[index].is_owned_by(user.id) {
            return Err(SourceError::Forbidden(
                "Only the owner can delete this quiz".to_string(),
            ));
        }
        quizzes.remove(index);
        self.save(QUIZZES, &quizzes)?;

        log!("[LocalSource] Deleted quiz {}", id);
        Ok(())
    }

    async fn submit_play(&self, id: QuizId, submission: PlaySubmission) -> SourceResult<PlayResult> {
        let user = self.current_user()?;
        let (quizzes, index) = self.find_quiz(id)?;
        let quiz = &quizzes[index];

        let answers: HashMap<_, _> = submission
            .answers
            .iter()
            .map(|a| (a.question_id, a.answer))
            .collect();
        let score = quiz
            .questions
            .iter()
            .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
            .count() as u32;

        let play = StoredPlay {
            user_id: user.id,
            quiz_id: quiz.id,
            score,
            total: quiz.questions.len() as u32,
            played_at: Utc::now(),
        };
        let mut plays: Vec<StoredPlay> = self.load(PLAYS)?;
        plays.push(play.clone());
        self.save(PLAYS, &plays)?;

        Ok(PlayResult {
            quiz_id: play.quiz_id,
            score: play.score,
            total: play.total,
            played_at: play.played_at,
        })
    }

    async fn leaderboard(&self) -> SourceResult<Vec<LeaderboardEntry>> {
        self.current_user()?;
        let users: Vec<StoredUser> = self.load(USERS)?;
        let plays: Vec<StoredPlay> = self.load(PLAYS)?;
        Ok(rank_players(&users, &plays))
    }

    async fn pending_invites(&self) -> SourceResult<Vec<FriendshipInvite>> {
        let user = self.current_user()?;
        let users: Vec<StoredUser> = self.load(USERS)?;
        let invites: Vec<StoredInvite> = self.load(INVITES)?;

        Ok(invites
            .iter()
            .filter(|i| i.to_user == user.id)
            .map(|i| FriendshipInvite {
                id: i.id,
                from_user: user_ref(&users, i.from_user),
                to_user: user.to_ref(),
                created_at: i.created_at,
            })
            .collect())
    }

    async fn send_invite(&self, request: InviteRequest) -> SourceResult<FriendshipInvite> {
        let user = self.current_user()?;
        let users: Vec<StoredUser> = self.load(USERS)?;
        let username = request.username.trim();

        let target = users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .ok_or_else(|| SourceError::NotFound(format!("No user named '{}'", username)))?;
        if target.id == user.id {
            return Err(SourceError::Invalid("You cannot invite yourself".to_string()));
        }

        let friendships: Vec<StoredFriendship> = self.load(FRIENDSHIPS)?;
        if friendships.iter().any(|f| f.other(user.id) == Some(target.id)) {
            return Err(SourceError::Conflict(format!(
                "You are already friends with {}",
                target.username
            )));
        }

        let mut invites: Vec<StoredInvite> = self.load(INVITES)?;
        if invites.iter().any(|i| i.connects(user.id, target.id)) {
            return Err(SourceError::Conflict(format!(
                "An invite with {} is already pending",
                target.username
            )));
        }

        let invite = StoredInvite {
            id: self.allocate_id(INVITES, invites.iter().map(|i| i.id))?,
            from_user: user.id,
            to_user: target.id,
            created_at: Utc::now(),
        };
        invites.push(invite.clone());
        self.save(INVITES, &invites)?;

        Ok(FriendshipInvite {
            id: invite.id,
            from_user: user.to_ref(),
            to_user: target.to_ref(),
            created_at: invite.created_at,
        })
    }

    async fn respond_invite(&self, id: InviteId, accept: bool) -> SourceResult<()> {
        let user = self.current_user()?;
        let mut invites: Vec<StoredInvite> = self.load(INVITES)?;
        let index = invites
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| SourceError::NotFound(format!("Invite {} was not found", id)))?;
        if invites[index].to_user != user.id {
            return Err(SourceError::Forbidden(
                "Only the recipient can respond to this invite".to_string(),
            ));
        }

        let invite = invites.remove(index);
        if accept {
            let mut friendships: Vec<StoredFriendship> = self.load(FRIENDSHIPS)?;
            friendships.push(StoredFriendship {
                user_a: invite.from_user,
                user_b: invite.to_user,
                since: Utc::now(),
            });
            self.save(FRIENDSHIPS, &friendships)?;
        }
        self.save(INVITES, &invites)
    }

    async fn friends(&self) -> SourceResult<Vec<Friend>> {
        let user = self.current_user()?;
        let users: Vec<StoredUser> = self.load(USERS)?;
        let friendships: Vec<StoredFriendship> = self.load(FRIENDSHIPS)?;

        let mut friends: Vec<Friend> = friendships
            .iter()
            .filter_map(|f| {
                f.other(user.id).map(|other| Friend {
                    user: user_ref(&users, other),
                    since: f.since,
                })
            })
            .collect();
        friends.sort_by(|a, b| a.user.username.cmp(&b.user.username));
        Ok(friends)
    }
}

#[cfg(test)]
mod tests;
