use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const PREFIX_STORAGE: &str = "quizhub:";

pub type UserId = i64;
pub type QuizId = i64;
pub type QuestionId = i64;
pub type InviteId = i64;

// =========================================================
// 用户与认证 (Users & Auth)
// =========================================================

/// 对用户的轻量引用（id + 展示名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// 登录/注册成功后后端签发的凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub quizzes_created: u32,
    #[serde(default)]
    pub quizzes_played: u32,
    #[serde(default)]
    pub total_score: u32,
}

// =========================================================
// 测验 (Quizzes)
// =========================================================

/// 创建时的题目视图，包含正确答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub correct_answer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub owner: UserRef,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner.id == user_id
    }

    /// 生成答题视图：隐藏正确答案
    pub fn to_playable(&self) -> PlayableQuiz {
        PlayableQuiz {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            owner: self.owner.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| PlayQuestion {
                    id: q.id,
                    text: q.text.clone(),
                })
                .collect(),
        }
    }
}

/// 答题时的题目视图，不含答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayQuestion {
    pub id: QuestionId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayableQuiz {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub owner: UserRef,
    pub questions: Vec<PlayQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: String,
    pub correct_answer: bool,
}

/// 创建与编辑测验共用的请求体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
}

impl From<&Quiz> for QuizDraft {
    fn from(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| QuestionDraft {
                    text: q.text.clone(),
                    correct_answer: q.correct_answer,
                })
                .collect(),
        }
    }
}

// =========================================================
// 答题与排行榜 (Play & Leaderboard)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub answer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySubmission {
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub quiz_id: QuizId,
    pub score: u32,
    pub total: u32,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub total_score: u32,
    pub quizzes_played: u32,
}

// =========================================================
// 好友 (Friendships)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipInvite {
    pub id: InviteId,
    pub from_user: UserRef,
    pub to_user: UserRef,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub user: UserRef,
    pub since: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_quiz() -> Quiz {
        Quiz {
            id: 7,
            title: "Rust".to_string(),
            description: "Ownership basics".to_string(),
            owner: UserRef {
                id: 1,
                username: "ferris".to_string(),
            },
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            questions: vec![Question {
                id: 1,
                text: "Rust has a GC".to_string(),
                correct_answer: false,
            }],
        }
    }

    #[test]
    fn test_quiz_serializes_camel_case() {
        let json = serde_json::to_value(sample_quiz()).unwrap();
        assert_eq!(json["createdAt"], "2024-03-05T12:00:00Z");
        assert_eq!(json["questions"][0]["correctAnswer"], false);
        assert_eq!(json["owner"]["username"], "ferris");
    }

    #[test]
    fn test_playable_quiz_withholds_answers() {
        let playable = sample_quiz().to_playable();
        let json = serde_json::to_value(&playable).unwrap();
        assert_eq!(playable.questions.len(), 1);
        assert!(json["questions"][0].get("correctAnswer").is_none());
    }

    #[test]
    fn test_quiz_without_questions_field_defaults_to_empty() {
        let json = r#"{
            "id": 3,
            "title": "t",
            "description": "d",
            "owner": {"id": 2, "username": "u"},
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let quiz: Quiz = serde_json::from_str(json).unwrap();
        assert!(quiz.questions.is_empty());
        assert!(quiz.is_owned_by(2));
    }

    #[test]
    fn test_draft_from_quiz_keeps_question_order() {
        let mut quiz = sample_quiz();
        quiz.questions.push(Question {
            id: 2,
            text: "Borrowing is checked at compile time".to_string(),
            correct_answer: true,
        });
        let draft = QuizDraft::from(&quiz);
        assert_eq!(draft.questions[0].text, "Rust has a GC");
        assert!(draft.questions[1].correct_answer);
    }
}
