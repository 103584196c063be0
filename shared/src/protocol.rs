use crate::{
    AuthResponse, ChangePasswordRequest, Friend, FriendshipInvite, InviteId, InviteRequest,
    LeaderboardEntry, LoginRequest, PlayResult, PlaySubmission, PlayableQuiz, Quiz, QuizDraft,
    QuizId, RegisterRequest, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET / DELETE 不携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the stored bearer token must be attached.
    const AUTHENTICATED: bool = true;
    /// The URL path, including path parameters.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }
}

impl ApiRequest for ChangePasswordRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/change-password".to_string()
    }
}

/// Current user's profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/users/me".to_string()
    }
}

// =========================================================
// Quizzes
// =========================================================

/// List all quizzes
#[derive(Debug, Serialize, Deserialize)]
pub struct ListQuizzesRequest;

impl ApiRequest for ListQuizzesRequest {
    type Response = Vec<Quiz>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/quizzes".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetQuizRequest {
    #[serde(skip)]
    pub id: QuizId,
}

impl ApiRequest for GetQuizRequest {
    type Response = Quiz;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/quizzes/{}", self.id)
    }
}

/// Quiz with answers withheld, for playing
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayableQuizRequest {
    #[serde(skip)]
    pub id: QuizId,
}

impl ApiRequest for PlayableQuizRequest {
    type Response = PlayableQuiz;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/quizzes/{}/play", self.id)
    }
}

/// Create a quiz (the draft itself is the body)
impl ApiRequest for QuizDraft {
    type Response = Quiz;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/quizzes".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuizRequest {
    #[serde(skip)]
    pub id: QuizId,
    #[serde(flatten)]
    pub draft: QuizDraft,
}

impl ApiRequest for UpdateQuizRequest {
    type Response = Quiz;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/quizzes/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteQuizRequest {
    #[serde(skip)]
    pub id: QuizId,
}

impl ApiRequest for DeleteQuizRequest {
    type Response = (); // 204
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/quizzes/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitPlayRequest {
    #[serde(skip)]
    pub quiz_id: QuizId,
    #[serde(flatten)]
    pub submission: PlaySubmission,
}

impl ApiRequest for SubmitPlayRequest {
    type Response = PlayResult;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/quizzes/{}/submit", self.quiz_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardRequest;

impl ApiRequest for LeaderboardRequest {
    type Response = Vec<LeaderboardEntry>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/leaderboard".to_string()
    }
}

// =========================================================
// Friendships
// =========================================================

/// Invites awaiting the current user's response
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingInvitesRequest;

impl ApiRequest for PendingInvitesRequest {
    type Response = Vec<FriendshipInvite>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/friendships/invites".to_string()
    }
}

impl ApiRequest for InviteRequest {
    type Response = FriendshipInvite;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/friendships/invites".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondInviteRequest {
    #[serde(skip)]
    pub invite_id: InviteId,
    pub accept: bool,
}

impl ApiRequest for RespondInviteRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/friendships/invites/{}/respond", self.invite_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListFriendsRequest;

impl ApiRequest for ListFriendsRequest {
    type Response = Vec<Friend>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/friendships".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionDraft;

    #[test]
    fn test_path_parameters_are_interpolated() {
        assert_eq!(GetQuizRequest { id: 42 }.path(), "/api/quizzes/42");
        assert_eq!(PlayableQuizRequest { id: 42 }.path(), "/api/quizzes/42/play");
        assert_eq!(
            RespondInviteRequest {
                invite_id: 9,
                accept: true
            }
            .path(),
            "/api/friendships/invites/9/respond"
        );
    }

    #[test]
    fn test_only_auth_entry_points_are_anonymous() {
        assert!(!LoginRequest::AUTHENTICATED);
        assert!(!RegisterRequest::AUTHENTICATED);
        assert!(ChangePasswordRequest::AUTHENTICATED);
        assert!(ListQuizzesRequest::AUTHENTICATED);
        assert!(PendingInvitesRequest::AUTHENTICATED);
    }

    #[test]
    fn test_path_ids_are_not_serialized_into_body() {
        let req = UpdateQuizRequest {
            id: 5,
            draft: QuizDraft {
                title: "T".to_string(),
                description: "D".to_string(),
                questions: vec![QuestionDraft {
                    text: "Q1".to_string(),
                    correct_answer: true,
                }],
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["title"], "T");
        assert_eq!(json["questions"][0]["correctAnswer"], true);

        let respond = serde_json::to_value(RespondInviteRequest {
            invite_id: 3,
            accept: false,
        })
        .unwrap();
        assert_eq!(respond, serde_json::json!({ "accept": false }));
    }

    #[test]
    fn test_body_only_on_post_and_put() {
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
    }
}
