use super::*;
use crate::web::storage::MemoryStorage;
use quizhub_shared::{AnswerSubmission, QuestionDraft};

fn source_on(storage: &MemoryStorage) -> LocalSource {
    let store = JsonStore::new(storage.clone());
    LocalSource::new(store.clone(), SessionStore::new(store))
}

async fn register(source: &LocalSource, username: &str) -> AuthResponse {
    source
        .register(RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password1".to_string(),
        })
        .await
        .unwrap()
}

async fn login(source: &LocalSource, username: &str) {
    source
        .login(LoginRequest {
            username: username.to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
}

fn draft(title: &str, questions: &[(&str, bool)]) -> QuizDraft {
    QuizDraft {
        title: title.to_string(),
        description: "D".to_string(),
        questions: questions
            .iter()
            .map(|(text, answer)| QuestionDraft {
                text: text.to_string(),
                correct_answer: *answer,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_created_quiz_survives_reload() {
    let storage = MemoryStorage::new();
    let source = source_on(&storage);
    register(&source, "alice").await;

    let created = source
        .create_quiz(draft("T", &[("Q1", true)]))
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    // 新句柄指向同一份存储，相当于刷新页面
    let reloaded = source_on(&storage);
    let quizzes = reloaded.list_quizzes().await.unwrap();
    assert_eq!(quizzes.len(), 1);
    let quiz = &quizzes[0];
    assert_eq!(quiz.title, "T");
    assert_eq!(quiz.description, "D");
    assert_eq!(quiz.created_at, created.created_at);
    assert_eq!(quiz.owner.username, "alice");
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].text, "Q1");
    assert!(quiz.questions[0].correct_answer);
}

#[tokio::test]
async fn test_operations_require_a_session() {
    let source = source_on(&MemoryStorage::new());
    assert_eq!(source.list_quizzes().await, Err(SourceError::Unauthorized));
    assert_eq!(
        source.create_quiz(draft("T", &[("Q", true)])).await,
        Err(SourceError::Unauthorized)
    );
    assert_eq!(source.leaderboard().await, Err(SourceError::Unauthorized));
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "alice").await;

    let duplicate_name = source
        .register(RegisterRequest {
            username: "ALICE".to_string(),
            email: "other@example.com".to_string(),
            password: "password1".to_string(),
        })
        .await;
    assert!(matches!(duplicate_name, Err(SourceError::Conflict(_))));

    let duplicate_email = source
        .register(RegisterRequest {
            username: "bob".to_string(),
            email: "alice@example.com".to_string(),
            password: "password1".to_string(),
        })
        .await;
    assert!(matches!(duplicate_email, Err(SourceError::Conflict(_))));
}

#[tokio::test]
async fn test_login_checks_password_and_stores_session() {
    let storage = MemoryStorage::new();
    let source = source_on(&storage);
    let registered = register(&source, "alice").await;

    let wrong = source
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "nope-nope".to_string(),
        })
        .await;
    assert_eq!(wrong, Err(SourceError::Unauthorized));

    let unknown = source
        .login(LoginRequest {
            username: "nobody".to_string(),
            password: "password1".to_string(),
        })
        .await;
    assert_eq!(unknown, Err(SourceError::Unauthorized));

    let response = source
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.user_id, registered.user_id);
    assert_ne!(response.token, registered.token);

    let sessions = SessionStore::new(JsonStore::new(storage));
    assert_eq!(sessions.token(), Some(response.token));
}

#[tokio::test]
async fn test_passwords_are_not_stored_in_clear() {
    let storage = MemoryStorage::new();
    let source = source_on(&storage);
    register(&source, "alice").await;

    let raw = crate::web::storage::KeyValueStore::get_item(&storage, "quizhub:users").unwrap();
    assert!(!raw.contains("password1"));
    let users: Vec<StoredUser> = serde_json::from_str(&raw).unwrap();
    assert_eq!(users[0].password_hash.len(), 64);
}

#[tokio::test]
async fn test_change_password() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "alice").await;

    let wrong_current = source
        .change_password(ChangePasswordRequest {
            current_password: "wrong-one".to_string(),
            new_password: "password2".to_string(),
        })
        .await;
    assert!(matches!(wrong_current, Err(SourceError::Invalid(_))));

    source
        .change_password(ChangePasswordRequest {
            current_password: "password1".to_string(),
            new_password: "password2".to_string(),
        })
        .await
        .unwrap();

    let old = source
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "password1".to_string(),
        })
        .await;
    assert_eq!(old, Err(SourceError::Unauthorized));
    assert!(
        source
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "password2".to_string(),
            })
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_only_owner_can_edit_or_delete() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "alice").await;
    let quiz = source
        .create_quiz(draft("Mine", &[("Q1", true)]))
        .await
        .unwrap();

    register(&source, "bob").await;
    assert!(matches!(
        source.update_quiz(quiz.id, draft("Stolen", &[("Q", false)])).await,
        Err(SourceError::Forbidden(_))
    ));
    assert!(matches!(
        source.delete_quiz(quiz.id).await,
        Err(SourceError::Forbidden(_))
    ));
    assert!(matches!(
        source.delete_quiz(99).await,
        Err(SourceError::NotFound(_))
    ));

    login(&source, "alice").await;
    let updated = source
        .update_quiz(quiz.id, draft("Renamed", &[("A", false), ("B", true)]))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.created_at, quiz.created_at);
    assert_eq!(updated.questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2]);

    source.delete_quiz(quiz.id).await.unwrap();
    assert!(source.list_quizzes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_draft_is_rejected() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "alice").await;
    assert!(matches!(
        source.create_quiz(draft("", &[("Q", true)])).await,
        Err(SourceError::Invalid(_))
    ));
    assert!(matches!(
        source.create_quiz(draft("T", &[])).await,
        Err(SourceError::Invalid(_))
    ));
}

#[tokio::test]
async fn test_ids_are_allocated_after_the_maximum() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "alice").await;
    let first = source.create_quiz(draft("A", &[("Q", true)])).await.unwrap();
    let second = source.create_quiz(draft("B", &[("Q", true)])).await.unwrap();
    source.delete_quiz(first.id).await.unwrap();
    let third = source.create_quiz(draft("C", &[("Q", true)])).await.unwrap();
    assert_eq!((first.id, second.id, third.id), (1, 2, 3));
}

#[tokio::test]
async fn test_deleted_maximum_id_is_not_reused() {
    let storage = MemoryStorage::new();
    let source = source_on(&storage);
    register(&source, "alice").await;
    source.create_quiz(draft("A", &[("Q", true)])).await.unwrap();
    let last = source.create_quiz(draft("B", &[("Q", true)])).await.unwrap();
    source.delete_quiz(last.id).await.unwrap();

    // 重新加载后计数仍然保留
    let reloaded = source_on(&storage);
    let next = reloaded.create_quiz(draft("C", &[("Q", true)])).await.unwrap();
    assert_eq!(next.id, last.id + 1);
    assert!(matches!(
        reloaded.get_quiz(last.id).await,
        Err(SourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_declined_invite_id_is_not_reused() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "bob").await;
    register(&source, "alice").await;
    let first = source
        .send_invite(InviteRequest {
            username: "bob".to_string(),
        })
        .await
        .unwrap();
    login(&source, "bob").await;
    source.respond_invite(first.id, false).await.unwrap();

    login(&source, "alice").await;
    let second = source
        .send_invite(InviteRequest {
            username: "bob".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(second.id, first.id + 1);
}

#[tokio::test]
async fn test_play_scores_and_leaderboard_order() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "carol").await;
    let quiz = source
        .create_quiz(draft("Facts", &[("A", true), ("B", false), ("C", true)]))
        .await
        .unwrap();

    let playable = source.get_playable_quiz(quiz.id).await.unwrap();
    assert_eq!(playable.questions.len(), 3);

    let answer = |question_id, answer| AnswerSubmission {
        question_id,
        answer,
    };

    register(&source, "bob").await;
    let result = source
        .submit_play(
            quiz.id,
            PlaySubmission {
                answers: vec![answer(1, true), answer(2, false), answer(3, false)],
            },
        )
        .await
        .unwrap();
    assert_eq!((result.score, result.total), (2, 3));

    register(&source, "alice").await;
    source
        .submit_play(
            quiz.id,
            PlaySubmission {
                answers: vec![answer(1, true), answer(3, true)],
            },
        )
        .await
        .unwrap();

    let board = source.leaderboard().await.unwrap();
    let rows: Vec<(u32, &str, u32)> = board
        .iter()
        .map(|e| (e.rank, e.username.as_str(), e.total_score))
        .collect();
    // 同分按用户名排序，没有答题记录的 carol 不出现
    assert_eq!(rows, vec![(1, "alice", 2), (2, "bob", 2)]);

    let profile = source.profile().await.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!((profile.quizzes_played, profile.total_score), (1, 2));
}

#[tokio::test]
async fn test_invite_rules() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "bob").await;
    register(&source, "alice").await;

    let invite_to = |name: &str| InviteRequest {
        username: name.to_string(),
    };

    assert!(matches!(
        source.send_invite(invite_to("alice")).await,
        Err(SourceError::Invalid(_))
    ));
    assert!(matches!(
        source.send_invite(invite_to("ghost")).await,
        Err(SourceError::NotFound(_))
    ));

    let invite = source.send_invite(invite_to("bob")).await.unwrap();
    assert_eq!(invite.to_user.username, "bob");
    assert!(matches!(
        source.send_invite(invite_to("bob")).await,
        Err(SourceError::Conflict(_))
    ));
    // 发送方不能替接收方响应
    assert!(matches!(
        source.respond_invite(invite.id, true).await,
        Err(SourceError::Forbidden(_))
    ));

    login(&source, "bob").await;
    // 反方向已有待处理邀请
    assert!(matches!(
        source.send_invite(invite_to("alice")).await,
        Err(SourceError::Conflict(_))
    ));
    let pending = source.pending_invites().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].from_user.username, "alice");

    source.respond_invite(invite.id, true).await.unwrap();
    assert!(source.pending_invites().await.unwrap().is_empty());
    let friends = source.friends().await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].user.username, "alice");

    assert!(matches!(
        source.send_invite(invite_to("alice")).await,
        Err(SourceError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_declined_invite_is_dropped() {
    let source = source_on(&MemoryStorage::new());
    register(&source, "bob").await;
    register(&source, "alice").await;
    let invite = source
        .send_invite(InviteRequest {
            username: "bob".to_string(),
        })
        .await
        .unwrap();

    login(&source, "bob").await;
    source.respond_invite(invite.id, false).await.unwrap();
    assert!(source.pending_invites().await.unwrap().is_empty());
    assert!(source.friends().await.unwrap().is_empty());
    assert!(matches!(
        source.respond_invite(invite.id, true).await,
        Err(SourceError::NotFound(_))
    ));
}

#[test]
fn test_rank_players_omits_users_without_plays() {
    assert!(rank_players(&[], &[]).is_empty());
}
