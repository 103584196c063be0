use super::*;

// =========================================================
// 路径解析
// =========================================================

#[test]
fn test_parse_static_routes() {
    assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
    assert_eq!(AppRoute::from_path(""), AppRoute::Home);
    assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
    assert_eq!(AppRoute::from_path("/account"), AppRoute::Account);
    assert_eq!(AppRoute::from_path("/settings/"), AppRoute::Settings);
    assert_eq!(AppRoute::from_path("/quizzes"), AppRoute::Quizzes);
    assert_eq!(AppRoute::from_path("/create-quiz"), AppRoute::CreateQuiz);
    assert_eq!(AppRoute::from_path("/leaderboard"), AppRoute::Leaderboard);
}

#[test]
fn test_parse_routes_with_id() {
    assert_eq!(AppRoute::from_path("/edit-quiz/12"), AppRoute::EditQuiz(12));
    assert_eq!(AppRoute::from_path("/play/3"), AppRoute::PlayQuiz(3));
    assert_eq!(AppRoute::from_path("/edit-quiz/abc"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_path("/edit-quiz"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_path("/play/1/extra"), AppRoute::NotFound);
}

#[test]
fn test_path_round_trip() {
    let routes = [
        AppRoute::Home,
        AppRoute::Login,
        AppRoute::Account,
        AppRoute::Settings,
        AppRoute::Quizzes,
        AppRoute::CreateQuiz,
        AppRoute::EditQuiz(7),
        AppRoute::PlayQuiz(8),
        AppRoute::Leaderboard,
    ];
    for route in routes {
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
    }
}

// =========================================================
// 守卫
// =========================================================

#[test]
fn test_only_login_is_public() {
    assert!(!AppRoute::Login.requires_auth());
    assert!(!AppRoute::NotFound.requires_auth());
    assert!(AppRoute::Home.requires_auth());
    assert!(AppRoute::EditQuiz(1).requires_auth());
    assert!(AppRoute::Settings.requires_auth());
}

#[test]
fn test_guard_redirects_anonymous_users_to_login() {
    assert_eq!(AppRoute::Quizzes.guard(false), AppRoute::Login);
    assert_eq!(AppRoute::PlayQuiz(4).guard(false), AppRoute::Login);
    assert_eq!(AppRoute::Login.guard(false), AppRoute::Login);
    assert_eq!(AppRoute::NotFound.guard(false), AppRoute::NotFound);
}

#[test]
fn test_guard_sends_authenticated_users_home_from_login() {
    assert_eq!(AppRoute::Login.guard(true), AppRoute::Home);
    assert_eq!(AppRoute::Leaderboard.guard(true), AppRoute::Leaderboard);
}
