//! 表单校验
//!
//! 校验在提交前执行，结果按字段归类为 `FormError`。
//! 本地数据源也复用同一套规则，保证两种模式下的行为一致。

use quizhub_shared::QuizDraft;

use crate::error::{FormError, Issue, first_message};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM: &str = "confirm";
pub const FIELD_CURRENT_PASSWORD: &str = "currentPassword";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_QUESTIONS: &str = "questions";

/// 按字段收集的校验错误，保持添加顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, FormError)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, error: FormError) {
        self.entries.push((field.to_string(), error));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 指定字段的全部错误
    pub fn get(&self, field: &str) -> Vec<FormError> {
        self.entries
            .iter()
            .filter(|(name, _)| name == field)
            .map(|(_, error)| error.clone())
            .collect()
    }

    /// 第一条错误消息（按添加顺序）
    pub fn first_message(&self) -> Option<String> {
        let errors: Vec<FormError> = self.entries.iter().map(|(_, e)| e.clone()).collect();
        first_message(&errors)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login(username: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(username) {
        errors.add(FIELD_USERNAME, FormError::plain("Username is required"));
    }
    if password.is_empty() {
        errors.add(FIELD_PASSWORD, FormError::plain("Password is required"));
    }
    errors
}

fn validate_new_password(errors: &mut FieldErrors, field: &str, password: &str, confirm: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            field,
            FormError::plain(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )),
        );
    }
    if password != confirm {
        errors.add(FIELD_CONFIRM, FormError::plain("Passwords do not match"));
    }
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let username = username.trim();
    if username.is_empty() {
        errors.add(FIELD_USERNAME, FormError::plain("Username is required"));
    } else if !USERNAME_LEN.contains(&username.chars().count()) {
        errors.add(
            FIELD_USERNAME,
            FormError::plain(format!(
                "Username must be {} to {} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            )),
        );
    } else if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        errors.add(
            FIELD_USERNAME,
            FormError::plain("Username may only contain letters, digits and underscores"),
        );
    }

    if !is_valid_email(email.trim()) {
        errors.add(FIELD_EMAIL, FormError::plain("Enter a valid email address"));
    }

    validate_new_password(&mut errors, FIELD_PASSWORD, password, confirm);
    errors
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub fn validate_password_change(current: &str, new_password: &str, confirm: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if current.is_empty() {
        errors.add(
            FIELD_CURRENT_PASSWORD,
            FormError::plain("Current password is required"),
        );
    }
    validate_new_password(&mut errors, FIELD_PASSWORD, new_password, confirm);
    if !current.is_empty() && current == new_password {
        errors.add(
            FIELD_PASSWORD,
            FormError::plain("New password must differ from the current one"),
        );
    }
    errors
}

pub fn validate_quiz_draft(draft: &QuizDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.add(FIELD_TITLE, FormError::plain("Title is required"));
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            FIELD_TITLE,
            FormError::plain(format!("Title must be at most {} characters", MAX_TITLE_LEN)),
        );
    }

    if draft.description.trim().chars().count() > MAX_DESCRIPTION_LEN {
        errors.add(
            FIELD_DESCRIPTION,
            FormError::plain(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )),
        );
    }

    if draft.questions.is_empty() {
        errors.add(FIELD_QUESTIONS, FormError::plain("Add at least one question"));
    } else {
        // 每道空题对应一条结构化问题
        let issues: Vec<Issue> = draft
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| is_blank(&q.text))
            .map(|(i, _)| Issue::new(format!("Question {} needs text", i + 1)))
            .collect();
        if !issues.is_empty() {
            errors.add(FIELD_QUESTIONS, FormError::Structured(issues));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_shared::QuestionDraft;

    fn draft(title: &str, questions: &[&str]) -> QuizDraft {
        QuizDraft {
            title: title.to_string(),
            description: String::new(),
            questions: questions
                .iter()
                .map(|text| QuestionDraft {
                    text: text.to_string(),
                    correct_answer: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = validate_login(" ", "");
        assert_eq!(errors.get(FIELD_USERNAME).len(), 1);
        assert_eq!(errors.get(FIELD_PASSWORD).len(), 1);
        assert!(validate_login("alice", "secret").is_empty());
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration("alice_1", "a@b.co", "password1", "password1").is_empty());

        let errors = validate_registration("al", "a@b.co", "password1", "password1");
        assert_eq!(
            errors.first_message().as_deref(),
            Some("Username must be 3 to 32 characters")
        );

        let errors = validate_registration("al ice", "nope", "short", "other");
        assert_eq!(errors.get(FIELD_USERNAME).len(), 1);
        assert_eq!(errors.get(FIELD_EMAIL).len(), 1);
        assert_eq!(errors.get(FIELD_PASSWORD).len(), 1);
        assert_eq!(errors.get(FIELD_CONFIRM).len(), 1);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn test_password_change_must_differ() {
        let errors = validate_password_change("password1", "password1", "password1");
        assert_eq!(
            errors.get(FIELD_PASSWORD),
            vec![FormError::plain("New password must differ from the current one")]
        );
        assert!(validate_password_change("password1", "password2", "password2").is_empty());
    }

    #[test]
    fn test_quiz_draft_requires_title_and_questions() {
        let errors = validate_quiz_draft(&draft("", &[]));
        assert_eq!(errors.get(FIELD_TITLE).len(), 1);
        assert_eq!(
            errors.get(FIELD_QUESTIONS),
            vec![FormError::plain("Add at least one question")]
        );
        assert!(validate_quiz_draft(&draft("T", &["Q1"])).is_empty());
    }

    #[test]
    fn test_blank_questions_are_reported_as_structured_issues() {
        let errors = validate_quiz_draft(&draft("T", &["Q1", " ", ""]));
        let question_errors = errors.get(FIELD_QUESTIONS);
        assert_eq!(
            question_errors,
            vec![FormError::Structured(vec![
                Issue::new("Question 2 needs text"),
                Issue::new("Question 3 needs text"),
            ])]
        );
        assert_eq!(first_message(&question_errors).as_deref(), Some("Question 2 needs text"));
    }

    #[test]
    fn test_title_length_limit() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(validate_quiz_draft(&draft(&long, &["Q"])).get(FIELD_TITLE).len(), 1);
    }
}
