use quizz_auth::domain::notification::{Locale, Template};
use quizz_auth::domain::types::Role;
use quizz_auth::error::AuthServiceError;
use quizz_auth::password::verify_password;
use quizz_auth::usecase::register::{RegisterInput, RegisterUseCase};
use quizz_auth::usecase::verify::VerifyUseCase;
use quizz_core::config::Environment;

use crate::helpers::{MockMailer, MockUserRepo, settle_mail, test_user, token_service};

fn register_input(email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        first_name: "A".to_owned(),
        last_name: "B".to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        phone: None,
        city: Some(" Madrid ".to_owned()),
        country: Some(String::new()),
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_unverified_user_and_return_token() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let mailer = MockMailer::default();
    let sent = mailer.sent_handle();

    let uc = RegisterUseCase {
        users,
        mailer,
        tokens: token_service(Environment::Test),
    };

    let out = uc
        .execute(register_input("a@b.com", "secret1"), Locale::Es)
        .await
        .unwrap();

    let stored = handle.lock().unwrap()[0].clone();
    assert_eq!(stored.email, "a@b.com");
    assert_eq!(stored.role, Role::User);
    assert!(!stored.verified);
    assert_eq!(stored.login_attempts, 0);
    assert_eq!(stored.city.as_deref(), Some("Madrid"));
    assert_eq!(stored.country, None);
    assert_ne!(stored.password_hash, "secret1");
    assert!(verify_password("secret1", &stored.password_hash));

    assert_eq!(uc.tokens.subject(&out.token).unwrap(), stored.id);
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["user"]["firstName"], "A");
    assert_eq!(json["user"]["verified"], false);
    assert!(json["user"].get("passwordHash").is_none());
    // Echoed outside production as a testing aid.
    assert_eq!(
        json["user"]["verification"].as_str(),
        stored.verification.as_deref()
    );

    let mails = settle_mail(&sent, 1).await;
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].locale, Locale::Es);
    assert_eq!(mails[0].recipient.email, "a@b.com");
    assert_eq!(
        mails[0].template,
        Template::Registration {
            verification: stored.verification.clone().unwrap()
        }
    );
}

#[tokio::test]
async fn should_hide_verification_in_production() {
    let uc = RegisterUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::default(),
        tokens: token_service(Environment::Production),
    };

    let out = uc
        .execute(register_input("a@b.com", "secret1"), Locale::En)
        .await
        .unwrap();

    assert!(out.user.verification.is_none());
}

#[tokio::test]
async fn should_reject_existing_email() {
    let uc = RegisterUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        mailer: MockMailer::default(),
        tokens: token_service(Environment::Test),
    };

    let result = uc
        .execute(register_input("A@B.COM", "secret1"), Locale::En)
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailAlreadyExists)),
        "expected EmailAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_taken_email_when_insert_loses_race() {
    let mut users = MockUserRepo::empty();
    users.email_taken_on_create = true;
    let mailer = MockMailer::default();
    let sent = mailer.sent_handle();

    let uc = RegisterUseCase {
        users,
        mailer,
        tokens: token_service(Environment::Test),
    };

    let result = uc
        .execute(register_input("a@b.com", "secret1"), Locale::En)
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailAlreadyExists)),
        "expected EmailAlreadyExists, got {result:?}"
    );
    assert_eq!(
        result.unwrap_err().status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
    assert!(settle_mail(&sent, 1).await.is_empty());
}

#[tokio::test]
async fn should_register_even_when_mail_fails() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let mailer = MockMailer::failing();
    let sent = mailer.sent_handle();

    let uc = RegisterUseCase {
        users,
        mailer,
        tokens: token_service(Environment::Test),
    };

    let out = uc
        .execute(register_input("a@b.com", "secret1"), Locale::En)
        .await;

    assert!(out.is_ok(), "mail failure must not surface: {out:?}");
    assert_eq!(handle.lock().unwrap().len(), 1);
    assert_eq!(settle_mail(&sent, 1).await.len(), 1);
}

#[tokio::test]
async fn should_validate_registration_fields() {
    let uc = RegisterUseCase {
        users: MockUserRepo::empty(),
        mailer: MockMailer::default(),
        tokens: token_service(Environment::Test),
    };

    let mut input = register_input("a@b.com", "secret1");
    input.first_name = "  ".to_owned();
    let result = uc.execute(input, Locale::En).await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Validation {
            field: "firstName",
            reason: "IS_EMPTY"
        })
    ));

    let result = uc.execute(register_input("bad-email", "secret1"), Locale::En).await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Validation { field: "email", .. })
    ));

    let result = uc.execute(register_input("a@b.com", "abc"), Locale::En).await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Validation { field: "password", .. })
    ));
}

// ── VerifyUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_once() {
    let mut user = test_user();
    user.verified = false;
    let verification = user.verification.clone().unwrap();
    let users = MockUserRepo::new(vec![user]);
    let handle = users.users_handle();
    let uc = VerifyUseCase { users };

    let out = uc.execute(&verification).await.unwrap();
    assert_eq!(out.email, "a@b.com");
    assert!(out.verified);
    assert!(handle.lock().unwrap()[0].verified);

    let again = uc.execute(&verification).await;
    assert!(
        matches!(again, Err(AuthServiceError::NotFoundOrAlreadyVerified)),
        "expected NotFoundOrAlreadyVerified, got {again:?}"
    );
}

#[tokio::test]
async fn should_not_distinguish_unknown_verification() {
    let uc = VerifyUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };

    let result = uc.execute("no-such-token").await;
    assert!(matches!(
        result,
        Err(AuthServiceError::NotFoundOrAlreadyVerified)
    ));

    let result = uc.execute("").await;
    assert!(matches!(result, Err(AuthServiceError::Validation { .. })));
}
