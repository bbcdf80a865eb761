use quizz_auth::domain::notification::{Locale, Template};
use quizz_auth::error::AuthServiceError;
use quizz_auth::password::verify_password;
use quizz_auth::usecase::password::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, UpdatePasswordUseCase,
};
use quizz_core::config::Environment;

use crate::helpers::{
    MockForgotPasswordRepo, MockMailer, MockUserRepo, TEST_PASSWORD, settle_mail, test_ctx,
    test_ticket, test_user,
};

fn reset_input(verification: &str, password: &str) -> ResetPasswordInput {
    ResetPasswordInput {
        verification: verification.to_owned(),
        password: password.to_owned(),
    }
}

// ── ForgotPasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_ticket_and_send_reset_mail() {
    let tickets = MockForgotPasswordRepo::default();
    let tickets_handle = tickets.tickets_handle();
    let mailer = MockMailer::default();
    let sent = mailer.sent_handle();

    let uc = ForgotPasswordUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        tickets,
        mailer,
        env: Environment::Development,
    };

    let out = uc.execute("A@b.com", Locale::En, &test_ctx()).await.unwrap();

    let stored = tickets_handle.lock().unwrap()[0].clone();
    assert_eq!(stored.email, "a@b.com");
    assert!(!stored.used);
    assert_eq!(stored.ip_request, "203.0.113.7");
    assert_eq!(stored.browser_request, "test-agent/1.0");
    assert_eq!(stored.country_request, "ES");
    assert!(stored.ip_changed.is_none());

    assert_eq!(out.msg, "RESET_EMAIL_SENT");
    assert_eq!(out.email, "a@b.com");
    assert_eq!(out.verification.as_deref(), Some(stored.verification.as_str()));

    let mails = settle_mail(&sent, 1).await;
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].recipient.first_name, "A");
    assert_eq!(
        mails[0].template,
        Template::ResetPassword {
            verification: stored.verification
        }
    );
}

#[tokio::test]
async fn should_not_echo_ticket_in_production() {
    let uc = ForgotPasswordUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        tickets: MockForgotPasswordRepo::default(),
        mailer: MockMailer::default(),
        env: Environment::Production,
    };

    let out = uc.execute("a@b.com", Locale::En, &test_ctx()).await.unwrap();

    assert!(out.verification.is_none());
    let json = serde_json::to_value(&out).unwrap();
    assert!(json.get("verification").is_none());
}

#[tokio::test]
async fn should_return_user_does_not_exist_for_unknown_email() {
    let tickets = MockForgotPasswordRepo::default();
    let tickets_handle = tickets.tickets_handle();

    let uc = ForgotPasswordUseCase {
        users: MockUserRepo::empty(),
        tickets,
        mailer: MockMailer::default(),
        env: Environment::Test,
    };

    let result = uc.execute("nobody@example.com", Locale::En, &test_ctx()).await;

    assert!(
        matches!(result, Err(AuthServiceError::UserDoesNotExist)),
        "expected UserDoesNotExist, got {result:?}"
    );
    assert!(tickets_handle.lock().unwrap().is_empty());
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_consume_ticket() {
    let user = test_user();
    let old_hash = user.password_hash.clone();
    let ticket = test_ticket(&user.email);
    let users = MockUserRepo::new(vec![user]);
    let users_handle = users.users_handle();
    let tickets = MockForgotPasswordRepo::new(vec![ticket.clone()]);
    let tickets_handle = tickets.tickets_handle();

    let uc = ResetPasswordUseCase { users, tickets };

    let out = uc
        .execute(reset_input(&ticket.verification, "brand-new"), &test_ctx())
        .await
        .unwrap();
    assert_eq!(out.message, "PASSWORD_CHANGED");

    let new_hash = users_handle.lock().unwrap()[0].password_hash.clone();
    assert_ne!(new_hash, old_hash);
    assert!(verify_password("brand-new", &new_hash));
    assert!(!verify_password(TEST_PASSWORD, &new_hash));

    let stored = tickets_handle.lock().unwrap()[0].clone();
    assert!(stored.used);
    assert_eq!(stored.ip_changed.as_deref(), Some("203.0.113.7"));
    assert_eq!(stored.browser_changed.as_deref(), Some("test-agent/1.0"));
    assert_eq!(stored.country_changed.as_deref(), Some("ES"));
}

#[tokio::test]
async fn should_refuse_used_ticket() {
    let user = test_user();
    let mut ticket = test_ticket(&user.email);
    ticket.used = true;
    let users = MockUserRepo::new(vec![user.clone()]);
    let handle = users.users_handle();

    let uc = ResetPasswordUseCase {
        users,
        tickets: MockForgotPasswordRepo::new(vec![ticket.clone()]),
    };

    let result = uc
        .execute(reset_input(&ticket.verification, "brand-new"), &test_ctx())
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::NotFoundOrAlreadyUsed)),
        "expected NotFoundOrAlreadyUsed, got {result:?}"
    );
    assert_eq!(handle.lock().unwrap()[0].password_hash, user.password_hash);
}

#[tokio::test]
async fn should_refuse_second_reset_with_same_ticket() {
    let user = test_user();
    let ticket = test_ticket(&user.email);
    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        tickets: MockForgotPasswordRepo::new(vec![ticket.clone()]),
    };

    uc.execute(reset_input(&ticket.verification, "first-new"), &test_ctx())
        .await
        .unwrap();
    let second = uc
        .execute(reset_input(&ticket.verification, "second-new"), &test_ctx())
        .await;

    assert!(matches!(second, Err(AuthServiceError::NotFoundOrAlreadyUsed)));
}

#[tokio::test]
async fn should_let_only_one_racing_reset_win() {
    let user = test_user();
    let ticket = test_ticket(&user.email);
    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        tickets: MockForgotPasswordRepo::new(vec![ticket.clone()]),
    };

    let ctx = test_ctx();
    let (a, b) = tokio::join!(
        uc.execute(reset_input(&ticket.verification, "racer-one"), &ctx),
        uc.execute(reset_input(&ticket.verification, "racer-two"), &ctx),
    );

    let wins = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(wins, 1, "exactly one reset may consume the ticket");
    for result in [a, b] {
        if let Err(e) = result {
            assert!(matches!(e, AuthServiceError::NotFoundOrAlreadyUsed));
        }
    }
}

#[tokio::test]
async fn should_keep_ticket_usable_when_password_write_fails() {
    let user = test_user();
    let old_hash = user.password_hash.clone();
    let ticket = test_ticket(&user.email);
    let mut users = MockUserRepo::new(vec![user]);
    users.fail_password_write = true;
    let users_handle = users.users_handle();
    let tickets = MockForgotPasswordRepo::new(vec![ticket.clone()]);
    let tickets_handle = tickets.tickets_handle();

    let uc = ResetPasswordUseCase { users, tickets };

    let result = uc
        .execute(reset_input(&ticket.verification, "brand-new"), &test_ctx())
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    let stored = tickets_handle.lock().unwrap()[0].clone();
    assert!(!stored.used, "ticket must survive a failed reset");
    assert!(stored.ip_changed.is_none());
    assert_eq!(users_handle.lock().unwrap()[0].password_hash, old_hash);

    // Once the store recovers the same ticket completes the reset.
    let recovered = ResetPasswordUseCase {
        users: MockUserRepo {
            fail_password_write: false,
            ..uc.users.clone()
        },
        tickets: uc.tickets.clone(),
    };
    recovered
        .execute(reset_input(&ticket.verification, "brand-new"), &test_ctx())
        .await
        .unwrap();
    assert!(tickets_handle.lock().unwrap()[0].used);
    assert!(verify_password(
        "brand-new",
        &users_handle.lock().unwrap()[0].password_hash
    ));
}

#[tokio::test]
async fn should_return_not_found_when_ticket_owner_gone() {
    let ticket = test_ticket("gone@example.com");
    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        tickets: MockForgotPasswordRepo::new(vec![ticket.clone()]),
    };

    let result = uc
        .execute(reset_input(&ticket.verification, "brand-new"), &test_ctx())
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_new_password_on_reset() {
    let user = test_user();
    let ticket = test_ticket(&user.email);
    let tickets = MockForgotPasswordRepo::new(vec![ticket.clone()]);
    let tickets_handle = tickets.tickets_handle();
    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        tickets,
    };

    let result = uc
        .execute(reset_input(&ticket.verification, "123"), &test_ctx())
        .await;

    assert!(matches!(result, Err(AuthServiceError::Validation { .. })));
    assert!(!tickets_handle.lock().unwrap()[0].used);
}

// ── UpdatePasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_password_for_authenticated_user() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let handle = users.users_handle();
    let uc = UpdatePasswordUseCase { users };

    let first = uc.execute(user.id, "changed-1").await.unwrap();
    assert_eq!(first.message, "PASSWORD_CHANGED");
    let hash_one = handle.lock().unwrap()[0].password_hash.clone();
    assert!(!verify_password(TEST_PASSWORD, &hash_one));
    assert!(verify_password("changed-1", &hash_one));

    uc.execute(user.id, "changed-1").await.unwrap();
    let hash_two = handle.lock().unwrap()[0].password_hash.clone();
    assert_ne!(hash_one, hash_two, "every change rehashes with a fresh salt");
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_user() {
    let uc = UpdatePasswordUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc.execute(uuid::Uuid::new_v4(), "changed-1").await;
    assert!(matches!(result, Err(AuthServiceError::NotFound)));
}
