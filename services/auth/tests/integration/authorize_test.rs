use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use quizz_auth::domain::types::Role;
use quizz_auth::error::AuthServiceError;
use quizz_auth::usecase::authorize::AuthorizeUseCase;

use crate::helpers::{MockUserRepo, test_user};

#[tokio::test]
async fn should_run_continuation_for_allowed_role() {
    let user = test_user();
    let uc = AuthorizeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };

    let out = uc
        .execute(user.id, &[Role::User, Role::Admin], |u| async move {
            Ok::<_, AuthServiceError>(u.email)
        })
        .await
        .unwrap();

    assert_eq!(out, "a@b.com");
}

#[tokio::test]
async fn should_refuse_role_outside_allowed_set() {
    let user = test_user();
    let uc = AuthorizeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    let ran = AtomicBool::new(false);

    let result = uc
        .execute(user.id, &[Role::Admin], |_| async {
            ran.store(true, Ordering::SeqCst);
            Ok::<_, AuthServiceError>(())
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
    assert!(!ran.load(Ordering::SeqCst), "continuation must not run");
}

#[tokio::test]
async fn should_read_current_role_from_store() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let handle = users.users_handle();
    let uc = AuthorizeUseCase { users };

    assert!(uc.check(user.id, &[Role::Admin]).await.is_err());

    handle.lock().unwrap()[0].role = Role::Admin;
    let promoted = uc.check(user.id, &[Role::Admin]).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_identity() {
    let uc = AuthorizeUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc.check(Uuid::new_v4(), &[Role::User]).await;
    assert!(
        matches!(result, Err(AuthServiceError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}
