//! Integration tests for row-level security isolation between advisors.

mod common;

use assessoria_db::{ClientRepository, GoalRepository, RlsConnection};
use assessoria_shared::{AdvisorId, AppError, YearMonth};
use common::{admin_db, claims_for, cleanup_user, create_auth_user, create_client, unique_email};
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, DbBackend, Statement};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_advisor_sees_only_own_clients() {
    let db = admin_db().await;
    let email_a = unique_email();
    let email_b = unique_email();
    let user_a = create_auth_user(&db, &email_a, "Advisor A").await;
    let user_b = create_auth_user(&db, &email_b, "Advisor B").await;
    create_client(&db, user_a, "Cliente A1").await;
    create_client(&db, user_a, "Cliente A2").await;
    let client_b = create_client(&db, user_b, "Cliente B1").await;

    let rls = RlsConnection::for_user(&db, &claims_for(user_a, &email_a))
        .await
        .unwrap();
    let repo = ClientRepository::new(rls.transaction());

    let own = repo.list_positions(AdvisorId::from_uuid(user_a)).await.unwrap();
    assert_eq!(own.len(), 2);

    // Asking for the other advisor's rows still yields nothing.
    let other = repo.list_positions(AdvisorId::from_uuid(user_b)).await.unwrap();
    assert!(other.is_empty());
    assert!(!repo
        .exists(AdvisorId::from_uuid(user_b), client_b.into())
        .await
        .unwrap());
    rls.rollback().await.unwrap();

    cleanup_user(&db, user_a).await;
    cleanup_user(&db, user_b).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_writing_rows_for_another_advisor_is_forbidden() {
    let db = admin_db().await;
    let email_a = unique_email();
    let user_a = create_auth_user(&db, &email_a, "Advisor A").await;
    let user_b = create_auth_user(&db, &unique_email(), "Advisor B").await;

    let rls = RlsConnection::for_user(&db, &claims_for(user_a, &email_a))
        .await
        .unwrap();
    let err = GoalRepository::new(rls.transaction())
        .upsert(
            AdvisorId::from_uuid(user_b),
            YearMonth::new(2025, 2).unwrap(),
            dec!(50000),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
    rls.rollback().await.unwrap();

    cleanup_user(&db, user_a).await;
    cleanup_user(&db, user_b).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_rls_context_does_not_outlive_transaction() {
    let db = admin_db().await;
    let email = unique_email();
    let user = create_auth_user(&db, &email, "Advisor").await;

    let rls = RlsConnection::for_user(&db, &claims_for(user, &email))
        .await
        .unwrap();
    let row = rls
        .transaction()
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT auth.uid()::text AS uid, current_user::text AS role",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<String>("", "uid").unwrap(), user.to_string());
    assert_eq!(row.try_get::<String>("", "role").unwrap(), "authenticated");
    rls.commit().await.unwrap();

    let after = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT auth.uid()::text AS uid",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.try_get::<Option<String>>("", "uid").unwrap(), None);

    cleanup_user(&db, user).await;
}
