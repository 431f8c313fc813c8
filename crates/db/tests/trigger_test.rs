//! Integration tests for the profile triggers on `auth.users`.

mod common;

use assessoria_db::entities::profiles;
use common::{admin_db, cleanup_user, create_auth_user, unique_email};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter, Statement,
};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_new_user_gets_exactly_one_profile() {
    let db = admin_db().await;
    let email = unique_email();

    let user_id = create_auth_user(&db, &email, "Ana Souza").await;

    let count = profiles::Entity::find()
        .filter(profiles::Column::Id.eq(user_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let profile = profiles::Entity::find_by_id(user_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.email, email);
    assert_eq!(profile.nome.as_deref(), Some("Ana Souza"));
    assert_eq!(profile.codigo_xp.as_deref(), Some("A12345"));

    cleanup_user(&db, user_id).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_existing_profile_does_not_block_signup() {
    let db = admin_db().await;
    let user_id = create_auth_user(&db, &unique_email(), "Ana").await;

    // Replaying the trigger body must not fail or duplicate.
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "INSERT INTO profiles (id, email) VALUES ($1, 'x@svninvest.com.br') ON CONFLICT (id) DO NOTHING",
        [user_id.into()],
    ))
    .await
    .unwrap();

    let count = profiles::Entity::find()
        .filter(profiles::Column::Id.eq(user_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    cleanup_user(&db, user_id).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_email_change_is_synced() {
    let db = admin_db().await;
    let user_id = create_auth_user(&db, &unique_email(), "Ana").await;
    let new_email = unique_email();

    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "UPDATE auth.users SET email = $1 WHERE id = $2",
        [new_email.clone().into(), user_id.into()],
    ))
    .await
    .unwrap();

    let profile = profiles::Entity::find_by_id(user_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.email, new_email);

    cleanup_user(&db, user_id).await;
}
