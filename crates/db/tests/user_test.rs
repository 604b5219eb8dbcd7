//! Integration tests for User repository.

mod common;

use hrms_db::UserRepository;

#[tokio::test]
async fn test_user_create_and_find_by_id() {
    let db = common::setup().await;
    let repo = UserRepository::new(db.clone());

    let user = repo
        .create("hr@example.org", "$argon2id$test_hash", "HR Admin", "admin")
        .await
        .expect("Failed to create user");

    assert_eq!(user.email, "hr@example.org");
    assert_eq!(user.name, "HR Admin");
    assert!(user.is_active);

    let found = repo
        .find_by_id(user.id)
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(found.email, user.email);
}

#[tokio::test]
async fn test_user_find_by_email() {
    let db = common::setup().await;
    let repo = UserRepository::new(db.clone());

    let user = repo
        .create("clerk@example.org", "$argon2id$test_hash", "Clerk", "staff")
        .await
        .expect("Failed to create user");

    let found = repo
        .find_by_email("clerk@example.org")
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(found.id, user.id);

    assert!(repo.email_exists("clerk@example.org").await.unwrap());
    assert!(!repo.email_exists("nobody@example.org").await.unwrap());
    assert!(repo.find_by_email("nobody@example.org").await.unwrap().is_none());
}

#[tokio::test]
async fn test_password_hash_never_serialized() {
    let db = common::setup().await;
    let user = UserRepository::new(db)
        .create("a@example.org", "$argon2id$secret", "A", "staff")
        .await
        .unwrap();

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
}
