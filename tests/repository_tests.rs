//! Repository and service tests against an in-memory database

use di::Ref;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use users_api::core::services::MyUserService;
use users_api::core::traits::UserService;
use users_api::infrastructure::database::DatabaseConnection;
use users_api::infrastructure::entities::{NewMessage, NewUser};
use users_api::infrastructure::error::StoreError;
use users_api::infrastructure::repositories::{DbMessageRepository, DbUserRepository};
use users_api::infrastructure::traits::{MessageRepository, UserRepository};

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

fn user_repository(pool: &SqlitePool) -> DbUserRepository {
    DbUserRepository::new(Ref::new(DatabaseConnection::from_pool(pool.clone())))
}

fn user_service(pool: &SqlitePool) -> MyUserService {
    let repo: Ref<dyn UserRepository> = Ref::new(user_repository(pool));
    MyUserService::new(repo)
}

fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        password: password.to_owned(),
        ..NewUser::default()
    }
}

async fn count_users_named(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_user_uses_column_defaults() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);

    let user = repo.create_user(new_user("alice", "pw1")).await.unwrap();

    assert!(user.user_id > 0);
    assert_eq!(user.username, "alice");
    assert_eq!(user.password, "pw1");
    assert!(user.picture.is_empty());
    assert!(!user.is_connected);
    assert_eq!(user.description, "");
}

#[tokio::test]
async fn test_create_user_with_optional_fields() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);

    let user = repo
        .create_user(NewUser {
            username: "bob".to_owned(),
            password: "pw".to_owned(),
            picture: Some(vec![1, 2, 3]),
            is_connected: Some(true),
            description: Some("hello".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(user.picture, vec![1, 2, 3]);
    assert!(user.is_connected);
    assert_eq!(user.description, "hello");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);

    repo.create_user(new_user("alice", "pw1")).await.unwrap();
    let err = repo.create_user(new_user("alice", "pw2")).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(count_users_named(&pool, "alice").await, 1);
}

#[tokio::test]
async fn test_overlong_username_is_a_constraint_error() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);

    let err = repo
        .create_user(new_user(&"a".repeat(31), "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn test_find_by_credentials() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);
    repo.create_user(new_user("alice", "pw1")).await.unwrap();

    let profile = repo.find_by_credentials("alice", "pw1").await.unwrap();
    assert_eq!(profile.username, "alice");

    for (username, password) in [("alice", "wrong"), ("Alice", "pw1"), ("alice", "PW1"), ("bob", "pw1")] {
        let err = repo
            .find_by_credentials(username, password)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound), "{username}/{password}");
    }
}

#[tokio::test]
async fn test_find_by_username() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);
    let created = repo.create_user(new_user("alice", "pw1")).await.unwrap();

    let profile = repo.find_by_username("alice").await.unwrap();
    assert_eq!(profile.user_id, created.user_id);

    assert!(matches!(
        repo.find_by_username("nobody").await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn test_list_usernames_in_insertion_order() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);

    assert!(repo.list_usernames().await.unwrap().is_empty());

    for name in ["zoe", "adam", "mia"] {
        repo.create_user(new_user(name, "pw")).await.unwrap();
    }

    assert_eq!(repo.list_usernames().await.unwrap(), vec!["zoe", "adam", "mia"]);
}

#[tokio::test]
async fn test_picture_round_trip() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);
    repo.create_user(new_user("alice", "pw1")).await.unwrap();

    assert!(repo.find_picture("alice").await.unwrap().is_empty());

    let affected = repo.update_picture("alice", vec![0x00, 0x01]).await.unwrap();
    assert_eq!(affected, 1);
    assert_eq!(repo.find_picture("alice").await.unwrap(), vec![0x00, 0x01]);

    assert!(matches!(
        repo.find_picture("nobody").await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn test_updates_on_missing_user_touch_nothing() {
    let pool = setup_test_db().await;
    let repo = user_repository(&pool);
    repo.create_user(new_user("alice", "pw1")).await.unwrap();

    assert_eq!(repo.update_picture("ghost", vec![9]).await.unwrap(), 0);
    assert_eq!(repo.update_connection_status("ghost", true).await.unwrap(), 0);
    assert_eq!(
        repo.update_description("ghost", "boo".to_owned()).await.unwrap(),
        0
    );

    assert_eq!(repo.list_usernames().await.unwrap(), vec!["alice"]);
    let alice = repo.find_by_username("alice").await.unwrap();
    assert!(!alice.is_connected);
    assert_eq!(alice.description, "");
}

#[tokio::test]
async fn test_connection_status_is_idempotent() {
    let pool = setup_test_db().await;
    let service = user_service(&pool);
    service.register(new_user("alice", "pw1")).await.unwrap();

    service.update_connection_status("alice", true).await.unwrap();
    let once = service.get_user_by_username("alice").await.unwrap();

    service.update_connection_status("alice", true).await.unwrap();
    let twice = service.get_user_by_username("alice").await.unwrap();

    assert!(once.is_connected);
    assert_eq!(once.is_connected, twice.is_connected);

    service.update_connection_status("alice", false).await.unwrap();
    assert!(!service.get_user_by_username("alice").await.unwrap().is_connected);
}

#[tokio::test]
async fn test_service_reports_rows_affected() {
    let pool = setup_test_db().await;
    let service = user_service(&pool);
    service.register(new_user("alice", "pw1")).await.unwrap();

    assert_eq!(
        service
            .update_description("alice", "likes rust".to_owned())
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        service
            .update_description("ghost", "likes rust".to_owned())
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        service.get_user("alice", "pw1").await.unwrap().description,
        "likes rust"
    );
}

#[tokio::test]
async fn test_messages_by_sender() {
    let pool = setup_test_db().await;
    let repo = DbMessageRepository::new(Ref::new(DatabaseConnection::from_pool(pool.clone())));

    let first = repo
        .create_message(NewMessage {
            sender: "alice".to_owned(),
            message: "hi bob".to_owned(),
        })
        .await
        .unwrap();
    repo.create_message(NewMessage {
        sender: "bob".to_owned(),
        message: "hi alice".to_owned(),
    })
    .await
    .unwrap();
    let second = repo
        .create_message(NewMessage {
            sender: "alice".to_owned(),
            message: "how are you?".to_owned(),
        })
        .await
        .unwrap();

    assert!(first.message_id < second.message_id);

    let from_alice = repo.list_messages_from("alice").await.unwrap();
    let texts: Vec<&str> = from_alice.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["hi bob", "how are you?"]);

    assert!(repo.list_messages_from("carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_not_null_violation_is_a_constraint_error() {
    let pool = setup_test_db().await;

    let err = sqlx::query("INSERT INTO users (username, password) VALUES ('alice', NULL)")
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(matches!(StoreError::from(err), StoreError::Constraint(_)));
    assert_eq!(count_users_named(&pool, "alice").await, 0);
}
