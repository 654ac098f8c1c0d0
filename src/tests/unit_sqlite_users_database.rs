use crate::database::sqlite::SqliteRepository;
use crate::database::{StoreError, UserRepository};
use crate::domain::NewUser;

// create a sqlite database in memory to test against
async fn setup_test_db() -> SqliteRepository {
    SqliteRepository::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

fn with_email(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: Some(email.to_string()),
    }
}

// test the database's ability to save and retrieve users
#[tokio::test]
async fn test_sqlite_create_and_get() {
    let repo = setup_test_db().await;

    let created = repo
        .create_user(&NewUser::named("John Doe"))
        .await
        .expect("Should create user");

    let retrieved = repo
        .get_user(created.id)
        .await
        .expect("Should query")
        .expect("Should find user");

    assert_eq!(retrieved.id, created.id);
    assert_eq!(retrieved.name, "John Doe");
    assert_eq!(retrieved.email, None);
}

// ids come from AUTOINCREMENT, starting at 1 and never reused
#[tokio::test]
async fn test_sqlite_ids_are_monotonic() {
    let repo = setup_test_db().await;

    let first = repo.create_user(&NewUser::named("a")).await.unwrap();
    let second = repo.create_user(&NewUser::named("b")).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    repo.delete_user(second.id).await.unwrap();
    let third = repo.create_user(&NewUser::named("c")).await.unwrap();
    assert_eq!(third.id, 3);
}

#[tokio::test]
async fn test_sqlite_get_missing_is_none() {
    let repo = setup_test_db().await;
    let retrieved = repo.get_user(42).await.unwrap();
    assert!(retrieved.is_none());
}

// test the database's ability to replace a user's name
#[tokio::test]
async fn test_sqlite_update() {
    let repo = setup_test_db().await;
    let created = repo
        .create_user(&with_email("John", "john@example.com"))
        .await
        .unwrap();

    let updated = repo
        .update_user(created.id, "Jane")
        .await
        .unwrap()
        .expect("Should find user to update");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Jane");
    // email is untouched by a name replacement
    assert_eq!(updated.email.as_deref(), Some("john@example.com"));

    let retrieved = repo.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(retrieved.name, "Jane");
}

// updating an id that doesn't exist must not create a row
#[tokio::test]
async fn test_sqlite_update_missing_creates_nothing() {
    let repo = setup_test_db().await;

    let updated = repo.update_user(99, "Ghost").await.unwrap();
    assert!(updated.is_none());

    assert!(repo.get_user(99).await.unwrap().is_none());
    assert!(repo.list_users().await.unwrap().is_empty());
}

// test that the database will delete users, and report a second delete as a miss
#[tokio::test]
async fn test_sqlite_delete_twice() {
    let repo = setup_test_db().await;
    let created = repo.create_user(&NewUser::named("John")).await.unwrap();

    assert!(repo.delete_user(created.id).await.unwrap());
    assert!(!repo.delete_user(created.id).await.unwrap());

    let retrieved = repo.get_user(created.id).await.unwrap();
    assert!(retrieved.is_none());
}

// after N creates and M deletes, exactly N - M users remain
#[tokio::test]
async fn test_sqlite_list_after_creates_and_deletes() {
    let repo = setup_test_db().await;

    let mut ids = Vec::new();
    for i in 0..10 {
        let user = repo
            .create_user(&NewUser::named(format!("user {}", i)))
            .await
            .unwrap();
        ids.push(user.id);
    }

    for id in ids.iter().step_by(3) {
        assert!(repo.delete_user(*id).await.unwrap());
    }

    let users = repo.list_users().await.unwrap();
    assert_eq!(users.len(), 10 - 4);
    // native row order is insertion order for this table
    let listed: Vec<i64> = users.iter().map(|u| u.id).collect();
    let expected: Vec<i64> = ids.into_iter().filter(|id| (id - 1) % 3 != 0).collect();
    assert_eq!(listed, expected);
}

// test that the database will not accept two users with the same email
#[tokio::test]
async fn test_sqlite_unique_email_constraint() {
    let repo = setup_test_db().await;

    repo.create_user(&with_email("John", "same@example.com"))
        .await
        .unwrap();
    let result = repo
        .create_user(&with_email("Jane", "same@example.com"))
        .await;

    assert!(
        matches!(result, Err(StoreError::ConstraintViolation(_))),
        "Should fail due to unique email constraint"
    );
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

// emails are optional, so many users may have none
#[tokio::test]
async fn test_sqlite_many_users_without_email() {
    let repo = setup_test_db().await;
    repo.create_user(&NewUser::named("a")).await.unwrap();
    repo.create_user(&NewUser::named("b")).await.unwrap();
    assert_eq!(repo.list_users().await.unwrap().len(), 2);
}

// closing is idempotent, and the store reports a plain store error afterward
#[tokio::test]
async fn test_sqlite_close() {
    let repo = setup_test_db().await;
    repo.close().await;
    repo.close().await;

    let result = repo.list_users().await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}

// the database file is created on first start and reused on the next one
#[tokio::test]
async fn test_sqlite_on_disk_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("users.sqlite").display());

    let repo = SqliteRepository::connect(&url).await.unwrap();
    let created = repo.create_user(&NewUser::named("Persisted")).await.unwrap();
    repo.close().await;

    // opening again runs the migration a second time, which must be harmless
    let reopened = SqliteRepository::connect(&url).await.unwrap();
    let retrieved = reopened.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(retrieved.name, "Persisted");
    reopened.close().await;
}
