mod common;

use common::{draft, memory_settings, setup_registry, sqlite_memory_settings};
use user_registry::backend::BackendSettings;
use user_registry::{UserDraft, UserRegistry};

async fn run_create_normalizes_and_hashes(registry: UserRegistry) {
    let created = registry
        .create_user(draft("Ann", "ANN@Example.com", "secret1"))
        .await
        .unwrap();

    // Email persisted in lowercase form
    assert_eq!(created.email, "ann@example.com");
    assert_eq!(created.name, "Ann");

    // Hash set, plaintext not retained anywhere on the record
    assert!(created.password_hash.starts_with("$2"));
    assert_ne!(created.password_hash, "secret1");

    // And the hash never leaves through serialization
    let json = serde_json::to_value(&created).unwrap();
    assert!(json.get("password_hash").is_none());
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn test_create_normalizes_and_hashes_sqlite() {
    run_create_normalizes_and_hashes(setup_registry(&sqlite_memory_settings()).await).await;
}

#[tokio::test]
async fn test_create_normalizes_and_hashes_memory() {
    run_create_normalizes_and_hashes(setup_registry(&memory_settings()).await).await;
}

async fn run_find_after_create(registry: UserRegistry) {
    let created = registry
        .create_user(draft("Bob", "bob@example.com", "secret1"))
        .await
        .unwrap();

    let by_id = registry.find_user(&created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "bob@example.com");

    // Lookup is case-insensitive
    let by_email = registry
        .find_user_by_email("BOB@EXAMPLE.COM")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn test_find_after_create_sqlite() {
    run_find_after_create(setup_registry(&sqlite_memory_settings()).await).await;
}

#[tokio::test]
async fn test_find_after_create_memory() {
    run_find_after_create(setup_registry(&memory_settings()).await).await;
}

async fn run_update_keeps_hash_when_password_omitted(registry: UserRegistry) {
    let created = registry
        .create_user(draft("Cara", "cara@example.com", "secret1"))
        .await
        .unwrap();

    let updated = registry
        .update_user(&created.id, UserDraft::new("Cara Renamed", "cara@example.com"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Cara Renamed");
    assert_eq!(updated.password_hash, created.password_hash);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    // Old password still authenticates
    assert!(registry
        .authenticate("cara@example.com", "secret1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_update_keeps_hash_when_password_omitted_sqlite() {
    run_update_keeps_hash_when_password_omitted(setup_registry(&sqlite_memory_settings()).await)
        .await;
}

#[tokio::test]
async fn test_update_keeps_hash_when_password_omitted_memory() {
    run_update_keeps_hash_when_password_omitted(setup_registry(&memory_settings()).await).await;
}

async fn run_update_changes_password(registry: UserRegistry) {
    let created = registry
        .create_user(draft("Dan", "dan@example.com", "oldsecret"))
        .await
        .unwrap();

    registry
        .update_user(&created.id, draft("Dan", "dan@example.com", "newsecret"))
        .await
        .unwrap()
        .unwrap();

    assert!(!registry
        .authenticate("dan@example.com", "oldsecret")
        .await
        .unwrap());
    assert!(registry
        .authenticate("dan@example.com", "newsecret")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_update_changes_password_sqlite() {
    run_update_changes_password(setup_registry(&sqlite_memory_settings()).await).await;
}

#[tokio::test]
async fn test_update_changes_password_memory() {
    run_update_changes_password(setup_registry(&memory_settings()).await).await;
}

async fn run_update_unknown_id_returns_none(registry: UserRegistry) {
    let result = registry
        .update_user("no-such-id", draft("Eve", "eve@example.com", "secret1"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_unknown_id_returns_none_sqlite() {
    run_update_unknown_id_returns_none(setup_registry(&sqlite_memory_settings()).await).await;
}

#[tokio::test]
async fn test_update_unknown_id_returns_none_memory() {
    run_update_unknown_id_returns_none(setup_registry(&memory_settings()).await).await;
}

async fn run_delete_then_gone(registry: UserRegistry) {
    let created = registry
        .create_user(draft("Finn", "finn@example.com", "secret1"))
        .await
        .unwrap();

    assert!(registry.delete_user(&created.id).await.unwrap());
    assert!(registry.find_user(&created.id).await.unwrap().is_none());
    assert!(!registry.delete_user(&created.id).await.unwrap());

    // Email is free again after deletion
    registry
        .create_user(draft("Finn II", "finn@example.com", "secret1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_then_gone_sqlite() {
    run_delete_then_gone(setup_registry(&sqlite_memory_settings()).await).await;
}

#[tokio::test]
async fn test_delete_then_gone_memory() {
    run_delete_then_gone(setup_registry(&memory_settings()).await).await;
}

fn settings_matrix() -> Vec<BackendSettings> {
    vec![sqlite_memory_settings(), memory_settings()]
}

#[tokio::test]
async fn test_list_users_ordered_by_creation() {
    for settings in settings_matrix() {
        let registry = setup_registry(&settings).await;

        registry
            .create_user(draft("First", "first@example.com", "secret1"))
            .await
            .unwrap();
        registry
            .create_user(draft("Second", "second@example.com", "secret1"))
            .await
            .unwrap();

        let all = registry.list_users().await.unwrap();
        assert_eq!(all.len(), 2);
        let emails: Vec<&str> = all.iter().map(|u| u.email.as_str()).collect();
        assert!(emails.contains(&"first@example.com"));
        assert!(emails.contains(&"second@example.com"));
    }
}
