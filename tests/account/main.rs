//! Integration tests for the sample account flow.


use account::{handle_save, AccountRepository, SaveError, SaveRequest};
use repobase::InMemoryDocumentStore;

fn request(email: &str) -> SaveRequest {
    SaveRequest {
        id: String::new(),
        email_address: Some(email.to_string()),
        title: "mr.".into(),
        first_name: "firstname".into(),
        last_name: "surname".into(),
        mobile: "0773469292".into(),
        street: "street".into(),
        city: "city".into(),
        state: "state".into(),
        zip_code: "10100".into(),
        country_code: "LKA".into(),
    }
}

#[tokio::test]
async fn create_account() {
    let accounts = AccountRepository::new(InMemoryDocumentStore::new());
    let email = format!("{}@Email.com", uuid::Uuid::new_v4());

    let response = handle_save(&accounts, request(&email)).await.unwrap();
    assert!(!response.id.is_empty());

    let account = accounts.find_by_id(&response.id).await.unwrap().unwrap();
    assert_eq!(account.email, email.to_lowercase());
    assert!(!account.is_email_verified);
    assert_eq!(account.address.country_code, "LKA");
}

#[tokio::test]
async fn email_owned_by_another_account_is_rejected() {
    let accounts = AccountRepository::new(InMemoryDocumentStore::new());
    handle_save(&accounts, request("taken@email.com"))
        .await
        .unwrap();

    let err = handle_save(&accounts, request("TAKEN@email.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, SaveError::EmailTaken));
}

#[tokio::test]
async fn missing_email_is_rejected() {
    let accounts = AccountRepository::new(InMemoryDocumentStore::new());
    let mut req = request("x@email.com");
    req.email_address = None;

    assert!(matches!(
        handle_save(&accounts, req).await,
        Err(SaveError::EmailTaken)
    ));
}

#[tokio::test]
async fn update_keeps_verification_state() {
    let accounts = AccountRepository::new(InMemoryDocumentStore::new());
    let created = handle_save(&accounts, request("me@email.com"))
        .await
        .unwrap();

    // the server verifies the email out of band
    let mut account = accounts.find_by_id(&created.id).await.unwrap().unwrap();
    account.is_email_verified = true;
    accounts.save(&mut account).await.unwrap();

    let mut update = request("me@email.com");
    update.id = created.id.clone();
    update.city = "kandy".into();
    let updated = handle_save(&accounts, update).await.unwrap();
    assert_eq!(updated, created);

    let stored = accounts.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.address.city, "kandy");
    assert!(stored.is_email_verified);
}

#[tokio::test]
async fn id_for_email_ignores_case() {
    let accounts = AccountRepository::new(InMemoryDocumentStore::new());
    let created = handle_save(&accounts, request("Mixed@Email.com"))
        .await
        .unwrap();

    assert_eq!(
        accounts.id_for_email("MIXED@email.COM").await.unwrap(),
        Some(created.id)
    );
    assert_eq!(accounts.id_for_email("other@email.com").await.unwrap(), None);
}
