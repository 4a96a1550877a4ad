use super::common::*;

use crate::applications::domain::{ApplicationId, SUBMITTED_STATUS};
use crate::applications::memory::InMemoryApplicationStore;
use crate::applications::repository::ApplicationRepository;
use crate::applications::schema::validate;

#[tokio::test]
async fn insert_assigns_increasing_ids_and_timestamps() {
    let store = InMemoryApplicationStore::default();
    store.initialize().await.expect("initialize is a no-op");

    let first = store
        .insert(validate(submission()).expect("valid"))
        .await
        .expect("insert succeeds");
    let second = store
        .insert(validate(complete_submission()).expect("valid"))
        .await
        .expect("insert succeeds");

    assert_eq!(first.id, ApplicationId(1));
    assert_eq!(second.id, ApplicationId(2));
    assert!(second.created_at > first.created_at);
    assert_eq!(first.submitted_at, first.created_at);
    assert_eq!(first.application_status, SUBMITTED_STATUS);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn list_returns_most_recent_first() {
    let store = InMemoryApplicationStore::default();
    assert!(store.list().await.expect("list succeeds").is_empty());

    for _ in 0..3 {
        store
            .insert(validate(submission()).expect("valid"))
            .await
            .expect("insert succeeds");
    }

    let records = store.list().await.expect("list succeeds");
    let ids: Vec<i32> = records.iter().map(|record| record.id.0).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn fetch_returns_none_for_unknown_id() {
    let store = InMemoryApplicationStore::default();
    store
        .insert(validate(submission()).expect("valid"))
        .await
        .expect("insert succeeds");

    assert!(store
        .fetch(ApplicationId(1))
        .await
        .expect("fetch succeeds")
        .is_some());
    assert!(store
        .fetch(ApplicationId(42))
        .await
        .expect("fetch succeeds")
        .is_none());
}

#[tokio::test]
async fn clones_share_the_same_records() {
    let store = InMemoryApplicationStore::default();
    let handle = store.clone();
    handle
        .insert(validate(submission()).expect("valid"))
        .await
        .expect("insert succeeds");

    assert!(!store.is_empty());
    assert_eq!(store.len(), 1);
}
