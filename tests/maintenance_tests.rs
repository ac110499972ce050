//! Tests for the bulk maintenance operations

mod common;

use common::{page, MockGmailClient};
use gmail_sweep::client::LabelInfo;
use gmail_sweep::error::SweepError;
use gmail_sweep::maintenance::{archive_all_mail, get_or_create_label, mark_all_read};
use mockall::predicate::eq;
use mockall::Sequence;

#[tokio::test]
async fn mark_all_read_modifies_each_page() {
    let mut mock = MockGmailClient::new();
    let mut seq = Sequence::new();
    mock.expect_list_page()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|query: &str, token: &Option<&str>| query == "is:unread" && token.is_none())
        .returning(|_, _| Ok(page(&["a", "b"], Some("token-1"))));
    mock.expect_list_page()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|query: &str, token: &Option<&str>| query == "is:unread" && *token == Some("token-1"))
        .returning(|_, _| Ok(page(&["c"], None)));

    mock.expect_batch_modify()
        .times(1)
        .withf(|ids: &[String], add: &[String], remove: &[String]| {
            ids == ["a".to_string(), "b".to_string()]
                && add.is_empty()
                && remove == ["UNREAD".to_string()]
        })
        .returning(|ids, _, _| Ok(ids.len()));
    mock.expect_batch_modify()
        .times(1)
        .withf(|ids: &[String], _: &[String], remove: &[String]| {
            ids == ["c".to_string()] && remove == ["UNREAD".to_string()]
        })
        .returning(|ids, _, _| Ok(ids.len()));

    let total = mark_all_read(&mock).await.unwrap();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn mark_all_read_with_nothing_unread() {
    let mut mock = MockGmailClient::new();
    mock.expect_list_page()
        .times(1)
        .returning(|_, _| Ok(page(&[], None)));
    mock.expect_batch_modify().times(0);

    let total = mark_all_read(&mock).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn mark_all_read_propagates_listing_failure() {
    let mut mock = MockGmailClient::new();
    mock.expect_list_page()
        .times(1)
        .returning(|_, _| Err(SweepError::NetworkError("timeout".to_string())));

    let err = mark_all_read(&mock).await.unwrap_err();
    assert!(matches!(err, SweepError::NetworkError(_)));
}

#[tokio::test]
async fn archive_creates_a_timestamped_label_and_empties_the_inbox() {
    let mut mock = MockGmailClient::new();
    mock.expect_list_labels().times(1).returning(|| {
        Ok(vec![LabelInfo {
            id: "L1".to_string(),
            name: "Receipts".to_string(),
        }])
    });
    mock.expect_create_label()
        .times(1)
        .withf(|name: &str| name.starts_with("archive_"))
        .returning(|_| Ok("L9".to_string()));
    mock.expect_list_page()
        .times(1)
        .withf(|query: &str, token: &Option<&str>| query == "in:inbox" && token.is_none())
        .returning(|_, _| Ok(page(&["x", "y"], None)));
    mock.expect_batch_modify()
        .times(1)
        .withf(|ids: &[String], add: &[String], remove: &[String]| {
            ids.len() == 2 && add == ["L9".to_string()] && remove == ["INBOX".to_string()]
        })
        .returning(|ids, _, _| Ok(ids.len()));

    let outcome = archive_all_mail(&mock).await.unwrap();
    assert_eq!(outcome.archived, 2);
    assert!(outcome.label_name.starts_with("archive_"));
}

#[tokio::test]
async fn get_or_create_label_reuses_an_existing_label() {
    let mut mock = MockGmailClient::new();
    mock.expect_list_labels().times(1).returning(|| {
        Ok(vec![
            LabelInfo {
                id: "L1".to_string(),
                name: "Receipts".to_string(),
            },
            LabelInfo {
                id: "L2".to_string(),
                name: "archive_20240101_000000".to_string(),
            },
        ])
    });
    mock.expect_create_label().times(0);

    let id = get_or_create_label(&mock, "archive_20240101_000000")
        .await
        .unwrap();
    assert_eq!(id, "L2");
}

#[tokio::test]
async fn get_or_create_label_creates_when_missing() {
    let mut mock = MockGmailClient::new();
    mock.expect_list_labels()
        .times(1)
        .returning(|| Ok(vec![]));
    mock.expect_create_label()
        .with(eq("archive_20240101_000000"))
        .times(1)
        .returning(|_| Ok("L7".to_string()));

    let id = get_or_create_label(&mock, "archive_20240101_000000")
        .await
        .unwrap();
    assert_eq!(id, "L7");
}
