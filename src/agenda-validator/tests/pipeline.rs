mod common;

use std::sync::Arc;

use agenda_validator::{steps::parse_steps, CrossCheckError, ValidationError, ValidationStep};
use alloy_primitives::Address;
use common::*;

#[tokio::test]
async fn valid_submission_passes_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let chain = Arc::new(matching_chain());

    let pipeline = pipeline(chain.clone(), MockRegistry::default());
    let report = pipeline
        .validate_file(&path, Some(&pr_title()), &ValidationStep::ALL)
        .await;

    assert!(report.is_valid(), "{:?}", report.failure);
    assert_eq!(pipeline.registry().probe_count(), 1);
    assert_eq!(report.passed, ValidationStep::ALL.to_vec());
    assert_eq!(chain.call_count(), 2);
}

#[tokio::test]
async fn pr_title_network_mismatch_fails_before_any_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let chain = Arc::new(matching_chain());
    let registry = MockRegistry::default();
    let title = format!("[Agenda] mainnet - {AGENDA_ID} - {TITLE}");

    let pipeline = pipeline(chain.clone(), registry);
    let report = pipeline
        .validate_file(&path, Some(&title), &ValidationStep::ALL)
        .await;

    let failure = report.failure.unwrap();
    assert_eq!(failure.step, Some(ValidationStep::PrTitle));
    assert!(matches!(failure.error, ValidationError::Consistency(_)));
    assert_eq!(report.passed, vec![ValidationStep::Schema, ValidationStep::Format]);
    assert_eq!(chain.call_count(), 0);
    assert_eq!(pipeline.registry().probe_count(), 0);
}

#[tokio::test]
async fn create_title_rejects_existing_remote_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut registry = MockRegistry::default();
    registry.existing.insert(repo_path(AGENDA_ID));

    let report = pipeline(Arc::new(matching_chain()), registry)
        .validate_file(&path, Some(&pr_title()), &[ValidationStep::PrTitle])
        .await;

    let failure = report.failure.unwrap();
    assert_eq!(failure.step, Some(ValidationStep::PrTitle));
    assert!(failure.error.to_string().contains("already exists"));
}

#[tokio::test]
async fn update_title_requires_updated_at() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let title = format!("[Agenda Update] sepolia - {AGENDA_ID} - {TITLE}");

    let report = pipeline(Arc::new(matching_chain()), MockRegistry::default())
        .validate_file(&path, Some(&title), &[ValidationStep::PrTitle])
        .await;

    assert!(report
        .failure
        .unwrap()
        .error
        .to_string()
        .contains("updatedAt"));
}

#[tokio::test]
async fn missing_pr_title_fails_only_when_selected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let pipeline = pipeline(Arc::new(matching_chain()), MockRegistry::default());

    let selected = pipeline
        .validate_file(&path, None, &[ValidationStep::PrTitle])
        .await;
    assert_eq!(selected.failure.unwrap().step, Some(ValidationStep::PrTitle));

    let steps = parse_steps(["schema", "format", "time", "signature"]).unwrap();
    let skipped = pipeline.validate_file(&path, None, &steps).await;
    assert!(skipped.is_valid(), "{:?}", skipped.failure);
}

#[tokio::test]
async fn misplaced_file_fails_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda-101.json");
    std::fs::write(&path, submission().to_string()).unwrap();

    let report = pipeline(Arc::new(matching_chain()), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Schema, ValidationStep::Format])
        .await;

    let failure = report.failure.unwrap();
    assert_eq!(failure.step, Some(ValidationStep::Format));
    assert_eq!(report.passed, vec![ValidationStep::Schema]);
}

#[tokio::test]
async fn id_in_file_name_must_match_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, 102, &submission());

    let report = pipeline(Arc::new(matching_chain()), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Format])
        .await;

    assert!(report.failure.unwrap().error.to_string().contains("ID mismatch"));
}

#[tokio::test]
async fn stale_signature_fails_time() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = submission();
    doc["createdAt"] = "2020-01-01T00:00:00.000Z".into();
    let path = write_submission(&dir, AGENDA_ID, &doc);

    let report = pipeline(Arc::new(matching_chain()), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Time])
        .await;

    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::Temporal(_)
    ));
}

#[tokio::test]
async fn tampered_title_keeps_signature_valid_but_wrong_id_breaks_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = submission();
    doc["title"] = "Something else".into();
    let path = write_submission(&dir, AGENDA_ID, &doc);
    let pipeline = pipeline(Arc::new(matching_chain()), MockRegistry::default());

    // The title is not part of the signed message.
    let report = pipeline
        .validate_file(&path, None, &[ValidationStep::Signature])
        .await;
    assert!(report.is_valid(), "{:?}", report.failure);

    doc["id"] = 102.into();
    let path = write_submission(&dir, 102, &doc);
    let report = pipeline
        .validate_file(&path, None, &[ValidationStep::Signature])
        .await;
    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::Cryptographic(_)
    ));
}

#[tokio::test]
async fn missing_transaction_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let chain = Arc::new(MockChain::default());

    let report = pipeline(chain.clone(), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::OnChain(CrossCheckError::TransactionNotFound(_))
    ));
    assert_eq!(chain.call_count(), 1);
}

#[tokio::test]
async fn missing_receipt_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut chain = matching_chain();
    chain.receipts.clear();

    let report = pipeline(Arc::new(chain), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::OnChain(CrossCheckError::ReceiptNotFound(_))
    ));
}

#[tokio::test]
async fn receipt_without_agenda_event_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut chain = matching_chain();
    chain.receipts.insert(TX_HASH, receipt(vec![]));

    let report = pipeline(Arc::new(chain), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::OnChain(CrossCheckError::EventNotFound)
    ));
}

#[tokio::test]
async fn wrong_sender_and_id_are_reported_as_mismatches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut chain = matching_chain();
    chain
        .transactions
        .insert(TX_HASH, transaction(Address::repeat_byte(0x11)));
    chain
        .receipts
        .insert(TX_HASH, receipt(vec![agenda_created_log(AGENDA_ID + 1)]));

    let report = pipeline(Arc::new(chain), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    let failure = report.failure.unwrap();
    let ValidationError::Mismatch(reason) = failure.error else {
        panic!("expected mismatch, got {:?}", failure.error);
    };
    assert!(reason.contains("sender"), "{reason}");
    assert!(reason.contains("102"), "{reason}");
}

#[tokio::test]
async fn reverted_receipt_is_reported_as_a_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut chain = matching_chain();
    let mut reverted = receipt(vec![agenda_created_log(AGENDA_ID)]);
    reverted.status = Some(0);
    chain.receipts.insert(TX_HASH, reverted);

    let report = pipeline(Arc::new(chain), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    let failure = report.failure.unwrap();
    let ValidationError::Mismatch(reason) = failure.error else {
        panic!("expected mismatch, got {:?}", failure.error);
    };
    assert!(reason.contains("reverted"), "{reason}");
    assert!(!reason.contains("sender"), "{reason}");
}

#[tokio::test]
async fn memo_must_match_snapshot_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_submission(&dir, AGENDA_ID, &submission());
    let mut chain = matching_chain();
    let mut tx = transaction(creator());
    tx.input = agenda_input("https://forum.tokamak.network/t/other");
    chain.transactions.insert(TX_HASH, tx);

    let report = pipeline(Arc::new(chain), MockRegistry::default())
        .validate_file(&path, None, &[ValidationStep::Transaction])
        .await;

    assert!(matches!(
        report.failure.unwrap().error,
        ValidationError::Mismatch(_)
    ));
}

#[tokio::test]
async fn batch_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_submission(&dir, AGENDA_ID, &submission());
    let missing = dir.path().join("data/agendas/sepolia/agenda-999.json");

    let reports = pipeline(Arc::new(matching_chain()), MockRegistry::default())
        .validate_files(
            &[good, missing],
            None,
            &[ValidationStep::Schema, ValidationStep::Signature],
        )
        .await;

    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_valid());
    assert_eq!(reports[1].failure.as_ref().unwrap().step, None);
}
