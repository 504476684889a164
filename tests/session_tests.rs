mod common;

use envelope_budget::{SessionError, SyncStatus};
use envelope_domain::{Money, TransactionKind};

use common::{open_session, test_home};

#[test]
fn reopening_restores_buckets_and_history() {
    let dir = test_home();
    {
        let mut session = open_session(&dir);
        session
            .record_income(Money::from_units(1_000), Some("Salary"))
            .unwrap();
        session.record_spend(Money::from_units(30), None).unwrap();
        session.toggle_paid("wifi").unwrap();
        assert!(matches!(session.flush(), SyncStatus::LocalOnly(_)));
    }

    let session = open_session(&dir);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transactions.len(), 2);
    let latest = snapshot.transactions.latest().unwrap();
    assert_eq!(latest.kind, TransactionKind::Spend);
    assert_eq!(latest.note, "Purchased Item");
    assert_eq!(snapshot.buckets.get("daily").unwrap().current, Money::from_units(50));
    assert_eq!(snapshot.buckets.get("rent").unwrap().current, Money::from_units(920));
    assert!(snapshot.buckets.get("wifi").unwrap().is_paid);
    assert_eq!(session.total_balance(), Money::from_units(970));
}

#[test]
fn dropping_the_session_flushes_pending_saves() {
    let dir = test_home();
    {
        let mut session = open_session(&dir);
        session.record_income(Money::from_units(200), None).unwrap();
    }
    assert!(dir.join("wallet.json").exists());
    assert_eq!(open_session(&dir).snapshot().transactions.len(), 1);
}

#[test]
fn reset_is_persisted_without_history() {
    let dir = test_home();
    {
        let mut session = open_session(&dir);
        session.record_income(Money::from_units(5_000), None).unwrap();
        assert_eq!(
            session.reset_month(false).unwrap_err(),
            SessionError::ConfirmationRequired
        );
        session.reset_month(true).unwrap();
    }

    let session = open_session(&dir);
    assert!(session.snapshot().transactions.is_empty());
    assert_eq!(
        session.snapshot().buckets.get("rent").unwrap().current,
        Money::ZERO
    );
}

#[test]
fn rejected_commands_are_not_persisted() {
    let dir = test_home();
    {
        let mut session = open_session(&dir);
        assert!(matches!(
            session.record_spend(Money::from_units(10), None),
            Err(SessionError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            session.toggle_paid("holiday"),
            Err(SessionError::UnknownBucket(_))
        ));
        assert_eq!(session.flush(), SyncStatus::Idle);
    }
    assert!(!dir.join("wallet.json").exists());
}
