use envelope_domain::{
    roster::reference_roster, BucketSet, Ledger, Money, Snapshot, Transaction, TransactionKind,
};

use crate::{
    allocation_service::AllocationService,
    month_service::MonthService,
    policy::{AllocationPolicy, DrainedTarget},
    CoreError,
};

fn units(value: i64) -> Money {
    Money::from_units(value)
}

fn with(buckets: &mut BucketSet, id: &str, current: Money) {
    buckets.get_mut(id).expect("bucket exists").current = current;
}

fn current(buckets: &BucketSet, id: &str) -> Money {
    buckets.get(id).expect("bucket exists").current
}

fn daily_full() -> BucketSet {
    let mut buckets = reference_roster();
    with(&mut buckets, "daily", units(600));
    buckets
}

#[test]
fn income_conserves_money() {
    let policy = AllocationPolicy::reference();
    let mut buckets = reference_roster();
    with(&mut buckets, "rent", units(2000));
    with(&mut buckets, "meal", units(3400));

    for cents in [1, 99, 12_345, 250_000, 1_234_567] {
        let amount = Money::from_cents(cents);
        let before = buckets.total();
        let allocation =
            AllocationService::apply_income(&buckets, amount, None, &policy).expect("income");
        assert_eq!(allocation.buckets.total(), before + amount, "amount {amount}");
        let moved: Money = allocation.movements.iter().map(|m| m.delta).sum();
        assert_eq!(moved, amount);
        buckets = allocation.buckets;
    }
}

#[test]
fn income_respects_caps_except_sink() {
    let policy = AllocationPolicy::reference();
    let allocation =
        AllocationService::apply_income(&reference_roster(), units(20_000), None, &policy)
            .expect("income");
    for bucket in allocation.buckets.iter() {
        if let Some(target) = bucket.target {
            assert!(bucket.current <= target, "{} over target", bucket.id);
        }
    }
    // 8% survival cut capped at 600, bills full, split capped, maid full.
    assert_eq!(current(&allocation.buckets, "daily"), units(600));
    assert_eq!(current(&allocation.buckets, "rent"), units(2150));
    assert_eq!(current(&allocation.buckets, "vape"), units(2500));
    assert_eq!(current(&allocation.buckets, "meal"), units(3500));
    assert_eq!(current(&allocation.buckets, "maid"), units(600));
    let expected_savings = units(20_000) - units(600 + 2150 + 115 + 200 + 2500 + 3500 + 600);
    assert_eq!(current(&allocation.buckets, "savings"), expected_savings);
}

#[test]
fn bills_fill_in_priority_order() {
    let policy = AllocationPolicy::reference();
    let buckets = daily_full();
    let allocation =
        AllocationService::apply_income(&buckets, units(500), None, &policy).expect("income");

    assert_eq!(current(&allocation.buckets, "rent"), units(500));
    for id in ["wifi", "elec", "vape", "meal", "maid", "savings"] {
        assert_eq!(current(&allocation.buckets, id), Money::ZERO, "{id} touched");
    }
    assert_eq!(allocation.movements.len(), 1);
}

#[test]
fn paid_bills_are_skipped() {
    let policy = AllocationPolicy::reference();
    let mut buckets = daily_full();
    buckets.get_mut("rent").expect("rent").is_paid = true;

    let allocation =
        AllocationService::apply_income(&buckets, units(300), None, &policy).expect("income");
    assert_eq!(current(&allocation.buckets, "rent"), Money::ZERO);
    assert_eq!(current(&allocation.buckets, "wifi"), units(115));
    assert_eq!(current(&allocation.buckets, "elec"), units(185));
}

#[test]
fn survival_cut_takes_eight_percent_first() {
    let policy = AllocationPolicy::reference();
    let allocation =
        AllocationService::apply_income(&reference_roster(), units(1000), None, &policy)
            .expect("income");
    assert_eq!(current(&allocation.buckets, "daily"), units(80));
    assert_eq!(current(&allocation.buckets, "rent"), units(920));
}

#[test]
fn survival_cut_is_capped_by_daily_headroom() {
    let policy = AllocationPolicy::reference();
    let mut buckets = reference_roster();
    with(&mut buckets, "daily", units(590));
    let allocation =
        AllocationService::apply_income(&buckets, units(1000), None, &policy).expect("income");
    assert_eq!(current(&allocation.buckets, "daily"), units(600));
    assert_eq!(current(&allocation.buckets, "rent"), units(990));
}

#[test]
fn shrunken_daily_cap_limits_the_survival_cut() {
    let policy = AllocationPolicy::reference();
    let mut buckets = reference_roster();
    buckets.get_mut("daily").expect("daily").target = Some(Money::ZERO);
    let allocation =
        AllocationService::apply_income(&buckets, units(100), None, &policy).expect("income");
    assert_eq!(current(&allocation.buckets, "daily"), Money::ZERO);
    assert_eq!(current(&allocation.buckets, "rent"), units(100));
}

#[test]
fn split_overflow_cascades_to_maid_then_savings() {
    let policy = AllocationPolicy::reference();
    let mut buckets = daily_full();
    with(&mut buckets, "rent", units(2150));
    with(&mut buckets, "wifi", units(115));
    with(&mut buckets, "elec", units(200));
    with(&mut buckets, "vape", units(2450));
    with(&mut buckets, "meal", units(3500));

    let allocation =
        AllocationService::apply_income(&buckets, units(1000), None, &policy).expect("income");
    // vape share 400 absorbs 50, meal share 600 absorbs nothing: 950 overflow.
    assert_eq!(current(&allocation.buckets, "vape"), units(2500));
    assert_eq!(current(&allocation.buckets, "meal"), units(3500));
    assert_eq!(current(&allocation.buckets, "maid"), units(600));
    assert_eq!(current(&allocation.buckets, "savings"), units(350));
}

#[test]
fn split_without_overflow_leaves_maid_alone() {
    let policy = AllocationPolicy::reference();
    let mut buckets = daily_full();
    with(&mut buckets, "rent", units(2150));
    with(&mut buckets, "wifi", units(115));
    with(&mut buckets, "elec", units(200));

    let allocation =
        AllocationService::apply_income(&buckets, units(1000), None, &policy).expect("income");
    assert_eq!(current(&allocation.buckets, "vape"), units(400));
    assert_eq!(current(&allocation.buckets, "meal"), units(600));
    assert_eq!(current(&allocation.buckets, "maid"), Money::ZERO);
    assert_eq!(current(&allocation.buckets, "savings"), Money::ZERO);
}

#[test]
fn everything_full_flows_to_savings() {
    let policy = AllocationPolicy::reference();
    let mut buckets = reference_roster();
    let ids: Vec<String> = buckets.ids().map(|id| id.to_string()).collect();
    for id in ids {
        let bucket = buckets.get_mut(&id).expect("bucket");
        if let Some(target) = bucket.target {
            bucket.current = target;
        }
    }
    let allocation =
        AllocationService::apply_income(&buckets, units(777), None, &policy).expect("income");
    assert_eq!(current(&allocation.buckets, "savings"), units(777));
    assert_eq!(allocation.delta_for("savings"), units(777));
}

#[test]
fn income_records_transaction_without_touching_input() {
    let policy = AllocationPolicy::reference();
    let buckets = reference_roster();
    let allocation =
        AllocationService::apply_income(&buckets, units(50), None, &policy).expect("income");
    assert_eq!(allocation.transaction.kind, TransactionKind::Income);
    assert_eq!(allocation.transaction.amount, units(50));
    assert_eq!(allocation.transaction.note, "Received Funds");
    assert_eq!(buckets, reference_roster(), "input must be left untouched");
}

#[test]
fn invalid_amounts_are_rejected_by_both_operations() {
    let policy = AllocationPolicy::reference();
    let buckets = reference_roster();
    for amount in [Money::ZERO, Money::from_cents(-100)] {
        assert!(matches!(
            AllocationService::apply_income(&buckets, amount, None, &policy),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            AllocationService::apply_spend(&buckets, amount, None, &policy),
            Err(CoreError::InvalidAmount(_))
        ));
    }
}

#[test]
fn oversized_income_is_rejected_instead_of_overflowing() {
    let policy = AllocationPolicy::reference();
    let huge = Money::parse("90000000000000000").expect("fits in cents");
    let first = AllocationService::apply_income(&reference_roster(), huge, None, &policy)
        .expect("first income fits");
    assert_eq!(first.buckets.total(), huge);

    let err = AllocationService::apply_income(&first.buckets, huge, None, &policy).unwrap_err();
    assert!(
        matches!(&err, CoreError::InvalidAmount(message) if message.contains("too large")),
        "{err:?}"
    );

    // The balances stay spendable and the total stays exact.
    let spend = AllocationService::apply_spend(&first.buckets, units(50), None, &policy)
        .expect("spend from a huge wallet");
    assert_eq!(spend.buckets.total(), huge - units(50));
}

#[test]
fn wallet_total_saturates_for_foreign_documents() {
    let mut buckets = reference_roster();
    with(&mut buckets, "savings", Money::from_cents(i64::MAX));
    with(&mut buckets, "rent", units(1));
    assert_eq!(buckets.total(), Money::from_cents(i64::MAX));
    assert!(buckets.checked_total().is_none());
    assert!(matches!(
        AllocationService::apply_income(&buckets, units(1), None, &AllocationPolicy::reference()),
        Err(CoreError::InvalidAmount(_))
    ));
}

#[test]
fn drained_daily_target_is_a_cap_unless_configured_as_unset() {
    let mut buckets = reference_roster();
    buckets.get_mut("daily").expect("daily").target = Some(Money::ZERO);

    let capped = AllocationPolicy::reference();
    let allocation =
        AllocationService::apply_income(&buckets, units(1000), None, &capped).expect("income");
    assert_eq!(current(&allocation.buckets, "daily"), Money::ZERO);

    let refill = AllocationPolicy::reference().with_drained_target(DrainedTarget::Unset);
    let allocation =
        AllocationService::apply_income(&buckets, units(1000), None, &refill).expect("income");
    assert_eq!(current(&allocation.buckets, "daily"), units(80));
    assert_eq!(allocation.buckets.get("daily").unwrap().target, Some(Money::ZERO));

    // The spend shrink restarts from the default as well.
    let spend = AllocationService::apply_spend(&allocation.buckets, units(30), None, &refill)
        .expect("spend");
    assert_eq!(spend.buckets.get("daily").unwrap().target, Some(units(570)));
}

#[test]
fn missing_roster_bucket_is_reported() {
    let policy = AllocationPolicy::reference();
    let buckets = BucketSet::new(Vec::new());
    assert_eq!(
        AllocationService::apply_income(&buckets, units(10), None, &policy).unwrap_err(),
        CoreError::BucketNotFound("daily".into())
    );
}

fn spend_fixture(daily: Money, savings: Money) -> BucketSet {
    let mut buckets = reference_roster();
    with(&mut buckets, "daily", daily);
    with(&mut buckets, "savings", savings);
    buckets
}

#[test]
fn small_spend_falls_back_to_savings() {
    let policy = AllocationPolicy::reference();
    let buckets = spend_fixture(units(50), units(1000));
    let allocation = AllocationService::apply_spend(&buckets, units(80), Some("Groceries"), &policy)
        .expect("spend");

    let daily = allocation.buckets.get("daily").expect("daily");
    assert_eq!(daily.current, Money::ZERO);
    assert_eq!(daily.target, Some(units(550)));
    assert_eq!(current(&allocation.buckets, "savings"), units(970));
    assert_eq!(allocation.transaction.note, "Groceries");
    assert_eq!(allocation.transaction.kind, TransactionKind::Spend);
}

#[test]
fn small_spend_covered_by_daily_shrinks_cap() {
    let policy = AllocationPolicy::reference();
    let buckets = spend_fixture(units(300), units(1000));
    let allocation =
        AllocationService::apply_spend(&buckets, units(60), None, &policy).expect("spend");

    let daily = allocation.buckets.get("daily").expect("daily");
    assert_eq!(daily.current, units(240));
    assert_eq!(daily.target, Some(units(540)));
    assert_eq!(current(&allocation.buckets, "savings"), units(1000));
    assert_eq!(allocation.transaction.note, "Purchased Item");
}

#[test]
fn large_spend_takes_at_most_threshold_from_daily() {
    let policy = AllocationPolicy::reference();

    let buckets = spend_fixture(units(80), units(1000));
    let allocation =
        AllocationService::apply_spend(&buckets, units(150), None, &policy).expect("spend");
    assert_eq!(allocation.delta_for("daily"), units(-80));
    assert_eq!(allocation.delta_for("savings"), units(-70));

    let rich = spend_fixture(units(500), units(1000));
    let allocation =
        AllocationService::apply_spend(&rich, units(250), None, &policy).expect("spend");
    assert_eq!(current(&allocation.buckets, "daily"), units(400));
    assert_eq!(current(&allocation.buckets, "savings"), units(850));
}

#[test]
fn large_spend_beyond_savings_draws_shortfall_from_daily() {
    let policy = AllocationPolicy::reference();
    let buckets = spend_fixture(units(500), units(100));
    let allocation =
        AllocationService::apply_spend(&buckets, units(300), None, &policy).expect("spend");
    assert_eq!(current(&allocation.buckets, "daily"), units(300));
    assert_eq!(current(&allocation.buckets, "savings"), Money::ZERO);
    assert_eq!(
        allocation.buckets.get("daily").and_then(|b| b.target),
        Some(units(400))
    );
}

#[test]
fn spend_only_touches_the_two_sources() {
    let policy = AllocationPolicy::reference();
    let mut buckets = spend_fixture(units(20), units(300));
    with(&mut buckets, "rent", units(900));
    let before = current(&buckets, "daily") + current(&buckets, "savings");
    let allocation =
        AllocationService::apply_spend(&buckets, units(45), None, &policy).expect("spend");
    let after = current(&allocation.buckets, "daily") + current(&allocation.buckets, "savings");
    assert_eq!(before - after, units(45));
    assert_eq!(current(&allocation.buckets, "rent"), units(900));
}

#[test]
fn insufficient_funds_fail_atomically() {
    let policy = AllocationPolicy::reference();
    let buckets = spend_fixture(units(10), units(5));
    let err = AllocationService::apply_spend(&buckets, units(20), None, &policy).unwrap_err();
    assert_eq!(
        err,
        CoreError::InsufficientFunds {
            requested: units(20),
            available: units(15),
        }
    );
    assert_eq!(current(&buckets, "daily"), units(10));
    assert_eq!(current(&buckets, "savings"), units(5));
}

#[test]
fn reset_preserves_savings_and_restores_daily_cap() {
    let policy = AllocationPolicy::reference();
    let mut buckets = spend_fixture(units(120), units(4321));
    with(&mut buckets, "rent", units(2150));
    buckets.get_mut("rent").expect("rent").is_paid = true;
    buckets.get_mut("savings").expect("savings").is_paid = true;
    buckets.get_mut("daily").expect("daily").target = Some(units(75));

    let mut ledger = Ledger::new();
    ledger.record(Transaction::new(TransactionKind::Income, units(10), None));
    let snapshot = Snapshot::new(buckets, ledger);

    let next = MonthService::reset_month(&snapshot, &policy);
    assert!(next.transactions.is_empty());
    let savings = next.buckets.get("savings").expect("savings");
    assert_eq!(savings.current, units(4321));
    assert!(!savings.is_paid);
    for bucket in next.buckets.iter().filter(|b| b.id != "savings") {
        assert_eq!(bucket.current, Money::ZERO, "{} not emptied", bucket.id);
        assert!(!bucket.is_paid);
    }
    assert_eq!(next.buckets.get("daily").and_then(|b| b.target), Some(units(600)));
    assert_eq!(next.buckets.get("rent").and_then(|b| b.target), Some(units(2150)));
}

#[test]
fn double_toggle_restores_bucket() {
    let buckets = reference_roster();
    let once = MonthService::toggle_paid(&buckets, "wifi").expect("toggle");
    assert!(once.get("wifi").expect("wifi").is_paid);
    assert_eq!(once.iter().filter(|b| b.is_paid).count(), 1);
    let twice = MonthService::toggle_paid(&once, "wifi").expect("toggle");
    assert_eq!(twice, buckets);
}
