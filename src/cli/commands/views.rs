//! Read-only views over the current wallet.

use chrono::Local;
use envelope_domain::{Bucket, TransactionKind};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const DEFAULT_HISTORY_LIMIT: usize = 10;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "buckets",
            "List buckets with balances and targets",
            "buckets",
            cmd_buckets,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "history",
            "Show the most recent transactions",
            "history [count]",
            cmd_history,
        ),
        CommandEntry::new(
            "status",
            "Show total balance, bills and the advisory line",
            "status",
            cmd_status,
        ),
    ]
}

fn cmd_buckets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Buckets");
    for bucket in context.session.snapshot().buckets.by_priority() {
        io::print_info(bucket_row(context, bucket));
    }
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => DEFAULT_HISTORY_LIMIT,
        [count] => count.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{count}` is not a transaction count"))
        })?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: history [count]".into(),
            ))
        }
    };

    let ledger = &context.session.snapshot().transactions;
    if ledger.is_empty() {
        io::print_info("No transactions recorded this month.");
        return Ok(());
    }

    output_section(format!("History ({} of {})", limit.min(ledger.len()), ledger.len()));
    for transaction in ledger.iter().take(limit) {
        let amount = match transaction.kind {
            TransactionKind::Income => context.delta(transaction.amount),
            TransactionKind::Spend => context.delta(-transaction.amount),
        };
        io::print_info(format!(
            "  {}  {:>14}  {}",
            transaction
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            amount,
            transaction.note
        ));
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    output_section("Status");
    io::print_info(format!(
        "  Total balance : {}",
        context.money(session.total_balance())
    ));
    io::print_info(format!("  Sync          : {}", session.sync_status()));

    output_section("Bills");
    for bill in session.bills() {
        let state = match (bill.is_paid, bill.is_funded) {
            (true, _) => "paid",
            (false, true) => "funded",
            (false, false) => "pending",
        };
        let target = bill
            .target
            .map(|target| context.money(target))
            .unwrap_or_else(|| "-".into());
        io::print_info(format!(
            "  {:<14} {:>12} / {:<12} {}",
            bill.name,
            context.money(bill.current),
            target,
            state
        ));
    }

    io::print_hint(session.advisory());
    Ok(())
}

fn bucket_row(context: &ShellContext, bucket: &Bucket) -> String {
    let target = bucket
        .target
        .map(|target| context.money(target))
        .unwrap_or_else(|| "no cap".into());
    let flag = if bucket.is_paid { " [paid]" } else { "" };
    format!(
        "  {:<8} {:<14} {:>12} / {:<12}{}",
        bucket.id.as_str(),
        bucket.name,
        context.money(bucket.current),
        target,
        flag
    )
}
