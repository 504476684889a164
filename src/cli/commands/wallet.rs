//! Commands that change the wallet: income, spend, paid toggles, month reset.

use envelope_domain::Money;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::session::{parse_amount, Receipt};

const YES_FLAGS: [&str; 2] = ["--yes", "-y"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "income",
            "Allocate incoming money across the buckets",
            "income <amount> [note]",
            cmd_income,
        )
        .with_aliases(&["in"]),
        CommandEntry::new(
            "spend",
            "Record a purchase from daily cash, falling back to savings",
            "spend <amount> [note]",
            cmd_spend,
        )
        .with_aliases(&["out"]),
        CommandEntry::new(
            "paid",
            "Toggle the paid flag of a bill",
            "paid <bucket>",
            cmd_paid,
        ),
        CommandEntry::new(
            "reset",
            "Start a new month: empty buckets and clear history",
            "reset [--yes]",
            cmd_reset,
        ),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (amount, note) = amount_and_note(args, "income <amount> [note]")?;
    let receipt = context.session.record_income(amount, note.as_deref())?;
    io::print_success(format!("Allocated {}.", context.money(amount)));
    print_movements(context, &receipt);
    io::print_hint(context.session.advisory());
    Ok(())
}

fn cmd_spend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (amount, note) = amount_and_note(args, "spend <amount> [note]")?;
    let receipt = context.session.record_spend(amount, note.as_deref())?;
    io::print_success(format!("Spent {}.", context.money(amount)));
    print_movements(context, &receipt);
    io::print_hint(context.session.advisory());
    Ok(())
}

fn cmd_paid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [bucket] = args else {
        return Err(CommandError::InvalidArguments("usage: paid <bucket>".into()));
    };
    let id = bucket.to_ascii_lowercase();
    context.session.toggle_paid(&id)?;
    if let Some(bucket) = context.session.snapshot().buckets.get(&id) {
        let state = if bucket.is_paid { "paid" } else { "not paid" };
        io::print_success(format!("{} marked {}.", bucket.name, state));
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let forced = match args {
        [] => false,
        [flag] if YES_FLAGS.contains(flag) => true,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: reset [--yes]".into(),
            ))
        }
    };

    let interactive = context.mode == CliMode::Interactive;
    let confirmed = forced
        || (interactive
            && io::confirm_action(
                &context.theme,
                "Empty every bucket except savings and clear the history?",
                false,
            )?);
    if interactive && !confirmed {
        io::print_info("Reset cancelled.");
        return Ok(());
    }

    // Script mode without `--yes` surfaces ConfirmationRequired from the session.
    let receipt = context.session.reset_month(confirmed)?;
    io::print_success("New month started.");
    print_movements(context, &receipt);
    Ok(())
}

fn amount_and_note(args: &[&str], usage: &str) -> Result<(Money, Option<String>), CommandError> {
    let Some((raw, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let amount = parse_amount(raw)?;
    let note = (!rest.is_empty()).then(|| rest.join(" "));
    Ok((amount, note))
}

fn print_movements(context: &ShellContext, receipt: &Receipt) {
    let buckets = &context.session.snapshot().buckets;
    for movement in &receipt.movements {
        let name = buckets
            .get(movement.bucket.as_str())
            .map(|bucket| bucket.name.as_str())
            .unwrap_or(movement.bucket.as_str());
        io::print_info(format!("  {:<14} {}", name, context.delta(movement.delta)));
    }
}
