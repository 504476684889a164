use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::gateway::SyncStatus;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sync",
            "Wait for pending saves and show the sync state",
            "sync",
            cmd_sync,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit", "q"]),
    ]
}

fn cmd_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.flush() {
        SyncStatus::Synced => io::print_success("Wallet synced with the remote store."),
        SyncStatus::Idle => io::print_info("Nothing to sync yet."),
        SyncStatus::LocalOnly(reason) => {
            io::print_warning(format!("Saved locally only: {reason}"));
            if !context.session.has_remote() {
                io::print_hint("Set `remote_endpoint` or ENVELOPE_REMOTE_URL to enable sync.");
            }
        }
        SyncStatus::Failed(reason) => io::print_error(format!("Save failed: {reason}")),
    }
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Envelope Budget {}", meta.version));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    io::print_info(format!(
        "  Remote       : {}",
        context.config.remote().unwrap_or("not configured")
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(entry) = context.registry.get(&command) {
            help::print_command(entry);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
