use envelope_budget::{cli::run_cli, init};

fn main() {
    init();

    // The shell context (and its sync worker) is dropped inside `run_cli`,
    // so pending saves are written before the process exits.
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
