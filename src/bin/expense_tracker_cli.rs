use expense_tracker::{cli, utils::build_info};

fn main() {
    expense_tracker::init();
    tracing::debug!(build = %build_info::current().summary(), "starting shell");

    if let Err(err) = cli::run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
