use colored::Colorize;
use linkboard::command_argument_builder;
use linkboard::handlers::{handle_flat, handle_grouped, handle_ui};
use linkboard_core::print_banner;
use tracing::Level;

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        // No subcommand provided, just show the banner
        None => return,
        Some(("grouped", primary_command)) => {
            init_tracing(verbose);
            handle_grouped(primary_command).await
        }
        Some(("flat", primary_command)) => {
            init_tracing(verbose);
            handle_flat(primary_command).await
        }
        // No subscriber here, log lines would tear the alternate screen
        Some(("ui", primary_command)) => handle_ui(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
