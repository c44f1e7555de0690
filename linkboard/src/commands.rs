use crate::handlers::parse_endpoint;
use clap::{arg, command};
use linkboard_core::DEFAULT_ENDPOINT;
use linkboard_fetch::DEFAULT_USER_AGENT;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn endpoint_arg() -> clap::Arg {
    arg!(-e --"endpoint" <URL>)
        .required(false)
        .help("Link list endpoint (http:// is assumed when no scheme is given)")
        .value_parser(parse_endpoint)
        .default_value(DEFAULT_ENDPOINT)
}

fn timeout_arg() -> clap::Arg {
    arg!(--"timeout" <SECS>)
        .required(false)
        .help("Request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
        .default_value("10")
}

fn user_agent_arg() -> clap::Arg {
    arg!(--"user-agent" <UA>)
        .required(false)
        .help("User-Agent header sent with the request")
        .default_value(DEFAULT_USER_AGENT)
}

fn report_command(name: &'static str, about: &'static str) -> clap::Command {
    command!(name)
        .about(about)
        .arg(endpoint_arg())
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json, csv, html, markdown")
                .value_parser(["text", "json", "csv", "html", "markdown", "md"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(timeout_arg())
        .arg(user_agent_arg())
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkboard")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkboard")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log debug output to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(report_command(
            "grouped",
            "Fetch the link list and show it grouped by parent page (#broken-links-list)",
        ))
        .subcommand(report_command(
            "flat",
            "Fetch the link list and show it as a flat list (#links)",
        ))
        .subcommand(
            command!("ui")
                .about("Browse the link list in an interactive terminal viewer")
                .arg(endpoint_arg())
                .arg(
                    arg!(--"flat")
                        .required(false)
                        .help("Show a single flat list instead of grouping by parent")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(timeout_arg())
                .arg(user_agent_arg()),
        )
}
