//! `respctx` inspects stored HTTP responses through the plugin response
//! context.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::debug;
use respctx::cli_args::{BodyArgs, CallArgs, GlobalArgs, HeaderArgs, ShowArgs};
use respctx::config::load_subcommand_config;

#[derive(Parser)]
#[command(
    name = "respctx",
    about = "Inspect stored HTTP responses through the plugin response context"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise status, timing and headers
    Show(ShowArgs),
    /// Print the value(s) of a header
    Header(HeaderArgs),
    /// Write the decoded body to stdout
    Body(BodyArgs),
    /// Invoke a response function and print its JSON reply
    Call(CallArgs),
}

fn init_logging(global: &GlobalArgs) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_filter()))
        .format_timestamp(None)
        .init();
}

fn report_config_error(err: &ortho_config::OrthoError) -> ExitCode {
    eprintln!("configuration error: {err}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.global);
    debug!("starting respctx");

    let result = match cli.command {
        Commands::Show(args) => match load_subcommand_config(args) {
            Ok(args) => commands::run_show(&args).map(|()| true),
            Err(e) => return report_config_error(&e),
        },
        Commands::Header(args) => match load_subcommand_config(args) {
            Ok(args) => commands::run_header(&args),
            Err(e) => return report_config_error(&e),
        },
        Commands::Body(args) => match load_subcommand_config(args) {
            Ok(args) => commands::run_body(&args).map(|()| true),
            Err(e) => return report_config_error(&e),
        },
        Commands::Call(args) => match load_subcommand_config(args) {
            Ok(args) => commands::run_call(&args).map(|()| true),
            Err(e) => return report_config_error(&e),
        },
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
