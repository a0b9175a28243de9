use clap::Parser;
use mediasort::cli::{Args, run_cli_with_config};
use mediasort::logging::{init_tracing, level_from_flags};
use mediasort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(level_from_flags(args.verbose, args.quiet), args.log_json);

    let config_path = args.config.clone();
    let (command, directory) = args.command.into_parts();

    match run_cli_with_config(command, &directory, config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
