mod cmd;
mod util;

use argp::FromArgs;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(FromArgs, PartialEq, Debug)]
/// Resolve GitHub repository descriptions for Chainlink job requests.
struct TopLevel {
    #[argp(subcommand)]
    command: SubCommand,
    #[argp(switch, short = 'v')]
    /// log debug output
    verbose: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argp(subcommand)]
enum SubCommand {
    Request(cmd::request::Args),
    Normalize(cmd::normalize::Args),
}

fn main() {
    let args: TopLevel = argp::parse_args_or_exit(argp::DEFAULT);
    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    // Logs go to stderr so stdout stays a clean envelope.
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let result = match args.command {
        SubCommand::Request(args) => cmd::request::run(args),
        SubCommand::Normalize(args) => cmd::normalize::run(args),
    };
    if let Err(e) = result {
        eprintln!("Failed: {e:?}");
        std::process::exit(1);
    }
}
