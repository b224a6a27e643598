use std::path::Path;

use anyhow::{Context, Result, bail};
use argp::FromArgs;
use repo_register_core::config::Config;
use repo_register_github::GitHub;
use serde_json::{Value, json};
use typed_path::Utf8NativePathBuf;

use crate::util::{native_path, read_json};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Run one job request against GitHub and print the response envelope.
#[argp(subcommand, name = "request")]
pub struct Args {
    #[argp(option, short = 'i', from_str_fn(native_path))]
    /// job request JSON file (- for stdin)
    input: Option<Utf8NativePathBuf>,
    #[argp(option)]
    /// job run id
    id: Option<String>,
    #[argp(option, short = 'u')]
    /// the GitHub user node id
    user: Option<String>,
    #[argp(option, short = 'a')]
    /// the Ethereum address (decimal or 0x-prefixed)
    address: Option<String>,
    #[argp(option, short = 'c', from_str_fn(native_path))]
    /// config file (default: config.yml)
    config: Option<Utf8NativePathBuf>,
}

pub fn run(args: Args) -> Result<()> {
    let input = job_input(&args)?;
    let config = Config::load(args.config.as_ref().map(|p| Path::new(p.as_str())))
        .context("Failed to load configuration")?;
    let github = GitHub::new(&config.github)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let reply = runtime.block_on(github.create_request(&input));
    tracing::info!("Job run {} finished with status {}", reply.envelope.job_run_id(), reply.status);
    println!("{}", serde_json::to_string_pretty(&reply.envelope)?);
    Ok(())
}

/// Builds the job request from `--input`, or from the individual flags.
fn job_input(args: &Args) -> Result<Value> {
    if let Some(path) = &args.input {
        if args.user.is_some() || args.address.is_some() {
            bail!("--input cannot be combined with --user or --address");
        }
        let mut input = read_json(path)?;
        if let (Some(id), Some(object)) = (&args.id, input.as_object_mut()) {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        return Ok(input);
    }
    let (Some(user), Some(address)) = (&args.user, &args.address) else {
        bail!("Either --input or both --user and --address are required");
    };
    let mut input = json!({ "data": { "githubUserId": user, "ethAddress": address } });
    if let Some(id) = &args.id {
        input["id"] = Value::String(id.clone());
    }
    Ok(input)
}
