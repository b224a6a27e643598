use anyhow::Result;
use argp::FromArgs;
use repo_register_core::address::EthAddress;

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Print the canonical form of an Ethereum address and its fallback display name.
#[argp(subcommand, name = "normalize")]
pub struct Args {
    #[argp(positional)]
    /// address as a decimal or 0x-prefixed integer
    address: String,
}

pub fn run(args: Args) -> Result<()> {
    let address = EthAddress::parse(&args.address)?;
    println!("{}", describe(&address));
    Ok(())
}

fn describe(address: &EthAddress) -> String { format!("{}\t{}", address, address.short_name()) }
