//! Command line surface of the `ipnet` binary.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{parse_network, parse_network_with_mask, Network};
use crate::output::{render_commands, render_examples, render_info, render_split};
use crate::processing::{analyze_with, split_summary, SplitRequest};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ipnet")]
#[command(version, about = "IPv4 and IPv6 subnet calculator")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Display comprehensive network information
    #[command(visible_alias = "i")]
    Info {
        /// Network in CIDR notation, e.g. 192.168.1.0/24 or 2001:db8::/32
        prefix: String,
        /// Prefix length or netmask when the network has no /suffix
        network_mask: Option<String>,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split networks into smaller subnets
    #[command(visible_alias = "s")]
    Split {
        /// Network in CIDR notation
        prefix: String,
        /// Prefix length or netmask when the network has no /suffix
        network_mask: Option<String>,
        /// Number of subnets to create, rounded up to a power of two
        #[arg(short, long)]
        count: Option<u64>,
        /// Prefix length of the new subnets
        #[arg(short, long)]
        mask: Option<u32>,
        /// Print the split as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show usage examples
    Examples,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Read the network from either `addr/len` or `addr len`.
fn read_network(prefix: &str, network_mask: Option<&str>) -> Result<Network> {
    let network = match network_mask {
        Some(mask) => parse_network_with_mask(prefix, mask)?,
        None => parse_network(prefix)?,
    };
    Ok(network)
}

fn split_request(count: Option<u64>, mask: Option<u32>) -> Result<SplitRequest> {
    match (count, mask) {
        (Some(count), None) => Ok(SplitRequest::ByCount(count)),
        (None, Some(mask)) => Ok(SplitRequest::ByPrefixLength(mask)),
        (Some(_), Some(_)) => Err(Error::Usage(
            "Cannot use both --count and --mask options at the same time".to_string(),
        )),
        (None, None) => Err(Error::Usage(
            "Must specify either --count or --mask option".to_string(),
        )),
    }
}

/// Run a command and return the text to print.
pub fn execute(command: Option<Commands>, config: &Config) -> Result<String> {
    match command {
        None => Ok(render_commands()),
        Some(Commands::Examples) => Ok(render_examples("ipnet")),
        Some(Commands::Info {
            prefix,
            network_mask,
            json,
        }) => {
            let network = read_network(&prefix, network_mask.as_deref())?;
            let record = analyze_with(&network, &config.scope_table()?);
            if json {
                Ok(serde_json::to_string_pretty(&record)?)
            } else {
                Ok(render_info(&record))
            }
        }
        Some(Commands::Split {
            prefix,
            network_mask,
            count,
            mask,
            json,
        }) => {
            let request = split_request(count, mask)?;
            let network = read_network(&prefix, network_mask.as_deref())?;
            let summary = split_summary(&network, request, config.split_limit)?;
            log::info!(
                "Split {network} into {} x /{}",
                summary.total_subnets,
                summary.prefix_len
            );
            if json {
                Ok(serde_json::to_string_pretty(&summary)?)
            } else {
                Ok(render_split(&summary, config.max_displayed_subnets))
            }
        }
    }
}

/// Run the parsed command line and print its output.
pub fn run(cli: CommandLine, config: &Config) -> Result<()> {
    let text = execute(cli.command, config)?;
    println!("{}", text.trim_end());
    Ok(())
}
