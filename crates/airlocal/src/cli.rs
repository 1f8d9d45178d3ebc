//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// airlocal - local Docker environments for WordPress development
#[derive(Parser, Debug)]
#[command(name = "airlocal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new environment
    Create(CreateArgs),

    /// Start an environment, or all of them
    Start(TargetArgs),

    /// Stop an environment, or all of them
    Stop(TargetArgs),

    /// Restart an environment, or all of them
    Restart(TargetArgs),

    /// Delete an environment, or all of them
    Delete(DeleteArgs),

    /// List environments
    List,

    /// Configure airlocal, or read and write single settings
    Configure(ConfigureArgs),

    /// Edit the system hosts file (needs root)
    #[command(subcommand)]
    Hosts(HostsCommands),

    /// Manage the shared cache volume
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Read answers from a JSON file instead of prompting
    #[arg(long, value_name = "FILE")]
    pub answers: Option<Utf8PathBuf>,
}

/// Which environment a lifecycle command acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    All,
    Named(String),
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Environment hostname or slug, or "all". Defaults to the environment
    /// containing the current directory
    pub environment: Option<String>,
}

impl TargetArgs {
    pub fn target(&self) -> Option<Target> {
        self.environment.as_deref().map(parse_target)
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_target(value: &str) -> Target {
    if value.eq_ignore_ascii_case("all") {
        Target::All
    } else {
        Target::Named(value.to_string())
    }
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    #[command(subcommand)]
    pub command: Option<ConfigureCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigureCommands {
    /// Show every setting
    Show,

    /// Print one setting
    Get {
        key: String,
    },

    /// Change one setting
    Set {
        key: String,
        /// JSON value; anything that does not parse is stored as a string
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HostsCommands {
    /// Map hostnames to 127.0.0.1
    Add {
        #[arg(required = true)]
        hosts: Vec<String>,
    },

    /// Remove 127.0.0.1 mappings for hostnames
    Remove {
        #[arg(required = true)]
        hosts: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove and recreate the shared cache volume
    Clear,
}
