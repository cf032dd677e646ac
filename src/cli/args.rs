//! cli::args
//!
//! Command-line argument definitions using clap derive.

use clap::Parser;
use std::path::PathBuf;

/// Publish an IP core descriptor to a core registry
#[derive(Parser, Debug)]
#[command(name = "corepub")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Publish by bare name, confirming interactively
    corepub widget https://cores.example.com

    # Publish an exact version without a prompt
    corepub acme:libs:widget:1.0 https://cores.example.com --yes

    # Record the GitHub provider guessed from the checkout
    corepub widget https://cores.example.com --autoprovider")]
pub struct Cli {
    /// Add additional directories containing cores
    #[arg(long = "cores-root", value_name = "DIR")]
    pub cores_root: Vec<PathBuf>,

    /// Specify the config file to use
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the core to publish
    pub core: String,

    /// Core registry server base URI
    pub server: String,

    /// Skip confirmation
    #[arg(long)]
    pub yes: bool,

    /// Automatically add provider section if missing and possible to guess
    #[arg(long)]
    pub autoprovider: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
