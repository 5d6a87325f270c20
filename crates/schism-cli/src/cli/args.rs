use clap::{Args, Parser, Subcommand};

use super::commands::ca::CaArgs;
use super::commands::cert::CertArgs;
use super::commands::expand::ExpandArgs;
use super::commands::key::KeyArgs;

#[derive(Parser)]
#[command(
    name = "schism",
    version,
    about = "Look up SSH certificates and CA public keys in the Schism store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the lookup key for an identity and its principals
    Key(KeyArgs),
    /// Resolve a partial lookup key to the full stored key
    Expand(ExpandArgs),
    /// Fetch a signed certificate record by (partial) lookup key
    Cert(CertArgs),
    /// List CA public keys
    Ca(CaArgs),
    Version,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Store URL (e.g., s3://bucket/prefix, file:///path)
    /// Can also be set via SCHISM_STORE_URL
    #[arg(long, env = "SCHISM_STORE_URL")]
    pub store: String,
}
