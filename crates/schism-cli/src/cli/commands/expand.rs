//! `schism expand` - Resolve a partial lookup key.

use anyhow::Result;
use clap::Args;
use schism_protocol::LookupKey;

use super::{connect, report};
use crate::cli::args::StoreArgs;
use crate::exit_codes::SUCCESS;

#[derive(Debug, Args, Clone)]
pub struct ExpandArgs {
    /// Lookup key, full or partial (e.g., h:55e8)
    #[arg(value_name = "KEY")]
    pub key: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn cmd_expand(args: ExpandArgs) -> Result<i32> {
    let key = match LookupKey::parse(&args.key) {
        Ok(key) => key,
        Err(e) => return Ok(report(&e)),
    };

    let conn = connect(&args.store).await?;

    match key.expand(&conn.store, conn.bucket(), &conn.prefix()).await {
        Ok(full) => {
            println!("{}", full);
            Ok(SUCCESS)
        }
        Err(e) => Ok(report(&e)),
    }
}
