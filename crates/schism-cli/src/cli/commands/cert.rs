//! `schism cert` - Fetch a signed certificate record.

use anyhow::{Context, Result};
use clap::Args;
use schism_protocol::{fetch_certificate, LookupKey};

use super::{connect, report};
use crate::cli::args::StoreArgs;
use crate::exit_codes::SUCCESS;

#[derive(Debug, Args, Clone)]
pub struct CertArgs {
    /// Lookup key, full or partial (e.g., u:a5ba)
    #[arg(value_name = "KEY")]
    pub key: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print only the signed certificate (for an -cert.pub file)
    #[arg(long)]
    pub raw: bool,
}

pub async fn cmd_cert(args: CertArgs) -> Result<i32> {
    let key = match LookupKey::parse(&args.key) {
        Ok(key) => key,
        Err(e) => return Ok(report(&e)),
    };

    let conn = connect(&args.store).await?;

    let (full, cert) =
        match fetch_certificate(&conn.store, conn.bucket(), &conn.prefix(), &key).await {
            Ok(found) => found,
            Err(e) => return Ok(report(&e)),
        };

    eprintln!("Found: {}", full);
    if let Some(expires) = cert.expires_on() {
        eprintln!("Valid until: {}", expires.to_rfc3339());
    }

    if args.raw {
        println!(
            "{}",
            String::from_utf8_lossy(&cert.raw_signed_certificate).trim_end()
        );
    } else {
        let json =
            serde_json::to_string_pretty(&cert).context("failed to render certificate record")?;
        println!("{}", json);
    }

    Ok(SUCCESS)
}
