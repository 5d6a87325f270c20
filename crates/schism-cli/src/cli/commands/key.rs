//! `schism key` - Print the lookup key for an identity.

use anyhow::Result;
use clap::Args;
use schism_protocol::{CertType, LookupKey};

use crate::exit_codes::{SUCCESS, USER_ERROR};

#[derive(Debug, Args, Clone)]
pub struct KeyArgs {
    /// Certificate type: host or user (h, u also accepted)
    #[arg(long = "type", short = 't')]
    pub cert_type: String,

    /// Certificate identity
    #[arg(long, short = 'i')]
    pub identity: String,

    /// Principal included in the certificate (repeatable, order does not matter)
    #[arg(long = "principal", short = 'p')]
    pub principals: Vec<String>,
}

pub fn cmd_key(args: KeyArgs) -> Result<i32> {
    let cert_type = CertType::expand(&args.cert_type);
    if !cert_type.is_known() {
        eprintln!(
            "❌ Unknown certificate type '{}' (expected host, user or cakp)",
            args.cert_type
        );
        return Ok(USER_ERROR);
    }
    if args.identity.is_empty() {
        eprintln!("❌ Identity must not be empty");
        return Ok(USER_ERROR);
    }

    println!(
        "{}",
        LookupKey::derive(&args.identity, &args.principals, cert_type)
    );
    Ok(SUCCESS)
}
