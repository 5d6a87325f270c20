//! `schism ca` - List CA public keys.

use anyhow::Result;
use clap::Args;
use schism_protocol::layout::OBJECT_EXTENSION;
use schism_protocol::{list_ca_pubkeys, load_object, CaPublicKey, CertType};

use super::{connect, report};
use crate::cli::args::StoreArgs;
use crate::exit_codes::{SUCCESS, USER_ERROR};

#[derive(Debug, Args, Clone)]
pub struct CaArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only show this CA type: host or user (h, u also accepted)
    #[arg(long = "type", short = 't')]
    pub cert_type: Option<String>,

    /// Print each CA's public key in authorized_keys format instead of its object key
    #[arg(long)]
    pub authorized_keys: bool,
}

pub async fn cmd_ca(args: CaArgs) -> Result<i32> {
    let wanted = match args.cert_type.as_deref().map(CertType::expand) {
        Some(CertType::Unknown) => {
            eprintln!(
                "❌ Unknown certificate type '{}'",
                args.cert_type.as_deref().unwrap_or_default()
            );
            return Ok(USER_ERROR);
        }
        other => other,
    };

    let conn = connect(&args.store).await?;

    let keys = match list_ca_pubkeys(&conn.store, conn.bucket(), &conn.prefix()).await {
        Ok(keys) => keys,
        Err(e) => return Ok(report(&e)),
    };

    let keys: Vec<String> = keys
        .into_iter()
        .filter(|key| match wanted {
            Some(t) => is_ca_of_type(key, t),
            None => true,
        })
        .collect();

    if keys.is_empty() {
        eprintln!("⚠️  No CA public keys found");
        return Ok(SUCCESS);
    }

    for key in &keys {
        if args.authorized_keys {
            let ca: CaPublicKey = match load_object(&conn.store, conn.bucket(), key).await {
                Ok(ca) => ca,
                Err(e) => return Ok(report(&e)),
            };
            println!("{}", String::from_utf8_lossy(&ca.authorized_key).trim_end());
        } else {
            println!("{}", key);
        }
    }

    Ok(SUCCESS)
}

/// `CA-Pubkeys/host-example.com.json` is a host CA; `CA-Pubkeys/hostile.json` is not.
fn is_ca_of_type(key: &str, cert_type: CertType) -> bool {
    let name = key.rsplit('/').next().unwrap_or(key);
    let name = name.strip_suffix(OBJECT_EXTENSION).unwrap_or(name);
    let t = cert_type.as_str();
    name == t || name.starts_with(&format!("{}-", t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ca_of_type() {
        assert!(is_ca_of_type("p/CA-Pubkeys/host.json", CertType::Host));
        assert!(is_ca_of_type(
            "p/CA-Pubkeys/host-example.com-abc.json",
            CertType::Host
        ));
        assert!(!is_ca_of_type("p/CA-Pubkeys/user.json", CertType::Host));
        assert!(!is_ca_of_type("p/CA-Pubkeys/hostile.json", CertType::Host));
    }
}
