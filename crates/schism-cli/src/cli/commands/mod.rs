use anyhow::{Context, Result};
use schism_protocol::{ObjectStoreBlobStore, ProtocolError, StoreError, StoreSpec};

use super::args::{Cli, Command, StoreArgs};
use crate::exit_codes::{STORE_ERROR, SUCCESS, USER_ERROR};

pub mod ca;
pub mod cert;
pub mod expand;
pub mod key;

pub async fn dispatch(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Command::Key(args) => key::cmd_key(args),
        Command::Expand(args) => expand::cmd_expand(args).await,
        Command::Cert(args) => cert::cmd_cert(args).await,
        Command::Ca(args) => ca::cmd_ca(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Parsed store URL plus a connected store.
pub(crate) struct Connected {
    pub spec: StoreSpec,
    pub store: ObjectStoreBlobStore,
}

impl Connected {
    pub fn bucket(&self) -> &str {
        self.spec.bucket_name()
    }

    pub fn prefix(&self) -> String {
        self.spec.key_prefix()
    }
}

pub(crate) async fn connect(args: &StoreArgs) -> Result<Connected> {
    let spec = StoreSpec::parse(&args.store)
        .with_context(|| format!("invalid store URL: {}", args.store))?;

    let store = ObjectStoreBlobStore::from_spec(&spec)
        .await
        .with_context(|| "failed to connect to store")?;

    Ok(Connected { spec, store })
}

/// Print an actionable message for a protocol failure and pick the exit code.
pub(crate) fn report(err: &ProtocolError) -> i32 {
    match err {
        ProtocolError::NoMatch { key } => {
            eprintln!("❌ No certificate matches '{}'", key);
            eprintln!("   Check the type prefix (host/user) and the id.");
        }
        ProtocolError::AmbiguousKey { key, matches } => {
            eprintln!(
                "❌ '{}' matches {} certificates; use more characters of the id:",
                key,
                matches.len()
            );
            for m in matches {
                eprintln!("   {}", m);
            }
        }
        ProtocolError::MalformedKey { .. } => {
            eprintln!("❌ {}", err);
            eprintln!("   Expected <type>:<id>, e.g. host:55e8 or u:a5ba.");
        }
        other => eprintln!("❌ {}", other),
    }
    err.exit_code()
}

/// Exit code for an error that escaped a command.
///
/// A bad store URL or missing store configuration is the caller's to fix;
/// anything else is treated as a store failure.
pub fn fatal_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<StoreError>() {
        Some(store_err) if store_err.is_user_error() => USER_ERROR,
        _ => STORE_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_exit_codes() {
        let err = StoreSpec::parse("not a url")
            .with_context(|| "invalid store URL: not a url")
            .unwrap_err();
        assert_eq!(fatal_exit_code(&err), USER_ERROR);

        let err = anyhow::Error::new(StoreError::NotConfigured {
            message: "SCHISM_STORE_URL is not set".into(),
        });
        assert_eq!(fatal_exit_code(&err), USER_ERROR);

        let err = anyhow::Error::new(StoreError::Io {
            message: "connection reset".into(),
        })
        .context("failed to connect to store");
        assert_eq!(fatal_exit_code(&err), STORE_ERROR);
    }

    #[test]
    fn test_report_exit_codes() {
        assert_eq!(report(&ProtocolError::NoMatch { key: "h:1".into() }), 1);
        assert_eq!(
            report(&ProtocolError::AmbiguousKey {
                key: "u:4".into(),
                matches: vec!["a".into(), "b".into()],
            }),
            USER_ERROR
        );
        assert_eq!(report(&ProtocolError::NotFound { key: "k".into() }), 2);
    }
}
