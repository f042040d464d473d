use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` is honoured; `--verbose` raises this crate to debug.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, rust_log.as_deref())?;

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

/// The crate defaults to warn only when `RUST_LOG` is unset or empty.
fn build_filter(verbose: bool, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    let filter = match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::new("ghg_processor=warn"),
    };

    if verbose {
        Ok(filter.add_directive("ghg_processor=debug".parse()?))
    } else {
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_is_kept() {
        let filter = build_filter(false, Some("ghg_processor=debug")).unwrap();
        assert_eq!(filter.to_string(), "ghg_processor=debug");
    }

    #[test]
    fn test_default_and_verbose() {
        assert_eq!(build_filter(false, None).unwrap().to_string(), "ghg_processor=warn");
        assert_eq!(build_filter(false, Some("  ")).unwrap().to_string(), "ghg_processor=warn");
        assert_eq!(
            build_filter(true, Some("ghg_processor=info")).unwrap().to_string(),
            "ghg_processor=debug"
        );
    }

    #[test]
    fn test_invalid_rust_log_is_an_error() {
        assert!(build_filter(false, Some("ghg_processor=loud")).is_err());
    }
}
