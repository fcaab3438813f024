use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATES: [&str; 4] = ["finboard", "finboard_core", "finboard_ingest", "finboard_finance"];

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    std::iter::once("warn".to_string())
        .chain(CRATES.iter().map(|c| format!("{c}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Log to stderr so stdout stays clean for report output. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(false),
            "warn,finboard=info,finboard_core=info,finboard_ingest=info,finboard_finance=info"
        );
        assert!(default_directives(true).contains("finboard_finance=debug"));
    }
}
