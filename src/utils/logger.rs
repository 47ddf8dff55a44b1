use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset. The HTTP stack stays at `warn`
/// so that verbose output shows the tado requests, not connection-pool chatter.
pub(crate) fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "tado_client=debug,reqwest=warn,hyper=warn,hyper_util=warn,info"
    } else {
        "tado_client=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Human-readable logs on stderr, so stdout carries only the JSON output.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// One JSON object per event on stderr, for piping into log collectors.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(EnvFilter::try_new(directives).is_ok(), "{}", directives);
        }
    }

    #[test]
    fn test_verbose_enables_client_debug_only() {
        assert!(default_directives(true).contains("tado_client=debug"));
        assert!(default_directives(true).contains("reqwest=warn"));
        assert!(default_directives(false).starts_with("tado_client=info"));
    }
}
