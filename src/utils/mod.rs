pub mod build_info;
pub mod paths;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "cashflow=info";

/// Logs go to stderr so script output on stdout stays clean; `RUST_LOG` adds directives.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
