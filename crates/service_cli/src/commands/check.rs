//! Check command: print the effective configuration.

use tracing::info;

use crate::config::CliConfig;
use crate::Result;

fn or_default<T: std::fmt::Display>(value: Option<T>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_string())
}

/// Render the effective configuration as aligned `key: value` lines.
pub fn render(config: &CliConfig) -> String {
    let rows = [
        ("log_level", config.log_level.to_string()),
        ("grid_size", config.grid_size.to_string()),
        ("min_weight", config.min_weight.to_string()),
        ("padding", config.padding.to_string()),
        ("bandwidth", or_default(config.bandwidth, "silverman")),
        ("bootstrap_iterations", config.bootstrap_iterations.to_string()),
        ("seed", or_default(config.seed, "entropy")),
        ("progress_interval", config.progress_interval.to_string()),
        (
            "significance_threshold",
            config.significance_threshold.to_string(),
        ),
        ("parallel", config.parallel.to_string()),
    ];
    rows.iter()
        .map(|(key, value)| format!("{:<24}{}\n", format!("{}:", key), value))
        .collect()
}

/// Runs the check command.
pub fn run(config: &CliConfig) -> Result<()> {
    config.validate()?;
    info!("Configuration is valid");
    println!("localcorr {}", env!("CARGO_PKG_VERSION"));
    print!("{}", render(config));
    Ok(())
}
