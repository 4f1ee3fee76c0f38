//! Console helpers shared by the `places-collect` and `places-export` binaries.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Initialise `env_logger`. `RUST_LOG` wins over the verbose flag.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_target(false)
    .try_init();
}

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Format a (lat, lon) pair with hemisphere letters, e.g. `40.7128N / 74.0060W`
pub fn format_coords(coords: (f64, f64)) -> String {
    let (lat, lon) = coords;
    let lat_dir = if lat >= 0.0 { "N" } else { "S" };
    let lon_dir = if lon >= 0.0 { "E" } else { "W" };
    format!("{:.4}{} / {:.4}{}", lat.abs(), lat_dir, lon.abs(), lon_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords((40.7128, -74.0060)), "40.7128N / 74.0060W");
        assert_eq!(format_coords((-33.8688, 151.2093)), "33.8688S / 151.2093E");
    }
}
