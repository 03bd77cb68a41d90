//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

/// Utility functions for batchconv
pub struct Utils;

impl Utils {
    /// File size in mebibytes with two decimals, as written to the run log
    pub fn format_megabytes(size: u64) -> String {
        format!("{:.2}", size as f64 / (1u64 << 20) as f64)
    }

    /// Percentage of `current` over `total`, clamped to 0..=100
    pub fn percent_of(current: u64, total: u64) -> Option<u8> {
        if total == 0 {
            return None;
        }
        let percent = (current as f64 / total as f64 * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes() {
        assert_eq!(Utils::format_megabytes(0), "0.00");
        assert_eq!(Utils::format_megabytes(1 << 20), "1.00");
        assert_eq!(Utils::format_megabytes(1_572_864), "1.50");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(Utils::percent_of(512, 1024), Some(50));
        assert_eq!(Utils::percent_of(4096, 1024), Some(100));
        assert_eq!(Utils::percent_of(1, 0), None);
    }
}
