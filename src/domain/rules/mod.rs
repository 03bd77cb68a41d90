// Domain rules - Encoding parameter derivation and override checks

use crate::domain::model::*;

/// Ceiling applied on top of the target bitrate
pub const MAXRATE_FACTOR: f64 = 1.2;

/// Round to a fixed number of decimals, half away from zero
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Bitrate derivation rules
pub struct RateRules;

impl RateRules {
    /// Derive `(maxrate, bitrate)` from frame area and the bits-per-pixel ratio
    pub fn from_resolution(resolution: &Resolution, bitrate_ratio: f64) -> Rates {
        let space = resolution.area() as f64;
        let bitrate = round_to(space * (bitrate_ratio * 1e-6), 1);
        Rates {
            maxrate: round_to(bitrate * MAXRATE_FACTOR, 1),
            bitrate,
        }
    }

    /// Explicit bitrate: kept as given, maxrate scaled from it
    pub fn from_bitrate(bitrate: f64) -> Rates {
        Rates {
            maxrate: round_to(bitrate * MAXRATE_FACTOR, 1),
            bitrate,
        }
    }
}

/// Checks applied to one override record while validating configuration
pub struct OverrideRules;

impl OverrideRules {
    /// Parse an override resolution
    pub fn resolution(text: &str) -> Result<Resolution, String> {
        let trimmed = text.trim();
        if trimmed.starts_with('-') || trimmed.contains("x-") {
            return Err(format!("Negative resolution: '{}'", text));
        }
        Resolution::parse(trimmed).ok_or_else(|| format!("Wrong resolution: '{}'", text))
    }

    /// Explicit bitrate must be a positive number of megabits
    pub fn bitrate(value: f64) -> Result<f64, String> {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("Bitrate must be a positive number, got {}", value));
        }
        Ok(value)
    }

    /// Cut points must come as a pair with `start <= end`
    pub fn cut_points(start: Option<f64>, end: Option<f64>) -> Result<Option<TrimRange>, String> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(_), None) => Err("'cut_start' must be closed with 'cut_end' param".to_string()),
            (None, Some(_)) => Err("'cut_end' exists but 'cut_start' not found".to_string()),
            (Some(start), Some(end)) => {
                if start < 0.0 || end < 0.0 {
                    return Err("Cut points cannot be negative".to_string());
                }
                if start > end {
                    return Err("'cut_start' is greater than 'cut_end'".to_string());
                }
                TrimRange::new(start, end)
                    .map(Some)
                    .ok_or_else(|| format!("Invalid cut range {}..{}", start, end))
            }
        }
    }

    /// Both cut points must fall within the probed source duration
    pub fn trim_within(trim: &TrimRange, duration: f64) -> Result<(), String> {
        if trim.start > duration || trim.end > duration {
            return Err(format!(
                "Video duration ({} seconds) less than 'cut_start' ({}) or 'cut_end' ({})",
                duration, trim.start, trim.end
            ));
        }
        Ok(())
    }
}
