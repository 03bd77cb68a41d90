//! Clock-time parsing and formatting utilities

/// Parser for the `H:MM:SS.ss` clock strings tools print in status output
pub struct TimeParser;

impl TimeParser {
    /// Parse `H:MM:SS`, `H:MM:SS.ss` or `MM:SS.ss` to seconds
    pub fn parse_clock(time_str: &str) -> Option<f64> {
        let parts: Vec<&str> = time_str.trim().split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m, s] => (Self::whole(h)?, Self::whole(m)?, Self::fraction(s)?),
            [m, s] => (0.0, Self::whole(m)?, Self::fraction(s)?),
            _ => return None,
        };
        if minutes >= 60.0 || seconds >= 60.0 {
            return None;
        }
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    }

    fn whole(part: &str) -> Option<f64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    }

    fn fraction(part: &str) -> Option<f64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return None;
        }
        part.parse().ok()
    }

    /// Format seconds as HH:MM:SS.ss
    pub fn format_clock(seconds: f64) -> String {
        let total_centis = (seconds.max(0.0) * 100.0).round() as u64;
        let hours = total_centis / 360_000;
        let minutes = (total_centis % 360_000) / 6_000;
        let secs = (total_centis % 6_000) / 100;
        let centis = total_centis % 100;
        format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
    }
}
