//! Command lines for the external encoder, repackager and probe tools

use std::path::Path;

use crate::domain::model::{EncodingJob, TrimRange};
use crate::ports::CommandSpec;

pub const ENCODER: &str = "ffmpeg";
pub const REPACKAGER: &str = "MP4Box";
pub const PROBE: &str = "ffprobe";

/// Interleave window handed to the repackager, in milliseconds
pub const INTERLEAVE_MS: u32 = 500;

/// Output the analysis pass writes to
pub fn null_sink() -> &'static str {
    if cfg!(windows) {
        "NUL"
    } else {
        "/dev/null"
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Builds encoder invocations for a resolved job
pub struct EncoderCommands;

impl EncoderCommands {
    /// Fixed H.264 profile shared by every encode
    fn profile(job: &EncodingJob) -> Vec<String> {
        vec![
            "-vcodec".into(),
            "libx264".into(),
            "-vprofile".into(),
            "main".into(),
            "-level".into(),
            "31".into(),
            "-maxrate".into(),
            format!("{}M", job.maxrate),
            "-minrate".into(),
            "100k".into(),
            "-bufsize".into(),
            "10000000".into(),
            "-s".into(),
            job.resolution.to_string(),
            "-g".into(),
            "50".into(),
            "-vf".into(),
            "yadif".into(),
            "-r".into(),
            "25".into(),
            "-b:v".into(),
            format!("{}M", job.bitrate),
            "-f".into(),
            "mp4".into(),
        ]
    }

    /// One pass of the two-pass encode; pass 1 writes to the null sink
    pub fn pass(job: &EncodingJob, pass: u8) -> CommandSpec {
        let output = if pass == 1 {
            null_sink().to_string()
        } else {
            path_arg(&job.output_path)
        };

        CommandSpec::new(ENCODER)
            .args(["-y", "-i"])
            .arg(path_arg(&job.source_path))
            .args(["-acodec", "copy", "-bsf:a", "aac_adtstoasc"])
            .args(Self::profile(job))
            .arg("-pass")
            .arg(pass.to_string())
            .arg(output)
    }

    /// Single pass with audio disabled
    pub fn without_audio(job: &EncodingJob) -> CommandSpec {
        CommandSpec::new(ENCODER)
            .args(["-y", "-i"])
            .arg(path_arg(&job.source_path))
            .arg("-an")
            .args(Self::profile(job))
            .arg(path_arg(&job.output_path))
    }

    /// Cut `[start, end]` of `source` into `destination`
    pub fn trim(source: &Path, destination: &Path, range: &TrimRange) -> CommandSpec {
        CommandSpec::new(ENCODER)
            .arg("-i")
            .arg(path_arg(source))
            .args(["-y", "-ss"])
            .arg(range.start.to_string())
            .arg("-to")
            .arg(range.end.to_string())
            .arg(path_arg(destination))
    }
}

/// Container interleaving for progressive playback
pub fn repackage(path: &Path) -> CommandSpec {
    CommandSpec::new(REPACKAGER)
        .arg("-inter")
        .arg(INTERLEAVE_MS.to_string())
        .arg(path_arg(path))
}

/// Stream listing of one media file
pub fn probe_streams(path: &Path) -> CommandSpec {
    CommandSpec::new(PROBE).arg("-show_streams").arg(path_arg(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Resolution;
    use std::path::PathBuf;

    fn job() -> EncodingJob {
        EncodingJob {
            source_path: PathBuf::from("/in/clip.mp4"),
            output_path: PathBuf::from("/out/clip.mp4"),
            resolution: Resolution { width: 1920, height: 1080 },
            bitrate: 103.7,
            maxrate: 124.4,
            has_audio: true,
            excluded: false,
            trim: None,
        }
    }

    #[test]
    fn test_pass_one_targets_null_sink() {
        let cmd = EncoderCommands::pass(&job(), 1);
        assert_eq!(cmd.program, "ffmpeg");
        assert_eq!(cmd.flag_value("-pass"), Some("1"));
        assert_eq!(cmd.args.last().map(String::as_str), Some(null_sink()));
        assert_eq!(cmd.flag_value("-acodec"), Some("copy"));
        assert_eq!(cmd.flag_value("-bsf:a"), Some("aac_adtstoasc"));
    }

    #[test]
    fn test_pass_two_profile() {
        let cmd = EncoderCommands::pass(&job(), 2);
        assert_eq!(cmd.flag_value("-i"), Some("/in/clip.mp4"));
        assert_eq!(cmd.flag_value("-maxrate"), Some("124.4M"));
        assert_eq!(cmd.flag_value("-b:v"), Some("103.7M"));
        assert_eq!(cmd.flag_value("-s"), Some("1920x1080"));
        assert_eq!(cmd.flag_value("-vprofile"), Some("main"));
        assert_eq!(cmd.flag_value("-level"), Some("31"));
        assert_eq!(cmd.flag_value("-vf"), Some("yadif"));
        assert_eq!(cmd.flag_value("-r"), Some("25"));
        assert_eq!(cmd.flag_value("-pass"), Some("2"));
        assert_eq!(cmd.args.last().map(String::as_str), Some("/out/clip.mp4"));
    }

    #[test]
    fn test_without_audio() {
        let cmd = EncoderCommands::without_audio(&job());
        assert!(cmd.args.iter().any(|a| a == "-an"));
        assert_eq!(cmd.flag_value("-acodec"), None);
        assert_eq!(cmd.flag_value("-pass"), None);
        assert_eq!(cmd.args.last().map(String::as_str), Some("/out/clip.mp4"));
    }

    #[test]
    fn test_whole_number_rates_render_plainly() {
        let mut job = job();
        job.bitrate = 5.0;
        job.maxrate = 6.0;
        let cmd = EncoderCommands::without_audio(&job);
        assert_eq!(cmd.flag_value("-b:v"), Some("5M"));
        assert_eq!(cmd.flag_value("-maxrate"), Some("6M"));
    }

    #[test]
    fn test_trim() {
        let range = TrimRange::new(2.5, 10.0).unwrap();
        let cmd = EncoderCommands::trim(Path::new("/out/a.mp4"), Path::new("/out/a.trim.mp4"), &range);
        assert_eq!(
            cmd.to_string(),
            "ffmpeg -i /out/a.mp4 -y -ss 2.5 -to 10 /out/a.trim.mp4"
        );
    }

    #[test]
    fn test_repackage_and_probe() {
        assert_eq!(repackage(Path::new("/out/a.mp4")).to_string(), "MP4Box -inter 500 /out/a.mp4");
        assert_eq!(
            probe_streams(Path::new("/in/my clip.mp4")).to_string(),
            "ffprobe -show_streams \"/in/my clip.mp4\""
        );
    }
}
