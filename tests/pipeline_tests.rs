use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use batchconv_cli::adapters::{ConfigFileAdapter, LocalFsAdapter};
use batchconv_cli::app::container::{AppContainer, DefaultAppContainer};
use batchconv_cli::app::{AppPorts, ConvertRequest};
use batchconv_cli::engine::progress::{NoOpProgressSink, ProgressSink};
use batchconv_cli::ports::*;
use batchconv_cli::probe::StreamBlock;
use batchconv_cli::*;

/// Test doubles for the external tools and the upload endpoint
mod fakes {
    use super::*;

    /// Encoder and repackager stand-in. Encodes write a small file to the real output,
    /// the analysis pass and the repackager only print status.
    #[derive(Default)]
    pub struct FakeTools {
        pub commands: Mutex<Vec<CommandSpec>>,
        pub fail_source: Option<String>,
    }

    impl FakeTools {
        pub fn failing_on(file_name: &str) -> Self {
            Self {
                fail_source: Some(file_name.to_string()),
                ..Default::default()
            }
        }

        pub fn commands(&self) -> Vec<CommandSpec> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessPort for FakeTools {
        async fn run(
            &self,
            command: &CommandSpec,
            on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
        ) -> ConvertResult<ProcessExit> {
            self.commands.lock().unwrap().push(command.clone());

            if command.program == "MP4Box" {
                on_line("ISO File Writing: |====| (100/100)");
                return Ok(ProcessExit {
                    exit_code: Some(0),
                    last_line: None,
                });
            }

            let input = command.flag_value("-i").unwrap_or_default();
            if let Some(fail) = &self.fail_source {
                if input.ends_with(fail.as_str()) {
                    on_line("Input #0, mov,mp4,m4a,3gp,3g2,mj2");
                    on_line("Invalid data found when processing input");
                    return Ok(ProcessExit {
                        exit_code: Some(1),
                        last_line: Some("Invalid data found when processing input".to_string()),
                    });
                }
            }

            on_line("  Duration: 00:01:40.00, start: 0.000000, bitrate: 4800 kb/s");
            on_line("frame= 2500 fps=100 q=28.0 size=  40960kB time=00:01:40.00 bitrate=3355.4kbits/s");

            let output = command.args.last().cloned().unwrap_or_default();
            if output != "/dev/null" && output != "NUL" {
                std::fs::write(&output, b"encoded").map_err(|e| ConvertError::io(&output, e))?;
            }
            Ok(ProcessExit {
                exit_code: Some(0),
                last_line: Some("video:1kB audio:0kB".to_string()),
            })
        }
    }

    /// Every input is a 100 second 1920x1080 video with one audio track
    pub struct FakeProbe;

    #[async_trait]
    impl ProbePort for FakeProbe {
        async fn probe_streams(&self, file_path: &Path) -> ConvertResult<Vec<StreamBlock>> {
            let mut streams = vec![StreamBlock::from_pairs([
                ("codec_type", "video"),
                ("width", "1920"),
                ("height", "1080"),
                ("duration", "100.000000"),
                ("bit_rate", "4718592"),
            ])];
            if !file_path.to_string_lossy().contains("silent") {
                streams.push(StreamBlock::from_pairs([
                    ("codec_type", "audio"),
                    ("duration", "100.000000"),
                ]));
            }
            Ok(streams)
        }
    }

    #[derive(Default)]
    pub struct RecordingUpload {
        pub transfers: Mutex<Vec<(String, PathBuf, String)>>,
    }

    #[async_trait]
    impl UploadPort for RecordingUpload {
        async fn upload(
            &self,
            server: &str,
            local: &Path,
            remote_path: &str,
            _sink: Arc<dyn ProgressSink>,
        ) -> ConvertResult<()> {
            assert!(local.is_file(), "uploaded file must exist: {}", local.display());
            self.transfers.lock().unwrap().push((
                server.to_string(),
                local.to_path_buf(),
                remote_path.to_string(),
            ));
            Ok(())
        }
    }
}

use fakes::*;

struct Workspace {
    _dir: TempDir,
    source: PathBuf,
    output_root: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new(files: &[(&str, usize)], overrides: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("videos");
        std::fs::create_dir_all(&source).unwrap();
        for (name, size) in files {
            let path = source.join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, vec![0u8; *size]).unwrap();
        }
        let source = source.canonicalize().unwrap();

        let output_root = dir.path().join("out");
        std::fs::create_dir_all(&output_root).unwrap();

        let config = dir.path().join("config.yml");
        std::fs::write(
            &config,
            format!(
                "local_directory: {}\nextension: mp4\nftp_server: ftp.example.com\nupload_directory: incoming/tv\nbitrate_ratio: 2.5\n{}",
                source.display(),
                overrides
            ),
        )
        .unwrap();

        Self {
            _dir: dir,
            source,
            output_root,
            config,
        }
    }

    fn request(&self, upload: bool) -> ConvertRequest {
        ConvertRequest {
            config_path: self.config.clone(),
            output_root: self.output_root.clone(),
            upload,
        }
    }

    /// The single `converted-*` directory created by a run
    fn dest_root(&self) -> PathBuf {
        let mut roots: Vec<PathBuf> = std::fs::read_dir(&self.output_root)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(roots.len(), 1);
        roots.remove(0)
    }
}

fn container(tools: Arc<FakeTools>, upload: Arc<RecordingUpload>) -> DefaultAppContainer {
    DefaultAppContainer::with_ports(AppPorts {
        config: Arc::new(ConfigFileAdapter::new()),
        probe: Arc::new(FakeProbe),
        fs: Arc::new(LocalFsAdapter::new()),
        process: tools,
        upload,
        progress: Arc::new(NoOpProgressSink),
    })
}

#[tokio::test]
async fn test_default_two_pass_run() {
    let ws = Workspace::new(&[("clip.mp4", 1 << 20)], "");
    let tools = Arc::new(FakeTools::default());
    let upload = Arc::new(RecordingUpload::default());

    let report = container(tools.clone(), upload.clone())
        .convert_interactor()
        .execute(ws.request(true))
        .await
        .unwrap();

    let commands = tools.commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0].flag_value("-pass"), Some("1"));
    assert_eq!(commands[1].flag_value("-pass"), Some("2"));
    assert_eq!(commands[2].program, "MP4Box");
    for pass in &commands[..2] {
        assert_eq!(pass.flag_value("-s"), Some("1920x1080"));
        assert_eq!(pass.flag_value("-b:v"), Some("5.2M"));
        assert_eq!(pass.flag_value("-maxrate"), Some("6.2M"));
        assert_eq!(pass.flag_value("-acodec"), Some("copy"));
    }

    let dest_root = ws.dest_root();
    assert_eq!(report.dest_root, dest_root);
    assert!(dest_root
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("converted-"));
    let produced = dest_root.join("videos").join("clip.mp4");
    assert_eq!(std::fs::read(&produced).unwrap(), b"encoded");

    let log = std::fs::read_to_string(&report.run_log).unwrap();
    assert_eq!(
        log,
        format!(
            "1) {}, 1.00MB, 4608 kb/s, with audio\n",
            ws.source.join("clip.mp4").display()
        )
    );

    let transfers = upload.transfers.lock().unwrap().clone();
    assert_eq!(report.uploaded, 2);
    assert_eq!(
        transfers,
        vec![
            (
                "ftp.example.com".to_string(),
                produced,
                "incoming/tv/videos/clip.mp4".to_string()
            ),
            (
                "ftp.example.com".to_string(),
                dest_root.join("conversion.log"),
                "incoming/tv/conversion.log".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_overrides_select_branches() {
    let overrides = "\
files:
  - path: a_excluded.mp4
    exclude: true
  - path: b_silent.mp4
    audio: false
    bitrate: 2.5
  - path: season1/c_cut.mp4
    resolution: 1280x720
    cut_start: 10
    cut_end: 40
";
    let ws = Workspace::new(
        &[
            ("a_excluded.mp4", 2048),
            ("b_silent.mp4", 2048),
            ("season1/c_cut.mp4", 2048),
        ],
        overrides,
    );
    let tools = Arc::new(FakeTools::default());
    let upload = Arc::new(RecordingUpload::default());

    let report = container(tools.clone(), upload)
        .convert_interactor()
        .execute(ws.request(false))
        .await
        .unwrap();

    let commands: Vec<String> = tools.commands().iter().map(|c| c.to_string()).collect();
    // a_excluded is only copied
    assert!(commands.iter().all(|c| !c.contains("a_excluded")));

    let silent = &tools.commands()[0];
    assert!(silent.args.iter().any(|a| a == "-an"));
    assert_eq!(silent.flag_value("-b:v"), Some("2.5M"));
    assert_eq!(silent.flag_value("-maxrate"), Some("3M"));
    assert_eq!(tools.commands()[1].program, "MP4Box");

    let cut = tools.commands();
    assert_eq!(cut.len(), 6);
    assert_eq!(cut[2].flag_value("-s"), Some("1280x720"));
    assert_eq!(cut[3].flag_value("-pass"), Some("2"));
    assert_eq!(cut[4].flag_value("-ss"), Some("10"));
    assert_eq!(cut[4].flag_value("-to"), Some("40"));
    assert_eq!(cut[5].program, "MP4Box");

    let dest = ws.dest_root().join("videos");
    assert_eq!(std::fs::read(dest.join("a_excluded.mp4")).unwrap(), vec![0u8; 2048]);
    assert_eq!(std::fs::read(dest.join("season1/c_cut.mp4")).unwrap(), b"encoded");
    assert!(!dest.join("season1/c_cut.trim.mp4").exists());

    let log = std::fs::read_to_string(&report.run_log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1) ") && lines[0].ends_with("a_excluded.mp4, 0.00MB, 4608 kb/s, with audio"));
    assert!(lines[1].starts_with("2) ") && lines[1].ends_with("b_silent.mp4, 0.00MB, 4608 kb/s, no audio"));
    assert!(lines[2].starts_with("3) "));
    assert_eq!(report.uploaded, 0);
}

#[tokio::test]
async fn test_encoder_failure_stops_the_run() {
    let ws = Workspace::new(&[("a.mp4", 10), ("b.mp4", 10), ("c.mp4", 10)], "");
    let tools = Arc::new(FakeTools::failing_on("b.mp4"));
    let upload = Arc::new(RecordingUpload::default());

    let err = container(tools.clone(), upload.clone())
        .convert_interactor()
        .execute(ws.request(true))
        .await
        .unwrap_err();

    match err {
        ConvertError::EncodeFailure {
            tool,
            exit_code,
            last_line,
        } => {
            assert_eq!(tool, "ffmpeg");
            assert_eq!(exit_code, Some(1));
            assert_eq!(last_line, "Invalid data found when processing input");
        }
        other => panic!("unexpected error: {other}"),
    }

    // a.mp4 fully processed, b.mp4 stopped after its first pass, c.mp4 never started
    assert_eq!(tools.commands().len(), 4);
    let log = std::fs::read_to_string(ws.dest_root().join("conversion.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.starts_with("1) ") && log.contains("a.mp4"));
    assert!(upload.transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_matching_files() {
    let ws = Workspace::new(&[("readme.txt", 10)], "");
    let tools = Arc::new(FakeTools::default());

    let err = container(tools.clone(), Arc::new(RecordingUpload::default()))
        .convert_interactor()
        .execute(ws.request(true))
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::NoInputFiles { ref extension, .. } if extension == "mp4"));
    assert!(tools.commands().is_empty());
    assert_eq!(std::fs::read_dir(&ws.output_root).unwrap().count(), 0);
}

#[tokio::test]
async fn test_invalid_configuration_has_no_side_effects() {
    let ws = Workspace::new(
        &[("clip.mp4", 10)],
        "files:\n  - path: clip.mp4\n    cut_start: 50\n    cut_end: 150\n",
    );
    let tools = Arc::new(FakeTools::default());

    let err = container(tools.clone(), Arc::new(RecordingUpload::default()))
        .convert_interactor()
        .execute(ws.request(true))
        .await
        .unwrap_err();

    match err {
        ConvertError::ConfigInvalid { problems } => {
            assert_eq!(problems.len(), 1);
            assert!(problems[0].contains("Video duration (100 seconds)"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(tools.commands().is_empty());
    assert_eq!(std::fs::read_dir(&ws.output_root).unwrap().count(), 0);
}

#[tokio::test]
async fn test_inspect_summary() {
    let ws = Workspace::new(&[("silent_clip.mp4", 3 << 20)], "");
    let container = container(Arc::new(FakeTools::default()), Arc::new(RecordingUpload::default()));

    let summary = container
        .inspect_interactor()
        .execute(&ws.source.join("silent_clip.mp4"))
        .await
        .unwrap();

    assert_eq!(summary.size_bytes, 3 << 20);
    assert_eq!(summary.video_bitrate_kbps, Some(4608));
    assert!(!summary.has_audio);
    assert!(summary.to_string().ends_with("silent_clip.mp4, 3.00MB, 4608 kb/s, no audio"));
}
