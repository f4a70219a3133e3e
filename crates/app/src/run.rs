use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use ptac_answers::Correlator;
use ptac_core::{PtacConfig, ResultSet};
use ptac_ocr::{discover, discover_many, BatchRunner, OcrBackend, RunnerOptions, TesseractCli};
use tracing::{error, info};

use crate::cli::{Args, OutputFormat};
use crate::display;

/// How a run ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every discovered image was attempted; some may have failed.
    Completed,
    /// The single requested source is missing or not a directory.
    SourceUnavailable,
    NoImages,
}

impl RunStatus {
    /// Partial per-image failures still count as success.
    pub fn is_success(self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    pub fn exit_code(self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Run with the Tesseract executable as OCR engine, printing results to `out`.
pub async fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<RunStatus> {
    let config = args.resolve_config().context("Failed to load configuration")?;
    let recognizer = TesseractCli::new(&config.lang, &config.tesseract_config);
    run_with(args, &config, recognizer, out).await
}

pub async fn run_with<R: OcrBackend + 'static>(
    args: &Args,
    config: &PtacConfig,
    recognizer: R,
    out: &mut dyn Write,
) -> anyhow::Result<RunStatus> {
    let sources: Vec<PathBuf> = args.sources.iter().map(PathBuf::as_path).map(absolute).collect();

    let images = match sources.as_slice() {
        [source] => match discover(source) {
            Ok(images) => images,
            Err(e) => {
                error!("{e}");
                return Ok(RunStatus::SourceUnavailable);
            }
        },
        _ => discover_many(&sources),
    };

    if images.is_empty() {
        writeln!(out, "No image files found to process.")?;
        return Ok(RunStatus::NoImages);
    }

    let runner = BatchRunner::new(
        recognizer,
        RunnerOptions {
            workers: config.effective_workers(),
            preprocess: config.preprocess,
        },
    );
    let options = runner.options();
    info!(
        "Processing {} images with {} workers (preprocessing {})",
        images.len(),
        options.workers,
        if options.preprocess { "on" } else { "off" }
    );

    let results = runner.run_batch(&images, &sources).await;

    let rendered = display::render(&results, args.format).context("Failed to render results")?;
    match args.format {
        OutputFormat::Text => {
            write!(out, "{rendered}")?;
            writeln!(out, "\n{}", display::summary(&results))?;
        }
        OutputFormat::Json => {
            writeln!(out, "{rendered}")?;
            info!("{}", display::summary(&results));
        }
    }

    if args.export_csv {
        export_csv(config, &sources, &results, args.format, out)?;
    }

    Ok(RunStatus::Completed)
}

/// Resolve to an absolute path where possible; unresolvable paths are kept so
/// discovery can report them.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// One CSV per source folder. A failing folder is logged and the rest continue.
fn export_csv(
    config: &PtacConfig,
    sources: &[PathBuf],
    results: &ResultSet,
    format: OutputFormat,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let correlator = Correlator::new(&config.answer_key_file, &config.csv_file_name);
    for folder in sources.iter().filter(|f| f.is_dir()) {
        match correlator.correlate(folder, results) {
            Ok(Some(path)) => match format {
                OutputFormat::Text => writeln!(out, "CSV exported: {}", path.display())?,
                OutputFormat::Json => info!("CSV exported: {}", path.display()),
            },
            Ok(None) => {}
            Err(e) => error!("CSV export failed for {}: {e}", folder.display()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use ptac_ocr::MockRecognizer;
    use std::fs;
    use std::io::Cursor;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ptac").chain(argv.iter().copied())).unwrap()
    }

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    async fn run_mock(argv: &[&str]) -> (RunStatus, String) {
        let args = args(argv);
        let config = args.resolve_config().unwrap();
        let mut out = Vec::new();
        let status = run_with(&args, &config, MockRecognizer::new("What is lift"), &mut out)
            .await
            .unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn only_completed_runs_exit_successfully() {
        assert!(RunStatus::Completed.is_success());
        assert!(!RunStatus::NoImages.is_success());
        assert!(!RunStatus::SourceUnavailable.is_success());
    }

    #[tokio::test]
    async fn missing_single_source_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let (status, out) = run_mock(&["-s", missing.to_str().unwrap()]).await;
        assert_eq!(status, RunStatus::SourceUnavailable);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn single_source_that_is_a_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("q1.png");
        fs::write(&file, tiny_png()).unwrap();
        let (status, _) = run_mock(&["-s", file.to_str().unwrap()]).await;
        assert_eq!(status, RunStatus::SourceUnavailable);
    }

    #[tokio::test]
    async fn empty_folder_has_no_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        let (status, out) = run_mock(&["-s", dir.path().to_str().unwrap()]).await;
        assert_eq!(status, RunStatus::NoImages);
        assert_eq!(out, "No image files found to process.\n");
    }

    #[tokio::test]
    async fn missing_folders_among_several_yield_no_images() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let (status, _) = run_mock(&["-s", a.to_str().unwrap(), b.to_str().unwrap()]).await;
        assert_eq!(status, RunStatus::NoImages);
    }

    #[tokio::test]
    async fn partial_failures_still_complete() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("q1.png"), tiny_png()).unwrap();
        fs::write(dir.path().join("q2.png"), b"not a png").unwrap();

        let (status, out) = run_mock(&["-s", dir.path().to_str().unwrap(), "-w", "2"]).await;
        assert_eq!(status, RunStatus::Completed);
        assert!(out.contains("--- q1.png ---\nWhat is lift\n"));
        assert!(out.contains("--- q2.png ---\n❌ ERROR:"));
        assert!(out.ends_with("📊 Summary: 1/2 images processed successfully\n"));
    }

    #[tokio::test]
    async fn json_output_with_export_is_pure_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("q1.png"), tiny_png()).unwrap();
        fs::write(dir.path().join("answers.txt"), "Upward force\n").unwrap();

        let (status, out) = run_mock(&[
            "-s",
            dir.path().to_str().unwrap(),
            "--format",
            "json",
            "--export-csv",
        ])
        .await;
        assert_eq!(status, RunStatus::Completed);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["q1.png"], "What is lift");
        assert!(dir.path().join("results.csv").is_file());
    }

    #[tokio::test]
    async fn text_output_reports_exported_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("q1.png"), tiny_png()).unwrap();
        fs::write(dir.path().join("answers.txt"), "Upward force\n").unwrap();

        let (_, out) = run_mock(&["-s", dir.path().to_str().unwrap(), "--export-csv"]).await;
        assert!(out.trim_end().ends_with("results.csv"));
        assert!(out.contains("CSV exported: "));
    }
}
