use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use handcue_core::classification::classifier_config::ClassifierConfig;
use handcue_core::classification::position_classifier::PositionClassifier;
use handcue_core::detection::domain::model_provider::ModelProvider;
use handcue_core::detection::infrastructure::onnx_model_provider::OnnxModelProvider;
use handcue_core::overlay::overlay_renderer::OverlayRenderer;
use handcue_core::pipeline::pipeline_logger::LogPipelineLogger;
use handcue_core::pipeline::zone_pipeline_use_case::{FrameZone, OverlayOutput, ZonePipelineUseCase};
use handcue_core::shared::constants::IMAGE_EXTENSIONS;
use handcue_core::shared::model_resolver::ModelResolver;
use handcue_core::video::domain::video_reader::VideoReader;
use handcue_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use handcue_core::video::infrastructure::image_file_reader::ImageFileReader;
use handcue_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Classify cued-speech hand positions relative to the face, frame by frame.
///
/// Prints one line per frame: `<frame>\t<zone>`, with `-` when no zone can
/// be determined.
#[derive(Parser)]
#[command(name = "handcue")]
struct Cli {
    /// Input video or image file.
    input: PathBuf,

    /// Write an overlay snapshot per frame into this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Overlay snapshot format: png or jpg.
    #[arg(long, default_value = "png")]
    overlay_format: String,

    /// Flip overlay labels for display in a mirrored (selfie) view.
    #[arg(long)]
    mirrored: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    face_confidence: f64,

    /// Hand presence threshold (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    hand_confidence: f64,

    /// Classifier config JSON (zone boundaries and anchor landmarks).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with bundled model files, checked after the cache.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Download URL for the face model when it is not found on disk.
    #[arg(long)]
    face_model_url: Option<String>,

    /// Download URL for the hand model when it is not found on disk.
    #[arg(long)]
    hand_model_url: Option<String>,

    /// Emit JSON lines instead of tab-separated text.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = match &cli.config {
        Some(path) => ClassifierConfig::load(path)?,
        None => ClassifierConfig::default(),
    };
    let thresholds = config.boundaries.clone();
    let classifier = PositionClassifier::new(config);

    let resolver = ModelResolver::from_user_cache(cli.models_dir.clone())?;
    let mut provider = OnnxModelProvider::new(resolver)
        .with_face_confidence(cli.face_confidence)
        .with_hand_confidence(cli.hand_confidence)
        .with_download_progress(download_progress);
    if let Some(url) = &cli.face_model_url {
        provider = provider.with_face_model_url(url.as_str());
    }
    if let Some(url) = &cli.hand_model_url {
        provider = provider.with_hand_model_url(url.as_str());
    }
    let models = provider.acquire()?;

    let mut reader = open_reader(&cli.input);
    let metadata = reader.open(&cli.input)?;

    let json = cli.json;
    let stop = Arc::new(AtomicBool::new(false));
    let stop_on_closed_output = stop.clone();
    let on_result = Box::new(move |result: &FrameZone| {
        let mut stdout = std::io::stdout().lock();
        emit_result(&mut stdout, result, json, &stop_on_closed_output);
    });

    let mut use_case = ZonePipelineUseCase::new(
        reader,
        models.clone(),
        classifier,
        Box::new(LogPipelineLogger::default()),
    )
    .with_on_result(on_result)
    .with_cancel_flag(stop);

    if let Some(dir) = &cli.overlay_dir {
        use_case = use_case.with_overlay(OverlayOutput {
            dir: dir.clone(),
            extension: cli.overlay_format.to_lowercase(),
            renderer: OverlayRenderer::new(thresholds, cli.mirrored),
            writer: Box::new(ImageFileWriter::new()),
        });
    }

    let results = use_case.execute(&metadata)?;
    models.close();

    if let Some(dir) = &cli.overlay_dir {
        log::info!("Wrote {} overlay snapshots to {}", results.len(), dir.display());
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    for (name, value) in [
        ("Face confidence", cli.face_confidence),
        ("Hand confidence", cli.hand_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} must be between 0.0 and 1.0, got {value}").into());
        }
    }
    let format = cli.overlay_format.to_lowercase();
    if !["png", "jpg", "jpeg"].contains(&format.as_str()) {
        return Err(format!(
            "Overlay format must be 'png' or 'jpg', got '{}'",
            cli.overlay_format
        )
        .into());
    }
    if cli.mirrored && cli.overlay_dir.is_none() {
        log::warn!("--mirrored has no effect without --overlay-dir");
    }
    Ok(())
}

fn format_result(result: &FrameZone, json: bool) -> String {
    if json {
        serde_json::json!({
            "frame": result.frame_index,
            "zone": result.zone,
            "label": result.zone.map(|z| z.label()),
        })
        .to_string()
    } else {
        match result.zone {
            Some(zone) => format!("{}\t{zone}", result.frame_index),
            None => format!("{}\t-", result.frame_index),
        }
    }
}

/// Writes one result line; a closed or failing output sets `stop`.
fn emit_result(out: &mut impl Write, result: &FrameZone, json: bool, stop: &AtomicBool) {
    if let Err(e) = writeln!(out, "{}", format_result(result, json)) {
        log::debug!("Output closed, stopping: {e}");
        stop.store(true, Ordering::Relaxed);
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn open_reader(input: &Path) -> Box<dyn VideoReader> {
    if is_image(input) {
        Box::new(ImageFileReader::new())
    } else {
        Box::new(FfmpegReader::new())
    }
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}
