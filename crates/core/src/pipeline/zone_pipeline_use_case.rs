use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::classification::position_classifier::PositionClassifier;
use crate::classification::zone::Zone;
use crate::detection::domain::model_provider::ModelSession;
use crate::overlay::frame_canvas::FrameCanvas;
use crate::overlay::overlay_renderer::OverlayRenderer;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sampling::frame_sampler;
use crate::sampling::frame_sequencer::FrameSequencer;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Classification result for one decoded frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameZone {
    pub frame_index: usize,
    pub zone: Option<Zone>,
}

/// Where and how overlay snapshots are written.
///
/// Each classified frame is saved as `<dir>/<frame_index:06>.<extension>`
/// with the face box and zone guides drawn on it.
pub struct OverlayOutput {
    pub dir: PathBuf,
    pub extension: String,
    pub renderer: OverlayRenderer,
    pub writer: Box<dyn ImageWriter>,
}

impl OverlayOutput {
    fn path_for(&self, frame_index: usize) -> PathBuf {
        self.dir.join(format!("{frame_index:06}.{}", self.extension))
    }
}

/// Classifies the hand position in every frame of a source.
///
/// Frames are decoded on a dedicated reader thread and handed to the calling
/// thread over a bounded channel. Each frame is sampled (face and hand models
/// run concurrently), classified, and optionally rendered to an overlay
/// snapshot. Single-use: `execute` consumes the reader.
pub struct ZonePipelineUseCase {
    reader: Option<Box<dyn VideoReader>>,
    models: ModelSession,
    classifier: PositionClassifier,
    overlay: Option<OverlayOutput>,
    logger: Box<dyn PipelineLogger>,
    on_result: Option<Box<dyn FnMut(&FrameZone) + Send>>,
    cancelled: Arc<AtomicBool>,
    channel_capacity: usize,
}

impl ZonePipelineUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        models: ModelSession,
        classifier: PositionClassifier,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader: Some(reader),
            models,
            classifier,
            overlay: None,
            logger,
            on_result: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_overlay(mut self, overlay: OverlayOutput) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Called with each result as soon as it is available.
    pub fn with_on_result(mut self, on_result: Box<dyn FnMut(&FrameZone) + Send>) -> Self {
        self.on_result = Some(on_result);
        self
    }

    /// Shares a cancellation flag; setting it stops the run after the frame
    /// in progress.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn execute(
        &mut self,
        metadata: &VideoMetadata,
    ) -> Result<Vec<FrameZone>, Box<dyn std::error::Error>> {
        let reader = self.reader.take().ok_or("Pipeline already executed")?;
        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<Frame, SendError>>(self.channel_capacity);
        let reader_handle = spawn_reader(reader, frame_tx, self.cancelled.clone());

        let outcome = self.run_main_loop(frame_rx, metadata.total_frames);

        // The receiver is gone, so a reader blocked on a full channel wakes
        // up and exits.
        reader_handle
            .join()
            .map_err(|_| "Reader thread panicked")?;

        let results = outcome?;
        let classified = results.iter().filter(|r| r.zone.is_some()).count();
        self.logger.info(&format!(
            "Classified {classified} of {} frames",
            results.len()
        ));
        self.logger.summary();
        Ok(results)
    }

    fn run_main_loop(
        &mut self,
        frame_rx: Receiver<Result<Frame, SendError>>,
        total_frames: usize,
    ) -> Result<Vec<FrameZone>, Box<dyn std::error::Error>> {
        let mut sequencer = FrameSequencer::new();
        let mut results = Vec::with_capacity(total_frames);

        for frame_result in &frame_rx {
            if self.cancelled.load(Ordering::Relaxed) {
                self.logger.info("Cancelled");
                break;
            }
            let mut frame = frame_result.map_err(|e| e.to_string())?;
            self.logger.metric("reader_queue_depth", frame_rx.len() as f64);

            let ticket = sequencer.issue(frame.index());
            let t0 = Instant::now();
            let observation = frame_sampler::detect(Some(&frame), Some(&self.models));
            self.logger.timing("sample", elapsed_ms(t0));

            let Some(observation) = sequencer.accept(ticket, observation) else {
                continue;
            };

            let t0 = Instant::now();
            let zone = self
                .classifier
                .classify(observation.face.as_ref(), observation.hand.as_ref());
            self.logger.timing("classify", elapsed_ms(t0));

            if let Some(overlay) = &self.overlay {
                let t0 = Instant::now();
                let mut canvas = FrameCanvas::new(&mut frame);
                let _ = overlay.renderer.render(&mut canvas, observation.face.as_ref());
                overlay.writer.write(&overlay.path_for(frame.index()), &frame)?;
                self.logger.timing("overlay", elapsed_ms(t0));
            }

            let result = FrameZone {
                frame_index: frame.index(),
                zone,
            };
            if let Some(on_result) = self.on_result.as_mut() {
                on_result(&result);
            }
            results.push(result);
            self.logger.progress(results.len(), total_frames);
        }

        if sequencer.dropped() > 0 {
            self.logger
                .info(&format!("Dropped {} stale samples", sequencer.dropped()));
        }
        Ok(results)
    }
}

fn spawn_reader(
    mut reader: Box<dyn VideoReader>,
    frame_tx: crossbeam_channel::Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for frame_result in reader.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        reader.close();
    })
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
