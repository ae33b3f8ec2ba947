use std::thread;

use thiserror::Error;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::model_provider::ModelSession;
use crate::sampling::frame_observation::FrameObservation;
use crate::shared::frame::Frame;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("no frame to sample")]
    MissingFrame,
    #[error("no model session")]
    MissingModels,
}

#[derive(Error, Debug)]
pub enum SampleError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error("face model failed: {0}")]
    Face(#[source] DetectionError),
    #[error("hand model failed: {0}")]
    Hand(#[source] DetectionError),
    /// Only reachable with unwinding panics; the release profile must not
    /// set `panic = "abort"`.
    #[error("{0} model worker panicked")]
    Panicked(&'static str),
}

/// Runs both models on one frame and pairs the first face with the first hand.
///
/// The two inference calls run concurrently and are joined before returning,
/// so both halves of the observation describe the same frame. Nothing is
/// retained between calls.
pub fn try_detect(
    frame: Option<&Frame>,
    models: Option<&ModelSession>,
) -> Result<FrameObservation, SampleError> {
    let frame = frame.ok_or(InvalidInputError::MissingFrame)?;
    let models = models.ok_or(InvalidInputError::MissingModels)?;

    let (faces, hands) = thread::scope(|s| {
        let face_job = s.spawn(|| models.face_model().detect(frame));
        let hand_job = s.spawn(|| models.hand_model().detect(frame));
        (face_job.join(), hand_job.join())
    });

    let faces = faces
        .map_err(|_| SampleError::Panicked("face"))?
        .map_err(SampleError::Face)?;
    let hands = hands
        .map_err(|_| SampleError::Panicked("hand"))?
        .map_err(SampleError::Hand)?;

    Ok(FrameObservation {
        frame_index: Some(frame.index()),
        face: faces.into_iter().next(),
        hand: hands.into_iter().next(),
    })
}

/// Like [`try_detect`], but never fails.
///
/// Missing input and model failures both yield an empty observation; a model
/// failure drops the whole frame rather than returning half of it.
pub fn detect(frame: Option<&Frame>, models: Option<&ModelSession>) -> FrameObservation {
    let frame_index = frame.map(Frame::index);
    match try_detect(frame, models) {
        Ok(observation) => observation,
        Err(SampleError::InvalidInput(e)) => {
            log::debug!("Skipping sample: {e}");
            FrameObservation::empty(frame_index)
        }
        Err(e) => {
            log::warn!("Dropping frame {frame_index:?}: {e}");
            FrameObservation::empty(frame_index)
        }
    }
}
