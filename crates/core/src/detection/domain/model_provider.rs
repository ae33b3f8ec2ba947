use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::detection::domain::face_model::FaceModel;
use crate::detection::domain::hand_model::HandModel;

/// Boxed loader error; `Send + Sync` so it can cross the loader threads.
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("failed to load face model: {0}")]
    Face(#[source] LoadError),
    #[error("failed to load hand model: {0}")]
    Hand(#[source] LoadError),
    /// Requires unwinding panics, like [`SampleError::Panicked`].
    ///
    /// [`SampleError::Panicked`]: crate::sampling::frame_sampler::SampleError::Panicked
    #[error("{0} model loader panicked")]
    Panicked(&'static str),
}

/// Caller-owned pair of model handles for one detection session.
///
/// Cloning shares the underlying models. Handles are never mutated by the
/// pipeline; dropping the last clone (or calling [`ModelSession::close`])
/// releases them.
#[derive(Clone)]
pub struct ModelSession {
    face: Arc<dyn FaceModel>,
    hand: Arc<dyn HandModel>,
}

impl ModelSession {
    pub fn new(face: Arc<dyn FaceModel>, hand: Arc<dyn HandModel>) -> Self {
        Self { face, hand }
    }

    pub fn face_model(&self) -> &dyn FaceModel {
        &*self.face
    }

    pub fn hand_model(&self) -> &dyn HandModel {
        &*self.hand
    }

    pub fn close(self) {
        log::debug!("Releasing model session");
    }
}

/// Acquires both model handles for a session.
///
/// Acquisition is all-or-nothing: if either model fails to load, no session
/// is returned and any model that did load is released.
pub trait ModelProvider {
    fn acquire(&self) -> Result<ModelSession, ModelLoadError>;
}

/// Runs two loaders concurrently and joins them into a session.
pub fn load_concurrently<F, H>(load_face: F, load_hand: H) -> Result<ModelSession, ModelLoadError>
where
    F: FnOnce() -> Result<Arc<dyn FaceModel>, LoadError> + Send,
    H: FnOnce() -> Result<Arc<dyn HandModel>, LoadError> + Send,
{
    let (face, hand) = thread::scope(|s| {
        let face_handle = s.spawn(load_face);
        let hand_handle = s.spawn(load_hand);
        (face_handle.join(), hand_handle.join())
    });

    let face = face
        .map_err(|_| ModelLoadError::Panicked("face"))?
        .map_err(ModelLoadError::Face)?;
    let hand = hand
        .map_err(|_| ModelLoadError::Panicked("hand"))?
        .map_err(ModelLoadError::Hand)?;

    Ok(ModelSession::new(face, hand))
}
