//! 21-point hand landmark model (MediaPipe hand landmark topology) on ONNX
//! Runtime.
//!
//! The model sees the whole frame letterboxed to a square input and reports
//! one hand with a presence score.

use std::path::Path;
use std::sync::Mutex;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::hand_landmarks::{HandLandmarks, HAND_LANDMARK_COUNT};
use crate::detection::domain::hand_model::HandModel;
use crate::detection::domain::model_provider::LoadError;
use crate::detection::infrastructure::onnx_session::create_session;
use crate::shared::bounding_region::Point;
use crate::shared::frame::Frame;

const INPUT_SIZE: u32 = 224;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// x, y, z per landmark.
const VALUES_PER_LANDMARK: usize = 3;

pub struct OnnxHandLandmarker {
    session: Mutex<ort::session::Session>,
    confidence: f64,
}

impl OnnxHandLandmarker {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, LoadError> {
        let session = create_session(model_path)?;
        log::info!("Loaded hand model from {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
            confidence,
        })
    }
}

impl HandModel for OnnxHandLandmarker {
    fn detect(&self, frame: &Frame) -> Result<Vec<HandLandmarks>, DetectionError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let letterbox = Letterbox::fit(frame.width(), frame.height(), INPUT_SIZE);
        let input_tensor = preprocess(frame, &letterbox);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let mut session = self.session.lock().map_err(|_| DetectionError::Poisoned)?;
        let outputs = session.run(ort::inputs![input_value])?;

        // screen landmarks [1, 63], presence [1, 1]; handedness and world
        // landmarks follow and are unused.
        if outputs.len() < 2 {
            return Err(DetectionError::Output(format!(
                "hand model expected at least 2 outputs, got {}",
                outputs.len()
            )));
        }
        let landmarks = outputs[0].try_extract_array::<f32>()?;
        let presence = outputs[1].try_extract_array::<f32>()?;
        let coords = landmarks
            .as_slice()
            .ok_or_else(|| DetectionError::Output("non-contiguous landmark tensor".into()))?;
        let presence = presence
            .as_slice()
            .and_then(|s| s.first().copied())
            .ok_or_else(|| DetectionError::Output("empty presence tensor".into()))?;

        if (presence as f64) < self.confidence {
            log::trace!("Hand presence {presence:.2} below threshold");
            return Ok(Vec::new());
        }

        Ok(vec![decode(coords, &letterbox)?])
    }
}

/// Scale and padding that fit a frame inside a square model input while
/// keeping its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    size: u32,
    scale: f64,
    pad_x: f64,
    pad_y: f64,
}

impl Letterbox {
    fn fit(width: u32, height: u32, size: u32) -> Self {
        let scale = size as f64 / width.max(height) as f64;
        Self {
            size,
            scale,
            pad_x: (size as f64 - width as f64 * scale) / 2.0,
            pad_y: (size as f64 - height as f64 * scale) / 2.0,
        }
    }

    /// Model-input coordinates back to frame pixels.
    fn to_frame(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Letterboxed NHWC float32 input in [0,1]; padding is black.
fn preprocess(frame: &Frame, letterbox: &Letterbox) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_w = frame.width() as usize;
    let src_h = frame.height() as usize;
    let s = letterbox.size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, s, s, 3));

    for y in 0..s {
        let fy = (y as f64 + 0.5 - letterbox.pad_y) / letterbox.scale;
        if fy < 0.0 || fy >= src_h as f64 {
            continue;
        }
        for x in 0..s {
            let fx = (x as f64 + 0.5 - letterbox.pad_x) / letterbox.scale;
            if fx < 0.0 || fx >= src_w as f64 {
                continue;
            }
            let (sy, sx) = (fy as usize, fx as usize);
            for c in 0..3 {
                tensor[[0, y, x, c]] = src[[sy, sx, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

fn decode(coords: &[f32], letterbox: &Letterbox) -> Result<HandLandmarks, DetectionError> {
    let needed = HAND_LANDMARK_COUNT * VALUES_PER_LANDMARK;
    if coords.len() < needed {
        return Err(DetectionError::Output(format!(
            "hand landmark tensor has {} values, expected {needed}",
            coords.len()
        )));
    }
    let points: Vec<Point> = coords[..needed]
        .chunks(VALUES_PER_LANDMARK)
        .map(|c| letterbox.to_frame(c[0] as f64, c[1] as f64))
        .collect();
    HandLandmarks::from_slice(&points).map_err(|e| DetectionError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::hand_landmarks::HandLandmark;
    use approx::assert_relative_eq;

    #[test]
    fn test_letterbox_landscape_pads_vertically() {
        let lb = Letterbox::fit(448, 224, INPUT_SIZE);
        assert_relative_eq!(lb.scale, 0.5);
        assert_relative_eq!(lb.pad_x, 0.0);
        assert_relative_eq!(lb.pad_y, 56.0);
    }

    #[test]
    fn test_letterbox_round_trips_frame_corner() {
        let lb = Letterbox::fit(448, 224, INPUT_SIZE);
        let p = lb.to_frame(224.0, 56.0 + 112.0);
        assert_relative_eq!(p.x, 448.0);
        assert_relative_eq!(p.y, 224.0);
    }

    #[test]
    fn test_preprocess_shape_and_padding() {
        let frame = Frame::new(vec![255u8; 448 * 224 * 3], 448, 224, 0);
        let lb = Letterbox::fit(448, 224, INPUT_SIZE);
        let tensor = preprocess(&frame, &lb);
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        // top padding band stays black, centre is the frame
        assert_eq!(tensor[[0, 10, 100, 0]], 0.0);
        assert_relative_eq!(tensor[[0, 112, 100, 0]], 1.0);
        assert_eq!(tensor[[0, 220, 100, 2]], 0.0);
    }

    #[test]
    fn test_decode_maps_into_frame_space() {
        let lb = Letterbox::fit(448, 224, INPUT_SIZE);
        let mut coords = vec![0.0f32; 63];
        let wrist = HandLandmark::Wrist.index() * 3;
        coords[wrist] = 112.0;
        coords[wrist + 1] = 112.0;
        let hand = decode(&coords, &lb).unwrap();
        let p = hand.get(HandLandmark::Wrist);
        assert_relative_eq!(p.x, 224.0);
        assert_relative_eq!(p.y, 112.0);
    }

    #[test]
    fn test_decode_rejects_short_tensor() {
        let lb = Letterbox::fit(100, 100, INPUT_SIZE);
        let err = decode(&[0.0; 60], &lb).unwrap_err();
        assert!(matches!(err, DetectionError::Output(_)));
    }
}
