//! BlazeFace short-range face detector using ONNX Runtime via `ort`.
use std::path::Path;
use std::sync::Mutex;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_model::FaceModel;
use crate::detection::domain::model_provider::LoadError;
use crate::detection::infrastructure::math::{nms, sigmoid};
use crate::detection::infrastructure::onnx_session::create_session;
use crate::shared::bounding_region::BoundingRegion;
use crate::shared::frame::Frame;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.3;

const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output: box (4) plus 6 keypoints (12).
const REGRESSOR_STRIDE: usize = 16;

/// Face detector backed by a BlazeFace ONNX session.
///
/// Returns face boxes in frame pixels, highest score first.
pub struct OnnxFaceDetector {
    session: Mutex<ort::session::Session>,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxFaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, LoadError> {
        let session = create_session(model_path)?;
        log::info!("Loaded face model from {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceModel for OnnxFaceDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<BoundingRegion>, DetectionError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let input_tensor = preprocess(frame, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let mut session = self.session.lock().map_err(|_| DetectionError::Poisoned)?;
        let outputs = session.run(ort::inputs![input_value])?;

        // regressors [1, 896, 16], classificators [1, 896, 1]
        if outputs.len() < 2 {
            return Err(DetectionError::Output(format!(
                "face model expected 2 outputs, got {}",
                outputs.len()
            )));
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors
            .as_slice()
            .ok_or_else(|| DetectionError::Output("non-contiguous regressor tensor".into()))?;
        let score_data = scores
            .as_slice()
            .ok_or_else(|| DetectionError::Output("non-contiguous score tensor".into()))?;

        let raw = decode(
            reg_data,
            score_data,
            &self.anchors,
            self.confidence as f32,
            frame.width() as f32,
            frame.height() as f32,
        );

        Ok(nms(raw, NMS_IOU_THRESH)
            .into_iter()
            .map(|(corners, _)| BoundingRegion::from_corners(corners))
            .collect())
    }
}

/// Resize frame to `size × size` and normalize to [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

/// Decode anchor-relative boxes above `confidence` into clamped frame boxes.
fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    confidence: f32,
    fw: f32,
    fh: f32,
) -> Vec<([f64; 4], f64)> {
    let mut dets = Vec::new();
    for (i, &raw_score) in score_data.iter().enumerate().take(anchors.len()) {
        let score = sigmoid(raw_score);
        if score < confidence {
            continue;
        }
        let offset = i * REGRESSOR_STRIDE;
        if offset + 4 > reg_data.len() {
            break;
        }

        let anchor = anchors[i];
        let cx = anchor[0] + reg_data[offset] / INPUT_SIZE as f32;
        let cy = anchor[1] + reg_data[offset + 1] / INPUT_SIZE as f32;
        let w = reg_data[offset + 2] / INPUT_SIZE as f32;
        let h = reg_data[offset + 3] / INPUT_SIZE as f32;

        let x1 = ((cx - w / 2.0) * fw).max(0.0);
        let y1 = ((cy - h / 2.0) * fh).max(0.0);
        let x2 = ((cx + w / 2.0) * fw).min(fw);
        let y2 = ((cy + h / 2.0) * fh).min(fh);

        dets.push(([x1 as f64, y1 as f64, x2 as f64, y2 as f64], score as f64));
    }
    dets
}

/// BlazeFace short-range anchors: a 16×16 grid with 2 anchors per cell and
/// an 8×8 grid with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_preprocess_shape() {
        let frame = Frame::new(vec![128u8; 200 * 100 * 3], 200, 100, 0);
        let tensor = preprocess(&frame, INPUT_SIZE);
        assert_eq!(tensor.shape(), &[1, 3, 128, 128]);
    }

    #[test]
    fn test_preprocess_normalized() {
        let frame = Frame::new(vec![255u8; 50 * 50 * 3], 50, 50, 0);
        let tensor = preprocess(&frame, INPUT_SIZE);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
    }

    #[test]
    fn test_generate_anchors_count() {
        // 16×16 × 2 + 8×8 × 6 = 512 + 384
        assert_eq!(generate_anchors().len(), NUM_ANCHORS);
    }

    #[test]
    fn test_anchors_in_unit_range() {
        for a in generate_anchors() {
            assert!(a[0] > 0.0 && a[0] < 1.0);
            assert!(a[1] > 0.0 && a[1] < 1.0);
        }
    }

    #[test]
    fn test_decode_maps_anchor_box_to_frame_pixels() {
        let anchors = [[0.5, 0.5]];
        // zero offset, 64px box at 128 input -> half the frame
        let mut reg = vec![0.0f32; REGRESSOR_STRIDE];
        reg[2] = 64.0;
        reg[3] = 64.0;
        let dets = decode(&reg, &[10.0], &anchors, 0.5, 200.0, 400.0);
        assert_eq!(dets.len(), 1);
        let [x1, y1, x2, y2] = dets[0].0;
        assert_relative_eq!(x1, 50.0, epsilon = 1e-3);
        assert_relative_eq!(y1, 100.0, epsilon = 1e-3);
        assert_relative_eq!(x2, 150.0, epsilon = 1e-3);
        assert_relative_eq!(y2, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_decode_skips_low_scores() {
        let anchors = [[0.5, 0.5], [0.25, 0.25]];
        let reg = vec![10.0f32; 2 * REGRESSOR_STRIDE];
        let dets = decode(&reg, &[-5.0, 5.0], &anchors, 0.5, 100.0, 100.0);
        assert_eq!(dets.len(), 1);
        assert!(dets[0].1 > 0.99);
    }

    #[test]
    fn test_decode_clamps_to_frame() {
        let anchors = [[0.0, 0.0]];
        let mut reg = vec![0.0f32; REGRESSOR_STRIDE];
        reg[2] = 64.0;
        reg[3] = 64.0;
        let dets = decode(&reg, &[10.0], &anchors, 0.5, 100.0, 100.0);
        assert_eq!(dets[0].0[0], 0.0);
        assert_eq!(dets[0].0[1], 0.0);
    }

    #[test]
    fn test_decode_stops_on_short_regressor_tensor() {
        let anchors = [[0.5, 0.5], [0.5, 0.5]];
        let reg = vec![0.0f32; REGRESSOR_STRIDE];
        let dets = decode(&reg, &[10.0, 10.0], &anchors, 0.5, 100.0, 100.0);
        assert_eq!(dets.len(), 1);
    }
}
