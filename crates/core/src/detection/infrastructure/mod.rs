pub mod math;
pub mod onnx_face_detector;
pub mod onnx_hand_landmarker;
pub mod onnx_model_provider;
pub mod onnx_session;
