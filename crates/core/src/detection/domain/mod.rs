pub mod detection_error;
pub mod face_model;
pub mod hand_landmarks;
pub mod hand_model;
pub mod model_provider;
