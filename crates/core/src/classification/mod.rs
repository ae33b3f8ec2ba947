pub mod classifier_config;
pub mod position_classifier;
pub mod zone;
pub mod zone_thresholds;
