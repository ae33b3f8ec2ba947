pub mod bounding_region;
pub mod constants;
pub mod frame;
pub mod model_resolver;
pub mod video_metadata;
