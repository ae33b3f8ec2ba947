pub mod classification;
pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod sampling;
pub mod shared;
pub mod video;
