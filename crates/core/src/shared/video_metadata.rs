use std::path::PathBuf;

/// Properties of an opened frame source.
///
/// Still images are described as a one-frame source with `fps = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_still_image(&self) -> bool {
        self.total_frames == 1 && self.fps == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_is_not_still_image() {
        let meta = VideoMetadata {
            width: 1280,
            height: 720,
            fps: 30.0,
            total_frames: 300,
            source_path: Some(PathBuf::from("/tmp/signing.mp4")),
        };
        assert!(!meta.is_still_image());
    }

    #[test]
    fn test_single_frame_without_rate_is_still_image() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 0.0,
            total_frames: 1,
            source_path: None,
        };
        assert!(meta.is_still_image());
    }
}
