use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Presents a still image as a one-frame source (`fps = 0`,
/// `total_frames = 1`) so images and videos share the same pipeline.
#[derive(Default)]
pub struct ImageFileReader {
    frame: Option<Frame>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();
        self.frame = Some(Frame::new(img.into_raw(), width, height, 0));

        Ok(VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            source_path: Some(path.to_path_buf()),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.frame.take() {
            Some(frame) => Box::new(std::iter::once(Ok(frame))),
            None => Box::new(std::iter::once(Err("ImageFileReader: not opened".into()))),
        }
    }

    fn close(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("still.png");
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([50, 100, 200]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_describes_still_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut reader = ImageFileReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (100, 80));
        assert!(meta.is_still_image());
        assert_eq!(meta.source_path, Some(path));
    }

    #[test]
    fn test_open_nonexistent_errors() {
        let mut reader = ImageFileReader::new();
        assert!(reader.open(Path::new("/nonexistent/still.png")).is_err());
    }

    #[test]
    fn test_yields_single_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut reader = ImageFileReader::new();
        reader.open(&path).unwrap();

        let frames: Vec<_> = reader.frames().collect();
        assert_eq!(frames.len(), 1);
        let frame = frames.into_iter().next().unwrap().unwrap();
        assert_eq!(frame.index(), 0);
        assert_eq!(frame.pixel(0, 0), Some([50, 100, 200]));
        assert_eq!((frame.width(), frame.height()), (100, 80));
    }

    #[test]
    fn test_frames_without_open_errors() {
        let mut reader = ImageFileReader::new();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_close_discards_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let mut reader = ImageFileReader::new();
        reader.open(&path).unwrap();
        reader.close();
        reader.close();
        assert!(reader.frames().next().unwrap().is_err());
    }
}
