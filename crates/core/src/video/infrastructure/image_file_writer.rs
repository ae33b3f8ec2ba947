use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes frames with the `image` crate, creating parent directories as
/// needed.
#[derive(Default)]
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Frame buffer does not match its dimensions")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_write_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        ImageFileWriter::new()
            .write(&path, &solid_frame(50, 40, [50, 100, 200]))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 40));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/overlays/000001.png");
        ImageFileWriter::new()
            .write(&path, &solid_frame(4, 4, [0, 0, 0]))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_jpeg_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.jpg");
        ImageFileWriter::new()
            .write(&path, &solid_frame(16, 16, [128, 128, 128]))
            .unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 16);
    }

    #[test]
    fn test_unknown_extension_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.unknownext");
        assert!(ImageFileWriter::new()
            .write(&path, &solid_frame(4, 4, [0, 0, 0]))
            .is_err());
    }
}
