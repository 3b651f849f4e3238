use std::collections::HashMap;

use zonemark_core::ImageHandle;

use super::{Frame, SnapshotError};

/// A decoded image registered with a store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredImage {
    pub handle: ImageHandle,
    pub width: u32,
    pub height: u32,
}

/// Owner of decoded snapshot images.
///
/// Every handle returned by `create` must be passed to `release` exactly
/// once; the store frees the image at that point.
pub trait ImageStore {
    fn create(&mut self, frame: &Frame) -> Result<StoredImage, SnapshotError>;
    fn release(&mut self, handle: ImageHandle) -> bool;
    fn image(&self, handle: ImageHandle) -> Option<&DecodedImage>;
    fn live_count(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: image::RgbaImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// In-process store decoding PNG/JPEG frames with the `image` crate.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: HashMap<ImageHandle, DecodedImage>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryImageStore {
    fn create(&mut self, frame: &Frame) -> Result<StoredImage, SnapshotError> {
        let decoded = image::load_from_memory(&frame.bytes)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        let pixels = decoded.to_rgba8();
        let stored = StoredImage {
            handle: ImageHandle::new(),
            width: pixels.width(),
            height: pixels.height(),
        };
        self.images.insert(stored.handle, DecodedImage { pixels });
        log::debug!(
            "Created {} ({}x{}) for camera {}",
            stored.handle,
            stored.width,
            stored.height,
            frame.camera
        );
        Ok(stored)
    }

    fn release(&mut self, handle: ImageHandle) -> bool {
        let released = self.images.remove(&handle).is_some();
        if released {
            log::debug!("Released {}", handle);
        } else {
            log::warn!("Release of unknown {}", handle);
        }
        released
    }

    fn image(&self, handle: ImageHandle) -> Option<&DecodedImage> {
        self.images.get(&handle)
    }

    fn live_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;
    use zonemark_core::CameraId;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 40, 60, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn frame(bytes: Vec<u8>) -> Frame {
        Frame {
            camera: CameraId::new("cam-1"),
            bytes,
            content_type: Some("image/png".to_string()),
        }
    }

    #[test]
    fn test_create_and_release() {
        let mut store = MemoryImageStore::new();
        let stored = store.create(&frame(png_bytes(4, 3))).unwrap();
        assert_eq!((stored.width, stored.height), (4, 3));
        assert_eq!(store.live_count(), 1);

        let image = store.image(stored.handle).unwrap();
        assert_eq!(image.pixels.get_pixel(0, 0).0, [20, 40, 60, 255]);

        assert!(store.release(stored.handle));
        assert!(!store.release(stored.handle));
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_garbage_does_not_decode() {
        let mut store = MemoryImageStore::new();
        let err = store.create(&frame(b"<html>503</html>".to_vec())).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
        assert_eq!(store.live_count(), 0);
    }
}
