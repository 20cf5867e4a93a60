use crate::error::CaptureError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Selfie camera ("user" facing mode).
    Front,
    /// Back camera ("environment" facing mode).
    #[default]
    Rear,
}

impl Facing {
    pub fn toggle(self) -> Self {
        match self {
            Facing::Front => Facing::Rear,
            Facing::Rear => Facing::Front,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Rear => "rear",
        }
    }
}

/// A camera that can be opened for one facing mode at a time.
pub trait CameraDevice: Send + Sync {
    fn open(&self, facing: Facing) -> Result<Box<dyn FrameStream>, CaptureError>;
}

/// An open camera stream. Dropping it releases the device.
pub trait FrameStream: Send {
    fn facing(&self) -> Facing;

    /// Returns the current frame as encoded image bytes.
    fn read_frame(&mut self) -> Result<Vec<u8>, CaptureError>;
}

const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Camera backed by a directory that some other process keeps writing frames into.
///
/// The latest frame for each facing mode lives at `front.<ext>` / `rear.<ext>`.
#[derive(Debug, Clone)]
pub struct FileCamera {
    dir: PathBuf,
}

impl FileCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CameraDevice for FileCamera {
    fn open(&self, facing: Facing) -> Result<Box<dyn FrameStream>, CaptureError> {
        if !self.dir.is_dir() {
            log::warn!("camera directory missing: {}", self.dir.display());
            return Err(CaptureError::NoDevice);
        }
        log::info!(
            "camera opened: {} ({})",
            self.dir.display(),
            facing.as_str()
        );
        Ok(Box::new(FileFrameStream {
            dir: self.dir.clone(),
            facing,
        }))
    }
}

struct FileFrameStream {
    dir: PathBuf,
    facing: Facing,
}

impl FileFrameStream {
    fn frame_path(&self) -> Option<PathBuf> {
        FRAME_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{ext}", self.facing.as_str())))
            .find(|p| p.is_file())
    }
}

impl FrameStream for FileFrameStream {
    fn facing(&self) -> Facing {
        self.facing
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        let path = self.frame_path().ok_or(CaptureError::NoDevice)?;
        std::fs::read(&path).map_err(|source| CaptureError::Read { path, source })
    }
}

impl Drop for FileFrameStream {
    fn drop(&mut self) {
        log::info!("camera released ({})", self.facing.as_str());
    }
}
