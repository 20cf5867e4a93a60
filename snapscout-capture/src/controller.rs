use crate::device::{CameraDevice, Facing, FrameStream};
use crate::error::CaptureError;
use snapscout_core::types::ImagePayload;
use std::path::Path;
use std::sync::Arc;

const CAPTURED_STEM: &str = "captured-image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Live { facing: Facing },
    Still(ImagePayload),
}

/// Owns the camera stream and the currently displayed still.
///
/// At most one device handle is held at a time. The stream is opened lazily for the
/// live preview and released once a still is produced, before a facing switch, and
/// when the controller is dropped.
pub struct CaptureController {
    device: Option<Arc<dyn CameraDevice>>,
    facing: Facing,
    stream: Option<Box<dyn FrameStream>>,
    still: Option<ImagePayload>,
}

impl CaptureController {
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self {
            device: Some(device),
            facing: Facing::default(),
            stream: None,
            still: None,
        }
    }

    /// A controller that can only accept selected files.
    pub fn without_camera() -> Self {
        Self {
            device: None,
            facing: Facing::default(),
            stream: None,
            still: None,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn still(&self) -> Option<&ImagePayload> {
        self.still.as_ref()
    }

    /// Live preview while no image is held, otherwise the held still.
    pub fn preview(&mut self) -> Result<Preview, CaptureError> {
        if let Some(still) = &self.still {
            return Ok(Preview::Still(still.clone()));
        }
        self.ensure_stream()?;
        Ok(Preview::Live {
            facing: self.facing,
        })
    }

    pub fn capture(&mut self) -> Result<ImagePayload, CaptureError> {
        if self.still.is_some() {
            return Err(CaptureError::StillDisplayed);
        }
        let stream = self.ensure_stream()?;
        let frame = stream.read_frame()?;
        let payload = decode_image(frame, None)?;
        log::info!(
            "captured {} ({} bytes, {})",
            payload.content_type,
            payload.len(),
            self.facing.as_str()
        );
        Ok(self.hold(payload))
    }

    /// Accepts a user-chosen image held in memory.
    pub fn select_bytes(
        &mut self,
        bytes: Vec<u8>,
        filename: Option<&str>,
    ) -> Result<ImagePayload, CaptureError> {
        let payload = decode_image(bytes, filename)?;
        log::info!(
            "selected {} ({} bytes)",
            payload.filename,
            payload.len()
        );
        Ok(self.hold(payload))
    }

    pub fn select_file(&mut self, path: &Path) -> Result<ImagePayload, CaptureError> {
        let bytes = std::fs::read(path).map_err(|source| CaptureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.file_name().and_then(|n| n.to_str());
        self.select_bytes(bytes, filename)
    }

    /// Toggles the facing mode. The current stream is released first; the next preview
    /// reopens on the new side.
    pub fn switch_facing(&mut self) -> Facing {
        self.stop();
        self.facing = self.facing.toggle();
        log::info!("facing: {}", self.facing.as_str());
        self.facing
    }

    /// Drops the held still so the live preview comes back.
    pub fn retake(&mut self) {
        if self.still.take().is_some() {
            log::info!("still discarded; back to live preview");
        }
    }

    /// Puts back the still that was displayed before a capture the store turned down.
    pub fn restore_still(&mut self, still: Option<ImagePayload>) {
        if still.is_some() {
            self.stop();
        }
        self.still = still;
    }

    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            log::debug!("stopping camera stream ({})", stream.facing().as_str());
        }
    }

    fn ensure_stream(&mut self) -> Result<&mut Box<dyn FrameStream>, CaptureError> {
        if self.stream.is_none() {
            let device = self.device.as_ref().ok_or(CaptureError::NoDevice)?;
            self.stream = Some(device.open(self.facing)?);
        }
        self.stream.as_mut().ok_or(CaptureError::NoDevice)
    }

    fn hold(&mut self, payload: ImagePayload) -> ImagePayload {
        self.stop();
        self.still = Some(payload.clone());
        payload
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Validates that `bytes` decode as an image and builds the payload.
///
/// The content type is sniffed from the bytes, never taken from the filename.
pub fn decode_image(bytes: Vec<u8>, filename: Option<&str>) -> Result<ImagePayload, CaptureError> {
    if bytes.is_empty() {
        return Err(CaptureError::unsupported("empty file"));
    }
    let format = image::guess_format(&bytes)
        .map_err(|e| CaptureError::unsupported(format!("unrecognized image data: {e}")))?;
    image::load_from_memory_with_format(&bytes, format).map_err(|e| {
        CaptureError::unsupported(format!("{} does not decode: {e}", format.to_mime_type()))
    })?;

    let filename = match filename {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            let ext = format.extensions_str().first().copied().unwrap_or("img");
            format!("{CAPTURED_STEM}.{ext}")
        }
    };

    Ok(ImagePayload::new(bytes, format.to_mime_type(), filename))
}
