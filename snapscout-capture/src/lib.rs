pub mod controller;
pub mod device;
pub mod error;

pub use controller::{CaptureController, Preview, decode_image};
pub use device::{CameraDevice, Facing, FileCamera, FrameStream};
pub use error::CaptureError;
