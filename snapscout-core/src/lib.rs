pub mod chat;
pub mod config;
pub mod error;
pub mod product;
pub mod types;

pub use chat::*;
pub use config::*;
pub use error::*;
pub use product::*;
pub use types::*;
