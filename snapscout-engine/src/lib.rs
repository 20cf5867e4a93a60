pub mod state;
pub mod store;
pub mod traits;

pub use state::{DropReason, Outcome, Stage, ViewState};
pub use store::{PendingCall, ViewStore};
pub use traits::ShopBackend;
