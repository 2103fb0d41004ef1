pub mod error;
pub mod phase;
pub mod session;

pub use error::SessionError;
pub use phase::Phase;
pub use session::{Session, SessionLimits};
