mod manager;
mod shuffle;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use manager::SessionManager;
pub use shuffle::shuffle_cards;
pub use workflow::SessionWorkflow;
