//! Wireless link supervision
//!
//! The supervisor establishes, monitors and recovers the link with
//! bounded retries and a cooldown after exhaustion. Connect attempts
//! never block: completion arrives later as a [`LinkEvent`].
//!
//! [`LinkEvent`]: crate::traits::LinkEvent

pub mod events;
pub mod state;
pub mod supervisor;

pub use events::LinkInput;
pub use state::LinkState;
pub use supervisor::{ConnectionAttempt, LinkEffects, LinkSupervisor, StatusView, Transition};
