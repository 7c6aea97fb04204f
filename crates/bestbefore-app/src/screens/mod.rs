//! Per-screen state, mutated through discrete intents.
//!
//! Each screen owns its observable state exclusively; async intents borrow
//! the [`crate::context::AppContext`] for network and storage and fold every
//! failure into the screen's inline `error_message`.

pub mod hallway;
pub mod login;
pub mod profile;
pub mod room;
pub mod signup;
