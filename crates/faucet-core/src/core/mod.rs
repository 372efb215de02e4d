//! core faucet logic - platform agnostic
//!
//! crux-style:
//! - `update` is pure and returns effects
//! - the shell runs effects and feeds their results back as events
//! - async results carry the generation they were started with

pub mod app;
pub mod effect;
pub mod event;

pub use app::FaucetCore;
pub use effect::{Effect, NotificationLevel};
pub use event::Event;
