//! Transport-free dialog logic: session states, admin actions, rendering
//! and the controller that ties them together.

pub mod access;
pub mod action;
pub mod controller;
pub mod ordinal;
pub mod render;
pub mod reply;
pub mod state;

pub use access::AdminSet;
pub use action::{AdminAction, ParseActionError};
pub use controller::{Controller, Inbound, Transition};
pub use reply::{Button, Keyboard, Outbound, Target};
pub use state::{Draft, SessionState, Step};
