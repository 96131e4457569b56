//! Text line protocol.
//!
//! Translates the serial command vocabulary (`HELLO`, `RPM:60 ROT:2 DIR:CW`,
//! `STATUS`, ...) into controller operations, and renders replies, events and
//! status snapshots back into lines. Nothing here allocates.

mod command;
mod response;
mod session;

pub use command::Command;
pub use response::{EventLine, Reply, StatusLine};
pub use session::{dispatch, handle_line};
