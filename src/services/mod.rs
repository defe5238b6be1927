//! Database operations behind the handlers and the sweep binary.
//!
//! Each lending transition runs in one transaction; notifications are queued
//! only after commit.

pub mod catalog;
pub mod interaction;
pub mod lending;
pub mod reminders;
pub mod users;
