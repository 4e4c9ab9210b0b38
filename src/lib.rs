//! Typed Gerrit event attributes.
//!
//! Gerrit's `stream-events` JSON changes shape between server versions. The types here read
//! whatever a server sends, and [`persisted`] upgrades approvals saved in older formats.

pub mod account;
pub mod approval;
pub mod approval_score;
pub mod approval_table;
pub mod event_keys;
pub mod event_stream;
pub mod json_object;
pub mod persisted;
