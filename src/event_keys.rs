//! Keys used in Gerrit event JSON objects.

/// Approval category, like `Code-Review`.
pub const TYPE: &str = "type";
/// Approval value, like `+2`.
pub const VALUE: &str = "value";
/// The account that gave an approval.
pub const BY: &str = "by";
/// Whether an approval was updated. Only sent by newer Gerrit versions.
pub const UPDATED: &str = "updated";
/// The approval value before it was updated.
pub const OLD_VALUE: &str = "oldValue";
/// The approvals attached to an event.
pub const APPROVALS: &str = "approvals";
/// The account that caused an event.
pub const AUTHOR: &str = "author";

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const USERNAME: &str = "username";
