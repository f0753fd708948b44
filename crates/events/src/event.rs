use chrono::{DateTime, Utc};

/// A fact emitted by an aggregate's `handle` once every check has passed.
///
/// Applying an event never fails. Commit notifications carry each event's
/// `event_type` and `version` next to its JSON body so a mirror can decode it.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted identifier (e.g. "settlement.document.payment_recorded").
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    /// Business time supplied by the command, not the wall clock at commit.
    fn occurred_at(&self) -> DateTime<Utc>;
}
