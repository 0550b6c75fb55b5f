//! Controller tunables.
//!
//! Defaults reproduce the shipped behavior of the web app: 1750 ms message
//! lifetime, `SUI_STATE`/`SUI_FLAGS` storage keys, and logged (not surfaced)
//! storage write failures.

/// Durable key of the persisted state snapshot.
pub const STATE_KEY: &str = "SUI_STATE";
/// Durable key of the behavioral flag store.
pub const FLAGS_KEY: &str = "SUI_FLAGS";
/// Lifetime of a message in milliseconds.
pub const MESSAGE_TTL_MS: u64 = 1750;

/// How message deadlines interact when messages overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageExpiry {
    /// Every message expires at its own deadline.
    #[default]
    PerMessage,
    /// Only the newest message is armed; a new message cancels the previous
    /// deadline, leaving older messages on screen until reset.
    LatestOnly,
}

/// Visibility of storage read and write failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Emit a `warn` log line and continue.
    #[default]
    Log,
    /// Drop the failure without a trace.
    Silent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub message_ttl_ms: u64,
    pub message_expiry: MessageExpiry,
    pub storage_failures: FailurePolicy,
    pub state_key: String,
    pub flags_key: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            message_ttl_ms: MESSAGE_TTL_MS,
            message_expiry: MessageExpiry::default(),
            storage_failures: FailurePolicy::default(),
            state_key: STATE_KEY.to_string(),
            flags_key: FLAGS_KEY.to_string(),
        }
    }
}
