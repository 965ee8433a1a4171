/// Minimum lead time for a reminder, in minutes
pub const MIN_REMINDER_MINUTES: i64 = 1;

/// Maximum lead time for a reminder, in minutes (24 hours)
pub const MAX_REMINDER_MINUTES: i64 = 1440;

/// Lead time of the pre-notification before a reminder fires
pub const PRE_NOTIFY_LEAD_SECS: i64 = 300;

/// Delay before the single retry of a failed notification send
pub const SEND_RETRY_DELAY_SECS: u64 = 5;

// =============================================================================
// Usage Messages
// =============================================================================

pub const USAGE_NOTE: &str = "Usage: /note <title> <text...> [#category]";

pub const USAGE_EDITNOTE: &str = "Usage: /editnote <id> <title> <text...> [#category]";

pub const USAGE_SEARCH: &str = "Usage: /search <query...>";

pub const USAGE_REMIND: &str = "Usage: /remind <minutes> <text...> [daily|weekly]";

pub const USAGE_EDITREMINDER: &str = "Usage: /editreminder <id> <minutes> <text...> [daily|weekly]";

pub const USAGE_DELETE: &str = "Usage: /delete <note|reminder|media> <id>";

pub const USAGE_FILE: &str = "Usage: /file <media-id>";

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for an out-of-range reminder lead time
pub const ERR_REMINDER_MINUTES: &str =
    "Please give a time between 1 and 1440 minutes (24 hours)";

/// Generic failure message shown when an internal error is caught at the
/// transport boundary
pub const MSG_GENERIC_FAILURE: &str = "⚠️ Something went wrong. Please try again later.";
