// Visual symbols and emoji constants used throughout the application
// Using generic names that represent meaning rather than the specific emoji

/// Status and feedback symbols
pub const SYMBOL_INDICATOR_ERROR: &str = "❌";
pub const SYMBOL_INDICATOR_WARNING: &str = "⚠️";
pub const SYMBOL_INDICATOR_INFO: &str = "📋";

/// Process and action symbols
pub const SYMBOL_ACTION_REIFY: &str = "🧩";
