//! Stable exit codes for reasoner CLI commands.

/// Command succeeded; for `solve`, the answer passed verification.
pub const OK: i32 = 0;
/// Invalid config, arguments, or another error before a run could finish.
pub const INVALID: i32 = 1;
/// `reasoner solve` exhausted its retries without a passing verification.
pub const UNVERIFIED: i32 = 2;
