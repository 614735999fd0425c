//! Rate-limited receive diagnostics

use std::fmt;

/// Lines emitted before a `RateLimitedLog` goes quiet.
pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 5;

/// Emits at most `limit` warnings over its lifetime.
///
/// Owned by the filter that reports through it, so each receive context
/// counts its own lines.
#[derive(Debug, Clone)]
pub struct RateLimitedLog {
    limit: usize,
    emitted: usize,
}

impl Default for RateLimitedLog {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGNOSTIC_LIMIT)
    }
}

impl RateLimitedLog {
    pub fn new(limit: usize) -> Self {
        RateLimitedLog { limit, emitted: 0 }
    }

    /// Log `args` at warn level unless the budget is spent.
    /// Returns whether the line was emitted.
    pub fn emit(&mut self, args: fmt::Arguments<'_>) -> bool {
        if self.emitted >= self.limit {
            return false;
        }
        self.emitted += 1;
        log::warn!("{}", args);
        true
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
