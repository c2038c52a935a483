//! Safety limits for parsing find arguments
//!
//! Filter and include trees are recursive; the depth cap keeps pathological
//! input from exhausting the stack.

use crate::Error;

/// Default configuration for input limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of `where` and `include` trees (default: 32)
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum nesting depth
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate a nesting depth against limits
    ///
    /// # Errors
    /// Returns `Error::NestingTooDeep` when `depth` exceeds `max_depth`.
    pub fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.max_depth {
            return Err(Error::NestingTooDeep {
                max: self.max_depth,
            });
        }
        Ok(())
    }
}
