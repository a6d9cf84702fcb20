//! Program-wide constants.

/// Anchor account discriminator length prefixed to every program-owned account.
pub const DISCRIMINATOR_LEN: usize = 8;
