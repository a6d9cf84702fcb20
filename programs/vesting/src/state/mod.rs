pub mod vesting;

pub use vesting::*;
