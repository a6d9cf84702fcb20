#![allow(ambiguous_glob_reexports)]

pub mod initialize;
pub mod quote;
pub mod unlock;

pub use initialize::*;
pub use quote::*;
pub use unlock::*;
