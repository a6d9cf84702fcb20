pub mod authority;
pub mod checks;
pub mod schedule;
