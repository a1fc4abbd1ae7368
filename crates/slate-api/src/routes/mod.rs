//! API route definitions.

pub mod budget;
