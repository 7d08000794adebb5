//! Example programs
//!
//! Each program is a `go` entry point written against the collaborator traits
//! in [`crate::api`]. Bind them to the linked symbols to build a real object, or
//! to test doubles to check which calls they make.

pub mod basic;
pub mod custom_api;
