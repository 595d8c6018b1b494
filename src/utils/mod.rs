//! Shared validation helpers and resource limits.

pub mod validation;
