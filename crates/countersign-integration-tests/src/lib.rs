//! Integration tests for the countersign workspace.
//!
//! Everything lives under `tests/`; this library target exists only so
//! the crate can be a workspace member.

#![deny(unsafe_code)]
