//! Test modules for vtkcrate-io
//!
//! Handler-level tests that exercise parse and write against files on disk.

pub mod handler_tests;
