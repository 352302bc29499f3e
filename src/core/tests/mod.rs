//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Conflict detection tests
//! - Key event normalisation tests
//! - Registry tests (load, save, reset, filter)
//! - Type tests (KeySequence, ShortcutEntry, etc.)

#[cfg(test)]
mod conflict_tests;
#[cfg(test)]
mod registry_tests;
