//! Tests for shortcut stores
//!
//! Split by concern:
//! - `parser_tests`: store file syntax, quoting, rendering
//! - `file_store_tests`: FileStore, StoreTransaction, backups
//! - `memory_store_tests`: MemoryStore staging semantics

#[cfg(test)]
mod file_store_tests;
