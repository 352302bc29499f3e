// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/mod.rs
//!
//! Core shortcut logic
//!
//! This module contains the data structures and algorithms for
//! keyboard shortcut management, including:
//! - Raw key events and canonical key sequences
//! - Per-platform key event normalisation
//! - Conflict detection by canonical sequence
//! - The shortcut registry (load, save, reset, filter)
//!
//! Everything here is independent of any display toolkit, so it can be
//! unit tested without a display server.

pub mod conflict;
pub mod key;
pub mod normalizer;
pub mod registry;
pub mod types;

pub use conflict::{detect, Conflict, ConflictDetector, ConflictGroups};
pub use key::{Key, ModifierSet, Platform, RawKeyEvent};
pub use normalizer::{translator_for, KeyEventTranslator, Rejection};
pub use registry::Registry;
pub use types::*;

#[cfg(test)]
mod tests;
