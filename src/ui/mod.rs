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

//! Toolkit-independent shortcut preferences logic (MVC without the V)
//!
//! # Architecture
//!
//! - **Model**: `Registry`, `ConflictDetector` (in `core`), `ShortcutStore` (in `config`)
//! - **Controller**: `AssignmentController` (in `controller.rs`)
//! - **View projection**: rows, info text and target text (in `view.rs`)
//!
//! Rendering belongs to whichever toolkit embeds this crate; it redraws
//! from the projection after every controller call.
//!
//! # Module Structure
//!
//! ```text
//! ui/
//! ├── mod.rs          // This file - exports
//! ├── controller.rs   // Selection/editing state machine
//! └── view.rs         // Display projection
//! ```

pub mod controller;
pub mod view;

pub use controller::{AssignmentController, FocusTarget, KeyResponse, SaveOutcome, Selection};
pub use view::ShortcutRow;

#[cfg(test)]
mod tests;
