//! Diff engine for Riki page history.
//!
//! Compares two versions of a page character by character and renders the
//! difference as addition/subtraction markup for display.
//!
//! # Key Types
//!
//! - [`EditScript`] / [`EditOp`] -- Keep/Insert/Delete operations over `char`s
//! - [`DiffEngine`] / [`DiffConfig`] -- LCS alignment with a Myers fallback for large inputs
//! - [`ChangeRenderer`] / [`SpanStyle`] / [`RenderedChange`] -- Span markup output

pub mod engine;
pub mod render;
pub mod script;

pub use engine::{diff_texts, DiffConfig, DiffEngine, DiffStrategy};
pub use render::{ChangeRenderer, RenderedChange, SpanStyle};
pub use script::{EditOp, EditScript, Run, RunKind};
