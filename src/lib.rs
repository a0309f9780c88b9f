//! tui-keycmd (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_keycmd::{core,input,types}` so
//! applications depend on a single package while the implementation lives in
//! dedicated crates under `crates/`.

pub use tui_keycmd_core as core;
pub use tui_keycmd_input as input;
pub use tui_keycmd_types as types;
