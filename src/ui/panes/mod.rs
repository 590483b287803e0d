//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and line numbers
//! - [`tree`]: The flattened AST with fold markers and the selected row
//! - [`status`]: Status bar with keybindings and the selected node
//!
//! Each pane module exports a primary `render_*` function that draws from
//! borrowed state and only mutates the scroll offset it is handed.

pub mod source;
pub mod status;
pub mod tree;

pub use source::render_source_pane;
pub use status::render_status_bar;
pub use tree::render_tree_pane;
