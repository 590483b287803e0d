//! Terminal AST viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, folding
//! - **[`tree`]**: flattening of the AST into rows with stable node ids
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   tree, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the source text
//! and its parsed AST and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;
pub mod tree;

pub use app::App;
