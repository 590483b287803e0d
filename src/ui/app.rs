//! Main TUI application state and logic

use crate::parser::ast::Node;
use crate::ui::tree::{self, TreeRow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashSet;
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The source code that was parsed
    pub source_code: String,

    /// The parsed program
    pub ast: Node,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tree_scroll: usize,

    /// Index of the selected row in `rows`
    pub selected: usize,

    /// Pre-order ids of folded nodes
    pub collapsed: FxHashSet<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    rows: Vec<TreeRow>,
    total_nodes: usize,
}

impl App {
    /// Create a new app with the given source code and its AST
    pub fn new(source_code: String, ast: Node) -> Self {
        let collapsed = FxHashSet::default();
        let rows = tree::flatten(&ast, &collapsed);
        let total_nodes = tree::subtree_size(&ast);
        App {
            source_code,
            ast,
            focused_pane: FocusedPane::Tree,
            source_scroll: 0,
            tree_scroll: 0,
            selected: 0,
            collapsed,
            should_quit: false,
            status_message: String::from("Ready!"),
            rows,
            total_nodes,
        }
    }

    /// Rows currently visible in the tree pane
    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.rows.get(self.selected)
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Two panes side by side, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            columns[1],
            &self.rows,
            self.selected,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.rows.get(self.selected),
            self.total_nodes,
        );
    }

    /// Handle keyboard events
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_sub(1);
                }
                FocusedPane::Tree => {
                    self.selected = self.selected.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_add(1);
                }
                FocusedPane::Tree => {
                    if self.selected + 1 < self.rows.len() {
                        self.selected += 1;
                    }
                }
            },
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Left => self.set_selected_folded(true),
            KeyCode::Right => self.set_selected_folded(false),
            KeyCode::Char('c') => {
                self.collapsed = tree::expandable_ids(&self.ast);
                // keep the root open so the top-level statements stay visible
                self.collapsed.remove(&0);
                self.refresh_rows();
                self.status_message = "Folded all nodes".to_string();
            }
            KeyCode::Char('e') => {
                self.collapsed.clear();
                self.refresh_rows();
                self.status_message = "Unfolded all nodes".to_string();
            }
            _ => {}
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            let fold = !row.collapsed;
            self.set_selected_folded(fold);
        }
    }

    fn set_selected_folded(&mut self, fold: bool) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if !row.expandable {
            self.status_message = format!("'{}' has no children", row.label);
            return;
        }

        let id = row.id;
        let label = row.label.clone();
        if fold {
            self.collapsed.insert(id);
            self.status_message = format!("Folded '{}'", label);
        } else {
            self.collapsed.remove(&id);
            self.status_message = format!("Unfolded '{}'", label);
        }
        self.refresh_rows();
    }

    /// Rebuild the visible rows, keeping the selection on the same node
    /// (or its nearest visible ancestor).
    fn refresh_rows(&mut self) {
        let selected_id = self.selected_row().map(|row| row.id).unwrap_or(0);
        self.rows = tree::flatten(&self.ast, &self.collapsed);
        self.selected = self
            .rows
            .iter()
            .rposition(|row| row.id <= selected_id)
            .unwrap_or(0);
    }
}
