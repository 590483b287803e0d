//! AST tree pane rendering

use crate::ui::theme::DEFAULT_THEME;
use crate::ui::tree::{NodeCategory, TreeRow};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn category_style(category: NodeCategory) -> Style {
    match category {
        NodeCategory::Sequence => Style::default().fg(DEFAULT_THEME.comment),
        NodeCategory::Statement => Style::default()
            .fg(DEFAULT_THEME.statement)
            .add_modifier(Modifier::BOLD),
        NodeCategory::Expression => Style::default().fg(DEFAULT_THEME.expression),
        NodeCategory::Literal => Style::default().fg(DEFAULT_THEME.number),
    }
}

/// Keep `selected` inside the window that starts at `scroll_offset`.
pub fn scroll_to_selection(scroll_offset: &mut usize, selected: usize, visible_height: usize) {
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }
}

/// Render the AST tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[TreeRow],
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    scroll_to_selection(scroll_offset, selected, visible_height);

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, row)| {
            let marker = match (row.expandable, row.collapsed) {
                (false, _) => "  ",
                (true, true) => "▸ ",
                (true, false) => "▾ ",
            };

            let mut spans = vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(row.label.clone(), category_style(row.category)),
            ];

            if idx == selected {
                for span in &mut spans {
                    span.style = span.style.patch(Style::default().bg(DEFAULT_THEME.current_line_bg));
                }
                spans.insert(
                    0,
                    Span::styled("→", Style::default().fg(DEFAULT_THEME.secondary)),
                );
            } else {
                spans.insert(0, Span::raw(" "));
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
