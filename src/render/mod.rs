//! Plain-text line rendering for element subtrees.
//!
//! Hosts composite these lines into their own frames; widgets never write
//! output themselves. Output is width-bounded: every line is truncated to
//! the requested column count by visible width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::node::{NodeHandle, NodeKind};

/// Renders `node`'s subtree to display lines at the given width.
pub fn render_lines(node: &NodeHandle, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    render_into(node, width, &mut lines);
    lines
}

fn render_into(node: &NodeHandle, width: usize, lines: &mut Vec<String>) {
    match node.kind() {
        NodeKind::Division | NodeKind::Header | NodeKind::Footer => {
            for child in node.children() {
                render_into(&child, width, lines);
            }
        }
        NodeKind::Heading => lines.push(truncate_to_width(&node.text(), width)),
        NodeKind::Button => {
            lines.push(truncate_to_width(&format!("[{}]", node.text()), width));
        }
        NodeKind::Link | NodeKind::Area => {
            lines.push(truncate_to_width(&node.text(), width));
        }
        NodeKind::TextInput | NodeKind::DateInput => {
            let value = node.value();
            let display = if value.is_empty() {
                node.attr("placeholder").unwrap_or_default()
            } else {
                value
            };
            lines.push(truncate_to_width(&format!("> {display}"), width));
        }
        NodeKind::Select | NodeKind::TextArea => {
            lines.push(truncate_to_width(&node.value(), width));
        }
        NodeKind::Table => render_table(node, width, lines),
        // Row and cell nodes outside a table render as bare text.
        NodeKind::TableRow | NodeKind::TableCell | NodeKind::TableHeaderCell => {
            lines.push(truncate_to_width(&node.text(), width));
        }
    }
}

fn render_table(table: &NodeHandle, width: usize, lines: &mut Vec<String>) {
    let rows: Vec<(bool, Vec<String>)> = table
        .children()
        .into_iter()
        .filter(|child| child.kind() == NodeKind::TableRow)
        .map(|row| {
            let header = row
                .children()
                .iter()
                .any(|cell| cell.kind() == NodeKind::TableHeaderCell);
            let cells = row
                .children()
                .into_iter()
                .filter(|cell| {
                    matches!(
                        cell.kind(),
                        NodeKind::TableCell | NodeKind::TableHeaderCell
                    )
                })
                .map(|cell| cell.text())
                .collect();
            (header, cells)
        })
        .collect();
    if rows.is_empty() {
        return;
    }

    let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for (_, cells) in &rows {
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.width());
        }
    }

    for (header, cells) in &rows {
        let mut line = String::new();
        for (index, column_width) in widths.iter().enumerate() {
            if index > 0 {
                line.push_str("  ");
            }
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            line.push_str(cell);
            line.push_str(&" ".repeat(column_width.saturating_sub(cell.width())));
        }
        let line = truncate_to_width(line.trim_end(), width);
        lines.push(line.clone());
        if *header {
            lines.push("-".repeat(line.width().min(width)));
        }
    }
}

fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        if used + char_width > width {
            break;
        }
        used += char_width;
        out.push(ch);
    }
    out
}
