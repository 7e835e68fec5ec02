use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::component::EditorComponent;

/// Draw the demo screen: title bar, the bound editor, the event feed,
/// and a status bar.
pub fn draw(f: &mut Frame, component: &EditorComponent, events: &[String], show_events: bool) {
    let mut constraints = vec![
        Constraint::Length(1), // Title bar
        Constraint::Min(3),    // Editor area
    ];
    if show_events {
        constraints.push(Constraint::Length(8)); // Event feed
    }
    constraints.push(Constraint::Length(2)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    draw_title_bar(f, component, chunks[0]);
    draw_editor(f, component, chunks[1]);
    if show_events {
        draw_event_feed(f, events, chunks[2]);
    }
    draw_status_bar(f, component, *chunks.last().expect("status chunk"));
}

fn draw_title_bar(f: &mut Frame, component: &EditorComponent, area: Rect) {
    let node = component.render();
    let title = format!(
        "  Plume -- {}{}",
        node.id.as_deref().unwrap_or("[unnamed]"),
        if component.props().read_only {
            " [Read-Only]"
        } else {
            ""
        }
    );

    let widget = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(widget, area);
}

fn draw_editor(f: &mut Frame, component: &EditorComponent, area: Rect) {
    let node = component.render();
    let focused = component.widget().map(|w| w.has_focus()).unwrap_or(false);

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!("{} (gen {})", node.class_attr(), node.key));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(widget) = component.widget() else {
        let unmounted = Paragraph::new("[unmounted]")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(unmounted, inner);
        return;
    };

    let contents = widget.contents();
    if contents.is_empty() {
        if let Some(placeholder) = widget.placeholder() {
            let hint = Paragraph::new(placeholder.to_string())
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            f.render_widget(hint, inner);
        }
    } else {
        let body = Paragraph::new(contents.clone())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });
        f.render_widget(body, inner);
    }

    // Place the terminal cursor at the caret
    if let Some(selection) = widget.selection() {
        let (line, col) = line_col_at(&contents, selection.index);
        let x = inner.x + col;
        let y = inner.y + line;
        if x < inner.x + inner.width && y < inner.y + inner.height {
            f.set_cursor(x, y);
        }
    }
}

fn draw_event_feed(f: &mut Frame, events: &[String], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("events");

    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    let lines: Vec<Line> = events
        .iter()
        .rev()
        .take(visible)
        .map(|event| Line::from(Span::styled(event.clone(), Style::default().fg(Color::Gray))))
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status_bar(f: &mut Frame, component: &EditorComponent, area: Rect) {
    let selection = component
        .selection()
        .map(|range| format!("{},{}", range.index, range.end()))
        .unwrap_or_else(|| String::from("none"));

    let status = format!(
        " gen {} | theme {} | sel {} | {} chars",
        component.generation(),
        component.props().theme,
        selection,
        component.widget().map(|w| w.length()).unwrap_or(0),
    );
    let hint = " Ctrl+Q quit | Ctrl+R read-only | Ctrl+T theme | Ctrl+L load sample";

    let lines = vec![
        Line::from(Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Line and column of a character index, counted in characters.
fn line_col_at(contents: &str, index: usize) -> (u16, u16) {
    let mut line = 0u16;
    let mut col = 0u16;
    for c in contents.chars().take(index) {
        if c == '\n' {
            line = line.saturating_add(1);
            col = 0;
        } else {
            col = col.saturating_add(1);
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_at_tracks_newlines() {
        assert_eq!(line_col_at("hello", 3), (0, 3));
        assert_eq!(line_col_at("ab\ncd", 3), (1, 0));
        assert_eq!(line_col_at("ab\ncd", 5), (1, 2));
        assert_eq!(line_col_at("", 0), (0, 0));
    }
}
