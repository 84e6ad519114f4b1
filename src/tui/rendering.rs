use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::app::{MessageType, Preview, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::format_age;
use crate::models::SearchHit;

const FRAGMENT_COLOR: Color = Color::DarkGray;
const MATCH_COLOR: Color = Color::Magenta;
const BORDER_COLOR: Color = Color::DarkGray;

/// Everything the renderer needs for one frame.
pub struct RenderState<'a> {
    pub query: &'a str,
    pub hits: &'a [SearchHit],
    pub selected: usize,
    pub preview: Option<&'a Preview>,
    pub reindexing: bool,
    pub searching: bool,
    pub query_error: Option<&'a str>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.preview.is_some());

    render_input(frame, layout.input_area, state.query, state.query_error.is_some());
    render_results(frame, layout.results_area, state.hits, state.selected);
    if let Some(preview) = state.preview
        && let Some(area) = layout.preview_area
    {
        render_preview(frame, area, preview);
    }
    render_status_bar(frame, layout.status_area, state);
}

fn render_input(frame: &mut Frame, area: Rect, query: &str, has_error: bool) {
    let input_style = if has_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(query, input_style)])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_COLOR))
            .title(" Search "),
    );
    frame.render_widget(paragraph, area);

    // Cursor just past the typed text, inside the border.
    let cursor_x = area.x + 1 + query.chars().count().min(area.width.saturating_sub(2) as usize) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_results(frame: &mut Frame, area: Rect, hits: &[SearchHit], selected: usize) {
    let items: Vec<ListItem> = hits
        .iter()
        .enumerate()
        .map(|(idx, hit)| {
            let is_selected = idx == selected;

            let title_style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let title = Line::from(vec![
                Span::styled(hit.path.display().to_string(), title_style),
                Span::raw(" "),
                Span::styled(format_age(&hit.mod_time), Style::default().fg(FRAGMENT_COLOR)),
            ]);

            ListItem::new(Text::from(vec![title, fragment_line(hit)]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_COLOR))
            .title(format!(" Results ({}) ", hits.len())),
    );
    frame.render_widget(list, area);
}

/// Fragment row with the matched terms styled, non-matches dimmed.
fn fragment_line(hit: &SearchHit) -> Line<'static> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for range in &hit.highlights {
        if range.start > cursor {
            spans.push(Span::styled(
                flatten(&hit.fragment[cursor..range.start]),
                Style::default().fg(FRAGMENT_COLOR),
            ));
        }
        spans.push(Span::styled(
            flatten(&hit.fragment[range.clone()]),
            Style::default().fg(MATCH_COLOR).add_modifier(Modifier::BOLD),
        ));
        cursor = range.end;
    }
    if cursor < hit.fragment.len() {
        spans.push(Span::styled(
            flatten(&hit.fragment[cursor..]),
            Style::default().fg(FRAGMENT_COLOR),
        ));
    }

    Line::from(spans)
}

/// Collapse a fragment segment onto one display line: newlines become a
/// return marker, runs of whitespace shrink to one space.
fn flatten(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut in_whitespace = false;

    for c in segment.chars() {
        if c == '\n' {
            out.push_str(" ↵ ");
            in_whitespace = true;
        } else if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }

    out
}

fn render_preview(frame: &mut Frame, area: Rect, preview: &Preview) {
    let paragraph = Paragraph::new(preview.content.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(format!(" {} ", preview.path.display())),
        )
        .wrap(Wrap { trim: false })
        .scroll((preview.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = if let Some(error) = state.query_error {
        (
            format!(" search failed: {error} "),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => Color::Green,
            MessageType::Error => Color::Red,
        };
        (format!(" {} ", message.text), Style::default().fg(color).bg(Color::Black))
    } else {
        let mut parts = Vec::new();
        if state.reindexing {
            parts.push("reindexing…".to_string());
        }
        if state.searching {
            parts.push("searching…".to_string());
        }
        if !state.hits.is_empty() {
            parts.push(format!("{}/{}", state.selected + 1, state.hits.len()));
        }
        parts.push("Enter: preview".to_string());
        parts.push("Ctrl+O: edit".to_string());
        parts.push("Ctrl+R: reindex".to_string());
        parts.push("Ctrl+C: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(Color::White).bg(Color::Black))
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Instant;

    use chrono::{TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn hit(path: &str, fragment: &str) -> SearchHit {
        SearchHit {
            path: PathBuf::from(path),
            fragment: fragment.to_string(),
            highlights: Vec::new(),
            mod_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn empty_state<'a>(hits: &'a [SearchHit], query: &'a str) -> RenderState<'a> {
        RenderState {
            query,
            hits,
            selected: 0,
            preview: None,
            reindexing: false,
            searching: false,
            query_error: None,
            status_message: None,
        }
    }

    #[test]
    fn test_render_ui_with_hits() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        let hits = [hit("/notes/a.md", "first fragment"), hit("/notes/b.md", "second fragment")];
        terminal.draw(|f| render_ui(f, &empty_state(&hits, "frag"))).unwrap();
    }

    #[test]
    fn test_render_ui_empty() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| render_ui(f, &empty_state(&[], ""))).unwrap();
    }

    #[test]
    fn test_render_ui_with_preview_pane() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        let hits = [hit("/notes/a.md", "fragment")];
        let preview = Preview {
            path: PathBuf::from("/notes/a.md"),
            content: "line one\nline two".to_string(),
            scroll: 0,
        };
        let mut state = empty_state(&hits, "");
        state.preview = Some(&preview);

        terminal.draw(|f| render_ui(f, &state)).unwrap();
    }

    #[test]
    fn test_render_ui_with_status_and_error() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        let message = StatusMessage {
            text: "✓ Indexed 3".to_string(),
            message_type: MessageType::Success,
            expires_at: Instant::now(),
        };
        let mut state = empty_state(&[], "abc");
        state.status_message = Some(&message);
        terminal.draw(|f| render_ui(f, &state)).unwrap();

        let mut state = empty_state(&[], "abc");
        state.query_error = Some("index is closed");
        state.reindexing = true;
        terminal.draw(|f| render_ui(f, &state)).unwrap();
    }

    #[test]
    fn test_fragment_line_splits_highlights() {
        let mut h = hit("/notes/a.md", "before match after");
        h.highlights = vec![7..12];

        let line = fragment_line(&h);
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["before ", "match", " after"]);
    }

    #[test]
    fn test_flatten_collapses_whitespace() {
        assert_eq!(flatten("a  b\tc"), "a b c");
        assert_eq!(flatten("one\ntwo"), "one ↵ two");
        assert_eq!(flatten("plain"), "plain");
    }
}
