use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame.
pub struct AppLayout {
    pub input_area: Rect,
    pub results_area: Rect,
    /// Present only while a note preview is open; takes the right half.
    pub preview_area: Option<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, show_preview: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query input (bordered)
                Constraint::Min(3),    // Results / preview
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let (results_area, preview_area) = if show_preview {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(vertical_chunks[1]);
            (halves[0], Some(halves[1]))
        } else {
            (vertical_chunks[1], None)
        };

        Self {
            input_area: vertical_chunks[0],
            results_area,
            preview_area,
            status_area: vertical_chunks[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_preview() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), false);

        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.results_area.width, 100);
        assert!(layout.preview_area.is_none());
    }

    #[test]
    fn test_layout_with_preview_splits_in_half() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), true);

        assert_eq!(layout.results_area.width, 50);
        let preview = layout.preview_area.unwrap();
        assert_eq!(preview.width, 50);
        assert_eq!(preview.x, 50);
    }

    #[test]
    fn test_layout_minimum_height() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 7), false);

        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.results_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
    }
}
