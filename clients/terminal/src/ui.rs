use crate::app::{App, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use tennis_core::{
    render::{BALL_CHAR, NET_CHAR},
    RenderHelper, Side, Status, View,
};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Create layout with title and content
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let title = Paragraph::new(format!(
            "Tennis - first to {} wins",
            self.game.config.winning_score
        ))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Tennis")
                .title_alignment(Alignment::Center),
        );
        title.render(chunks[0], buf);

        self.render_game_screen(chunks[1], buf);
    }
}

impl App {
    fn render_game_screen(&self, area: Rect, buf: &mut Buffer) {
        // Check if terminal is too small
        if self.ui_paused {
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
                MIN_GAME_WIDTH,
                MIN_GAME_HEIGHT,
                self.terminal_size.0,
                self.terminal_size.1
            );

            let resize_widget = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .title("⚠ Resize Required ⚠")
                        .title_alignment(Alignment::Center),
                );
            resize_widget.render(area, buf);
            return;
        }

        let Some(game_area) = self.calculate_centered_game_area(area) else {
            return;
        };
        let view = self.game.view();

        // Create layout for score + field + controls within centered area
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score
                Constraint::Min(10),   // Field
                Constraint::Length(3), // Controls
            ])
            .split(game_area);

        let score_content = format!(
            "Player {}  -  {} AI    {}",
            view.score.player,
            view.score.ai,
            self.game.status_string()
        );
        let score_widget = Paragraph::new(score_content)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Score")
                    .title_alignment(Alignment::Center),
            );
        score_widget.render(chunks[0], buf);

        if view.is_over {
            self.render_game_over(chunks[1], buf, &view);
        } else {
            self.render_field(chunks[1], buf, &view);
        }

        let controls_text = if view.is_over {
            "R: Restart  Q: Quit".to_string()
        } else {
            format!("↑/W ↓/S: Move  Q/ESC: Quit    Input: {}", self.input_mode())
        };
        let controls_widget = Paragraph::new(controls_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Controls")
                    .title_alignment(Alignment::Center),
            );
        controls_widget.render(chunks[2], buf);
    }

    /// Draw paddles, net and ball through the core's grid mapping
    fn render_field(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let cols = area.width.saturating_sub(2) as usize;
        let rows = area.height.saturating_sub(2) as usize;

        if cols == 0 || rows == 0 {
            return; // Too small to render
        }

        let helper = RenderHelper::new(cols, rows, &self.game.config);
        let lines: Vec<Line> = helper
            .frame_lines(view)
            .iter()
            .map(|line| styled_line(line))
            .collect();

        let title = match view.status {
            Status::ServePending(_) => "Point!",
            _ => "Court",
        };
        let field_widget = Paragraph::new(lines)
            .style(Style::default().fg(Color::White))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title)
                    .title_alignment(Alignment::Center),
            );
        field_widget.render(area, buf);
    }

    fn render_game_over(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let winner_color = match self.game.winner() {
            Some(Side::Player) => Color::Green,
            _ => Color::Red,
        };

        let mut lines = vec![Line::from(""); (area.height.saturating_sub(6) / 2) as usize];
        lines.push(Line::from(Span::styled(
            "GAME OVER",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            view.winner_label.unwrap_or_default(),
            Style::default().fg(winner_color),
        )));

        let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Court")
                .title_alignment(Alignment::Center),
        );
        widget.render(area, buf);
    }
}

/// Color the ball and dim the net, everything else keeps the base style
fn styled_line(line: &str) -> Line<'static> {
    let spans: Vec<Span> = line
        .chars()
        .map(|c| match c {
            BALL_CHAR => Span::styled(c.to_string(), Style::default().fg(Color::Green)),
            NET_CHAR => Span::styled(c.to_string(), Style::default().fg(Color::DarkGray)),
            _ => Span::raw(c.to_string()),
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_line_keeps_text() {
        let line = styled_line("█ ┊ ●");

        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[4].style.fg, Some(Color::Green));
        assert_eq!(line.spans[2].style.fg, Some(Color::DarkGray));
        assert_eq!(line.spans[0].content, "█");
    }
}
