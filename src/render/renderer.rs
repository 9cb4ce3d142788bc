use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameConfig, GameOverCause, GameState, Position};
use crate::metrics::SessionMetrics;

pub struct Renderer {
    border_cells: i32,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            border_cells: config.border_cells(),
        }
    }

    /// Draw one frame from a read-only snapshot of the game state
    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let board_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_over() {
            frame.render_widget(self.render_game_over(state), board_area);
        } else {
            frame.render_widget(self.render_board(board_area, state), board_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_stats(&self, state: &GameState, metrics: &SessionMetrics) -> Paragraph<'_> {
        let line = Line::from(vec![
            Span::styled(
                format!("Score: {}", state.score),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled(
                format!("High Score: {}", metrics.high_score),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("    "),
            Span::styled(
                format!("Time: {}s", state.time_left),
                Style::default().fg(if state.time_left <= 10 {
                    Color::Red
                } else {
                    Color::White
                }),
            ),
        ]);

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_board(&self, _area: Rect, state: &GameState) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height as usize);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width as usize);

            for x in 0..state.grid_width {
                let pos = Position::new(x, y);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.body.contains(&pos) {
                    Span::styled("■ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled("■ ", Style::default().fg(Color::Red))
                } else if self.is_border(state, pos) {
                    Span::styled("▒▒", Style::default().fg(Color::DarkGray))
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
    }

    /// The decorative border ring. The snake may still pass through it:
    /// movement wraps on the full grid.
    fn is_border(&self, state: &GameState, pos: Position) -> bool {
        pos.x < self.border_cells
            || pos.y < self.border_cells
            || pos.x >= state.grid_width - self.border_cells
            || pos.y >= state.grid_height - self.border_cells
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let cause = match state.over {
            Some(GameOverCause::TimeUp) => "Time's up!",
            Some(GameOverCause::SelfCollision) => "You ran into yourself!",
            None => "",
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(cause),
            Line::from(format!("Final score: {}", state.score)),
            Line::from(""),
            Line::from(Span::styled(
                "Press C to play again or Q to quit",
                Style::default().fg(Color::White),
            )),
        ];

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let line = Line::from(vec![
            Span::raw("point to steer"),
            Span::raw("  |  "),
            Span::styled("C", Style::default().fg(Color::Yellow)),
            Span::raw(": restart"),
            Span::raw("  |  "),
            Span::styled("Q", Style::default().fg(Color::Yellow)),
            Span::raw(": quit"),
        ]);

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }
}
