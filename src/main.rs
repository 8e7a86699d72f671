use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::stdout,
    time::{Duration, Instant},
};

use tetris::game::{Game, GameState};
use tetris::grid::{CellState, GRID_HEIGHT, GRID_WIDTH};
use tetris::input::{action_for_key, Action};
use tetris::sound::{effect_for_event, SoundSink, TerminalBell};
use tetris::tetromino::{Position, TetrominoType};

// ============================================================================
// Theme
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";

// Frame budget, independent of the gravity interval.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// All colors live here; the simulation core never sees them.
struct Theme {
    accent: Color,
    hint: Color,
    ghost: Color,
    overlay_bg: Color,
}

impl Theme {
    fn piece_color(&self, kind: TetrominoType) -> Color {
        match kind {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0),
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Magenta,
            TetrominoType::Z => Color::Red,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Yellow,
            hint: Color::DarkGray,
            ghost: Color::DarkGray,
            overlay_bg: Color::Black,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game, muted: bool, theme: &Theme) {
    let area = frame.size();

    match game.state {
        GameState::StartScreen => render_start_screen(frame, area, theme),
        GameState::Playing => render_game(frame, game, muted, theme, area),
        GameState::Paused => render_paused(frame, game, muted, theme, area),
        GameState::GameOver => render_game_over(frame, game, muted, theme, area),
    }
}

fn render_start_screen(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("T E T R I S", Style::default().fg(theme.accent))),
        Line::from(""),
        Line::from("Press ENTER to start"),
        Line::from(""),
        Line::from(Span::styled(
            "←→/AD: Move  ↑/W: Rotate  ↓/S: Soft Drop",
            Style::default().fg(theme.hint),
        )),
        Line::from(Span::styled(
            "Space: Hard Drop  P: Pause  M: Mute  Q/ESC: Quit",
            Style::default().fg(theme.hint),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tetris ")
            .title_alignment(Alignment::Center),
    );

    let popup_area = centered_rect(52, 11, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_game(frame: &mut Frame, game: &Game, muted: bool, theme: &Theme, area: Rect) {
    let grid_display_width = (GRID_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = GRID_HEIGHT as u16 + 2;
    let preview_width = 12;
    let info_width = 14;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, theme, horizontal[0]);
    render_preview(frame, game, theme, horizontal[1]);
    render_info(frame, game, muted, theme, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↑/W: Rotate | ↓/S: Drop | Space: Hard Drop | P: Pause | M: Mute | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.hint));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visual_grid = game.render_grid();

    // Landing preview, drawn only into cells the grid and piece leave empty.
    let ghost_blocks: Vec<Position> = game
        .ghost_piece()
        .map(|ghost| ghost.blocks())
        .unwrap_or_default();

    let mut lines: Vec<Line> = Vec::new();

    for y in 0..GRID_HEIGHT {
        let mut spans: Vec<Span> = Vec::new();

        for x in 0..GRID_WIDTH {
            let (symbol, style) = match visual_grid[y][x] {
                CellState::Filled(kind) => {
                    (BLOCK_CHAR, Style::default().fg(theme.piece_color(kind)))
                }
                CellState::Empty => {
                    let is_ghost = ghost_blocks
                        .iter()
                        .any(|block| block.x == x as i16 && block.y == y as i16);
                    if is_ghost {
                        (GHOST_CHAR, Style::default().fg(theme.ghost))
                    } else {
                        (EMPTY_CHAR, Style::default())
                    }
                }
            };

            spans.push(Span::styled(symbol, style));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn render_preview(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let kind = game.manager.next_kind;
    let shape = kind.base_shape();
    let color = theme.piece_color(kind);

    let mut lines: Vec<Line> = vec![Line::from("")];

    for row in shape.iter().take(2) {
        let mut spans: Vec<Span> = Vec::new();
        spans.push(Span::raw(" "));

        for &cell in row.iter() {
            if cell {
                spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn render_info(frame: &mut Frame, game: &Game, muted: bool, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score)),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines_cleared)),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level)),
    ];

    if muted {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "muted",
            Style::default().fg(theme.hint),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_paused(frame: &mut Frame, game: &Game, muted: bool, theme: &Theme, area: Rect) {
    render_game(frame, game, muted, theme, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(theme.accent))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(theme.hint),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(theme.hint),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(theme.overlay_bg)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_game_over(frame: &mut Frame, game: &Game, muted: bool, theme: &Theme, area: Rect) {
    render_game(frame, game, muted, theme, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score)),
        Line::from(format!("Lines: {}", game.lines_cleared)),
        Line::from(format!("Level: {}", game.level)),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER: restart  ESC: quit",
            Style::default().fg(theme.hint),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(theme.overlay_bg)),
    );

    let popup_area = centered_rect(30, 12, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    // Always restore the terminal, even when the loop errored.
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    let theme = Theme::default();
    let mut game = Game::new();
    let mut sound = TerminalBell::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &game, sound.is_muted(), &theme))?;

        // Wait for input up to the next gravity tick, but never longer than
        // the frame budget, so the two cadences stay independent.
        let tick_duration = game.fall_interval();
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO)
            .min(FRAME_BUDGET);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = action_for_key(key.code) {
                        match action {
                            Action::Quit => return Ok(()),
                            Action::Mute => sound.toggle_mute(),
                            other => game.handle_action(other),
                        }
                    }
                }
            }
        }

        if game.state == GameState::Playing {
            if last_tick.elapsed() >= tick_duration {
                game.tick();
                last_tick = Instant::now();
            }
        } else {
            // Gravity is suspended outside Playing; keep the timer fresh so
            // unpausing does not trigger an instant fall.
            last_tick = Instant::now();
        }

        for event in game.take_events() {
            if let Some(effect) = effect_for_event(&event) {
                sound.play(effect);
            }
        }
    }
}
