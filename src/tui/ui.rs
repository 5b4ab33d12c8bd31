//! Stateless rendering of the star board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::games::checkers::{Board, COLS, Cell, Perspective, Player, Pos, ROWS};

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Canonical board.
    pub board: &'a Board,
    /// Canonical cursor position.
    pub cursor: Pos,
    /// Whether the piece under the cursor is lifted.
    pub selected: bool,
    /// Orientation of the local viewer.
    pub perspective: Perspective,
    /// Status line text.
    pub status: &'a str,
}

const HELP: &str = "move: a w e d x z / h u i k m n   select/commit: space   replay: r   quit: q";

/// Renders title, board, status and help.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                 // Title
            Constraint::Min(ROWS as u16 + 2),      // Board
            Constraint::Length(3),                 // Status
            Constraint::Length(1),                 // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Star Checkers")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let board_area = center_rect(chunks[1], COLS as u16 * 2 + 2, ROWS as u16 + 2);
    let board = Paragraph::new(board_lines(view)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, board_area);

    let status = Paragraph::new(view.status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

/// Board rows as styled lines, in the viewer's orientation.
///
/// Each cell is two columns wide so the hex grid keeps its shape.
pub fn board_lines(view: &View<'_>) -> Vec<Line<'static>> {
    let cursor = view.perspective.view_pos(view.cursor);
    let cells = view.perspective.view_cells(view.board);
    cells
        .chunks(COLS)
        .enumerate()
        .map(|(row, cells)| {
            let spans = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let here = cursor.row() == row && cursor.col() == col;
                    cell_span(*cell, here, view.selected)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn cell_span(cell: Cell, cursor: bool, selected: bool) -> Span<'static> {
    let (symbol, style) = match cell {
        Cell::Unused => ("  ", Style::default()),
        Cell::Empty => ("· ", Style::default().fg(Color::DarkGray)),
        Cell::Occupied(player) => ("● ", Style::default().fg(player_color(player))),
    };
    let style = match (cursor, selected) {
        (true, true) => style.add_modifier(Modifier::BOLD | Modifier::REVERSED),
        (true, false) => style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        _ => style,
    };
    Span::styled(symbol, style)
}

/// Piece colour for a player.
pub fn player_color(player: Player) -> Color {
    match player {
        Player::Zero => Color::Red,
        Player::One => Color::Green,
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
