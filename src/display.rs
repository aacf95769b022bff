//! Human-readable rendering of a Klondike board.
//!
//! The layout is the classic one-screen view:
//!
//! ```text
//! (D)->[2♥] | {♣} {♠} A♥ {♦}
//! ---------------------------------
//!    A   B   C   D   E   F   G
//! 1  J♦  []  []  []  []  []  []
//! 2      8♥  []  []  []  []  []
//! ...
//! ```
//!
//! The header shows the stock marker (`(D)` while cards remain to draw,
//! `( )` once it is empty), the top of the waste, then the four foundation
//! tops in suit order with `{suit}` standing in for an empty foundation.
//! Below the separator, row `n` holds the `n`th card from the bottom of each
//! column; face-down cards are `[]`.

use crate::board::{Board, NUM_COLS};
use crate::card::{Card, Colour, Suit};
use crate::descriptor::column_letter;

const CELL_WIDTH: usize = 4;
const ROW_LABEL_WIDTH: usize = 3;
const FACE_DOWN: &str = "[]";

const ANSI_RED: &str = "\u{1b}[31m";
const ANSI_RESET: &str = "\u{1b}[0m";
/// Clear the screen and move the cursor home.
pub const ANSI_CLEAR: &str = "\u{1b}[2J\u{1b}[H";

/// Rendering switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    /// Wrap red suits in ANSI red.
    pub colour: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style { colour: true }
    }
}

impl Style {
    pub const PLAIN: Style = Style { colour: false };

    fn paint(self, card: Card, text: &str) -> String {
        if self.colour && card.colour() == Colour::Red {
            format!("{ANSI_RED}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Format a single card: `[]` when face-down, otherwise e.g. `10♦`.
pub fn format_card(card: Card, style: Style) -> String {
    if card.is_face_up() {
        style.paint(card, &card.short_str())
    } else {
        FACE_DOWN.to_string()
    }
}

/// Left-justify a card in a table cell. Padding is computed on the plain
/// text so colour codes do not skew the columns.
fn format_cell(card: Card, style: Style) -> String {
    let plain = if card.is_face_up() {
        card.short_str()
    } else {
        FACE_DOWN.to_string()
    };
    let pad = CELL_WIDTH.saturating_sub(plain.chars().count());
    format!("{}{}", format_card(card, style), " ".repeat(pad))
}

/// The stock/waste/foundation line.
pub fn render_header(board: &Board, style: Style) -> String {
    let stock = if board.stock().is_empty() { "( )" } else { "(D)" };
    let waste = match board.waste().top() {
        Some(&card) => format_card(card, style),
        None => "  ".to_string(),
    };

    let foundations: Vec<String> = Suit::ALL
        .iter()
        .map(|&suit| match board.foundation_for(suit).top() {
            Some(&card) => format_card(card, style),
            None => format!("{{{}}}", suit.symbol()),
        })
        .collect();

    format!("{stock}->[{waste}] | {}", foundations.join(" "))
}

/// The column letters followed by one line per tableau depth.
pub fn render_columns(board: &Board, style: Style) -> String {
    let mut s = String::new();

    s.push_str(&" ".repeat(ROW_LABEL_WIDTH));
    for col in 0..NUM_COLS {
        s.push(column_letter(col));
        s.push_str(&" ".repeat(CELL_WIDTH - 1));
    }
    s.truncate(s.trim_end().len());
    s.push('\n');

    let height = board.columns().iter().map(|c| c.size()).max().unwrap_or(0);
    for depth in 0..height {
        let mut line = format!("{:<width$}", depth + 1, width = ROW_LABEL_WIDTH);
        for column in board.columns() {
            match column.cards().get(depth) {
                Some(&card) => line.push_str(&format_cell(card, style)),
                None => line.push_str(&" ".repeat(CELL_WIDTH)),
            }
        }
        s.push_str(line.trim_end());
        s.push('\n');
    }

    s
}

/// Render the whole board as a multi-line string.
pub fn render_board(board: &Board, style: Style) -> String {
    let header = render_header(board, style);
    let width = ROW_LABEL_WIDTH + CELL_WIDTH * NUM_COLS;

    let mut s = String::new();
    s.push_str(&header);
    s.push('\n');
    s.push_str(&"-".repeat(width));
    s.push('\n');
    s.push_str(&render_columns(board, style));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Layout;
    use crate::card::Rank;
    use crate::shuffle::SeededShuffler;

    /// Parse the lines below the column letters back into a grid of cells
    /// ("", "[]", "10♦", ...).
    fn parse_rendered_grid(rendered: &str) -> Vec<Vec<String>> {
        rendered
            .lines()
            .skip(1)
            .map(|line| {
                let chars: Vec<char> = line.chars().collect();
                (0..NUM_COLS)
                    .map(|col| {
                        let start = ROW_LABEL_WIDTH + CELL_WIDTH * col;
                        let end = (start + CELL_WIDTH).min(chars.len());
                        if start >= chars.len() {
                            String::new()
                        } else {
                            chars[start..end].iter().collect::<String>().trim().to_string()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// What the grid should contain, computed straight from the board.
    fn expected_grid(board: &Board) -> Vec<Vec<String>> {
        let height = board.columns().iter().map(|c| c.size()).max().unwrap_or(0);
        (0..height)
            .map(|depth| {
                board
                    .columns()
                    .iter()
                    .map(|col| {
                        col.cards()
                            .get(depth)
                            .map(|&c| format_card(c, Style::PLAIN))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn fresh_deal_grid_matches_the_board() {
        let board = Board::dealt(&mut SeededShuffler::new(123_456_789)).unwrap();
        let rendered = render_columns(&board, Style::PLAIN);

        assert_eq!(rendered.lines().next(), Some("   A   B   C   D   E   F   G"));
        assert_eq!(parse_rendered_grid(&rendered), expected_grid(&board));

        // Row 1 shows A's only card face-up and every other column's bottom
        // card face-down.
        let first = &parse_rendered_grid(&rendered)[0];
        assert_ne!(first[0], FACE_DOWN);
        assert!(first[1..].iter().all(|cell| cell == FACE_DOWN));
    }

    #[test]
    fn header_shows_stock_marker_waste_and_foundations() {
        let mut layout = Layout::default();
        layout.stock = vec![Card::new(Suit::Clubs, Rank::Two)];
        layout.waste = vec![Card::face_up(Suit::Hearts, Rank::Two)];
        layout.foundations[2] = vec![Card::face_up(Suit::Hearts, Rank::Ace)];
        let board = Board::from_layout(layout).unwrap();

        assert_eq!(
            render_header(&board, Style::PLAIN),
            "(D)->[2♥] | {♣} {♠} A♥ {♦}"
        );

        let empty = Board::from_layout(Layout::default()).unwrap();
        assert_eq!(render_header(&empty, Style::PLAIN), "( )->[  ] | {♣} {♠} {♥} {♦}");
    }

    #[test]
    fn colour_wraps_only_red_cards() {
        let red = Card::face_up(Suit::Diamonds, Rank::Ten);
        let black = Card::face_up(Suit::Spades, Rank::Ten);
        let style = Style { colour: true };

        assert_eq!(format_card(red, style), "\u{1b}[31m10♦\u{1b}[0m");
        assert_eq!(format_card(black, style), "10♠");
        assert_eq!(format_card(Card::new(Suit::Hearts, Rank::Ace), style), "[]");

        // Padding ignores the escape codes.
        assert!(format_cell(red, style).ends_with("\u{1b}[0m "));
    }

    #[test]
    fn board_has_header_separator_and_grid() {
        let board = Board::dealt(&mut SeededShuffler::new(5)).unwrap();
        let rendered = render_board(&board, Style::PLAIN);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with("(D)->[  ] | "));
        assert!(lines[1].chars().all(|c| c == '-'));
        // Letters + seven rows for the deepest column.
        assert_eq!(lines.len(), 2 + 1 + 7);
        assert!(lines[9].starts_with("7 "));
    }
}
