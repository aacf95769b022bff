//! The Klondike board: one stock, one waste, four foundations and seven
//! tableau columns, plus the move engine that acts on them.
//!
//! Every public mutation is atomic. `try_move` resolves the descriptors,
//! checks the whole move, and only then relocates cards; a rejected move
//! leaves the board exactly as it was.

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::card::{CARDS_PER_DECK, Card, NUM_SUITS, Rank, Suit, standard_deck};
use crate::descriptor::{InvalidMove, MoveRequest, column_letter};
use crate::pile::{Pile, PileError};
use crate::rules::{self, IllegalMove};
use crate::shuffle::Shuffler;

/// Number of tableau columns.
pub const NUM_COLS: usize = 7;
/// Number of foundations (one per suit).
pub const NUM_FOUNDATIONS: usize = NUM_SUITS as usize;
/// Cards dealt to the tableau at setup: 1 + 2 + … + 7.
pub const TABLEAU_DEAL: usize = NUM_COLS * (NUM_COLS + 1) / 2;

/// Names one pile on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PileId {
    Stock,
    Waste,
    Foundation(usize),
    Column(usize),
}

/// Outcome of `Board::try_move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveResult {
    /// Unparseable or out-of-range input.
    Invalid,
    /// Well-formed, but against the rules.
    Illegal,
    Applied,
}

impl MoveResult {
    /// -1, 0 or 1.
    pub fn code(self) -> i8 {
        match self {
            MoveResult::Invalid => -1,
            MoveResult::Illegal => 0,
            MoveResult::Applied => 1,
        }
    }
}

/// A rejected move, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("invalid move: {0}")]
    Invalid(#[from] InvalidMove),
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
}

impl From<&MoveError> for MoveResult {
    fn from(err: &MoveError) -> Self {
        match err {
            MoveError::Invalid(_) => MoveResult::Invalid,
            MoveError::Illegal(_) => MoveResult::Illegal,
        }
    }
}

/// What an applied move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSummary {
    pub from: PileId,
    pub to: PileId,
    /// Number of cards relocated.
    pub moved: usize,
    /// The source column card turned face-up by the move, if any.
    pub revealed: Option<Card>,
}

/// Outcome of `Board::draw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(Card),
    /// The stock was empty, the waste was turned over, then a card was drawn.
    RecycledAndDrawn(Card),
    /// Stock and waste are both empty; nothing happened.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("the board has already been dealt")]
    AlreadyDealt,
    #[error("stock ran out while dealing")]
    StockExhausted,
    #[error(transparent)]
    Pile(#[from] PileError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{0} appears more than once")]
    DuplicateCard(Card),
    #[error("stock card {0} is face-up")]
    FaceUpInStock(Card),
    #[error("waste card {0} is face-down")]
    FaceDownInWaste(Card),
    #[error("foundation {foundation} cannot hold {card} at position {position}")]
    FoundationOutOfOrder {
        foundation: usize,
        position: usize,
        card: Card,
    },
    #[error("column {0} must be face-down cards under face-up cards, with a face-up top")]
    ColumnVisibility(char),
    #[error(transparent)]
    Pile(#[from] PileError),
}

/// Plain description of a position, for building boards directly.
///
/// Every pile is listed bottom to top. Foundations are in suit order
/// (clubs, spades, hearts, diamonds).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
    pub foundations: [Vec<Card>; NUM_FOUNDATIONS],
    pub columns: [Vec<Card>; NUM_COLS],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    stock: Pile,
    waste: Pile,
    foundations: [Pile; NUM_FOUNDATIONS],
    columns: [Pile; NUM_COLS],
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// A board whose stock holds the full deck, face-down and unshuffled.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.stock = pile_from(Pile::stock(), standard_deck());
        board
    }

    /// Convenience: `new` followed by `setup`.
    pub fn dealt<S: Shuffler + ?Sized>(shuffler: &mut S) -> Result<Self, SetupError> {
        let mut board = Board::new();
        board.setup(shuffler)?;
        Ok(board)
    }

    fn empty() -> Self {
        Board {
            stock: Pile::stock(),
            waste: Pile::waste(),
            foundations: Suit::ALL.map(Pile::foundation),
            columns: std::array::from_fn(|_| Pile::tableau()),
        }
    }

    /// Build a board from an explicit position.
    ///
    /// The layout does not have to contain all 52 cards, but it must be a
    /// position reachable in principle: no card twice, stock face-down,
    /// waste face-up, foundations ace-up in their own suit, and every column
    /// a face-down prefix under a face-up run with a face-up top.
    pub fn from_layout(layout: Layout) -> Result<Self, LayoutError> {
        let mut seen = [false; CARDS_PER_DECK as usize];
        let all = layout
            .stock
            .iter()
            .chain(&layout.waste)
            .chain(layout.foundations.iter().flatten())
            .chain(layout.columns.iter().flatten());
        for card in all {
            if std::mem::replace(&mut seen[card.index() as usize], true) {
                return Err(LayoutError::DuplicateCard(*card));
            }
        }

        if let Some(card) = layout.stock.iter().find(|c| c.is_face_up()) {
            return Err(LayoutError::FaceUpInStock(*card));
        }
        if let Some(card) = layout.waste.iter().find(|c| !c.is_face_up()) {
            return Err(LayoutError::FaceDownInWaste(*card));
        }

        for (f, cards) in layout.foundations.iter().enumerate() {
            for (position, card) in cards.iter().enumerate() {
                let in_place = card.suit() == Suit::ALL[f]
                    && card.rank().value() as usize == position
                    && card.is_face_up();
                if !in_place {
                    return Err(LayoutError::FoundationOutOfOrder {
                        foundation: f + 1,
                        position,
                        card: *card,
                    });
                }
            }
        }

        for (c, cards) in layout.columns.iter().enumerate() {
            let face_down = cards.iter().take_while(|c| !c.is_face_up()).count();
            let well_formed = cards[face_down..].iter().all(|c| c.is_face_up())
                && cards.last().is_none_or(|c| c.is_face_up());
            if !well_formed {
                return Err(LayoutError::ColumnVisibility(column_letter(c)));
            }
        }

        let mut board = Board::empty();
        board.stock = pile_from(Pile::stock(), layout.stock);
        board.waste = pile_from(Pile::waste(), layout.waste);
        for (pile, cards) in board.foundations.iter_mut().zip(layout.foundations) {
            pile.check_accepts(&cards)?;
            pile.append(cards);
        }
        for (pile, cards) in board.columns.iter_mut().zip(layout.columns) {
            pile.append(cards);
        }
        Ok(board)
    }

    /// Shuffle the stock and deal the tableau.
    ///
    /// Six face-down rounds deal one card to each of columns `r..7` for
    /// `r = 1..=6`, then a final round deals one face-up card to every
    /// column. Column `i` ends with `i` face-down cards under one face-up
    /// card. Cards come off the top of the stock.
    pub fn setup<S: Shuffler + ?Sized>(&mut self, shuffler: &mut S) -> Result<(), SetupError> {
        let fresh = self.stock.size() == CARDS_PER_DECK as usize
            && self.waste.is_empty()
            && self.foundations.iter().all(Pile::is_empty)
            && self.columns.iter().all(Pile::is_empty);
        if !fresh {
            return Err(SetupError::AlreadyDealt);
        }

        let mut cards = self.stock.split_off(0);
        shuffler.shuffle(&mut cards);
        for card in &mut cards {
            card.flip_down();
        }
        self.stock.append(cards);

        for round in 1..NUM_COLS {
            for col in round..NUM_COLS {
                let card = self.stock.pop().ok_or(SetupError::StockExhausted)?;
                self.columns[col].add(card)?;
            }
        }
        for column in &mut self.columns {
            let mut card = self.stock.pop().ok_or(SetupError::StockExhausted)?;
            card.flip_up();
            column.add(card)?;
        }

        debug!(
            "dealt {} cards to the tableau, {} left in the stock",
            TABLEAU_DEAL,
            self.stock.size()
        );
        Ok(())
    }

    /// Draw one card from the stock onto the waste, turning the waste back
    /// over first if the stock is empty.
    ///
    /// With both piles empty this does nothing and returns `Exhausted`, as
    /// many times as it is called. Errors come from the stock and waste
    /// piles themselves and leave the board unchanged.
    pub fn draw(&mut self) -> Result<DrawOutcome, PileError> {
        if let Some(card) = self.stock.draw_into(&mut self.waste)? {
            debug!("drew {card}");
            return Ok(DrawOutcome::Drawn(card));
        }
        if self.waste.is_empty() {
            debug!("nothing to draw: stock and waste are empty");
            return Ok(DrawOutcome::Exhausted);
        }
        self.stock.recycle_from(&mut self.waste)?;
        match self.stock.draw_into(&mut self.waste)? {
            Some(card) => {
                debug!("drew {card} after recycling");
                Ok(DrawOutcome::RecycledAndDrawn(card))
            }
            None => Ok(DrawOutcome::Exhausted),
        }
    }

    /// Apply the move named by a source and destination token.
    pub fn try_move(&mut self, source: &str, dest: &str) -> MoveResult {
        self.report(MoveRequest::parse(source, dest).map_err(MoveError::from))
    }

    /// Like `try_move`, with both tokens on one line (`"C4 A"`).
    pub fn move_line(&mut self, line: &str) -> MoveResult {
        self.report(MoveRequest::parse_line(line).map_err(MoveError::from))
    }

    fn report(&mut self, request: Result<MoveRequest, MoveError>) -> MoveResult {
        match request.and_then(|r| self.execute(r)) {
            Ok(_) => MoveResult::Applied,
            Err(e) => {
                debug!("{e}");
                MoveResult::from(&e)
            }
        }
    }

    /// Validate and apply a parsed move.
    pub fn execute(&mut self, request: MoveRequest) -> Result<MoveSummary, MoveError> {
        let (from, index, to) = self.resolve(request)?;
        let source = self.pile(from).ok_or(InvalidMove::EmptySource("source pile"))?;
        let dest = self.pile(to).ok_or(InvalidMove::EmptySource("destination pile"))?;
        let moving = source
            .cascade(index)
            .ok_or(InvalidMove::EmptySource("source pile"))?;

        if from == to {
            return Err(IllegalMove::SameColumn.into());
        }
        rules::check_placement(dest, moving)?;

        // Checked; nothing below can fail.
        let cascade = self.pile_mut(from).split_off(index);
        let moved = cascade.len();
        self.pile_mut(to).append(cascade);
        let revealed = match from {
            PileId::Column(_) => self.pile_mut(from).reveal_top(),
            _ => None,
        };

        debug!(
            "applied {request}: {moved} card(s){}",
            revealed.map(|c| format!(", revealed {c}")).unwrap_or_default()
        );
        Ok(MoveSummary {
            from,
            to,
            moved,
            revealed,
        })
    }

    /// Turn a request into (source pile, source index, destination pile),
    /// checking the source card exists and, in a column, is face-up.
    fn resolve(&self, request: MoveRequest) -> Result<(PileId, usize, PileId), InvalidMove> {
        match request {
            MoveRequest::ColumnToColumn { src, index, dst } => {
                let column = &self.columns[src];
                let card = column.cascade(index).map(|run| run[0]).ok_or(InvalidMove::RowOutOfRange {
                    column: column_letter(src),
                    row: index + 1,
                })?;
                if !card.is_face_up() {
                    return Err(InvalidMove::FaceDownSource {
                        column: column_letter(src),
                        row: index + 1,
                    });
                }
                Ok((PileId::Column(src), index, PileId::Column(dst)))
            }
            MoveRequest::FoundationToColumn { foundation, dst } => {
                let index = top_index(&self.foundations[foundation], "foundation")?;
                Ok((PileId::Foundation(foundation), index, PileId::Column(dst)))
            }
            MoveRequest::WasteToColumn { dst } => {
                let index = top_index(&self.waste, "waste")?;
                Ok((PileId::Waste, index, PileId::Column(dst)))
            }
            MoveRequest::WasteToFoundation => {
                let index = top_index(&self.waste, "waste")?;
                let suit = self.waste.cards()[index].suit();
                Ok((PileId::Waste, index, PileId::Foundation(suit as usize)))
            }
            MoveRequest::ColumnToFoundation { src } => {
                let column = &self.columns[src];
                let index = top_index(column, "column")?;
                let card = column.cards()[index];
                if !card.is_face_up() {
                    return Err(InvalidMove::FaceDownSource {
                        column: column_letter(src),
                        row: index + 1,
                    });
                }
                Ok((PileId::Column(src), index, PileId::Foundation(card.suit() as usize)))
            }
        }
    }

    /// True once every foundation is topped by its king.
    pub fn is_won(&self) -> bool {
        self.foundations
            .iter()
            .all(|f| f.top().is_some_and(|c| c.rank() == Rank::King))
    }

    /// Stock and waste are empty and no tableau card is face-down.
    ///
    /// From here the game can always be finished by moving cards to the
    /// foundations.
    pub fn all_revealed(&self) -> bool {
        self.stock.is_empty()
            && self.waste.is_empty()
            && self.columns.iter().all(|c| c.num_face_down() == 0)
    }

    pub fn stock(&self) -> &Pile {
        &self.stock
    }

    pub fn waste(&self) -> &Pile {
        &self.waste
    }

    pub fn foundations(&self) -> &[Pile; NUM_FOUNDATIONS] {
        &self.foundations
    }

    pub fn foundation(&self, index: usize) -> Option<&Pile> {
        self.foundations.get(index)
    }

    /// The foundation bound to `suit`.
    pub fn foundation_for(&self, suit: Suit) -> &Pile {
        &self.foundations[suit as usize]
    }

    pub fn columns(&self) -> &[Pile; NUM_COLS] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Pile> {
        self.columns.get(index)
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        match id {
            PileId::Stock => Some(&self.stock),
            PileId::Waste => Some(&self.waste),
            PileId::Foundation(i) => self.foundations.get(i),
            PileId::Column(i) => self.columns.get(i),
        }
    }

    /// Only called with ids produced by `resolve`, which are in range.
    fn pile_mut(&mut self, id: PileId) -> &mut Pile {
        match id {
            PileId::Stock => &mut self.stock,
            PileId::Waste => &mut self.waste,
            PileId::Foundation(i) => &mut self.foundations[i],
            PileId::Column(i) => &mut self.columns[i],
        }
    }

    /// Every card on the board, pile by pile.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.stock
            .iter()
            .chain(self.waste.iter())
            .chain(self.foundations.iter().flat_map(Pile::iter))
            .chain(self.columns.iter().flat_map(Pile::iter))
    }
}

fn pile_from(mut pile: Pile, cards: Vec<Card>) -> Pile {
    pile.append(cards);
    pile
}

fn top_index(pile: &Pile, name: &'static str) -> Result<usize, InvalidMove> {
    pile.size().checked_sub(1).ok_or(InvalidMove::EmptySource(name))
}
