//! Card, Suit, Rank and Colour types for a standard 52-card deck.
//!
//! - `Card` carries a fixed identity (suit, rank) plus a face-up flag.
//! - `Card::index()` gives the compact identity 0..=51.
//! - `Suit` and `Rank` give human-readable structure on top of that.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// The four suits, in construction order.
///
/// This order also fixes the order of the four foundations on a board
/// (`*1` = clubs … `*4` = diamonds).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Spades = 1,
    Hearts = 2,
    Diamonds = 3,
}

/// Red or black, derived from the suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Black,
}

/// The thirteen ranks, Ace lowest (0) through King (12).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

/// A playing card.
///
/// Identity is `(suit, rank)`; the only mutable part is `face_up`, which the
/// piles flip as cards are drawn, dealt, recycled or revealed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Card {
    suit: Suit,
    rank: Rank,
    face_up: bool,
}

impl Card {
    /// Create a new face-down card.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: false,
        }
    }

    /// Create a new face-up card.
    #[inline]
    pub fn face_up(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: true,
        }
    }

    /// Create a face-down card from a compact index in 0..=51.
    ///
    /// The mapping is:
    /// ```text
    /// index = suit as u8 * 13 + rank as u8
    /// ```
    /// Returns `None` if `index >= 52`.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        if index >= CARDS_PER_DECK {
            return None;
        }
        let suit = Suit::from_u8(index / NUM_RANKS)?;
        let rank = Rank::from_u8(index % NUM_RANKS)?;
        Some(Card::new(suit, rank))
    }

    /// Return the 0..=51 identity index of this card.
    #[inline]
    pub fn index(self) -> u8 {
        self.suit as u8 * NUM_RANKS + self.rank as u8
    }

    #[inline]
    pub fn suit(self) -> Suit {
        self.suit
    }

    #[inline]
    pub fn rank(self) -> Rank {
        self.rank
    }

    #[inline]
    pub fn colour(self) -> Colour {
        self.suit.colour()
    }

    #[inline]
    pub fn is_face_up(self) -> bool {
        self.face_up
    }

    /// True if both values denote the same physical card, ignoring
    /// visibility.
    #[inline]
    pub fn same_card(self, other: Card) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }

    pub fn flip_up(&mut self) {
        self.face_up = true;
    }

    pub fn flip_down(&mut self) {
        self.face_up = false;
    }

    /// Short string like "A♥", "7♣", "10♦", "K♠".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

impl Suit {
    /// All suits in construction order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

    /// Construct a suit from a small integer 0..=3.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Suit::ALL.get(v as usize).copied()
    }

    #[inline]
    pub fn colour(self) -> Colour {
        match self {
            Suit::Hearts | Suit::Diamonds => Colour::Red,
            Suit::Clubs | Suit::Spades => Colour::Black,
        }
    }

    /// Card symbol: '♣', '♠', '♥' or '♦'.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from a small integer 0..=12.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Rank::ALL.get(v as usize).copied()
    }

    /// 0-based rank value (Ace=0, King=12).
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The rank directly above this one, or `None` for a King.
    #[inline]
    pub fn next(self) -> Option<Rank> {
        Rank::from_u8(self.value() + 1)
    }

    /// Face label: "A", "2".."10", "J", "Q", "K".
    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Helper for tableau rules: can `upper` be placed on `lower`?
///
/// In Klondike, this is true if:
/// - `upper` is exactly one rank lower than `lower`, and
/// - `upper` is opposite colour from `lower`.
#[inline]
pub fn is_one_lower_opposite_colour(upper: Card, lower: Card) -> bool {
    upper.rank().value() + 1 == lower.rank().value() && upper.colour() != lower.colour()
}

/// Generate a standard 52-card deck in a fixed order, all face-down.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order, so
/// `standard_deck()[i].index() == i`.
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_index_round_trip() {
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                let c = Card::new(suit, rank);
                assert!(c.index() < CARDS_PER_DECK);
                assert_eq!(Card::from_index(c.index()), Some(c));
            }
        }
        assert_eq!(Card::from_index(CARDS_PER_DECK), None);
    }

    #[test]
    fn suit_order_and_symbols() {
        assert_eq!(Suit::from_u8(0), Some(Suit::Clubs));
        assert_eq!(Suit::from_u8(1), Some(Suit::Spades));
        assert_eq!(Suit::from_u8(2), Some(Suit::Hearts));
        assert_eq!(Suit::from_u8(3), Some(Suit::Diamonds));
        assert_eq!(Suit::from_u8(4), None);

        let symbols: String = Suit::ALL.iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols, "♣♠♥♦");
    }

    #[test]
    fn rank_next_stops_at_king() {
        assert_eq!(Rank::Ace.next(), Some(Rank::Two));
        assert_eq!(Rank::Queen.next(), Some(Rank::King));
        assert_eq!(Rank::King.next(), None);
        assert_eq!(Rank::from_u8(13), None);
    }

    #[test]
    fn card_colours_are_correct() {
        for rank in Rank::ALL.iter().copied() {
            assert_eq!(Card::new(Suit::Hearts, rank).colour(), Colour::Red);
            assert_eq!(Card::new(Suit::Diamonds, rank).colour(), Colour::Red);
            assert_eq!(Card::new(Suit::Clubs, rank).colour(), Colour::Black);
            assert_eq!(Card::new(Suit::Spades, rank).colour(), Colour::Black);
        }
    }

    #[test]
    fn flipping_keeps_identity() {
        let mut c = Card::new(Suit::Hearts, Rank::Queen);
        let before = c;
        assert!(!c.is_face_up());
        c.flip_up();
        assert!(c.is_face_up());
        assert_ne!(c, before);
        assert!(c.same_card(before));
        assert_eq!(c.index(), before.index());
    }

    #[test]
    fn short_str_and_display() {
        assert_eq!(Card::new(Suit::Hearts, Rank::Ace).short_str(), "A♥");
        assert_eq!(format!("{}", Card::new(Suit::Diamonds, Rank::Ten)), "10♦");
        assert_eq!(format!("{}", Card::new(Suit::Spades, Rank::King)), "K♠");
    }

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = standard_deck();
        assert_eq!(deck.len(), CARDS_PER_DECK as usize);
        for (i, card) in deck.iter().enumerate() {
            assert_eq!(card.index() as usize, i);
            assert!(!card.is_face_up());
        }
    }

    #[test]
    fn klondike_run_rule_helper() {
        let eight_hearts = Card::new(Suit::Hearts, Rank::Eight);
        let seven_spades = Card::new(Suit::Spades, Rank::Seven);
        let seven_hearts = Card::new(Suit::Hearts, Rank::Seven);

        assert!(is_one_lower_opposite_colour(seven_spades, eight_hearts));
        assert!(!is_one_lower_opposite_colour(seven_hearts, eight_hearts));
    }
}
