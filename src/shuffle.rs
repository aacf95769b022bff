//! Shuffle sources for `Board::setup`.
//!
//! The board never reaches for global randomness: whoever sets up a game
//! passes a `Shuffler`. Three are provided:
//!
//! - `SeededShuffler`: ChaCha8, reproducible from a `u64` seed (or seeded
//!   from OS entropy for ordinary play).
//! - `crate::pysol::PysolDeal`: PySolFC numbered deals.
//! - `FixedDeck`: an explicit card order, e.g. one pasted from another tool.

use std::cmp::Reverse;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::card::{CARDS_PER_DECK, Card};

const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// Something that can put a stock's cards into playing order.
///
/// `cards` is the stock bottom-to-top: the last element is dealt first.
/// Implementations must only permute the slice.
pub trait Shuffler {
    fn shuffle(&mut self, cards: &mut [Card]);
}

/// Deterministic shuffler backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SeededShuffler {
    inner: ChaCha8Rng,
}

impl SeededShuffler {
    /// Create a shuffler with the given seed. Same seed, same deal.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        SeededShuffler {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a shuffler seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        SeededShuffler {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, cards: &mut [Card]) {
        // Start from a canonical order so the result depends on the seed only.
        cards.sort_by_key(|c| c.index());
        cards.shuffle(&mut self.inner);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("missing '[' or ']' around the deck list")]
    MissingBrackets,
    #[error("could not parse {0:?} as a card index")]
    BadIndex(String),
    #[error("card index {0} out of range 0..=51")]
    IndexOutOfRange(u8),
    #[error("duplicate card index {0}")]
    Duplicate(u8),
    #[error("deck list must have {expected} numbers, got {found}")]
    WrongLength { expected: usize, found: usize },
}

/// A fixed card order, listed in dealing order (the first card listed is the
/// first card dealt).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDeck {
    order: Vec<Card>,
}

impl FixedDeck {
    /// Build from cards in dealing order. Must be a permutation of the deck.
    pub fn new(order: Vec<Card>) -> Result<Self, DeckError> {
        if order.len() != DECK_LEN {
            return Err(DeckError::WrongLength {
                expected: DECK_LEN,
                found: order.len(),
            });
        }
        let mut seen = [false; DECK_LEN];
        for card in &order {
            let idx = card.index();
            if std::mem::replace(&mut seen[idx as usize], true) {
                return Err(DeckError::Duplicate(idx));
            }
        }
        Ok(FixedDeck { order })
    }

    /// Parse a single bracketed list of card indices, e.g. `"[0, 13, 26, …]"`.
    ///
    /// Index `i` is the card with `Card::index() == i` (suit-major, clubs
    /// first, ace low). The list must hold exactly 52 distinct indices.
    pub fn parse(s: &str) -> Result<Self, DeckError> {
        let open = s.find('[').ok_or(DeckError::MissingBrackets)?;
        let close = s.rfind(']').ok_or(DeckError::MissingBrackets)?;
        if close <= open {
            return Err(DeckError::MissingBrackets);
        }

        let mut order = Vec::with_capacity(DECK_LEN);
        for part in s[open + 1..close].split(',') {
            let t = part.trim();
            if t.is_empty() {
                continue;
            }
            let v: u8 = t.parse().map_err(|_| DeckError::BadIndex(t.to_string()))?;
            let card = Card::from_index(v).ok_or(DeckError::IndexOutOfRange(v))?;
            order.push(card);
        }
        FixedDeck::new(order)
    }

    /// Cards in dealing order.
    pub fn order(&self) -> &[Card] {
        &self.order
    }
}

impl Shuffler for FixedDeck {
    fn shuffle(&mut self, cards: &mut [Card]) {
        let mut position = [0usize; DECK_LEN];
        for (i, card) in self.order.iter().enumerate() {
            position[card.index() as usize] = i;
        }
        // First dealt goes on top, i.e. last in the slice.
        cards.sort_by_key(|c| Reverse(position[c.index() as usize]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::standard_deck;

    fn indices(cards: &[Card]) -> Vec<u8> {
        cards.iter().map(|c| c.index()).collect()
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = standard_deck();
        let mut b = standard_deck();
        SeededShuffler::new(42).shuffle(&mut a);
        SeededShuffler::new(42).shuffle(&mut b);
        assert_eq!(a, b);

        let mut c = standard_deck();
        SeededShuffler::new(43).shuffle(&mut c);
        assert_ne!(a, c);
    }

    #[test]
    fn seeded_shuffle_ignores_incoming_order() {
        let mut a = standard_deck();
        let mut b = standard_deck();
        b.reverse();
        SeededShuffler::new(7).shuffle(&mut a);
        SeededShuffler::new(7).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffles_are_permutations() {
        let mut deck = standard_deck();
        SeededShuffler::new(2025).shuffle(&mut deck);
        let mut sorted = indices(&deck);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..CARDS_PER_DECK).collect::<Vec<_>>());
    }

    #[test]
    fn fixed_deck_puts_first_listed_card_on_top() {
        let mut listed = standard_deck();
        listed.reverse();
        let mut fixed = FixedDeck::new(listed.clone()).unwrap();

        let mut stock = standard_deck();
        SeededShuffler::new(1).shuffle(&mut stock);
        fixed.shuffle(&mut stock);

        assert_eq!(stock.last(), listed.first());
        let mut dealt_order = stock.clone();
        dealt_order.reverse();
        assert_eq!(dealt_order, listed);
    }

    #[test]
    fn parse_accepts_a_bracketed_permutation() {
        let list: Vec<String> = (0..CARDS_PER_DECK).rev().map(|i| i.to_string()).collect();
        let text = format!("deal: [{}]", list.join(", "));
        let deck = FixedDeck::parse(&text).unwrap();
        assert_eq!(deck.order()[0].index(), 51);
        assert_eq!(deck.order()[51].index(), 0);
    }

    #[test]
    fn parse_rejects_bad_lists() {
        assert_eq!(FixedDeck::parse("1, 2, 3"), Err(DeckError::MissingBrackets));
        assert_eq!(FixedDeck::parse("[1, x]"), Err(DeckError::BadIndex("x".into())));
        assert_eq!(FixedDeck::parse("[52]"), Err(DeckError::IndexOutOfRange(52)));
        assert_eq!(
            FixedDeck::parse("[1, 2]"),
            Err(DeckError::WrongLength {
                expected: 52,
                found: 2
            })
        );

        let mut dup: Vec<String> = (0..CARDS_PER_DECK).map(|i| i.to_string()).collect();
        dup[51] = "0".to_string();
        assert_eq!(
            FixedDeck::parse(&format!("[{}]", dup.join(","))),
            Err(DeckError::Duplicate(0))
        );
    }
}
