//! Ordered card containers.
//!
//! Every stack on the board is a `Pile`: a `Vec<Card>` stored bottom-to-top
//! (index 0 is the bottom card, the last element is the top) plus a
//! `PileRole` saying which kind of stack it is. Role-specific behaviour lives
//! with the role: foundations are suit-locked in `add`, stock draw/recycle is
//! in `crate::stock`, and move legality is in `crate::rules`.

use serde::Serialize;
use thiserror::Error;

use crate::card::{Card, Suit};

/// The closed set of pile kinds found on a Klondike board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PileRole {
    /// Face-down draw pile.
    Stock,
    /// Face-up pile receiving stock draws.
    Waste,
    /// Suit-locked ace→king pile.
    Foundation { suit: Suit },
    /// One of the seven playing columns.
    Tableau,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PileError {
    #[error("{found} cannot go on the {expected:?} foundation")]
    SuitMismatch { expected: Suit, found: Card },
    #[error("stock still has {0} card(s); it can only be recycled when empty")]
    StockNotEmpty(usize),
    #[error("waste is empty; nothing to recycle")]
    NothingToRecycle,
    #[error("{0:?} pile does not support this operation")]
    WrongRole(PileRole),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pile {
    role: PileRole,
    cards: Vec<Card>,
}

impl Pile {
    pub fn new(role: PileRole) -> Self {
        Pile {
            role,
            cards: Vec::new(),
        }
    }

    pub fn stock() -> Self {
        Pile::new(PileRole::Stock)
    }

    pub fn waste() -> Self {
        Pile::new(PileRole::Waste)
    }

    pub fn foundation(suit: Suit) -> Self {
        Pile::new(PileRole::Foundation { suit })
    }

    pub fn tableau() -> Self {
        Pile::new(PileRole::Tableau)
    }

    #[inline]
    pub fn role(&self) -> PileRole {
        self.role
    }

    /// The suit a foundation is bound to; `None` for every other role.
    #[inline]
    pub fn foundation_suit(&self) -> Option<Suit> {
        match self.role {
            PileRole::Foundation { suit } => Some(suit),
            _ => None,
        }
    }

    /// Append `card` on top.
    ///
    /// A foundation only accepts cards of its own suit; every other role
    /// accepts anything. Sequence rules (ace first, ascending ranks) are
    /// enforced by `crate::rules`, not here.
    pub fn add(&mut self, card: Card) -> Result<(), PileError> {
        self.check_suit(card)?;
        self.cards.push(card);
        Ok(())
    }

    /// Remove the card with the same identity as `card`, wherever it sits.
    pub fn remove(&mut self, card: Card) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.same_card(card))?;
        Some(self.cards.remove(pos))
    }

    #[inline]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at `index`, counted from the bottom for `index >= 0` and from the
    /// top for negative values (`-1` is the top card).
    pub fn card_at(&self, index: isize) -> Option<&Card> {
        let resolved = if index < 0 {
            self.cards.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.cards.get(resolved)
    }

    /// All cards, bottom to top.
    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of face-down cards.
    pub fn num_face_down(&self) -> usize {
        self.cards.iter().filter(|c| !c.is_face_up()).count()
    }

    /// The run of cards from `index` to the top (the cascade a move at
    /// `index` would carry).
    pub fn cascade(&self, index: usize) -> Option<&[Card]> {
        if index >= self.cards.len() {
            return None;
        }
        Some(&self.cards[index..])
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Detach the cascade starting at `index`, keeping its internal order.
    pub(crate) fn split_off(&mut self, index: usize) -> Vec<Card> {
        self.cards.split_off(index.min(self.cards.len()))
    }

    /// Would `add` accept every card of `cascade`?
    pub fn check_accepts(&self, cascade: &[Card]) -> Result<(), PileError> {
        cascade.iter().try_for_each(|&card| self.check_suit(card))
    }

    /// Append a cascade on top, keeping its internal order. Callers run
    /// `check_accepts` first.
    pub(crate) fn append(&mut self, cascade: Vec<Card>) {
        self.cards.extend(cascade);
    }

    /// Turn the top card face-up, if there is one. Returns the card when it
    /// was previously face-down.
    pub(crate) fn reveal_top(&mut self) -> Option<Card> {
        let top = self.cards.last_mut()?;
        if top.is_face_up() {
            return None;
        }
        top.flip_up();
        Some(*top)
    }

    fn check_suit(&self, card: Card) -> Result<(), PileError> {
        match self.role {
            PileRole::Foundation { suit } if card.suit() != suit => Err(PileError::SuitMismatch {
                expected: suit,
                found: card,
            }),
            _ => Ok(()),
        }
    }
}
