//! Placement legality, keyed on the destination pile's role.
//!
//! These are pure functions over piles and cards; they never mutate. The
//! board calls `check_placement` after a move descriptor has been resolved
//! and only touches any pile once it returns `Ok`.

use thiserror::Error;

use crate::card::{Card, Colour, Rank, Suit, is_one_lower_opposite_colour};
use crate::pile::{Pile, PileRole};

/// Why a well-formed move breaks a solitaire rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("nothing to move")]
    NothingToMove,
    #[error("a foundation takes one card at a time, not a run of {0}")]
    CascadeOntoFoundation(usize),
    #[error("only an ace can start a foundation, not {0}")]
    FoundationNeedsAce(Card),
    #[error("{card} does not belong on the {suit:?} foundation")]
    WrongFoundationSuit { card: Card, suit: Suit },
    #[error("{card} does not follow {top} on its foundation")]
    FoundationOutOfSequence { card: Card, top: Card },
    #[error("only a king can fill an empty column, not {0}")]
    ColumnNeedsKing(Card),
    #[error("{card} cannot go on {top}: both are {colour:?}")]
    SameColour { card: Card, top: Card, colour: Colour },
    #[error("{card} is not one rank below {top}")]
    NotOneLower { card: Card, top: Card },
    #[error("cards cannot be moved onto the column they came from")]
    SameColumn,
    #[error("cards cannot be placed on the {0:?}")]
    NotADestination(PileRole),
}

/// Can `moving` (bottom card first) be placed on `dest`?
pub fn check_placement(dest: &Pile, moving: &[Card]) -> Result<(), IllegalMove> {
    let Some(&first) = moving.first() else {
        return Err(IllegalMove::NothingToMove);
    };

    match dest.role() {
        PileRole::Foundation { suit } => {
            if moving.len() != 1 {
                return Err(IllegalMove::CascadeOntoFoundation(moving.len()));
            }
            can_stack_foundation(suit, dest.top().copied(), first)
        }
        PileRole::Tableau => can_stack_tableau(dest.top().copied(), first),
        role @ (PileRole::Stock | PileRole::Waste) => Err(IllegalMove::NotADestination(role)),
    }
}

/// Foundation rule for a single card.
///
/// An empty foundation is checked first: it takes an ace of its suit and
/// nothing else. A non-empty one takes the next rank of its suit.
pub fn can_stack_foundation(suit: Suit, top: Option<Card>, card: Card) -> Result<(), IllegalMove> {
    if card.suit() != suit {
        return Err(IllegalMove::WrongFoundationSuit { card, suit });
    }
    match top {
        None if card.rank() == Rank::Ace => Ok(()),
        None => Err(IllegalMove::FoundationNeedsAce(card)),
        Some(top) if top.rank().next() == Some(card.rank()) => Ok(()),
        Some(top) => Err(IllegalMove::FoundationOutOfSequence { card, top }),
    }
}

/// Tableau rule for the bottom card of a cascade.
///
/// An empty column is checked first: it takes a king. Otherwise the card
/// must be the opposite colour of the column's top and one rank lower.
pub fn can_stack_tableau(top: Option<Card>, card: Card) -> Result<(), IllegalMove> {
    let Some(top) = top else {
        return if card.rank() == Rank::King {
            Ok(())
        } else {
            Err(IllegalMove::ColumnNeedsKing(card))
        };
    };
    if card.colour() == top.colour() {
        return Err(IllegalMove::SameColour {
            card,
            top,
            colour: card.colour(),
        });
    }
    if !is_one_lower_opposite_colour(card, top) {
        return Err(IllegalMove::NotOneLower { card, top });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::face_up(suit, rank)
    }

    fn pile_with(mut pile: Pile, cards: &[Card]) -> Pile {
        for &c in cards {
            pile.add(c).unwrap();
        }
        pile
    }

    #[test]
    fn empty_foundation_takes_only_its_ace() {
        let hearts = Pile::foundation(Suit::Hearts);
        assert_eq!(check_placement(&hearts, &[up(Suit::Hearts, Rank::Ace)]), Ok(()));
        assert_eq!(
            check_placement(&hearts, &[up(Suit::Hearts, Rank::Two)]),
            Err(IllegalMove::FoundationNeedsAce(up(Suit::Hearts, Rank::Two)))
        );
        assert!(matches!(
            check_placement(&hearts, &[up(Suit::Spades, Rank::Ace)]),
            Err(IllegalMove::WrongFoundationSuit { .. })
        ));
    }

    #[test]
    fn foundation_needs_next_rank() {
        let clubs = pile_with(
            Pile::foundation(Suit::Clubs),
            &[up(Suit::Clubs, Rank::Ace), up(Suit::Clubs, Rank::Two)],
        );
        assert_eq!(check_placement(&clubs, &[up(Suit::Clubs, Rank::Three)]), Ok(()));
        assert!(matches!(
            check_placement(&clubs, &[up(Suit::Clubs, Rank::Four)]),
            Err(IllegalMove::FoundationOutOfSequence { .. })
        ));
    }

    #[test]
    fn foundation_rejects_cascades() {
        let clubs = Pile::foundation(Suit::Clubs);
        let run = [up(Suit::Clubs, Rank::Ace), up(Suit::Hearts, Rank::King)];
        assert_eq!(
            check_placement(&clubs, &run),
            Err(IllegalMove::CascadeOntoFoundation(2))
        );
    }

    #[test]
    fn empty_column_takes_only_kings() {
        let column = Pile::tableau();
        assert_eq!(check_placement(&column, &[up(Suit::Spades, Rank::King)]), Ok(()));
        assert_eq!(
            check_placement(&column, &[up(Suit::Spades, Rank::Queen)]),
            Err(IllegalMove::ColumnNeedsKing(up(Suit::Spades, Rank::Queen)))
        );
    }

    #[test]
    fn column_needs_alternating_colour_and_one_lower() {
        let column = pile_with(Pile::tableau(), &[up(Suit::Hearts, Rank::Eight)]);

        assert_eq!(check_placement(&column, &[up(Suit::Clubs, Rank::Seven)]), Ok(()));
        assert!(matches!(
            check_placement(&column, &[up(Suit::Diamonds, Rank::Seven)]),
            Err(IllegalMove::SameColour {
                colour: Colour::Red,
                ..
            })
        ));
        assert!(matches!(
            check_placement(&column, &[up(Suit::Clubs, Rank::Six)]),
            Err(IllegalMove::NotOneLower { .. })
        ));
    }

    #[test]
    fn only_the_first_moving_card_is_compared() {
        let column = pile_with(Pile::tableau(), &[up(Suit::Hearts, Rank::Eight)]);
        let run = [
            up(Suit::Spades, Rank::Seven),
            up(Suit::Diamonds, Rank::Six),
            up(Suit::Clubs, Rank::Five),
        ];
        assert_eq!(check_placement(&column, &run), Ok(()));
    }

    #[test]
    fn stock_and_waste_are_never_destinations() {
        let card = [up(Suit::Spades, Rank::King)];
        assert_eq!(
            check_placement(&Pile::waste(), &card),
            Err(IllegalMove::NotADestination(PileRole::Waste))
        );
        assert_eq!(
            check_placement(&Pile::stock(), &card),
            Err(IllegalMove::NotADestination(PileRole::Stock))
        );
    }

    #[test]
    fn tableau_rule_reports_colour_before_rank() {
        let eight = up(Suit::Hearts, Rank::Eight);

        // Wrong colour and wrong rank: colour is reported.
        assert!(matches!(
            can_stack_tableau(Some(eight), up(Suit::Diamonds, Rank::Five)),
            Err(IllegalMove::SameColour { colour: Colour::Red, .. })
        ));
        // Right colour, wrong rank, in either direction.
        for rank in [Rank::Five, Rank::Eight, Rank::Nine] {
            assert!(matches!(
                can_stack_tableau(Some(eight), up(Suit::Clubs, rank)),
                Err(IllegalMove::NotOneLower { .. })
            ));
        }
        assert_eq!(can_stack_tableau(Some(eight), up(Suit::Clubs, Rank::Seven)), Ok(()));
    }
}
