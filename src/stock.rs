//! Stock/waste mechanics: single-card draws and recycling the waste.

use log::debug;

use crate::card::Card;
use crate::pile::{Pile, PileError, PileRole};

impl Pile {
    /// Pop the top stock card, turn it face-up and put it on `waste`.
    ///
    /// Returns the drawn card, or `None` if the stock is empty. Recycling an
    /// empty stock is the caller's job (see `Board::draw`).
    pub fn draw_into(&mut self, waste: &mut Pile) -> Result<Option<Card>, PileError> {
        self.expect_role(PileRole::Stock)?;
        waste.expect_role(PileRole::Waste)?;

        let Some(mut card) = self.pop() else {
            return Ok(None);
        };
        card.flip_up();
        waste.add(card)?;
        Ok(Some(card))
    }

    /// Move every waste card back onto this (empty) stock, face-down.
    ///
    /// Popping the waste and pushing onto the stock reverses the order, so
    /// the card drawn first in the previous pass is drawn first again.
    /// Returns the number of cards recycled.
    pub fn recycle_from(&mut self, waste: &mut Pile) -> Result<usize, PileError> {
        self.expect_role(PileRole::Stock)?;
        waste.expect_role(PileRole::Waste)?;

        if !self.is_empty() {
            return Err(PileError::StockNotEmpty(self.size()));
        }
        if waste.is_empty() {
            return Err(PileError::NothingToRecycle);
        }

        let mut moved = 0;
        while let Some(mut card) = waste.pop() {
            card.flip_down();
            self.add(card)?;
            moved += 1;
        }
        debug!("recycled {moved} waste card(s) into the stock");
        Ok(moved)
    }

    fn expect_role(&self, role: PileRole) -> Result<(), PileError> {
        if self.role() == role {
            Ok(())
        } else {
            Err(PileError::WrongRole(self.role()))
        }
    }
}
