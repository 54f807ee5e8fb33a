//! Pickup, place and craft rules for a clicked cell.
//! Decisions are pure: callers feed in the held token and the cell value and
//! apply the returned transition themselves.

use crate::config::GameConfig;
use crate::types::{CellCoord, CellValue, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    NothingHere,
    PickedUp(Token),
    Placed(Token),
    Crafted { value: Token, victory: bool },
    Mismatch { held: Token, found: Token },
    TooFar { distance: u32 },
}

/// Held token and cell value after a click, plus what happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub held: CellValue,
    pub cell: CellValue,
    pub outcome: Outcome,
}

impl Transition {
    /// Whether applying this transition changes any state.
    pub fn mutates(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::PickedUp(_) | Outcome::Placed(_) | Outcome::Crafted { .. }
        )
    }
}

pub fn in_range(player: CellCoord, target: CellCoord, radius: u32) -> bool {
    player.chebyshev(target) <= radius
}

/// Applies the range gate, then the interaction table.
pub fn resolve(
    player: CellCoord,
    target: CellCoord,
    held: CellValue,
    cell: CellValue,
    config: &GameConfig,
) -> Transition {
    if !in_range(player, target, config.interact_radius) {
        return Transition {
            held,
            cell,
            outcome: Outcome::TooFar { distance: player.chebyshev(target) },
        };
    }
    decide(held, cell, config)
}

/// The interaction table. Every `(held, cell)` combination lands in exactly one arm.
pub fn decide(held: CellValue, cell: CellValue, config: &GameConfig) -> Transition {
    match (held, cell) {
        (None, None) => Transition { held: None, cell: None, outcome: Outcome::NothingHere },
        (None, Some(found)) => {
            Transition { held: Some(found), cell: None, outcome: Outcome::PickedUp(found) }
        }
        (Some(carried), None) => {
            Transition { held: None, cell: Some(carried), outcome: Outcome::Placed(carried) }
        }
        (Some(carried), Some(found)) if carried == found => match carried.doubled() {
            Some(value) => Transition {
                held: None,
                cell: Some(value),
                outcome: Outcome::Crafted { value, victory: config.is_victory(value) },
            },
            None => Transition {
                held,
                cell,
                outcome: Outcome::Mismatch { held: carried, found },
            },
        },
        (Some(carried), Some(found)) => {
            Transition { held, cell, outcome: Outcome::Mismatch { held: carried, found } }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: u32) -> Token {
        Token::new(value).expect("positive token")
    }

    #[test]
    fn empty_hand_on_empty_cell_finds_nothing() {
        let transition = decide(None, None, &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::NothingHere);
        assert_eq!((transition.held, transition.cell), (None, None));
        assert!(!transition.mutates());
    }

    #[test]
    fn empty_hand_picks_up_the_cell_token() {
        let transition = decide(None, Some(token(4)), &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::PickedUp(token(4)));
        assert_eq!((transition.held, transition.cell), (Some(token(4)), None));
        assert!(transition.mutates());
    }

    #[test]
    fn held_token_is_placed_on_empty_cell() {
        let transition = decide(Some(token(2)), None, &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::Placed(token(2)));
        assert_eq!((transition.held, transition.cell), (None, Some(token(2))));
    }

    #[test]
    fn equal_tokens_craft_double_value() {
        let transition = decide(Some(token(2)), Some(token(2)), &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::Crafted { value: token(4), victory: false });
        assert_eq!((transition.held, transition.cell), (None, Some(token(4))));
    }

    #[test]
    fn crafting_a_target_value_signals_victory() {
        let transition = decide(Some(token(4)), Some(token(4)), &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::Crafted { value: token(8), victory: true });
    }

    #[test]
    fn different_tokens_do_not_match() {
        let transition = decide(Some(token(2)), Some(token(8)), &GameConfig::default());
        assert_eq!(transition.outcome, Outcome::Mismatch { held: token(2), found: token(8) });
        assert_eq!((transition.held, transition.cell), (Some(token(2)), Some(token(8))));
        assert!(!transition.mutates());
    }

    #[test]
    fn overflowing_craft_is_refused() {
        let huge = token(u32::MAX);
        let transition = decide(Some(huge), Some(huge), &GameConfig::default());
        assert!(!transition.mutates());
        assert_eq!((transition.held, transition.cell), (Some(huge), Some(huge)));
    }

    #[test]
    fn range_gate_blocks_every_combination() {
        let config = GameConfig::default();
        let player = CellCoord::new(0, 0);
        let far = CellCoord::new(4, -1);
        let values = [None, Some(token(1)), Some(token(2))];
        for held in values {
            for cell in values {
                let transition = resolve(player, far, held, cell, &config);
                assert_eq!(transition.outcome, Outcome::TooFar { distance: 4 });
                assert_eq!((transition.held, transition.cell), (held, cell));
            }
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let config = GameConfig::default();
        let transition =
            resolve(CellCoord::new(0, 0), CellCoord::new(-3, 3), None, Some(token(1)), &config);
        assert_eq!(transition.outcome, Outcome::PickedUp(token(1)));
    }
}
