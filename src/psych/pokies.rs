//! Three-reel slot machine paid in Psychbucks.
//!
//! Talks to the game only through `GameApi`, the same way the arcade
//! minigames do.

use crate::error::LedgerError;

use super::state::{Currency, LogCategory};
use super::GameApi;

pub const SPIN_COST: f64 = 1.0;
/// Paid for any two matching reels.
pub const PAIR_PAYOUT: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Neuron,
    Brain,
    Freud,
    Pavlov,
    Notepad,
}

pub const SYMBOLS: [Symbol; 5] = [
    Symbol::Neuron,
    Symbol::Brain,
    Symbol::Freud,
    Symbol::Pavlov,
    Symbol::Notepad,
];

impl Symbol {
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Neuron => "Neuron",
            Symbol::Brain => "Brain",
            Symbol::Freud => "Freud",
            Symbol::Pavlov => "Pavlov",
            Symbol::Notepad => "Notepad",
        }
    }

    /// Payout for three of a kind.
    pub fn triple_payout(&self) -> f64 {
        match self {
            Symbol::Neuron => 20.0,
            Symbol::Brain => 15.0,
            Symbol::Freud => 12.0,
            Symbol::Pavlov => 10.0,
            Symbol::Notepad => 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spin {
    pub reels: [Symbol; 3],
    pub win: f64,
}

pub fn payout(reels: &[Symbol; 3]) -> f64 {
    let [a, b, c] = reels;
    if a == b && b == c {
        a.triple_payout()
    } else if a == b || b == c || a == c {
        PAIR_PAYOUT
    } else {
        0.0
    }
}

/// Pay for one spin and credit any winnings. `rng` supplies raw random
/// numbers, one per reel.
pub fn spin<A: GameApi + ?Sized>(
    api: &mut A,
    rng: &mut dyn FnMut() -> u32,
) -> Result<Spin, LedgerError> {
    if let Err(e) = api.state_mut().ledger.spend(Currency::Psychbucks, SPIN_COST) {
        api.log_message("Not enough Psychbucks to spin.", LogCategory::Warning);
        return Err(e);
    }
    let reels = [(); 3].map(|_| SYMBOLS[rng() as usize % SYMBOLS.len()]);
    let win = payout(&reels);

    // Winnings bypass the ledger, as minigame credits do.
    api.state_mut().ledger.psychbucks += win;
    if reels.iter().all(|s| *s == reels[0]) {
        let text = format!("Jackpot! {} x3 +{} PB", reels[0].name(), win);
        api.log_message(&text, LogCategory::Unlock);
    } else if win > 0.0 {
        api.log_message(&format!("Small win! +{} PB", win), LogCategory::Info);
    } else {
        api.log_message("No win this time.", LogCategory::Warning);
    }
    api.update_displays();
    Ok(Spin { reels, win })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psych::PsychGame;

    fn fixed(values: Vec<u32>) -> impl FnMut() -> u32 {
        let mut it = values.into_iter().cycle();
        move || it.next().unwrap_or(0)
    }

    #[test]
    fn payout_table() {
        use Symbol::*;
        assert_eq!(payout(&[Neuron, Neuron, Neuron]), 20.0);
        assert_eq!(payout(&[Notepad, Notepad, Notepad]), 5.0);
        assert_eq!(payout(&[Brain, Freud, Brain]), 2.0);
        assert_eq!(payout(&[Brain, Freud, Pavlov]), 0.0);
    }

    #[test]
    fn jackpot_credits_and_notifies() {
        let mut game = PsychGame::new();
        game.state.ledger.psychbucks = 3.0;
        let mut rng = fixed(vec![0]);
        let result = spin(&mut game, &mut rng).unwrap();
        assert_eq!(result.reels, [Symbol::Neuron; 3]);
        assert!((game.state.ledger.psychbucks - 22.0).abs() < 0.001);
        assert!(game.state.log.iter().any(|e| e.text.starts_with("Jackpot!")));
    }

    #[test]
    fn losing_spin_costs_one() {
        let mut game = PsychGame::new();
        game.state.ledger.psychbucks = 3.0;
        let mut rng = fixed(vec![0, 1, 2]);
        let result = spin(&mut game, &mut rng).unwrap();
        assert_eq!(result.win, 0.0);
        assert!((game.state.ledger.psychbucks - 2.0).abs() < 0.001);
    }

    #[test]
    fn broke_player_cannot_spin() {
        let mut game = PsychGame::new();
        game.state.ledger.psychbucks = 0.5;
        let mut rng = fixed(vec![0]);
        assert!(spin(&mut game, &mut rng).is_err());
        assert!((game.state.ledger.psychbucks - 0.5).abs() < 0.001);
    }
}
