//! Starvation predicate and hunger timers.

use crate::state::Hunger;
use crate::Tick;

/// A pet starves once `now` reaches its hunger deadline.
pub fn is_starving(hunger: &Hunger, now: Tick) -> bool {
    now >= hunger.hungry_at
}

pub fn ticks_until_hungry(hunger: &Hunger, now: Tick) -> u64 {
    hunger.hungry_at.saturating_sub(now)
}

pub fn ticks_since_fed(hunger: &Hunger, now: Tick) -> u64 {
    now.saturating_sub(hunger.last_fed_at)
}

/// Renew the hunger deadline after a meal at `now`.
pub fn renew(hunger: &mut Hunger, now: Tick, window: u64) {
    hunger.last_fed_at = now;
    hunger.hungry_at = now.saturating_add(window);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starving_at_deadline() {
        let h = Hunger {
            last_fed_at: 0,
            hungry_at: 100,
        };
        assert!(!is_starving(&h, 99));
        assert!(is_starving(&h, 100));
        assert!(is_starving(&h, 101));
    }

    #[test]
    fn timers() {
        let h = Hunger {
            last_fed_at: 10,
            hungry_at: 100,
        };
        assert_eq!(ticks_until_hungry(&h, 40), 60);
        assert_eq!(ticks_until_hungry(&h, 400), 0);
        assert_eq!(ticks_since_fed(&h, 40), 30);
        assert_eq!(ticks_since_fed(&h, 0), 0);
    }

    #[test]
    fn renew_resets_window() {
        let mut h = Hunger {
            last_fed_at: 0,
            hungry_at: 5,
        };
        renew(&mut h, 50, 300);
        assert_eq!(h.last_fed_at, 50);
        assert_eq!(h.hungry_at, 350);
    }
}
