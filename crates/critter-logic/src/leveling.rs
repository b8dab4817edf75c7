//! XP thresholds and level progression.
//!
//! Reaching level `n + 1` from level `n` costs `2^n` XP. Awarding XP applies
//! every level-up it pays for in one call, so after [`award_xp`] the pet
//! always holds less XP than its current threshold.
//!
//! ```
//! use critter_logic::leveling::{award_xp, xp_threshold};
//! use critter_logic::state::Progress;
//!
//! let mut progress = Progress::default();
//! let gained = award_xp(&mut progress, 7); // 2 for level 2, 4 for level 3
//! assert_eq!(gained, 2);
//! assert_eq!(progress.level, 3);
//! assert_eq!(progress.xp, 1);
//! assert_eq!(xp_threshold(3), Some(8));
//! ```

use crate::activity::ActivityKind;
use crate::config::Tuning;
use crate::state::Progress;

/// XP needed to leave `level`. `None` once the threshold no longer fits in
/// a `u64`, which makes that level unleavable.
pub fn xp_threshold(level: u32) -> Option<u64> {
    1u64.checked_shl(level)
}

/// Add XP and resolve cascading level-ups. Returns the number of levels gained.
pub fn award_xp(progress: &mut Progress, amount: u64) -> u32 {
    progress.xp = progress.xp.saturating_add(amount);

    let mut gained = 0;
    while let Some(threshold) = xp_threshold(progress.level) {
        if progress.xp < threshold {
            break;
        }
        progress.xp -= threshold;
        progress.level += 1;
        gained += 1;
    }
    gained
}

/// XP earned for `duration` ticks of `kind`. Sleep earns at a fraction of
/// the work rate.
pub fn activity_xp(kind: ActivityKind, duration: u64, tuning: &Tuning) -> u64 {
    let work_xp = duration.saturating_mul(tuning.work_xp_per_tick);
    match kind {
        ActivityKind::Work => work_xp,
        ActivityKind::Sleep => work_xp / tuning.sleep_xp_divisor.max(1),
    }
}

/// XP still missing before the next level-up.
pub fn xp_to_next_level(progress: &Progress) -> Option<u64> {
    xp_threshold(progress.level).map(|t| t.saturating_sub(progress.xp))
}

/// Progress through the current level, 0-100.
pub fn level_progress_percent(progress: &Progress) -> u8 {
    match xp_threshold(progress.level) {
        Some(threshold) => ((progress.xp as u128 * 100) / threshold as u128).min(100) as u8,
        None => 0,
    }
}
