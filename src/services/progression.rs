//! Progression Engine
//!
//! Owns experience points and derives the level from them. The level is a
//! pure function of cumulative experience and is recomputed on every grant,
//! never stored independently.

use crate::error::GameError;
use crate::types::Account;

/// Level for a given experience total: `xp / threshold + 1`.
///
/// Monotonic in `xp`; a fresh account at 0 XP is level 1.
pub fn level_for_xp(xp: u64, level_threshold: u64) -> u32 {
    (xp / level_threshold.max(1)) as u32 + 1
}

/// Grant experience and recompute the level.
///
/// Negative amounts are rejected; experience never decreases. Returns the
/// new level.
pub fn grant_xp(account: &mut Account, amount: i64, level_threshold: u64) -> Result<u32, GameError> {
    if amount < 0 {
        return Err(GameError::InvalidXpGrant(amount));
    }

    account.experience_points += amount as u64;
    account.level = level_for_xp(account.experience_points, level_threshold);
    Ok(account.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u64 = 1_000;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_xp(0, THRESHOLD), 1);
        assert_eq!(level_for_xp(999, THRESHOLD), 1);
        assert_eq!(level_for_xp(1_000, THRESHOLD), 2);
        assert_eq!(level_for_xp(1_999, THRESHOLD), 2);
        assert_eq!(level_for_xp(2_000, THRESHOLD), 3);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut last = 0;
        for xp in (0..10_000).step_by(137) {
            let level = level_for_xp(xp, THRESHOLD);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_grant_accumulates_and_levels() {
        let mut account = Account::new("player-1".to_string(), 10_000.0);

        assert_eq!(grant_xp(&mut account, 400, THRESHOLD).unwrap(), 1);
        assert_eq!(grant_xp(&mut account, 700, THRESHOLD).unwrap(), 2);
        assert_eq!(account.experience_points, 1_100);
        assert_eq!(account.level, 2);
    }

    #[test]
    fn test_negative_grant_rejected() {
        let mut account = Account::new("player-1".to_string(), 10_000.0);
        grant_xp(&mut account, 300, THRESHOLD).unwrap();

        let err = grant_xp(&mut account, -50, THRESHOLD).unwrap_err();
        assert!(matches!(err, GameError::InvalidXpGrant(-50)));
        assert_eq!(account.experience_points, 300);
        assert_eq!(account.level, 1);
    }

    #[test]
    fn test_level_always_derived_from_xp() {
        let mut account = Account::new("player-1".to_string(), 10_000.0);
        for _ in 0..57 {
            grant_xp(&mut account, 50, THRESHOLD).unwrap();
            assert_eq!(account.level, level_for_xp(account.experience_points, THRESHOLD));
        }
    }
}
