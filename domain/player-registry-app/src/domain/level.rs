//! Experience to level conversion.
//!
//! Reaching level `n + 1` costs `50 * (n + 1) * (n + 2)` experience in total,
//! so the level for a given amount of experience is the largest `n` with
//! `50 * n * (n + 1) <= experience`.

/// Level reached with the given amount of experience.
/// Experience must already be validated as non-negative.
pub fn level_for(experience: i32) -> i32 {
    debug_assert!(experience >= 0, "negative experience {}", experience);
    let experience = f64::from(experience);
    (((2500.0 + 200.0 * experience).sqrt() - 50.0) / 100.0).floor() as i32
}

/// Experience still missing to reach `level + 1`.
pub fn until_next_level(experience: i32, level: i32) -> i32 {
    let level = i64::from(level);
    let threshold = 50 * (level + 1) * (level + 2);
    (threshold - i64::from(experience)) as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: i32,
    pub until_next_level: i32,
}

impl LevelProgress {
    pub fn from_experience(experience: i32) -> Self {
        let level = level_for(experience);
        Self {
            level,
            until_next_level: until_next_level(experience, level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::MAX_EXPERIENCE;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0), 0);
        assert_eq!(level_for(99), 0);
        assert_eq!(level_for(100), 1);
        assert_eq!(level_for(299), 1);
        assert_eq!(level_for(300), 2);
        assert_eq!(level_for(1000), 4);
        assert_eq!(level_for(MAX_EXPERIENCE), 446);
    }

    #[test]
    fn test_until_next_level() {
        assert_eq!(until_next_level(0, 0), 100);
        assert_eq!(until_next_level(100, 1), 200);
        assert_eq!(until_next_level(1000, 4), 500);
    }

    #[test]
    fn test_progress_is_consistent_over_range() {
        let mut experience = 0;
        while experience <= MAX_EXPERIENCE {
            let progress = LevelProgress::from_experience(experience);
            assert!(progress.level >= 0);
            assert!(progress.until_next_level > 0, "experience {}", experience);
            assert_eq!(progress, LevelProgress::from_experience(experience));
            experience += 997;
        }
        let top = LevelProgress::from_experience(MAX_EXPERIENCE);
        assert_eq!(top.until_next_level, 50 * 447 * 448 - MAX_EXPERIENCE);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "negative experience")]
    fn test_negative_experience_is_rejected() {
        level_for(-1);
    }
}
