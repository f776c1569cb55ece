//! Scoring module - line points, derived level, drop speed.
//!
//! Level and drop interval are derived values, never stored independently:
//! `level = lines / 10 + 1`, and the interval shrinks by 50ms per level above
//! one, clamped at a 100ms floor.

use crate::types::{
    Difficulty, DROP_INTERVAL_FLOOR_MS, LEVEL_SPEEDUP_MS, LINES_PER_LEVEL, LINE_POINTS,
};

/// Points for clearing `cleared` rows in one lock at the given level.
pub fn line_points(cleared: usize, level: u32) -> u32 {
    if cleared == 0 || cleared > 4 {
        return 0;
    }
    LINE_POINTS[cleared] * level
}

/// Level derived from the total cleared-line count.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Interval between forced downward moves, from the per-difficulty base,
/// monotonically shrinking with level and floored at 100ms.
pub fn drop_interval_ms(difficulty: Difficulty, level: u32) -> u32 {
    difficulty
        .base_drop_ms()
        .saturating_sub(LEVEL_SPEEDUP_MS * level.saturating_sub(1))
        .max(DROP_INTERVAL_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points_table() {
        assert_eq!(line_points(0, 3), 0);
        assert_eq!(line_points(1, 1), 100);
        assert_eq!(line_points(2, 3), 900);
        assert_eq!(line_points(3, 2), 1000);
        assert_eq!(line_points(4, 1), 800);
    }

    #[test]
    fn test_level_derivation() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(23), 3);
        assert_eq!(level_for_lines(100), 11);
    }

    #[test]
    fn test_drop_interval_speeds_up() {
        assert_eq!(drop_interval_ms(Difficulty::Easy, 1), 700);
        assert_eq!(drop_interval_ms(Difficulty::Easy, 2), 650);
        assert_eq!(drop_interval_ms(Difficulty::Medium, 1), 400);
        assert_eq!(drop_interval_ms(Difficulty::Hard, 1), 200);
    }

    #[test]
    fn test_drop_interval_floor() {
        // At level 100 with a 700ms base the raw value would be negative.
        assert_eq!(drop_interval_ms(Difficulty::Easy, 100), 100);
        assert_eq!(drop_interval_ms(Difficulty::Hard, 3), 100);
        assert_eq!(drop_interval_ms(Difficulty::Hard, 50), 100);
    }
}
