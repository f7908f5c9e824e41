//! Part size calculation

use super::types::{MAX_PART_SIZE, MIN_PART_SIZE, PLANNED_PART_COUNT};

/// Size of every part of an upload of `total_size` bytes except possibly the last
///
/// Always within `[MIN_PART_SIZE, MAX_PART_SIZE]`.
pub fn calculate_part_size(total_size: u64) -> u64 {
    let candidate = (total_size / PLANNED_PART_COUNT).min(MAX_PART_SIZE);
    candidate.max(MIN_PART_SIZE)
}

/// Number of parts an upload of `total_size` bytes is split into
///
/// An empty object still has one (empty) part.
pub fn part_count(total_size: u64, part_size: u64) -> u64 {
    if total_size == 0 {
        return 1;
    }
    total_size.div_ceil(part_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn test_small_objects_use_floor() {
        assert_eq!(calculate_part_size(0), MIN_PART_SIZE);
        assert_eq!(calculate_part_size(1), MIN_PART_SIZE);
        assert_eq!(calculate_part_size(5 * MIB), MIN_PART_SIZE);
        assert_eq!(calculate_part_size(11 * MIB), 5 * MIB);
    }

    #[test]
    fn test_scales_with_total() {
        assert_eq!(calculate_part_size(9999 * 10 * MIB), 10 * MIB);
    }

    #[test]
    fn test_clamped_to_ceiling() {
        assert_eq!(calculate_part_size(u64::MAX), MAX_PART_SIZE);
        assert_eq!(calculate_part_size(PLANNED_PART_COUNT * (MAX_PART_SIZE + 1)), MAX_PART_SIZE);
    }

    #[test]
    fn test_always_in_range() {
        let mut size = 1u64;
        while size < u64::MAX / 3 {
            let part = calculate_part_size(size);
            assert!((MIN_PART_SIZE..=MAX_PART_SIZE).contains(&part), "size {}", size);
            size = size * 3 + 7;
        }
    }

    #[test]
    fn test_part_count() {
        assert_eq!(part_count(0, 5 * MIB), 1);
        assert_eq!(part_count(11 * MIB, 5 * MIB), 3);
        assert_eq!(part_count(10 * MIB, 5 * MIB), 2);
    }
}
