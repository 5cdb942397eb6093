/// Three 8-hour settlements a day for seven days.
pub const MIN_WEEKLY_OBSERVATIONS: usize = 21;

/// A symbol's week counts only if every funding cycle is present. Newly
/// listed or thinly tracked markets come back short and are dropped whole.
pub fn is_complete_week<T>(observations: &[T]) -> bool {
    observations.len() >= MIN_WEEKLY_OBSERVATIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(!is_complete_week(&[(); 20]));
        assert!(is_complete_week(&[(); 21]));
        assert!(is_complete_week(&[(); 22]));
        assert!(!is_complete_week::<u8>(&[]));
    }
}
