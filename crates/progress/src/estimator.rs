//! Remaining-set estimation.

/// Estimate how many more sets the outstanding reps represent.
///
/// Returns 0 once the target is met or exceeded. Otherwise the outstanding
/// reps are scaled to sets and any partial set counts as a whole one: the
/// quotient gets `+1` when `remaining_reps % target_reps` is non-zero.
///
/// `target_reps` must be non-zero; callers guard it before estimating.
pub fn remaining_sets(remaining_reps: i64, target_reps: u32, target_sets: u32) -> u32 {
    if remaining_reps <= 0 {
        return 0;
    }
    debug_assert!(target_reps > 0);

    let remaining = remaining_reps as u64;
    let reps = u64::from(target_reps);
    let quotient = remaining * u64::from(target_sets) / reps;
    let sets = if remaining % reps > 0 { quotient + 1 } else { quotient };
    u32::try_from(sets).unwrap_or(u32::MAX)
}
