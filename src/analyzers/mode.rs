use std::collections::HashMap;
use std::hash::Hash;

use crate::analyzers::types::ModeCount;
use crate::error::{StatsError, StatsResult};

/// Counts occurrences of each distinct value.
///
/// The result lists values in the order they first appear in `values`, so
/// it is stable across runs regardless of hashing.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut tallies: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => tallies[slot].1 += 1,
            None => {
                slots.insert(value.clone(), tallies.len());
                tallies.push((value, 1));
            }
        }
    }

    tallies
}

/// Returns the most frequent value and how often it occurs.
///
/// Ties go to the value whose first occurrence comes earliest. Because a
/// filtered dataset is a subsequence of its source, that is also the
/// earliest first occurrence in the unfiltered order.
///
/// # Errors
///
/// [`StatsError::EmptyInput`] if `values` yields nothing.
pub fn mode_count<T, I>(values: I) -> StatsResult<ModeCount<T>>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut best: Option<(T, usize)> = None;

    for (value, count) in value_counts(values) {
        let better = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if better {
            best = Some((value, count));
        }
    }

    best.map(|(value, count)| ModeCount { value, count })
        .ok_or(StatsError::EmptyInput)
}

/// Like [`mode_count`], but ties go to the smallest value.
///
/// # Errors
///
/// [`StatsError::EmptyInput`] if `values` yields nothing.
pub fn smallest_mode_count<T, I>(values: I) -> StatsResult<ModeCount<T>>
where
    I: IntoIterator<Item = T>,
    T: Ord + Hash + Clone,
{
    value_counts(values)
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(value, count)| ModeCount { value, count })
        .ok_or(StatsError::EmptyInput)
}
