//! Lexicographic ordering of lists of naturals.
//!
//! Ranking the structures of a level requires sorting variable-length lists
//! of codes. [`lexicographic_order`] does so with a positional bucket sort in
//! time linear in the total number of entries plus the largest value, which
//! stays linear overall since the codes of a level never exceed the number of
//! distinct structures one level below. [`SortStrategy::Comparison`] uses the
//! standard library's stable sort instead.
//!
//! Both return the same permutation: the order is lexicographic with a proper
//! prefix placed before its extensions, and equal lists keep their input
//! order.

use std::collections::VecDeque;

/// How the structures of a level are ordered before ranking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortStrategy {
    /// Positional bucket (radix) sort.
    #[default]
    Bucket,
    /// Stable comparison sort.
    Comparison,
}

impl SortStrategy {
    /// The permutation of `0..lists.len()` listing `lists` in sorted order.
    pub fn order<L, T>(self, lists: &[L]) -> Vec<usize>
    where
        L: AsRef<[T]>,
        T: Copy + Ord + Into<usize>,
    {
        match self {
            SortStrategy::Bucket => lexicographic_order(lists),
            SortStrategy::Comparison => {
                let mut order: Vec<usize> = (0..lists.len()).collect();
                order.sort_by(|&a, &b| lists[a].as_ref().cmp(lists[b].as_ref()));
                order
            }
        }
    }
}

fn max_value<L, T>(lists: &[L]) -> Option<usize>
where
    L: AsRef<[T]>,
    T: Copy + Into<usize>,
{
    lists
        .iter()
        .flat_map(|list| list.as_ref().iter())
        .map(|&v| v.into())
        .max()
}

/// For every position `p`, the distinct values found at position `p` of some
/// list, in increasing order. The result has one entry per position up to the
/// longest list.
pub fn categorize_entries<L, T>(lists: &[L]) -> Vec<Vec<T>>
where
    L: AsRef<[T]>,
    T: Copy + Ord + Into<usize>,
{
    let Some(max_value) = max_value(lists) else {
        return Vec::new();
    };
    let max_len = lists.iter().map(|l| l.as_ref().len()).max().unwrap_or(0);

    // Bucketing by value first makes the second pass emit each position's
    // values already sorted.
    let mut by_value: Vec<Vec<(usize, T)>> = vec![Vec::new(); max_value + 1];
    for list in lists {
        for (position, &value) in list.as_ref().iter().enumerate() {
            by_value[value.into()].push((position, value));
        }
    }

    let mut by_position: Vec<Vec<T>> = vec![Vec::new(); max_len];
    for (position, value) in by_value.into_iter().flatten() {
        let bucket = &mut by_position[position];
        if bucket.last() != Some(&value) {
            bucket.push(value);
        }
    }
    by_position
}

/// Indices of the lists grouped by length: entry `k` holds the indices of
/// the lists of length `k`, in input order.
pub fn categorize_lists<L, T>(lists: &[L]) -> Vec<Vec<usize>>
where
    L: AsRef<[T]>,
{
    let max_len = lists.iter().map(|l| l.as_ref().len()).max().unwrap_or(0);
    let mut by_length = vec![Vec::new(); max_len + 1];
    for (index, list) in lists.iter().enumerate() {
        by_length[list.as_ref().len()].push(index);
    }
    by_length
}

/// Positional bucket sort of `lists`, returning the sorting permutation.
///
/// Positions are processed from the last to the first. Before bucketing on
/// position `p`, the lists of length exactly `p + 1` join the front of the
/// queue: their suffix past `p` is empty, so they precede every longer list
/// agreeing with them at `p`.
pub fn lexicographic_order<L, T>(lists: &[L]) -> Vec<usize>
where
    L: AsRef<[T]>,
    T: Copy + Ord + Into<usize>,
{
    let entries = categorize_entries(lists);
    let mut by_length = categorize_lists(lists);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_value(lists).map_or(0, |m| m + 1)];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(lists.len());

    for position in (0..entries.len()).rev() {
        for &index in by_length[position + 1].iter().rev() {
            queue.push_front(index);
        }
        for index in queue.drain(..) {
            let value = lists[index].as_ref()[position];
            buckets[value.into()].push(index);
        }
        for value in &entries[position] {
            queue.extend(buckets[(*value).into()].drain(..));
        }
    }

    let mut order = std::mem::take(&mut by_length[0]);
    order.extend(queue);
    order
}
