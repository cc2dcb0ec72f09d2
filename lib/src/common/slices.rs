//! # Slice Helpers (`common::slices`)
//!
//! File: lib/src/common/slices.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Small generic helpers over slices and vectors: membership, comparison,
//! set-like operations, chunking, padding and randomisation. Functions that
//! build a new collection return an owned `Vec` and leave their inputs alone.
//!
//! Set-like helpers (`diff`, `intersect`, `unique`) only require `PartialEq`
//! and are quadratic; they are meant for the short lists found in
//! configuration and argument handling.
//!
//! ## Usage
//!
//! ```rust
//! use cmdkit::common::slices;
//!
//! let chunks = slices::chunk(&[1, 2, 3, 4, 5], 2);
//! assert_eq!(chunks, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
//! assert_eq!(slices::range(1, 10, 3), vec![1, 4, 7, 10]);
//! ```
//!
use rand::{seq::SliceRandom, Rng};
use std::iter::Sum;

/// Appends `item` unless an equal element is already present.
pub fn append_unique<T: PartialEq>(mut items: Vec<T>, item: T) -> Vec<T> {
    if !items.contains(&item) {
        items.push(item);
    }
    items
}

/// Same elements in the same order.
pub fn equal_ordered<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a == b
}

/// Same elements with the same multiplicities, in any order.
pub fn equal_unordered<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut remaining: Vec<&T> = b.iter().collect();
    for item in a {
        match remaining.iter().position(|candidate| *candidate == item) {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => return false,
        }
    }
    remaining.is_empty()
}

/// Case-insensitive membership test for string-like items.
pub fn contains_ignore_case<S: AsRef<str>>(items: &[S], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    items
        .iter()
        .any(|item| item.as_ref().to_lowercase() == needle)
}

pub fn contains<T: PartialEq>(items: &[T], item: &T) -> bool {
    items.contains(item)
}

/// Shuffled permutation of every integer in `min..=max`.
///
/// The bounds are swapped if `max < min`.
pub fn rand_range_list(min: i64, max: i64) -> Vec<i64> {
    let (low, high) = if max < min { (max, min) } else { (min, max) };
    let mut list: Vec<i64> = (low..=high).collect();
    list.shuffle(&mut rand::thread_rng());
    list
}

/// `a` followed by `b`.
pub fn merge<T: Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    merged.extend_from_slice(a);
    merged.extend_from_slice(b);
    merged
}

pub fn map_all<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    F: FnMut(&T) -> U,
{
    items.iter().map(f).collect()
}

/// Uniformly random element, or `None` for an empty slice.
pub fn rand_pick<T>(items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..items.len());
    items.get(index)
}

pub fn sum<T: Copy + Sum<T>>(items: &[T]) -> T {
    items.iter().copied().sum()
}

pub fn filter<T, F>(items: &[T], mut keep: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    items.iter().filter(|item| keep(item)).cloned().collect()
}

/// Elements of `a` that do not occur in `b`, in `a`'s order.
pub fn diff<T: PartialEq + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().filter(|item| !b.contains(item)).cloned().collect()
}

/// Elements of `a` that also occur in `b`, in `a`'s order.
pub fn intersect<T: PartialEq + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().filter(|item| b.contains(item)).cloned().collect()
}

/// Splits `items` into consecutive chunks of `size`; the last chunk may be shorter.
///
/// A `size` of zero, or one at least as large as the slice, yields the whole
/// slice as a single chunk.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    if size == 0 || size >= items.len() {
        return vec![items];
    }
    items.chunks(size).collect()
}

/// `start, start + step, ...` up to and including `end`.
///
/// Empty when `step` is not positive.
pub fn range(start: i64, end: i64, step: i64) -> Vec<i64> {
    let mut values = Vec::new();
    if step <= 0 {
        return values;
    }
    let mut current = start;
    while current <= end {
        values.push(current);
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    values
}

/// Appends copies of `value` until `items` has `size` elements.
pub fn pad<T: Clone>(mut items: Vec<T>, size: usize, value: T) -> Vec<T> {
    if items.len() < size {
        items.resize(size, value);
    }
    items
}

/// First occurrence of each element, in original order.
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut seen: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(item) {
            seen.push(item.clone());
        }
    }
    seen
}

/// Shuffles `items` in place (Fisher-Yates).
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::thread_rng());
}

/// Copy of `items` with `insertion` placed before position `index`.
///
/// An `index` past the end appends.
pub fn insert<T: Clone>(items: &[T], index: usize, insertion: &[T]) -> Vec<T> {
    let index = index.min(items.len());
    let mut result = Vec::with_capacity(items.len() + insertion.len());
    result.extend_from_slice(&items[..index]);
    result.extend_from_slice(insertion);
    result.extend_from_slice(&items[index..]);
    result
}

/// Copy of `items` without the half-open range `start..end`.
///
/// Both bounds are clamped to the slice, so an out-of-range request removes
/// whatever part of the range exists.
pub fn remove_range<T: Clone>(items: &[T], start: usize, end: usize) -> Vec<T> {
    let start = start.min(items.len());
    let end = end.clamp(start, items.len());
    let mut result = Vec::with_capacity(items.len() - (end - start));
    result.extend_from_slice(&items[..start]);
    result.extend_from_slice(&items[end..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_unique() {
        let items = append_unique(vec!["a", "b"], "b");
        assert_eq!(items, vec!["a", "b"]);
        let items = append_unique(items, "c");
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_equality_helpers() {
        assert!(equal_ordered(&[1, 2, 3], &[1, 2, 3]));
        assert!(!equal_ordered(&[1, 2, 3], &[3, 2, 1]));
        assert!(equal_unordered(&[1, 2, 2, 3], &[2, 3, 2, 1]));
        assert!(!equal_unordered(&[1, 1, 2], &[1, 2, 2]));
        assert!(!equal_unordered(&[1, 2], &[1, 2, 3]));
    }

    #[test]
    fn test_contains_helpers() {
        assert!(contains_ignore_case(&["Alpha", "beta"], "ALPHA"));
        assert!(!contains_ignore_case(&[String::from("Straße")], "STRASSE"));
        assert!(!contains_ignore_case::<&str>(&[], "x"));
        assert!(contains(&[10_i64, 20], &20));
        assert!(!contains(&[10_u16, 20], &30));
    }

    #[test]
    fn test_rand_range_list_is_a_permutation() {
        let mut list = rand_range_list(5, -2);
        assert_eq!(list.len(), 8);
        list.sort_unstable();
        assert_eq!(list, (-2..=5).collect::<Vec<_>>());
        assert_eq!(rand_range_list(3, 3), vec![3]);
    }

    #[test]
    fn test_merge_map_sum_filter() {
        assert_eq!(merge(&[1, 2], &[3]), vec![1, 2, 3]);
        assert_eq!(map_all(&[1, 2, 3], |n| n * 10), vec![10, 20, 30]);
        assert_eq!(map_all(&["a", "bb"], |s| s.len()), vec![1, 2]);
        assert_eq!(sum(&[1_i64, 2, 3]), 6);
        assert_eq!(sum::<f64>(&[]), 0.0);
        assert_eq!(filter(&[1, 2, 3, 4], |n| n % 2 == 0), vec![2, 4]);
    }

    #[test]
    fn test_rand_pick() {
        assert_eq!(rand_pick::<u8>(&[]), None);
        let items = ["x", "y", "z"];
        for _ in 0..20 {
            let picked = rand_pick(&items).unwrap();
            assert!(items.contains(picked));
        }
    }

    #[test]
    fn test_diff_and_intersect() {
        let a = [1, 2, 3, 4];
        let b = [3, 4, 5];
        assert_eq!(diff(&a, &b), vec![1, 2]);
        assert_eq!(intersect(&a, &b), vec![3, 4]);
        assert!(intersect(&a, &[9]).is_empty());
    }

    #[test]
    fn test_chunk() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(chunk(&items, 2), vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
        assert_eq!(chunk(&items, 5), vec![&items[..]]);
        assert_eq!(chunk(&items, 9), vec![&items[..]]);
        assert_eq!(chunk(&items, 0), vec![&items[..]]);
    }

    #[test]
    fn test_range() {
        assert_eq!(range(0, 10, 5), vec![0, 5, 10]);
        assert_eq!(range(1, 10, 4), vec![1, 5, 9]);
        assert!(range(5, 1, 1).is_empty());
        assert!(range(0, 10, 0).is_empty());
        assert!(range(0, 10, -1).is_empty());
        assert_eq!(range(i64::MAX - 1, i64::MAX, 5), vec![i64::MAX - 1]);
    }

    #[test]
    fn test_pad_and_unique() {
        assert_eq!(pad(vec![1], 3, 0), vec![1, 0, 0]);
        assert_eq!(pad(vec![1, 2, 3], 2, 0), vec![1, 2, 3]);
        assert_eq!(unique(&["a", "b", "a", "c", "b"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items);
        assert_eq!(items.len(), 50);
        items.sort_unstable();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_insert() {
        assert_eq!(insert(&[1, 4], 1, &[2, 3]), vec![1, 2, 3, 4]);
        assert_eq!(insert(&[1], 0, &[0]), vec![0, 1]);
        assert_eq!(insert(&[1], 7, &[2]), vec![1, 2]);
    }

    #[test]
    fn test_remove_range() {
        let items = [0, 1, 2, 3, 4, 5];
        assert_eq!(remove_range(&items, 4, 5), vec![0, 1, 2, 3, 5]);
        assert_eq!(remove_range(&items, 1, 3), vec![0, 3, 4, 5]);
        assert_eq!(remove_range(&items, 4, 100), vec![0, 1, 2, 3]);
        assert_eq!(remove_range(&items, 9, 12), items.to_vec());
        assert_eq!(remove_range(&items, 3, 1), items.to_vec());
    }
}
