// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lazy k-way merge of already-sorted sequences
//!
//! Used to walk the wildcard interceptor set and a group's own set as one
//! ordered sequence without building a combined collection.

use crate::order::{compare, Prioritized};
use std::cmp::Ordering;
use std::iter::FusedIterator;

struct Head<I: Iterator> {
    current: I::Item,
    rest: I,
}

/// Iterator yielding the union of several sorted sequences in sorted order
///
/// Each step selects the minimum across the current heads; ties go to the
/// sequence supplied first. A sequence is dropped once exhausted.
pub struct MergeSorted<I: Iterator, F> {
    heads: Vec<Head<I>>,
    cmp: F,
}

impl<I, F> MergeSorted<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    pub fn new(sources: impl IntoIterator<Item = I>, cmp: F) -> Self {
        let heads = sources
            .into_iter()
            .filter_map(|mut rest| rest.next().map(|current| Head { current, rest }))
            .collect();
        Self { heads, cmp }
    }

    fn min_index(&mut self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in 0..self.heads.len() {
            best = match best {
                Some(b) if (self.cmp)(&self.heads[i].current, &self.heads[b].current)
                    != Ordering::Less =>
                {
                    Some(b)
                }
                _ => Some(i),
            };
        }
        best
    }
}

impl<I, F> Iterator for MergeSorted<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let best = self.min_index()?;
        match self.heads[best].rest.next() {
            Some(next) => Some(std::mem::replace(&mut self.heads[best].current, next)),
            None => Some(self.heads.remove(best).current),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heads.iter().fold((0, Some(0)), |(lo, hi), head| {
            let (rest_lo, rest_hi) = head.rest.size_hint();
            (
                lo.saturating_add(rest_lo).saturating_add(1),
                hi.zip(rest_hi)
                    .and_then(|(a, b)| a.checked_add(b)?.checked_add(1)),
            )
        })
    }
}

impl<I, F> FusedIterator for MergeSorted<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
}

/// Merge interceptor sequences by priority, then registration order
pub fn merge_prioritized<I>(
    sources: impl IntoIterator<Item = I>,
) -> MergeSorted<I, fn(&I::Item, &I::Item) -> Ordering>
where
    I: Iterator,
    I::Item: Prioritized,
{
    MergeSorted::new(sources, compare::<I::Item>)
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
