//! Collatz sequences and range-wide longest-sequence search.
//!
//! Both backends share the overflow threshold and the tie-break policy:
//! the first seed to reach a maximum length keeps it.

use std::fmt;

use crate::backend::Backend;
use crate::cancel::CancelToken;
use crate::error::EngineError;

/// Largest odd value for which `3n + 1` still fits in a `u64`
pub const OVERFLOW_THRESHOLD: u64 = (u64::MAX - 1) / 3;

/// One element of a sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Value(u64),
    /// The next value would not fit; always the last element
    Overflow,
}

impl Term {
    pub fn value(self) -> Option<u64> {
        match self {
            Term::Value(v) => Some(v),
            Term::Overflow => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Value(v) => write!(f, "{}", v),
            Term::Overflow => write!(f, "?"),
        }
    }
}

/// A finished sequence: seed first, then `1` or `Overflow` last
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    terms: Vec<Term>,
}

impl Sequence {
    pub(crate) fn from_terms(terms: Vec<Term>) -> Self {
        debug_assert!(!terms.is_empty());
        Self { terms }
    }

    /// The `[0]` result for non-positive seeds
    pub(crate) fn degenerate() -> Self {
        Self { terms: vec![Term::Value(0)] }
    }

    pub fn seed(&self) -> u64 {
        self.terms.first().and_then(|t| t.value()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// Largest finite value reached
    pub fn peak(&self) -> Option<u64> {
        self.terms.iter().filter_map(|t| t.value()).max()
    }

    pub fn overflowed(&self) -> bool {
        matches!(self.terms.last(), Some(Term::Overflow))
    }

    /// Plain values, dropping the overflow marker
    pub fn values(&self) -> Vec<u64> {
        self.terms.iter().filter_map(|t| t.value()).collect()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Seed with the longest sequence in a range, and that length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeResult {
    pub number: u64,
    pub length: usize,
}

impl RangeResult {
    /// Result for an empty range
    pub const EMPTY: RangeResult = RangeResult { number: 1, length: 0 };

    /// Keep `self` unless `other` is strictly longer, or equally long with a
    /// smaller seed. Order-independent, so parallel reductions agree with a
    /// serial scan.
    pub fn better(self, other: RangeResult) -> RangeResult {
        if other.length > self.length || (other.length == self.length && other.number < self.number) {
            other
        } else {
            self
        }
    }
}

/// Sequence operations implemented by both compute backends
pub trait SequenceEngine: Send + Sync {
    fn backend(&self) -> Backend;

    /// Full sequence from `seed`; `[0]` for non-positive seeds
    fn compute_sequence(&self, seed: i64) -> Sequence;

    /// Length of `compute_sequence(seed)` without building it
    fn sequence_length(&self, seed: i64) -> usize;

    /// Longest sequence over `[1, limit]`, or `EngineError::Cancelled`
    fn find_max_in_range_cancellable(
        &self,
        limit: u64,
        cancel: &CancelToken,
    ) -> Result<RangeResult, EngineError>;

    /// Longest sequence over `[1, limit]`; ties go to the smallest seed
    fn find_max_in_range(&self, limit: u64) -> RangeResult {
        // A token nobody else holds can never fire
        self.find_max_in_range_cancellable(limit, &CancelToken::new())
            .unwrap_or(RangeResult::EMPTY)
    }

    /// One sequence per seed, in order
    fn compute_many(&self, seeds: &[i64]) -> Vec<Sequence> {
        seeds.iter().map(|&seed| self.compute_sequence(seed)).collect()
    }
}

/// Positive seed as u64, or None for the degenerate case
#[inline]
pub(crate) fn positive_seed(seed: i64) -> Option<u64> {
    u64::try_from(seed).ok().filter(|&n| n > 0)
}

/// Length of the sequence from a positive `n`, counting one element per
/// value and one for an overflow marker.
#[inline]
pub fn collatz_length(mut n: u64) -> usize {
    let mut length = 1;
    while n != 1 {
        if n % 2 == 0 {
            n /= 2;
        } else if n > OVERFLOW_THRESHOLD {
            return length + 1;
        } else {
            n = 3 * n + 1;
        }
        length += 1;
    }
    length
}

/// Pure reference implementation: one step per loop iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollatzFallback;

impl SequenceEngine for CollatzFallback {
    fn backend(&self) -> Backend {
        Backend::Fallback
    }

    fn compute_sequence(&self, seed: i64) -> Sequence {
        let Some(mut n) = positive_seed(seed) else {
            return Sequence::degenerate();
        };

        let mut terms = vec![Term::Value(n)];
        while n != 1 {
            if n % 2 == 0 {
                n /= 2;
            } else if n > OVERFLOW_THRESHOLD {
                terms.push(Term::Overflow);
                break;
            } else {
                n = 3 * n + 1;
            }
            terms.push(Term::Value(n));
        }
        Sequence::from_terms(terms)
    }

    fn sequence_length(&self, seed: i64) -> usize {
        positive_seed(seed).map_or(1, collatz_length)
    }

    fn find_max_in_range_cancellable(
        &self,
        limit: u64,
        cancel: &CancelToken,
    ) -> Result<RangeResult, EngineError> {
        let mut best = RangeResult::EMPTY;
        for n in 1..=limit {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            let length = collatz_length(n);
            if length > best.length {
                best = RangeResult { number: n, length };
            }
        }
        Ok(best)
    }
}
