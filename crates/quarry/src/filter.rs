//! Lazy filtering of element sequences.
//!
//! [`Filter`] wraps a source iterator and holds at most one evaluated
//! element of lookahead, so `has_next` can answer without losing anything.

use crate::error::{QuarryError, Result};
use crate::evaluator::Evaluator;
use crate::traits::Attributes;

/// Iterator over the elements of a source whose match result equals the
/// requested value.
///
/// Yields `Ok(element)` for selected elements and `Err(_)` in place of any
/// element that failed to evaluate; iteration may continue after an error.
pub struct Filter<'e, I: Iterator> {
    evaluator: &'e Evaluator,
    source: I,
    matching: bool,
    peeked: Option<Result<I::Item>>,
}

impl<'e, I> Filter<'e, I>
where
    I: Iterator,
    I::Item: Attributes,
{
    pub(crate) fn new(evaluator: &'e Evaluator, source: I, matching: bool) -> Self {
        Filter {
            evaluator,
            source,
            matching,
            peeked: None,
        }
    }

    /// Returns `true` if another element (or error) is available, without
    /// consuming it.
    pub fn has_next(&mut self) -> bool {
        self.prime();
        self.peeked.is_some()
    }

    /// Returns the next element without consuming it.
    pub fn peek(&mut self) -> Option<&Result<I::Item>> {
        self.prime();
        self.peeked.as_ref()
    }

    /// Like [`Iterator::next`], but reports exhaustion as
    /// [`QuarryError::Exhausted`].
    pub fn try_next(&mut self) -> Result<I::Item> {
        self.next().unwrap_or(Err(QuarryError::Exhausted))
    }

    fn prime(&mut self) {
        if self.peeked.is_none() {
            self.peeked = self.advance();
        }
    }

    fn advance(&mut self) -> Option<Result<I::Item>> {
        for item in self.source.by_ref() {
            match self.evaluator.matches(&item) {
                Ok(matched) if matched == self.matching => return Some(Ok(item)),
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

impl<I> Iterator for Filter<'_, I>
where
    I: Iterator,
    I::Item: Attributes,
{
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.prime();
        self.peeked.take()
    }
}

/// Restartable filtered view over a borrowed slice.
///
/// Each call to [`iter`](Self::iter), or each `for` loop over `&view`,
/// starts a new [`Filter`] from the beginning of the slice.
pub struct FilterView<'e, 'c, T> {
    evaluator: &'e Evaluator,
    collection: &'c [T],
    matching: bool,
}

impl<'e, 'c, T: Attributes> FilterView<'e, 'c, T> {
    pub(crate) fn new(evaluator: &'e Evaluator, collection: &'c [T], matching: bool) -> Self {
        FilterView {
            evaluator,
            collection,
            matching,
        }
    }

    /// Starts a fresh pass over the slice.
    pub fn iter(&self) -> Filter<'e, std::slice::Iter<'c, T>> {
        Filter::new(self.evaluator, self.collection.iter(), self.matching)
    }
}

impl<'e, 'c, T: Attributes> IntoIterator for &FilterView<'e, 'c, T> {
    type Item = Result<&'c T>;
    type IntoIter = Filter<'e, std::slice::Iter<'c, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
