//! Row and column targeting for option overlays.
//!
//! Indices are 0-based. [`Selector::Even`] picks indices 0, 2, 4, ... and
//! [`Selector::Odd`] picks 1, 3, 5, ...
//!
//! ```
//! use folio_table::selector::Selector;
//!
//! assert_eq!(Selector::Even.resolve("row", 5).unwrap(), vec![0, 2, 4]);
//! assert_eq!(Selector::from(1..3).resolve("row", 5).unwrap(), vec![1, 2]);
//! ```

use std::ops::{Range, RangeInclusive};

use crate::error::{Result, TableError};

/// A set of row or column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every index.
    All,
    /// Indices 1, 3, 5, ...
    Odd,
    /// Indices 0, 2, 4, ...
    Even,
    /// A single index.
    Index(usize),
    /// An explicit list of indices.
    Indices(Vec<usize>),
    /// A half-open range of indices.
    Range(Range<usize>),
}

impl Selector {
    /// Whether `index` is selected, ignoring bounds.
    #[must_use]
    pub fn matches(&self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Odd => index % 2 == 1,
            Self::Even => index % 2 == 0,
            Self::Index(i) => *i == index,
            Self::Indices(indices) => indices.contains(&index),
            Self::Range(range) => range.contains(&index),
        }
    }

    /// Expand into sorted, de-duplicated indices below `count`.
    ///
    /// `axis` names the dimension ("row" or "column") in the error.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSelector`] when an explicit index or the
    /// end of a range lies beyond `count`. `All`, `Odd` and `Even` never fail.
    pub fn resolve(&self, axis: &'static str, count: usize) -> Result<Vec<usize>> {
        let out_of_range = |index: usize| TableError::InvalidSelector { axis, index, count };

        match self {
            Self::All => Ok((0..count).collect()),
            Self::Odd | Self::Even => Ok((0..count).filter(|i| self.matches(*i)).collect()),
            Self::Index(i) => {
                if *i < count {
                    Ok(vec![*i])
                } else {
                    Err(out_of_range(*i))
                }
            }
            Self::Indices(indices) => {
                if let Some(bad) = indices.iter().find(|i| **i >= count) {
                    return Err(out_of_range(*bad));
                }
                let mut resolved = indices.clone();
                resolved.sort_unstable();
                resolved.dedup();
                Ok(resolved)
            }
            Self::Range(range) => {
                if range.end > count {
                    return Err(out_of_range(range.end - 1));
                }
                Ok(range.clone().collect())
            }
        }
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Range<usize>> for Selector {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range)
    }
}

impl From<RangeInclusive<usize>> for Selector {
    fn from(range: RangeInclusive<usize>) -> Self {
        let (start, end) = range.into_inner();
        Self::Range(start..end.saturating_add(1))
    }
}

impl From<Vec<usize>> for Selector {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&[usize]> for Selector {
    fn from(indices: &[usize]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Selector {
    fn from(indices: [usize; N]) -> Self {
        Self::Indices(indices.to_vec())
    }
}
