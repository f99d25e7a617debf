use crate::{Range, RangeError};
use std::{fmt, str::FromStr};

///
/// Ranges
///
/// Ordered list of block ranges, as produced by storage listings and
/// segment splits. Merge helpers only squash neighbours in list order;
/// callers sort first when they need global merging.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ranges(Vec<Range>);

impl Ranges {
    #[must_use]
    pub const fn new(ranges: Vec<Range>) -> Self {
        Self(ranges)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Range] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Range> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.0.iter()
    }

    pub fn sort(&mut self) {
        self.0.sort_unstable();
    }

    #[must_use]
    pub fn contains(&self, range: &Range) -> bool {
        self.0.contains(range)
    }

    /// Squash every run of contiguous neighbours into a single range.
    #[must_use]
    pub fn merged(&self) -> Self {
        let mut out: Vec<Range> = Vec::with_capacity(self.0.len());
        for range in &self.0 {
            if let Some(last) = out.last_mut()
                && !last.is_open_ended()
                && last.exclusive_end_block() == range.start_block()
            {
                *last = Range::new(last.start_block(), range.exclusive_end_block());
                continue;
            }
            out.push(*range);
        }

        Self(out)
    }

    /// Squash contiguous neighbours while the merged width stays within
    /// `max_bucket_size`.
    ///
    /// A range already `max_bucket_size - 1` blocks wide (or wider) always
    /// starts its own bucket and absorbs nothing.
    #[must_use]
    pub fn merged_buckets(&self, max_bucket_size: u64) -> Self {
        let mut out = Vec::with_capacity(self.0.len());
        let mut iter = self.0.iter().copied().peekable();

        while let Some(head) = iter.next() {
            let mut bucket = head;
            let absorbs = head
                .len()
                .is_some_and(|len| len < max_bucket_size.saturating_sub(1));

            if absorbs {
                while let Some(next) = iter.peek()
                    && !next.is_open_ended()
                    && bucket.exclusive_end_block() == next.start_block()
                    && next.exclusive_end_block() - bucket.start_block() <= max_bucket_size
                {
                    bucket = Range::new(bucket.start_block(), next.exclusive_end_block());
                    iter.next();
                }
            }

            out.push(bucket);
        }

        Self(out)
    }
}

impl fmt::Display for Ranges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }

        Ok(())
    }
}

impl FromStr for Ranges {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse::<Range>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<Range>> for Ranges {
    fn from(ranges: Vec<Range>) -> Self {
        Self(ranges)
    }
}

impl FromIterator<Range> for Ranges {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Ranges {
    type Item = Range;
    type IntoIter = std::vec::IntoIter<Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ranges {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

///
/// TESTS
///
