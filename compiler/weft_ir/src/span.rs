//! Source location spans.

use std::fmt;
use std::ops::Range;

/// Byte range into the script source.
///
/// Layout: 8 bytes (`start` inclusive, `end` exclusive). Scripts larger than
/// `u32::MAX` bytes are clamped, which only affects diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for synthesized nodes with no source text.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Build a span from `usize` byte offsets, saturating at `u32::MAX`.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        Span {
            start: clamp(range.start),
            end: clamp(range.end),
        }
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    pub fn is_dummy(self) -> bool {
        self == Span::DUMMY
    }

    /// The span as a `usize` range, for slicing the source.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice `source` by this span, or `""` if it falls outside.
    pub fn text(self, source: &str) -> &str {
        source.get(self.to_range()).unwrap_or("")
    }

    /// One-based line number of `self.start` in `source`.
    pub fn line_in(self, source: &str) -> u32 {
        let end = (self.start as usize).min(source.len());
        let newlines = source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
        u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
