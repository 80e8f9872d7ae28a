//! Byte-offset spans into a unit's source text.

use serde::Serialize;

/// A half-open byte range `[pos, end)` in the source text of a unit.
///
/// Nodes synthesized by the emitter (desugared assignments, destructuring
/// accesses, constructor scaffolding) carry `Span::DUMMY`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub pos: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { pos: 0, end: 0 };

    #[must_use]
    pub const fn new(pos: u32, end: u32) -> Self {
        Span { pos, end }
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.pos)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.pos
    }

    #[must_use]
    pub const fn is_dummy(&self) -> bool {
        self.pos == 0 && self.end == 0
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            pos: self.pos.min(other.pos),
            end: self.end.max(other.end),
        }
    }

    /// Slice the span out of `text`, clamped to its bounds.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let end = (self.end as usize).min(text.len());
        let pos = (self.pos as usize).min(end);
        text.get(pos..end).unwrap_or("")
    }
}
