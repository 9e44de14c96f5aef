use serde::Serialize;
use std::fmt;

/// An interval over any ordered value, `[start, end)` by default.
///
/// `None` at either bound means unbounded on that side. The inclusion flags
/// only matter for the bound they sit next to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VRange<T> {
    pub start: Option<T>,
    pub end: Option<T>,
    pub include_start: bool,
    pub include_end: bool,
}

impl<T: PartialOrd> VRange<T> {
    /// `(-Inf, +Inf)`
    pub fn full() -> Self {
        Self {
            start: None,
            end: None,
            include_start: true,
            include_end: false,
        }
    }

    /// `(value, +Inf)`
    pub fn gt(value: T) -> Self {
        Self {
            start: Some(value),
            end: None,
            include_start: false,
            include_end: false,
        }
    }

    /// `[value, +Inf)`
    pub fn ge(value: T) -> Self {
        Self {
            start: Some(value),
            end: None,
            include_start: true,
            include_end: false,
        }
    }

    /// `(-Inf, value]`
    pub fn le(value: T) -> Self {
        Self {
            start: None,
            end: Some(value),
            include_start: true,
            include_end: true,
        }
    }

    /// `(-Inf, value)`
    pub fn lt(value: T) -> Self {
        Self {
            start: None,
            end: Some(value),
            include_start: true,
            include_end: false,
        }
    }

    /// `(start, end)`
    pub fn open(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            include_start: false,
            include_end: false,
        }
    }

    /// `[start, end]`
    pub fn closed(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            include_start: true,
            include_end: true,
        }
    }

    /// `(start, end]`
    pub fn left_open(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            include_start: false,
            include_end: true,
        }
    }

    /// `[start, end)`
    pub fn right_open(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            include_start: true,
            include_end: false,
        }
    }

    /// Where `value` sits relative to the interval: `-1` below, `0` inside,
    /// `1` above.
    pub fn relative_position(&self, value: &T) -> i8 {
        if let Some(start) = &self.start {
            if value < start || (value == start && !self.include_start) {
                return -1;
            }
        }
        if let Some(end) = &self.end {
            if value > end || (value == end && !self.include_end) {
                return 1;
            }
        }
        0
    }

    pub fn contains(&self, value: &T) -> bool {
        self.relative_position(value) == 0
    }

    /// Do the two intervals share at least one point?
    ///
    /// Bounds that merely touch overlap only when the touching side is
    /// inclusive on both intervals.
    pub fn overlaps(&self, other: &Self) -> bool {
        let mut p_start = -1;
        let mut p_end = 1;
        if let Some(start) = &self.start {
            p_start = other.relative_position(start);
            if p_start == 0 && other.end.as_ref() == Some(start) {
                return self.include_start && other.include_end;
            }
        }
        if let Some(end) = &self.end {
            p_end = other.relative_position(end);
            if p_end == 0 && other.start.as_ref() == Some(end) {
                return self.include_end && other.include_start;
            }
        }
        p_start == 0 || p_end == 0 || p_start + p_end == 0
    }
}

impl<T: PartialOrd + Clone> VRange<T> {
    /// The common sub-interval, empty-by-bounds if the two do not overlap.
    pub fn intersection(&self, other: &Self) -> Self {
        let (start, include_start) = tighter(
            self.start.as_ref(),
            self.include_start,
            other.start.as_ref(),
            other.include_start,
            |a, b| a > b,
        );
        let (end, include_end) = tighter(
            self.end.as_ref(),
            self.include_end,
            other.end.as_ref(),
            other.include_end,
            |a, b| a < b,
        );
        Self {
            start,
            end,
            include_start,
            include_end,
        }
    }
}

/// Pick the tighter of two optional bounds; on a tie, the bound is inclusive
/// only if both are.
fn tighter<T: PartialOrd + Clone>(
    a: Option<&T>,
    a_inc: bool,
    b: Option<&T>,
    b_inc: bool,
    wins: impl Fn(&T, &T) -> bool,
) -> (Option<T>, bool) {
    match (a, b) {
        (None, None) => (None, a_inc),
        (Some(a), None) => (Some(a.clone()), a_inc),
        (None, Some(b)) => (Some(b.clone()), b_inc),
        (Some(a), Some(b)) => {
            if wins(a, b) {
                (Some(a.clone()), a_inc)
            } else if wins(b, a) {
                (Some(b.clone()), b_inc)
            } else {
                (Some(a.clone()), a_inc && b_inc)
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for VRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = if self.include_start && self.start.is_some() {
            '['
        } else {
            '('
        };
        let right = if self.include_end && self.end.is_some() {
            ']'
        } else {
            ')'
        };
        match &self.start {
            Some(start) => write!(f, "{left}{start}, ")?,
            None => write!(f, "{left}-Inf, ")?,
        }
        match &self.end {
            Some(end) => write!(f, "{end}{right}"),
            None => write!(f, "+Inf{right}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_position_per_constructor() {
        let cases: Vec<(VRange<i32>, [bool; 3])> = vec![
            (VRange::ge(0), [false, true, true]),
            (VRange::gt(0), [false, false, true]),
            (VRange::le(0), [true, true, false]),
            (VRange::lt(0), [true, false, false]),
        ];
        for (range, expected) in cases {
            for (value, want) in [-1, 0, 1].into_iter().zip(expected) {
                assert_eq!(range.contains(&value), want, "{range} contains {value}");
            }
        }
    }

    #[test]
    fn overlap_matrix() {
        let ranges: Vec<VRange<i32>> = vec![
            VRange::closed(0, 1),
            VRange::open(0, 1),
            VRange::lt(0),
            VRange::le(0),
            VRange::ge(1),
            VRange::gt(1),
        ];
        let expected = [
            [true, true, false, true, true, false],
            [true, true, false, false, false, false],
            [false, false, true, true, false, false],
            [true, false, true, true, false, false],
            [true, false, false, false, true, true],
            [false, false, false, false, true, true],
        ];
        for (i, a) in ranges.iter().enumerate() {
            for (j, b) in ranges.iter().enumerate() {
                assert_eq!(a.overlaps(b), expected[i][j], "{a} vs {b}");
            }
        }
    }

    #[test]
    fn overlap_is_symmetric_for_nested_intervals() {
        let inner: VRange<i32> = VRange::open(1, 2);
        let outer: VRange<i32> = VRange::open(0, 5);
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&inner));
    }

    #[test]
    fn intersection_of_nested_intervals_is_the_inner_one() {
        let inner: VRange<i32> = VRange::open(1, 2);
        let outer: VRange<i32> = VRange::open(0, 5);
        assert_eq!(inner.intersection(&outer).to_string(), "(1, 2)");
    }

    #[test]
    fn display_marks_unbounded_sides() {
        assert_eq!(VRange::ge(0).to_string(), "[0, +Inf)");
        assert_eq!(VRange::lt(3).to_string(), "(-Inf, 3)");
        assert_eq!(VRange::left_open(1, 2).to_string(), "(1, 2]");
    }
}
