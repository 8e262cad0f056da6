use super::store::Active;

/// The boolean operation applied between subject and clip paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipOperation {
    /// Produces no output.
    None,
    /// Regions covered by both subject and clip.
    Intersection,
    /// Regions covered by subject or clip.
    #[default]
    Union,
    /// Subject regions not covered by clip.
    Difference,
    /// Regions covered by exactly one of subject and clip.
    Xor,
}

/// Decides which winding counts are "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Odd winding counts are filled.
    EvenOdd,
    /// Non-zero winding counts are filled.
    #[default]
    NonZero,
    /// Strictly positive winding counts are filled.
    Positive,
    /// Strictly negative winding counts are filled.
    Negative,
}

/// Whether a path is clipped or clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Subject,
    Clip,
}

impl FillRule {
    /// Winding count normalized so that 1 means "just inside".
    pub(super) fn normalized(self, wind_count: i32) -> i32 {
        match self {
            Self::Positive => wind_count,
            Self::Negative => -wind_count,
            Self::EvenOdd | Self::NonZero => wind_count.abs(),
        }
    }

    /// Whether a region with the given winding count is filled.
    pub(crate) fn is_filled(self, wind_count: i32) -> bool {
        match self {
            Self::Positive => wind_count > 0,
            Self::Negative => wind_count < 0,
            Self::EvenOdd | Self::NonZero => wind_count != 0,
        }
    }
}

/// Whether a closed-path edge bounds the solution region.
pub(super) fn is_contributing_closed(
    operation: ClipOperation,
    fill_rule: FillRule,
    ae: &Active,
) -> bool {
    let edge_on_boundary = match fill_rule {
        FillRule::Positive => ae.wind_count == 1,
        FillRule::Negative => ae.wind_count == -1,
        FillRule::NonZero => ae.wind_count.abs() == 1,
        FillRule::EvenOdd => true,
    };
    if !edge_on_boundary {
        return false;
    }

    let outside_other = !fill_rule.is_filled(ae.wind_count2);
    match operation {
        ClipOperation::Intersection => !outside_other,
        ClipOperation::Union => outside_other,
        ClipOperation::Difference => {
            if ae.local_min.role == PathRole::Subject {
                outside_other
            } else {
                !outside_other
            }
        }
        ClipOperation::Xor => true,
        ClipOperation::None => false,
    }
}

/// Whether an open-path edge lies in a region that keeps it.
pub(super) fn is_contributing_open(
    operation: ClipOperation,
    fill_rule: FillRule,
    ae: &Active,
) -> bool {
    let in_subject = fill_rule.is_filled(ae.wind_count);
    let in_clip = fill_rule.is_filled(ae.wind_count2);
    match operation {
        ClipOperation::Intersection => in_clip,
        ClipOperation::Union => !in_subject && !in_clip,
        ClipOperation::Difference | ClipOperation::Xor | ClipOperation::None => !in_clip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_counts_follow_the_rule() {
        assert_eq!(FillRule::Positive.normalized(-2), -2);
        assert_eq!(FillRule::Negative.normalized(-2), 2);
        assert_eq!(FillRule::NonZero.normalized(-2), 2);
        assert_eq!(FillRule::EvenOdd.normalized(3), 3);
    }

    #[test]
    fn filled_regions() {
        assert!(FillRule::Positive.is_filled(1));
        assert!(!FillRule::Positive.is_filled(-1));
        assert!(FillRule::Negative.is_filled(-1));
        assert!(FillRule::NonZero.is_filled(-3));
        assert!(!FillRule::EvenOdd.is_filled(0));
    }

    #[test]
    fn defaults() {
        assert_eq!(ClipOperation::default(), ClipOperation::Union);
        assert_eq!(FillRule::default(), FillRule::NonZero);
    }
}
