/// How two offset edges are connected at a convex vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointStyle {
    /// Cut the corner off at the offset distance.
    #[default]
    Square,
    /// Connect with an arc around the vertex.
    Round,
    /// Extend both edges until they meet, falling back to `Square` past the
    /// miter limit.
    Miter,
}

/// How the ends of an open path are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCapStyle {
    /// Treat the path as a closed polygon and offset only its outside.
    #[default]
    Polygon,
    /// Offset both sides of the path as one closed loop.
    Joined,
    /// Stop flush with the end points.
    Butt,
    /// Extend past the end points by the offset distance.
    Square,
    /// Finish with a half circle.
    Round,
}

impl EndCapStyle {
    /// Whether paths with this cap are offset as closed loops.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Polygon | Self::Joined)
    }
}

/// Options for [`PolygonOffsetter`](super::PolygonOffsetter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    pub joint_style: JointStyle,
    pub end_cap: EndCapStyle,
    /// Maximum miter length as a multiple of the offset distance.
    pub miter_limit: f64,
    /// Maximum deviation of round joints from a true arc. `0` picks a value
    /// from the offset distance.
    pub arc_tolerance: f64,
    pub preserve_collinear: bool,
    pub reverse_solution: bool,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            joint_style: JointStyle::Square,
            end_cap: EndCapStyle::Polygon,
            miter_limit: 2.0,
            arc_tolerance: 0.0,
            preserve_collinear: false,
            reverse_solution: false,
        }
    }
}

/// Options for outline (stroke) generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineOptions {
    pub joint_style: JointStyle,
    /// Cap applied to open figures and to dash ends. Closed figures are
    /// always stroked as joined loops.
    pub end_cap: EndCapStyle,
    pub miter_limit: f64,
    pub arc_tolerance: f64,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            joint_style: JointStyle::Square,
            end_cap: EndCapStyle::Butt,
            miter_limit: 20.0,
            arc_tolerance: 0.0,
        }
    }
}

impl OutlineOptions {
    #[must_use]
    pub fn with_joint_style(mut self, joint_style: JointStyle) -> Self {
        self.joint_style = joint_style;
        self
    }

    #[must_use]
    pub fn with_end_cap(mut self, end_cap: EndCapStyle) -> Self {
        self.end_cap = end_cap;
        self
    }

    pub(super) fn offset_options(self) -> OffsetOptions {
        OffsetOptions {
            joint_style: self.joint_style,
            end_cap: self.end_cap,
            miter_limit: self.miter_limit,
            arc_tolerance: self.arc_tolerance,
            ..OffsetOptions::default()
        }
    }
}
