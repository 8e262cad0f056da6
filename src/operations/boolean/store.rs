//! Arena storage for one clipping run.
//!
//! The sweep rewires vertices, active edges and output points constantly;
//! every node lives in a slot map and refers to its neighbours by typed key.
//! Nothing is removed until the run ends; unlinked nodes are simply left
//! unreachable.
use slotmap::{new_key_type, SlotMap};

use super::select::PathRole;
use crate::math::Point2;

new_key_type! {
    /// Handle to an input vertex.
    pub(super) struct VertexId;
    /// Handle to an active edge.
    pub(super) struct ActiveId;
    /// Handle to an output point.
    pub(super) struct OutPtId;
}

/// Index into [`ClipStore::out_recs`]. Creation order matters when joining
/// contours, so output records live in a plain vector.
pub(super) type OutRecIdx = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct VertexFlags(u8);

impl VertexFlags {
    pub const OPEN_START: Self = Self(1);
    pub const OPEN_END: Self = Self(2);
    pub const LOCAL_MAX: Self = Self(4);
    pub const LOCAL_MIN: Self = Self(8);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

#[derive(Debug, Clone)]
pub(super) struct Vertex {
    pub point: Point2,
    pub next: VertexId,
    pub prev: VertexId,
    pub flags: VertexFlags,
}

/// The lowest vertex of a bound pair. Two minima are the same when they
/// share the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LocalMinima {
    pub vertex: VertexId,
    pub role: PathRole,
    pub is_open: bool,
}

/// Which neighbour an edge has been temporarily merged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum JoinWith {
    None,
    Left,
    Right,
}

/// An edge currently crossed by the sweep line.
#[derive(Debug, Clone)]
pub(super) struct Active {
    pub bot: Point2,
    pub top: Point2,
    /// X at the current scanline.
    pub cur_x: f64,
    /// Inverse slope; ±infinity for horizontals.
    pub dx: f64,
    /// +1 ascending, -1 descending, relative to the input path direction.
    pub wind_dx: i32,
    pub wind_count: i32,
    /// Winding count of the opposite role.
    pub wind_count2: i32,
    pub outrec: Option<OutRecIdx>,
    pub prev_in_ael: Option<ActiveId>,
    pub next_in_ael: Option<ActiveId>,
    pub prev_in_sel: Option<ActiveId>,
    pub next_in_sel: Option<ActiveId>,
    pub jump: Option<ActiveId>,
    pub vertex_top: VertexId,
    pub local_min: LocalMinima,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

/// A node of an output contour (circular doubly linked list).
#[derive(Debug, Clone)]
pub(super) struct OutPt {
    pub point: Point2,
    pub next: OutPtId,
    pub prev: OutPtId,
    pub outrec: OutRecIdx,
    pub in_horz_segment: bool,
}

/// An output contour under construction.
#[derive(Debug, Clone, Default)]
pub(super) struct OutRec {
    pub owner: Option<OutRecIdx>,
    pub front_edge: Option<ActiveId>,
    pub back_edge: Option<ActiveId>,
    pub pts: Option<OutPtId>,
    pub is_open: bool,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct IntersectNode {
    pub point: Point2,
    pub edge1: ActiveId,
    pub edge2: ActiveId,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct HorzSegment {
    pub left_op: OutPtId,
    pub right_op: Option<OutPtId>,
    pub left_to_right: bool,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct HorzJoin {
    pub op1: OutPtId,
    pub op2: OutPtId,
}

/// Arena owning every node of a clipping run.
#[derive(Debug, Default)]
pub(super) struct ClipStore {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub actives: SlotMap<ActiveId, Active>,
    pub out_pts: SlotMap<OutPtId, OutPt>,
    pub out_recs: Vec<OutRec>,
}

impl ClipStore {
    /// Inserts a vertex linked to itself.
    pub fn add_vertex(&mut self, point: Point2) -> VertexId {
        self.vertices.insert_with_key(|k| Vertex {
            point,
            next: k,
            prev: k,
            flags: VertexFlags::default(),
        })
    }

    /// Inserts a single-point contour node belonging to `outrec`.
    pub fn add_out_pt(&mut self, point: Point2, outrec: OutRecIdx) -> OutPtId {
        self.out_pts.insert_with_key(|k| OutPt {
            point,
            next: k,
            prev: k,
            outrec,
            in_horz_segment: false,
        })
    }

    pub fn add_out_rec(&mut self) -> OutRecIdx {
        self.out_recs.push(OutRec::default());
        self.out_recs.len() - 1
    }

    /// Drops all solution state, keeping the input vertices.
    pub fn clear_solution(&mut self) {
        self.actives.clear();
        self.out_pts.clear();
        self.out_recs.clear();
    }

    /// Drops everything, including the input.
    pub fn clear(&mut self) {
        self.clear_solution();
        self.vertices.clear();
    }

    pub fn pt(&self, op: OutPtId) -> Point2 {
        self.out_pts[op].point
    }

    pub fn next_op(&self, op: OutPtId) -> OutPtId {
        self.out_pts[op].next
    }

    pub fn prev_op(&self, op: OutPtId) -> OutPtId {
        self.out_pts[op].prev
    }

    pub fn link(&mut self, first: OutPtId, second: OutPtId) {
        self.out_pts[first].next = second;
        self.out_pts[second].prev = first;
    }

    /// Walks owners until a record that still holds points is found.
    pub fn real_outrec(&self, mut outrec: Option<OutRecIdx>) -> Option<OutRecIdx> {
        while let Some(idx) = outrec {
            if self.out_recs[idx].pts.is_some() {
                break;
            }
            outrec = self.out_recs[idx].owner;
        }
        outrec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_out_pt_is_a_one_node_ring() {
        let mut store = ClipStore::default();
        let rec = store.add_out_rec();
        let op = store.add_out_pt(Point2::new(1.0, 2.0), rec);
        assert_eq!(store.next_op(op), op);
        assert_eq!(store.prev_op(op), op);
        assert_eq!(store.out_pts[op].outrec, rec);
    }

    #[test]
    fn real_outrec_skips_empty_records() {
        let mut store = ClipStore::default();
        let owner = store.add_out_rec();
        let child = store.add_out_rec();
        let op = store.add_out_pt(Point2::origin(), owner);
        store.out_recs[owner].pts = Some(op);
        store.out_recs[child].owner = Some(owner);
        assert_eq!(store.real_outrec(Some(child)), Some(owner));
        assert_eq!(store.real_outrec(None), None);
    }

    #[test]
    fn vertex_flags_accumulate() {
        let mut flags = VertexFlags::default();
        flags.insert(VertexFlags::LOCAL_MAX);
        flags.insert(VertexFlags::OPEN_END);
        assert!(flags.contains(VertexFlags::LOCAL_MAX));
        assert!(!flags.contains(VertexFlags::LOCAL_MIN));
    }
}
