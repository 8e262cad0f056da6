//! Vatti sweep-line clipping engine.
//!
//! Input paths are split into bounds that run upward from local minima. The
//! sweep visits scanlines from the largest y to the smallest, keeping the
//! edges crossed by the current scanbeam in the active edge list (AEL).
//! Winding counts decide which edges are "hot" (emit output), and output
//! contours are stitched together as bounds meet at intersections and maxima.
use tracing::debug;

use super::select::{
    is_contributing_closed, is_contributing_open, ClipOperation, FillRule, PathRole,
};
use super::store::{
    Active, ActiveId, ClipStore, HorzJoin, HorzSegment, IntersectNode, JoinWith, LocalMinima,
    VertexFlags, VertexId,
};
use crate::error::ClipperError;
use crate::math::intersect_2d::cross_product;
use crate::math::Point2;

pub(super) type ClipResult<T> = std::result::Result<T, ClipperError>;

/// Closed and open contours produced by one clipping run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipSolution {
    /// Closed output contours, without a repeated closing point.
    pub closed: Vec<Vec<Point2>>,
    /// Clipped open polylines.
    pub open: Vec<Vec<Point2>>,
}

impl ClipSolution {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.open.is_empty()
    }
}

pub(super) fn invariant(what: &'static str) -> ClipperError {
    ClipperError::InvariantViolated(what)
}

/// Inverse slope of the edge `pt1 -> pt2`; -inf for a horizontal heading
/// right and +inf for one heading left.
pub(super) fn get_dx(pt1: &Point2, pt2: &Point2) -> f64 {
    let dy = pt2.y - pt1.y;
    if dy != 0.0 {
        return (pt2.x - pt1.x) / dy;
    }
    if pt2.x > pt1.x {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

/// X of the edge at `current_y`.
#[allow(clippy::float_cmp)]
pub(super) fn top_x(ae: &Active, current_y: f64) -> f64 {
    if current_y == ae.top.y || ae.top.x == ae.bot.x {
        return ae.top.x;
    }
    if current_y == ae.bot.y {
        return ae.bot.x;
    }
    ae.bot.x + ae.dx * (current_y - ae.bot.y)
}

#[allow(clippy::float_cmp)]
pub(super) fn is_horizontal(ae: &Active) -> bool {
    ae.top.y == ae.bot.y
}

pub(super) fn is_hot(ae: &Active) -> bool {
    ae.outrec.is_some()
}

pub(super) fn is_open(ae: &Active) -> bool {
    ae.local_min.is_open
}

pub(super) fn is_joined(ae: &Active) -> bool {
    ae.join_with != JoinWith::None
}

/// The sweep-line engine. Paths are added once and may be executed several
/// times; each execution starts from a clean solution state.
#[derive(Debug)]
pub(super) struct ClipEngine {
    pub(super) store: ClipStore,
    pub(super) operation: ClipOperation,
    pub(super) fill_rule: FillRule,
    /// Head of the active edge list.
    pub(super) actives: Option<ActiveId>,
    /// Head of the sorted edge list; doubles as the pending horizontal stack.
    pub(super) sel: Option<ActiveId>,
    minima: Vec<LocalMinima>,
    pub(super) intersect_list: Vec<IntersectNode>,
    /// Pending scanline y values, ascending.
    scanlines: Vec<f64>,
    pub(super) horz_segments: Vec<HorzSegment>,
    pub(super) horz_joins: Vec<HorzJoin>,
    current_loc_min: usize,
    pub(super) current_bot_y: f64,
    minima_sorted: bool,
    pub(super) has_open_paths: bool,
    pub(super) preserve_collinear: bool,
    pub(super) reverse_solution: bool,
}

impl ClipEngine {
    pub(super) fn new(preserve_collinear: bool, reverse_solution: bool) -> Self {
        Self {
            store: ClipStore::default(),
            operation: ClipOperation::None,
            fill_rule: FillRule::EvenOdd,
            actives: None,
            sel: None,
            minima: Vec::new(),
            intersect_list: Vec::new(),
            scanlines: Vec::new(),
            horz_segments: Vec::new(),
            horz_joins: Vec::new(),
            current_loc_min: 0,
            current_bot_y: 0.0,
            minima_sorted: false,
            has_open_paths: false,
            preserve_collinear,
            reverse_solution,
        }
    }

    /// Number of local minima registered so far.
    pub(super) fn minima_count(&self) -> usize {
        self.minima.len()
    }

    /// Forgets every added path.
    pub(super) fn clear(&mut self) {
        self.clear_solution();
        self.store.clear();
        self.minima.clear();
        self.minima_sorted = false;
        self.has_open_paths = false;
    }

    pub(super) fn add_path(&mut self, path: &[Point2], role: PathRole, is_open: bool) {
        if is_open {
            self.has_open_paths = true;
        }
        self.minima_sorted = false;
        self.add_path_to_vertex_list(path, role, is_open);
    }

    /// Runs the sweep and returns the solution.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::InvariantViolated` if the edge lists become
    /// inconsistent during the sweep.
    pub(super) fn execute(
        &mut self,
        operation: ClipOperation,
        fill_rule: FillRule,
    ) -> ClipResult<ClipSolution> {
        let result = self
            .execute_internal(operation, fill_rule)
            .and_then(|()| self.build_paths());
        self.clear_solution();
        if let Ok(solution) = &result {
            debug!(
                ?operation,
                ?fill_rule,
                minima = self.minima.len(),
                closed = solution.closed.len(),
                open = solution.open.len(),
                "clip executed"
            );
        }
        result
    }

    fn clear_solution(&mut self) {
        self.actives = None;
        self.sel = None;
        self.scanlines.clear();
        self.intersect_list.clear();
        self.horz_segments.clear();
        self.horz_joins.clear();
        self.store.clear_solution();
    }

    fn execute_internal(&mut self, operation: ClipOperation, fill_rule: FillRule) -> ClipResult<()> {
        if operation == ClipOperation::None {
            return Ok(());
        }
        self.fill_rule = fill_rule;
        self.operation = operation;
        self.reset();

        let Some(mut y) = self.pop_scanline() else {
            return Ok(());
        };
        loop {
            self.insert_local_minima_into_ael(y)?;
            while let Some(ae) = self.pop_horz() {
                self.do_horizontal(ae)?;
            }
            if !self.horz_segments.is_empty() {
                self.convert_horz_segs_to_joins();
                self.horz_segments.clear();
            }
            self.current_bot_y = y;
            match self.pop_scanline() {
                Some(next) => y = next,
                None => break,
            }
            self.do_intersections(y)?;
            self.do_top_of_scanbeam(y)?;
            while let Some(ae) = self.pop_horz() {
                self.do_horizontal(ae)?;
            }
        }
        self.process_horz_joins()
    }

    fn reset(&mut self) {
        if !self.minima_sorted {
            let vertices = &self.store.vertices;
            self.minima.sort_by(|a, b| {
                vertices[b.vertex]
                    .point
                    .y
                    .total_cmp(&vertices[a.vertex].point.y)
            });
            self.minima_sorted = true;
        }
        self.scanlines.clear();
        for lm in self.minima.iter().rev() {
            self.scanlines.push(self.store.vertices[lm.vertex].point.y);
        }
        self.current_bot_y = 0.0;
        self.current_loc_min = 0;
        self.actives = None;
        self.sel = None;
    }

    #[allow(clippy::float_cmp)]
    fn add_path_to_vertex_list(&mut self, path: &[Point2], role: PathRole, is_open: bool) {
        let Some((&first, rest)) = path.split_first() else {
            return;
        };
        let v0 = self.store.add_vertex(first);
        let mut prev_v = v0;
        let mut count = 1;
        for &pt in rest {
            // Consecutive duplicates are skipped.
            if self.store.vertices[prev_v].point != pt {
                let curr = self.store.add_vertex(pt);
                self.store.vertices[curr].prev = prev_v;
                self.store.vertices[prev_v].next = curr;
                prev_v = curr;
                count += 1;
            }
        }
        if count < 2 {
            return;
        }
        if !is_open && self.store.vertices[prev_v].point == first {
            prev_v = self.store.vertices[prev_v].prev;
        }
        self.store.vertices[prev_v].next = v0;
        self.store.vertices[v0].prev = prev_v;
        if !is_open && prev_v == v0 {
            return;
        }

        let mut going_up;
        if is_open {
            let mut curr = self.store.vertices[v0].next;
            while curr != v0 && self.store.vertices[curr].point.y == first.y {
                curr = self.store.vertices[curr].next;
            }
            going_up = self.store.vertices[curr].point.y <= first.y;
            if going_up {
                self.store.vertices[v0].flags = VertexFlags::OPEN_START;
                self.add_loc_min(v0, role, true);
            } else {
                let flags = &mut self.store.vertices[v0].flags;
                *flags = VertexFlags::OPEN_START;
                flags.insert(VertexFlags::LOCAL_MAX);
            }
        } else {
            let mut prev = self.store.vertices[v0].prev;
            while prev != v0 && self.store.vertices[prev].point.y == first.y {
                prev = self.store.vertices[prev].prev;
            }
            if prev == v0 {
                // Only open paths can be completely flat.
                return;
            }
            going_up = self.store.vertices[prev].point.y > first.y;
        }

        let going_up0 = going_up;
        let mut prev = v0;
        let mut curr = self.store.vertices[v0].next;
        while curr != v0 {
            let curr_y = self.store.vertices[curr].point.y;
            let prev_y = self.store.vertices[prev].point.y;
            if curr_y > prev_y && going_up {
                self.store.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
                going_up = false;
            } else if curr_y < prev_y && !going_up {
                going_up = true;
                self.add_loc_min(prev, role, is_open);
            }
            prev = curr;
            curr = self.store.vertices[curr].next;
        }

        if is_open {
            self.store.vertices[prev].flags.insert(VertexFlags::OPEN_END);
            if going_up {
                self.store.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
            } else {
                self.add_loc_min(prev, role, is_open);
            }
        } else if going_up != going_up0 {
            if going_up0 {
                self.add_loc_min(prev, role, false);
            } else {
                self.store.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
            }
        }
    }

    fn add_loc_min(&mut self, vertex: VertexId, role: PathRole, is_open: bool) {
        let flags = &mut self.store.vertices[vertex].flags;
        if flags.contains(VertexFlags::LOCAL_MIN) {
            return;
        }
        flags.insert(VertexFlags::LOCAL_MIN);
        self.minima.push(LocalMinima {
            vertex,
            role,
            is_open,
        });
    }

    pub(super) fn insert_scanline(&mut self, y: f64) {
        if let Err(index) = self.scanlines.binary_search_by(|v| v.total_cmp(&y)) {
            self.scanlines.insert(index, y);
        }
    }

    #[allow(clippy::float_cmp)]
    fn pop_scanline(&mut self) -> Option<f64> {
        let y = self.scanlines.pop()?;
        while self.scanlines.last() == Some(&y) {
            self.scanlines.pop();
        }
        Some(y)
    }

    #[allow(clippy::float_cmp)]
    fn has_loc_min_at_y(&self, y: f64) -> bool {
        self.minima
            .get(self.current_loc_min)
            .is_some_and(|lm| self.store.vertices[lm.vertex].point.y == y)
    }

    fn new_bound(&mut self, local_min: LocalMinima, wind_dx: i32) -> ActiveId {
        let vertex = &self.store.vertices[local_min.vertex];
        let bot = vertex.point;
        let vertex_top = if wind_dx < 0 { vertex.prev } else { vertex.next };
        let top = self.store.vertices[vertex_top].point;
        self.store.actives.insert(Active {
            bot,
            top,
            cur_x: bot.x,
            dx: get_dx(&bot, &top),
            wind_dx,
            wind_count: 0,
            wind_count2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            prev_in_sel: None,
            next_in_sel: None,
            jump: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        })
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: f64) -> ClipResult<()> {
        while self.has_loc_min_at_y(bot_y) {
            let local_min = self.minima[self.current_loc_min];
            self.current_loc_min += 1;
            let flags = self.store.vertices[local_min.vertex].flags;

            // The descending bound (towards prev) starts as the left one.
            let mut left = if flags.contains(VertexFlags::OPEN_START) {
                None
            } else {
                Some(self.new_bound(local_min, -1))
            };
            let mut right = if flags.contains(VertexFlags::OPEN_END) {
                None
            } else {
                Some(self.new_bound(local_min, 1))
            };

            match (left, right) {
                (Some(l), Some(r)) => {
                    let la = &self.store.actives[l];
                    let ra = &self.store.actives[r];
                    let swap = if is_horizontal(la) {
                        la.dx == f64::NEG_INFINITY
                    } else if is_horizontal(ra) {
                        ra.dx == f64::INFINITY
                    } else {
                        la.dx < ra.dx
                    };
                    if swap {
                        std::mem::swap(&mut left, &mut right);
                    }
                }
                (None, _) => {
                    left = right.take();
                }
                (Some(_), None) => {}
            }
            let left = left.ok_or(invariant("local minimum without bounds"))?;

            self.store.actives[left].is_left_bound = true;
            self.insert_left_edge(left)?;

            let contributing = if is_open(&self.store.actives[left]) {
                self.set_wind_count_for_open_path_edge(left);
                is_contributing_open(self.operation, self.fill_rule, &self.store.actives[left])
            } else {
                self.set_wind_count_for_closed_path_edge(left);
                is_contributing_closed(self.operation, self.fill_rule, &self.store.actives[left])
            };

            let left_bot = self.store.actives[left].bot;
            if let Some(right) = right {
                let (wc, wc2) = {
                    let la = &self.store.actives[left];
                    (la.wind_count, la.wind_count2)
                };
                self.store.actives[right].wind_count = wc;
                self.store.actives[right].wind_count2 = wc2;
                self.insert_right_edge(left, right);

                if contributing {
                    self.add_local_min_poly(left, right, left_bot, true);
                    if !is_horizontal(&self.store.actives[left]) {
                        self.check_join_left(left, left_bot, false)?;
                    }
                }

                while let Some(next) = self.store.actives[right].next_in_ael {
                    if !self.is_valid_ael_order(next, right) {
                        break;
                    }
                    let right_bot = self.store.actives[right].bot;
                    self.intersect_edges(right, next, right_bot)?;
                    self.swap_positions_in_ael(right, next);
                }

                if is_horizontal(&self.store.actives[right]) {
                    self.push_horz(right);
                } else {
                    let right_bot = self.store.actives[right].bot;
                    self.check_join_right(right, right_bot, false)?;
                    self.insert_scanline(self.store.actives[right].top.y);
                }
            } else if contributing {
                self.start_open_path(left, left_bot);
            }

            if is_horizontal(&self.store.actives[left]) {
                self.push_horz(left);
            } else {
                self.insert_scanline(self.store.actives[left].top.y);
            }
        }
        Ok(())
    }

    pub(super) fn push_horz(&mut self, ae: ActiveId) {
        self.store.actives[ae].next_in_sel = self.sel;
        self.sel = Some(ae);
    }

    fn pop_horz(&mut self) -> Option<ActiveId> {
        let ae = self.sel?;
        self.sel = self.store.actives[ae].next_in_sel;
        Some(ae)
    }

    pub(super) fn next_vertex(&self, ae: ActiveId) -> VertexId {
        let a = &self.store.actives[ae];
        let top = &self.store.vertices[a.vertex_top];
        if a.wind_dx > 0 {
            top.next
        } else {
            top.prev
        }
    }

    fn prev_prev_vertex(&self, ae: ActiveId) -> VertexId {
        let a = &self.store.actives[ae];
        let vertices = &self.store.vertices;
        if a.wind_dx > 0 {
            vertices[vertices[a.vertex_top].prev].prev
        } else {
            vertices[vertices[a.vertex_top].next].next
        }
    }

    pub(super) fn vertex_is_maxima(&self, vertex: VertexId) -> bool {
        self.store.vertices[vertex]
            .flags
            .contains(VertexFlags::LOCAL_MAX)
    }

    pub(super) fn is_maxima(&self, ae: ActiveId) -> bool {
        self.vertex_is_maxima(self.store.actives[ae].vertex_top)
    }

    pub(super) fn vertex_is_open_end(&self, vertex: VertexId) -> bool {
        let flags = self.store.vertices[vertex].flags;
        flags.contains(VertexFlags::OPEN_START) || flags.contains(VertexFlags::OPEN_END)
    }

    pub(super) fn is_open_end(&self, ae: ActiveId) -> bool {
        let a = &self.store.actives[ae];
        a.local_min.is_open && self.vertex_is_open_end(a.vertex_top)
    }

    fn maxima_pair(&self, ae: ActiveId) -> Option<ActiveId> {
        let vertex_top = self.store.actives[ae].vertex_top;
        let mut cursor = self.store.actives[ae].next_in_ael;
        while let Some(id) = cursor {
            if self.store.actives[id].vertex_top == vertex_top {
                return Some(id);
            }
            cursor = self.store.actives[id].next_in_ael;
        }
        None
    }

    fn set_wind_count_for_closed_path_edge(&mut self, ae: ActiveId) {
        // Wind counts refer to regions: an edge carries the higher count of the
        // two regions it separates.
        let role = self.store.actives[ae].local_min.role;
        let wind_dx = self.store.actives[ae].wind_dx;

        let mut ae2 = self.store.actives[ae].prev_in_ael;
        while let Some(id) = ae2 {
            let a = &self.store.actives[id];
            if a.local_min.role == role && !is_open(a) {
                break;
            }
            ae2 = a.prev_in_ael;
        }

        let mut cursor = match ae2 {
            None => {
                self.store.actives[ae].wind_count = wind_dx;
                self.actives
            }
            Some(id) if self.fill_rule == FillRule::EvenOdd => {
                let wc2 = self.store.actives[id].wind_count2;
                let a = &mut self.store.actives[ae];
                a.wind_count = wind_dx;
                a.wind_count2 = wc2;
                self.store.actives[id].next_in_ael
            }
            Some(id) => {
                let prev = &self.store.actives[id];
                let wind_count = if prev.wind_count * prev.wind_dx < 0 {
                    // `ae` is outside `prev`.
                    if prev.wind_count.abs() > 1 {
                        if prev.wind_dx * wind_dx < 0 {
                            prev.wind_count
                        } else {
                            prev.wind_count + wind_dx
                        }
                    } else if is_open(&self.store.actives[ae]) {
                        1
                    } else {
                        wind_dx
                    }
                } else if prev.wind_dx * wind_dx < 0 {
                    // `ae` is inside `prev`, reversing direction.
                    prev.wind_count
                } else {
                    prev.wind_count + wind_dx
                };
                let wc2 = prev.wind_count2;
                let next = prev.next_in_ael;
                let a = &mut self.store.actives[ae];
                a.wind_count = wind_count;
                a.wind_count2 = wc2;
                next
            }
        };

        while let Some(id) = cursor {
            if id == ae {
                break;
            }
            let other = &self.store.actives[id];
            if other.local_min.role != role && !is_open(other) {
                let dx = other.wind_dx;
                let a = &mut self.store.actives[ae];
                if self.fill_rule == FillRule::EvenOdd {
                    a.wind_count2 = i32::from(a.wind_count2 == 0);
                } else {
                    a.wind_count2 += dx;
                }
            }
            cursor = self.store.actives[id].next_in_ael;
        }
    }

    fn set_wind_count_for_open_path_edge(&mut self, ae: ActiveId) {
        let mut cursor = self.actives;
        let mut count1 = 0;
        let mut count2 = 0;
        while let Some(id) = cursor {
            if id == ae {
                break;
            }
            let other = &self.store.actives[id];
            if other.local_min.role == PathRole::Clip {
                count2 += if self.fill_rule == FillRule::EvenOdd {
                    1
                } else {
                    other.wind_dx
                };
            } else if !is_open(other) {
                count1 += if self.fill_rule == FillRule::EvenOdd {
                    1
                } else {
                    other.wind_dx
                };
            }
            cursor = other.next_in_ael;
        }
        let a = &mut self.store.actives[ae];
        if self.fill_rule == FillRule::EvenOdd {
            a.wind_count = count1 & 1;
            a.wind_count2 = count2 & 1;
        } else {
            a.wind_count = count1;
            a.wind_count2 = count2;
        }
    }

    /// Whether `newcomer` belongs to the right of `resident` in the AEL.
    #[allow(clippy::float_cmp)]
    fn is_valid_ael_order(&self, resident: ActiveId, newcomer: ActiveId) -> bool {
        let r = &self.store.actives[resident];
        let n = &self.store.actives[newcomer];
        if n.cur_x != r.cur_x {
            return n.cur_x > r.cur_x;
        }

        // Turning direction of resident.top, newcomer.bot, newcomer.top.
        let d = cross_product(&r.top, &n.bot, &n.top);
        if d != 0.0 {
            return d < 0.0;
        }

        // Collinear edges: place them by the direction they are about to turn.
        if !self.is_maxima(resident) && r.top.y > n.top.y {
            let next = self.store.vertices[self.next_vertex(resident)].point;
            return cross_product(&n.bot, &r.top, &next) <= 0.0;
        }
        if !self.is_maxima(newcomer) && n.top.y > r.top.y {
            let next = self.store.vertices[self.next_vertex(newcomer)].point;
            return cross_product(&n.bot, &n.top, &next) >= 0.0;
        }

        let y = n.bot.y;
        let newcomer_is_left = n.is_left_bound;
        if r.bot.y != y || self.store.vertices[r.local_min.vertex].point.y != y {
            return newcomer_is_left;
        }
        // The resident was also just inserted.
        if r.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }
        let resident_pp = self.store.vertices[self.prev_prev_vertex(resident)].point;
        if cross_product(&resident_pp, &r.bot, &r.top) == 0.0 {
            return true;
        }
        let newcomer_pp = self.store.vertices[self.prev_prev_vertex(newcomer)].point;
        (cross_product(&resident_pp, &n.bot, &newcomer_pp) > 0.0) == newcomer_is_left
    }

    fn insert_left_edge(&mut self, ae: ActiveId) -> ClipResult<()> {
        let Some(head) = self.actives else {
            let a = &mut self.store.actives[ae];
            a.prev_in_ael = None;
            a.next_in_ael = None;
            self.actives = Some(ae);
            return Ok(());
        };

        if !self.is_valid_ael_order(head, ae) {
            let a = &mut self.store.actives[ae];
            a.prev_in_ael = None;
            a.next_in_ael = Some(head);
            self.store.actives[head].prev_in_ael = Some(ae);
            self.actives = Some(ae);
            return Ok(());
        }

        let mut ae2 = head;
        while let Some(next) = self.store.actives[ae2].next_in_ael {
            if !self.is_valid_ael_order(next, ae) {
                break;
            }
            ae2 = next;
        }
        // Joined edges stay together.
        if self.store.actives[ae2].join_with == JoinWith::Right {
            ae2 = self.store.actives[ae2]
                .next_in_ael
                .ok_or(invariant("right join without a right neighbour"))?;
        }
        let next = self.store.actives[ae2].next_in_ael;
        self.store.actives[ae].next_in_ael = next;
        if let Some(n) = next {
            self.store.actives[n].prev_in_ael = Some(ae);
        }
        self.store.actives[ae].prev_in_ael = Some(ae2);
        self.store.actives[ae2].next_in_ael = Some(ae);
        Ok(())
    }

    fn insert_right_edge(&mut self, ae: ActiveId, ae2: ActiveId) {
        let next = self.store.actives[ae].next_in_ael;
        self.store.actives[ae2].next_in_ael = next;
        if let Some(n) = next {
            self.store.actives[n].prev_in_ael = Some(ae2);
        }
        self.store.actives[ae2].prev_in_ael = Some(ae);
        self.store.actives[ae].next_in_ael = Some(ae2);
    }

    pub(super) fn delete_from_ael(&mut self, ae: ActiveId) {
        let prev = self.store.actives[ae].prev_in_ael;
        let next = self.store.actives[ae].next_in_ael;
        if prev.is_none() && next.is_none() && self.actives != Some(ae) {
            return;
        }
        match prev {
            Some(p) => self.store.actives[p].next_in_ael = next,
            None => self.actives = next,
        }
        if let Some(n) = next {
            self.store.actives[n].prev_in_ael = prev;
        }
    }

    /// Swaps two adjacent edges; `ae1` must be immediately left of `ae2`.
    pub(super) fn swap_positions_in_ael(&mut self, ae1: ActiveId, ae2: ActiveId) {
        let next = self.store.actives[ae2].next_in_ael;
        if let Some(n) = next {
            self.store.actives[n].prev_in_ael = Some(ae1);
        }
        let prev = self.store.actives[ae1].prev_in_ael;
        if let Some(p) = prev {
            self.store.actives[p].next_in_ael = Some(ae2);
        }
        let a2 = &mut self.store.actives[ae2];
        a2.prev_in_ael = prev;
        a2.next_in_ael = Some(ae1);
        let a1 = &mut self.store.actives[ae1];
        a1.prev_in_ael = Some(ae2);
        a1.next_in_ael = next;
        if prev.is_none() {
            self.actives = Some(ae2);
        }
    }

    /// Advances an edge to the next segment of its bound.
    pub(super) fn update_edge_into_ael(&mut self, ae: ActiveId) -> ClipResult<()> {
        let vertex_top = self.next_vertex(ae);
        let top = self.store.vertices[vertex_top].point;
        let a = &mut self.store.actives[ae];
        a.bot = a.top;
        a.vertex_top = vertex_top;
        a.top = top;
        a.cur_x = a.bot.x;
        a.dx = get_dx(&a.bot, &a.top);
        let bot = a.bot;

        if is_joined(a) {
            self.split(ae, bot)?;
        }
        if is_horizontal(&self.store.actives[ae]) {
            return Ok(());
        }
        self.insert_scanline(top.y);
        self.check_join_left(ae, bot, false)?;
        self.check_join_right(ae, bot, true)
    }

    #[allow(clippy::float_cmp)]
    fn do_top_of_scanbeam(&mut self, y: f64) -> ClipResult<()> {
        // The sorted edge list is reused to stack horizontals.
        self.sel = None;
        let mut cursor = self.actives;
        while let Some(ae) = cursor {
            // `ae` is never horizontal here.
            let a = &mut self.store.actives[ae];
            if a.top.y == y {
                a.cur_x = a.top.x;
                let top = a.top;
                if self.is_maxima(ae) {
                    cursor = self.do_maxima(ae)?;
                    continue;
                }
                // Intermediate vertex.
                if is_hot(&self.store.actives[ae]) {
                    self.add_out_pt(ae, top)?;
                }
                self.update_edge_into_ael(ae)?;
                if is_horizontal(&self.store.actives[ae]) {
                    self.push_horz(ae);
                }
            } else {
                a.cur_x = top_x(a, y);
            }
            cursor = self.store.actives[ae].next_in_ael;
        }
        Ok(())
    }

    fn do_maxima(&mut self, ae: ActiveId) -> ClipResult<Option<ActiveId>> {
        let prev_e = self.store.actives[ae].prev_in_ael;
        let mut next_e = self.store.actives[ae].next_in_ael;
        let top = self.store.actives[ae].top;

        if self.is_open_end(ae) {
            if is_hot(&self.store.actives[ae]) {
                self.add_out_pt(ae, top)?;
            }
            if !is_horizontal(&self.store.actives[ae]) {
                self.uncouple_open_edge(ae);
                self.delete_from_ael(ae);
            }
            return Ok(next_e);
        }

        let Some(max_pair) = self.maxima_pair(ae) else {
            // The pair is a horizontal still waiting to be processed.
            return Ok(next_e);
        };

        if is_joined(&self.store.actives[ae]) {
            self.split(ae, top)?;
        }
        if is_joined(&self.store.actives[max_pair]) {
            let pair_top = self.store.actives[max_pair].top;
            self.split(max_pair, pair_top)?;
        }

        // Edges between the pair are crossed first.
        while next_e != Some(max_pair) {
            let next = next_e.ok_or(invariant("maxima pair not right of edge"))?;
            self.intersect_edges(ae, next, top)?;
            self.swap_positions_in_ael(ae, next);
            next_e = self.store.actives[ae].next_in_ael;
        }

        if is_hot(&self.store.actives[ae]) {
            self.add_local_max_poly(ae, max_pair, top)?;
        }
        if is_open(&self.store.actives[ae]) {
            self.delete_from_ael(max_pair);
            self.delete_from_ael(ae);
        } else {
            self.delete_from_ael(ae);
            self.delete_from_ael(max_pair);
        }
        Ok(match prev_e {
            Some(p) => self.store.actives[p].next_in_ael,
            None => self.actives,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    fn run(
        subject: &[Vec<Point2>],
        clip: &[Vec<Point2>],
        operation: ClipOperation,
    ) -> ClipSolution {
        let mut engine = ClipEngine::new(true, false);
        for path in subject {
            engine.add_path(path, PathRole::Subject, false);
        }
        for path in clip {
            engine.add_path(path, PathRole::Clip, false);
        }
        engine.execute(operation, FillRule::NonZero).unwrap()
    }

    fn total_area(paths: &[Vec<Point2>]) -> f64 {
        paths.iter().map(|p| signed_area(p)).sum()
    }

    #[test]
    fn dx_of_horizontals_is_infinite() {
        let a = Point2::new(0.0, 0.0);
        assert_eq!(get_dx(&a, &Point2::new(5.0, 0.0)), f64::NEG_INFINITY);
        assert_eq!(get_dx(&a, &Point2::new(-5.0, 0.0)), f64::INFINITY);
        assert!((get_dx(&a, &Point2::new(2.0, 4.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn square_registers_one_local_minimum() {
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, false);
        assert_eq!(engine.minima_count(), 1);
    }

    #[test]
    fn degenerate_paths_are_ignored() {
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&[Point2::new(1.0, 1.0)], PathRole::Subject, false);
        engine.add_path(
            &[Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(9.0, 0.0)],
            PathRole::Subject,
            false,
        );
        assert_eq!(engine.minima_count(), 0);
        let solution = engine.execute(ClipOperation::Union, FillRule::NonZero).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn union_of_single_square_is_itself() {
        let solution = run(&[square(0.0, 0.0, 10_000.0)], &[], ClipOperation::Union);
        assert_eq!(solution.closed.len(), 1);
        assert_eq!(solution.closed[0].len(), 4);
        assert!((total_area(&solution.closed) - 1.0e8).abs() < 1e-3);
    }

    #[test]
    fn overlapping_squares_union_and_intersection() {
        let a = square(0.0, 0.0, 10_000.0);
        let b = square(5_000.0, 0.0, 10_000.0);

        let union = run(&[a.clone()], &[b.clone()], ClipOperation::Union);
        assert_eq!(union.closed.len(), 1);
        assert!((total_area(&union.closed) - 1.5e8).abs() < 1e-3);

        let intersection = run(&[a.clone()], &[b.clone()], ClipOperation::Intersection);
        assert_eq!(intersection.closed.len(), 1);
        assert!((total_area(&intersection.closed) - 5.0e7).abs() < 1e-3);

        let difference = run(&[a.clone()], &[b.clone()], ClipOperation::Difference);
        assert!((total_area(&difference.closed) - 5.0e7).abs() < 1e-3);

        let xor = run(&[a], &[b], ClipOperation::Xor);
        assert!((total_area(&xor.closed) - 1.0e8).abs() < 1e-3);
    }

    #[test]
    fn none_operation_produces_nothing() {
        let solution = run(&[square(0.0, 0.0, 100.0)], &[], ClipOperation::None);
        assert!(solution.is_empty());
    }

    #[test]
    fn engine_can_execute_twice() {
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&square(0.0, 0.0, 10_000.0), PathRole::Subject, false);
        engine.add_path(&square(5_000.0, 5_000.0, 10_000.0), PathRole::Clip, false);
        let first = engine.execute(ClipOperation::Intersection, FillRule::NonZero).unwrap();
        let second = engine.execute(ClipOperation::Intersection, FillRule::NonZero).unwrap();
        assert_eq!(first, second);
        assert!((total_area(&first.closed) - 2.5e7).abs() < 1e-3);
    }

    #[test]
    fn nested_square_becomes_a_hole_under_even_odd() {
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&square(0.0, 0.0, 10_000.0), PathRole::Subject, false);
        engine.add_path(&square(2_500.0, 2_500.0, 5_000.0), PathRole::Subject, false);
        let solution = engine.execute(ClipOperation::Union, FillRule::EvenOdd).unwrap();
        assert_eq!(solution.closed.len(), 2);
        assert!((total_area(&solution.closed) - 7.5e7).abs() < 1e-3);
    }
}
