//! Output contour construction.
//!
//! Each output record holds a circular list of points. Points are appended
//! at the "front" (the ascending bound) or the "back", and records are
//! joined when their bounds meet at a maximum.
use super::engine::{invariant, is_hot, is_joined, is_open, ClipEngine, ClipResult, ClipSolution};
use super::store::{ActiveId, JoinWith, OutPtId, OutRecIdx};
use crate::math::distance_2d::perpendicular_dist_sqrd;
use crate::math::intersect_2d::{cross_product, dot_product, line_intersection, segments_intersect};
use crate::math::Point2;

/// Points closer than this on both axes are treated as coincident when
/// discarding slivers.
const PTS_REALLY_CLOSE: f64 = 2.0;

/// Joins between edges whose tops are this close to the join point are
/// skipped.
const JOIN_Y_TOLERANCE: f64 = 2.0;

/// Maximum squared distance from the neighbour edge for a join.
const JOIN_DIST_SQRD: f64 = 0.25;

/// Contours smaller than this are dropped while untangling.
const MIN_SPLIT_AREA: f64 = 2.0;

/// Self-intersection loops larger than this become their own contour.
const MIN_SPLIT_LOOP_AREA: f64 = 1.0;

fn pts_really_close(pt1: &Point2, pt2: &Point2) -> bool {
    (pt1.x - pt2.x).abs() < PTS_REALLY_CLOSE && (pt1.y - pt2.y).abs() < PTS_REALLY_CLOSE
}

/// Twice the signed area of a triangle, using the same shoelace orientation
/// as [`ClipEngine::area`].
fn area_triangle(pt1: &Point2, pt2: &Point2, pt3: &Point2) -> f64 {
    (pt3.y + pt1.y) * (pt3.x - pt1.x)
        + (pt1.y + pt2.y) * (pt1.x - pt2.x)
        + (pt2.y + pt3.y) * (pt2.x - pt3.x)
}

#[allow(clippy::float_cmp)]
impl ClipEngine {
    pub(super) fn is_front(&self, ae: ActiveId) -> bool {
        self.store.actives[ae]
            .outrec
            .is_some_and(|o| self.store.out_recs[o].front_edge == Some(ae))
    }

    /// Nearest hot closed edge to the left of `ae`.
    fn prev_hot_edge(&self, ae: ActiveId) -> Option<ActiveId> {
        let mut prev = self.store.actives[ae].prev_in_ael;
        while let Some(id) = prev {
            let a = &self.store.actives[id];
            if !is_open(a) && is_hot(a) {
                break;
            }
            prev = a.prev_in_ael;
        }
        prev
    }

    /// Adds `pt` to the front or back of the edge's contour.
    pub(super) fn add_out_pt(&mut self, ae: ActiveId, pt: Point2) -> ClipResult<OutPtId> {
        let outrec = self.store.actives[ae]
            .outrec
            .ok_or(invariant("output added to a cold edge"))?;
        let to_front = self.is_front(ae);
        let op_front = self.store.out_recs[outrec]
            .pts
            .ok_or(invariant("output record has no points"))?;
        let op_back = self.store.next_op(op_front);

        if to_front && pt == self.store.pt(op_front) {
            return Ok(op_front);
        }
        if !to_front && pt == self.store.pt(op_back) {
            return Ok(op_back);
        }

        let new_op = self.store.add_out_pt(pt, outrec);
        self.store.link(new_op, op_back);
        self.store.link(op_front, new_op);
        if to_front {
            self.store.out_recs[outrec].pts = Some(new_op);
        }
        Ok(new_op)
    }

    pub(super) fn set_sides(&mut self, outrec: OutRecIdx, start: ActiveId, end: ActiveId) {
        let rec = &mut self.store.out_recs[outrec];
        rec.front_edge = Some(start);
        rec.back_edge = Some(end);
    }

    /// Starts a new contour at a local minimum formed by `ae1` and `ae2`.
    ///
    /// The ascending side becomes the front so that closed output keeps a
    /// consistent orientation, with holes wound the other way.
    pub(super) fn add_local_min_poly(
        &mut self,
        ae1: ActiveId,
        ae2: ActiveId,
        pt: Point2,
        is_new: bool,
    ) -> OutPtId {
        let outrec = self.store.add_out_rec();
        self.store.actives[ae1].outrec = Some(outrec);
        self.store.actives[ae2].outrec = Some(outrec);

        if is_open(&self.store.actives[ae1]) {
            self.store.out_recs[outrec].is_open = true;
            if self.store.actives[ae1].wind_dx > 0 {
                self.set_sides(outrec, ae1, ae2);
            } else {
                self.set_sides(outrec, ae2, ae1);
            }
        } else if let Some(prev_hot) = self.prev_hot_edge(ae1) {
            self.store.out_recs[outrec].owner = self.store.actives[prev_hot].outrec;
            if self.is_front(prev_hot) == is_new {
                self.set_sides(outrec, ae2, ae1);
            } else {
                self.set_sides(outrec, ae1, ae2);
            }
        } else if is_new {
            self.set_sides(outrec, ae1, ae2);
        } else {
            self.set_sides(outrec, ae2, ae1);
        }

        let op = self.store.add_out_pt(pt, outrec);
        self.store.out_recs[outrec].pts = Some(op);
        op
    }

    /// Closes or merges the contours of two edges meeting at a maximum.
    ///
    /// Returns `None` when both edges are on the same side of their contours,
    /// which only happens for degenerate input.
    pub(super) fn add_local_max_poly(
        &mut self,
        ae1: ActiveId,
        ae2: ActiveId,
        pt: Point2,
    ) -> ClipResult<Option<OutPtId>> {
        if is_joined(&self.store.actives[ae1]) {
            self.split(ae1, pt)?;
        }
        if is_joined(&self.store.actives[ae2]) {
            self.split(ae2, pt)?;
        }

        if self.is_front(ae1) == self.is_front(ae2) {
            if self.is_open_end(ae1) {
                self.swap_front_back_sides(ae1)?;
            } else if self.is_open_end(ae2) {
                self.swap_front_back_sides(ae2)?;
            } else {
                return Ok(None);
            }
        }

        let result = self.add_out_pt(ae1, pt)?;
        let or1 = self.store.actives[ae1].outrec.ok_or(invariant("maximum on a cold edge"))?;
        let or2 = self.store.actives[ae2].outrec.ok_or(invariant("maximum on a cold edge"))?;
        if or1 == or2 {
            self.store.out_recs[or1].pts = Some(result);
            self.uncouple_outrec(ae1);
        } else if is_open(&self.store.actives[ae1]) {
            if self.store.actives[ae1].wind_dx < 0 {
                self.join_outrec_paths(ae1, ae2)?;
            } else {
                self.join_outrec_paths(ae2, ae1)?;
            }
        } else if or1 < or2 {
            self.join_outrec_paths(ae1, ae2)?;
        } else {
            self.join_outrec_paths(ae2, ae1)?;
        }
        Ok(Some(result))
    }

    /// Appends the contour of `ae2` onto the contour of `ae1` and empties
    /// the former.
    fn join_outrec_paths(&mut self, ae1: ActiveId, ae2: ActiveId) -> ClipResult<()> {
        let or1 = self.store.actives[ae1].outrec.ok_or(invariant("join on a cold edge"))?;
        let or2 = self.store.actives[ae2].outrec.ok_or(invariant("join on a cold edge"))?;
        let p1_start = self.store.out_recs[or1].pts.ok_or(invariant("join of an empty contour"))?;
        let p2_start = self.store.out_recs[or2].pts.ok_or(invariant("join of an empty contour"))?;
        let p1_end = self.store.next_op(p1_start);
        let p2_end = self.store.next_op(p2_start);

        if self.is_front(ae1) {
            self.store.link(p1_start, p2_end);
            self.store.link(p2_start, p1_end);
            let front = self.store.out_recs[or2].front_edge;
            let rec = &mut self.store.out_recs[or1];
            rec.pts = Some(p2_start);
            rec.front_edge = front;
            if let Some(front) = front {
                self.store.actives[front].outrec = Some(or1);
            }
        } else {
            self.store.link(p2_start, p1_end);
            self.store.link(p1_start, p2_end);
            let back = self.store.out_recs[or2].back_edge;
            self.store.out_recs[or1].back_edge = back;
            if let Some(back) = back {
                self.store.actives[back].outrec = Some(or1);
            }
        }

        let rec2 = &mut self.store.out_recs[or2];
        rec2.front_edge = None;
        rec2.back_edge = None;
        rec2.pts = None;
        self.set_owner(or2, or1);

        if self.is_open_end(ae1) {
            self.store.out_recs[or2].pts = self.store.out_recs[or1].pts;
            self.store.out_recs[or1].pts = None;
        }

        self.store.actives[ae1].outrec = None;
        self.store.actives[ae2].outrec = None;
        Ok(())
    }

    /// Starts a contour for an open path entering a region that keeps it.
    pub(super) fn start_open_path(&mut self, ae: ActiveId, pt: Point2) {
        let outrec = self.store.add_out_rec();
        let rec = &mut self.store.out_recs[outrec];
        rec.is_open = true;
        if self.store.actives[ae].wind_dx > 0 {
            rec.front_edge = Some(ae);
        } else {
            rec.back_edge = Some(ae);
        }
        self.store.actives[ae].outrec = Some(outrec);
        let op = self.store.add_out_pt(pt, outrec);
        self.store.out_recs[outrec].pts = Some(op);
    }

    /// Detaches an open edge from its contour, ending that contour.
    pub(super) fn uncouple_open_edge(&mut self, ae: ActiveId) {
        let Some(outrec) = self.store.actives[ae].outrec else {
            return;
        };
        let front = self.is_front(ae);
        let rec = &mut self.store.out_recs[outrec];
        if front {
            rec.front_edge = None;
        } else {
            rec.back_edge = None;
        }
        self.store.actives[ae].outrec = None;
    }

    /// Detaches both bounds of the edge's contour once it is closed.
    fn uncouple_outrec(&mut self, ae: ActiveId) {
        let Some(outrec) = self.store.actives[ae].outrec else {
            return;
        };
        let rec = &mut self.store.out_recs[outrec];
        let edges = [rec.front_edge.take(), rec.back_edge.take()];
        for edge in edges.into_iter().flatten() {
            self.store.actives[edge].outrec = None;
        }
    }

    fn swap_front_back_sides(&mut self, ae: ActiveId) -> ClipResult<()> {
        let outrec = self.store.actives[ae].outrec.ok_or(invariant("open end without output"))?;
        let rec = &mut self.store.out_recs[outrec];
        std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
        let pts = rec.pts.ok_or(invariant("open end without output"))?;
        self.store.out_recs[outrec].pts = Some(self.store.next_op(pts));
        Ok(())
    }

    /// Exchanges the contours of two edges that swapped places.
    pub(super) fn swap_outrecs(&mut self, ae1: ActiveId, ae2: ActiveId) {
        let or1 = self.store.actives[ae1].outrec;
        let or2 = self.store.actives[ae2].outrec;
        if or1 == or2 {
            if let Some(o) = or1 {
                let rec = &mut self.store.out_recs[o];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }
        if let Some(o) = or1 {
            let rec = &mut self.store.out_recs[o];
            if rec.front_edge == Some(ae1) {
                rec.front_edge = Some(ae2);
            } else {
                rec.back_edge = Some(ae2);
            }
        }
        if let Some(o) = or2 {
            let rec = &mut self.store.out_recs[o];
            if rec.front_edge == Some(ae2) {
                rec.front_edge = Some(ae1);
            } else {
                rec.back_edge = Some(ae1);
            }
        }
        self.store.actives[ae1].outrec = or2;
        self.store.actives[ae2].outrec = or1;
    }

    /// Makes `new_owner` own `outrec` without creating an ownership cycle.
    fn set_owner(&mut self, outrec: OutRecIdx, new_owner: OutRecIdx) {
        let recs = &mut self.store.out_recs;
        while let Some(owner) = recs[new_owner].owner {
            if recs[owner].pts.is_some() {
                break;
            }
            recs[new_owner].owner = recs[owner].owner;
        }

        let mut tmp = Some(new_owner);
        while let Some(t) = tmp {
            if t == outrec {
                break;
            }
            tmp = recs[t].owner;
        }
        if tmp.is_some() {
            recs[new_owner].owner = recs[outrec].owner;
        }
        recs[outrec].owner = Some(new_owner);
    }

    /// Joins `e` with its left neighbour when both run along the same line
    /// through `pt`.
    pub(super) fn check_join_left(
        &mut self,
        e: ActiveId,
        pt: Point2,
        check_curr_x: bool,
    ) -> ClipResult<()> {
        let Some(prev) = self.store.actives[e].prev_in_ael else {
            return Ok(());
        };
        let (ea, pa) = (&self.store.actives[e], &self.store.actives[prev]);
        if is_open(ea) || is_open(pa) || !is_hot(ea) || !is_hot(pa) {
            return Ok(());
        }
        if !self.joinable(e, prev, pt, check_curr_x) {
            return Ok(());
        }

        let or_e = self.store.actives[e].outrec.ok_or(invariant("join on a cold edge"))?;
        let or_p = self.store.actives[prev].outrec.ok_or(invariant("join on a cold edge"))?;
        if or_e == or_p {
            self.add_local_max_poly(prev, e, pt)?;
        } else if or_e < or_p {
            self.join_outrec_paths(e, prev)?;
        } else {
            self.join_outrec_paths(prev, e)?;
        }
        self.store.actives[prev].join_with = JoinWith::Right;
        self.store.actives[e].join_with = JoinWith::Left;
        Ok(())
    }

    /// Joins `e` with its right neighbour when both run along the same line
    /// through `pt`.
    pub(super) fn check_join_right(
        &mut self,
        e: ActiveId,
        pt: Point2,
        check_curr_x: bool,
    ) -> ClipResult<()> {
        let Some(next) = self.store.actives[e].next_in_ael else {
            return Ok(());
        };
        let (ea, na) = (&self.store.actives[e], &self.store.actives[next]);
        if is_open(ea) || !is_hot(ea) || is_joined(ea) || is_open(na) || !is_hot(na) {
            return Ok(());
        }
        if !self.joinable(e, next, pt, check_curr_x) {
            return Ok(());
        }

        let or_e = self.store.actives[e].outrec.ok_or(invariant("join on a cold edge"))?;
        let or_n = self.store.actives[next].outrec.ok_or(invariant("join on a cold edge"))?;
        if or_e == or_n {
            self.add_local_max_poly(e, next, pt)?;
        } else if or_e < or_n {
            self.join_outrec_paths(e, next)?;
        } else {
            self.join_outrec_paths(next, e)?;
        }
        self.store.actives[e].join_with = JoinWith::Right;
        self.store.actives[next].join_with = JoinWith::Left;
        Ok(())
    }

    fn joinable(&self, e: ActiveId, other: ActiveId, pt: Point2, check_curr_x: bool) -> bool {
        let ea = &self.store.actives[e];
        let oa = &self.store.actives[other];
        // Avoid trivial joins near the ends of either edge.
        if (pt.y < ea.top.y + JOIN_Y_TOLERANCE || pt.y < oa.top.y + JOIN_Y_TOLERANCE)
            && (ea.bot.y > pt.y || oa.bot.y > pt.y)
        {
            return false;
        }
        if check_curr_x {
            if perpendicular_dist_sqrd(&pt, &oa.bot, &oa.top) > JOIN_DIST_SQRD {
                return false;
            }
        } else if ea.cur_x != oa.cur_x {
            return false;
        }
        cross_product(&ea.top, &pt, &oa.top) == 0.0
    }

    /// Undoes a join so the two edges can cross or separate at `pt`.
    pub(super) fn split(&mut self, e: ActiveId, pt: Point2) -> ClipResult<()> {
        let a = &self.store.actives[e];
        if a.join_with == JoinWith::Right {
            let next = a.next_in_ael.ok_or(invariant("right join without a neighbour"))?;
            self.store.actives[e].join_with = JoinWith::None;
            self.store.actives[next].join_with = JoinWith::None;
            self.add_local_min_poly(e, next, pt, true);
        } else {
            let prev = a.prev_in_ael.ok_or(invariant("left join without a neighbour"))?;
            self.store.actives[e].join_with = JoinWith::None;
            self.store.actives[prev].join_with = JoinWith::None;
            self.add_local_min_poly(prev, e, pt, true);
        }
        Ok(())
    }

    /// Points every node of the contour back at its record.
    pub(super) fn fix_outrec_pts(&mut self, outrec: OutRecIdx) {
        let Some(start) = self.store.out_recs[outrec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.store.out_pts[op].outrec = outrec;
            op = self.store.next_op(op);
            if op == start {
                break;
            }
        }
    }

    /// Collects every non-empty record into the solution.
    pub(super) fn build_paths(&mut self) -> ClipResult<ClipSolution> {
        let mut solution = ClipSolution::default();
        // Cleaning can split contours and append records, so the length is
        // re-read on every pass.
        let mut i = 0;
        while i < self.store.out_recs.len() {
            let outrec = i;
            i += 1;
            let Some(pts) = self.store.out_recs[outrec].pts else {
                continue;
            };
            if self.store.out_recs[outrec].is_open {
                if let Some(path) = self.build_path(pts, true) {
                    solution.open.push(path);
                }
            } else {
                self.clean_collinear(outrec)?;
                if let Some(pts) = self.store.out_recs[outrec].pts {
                    if let Some(path) = self.build_path(pts, false) {
                        solution.closed.push(path);
                    }
                }
            }
        }
        Ok(solution)
    }

    fn build_path(&self, op: OutPtId, is_open: bool) -> Option<Vec<Point2>> {
        let store = &self.store;
        if store.next_op(op) == op || (!is_open && store.next_op(op) == store.prev_op(op)) {
            return None;
        }
        let reverse = self.reverse_solution;
        let (start, mut cursor) = if reverse {
            (op, store.prev_op(op))
        } else {
            let start = store.next_op(op);
            (start, store.next_op(start))
        };

        let mut last = store.pt(start);
        let mut path = vec![last];
        while cursor != start {
            let p = store.pt(cursor);
            if p != last {
                last = p;
                path.push(p);
            }
            cursor = if reverse { store.prev_op(cursor) } else { store.next_op(cursor) };
        }

        if path.len() == 3 && self.is_very_small_triangle(cursor) {
            return None;
        }
        Some(path)
    }

    fn is_very_small_triangle(&self, op: OutPtId) -> bool {
        let store = &self.store;
        let (prev, next) = (store.prev_op(op), store.next_op(op));
        let (p, pp, pn) = (store.pt(op), store.pt(prev), store.pt(next));
        store.next_op(next) == prev
            && (pts_really_close(&pp, &pn) || pts_really_close(&p, &pn) || pts_really_close(&p, &pp))
    }

    fn is_valid_closed_path(&self, op: Option<OutPtId>) -> bool {
        op.is_some_and(|op| {
            let store = &self.store;
            store.next_op(op) != op
                && (store.next_op(op) != store.prev_op(op) || !self.is_very_small_triangle(op))
        })
    }

    /// Unlinks `op`, returning its successor unless it was the last node.
    fn dispose_out_pt(&mut self, op: OutPtId) -> Option<OutPtId> {
        let (prev, next) = (self.store.prev_op(op), self.store.next_op(op));
        self.store.link(prev, next);
        (next != op).then_some(next)
    }

    /// Signed shoelace area of a contour.
    fn area(&self, op: OutPtId) -> f64 {
        let store = &self.store;
        let mut area = 0.0;
        let mut op2 = op;
        loop {
            let (prev, cur) = (store.pt(store.prev_op(op2)), store.pt(op2));
            area += (prev.y + cur.y) * (prev.x - cur.x);
            op2 = store.next_op(op2);
            if op2 == op {
                break;
            }
        }
        area * 0.5
    }

    /// Drops collinear points from a closed contour, then untangles it.
    ///
    /// When collinear points are preserved only 180 degree spikes and
    /// duplicates are removed.
    fn clean_collinear(&mut self, outrec: OutRecIdx) -> ClipResult<()> {
        let Some(outrec) = self.store.real_outrec(Some(outrec)) else {
            return Ok(());
        };
        if self.store.out_recs[outrec].is_open {
            return Ok(());
        }
        if !self.is_valid_closed_path(self.store.out_recs[outrec].pts) {
            self.store.out_recs[outrec].pts = None;
            return Ok(());
        }

        let mut start = self.store.out_recs[outrec]
            .pts
            .ok_or(invariant("contour lost its points"))?;
        let mut op2 = start;
        loop {
            let store = &self.store;
            let (prev, next) = (store.pt(store.prev_op(op2)), store.pt(store.next_op(op2)));
            let cur = store.pt(op2);
            let removable = cross_product(&prev, &cur, &next) == 0.0
                && (cur == prev
                    || cur == next
                    || !self.preserve_collinear
                    || dot_product(&prev, &cur, &next) < 0.0);
            if removable {
                if self.store.out_recs[outrec].pts == Some(op2) {
                    self.store.out_recs[outrec].pts = Some(self.store.prev_op(op2));
                }
                let next_op = self.dispose_out_pt(op2);
                if !self.is_valid_closed_path(next_op) {
                    self.store.out_recs[outrec].pts = None;
                    return Ok(());
                }
                op2 = next_op.ok_or(invariant("contour lost its points"))?;
                start = op2;
                continue;
            }
            op2 = self.store.next_op(op2);
            if op2 == start {
                break;
            }
        }
        self.fix_self_intersects(outrec);
        Ok(())
    }

    /// Splits off loops where non-adjacent edges of a contour cross.
    fn fix_self_intersects(&mut self, outrec: OutRecIdx) {
        let Some(mut op2) = self.store.out_recs[outrec].pts else {
            return;
        };
        // Triangles cannot self-intersect.
        loop {
            let store = &self.store;
            let (prev, next) = (store.prev_op(op2), store.next_op(op2));
            let next_next = store.next_op(next);
            if prev == next_next {
                break;
            }
            if segments_intersect(
                &store.pt(prev),
                &store.pt(op2),
                &store.pt(next),
                &store.pt(next_next),
                false,
            ) {
                self.do_split_op(outrec, op2);
                match self.store.out_recs[outrec].pts {
                    Some(pts) => op2 = pts,
                    None => return,
                }
                continue;
            }
            op2 = next;
            if Some(op2) == self.store.out_recs[outrec].pts {
                break;
            }
        }
    }

    /// Resolves the crossing of `split_op.prev -> split_op` with
    /// `split_op.next -> split_op.next.next`.
    fn do_split_op(&mut self, outrec: OutRecIdx, split_op: OutPtId) {
        let store = &self.store;
        let prev_op = store.prev_op(split_op);
        let split_next = store.next_op(split_op);
        let next_next_op = store.next_op(split_next);
        let ip = line_intersection(
            &store.pt(prev_op),
            &store.pt(split_op),
            &store.pt(split_next),
            &store.pt(next_next_op),
        )
        .unwrap_or_else(|| store.pt(split_op));
        self.store.out_recs[outrec].pts = Some(prev_op);

        let area1 = self.area(prev_op);
        let abs_area1 = area1.abs();
        if abs_area1 < MIN_SPLIT_AREA {
            self.store.out_recs[outrec].pts = None;
            return;
        }

        // area1 covers the whole contour before splitting and area2 only the
        // loop holding split_op, so equal signs mean the loop is the larger
        // part or there is more than one crossing.
        let area2 = area_triangle(&ip, &self.store.pt(split_op), &self.store.pt(split_next));
        let abs_area2 = area2.abs();

        if ip == self.store.pt(prev_op) || ip == self.store.pt(next_next_op) {
            self.store.link(prev_op, next_next_op);
        } else {
            let new_op2 = self.store.add_out_pt(ip, outrec);
            self.store.link(prev_op, new_op2);
            self.store.link(new_op2, next_next_op);
        }

        if abs_area2 > MIN_SPLIT_LOOP_AREA
            && (abs_area2 > abs_area1 || (area2 > 0.0) == (area1 > 0.0))
        {
            let split = self.store.add_out_rec();
            self.store.out_recs[split].owner = self.store.out_recs[outrec].owner;
            self.store.out_pts[split_op].outrec = split;
            self.store.out_pts[split_next].outrec = split;
            let new_op = self.store.add_out_pt(ip, split);
            self.store.link(split_next, new_op);
            self.store.link(new_op, split_op);
            self.store.out_recs[split].pts = Some(new_op);
        }
    }
}
