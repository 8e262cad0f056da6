//! Horizontal edges and horizontal output joins.
//!
//! Horizontals at a scanline are processed as if layered: each one is swept
//! across the edges it spans before its bound is advanced, and consecutive
//! horizontals of a bound are handled in a single pass.
use super::engine::{
    invariant, is_horizontal, is_hot, is_open, top_x, ClipEngine, ClipResult,
};
use super::store::{ActiveId, ClipStore, HorzJoin, HorzSegment, OutPtId, VertexId};
use crate::math::Point2;

/// Sets the left/right ends of a horizontal output run; `false` when the run
/// has no width.
#[allow(clippy::float_cmp)]
fn set_heading_forward(
    store: &ClipStore,
    hs: &mut HorzSegment,
    op_p: OutPtId,
    op_n: OutPtId,
) -> bool {
    let (p, n) = (store.pt(op_p), store.pt(op_n));
    if p.x == n.x {
        return false;
    }
    if p.x < n.x {
        hs.left_op = op_p;
        hs.right_op = Some(op_n);
        hs.left_to_right = true;
    } else {
        hs.left_op = op_n;
        hs.right_op = Some(op_p);
        hs.left_to_right = false;
    }
    true
}

#[allow(clippy::float_cmp)]
impl ClipEngine {
    fn curr_y_maxima_vertex(&self, ae: ActiveId, open: bool) -> Option<VertexId> {
        let a = &self.store.actives[ae];
        let vertices = &self.store.vertices;
        let mut result = a.vertex_top;
        let stops = |v: VertexId| open && (self.vertex_is_open_end(v) || self.vertex_is_maxima(v));
        loop {
            let v = &vertices[result];
            let candidate = if a.wind_dx > 0 { v.next } else { v.prev };
            if vertices[candidate].point.y != v.point.y || stops(result) {
                break;
            }
            result = candidate;
        }
        self.vertex_is_maxima(result).then_some(result)
    }

    /// Removes 180 degree spikes and, unless collinear points are kept,
    /// merges consecutive horizontals.
    fn trim_horz(&mut self, horz: ActiveId, preserve_collinear: bool) {
        let mut was_trimmed = false;
        let mut pt = self.store.vertices[self.next_vertex(horz)].point;
        loop {
            let a = &self.store.actives[horz];
            if pt.y != a.top.y {
                break;
            }
            if preserve_collinear && (pt.x < a.top.x) != (a.bot.x < a.top.x) {
                break;
            }
            let next = self.next_vertex(horz);
            let a = &mut self.store.actives[horz];
            a.vertex_top = next;
            a.top = pt;
            was_trimmed = true;
            if self.is_maxima(horz) {
                break;
            }
            pt = self.store.vertices[self.next_vertex(horz)].point;
        }
        if was_trimmed {
            let a = &mut self.store.actives[horz];
            a.dx = super::engine::get_dx(&a.bot, &a.top);
        }
    }

    /// Returns the sweep direction and the x range of the horizontal.
    fn reset_horz_direction(
        &self,
        horz: ActiveId,
        vertex_max: Option<VertexId>,
    ) -> (bool, f64, f64) {
        let a = &self.store.actives[horz];
        if a.bot.x == a.top.x {
            // The horizontal has no length.
            let mut cursor = a.next_in_ael;
            while let Some(id) = cursor {
                if Some(self.store.actives[id].vertex_top) == vertex_max {
                    break;
                }
                cursor = self.store.actives[id].next_in_ael;
            }
            return (cursor.is_some(), a.cur_x, a.cur_x);
        }
        if a.cur_x < a.top.x {
            (true, a.cur_x, a.top.x)
        } else {
            (false, a.top.x, a.cur_x)
        }
    }

    fn horz_is_spike(&self, horz: ActiveId) -> bool {
        let a = &self.store.actives[horz];
        let next = self.store.vertices[self.next_vertex(horz)].point;
        (a.bot.x < a.top.x) != (a.top.x < next.x)
    }

    fn add_to_horz_seg_list(&mut self, op: OutPtId) {
        let outrec = self.store.out_pts[op].outrec;
        if self.store.out_recs[outrec].is_open {
            return;
        }
        self.horz_segments.push(HorzSegment {
            left_op: op,
            right_op: None,
            left_to_right: true,
        });
    }

    fn last_op(&self, hot_edge: ActiveId) -> ClipResult<OutPtId> {
        let outrec = self.store.actives[hot_edge]
            .outrec
            .ok_or(invariant("hot edge without output"))?;
        let rec = &self.store.out_recs[outrec];
        let pts = rec.pts.ok_or(invariant("hot edge output has no points"))?;
        Ok(if rec.front_edge == Some(hot_edge) {
            pts
        } else {
            self.store.next_op(pts)
        })
    }

    /// Sweeps a horizontal edge across the edges it spans.
    #[allow(clippy::too_many_lines)]
    pub(super) fn do_horizontal(&mut self, horz: ActiveId) -> ClipResult<()> {
        let horz_is_open = is_open(&self.store.actives[horz]);
        let y = self.store.actives[horz].bot.y;
        let vertex_max = self.curr_y_maxima_vertex(horz, horz_is_open);

        if let Some(vm) = vertex_max {
            if !horz_is_open && vm != self.store.actives[horz].vertex_top {
                self.trim_horz(horz, self.preserve_collinear);
            }
        }

        let (mut left_to_right, mut left_x, mut right_x) =
            self.reset_horz_direction(horz, vertex_max);

        if is_hot(&self.store.actives[horz]) {
            let cur_x = self.store.actives[horz].cur_x;
            let op = self.add_out_pt(horz, Point2::new(cur_x, y))?;
            self.add_to_horz_seg_list(op);
        }
        let mut curr_outrec = self.store.actives[horz].outrec;

        loop {
            let h = &self.store.actives[horz];
            let mut cursor = if left_to_right { h.next_in_ael } else { h.prev_in_ael };
            while let Some(ae) = cursor {
                if Some(self.store.actives[ae].vertex_top) == vertex_max {
                    // The maxima pair closes this bound.
                    let ae_top = self.store.actives[ae].top;
                    if is_hot(&self.store.actives[horz]) {
                        if super::engine::is_joined(&self.store.actives[ae]) {
                            self.split(ae, ae_top)?;
                        }
                        while Some(self.store.actives[horz].vertex_top) != vertex_max {
                            let top = self.store.actives[horz].top;
                            self.add_out_pt(horz, top)?;
                            self.update_edge_into_ael(horz)?;
                        }
                        let top = self.store.actives[horz].top;
                        if left_to_right {
                            self.add_local_max_poly(horz, ae, top)?;
                        } else {
                            self.add_local_max_poly(ae, horz, top)?;
                        }
                    }
                    self.delete_from_ael(ae);
                    self.delete_from_ael(horz);
                    return Ok(());
                }

                // Unless this is a maxima, stop once past the end of the
                // horizontal.
                if vertex_max != Some(self.store.actives[horz].vertex_top) || self.is_open_end(horz) {
                    let a = &self.store.actives[ae];
                    let h = &self.store.actives[horz];
                    if (left_to_right && a.cur_x > right_x) || (!left_to_right && a.cur_x < left_x) {
                        break;
                    }
                    if a.cur_x == h.top.x && !is_horizontal(a) {
                        let pt = self.store.vertices[self.next_vertex(horz)].point;
                        let ae_x = top_x(a, pt.y);
                        if is_open(a) && a.local_min.role != h.local_min.role && !is_hot(a) {
                            // Open edges are only passed when beyond the end.
                            if (left_to_right && ae_x > pt.x) || (!left_to_right && ae_x < pt.x) {
                                break;
                            }
                        } else if (left_to_right && ae_x >= pt.x)
                            || (!left_to_right && ae_x <= pt.x)
                        {
                            break;
                        }
                    }
                }

                let pt = Point2::new(self.store.actives[ae].cur_x, y);
                if left_to_right {
                    self.intersect_edges(horz, ae, pt)?;
                    self.swap_positions_in_ael(horz, ae);
                    self.store.actives[horz].cur_x = self.store.actives[ae].cur_x;
                    cursor = self.store.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(ae, horz, pt)?;
                    self.swap_positions_in_ael(ae, horz);
                    self.store.actives[horz].cur_x = self.store.actives[ae].cur_x;
                    cursor = self.store.actives[horz].prev_in_ael;
                }

                if is_hot(&self.store.actives[horz]) && self.store.actives[horz].outrec != curr_outrec {
                    curr_outrec = self.store.actives[horz].outrec;
                    let op = self.last_op(horz)?;
                    self.add_to_horz_seg_list(op);
                }
            }

            if horz_is_open && self.is_open_end(horz) {
                if is_hot(&self.store.actives[horz]) {
                    let top = self.store.actives[horz].top;
                    self.add_out_pt(horz, top)?;
                    self.uncouple_open_edge(horz);
                }
                self.delete_from_ael(horz);
                return Ok(());
            }
            let next_y = self.store.vertices[self.next_vertex(horz)].point.y;
            if next_y != self.store.actives[horz].top.y {
                break;
            }

            // More horizontals follow in this bound.
            if is_hot(&self.store.actives[horz]) {
                let top = self.store.actives[horz].top;
                self.add_out_pt(horz, top)?;
            }
            self.update_edge_into_ael(horz)?;
            if self.preserve_collinear && !horz_is_open && self.horz_is_spike(horz) {
                self.trim_horz(horz, true);
            }
            (left_to_right, left_x, right_x) = self.reset_horz_direction(horz, vertex_max);
        }

        if is_hot(&self.store.actives[horz]) {
            let top = self.store.actives[horz].top;
            let op = self.add_out_pt(horz, top)?;
            self.add_to_horz_seg_list(op);
        }
        // End of an intermediate horizontal.
        self.update_edge_into_ael(horz)
    }

    /// Extends the segment's left point to the whole horizontal run it lies
    /// on; `false` when the run is empty or already claimed.
    fn update_horz_segment(&mut self, index: usize) -> bool {
        let store = &mut self.store;
        let op = self.horz_segments[index].left_op;
        let outrec = store.real_outrec(Some(store.out_pts[op].outrec));
        let curr_y = store.pt(op).y;
        let mut op_p = op;
        let mut op_n = op;

        let edges_pts = outrec.and_then(|o| {
            let rec = &store.out_recs[o];
            rec.front_edge.and(rec.pts)
        });
        if let Some(op_a) = edges_pts {
            let op_z = store.next_op(op_a);
            while op_p != op_z && store.pt(store.prev_op(op_p)).y == curr_y {
                op_p = store.prev_op(op_p);
            }
            while op_n != op_a && store.pt(store.next_op(op_n)).y == curr_y {
                op_n = store.next_op(op_n);
            }
        } else {
            while store.prev_op(op_p) != op_n && store.pt(store.prev_op(op_p)).y == curr_y {
                op_p = store.prev_op(op_p);
            }
            while store.next_op(op_n) != op_p && store.pt(store.next_op(op_n)).y == curr_y {
                op_n = store.next_op(op_n);
            }
        }

        let hs = &mut self.horz_segments[index];
        let result =
            set_heading_forward(store, hs, op_p, op_n) && !store.out_pts[hs.left_op].in_horz_segment;
        if result {
            store.out_pts[hs.left_op].in_horz_segment = true;
        } else {
            hs.right_op = None;
        }
        result
    }

    fn duplicate_op(&mut self, op: OutPtId, insert_after: bool) -> OutPtId {
        let store = &mut self.store;
        let result = store.add_out_pt(store.pt(op), store.out_pts[op].outrec);
        if insert_after {
            let next = store.next_op(op);
            store.link(result, next);
            store.link(op, result);
        } else {
            let prev = store.prev_op(op);
            store.link(prev, result);
            store.link(result, op);
        }
        result
    }

    /// Pairs overlapping horizontal runs heading in opposite directions so
    /// their contours can be joined once the sweep is done.
    pub(super) fn convert_horz_segs_to_joins(&mut self) {
        let mut valid = 0;
        for i in 0..self.horz_segments.len() {
            if self.update_horz_segment(i) {
                valid += 1;
            }
        }
        if valid < 2 {
            return;
        }

        let store = &self.store;
        self.horz_segments.sort_by(|a, b| match (a.right_op, b.right_op) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(_), Some(_)) => store.pt(a.left_op).x.total_cmp(&store.pt(b.left_op).x),
        });

        for i in 0..valid - 1 {
            for j in i + 1..valid {
                let hs1 = self.horz_segments[i];
                let hs2 = self.horz_segments[j];
                let (Some(right1), Some(right2)) = (hs1.right_op, hs2.right_op) else {
                    continue;
                };
                let store = &self.store;
                if store.pt(hs2.left_op).x >= store.pt(right1).x
                    || hs2.left_to_right == hs1.left_to_right
                    || store.pt(right2).x <= store.pt(hs1.left_op).x
                {
                    continue;
                }

                let curr_y = store.pt(hs1.left_op).y;
                let mut l1 = hs1.left_op;
                let mut l2 = hs2.left_op;
                let join = if hs1.left_to_right {
                    while store.pt(store.next_op(l1)).y == curr_y
                        && store.pt(store.next_op(l1)).x <= store.pt(l2).x
                    {
                        l1 = store.next_op(l1);
                    }
                    while store.pt(store.prev_op(l2)).y == curr_y
                        && store.pt(store.prev_op(l2)).x <= store.pt(l1).x
                    {
                        l2 = store.prev_op(l2);
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l1, true),
                        op2: self.duplicate_op(l2, false),
                    }
                } else {
                    while store.pt(store.prev_op(l1)).y == curr_y
                        && store.pt(store.prev_op(l1)).x <= store.pt(l2).x
                    {
                        l1 = store.prev_op(l1);
                    }
                    while store.pt(store.next_op(l2)).y == curr_y
                        && store.pt(store.next_op(l2)).x <= store.pt(l1).x
                    {
                        l2 = store.next_op(l2);
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l2, true),
                        op2: self.duplicate_op(l1, false),
                    }
                };
                self.horz_joins.push(join);
                self.horz_segments[i].left_op = l1;
                self.horz_segments[j].left_op = l2;
            }
        }
    }

    /// Splices every recorded horizontal join, splitting or merging the
    /// affected contours.
    pub(super) fn process_horz_joins(&mut self) -> ClipResult<()> {
        for join in std::mem::take(&mut self.horz_joins) {
            let store = &mut self.store;
            let or1 = store
                .real_outrec(Some(store.out_pts[join.op1].outrec))
                .ok_or(invariant("horizontal join on an empty contour"))?;
            let or2 = store
                .real_outrec(Some(store.out_pts[join.op2].outrec))
                .ok_or(invariant("horizontal join on an empty contour"))?;

            let op1b = store.next_op(join.op1);
            let op2b = store.prev_op(join.op2);
            store.link(join.op1, join.op2);
            store.link(op2b, op1b);

            if or1 == or2 {
                let split = store.add_out_rec();
                store.out_recs[split].pts = Some(op1b);
                self.fix_outrec_pts(split);
                let store = &mut self.store;
                let first = store.out_recs[or1]
                    .pts
                    .ok_or(invariant("horizontal join on an empty contour"))?;
                if store.out_pts[first].outrec == split {
                    store.out_recs[or1].pts = Some(join.op1);
                    store.out_pts[join.op1].outrec = or1;
                }
                store.out_recs[split].owner = Some(or1);
            } else {
                store.out_recs[or2].pts = None;
                store.out_recs[or2].owner = Some(or1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area;
    use crate::operations::boolean::select::{ClipOperation, FillRule, PathRole};

    #[test]
    fn stacked_rectangles_share_a_horizontal_edge() {
        let lower = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10_000.0, 0.0),
            Point2::new(10_000.0, 5_000.0),
            Point2::new(0.0, 5_000.0),
        ];
        let upper = vec![
            Point2::new(2_000.0, 5_000.0),
            Point2::new(8_000.0, 5_000.0),
            Point2::new(8_000.0, 9_000.0),
            Point2::new(2_000.0, 9_000.0),
        ];
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&lower, PathRole::Subject, false);
        engine.add_path(&upper, PathRole::Clip, false);
        let solution = engine.execute(ClipOperation::Union, FillRule::NonZero).unwrap();
        let area: f64 = solution.closed.iter().map(|p| signed_area(p)).sum();
        assert!((area - 7.4e7).abs() < 1e-3, "area={area}");
    }

    #[test]
    fn spike_on_horizontal_is_removed() {
        let spiky = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10_000.0, 0.0),
            Point2::new(10_000.0, 10_000.0),
            Point2::new(15_000.0, 10_000.0),
            Point2::new(0.0, 10_000.0),
        ];
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&spiky, PathRole::Subject, false);
        let solution = engine.execute(ClipOperation::Union, FillRule::NonZero).unwrap();
        assert_eq!(solution.closed.len(), 1);
        assert!(solution.closed[0].iter().all(|p| p.x <= 10_000.0));
        assert!((signed_area(&solution.closed[0]) - 1.0e8).abs() < 1e-3);
    }
}
