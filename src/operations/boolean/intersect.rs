//! Edge intersections inside a scanbeam.
use super::engine::{
    invariant, is_horizontal, is_hot, is_joined, is_open, top_x, ClipEngine, ClipResult,
};
use super::select::{ClipOperation, FillRule, PathRole};
use super::store::{ActiveId, IntersectNode, JoinWith};
use crate::math::intersect_2d::{closest_point_on_segment, line_intersection};
use crate::math::Point2;

/// Edges steeper than this (in |dx|) have an out-of-beam intersection snapped
/// onto the edge instead of clamped to the beam.
const SLOPE_SNAP_THRESHOLD: f64 = 100.0;

impl ClipEngine {
    pub(super) fn do_intersections(&mut self, top_y: f64) -> ClipResult<()> {
        if self.build_intersect_list(top_y)? {
            self.process_intersect_list()?;
            self.intersect_list.clear();
        }
        Ok(())
    }

    /// Updates every edge's x to `top_y` and copies the AEL into the sorted
    /// edge list.
    fn adjust_curr_x_and_copy_to_sel(&mut self, top_y: f64) {
        let mut cursor = self.actives;
        self.sel = cursor;
        while let Some(id) = cursor {
            let (prev, next) = {
                let a = &self.store.actives[id];
                (a.prev_in_ael, a.next_in_ael)
            };
            let cur_x = match (self.store.actives[id].join_with, prev) {
                (JoinWith::Left, Some(p)) => self.store.actives[p].cur_x,
                _ => top_x(&self.store.actives[id], top_y),
            };
            let a = &mut self.store.actives[id];
            a.prev_in_sel = prev;
            a.next_in_sel = next;
            a.jump = next;
            a.cur_x = cur_x;
            cursor = next;
        }
    }

    /// Merge sorts the sorted edge list by the new x positions, recording an
    /// intersection for every pair of edges that swap places. Only adjacent
    /// edges are ever swapped.
    fn build_intersect_list(&mut self, top_y: f64) -> ClipResult<bool> {
        let Some(head) = self.actives else {
            return Ok(false);
        };
        if self.store.actives[head].next_in_ael.is_none() {
            return Ok(false);
        }
        self.adjust_curr_x_and_copy_to_sel(top_y);

        loop {
            let Some(first) = self.sel else { break };
            if self.store.actives[first].jump.is_none() {
                break;
            }
            let mut left = Some(first);
            let mut prev_base: Option<ActiveId> = None;
            while let Some(l) = left {
                let Some(r) = self.store.actives[l].jump else {
                    break;
                };
                let mut curr_base = l;
                let mut right = Some(r);
                let mut l_end = Some(r);
                let r_end = self.store.actives[r].jump;
                self.store.actives[l].jump = r_end;

                while left != l_end && right != r_end {
                    let (Some(lid), Some(rid)) = (left, right) else {
                        return Err(invariant("sorted edge list ended early"));
                    };
                    if self.store.actives[rid].cur_x < self.store.actives[lid].cur_x {
                        let mut tmp = self.store.actives[rid].prev_in_sel;
                        loop {
                            let t = tmp.ok_or(invariant("sorted edge list ended early"))?;
                            self.add_new_intersect_node(t, rid, top_y);
                            if t == lid {
                                break;
                            }
                            tmp = self.store.actives[t].prev_in_sel;
                        }
                        right = self.extract_from_sel(rid);
                        l_end = right;
                        self.insert1_before2_in_sel(rid, lid);
                        if lid == curr_base {
                            curr_base = rid;
                            self.store.actives[rid].jump = r_end;
                            match prev_base {
                                None => self.sel = Some(rid),
                                Some(pb) => self.store.actives[pb].jump = Some(rid),
                            }
                        }
                    } else {
                        left = self.store.actives[lid].next_in_sel;
                    }
                }
                prev_base = Some(curr_base);
                left = r_end;
            }
        }
        Ok(!self.intersect_list.is_empty())
    }

    fn add_new_intersect_node(&mut self, ae1: ActiveId, ae2: ActiveId, top_y: f64) {
        let a1 = &self.store.actives[ae1];
        let a2 = &self.store.actives[ae2];
        let mut ip = line_intersection(&a1.bot, &a1.top, &a2.bot, &a2.top)
            .unwrap_or_else(|| Point2::new(a1.cur_x, top_y));

        if ip.y > self.current_bot_y || ip.y < top_y {
            let abs_dx1 = a1.dx.abs();
            let abs_dx2 = a2.dx.abs();
            if abs_dx1 > SLOPE_SNAP_THRESHOLD && abs_dx2 > SLOPE_SNAP_THRESHOLD {
                ip = if abs_dx1 > abs_dx2 {
                    closest_point_on_segment(&ip, &a1.bot, &a1.top)
                } else {
                    closest_point_on_segment(&ip, &a2.bot, &a2.top)
                };
            } else if abs_dx1 > SLOPE_SNAP_THRESHOLD {
                ip = closest_point_on_segment(&ip, &a1.bot, &a1.top);
            } else if abs_dx2 > SLOPE_SNAP_THRESHOLD {
                ip = closest_point_on_segment(&ip, &a2.bot, &a2.top);
            } else {
                ip.y = if ip.y < top_y { top_y } else { self.current_bot_y };
                ip.x = if abs_dx1 < abs_dx2 {
                    top_x(a1, ip.y)
                } else {
                    top_x(a2, ip.y)
                };
            }
        }
        self.intersect_list.push(IntersectNode {
            point: ip,
            edge1: ae1,
            edge2: ae2,
        });
    }

    fn extract_from_sel(&mut self, ae: ActiveId) -> Option<ActiveId> {
        let next = self.store.actives[ae].next_in_sel;
        let prev = self.store.actives[ae].prev_in_sel;
        if let Some(n) = next {
            self.store.actives[n].prev_in_sel = prev;
        }
        if let Some(p) = prev {
            self.store.actives[p].next_in_sel = next;
        }
        next
    }

    fn insert1_before2_in_sel(&mut self, ae1: ActiveId, ae2: ActiveId) {
        let prev = self.store.actives[ae2].prev_in_sel;
        self.store.actives[ae1].prev_in_sel = prev;
        if let Some(p) = prev {
            self.store.actives[p].next_in_sel = Some(ae1);
        }
        self.store.actives[ae1].next_in_sel = Some(ae2);
        self.store.actives[ae2].prev_in_sel = Some(ae1);
    }

    fn edges_adjacent(&self, node: &IntersectNode) -> bool {
        let a1 = &self.store.actives[node.edge1];
        a1.next_in_ael == Some(node.edge2) || a1.prev_in_ael == Some(node.edge2)
    }

    /// Processes intersections from the scanbeam bottom up, reordering so the
    /// edges of each processed node are adjacent.
    fn process_intersect_list(&mut self) -> ClipResult<()> {
        self.intersect_list.sort_by(|a, b| {
            b.point
                .y
                .total_cmp(&a.point.y)
                .then_with(|| a.point.x.total_cmp(&b.point.x))
        });

        for i in 0..self.intersect_list.len() {
            if !self.edges_adjacent(&self.intersect_list[i]) {
                let j = (i + 1..self.intersect_list.len())
                    .find(|&j| self.edges_adjacent(&self.intersect_list[j]))
                    .ok_or(invariant("no adjacent intersection left to process"))?;
                self.intersect_list.swap(i, j);
            }
            let node = self.intersect_list[i];
            self.intersect_edges(node.edge1, node.edge2, node.point)?;
            self.swap_positions_in_ael(node.edge1, node.edge2);
            self.store.actives[node.edge1].cur_x = node.point.x;
            self.store.actives[node.edge2].cur_x = node.point.x;
            self.check_join_left(node.edge2, node.point, true)?;
            self.check_join_right(node.edge1, node.point, true)?;
        }
        Ok(())
    }

    /// Finds the other bound of `e`'s local minimum among edges sharing its
    /// bottom point.
    fn find_edge_with_matching_loc_min(&self, e: ActiveId) -> Option<ActiveId> {
        let ae = &self.store.actives[e];
        let mut cursor = ae.next_in_ael;
        while let Some(id) = cursor {
            let other = &self.store.actives[id];
            if other.local_min == ae.local_min {
                return Some(id);
            }
            if !is_horizontal(other) && ae.bot != other.bot {
                cursor = None;
            } else {
                cursor = other.next_in_ael;
            }
        }
        cursor = ae.prev_in_ael;
        while let Some(id) = cursor {
            let other = &self.store.actives[id];
            if other.local_min == ae.local_min {
                return Some(id);
            }
            if !is_horizontal(other) && ae.bot != other.bot {
                return None;
            }
            cursor = other.prev_in_ael;
        }
        None
    }

    /// Handles two edges crossing at `pt`: updates winding counts and starts,
    /// extends or closes output contours.
    pub(super) fn intersect_edges(
        &mut self,
        ae1: ActiveId,
        ae2: ActiveId,
        pt: Point2,
    ) -> ClipResult<()> {
        let open1 = is_open(&self.store.actives[ae1]);
        let open2 = is_open(&self.store.actives[ae2]);
        if self.has_open_paths && (open1 || open2) {
            return self.intersect_open_edge(ae1, ae2, pt);
        }

        if is_joined(&self.store.actives[ae1]) {
            self.split(ae1, pt)?;
        }
        if is_joined(&self.store.actives[ae2]) {
            self.split(ae2, pt)?;
        }

        self.update_crossing_wind_counts(ae1, ae2);

        let a1 = &self.store.actives[ae1];
        let a2 = &self.store.actives[ae2];
        let e1_wc = self.fill_rule.normalized(a1.wind_count);
        let e2_wc = self.fill_rule.normalized(a2.wind_count);
        let e1_wc_0_or_1 = matches!(e1_wc, 0 | 1);
        let e2_wc_0_or_1 = matches!(e2_wc, 0 | 1);
        let (hot1, hot2) = (is_hot(a1), is_hot(a2));
        let same_role = a1.local_min.role == a2.local_min.role;
        let same_outrec = a1.outrec == a2.outrec;
        let role1 = a1.local_min.role;
        let e1_wc2 = self.fill_rule.normalized(a1.wind_count2);
        let e2_wc2 = self.fill_rule.normalized(a2.wind_count2);

        if (!hot1 && !e1_wc_0_or_1) || (!hot2 && !e2_wc_0_or_1) {
            return Ok(());
        }

        if hot1 && hot2 {
            if !e1_wc_0_or_1
                || !e2_wc_0_or_1
                || (!same_role && self.operation != ClipOperation::Xor)
            {
                self.add_local_max_poly(ae1, ae2, pt)?;
            } else if self.is_front(ae1) || same_outrec {
                // Polygons touching at a single vertex are split apart.
                self.add_local_max_poly(ae1, ae2, pt)?;
                self.add_local_min_poly(ae1, ae2, pt, false);
            } else {
                self.add_out_pt(ae1, pt)?;
                self.add_out_pt(ae2, pt)?;
                self.swap_outrecs(ae1, ae2);
            }
        } else if hot1 {
            self.add_out_pt(ae1, pt)?;
            self.swap_outrecs(ae1, ae2);
        } else if hot2 {
            self.add_out_pt(ae2, pt)?;
            self.swap_outrecs(ae1, ae2);
        } else if !same_role {
            self.add_local_min_poly(ae1, ae2, pt, false);
        } else if e1_wc == 1 && e2_wc == 1 {
            let start = match self.operation {
                ClipOperation::Union => e1_wc2 <= 0 || e2_wc2 <= 0,
                ClipOperation::Difference => {
                    (role1 == PathRole::Clip && e1_wc2 > 0 && e2_wc2 > 0)
                        || (role1 == PathRole::Subject && e1_wc2 <= 0 && e2_wc2 <= 0)
                }
                ClipOperation::Xor => true,
                ClipOperation::Intersection | ClipOperation::None => e1_wc2 > 0 && e2_wc2 > 0,
            };
            if start {
                self.add_local_min_poly(ae1, ae2, pt, false);
            }
        }
        Ok(())
    }

    fn update_crossing_wind_counts(&mut self, ae1: ActiveId, ae2: ActiveId) {
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        let (wc1, dx1, wc2_1, role1) = {
            let a = &self.store.actives[ae1];
            (a.wind_count, a.wind_dx, a.wind_count2, a.local_min.role)
        };
        let (wc2, dx2, wc2_2, role2) = {
            let a = &self.store.actives[ae2];
            (a.wind_count, a.wind_dx, a.wind_count2, a.local_min.role)
        };

        if role1 == role2 {
            let (new1, new2) = if even_odd {
                (wc2, wc1)
            } else {
                (
                    if wc1 + dx2 == 0 { -wc1 } else { wc1 + dx2 },
                    if wc2 - dx1 == 0 { -wc2 } else { wc2 - dx1 },
                )
            };
            self.store.actives[ae1].wind_count = new1;
            self.store.actives[ae2].wind_count = new2;
        } else if even_odd {
            self.store.actives[ae1].wind_count2 = i32::from(wc2_1 == 0);
            self.store.actives[ae2].wind_count2 = i32::from(wc2_2 == 0);
        } else {
            self.store.actives[ae1].wind_count2 = wc2_1 + dx2;
            self.store.actives[ae2].wind_count2 = wc2_2 - dx1;
        }
    }

    /// Crossing of an open edge with a closed one toggles the open edge's
    /// contribution.
    fn intersect_open_edge(
        &mut self,
        ae1: ActiveId,
        ae2: ActiveId,
        pt: Point2,
    ) -> ClipResult<()> {
        let open1 = is_open(&self.store.actives[ae1]);
        let open2 = is_open(&self.store.actives[ae2]);
        if open1 && open2 {
            return Ok(());
        }
        let (ae1, ae2) = if open2 { (ae2, ae1) } else { (ae1, ae2) };

        if is_joined(&self.store.actives[ae2]) {
            self.split(ae2, pt)?;
        }

        let closed = &self.store.actives[ae2];
        if self.operation == ClipOperation::Union {
            if !is_hot(closed) {
                return Ok(());
            }
        } else if closed.local_min.role == PathRole::Subject {
            return Ok(());
        }
        let on_boundary = match self.fill_rule {
            FillRule::Positive => closed.wind_count == 1,
            FillRule::Negative => closed.wind_count == -1,
            FillRule::EvenOdd | FillRule::NonZero => closed.wind_count.abs() == 1,
        };
        if !on_boundary {
            return Ok(());
        }

        if is_hot(&self.store.actives[ae1]) {
            self.add_out_pt(ae1, pt)?;
            self.uncouple_open_edge(ae1);
            return Ok(());
        }

        // Horizontals can pass under open paths at a local minimum.
        let local_min = self.store.actives[ae1].local_min;
        if pt == self.store.vertices[local_min.vertex].point
            && !self.vertex_is_open_end(local_min.vertex)
        {
            if let Some(ae3) = self.find_edge_with_matching_loc_min(ae1) {
                if let Some(outrec) = self.store.actives[ae3].outrec {
                    self.store.actives[ae1].outrec = Some(outrec);
                    if self.store.actives[ae1].wind_dx > 0 {
                        self.set_sides(outrec, ae1, ae3);
                    } else {
                        self.set_sides(outrec, ae3, ae1);
                    }
                    return Ok(());
                }
            }
        }
        self.start_open_path(ae1, pt);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area;

    #[test]
    fn crossing_diamonds_intersect_inside_the_beam() {
        // Two diamonds whose edges cross away from any vertex.
        let a = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4_000.0, -4_000.0),
            Point2::new(8_000.0, 0.0),
            Point2::new(4_000.0, 4_000.0),
        ];
        let b: Vec<Point2> = a.iter().map(|p| Point2::new(p.x + 4_000.0, p.y + 1_000.0)).collect();
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&a, PathRole::Subject, false);
        engine.add_path(&b, PathRole::Clip, false);
        let solution = engine
            .execute(ClipOperation::Intersection, FillRule::NonZero)
            .unwrap();
        assert_eq!(solution.closed.len(), 1);
        let area: f64 = signed_area(&solution.closed[0]);
        assert!(area > 0.0);
        assert!(area < 3.2e7, "area={area}");
    }

    #[test]
    fn open_line_is_clipped_to_the_square() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10_000.0, 0.0),
            Point2::new(10_000.0, 10_000.0),
            Point2::new(0.0, 10_000.0),
        ];
        let line = vec![Point2::new(-5_000.0, 2_000.0), Point2::new(15_000.0, 8_000.0)];
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&line, PathRole::Subject, true);
        engine.add_path(&square, PathRole::Clip, false);
        let solution = engine
            .execute(ClipOperation::Intersection, FillRule::NonZero)
            .unwrap();
        assert!(solution.closed.is_empty());
        assert_eq!(solution.open.len(), 1);
        for p in &solution.open[0] {
            assert!(p.x >= -1e-6 && p.x <= 10_000.0 + 1e-6, "x={}", p.x);
        }
    }

    #[test]
    fn open_line_difference_keeps_outside_parts() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10_000.0, 0.0),
            Point2::new(10_000.0, 10_000.0),
            Point2::new(0.0, 10_000.0),
        ];
        let line = vec![Point2::new(-5_000.0, 2_000.0), Point2::new(15_000.0, 8_000.0)];
        let mut engine = ClipEngine::new(true, false);
        engine.add_path(&line, PathRole::Subject, true);
        engine.add_path(&square, PathRole::Clip, false);
        let solution = engine
            .execute(ClipOperation::Difference, FillRule::NonZero)
            .unwrap();
        assert_eq!(solution.open.len(), 2);
    }
}
