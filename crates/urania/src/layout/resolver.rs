use crate::error::ValidationError;
use crate::geometry::{normalize, project_on_circle, signed_delta, DEG_360};
use crate::layout::types::{Circle, DegenerateGeometry, Layout, LocatedPoint};
use crate::points::PointSet;

/// Gaps this close to the minimum separation count as satisfied
const GAP_TOLERANCE: f64 = 1e-9;

/// Run of points packed at exactly the minimum separation, centred on the
/// mean of the members' raw (unrolled) angles
#[derive(Debug)]
struct Cluster {
    /// (input slot, unrolled raw angle), ascending by angle
    members: Vec<(usize, f64)>,
    sum: f64,
}

impl Cluster {
    fn single(slot: usize, angle: f64) -> Self {
        Self {
            members: vec![(slot, angle)],
            sum: angle,
        }
    }

    fn half_span(&self, separation: f64) -> f64 {
        (self.members.len() - 1) as f64 * separation / 2.0
    }

    fn center(&self) -> f64 {
        self.sum / self.members.len() as f64
    }

    fn start(&self, separation: f64) -> f64 {
        self.center() - self.half_span(separation)
    }

    fn end(&self, separation: f64) -> f64 {
        self.center() + self.half_span(separation)
    }

    fn absorb(&mut self, other: Cluster) {
        self.sum += other.sum;
        self.members.extend(other.members);
    }

    fn shifted(mut self, offset: f64) -> Self {
        for member in &mut self.members {
            member.1 += offset;
        }
        self.sum += offset * self.members.len() as f64;
        self
    }
}

fn overlaps(left: &Cluster, right: &Cluster, separation: f64) -> bool {
    right.start(separation) - left.end(separation) < separation - GAP_TOLERANCE
}

/// Push a cluster and merge backwards while the top two overlap
fn push_merging(stack: &mut Vec<Cluster>, cluster: Cluster, separation: f64) {
    stack.push(cluster);
    while stack.len() >= 2 {
        let last = stack.len() - 1;
        if !overlaps(&stack[last - 1], &stack[last], separation) {
            break;
        }
        if let Some(top) = stack.pop() {
            stack[last - 1].absorb(top);
        }
    }
}

/// Collision resolver: spreads points around a circle so that neighbours in
/// angular order are at least `min_separation` degrees apart.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    min_separation: f64,
}

impl CollisionResolver {
    pub fn new(min_separation: f64) -> Result<Self, ValidationError> {
        if !min_separation.is_finite() || min_separation < 0.0 {
            return Err(ValidationError::InvalidSeparation(min_separation));
        }
        Ok(Self { min_separation })
    }

    pub fn min_separation(&self) -> f64 {
        self.min_separation
    }

    /// Resolve collisions. Output is in the input set's insertion order.
    pub fn resolve(&self, points: &PointSet, circle: &Circle) -> Result<Layout, ValidationError> {
        points.validate_non_empty()?;
        if !circle.radius.is_finite() || circle.radius <= 0.0 {
            return Err(ValidationError::InvalidRadius(circle.radius));
        }

        let raw: Vec<f64> = points.iter().map(|p| normalize(p.angle)).collect();
        let (resolved, degraded) = self.resolve_angles(&raw);

        if let Some(warning) = &degraded {
            log::warn!(
                "Unresolvable collision: {} points need {:.2} deg each, spacing them every {:.2} deg",
                warning.point_count,
                warning.requested_separation,
                warning.applied_separation
            );
        }

        let located = points
            .iter()
            .zip(raw.iter().zip(resolved))
            .map(|(point, (&raw_angle, angle))| LocatedPoint {
                point: point.clone(),
                angle,
                displacement: signed_delta(raw_angle, angle),
                position: project_on_circle(circle.center, circle.radius, angle, circle.shift),
            })
            .collect();

        Ok(Layout {
            points: located,
            degraded,
        })
    }

    /// Resolve normalized angles given in input order
    fn resolve_angles(&self, raw: &[f64]) -> (Vec<f64>, Option<DegenerateGeometry>) {
        let n = raw.len();
        let separation = self.min_separation;
        if n < 2 || separation == 0.0 {
            return (raw.to_vec(), None);
        }

        // Stable sort: equal angles keep insertion order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));

        if n as f64 * separation > DEG_360 {
            return self.spread_uniformly(raw, &order);
        }

        // Cut the circle at the widest gap so clusters rarely straddle the cut
        let mut cut = 0;
        let mut widest = f64::NEG_INFINITY;
        for k in 0..n {
            let gap = if k + 1 < n {
                raw[order[k + 1]] - raw[order[k]]
            } else {
                raw[order[0]] + DEG_360 - raw[order[k]]
            };
            if gap > widest {
                widest = gap;
                cut = (k + 1) % n;
            }
        }

        let mut stack: Vec<Cluster> = Vec::with_capacity(n);
        for j in 0..n {
            let k = (cut + j) % n;
            let unrolled = if k < cut {
                raw[order[k]] + DEG_360
            } else {
                raw[order[k]]
            };
            push_merging(&mut stack, Cluster::single(order[k], unrolled), separation);
        }

        // Wrap-around: the first cluster moves behind the last one until the
        // gap across the cut is wide enough. Every pass merges at least once.
        let mut passes = 0;
        while stack.len() > 1 && passes < n {
            passes += 1;
            let wrap_gap = stack[0].start(separation) + DEG_360
                - stack[stack.len() - 1].end(separation);
            if wrap_gap >= separation - GAP_TOLERANCE {
                break;
            }
            let first = stack.remove(0);
            push_merging(&mut stack, first.shifted(DEG_360), separation);
        }

        log::debug!(
            "Resolved {} points into {} clusters (min separation {:.3})",
            n,
            stack.len(),
            separation
        );

        let mut resolved = raw.to_vec();
        for cluster in &stack {
            let start = cluster.start(separation);
            for (k, (slot, _)) in cluster.members.iter().enumerate() {
                resolved[*slot] = normalize(start + k as f64 * separation);
            }
        }
        (resolved, None)
    }

    /// Overflow fallback: uniform spacing in sorted order, anchored at the
    /// first sorted angle
    fn spread_uniformly(
        &self,
        raw: &[f64],
        order: &[usize],
    ) -> (Vec<f64>, Option<DegenerateGeometry>) {
        let n = raw.len();
        let step = DEG_360 / n as f64;
        let anchor = raw[order[0]];
        let mut resolved = raw.to_vec();
        for (k, &slot) in order.iter().enumerate() {
            resolved[slot] = normalize(anchor + k as f64 * step);
        }
        let warning = DegenerateGeometry {
            point_count: n,
            requested_separation: self.min_separation,
            applied_separation: step,
        };
        (resolved, Some(warning))
    }
}

/// Convenience wrapper around [`CollisionResolver`]
pub fn resolve(
    points: &PointSet,
    min_separation: f64,
    circle: &Circle,
) -> Result<Layout, ValidationError> {
    CollisionResolver::new(min_separation)?.resolve(points, circle)
}
