//! Fractal bolts built by recursive midpoint displacement with branching

use crate::config::BoltConfig;
use crate::math3d::{lerp, Point3, Vec3};
use crate::util::RandomSource;

/// Ordered points drawn as a connected strip, shared read-only once built
pub type BoltSegmentList = std::sync::Arc<[Point3]>;

/// Points of one built bolt, the deepest recursion level it reached, and
/// the indices where the strip jumps back from a branch tip.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltPath {
    pub points: Vec<Point3>,
    /// Each index `i` marks `points[i - 1] -> points[i]` as a jump, not a segment
    pub jumps: Vec<usize>,
    pub depth: u32,
}

impl BoltPath {
    fn leaf(end: Point3, depth: u32) -> Self {
        Self {
            points: vec![end],
            jumps: Vec::new(),
            depth,
        }
    }

    fn append(&mut self, other: Self) {
        let base = self.points.len();
        self.points.extend(other.points);
        self.jumps.extend(other.jumps.into_iter().map(|i| i + base));
        self.depth = self.depth.max(other.depth);
    }

    fn jump_back(&mut self, to: Point3) {
        self.jumps.push(self.points.len());
        self.points.push(to);
    }
}

/// Builds bolt polylines between two points.
///
/// Output never includes `start`; the caller emits it. Each level splits the
/// segment at a jittered midpoint and may detour into a branch, in order:
/// left half (ending at the midpoint), branch, midpoint again, right half.
///
/// Draws per level: midpoint offset, branch roll, then branch angle and
/// reach if the roll passed, all before recursing into either half.
#[derive(Debug, Clone)]
pub struct BoltPathBuilder {
    config: BoltConfig,
}

impl BoltPathBuilder {
    pub fn new(config: BoltConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, start: Point3, end: Point3, rng: &mut impl RandomSource) -> BoltPath {
        self.subdivide(
            start,
            end,
            self.config.displacement_scale,
            self.config.max_branch_depth,
            0,
            rng,
        )
    }

    fn subdivide(
        &self,
        start: Point3,
        end: Point3,
        scale: f32,
        branch_budget: u32,
        depth: u32,
        rng: &mut impl RandomSource,
    ) -> BoltPath {
        let c = &self.config;
        // Ceiling before distance; the distance test alone need not converge
        if depth >= c.depth_ceiling || start.distance(&end) < c.min_segment_length {
            return BoltPath::leaf(end, depth);
        }

        let dir = end - start;
        let offset = rng.range_f32(-scale / 2.0, scale / 2.0);
        let perp = perpendicular(dir);
        let mid = lerp(start, end, 0.5) + perp * offset;

        let branch_end = if depth < branch_budget
            && rng.next_f32() < c.branch_probability / (depth + 1) as f32
        {
            let angle = rng.range_f32(-c.branch_spread, c.branch_spread);
            let reach = dir.length() * c.branch_length_factor * rng.next_f32();
            let heading = dir.normalize().rotate_about(&perp, angle);
            Some(mid + heading * reach)
        } else {
            None
        };

        let next_scale = scale * c.scale_falloff;
        let mut path = self.subdivide(start, mid, next_scale, branch_budget, depth + 1, rng);

        if let Some(branch_end) = branch_end {
            path.append(self.subdivide(
                mid,
                branch_end,
                next_scale,
                branch_budget.saturating_sub(1),
                depth + 1,
                rng,
            ));
            path.jump_back(mid);
        }

        path.append(self.subdivide(mid, end, next_scale, branch_budget, depth + 1, rng));
        path
    }
}

/// Unit vector perpendicular to `dir`, preferring the horizontal one.
///
/// Vertical segments have no XZ-plane perpendicular, so they fall back to
/// rotating about the X axis instead.
fn perpendicular(dir: Vec3) -> Vec3 {
    let horizontal = dir.cross(&Vec3::Y);
    if horizontal.length() > 1e-6 {
        horizontal.normalize()
    } else {
        dir.cross(&Vec3::X).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{FixedRandom, Rng, SequenceRandom};

    fn builder() -> BoltPathBuilder {
        BoltPathBuilder::new(BoltConfig::default())
    }

    #[test]
    fn test_short_segment_is_base_case() {
        let start = Point3::new(1.0, 1.0, 1.0);
        let end = Point3::new(1.1, 1.05, 1.0);
        let path = builder().build(start, end, &mut Rng::new(1));
        assert_eq!(path.points, vec![end]);
        assert_eq!(path.depth, 0);
    }

    #[test]
    fn test_golden_vertical_bolt_with_centered_draws() {
        // 0.5 for every draw: zero displacement and no branch ever passes the
        // 0.4 / (depth + 1) roll, so the bolt is the exact bisection of an
        // 11-unit segment down to 11/64 < 0.2.
        let start = Point3::new(0.0, 10.0, 0.0);
        let end = Point3::new(0.0, -1.0, 0.0);
        let path = builder().build(start, end, &mut FixedRandom(0.5));

        assert_eq!(path.points.len(), 64);
        assert_eq!(path.depth, 6);
        for (i, p) in path.points.iter().enumerate() {
            let expected = Point3::new(0.0, 10.0 - 11.0 * (i + 1) as f32 / 64.0, 0.0);
            assert!(p.approx_eq(&expected, 1e-5), "point {}: {:?}", i, p);
        }
        assert_eq!(*path.points.last().unwrap(), end);
    }

    #[test]
    fn test_golden_output_is_reproducible() {
        let start = Point3::new(0.0, 10.0, 0.0);
        let end = Point3::new(0.0, -1.0, 0.0);
        let a = builder().build(start, end, &mut FixedRandom(0.5));
        let b = builder().build(start, end, &mut FixedRandom(0.5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_same_bolt() {
        let start = Point3::new(-2.0, 10.0, 1.0);
        let end = Point3::new(3.0, -1.0, -0.5);
        let a = builder().build(start, end, &mut Rng::new(0xB017));
        let b = builder().build(start, end, &mut Rng::new(0xB017));
        assert_eq!(a, b);
    }

    #[test]
    fn test_always_ends_at_end() {
        let mut rng = Rng::new(1234);
        for _ in 0..50 {
            let start = Point3::new(rng.range_f32(-4.0, 4.0), 10.0, rng.range_f32(-4.0, 4.0));
            let end = Point3::new(rng.range_f32(-4.0, 4.0), -1.0, rng.range_f32(-4.0, 4.0));
            let points = builder().build(start, end, &mut rng).points;
            assert_eq!(*points.last().unwrap(), end);
        }
    }

    #[test]
    fn test_ceiling_bounds_recursion_when_always_branching() {
        // Draw 0.0 always wins the branch roll; with no distance convergence
        // and an unbounded branch budget only the ceiling can stop it.
        let config = BoltConfig {
            min_segment_length: 0.0,
            max_branch_depth: 100,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let path = builder.build(
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(5.0, -1.0, 2.0),
            &mut FixedRandom(0.0),
        );
        assert_eq!(path.depth, 10);
        // Every interior node has three children, each leaf emits one point,
        // every branch adds one re-emitted midpoint.
        let leaves = 3usize.pow(10);
        let interior = (leaves - 1) / 2;
        assert_eq!(path.points.len(), leaves + interior);
        assert_eq!(path.jumps.len(), interior);
    }

    #[test]
    fn test_ceiling_holds_for_random_draws() {
        let config = BoltConfig {
            min_segment_length: 0.0,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let mut rng = Rng::new(77);
        for _ in 0..5 {
            let path = builder.build(Point3::new(0.0, 10.0, 0.0), Point3::new(0.0, -1.0, 0.0), &mut rng);
            assert!(path.depth <= 10);
        }
    }

    #[test]
    fn test_branch_detour_returns_to_midpoint() {
        // Top level: centred offset, branch roll passes, full spread angle,
        // half reach (2.4, under the 3.0 minimum so the branch is one leaf).
        // Every lower level draws a centred offset and fails the roll.
        let config = BoltConfig {
            min_segment_length: 3.0,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let mut rng = SequenceRandom::new(vec![0.5, 0.0, 1.0, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let start = Point3::new(0.0, 8.0, 0.0);
        let end = Point3::new(0.0, 0.0, 0.0);
        let path = builder.build(start, end, &mut rng);

        let s = std::f32::consts::FRAC_1_SQRT_2 * 2.4;
        let expected = [
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(s, 4.0 - s, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        assert_eq!(path.points.len(), expected.len(), "{:?}", path.points);
        for (p, e) in path.points.iter().zip(expected) {
            assert!(p.approx_eq(&e, 1e-5), "{:?} != {:?}", p, e);
        }
        // Tip back to the midpoint is the only jump
        assert_eq!(path.jumps, vec![3]);
    }

    #[test]
    fn test_each_level_draws_roll_before_recursing() {
        // Alternating offset/roll draws only line up if every level takes its
        // roll before descending; otherwise a 0.9 lands on an offset.
        let config = BoltConfig {
            min_segment_length: 3.0,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let mut rng = SequenceRandom::new(vec![0.5, 0.9]);
        let path = builder.build(
            Point3::new(0.0, 8.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            &mut rng,
        );
        let expected = [6.0, 4.0, 2.0, 0.0].map(|y| Point3::new(0.0, y, 0.0));
        assert_eq!(path.points.len(), expected.len());
        for (p, e) in path.points.iter().zip(expected) {
            assert!(p.approx_eq(&e, 1e-6), "{:?} != {:?}", p, e);
        }
        assert!(path.jumps.is_empty());
    }

    #[test]
    fn test_unbranched_bolt_has_no_jumps() {
        let path = builder().build(
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            &mut FixedRandom(0.5),
        );
        assert!(path.jumps.is_empty());
    }

    #[test]
    fn test_no_branches_when_budget_is_zero() {
        let config = BoltConfig {
            max_branch_depth: 0,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let path = builder.build(
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            &mut FixedRandom(0.0),
        );
        // Pure bisection: consecutive points strictly descend
        for pair in path.points.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
    }

    #[test]
    fn test_displacement_stays_within_half_scale() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(0.0, 0.0, 0.3);
        let config = BoltConfig {
            displacement_scale: 0.2,
            max_branch_depth: 0,
            ..BoltConfig::default()
        };
        let builder = BoltPathBuilder::new(config);
        let mut rng = Rng::new(3);
        for _ in 0..100 {
            let points = builder.build(start, end, &mut rng).points;
            // 0.3 splits once; both halves are then under 0.2: [mid, end]
            assert_eq!(points.len(), 2);
            assert!(points[0].x.abs() <= 0.1 + 1e-6);
            assert!((points[0].z - 0.15).abs() < 1e-6);
        }
    }
}
