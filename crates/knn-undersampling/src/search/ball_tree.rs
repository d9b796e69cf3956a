//! Exact k-NN search using a tree of balls.

use core::cmp::Reverse;

use crate::{
    core::{
        metric::{Euclidean, Metric},
        Dataset, Instance, SizedHeap,
    },
    Error,
};

use super::{skipped, unprepared, NeighborSearch, Points, SelfMatch};

/// The number of instances used to pick the center of a large ball.
const MAX_CENTER_SAMPLE: usize = 100;

/// Slack on the pruning bound so that rounding in the triangle inequality
/// never drops a neighbor that a linear scan would keep.
const BOUND_SLACK: f64 = 1e-9;

/// A node of the tree. Its instances are `order[offset..offset + cardinality]`.
#[derive(Debug)]
struct Ball {
    /// The index of the center instance.
    center: usize,
    /// The distance from the center to the farthest instance in the ball.
    radius: f64,
    /// Where the instances of this ball start in `order`.
    offset: usize,
    /// The number of instances in the ball.
    cardinality: usize,
    /// Positions of the two children in the arena, if any.
    children: Option<[usize; 2]>,
}

/// The prepared state of a `BallTree`.
struct Tree {
    /// The encoded dataset.
    points: Points,
    /// All balls. The root is at position 0.
    balls: Vec<Ball>,
    /// Instance indices, permuted so that every ball owns a contiguous range.
    order: Vec<usize>,
}

/// Exact k-NN search using a tree of balls.
///
/// Each ball is split in two around a pair of poles far apart from each
/// other until it holds at most `leaf_size` instances or all of its
/// instances coincide. Queries visit balls closest-first and stop as soon as
/// no unvisited ball can hold a closer instance than the current `k`-th hit.
///
/// The result is identical to [`LinearSearch`](super::LinearSearch) as long
/// as the metric obeys the triangle inequality.
pub struct BallTree<M: Metric = Euclidean> {
    /// The metric used to compare instances.
    metric: M,
    /// The largest number of instances a leaf may hold.
    leaf_size: usize,
    /// The tree, once prepared.
    tree: Option<Tree>,
}

impl Default for BallTree<Euclidean> {
    fn default() -> Self {
        Self::new(Euclidean)
    }
}

impl<M: Metric> BallTree<M> {
    /// Creates an unprepared tree using the given metric and leaves of up to
    /// 8 instances.
    pub const fn new(metric: M) -> Self {
        Self {
            metric,
            leaf_size: 8,
            tree: None,
        }
    }

    /// Sets the largest number of instances a leaf may hold. Values below 1
    /// are treated as 1.
    #[must_use]
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size.max(1);
        self
    }

    /// The number of balls in the prepared tree, or 0 if not prepared.
    pub fn num_balls(&self) -> usize {
        self.tree.as_ref().map_or(0, |t| t.balls.len())
    }

    /// Picks the instance that minimizes the sum of distances to a sample of
    /// the given instances.
    fn center_of(&self, points: &Points, indices: &[usize]) -> usize {
        let step = indices.len().div_ceil(MAX_CENTER_SAMPLE).max(1);
        let sample = indices.iter().copied().step_by(step).collect::<Vec<_>>();
        sample
            .iter()
            .map(|&i| {
                let total = sample
                    .iter()
                    .map(|&j| points.distance_between(&self.metric, i, j))
                    .sum::<f64>();
                (total, i)
            })
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Greater))
            .map_or(indices[0], |(_, i)| i)
    }

    /// Returns the instance farthest from `from` and its distance. Ties go to
    /// the instance seen first.
    fn farthest(&self, points: &Points, from: usize, indices: &[usize]) -> (usize, f64) {
        indices
            .iter()
            .map(|&i| (i, points.distance_between(&self.metric, from, i)))
            .fold((from, 0.0), |best, (i, d)| if d > best.1 { (i, d) } else { best })
    }

    /// Builds the ball over `indices`, which start at `offset` in `order`,
    /// and all of its descendants. Returns the ball's position in `balls`.
    fn build(&self, points: &Points, balls: &mut Vec<Ball>, indices: &mut [usize], offset: usize) -> usize {
        let center = self.center_of(points, indices);
        let (left_pole, radius) = self.farthest(points, center, indices);

        let id = balls.len();
        balls.push(Ball {
            center,
            radius,
            offset,
            cardinality: indices.len(),
            children: None,
        });

        if indices.len() <= self.leaf_size || radius <= 0.0 {
            return id;
        }

        let (right_pole, _) = self.farthest(points, left_pole, indices);
        let (left, right): (Vec<_>, Vec<_>) = indices.iter().copied().partition(|&i| {
            points.distance_between(&self.metric, i, left_pole) <= points.distance_between(&self.metric, i, right_pole)
        });
        let split = left.len();
        indices[..split].copy_from_slice(&left);
        indices[split..].copy_from_slice(&right);

        let (l_indices, r_indices) = indices.split_at_mut(split);
        let l = self.build(points, balls, l_indices, offset);
        let r = self.build(points, balls, r_indices, offset + split);
        balls[id].children = Some([l, r]);

        id
    }

    /// Best-first search for the `k` nearest points to `query`.
    fn search(&self, tree: &Tree, query: &[f64], k: usize, skip: Option<usize>) -> Vec<(usize, f64)> {
        let mut candidates = SizedHeap::<(Reverse<f64>, usize)>::new(None);
        let mut hits = SizedHeap::<(f64, usize)>::new(Some(k));

        let root = &tree.balls[0];
        let d = tree.points.distance_to(&self.metric, query, root.center);
        candidates.push((Reverse(d_min(root, d)), 0));

        while let Some(&(Reverse(bound), id)) = candidates.peek() {
            if hits.is_full() && hits.peek().is_some_and(|&(d, _)| d < bound - BOUND_SLACK) {
                break;
            }
            candidates.pop();

            let ball = &tree.balls[id];
            if let Some(children) = ball.children {
                for c in children {
                    let child = &tree.balls[c];
                    let d = tree.points.distance_to(&self.metric, query, child.center);
                    candidates.push((Reverse(d_min(child, d)), c));
                }
            } else {
                tree.order[ball.offset..ball.offset + ball.cardinality]
                    .iter()
                    .filter(|&&i| Some(i) != skip)
                    .for_each(|&i| hits.push((tree.points.distance_to(&self.metric, query, i), i)));
            }
        }

        hits.into_sorted_vec().into_iter().map(|(d, i)| (i, d)).collect()
    }
}

/// The smallest distance from the query that any instance in `ball` could
/// have, given the distance `d` from the query to the ball's center.
fn d_min(ball: &Ball, d: f64) -> f64 {
    (d - ball.radius).max(0.0)
}

impl<M: Metric> NeighborSearch for BallTree<M> {
    fn name(&self) -> &str {
        "BallTree"
    }

    fn check(&self) -> Result<(), Error> {
        if self.metric.obeys_triangle_inequality() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "{} requires a metric that obeys the triangle inequality, but `{}` does not",
                self.name(),
                self.metric.name()
            )))
        }
    }

    fn prepare(&mut self, data: &Dataset) -> Result<(), Error> {
        self.check()?;

        let points = Points::new(data)?;
        let mut order = (0..points.len()).collect::<Vec<_>>();
        let mut balls = Vec::new();
        self.build(&points, &mut balls, &mut order, 0);
        ftlog::debug!(
            "Built a {} with {} balls over {} instances of `{}`",
            self.name(),
            balls.len(),
            points.len(),
            data.name()
        );

        self.tree = Some(Tree { points, balls, order });
        Ok(())
    }

    fn query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error> {
        let tree = self.tree.as_ref().ok_or_else(|| unprepared(self.name()))?;
        let query = tree.points.encode(query)?;
        Ok(self.search(tree, &query, k, None))
    }

    fn query_indexed(&self, index: usize, k: usize, self_match: SelfMatch) -> Result<Vec<(usize, f64)>, Error> {
        let tree = self.tree.as_ref().ok_or_else(|| unprepared(self.name()))?;
        let query = tree.points.point(index)?;
        Ok(self.search(tree, query, k, skipped(index, self_match)))
    }
}
