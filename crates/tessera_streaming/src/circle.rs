//! # Circle Pattern
//!
//! The precomputed disk of chunk offsets loaded around a viewer.
//!
//! Computed once at activation from the view distance via a midpoint
//! circle walk (outline) plus an interior fill, then deduplicated and
//! sorted ascending by Euclidean distance from the origin - so load
//! queues naturally stream nearest chunks first. Immutable afterward.

/// A deduplicated, distance-ordered disk of integer offsets from (0,0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CirclePattern {
    /// Offsets, ascending by distance from the origin.
    points: Vec<(i32, i32)>,
}

impl CirclePattern {
    /// Computes the pattern for a view radius.
    ///
    /// Radius < 1 yields an empty pattern; radius 1 yields exactly
    /// `[(0, 0)]`.
    #[must_use]
    pub fn compute(radius: u32) -> Self {
        Self {
            points: circle_points(radius),
        }
    }

    /// The offsets, nearest first.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    /// Number of chunks a single viewer keeps loaded.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for radius 0 patterns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Midpoint-circle fill: outline walk plus interior rows.
fn circle_points(radius: u32) -> Vec<(i32, i32)> {
    let mut result: Vec<(i32, i32)> = Vec::new();

    if radius < 1 {
        return result;
    }
    if radius == 1 {
        result.push((0, 0));
        return result;
    }

    let radius = (radius - 1) as i32;

    let mut xk = 0i32;
    let mut yk = radius;
    let mut pk = 3 - 2 * radius;

    loop {
        for i in -xk..=xk {
            result.push((i, -yk));
            result.push((i, yk));
        }
        for i in -xk..=xk {
            result.push((-yk, i));
            result.push((yk, i));
        }

        xk += 1;
        if pk < 0 {
            pk += (xk << 2) + 6;
        } else {
            yk -= 1;
            pk += ((xk - yk) << 2) + 10;
        }

        if xk > yk {
            break;
        }
    }

    // Interior block between the octant arms.
    for i in -yk..=yk {
        for j in (-xk + 1)..=(xk - 1) {
            result.push((j, i));
        }
    }

    dedupe_in_place(&mut result);

    // Stable sort: equal distances keep discovery order.
    result.sort_by_key(|(x, y)| i64::from(*x) * i64::from(*x) + i64::from(*y) * i64::from(*y));

    result
}

/// Removes duplicate offsets, keeping the first occurrence.
fn dedupe_in_place(points: &mut Vec<(i32, i32)>) {
    let mut seen = std::collections::HashSet::with_capacity(points.len());
    points.retain(|point| seen.insert(*point));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squared_distance(point: (i32, i32)) -> i64 {
        i64::from(point.0) * i64::from(point.0) + i64::from(point.1) * i64::from(point.1)
    }

    #[test]
    fn test_radius_zero_is_empty() {
        assert!(CirclePattern::compute(0).is_empty());
    }

    #[test]
    fn test_radius_one_is_single_origin_point() {
        let pattern = CirclePattern::compute(1);
        assert_eq!(pattern.points(), &[(0, 0)]);
    }

    #[test]
    fn test_no_duplicates_any_radius() {
        for radius in 0..=12u32 {
            let pattern = CirclePattern::compute(radius);
            let unique: std::collections::HashSet<_> = pattern.points().iter().collect();
            assert_eq!(
                unique.len(),
                pattern.len(),
                "duplicates at radius {radius}"
            );
        }
    }

    #[test]
    fn test_sorted_by_nondecreasing_distance() {
        for radius in 1..=12u32 {
            let pattern = CirclePattern::compute(radius);
            for pair in pattern.points().windows(2) {
                assert!(
                    squared_distance(pair[0]) <= squared_distance(pair[1]),
                    "distance order violated at radius {radius}: {pair:?}"
                );
            }
        }
    }

    #[test]
    fn test_origin_is_always_first() {
        for radius in 1..=8u32 {
            let pattern = CirclePattern::compute(radius);
            assert_eq!(pattern.points()[0], (0, 0), "radius {radius}");
        }
    }

    #[test]
    fn test_pattern_is_symmetric() {
        // The disk is mirror-symmetric in both axes.
        for radius in 2..=8u32 {
            let points: std::collections::HashSet<_> =
                CirclePattern::compute(radius).points().iter().copied().collect();
            for (x, y) in &points {
                assert!(points.contains(&(-x, *y)), "missing (-{x}, {y})");
                assert!(points.contains(&(*x, -y)), "missing ({x}, -{y})");
                assert!(points.contains(&(*y, *x)), "missing ({y}, {x})");
            }
        }
    }

    #[test]
    fn test_radius_two_is_the_unit_plus() {
        let points: std::collections::HashSet<_> =
            CirclePattern::compute(2).points().iter().copied().collect();
        let expected: std::collections::HashSet<_> =
            [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)].into_iter().collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_all_points_within_radius() {
        for radius in 2..=10u32 {
            let limit = i64::from(radius) * i64::from(radius);
            for point in CirclePattern::compute(radius).points() {
                assert!(
                    squared_distance(*point) <= limit,
                    "point {point:?} outside radius {radius}"
                );
            }
        }
    }
}
