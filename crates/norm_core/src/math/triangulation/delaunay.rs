//! Bowyer-Watson Delaunay triangulation of scattered 2D points.

use crate::types::InterpolationError;
use std::collections::{HashMap, HashSet};

/// Barycentric tolerance for point location; points on a hull edge count as inside.
const LOCATE_TOL: f64 = 1e-10;
/// Half-width of the enclosing triangle in normalised coordinates.
const SUPER_EXTENT: f64 = 1e4;
/// Twice-area threshold below which a triangle is discarded as a sliver.
const MIN_DOUBLE_AREA: f64 = 1e-14;

/// Delaunay triangulation over a set of distinct, non-collinear points.
///
/// Points are translated and uniformly scaled into the unit box before
/// triangulating; uniform scaling preserves the Delaunay property and keeps
/// the in-circle tests well conditioned. All geometry exposed by this type
/// (vertex coordinates, barycentric coordinates) is in that local frame.
///
/// # Example
///
/// ```
/// use norm_core::math::triangulation::Triangulation;
///
/// let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let tri = Triangulation::new(&points).unwrap();
/// assert_eq!(tri.triangles().len(), 2);
/// assert!(tri.locate(0.25, 0.5).is_some());
/// assert!(tri.locate(2.0, 0.5).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Vertices in the local frame
    points: Vec<[f64; 2]>,
    /// Counter-clockwise vertex triples
    triangles: Vec<[usize; 3]>,
    offset: [f64; 2],
    scale: f64,
}

impl Triangulation {
    /// Minimum number of points for a triangulation.
    pub const MIN_POINTS: usize = 3;

    /// Triangulate `points`.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 3 points
    /// * `Err(InterpolationError::InvalidInput)` - Non-finite coordinate
    /// * `Err(InterpolationError::Degenerate)` - Duplicate points, all points collinear,
    ///   or no triangle survives
    pub fn new(points: &[[f64; 2]]) -> Result<Self, InterpolationError> {
        if points.len() < Self::MIN_POINTS {
            return Err(InterpolationError::InsufficientData {
                got: points.len(),
                need: Self::MIN_POINTS,
            });
        }
        if let Some(i) = points
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(InterpolationError::InvalidInput(format!(
                "non-finite coordinate at index {}",
                i
            )));
        }

        let (offset, scale) = bounding_frame(points);
        if scale <= 0.0 {
            return Err(InterpolationError::degenerate("all points coincide"));
        }
        let local: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [(p[0] - offset[0]) / scale, (p[1] - offset[1]) / scale])
            .collect();

        if let Some((a, b)) = find_duplicate(&local) {
            return Err(InterpolationError::degenerate(format!(
                "duplicate points at indices {} and {}",
                a, b
            )));
        }
        if all_collinear(&local) {
            return Err(InterpolationError::degenerate("all points are collinear"));
        }

        let triangles = bowyer_watson(&local);
        if triangles.is_empty() {
            return Err(InterpolationError::degenerate("triangulation is empty"));
        }

        Ok(Self {
            points: local,
            triangles,
            offset,
            scale,
        })
    }

    /// Vertices in the local frame, in input order.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Counter-clockwise triangles as indices into [`points`](Self::points).
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Map a query from input coordinates to the local frame.
    pub fn to_local(&self, x: f64, y: f64) -> [f64; 2] {
        [(x - self.offset[0]) / self.scale, (y - self.offset[1]) / self.scale]
    }

    /// Find the triangle containing `(x, y)` (input coordinates).
    ///
    /// Returns the triangle index and the barycentric coordinates of the
    /// query with respect to its three vertices, or `None` outside the hull.
    pub fn locate(&self, x: f64, y: f64) -> Option<(usize, [f64; 3])> {
        let q = self.to_local(x, y);
        self.triangles.iter().enumerate().find_map(|(t, tri)| {
            let lambda = barycentric(
                self.points[tri[0]],
                self.points[tri[1]],
                self.points[tri[2]],
                q,
            )?;
            (lambda.iter().all(|&l| l >= -LOCATE_TOL)).then_some((t, lambda))
        })
    }

    /// Sorted neighbour lists: vertices sharing an edge with each vertex.
    pub fn vertex_neighbours(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.points.len()];
        for tri in &self.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        adjacency
    }
}

/// Barycentric coordinates of `q` in triangle `(a, b, c)`; `None` if degenerate.
pub(crate) fn barycentric(a: [f64; 2], b: [f64; 2], c: [f64; 2], q: [f64; 2]) -> Option<[f64; 3]> {
    let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
    if det.abs() < MIN_DOUBLE_AREA {
        return None;
    }
    let l0 = ((b[1] - c[1]) * (q[0] - c[0]) + (c[0] - b[0]) * (q[1] - c[1])) / det;
    let l1 = ((c[1] - a[1]) * (q[0] - c[0]) + (a[0] - c[0]) * (q[1] - c[1])) / det;
    Some([l0, l1, 1.0 - l0 - l1])
}

/// Signed twice-area of `(a, b, c)`; positive when counter-clockwise.
#[inline]
pub(crate) fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn bounding_frame(points: &[[f64; 2]]) -> ([f64; 2], f64) {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in points {
        for k in 0..2 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    (min, (max[0] - min[0]).max(max[1] - min[1]))
}

fn find_duplicate(points: &[[f64; 2]]) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .partial_cmp(&points[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
        .windows(2)
        .find(|w| points[w[0]] == points[w[1]])
        .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
}

fn all_collinear(points: &[[f64; 2]]) -> bool {
    let p0 = points[0];
    let far = points
        .iter()
        .copied()
        .max_by(|a, b| {
            let da = (a[0] - p0[0]).hypot(a[1] - p0[1]);
            let db = (b[0] - p0[0]).hypot(b[1] - p0[1]);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(p0);
    points
        .iter()
        .all(|&p| orient(p0, far, p).abs() <= MIN_DOUBLE_AREA)
}

struct Cell {
    v: [usize; 3],
    centre: [f64; 2],
    radius2: f64,
}

impl Cell {
    fn new(v: [usize; 3], pts: &[[f64; 2]]) -> Self {
        let (a, b, c) = (pts[v[0]], pts[v[1]], pts[v[2]]);
        let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
        if d.abs() < f64::EPSILON {
            // Flat cell: make it swallow every later point so it gets rebuilt
            return Self {
                v,
                centre: a,
                radius2: f64::INFINITY,
            };
        }
        let (a2, b2, c2) = (
            a[0] * a[0] + a[1] * a[1],
            b[0] * b[0] + b[1] * b[1],
            c[0] * c[0] + c[1] * c[1],
        );
        let ux = (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d;
        let uy = (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d;
        let radius2 = (a[0] - ux).powi(2) + (a[1] - uy).powi(2);
        Self {
            v,
            centre: [ux, uy],
            radius2,
        }
    }

    fn contains_in_circle(&self, p: [f64; 2]) -> bool {
        let d2 = (p[0] - self.centre[0]).powi(2) + (p[1] - self.centre[1]).powi(2);
        d2 < self.radius2 * (1.0 - 1e-12)
    }
}

fn bowyer_watson(local: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = local.len();
    let mut pts = local.to_vec();
    // Enclosing triangle around the unit box
    pts.push([-SUPER_EXTENT, -SUPER_EXTENT]);
    pts.push([SUPER_EXTENT, -SUPER_EXTENT]);
    pts.push([0.5, SUPER_EXTENT]);

    let mut cells = vec![Cell::new([n, n + 1, n + 2], &pts)];

    for p in 0..n {
        let q = pts[p];
        let (bad, good): (Vec<Cell>, Vec<Cell>) =
            cells.into_iter().partition(|c| c.contains_in_circle(q));
        cells = good;

        // Cavity boundary: directed edges of bad cells whose twin is not also bad
        let mut edges: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        for cell in &bad {
            for k in 0..3 {
                let (a, b) = (cell.v[k], cell.v[(k + 1) % 3]);
                let key = (a.min(b), a.max(b));
                if edges.remove(&key).is_none() {
                    edges.insert(key, (a, b));
                }
            }
        }

        for (a, b) in edges.into_values() {
            let v = if orient(pts[a], pts[b], q) > 0.0 {
                [a, b, p]
            } else {
                [b, a, p]
            };
            cells.push(Cell::new(v, &pts));
        }
    }

    let mut triangles: Vec<[usize; 3]> = cells
        .into_iter()
        .map(|c| c.v)
        .filter(|v| v.iter().all(|&i| i < n))
        .filter(|v| orient(local[v[0]], local[v[1]], local[v[2]]) > MIN_DOUBLE_AREA)
        .collect();
    fill_hull_pockets(local, &mut triangles);
    triangles.sort_unstable();
    triangles
}

/// Close the pockets left between the triangulated region and the convex hull.
///
/// Near-degenerate hull triangles can lose out to the enclosing vertices and
/// be dropped with them. Each reflex vertex of the outer boundary is clipped
/// with the triangle spanning its two boundary neighbours, provided no other
/// point lies in that triangle, until the boundary is convex.
fn fill_hull_pockets(pts: &[[f64; 2]], triangles: &mut Vec<[usize; 3]>) {
    while let Some(ear) = find_pocket_ear(pts, triangles) {
        triangles.push(ear);
    }
}

fn find_pocket_ear(pts: &[[f64; 2]], triangles: &[[usize; 3]]) -> Option<[usize; 3]> {
    let mut directed = HashSet::new();
    for tri in triangles {
        for k in 0..3 {
            directed.insert((tri[k], tri[(k + 1) % 3]));
        }
    }

    // Counter-clockwise boundary edges; a vertex left by two edges is pinched
    let mut successor: HashMap<usize, Option<usize>> = HashMap::new();
    for &(a, b) in &directed {
        if !directed.contains(&(b, a)) {
            successor
                .entry(a)
                .and_modify(|next| *next = None)
                .or_insert(Some(b));
        }
    }

    let mut edges: Vec<(usize, usize)> = successor
        .iter()
        .filter_map(|(&u, &v)| v.map(|v| (u, v)))
        .collect();
    edges.sort_unstable();

    edges.into_iter().find_map(|(u, v)| {
        let w = successor.get(&v).copied().flatten()?;
        if w == u || orient(pts[u], pts[w], pts[v]) <= MIN_DOUBLE_AREA {
            return None;
        }
        let blocked = pts.iter().enumerate().any(|(i, &p)| {
            i != u
                && i != v
                && i != w
                && barycentric(pts[u], pts[w], pts[v], p)
                    .map_or(false, |l| l.iter().all(|&x| x >= -LOCATE_TOL))
        });
        (!blocked).then_some([u, w, v])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(nx: usize, ny: usize) -> Vec<[f64; 2]> {
        let mut pts = Vec::new();
        for i in 0..nx {
            for j in 0..ny {
                pts.push([i as f64, 40.0 + 10.0 * j as f64]);
            }
        }
        pts
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_single_triangle() {
        let tri = Triangulation::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(tri.triangles().len(), 1);
    }

    #[test]
    fn test_too_few_points() {
        let result = Triangulation::new(&[[0.0, 0.0], [1.0, 1.0]]);
        assert!(matches!(
            result,
            Err(InterpolationError::InsufficientData { got: 2, need: 3 })
        ));
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let result = Triangulation::new(&[[1.0, 40.0], [2.0, 50.0], [3.0, 60.0], [4.0, 70.0]]);
        assert!(matches!(result, Err(InterpolationError::Degenerate(_))));
    }

    #[test]
    fn test_duplicate_points_are_degenerate() {
        let result = Triangulation::new(&[[1.0, 40.0], [2.0, 50.0], [1.0, 40.0], [4.0, 90.0]]);
        match result {
            Err(InterpolationError::Degenerate(msg)) => assert!(msg.contains("0 and 2")),
            other => panic!("Expected Degenerate error, got {:?}", other),
        }
    }

    #[test]
    fn test_grid_triangle_count_and_area() {
        // Regular 3 x 4 grid: 2 * (2 * 3) triangles covering the rectangle
        let pts = grid(3, 4);
        let tri = Triangulation::new(&pts).unwrap();
        assert_eq!(tri.triangles().len(), 12);

        let area: f64 = tri
            .triangles()
            .iter()
            .map(|t| 0.5 * orient(tri.points()[t[0]], tri.points()[t[1]], tri.points()[t[2]]))
            .sum();
        let local_area = (2.0 / 30.0) * (30.0 / 30.0);
        assert_relative_eq!(area, local_area, epsilon = 1e-12);
    }

    #[test]
    fn test_triangles_are_counter_clockwise() {
        let pts = [[0.0, 0.0], [3.0, 1.0], [1.0, 4.0], [5.0, 5.0], [2.0, 2.0]];
        let tri = Triangulation::new(&pts).unwrap();
        for t in tri.triangles() {
            assert!(orient(tri.points()[t[0]], tri.points()[t[1]], tri.points()[t[2]]) > 0.0);
        }
    }

    #[test]
    fn test_empty_circumcircle_property() {
        let pts = [
            [0.1, 0.2],
            [0.9, 0.1],
            [0.5, 0.9],
            [0.3, 0.5],
            [0.7, 0.6],
            [0.2, 0.8],
            [0.95, 0.95],
        ];
        let tri = Triangulation::new(&pts).unwrap();
        let local = tri.points();
        for t in tri.triangles() {
            let cell = Cell::new(*t, local);
            for (i, p) in local.iter().enumerate() {
                if !t.contains(&i) {
                    assert!(!cell.contains_in_circle(*p), "point {} inside {:?}", i, t);
                }
            }
        }
    }

    // ========================================
    // Location Tests
    // ========================================

    #[test]
    fn test_locate_inside_on_edge_and_outside() {
        let tri = Triangulation::new(&grid(3, 3)).unwrap();
        assert!(tri.locate(0.5, 45.0).is_some());
        // Hull edge at strike 60
        assert!(tri.locate(1.5, 60.0).is_some());
        assert!(tri.locate(2.5, 50.0).is_none());
        assert!(tri.locate(1.0, 70.0).is_none());
    }

    #[test]
    fn test_locate_barycentric_sums_to_one() {
        let tri = Triangulation::new(&[[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]).unwrap();
        let (_, l) = tri.locate(1.0, 1.0).unwrap();
        assert_relative_eq!(l[0] + l[1] + l[2], 1.0, epsilon = 1e-12);
        assert!(l.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_hull_pocket_is_filled() {
        // Fan around the centre with the bottom triangle missing
        let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.5, 0.5]];
        let mut triangles = vec![[1, 2, 4], [2, 3, 4], [3, 0, 4]];
        fill_hull_pockets(&pts, &mut triangles);

        assert_eq!(triangles.len(), 4);
        assert!(triangles.contains(&[0, 1, 4]));
        let area: f64 = triangles
            .iter()
            .map(|t| 0.5 * orient(pts[t[0]], pts[t[1]], pts[t[2]]))
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_convex_boundary_is_left_alone() {
        let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let mut triangles = vec![[0, 1, 2], [0, 2, 3]];
        fill_hull_pockets(&pts, &mut triangles);
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn test_pocket_with_point_inside_is_not_clipped() {
        // Point 5 sits in the pocket and is not part of any triangle
        let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.5, 0.5], [0.5, 0.1]];
        let mut triangles = vec![[1, 2, 4], [2, 3, 4], [3, 0, 4]];
        fill_hull_pockets(&pts, &mut triangles);
        assert_eq!(triangles.len(), 3);
    }

    #[test]
    fn test_near_collinear_bottom_row_is_covered() {
        // Tenors within a few days of one year along the bottom row
        let mut pts: Vec<[f64; 2]> = (0..13)
            .map(|j| {
                let amplitude = if j % 2 == 0 { 0.004 } else { -0.003 };
                let jitter = amplitude * j as f64 / 12.0;
                [1.0 + jitter, 40.0 + 10.0 * j as f64]
            })
            .collect();
        pts.extend((0..13).map(|j| [5.0, 40.0 + 10.0 * j as f64]));
        let tri = Triangulation::new(&pts).unwrap();

        let area: f64 = tri
            .triangles()
            .iter()
            .map(|t| 0.5 * orient(tri.points()[t[0]], tri.points()[t[1]], tri.points()[t[2]]))
            .sum();
        let hull = convex_hull_area(tri.points());
        assert_relative_eq!(area, hull, epsilon = 1e-12);
    }

    fn convex_hull_area(points: &[[f64; 2]]) -> f64 {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let chain = |pts: &mut dyn Iterator<Item = [f64; 2]>| {
            let mut h: Vec<[f64; 2]> = Vec::new();
            for p in pts {
                while h.len() >= 2 && orient(h[h.len() - 2], h[h.len() - 1], p) <= 0.0 {
                    h.pop();
                }
                h.push(p);
            }
            h.pop();
            h
        };
        let mut hull = chain(&mut sorted.iter().copied());
        hull.extend(chain(&mut sorted.iter().rev().copied()));
        (0..hull.len())
            .map(|i| {
                let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
                0.5 * (a[0] * b[1] - b[0] * a[1])
            })
            .sum()
    }

    #[test]
    fn test_vertex_neighbours() {
        let tri = Triangulation::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let nb = tri.vertex_neighbours();
        assert_eq!(nb[0], vec![1, 2]);
        assert_eq!(nb[1], vec![0, 2]);
    }
}
