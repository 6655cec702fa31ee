//! Pure 3-D geometry primitives and VSEPR-style placement operators.
//!
//! Every function here is stateless and free of aliasing concerns: a `Point` is copied on every
//! call and a fresh `Point` is always returned. This module has no notion of atoms, envelopes, or
//! flags — it is the bottom of the dependency stack and is used by every other module that needs
//! to place or measure something in 3-D space.

/// A point (or free vector) in three dimensions.
///
/// Coordinates are `f32`, matching the precision of the rest of the pipeline; there is no need
/// for `f64` since no operation here accumulates error over more than a handful of terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    /// A point with all three coordinates set to `scalar`.
    pub fn splat(scalar: f32) -> Self {
        Point {
            x: scalar,
            y: scalar,
            z: scalar,
        }
    }

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Point { x, y, z }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, scalar: f32) -> Point {
        Point::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    pub fn div(self, scalar: f32) -> Point {
        Point::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }

    /// Midpoint of `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    /// Returns a vector of the same direction as `self` scaled to length `length`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cage_forge::core::geometry::Point;
    ///
    /// let v = Point::new(3.0, 4.0, 0.0).normalize_to(10.0);
    /// assert!((v.x - 6.0).abs() < 1e-4);
    /// assert!((v.y - 8.0).abs() < 1e-4);
    /// ```
    pub fn normalize_to(self, length: f32) -> Point {
        let magnitude = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let scale = length / magnitude;
        self.scale(scale)
    }
}

/// Euclidean distance between two points.
pub fn dist(a: Point, b: Point) -> f32 {
    let d = a.sub(b);
    (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
}

/// Manhattan (L1) distance between two points.
pub fn dist_manhattan(a: Point, b: Point) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Free vector pointing from `a` to `b`.
pub fn vector(a: Point, b: Point) -> Point {
    b.sub(a)
}

/// Angle at vertex `a` of the triangle `a, b, c`, in degrees (law of cosines).
pub fn angle(a: Point, b: Point, c: Point) -> f32 {
    let ab = dist(a, b);
    let ac = dist(a, c);
    let bc = dist(b, c);
    ((ac * ac + ab * ab - bc * bc) / (2.0 * ac * ab)).acos().to_degrees()
}

/// Unit normal of the plane through `a`, `b`, `c` (cross product of `b-a` and `c-a`).
pub fn plane_normal(a: Point, b: Point, c: Point) -> Point {
    let ab = b.sub(a);
    let ac = c.sub(a);
    let normal = Point::new(
        ab.y * ac.z - ab.z * ac.y,
        ab.z * ac.x - ab.x * ac.z,
        ab.x * ac.y - ab.y * ac.x,
    );
    normal.normalize_to(1.0)
}

/// Rotates point `p` by `degrees` around the axis `axis` (Rodrigues' rotation formula).
///
/// `axis` need not be normalized; it is normalized internally.
pub fn rotate(axis: Point, degrees: f32, p: Point) -> Point {
    let radians = degrees.to_radians();
    let axis = axis.normalize_to(1.0);
    let (sin, cos) = radians.sin_cos();

    let x = (axis.x * axis.x + (1.0 - axis.x * axis.x) * cos) * p.x
        + (axis.x * axis.y * (1.0 - cos) - axis.z * sin) * p.y
        + (axis.x * axis.z * (1.0 - cos) + axis.y * sin) * p.z;
    let y = (axis.y * axis.y + (1.0 - axis.y * axis.y) * cos) * p.y
        + (axis.x * axis.y * (1.0 - cos) + axis.z * sin) * p.x
        + (axis.y * axis.z * (1.0 - cos) - axis.x * sin) * p.z;
    let z = (axis.z * axis.z + (1.0 - axis.z * axis.z) * cos) * p.z
        + (axis.x * axis.z * (1.0 - cos) - axis.y * sin) * p.x
        + (axis.y * axis.z * (1.0 - cos) + axis.x * sin) * p.y;

    Point::new(x, y, z)
}

/// Reflects `a` away from the midpoint of `b` and `c`, at distance `length` from `a`.
///
/// Used to close a two-neighbor ring atom onto a third, outward-pointing neighbor.
pub fn add_third_point(a: Point, b: Point, c: Point, length: f32) -> Point {
    let normal = Point::new(2.0 * a.x - b.x - c.x, 2.0 * a.y - b.y - c.y, 2.0 * a.z - b.z - c.z)
        .normalize_to(length);
    a.add(normal)
}

/// Tetrahedral/trigonal half-angle used by `ax2e2`: 180° − 109.47°/2.
const AX2E2_ANGLE: f32 = 180.0 - 109.47 / 2.0;

/// Envelope-candidate bond length from a substrate atom (hydrogen-bond docking distance).
pub const DIST_HYDRO: f32 = 1.8;
/// Generic single-bond placement length used by path synthesis.
pub const DIST_SIMPLE: f32 = 1.5;
/// Distance from a placed heavy atom to its synthesized hydrogen-bond partner: `(DIST_SIMPLE +
/// MINDIS) / 2`.
pub const DIST_ATOM_H: f32 = (DIST_SIMPLE + MINDIS) / 2.0;
/// Minimum clearance between non-SHELL cage atoms: `DIST_SIMPLE/2 + MINDIS/2 − 0.0001`.
pub const DIST_GAP_CAGE: f32 = DIST_SIMPLE / 2.0 + MINDIS / 2.0 - 0.0001;
/// Minimum clearance between a cage atom and any substrate atom.
pub const DIST_GAP_SUBSTRATE: f32 = 1.8;
/// Atoms closer than this are fused during merging.
pub const MINDIS: f32 = 0.75;
/// Maximum distance between two aromatic-ring envelope neighbors.
pub const MAXDIS_CYCLE: f32 = 1.7;
/// Minimum distance used to detect atoms that should be merged into a freshly closed ring atom.
pub const MINDIS_CYCLE: f32 = 0.7;
/// Bond length used when closing an aromatic ring.
pub const SIMPLE_CYCLE: f32 = 1.4;
/// Tolerance applied to termination/bond-length checks.
pub const DIST_ERROR: f32 = 0.5;
/// Bond length used between path-synthesis pattern atoms.
pub const DIST_SIMPLE_PATTERN: f32 = 1.22;
/// Bond length used when closing an aromatic-ring pattern during path synthesis.
pub const DIST_CYCLE_PATTERN: f32 = 5.8;
/// Number of atoms that make up one aromatic-ring pattern insertion.
pub const NB_ATOMS_IN_CYCLE: usize = 7;

/// AX₁E₁: linear extension of `a` away from its single neighbor `x1`.
pub fn ax1e1(a: Point, x1: Point, length: f32) -> Point {
    a.add(vector(x1, a).normalize_to(length))
}

/// AX₂E₁: bisector of `a`'s two neighbors, on the opposite side.
pub fn ax2e1(a: Point, x1: Point, x2: Point, length: f32) -> Point {
    let v1 = vector(x1, a).normalize_to(1.0);
    let v2 = vector(x2, a).normalize_to(1.0);
    a.add(v1.add(v2).normalize_to(length))
}

/// AX₁E₂: 120° in-plane rotation of `(x1 - a)` about `normal`.
pub fn ax1e2(a: Point, x1: Point, normal: Point, length: f32) -> Point {
    let v1 = vector(a, x1).normalize_to(1.0);
    a.add(rotate(normal, 120.0, v1).normalize_to(length))
}

/// AX₃E₁: the unique fourth arm of a tetrahedron given three placed arms.
pub fn ax3e1(a: Point, x1: Point, x2: Point, x3: Point, length: f32) -> Point {
    let v1 = vector(x1, a).normalize_to(1.0);
    let v2 = vector(x2, a).normalize_to(1.0);
    let v3 = vector(x3, a).normalize_to(1.0);
    a.add(v1.add(v2.add(v3)).normalize_to(length))
}

/// AX₂E₂: tetrahedral out-of-plane arm given two placed arms.
///
/// Computes the bisector of `x1`/`x2`, then a secondary normal perpendicular to both the
/// `a,x1,x2` plane and the bisector, and rotates the bisector by the tetrahedral half-angle
/// around that secondary normal.
pub fn ax2e2(a: Point, x1: Point, x2: Point, length: f32) -> Point {
    let v1 = vector(a, x1).normalize_to(1.0);
    let v2 = vector(a, x2).normalize_to(1.0);
    let bisector = v1.add(v2).normalize_to(1.0);
    let zero = Point::default();
    let secondary = plane_normal(zero, plane_normal(a, x1, x2), bisector).normalize_to(1.0);
    a.add(rotate(secondary, AX2E2_ANGLE, bisector).normalize_to(length))
}

/// AX₁E₃: 109.47° rotation of `(x1 - a)` about `normal`.
pub fn ax1e3(a: Point, x1: Point, normal: Point, length: f32) -> Point {
    let v1 = vector(a, x1).normalize_to(1.0);
    a.add(rotate(normal, 109.47, v1).normalize_to(length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ax1e1_round_trip_reproduces_x1() {
        let a = Point::new(0.0, 0.0, 0.0);
        let length = 1.5;
        let x1 = Point::new(1.0, 2.0, -3.0).normalize_to(length);
        let placed = ax1e1(a, x1, length);
        let back = ax1e1(a, placed, length);
        assert!(dist(back, x1) < 1e-4);
    }

    #[test]
    fn rotation_identity_full_turn() {
        let axis = Point::new(0.0, 0.0, 1.0);
        let p = Point::new(1.0, 2.0, 3.0);
        let rotated = rotate(axis, 360.0, p);
        assert!(dist(rotated, p) < 1e-4);
    }

    #[test]
    fn angle_of_right_triangle_is_ninety_degrees() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        assert!((angle(a, b, c) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn plane_normal_of_xy_plane_is_z_axis() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        let n = plane_normal(a, b, c);
        assert!((n.z.abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn add_third_point_respects_requested_length() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 1.0, 0.0);
        let c = Point::new(-1.0, 1.0, 0.0);
        let p = add_third_point(a, b, c, 1.4);
        assert!((dist(a, p) - 1.4).abs() < 1e-4);
    }

    #[test]
    fn ax2e1_bisects_away_from_neighbors() {
        let a = Point::new(0.0, 0.0, 0.0);
        let x1 = Point::new(1.0, 1.0, 0.0);
        let x2 = Point::new(1.0, -1.0, 0.0);
        let p = ax2e1(a, x1, x2, 1.0);
        assert!(p.x < 0.0);
        assert!((dist(a, p) - 1.0).abs() < 1e-4);
    }
}
