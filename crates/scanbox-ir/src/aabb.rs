//! Conservative axis-aligned bounding boxes for [`Solid`] trees.
//!
//! Bounds are computed without meshing: transforms map the eight corners of
//! the child's box, a difference keeps its base's box, union and hull merge
//! their children's boxes. The result encloses the true volume but is not
//! tight under rotation.

use crate::{CsgNode, Solid, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

const EPS: f64 = 1e-9;

impl Aabb {
    /// Box spanning the two corners (components need not be ordered).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Degenerate box at a single point.
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing both.
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Whether `other` lies entirely within this box (with a small float
    /// tolerance).
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x + EPS
            && self.min.y <= other.min.y + EPS
            && self.min.z <= other.min.z + EPS
            && self.max.x + EPS >= other.max.x
            && self.max.y + EPS >= other.max.y
            && self.max.z + EPS >= other.max.z
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        let corners = self.corners();
        let mut out = Aabb::point(f(corners[0]));
        for p in &corners[1..] {
            out = out.merge(&Aabb::point(f(*p)));
        }
        out
    }
}

/// Rotate `v` by Euler angles in degrees, X then Y then Z.
fn rotate_point(v: Vec3, angles: Vec3) -> Vec3 {
    let (sx, cx) = angles.x.to_radians().sin_cos();
    let (sy, cy) = angles.y.to_radians().sin_cos();
    let (sz, cz) = angles.z.to_radians().sin_cos();
    // X
    let v = Vec3::new(v.x, cx * v.y - sx * v.z, sx * v.y + cx * v.z);
    // Y
    let v = Vec3::new(cy * v.x + sy * v.z, v.y, -sy * v.x + cy * v.z);
    // Z
    Vec3::new(cz * v.x - sz * v.y, sz * v.x + cz * v.y, v.z)
}

/// Reflect `v` across the plane through the origin with normal `n`.
fn mirror_point(v: Vec3, n: Vec3) -> Vec3 {
    let len2 = n.x * n.x + n.y * n.y + n.z * n.z;
    if len2 == 0.0 {
        return v;
    }
    let d = 2.0 * (v.x * n.x + v.y * n.y + v.z * n.z) / len2;
    Vec3::new(v.x - d * n.x, v.y - d * n.y, v.z - d * n.z)
}

impl Solid {
    /// Conservative axis-aligned bounding box of this solid.
    ///
    /// An [`CsgNode::Import`] leaf has unknown extent and contributes a
    /// single point at the origin, as does a boolean node with no children
    /// (expressible only through a hand-edited document).
    pub fn bounding_box(&self) -> Aabb {
        match self.node() {
            CsgNode::Cube { size, center } => {
                if *center {
                    Aabb::new(
                        Vec3::new(-size.x / 2.0, -size.y / 2.0, -size.z / 2.0),
                        Vec3::new(size.x / 2.0, size.y / 2.0, size.z / 2.0),
                    )
                } else {
                    Aabb::new(Vec3::zero(), *size)
                }
            }
            CsgNode::Cylinder {
                radius_bottom,
                radius_top,
                height,
                center,
                ..
            } => {
                let r = radius_bottom.max(*radius_top);
                let (z0, z1) = if *center {
                    (-height / 2.0, height / 2.0)
                } else {
                    (0.0, *height)
                };
                Aabb::new(Vec3::new(-r, -r, z0), Vec3::new(r, r, z1))
            }
            CsgNode::Extrude { profile, height } => {
                let mut points = profile
                    .iter()
                    .map(|p| Aabb::point(Vec3::new(p.x, p.y, 0.0)));
                let mut out = points.next().unwrap_or_else(origin);
                for b in points {
                    out = out.merge(&b);
                }
                out.merge(&Aabb::point(Vec3::new(out.min.x, out.min.y, *height)))
            }
            CsgNode::Import { .. } => Aabb::point(Vec3::zero()),
            CsgNode::Translate { child, offset } => child.bounding_box().map(|p| {
                Vec3::new(p.x + offset.x, p.y + offset.y, p.z + offset.z)
            }),
            CsgNode::Rotate { child, angles } => {
                child.bounding_box().map(|p| rotate_point(p, *angles))
            }
            CsgNode::Mirror { child, normal } => {
                child.bounding_box().map(|p| mirror_point(p, *normal))
            }
            CsgNode::Scale { child, factor } => child.bounding_box().map(|p| {
                Vec3::new(p.x * factor.x, p.y * factor.y, p.z * factor.z)
            }),
            CsgNode::Union { children } | CsgNode::Hull { children } => {
                merge_all(children)
            }
            // a difference can only remove material
            CsgNode::Difference { base, .. } => base.bounding_box(),
            // an intersection is contained in each operand; the first box is
            // a valid conservative bound
            CsgNode::Intersection { children } => children
                .first()
                .map(Solid::bounding_box)
                .unwrap_or_else(origin),
        }
    }
}

// The constructors never build an empty boolean or profile, but a
// deserialized document can carry one; bound it at the origin instead
// of indexing into it.
fn origin() -> Aabb {
    Aabb::point(Vec3::zero())
}

fn merge_all(children: &[Solid]) -> Aabb {
    let mut boxes = children.iter().map(Solid::bounding_box);
    let mut out = boxes.next().unwrap_or_else(origin);
    for b in boxes {
        out = out.merge(&b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cube_bounds() {
        let b = Solid::cube(10.0, 20.0, 30.0).bounding_box();
        assert_eq!(b.min, Vec3::zero());
        assert_eq!(b.max, Vec3::new(10.0, 20.0, 30.0));

        let c = Solid::cube_centered(10.0, 20.0, 30.0).bounding_box();
        assert_eq!(c.min, Vec3::new(-5.0, -10.0, -15.0));
    }

    #[test]
    fn frustum_uses_larger_radius() {
        let b = Solid::frustum(5.0, 2.0, 3.0, 30).bounding_box();
        assert!(close(b.min.x, -5.0) && close(b.max.x, 5.0));
        assert!(close(b.min.z, 0.0) && close(b.max.z, 3.0));
    }

    #[test]
    fn translate_shifts_bounds() {
        let b = Solid::cube(2.0, 2.0, 2.0).translate(1.0, -1.0, 10.0).bounding_box();
        assert_eq!(b.min, Vec3::new(1.0, -1.0, 10.0));
        assert_eq!(b.max, Vec3::new(3.0, 1.0, 12.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        // cylinder along Z rotated about X by 90° now runs along -Y
        let b = Solid::cylinder(2.0, 10.0, 30).rotate(90.0, 0.0, 0.0).bounding_box();
        assert!(close(b.min.y, -10.0) && close(b.max.y, 0.0));
        assert!(close(b.min.z, -2.0) && close(b.max.z, 2.0));
    }

    #[test]
    fn mirror_reflects_bounds() {
        let b = Solid::cube(4.0, 4.0, 4.0).translate(1.0, 0.0, 0.0);
        let m = b.mirror(1.0, 0.0, 0.0).bounding_box();
        assert!(close(m.min.x, -5.0) && close(m.max.x, -1.0));
    }

    #[test]
    fn difference_is_contained_in_base() {
        let base = Solid::cube(10.0, 10.0, 10.0);
        let cavity = Solid::cylinder(3.0, 30.0, 30).translate(5.0, 5.0, -10.0);
        let diff = &base - &cavity;
        assert!(base.bounding_box().contains(&diff.bounding_box()));
    }

    #[test]
    fn hull_contains_union() {
        let a = Solid::cylinder(2.0, 5.0, 30);
        let b = a.right(8.0);
        let hull = Solid::hull([a.clone(), b.clone()]);
        let union = &a + &b;
        assert!(hull.bounding_box().contains(&union.bounding_box()));
        assert!(hull.bounding_box().contains(&a.bounding_box()));
        assert!(hull.bounding_box().contains(&b.bounding_box()));
    }

    #[test]
    fn empty_booleans_from_a_document_do_not_panic() {
        for kind in ["Union", "Intersection", "Hull"] {
            let json = format!(r#"{{"type":"{kind}","children":[]}}"#);
            let solid: Solid = serde_json::from_str(&json).unwrap();
            assert_eq!(solid.bounding_box(), Aabb::point(Vec3::zero()));
        }
        let flat: Solid =
            serde_json::from_str(r#"{"type":"Extrude","profile":[],"height":3.0}"#).unwrap();
        let b = flat.bounding_box();
        assert_eq!(b.min, Vec3::zero());
        assert_eq!(b.max, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn extrude_bounds_follow_profile() {
        use crate::Vec2;
        let tri = vec![Vec2::new(0.0, 0.0), Vec2::new(6.0, 6.0), Vec2::new(0.0, 6.0)];
        let b = Solid::extrude(tri, 4.0).bounding_box();
        assert_eq!(b.min, Vec3::zero());
        assert_eq!(b.max, Vec3::new(6.0, 6.0, 4.0));
    }
}
