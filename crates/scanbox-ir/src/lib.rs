//! CSG tree for the scanbox enclosure generator.
//!
//! This crate defines the declarative solid-geometry tree that the part
//! builders in `scanbox` compose and the OpenSCAD exporter consumes. It is
//! purely declarative: no mesh data, just primitives, rigid transforms and
//! boolean combinations. Meshing is handled by the external kernel.
//!
//! A [`Solid`] is an immutable, reference-counted node: cloning is cheap and
//! a sub-expression (say, a screw bore) can be instanced at several offsets
//! without duplication. Trees are built strictly bottom-up, so sharing never
//! introduces a cycle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod aabb;

pub use aabb::Aabb;

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// 2D vector, used for extrusion profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node in the CSG tree: either a leaf primitive or a combining operation.
///
/// Composite variants hold their children inline as [`Solid`]s. Order matters
/// for [`CsgNode::Difference`]: the base is retained material, the cavities
/// are subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CsgNode {
    /// Axis-aligned box. Corner at the origin unless `center`.
    Cube {
        /// Size along each axis.
        size: Vec3,
        /// Center on the origin instead of corner-aligning.
        center: bool,
    },
    /// Cylinder (or frustum, when the radii differ) along the Z axis,
    /// base at z = 0 unless `center`.
    Cylinder {
        /// Radius at z = 0.
        radius_bottom: f64,
        /// Radius at z = height.
        radius_top: f64,
        /// Height of the cylinder.
        height: f64,
        /// Number of circular segments.
        segments: u32,
        /// Center on the origin along Z.
        center: bool,
    },
    /// Linear extrusion of a 2-D polygon along +Z, base at z = 0.
    Extrude {
        /// Polygon outline, counter-clockwise.
        profile: Vec<Vec2>,
        /// Extrusion height.
        height: f64,
    },
    /// Opaque external mesh, resolved by the renderer. Its extent is unknown
    /// to this crate.
    Import {
        /// Path to the mesh file, as the renderer will see it.
        path: String,
    },
    /// Translation by an offset vector.
    Translate {
        /// Child node.
        child: Solid,
        /// Translation offset.
        offset: Vec3,
    },
    /// Rotation by Euler angles in degrees (applied as X, then Y, then Z).
    Rotate {
        /// Child node.
        child: Solid,
        /// Rotation angles in degrees.
        angles: Vec3,
    },
    /// Reflection across the plane through the origin with the given normal.
    Mirror {
        /// Child node.
        child: Solid,
        /// Plane normal (need not be unit length).
        normal: Vec3,
    },
    /// Non-uniform scale.
    Scale {
        /// Child node.
        child: Solid,
        /// Scale factors per axis.
        factor: Vec3,
    },
    /// Boolean union of all children.
    Union {
        /// Operands; order is irrelevant.
        children: Vec<Solid>,
    },
    /// Boolean difference: `base` minus the union of `cavities`.
    Difference {
        /// Retained material.
        base: Solid,
        /// Subtracted material, conventionally oversized past the faces it
        /// pierces so the meshed result stays manifold.
        cavities: Vec<Solid>,
    },
    /// Boolean intersection of all children.
    Intersection {
        /// Operands; order is irrelevant.
        children: Vec<Solid>,
    },
    /// Convex hull enclosing all children.
    Hull {
        /// Shapes anchoring the hull.
        children: Vec<Solid>,
    },
}

/// An immutable, shareable CSG solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solid(Arc<CsgNode>);

impl From<CsgNode> for Solid {
    fn from(node: CsgNode) -> Self {
        Self(Arc::new(node))
    }
}

impl Solid {
    /// The node this solid wraps.
    pub fn node(&self) -> &CsgNode {
        &self.0
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Axis-aligned box with one corner at the origin.
    pub fn cube(x: f64, y: f64, z: f64) -> Self {
        assert!(x > 0.0 && y > 0.0 && z > 0.0, "cube dimensions must be positive");
        CsgNode::Cube {
            size: Vec3::new(x, y, z),
            center: false,
        }
        .into()
    }

    /// Axis-aligned box centered on the origin.
    pub fn cube_centered(x: f64, y: f64, z: f64) -> Self {
        assert!(x > 0.0 && y > 0.0 && z > 0.0, "cube dimensions must be positive");
        CsgNode::Cube {
            size: Vec3::new(x, y, z),
            center: true,
        }
        .into()
    }

    /// Cylinder along Z with its base at z = 0.
    pub fn cylinder(radius: f64, height: f64, segments: u32) -> Self {
        Self::frustum(radius, radius, height, segments)
    }

    /// Cylinder along Z centered on the origin.
    pub fn cylinder_centered(radius: f64, height: f64, segments: u32) -> Self {
        assert!(radius > 0.0 && height > 0.0, "cylinder dimensions must be positive");
        CsgNode::Cylinder {
            radius_bottom: radius,
            radius_top: radius,
            height,
            segments,
            center: true,
        }
        .into()
    }

    /// Tapered cylinder along Z, base at z = 0. A 45° taper
    /// (`|r_bottom - r_top| == height`) is self-supporting when printed.
    pub fn frustum(radius_bottom: f64, radius_top: f64, height: f64, segments: u32) -> Self {
        assert!(
            radius_bottom > 0.0 && radius_top > 0.0 && height > 0.0,
            "frustum dimensions must be positive"
        );
        CsgNode::Cylinder {
            radius_bottom,
            radius_top,
            height,
            segments,
            center: false,
        }
        .into()
    }

    /// Linear extrusion of a polygon along +Z, base at z = 0.
    pub fn extrude(profile: Vec<Vec2>, height: f64) -> Self {
        assert!(profile.len() >= 3, "extrusion profile needs at least 3 points");
        assert!(height > 0.0, "extrusion height must be positive");
        CsgNode::Extrude { profile, height }.into()
    }

    /// Opaque external mesh leaf (see [`CsgNode::Import`]).
    pub fn import(path: impl Into<String>) -> Self {
        CsgNode::Import { path: path.into() }.into()
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Translate. An immediately enclosing translation is fused (offsets
    /// summed); a net-zero offset is the identity and adds no node.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        let (child, offset) = match self.node() {
            CsgNode::Translate { child, offset } => (
                child.clone(),
                Vec3::new(offset.x + x, offset.y + y, offset.z + z),
            ),
            _ => (self.clone(), Vec3::new(x, y, z)),
        };
        if offset.x == 0.0 && offset.y == 0.0 && offset.z == 0.0 {
            return child;
        }
        CsgNode::Translate { child, offset }.into()
    }

    /// Translate along +Z.
    pub fn up(&self, h: f64) -> Self {
        self.translate(0.0, 0.0, h)
    }

    /// Translate along -Z.
    pub fn down(&self, h: f64) -> Self {
        self.translate(0.0, 0.0, -h)
    }

    /// Translate along +X.
    pub fn right(&self, d: f64) -> Self {
        self.translate(d, 0.0, 0.0)
    }

    /// Translate along -X.
    pub fn left(&self, d: f64) -> Self {
        self.translate(-d, 0.0, 0.0)
    }

    /// Translate along +Y.
    pub fn forward(&self, d: f64) -> Self {
        self.translate(0.0, d, 0.0)
    }

    /// Translate along -Y.
    pub fn back(&self, d: f64) -> Self {
        self.translate(0.0, -d, 0.0)
    }

    /// Rotate by Euler angles in degrees, applied as X, then Y, then Z.
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        CsgNode::Rotate {
            child: self.clone(),
            angles: Vec3::new(x_deg, y_deg, z_deg),
        }
        .into()
    }

    /// Mirror across the plane through the origin with the given normal.
    /// An immediately enclosing mirror across the same plane cancels, so a
    /// double mirror is the identity.
    pub fn mirror(&self, nx: f64, ny: f64, nz: f64) -> Self {
        let normal = Vec3::new(nx, ny, nz);
        if let CsgNode::Mirror { child, normal: n } = self.node() {
            if *n == normal {
                return child.clone();
            }
        }
        CsgNode::Mirror {
            child: self.clone(),
            normal,
        }
        .into()
    }

    /// Non-uniform scale.
    pub fn scale(&self, x: f64, y: f64, z: f64) -> Self {
        CsgNode::Scale {
            child: self.clone(),
            factor: Vec3::new(x, y, z),
        }
        .into()
    }

    // =========================================================================
    // Booleans
    // =========================================================================

    /// Boolean union. Unions are associative, so an immediately enclosing
    /// union absorbs the new operand instead of nesting.
    pub fn union(&self, other: &Solid) -> Self {
        let mut children = match self.node() {
            CsgNode::Union { children } => children.clone(),
            _ => vec![self.clone()],
        };
        children.push(other.clone());
        CsgNode::Union { children }.into()
    }

    /// Boolean difference (self minus cavity). Subtracting from an existing
    /// difference appends to its cavity list: `(a - b) - c == a - b - c`.
    pub fn difference(&self, cavity: &Solid) -> Self {
        let (base, mut cavities) = match self.node() {
            CsgNode::Difference { base, cavities } => (base.clone(), cavities.clone()),
            _ => (self.clone(), Vec::new()),
        };
        cavities.push(cavity.clone());
        CsgNode::Difference { base, cavities }.into()
    }

    /// Boolean intersection.
    pub fn intersection(&self, other: &Solid) -> Self {
        let mut children = match self.node() {
            CsgNode::Intersection { children } => children.clone(),
            _ => vec![self.clone()],
        };
        children.push(other.clone());
        CsgNode::Intersection { children }.into()
    }

    /// Convex hull of all the given shapes. Used to bridge two separated
    /// bores with printable material instead of modeling the bridge.
    pub fn hull(parts: impl IntoIterator<Item = Solid>) -> Self {
        let children: Vec<Solid> = parts.into_iter().collect();
        assert!(children.len() >= 2, "hull needs at least 2 shapes");
        CsgNode::Hull { children }.into()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Visit every node reference in the tree, parents before children.
    /// A shared subtree is visited once per reference.
    pub fn for_each_node(&self, f: &mut impl FnMut(&CsgNode)) {
        f(self.node());
        match self.node() {
            CsgNode::Cube { .. }
            | CsgNode::Cylinder { .. }
            | CsgNode::Extrude { .. }
            | CsgNode::Import { .. } => {}
            CsgNode::Translate { child, .. }
            | CsgNode::Rotate { child, .. }
            | CsgNode::Mirror { child, .. }
            | CsgNode::Scale { child, .. } => child.for_each_node(f),
            CsgNode::Union { children }
            | CsgNode::Intersection { children }
            | CsgNode::Hull { children } => {
                for c in children {
                    c.for_each_node(f);
                }
            }
            CsgNode::Difference { base, cavities } => {
                base.for_each_node(f);
                for c in cavities {
                    c.for_each_node(f);
                }
            }
        }
    }

    /// Number of node references in the tree.
    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.for_each_node(&mut |_| n += 1);
        n
    }
}

// =============================================================================
// Operator overloads for ergonomic CSG
// =============================================================================

/// Union: `&a + &b`
impl std::ops::Add for &Solid {
    type Output = Solid;
    fn add(self, rhs: &Solid) -> Solid {
        self.union(rhs)
    }
}

/// Union: `a + b`
impl std::ops::Add for Solid {
    type Output = Solid;
    fn add(self, rhs: Solid) -> Solid {
        self.union(&rhs)
    }
}

/// Difference: `&a - &b`
impl std::ops::Sub for &Solid {
    type Output = Solid;
    fn sub(self, rhs: &Solid) -> Solid {
        self.difference(rhs)
    }
}

/// Difference: `a - b`
impl std::ops::Sub for Solid {
    type Output = Solid;
    fn sub(self, rhs: Solid) -> Solid {
        self.difference(&rhs)
    }
}

/// Intersection: `&a & &b`
impl std::ops::BitAnd for &Solid {
    type Output = Solid;
    fn bitand(self, rhs: &Solid) -> Solid {
        self.intersection(rhs)
    }
}

/// Intersection: `a & b`
impl std::ops::BitAnd for Solid {
    type Output = Solid;
    fn bitand(self, rhs: Solid) -> Solid {
        self.intersection(&rhs)
    }
}

// =============================================================================
// Document envelope
// =============================================================================

/// A named root solid within a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRoot {
    /// Render name of this part (used for output filenames).
    pub name: String,
    /// The part's CSG tree.
    pub root: Solid,
}

/// A serializable collection of named part trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// The parts, in render order.
    pub roots: Vec<NamedRoot>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            roots: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named part.
    pub fn push(&mut self, name: impl Into<String>, root: Solid) {
        self.roots.push(NamedRoot {
            name: name.into(),
            root,
        });
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_keeps_operand_order() {
        let base = Solid::cube(10.0, 10.0, 10.0);
        let hole = Solid::cylinder(3.0, 12.0, 30);
        let result = &base - &hole;
        match result.node() {
            CsgNode::Difference { base: b, cavities } => {
                assert_eq!(*b, base);
                assert_eq!(cavities.len(), 1);
                assert_eq!(cavities[0], hole);
            }
            other => panic!("expected Difference, got {other:?}"),
        }
    }

    #[test]
    fn difference_appends_cavities() {
        let base = Solid::cube(10.0, 10.0, 10.0);
        let a = Solid::cylinder(1.0, 12.0, 30);
        let b = Solid::cylinder(2.0, 12.0, 30);
        let result = &(&base - &a) - &b;
        match result.node() {
            CsgNode::Difference { cavities, .. } => assert_eq!(cavities.len(), 2),
            other => panic!("expected Difference, got {other:?}"),
        }
    }

    #[test]
    fn union_flattens() {
        let a = Solid::cube(1.0, 1.0, 1.0);
        let b = Solid::cube(2.0, 2.0, 2.0);
        let c = Solid::cube(3.0, 3.0, 3.0);
        let result = &(&a + &b) + &c;
        match result.node() {
            CsgNode::Union { children } => assert_eq!(children.len(), 3),
            other => panic!("expected Union, got {other:?}"),
        }
    }

    #[test]
    fn double_mirror_is_identity() {
        let part = Solid::cube(4.0, 5.0, 6.0).translate(1.0, 2.0, 3.0);
        let twice = part.mirror(0.0, 1.0, 0.0).mirror(0.0, 1.0, 0.0);
        assert_eq!(twice, part);
        // different planes do not cancel
        let other = part.mirror(0.0, 1.0, 0.0).mirror(1.0, 0.0, 0.0);
        assert_ne!(other, part);
    }

    #[test]
    fn translate_round_trip_is_identity() {
        let part = Solid::cylinder(2.0, 10.0, 30);
        let back = part.translate(3.0, -4.0, 5.0).translate(-3.0, 4.0, -5.0);
        assert_eq!(back, part);
    }

    #[test]
    fn adjacent_translations_fuse() {
        let part = Solid::cube(1.0, 1.0, 1.0).up(5.0).right(3.0);
        match part.node() {
            CsgNode::Translate { offset, .. } => {
                assert_eq!(*offset, Vec3::new(3.0, 0.0, 5.0));
            }
            other => panic!("expected Translate, got {other:?}"),
        }
        assert_eq!(part.node_count(), 2);
    }

    #[test]
    fn shared_subtree_compares_equal() {
        let bore = Solid::cylinder(1.6, 10.0, 30);
        let plate = Solid::cube(30.0, 50.0, 2.0);
        let a = &(&plate - &bore.right(5.0)) - &bore.right(25.0);
        let b = &(&plate - &bore.right(5.0)) - &bore.right(25.0);
        assert_eq!(a, b);
    }

    #[test]
    fn serde_tagged_enum() {
        let part = Solid::cube(1.0, 2.0, 3.0);
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains(r#""type":"Cube""#));
        let restored: Solid = serde_json::from_str(&json).unwrap();
        assert_eq!(part, restored);
    }

    #[test]
    fn document_round_trip() {
        let boss = Solid::cylinder(5.5, 10.0, 30) - Solid::cylinder(2.0, 10.2, 30).down(0.1);
        let mut doc = Document::new();
        doc.push("boss", boss);
        doc.push("plate", Solid::cube(10.0, 10.0, 2.0));
        let json = doc.to_json().expect("serialize");
        let restored = Document::from_json(&json).expect("deserialize");
        assert_eq!(doc, restored);
        assert_eq!(restored.roots.len(), 2);
        assert_eq!(restored.roots[0].name, "boss");
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn zero_radius_rejected() {
        let _ = Solid::cylinder(0.0, 10.0, 30);
    }

    #[test]
    fn hull_keeps_children() {
        let cyl = Solid::cylinder(2.0, 4.0, 30);
        let slot = Solid::hull([cyl.clone(), cyl.right(2.0)]);
        match slot.node() {
            CsgNode::Hull { children } => assert_eq!(children.len(), 2),
            other => panic!("expected Hull, got {other:?}"),
        }
    }

    #[test]
    fn node_count_counts_references() {
        let bore = Solid::cylinder(1.0, 5.0, 30);
        // one bore shared at two offsets: 1 union + 2 translates + 2 references
        let pair = bore.right(3.0) + bore.right(9.0);
        assert_eq!(pair.node_count(), 5);
    }
}
