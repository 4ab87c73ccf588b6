//! OpenSCAD script generation.
//!
//! The CSG tree maps onto OpenSCAD statements one to one, so emission is a
//! single recursive walk. Numbers are printed with Rust's shortest `{}`
//! representation, which OpenSCAD parses exactly.

use std::fmt::Write;

use scanbox_ir::{CsgNode, Solid, Vec2};

/// Render a solid as a complete OpenSCAD script.
pub fn to_scad(solid: &Solid) -> String {
    let mut out = String::new();
    emit(&mut out, solid, 0);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn vector(v: [f64; 3]) -> String {
    format!("[{}, {}, {}]", v[0], v[1], v[2])
}

fn points(profile: &[Vec2]) -> String {
    let coords: Vec<String> = profile.iter().map(|p| format!("[{}, {}]", p.x, p.y)).collect();
    format!("[{}]", coords.join(", "))
}

fn emit(out: &mut String, solid: &Solid, depth: usize) {
    indent(out, depth);
    match solid.node() {
        CsgNode::Cube { size, center } => {
            if *center {
                writeln!(out, "cube({}, center = true);", vector([size.x, size.y, size.z]))
            } else {
                writeln!(out, "cube({});", vector([size.x, size.y, size.z]))
            }
            .unwrap();
        }
        CsgNode::Cylinder {
            radius_bottom,
            radius_top,
            height,
            segments,
            center,
        } => {
            let centered = if *center { ", center = true" } else { "" };
            if radius_bottom == radius_top {
                writeln!(
                    out,
                    "cylinder(h = {height}, r = {radius_bottom}, $fn = {segments}{centered});"
                )
            } else {
                writeln!(
                    out,
                    "cylinder(h = {height}, r1 = {radius_bottom}, r2 = {radius_top}, \
                     $fn = {segments}{centered});"
                )
            }
            .unwrap();
        }
        CsgNode::Extrude { profile, height } => {
            writeln!(
                out,
                "linear_extrude(height = {height}) polygon(points = {});",
                points(profile)
            )
            .unwrap();
        }
        CsgNode::Import { path } => {
            writeln!(out, "import({path:?});").unwrap();
        }
        CsgNode::Translate { child, offset } => {
            writeln!(out, "translate({})", vector([offset.x, offset.y, offset.z])).unwrap();
            emit(out, child, depth + 1);
        }
        CsgNode::Rotate { child, angles } => {
            writeln!(out, "rotate({})", vector([angles.x, angles.y, angles.z])).unwrap();
            emit(out, child, depth + 1);
        }
        CsgNode::Mirror { child, normal } => {
            writeln!(out, "mirror({})", vector([normal.x, normal.y, normal.z])).unwrap();
            emit(out, child, depth + 1);
        }
        CsgNode::Scale { child, factor } => {
            writeln!(out, "scale({})", vector([factor.x, factor.y, factor.z])).unwrap();
            emit(out, child, depth + 1);
        }
        CsgNode::Union { children } => block(out, "union()", children, depth),
        CsgNode::Intersection { children } => block(out, "intersection()", children, depth),
        CsgNode::Hull { children } => block(out, "hull()", children, depth),
        CsgNode::Difference { base, cavities } => {
            out.push_str("difference() {\n");
            emit(out, base, depth + 1);
            for cavity in cavities {
                emit(out, cavity, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
    }
}

fn block(out: &mut String, head: &str, children: &[Solid], depth: usize) {
    out.push_str(head);
    out.push_str(" {\n");
    for child in children {
        emit(out, child, depth + 1);
    }
    indent(out, depth);
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_and_cylinder_syntax() {
        assert_eq!(to_scad(&Solid::cube(10.0, 20.0, 2.0)), "cube([10, 20, 2]);\n");
        let scad = to_scad(&Solid::cylinder(2.5, 8.0, 30));
        assert_eq!(scad, "cylinder(h = 8, r = 2.5, $fn = 30);\n");
    }

    #[test]
    fn frustum_uses_two_radii() {
        let scad = to_scad(&Solid::frustum(3.5, 2.0, 1.5, 30));
        assert!(scad.contains("r1 = 3.5"));
        assert!(scad.contains("r2 = 2"));
    }

    #[test]
    fn transforms_prefix_their_child() {
        let scad = to_scad(&Solid::cube(1.0, 1.0, 1.0).translate(5.0, 0.0, -2.5));
        assert_eq!(scad, "translate([5, 0, -2.5])\n  cube([1, 1, 1]);\n");
    }

    #[test]
    fn difference_lists_base_then_cavities() {
        let base = Solid::cube(10.0, 10.0, 2.0);
        let bore = Solid::cylinder(1.0, 4.0, 30);
        let scad = to_scad(&(&(&base - &bore) - &bore.right(5.0)));
        let base_at = scad.find("cube").unwrap();
        let bore_at = scad.find("cylinder").unwrap();
        assert!(scad.starts_with("difference() {"));
        assert!(base_at < bore_at);
        assert_eq!(scad.matches("cylinder").count(), 2);
    }

    #[test]
    fn polygon_points_in_declaration_order() {
        let profile = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(12.5, 12.5),
            Vec2::new(0.0, 12.5),
        ];
        let scad = to_scad(&Solid::extrude(profile, 8.0));
        assert!(scad.contains("linear_extrude(height = 8)"));
        assert!(scad.contains("[[0, 0], [12.5, 12.5], [0, 12.5]]"));
    }

    #[test]
    fn import_paths_are_quoted() {
        let scad = to_scad(&Solid::import("glyphs.stl"));
        assert_eq!(scad, "import(\"glyphs.stl\");\n");
    }
}
