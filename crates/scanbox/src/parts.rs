//! Reusable parametric parts.
//!
//! Each builder is a pure function of the configuration and its physical
//! parameters, returning one self-contained [`Solid`]. Local origin
//! conventions are documented per builder. Geometric validity (no
//! self-intersection, manifold cavities) is a construction responsibility
//! here, not something the CSG layer checks.

use crate::datasheet::{POLYGON_LENGTH, POLYGON_SLOT_ANGLE, POLYGON_WIDTH};
use crate::EnclosureConfig;
use scanbox_ir::{Solid, Vec2};

/// Countersunk screw clearance boss.
///
/// The screw stands on its head (a flipped T) with the head face centered on
/// the origin and the shaft pointing up. The bore is the head cylinder, a
/// 45° cone down to the shaft so the transition prints without support, and
/// the shaft, subtracted from an outer cylinder one wall thicker than the
/// head. Total height is `length`.
pub fn screw(cfg: &EnclosureConfig, head_r: f64, head_h: f64, shaft_r: f64, length: f64) -> Solid {
    let outer = Solid::cylinder(head_r + cfg.wall_thick, length, cfg.segments);
    &outer - &screw_bore(cfg, head_r, head_h, shaft_r, length)
}

/// The clearance bore of [`screw`] alone, extended past both faces.
///
/// Assemblies subtract this through whatever plate a boss sits on, so the
/// bore stays open after the boss is unioned in (the interior-hole clearance
/// convention: cavities are oversized so the meshed result is manifold).
pub fn screw_bore(
    cfg: &EnclosureConfig,
    head_r: f64,
    head_h: f64,
    shaft_r: f64,
    length: f64,
) -> Solid {
    assert!(head_r > shaft_r, "screw head must be wider than its shaft");
    let cone_h = head_r - shaft_r;
    assert!(
        length > head_h + cone_h,
        "screw too short for its head and 45-degree cone"
    );
    let shaft_h = length - head_h - cone_h;
    let c = cfg.bore_overcut;
    let seg = cfg.segments;
    let head = Solid::cylinder(head_r, head_h + c, seg).down(c);
    let cone = Solid::frustum(head_r, shaft_r, cone_h, seg).up(head_h);
    let shaft = Solid::cylinder(shaft_r, shaft_h + c, seg).up(head_h + cone_h);
    head + cone + shaft
}

/// Horizontally printable screw boss.
///
/// The screw axis lies in the print-layer plane (along -Y after the final
/// rotation), so a plain cylinder would need support. Instead the enclosure
/// is built from frustums widening toward the vertical extremes and clipped
/// by gravity-oriented field volumes to the material band below the shaft
/// and behind the head, then the head/shaft bore is subtracted. This is the
/// one boss whose outer surface is not a plain `wall_thick` offset; the
/// taper run is what makes it printable.
pub fn hscrew(cfg: &EnclosureConfig, head_r: f64, head_h: f64, shaft_r: f64, length: f64) -> Solid {
    assert!(head_r > shaft_r, "screw head must be wider than its shaft");
    assert!(length > head_h, "screw length must exceed its head");
    let t = cfg.wall_thick;
    let seg = cfg.segments;

    // enclosure around the head: a wall-thick disc plus a taper for any head
    // deeper than one wall
    let head_sleeve = if head_h > t {
        let lip = head_h - t;
        Solid::cylinder(head_r + t, t, seg)
            + Solid::frustum(head_r + lip + t, head_r + t, lip, seg).up(t)
    } else {
        Solid::cylinder(head_r + t, head_h, seg)
    };
    // enclosure around the shaft: taper all the way out when the shaft is
    // long, otherwise a head-to-shaft cone
    let shaft_sleeve = if length - head_h > head_h {
        let run = length - t;
        Solid::frustum(shaft_r + run + t, shaft_r + t, run, seg).up(head_h)
    } else {
        Solid::frustum(head_r + t, shaft_r + t, length - head_h, seg).up(head_h)
    };
    let body = (head_sleeve + shaft_sleeve).rotate(90.0, 0.0, 0.0);

    // clip each taper to the gravity side of its bore
    let shaft_field = Solid::cube(
        2.0 * (shaft_r + t),
        length - head_h,
        length + 2.0 * shaft_r + t,
    )
    .translate(-(shaft_r + t), -length, -(length + shaft_r));
    let shaft_part = &body & &shaft_field;
    let head_part = if head_h > t {
        let head_field = Solid::cube(2.0 * (head_r + t), head_h, length + 2.0 * head_r + t)
            .translate(-(head_r + t), -head_h, -(length + head_r));
        &body & &head_field
    } else {
        Solid::cylinder(head_r + t, head_h, seg).rotate(90.0, 0.0, 0.0)
    };

    &(head_part + shaft_part) - &hscrew_bore(cfg, head_r, head_h, shaft_r, length)
}

/// The clearance bore of [`hscrew`] alone, axis along -Y, extended past both
/// faces. Subtract it again through any wall the boss backs onto.
pub fn hscrew_bore(
    cfg: &EnclosureConfig,
    head_r: f64,
    head_h: f64,
    shaft_r: f64,
    length: f64,
) -> Solid {
    let c = cfg.bore_overcut;
    let seg = cfg.segments;
    (Solid::cylinder(head_r, head_h + c, seg).down(c)
        + Solid::cylinder(shaft_r, length - head_h + 2.0 * c, seg).up(head_h - c))
    .rotate(90.0, 0.0, 0.0)
}

/// Heat-press threaded-insert pocket with a printable triangular gusset.
///
/// The insert (and later the screw) presses in from the top; the bore axis
/// passes through the origin and the body hangs below z = 0, reaching one
/// `screw_fix_offset` toward the shell wall it backs onto. Wall margins per
/// the insert manufacturer's sheet, which also supplies `hole_d` and
/// `length`. `flip_x` turns the part 180° for the opposite corner.
pub fn threaded_insert(cfg: &EnclosureConfig, flip_x: bool, hole_d: f64, length: f64) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let x_extent = hole_d + 2.0 * t;
    let y_extent = hole_d / 2.0 + t + cfg.screw_fix_offset;
    let block = Solid::cube(x_extent, y_extent, length);
    // right-triangle gusset resisting pull-out force
    let profile = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(y_extent, y_extent),
        Vec2::new(0.0, y_extent),
    ];
    let gusset = Solid::extrude(profile, x_extent)
        .rotate(90.0, 0.0, -90.0)
        .translate(x_extent, y_extent, 0.0);
    let body = gusset + block.up(y_extent);
    let bore = Solid::cylinder(hole_d / 2.0, length + y_extent + 2.0 * c, cfg.segments).down(c);
    let body = &body - &bore.translate(hole_d / 2.0 + t, hole_d / 2.0 + t, 0.0);
    // press-in face at z = 0, bore axis through the origin
    let body = body
        .down(y_extent + length)
        .translate(-x_extent / 2.0, -cfg.screw_fix_offset + t + hole_d / 2.0, 0.0);
    if flip_x {
        body.rotate(0.0, 0.0, 180.0)
    } else {
        body
    }
}

/// Cable-tie fastener: two thin walls straddling the tie-wrap gap.
///
/// Corner at the origin. `along_x` runs the gap along the X axis, otherwise
/// along Y. Gap widths beyond 10 mm do not bridge reliably on FDM.
pub fn cable_fastener(cfg: &EnclosureConfig, height: f64, width: f64, along_x: bool) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    if along_x {
        let body = Solid::cube(2.0 * t + width, t, height + t);
        let gap = Solid::cube(width, t + 2.0 * c, height + c).translate(t, -c, -c);
        &body - &gap
    } else {
        let body = Solid::cube(t, 2.0 * t + width, height + t);
        let gap = Solid::cube(t + 2.0 * c, width, height + c).translate(-c, t, -c);
        &body - &gap
    }
}

/// Vertically printable twin-bore slot: the hull of two cylinders offset
/// along +X. Bridging the bores with a hull is cheaper and more robust than
/// modeling the connecting material. Origin at the left bore's axis.
pub fn slot(radius: f64, height: f64, width: f64, segments: u32) -> Solid {
    let cyl = Solid::cylinder(radius, height, segments);
    Solid::hull([cyl.clone(), cyl.right(width)])
}

/// Countersunk twin-hole mounting slot: the hull of two screw bores
/// subtracted from the hull of two outer cylinders. Gives a screw `width`
/// millimeters of adjustment. Origin at the left bore's axis on the head
/// face.
pub fn screw_slot(
    cfg: &EnclosureConfig,
    head_r: f64,
    head_h: f64,
    shaft_r: f64,
    width: f64,
    height: f64,
) -> Solid {
    let bore = screw_bore(cfg, head_r, head_h, shaft_r, height);
    let inner = Solid::hull([bore.clone(), bore.right(width)]);
    let outer = slot(head_r + cfg.wall_thick, height, width, cfg.segments);
    &outer - &inner
}

/// Panel-mount cutout plate for a USB mini-B bulkhead cable.
///
/// Returns the plate stood upright in the YZ plane centered on the origin,
/// ready to union into a side wall.
pub fn panel_mount_mini(cfg: &EnclosureConfig) -> Solid {
    let t = cfg.wall_thick;
    let plate = Solid::cube_centered(40.0, 20.0, t);
    let screw_hole = Solid::cylinder_centered(1.75, 2.0 * t, cfg.segments);
    let window = Solid::cube_centered(17.5, 12.0, 2.0 * t);
    let plate = &plate - &(screw_hole.left(14.0) + screw_hole.right(14.0) + window);
    plate
        .rotate(0.0, 0.0, 90.0)
        .rotate(0.0, 90.0, 0.0)
        .right(0.5 * t)
}

/// Alignment shim for the laser module, used when the laser base alone does
/// not line the beam up. Quadrant 1 of the XY plane, one corner at the
/// origin, width along X.
pub fn laser_shim(cfg: &EnclosureConfig, height: f64) -> Solid {
    use crate::datasheet::{
        LASER_LENGTH, LASER_SCREW_EDGE, LASER_SCREW_XDISP, LASER_SCREW_YDISP, LASER_WIDTH,
    };
    let r_shaft = 2.5; // module screw plus clearance
    let c = cfg.bore_overcut;
    let base = Solid::cube(LASER_LENGTH, LASER_WIDTH, height);
    let hole = Solid::cylinder(r_shaft, height + 2.0 * c, cfg.segments).down(c);
    let pair = hole.clone() + hole.right(LASER_SCREW_XDISP);
    let mirrored = pair
        .back(LASER_SCREW_YDISP / 2.0)
        .mirror(0.0, 1.0, 0.0)
        .forward(LASER_SCREW_YDISP / 2.0);
    &base
        - &(pair + mirrored).translate(
            LASER_LENGTH - LASER_SCREW_XDISP - LASER_SCREW_EDGE,
            (LASER_WIDTH - LASER_SCREW_YDISP) / 2.0,
            0.0,
        )
}

/// Alignment shim for the polygon motor. Quadrant 1, corner at the origin,
/// length along Y; one half carries the slots, the axis bore and the lock
/// pocket, then the whole outline is completed by mirroring.
pub fn polygon_shim(cfg: &EnclosureConfig, height: f64) -> Solid {
    let r_shaft = 2.0;
    let slot_width = 2.0;
    let c = cfg.bore_overcut;
    let half = Solid::cube(POLYGON_WIDTH / 2.0, POLYGON_LENGTH, height);
    let s = slot(r_shaft, height + 2.0 * c, slot_width, cfg.segments).down(c);
    // rotation-axis bore and motor lock pocket
    let axis = Solid::cylinder(10.0, height + 2.0 * c, cfg.segments).down(c);
    let lock = Solid::cube(15.0, 10.0 + c, height + 2.0 * c);
    let half = &(&(&(&half - &s.translate(3.1, POLYGON_LENGTH - 4.0, 0.0))
        - &s
            .rotate(0.0, 0.0, POLYGON_SLOT_ANGLE)
            .translate(3.2, 4.0 + 1.29, 0.0))
        - &axis.translate(24.0, 24.0, 0.0))
        - &lock.translate(24.0 - 7.5, -c, -c);
    &half + &half.mirror(1.0, 0.0, 0.0).right(POLYGON_WIDTH)
}

/// Belt-mount plate with a 2 x 3 grid of strap bores, stood upright for the
/// pocket in the shell's +X wall.
pub fn box_mount(cfg: &EnclosureConfig) -> Solid {
    let c = cfg.bore_overcut;
    let plate = Solid::cube(30.0, 50.0, 2.0);
    let bore = Solid::cylinder(1.6, 10.0 + 2.0 * c, cfg.segments).down(c);
    let pair = bore.right(5.0) + bore.right(25.0);
    let mut base = plate;
    for y in [5.0, 25.0, 45.0] {
        base = &base - &pair.forward(y);
    }
    base.rotate(90.0, 0.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanbox_ir::CsgNode;

    fn cfg() -> EnclosureConfig {
        EnclosureConfig::default()
    }

    /// Outer radius of a boss built as `difference(outer cylinder, ...)`.
    fn boss_outer_radius(s: &Solid) -> f64 {
        match s.node() {
            CsgNode::Difference { base, .. } => match base.node() {
                CsgNode::Cylinder { radius_bottom, .. } => *radius_bottom,
                other => panic!("expected outer Cylinder, got {other:?}"),
            },
            other => panic!("expected Difference, got {other:?}"),
        }
    }

    #[test]
    fn screw_outer_dimensions() {
        let cfg = cfg();
        let boss = screw(&cfg, 3.0, 2.0, 2.0, 10.0);
        assert_eq!(boss_outer_radius(&boss), 3.0 + cfg.wall_thick);
        let bb = boss.bounding_box();
        assert!((bb.size().z - 10.0).abs() < 1e-9);
        assert!((bb.size().x - 2.0 * (3.0 + cfg.wall_thick)).abs() < 1e-9);
    }

    #[test]
    fn wall_thickness_propagates_to_every_boss() {
        let thin = EnclosureConfig {
            wall_thick: 1.2,
            ..EnclosureConfig::default()
        };
        let thick = EnclosureConfig {
            wall_thick: 2.6,
            ..EnclosureConfig::default()
        };
        let delta = thick.wall_thick - thin.wall_thick;
        for (head_r, head_h, shaft_r, length) in
            [(3.0, 2.0, 2.0, 10.0), (3.5, 5.0, 2.0, 9.2), (4.0, 1.0, 1.5, 12.0)]
        {
            let a = screw(&thin, head_r, head_h, shaft_r, length);
            let b = screw(&thick, head_r, head_h, shaft_r, length);
            assert!((boss_outer_radius(&b) - boss_outer_radius(&a) - delta).abs() < 1e-9);
        }
    }

    #[test]
    #[should_panic(expected = "wider than its shaft")]
    fn screw_rejects_head_narrower_than_shaft() {
        let _ = screw(&cfg(), 2.0, 2.0, 3.0, 10.0);
    }

    #[test]
    fn screw_bore_pierces_both_faces() {
        let cfg = cfg();
        let bore = screw_bore(&cfg, 3.0, 2.0, 2.0, 10.0);
        let bb = bore.bounding_box();
        assert!(bb.min.z < 0.0);
        assert!(bb.max.z > 10.0);
    }

    #[test]
    fn builders_are_idempotent() {
        let cfg = cfg();
        assert_eq!(
            screw(&cfg, 3.0, 2.0, 2.0, 10.0),
            screw(&cfg, 3.0, 2.0, 2.0, 10.0)
        );
        assert_eq!(
            threaded_insert(&cfg, true, 4.0, 5.8),
            threaded_insert(&cfg, true, 4.0, 5.8)
        );
        assert_eq!(
            hscrew(&cfg, 3.5, 4.0, 2.0, 7.0),
            hscrew(&cfg, 3.5, 4.0, 2.0, 7.0)
        );
    }

    #[test]
    fn hscrew_clips_both_tapers() {
        // deep head: both the head and shaft sleeves must be field-clipped
        let s = hscrew(&cfg(), 3.5, 4.0, 2.0, 10.0);
        match s.node() {
            CsgNode::Difference { base, cavities } => {
                assert_eq!(cavities.len(), 1);
                match base.node() {
                    CsgNode::Union { children } => {
                        assert_eq!(children.len(), 2);
                        for part in children {
                            assert!(
                                matches!(part.node(), CsgNode::Intersection { .. }),
                                "taper not clipped by its field volume"
                            );
                        }
                    }
                    other => panic!("expected Union of clipped tapers, got {other:?}"),
                }
            }
            other => panic!("expected Difference, got {other:?}"),
        }
    }

    #[test]
    fn slot_hull_contains_both_bores() {
        let cyl = Solid::cylinder(2.0, 6.0, 30);
        let s = slot(2.0, 6.0, 2.0, 30);
        let hull_bb = s.bounding_box();
        assert!(hull_bb.contains(&cyl.bounding_box()));
        assert!(hull_bb.contains(&cyl.right(2.0).bounding_box()));
        let union_bb = (cyl.clone() + cyl.right(2.0)).bounding_box();
        assert!(hull_bb.contains(&union_bb));
    }

    #[test]
    fn screw_slot_outer_follows_wall_thickness() {
        let cfg = cfg();
        let s = screw_slot(&cfg, 3.5, 5.0, 2.0, 2.0, 12.0);
        let bb = s.bounding_box();
        // outer hull spans the two outer cylinders: 2r + width wide in X
        assert!((bb.size().x - (2.0 * (3.5 + cfg.wall_thick) + 2.0)).abs() < 1e-9);
        assert!((bb.size().z - 12.0).abs() < 1e-9);
    }

    #[test]
    fn threaded_insert_hangs_below_its_press_face() {
        let ins = threaded_insert(&cfg(), false, 4.0, 5.8);
        let bb = ins.bounding_box();
        assert!(bb.max.z.abs() < 1e-9, "press-in face must sit at z = 0");
        assert!(bb.min.z < 0.0);
    }

    #[test]
    fn flipped_insert_is_rotated_not_mirrored() {
        let cfg = cfg();
        let a = threaded_insert(&cfg, false, 4.0, 5.8);
        let b = threaded_insert(&cfg, true, 4.0, 5.8);
        assert_ne!(a, b);
        match b.node() {
            CsgNode::Rotate { angles, .. } => assert_eq!(angles.z, 180.0),
            other => panic!("expected Rotate, got {other:?}"),
        }
    }

    #[test]
    fn cable_fastener_orientation() {
        let cfg = cfg();
        let t = cfg.wall_thick;
        let x = cable_fastener(&cfg, 10.0, 4.0, true);
        let y = cable_fastener(&cfg, 10.0, 4.0, false);
        assert!((x.bounding_box().size().x - (2.0 * t + 4.0)).abs() < 1e-9);
        assert!((y.bounding_box().size().y - (2.0 * t + 4.0)).abs() < 1e-9);
        assert!((x.bounding_box().size().z - (10.0 + t)).abs() < 1e-9);
    }

    #[test]
    fn polygon_shim_spans_the_motor_footprint() {
        let shim = polygon_shim(&cfg(), 1.0);
        let bb = shim.bounding_box();
        assert!((bb.size().x - POLYGON_WIDTH).abs() < 1e-9);
        assert!((bb.size().y - POLYGON_LENGTH).abs() < 1e-9);
    }
}
