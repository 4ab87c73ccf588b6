//! Enclosure stations and the two printable shells.
//!
//! The optical train runs in the +X direction along a fixed beam axis:
//! laser base with ventilation wall, lens gap, polygon motor base, then the
//! fold mirror with its photodiode pillar. Each station builder returns the
//! part in its own local frame; [`bottom_shell`] and [`top_shell`] place
//! them into the shared shell frame (first quadrant, one corner at the
//! origin).
//!
//! Bore re-cutting: station builders subtract their own cavities, but a
//! union with the shell floor or a wall would close any bore that crosses
//! it. Every through-cavity therefore exists as a separate solid that the
//! shell subtracts again after the union, in the station's placement frame.

use std::f64::consts::SQRT_2;
use std::path::Path;

use nalgebra::Vector3;
use scanbox_ir::Solid;

use crate::datasheet::{
    BOARD_DX, BOARD_DZ, DC_BARREL_R, INSERT_HOLE, INSERT_LENGTH, LASER_LENGTH, LASER_SCREW_EDGE,
    LASER_SCREW_XDISP, LASER_SCREW_YDISP, LASER_TUBE_AXIS, LASER_WIDTH, LENS_GAP,
    POLYGON_BEAM_OFFSET, POLYGON_LENGTH, POLYGON_SLOT_ANGLE, POLYGON_WIDTH,
};
use crate::parts;
use crate::{EnclosureConfig, TranslateVec};

/// Interior height of the bottom shell above its floor.
const SHELL_HEIGHT: f64 = 65.0;

/// Y coordinate of the beam axis in the shell frame: the polygon footprint
/// plus a safety wall on either side.
pub fn beam_axis_y(cfg: &EnclosureConfig) -> f64 {
    24.0 + 2.0 * cfg.wall_thick
}

/// X position of the mirror-mount station along the optical train.
pub fn mirror_mount_x(cfg: &EnclosureConfig) -> f64 {
    LASER_LENGTH + LENS_GAP + POLYGON_WIDTH + cfg.wall_thick + 8.0
}

/// X position of the light window the beam leaves (or enters) through.
pub fn light_window_x(cfg: &EnclosureConfig) -> f64 {
    LASER_LENGTH + LENS_GAP + POLYGON_WIDTH + cfg.wall_thick + 10.0
}

/// The four lid-screw positions, inset one `screw_fix_offset` from each
/// corner of the footprint.
pub fn corner_offsets(cfg: &EnclosureConfig) -> [(f64, f64); 4] {
    let o = cfg.screw_fix_offset;
    [
        (o, o),
        (cfg.length - o, o),
        (cfg.length - o, cfg.width - o),
        (o, cfg.width - o),
    ]
}

// laser module mounting screws, dimensions from the module's data sheet
const LASER_SCREW_HEAD_R: f64 = 3.5;
const LASER_SCREW_HEAD_H: f64 = 5.0;
const LASER_SCREW_SHAFT_R: f64 = 2.0;

/// The four laser mounting screw bosses in laser-base local coordinates,
/// built from `builder` so the same layout yields bosses or bare bores.
fn laser_screw_grid(builder: impl Fn() -> Solid) -> Solid {
    let one = builder();
    let pair = &one + &one.right(LASER_SCREW_XDISP);
    let mirrored = pair
        .back(LASER_SCREW_YDISP / 2.0)
        .mirror(0.0, 1.0, 0.0)
        .forward(LASER_SCREW_YDISP / 2.0);
    (pair + mirrored).translate(
        LASER_LENGTH - LASER_SCREW_XDISP - LASER_SCREW_EDGE,
        (LASER_WIDTH - LASER_SCREW_YDISP) / 2.0,
        0.0,
    )
}

/// Ventilation pockets of the laser base, local coordinates. The pockets
/// punch through the station's wall, which doubles as a stretch of the
/// shell's -X wall, so [`bottom_shell`] re-cuts them.
fn laser_vent_pockets(cfg: &EnclosureConfig) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let boss_h = cfg.laser_height - LASER_TUBE_AXIS;
    let spile_t = 4.0;
    let spile_h = 25.0;
    let spile = Solid::cube(t + 2.0 * c, spile_t, spile_h)
        .translate(-c, 0.0, boss_h);
    let count = (LASER_WIDTH / (spile_t * 2.0)).ceil() as usize;
    let mut pockets = spile.forward(t);
    for i in 1..count {
        pockets = pockets + spile.forward(i as f64 * 2.0 * spile_t + t);
    }
    pockets
}

/// All through-cavities of [`laser_base`]: its screw bores and ventilation
/// pockets, in laser-base local coordinates.
fn laser_base_cavities(cfg: &EnclosureConfig) -> Solid {
    let boss_h = cfg.laser_height - LASER_TUBE_AXIS;
    let bores = laser_screw_grid(|| {
        parts::screw_bore(
            cfg,
            LASER_SCREW_HEAD_R,
            LASER_SCREW_HEAD_H,
            LASER_SCREW_SHAFT_R,
            boss_h,
        )
    })
    .right(cfg.wall_thick);
    bores + laser_vent_pockets(cfg)
}

/// Laser mounting station with a ventilation wall.
///
/// First quadrant, one corner at the origin, the tube axis along +X. Boss
/// height places the beam at `laser_height`, the tube axis sitting
/// [`LASER_TUBE_AXIS`] millimeters above the module's mounting face. The
/// wall at x = 0 carries ventilation spiles for the laser's fan.
pub fn laser_base(cfg: &EnclosureConfig) -> Solid {
    let t = cfg.wall_thick;
    let boss_h = cfg.laser_height - LASER_TUBE_AXIS;
    let bosses = laser_screw_grid(|| {
        parts::screw(
            cfg,
            LASER_SCREW_HEAD_R,
            LASER_SCREW_HEAD_H,
            LASER_SCREW_SHAFT_R,
            boss_h,
        )
    })
    .right(t);
    let wall = Solid::cube(t, LASER_WIDTH, cfg.wall_height);
    &(bosses + wall) - &laser_vent_pockets(cfg)
}

// polygon motor mounting screws
const POLYGON_SCREW_HEAD_R: f64 = 3.5;
const POLYGON_SCREW_HEAD_H: f64 = 5.0;
const POLYGON_SCREW_SHAFT_R: f64 = 2.0;
const POLYGON_SLOT_WIDTH: f64 = 2.0;

/// Both slot placements of one polygon-base half, mirrored to the full
/// footprint. `slot` is either a complete screw slot or its bore alone.
fn polygon_slot_layout(slot: &Solid) -> Solid {
    let half = &slot.translate(3.1, POLYGON_LENGTH - 4.0, 0.0)
        + &slot
            .rotate(0.0, 0.0, POLYGON_SLOT_ANGLE)
            .translate(3.2, 4.0 + 1.29, 0.0);
    &half + &half.mirror(1.0, 0.0, 0.0).right(POLYGON_WIDTH)
}

/// Slot bores of [`polygon_base`] in local coordinates, for re-cutting
/// through the shell floor.
fn polygon_slot_bores(cfg: &EnclosureConfig) -> Solid {
    let h = cfg.laser_height - POLYGON_BEAM_OFFSET;
    let bore = parts::screw_bore(
        cfg,
        POLYGON_SCREW_HEAD_R,
        POLYGON_SCREW_HEAD_H,
        POLYGON_SCREW_SHAFT_R,
        h,
    );
    let inner = Solid::hull([bore.clone(), bore.right(POLYGON_SLOT_WIDTH)]);
    polygon_slot_layout(&inner)
}

/// Polygon motor mounting station: four countersunk screw slots whose
/// height puts the mirror facets on the beam axis.
///
/// First quadrant, one corner at the origin, length along Y. The beam
/// crosses at y = 24 in local coordinates; the motor spins clockwise and
/// deflects the beam in +X. Slots rather than plain bores because the motor
/// needs rotational alignment at assembly time.
pub fn polygon_base(cfg: &EnclosureConfig) -> Solid {
    let h = cfg.laser_height - POLYGON_BEAM_OFFSET;
    let slot = parts::screw_slot(
        cfg,
        POLYGON_SCREW_HEAD_R,
        POLYGON_SCREW_HEAD_H,
        POLYGON_SCREW_SHAFT_R,
        POLYGON_SLOT_WIDTH,
        h,
    );
    polygon_slot_layout(&slot)
}

/// Fold-mirror station: a 45° holder on a pillar pair, plus a photodiode
/// pole that picks up the sweep for synchronization.
///
/// `down` selects downward refraction; `false` mirrors the holder for the
/// upward variant. After construction the part is re-centered so the light
/// path leaves along y = 0, which is what [`bottom_shell`] positions by.
pub fn mirror_mount(cfg: &EnclosureConfig, down: bool) -> Solid {
    use crate::datasheet::{MIRROR_THICK, MIRROR_WIDTH};
    let t = cfg.wall_thick;
    let lh = cfg.light_hole;

    let pillar_left = 14.0; // +y pillar; -y pillar is insert + wall
    let mirror_insert = 5.0;
    let height_mirror = cfg.laser_height - 6.0;
    // photodiode center on the beam, calibrated on the printed article
    let photodiode_height = cfg.laser_height - 4.5;
    let cable_guide = 2.0;
    let sensor_width = 2.0;
    let sensor_height = 4.5;
    let sensor_insert = 2.0;
    let margin = 0.5; // FFF clearance for the mirror glass
    let thick = 1.3; // holder sheet thickness
    let pole_offset = 19.0; // constrained by cable clearance in the up variant

    let x_width = 0.5 * SQRT_2 * (MIRROR_THICK + margin + 2.0 * thick);
    let x_bound = 0.5 * SQRT_2 * (2.0 * thick + MIRROR_WIDTH + margin) + x_width;
    let y_bound = pole_offset + t + sensor_insert;

    let holder = Solid::cube(
        MIRROR_THICK + margin + 2.0 * thick,
        lh + t + mirror_insert + pillar_left,
        MIRROR_WIDTH + margin + 2.0 * thick,
    );
    // mirror pocket, plus a cleaning slit for filament left-overs
    let holder_pocket = Solid::cube(
        MIRROR_THICK + margin,
        lh + pillar_left + mirror_insert,
        MIRROR_WIDTH + margin,
    )
    .translate(thick, 0.0, thick)
        + Solid::cube(MIRROR_THICK + margin, pillar_left - t, thick).translate(
            thick,
            0.0,
            thick + MIRROR_WIDTH + margin,
        );
    let tilt = |s: &Solid| s.rotate(0.0, 45.0, 0.0).up(height_mirror);

    let pillars = Solid::cube(
        x_width,
        lh + pillar_left + t + mirror_insert,
        height_mirror,
    );
    // pocket cut after the union so the holder stays open through the pillar
    let mut mount = &(pillars + tilt(&holder)) - &tilt(&holder_pocket);
    // light pocket, doubled extent for certainty
    mount = &mount
        - &Solid::cube(2.0 * MIRROR_WIDTH, lh, 2.0 * MIRROR_WIDTH).forward(pillar_left);
    if !down {
        mount = mount.mirror(1.0, 0.0, 0.0).right(x_bound);
    }

    // photodiode pole; the wall between light exit and sensor is fixed at
    // 1 mm to keep the light path as wide as possible
    let enclosure = Solid::cube(
        t + sensor_insert,
        cable_guide * 2.0 + sensor_width + t + 1.0,
        sensor_height + photodiode_height + 2.0 * t,
    );
    let photodiode = &Solid::cube(
        sensor_insert + t,
        cable_guide * 2.0 + sensor_width,
        sensor_height,
    ) - &Solid::cube(t, sensor_width, sensor_height).forward(cable_guide);
    let pole = &enclosure - &photodiode.translate(0.0, 1.0, photodiode_height);

    let combined = mount + pole.translate(pole_offset, pillar_left + lh, 0.0);
    // re-center so the light path is on y = 0
    let combined = combined
        .mirror(0.0, 1.0, 0.0)
        .mirror(1.0, 0.0, 0.0)
        .translate(y_bound, pillar_left + 0.5 * lh, 0.0);
    combined
        + parts::cable_fastener(cfg, cfg.tie_height, cfg.tie_width, true)
            .translate(9.0, pillar_left + 9.0, 0.0)
}

// controller board screws: two M3-ish pairs for the board grid, a wider
// pair for the expansion header bracket
const BOARD_SCREW_HEAD_R: f64 = 2.5;
const BOARD_SCREW_HEAD_H: f64 = 1.0;
const BOARD_SCREW_SHAFT_R: f64 = 1.5;
const BRACKET_SCREW_HEAD_R: f64 = 3.5;
const BRACKET_SCREW_HEAD_H: f64 = 4.0;
const BRACKET_SCREW_SHAFT_R: f64 = 2.0;
const BOARD_STANDOFF: f64 = 5.0;
const BRACKET_DZ: f64 = 15.0;
// bracket position relative to the board grid, from the header drawing
const BRACKET_X: f64 = -(49.6 - 1.28 - 2.0 - 2.0) - 8.0;
const BRACKET_Z: f64 = 15.5 + 1.5 + 1.2 - 1.5 - 2.7;
const PLATE_LIFT: f64 = 11.0;

/// Every through-cavity of [`controller_mount`] in its local frame: board
/// and bracket screw bores, the header pocket, and the cable exit window.
fn controller_cutouts(cfg: &EnclosureConfig) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let length = BOARD_STANDOFF + t;
    let board_bore = parts::hscrew_bore(
        cfg,
        BOARD_SCREW_HEAD_R,
        BOARD_SCREW_HEAD_H,
        BOARD_SCREW_SHAFT_R,
        length,
    );
    let pair = &board_bore + &board_bore.right(BOARD_DX);
    let board_bores = &pair + &pair.up(BOARD_DZ);

    let header_pocket = Solid::cube(
        BOARD_DX - 2.0 * (BOARD_SCREW_SHAFT_R + t * 0.5),
        length + c,
        6.0,
    )
    .translate(BOARD_SCREW_SHAFT_R + t * 0.5, -length, BOARD_DZ - 3.0);

    let bracket_bore = parts::hscrew_bore(
        cfg,
        BRACKET_SCREW_HEAD_R,
        BRACKET_SCREW_HEAD_H,
        BRACKET_SCREW_SHAFT_R,
        length,
    );
    let bracket_bores =
        (&bracket_bore + &bracket_bore.up(BRACKET_DZ)).translate(BRACKET_X, 0.0, BRACKET_Z);

    let exit_window = Solid::cube(
        BOARD_DX - 2.0 * (BOARD_SCREW_SHAFT_R + t * 0.5),
        12.0,
        t + 2.0 * c,
    )
    .translate(BOARD_SCREW_SHAFT_R + t * 0.5, t - 16.0, -c);

    (board_bores + header_pocket + bracket_bores).up(t + PLATE_LIFT) + exit_window
}

/// Controller mounting station: horizontal screw bosses for the FPGA board
/// and its expansion bracket on a backing plate, plus a floor-level cable
/// exit.
///
/// Local frame: the backing plate lies against y = 0 on the -Y side; the
/// shell places the station so that plane coincides with its +Y wall.
pub fn controller_mount(cfg: &EnclosureConfig) -> Solid {
    let t = cfg.wall_thick;
    let length = BOARD_STANDOFF + t;

    let board_screw = parts::hscrew(
        cfg,
        BOARD_SCREW_HEAD_R,
        BOARD_SCREW_HEAD_H,
        BOARD_SCREW_SHAFT_R,
        length,
    );
    let pair = &board_screw + &board_screw.right(BOARD_DX);
    let mut station = &pair + &pair.up(BOARD_DZ);

    let bracket_screw = parts::hscrew(
        cfg,
        BRACKET_SCREW_HEAD_R,
        BRACKET_SCREW_HEAD_H,
        BRACKET_SCREW_SHAFT_R,
        length,
    );
    station = station
        + (&bracket_screw + &bracket_screw.up(BRACKET_DZ)).translate(BRACKET_X, 0.0, BRACKET_Z);
    // backing plate spanning both screw groups
    station = station + Solid::cube(123.0, 2.0, 61.0).translate(-60.0, -2.0, -8.0);
    station = station.up(t + PLATE_LIFT);

    // floor-level cable exit
    let exit_plate = Solid::cube(
        BOARD_DX + 2.0 * BOARD_SCREW_SHAFT_R + t,
        16.0,
        t,
    );
    station = station + exit_plate.back(16.0);
    &station - &controller_cutouts(cfg)
}

/// Logo plate with the brand glyphs cut through it as a stencil, imported
/// from a pre-extruded STL (native bounds 234 x 26 x 1, scaled to half
/// size).
pub fn logo_engraving(cfg: &EnclosureConfig, stl: &Path) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let x_bound = 120.0 + 2.0 * t;
    let y_bound = 13.0 + 2.0 * t;
    let depth = cfg.top_height - t;
    let plate = Solid::cube(x_bound, y_bound, depth);
    let glyphs = Solid::import(stl.to_string_lossy())
        .scale(0.5, 0.5, depth + 2.0 * c)
        .mirror(0.0, 1.0, 0.0)
        .translate((x_bound - 117.0) / 2.0, (y_bound + 13.0) / 2.0, -c);
    &plate - &glyphs
}

// lid screws, sized for the threaded inserts in the bottom shell
const LID_SCREW_HEAD_R: f64 = 3.5;
const LID_SCREW_HEAD_H: f64 = 5.0;
const LID_SCREW_SHAFT_R: f64 = 2.0;

/// Top shell: lid plate, four corner screw bosses reaching the threaded
/// inserts below, and anti-slide knobs on all four sides.
///
/// `down` selects the downward-projection variant; the upward variant gets
/// a light window above the mirror mount instead of a closed lid. When
/// `logo` names a glyph STL it is stenciled into a plate that doubles as
/// the fourth anti-slide protrusion. The part is returned already flipped
/// into its print orientation.
pub fn top_shell(cfg: &EnclosureConfig, down: bool, logo: Option<&Path>) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let (length, width) = (cfg.length, cfg.width);

    let mut top = Solid::cube(length, width, t);
    let boss = parts::screw(
        cfg,
        LID_SCREW_HEAD_R,
        LID_SCREW_HEAD_H,
        LID_SCREW_SHAFT_R,
        cfg.top_height,
    );
    for (x, y) in corner_offsets(cfg) {
        top = top + boss.translate(x, y, 0.0);
    }

    // anti-slide knobs; two screws alone let the lid shear
    let knob_h = cfg.top_height - t;
    let x_knob = Solid::cube(t, t * 3.0, knob_h);
    top = top
        + x_knob.translate(t, width / 2.0 - 1.0, t)
        + x_knob.translate(length - 2.0 * t, width / 2.0 - 1.0, t);
    let y_knob = Solid::cube(t * 3.0, t, knob_h);
    top = top
        + (y_knob.forward(t) + y_knob.forward(width - 2.0 * t))
            .translate(length * 0.25, 0.0, t);

    if let Some(stl) = logo {
        top = top
            + logo_engraving(cfg, stl).translate(
                0.5 * (length - (120.0 + 2.0 * t)),
                width - t - (13.0 + 2.0 * t),
                t,
            );
    }

    // re-open the corner bores the lid plate closed
    let bore = parts::screw_bore(
        cfg,
        LID_SCREW_HEAD_R,
        LID_SCREW_HEAD_H,
        LID_SCREW_SHAFT_R,
        cfg.top_height,
    );
    for (x, y) in corner_offsets(cfg) {
        top = &top - &bore.translate(x, y, 0.0);
    }

    if !down {
        let window = Solid::cube(20.0, 8.0, t + 2.0 * c).down(c);
        top = &top
            - &window.translate(light_window_x(cfg), beam_axis_y(cfg) - 4.0, 0.0);
    }
    // print orientation: bosses up, lid face down
    top.rotate(0.0, 180.0, 0.0).mirror(0.0, 1.0, 0.0).rotate(0.0, 0.0, 180.0)
}

/// Bottom shell: the walled tray with every station placed on the optical
/// train, wall penetrations for power and USB, the belt-mount pocket, and
/// threaded inserts for the lid screws.
///
/// `down` selects downward projection, which needs a light window in the
/// floor under the fold mirror. Mirrored over Y at the end so the cable
/// side matches the printer the device mounts on.
pub fn bottom_shell(cfg: &EnclosureConfig, down: bool) -> Solid {
    let t = cfg.wall_thick;
    let c = cfg.bore_overcut;
    let (length, width) = (cfg.length, cfg.width);
    let laser_y = beam_axis_y(cfg);

    let mut shell = &Solid::cube(length, width, t + SHELL_HEIGHT)
        - &Solid::cube(length - 2.0 * t, width - 2.0 * t, SHELL_HEIGHT).translate(t, t, t);

    // station placements; the controller goes first, its backing plate
    // merging into the +Y wall
    let controller_at = Vector3::new(t + 90.0, width, 0.0);
    let laser_at = Vector3::new(0.0, laser_y - 0.5 * LASER_WIDTH, 0.0);
    let polygon_at = Vector3::new(LASER_LENGTH + LENS_GAP + 4.0, 2.0 * t, 0.0);
    shell = shell + controller_mount(cfg).translate_vec(controller_at);
    shell = shell + laser_base(cfg).translate_vec(laser_at);
    shell = shell + polygon_base(cfg).translate_vec(polygon_at);
    shell = shell + mirror_mount(cfg, down).translate(mirror_mount_x(cfg), laser_y, 0.0);

    // re-open every cavity the wall and floor unions closed
    shell = &shell - &controller_cutouts(cfg).translate_vec(controller_at);
    shell = &shell - &laser_base_cavities(cfg).translate_vec(laser_at);
    shell = &shell - &polygon_slot_bores(cfg).translate_vec(polygon_at);

    // DC barrel exits, stacked; their spacing must exceed the radius
    let barrel = Solid::cylinder(DC_BARREL_R, 2.0 * t + 2.0 * c, cfg.segments)
        .rotate(90.0, 0.0, 0.0)
        .forward(c);
    shell = &shell
        - &(&barrel + &barrel.up(2.0 * DC_BARREL_R + 4.0 + t)).translate(
            t + DC_BARREL_R + 10.0,
            width,
            t + DC_BARREL_R * 2.0,
        );
    // micro-USB exit in the +X wall, same diameter as a barrel
    shell = &shell
        - &barrel.rotate(0.0, 0.0, 90.0).translate(
            length - t,
            width - 23.2,
            t + 11.0 + 23.0,
        );

    // belt-mount pocket and plate in the +X wall
    let pocket_at = (length - t, width - 60.0, t + 15.0);
    shell = &shell
        - &Solid::cube(10.0, 30.0, 50.0).translate(pocket_at.0, pocket_at.1, pocket_at.2);
    shell = shell + parts::box_mount(cfg).translate(pocket_at.0, pocket_at.1, pocket_at.2);

    if down {
        // floor window letting the refracted beam leave the box
        let window = Solid::cube(20.0, cfg.light_hole, t + 2.0 * c).down(c);
        shell = &shell
            - &window.translate(light_window_x(cfg), laser_y - 0.5 * cfg.light_hole, 0.0);
    }

    shell = shell
        + parts::cable_fastener(cfg, cfg.tie_height, cfg.tie_width, false).translate(
            LASER_LENGTH - 10.0,
            width - 20.0,
            t,
        );

    // threaded inserts for the lid screws, flipped toward the near wall
    let upshift = t + SHELL_HEIGHT - cfg.top_height + t;
    for (x, y) in corner_offsets(cfg) {
        let flip = y < width / 2.0;
        shell = shell
            + parts::threaded_insert(cfg, flip, INSERT_HOLE, INSERT_LENGTH)
                .translate(x, y, upshift);
    }
    shell.mirror(0.0, 1.0, 0.0)
}
