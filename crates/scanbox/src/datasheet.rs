//! Fixed dimensions taken from component datasheets and bench measurements.
//!
//! These are properties of the purchased hardware, not process settings, so
//! they do not belong in [`EnclosureConfig`](crate::EnclosureConfig).

/// Laser module (Odic Force OFL510-1) base length along the beam (X).
pub const LASER_LENGTH: f64 = 75.0;
/// Laser module base width (Y).
pub const LASER_WIDTH: f64 = 30.0;
/// X spacing of the laser module's mounting screws.
pub const LASER_SCREW_XDISP: f64 = 48.5;
/// Y spacing of the laser module's mounting screws.
pub const LASER_SCREW_YDISP: f64 = 16.0;
/// Screw-pair offset from the module's +X edge.
pub const LASER_SCREW_EDGE: f64 = 7.0;
/// Height of the laser tube axis above the module base: the 8 mm mount plus
/// half the 17 mm tube, less the 1 mm shim.
pub const LASER_TUBE_AXIS: f64 = 15.5;
/// Clearance between the laser module and the polygon base for the
/// collimation lens.
pub const LENS_GAP: f64 = 10.0;

/// Polygon motor (Ricoh Aficio 1018, part G029-196) footprint along Y.
pub const POLYGON_LENGTH: f64 = 68.0;
/// Polygon motor footprint along X.
pub const POLYGON_WIDTH: f64 = 48.0;
/// Mounting-slot rotation matching the motor's hole pattern, in degrees.
pub const POLYGON_SLOT_ANGLE: f64 = -50.0;
/// Beam height above the motor base that centers the bundle in the facet
/// window.
pub const POLYGON_BEAM_OFFSET: f64 = 12.5;

/// First-surface mirror square edge length.
pub const MIRROR_WIDTH: f64 = 25.0;
/// Mirror glass thickness.
pub const MIRROR_THICK: f64 = 2.0;

/// DC barrel connector radius.
pub const DC_BARREL_R: f64 = 6.6;

/// Heat-press brass insert bore diameter.
pub const INSERT_HOLE: f64 = 4.0;
/// Heat-press brass insert length.
pub const INSERT_LENGTH: f64 = 5.8;

/// Controller board screw-hole grid along X.
pub const BOARD_DX: f64 = 58.0;
/// Controller board screw-hole grid along Z.
pub const BOARD_DZ: f64 = 48.8;
