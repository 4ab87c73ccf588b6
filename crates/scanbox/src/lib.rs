#![warn(missing_docs)]

//! Printable enclosure parts for a laser-scanning device.
//!
//! The crate composes parametric CSG trees ([`scanbox_ir::Solid`]) for every
//! mechanical part of the scanner enclosure: screw bosses, threaded-insert
//! pockets, cable fasteners, the laser and polygon-motor bases, the tilted
//! mirror mount, and the two box shells. Finished trees are serialized to
//! OpenSCAD scripts and meshed by the external kernel (see [`export`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use scanbox::{catalog, export, EnclosureConfig};
//!
//! let cfg = EnclosureConfig::default();
//! for part in catalog::all(&cfg, None) {
//!     export::render_stl(&part, "parts".as_ref(), export::DEFAULT_RENDERER).unwrap();
//! }
//! ```

use nalgebra::Vector3;
use scanbox_ir::Solid;

pub mod assembly;
pub mod catalog;
pub mod config;
pub mod datasheet;
pub mod export;
pub mod parts;

pub use catalog::NamedPart;
pub use config::EnclosureConfig;

/// Vector-offset placement, for assembly arithmetic done with nalgebra.
pub trait TranslateVec {
    /// Translate by an offset vector.
    fn translate_vec(&self, v: Vector3<f64>) -> Solid;
}

impl TranslateVec for Solid {
    fn translate_vec(&self, v: Vector3<f64>) -> Solid {
        self.translate(v.x, v.y, v.z)
    }
}
