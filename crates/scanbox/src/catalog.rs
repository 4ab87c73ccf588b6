//! The printable part catalog.
//!
//! One entry per STL the device needs, in a stable order, with the names
//! the CLI and the output files use. Shims and loose fasteners are built
//! at proof dimensions so a test print can verify fit before a full shell
//! run.

use std::path::Path;

use scanbox_ir::{Document, Solid};

use crate::EnclosureConfig;
use crate::{assembly, parts};

/// A catalog entry: a part name and its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPart {
    /// Stable catalog name, also the output file stem.
    pub name: &'static str,
    /// The part geometry in its print orientation.
    pub solid: Solid,
}

/// Build the full catalog for one configuration.
///
/// `logo` optionally names a glyph STL stenciled into the top shells. The
/// mirror-mount entry ships on a raft plate; the mount's own footprint is
/// too slender to survive the print bed on its own.
pub fn all(cfg: &EnclosureConfig, logo: Option<&Path>) -> Vec<NamedPart> {
    let mirror_raft = Solid::cube(30.0, 50.0, 2.0).back(20.0);
    vec![
        NamedPart {
            name: "screw",
            solid: parts::screw(cfg, 3.0, 2.0, 2.0, 10.0),
        },
        NamedPart {
            name: "laser_shim",
            solid: parts::laser_shim(cfg, 1.0),
        },
        NamedPart {
            name: "laser_base",
            solid: assembly::laser_base(cfg),
        },
        NamedPart {
            name: "cable_fastener",
            solid: parts::cable_fastener(cfg, cfg.tie_height, cfg.tie_width, true),
        },
        NamedPart {
            name: "threaded_insert",
            solid: parts::threaded_insert(cfg, true, 4.0, 5.8),
        },
        NamedPart {
            name: "polygon_shim",
            solid: parts::polygon_shim(cfg, 1.0),
        },
        NamedPart {
            name: "polygon_base",
            solid: assembly::polygon_base(cfg),
        },
        NamedPart {
            name: "box_mount",
            solid: parts::box_mount(cfg),
        },
        NamedPart {
            name: "mirror_mount_down",
            solid: assembly::mirror_mount(cfg, true) + mirror_raft,
        },
        NamedPart {
            name: "hscrew",
            solid: parts::hscrew(cfg, 3.5, 4.0, 2.0, 5.0 + cfg.wall_thick),
        },
        NamedPart {
            name: "controller_mount",
            solid: assembly::controller_mount(cfg),
        },
        NamedPart {
            name: "panel_mount_mini",
            solid: parts::panel_mount_mini(cfg),
        },
        NamedPart {
            name: "top_shell_down",
            solid: assembly::top_shell(cfg, true, logo),
        },
        NamedPart {
            name: "top_shell_up",
            solid: assembly::top_shell(cfg, false, logo),
        },
        NamedPart {
            name: "bottom_shell_down",
            solid: assembly::bottom_shell(cfg, true),
        },
        NamedPart {
            name: "bottom_shell_up",
            solid: assembly::bottom_shell(cfg, false),
        },
    ]
}

/// Look one part up by name.
pub fn find(cfg: &EnclosureConfig, logo: Option<&Path>, name: &str) -> Option<NamedPart> {
    all(cfg, logo).into_iter().find(|p| p.name == name)
}

/// The whole catalog as one interchange document.
pub fn to_document(cfg: &EnclosureConfig, logo: Option<&Path>) -> Document {
    let mut doc = Document::new();
    for part in all(cfg, logo) {
        doc.push(part.name, part.solid);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EnclosureConfig {
        EnclosureConfig::default()
    }

    #[test]
    fn catalog_names_are_unique() {
        let parts = all(&cfg(), None);
        assert_eq!(parts.len(), 16);
        let mut names: Vec<_> = parts.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), parts.len());
    }

    #[test]
    fn both_shells_come_in_both_variants() {
        let parts = all(&cfg(), None);
        for name in [
            "top_shell_down",
            "top_shell_up",
            "bottom_shell_down",
            "bottom_shell_up",
        ] {
            assert!(parts.iter().any(|p| p.name == name), "missing {name}");
        }
    }

    #[test]
    fn find_matches_the_catalog_order() {
        let c = cfg();
        let part = find(&c, None, "laser_base").unwrap();
        assert_eq!(part.solid, assembly::laser_base(&c));
        assert!(find(&c, None, "no_such_part").is_none());
    }

    #[test]
    fn document_round_trips_through_json() {
        let c = cfg();
        let doc = to_document(&c, None);
        let json = doc.to_json().unwrap();
        let back = scanbox_ir::Document::from_json(&json).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn mirror_mount_entry_carries_a_raft() {
        let c = cfg();
        let entry = find(&c, None, "mirror_mount_down").unwrap();
        let bare = assembly::mirror_mount(&c, true);
        assert!(entry.solid.node_count() > bare.node_count());
        let bb = entry.solid.bounding_box();
        assert!(bb.min.y <= -20.0);
    }
}
