//! The static list of showcased projects

use crate::point::Rgb;
use serde::Serialize;

/// Two-stop gradient used as a card's accent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccentColors {
    pub from: Rgb,
    pub to: Rgb,
}

impl AccentColors {
    pub const fn new(from: u32, to: u32) -> Self {
        Self {
            from: Rgb::from_hex(from),
            to: Rgb::from_hex(to),
        }
    }
}

/// One showcased project. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    /// Model asset, relative to the asset root
    pub model_path: Option<&'static str>,
    pub accent: AccentColors,
    /// Looping preview clip shown on the card
    pub preview_video: Option<&'static str>,
}

impl ProjectRecord {
    /// Cards without a model cannot be opened in the viewer
    pub fn is_viewable(&self) -> bool {
        self.model_path.is_some()
    }
}

static PROJECTS: [ProjectRecord; 4] = [
    ProjectRecord {
        id: 1,
        title: "Water Pump",
        description: "High fidelity industrial 3D model.",
        model_path: Some("/projects/water_pump.glb"),
        accent: AccentColors::new(0x2563eb, 0x06b6d4),
        preview_video: Some("/videos/water_pump.mp4"),
    },
    ProjectRecord {
        id: 2,
        title: "F1 Racing Tyre",
        description: "High performance soft compound tyre.",
        model_path: Some("/projects/f1_tyre.glb"),
        accent: AccentColors::new(0xdc2626, 0xf97316),
        preview_video: Some("/videos/f1_tyre.mp4"),
    },
    ProjectRecord {
        id: 3,
        title: "Nox Racket",
        description: "Professional padel racket visualization.",
        model_path: Some("/projects/nox_racket.glb"),
        accent: AccentColors::new(0x0f172a, 0xdc2626),
        preview_video: Some("/videos/nox_padel.mp4"),
    },
    ProjectRecord {
        id: 4,
        title: "Old Fire Extinguisher",
        description: "Vintage industrial safety equipment.",
        model_path: Some("/projects/fire.glb"),
        accent: AccentColors::new(0xc2410c, 0x991b1b),
        preview_video: Some("/videos/fire-extinguisher.mp4"),
    },
];

/// Ordered, read-only view over the showcased projects
#[derive(Debug, Clone, Copy)]
pub struct ProjectRegistry {
    projects: &'static [ProjectRecord],
}

impl ProjectRegistry {
    /// Registry over the built-in project list
    pub fn builtin() -> Self {
        Self { projects: &PROJECTS }
    }

    /// Registry over an arbitrary static list
    pub fn from_static(projects: &'static [ProjectRecord]) -> Self {
        Self { projects }
    }

    pub fn iter(&self) -> std::slice::Iter<'static, ProjectRecord> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Look up a project by id
    pub fn get(&self, id: u32) -> Option<&'static ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Project at a zero-based position in display order
    pub fn nth(&self, index: usize) -> Option<&'static ProjectRecord> {
        self.projects.get(index)
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntoIterator for ProjectRegistry {
    type Item = &'static ProjectRecord;
    type IntoIter = std::slice::Iter<'static, ProjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}

/// The built-in projects in display order
pub fn list_projects() -> &'static [ProjectRecord] {
    &PROJECTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_ids() {
        let ids: Vec<u32> = ProjectRegistry::builtin().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(list_projects().len(), 4);
    }

    #[test]
    fn test_lookup() {
        let registry = ProjectRegistry::builtin();
        assert_eq!(registry.get(3).map(|p| p.title), Some("Nox Racket"));
        assert!(registry.get(99).is_none());
        assert_eq!(registry.nth(0).map(|p| p.id), Some(1));
    }

    #[test]
    fn test_viewable_depends_on_model() {
        static NO_MODEL: [ProjectRecord; 1] = [ProjectRecord {
            id: 7,
            title: "Sketch",
            description: "Work in progress.",
            model_path: None,
            accent: AccentColors::new(0x000000, 0xffffff),
            preview_video: None,
        }];
        let registry = ProjectRegistry::from_static(&NO_MODEL);
        assert!(!registry.get(7).unwrap().is_viewable());
        assert!(ProjectRegistry::builtin().iter().all(ProjectRecord::is_viewable));
    }

    #[test]
    fn test_accent_colors() {
        let pump = ProjectRegistry::builtin().get(1).unwrap();
        assert_eq!(pump.accent.from, Rgb::new(0x25, 0x63, 0xeb));
        assert_eq!(pump.accent.to.to_string(), "#06b6d4");
    }
}
