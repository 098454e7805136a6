//! Per-level geometry table
//!
//! Built once per level load from the parsed description: named objects,
//! their world transforms and bounding volumes, plus which of them can be
//! drawn. The simulation reads this once to seed its world.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};

use super::parse::{LevelFile, MeshRecord, parse_level};
use crate::base_name;
use crate::error::LevelError;
use crate::sim::Aabb;

/// Oriented bounding box in local space (unrotated until transformed)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Obb {
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    /// Build from authored corners in LBN, LTN, LTF, LBF, RBN, RTN, RTF, RBF order
    pub fn from_corners(corners: &[Vec3; 8]) -> Self {
        let (lbn, ltn, ltf, rbn) = (corners[0], corners[1], corners[2], corners[4]);
        Self {
            center: Vec3::new(
                (lbn.x + rbn.x) * 0.5,
                (lbn.y + ltn.y) * 0.5,
                (lbn.z + ltf.z) * 0.5,
            ),
            extents: Vec3::new(
                (lbn.x - rbn.x).abs() * 0.5,
                (lbn.y - ltn.y).abs() * 0.5,
                (lbn.z - ltf.z).abs() * 0.5,
            ),
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let c = self.center;
        let e = self.extents;
        [
            c + Vec3::new(-e.x, -e.y, -e.z),
            c + Vec3::new(-e.x, e.y, -e.z),
            c + Vec3::new(-e.x, e.y, e.z),
            c + Vec3::new(-e.x, -e.y, e.z),
            c + Vec3::new(e.x, -e.y, -e.z),
            c + Vec3::new(e.x, e.y, -e.z),
            c + Vec3::new(e.x, e.y, e.z),
            c + Vec3::new(e.x, -e.y, e.z),
        ]
    }

    /// World-space AABB of this box under `transform`
    pub fn world_bounds(&self, transform: &Mat4) -> Aabb {
        Aabb::from_points(self.corners().map(|corner| transform.transform_point3(corner)))
    }
}

/// Directional light authored in the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight {
    pub color: Vec3,
    pub direction: Vec3,
}

/// A named object of the level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelObject {
    pub name: String,
    pub transform: Mat4,
    /// Slot of `transform` in the level's transform table
    pub transform_index: usize,
    pub obb: Obb,
    pub mesh_file: PathBuf,
    pub texture: Option<PathBuf>,
    /// False when the mesh or texture is missing; the object still takes part
    /// in gameplay
    pub renderable: bool,
}

impl LevelObject {
    pub fn new(name: impl Into<String>, transform: Mat4, obb: Obb) -> Self {
        let name = name.into();
        let mesh_file = mesh_file_name(&name);
        Self {
            name,
            transform,
            transform_index: 0,
            obb,
            mesh_file,
            texture: None,
            renderable: true,
        }
    }

    pub fn world_bounds(&self) -> Aabb {
        self.obb.world_bounds(&self.transform)
    }

    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

fn mesh_file_name(name: &str) -> PathBuf {
    PathBuf::from(format!("{}.h2b", base_name(name)))
}

/// All objects of one loaded level, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelGeometry {
    source: Option<PathBuf>,
    objects: Vec<LevelObject>,
    sun: Option<SunLight>,
}

impl LevelGeometry {
    /// Load and resolve a level file
    ///
    /// Missing meshes or textures only downgrade the affected object to
    /// non-renderable; a missing or malformed level file fails the load.
    pub fn load(level_path: impl AsRef<Path>, models_dir: impl AsRef<Path>) -> Result<Self, LevelError> {
        let level_path = level_path.as_ref();
        log::info!("Loading game level {}", level_path.display());

        let text = std::fs::read_to_string(level_path).map_err(|source| LevelError::Io {
            path: level_path.to_path_buf(),
            source,
        })?;
        let base_dir = level_path.parent().unwrap_or_else(|| Path::new("."));

        let mut geometry = Self::parse_str(&text, base_dir, models_dir.as_ref())?;
        geometry.source = Some(level_path.to_path_buf());

        log::info!(
            "Level {} loaded: {} objects ({} renderable)",
            level_path.display(),
            geometry.objects.len(),
            geometry.objects.iter().filter(|o| o.renderable).count()
        );
        Ok(geometry)
    }

    /// Parse level text, resolving relative textures against `base_dir`
    pub fn parse_str(text: &str, base_dir: &Path, models_dir: &Path) -> Result<Self, LevelError> {
        let LevelFile { meshes, sun } = parse_level(text)?;

        let objects = meshes
            .into_iter()
            .enumerate()
            .map(|(index, record)| resolve_object(index, record, base_dir, models_dir))
            .collect();

        Ok(Self {
            source: None,
            objects,
            sun: sun.map(|s| SunLight {
                color: s.color,
                direction: s.direction,
            }),
        })
    }

    /// Build a table directly from objects (transform slots follow order)
    pub fn from_objects(objects: impl IntoIterator<Item = LevelObject>) -> Self {
        let objects = objects
            .into_iter()
            .enumerate()
            .map(|(index, mut object)| {
                object.transform_index = index;
                object
            })
            .collect();
        Self {
            source: None,
            objects,
            sun: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn objects(&self) -> &[LevelObject] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&LevelObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn sun(&self) -> Option<&SunLight> {
        self.sun.as_ref()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn resolve_object(index: usize, record: MeshRecord, base_dir: &Path, models_dir: &Path) -> LevelObject {
    let mesh_file = models_dir.join(mesh_file_name(&record.name));
    let mut renderable = true;

    if !mesh_file.is_file() {
        log::warn!(
            "H2B not found: {} (object `{}`); loading continues without it",
            mesh_file.display(),
            record.name
        );
        renderable = false;
    }

    let texture = record.texture.map(|t| base_dir.join(t));
    if let Some(texture) = &texture {
        if !texture.is_file() {
            log::warn!("Texture not found: {} (object `{}`)", texture.display(), record.name);
            renderable = false;
        }
    }

    LevelObject {
        obb: Obb::from_corners(&record.corners),
        name: record.name,
        transform: record.transform,
        transform_index: index,
        mesh_file,
        texture,
        renderable,
    }
}
