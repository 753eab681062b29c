//! Garment mesh model and asset loading.
//!
//! The preview only needs to know which parts a mesh has so that it can
//! swap their materials, and where the mesh sits in the scene. Geometry
//! stays with whichever renderer draws the mesh.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec3;
use palette::LinSrgb;
use serde::Deserialize;

use crate::error::{Result, StudioError};
use crate::task::OneShot;
use crate::texture::Texture;

/// Where the garment mesh lives relative to the working directory.
pub const DEFAULT_MESH_PATH: &str = "models/tshirt.glb";

// ============================================================================
// Scene types
// ============================================================================

/// A physically based surface description.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Color map sampled across the surface.
    pub map: Option<Arc<Texture>>,
    pub roughness: f32,
    pub metalness: f32,
    /// Tint in linear light, set independently of the map.
    pub color: LinSrgb<f32>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            map: None,
            roughness: 1.0,
            metalness: 0.0,
            color: LinSrgb::new(1.0, 1.0, 1.0),
        }
    }
}

/// One drawable piece of the mesh, carrying its own material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub name: String,
    pub material: Material,
}

/// Uniform scale and translation of the mesh root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }
}

/// A loaded garment mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentMesh {
    pub source: PathBuf,
    pub parts: Vec<MeshPart>,
    pub transform: MeshTransform,
}

impl GarmentMesh {
    pub fn new(source: impl Into<PathBuf>, part_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            source: source.into(),
            parts: part_names
                .into_iter()
                .map(|name| MeshPart {
                    name,
                    material: Material::default(),
                })
                .collect(),
            transform: MeshTransform::default(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Loads a garment mesh from a path.
pub trait MeshLoader: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<GarmentMesh>;
}

/// Spawns a one-shot load on a worker thread.
pub fn load_in_background<L: MeshLoader>(
    loader: Arc<L>,
    path: impl Into<PathBuf>,
) -> OneShot<Result<GarmentMesh>> {
    let path = path.into();
    OneShot::spawn(move || loader.load(&path))
}

/// Reads glTF 2.0 assets, binary (`.glb`) or JSON (`.gltf`).
///
/// Every primitive of every mesh becomes one [`MeshPart`], matching how
/// renderers split a glTF mesh into separately shaded draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_JSON_CHUNK: u32 = 0x4E4F_534A;
const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Deserialize)]
struct GltfDocument {
    #[serde(default)]
    meshes: Vec<GltfMesh>,
}

#[derive(Debug, Deserialize)]
struct GltfMesh {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<serde_json::Value>,
}

impl GltfLoader {
    /// Parses an in-memory asset.
    pub fn parse(&self, path: &Path, bytes: &[u8]) -> Result<GarmentMesh> {
        let json = if bytes.starts_with(b"glTF") {
            glb_json_chunk(bytes).map_err(|reason| StudioError::mesh(path, reason))?
        } else {
            bytes
        };

        let doc: GltfDocument = serde_json::from_slice(json)?;
        let mut names = Vec::new();
        for (mesh_index, mesh) in doc.meshes.iter().enumerate() {
            let base = mesh
                .name
                .clone()
                .unwrap_or_else(|| format!("mesh{mesh_index}"));
            match mesh.primitives.len() {
                1 => names.push(base),
                n => names.extend((0..n).map(|i| format!("{base}_{i}"))),
            }
        }

        if names.is_empty() {
            return Err(StudioError::mesh(path, "asset contains no mesh primitives"));
        }
        Ok(GarmentMesh::new(path, names))
    }
}

impl MeshLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<GarmentMesh> {
        let bytes = std::fs::read(path).map_err(|e| StudioError::io(path, e))?;
        let mesh = self.parse(path, &bytes)?;
        tracing::debug!("Loaded {} with {} parts", path.display(), mesh.parts.len());
        Ok(mesh)
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Returns the JSON chunk of a binary glTF container.
fn glb_json_chunk(bytes: &[u8]) -> Result<&[u8], String> {
    if read_u32(bytes, 0) != Some(GLB_MAGIC) {
        return Err("missing glTF magic".into());
    }
    match read_u32(bytes, 4) {
        Some(2) => {}
        Some(v) => return Err(format!("unsupported glTF container version {v}")),
        None => return Err("truncated header".into()),
    }

    let chunk_len = read_u32(bytes, GLB_HEADER_LEN).ok_or("truncated chunk header")? as usize;
    let chunk_type = read_u32(bytes, GLB_HEADER_LEN + 4).ok_or("truncated chunk header")?;
    if chunk_type != GLB_JSON_CHUNK {
        return Err("first chunk is not JSON".into());
    }

    let start = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN;
    bytes
        .get(start..start + chunk_len)
        .ok_or_else(|| "JSON chunk runs past end of file".into())
}

// ============================================================================
// Tests
// ============================================================================
