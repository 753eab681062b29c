//! Binding the composited texture and body scale onto the garment mesh.
//!
//! Material and transform are tracked separately: the material is rebuilt
//! when the texture, shirt color, or mesh changes, while the transform only
//! follows the avatar scale.

use std::sync::Arc;

use glam::Vec3;

use crate::color::HexColor;
use crate::mesh::{GarmentMesh, Material};
use crate::texture::Texture;

pub const ROUGHNESS: f32 = 0.5;
pub const METALNESS: f32 = 0.1;

/// Vertical offset placing the garment on the ground plane.
pub const GROUND_OFFSET: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// What the preview area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Toggle off, or nothing uploaded yet.
    Hidden,
    /// Mesh still loading, or its load failed; a placeholder is shown.
    Loading,
    /// Mesh available for rendering.
    Ready,
}

/// Inputs the current material was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaterialKey {
    texture_revision: u64,
    shirt_color: HexColor,
    mesh_generation: u64,
}

/// Keeps a garment mesh in sync with the session's texture and scale.
#[derive(Debug, Default)]
pub struct GarmentPreview {
    mesh: Option<GarmentMesh>,
    mesh_generation: u64,
    bound_material: Option<MaterialKey>,
    bound_scale: Option<f64>,
}

impl GarmentPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> Option<&GarmentMesh> {
        self.mesh.as_ref()
    }

    /// Installs a freshly loaded mesh. Bindings are re-applied on the next sync.
    pub fn set_mesh(&mut self, mesh: GarmentMesh) {
        self.mesh = Some(mesh);
        self.mesh_generation = self.mesh_generation.wrapping_add(1);
        self.bound_scale = None;
    }

    pub fn status(&self, visible: bool) -> PreviewStatus {
        match (visible, &self.mesh) {
            (false, _) => PreviewStatus::Hidden,
            (true, None) => PreviewStatus::Loading,
            (true, Some(_)) => PreviewStatus::Ready,
        }
    }

    /// Replaces every part's material when the texture, tint or mesh changed.
    ///
    /// Without a texture nothing is touched. Returns whether materials were
    /// replaced.
    pub fn bind_material(&mut self, texture: Option<&Arc<Texture>>, shirt_color: HexColor) -> bool {
        let (Some(mesh), Some(texture)) = (self.mesh.as_mut(), texture) else {
            return false;
        };

        let key = MaterialKey {
            texture_revision: texture.revision,
            shirt_color,
            mesh_generation: self.mesh_generation,
        };
        if self.bound_material == Some(key) {
            return false;
        }

        for part in &mut mesh.parts {
            part.material = Material {
                map: Some(Arc::clone(texture)),
                roughness: ROUGHNESS,
                metalness: METALNESS,
                color: shirt_color.to_linear(),
            };
        }
        self.bound_material = Some(key);
        tracing::debug!(
            "Bound texture revision {} with tint {} to {} parts",
            texture.revision,
            shirt_color,
            mesh.parts.len()
        );
        true
    }

    /// Applies the avatar scale and ground offset. Returns whether anything changed.
    pub fn bind_transform(&mut self, avatar_scale: f64) -> bool {
        let Some(mesh) = self.mesh.as_mut() else {
            return false;
        };
        if self.bound_scale == Some(avatar_scale) {
            return false;
        }

        mesh.transform.scale = Vec3::splat(avatar_scale as f32);
        mesh.transform.translation = GROUND_OFFSET;
        self.bound_scale = Some(avatar_scale);
        true
    }
}
