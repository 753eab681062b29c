//! The configurator: session state plus everything derived from it.
//!
//! ```text
//! user input ──► SessionState ──► TextureCompositor ──► GarmentPreview
//!     ▲               │                  │
//!     │               └──► export_config └──► export_texture
//! HotkeyRegistry (Alt+Q)
//! background tasks (image read, mesh load) ──► pump()
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compositor::{Compositor, TextureCompositor};
use crate::config::{Configurable, TshirtConfig};
use crate::error::Result;
use crate::export;
use crate::hotkey::{Chord, HotkeyAction, HotkeyGuard, HotkeyRegistry, KeyEvent};
use crate::ingest::UploadedImage;
use crate::mesh::{self, GarmentMesh, MeshLoader};
use crate::preview::{GarmentPreview, PreviewStatus};
use crate::session::SessionState;
use crate::task::{OneShot, Poll};
use crate::texture::Texture;

/// A running configurator session.
///
/// Created with [`Configurator::start`], which registers the Alt+Q binding;
/// the binding is removed when the configurator is dropped.
#[derive(Debug)]
pub struct Configurator {
    session: SessionState,
    textures: TextureCompositor,
    preview: GarmentPreview,
    hotkeys: HotkeyRegistry,
    _toggle_binding: HotkeyGuard,
    pending_images: Vec<OneShot<Result<UploadedImage>>>,
    pending_mesh: Option<OneShot<Result<GarmentMesh>>>,
}

impl Configurator {
    /// Starts a session and registers its hotkeys with `hotkeys`.
    pub fn start(compositor: Compositor, hotkeys: &HotkeyRegistry) -> Self {
        let toggle = hotkeys.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        Self {
            session: SessionState::new(),
            textures: TextureCompositor::new(compositor),
            preview: GarmentPreview::new(),
            hotkeys: hotkeys.clone(),
            _toggle_binding: toggle,
            pending_images: Vec::new(),
            pending_mesh: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Applies `edit` to the session and refreshes everything derived from it.
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut SessionState) -> R) -> R {
        let result = edit(&mut self.session);
        self.sync();
        result
    }

    /// Applies a saved config to the session.
    pub fn apply_config(&mut self, config: &TshirtConfig) {
        self.update(|session| session.apply_config(config));
    }

    pub fn export_config(&self) -> TshirtConfig {
        self.session.export_config()
    }

    // ---- Input events ----

    /// Feeds a key press through the hotkey registry.
    ///
    /// Returns whether any binding fired.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let actions = self.hotkeys.dispatch(&event);
        for action in &actions {
            match action {
                HotkeyAction::TogglePreview => self.toggle_preview(),
            }
        }
        !actions.is_empty()
    }

    /// Same effect as Alt+Q.
    pub fn toggle_preview(&mut self) {
        self.update(|session| {
            session.toggle_preview();
        });
    }

    pub fn set_custom_text(&mut self, text: &str) -> bool {
        self.update(|session| session.set_custom_text(text))
    }

    /// Publishes an already ingested image.
    pub fn upload(&mut self, image: UploadedImage) {
        self.update(|session| session.set_uploaded_image(image));
    }

    /// Starts reading an image file in the background.
    pub fn begin_upload(&mut self, path: impl AsRef<Path>) {
        self.pending_images.push(UploadedImage::read_in_background(path));
    }

    /// Starts loading the garment mesh in the background.
    pub fn begin_mesh_load<L: MeshLoader>(&mut self, loader: Arc<L>, path: impl Into<PathBuf>) {
        self.pending_mesh = Some(mesh::load_in_background(loader, path));
    }

    /// Whether any background task has not delivered yet.
    pub fn has_pending(&self) -> bool {
        !self.pending_images.is_empty() || self.pending_mesh.is_some()
    }

    /// Applies results of finished background tasks.
    ///
    /// Image reads complete in any order; each result overwrites the
    /// current upload. A failed mesh load leaves the preview on its
    /// placeholder. Returns the number of tasks that finished.
    pub fn pump(&mut self) -> usize {
        let mut finished = 0;

        let mut still_pending = Vec::new();
        for task in std::mem::take(&mut self.pending_images) {
            match task.poll() {
                Ok(Poll::Pending) => still_pending.push(task),
                Ok(Poll::Ready(Ok(image))) => {
                    finished += 1;
                    self.session.set_uploaded_image(image);
                }
                Ok(Poll::Ready(Err(e))) | Err(e) => {
                    finished += 1;
                    tracing::warn!("Image upload failed: {}", e);
                }
            }
        }
        self.pending_images = still_pending;

        if let Some(task) = self.pending_mesh.take() {
            match task.poll() {
                Ok(Poll::Pending) => self.pending_mesh = Some(task),
                Ok(Poll::Ready(Ok(mesh))) => {
                    finished += 1;
                    self.preview.set_mesh(mesh);
                }
                Ok(Poll::Ready(Err(e))) | Err(e) => {
                    finished += 1;
                    tracing::warn!("Garment mesh failed to load: {}", e);
                }
            }
        }

        if finished > 0 {
            self.sync();
        }
        finished
    }

    /// Pumps until every background task has delivered.
    pub fn wait_for_pending(&mut self) {
        while self.has_pending() {
            if self.pump() == 0 {
                std::thread::yield_now();
            }
        }
    }

    // ---- Derived state ----

    /// Recomputes the texture and re-binds the preview.
    fn sync(&mut self) {
        let texture = self.textures.refresh(&self.session);
        self.preview
            .bind_material(texture.as_ref(), self.session.shirt_color());
        self.preview.bind_transform(self.session.avatar_scale());
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.textures.texture()
    }

    pub fn preview(&self) -> &GarmentPreview {
        &self.preview
    }

    /// What the preview area currently shows.
    pub fn preview_status(&self) -> PreviewStatus {
        let visible = self.session.show_preview() && self.session.uploaded_image().is_some();
        self.preview.status(visible)
    }

    // ---- Export ----

    /// Writes `custom-tshirt.png`; no-op before the first texture.
    pub fn export_texture(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        export::export_texture(self.texture().map(Arc::as_ref), dir)
    }

    /// Writes `tshirt-config.json`.
    pub fn export_config_file(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        export::export_config(&self.export_config(), dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::hotkey::Modifiers;
    use crate::ingest::tests::png_upload;
    use crate::mesh::GltfLoader;
    use crate::mesh::tests::{SHIRT_JSON, glb};
    use crate::options::Build;

    fn start() -> (Configurator, HotkeyRegistry) {
        let hotkeys = HotkeyRegistry::new();
        let app = Configurator::start(Compositor::without_fonts(), &hotkeys);
        (app, hotkeys)
    }

    fn alt_q() -> KeyEvent {
        KeyEvent::new('q', Modifiers::ALT)
    }

    fn write_shirt(dir: &Path) -> PathBuf {
        let path = dir.join("tshirt.glb");
        std::fs::write(&path, glb(SHIRT_JSON)).unwrap();
        path
    }

    #[test]
    fn hotkey_lifetime_matches_session() {
        let (app, hotkeys) = start();
        assert_eq!(hotkeys.len(), 1);
        drop(app);
        assert!(hotkeys.is_empty());
    }

    #[test]
    fn alt_q_toggles_preview() {
        let (mut app, _hotkeys) = start();
        assert!(app.handle_key(alt_q()));
        assert!(app.session().show_preview());
        assert!(!app.handle_key(KeyEvent::new('q', Modifiers::default())));
        assert!(app.session().show_preview());
        app.toggle_preview();
        assert!(!app.session().show_preview());
    }

    #[test]
    fn no_image_means_no_texture_and_noop_export() {
        let (mut app, _hotkeys) = start();
        app.set_custom_text("hello");
        assert!(app.texture().is_none());

        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_texture(dir.path()).unwrap().is_none());
    }

    #[test]
    fn preview_hidden_until_image_uploaded() {
        let (mut app, _hotkeys) = start();
        app.toggle_preview();
        assert_eq!(app.preview_status(), PreviewStatus::Hidden);

        app.upload(png_upload(16, 16, [0, 0, 0, 255]));
        assert_eq!(app.preview_status(), PreviewStatus::Loading);
    }

    #[test]
    fn end_to_end_upload_mesh_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let logo_path = dir.path().join("logo.png");
        std::fs::write(&logo_path, png_upload(2048, 2048, [255, 0, 0, 255]).bytes().unwrap())
            .unwrap();
        let mesh_path = write_shirt(dir.path());

        let (mut app, _hotkeys) = start();
        app.update(|s| {
            s.set_height(200);
            s.set_build(Build::Big);
        });
        app.begin_upload(&logo_path);
        app.begin_mesh_load(Arc::new(GltfLoader), &mesh_path);
        app.wait_for_pending();
        app.handle_key(alt_q());

        assert_eq!(app.preview_status(), PreviewStatus::Ready);
        let texture = Arc::clone(app.texture().unwrap());
        assert_eq!((texture.width(), texture.height()), (1024, 1024));

        let mesh = app.preview().mesh().unwrap();
        assert!(mesh.parts.iter().all(|p| {
            p.material.map.as_ref().is_some_and(|m| Arc::ptr_eq(m, &texture))
        }));
        let expected_scale = (200.0 / 180.0 * 1.1) as f32;
        assert!((mesh.transform.scale.x - expected_scale).abs() < 1e-6);

        let png = app.export_texture(dir.path()).unwrap().unwrap();
        assert_eq!(image::open(png).unwrap().to_rgba8(), texture.data);
        let config = app.export_config_file(dir.path()).unwrap();
        let json = std::fs::read_to_string(config).unwrap();
        assert!(json.contains("\"uploadedImage\": \"data:image/png;base64,"));
    }

    #[test]
    fn shirt_color_change_rebinds_tint_without_recompositing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _hotkeys) = start();
        app.upload(png_upload(32, 32, [0, 255, 0, 255]));
        app.begin_mesh_load(Arc::new(GltfLoader), write_shirt(dir.path()));
        app.wait_for_pending();

        let before = Arc::clone(app.texture().unwrap());
        let tint: HexColor = "#336699".parse().unwrap();
        app.update(|s| s.set_shirt_color(tint));

        assert!(Arc::ptr_eq(&before, app.texture().unwrap()));
        let part = &app.preview().mesh().unwrap().parts[0];
        assert_eq!(part.material.color, tint.to_linear());
    }

    #[test]
    fn failed_mesh_load_keeps_placeholder() {
        let (mut app, _hotkeys) = start();
        app.upload(png_upload(8, 8, [1, 2, 3, 255]));
        app.toggle_preview();
        app.begin_mesh_load(Arc::new(GltfLoader), "missing/tshirt.glb");
        app.wait_for_pending();
        assert_eq!(app.preview_status(), PreviewStatus::Loading);
    }

    #[test]
    fn failed_upload_leaves_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _hotkeys) = start();
        let first = png_upload(8, 8, [9, 9, 9, 255]);
        app.upload(first.clone());
        app.begin_upload(dir.path().join("missing.png"));
        app.wait_for_pending();
        assert_eq!(app.session().uploaded_image(), Some(&first));
    }
}
