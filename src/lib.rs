//! tshirt-studio: print-on-demand T-shirt configurator core
//!
//! This crate holds the session state of a T-shirt configurator, bakes an
//! uploaded logo and overlay text into a garment texture, binds that texture
//! onto a garment mesh for preview, and exports the design as PNG and JSON.
//!
//! # Example
//!
//! ```
//! use tshirt_studio::{Build, Compositor, Configurator, HotkeyRegistry};
//!
//! let hotkeys = HotkeyRegistry::new();
//! let mut app = Configurator::start(Compositor::without_fonts(), &hotkeys);
//!
//! app.update(|session| {
//!     session.set_height(200);
//!     session.set_build(Build::Big);
//!     session.set_custom_text("Hello\nWorld");
//! });
//! assert!((app.session().avatar_scale() - 200.0 / 180.0 * 1.1).abs() < 1e-9);
//!
//! // Nothing is composited until an image is uploaded.
//! assert!(app.texture().is_none());
//! ```
//!
//! # Exported config
//!
//! ```
//! use tshirt_studio::{Configurable, SessionState};
//!
//! let json = SessionState::new().export_config().to_json_pretty().unwrap();
//! assert!(json.contains("\"build\": \"athletic\""));
//! ```

mod app;
mod color;
mod compositor;
mod config;
mod error;
mod export;
mod hotkey;
mod ingest;
mod mesh;
mod options;
mod preview;
mod session;
mod task;
mod texture;

pub use app::Configurator;
pub use color::HexColor;
pub use compositor::{
    CANVAS_SIZE, Compositor, Layout, LogoFit, RectF, TextLine, TextureCompositor, fit_logo,
};
pub use config::{Configurable, TshirtConfig};
pub use error::{Result, StudioError};
pub use export::{
    CONFIG_FILE_NAME, TEXTURE_FILE_NAME, export_config, export_texture, import_config,
};
pub use hotkey::{Chord, HotkeyAction, HotkeyGuard, HotkeyRegistry, KeyEvent, Modifiers};
pub use ingest::UploadedImage;
pub use mesh::{
    DEFAULT_MESH_PATH, GarmentMesh, GltfLoader, Material, MeshLoader, MeshPart, MeshTransform,
};
pub use options::{Build, FontStyle, TextSize, Theme, ThemePreset};
pub use preview::{GarmentPreview, PreviewStatus};
pub use session::{MAX_TEXT_LINES, SessionState, avatar_scale};
pub use task::{OneShot, Poll};
pub use texture::Texture;
