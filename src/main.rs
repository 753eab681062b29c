use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tshirt_studio::{
    Build, Compositor, Configurator, DEFAULT_MESH_PATH, FontStyle, GltfLoader, HexColor,
    HotkeyRegistry, KeyEvent, Modifiers, StudioError, Theme, avatar_scale, import_config,
};

/// Print-on-demand T-shirt configurator.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the preview scale for a height and build.
    Scale {
        #[arg(long, default_value_t = 180)]
        height: u32,
        #[arg(long, default_value = "athletic")]
        build: Build,
    },
    /// Composite the design and write custom-tshirt.png.
    Render {
        #[command(flatten)]
        design: DesignArgs,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write the session as tshirt-config.json.
    Config {
        #[command(flatten)]
        design: DesignArgs,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Load the garment mesh, bind the texture and describe the result.
    Preview {
        #[command(flatten)]
        design: DesignArgs,
        #[arg(long, default_value = DEFAULT_MESH_PATH)]
        mesh: PathBuf,
    },
}

/// Session settings shared by the design commands.
#[derive(Debug, Args)]
struct DesignArgs {
    /// Start from a saved tshirt-config.json.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Logo image to upload.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Overlay text; use \n for line breaks (at most 3 lines).
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    font: Option<FontStyle>,
    #[arg(long)]
    text_color: Option<HexColor>,
    #[arg(long)]
    shirt_color: Option<HexColor>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    weight: Option<u32>,
    #[arg(long)]
    build: Option<Build>,
    #[arg(long)]
    theme: Option<Theme>,
}

impl DesignArgs {
    /// Applies config file and flags, then waits for the image read.
    fn apply(&self, app: &mut Configurator) -> Result<(), StudioError> {
        if let Some(path) = &self.config {
            app.apply_config(&import_config(path)?);
        }

        let text = self.text.as_ref().map(|t| t.replace("\\n", "\n"));
        let accepted = app.update(|s| {
            if let Some(v) = self.height {
                s.set_height(v);
            }
            if let Some(v) = self.weight {
                s.set_weight(v);
            }
            if let Some(v) = self.build {
                s.set_build(v);
            }
            if let Some(v) = self.shirt_color {
                s.set_shirt_color(v);
            }
            if let Some(v) = self.theme {
                s.set_theme(v);
            }
            if let Some(v) = self.font {
                s.set_font_style(v);
            }
            if let Some(v) = self.text_color {
                s.set_text_color(v);
            }
            text.as_deref().is_none_or(|t| s.set_custom_text(t))
        });
        if !accepted {
            tracing::warn!("Text has more than 3 lines; keeping previous text");
        }

        if let Some(path) = &self.image {
            app.begin_upload(path);
        }
        app.wait_for_pending();
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StudioError> {
    let hotkeys = HotkeyRegistry::new();

    match cli.command {
        Command::Scale { height, build } => {
            println!("{:.4}", avatar_scale(height, build));
        }
        Command::Render { design, out_dir } => {
            let mut app = Configurator::start(Compositor::new(), &hotkeys);
            design.apply(&mut app)?;
            match app.export_texture(&out_dir)? {
                Some(path) => println!("{}", path.display()),
                None => tracing::info!("No image uploaded; nothing to render"),
            }
        }
        Command::Config { design, out_dir } => {
            let mut app = Configurator::start(Compositor::without_fonts(), &hotkeys);
            design.apply(&mut app)?;
            let path = app.export_config_file(&out_dir)?;
            println!("{}", path.display());
        }
        Command::Preview { design, mesh } => {
            let mut app = Configurator::start(Compositor::new(), &hotkeys);
            app.begin_mesh_load(Arc::new(GltfLoader), mesh);
            design.apply(&mut app)?;
            app.handle_key(KeyEvent::new('q', Modifiers::ALT));
            describe_preview(&app);
        }
    }
    Ok(())
}

fn describe_preview(app: &Configurator) {
    let session = app.session();
    let preset = session.theme().preset();
    println!("status: {:?}", app.preview_status());
    println!(
        "theme: {} ({}, {:?}, {})",
        session.theme().as_str(),
        preset.font_family,
        preset.text_size,
        preset.text_color
    );
    println!("avatar scale: {:.4}", session.avatar_scale());

    let Some(mesh) = app.preview().mesh() else {
        return;
    };
    let t = mesh.transform;
    println!("mesh: {}", mesh.source.display());
    println!("  scale: {:?}  translation: {:?}", t.scale.to_array(), t.translation.to_array());
    for part in &mesh.parts {
        let m = &part.material;
        let revision = m.map.as_ref().map(|tex| tex.revision);
        println!(
            "  {}: map={:?} roughness={} metalness={} tint=({:.3}, {:.3}, {:.3})",
            part.name, revision, m.roughness, m.metalness, m.color.red, m.color.green, m.color.blue
        );
    }
}
