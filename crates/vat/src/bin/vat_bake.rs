//! Bake a scene dump into a vertex animation texture.
//!
//! Run: `cargo run -p vat --bin vat-bake -- walk_cycle.json -o walk_cycle.exr`
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;
use vat::emit::verify_exr;
use vat::{BakeOptions, CancelToken, ExportSettings, NormalSpace, SceneDump, export};

#[derive(Parser)]
#[command(name = "vat-bake")]
#[command(about = "Bake per-vertex animation into an OpenEXR vertex animation texture")]
struct Cli {
    /// Scene dump (JSON) written by the host application
    scene: PathBuf,

    /// Output texture; `.exr` is appended when missing
    #[arg(short, long, default_value = "VAT.exr")]
    output: PathBuf,

    /// Leave the packed normal channel at zero
    #[arg(long)]
    no_normal: bool,

    /// Log every vertex of every frame
    #[arg(long)]
    print_result: bool,

    /// How normals are encoded into the fourth channel
    #[arg(long, value_enum, default_value_t = Space::Object)]
    normal_space: Space,

    /// First frame to bake (defaults to the scene's start)
    #[arg(long, allow_negative_numbers = true)]
    start: Option<i32>,

    /// Last frame to bake (defaults to the scene's end)
    #[arg(long, allow_negative_numbers = true)]
    end: Option<i32>,

    /// Read the texture back and compare it bit-for-bit with the bake
    #[arg(long)]
    verify: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Space {
    Object,
    Tangent,
}

impl From<Space> for NormalSpace {
    fn from(space: Space) -> Self {
        match space {
            Space::Object => NormalSpace::Object,
            Space::Tangent => NormalSpace::Tangent,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> vat::Result<()> {
    let scene = SceneDump::from_path(&cli.scene)?;
    let settings = ExportSettings {
        bake: BakeOptions {
            export_normal: !cli.no_normal,
            print_diagnostics: cli.print_result,
            normal_space: cli.normal_space.into(),
        },
        start: cli.start,
        end: cli.end,
    };

    let summary = export(&scene, &cli.output, &settings, &CancelToken::new())?;
    let (start, end) = settings.frame_range(&scene);
    println!(
        "Wrote {}x{} texture (frames {start}..={end}) to {}",
        summary.buffer.width(),
        summary.buffer.height(),
        summary.path.display()
    );

    if cli.verify {
        verify_exr(&summary.buffer, &summary.path)?;
        println!("Verified {}", summary.path.display());
    }
    Ok(())
}
