use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use headrig_common::{ConfigOverrides, RigConfig};
use headrig_render::{DebugTextRenderer, RenderView, Renderer};
use headrig_rig::Rig;
use headrig_tools::RigInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "headrig-cli", about = "Camera ring layout around a head")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Rig config file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of cameras on the ring
    #[arg(long, global = true)]
    cameras: Option<usize>,

    /// Ring radius in meters
    #[arg(long, global = true)]
    radius: Option<f32>,

    /// Ring elevation in degrees
    #[arg(long, global = true, allow_negative_numbers = true)]
    elevation: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the camera positions
    Layout {
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print head mesh statistics
    Mesh,
    /// Print a text rendering of the plot
    Render,
    /// Summarise the rig, or one camera with --index
    Inspect {
        #[arg(short, long)]
        index: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            camera_count: self.cameras,
            radius: self.radius,
            elevation_deg: self.elevation,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    print!("{}", run(&cli)?);
    Ok(())
}

/// Execute the selected command and return what it prints.
fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut out = String::new();

    if let Commands::Info = cli.command {
        writeln!(out, "headrig-cli v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "render: {}", headrig_render::crate_info())?;
        writeln!(out, "tools: {}", headrig_tools::crate_info())?;
        return Ok(out);
    }

    let config = RigConfig::resolve(cli.config.as_deref(), cli.overrides())?;
    tracing::debug!(?config, "resolved rig config");
    let rig = Rig::build(config)?;

    match cli.command {
        Commands::Info => {}
        Commands::Layout { format } => match format {
            Format::Text => {
                for info in RigInspector::list_cameras(&rig) {
                    writeln!(out, "{info}")?;
                }
            }
            Format::Json => {
                let layout = RigInspector::layout(&rig);
                writeln!(out, "{}", serde_json::to_string_pretty(&layout)?)?;
            }
        },
        Commands::Mesh => {
            let head = rig.head();
            writeln!(
                out,
                "Head: radius={:.3} m grid={}x{} points={} triangles={} max_radius_error={:.2e}",
                head.radius(),
                head.rows(),
                head.cols(),
                head.points().len(),
                head.triangle_indices().len() / 3,
                head.max_radius_error()
            )?;
        }
        Commands::Render => {
            let view = RenderView::for_rig(&rig);
            out.push_str(&DebugTextRenderer::new().render(&rig, &view));
        }
        Commands::Inspect { index } => match index {
            Some(i) => writeln!(out, "{}", RigInspector::inspect_camera(&rig, i)?)?,
            None => writeln!(out, "{}", RigInspector::summary(&rig))?,
        },
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "headrig-cli",
            "layout",
            "--cameras",
            "8",
            "--elevation",
            "-15",
        ])
        .unwrap();
        let o = cli.overrides();
        assert_eq!(o.camera_count, Some(8));
        assert_eq!(o.elevation_deg, Some(-15.0));
        assert_eq!(o.radius, None);
    }

    #[test]
    fn layout_format_defaults_to_text() {
        let cli = Cli::try_parse_from(["headrig-cli", "layout"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Layout {
                format: Format::Text
            }
        ));
    }

    #[test]
    fn inspect_index_parses() {
        let cli = Cli::try_parse_from(["headrig-cli", "inspect", "--index", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { index: Some(3) }));
    }

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let mut argv = vec!["headrig-cli"];
        argv.extend_from_slice(args);
        run(&Cli::try_parse_from(argv)?)
    }

    #[test]
    fn verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["headrig-cli", "layout", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn info_lists_crates() {
        let out = run_args(&["info"]).unwrap();
        assert!(out.starts_with("headrig-cli v"));
        assert!(out.contains("render: headrig-render"));
        assert!(out.contains("tools: headrig-tools"));
    }

    #[test]
    fn layout_text_prints_one_line_per_camera() {
        let out = run_args(&["layout"]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("Camera [00]"));
        assert!(lines[11].starts_with("Camera [11]"));
    }

    #[test]
    fn layout_json_has_flat_entries() {
        let out = run_args(&["layout", "--format", "json", "--cameras", "4"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry["index"], i);
            for key in ["azimuth_deg", "x", "y", "z"] {
                assert!(entry[key].is_number(), "missing {key}");
            }
            assert!(entry.get("position").is_none());
        }
        assert!((entries[1]["azimuth_deg"].as_f64().unwrap() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn mesh_reports_triangles() {
        let out = run_args(&["mesh"]).unwrap();
        assert!(out.contains("grid=50x50"));
        assert!(out.contains("points=2500"));
        assert!(out.contains("triangles=4802"));
    }

    #[test]
    fn render_prints_title() {
        let out = run_args(&["render"]).unwrap();
        assert!(out.contains("Camera Placement Around Head"));
        assert!(out.contains("Cameras: 12"));
    }

    #[test]
    fn inspect_summary_and_camera() {
        assert!(run_args(&["inspect"]).unwrap().contains("cameras=12"));
        let cam = run_args(&["inspect", "--index", "3"]).unwrap();
        assert!(cam.starts_with("Camera [03]"));
    }

    #[test]
    fn inspect_out_of_range_is_error() {
        let err = run_args(&["inspect", "--index", "12"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<headrig_common::RigError>(),
            Some(headrig_common::RigError::CameraIndexOutOfRange { index: 12, count: 12 })
        ));
    }

    #[test]
    fn invalid_radius_is_error() {
        assert!(run_args(&["layout", "--radius", "0"]).is_err());
    }
}
