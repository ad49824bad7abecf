use anyhow::Result;
use clap::Parser;
use particula_core::metrics::init_logging;
use particula_lib::app::{self, ConfigSource, RunOptions};
use particula_data::{BASE_TICK, DEFAULT_PARTICLE_COUNT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (.json or .toml)
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named preset from the preset directory
    #[arg(short, long)]
    preset: Option<String>,

    #[arg(long, default_value = "presets")]
    preset_dir: PathBuf,

    /// List the presets in the preset directory and exit
    #[arg(long)]
    list_presets: bool,

    #[arg(short = 'n', long, default_value_t = DEFAULT_PARTICLE_COUNT)]
    particles: usize,

    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seed for positions and random weights
    #[arg(short, long)]
    seed: Option<u64>,

    /// Real seconds per frame fed to the noise clock
    #[arg(long, default_value_t = 1.0f32 / 60.0)]
    frame_dt: f32,

    /// Simulation seconds per tick before timeScale
    #[arg(long, default_value_t = BASE_TICK)]
    base_tick: f32,

    /// Write the effective configuration here when done
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Write the final snapshot here when done
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    if args.list_presets {
        for name in particula_io::PresetLibrary::new(&args.preset_dir).list()? {
            println!("{name}");
        }
        return Ok(());
    }

    let source = match (args.config, args.preset) {
        (Some(path), _) => ConfigSource::File(path),
        (None, Some(name)) => ConfigSource::Preset {
            name,
            dir: args.preset_dir,
        },
        (None, None) => ConfigSource::Default,
    };
    let options = RunOptions {
        source,
        particles: args.particles,
        ticks: args.ticks,
        seed: args.seed,
        frame_dt: args.frame_dt,
        base_tick: args.base_tick,
        save_config: args.save_config,
        snapshot: args.snapshot,
    };

    let report = app::run(&options)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ticks, {} particles, {:.2}s simulated, {} ms wall, max speed {:.3}",
            report.ticks, report.particles, report.elapsed, report.wall_ms, report.max_speed
        );
        println!("config {}", report.fingerprint);
    }
    Ok(())
}
