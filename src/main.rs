use clap::Parser;
use neural_field::{Engine, FieldConfig, HeadlessHost, RecordingSurface, Surface, Viewport};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;

mod cli;
mod loader;
mod preview;
mod server;
mod snapshot;

use cli::{Cli, Commands, FieldArgs};
use snapshot::{BACKGROUND, SvgSurface};

/// Statistics gathered over a headless run
#[derive(Debug, Default, PartialEq)]
struct RunReport {
    frames: usize,
    particles: usize,
    out_of_bounds: usize,
    max_connections: usize,
    total_connections: usize,
}

impl RunReport {
    fn mean_connections(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_connections as f64 / self.frames as f64
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("neural_field={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn rng_for(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Mount a headless host for the given arguments
fn mount<S: Surface>(
    args: &FieldArgs,
    config: FieldConfig,
    surface: S,
) -> anyhow::Result<HeadlessHost<S, SmallRng>> {
    let viewport = Viewport::new(args.width, args.height);
    if !viewport.is_drawable() {
        anyhow::bail!(
            "Viewport must have a positive size, got {}x{}",
            args.width,
            args.height
        );
    }

    let mut host = HeadlessHost::new(Engine::new(config, surface, rng_for(args.seed)));
    host.mount(viewport);
    if let Some(cursor) = args.cursor {
        host.pointer_move(cursor.x, cursor.y);
    }
    Ok(host)
}

/// Run `steps` frames, collecting statistics along the way
fn run<S: Surface>(host: &mut HeadlessHost<S, SmallRng>, steps: usize) -> RunReport {
    let mut report = RunReport::default();

    for _ in 0..steps {
        if !host.tick() {
            break;
        }
        let connections = host.engine().field().connections().len();
        report.frames += 1;
        report.total_connections += connections;
        report.max_connections = report.max_connections.max(connections);
    }

    let engine = host.engine();
    let viewport = engine.stage().viewport;
    report.particles = engine.field().particles().len();
    report.out_of_bounds = engine
        .field()
        .particles()
        .iter()
        .filter(|p| !viewport.contains(p.position))
        .count();
    report
}

fn simulate(args: &FieldArgs, steps: usize) -> anyhow::Result<()> {
    let config = loader::load_config(args.config.as_deref())?;
    let mut host = mount(args, config, RecordingSurface::new())?;

    let report = run(&mut host, steps);
    host.unmount();

    println!("frames: {}", report.frames);
    println!("particles: {}", report.particles);
    println!("out of bounds: {}", report.out_of_bounds);
    println!(
        "connections: {} max, {:.1} mean",
        report.max_connections,
        report.mean_connections()
    );
    Ok(())
}

fn snapshot(args: &FieldArgs, steps: usize, output: &std::path::Path) -> anyhow::Result<()> {
    let config = loader::load_config(args.config.as_deref())?;
    let mut host = mount(args, config, SvgSurface::new(BACKGROUND))?;

    let report = run(&mut host, steps.max(1));
    host.engine().surface().write(output)?;
    host.unmount();

    println!(
        "Wrote frame {} ({} particles, {} connections) to {}",
        report.frames,
        report.particles,
        host.engine().field().connections().len(),
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate { field, steps } => simulate(&field, steps)?,
        Commands::Snapshot {
            field,
            steps,
            output,
        } => snapshot(&field, steps, &output)?,
        Commands::Preview {
            config,
            output,
            pkg,
            title,
        } => {
            let field_config = loader::load_config(config.as_deref())?;
            preview::write_preview(&field_config, &title, &output, pkg.as_deref())?;
            println!("Generated preview in {}", output.display());
        }
        Commands::Serve {
            config,
            output,
            pkg,
            title,
            port,
        } => {
            let source = server::PreviewSource {
                config,
                output,
                pkg,
                title,
            };
            server::serve(source, port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::Point;

    fn args() -> FieldArgs {
        FieldArgs {
            config: None,
            width: 800.0,
            height: 600.0,
            seed: Some(1),
            cursor: None,
        }
    }

    #[test]
    fn run_reports_every_frame() {
        let mut host = mount(&args(), FieldConfig::default(), RecordingSurface::new()).unwrap();
        let report = run(&mut host, 50);

        assert_eq!(report.frames, 50);
        assert_eq!(report.particles, 60);
        assert!(report.max_connections as f64 >= report.mean_connections());
    }

    #[test]
    fn run_stops_after_unmount() {
        let mut host = mount(&args(), FieldConfig::default(), RecordingSurface::new()).unwrap();
        host.unmount();

        assert_eq!(run(&mut host, 10).frames, 0);
    }

    #[test]
    fn cursor_argument_reaches_stage() {
        let args = FieldArgs {
            cursor: Some(Point { x: 400.0, y: 300.0 }),
            ..args()
        };
        let host = mount(&args, FieldConfig::default(), RecordingSurface::new()).unwrap();

        assert_eq!(
            host.engine().stage().cursor.position,
            Some(neural_field::Vec2::new(400.0, 300.0))
        );
    }

    #[test]
    fn empty_viewport_rejected() {
        let args = FieldArgs {
            width: 0.0,
            ..args()
        };
        assert!(mount(&args, FieldConfig::default(), RecordingSurface::new()).is_err());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = mount(&args(), FieldConfig::default(), RecordingSurface::new()).unwrap();
        let mut b = mount(&args(), FieldConfig::default(), RecordingSurface::new()).unwrap();

        assert_eq!(run(&mut a, 25), run(&mut b, 25));
        assert_eq!(
            a.engine().field().particles(),
            b.engine().field().particles()
        );
    }
}
