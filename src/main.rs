use std::error::Error;

use trusscheck::{render_summary, run_analysis, AnalysisConfig, LoadCase, Preset, WoodSpecies};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn Error>> {
    // Solver diagnostics go to stderr; RUST_LOG=trusscheck=debug shows every joint.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trusscheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // The King Post is the simplest triangulated roof truss: two rafters, a
    // bottom chord and a central vertical.
    // See: https://en.wikipedia.org/wiki/King_post
    let truss = Preset::KingPost.build()?;

    // Roof loads in psf and a No. 2 grade material. Every member is a 2x4.
    let loads = LoadCase::default();
    let material = WoodSpecies::SprucePineFir.material();

    // Solve joint equilibrium, then check stresses and deflection against L/240.
    let report = run_analysis(&truss, &loads, &material, truss.span(), &AnalysisConfig::default());

    println!("{}", render_summary(&truss, &report));

    Ok(())
}
