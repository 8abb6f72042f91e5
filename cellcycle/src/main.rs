use cellcycle::prelude::*;

#[cfg(feature = "tracing")]
use tracing_subscriber::{filter, prelude::*};

const DEFAULT_SETTINGS: &str = "(t0: 0.0, dt: 0.1, t_max: 100.0, rng_seed: 0)";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    {
        let stdout_log = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(stdout_log.with_filter(filter::LevelFilter::INFO))
            .init();
    }

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_ron_str(&std::fs::read_to_string(path)?)?,
        None => Settings::from_ron_str(DEFAULT_SETTINGS)?,
    };
    let clock = settings.clock()?;

    let cells = [
        ProliferativeType::Stem,
        ProliferativeType::Transit,
        ProliferativeType::Transit,
        ProliferativeType::Differentiated,
    ]
    .into_iter()
    .enumerate()
    .map(|(n, proliferative_type)| {
        let cell = SimpleCell::new(proliferative_type)
            .with_data("volume", 1.0)
            .with_data("oxygen", 1.5);
        let mut model = PhaseBasedCellCycleModel::new(
            PhaseDurations::default(),
            (
                ContactInhibition::with_parameters(0.8, 1.0, &clock),
                StochasticOxygen::new(&clock),
            ),
            &clock,
        );
        model.set_birth_time(settings.t0 - 2.0 * n as f64);
        (cell, model)
    });

    let mut n_cells = 4;
    let population = run_simulation(&settings, cells, |next, population| {
        if population.len() != n_cells {
            #[cfg(feature = "tracing")]
            tracing::info!(time = next.time, n_cells = population.len(), "cells divided");
            #[cfg(not(feature = "tracing"))]
            println!("t={:8.3} cells={}", next.time, population.len());
            n_cells = population.len();
        }
    })?;

    for (cbox, model) in population.iter() {
        println!(
            "cell {:4} parent {:>6} phase {:?} g2 {:.3}",
            cbox.identifier,
            cbox.parent
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_owned()),
            model.current_phase(),
            model.g2_duration(),
        );
    }
    Ok(())
}
