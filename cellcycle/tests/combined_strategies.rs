use cellcycle::prelude::*;
use rand::SeedableRng;

type CombinedModel = PhaseBasedCellCycleModel<(ContactInhibition, StochasticOxygen)>;

fn combined(clock: &FixedStepClock) -> CombinedModel {
    let durations = PhaseDurations {
        transit_cell_g1_duration: 10.0,
        ..Default::default()
    };
    PhaseBasedCellCycleModel::new(
        durations,
        (
            ContactInhibition::with_parameters(0.8, 1.0, clock),
            StochasticOxygen::new(clock),
        ),
        clock,
    )
}

#[test]
fn hooks_of_both_strategies_apply() -> Result<(), Box<dyn std::error::Error>> {
    let mut clock = FixedStepClock::new(0.0, 1.0, 20.0)?;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
    let mut cell = SimpleCell::new(ProliferativeType::Transit)
        .with_data("volume", 1.0)
        .with_data("oxygen", 0.5);
    let mut model = combined(&clock);
    model.initialise(&mut CycleContext::new(&clock, &mut rng), &cell)?;
    assert!(model.strategy().1.stochastic_g2_duration().is_some());
    assert_eq!(
        model.g2_duration(),
        model.strategy().1.stochastic_g2_duration().unwrap()
    );

    // Enter G1, then one uncrowded step which only sees low oxygen
    for _ in 0..2 {
        clock.advance()?;
        model.update_cell_cycle_phase(&mut CycleContext::new(&clock, &mut rng), &mut cell)?;
    }
    approx::assert_relative_eq!(model.g1_duration().unwrap(), 11.0);

    // Crowding and low oxygen extend G1 together
    cell.set_data("volume", 0.5);
    clock.advance()?;
    model.update_cell_cycle_phase(&mut CycleContext::new(&clock, &mut rng), &mut cell)?;
    approx::assert_relative_eq!(model.g1_duration().unwrap(), 12.5);
    assert!(cell.has_label(&CellLabel::Crowded));
    assert_eq!(model.current_phase(), CellCyclePhase::G1);
    Ok(())
}

#[test]
fn parameters_are_concatenated() {
    let clock = FixedStepClock::new(0.0, 1.0, 1.0).unwrap();
    let names: Vec<_> = combined(&clock)
        .parameters()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        vec![
            "QuiescentVolumeFraction",
            "EquilibriumVolume",
            "HypoxicConcentration",
            "QuiescentConcentration",
            "CriticalHypoxicDuration",
            "StemCellG1Duration",
            "TransitCellG1Duration",
            "SDuration",
            "G2Duration",
            "MDuration",
            "MinimumGapDuration",
        ]
    );
}

#[test]
fn differentiated_cells_never_divide() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_ron_str("(t0: 0.0, dt: 1.0, t_max: 100.0, rng_seed: 0)")?;
    let clock = settings.clock()?;
    let cell = SimpleCell::new(ProliferativeType::Differentiated)
        .with_data("volume", 1.0)
        .with_data("oxygen", 2.0);
    let population = run_simulation(&settings, [(cell, combined(&clock))], |_, population| {
        for (_, model) in population.iter() {
            assert_eq!(model.current_phase(), CellCyclePhase::G0);
        }
    })?;
    assert_eq!(population.len(), 1);
    Ok(())
}
