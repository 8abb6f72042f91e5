//! Settings and main loop of a simulation

use core::fmt::Display;
use std::error::Error;

use cellcycle_concepts::*;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::cell::SimpleCell;
use crate::population::Population;
use crate::time::{FixedStepClock, NextTimePoint, TimeStepper};

/// Covers every error which can occur during a simulation run
#[derive(Debug)]
pub enum SimulationError {
    /// Error while updating or dividing a cell-cycle model
    Cycle(CycleError),
    /// Error related to the simulated clock
    Time(TimeError),
    /// Invalid settings
    Setup(SetupError),
    /// Error while displaying the progress bar
    Io(std::io::Error),
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SimulationError::Cycle(e) => write!(f, "{e}"),
            SimulationError::Time(e) => write!(f, "{e}"),
            SimulationError::Setup(e) => write!(f, "{e}"),
            SimulationError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SimulationError {}

macro_rules! impl_from_for_simulation_error {
    ($(($err_name:ty, $variant:ident)),+) => {
        $(
            impl From<$err_name> for SimulationError {
                fn from(value: $err_name) -> Self {
                    SimulationError::$variant(value)
                }
            }
        )+
    }
}

impl_from_for_simulation_error!(
    (CycleError, Cycle),
    (TimeError, Time),
    (SetupError, Setup),
    (std::io::Error, Io)
);

/// Settings of a simulation run.
///
/// Settings can be written by hand or read from a [RON](https://docs.rs/ron) string.
/// ```
/// # use cellcycle_core::simulation::Settings;
/// let settings = Settings::from_ron_str("(t0: 0.0, dt: 0.5, t_max: 24.0, rng_seed: 3)").unwrap();
/// assert_eq!(settings.dt, 0.5);
/// assert!(!settings.show_progressbar);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    /// Initial time
    pub t0: f64,
    /// Fixed time increment
    pub dt: f64,
    /// Final time
    pub t_max: f64,
    /// Seed of the single random stream
    pub rng_seed: u64,
    /// Display a progress bar during the run
    #[serde(default)]
    pub show_progressbar: bool,
}

impl Settings {
    /// Parses settings from a RON string.
    pub fn from_ron_str(settings: &str) -> Result<Self, SetupError> {
        ron::from_str(settings).map_err(|e| SetupError(format!("{e}")))
    }

    /// Clock at the initial time. Models should be constructed with this clock such that their
    /// birth time is the initial time.
    pub fn clock(&self) -> Result<FixedStepClock, TimeError> {
        FixedStepClock::new(self.t0, self.dt, self.t_max)
    }

    /// Random stream seeded with [Settings::rng_seed]
    pub fn rng(&self) -> rand_chacha::ChaCha8Rng {
        rand_chacha::ChaCha8Rng::seed_from_u64(self.rng_seed)
    }
}

/// Runs a complete simulation.
///
/// The models are initialised at the initial time. Afterwards the clock is advanced step by step
/// and the population is updated once per step. The observer is called after every update.
pub fn run_simulation<M, I, F>(
    settings: &Settings,
    cells: I,
    mut observer: F,
) -> Result<Population<M>, SimulationError>
where
    M: CellCycleModel<SimpleCell>,
    I: IntoIterator<Item = (SimpleCell, M)>,
    F: FnMut(&NextTimePoint, &Population<M>),
{
    let mut clock = settings.clock()?;
    let mut rng = settings.rng();
    let mut population = {
        let mut ctx = CycleContext::new(&clock, &mut rng);
        Population::new(cells, &mut ctx)?
    };
    let mut bar = match settings.show_progressbar {
        true => Some(clock.initialize_bar()?),
        false => None,
    };
    while let Some(next) = clock.advance()? {
        let mut ctx = CycleContext::new(&clock, &mut rng);
        population.update(&mut ctx)?;
        observer(&next, &population);
        if let Some(bar) = bar.as_mut() {
            clock.update_bar(bar)?;
        }
    }
    Ok(population)
}

#[cfg(test)]
mod test_settings {
    use super::*;
    use cellcycle_concepts::Clock;

    #[test]
    fn ron_settings() {
        let settings = Settings::from_ron_str(
            "(t0: 1.0, dt: 0.25, t_max: 3.0, rng_seed: 42, show_progressbar: true)",
        )
        .unwrap();
        assert_eq!(
            settings,
            Settings {
                t0: 1.0,
                dt: 0.25,
                t_max: 3.0,
                rng_seed: 42,
                show_progressbar: true,
            }
        );
        let clock = settings.clock().unwrap();
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.maximum_iterations(), 8);
    }

    #[test]
    fn missing_field() {
        let err = Settings::from_ron_str("(t0: 1.0, dt: 0.25, rng_seed: 42)").unwrap_err();
        assert!(format!("{err}").contains("t_max"));
    }

    #[test]
    fn invalid_clock() {
        let settings = Settings {
            t0: 0.0,
            dt: -1.0,
            t_max: 10.0,
            rng_seed: 0,
            show_progressbar: false,
        };
        assert!(settings.clock().is_err());
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            t0: 0.0,
            dt: 0.1,
            t_max: 10.0,
            rng_seed: 1,
            show_progressbar: false,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let settings2: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, settings2);
    }

    #[test]
    fn seeded_streams_agree() {
        let settings = Settings::from_ron_str("(t0: 0.0, dt: 1.0, t_max: 1.0, rng_seed: 5)")
            .unwrap();
        let mut rng1 = settings.rng();
        let mut rng2 = settings.rng();
        for _ in 0..10 {
            assert_eq!(rng1.uniform_deviate(), rng2.uniform_deviate());
        }
    }
}
