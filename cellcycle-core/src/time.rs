//! Controls how the simulation time is advanced

use kdam::BarExt;
use serde::{Deserialize, Serialize};

use cellcycle_concepts::{Clock, TimeError};

/// Represents the next time point which is returned by the [TimeStepper::advance] method.
#[derive(Clone, Debug, PartialEq)]
pub struct NextTimePoint {
    /// Time increment $dt$
    pub increment: f64,
    /// Time value $t$
    pub time: f64,
    /// Current iteration
    pub iteration: usize,
}

/// Increments time of the simulation
pub trait TimeStepper {
    /// Advances the time stepper to the next time point.
    /// Returns `None` once the final time point was reached.
    #[must_use]
    fn advance(&mut self) -> Result<Option<NextTimePoint>, TimeError>;

    /// Creates a bar that tracks the simulation progress
    fn initialize_bar(&self) -> Result<kdam::Bar, TimeError>;

    /// Update a given bar to show the current simulation state
    fn update_bar(&self, bar: &mut kdam::Bar) -> Result<(), std::io::Error>;
}

/// Simulated clock with a fixed step size
///
/// The time value is always computed from the initial time and the number of iterations
/// $t = t_0 + n\\,dt$ such that no rounding errors accumulate.
/// ```
/// # use cellcycle_core::time::*;
/// # use cellcycle_concepts::Clock;
/// let mut clock = FixedStepClock::new(0.0, 0.5, 2.0).unwrap();
/// assert_eq!(clock.now(), 0.0);
/// let next = clock.advance().unwrap().unwrap();
/// assert_eq!(next.time, 0.5);
/// assert_eq!(clock.now(), 0.5);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FixedStepClock {
    dt: f64,
    t0: f64,
    current_time: f64,
    current_iteration: usize,
    maximum_iterations: usize,
}

impl FixedStepClock {
    /// Construct the clock from initial time, increment and final time.
    pub fn new(t0: f64, dt: f64, t_max: f64) -> Result<Self, TimeError> {
        if !(dt > 0.0) {
            return Err(TimeError(format!(
                "Invalid time configuration! Time increment dt={dt} must be positive."
            )));
        }
        if t_max < t0 {
            return Err(TimeError(format!(
                "Invalid time configuration! Final time t_max={t_max} is before \
                starting time t0={t0}."
            )));
        }
        let maximum_iterations = ((t_max - t0) / dt).round();
        if !maximum_iterations.is_finite() || maximum_iterations > usize::MAX as f64 {
            return Err(TimeError(
                "An error in casting of float type to usize occurred".to_owned(),
            ));
        }
        Ok(Self {
            dt,
            t0,
            current_time: t0,
            current_iteration: 0,
            maximum_iterations: maximum_iterations as usize,
        })
    }

    /// Number of steps the clock performs until it stops
    pub fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    /// Number of steps performed so far
    pub fn current_iteration(&self) -> usize {
        self.current_iteration
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> f64 {
        self.current_time
    }

    fn time_step(&self) -> f64 {
        self.dt
    }
}

impl TimeStepper for FixedStepClock {
    fn advance(&mut self) -> Result<Option<NextTimePoint>, TimeError> {
        if self.current_iteration >= self.maximum_iterations {
            return Ok(None);
        }
        self.current_iteration += 1;
        self.current_time = self.t0 + self.current_iteration as f64 * self.dt;
        Ok(Some(NextTimePoint {
            increment: self.dt,
            time: self.current_time,
            iteration: self.current_iteration,
        }))
    }

    fn initialize_bar(&self) -> Result<kdam::Bar, TimeError> {
        Ok(kdam::BarBuilder::default()
            .total(self.maximum_iterations)
            .dynamic_ncols(true)
            .build()?)
    }

    fn update_bar(&self, bar: &mut kdam::Bar) -> Result<(), std::io::Error> {
        let _ = bar.update(1)?;
        Ok(())
    }
}
