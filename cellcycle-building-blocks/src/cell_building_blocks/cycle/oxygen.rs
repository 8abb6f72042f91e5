use cellcycle_concepts::*;

use super::durations::PhaseDurations;
use super::phase_based::{DurationStrategy, PhaseBasedCellCycleModel, PhaseState};

use serde::{Deserialize, Serialize};

/// Key under which cells store their local oxygen concentration
pub const OXYGEN_KEY: &str = "oxygen";

/// Standard deviation of the stochastic G2 duration
pub const STOCHASTIC_G2_STANDARD_DEVIATION: f64 = 1.0;

/// Oxygen dependent G1 duration and hypoxic cell death.
///
/// Each update the local oxygen concentration $c$ is read from the cell.
/// - If $c$ is below the hypoxic concentration $c_h$ the duration of the current hypoxic period
///   is tracked. Once it exceeds the critical hypoxic duration, the cell becomes
///   [apoptotic](CellLabel::Apoptotic) with probability $0.9 - 0.5\\,c/c_h$.
/// - While in G1 and below the quiescent concentration $c_q$, G1 is extended by
///   \\[
///     \left(1 - \frac{\max(c, 0)}{c_q}\right)dt.
///   \\]
///
/// Apoptotic cells are no longer updated.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SimpleOxygen {
    /// Concentration below which the cell is hypoxic
    pub hypoxic_concentration: f64,
    /// Concentration below which G1 is extended
    pub quiescent_concentration: f64,
    /// Time a cell may be hypoxic before it may become apoptotic
    pub critical_hypoxic_duration: f64,
    current_hypoxic_duration: f64,
    current_hypoxia_onset_time: f64,
}

impl SimpleOxygen {
    /// Default parameters, onset of the current hypoxic period is the current time.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            hypoxic_concentration: 0.4,
            quiescent_concentration: 1.0,
            critical_hypoxic_duration: 2.0,
            current_hypoxic_duration: 0.0,
            current_hypoxia_onset_time: clock.now(),
        }
    }

    /// Duration of the current hypoxic period
    pub fn current_hypoxic_duration(&self) -> f64 {
        self.current_hypoxic_duration
    }

    /// Overrides the duration of the current hypoxic period.
    pub fn set_current_hypoxic_duration(&mut self, current_hypoxic_duration: f64) {
        self.current_hypoxic_duration = current_hypoxic_duration;
    }

    /// Time at which the current hypoxic period started
    pub fn current_hypoxia_onset_time(&self) -> f64 {
        self.current_hypoxia_onset_time
    }

    /// Overrides the onset of the current hypoxic period.
    pub fn set_current_hypoxia_onset_time(&mut self, current_hypoxia_onset_time: f64) {
        self.current_hypoxia_onset_time = current_hypoxia_onset_time;
    }

    /// Reads the oxygen concentration stored in the cell.
    fn oxygen_concentration<Cel: CellEntity>(cell: &Cel) -> Result<f64, RequestError> {
        cell.cell_data(OXYGEN_KEY).ok_or_else(|| RequestError(format!(
            "Oxygen based cell-cycle models require the cell to carry the \"{OXYGEN_KEY}\" item"
        )))
    }

    /// Tracks the hypoxic period and decides if the cell becomes apoptotic.
    fn update_hypoxic_duration<Cel>(
        &mut self,
        oxygen_concentration: f64,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) where
        Cel: CellEntity + LabelRegistry,
    {
        let now = ctx.now();
        if oxygen_concentration < self.hypoxic_concentration {
            self.current_hypoxic_duration = now - self.current_hypoxia_onset_time;
            let probability_of_death =
                0.9 - 0.5 * (oxygen_concentration / self.hypoxic_concentration);
            if self.current_hypoxic_duration > self.critical_hypoxic_duration
                && ctx.rng.uniform_deviate() < probability_of_death
            {
                cell.add_label(CellLabel::Apoptotic);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    oxygen_concentration,
                    hypoxic_duration = self.current_hypoxic_duration,
                    "cell became apoptotic"
                );
            }
        } else {
            self.current_hypoxic_duration = 0.0;
            self.current_hypoxia_onset_time = now;
        }
    }
}

impl DurationStrategy for SimpleOxygen {
    fn is_suspended<Cel>(&self, cell: &Cel) -> bool
    where
        Cel: CellEntity + LabelRegistry,
    {
        cell.has_label(&CellLabel::Apoptotic)
    }

    fn before_phase_update<Cel>(
        &mut self,
        _state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        let oxygen_concentration = Self::oxygen_concentration(cell)?;
        self.update_hypoxic_duration(oxygen_concentration, ctx, cell);
        Ok(())
    }

    fn after_phase_update<Cel>(
        &mut self,
        state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        if state.current_phase != CellCyclePhase::G1
            || cell.proliferative_type().is_non_dividing()
        {
            return Ok(());
        }
        let oxygen_concentration = Self::oxygen_concentration(cell)?;
        if oxygen_concentration < self.quiescent_concentration {
            let extension = (1.0 - oxygen_concentration.max(0.0) / self.quiescent_concentration)
                * ctx.time_step();
            state.extend_g1_duration(extension)?;
        }
        Ok(())
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("HypoxicConcentration", self.hypoxic_concentration),
            ("QuiescentConcentration", self.quiescent_concentration),
            ("CriticalHypoxicDuration", self.critical_hypoxic_duration),
        ]
    }
}

/// [SimpleOxygen] with a randomly drawn G2 duration.
///
/// The G2 duration is drawn from $\mathcal{N}(T_{G2}, 1)$ where $T_{G2}$ is the configured G2
/// duration and floored at the minimum gap duration.
/// A fresh value is drawn whenever the model is initialised, initialised as a daughter cell or
/// reset for division.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StochasticOxygen {
    /// Underlying oxygen dependence
    pub oxygen: SimpleOxygen,
    stochastic_g2_duration: Option<f64>,
}

impl StochasticOxygen {
    /// Default oxygen parameters, no G2 duration drawn yet.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            oxygen: SimpleOxygen::new(clock),
            stochastic_g2_duration: None,
        }
    }

    /// Most recently drawn G2 duration
    pub fn stochastic_g2_duration(&self) -> Option<f64> {
        self.stochastic_g2_duration
    }

    /// Draws a new G2 duration floored at the minimum gap duration.
    fn generate_stochastic_g2_duration(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        let durations = &state.durations;
        let g2 = ctx
            .rng
            .normal_deviate(durations.g2_duration, STOCHASTIC_G2_STANDARD_DEVIATION)?;
        self.stochastic_g2_duration = Some(g2.max(durations.minimum_gap_duration));
        Ok(())
    }
}

impl DurationStrategy for StochasticOxygen {
    fn check_configuration(&self) -> Result<(), ConfigurationError> {
        match self.stochastic_g2_duration {
            Some(_) => self.oxygen.check_configuration(),
            None => Err(ConfigurationError(
                "The stochastic G2 duration has not yet been drawn. \
                Initialise the cell-cycle model before updating it."
                    .to_owned(),
            )),
        }
    }

    fn is_suspended<Cel>(&self, cell: &Cel) -> bool
    where
        Cel: CellEntity + LabelRegistry,
    {
        self.oxygen.is_suspended(cell)
    }

    fn before_phase_update<Cel>(
        &mut self,
        state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        self.oxygen.before_phase_update(state, ctx, cell)
    }

    fn after_phase_update<Cel>(
        &mut self,
        state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        self.oxygen.after_phase_update(state, ctx, cell)
    }

    fn g2_duration(&self) -> Option<f64> {
        self.stochastic_g2_duration
    }

    fn initialise(&mut self, state: &PhaseState, ctx: &mut CycleContext) -> Result<(), CycleError> {
        self.oxygen.initialise(state, ctx)?;
        self.generate_stochastic_g2_duration(state, ctx)
    }

    fn initialise_daughter_cell(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        self.oxygen.initialise_daughter_cell(state, ctx)?;
        self.generate_stochastic_g2_duration(state, ctx)
    }

    fn reset_for_division(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        self.oxygen.reset_for_division(state, ctx)?;
        self.generate_stochastic_g2_duration(state, ctx)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.oxygen.parameters()
    }
}

/// Phase based model with [SimpleOxygen]
pub type SimpleOxygenCellCycleModel = PhaseBasedCellCycleModel<SimpleOxygen>;

/// Phase based model with [StochasticOxygen]
pub type StochasticOxygenCellCycleModel = PhaseBasedCellCycleModel<StochasticOxygen>;

impl SimpleOxygenCellCycleModel {
    /// Constructs an oxygen dependent model with default oxygen parameters.
    pub fn oxygen_based(durations: PhaseDurations, clock: &dyn Clock) -> Self {
        Self::new(durations, SimpleOxygen::new(clock), clock)
    }
}

impl StochasticOxygenCellCycleModel {
    /// Constructs a stochastic oxygen dependent model with default oxygen parameters.
    /// The first G2 duration is drawn on [initialise](CellCycleModel::initialise).
    pub fn stochastic_oxygen_based(durations: PhaseDurations, clock: &dyn Clock) -> Self {
        Self::new(durations, StochasticOxygen::new(clock), clock)
    }
}
