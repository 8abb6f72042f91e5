use cellcycle_concepts::*;

use super::durations::PhaseDurations;

use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// State which every phase based model shares independent of its [DurationStrategy].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PhaseState {
    /// Phase determined by the most recent update
    pub current_phase: CellCyclePhase,
    /// Time at which the current cycle started
    pub birth_time: f64,
    /// Configured base durations
    pub durations: PhaseDurations,
    /// Current G1 duration. Unset until the model was initialised.
    pub g1_duration: Option<f64>,
    /// Set once all phase durations have elapsed
    pub ready_to_divide: bool,
}

impl PhaseState {
    /// Returns the G1 duration or fails if the model was never initialised.
    pub fn g1_duration(&self) -> Result<f64, ConfigurationError> {
        self.g1_duration.ok_or_else(|| ConfigurationError(
            "The G1 duration has not yet been set. \
            Initialise the cell-cycle model before updating it."
                .to_owned(),
        ))
    }

    /// Extends the current G1 duration by the given amount.
    pub fn extend_g1_duration(&mut self, extension: f64) -> Result<(), ConfigurationError> {
        let g1 = self.g1_duration()?;
        self.g1_duration = Some(g1 + extension);
        Ok(())
    }

    /// Base G1 duration of the given proliferative type
    fn derive_g1_duration(&mut self, proliferative_type: ProliferativeType) {
        self.g1_duration = Some(self.durations.g1_duration_for(proliferative_type));
    }
}

/// Policy which modifies how the durations of a [PhaseBasedCellCycleModel] are computed.
///
/// All hooks have no-op defaults such that strategies only override what they change.
/// Strategies are combined by delegation: a tuple `(A, B)` of strategies is itself a strategy
/// which runs every hook of `A` before the one of `B`.
pub trait DurationStrategy: Clone {
    /// Fails if a parameter required by this strategy was never set.
    fn check_configuration(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }

    /// When `true` the update of the model is skipped entirely.
    #[allow(unused)]
    fn is_suspended<Cel>(&self, cell: &Cel) -> bool
    where
        Cel: CellEntity + LabelRegistry,
    {
        false
    }

    /// Runs before the phase is recomputed. Sees the phase of the previous update.
    #[allow(unused)]
    fn before_phase_update<Cel>(
        &mut self,
        state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        Ok(())
    }

    /// Runs after the phase was recomputed.
    #[allow(unused)]
    fn after_phase_update<Cel>(
        &mut self,
        state: &mut PhaseState,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        Ok(())
    }

    /// Overrides the configured G2 duration if `Some`.
    fn g2_duration(&self) -> Option<f64> {
        None
    }

    /// See [CellCycleModel::initialise]
    #[allow(unused)]
    fn initialise(&mut self, state: &PhaseState, ctx: &mut CycleContext) -> Result<(), CycleError> {
        Ok(())
    }

    /// See [CellCycleModel::initialise_daughter_cell]
    #[allow(unused)]
    fn initialise_daughter_cell(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        Ok(())
    }

    /// See [CellCycleModel::reset_for_division]
    #[allow(unused)]
    fn reset_for_division(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        Ok(())
    }

    /// Configured parameters of this strategy only
    fn parameters(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

/// Deterministic durations. The configured [PhaseDurations] are used as they are.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FixedDurations;

impl DurationStrategy for FixedDurations {}

impl<A, B> DurationStrategy for (A, B)
where
    A: DurationStrategy,
    B: DurationStrategy,
{
    fn check_configuration(&self) -> Result<(), ConfigurationError> {
        self.0.check_configuration()?;
        self.1.check_configuration()
    }

    fn is_suspended<Cel>(&self, cell: &Cel) -> bool
    where
        Cel: CellEntity + LabelRegistry,
    {
        self.0.is_suspended(cell) || self.1.is_suspended(cell)
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
        self.0.before_phase_update(state, ctx, cell)?;
        self.1.before_phase_update(state, ctx, cell)
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
        self.0.after_phase_update(state, ctx, cell)?;
        self.1.after_phase_update(state, ctx, cell)
    }

    fn g2_duration(&self) -> Option<f64> {
        self.1.g2_duration().or(self.0.g2_duration())
    }

    fn initialise(&mut self, state: &PhaseState, ctx: &mut CycleContext) -> Result<(), CycleError> {
        self.0.initialise(state, ctx)?;
        self.1.initialise(state, ctx)
    }

    fn initialise_daughter_cell(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        self.0.initialise_daughter_cell(state, ctx)?;
        self.1.initialise_daughter_cell(state, ctx)
    }

    fn reset_for_division(
        &mut self,
        state: &PhaseState,
        ctx: &mut CycleContext,
    ) -> Result<(), CycleError> {
        self.0.reset_for_division(state, ctx)?;
        self.1.reset_for_division(state, ctx)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        let mut parameters = self.0.parameters();
        parameters.extend(self.1.parameters());
        parameters
    }
}

/// Phase based cell-cycle model
///
/// The cell moves through the phases `M -> G1 -> S -> G2` according to its age
/// $a = t - t_\text{birth}$.
/// The phase is the first bracket for which
/// \\[
///     a < T_M,\quad a < T_M + T_{G1},\quad a < T_M + T_{G1} + T_S,\quad
///     a < T_M + T_{G1} + T_S + T_{G2}
/// \\]
/// holds.
/// If the age exceeds all brackets the phase keeps its last value. It is the responsibility of
/// the simulation driver to query [ready_to_divide](CellCycleModel::ready_to_divide) and divide
/// the cell.
/// Differentiated cells are always in [CellCyclePhase::G0].
///
/// How the durations are obtained is controlled by the [DurationStrategy] `S`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PhaseBasedCellCycleModel<S> {
    state: PhaseState,
    strategy: S,
}

/// Phase based model with fixed durations
pub type FixedPhaseCellCycleModel = PhaseBasedCellCycleModel<FixedDurations>;

impl<S> PhaseBasedCellCycleModel<S>
where
    S: DurationStrategy,
{
    /// Constructs a new model whose birth time is the current time of the clock.
    ///
    /// The model is not yet live. Call [initialise](CellCycleModel::initialise) before the first
    /// update.
    pub fn new(durations: PhaseDurations, strategy: S, clock: &dyn Clock) -> Self {
        Self {
            state: PhaseState {
                current_phase: CellCyclePhase::M,
                birth_time: clock.now(),
                durations,
                g1_duration: None,
                ready_to_divide: false,
            },
            strategy,
        }
    }

    /// Constructs a model and directly initialises it for the given cell.
    pub fn initialised<Cel>(
        durations: PhaseDurations,
        strategy: S,
        ctx: &mut CycleContext,
        cell: &Cel,
    ) -> Result<Self, CycleError>
    where
        Cel: CellEntity + LabelRegistry,
    {
        let mut model = Self::new(durations, strategy, ctx.clock);
        model.initialise(ctx, cell)?;
        Ok(model)
    }

    /// Shared state of the model
    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    /// The duration strategy
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutable access to the duration strategy, eg. to set its parameters
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Configured base durations
    pub fn durations(&self) -> &PhaseDurations {
        &self.state.durations
    }

    /// Mutable access to the configured base durations
    pub fn durations_mut(&mut self) -> &mut PhaseDurations {
        &mut self.state.durations
    }

    /// Time at which the current cycle started
    pub fn birth_time(&self) -> f64 {
        self.state.birth_time
    }

    /// Overrides the birth time, eg. to start cells at different points of their cycle.
    pub fn set_birth_time(&mut self, birth_time: f64) {
        self.state.birth_time = birth_time;
    }

    /// Sets the phase directly. Used by drivers restoring a previous state.
    pub fn set_current_phase(&mut self, phase: CellCyclePhase) {
        self.state.current_phase = phase;
    }

    /// Current G1 duration including every extension, `None` before initialisation
    pub fn g1_duration(&self) -> Option<f64> {
        self.state.g1_duration
    }

    /// Overrides the current G1 duration.
    pub fn set_g1_duration(&mut self, g1_duration: f64) {
        self.state.g1_duration = Some(g1_duration);
    }

    /// Duration of the G2 phase as used by the state machine
    pub fn g2_duration(&self) -> f64 {
        self.strategy
            .g2_duration()
            .unwrap_or(self.state.durations.g2_duration)
    }

    /// Sum of all current phase durations
    pub fn total_duration(&self) -> Result<f64, ConfigurationError> {
        let durations = &self.state.durations;
        Ok(durations.m_duration
            + self.state.g1_duration()?
            + durations.s_duration
            + self.g2_duration())
    }

    /// Checks if the model has flagged itself ready to divide.
    pub fn is_ready_to_divide(&self) -> bool {
        self.state.ready_to_divide
    }

    /// Phase determined by the most recent update
    pub fn current_phase(&self) -> CellCyclePhase {
        self.state.current_phase
    }

    /// Time elapsed since the birth time
    pub fn age(&self, clock: &dyn Clock) -> f64 {
        clock.now() - self.state.birth_time
    }

    /// Produces an independent copy of this model. See
    /// [CellCycleModel::create_cell_cycle_model].
    pub fn create_cell_cycle_model(&self) -> Self {
        self.clone()
    }

    /// Parameters of the strategy followed by the base durations
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        let mut parameters = self.strategy.parameters();
        parameters.extend(self.state.durations.parameters());
        parameters
    }

    /// Age at the given time, fails if the model was born later.
    fn age_at(&self, now: f64) -> Result<f64, InvariantError> {
        let age = now - self.state.birth_time;
        if age < 0.0 {
            return Err(InvariantError(cellcycle_concepts::format_error_message!(
                "negative cell age",
                format!(
                    "Cell-cycle model was updated at t={now} before its birth time t={}",
                    self.state.birth_time
                )
            )));
        }
        Ok(age)
    }

    /// Cumulative bracket logic
    fn update_phase_from_age<Cel>(&mut self, age: f64, cell: &Cel) -> Result<(), CycleError>
    where
        Cel: CellEntity,
    {
        if cell.proliferative_type().is_non_dividing() {
            self.state.current_phase = CellCyclePhase::G0;
            return Ok(());
        }
        let durations = &self.state.durations;
        let brackets = [
            (CellCyclePhase::M, durations.m_duration),
            (CellCyclePhase::G1, self.state.g1_duration()?),
            (CellCyclePhase::S, durations.s_duration),
            (CellCyclePhase::G2, self.g2_duration()),
        ];
        let mut threshold = 0.0;
        for (phase, duration) in brackets {
            threshold += duration;
            if age < threshold {
                self.state.current_phase = phase;
                break;
            }
        }
        Ok(())
    }
}

impl<S, Cel> CellCycleModel<Cel> for PhaseBasedCellCycleModel<S>
where
    S: DurationStrategy,
    Cel: CellEntity + LabelRegistry,
{
    fn initialise(&mut self, ctx: &mut CycleContext, cell: &Cel) -> Result<(), CycleError> {
        self.state.derive_g1_duration(cell.proliferative_type());
        self.strategy.initialise(&self.state, ctx)
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    fn update_cell_cycle_phase(
        &mut self,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError> {
        self.strategy.check_configuration()?;
        self.state.g1_duration()?;
        if self.strategy.is_suspended(cell) {
            return Ok(());
        }
        self.strategy
            .before_phase_update(&mut self.state, ctx, cell)?;
        let age = self.age_at(ctx.now())?;
        self.update_phase_from_age(age, cell)?;
        self.strategy.after_phase_update(&mut self.state, ctx, cell)
    }

    fn ready_to_divide(
        &mut self,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<bool, CycleError> {
        if self.strategy.is_suspended(cell) {
            return Ok(false);
        }
        if !self.state.ready_to_divide {
            self.update_cell_cycle_phase(ctx, cell)?;
            if self.state.current_phase != CellCyclePhase::G0
                && self.age_at(ctx.now())? >= self.total_duration()?
            {
                self.state.ready_to_divide = true;
            }
        }
        Ok(self.state.ready_to_divide)
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    fn reset_for_division(&mut self, ctx: &mut CycleContext, cell: &Cel) -> Result<(), CycleError> {
        self.state.ready_to_divide = false;
        self.state.current_phase = CellCyclePhase::M;
        self.state.birth_time = ctx.now();
        self.state.derive_g1_duration(cell.proliferative_type());
        self.strategy.reset_for_division(&self.state, ctx)
    }

    fn initialise_daughter_cell(
        &mut self,
        ctx: &mut CycleContext,
        cell: &Cel,
    ) -> Result<(), CycleError> {
        self.state.derive_g1_duration(cell.proliferative_type());
        self.strategy.initialise_daughter_cell(&self.state, ctx)
    }

    fn create_cell_cycle_model(&self) -> Self {
        PhaseBasedCellCycleModel::create_cell_cycle_model(self)
    }

    fn current_phase(&self) -> CellCyclePhase {
        PhaseBasedCellCycleModel::current_phase(self)
    }

    fn age(&self, clock: &dyn Clock) -> f64 {
        PhaseBasedCellCycleModel::age(self, clock)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        PhaseBasedCellCycleModel::parameters(self)
    }
}


#[cfg(test)]
mod test_phase_based {
    use super::test_utils::*;
    use super::*;

    fn phases_over_time(
        model: &mut FixedPhaseCellCycleModel,
        cell: &mut TestCell,
        n_steps: usize,
    ) -> Vec<CellCyclePhase> {
        let mut rng = QueuedDeviates(vec![]);
        (0..n_steps)
            .map(|n| {
                let clock = TestClock {
                    t: n as f64,
                    dt: 1.0,
                };
                let mut ctx = CycleContext::new(&clock, &mut rng);
                model.update_cell_cycle_phase(&mut ctx, cell).unwrap();
                model.current_phase()
            })
            .collect()
    }

    #[test]
    fn phase_brackets() {
        let clock = TestClock { t: 0.0, dt: 1.0 };
        let mut rng = QueuedDeviates(vec![]);
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let mut cell = TestCell::default();
        let mut model =
            FixedPhaseCellCycleModel::initialised(durations_with_g1(10.0), FixedDurations, &mut ctx, &cell)
                .unwrap();
        let phases = phases_over_time(&mut model, &mut cell, 22);
        use CellCyclePhase::*;
        for (t, phase) in phases.into_iter().enumerate() {
            let expected = match t {
                0 => M,
                1..=10 => G1,
                11..=15 => S,
                // Past the last bracket the phase is left at its last value
                _ => G2,
            };
            assert_eq!(phase, expected, "t={t}");
        }
    }

    #[test]
    fn differentiated_cells_are_in_g0() {
        let clock = TestClock { t: 3.0, dt: 1.0 };
        let mut rng = QueuedDeviates(vec![]);
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let mut cell = TestCell {
            proliferative_type: ProliferativeType::Differentiated,
            ..Default::default()
        };
        let mut model = FixedPhaseCellCycleModel::new(Default::default(), FixedDurations, &clock);
        model.set_birth_time(0.0);
        model.initialise(&mut ctx, &cell).unwrap();
        model.update_cell_cycle_phase(&mut ctx, &mut cell).unwrap();
        assert_eq!(model.current_phase(), CellCyclePhase::G0);
        assert!(!model.ready_to_divide(&mut ctx, &mut cell).unwrap());
    }

    #[test]
    fn update_before_initialise_fails() {
        let clock = TestClock { t: 0.0, dt: 1.0 };
        let mut rng = QueuedDeviates(vec![]);
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let mut cell = TestCell::default();
        let mut model = FixedPhaseCellCycleModel::new(Default::default(), FixedDurations, &clock);
        let res = model.update_cell_cycle_phase(&mut ctx, &mut cell);
        assert!(matches!(res, Err(CycleError::Configuration(_))));
    }

    #[test]
    fn negative_age_is_invariant_violation() {
        let clock = TestClock { t: 1.0, dt: 1.0 };
        let mut rng = QueuedDeviates(vec![]);
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let mut cell = TestCell::default();
        let mut model =
            FixedPhaseCellCycleModel::initialised(Default::default(), FixedDurations, &mut ctx, &cell)
                .unwrap();
        model.set_birth_time(5.0);
        let res = model.update_cell_cycle_phase(&mut ctx, &mut cell);
        assert!(matches!(res, Err(CycleError::Invariant(_))));
    }

    #[test]
    fn ready_to_divide_after_full_cycle() {
        let mut rng = QueuedDeviates(vec![]);
        let mut cell = TestCell::default();
        let clock = TestClock { t: 0.0, dt: 1.0 };
        let mut model = {
            let mut ctx = CycleContext::new(&clock, &mut rng);
            FixedPhaseCellCycleModel::initialised(durations_with_g1(10.0), FixedDurations, &mut ctx, &cell)
                .unwrap()
        };
        for n in 0..20 {
            let clock = TestClock { t: n as f64, dt: 1.0 };
            let mut ctx = CycleContext::new(&clock, &mut rng);
            assert!(!model.ready_to_divide(&mut ctx, &mut cell).unwrap());
        }
        let clock = TestClock { t: 20.0, dt: 1.0 };
        let mut ctx = CycleContext::new(&clock, &mut rng);
        assert!(model.ready_to_divide(&mut ctx, &mut cell).unwrap());
        assert_eq!(
            model.update_cycle(&mut ctx, &mut cell).unwrap(),
            Some(CycleEvent::Division)
        );

        let daughter = model.divide(&mut ctx, &cell).unwrap();
        for m in [&model, &daughter] {
            assert_eq!(m.birth_time(), 20.0);
            assert_eq!(m.current_phase(), CellCyclePhase::M);
            assert!(!m.is_ready_to_divide());
            assert_eq!(m.g1_duration(), Some(10.0));
        }
    }

    #[test]
    fn clone_does_not_alias() {
        let clock = TestClock { t: 0.0, dt: 1.0 };
        let model = FixedPhaseCellCycleModel::new(Default::default(), FixedDurations, &clock);
        let mut copy = model.create_cell_cycle_model();
        copy.set_current_phase(CellCyclePhase::S);
        copy.set_birth_time(-3.0);
        assert_eq!(model.state().current_phase, CellCyclePhase::M);
        assert_eq!(model.birth_time(), 0.0);
    }

    #[test]
    fn parameter_dump_lists_base_durations() {
        let clock = TestClock { t: 0.0, dt: 1.0 };
        let model = FixedPhaseCellCycleModel::new(Default::default(), FixedDurations, &clock);
        let parameters = model.parameters();
        let names: Vec<_> = parameters.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "StemCellG1Duration",
                "TransitCellG1Duration",
                "SDuration",
                "G2Duration",
                "MDuration",
                "MinimumGapDuration"
            ]
        );
    }
}
