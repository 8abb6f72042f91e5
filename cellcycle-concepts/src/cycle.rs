use crate::cell::{CellEntity, CellLabel, LabelRegistry};
use crate::errors::{CycleError, DivisionError};
use crate::random::RandomStream;
use crate::time::Clock;

use serde::{Deserialize, Serialize};

/// Phases of the cell division cycle.
///
/// Proliferating cells move through `M -> G1 -> S -> G2` and restart in `M` after division.
/// [CellCyclePhase::G0] is only entered when the proliferative type of the cell overrides the
/// normal progression.
#[derive(Clone, Copy, Debug, Default, Deserialize, Hash, PartialEq, Eq, Serialize)]
pub enum CellCyclePhase {
    /// Quiescent, non-dividing
    G0,
    /// Mitosis
    #[default]
    M,
    /// First gap phase
    G1,
    /// DNA synthesis
    S,
    /// Second gap phase
    G2,
}

/// Events of the cell cycle which need to be communicated to the simulation driver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CycleEvent {
    /// The cumulative phase durations have elapsed and the cell should be divided by calling
    /// [CellCycleModel::divide].
    Division,
}

/// Services a cell-cycle model consults while it is updated.
///
/// Instead of reaching for process-wide instances, every operation receives the clock and the
/// single random stream explicitly.
pub struct CycleContext<'a> {
    /// Read-only simulated clock
    pub clock: &'a dyn Clock,
    /// Random stream shared by all cells in iteration order
    pub rng: &'a mut dyn RandomStream,
}

impl<'a> CycleContext<'a> {
    /// Bundles clock and random stream.
    pub fn new(clock: &'a dyn Clock, rng: &'a mut dyn RandomStream) -> Self {
        Self { clock, rng }
    }

    /// Shortcut for [Clock::now]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Shortcut for [Clock::time_step]
    pub fn time_step(&self) -> f64 {
        self.clock.time_step()
    }
}

/// Phase based cell-cycle model of a single cell.
///
/// The lifecycle of a model is
/// 1. construction (possibly before the model is live),
/// 2. [initialise](CellCycleModel::initialise) once it starts simulating,
/// 3. one [update_cell_cycle_phase](CellCycleModel::update_cell_cycle_phase) per step,
/// 4. [divide](CellCycleModel::divide) when [ready_to_divide](CellCycleModel::ready_to_divide)
///    returns `true`.
pub trait CellCycleModel<Cel>: Clone
where
    Cel: CellEntity + LabelRegistry,
{
    /// Called once when the model begins actively simulating.
    fn initialise(&mut self, ctx: &mut CycleContext, cell: &Cel) -> Result<(), CycleError>;

    /// Advances or holds the current phase. Must be called once per simulated step.
    fn update_cell_cycle_phase(
        &mut self,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<(), CycleError>;

    /// Updates the phase and checks if all phase durations have elapsed.
    fn ready_to_divide(&mut self, ctx: &mut CycleContext, cell: &mut Cel)
    -> Result<bool, CycleError>;

    /// Prepares the model of the parent cell for its second life after division.
    fn reset_for_division(&mut self, ctx: &mut CycleContext, cell: &Cel) -> Result<(), CycleError>;

    /// Called on the freshly copied model of the new daughter cell.
    fn initialise_daughter_cell(
        &mut self,
        ctx: &mut CycleContext,
        cell: &Cel,
    ) -> Result<(), CycleError>;

    /// Produces an independent copy of this model.
    fn create_cell_cycle_model(&self) -> Self {
        self.clone()
    }

    /// Phase determined by the most recent update
    fn current_phase(&self) -> CellCyclePhase;

    /// Time elapsed since the birth time of this model
    fn age(&self, clock: &dyn Clock) -> f64;

    /// Ordered list of every configured parameter, consumed by result writers.
    fn parameters(&self) -> Vec<(&'static str, f64)>;

    /// Performs the division protocol.
    ///
    /// The model of the parent is reset and then copied for the daughter which is initialised
    /// independently. Returns the model of the daughter.
    /// Apoptotic cells can not divide and leave the model untouched.
    fn divide(&mut self, ctx: &mut CycleContext, cell: &Cel) -> Result<Self, CycleError> {
        if cell.has_label(&CellLabel::Apoptotic) {
            return Err(DivisionError(format!(
                "Cannot divide an apoptotic cell at t={}",
                ctx.now()
            ))
            .into());
        }
        self.reset_for_division(ctx, cell)?;
        let mut daughter = self.create_cell_cycle_model();
        daughter.initialise_daughter_cell(ctx, cell)?;
        Ok(daughter)
    }

    /// Combines [ready_to_divide](CellCycleModel::ready_to_divide) into the
    /// [CycleEvent] which is handed to the simulation driver.
    fn update_cycle(
        &mut self,
        ctx: &mut CycleContext,
        cell: &mut Cel,
    ) -> Result<Option<CycleEvent>, CycleError> {
        Ok(match self.ready_to_divide(ctx, cell)? {
            true => Some(CycleEvent::Division),
            false => None,
        })
    }
}
