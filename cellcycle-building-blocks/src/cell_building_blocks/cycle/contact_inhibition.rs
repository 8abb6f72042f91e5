use cellcycle_concepts::*;

use super::durations::PhaseDurations;
use super::phase_based::{DurationStrategy, PhaseBasedCellCycleModel, PhaseState};

use serde::{Deserialize, Serialize};

/// Key under which cells store their current volume
pub const VOLUME_KEY: &str = "volume";

/// Extends G1 while the cell is compressed by its neighbours.
///
/// While the model is in [CellCyclePhase::G1] and the volume $V$ of the cell is below the
/// quiescent threshold
/// \\[
///     V < V_\text{eq}\\,f_q
/// \\]
/// the G1 duration is extended by exactly one time step $dt$ such that G1 never completes while
/// the crowding persists.
/// Crowded cells carry the [CellLabel::Crowded] label which is removed at the beginning of every
/// update and only reattached when the cell is still crowded.
///
/// Both the equilibrium volume $V_\text{eq}$ and the quiescent volume fraction $f_q$ have no
/// default and must be set before the first update.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContactInhibition {
    quiescent_volume_fraction: Option<f64>,
    equilibrium_volume: Option<f64>,
    current_quiescent_onset_time: f64,
    current_quiescent_duration: f64,
}

/// Phase based model with [ContactInhibition]
pub type ContactInhibitionCellCycleModel = PhaseBasedCellCycleModel<ContactInhibition>;

impl ContactInhibition {
    /// Constructs the strategy with unset parameters. The onset of the current quiescent period
    /// is the current time.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            quiescent_volume_fraction: None,
            equilibrium_volume: None,
            current_quiescent_onset_time: clock.now(),
            current_quiescent_duration: 0.0,
        }
    }

    /// Constructs the strategy and sets both parameters.
    pub fn with_parameters(
        quiescent_volume_fraction: f64,
        equilibrium_volume: f64,
        clock: &dyn Clock,
    ) -> Self {
        let mut strategy = Self::new(clock);
        strategy.set_quiescent_volume_fraction(quiescent_volume_fraction);
        strategy.set_equilibrium_volume(equilibrium_volume);
        strategy
    }

    /// Fraction of the equilibrium volume below which the cell is quiescent
    pub fn quiescent_volume_fraction(&self) -> Option<f64> {
        self.quiescent_volume_fraction
    }

    /// Sets the quiescent volume fraction $f_q$.
    pub fn set_quiescent_volume_fraction(&mut self, quiescent_volume_fraction: f64) {
        self.quiescent_volume_fraction = Some(quiescent_volume_fraction);
    }

    /// Volume of an uncompressed cell
    pub fn equilibrium_volume(&self) -> Option<f64> {
        self.equilibrium_volume
    }

    /// Sets the equilibrium volume $V_\text{eq}$.
    pub fn set_equilibrium_volume(&mut self, equilibrium_volume: f64) {
        self.equilibrium_volume = Some(equilibrium_volume);
    }

    /// Duration of the current period of contact inhibition
    pub fn current_quiescent_duration(&self) -> f64 {
        self.current_quiescent_duration
    }

    /// Overrides the duration of the current period of contact inhibition.
    pub fn set_current_quiescent_duration(&mut self, current_quiescent_duration: f64) {
        self.current_quiescent_duration = current_quiescent_duration;
    }

    /// Time at which the current period of contact inhibition started
    pub fn current_quiescent_onset_time(&self) -> f64 {
        self.current_quiescent_onset_time
    }

    /// Overrides the onset time of the current period of contact inhibition.
    pub fn set_current_quiescent_onset_time(&mut self, current_quiescent_onset_time: f64) {
        self.current_quiescent_onset_time = current_quiescent_onset_time;
    }

    /// Volume below which the cell counts as crowded
    fn quiescent_volume(&self) -> Result<f64, ConfigurationError> {
        match (self.equilibrium_volume, self.quiescent_volume_fraction) {
            (Some(volume), Some(fraction)) => Ok(volume * fraction),
            _ => Err(ConfigurationError(
                "The quiescent volume fraction and the equilibrium volume \
                have not yet been set."
                    .to_owned(),
            )),
        }
    }
}

impl DurationStrategy for ContactInhibition {
    fn check_configuration(&self) -> Result<(), ConfigurationError> {
        self.quiescent_volume().map(|_| ())
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
        let quiescent_volume = self.quiescent_volume()?;
        let cell_volume = cell.cell_data(VOLUME_KEY).ok_or_else(|| RequestError(format!(
            "Contact inhibition requires the cell to carry the \"{VOLUME_KEY}\" item"
        )))?;

        cell.remove_label(CellLabel::Crowded);

        if state.current_phase == CellCyclePhase::G1 {
            let now = ctx.now();
            if cell_volume < quiescent_volume {
                self.current_quiescent_duration = now - self.current_quiescent_onset_time;
                state.extend_g1_duration(ctx.time_step())?;
                cell.add_label(CellLabel::Crowded);
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    cell_volume,
                    quiescent_volume,
                    quiescent_duration = self.current_quiescent_duration,
                    "cell is contact inhibited"
                );
            } else {
                self.current_quiescent_duration = 0.0;
                self.current_quiescent_onset_time = now;
            }
        }
        Ok(())
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        [
            ("QuiescentVolumeFraction", self.quiescent_volume_fraction),
            ("EquilibriumVolume", self.equilibrium_volume),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

impl ContactInhibitionCellCycleModel {
    /// Constructs a contact inhibited model with unset volume parameters.
    pub fn contact_inhibited(durations: PhaseDurations, clock: &dyn Clock) -> Self {
        Self::new(durations, ContactInhibition::new(clock), clock)
    }
}
