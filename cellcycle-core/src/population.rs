//! Sequential driver which owns cells and their cell-cycle models

use cellcycle_concepts::*;
use serde::{Deserialize, Serialize};

use crate::cell::SimpleCell;
use crate::simulation::SimulationError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Wrapper around a cell which provides a unique identifier and the identifier of its parent.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CellBox<C> {
    /// Unique identifier within the population
    pub identifier: u64,
    /// Identifier of the parent cell if this cell was created by division
    pub parent: Option<u64>,
    /// The cell which is encapsulated by this box
    pub cell: C,
}

/// Record of a division which happened during one update of a [Population].
#[derive(Clone, Debug, PartialEq)]
pub struct DivisionRecord {
    /// Identifier of the dividing cell
    pub parent: u64,
    /// Identifier of the newly created cell
    pub daughter: u64,
    /// Time of the division
    pub time: f64,
}

/// Collection of cells with one cell-cycle model each.
///
/// Cells are visited sequentially in insertion order. Every visit updates the model of the cell
/// and divides the cell if the model reports [CycleEvent::Division]. Daughter cells are appended
/// after all existing cells were visited and are first updated in the next step.
/// Daughters copy data and labels of their parent except for [CellLabel::Crowded].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Population<M> {
    cells: Vec<(CellBox<SimpleCell>, M)>,
    id_counter: u64,
}

impl<M> Population<M>
where
    M: CellCycleModel<SimpleCell>,
{
    /// Inserts the cells and initialises their models.
    pub fn new<I>(cells: I, ctx: &mut CycleContext) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (SimpleCell, M)>,
    {
        let mut population = Self {
            cells: Vec::new(),
            id_counter: 0,
        };
        for (cell, model) in cells {
            population.insert(cell, model, ctx)?;
        }
        Ok(population)
    }

    /// Initialises the model and adds the cell. Returns the identifier of the new cell.
    pub fn insert(
        &mut self,
        cell: SimpleCell,
        mut model: M,
        ctx: &mut CycleContext,
    ) -> Result<u64, SimulationError> {
        model.initialise(ctx, &cell)?;
        Ok(self.push(cell, model, None))
    }

    fn push(&mut self, cell: SimpleCell, model: M, parent: Option<u64>) -> u64 {
        let identifier = self.id_counter;
        self.id_counter += 1;
        self.cells.push((
            CellBox {
                identifier,
                parent,
                cell,
            },
            model,
        ));
        identifier
    }

    /// Updates every cell once and performs all divisions.
    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    pub fn update(&mut self, ctx: &mut CycleContext) -> Result<Vec<DivisionRecord>, SimulationError> {
        let mut new_cells = Vec::new();
        for (cbox, model) in self.cells.iter_mut() {
            match model.update_cycle(ctx, &mut cbox.cell)? {
                Some(CycleEvent::Division) => {
                    let daughter_model = model.divide(ctx, &cbox.cell)?;
                    let mut daughter = cbox.cell.clone();
                    // Set again by the first update of the daughter if it is still crowded
                    daughter.remove_label(CellLabel::Crowded);
                    new_cells.push((daughter, daughter_model, cbox.identifier));
                }
                None => (),
            }
        }
        let time = ctx.now();
        let divisions: Vec<_> = new_cells
            .into_iter()
            .map(|(cell, model, parent)| DivisionRecord {
                parent,
                daughter: self.push(cell, model, Some(parent)),
                time,
            })
            .collect();
        #[cfg(feature = "tracing")]
        if !divisions.is_empty() {
            tracing::debug!(n_divisions = divisions.len(), time, "cells divided");
        }
        Ok(divisions)
    }

    /// Iterates over all cells and their models
    pub fn iter(&self) -> impl Iterator<Item = &(CellBox<SimpleCell>, M)> {
        self.cells.iter()
    }

    /// Mutable iteration, eg. to write new data items into cells
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (CellBox<SimpleCell>, M)> {
        self.cells.iter_mut()
    }

    /// Look up a cell by its identifier.
    pub fn get(&self, identifier: u64) -> Option<&(CellBox<SimpleCell>, M)> {
        self.cells
            .iter()
            .find(|(cbox, _)| cbox.identifier == identifier)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if the population contains no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod test_population {
    use super::*;
    use crate::time::{FixedStepClock, TimeStepper};
    use rand::SeedableRng;

    /// Divides every `period` time units and counts its initialisations.
    #[derive(Clone, Debug, Deserialize, Serialize)]
    struct PeriodicModel {
        period: f64,
        birth_time: f64,
        daughter_initialisations: usize,
    }

    impl CellCycleModel<SimpleCell> for PeriodicModel {
        fn initialise(&mut self, ctx: &mut CycleContext, _: &SimpleCell) -> Result<(), CycleError> {
            self.birth_time = ctx.now();
            Ok(())
        }

        fn update_cell_cycle_phase(
            &mut self,
            _: &mut CycleContext,
            _: &mut SimpleCell,
        ) -> Result<(), CycleError> {
            Ok(())
        }

        fn ready_to_divide(
            &mut self,
            ctx: &mut CycleContext,
            _: &mut SimpleCell,
        ) -> Result<bool, CycleError> {
            Ok(ctx.now() - self.birth_time >= self.period)
        }

        fn reset_for_division(
            &mut self,
            ctx: &mut CycleContext,
            _: &SimpleCell,
        ) -> Result<(), CycleError> {
            self.birth_time = ctx.now();
            Ok(())
        }

        fn initialise_daughter_cell(
            &mut self,
            _: &mut CycleContext,
            _: &SimpleCell,
        ) -> Result<(), CycleError> {
            self.daughter_initialisations += 1;
            Ok(())
        }

        fn current_phase(&self) -> CellCyclePhase {
            CellCyclePhase::M
        }

        fn age(&self, clock: &dyn Clock) -> f64 {
            clock.now() - self.birth_time
        }

        fn parameters(&self) -> Vec<(&'static str, f64)> {
            vec![("Period", self.period)]
        }
    }

    fn periodic(period: f64) -> PeriodicModel {
        PeriodicModel {
            period,
            birth_time: f64::NAN,
            daughter_initialisations: 0,
        }
    }

    #[test]
    fn population_doubles() {
        let mut clock = FixedStepClock::new(0.0, 1.0, 4.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let mut population = {
            let mut ctx = CycleContext::new(&clock, &mut rng);
            Population::new(
                vec![(SimpleCell::new(ProliferativeType::Stem), periodic(2.0))],
                &mut ctx,
            )
            .unwrap()
        };
        let mut n_divisions = Vec::new();
        while clock.advance().unwrap().is_some() {
            let mut ctx = CycleContext::new(&clock, &mut rng);
            n_divisions.push(population.update(&mut ctx).unwrap().len());
        }
        assert_eq!(n_divisions, vec![0, 1, 0, 2]);
        assert_eq!(population.len(), 4);
    }

    #[test]
    fn daughters_are_appended_with_parent() {
        let mut clock = FixedStepClock::new(0.0, 1.0, 1.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let cells = vec![
            (SimpleCell::new(ProliferativeType::Stem), periodic(10.0)),
            (
                SimpleCell::new(ProliferativeType::Transit).with_data("volume", 0.5),
                periodic(1.0),
            ),
        ];
        let mut population = {
            let mut ctx = CycleContext::new(&clock, &mut rng);
            Population::new(cells, &mut ctx).unwrap()
        };
        clock.advance().unwrap();
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let divisions = population.update(&mut ctx).unwrap();
        assert_eq!(
            divisions,
            vec![DivisionRecord {
                parent: 1,
                daughter: 2,
                time: 1.0
            }]
        );
        let (daughter_box, daughter_model) = population.get(2).unwrap();
        assert_eq!(daughter_box.parent, Some(1));
        assert_eq!(daughter_box.cell.cell_data("volume"), Some(0.5));
        assert_eq!(daughter_model.daughter_initialisations, 1);
        assert_eq!(daughter_model.birth_time, 1.0);
        let (_, parent_model) = population.get(1).unwrap();
        assert_eq!(parent_model.daughter_initialisations, 0);
    }

    #[test]
    fn daughters_are_not_born_crowded() {
        let mut clock = FixedStepClock::new(0.0, 1.0, 1.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let mut cell = SimpleCell::new(ProliferativeType::Transit).with_data("volume", 0.3);
        cell.add_label(CellLabel::Crowded);
        let mut population = {
            let mut ctx = CycleContext::new(&clock, &mut rng);
            Population::new([(cell, periodic(1.0))], &mut ctx).unwrap()
        };
        clock.advance().unwrap();
        let mut ctx = CycleContext::new(&clock, &mut rng);
        assert_eq!(population.update(&mut ctx).unwrap().len(), 1);
        let (parent, _) = population.get(0).unwrap();
        let (daughter, _) = population.get(1).unwrap();
        assert!(parent.cell.has_label(&CellLabel::Crowded));
        assert!(!daughter.cell.has_label(&CellLabel::Crowded));
        assert_eq!(daughter.cell.cell_data("volume"), Some(0.3));
    }

    #[test]
    fn insert_initialises() {
        let clock = FixedStepClock::new(3.0, 1.0, 4.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let mut ctx = CycleContext::new(&clock, &mut rng);
        let mut population = Population::new(Vec::new(), &mut ctx).unwrap();
        assert!(population.is_empty());
        let id = population
            .insert(SimpleCell::default(), periodic(1.0), &mut ctx)
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(population.get(0).unwrap().1.birth_time, 3.0);
        assert_eq!(population.get(0).unwrap().1.age(&clock), 0.0);
    }
}
