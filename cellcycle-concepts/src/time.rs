/// Read-only access to the global simulated time.
///
/// The clock is advanced exclusively by the simulation driver. Cell-cycle models only query the
/// current time $t$ and the fixed increment $dt$.
pub trait Clock {
    /// Current simulated time $t$
    fn now(&self) -> f64;

    /// Fixed time increment $dt$ between two consecutive steps
    fn time_step(&self) -> f64;
}

impl<C> Clock for &C
where
    C: Clock + ?Sized,
{
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn time_step(&self) -> f64 {
        (**self).time_step()
    }
}
