use crate::errors::RngError;

/// A single, seedable stream of random numbers.
///
/// Every stochastic draw of every cell-cycle model passes through one stream which is borrowed
/// mutably for the duration of a call. Draws are therefore serialized and a simulation is
/// reproducible given a fixed seed and a fixed iteration order.
pub trait RandomStream {
    /// Draws from a normal distribution $\mathcal{N}(\mu, \sigma)$.
    fn normal_deviate(&mut self, mean: f64, standard_deviation: f64) -> Result<f64, RngError>;

    /// Draws uniformly from $[0, 1)$.
    fn uniform_deviate(&mut self) -> f64;
}

impl RandomStream for rand_chacha::ChaCha8Rng {
    fn normal_deviate(&mut self, mean: f64, standard_deviation: f64) -> Result<f64, RngError> {
        use rand::Rng;
        let distr = match rand_distr::Normal::new(mean, standard_deviation) {
            Ok(e) => Ok(e),
            Err(e) => Err(RngError(format!("{e}"))),
        }?;
        Ok(self.sample(distr))
    }

    fn uniform_deviate(&mut self) -> f64 {
        use rand::Rng;
        self.gen_range(0.0..1.0)
    }
}

#[cfg(test)]
mod test_random_stream {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_deviates() {
        let mut rng1 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                rng1.normal_deviate(4.0, 1.0).unwrap(),
                rng2.normal_deviate(4.0, 1.0).unwrap()
            );
            assert_eq!(rng1.uniform_deviate(), rng2.uniform_deviate());
        }
    }

    #[test]
    fn negative_deviation_is_rng_error() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        assert!(rng.normal_deviate(1.0, -1.0).is_err());
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let u = rng.uniform_deviate();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
