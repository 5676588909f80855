use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

/// Randomness capability accepted by every sampling entry point.
///
/// Callers own the source, so tests can pass a seeded `StdRng` while
/// applications pass `OsRng`.
pub trait CryptoCoreRng: RngCore + CryptoRng {}

impl<R: RngCore + CryptoRng + ?Sized> CryptoCoreRng for R {}

/// Uniform integer in `[0, bound)`, zero for a zero bound.
pub fn random_below<R: CryptoCoreRng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    if bound.is_zero() {
        return BigUint::zero();
    }
    rng.gen_biguint_below(bound)
}

/// Uniform integer in `[low, high)`; `high` must exceed `low`.
pub fn random_in_range<R: CryptoCoreRng + ?Sized>(
    rng: &mut R,
    low: &BigUint,
    high: &BigUint,
) -> BigUint {
    rng.gen_biguint_range(low, high)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampling_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let low = BigUint::from(1u32);
        let high = BigUint::from(7u32);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let sample = random_in_range(&mut rng, &low, &high);
            assert!(sample >= low && sample < high);
            seen[sample.to_u32_digits()[0] as usize] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&s| s));
        assert_eq!(random_below(&mut rng, &BigUint::zero()), BigUint::zero());
    }

    #[test]
    fn seeded_sources_repeat() {
        let bound = BigUint::from(1_000_003u32);
        let a = random_below(&mut StdRng::seed_from_u64(42), &bound);
        let b = random_below(&mut StdRng::seed_from_u64(42), &bound);
        assert_eq!(a, b);
    }
}
