use crate::arithmetic::Point;
use crate::curve::Curve;
use crate::error::CurveError;
use crate::rng::CryptoCoreRng;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use std::sync::Arc;

/// ElGamal key material over a curve.
///
/// The public key is `G * private_key`. Keys are fixed for the lifetime of
/// the instance.
#[derive(Debug, Clone)]
pub struct ElGamal {
    curve: Arc<Curve>,
    generator: Point,
    private_key: BigUint,
    public_key: Point,
}

impl ElGamal {
    /// Builds the key material, sampling every omitted part from `rng`.
    ///
    /// A supplied public key is taken as is and only checked to lie on the
    /// same curve.
    pub fn new<R: CryptoCoreRng + ?Sized>(
        rng: &mut R,
        curve: &Arc<Curve>,
        generator: Option<Point>,
        private_key: Option<BigUint>,
        public_key: Option<Point>,
    ) -> Result<Self, CurveError> {
        let generator = match generator {
            Some(generator) => generator,
            None => curve.random_point(rng)?,
        };
        if generator.curve().as_ref() != curve.as_ref() {
            return Err(CurveError::CurveMismatch);
        }

        let private_key = match private_key {
            Some(key) if key.is_zero() || &key >= curve.field_size() => {
                return Err(CurveError::ScalarOutOfRange(key))
            }
            Some(key) => key,
            None => curve.random_scalar(rng),
        };

        let public_key = match public_key {
            Some(key) if !key.on_same_curve(&generator) => return Err(CurveError::CurveMismatch),
            Some(key) => key,
            None => &generator * &private_key,
        };

        Ok(Self {
            curve: Arc::clone(curve),
            generator,
            private_key,
            public_key,
        })
    }

    pub fn random<R: CryptoCoreRng + ?Sized>(
        rng: &mut R,
        curve: &Arc<Curve>,
    ) -> Result<Self, CurveError> {
        Self::new(rng, curve, None, None, None)
    }

    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    pub fn private_key(&self) -> &BigUint {
        &self.private_key
    }

    pub fn public_key(&self) -> &Point {
        &self.public_key
    }

    /// Encrypts `message` to this instance's own public key.
    pub fn encrypt<R: CryptoCoreRng + ?Sized>(
        &self,
        rng: &mut R,
        message: &Point,
    ) -> Result<(Point, Point), CurveError> {
        encrypt(rng, &self.curve, &self.public_key, &self.generator, message)
    }

    /// Returns `c2 - c1 * private_key`.
    pub fn decrypt(&self, c1: &Point, c2: &Point) -> Result<Point, CurveError> {
        if c1.curve().as_ref() != self.curve.as_ref() {
            return Err(CurveError::CurveMismatch);
        }
        let shared = c1 * &self.private_key;
        c2 - &shared
    }
}

/// Encrypts `message` to `public_key`, returning `(G * r, message +
/// public_key * r)` for a fresh ephemeral `r`.
pub fn encrypt<R: CryptoCoreRng + ?Sized>(
    rng: &mut R,
    curve: &Arc<Curve>,
    public_key: &Point,
    generator: &Point,
    message: &Point,
) -> Result<(Point, Point), CurveError> {
    let on_curve = |point: &Point| point.curve().as_ref() == curve.as_ref();
    if !(on_curve(message) && on_curve(public_key) && on_curve(generator)) {
        return Err(CurveError::CurveMismatch);
    }
    let ephemeral = BigInt::from(curve.random_scalar(rng));
    let c1 = generator.scalar_mul(&ephemeral);
    let c2 = message + &public_key.scalar_mul(&ephemeral);
    Ok((c1, c2?))
}
