use crate::arithmetic::{FieldElement, GaloisField, Point};
use crate::config::ScanLimit;
use crate::error::CurveError;
use crate::rng::{random_in_range, CryptoCoreRng};

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive};

use std::fmt;
use std::sync::Arc;

/// Rounds of `x` sampling per field element before `random_point` gives up.
const RANDOM_POINT_ROUNDS: u64 = 16;

/// A short Weierstrass curve `y^2 = x^3 + ax + b` over GF(p^n), written in
/// Jacobian coordinates as `y^2 = x^3 + axz^4 + bz^6`.
#[derive(Debug)]
pub struct Curve {
    field: Arc<GaloisField>,
    a: FieldElement,
    b: FieldElement,
    two: FieldElement,
    three: FieldElement,
    four: FieldElement,
    eight: FieldElement,
    two_inverse: FieldElement,
    scan_limit: ScanLimit,
}

impl Curve {
    pub fn new(
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
        p: impl Into<BigInt>,
        n: u32,
    ) -> Result<Arc<Self>, CurveError> {
        Self::with_scan_limit(a, b, p, n, ScanLimit::default())
    }

    pub fn with_scan_limit(
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
        p: impl Into<BigInt>,
        n: u32,
        scan_limit: ScanLimit,
    ) -> Result<Arc<Self>, CurveError> {
        let p = p.into();
        let field = GaloisField::new(&p, n)?;
        let constant = |k: u32| field.from_biguint(&(BigUint::from(k) % field.characteristic()));
        let two = constant(2);
        // characteristic two has no inverse of 2 for the addition formula
        let two_inverse = two
            .inverse()
            .ok_or(CurveError::DegenerateField { p: p.clone(), n })?;

        let curve = Self {
            a: field.element(&a.into()),
            b: field.element(&b.into()),
            three: constant(3),
            four: constant(4),
            eight: constant(8),
            two,
            two_inverse,
            field,
            scan_limit,
        };
        log::debug!("constructed curve {}", curve);
        Ok(Arc::new(curve))
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// `q = p^n`
    pub fn field_size(&self) -> &BigUint {
        self.field.order()
    }

    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    pub fn scan_limit(&self) -> ScanLimit {
        self.scan_limit
    }

    pub(crate) fn two(&self) -> &FieldElement {
        &self.two
    }

    pub(crate) fn three(&self) -> &FieldElement {
        &self.three
    }

    pub(crate) fn four(&self) -> &FieldElement {
        &self.four
    }

    pub(crate) fn eight(&self) -> &FieldElement {
        &self.eight
    }

    pub(crate) fn two_inverse(&self) -> &FieldElement {
        &self.two_inverse
    }

    /// Checks `y^2 = x^3 + axz^4 + bz^6`, accepting `(0, 1, 0)` as infinity.
    pub fn is_point_on_curve(&self, x: &FieldElement, y: &FieldElement, z: &FieldElement) -> bool {
        if x.is_zero() && y.is_one() && z.is_zero() {
            return true;
        }
        let z2 = z.square();
        let z4 = z2.square();
        let z6 = &z4 * &z2;
        let lhs = y.square();
        let rhs = &(&(&x.square() * x) + &(&(&self.a * x) * &z4)) + &(&self.b * &z6);
        lhs == rhs
    }

    // x^3 + ax + b with z = 1
    fn affine_rhs(&self, x: &FieldElement) -> FieldElement {
        &(&(&x.square() * x) + &(&self.a * x)) + &self.b
    }

    // linear scan, O(q)
    fn find_y(&self, rhs: &FieldElement) -> Option<FieldElement> {
        self.field.elements().find(|y| &y.square() == rhs)
    }

    /// Uniformly samples `x` until `x^3 + ax + b` is a square, then scans
    /// the field for a matching `y`.
    ///
    /// Both steps are linear in the field size, so this refuses fields
    /// above the curve's [`ScanLimit`].
    pub fn random_point<R: CryptoCoreRng + ?Sized>(
        self: &Arc<Self>,
        rng: &mut R,
    ) -> Result<Point, CurveError> {
        self.scan_limit.check(self.field_size())?;
        let rounds = self
            .field_size()
            .to_u64()
            .unwrap_or(u64::MAX)
            .saturating_mul(RANDOM_POINT_ROUNDS);
        for attempt in 1..=rounds {
            let x = self.field.random_element(rng);
            let rhs = self.affine_rhs(&x);
            if !rhs.is_quadratic_residue() {
                log::trace!("x = {} has no curve point, resampling", x);
                continue;
            }
            if let Some(y) = self.find_y(&rhs) {
                log::trace!("sampled a curve point after {} attempts", attempt);
                return Ok(Point::from_affine_unchecked(self, x, y));
            }
        }
        Err(CurveError::NoCurvePoint)
    }

    /// Uniform integer in `[1, q - 1]`.
    pub fn random_scalar<R: CryptoCoreRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        random_in_range(rng, &BigUint::one(), self.field_size())
    }

    /// The affine point with `x = number`, if `number` is the x-coordinate
    /// of any curve point.
    pub fn map_to_point(self: &Arc<Self>, number: &BigInt) -> Result<Point, CurveError> {
        let value = number
            .to_biguint()
            .filter(|value| value < self.field_size())
            .ok_or_else(|| CurveError::ElementOutOfRange(number.clone()))?;
        self.scan_limit.check(self.field_size())?;

        let x = self.field.from_biguint(&value);
        let rhs = self.affine_rhs(&x);
        if !rhs.is_quadratic_residue() {
            return Err(CurveError::NoCurvePoint);
        }
        let y = self.find_y(&rhs).ok_or(CurveError::NoCurvePoint)?;
        Ok(Point::from_affine_unchecked(self, x, y))
    }

    /// Recovers the integer mapped by [`Curve::map_to_point`].
    pub fn map_from_point(&self, point: &Point) -> Result<BigUint, CurveError> {
        if point.curve().as_ref() != self {
            return Err(CurveError::CurveMismatch);
        }
        let (x, _) = point.to_affine().ok_or(CurveError::NotAPoint)?;
        Ok(x.to_biguint())
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.field, &other.field) || self.field == other.field)
            && self.a == other.a
            && self.b == other.b
    }
}

impl Eq for Curve {}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "y^2 = x^3 + {}xz^4 + {}z^6 over GF({}^{})",
            self.a,
            self.b,
            self.field.characteristic(),
            self.field.degree()
        )
    }
}
