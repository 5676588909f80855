use super::modular::{self, inv_mod, mul_mod, neg_mod};
use super::polynomial::{self, Coefficients};
use crate::error::CurveError;
use crate::rng::{random_below, CryptoCoreRng};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The finite field GF(p^n).
///
/// For `n = 1` elements are residues modulo `p`. For `n > 1` they are
/// polynomials over GF(p) reduced modulo a monic irreducible polynomial of
/// degree `n`. Fields are shared between their elements through an `Arc`.
#[derive(Debug, PartialEq, Eq)]
pub struct GaloisField {
    characteristic: BigUint,
    degree: u32,
    order: BigUint,
    modulus: Coefficients,
}

impl GaloisField {
    pub fn new(characteristic: &BigInt, degree: u32) -> Result<Arc<Self>, CurveError> {
        let p = match characteristic.to_biguint() {
            Some(p) if p > BigUint::one() && degree > 0 => p,
            _ => {
                return Err(CurveError::DegenerateField {
                    p: characteristic.clone(),
                    n: degree,
                })
            }
        };
        if !modular::is_prime(&p) {
            return Err(CurveError::InvalidFieldKind(characteristic.clone()));
        }
        let modulus = polynomial::find_irreducible(&p, degree);
        log::debug!(
            "GF({}^{}) constructed with modulus coefficients {:?}",
            p,
            degree,
            modulus
        );
        Ok(Arc::new(Self {
            order: p.pow(degree),
            characteristic: p,
            degree,
            modulus,
        }))
    }

    pub fn characteristic(&self) -> &BigUint {
        &self.characteristic
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Number of elements, `p^n`.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Coefficients of the defining polynomial, lowest degree first.
    pub fn modulus(&self) -> &[BigUint] {
        &self.modulus
    }

    pub fn zero(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            field: Arc::clone(self),
            coeffs: Vec::new(),
        }
    }

    pub fn one(self: &Arc<Self>) -> FieldElement {
        self.from_biguint(&BigUint::one())
    }

    /// Element with the given integer representation, reduced modulo `p^n`.
    pub fn from_biguint(self: &Arc<Self>, number: &BigUint) -> FieldElement {
        let reduced = number % &self.order;
        let mut coeffs = polynomial::digits(&reduced, &self.characteristic, self.degree as usize);
        polynomial::trim(&mut coeffs);
        FieldElement {
            field: Arc::clone(self),
            coeffs,
        }
    }

    /// Negative integers map to the additive inverse of their magnitude.
    pub fn element(self: &Arc<Self>, number: &BigInt) -> FieldElement {
        let magnitude = self.from_biguint(number.magnitude());
        if number.sign() == Sign::Minus {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn random_element<R: CryptoCoreRng + ?Sized>(self: &Arc<Self>, rng: &mut R) -> FieldElement {
        self.from_biguint(&random_below(rng, &self.order))
    }

    /// Every element in ascending integer representation.
    pub fn elements(self: &Arc<Self>) -> impl Iterator<Item = FieldElement> + '_ {
        let mut next = BigUint::zero();
        std::iter::from_fn(move || {
            if next >= self.order {
                return None;
            }
            let element = self.from_biguint(&next);
            next += 1u32;
            Some(element)
        })
    }
}

#[derive(Clone)]
pub struct FieldElement {
    field: Arc<GaloisField>,
    coeffs: Coefficients,
}

impl FieldElement {
    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    pub fn belongs_to(&self, field: &Arc<GaloisField>) -> bool {
        Arc::ptr_eq(&self.field, field) || self.field == *field
    }

    /// The integer whose base-`p` digits are the coefficients.
    pub fn to_biguint(&self) -> BigUint {
        polynomial::to_integer(&self.coeffs, &self.field.characteristic)
    }

    fn with_coeffs(&self, coeffs: Coefficients) -> Self {
        Self {
            field: Arc::clone(&self.field),
            coeffs,
        }
    }

    fn add_element(&self, rhs: &Self) -> Self {
        debug_assert!(self.belongs_to(&rhs.field));
        let p = &self.field.characteristic;
        self.with_coeffs(polynomial::add(&self.coeffs, &rhs.coeffs, p))
    }

    fn sub_element(&self, rhs: &Self) -> Self {
        debug_assert!(self.belongs_to(&rhs.field));
        let p = &self.field.characteristic;
        self.with_coeffs(polynomial::sub(&self.coeffs, &rhs.coeffs, p))
    }

    fn mul_element(&self, rhs: &Self) -> Self {
        debug_assert!(self.belongs_to(&rhs.field));
        let p = &self.field.characteristic;
        if self.field.degree == 1 {
            return self.prime_result(mul_mod(&self.residue(), &rhs.residue(), p));
        }
        let product = polynomial::mul(&self.coeffs, &rhs.coeffs, p);
        self.with_coeffs(polynomial::rem(&product, &self.field.modulus, p))
    }

    fn neg_element(&self) -> Self {
        let p = &self.field.characteristic;
        let coeffs = self.coeffs.iter().map(|c| neg_mod(c, p)).collect();
        self.with_coeffs(coeffs)
    }

    // prime field fast path helpers, only valid when degree == 1
    fn residue(&self) -> BigUint {
        self.coeffs.first().cloned().unwrap_or_default()
    }

    fn prime_result(&self, residue: BigUint) -> Self {
        let mut coeffs = vec![residue];
        polynomial::trim(&mut coeffs);
        self.with_coeffs(coeffs)
    }

    pub fn square(&self) -> Self {
        self.mul_element(self)
    }

    pub fn pow(&self, exponent: &BigUint) -> Self {
        if self.field.degree == 1 {
            let p = &self.field.characteristic;
            return self.prime_result(self.residue().modpow(exponent, p));
        }
        let mut acc = self.field.one();
        for byte in exponent.to_bytes_be() {
            for bit in (0..8).rev() {
                acc = acc.square();
                if (byte >> bit) & 1 == 1 {
                    acc = acc.mul_element(self);
                }
            }
        }
        acc
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        if self.field.degree == 1 {
            let inv = inv_mod(&self.residue(), &self.field.characteristic)?;
            return Some(self.prime_result(inv));
        }
        Some(self.pow(&(&self.field.order - 2u32)))
    }

    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        rhs.inverse().map(|inv| self.mul_element(&inv))
    }

    /// Whether some element squares to `self`. Zero is the square of zero.
    pub fn is_quadratic_residue(&self) -> bool {
        if self.is_zero() || self.field.characteristic == BigUint::from(2u32) {
            return true;
        }
        let exponent = (&self.field.order - 1u32) >> 1u32;
        self.pow(&exponent).is_one()
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs && self.belongs_to(&other.field)
    }
}

impl Eq for FieldElement {}

impl Hash for FieldElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coeffs.hash(state);
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_biguint())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

macro_rules! impl_field_op {
    ($op:ident, $method:ident, $inner:ident) => {
        impl<'a, 'b> std::ops::$op<&'b FieldElement> for &'a FieldElement {
            type Output = FieldElement;
            fn $method(self, rhs: &'b FieldElement) -> Self::Output {
                self.$inner(rhs)
            }
        }

        impl<'b> std::ops::$op<&'b FieldElement> for FieldElement {
            type Output = FieldElement;
            fn $method(self, rhs: &'b FieldElement) -> Self::Output {
                self.$inner(rhs)
            }
        }

        impl std::ops::$op for FieldElement {
            type Output = FieldElement;
            fn $method(self, rhs: FieldElement) -> Self::Output {
                self.$inner(&rhs)
            }
        }
    };
}

impl_field_op!(Add, add, add_element);
impl_field_op!(Sub, sub, sub_element);
impl_field_op!(Mul, mul, mul_element);

impl std::ops::Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.neg_element()
    }
}

impl std::ops::Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> Self::Output {
        self.neg_element()
    }
}
