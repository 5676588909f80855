mod order;

use super::field::FieldElement;
use crate::curve::Curve;
use crate::error::CurveError;

use num_bigint::{BigInt, BigUint, Sign};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A point in Jacobian coordinates, affine `(x / z^2, y / z^3)`.
///
/// The point at infinity is canonically `(0, 1, 0)`. The powers of `z` used
/// by the group law are computed once on construction.
#[derive(Clone)]
pub struct Point {
    curve: Arc<Curve>,
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    z2: FieldElement,
    z3: FieldElement,
    z4: FieldElement,
}

impl Point {
    /// Validated construction from integer coordinates.
    pub fn new(
        curve: &Arc<Curve>,
        x: impl Into<BigInt>,
        y: impl Into<BigInt>,
        z: impl Into<BigInt>,
    ) -> Result<Self, CurveError> {
        let field = curve.field();
        Self::from_coordinates(
            curve,
            field.element(&x.into()),
            field.element(&y.into()),
            field.element(&z.into()),
        )
    }

    /// Validated construction from field elements of the curve's field.
    pub fn from_coordinates(
        curve: &Arc<Curve>,
        x: FieldElement,
        y: FieldElement,
        z: FieldElement,
    ) -> Result<Self, CurveError> {
        let field = curve.field();
        if !(x.belongs_to(field) && y.belongs_to(field) && z.belongs_to(field)) {
            return Err(CurveError::CurveMismatch);
        }
        if z.is_zero() && !(x.is_zero() && y.is_one()) {
            return Err(CurveError::ZInvariantViolation);
        }
        if !curve.is_point_on_curve(&x, &y, &z) {
            return Err(CurveError::NotOnCurve);
        }
        Ok(Self::new_unchecked(curve, x, y, z))
    }

    // only for coordinates produced by operations that preserve the curve equation
    pub(crate) fn new_unchecked(
        curve: &Arc<Curve>,
        x: FieldElement,
        y: FieldElement,
        z: FieldElement,
    ) -> Self {
        let z2 = z.square();
        let z3 = &z2 * &z;
        let z4 = z2.square();
        Self {
            curve: Arc::clone(curve),
            x,
            y,
            z,
            z2,
            z3,
            z4,
        }
    }

    pub(crate) fn from_affine_unchecked(curve: &Arc<Curve>, x: FieldElement, y: FieldElement) -> Self {
        let one = curve.field().one();
        Self::new_unchecked(curve, x, y, one)
    }

    pub fn infinity(curve: &Arc<Curve>) -> Self {
        let field = curve.field();
        Self::new_unchecked(curve, field.zero(), field.one(), field.zero())
    }

    #[inline(always)]
    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    #[inline(always)]
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    #[inline(always)]
    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    #[inline(always)]
    pub fn z(&self) -> &FieldElement {
        &self.z
    }

    #[inline(always)]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn is_on_curve(&self) -> bool {
        self.curve.is_point_on_curve(&self.x, &self.y, &self.z)
    }

    pub fn on_same_curve(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.curve, &other.curve) || self.curve == other.curve
    }

    fn ensure_same_curve(&self, other: &Self) -> Result<(), CurveError> {
        if self.on_same_curve(other) {
            Ok(())
        } else {
            Err(CurveError::CurveMismatch)
        }
    }

    /// Affine coordinates, `None` for the point at infinity.
    pub fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.z.is_one() {
            return Some((self.x.clone(), self.y.clone()));
        }
        let z_inv = self.z.inverse()?;
        let z_inv2 = z_inv.square();
        let z_inv3 = &z_inv2 * &z_inv;
        Some((&self.x * &z_inv2, &self.y * &z_inv3))
    }

    /// Sum of two points of the same curve, checked against the curve
    /// equation.
    pub fn geometric_add(&self, rhs: &Self) -> Result<Self, CurveError> {
        self.ensure_same_curve(rhs)?;
        let sum = self.sum(rhs);
        if !sum.is_on_curve() {
            return Err(CurveError::NotOnCurve);
        }
        Ok(sum)
    }

    pub fn geometric_sub(&self, rhs: &Self) -> Result<Self, CurveError> {
        self.geometric_add(&rhs.negate())
    }

    // assumes both points are on the same curve
    pub(crate) fn sum(&self, rhs: &Self) -> Self {
        if self == rhs {
            return self.double();
        }
        if self.is_infinity() {
            return rhs.clone();
        }
        if rhs.is_infinity() {
            return self.clone();
        }

        let curve = &self.curve;
        let lambda1 = &self.x * &rhs.z2;
        let lambda2 = &rhs.x * &self.z2;
        let lambda3 = &lambda1 - &lambda2;
        let lambda4 = &self.y * &rhs.z3;
        let lambda5 = &rhs.y * &self.z3;
        let lambda6 = &lambda4 - &lambda5;
        let z3 = &(&self.z * &rhs.z) * &lambda3;
        if z3.is_zero() {
            return Self::infinity(curve);
        }

        let lambda7 = &lambda1 + &lambda2;
        let lambda8 = &lambda4 + &lambda5;
        let lambda3_2 = lambda3.square();
        let lambda3_3 = &lambda3_2 * &lambda3;
        let lambda7_3_2 = &lambda7 * &lambda3_2;
        let x3 = &lambda6.square() - &lambda7_3_2;
        let lambda9 = &lambda7_3_2 - &(curve.two() * &x3);
        let y3 = &(&(&lambda9 * &lambda6) - &(&lambda8 * &lambda3_3)) * curve.two_inverse();

        Self::new_unchecked(curve, x3, y3, z3)
    }

    pub fn double(&self) -> Self {
        let curve = &self.curve;
        if self.is_infinity() {
            return Self::infinity(curve);
        }
        let z3 = &(curve.two() * &self.y) * &self.z;
        if z3.is_zero() {
            return Self::infinity(curve);
        }

        let y2 = self.y.square();
        let lambda1 = &(curve.three() * &self.x.square()) + &(curve.a() * &self.z4);
        let lambda2 = &(curve.four() * &self.x) * &y2;
        let x3 = &lambda1.square() - &(curve.two() * &lambda2);
        let lambda3 = curve.eight() * &y2.square();
        let y3 = &(&lambda1 * &(&lambda2 - &x3)) - &lambda3;

        let doubled = Self::new_unchecked(curve, x3, y3, z3);
        debug_assert!(doubled.is_on_curve());
        doubled
    }

    pub fn negate(&self) -> Self {
        if self.is_infinity() {
            return Self::infinity(&self.curve);
        }
        Self {
            curve: Arc::clone(&self.curve),
            x: self.x.clone(),
            y: -&self.y,
            z: self.z.clone(),
            z2: self.z2.clone(),
            z3: self.z3.clone(),
            z4: self.z4.clone(),
        }
    }

    /// `scalar * self` by left-to-right double and add, negating the point
    /// for negative scalars.
    pub fn scalar_mul(&self, scalar: &BigInt) -> Self {
        let base = if scalar.sign() == Sign::Minus {
            self.negate()
        } else {
            self.clone()
        };
        let mut acc = Self::infinity(&self.curve);
        for byte in scalar.magnitude().to_bytes_be() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit) & 1 == 1 {
                    acc = acc.sum(&base);
                }
            }
        }
        acc
    }
}

impl PartialEq for Point {
    /// Compares affine classes by cross-multiplying with the cached powers
    /// of `z`, without inverting anything.
    fn eq(&self, other: &Self) -> bool {
        if !self.on_same_curve(other) {
            return false;
        }
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => true,
            (false, false) => {
                &self.x * &other.z2 == &other.x * &self.z2
                    && &self.y * &other.z3 == &other.y * &self.z3
            }
            _ => false,
        }
    }
}

impl Eq for Point {}

impl Hash for Point {
    // hashes the affine representative, so equal classes hash equally;
    // costs one inversion unless z = 1, as a class has no inversion-free
    // canonical form
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.to_affine() {
            None => state.write_u8(0),
            Some((x, y)) => {
                state.write_u8(1);
                x.hash(state);
                y.hash(state);
            }
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Point")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .finish()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_affine() {
            None => write!(f, "point at infinity in {}", self.curve),
            Some((x, y)) => write!(f, "({}, {}) in {}", x, y, self.curve),
        }
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Neg for &Point {
    type Output = Point;
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl<'a, 'b> std::ops::Add<&'b Point> for &'a Point {
    type Output = Result<Point, CurveError>;
    fn add(self, rhs: &'b Point) -> Self::Output {
        self.geometric_add(rhs)
    }
}

impl std::ops::Add for Point {
    type Output = Result<Point, CurveError>;
    fn add(self, rhs: Self) -> Self::Output {
        self.geometric_add(&rhs)
    }
}

impl<'a, 'b> std::ops::Sub<&'b Point> for &'a Point {
    type Output = Result<Point, CurveError>;
    fn sub(self, rhs: &'b Point) -> Self::Output {
        self.geometric_sub(rhs)
    }
}

impl std::ops::Sub for Point {
    type Output = Result<Point, CurveError>;
    fn sub(self, rhs: Self) -> Self::Output {
        self.geometric_sub(&rhs)
    }
}

impl<'a, 'b> std::ops::Mul<&'b BigInt> for &'a Point {
    type Output = Point;
    fn mul(self, rhs: &'b BigInt) -> Self::Output {
        self.scalar_mul(rhs)
    }
}

impl<'a, 'b> std::ops::Mul<&'b BigUint> for &'a Point {
    type Output = Point;
    fn mul(self, rhs: &'b BigUint) -> Self::Output {
        self.scalar_mul(&BigInt::from(rhs.clone()))
    }
}

impl std::ops::Mul<i64> for &Point {
    type Output = Point;
    fn mul(self, rhs: i64) -> Self::Output {
        self.scalar_mul(&BigInt::from(rhs))
    }
}

impl std::ops::Mul<&Point> for i64 {
    type Output = Point;
    fn mul(self, rhs: &Point) -> Self::Output {
        rhs.scalar_mul(&BigInt::from(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_curve() -> Arc<Curve> {
        Curve::new(1, 4, 7, 1).unwrap()
    }

    fn point(curve: &Arc<Curve>, x: i64, y: i64) -> Point {
        Point::new(curve, x, y, 1).unwrap()
    }

    #[test]
    fn construction_checks() {
        let curve = small_curve();
        assert!(Point::new(&curve, 5, 6, 1).is_ok());
        assert!(Point::new(&curve, 0, 1, 0).unwrap().is_infinity());
        assert_eq!(
            Point::new(&curve, 5, 5, 1).unwrap_err(),
            CurveError::NotOnCurve
        );
        assert_eq!(
            Point::new(&curve, 5, 6, 0).unwrap_err(),
            CurveError::ZInvariantViolation
        );
        assert_eq!(
            Point::new(&curve, 0, 2, 0).unwrap_err(),
            CurveError::ZInvariantViolation
        );
        let other = Curve::new(1, 4, 11, 1).unwrap();
        let foreign_x = other.field().element(&BigInt::from(5));
        let f = curve.field();
        assert_eq!(
            Point::from_coordinates(&curve, foreign_x, f.element(&6.into()), f.one()).unwrap_err(),
            CurveError::CurveMismatch
        );
    }

    #[test]
    fn small_curve_multiples() {
        // 5 * (5, 6) computed by hand on y^2 = x^3 + x + 4 over GF(7)
        let curve = small_curve();
        let p = point(&curve, 5, 6);
        let expected = [(5, 6), (6, 4), (0, 5), (4, 4), (2, 0), (4, 3), (0, 2), (6, 3), (5, 1)];
        let mut current = p.clone();
        for &(x, y) in expected.iter() {
            assert_eq!(current, point(&curve, x, y));
            current = (&current + &p).unwrap();
        }
        assert!(current.is_infinity());

        let doubled = p.double();
        let doubled_twice = doubled.double();
        assert_eq!(doubled, point(&curve, 6, 4));
        assert_eq!(doubled_twice, point(&curve, 4, 4));
        assert_eq!(-doubled_twice.clone(), point(&curve, 4, 3));
        // mirrors the original driver: (6, 4) + -(4, 4)
        let q = point(&curve, 6, 4);
        assert_eq!((&q + &(-&doubled_twice)).unwrap(), (&p * 2 - &p * 4).unwrap());
    }

    #[test]
    fn equality_is_projective() {
        let curve = small_curve();
        let p = point(&curve, 5, 6);
        // (x * 4, y * 8, 2) represents the same affine point
        let scaled = Point::new(&curve, 20, 48, 2).unwrap();
        assert_eq!(p, scaled);
        assert_ne!(p, point(&curve, 5, 1));
        assert_ne!(p, Point::infinity(&curve));
        assert_eq!(Point::infinity(&curve), Point::infinity(&curve));

        let mut set = std::collections::HashSet::new();
        set.insert(p.clone());
        assert!(set.contains(&scaled));
        assert_eq!(scaled.to_affine().unwrap().0, p.x().clone());

        let other = Curve::new(1, 4, 11, 1).unwrap();
        assert_ne!(Point::infinity(&curve), Point::infinity(&other));
    }

    #[test]
    fn hash_agrees_with_projective_equality() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(point: &Point) -> u64 {
            let mut hasher = DefaultHasher::new();
            point.hash(&mut hasher);
            hasher.finish()
        }

        let curve = Curve::new(1, 1, 5, 2).unwrap();
        let field = curve.field();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..10 {
            let p = curve.random_point(&mut rng).unwrap();
            for lambda in field.elements().filter(|e| !e.is_zero()) {
                let lambda2 = lambda.square();
                let lambda3 = &lambda2 * &lambda;
                let scaled =
                    Point::from_coordinates(&curve, p.x() * &lambda2, p.y() * &lambda3, lambda)
                        .unwrap();
                assert_eq!(scaled, p);
                assert_eq!(hash_of(&scaled), hash_of(&p));
            }
        }
        let infinity = Point::infinity(&curve);
        assert_eq!(hash_of(&infinity), hash_of(&(&infinity * 5)));
    }

    #[test]
    fn infinity_is_identity() {
        let curve = small_curve();
        let p = point(&curve, 0, 2);
        let inf = Point::infinity(&curve);
        assert_eq!((&p + &inf).unwrap(), p);
        assert_eq!((&inf + &p).unwrap(), p);
        assert_eq!((&inf + &inf).unwrap(), inf);
        assert!(inf.double().is_infinity());
        assert!((-&inf).is_infinity());
        assert!((&p + &(-&p)).unwrap().is_infinity());
        // the point of order two doubles to infinity
        assert!(point(&curve, 2, 0).double().is_infinity());
    }

    #[test]
    fn cross_curve_addition_fails() {
        let curve = small_curve();
        let other = Curve::new(1, 1, 7, 1).unwrap();
        let p = point(&curve, 5, 6);
        let q = other.map_to_point(&BigInt::from(0)).unwrap();
        assert_eq!((&p + &q).unwrap_err(), CurveError::CurveMismatch);
        assert_eq!((&p - &q).unwrap_err(), CurveError::CurveMismatch);
        assert_eq!(
            (Point::infinity(&curve) + Point::infinity(&other)).unwrap_err(),
            CurveError::CurveMismatch
        );
    }

    #[test]
    fn scalar_multiplication() {
        let curve = small_curve();
        let p = point(&curve, 5, 6);
        assert!((&p * 0).is_infinity());
        assert_eq!(&p * 1, p);
        assert_eq!(&p * 2, p.double());
        assert_eq!(&p * -1, -&p);
        assert_eq!(&p * -3, -(&p * 3));
        assert_eq!(&p * 11, p);
        assert_eq!(3 * &p, &p * 3);
        assert_eq!(&p * &BigUint::from(13u32), &p * 3);
        assert!((&p * 345_678_120).is_infinity());
    }

    #[test]
    fn group_laws_hold_on_random_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let curves = [
            Curve::new(2, 3, 97, 1).unwrap(),
            Curve::new(1, 1, 1_000_003, 1).unwrap(),
            Curve::new(1, 1, 5, 2).unwrap(),
            Curve::new(2, 1, 3, 3).unwrap(),
        ];
        for curve in curves.iter() {
            let inf = Point::infinity(curve);
            for _ in 0..5 {
                let p = curve.random_point(&mut rng).unwrap();
                let q = curve.random_point(&mut rng).unwrap();
                let r = curve.random_point(&mut rng).unwrap();

                let pq = (&p + &q).unwrap();
                assert_eq!(pq, (&q + &p).unwrap());
                assert!(pq.is_on_curve());
                let left = (&pq + &r).unwrap();
                let right = (&p + &(&q + &r).unwrap()).unwrap();
                assert_eq!(left, right);
                assert_eq!((&p + &inf).unwrap(), p);
                assert_eq!((&p + &(-&p)).unwrap(), inf);
                assert_eq!(p.double(), (&p + &p).unwrap());
                assert_eq!((&pq - &q).unwrap(), p);

                for (j, k) in [(0i64, 5i64), (3, 4), (17, 29), (1000, 2021)] {
                    let lhs = &p * (j + k);
                    let rhs = (&(&p * j) + &(&p * k)).unwrap();
                    assert_eq!(lhs, rhs);
                }
            }
        }
    }

    #[test]
    fn large_scalars_do_not_recurse() {
        let curve = Curve::new(1, 1, 1_000_003, 1).unwrap();
        let g = Point::new(&curve, 613_420, 643_318, 1).unwrap();
        let k: BigInt = (BigInt::from(1) << 4096u32) + 12_345;
        let product = g.scalar_mul(&k);
        assert!(product.is_on_curve());
        let order = g.order_bsgs().unwrap();
        let reduced = k % BigInt::from(order);
        assert_eq!(product, g.scalar_mul(&reduced));
    }

    #[test]
    fn display() {
        let curve = small_curve();
        assert_eq!(
            Point::new(&curve, 20, 48, 2).unwrap().to_string(),
            "(5, 6) in y^2 = x^3 + 1xz^4 + 4z^6 over GF(7^1)"
        );
        assert_eq!(
            Point::infinity(&curve).to_string(),
            "point at infinity in y^2 = x^3 + 1xz^4 + 4z^6 over GF(7^1)"
        );
    }
}
