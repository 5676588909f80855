use super::Point;
use crate::error::CurveError;

use num_bigint::{BigInt, BigUint};
use num_integer::Roots;
use num_traits::{One, ToPrimitive};

use std::collections::{HashMap, HashSet};

// Hasse: #E < q + 1 + 2 sqrt(q) < 2m^2
fn giant_steps(baby_steps: u64) -> u64 {
    baby_steps.saturating_mul(2)
}

impl Point {
    /// Order of the point by repeated addition.
    ///
    /// Linear in the order, so the field size must be within the curve's
    /// scan limit.
    pub fn order_naive(&self) -> Result<BigUint, CurveError> {
        let field_size = self.curve.field_size();
        self.curve.scan_limit().check(field_size)?;
        // Hasse: #E <= q + 1 + 2 sqrt(q) <= 2q + 2
        let bound: BigUint = field_size * 2u32 + 2u32;

        let mut order = BigUint::one();
        let mut acc = self.clone();
        while !acc.is_infinity() {
            if order > bound {
                return Err(CurveError::OrderNotFound);
            }
            acc = acc.sum(self);
            order += 1u32;
        }
        Ok(order)
    }

    /// Order of the point by baby-step giant-step.
    ///
    /// Baby steps store `j * P` for `j` in `[0, m)` where
    /// `m = floor(sqrt(q + floor(sqrt(q)))) + 1`. Giant steps walk
    /// `i * (-m * P)` for `i` in `[1, 2m]`, which covers every order allowed
    /// by the Hasse bound, and the first hit gives the order `m * i + j`.
    pub fn order_bsgs(&self) -> Result<BigUint, CurveError> {
        let field_size = self.curve.field_size();
        let steps = Roots::sqrt(&(field_size + Roots::sqrt(field_size))) + 1u32;
        self.curve.scan_limit().check(&steps)?;
        let m = steps.to_u64().ok_or(CurveError::OrderNotFound)?;
        log::debug!("bsgs over a field of size {} with {} baby steps", field_size, m);

        let mut table = HashMap::new();
        let mut current = Point::infinity(&self.curve);
        for j in 0..m {
            if let Some(&seen) = table.get(&current) {
                // only infinity can repeat first, at index zero
                debug_assert_eq!(seen, 0);
                return Ok(BigUint::from(j));
            }
            table.insert(current.clone(), j);
            current = current.sum(self);
        }

        let giant = self.scalar_mul(&-BigInt::from(m));
        let mut current = giant.clone();
        for i in 1..=giant_steps(m) {
            if let Some(&j) = table.get(&current) {
                let order = BigUint::from(m) * i + j;
                log::debug!("bsgs hit at giant step {}, baby step {}", i, j);
                return Ok(order);
            }
            current = current.sum(&giant);
        }
        Err(CurveError::OrderNotFound)
    }

    /// Multiples `P, 2P, 3P, ...` up to the first repeat, or at most
    /// `max_order` of them.
    ///
    /// Without `max_order` the walk covers the whole subgroup, so the field
    /// size must be within the curve's scan limit.
    pub fn cyclic_group(&self, max_order: Option<usize>) -> Result<Vec<Point>, CurveError> {
        if max_order.is_none() {
            self.curve.scan_limit().check(self.curve.field_size())?;
        }
        let mut seen = HashSet::new();
        let mut group = Vec::new();
        let mut current = self.clone();
        while max_order.map_or(true, |max| group.len() < max) {
            if !seen.insert(current.clone()) {
                break;
            }
            group.push(current.clone());
            current = current.sum(self);
        }
        Ok(group)
    }
}
