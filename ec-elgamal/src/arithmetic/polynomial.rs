//! Dense polynomials over GF(p), used to build the extension fields.
//!
//! A polynomial is a coefficient vector, lowest degree first, without
//! trailing zero coefficients. The zero polynomial is the empty vector.

use super::modular::{add_mod, inv_mod, mul_mod, prime_divisors, sub_mod};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

pub type Coefficients = Vec<BigUint>;

pub fn trim(poly: &mut Coefficients) {
    while poly.last().map_or(false, |c| c.is_zero()) {
        poly.pop();
    }
}

pub fn add(lhs: &[BigUint], rhs: &[BigUint], p: &BigUint) -> Coefficients {
    let zero = BigUint::zero();
    let len = lhs.len().max(rhs.len());
    let mut sum: Coefficients = (0..len)
        .map(|i| {
            add_mod(
                lhs.get(i).unwrap_or(&zero),
                rhs.get(i).unwrap_or(&zero),
                p,
            )
        })
        .collect();
    trim(&mut sum);
    sum
}

pub fn sub(lhs: &[BigUint], rhs: &[BigUint], p: &BigUint) -> Coefficients {
    let zero = BigUint::zero();
    let len = lhs.len().max(rhs.len());
    let mut difference: Coefficients = (0..len)
        .map(|i| {
            sub_mod(
                lhs.get(i).unwrap_or(&zero),
                rhs.get(i).unwrap_or(&zero),
                p,
            )
        })
        .collect();
    trim(&mut difference);
    difference
}

pub fn mul(lhs: &[BigUint], rhs: &[BigUint], p: &BigUint) -> Coefficients {
    if lhs.is_empty() || rhs.is_empty() {
        return Vec::new();
    }
    let mut product = vec![BigUint::zero(); lhs.len() + rhs.len() - 1];
    for (i, l) in lhs.iter().enumerate() {
        if l.is_zero() {
            continue;
        }
        for (j, r) in rhs.iter().enumerate() {
            product[i + j] = add_mod(&product[i + j], &mul_mod(l, r, p), p);
        }
    }
    trim(&mut product);
    product
}

/// Remainder of `dividend` modulo a non-zero `divisor`.
pub fn rem(dividend: &[BigUint], divisor: &[BigUint], p: &BigUint) -> Coefficients {
    let mut remainder = dividend.to_vec();
    trim(&mut remainder);
    let lead_inv = match divisor.last().and_then(|lead| inv_mod(lead, p)) {
        Some(inv) => inv,
        None => return remainder,
    };
    while remainder.len() >= divisor.len() {
        let shift = remainder.len() - divisor.len();
        let factor = remainder
            .last()
            .map(|lead| mul_mod(lead, &lead_inv, p))
            .unwrap_or_default();
        for (i, coeff) in divisor.iter().enumerate() {
            remainder[shift + i] = sub_mod(&remainder[shift + i], &mul_mod(&factor, coeff, p), p);
        }
        trim(&mut remainder);
    }
    remainder
}

pub fn gcd(lhs: &[BigUint], rhs: &[BigUint], p: &BigUint) -> Coefficients {
    let mut a = lhs.to_vec();
    let mut b = rhs.to_vec();
    trim(&mut a);
    trim(&mut b);
    while !b.is_empty() {
        let r = rem(&a, &b, p);
        a = b;
        b = r;
    }
    a
}

/// `base^exponent mod modulus` by left-to-right square and multiply.
pub fn pow_mod(
    base: &[BigUint],
    exponent: &BigUint,
    modulus: &[BigUint],
    p: &BigUint,
) -> Coefficients {
    let base = rem(base, modulus, p);
    let mut acc = rem(&[BigUint::one()], modulus, p);
    for byte in exponent.to_bytes_be() {
        for bit in (0..8).rev() {
            acc = rem(&mul(&acc, &acc, p), modulus, p);
            if (byte >> bit) & 1 == 1 {
                acc = rem(&mul(&acc, &base, p), modulus, p);
            }
        }
    }
    acc
}

/// Rabin's irreducibility test for a monic polynomial of degree `n >= 1`.
pub fn is_irreducible(poly: &[BigUint], p: &BigUint) -> bool {
    let degree = match poly.len().checked_sub(1) {
        Some(d) if d >= 1 => d as u32,
        _ => return false,
    };
    if degree == 1 {
        return true;
    }
    let x = vec![BigUint::zero(), BigUint::one()];
    for r in prime_divisors(degree) {
        let exponent = p.pow(degree / r);
        let frobenius = pow_mod(&x, &exponent, poly, p);
        let common = gcd(&sub(&frobenius, &x, p), poly, p);
        if common.len() != 1 {
            return false;
        }
    }
    let frobenius = pow_mod(&x, &p.pow(degree), poly, p);
    frobenius == rem(&x, poly, p)
}

/// Base-`p` digits of `number`, lowest first, padded or cut to `len`.
pub fn digits(number: &BigUint, p: &BigUint, len: usize) -> Coefficients {
    let mut rest = number.clone();
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let (quotient, digit) = rest.div_rem(p);
        out.push(digit);
        rest = quotient;
    }
    out
}

/// Integer whose base-`p` digits are the coefficients.
pub fn to_integer(poly: &[BigUint], p: &BigUint) -> BigUint {
    poly.iter()
        .rev()
        .fold(BigUint::zero(), |acc, coeff| acc * p + coeff)
}

/// The first monic irreducible polynomial of degree `n` over GF(p),
/// ordered by the integer representation of its lower coefficients.
pub fn find_irreducible(p: &BigUint, n: u32) -> Coefficients {
    let len = n as usize;
    let mut tail = BigUint::zero();
    loop {
        let mut candidate = digits(&tail, p, len);
        candidate.push(BigUint::one());
        // a zero constant term means x divides the candidate
        let divisible_by_x = n > 1 && candidate[0].is_zero();
        if !divisible_by_x && is_irreducible(&candidate, p) {
            return candidate;
        }
        tail += 1u32;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn poly(coeffs: &[u64]) -> Coefficients {
        let mut out: Coefficients = coeffs.iter().map(|&c| BigUint::from(c)).collect();
        trim(&mut out);
        out
    }

    #[test]
    fn arithmetic() {
        let p = BigUint::from(5u32);
        // (x + 2)(x + 3) = x^2 + 5x + 6 = x^2 + 1 over GF(5)
        let product = mul(&poly(&[2, 1]), &poly(&[3, 1]), &p);
        assert_eq!(product, poly(&[1, 0, 1]));
        assert_eq!(add(&poly(&[4, 1]), &poly(&[1, 4]), &p), poly(&[]));
        assert_eq!(sub(&poly(&[0, 1]), &poly(&[1, 1]), &p), poly(&[4]));
        assert_eq!(rem(&product, &poly(&[2, 1]), &p), poly(&[]));
        assert_eq!(rem(&poly(&[1, 0, 1]), &poly(&[0, 1]), &p), poly(&[1]));
        assert_eq!(gcd(&product, &poly(&[2, 1, 0]), &p), poly(&[2, 1]));
    }

    #[test]
    fn irreducibility() {
        let p3 = BigUint::from(3u32);
        let p5 = BigUint::from(5u32);
        // x^2 + 1 is irreducible over GF(3) but not over GF(5)
        assert!(is_irreducible(&poly(&[1, 0, 1]), &p3));
        assert!(!is_irreducible(&poly(&[1, 0, 1]), &p5));
        // x^3 + 2x + 1 is irreducible over GF(3)
        assert!(is_irreducible(&poly(&[1, 2, 0, 1]), &p3));
        // (x^2 + 1)^2 has no roots but is reducible
        let square = mul(&poly(&[1, 0, 1]), &poly(&[1, 0, 1]), &p3);
        assert!(!is_irreducible(&square, &p3));
    }

    #[test]
    fn first_irreducible() {
        assert_eq!(
            find_irreducible(&BigUint::from(3u32), 2),
            poly(&[1, 0, 1])
        );
        assert_eq!(
            find_irreducible(&BigUint::from(5u32), 2),
            poly(&[2, 0, 1])
        );
        assert_eq!(find_irreducible(&BigUint::from(7u32), 1), poly(&[0, 1]));
        let cubic = find_irreducible(&BigUint::from(2u32), 3);
        assert_eq!(cubic, poly(&[1, 1, 0, 1]));
    }

    #[test]
    fn integer_representation() {
        let p = BigUint::from(5u32);
        let coeffs = digits(&BigUint::from(23u32), &p, 2);
        assert_eq!(coeffs, vec![BigUint::from(3u32), BigUint::from(4u32)]);
        assert_eq!(to_integer(&coeffs, &p), BigUint::from(23u32));
    }
}
