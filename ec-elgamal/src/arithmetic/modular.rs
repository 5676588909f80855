//! Arithmetic on residues modulo a runtime prime.
//!
//! Every function expects its operands to already be reduced, i.e. in
//! `[0, modulus)`.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

const WITNESSES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

pub fn add_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    let sum = lhs + rhs;
    if &sum >= modulus {
        sum - modulus
    } else {
        sum
    }
}

pub fn sub_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    if lhs >= rhs {
        lhs - rhs
    } else {
        modulus - (rhs - lhs)
    }
}

pub fn neg_mod(number: &BigUint, modulus: &BigUint) -> BigUint {
    if number.is_zero() {
        BigUint::zero()
    } else {
        modulus - number
    }
}

pub fn mul_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    (lhs * rhs) % modulus
}

/// Inverse by Fermat's little theorem, `None` for zero.
///
/// Only meaningful for a prime modulus.
pub fn inv_mod(number: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if number.is_zero() {
        return None;
    }
    let exponent = modulus - 2u32;
    Some(number.modpow(&exponent, modulus))
}

/// Baillie-PSW: Miller-Rabin over the first thirteen primes followed by a
/// strong Lucas test with Selfridge parameters.
///
/// No composite passing both halves is known.
pub fn is_prime(candidate: &BigUint) -> bool {
    if candidate < &BigUint::from(2u32) {
        return false;
    }
    for &small in WITNESSES.iter() {
        let small = BigUint::from(small);
        if candidate == &small {
            return true;
        }
        if (candidate % &small).is_zero() {
            return false;
        }
    }

    let candidate_minus_one = candidate - 1u32;
    // candidate is odd here, so the shift is at least one
    let shift = candidate_minus_one.trailing_zeros().unwrap_or(0);
    let odd_part = &candidate_minus_one >> shift;

    'witness: for &witness in WITNESSES.iter() {
        let mut x = BigUint::from(witness).modpow(&odd_part, candidate);
        if x.is_one() || x == candidate_minus_one {
            continue;
        }
        for _ in 1..shift {
            x = mul_mod(&x, &x, candidate);
            if x == candidate_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    is_strong_lucas_probable_prime(candidate)
}

/// Jacobi symbol `(a / n)` for odd positive `n`.
fn jacobi(a: &BigInt, n: &BigInt) -> i32 {
    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut result = 1;
    while !a.is_zero() {
        while a.is_even() {
            a >>= 1u32;
            let n_mod_8 = (&n % 8u32).to_u32().unwrap_or_default();
            if n_mod_8 == 3 || n_mod_8 == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if (&a % 4u32) == BigInt::from(3) && (&n % 4u32) == BigInt::from(3) {
            result = -result;
        }
        a = a.mod_floor(&n);
    }
    if n.is_one() {
        result
    } else {
        0
    }
}

// x / 2 modulo an odd n
fn half_mod(x: BigInt, n: &BigInt) -> BigInt {
    let x = x.mod_floor(n);
    if x.is_odd() {
        (x + n) >> 1u32
    } else {
        x >> 1u32
    }
}

/// Strong Lucas probable-prime test with `P = 1`, `Q = (1 - D) / 4` where
/// `D` is the first of `5, -7, 9, -11, ...` with `(D / n) = -1`.
///
/// Expects an odd `n` without small factors.
fn is_strong_lucas_probable_prime(candidate: &BigUint) -> bool {
    let root = candidate.sqrt();
    if &(&root * &root) == candidate {
        // no suitable D exists for a perfect square
        return false;
    }
    let n = BigInt::from(candidate.clone());

    let mut d = BigInt::from(5);
    loop {
        match jacobi(&d, &n) {
            -1 => break,
            0 if d.magnitude() != candidate => return false,
            _ => {}
        }
        d = if d.is_positive() { -(d + 2u32) } else { -d + 2u32 };
    }
    let q: BigInt = (BigInt::one() - &d) / 4;

    let n_plus_one = candidate + 1u32;
    let shift = n_plus_one.trailing_zeros().unwrap_or(0);
    let odd_part = &n_plus_one >> shift;

    // U_1 = 1, V_1 = P = 1, then double and add over the remaining bits
    let mut u = BigInt::one();
    let mut v = BigInt::one();
    let mut q_k = q.mod_floor(&n);
    for bit in (0..odd_part.bits().saturating_sub(1)).rev() {
        u = (&u * &v).mod_floor(&n);
        v = (&v * &v - (&q_k << 1u32)).mod_floor(&n);
        q_k = (&q_k * &q_k).mod_floor(&n);
        if odd_part.bit(bit) {
            let next_u = half_mod(&u + &v, &n);
            let next_v = half_mod(&d * &u + &v, &n);
            u = next_u;
            v = next_v;
            q_k = (&q_k * &q).mod_floor(&n);
        }
    }

    if u.is_zero() || v.is_zero() {
        return true;
    }
    for _ in 1..shift {
        v = (&v * &v - (&q_k << 1u32)).mod_floor(&n);
        q_k = (&q_k * &q_k).mod_floor(&n);
        if v.is_zero() {
            return true;
        }
    }
    false
}

/// Distinct prime divisors of a small integer, ascending.
pub fn prime_divisors(mut number: u32) -> Vec<u32> {
    let mut divisors = Vec::new();
    let mut divisor = 2u32;
    while divisor.saturating_mul(divisor) <= number {
        if number % divisor == 0 {
            divisors.push(divisor);
            while number % divisor == 0 {
                number /= divisor;
            }
        }
        divisor += 1;
    }
    if number > 1 {
        divisors.push(number);
    }
    divisors
}
