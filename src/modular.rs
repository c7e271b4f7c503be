// Modular arithmetic on BigNum
// Barrett reduction, square-and-multiply exponentiation, extended Euclid

use crate::bignum::BigNum;
use crate::error::Error;

/// Precomputed-modulus accelerator for repeated reduction.
///
/// Stores `mu = 10^(2k) / modulus` for a modulus of `k` decimal digits,
/// computed once and reused for every reduction, replacing a full
/// division per multiplication inside the exponentiation loop with two
/// decimal shifts and two multiplications.
pub struct BarrettReducer {
    modulus: BigNum,
    mu: BigNum,
    k: usize,
}

impl BarrettReducer {
    pub fn new(modulus: &BigNum) -> Result<Self, Error> {
        if modulus.is_zero() {
            return Err(Error::ModulusZero);
        }
        let k = modulus.digit_len();
        let (mu, _) = BigNum::one().shift_left(2 * k).div_rem(modulus)?;
        Ok(BarrettReducer {
            modulus: modulus.clone(),
            mu,
            k,
        })
    }

    /// Reduce a non-negative value modulo the fixed modulus. The Barrett
    /// quotient is an approximation, so the tail corrects by at most a
    /// few additions or subtractions of the modulus.
    pub fn reduce(&self, x: &BigNum) -> BigNum {
        let q1 = x.shift_right_digits(self.k - 1);
        let q2 = &q1 * &self.mu;
        let q3 = q2.shift_right_digits(self.k + 1);
        let mut r = x - &(&q3 * &self.modulus);
        while r.is_negative() {
            r = &r + &self.modulus;
        }
        while r >= self.modulus {
            r = &r - &self.modulus;
        }
        r
    }
}

/// Modular exponentiation by square-and-multiply. One reducer is built
/// for the modulus and shared by every step; exponent bits are consumed
/// by repeated halving, reading parity off the least-significant decimal
/// digit.
pub fn mod_pow(base: &BigNum, exponent: &BigNum, modulus: &BigNum) -> Result<BigNum, Error> {
    let reducer = BarrettReducer::new(modulus)?;
    // everything is congruent to zero modulo one, including a^0
    if *modulus == BigNum::one() {
        return Ok(BigNum::zero());
    }
    let base = base.modulo(modulus)?;
    Ok(pow_with(&reducer, &base, exponent))
}

/// Exponentiation against an existing reducer; the base must already be
/// reduced below the modulus.
pub(crate) fn pow_with(reducer: &BarrettReducer, base: &BigNum, exponent: &BigNum) -> BigNum {
    let mut result = BigNum::one();
    let mut base = base.clone();
    let mut exp = exponent.clone();

    while !exp.is_zero() {
        if !exp.is_even() {
            result = reducer.reduce(&(&result * &base));
        }
        base = reducer.reduce(&(&base * &base));
        exp = exp.half();
    }

    result
}

/// Modular inverse by the iterative extended Euclidean algorithm. The
/// caller must ensure gcd(a, modulus) = 1; for non-coprime inputs the
/// output is unspecified (an interior division error may surface).
pub fn mod_inverse(a: &BigNum, modulus: &BigNum) -> Result<BigNum, Error> {
    if modulus.is_zero() {
        return Err(Error::ModulusZero);
    }

    let one = BigNum::one();
    let mut a = a.clone();
    let mut m = modulus.clone();
    let m0 = modulus.clone();
    let mut x = BigNum::one();
    let mut y = BigNum::zero();

    while a > one {
        let (q, r) = a.div_rem(&m)?;
        a = std::mem::replace(&mut m, r);
        let next_y = &x - &(&q * &y);
        x = std::mem::replace(&mut y, next_y);
    }

    if x.is_negative() {
        x = &x + &m0;
    }
    Ok(x)
}

/// Greatest common divisor of the magnitudes, plain Euclid.
pub fn gcd(a: &BigNum, b: &BigNum) -> BigNum {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        match a.div_rem(&b) {
            Ok((_, r)) => a = std::mem::replace(&mut b, r),
            // unreachable: b is non-zero inside the loop
            Err(_) => break,
        }
    }
    a
}
