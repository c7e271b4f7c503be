// Arbitrary-precision signed integers
// Digit-array representation with schoolbook and Karatsuba multiplication

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;

/// Operand digit count below which multiplication stays schoolbook.
const KARATSUBA_THRESHOLD: usize = 32;

/// Signed arbitrary-precision integer.
///
/// Digits are decimal (0-9), stored least-significant first. Invariants:
/// the digit vector is never empty, carries no high-order zero digits
/// except for the single digit of the value zero, and zero is never
/// negative. Every operation returns a new, normalized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNum {
    digits: Vec<u8>,
    negative: bool,
}

impl BigNum {
    pub fn zero() -> Self {
        BigNum { digits: vec![0], negative: false }
    }

    pub fn one() -> Self {
        BigNum { digits: vec![1], negative: false }
    }

    /// Build from raw parts and restore the invariants.
    fn from_parts(digits: Vec<u8>, negative: bool) -> Self {
        let mut value = BigNum { digits, negative };
        value.normalize();
        value
    }

    fn normalize(&mut self) {
        while self.digits.len() > 1 && self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        if self.digits.is_empty() {
            self.digits.push(0);
        }
        if self.digits[..] == [0] {
            self.negative = false;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits[..] == [0]
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Parity of the represented value; decimal digit parity matches it.
    pub fn is_even(&self) -> bool {
        self.digits[0] % 2 == 0
    }

    /// Number of decimal digits.
    pub fn digit_len(&self) -> usize {
        self.digits.len()
    }

    pub fn abs(&self) -> BigNum {
        BigNum { digits: self.digits.clone(), negative: false }
    }

    /// Truncating division with remainder. The quotient truncates toward
    /// zero and the raw remainder keeps the dividend's sign.
    pub fn div_rem(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), Error> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (q, r) = divmod_magnitude(&self.digits, &divisor.digits);
        let quotient = BigNum::from_parts(q, self.negative != divisor.negative);
        let remainder = BigNum::from_parts(r, self.negative);
        Ok((quotient, remainder))
    }

    /// Euclidean remainder: a negative raw remainder is normalized by
    /// adding the divisor once, so the result is non-negative for any
    /// positive modulus.
    pub fn modulo(&self, modulus: &BigNum) -> Result<BigNum, Error> {
        let (_, mut r) = self.div_rem(modulus)?;
        if r.negative {
            r = &r + modulus;
        }
        Ok(r)
    }

    /// Multiply by 10^m by prepending zero digits.
    pub fn shift_left(&self, m: usize) -> BigNum {
        if self.is_zero() {
            return BigNum::zero();
        }
        let mut digits = vec![0u8; m + self.digits.len()];
        digits[m..].copy_from_slice(&self.digits);
        BigNum { digits, negative: self.negative }
    }

    /// Divide by 10^n by dropping the low digits; zero once n covers the
    /// whole number.
    pub fn shift_right_digits(&self, n: usize) -> BigNum {
        if n >= self.digits.len() {
            return BigNum::zero();
        }
        BigNum::from_parts(self.digits[n..].to_vec(), self.negative)
    }

    /// Halve the magnitude (binary right shift by one), top digit down,
    /// carrying one bit per step.
    pub fn half(&self) -> BigNum {
        let mut digits = vec![0u8; self.digits.len()];
        let mut carry = 0u8;
        for i in (0..self.digits.len()).rev() {
            let cur = carry * 10 + self.digits[i];
            digits[i] = cur / 2;
            carry = cur % 2;
        }
        BigNum::from_parts(digits, self.negative)
    }

    /// Remainder of the magnitude by a small non-zero modulus.
    pub(crate) fn rem_u64(&self, m: u64) -> u64 {
        debug_assert!(m != 0);
        let mut r = 0u64;
        for &d in self.digits.iter().rev() {
            r = (r * 10 + d as u64) % m;
        }
        r
    }

    /// Short division of the magnitude by a small non-zero divisor.
    pub(crate) fn div_rem_u64(&self, m: u64) -> (BigNum, u64) {
        debug_assert!(m != 0);
        let mut out = vec![0u8; self.digits.len()];
        let mut r = 0u64;
        for i in (0..self.digits.len()).rev() {
            let cur = r * 10 + self.digits[i] as u64;
            out[i] = (cur / m) as u8;
            r = cur % m;
        }
        (BigNum::from_parts(out, false), r)
    }

    /// Uniform value in [0, bound) drawn by random digit fill with
    /// rejection.
    pub fn random_below<R: Rng>(bound: &BigNum, rng: &mut R) -> BigNum {
        debug_assert!(!bound.is_zero() && !bound.negative);
        loop {
            let digits = (0..bound.digits.len())
                .map(|_| rng.gen_range(0..10u8))
                .collect();
            let candidate = BigNum::from_parts(digits, false);
            if candidate < *bound {
                return candidate;
            }
        }
    }
}

impl From<u64> for BigNum {
    fn from(mut v: u64) -> Self {
        if v == 0 {
            return BigNum::zero();
        }
        let mut digits = Vec::new();
        while v > 0 {
            digits.push((v % 10) as u8);
            v /= 10;
        }
        BigNum { digits, negative: false }
    }
}

impl From<i64> for BigNum {
    fn from(v: i64) -> Self {
        let mut value = BigNum::from(v.unsigned_abs());
        value.negative = v < 0;
        value
    }
}

impl FromStr for BigNum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Ok(BigNum::zero());
        }
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if body.is_empty() {
            return Err(Error::InvalidDigit('-'));
        }
        let mut digits = Vec::with_capacity(body.len());
        for c in body.chars().rev() {
            match c.to_digit(10) {
                Some(d) => digits.push(d as u8),
                None => return Err(Error::InvalidDigit(c)),
            }
        }
        Ok(BigNum::from_parts(digits, negative))
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.digits.len() + 1);
        if self.negative {
            out.push('-');
        }
        for &d in self.digits.iter().rev() {
            out.push((b'0' + d) as char);
        }
        f.write_str(&out)
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_magnitude(&self.digits, &other.digits),
            (true, true) => cmp_magnitude(&other.digits, &self.digits),
        }
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for &BigNum {
    type Output = BigNum;

    fn neg(self) -> BigNum {
        let mut value = self.clone();
        if !value.is_zero() {
            value.negative = !value.negative;
        }
        value
    }
}

impl Neg for BigNum {
    type Output = BigNum;

    fn neg(self) -> BigNum {
        -&self
    }
}

impl Add for &BigNum {
    type Output = BigNum;

    fn add(self, rhs: &BigNum) -> BigNum {
        add_signed(self, rhs)
    }
}

impl Add for BigNum {
    type Output = BigNum;

    fn add(self, rhs: BigNum) -> BigNum {
        add_signed(&self, &rhs)
    }
}

impl Sub for &BigNum {
    type Output = BigNum;

    fn sub(self, rhs: &BigNum) -> BigNum {
        add_signed(self, &-rhs)
    }
}

impl Sub for BigNum {
    type Output = BigNum;

    fn sub(self, rhs: BigNum) -> BigNum {
        add_signed(&self, &-rhs)
    }
}

impl Mul for &BigNum {
    type Output = BigNum;

    fn mul(self, rhs: &BigNum) -> BigNum {
        BigNum::from_parts(
            mul_magnitude(&self.digits, &rhs.digits),
            self.negative != rhs.negative,
        )
    }
}

impl Mul for BigNum {
    type Output = BigNum;

    fn mul(self, rhs: BigNum) -> BigNum {
        &self * &rhs
    }
}

/// Signed addition dispatching on the operand signs: same sign adds
/// magnitudes, opposite signs subtract the smaller magnitude from the
/// larger and take that operand's sign.
fn add_signed(a: &BigNum, b: &BigNum) -> BigNum {
    if a.negative == b.negative {
        return BigNum::from_parts(add_magnitude(&a.digits, &b.digits), a.negative);
    }
    match cmp_magnitude(&a.digits, &b.digits) {
        Ordering::Equal => BigNum::zero(),
        Ordering::Greater => {
            BigNum::from_parts(sub_magnitude(&a.digits, &b.digits), a.negative)
        }
        Ordering::Less => {
            BigNum::from_parts(sub_magnitude(&b.digits, &a.digits), b.negative)
        }
    }
}

/// Magnitude comparison: digit count first, then most-significant digit
/// down. Both slices must be free of high-order zeros.
fn cmp_magnitude(a: &[u8], b: &[u8]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for i in (0..a.len()).rev() {
        if a[i] != b[i] {
            return a[i].cmp(&b[i]);
        }
    }
    Ordering::Equal
}

fn digit_at(digits: &[u8], i: usize) -> u32 {
    digits.get(i).copied().unwrap_or(0) as u32
}

/// Grade-school addition; the loop keeps going while a carry remains,
/// so a final carry digit is never dropped.
fn add_magnitude(a: &[u8], b: &[u8]) -> Vec<u8> {
    let longest = a.len().max(b.len());
    let mut out = Vec::with_capacity(longest + 1);
    let mut carry = 0u32;
    let mut i = 0;
    while i < longest || carry > 0 {
        let sum = digit_at(a, i) + digit_at(b, i) + carry;
        out.push((sum % 10) as u8);
        carry = sum / 10;
        i += 1;
    }
    out
}

/// Grade-school subtraction; requires the value of `a` to be at least
/// the value of `b`.
fn sub_magnitude(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i32;
    for i in 0..a.len() {
        let mut diff = a[i] as i32 - borrow - digit_at(b, i) as i32;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u8);
    }
    out
}

fn mul_schoolbook(a: &[u8], b: &[u8]) -> Vec<u8> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0u8; a.len() + b.len()];
    for (i, &da) in a.iter().enumerate() {
        if da == 0 {
            continue;
        }
        let mut carry = 0u32;
        for (j, &db) in b.iter().enumerate() {
            let t = out[i + j] as u32 + da as u32 * db as u32 + carry;
            out[i + j] = (t % 10) as u8;
            carry = t / 10;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let t = out[k] as u32 + carry;
            out[k] = (t % 10) as u8;
            carry = t / 10;
            k += 1;
        }
    }
    out
}

/// Magnitude multiplication: schoolbook below the threshold, Karatsuba
/// above it. Splits at half the longer operand and recombines
/// z1*10^(2m) + z2*10^m + z0 with a final carry pass, since the combined
/// digit slots can exceed single-digit range.
fn mul_magnitude(a: &[u8], b: &[u8]) -> Vec<u8> {
    if a.len() < KARATSUBA_THRESHOLD || b.len() < KARATSUBA_THRESHOLD {
        return mul_schoolbook(a, b);
    }

    let m = a.len().max(b.len()) / 2;
    let (a_lo, a_hi) = a.split_at(a.len().min(m));
    let (b_lo, b_hi) = b.split_at(b.len().min(m));

    let z0 = mul_magnitude(a_lo, b_lo);
    let z1 = mul_magnitude(a_hi, b_hi);
    let sum_a = add_magnitude(a_lo, a_hi);
    let sum_b = add_magnitude(b_lo, b_hi);
    // z2 = (a_lo + a_hi)(b_lo + b_hi) - z0 - z1, never negative
    let mut z2 = mul_magnitude(&sum_a, &sum_b);
    z2 = sub_magnitude(&z2, &z0);
    z2 = sub_magnitude(&z2, &z1);

    let len = (2 * m + z1.len()).max(m + z2.len()).max(z0.len()).max(1);
    let mut acc = vec![0u32; len];
    for (i, &d) in z0.iter().enumerate() {
        acc[i] += d as u32;
    }
    for (i, &d) in z2.iter().enumerate() {
        acc[m + i] += d as u32;
    }
    for (i, &d) in z1.iter().enumerate() {
        acc[2 * m + i] += d as u32;
    }

    let mut out = Vec::with_capacity(acc.len() + 1);
    let mut carry = 0u32;
    for v in acc {
        let t = v + carry;
        out.push((t % 10) as u8);
        carry = t / 10;
    }
    while carry > 0 {
        out.push((carry % 10) as u8);
        carry /= 10;
    }
    out
}

/// Long division over magnitudes, most-significant dividend digit first.
/// Each quotient digit is found by binary search over the ten candidate
/// multiples of the divisor.
fn divmod_magnitude(dividend: &[u8], divisor: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let multiples: Vec<BigNum> = (0..=9u64)
        .map(|x| {
            BigNum::from_parts(
                mul_schoolbook_any(divisor, x),
                false,
            )
        })
        .collect();

    let mut quotient = vec![0u8; dividend.len()];
    let mut remainder = BigNum::zero();

    for i in (0..dividend.len()).rev() {
        // remainder = remainder * 10 + next dividend digit
        remainder.digits.insert(0, dividend[i]);
        remainder.normalize();

        let mut x = 0usize;
        let (mut lo, mut hi) = (0usize, 9usize);
        while lo <= hi {
            let mid = (lo + hi) / 2;
            if multiples[mid] <= remainder {
                x = mid;
                lo = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                hi = mid - 1;
            }
        }

        quotient[i] = x as u8;
        remainder =
            BigNum::from_parts(sub_magnitude(&remainder.digits, &multiples[x].digits), false);
    }

    (quotient, remainder.digits)
}

/// Multiply a digit slice by a single machine word, used to precompute
/// divisor multiples for long division.
fn mul_schoolbook_any(digits: &[u8], factor: u64) -> Vec<u8> {
    if factor == 0 {
        return vec![0];
    }
    let mut out = Vec::with_capacity(digits.len() + 1);
    let mut carry = 0u64;
    for &d in digits {
        let t = d as u64 * factor + carry;
        out.push((t % 10) as u8);
        carry = t / 10;
    }
    while carry > 0 {
        out.push((carry % 10) as u8);
        carry /= 10;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    fn reference(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    fn random_decimal(len: usize, rng: &mut StdRng) -> String {
        let mut s = String::with_capacity(len);
        s.push((b'1' + rng.gen_range(0..9u8)) as char);
        for _ in 1..len {
            s.push((b'0' + rng.gen_range(0..10u8)) as char);
        }
        s
    }

    #[test]
    fn parse_and_display_roundtrip() {
        assert_eq!(big("0").to_string(), "0");
        assert_eq!(big("-0").to_string(), "0");
        assert_eq!(big("00123").to_string(), "123");
        assert_eq!(big("-00123").to_string(), "-123");
        assert_eq!(
            big("12345678901234567890").to_string(),
            "12345678901234567890"
        );
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert_eq!(
            "12a3".parse::<BigNum>(),
            Err(Error::InvalidDigit('a'))
        );
        assert_eq!("-".parse::<BigNum>(), Err(Error::InvalidDigit('-')));
        assert_eq!(" 1".parse::<BigNum>(), Err(Error::InvalidDigit(' ')));
    }

    #[test]
    fn from_machine_integers() {
        assert_eq!(BigNum::from(0u64).to_string(), "0");
        assert_eq!(BigNum::from(65537u64).to_string(), "65537");
        assert_eq!(BigNum::from(-42i64).to_string(), "-42");
        assert_eq!(BigNum::from(i64::MIN).to_string(), i64::MIN.to_string());
    }

    #[test]
    fn comparison_ordering() {
        assert!(big("2") < big("10"));
        assert!(big("-10") < big("-2"));
        assert!(big("-1") < big("1"));
        assert!(big("100") > big("99"));
        assert_eq!(big("0"), -big("0"));
    }

    #[test]
    fn addition_and_subtraction_identities() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let sa = random_decimal(40, &mut rng);
            let sb = random_decimal(35, &mut rng);
            for (a, b) in [
                (big(&sa), big(&sb)),
                (-big(&sa), big(&sb)),
                (big(&sa), -big(&sb)),
                (-big(&sa), -big(&sb)),
            ] {
                assert_eq!(&(&a + &b) - &b, a);
                assert_eq!(&(&a - &b) + &b, a);
            }
        }
    }

    #[test]
    fn addition_matches_reference() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let sa = random_decimal(45, &mut rng);
            let sb = random_decimal(20, &mut rng);
            let sum = &big(&sa) + &big(&sb);
            assert_eq!(sum.to_string(), (reference(&sa) + reference(&sb)).to_string());
            let diff = &big(&sb) - &big(&sa);
            assert_eq!(
                diff.to_string(),
                (reference(&sb) - reference(&sa)).to_string()
            );
        }
    }

    #[test]
    fn opposite_signs_equal_magnitude_is_zero() {
        let a = big("987654321987654321");
        let zero = &a + &-&a;
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }

    #[test]
    fn multiplication_identities() {
        let a = big("123456789123456789");
        assert_eq!(&a * &BigNum::one(), a);
        assert!((&a * &BigNum::zero()).is_zero());
        assert!((&-&a * &a).is_negative());
        assert!(!(&-&a * &BigNum::zero()).is_negative());
        assert_eq!(&-&a * &-&a, &a * &a);
    }

    #[test]
    fn karatsuba_matches_schoolbook() {
        // operand sizes straddling and above the threshold
        let mut rng = StdRng::seed_from_u64(23);
        for (la, lb) in [(30, 40), (40, 30), (64, 64), (100, 37), (80, 120)] {
            let sa = random_decimal(la, &mut rng);
            let sb = random_decimal(lb, &mut rng);
            let a = big(&sa);
            let b = big(&sb);
            let fast = mul_magnitude(&a.digits, &b.digits);
            let slow = mul_schoolbook(&a.digits, &b.digits);
            assert_eq!(
                BigNum::from_parts(fast, false),
                BigNum::from_parts(slow, false)
            );
        }
    }

    #[test]
    fn multiplication_matches_reference() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..20 {
            let sa = random_decimal(70, &mut rng);
            let sb = random_decimal(55, &mut rng);
            let product = &big(&sa) * &big(&sb);
            assert_eq!(
                product.to_string(),
                (reference(&sa) * reference(&sb)).to_string()
            );
        }
    }

    #[test]
    fn division_truncates_toward_zero() {
        let two = big("2");
        let (q, r) = big("7").div_rem(&two).unwrap();
        assert_eq!((q.to_string(), r.to_string()), ("3".into(), "1".into()));
        let (q, r) = big("-7").div_rem(&two).unwrap();
        assert_eq!((q.to_string(), r.to_string()), ("-3".into(), "-1".into()));
        let (q, r) = big("7").div_rem(&big("-2")).unwrap();
        assert_eq!((q.to_string(), r.to_string()), ("-3".into(), "1".into()));
        let (q, r) = big("-7").div_rem(&big("-2")).unwrap();
        assert_eq!((q.to_string(), r.to_string()), ("3".into(), "-1".into()));
    }

    #[test]
    fn division_matches_reference() {
        let mut rng = StdRng::seed_from_u64(43);
        for _ in 0..30 {
            let sa = random_decimal(50, &mut rng);
            let sb = random_decimal(18, &mut rng);
            let (q, r) = big(&sa).div_rem(&big(&sb)).unwrap();
            let (ra, rb) = (reference(&sa), reference(&sb));
            assert_eq!(q.to_string(), (&ra / &rb).to_string());
            assert_eq!(r.to_string(), (&ra % &rb).to_string());
        }
    }

    #[test]
    fn euclidean_modulo_is_non_negative() {
        let b = big("13");
        let m = big("-40").modulo(&b).unwrap();
        assert_eq!(m.to_string(), "12");
        assert!(!m.is_negative());
        // raw remainder stays truncating
        let (_, raw) = big("-40").div_rem(&b).unwrap();
        assert_eq!(raw.to_string(), "-1");
        // consistency: a - (a/b)*b equals the raw remainder
        let (q, raw) = big("-40").div_rem(&b).unwrap();
        assert_eq!(&big("-40") - &(&q * &b), raw);
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(
            big("5").div_rem(&BigNum::zero()),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            big("5").modulo(&BigNum::zero()),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn decimal_shifts() {
        assert_eq!(big("123").shift_left(3).to_string(), "123000");
        assert_eq!(BigNum::zero().shift_left(5), BigNum::zero());
        assert_eq!(big("123456").shift_right_digits(3).to_string(), "123");
        assert_eq!(big("123").shift_right_digits(5), BigNum::zero());
        assert_eq!(big("-9100").shift_right_digits(2).to_string(), "-91");
    }

    #[test]
    fn halving() {
        assert_eq!(big("25").half().to_string(), "12");
        assert_eq!(big("1024").half().to_string(), "512");
        assert_eq!(big("1").half(), BigNum::zero());
        assert_eq!(big("-25").half().to_string(), "-12");
        let big_even = big("123456789012345678901234567890");
        assert_eq!(&big_even.half() + &big_even.half(), big_even);
    }

    #[test]
    fn small_divisor_helpers() {
        let a = big("123456789123456789");
        assert_eq!(a.rem_u64(97), 123456789123456789u64 % 97);
        let (q, r) = a.div_rem_u64(128);
        assert_eq!(q.to_string(), (123456789123456789u64 / 128).to_string());
        assert_eq!(r, 123456789123456789u64 % 128);
    }

    #[test]
    fn random_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let bound = big("1000000000000000000000");
        for _ in 0..200 {
            let v = BigNum::random_below(&bound, &mut rng);
            assert!(v < bound);
            assert!(!v.is_negative());
        }
    }
}
