// Miller-Rabin probabilistic primality testing
// Small-prime trial division pre-filter, then the standard witness loop

use rand::Rng;

use crate::bignum::BigNum;
use crate::modular::{pow_with, BarrettReducer};

/// First 30 primes, used for fast trial-division rejection.
const SMALL_PRIMES: [u64; 30] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113,
];

/// Miller-Rabin primality test with `rounds` random witnesses.
///
/// The false-positive probability is at most 4^-rounds per call; a
/// composite verdict is always exact.
pub fn is_probably_prime<R: Rng>(n: &BigNum, rounds: u32, rng: &mut R) -> bool {
    let two = BigNum::from(2u64);
    let three = BigNum::from(3u64);
    if *n == two || *n == three {
        return true;
    }
    if *n < two || n.is_even() {
        return false;
    }

    // trial division against the small-prime table
    for p in SMALL_PRIMES {
        if *n == BigNum::from(p) {
            return true;
        }
        if n.rem_u64(p) == 0 {
            return false;
        }
    }

    // n - 1 = d * 2^r with d odd
    let one = BigNum::one();
    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d = d.half();
        r += 1;
    }

    let reducer = match BarrettReducer::new(n) {
        Ok(reducer) => reducer,
        // unreachable: n is odd and above the trial-division table here
        Err(_) => unreachable!("modulus is non-zero"),
    };
    let witness_span = n - &three; // |[2, n-2]|

    for _ in 0..rounds {
        let a = &two + &BigNum::random_below(&witness_span, rng);
        let mut x = pow_with(&reducer, &a, &d);
        if x == one || x == n_minus_one {
            continue;
        }

        let mut composite = true;
        for _ in 1..r {
            x = reducer.reduce(&(&x * &x));
            if x == n_minus_one {
                composite = false;
                break;
            }
        }
        if composite {
            return false;
        }
    }

    true
}
