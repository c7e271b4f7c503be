// RSA key pair generation
// Random odd candidates, sequential search, and a two-worker concurrent
// variant racing for the two primes independently

use std::thread;

use rand::Rng;

use crate::bignum::BigNum;
use crate::error::Error;
use crate::modular::{gcd, mod_inverse};
use crate::prime::is_probably_prime;

/// Standard public exponent.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Witness rounds per primality check during key generation.
const MILLER_RABIN_ROUNDS: u32 = 10;

/// RSA public key (modulus and public exponent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigNum,
    pub e: BigNum,
}

/// RSA private key, retaining the prime factors for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigNum,
    pub d: BigNum,
    pub p: BigNum,
    pub q: BigNum,
}

/// RSA key pair (both halves).
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub bit_length: u32,
}

/// Random odd value of exactly `bits` binary digits: the top and bottom
/// bits are forced to 1, interior bits are a random fill folded into the
/// decimal representation.
pub fn random_odd_candidate<R: Rng>(bits: u32, rng: &mut R) -> Result<BigNum, Error> {
    if bits < 2 {
        return Err(Error::BitLengthTooSmall(bits));
    }
    Ok(random_odd_unchecked(bits, rng))
}

fn random_odd_unchecked<R: Rng>(bits: u32, rng: &mut R) -> BigNum {
    debug_assert!(bits >= 2);
    let two = BigNum::from(2u64);
    // leading 1 bit, then fold random interior bits in base 10
    let mut acc = BigNum::one();
    for _ in 1..bits - 1 {
        acc = &(&acc * &two) + &BigNum::from(rng.gen_range(0..2u64));
    }
    // trailing 1 bit keeps the candidate odd
    &(&acc * &two) + &BigNum::one()
}

/// Loop candidate generation and primality testing until a prime shows
/// up. Unbounded in principle; the unbiased candidate draw keeps the
/// expected number of attempts proportional to the prime density.
fn find_prime<R: Rng>(bits: u32, rng: &mut R) -> BigNum {
    loop {
        let candidate = random_odd_unchecked(bits, rng);
        if is_probably_prime(&candidate, MILLER_RABIN_ROUNDS, rng) {
            return candidate;
        }
    }
}

/// Sequential RSA key pair generation.
///
/// Finds p and q (rejecting q == p) at half the requested modulus
/// length, fixes e = 65537, and restarts the whole prime search when
/// phi is divisible by e. Composite candidates and collisions are
/// expected outcomes of the probabilistic search, not errors.
pub fn generate_keypair<R: Rng>(bits: u32, rng: &mut R) -> Result<RsaKeyPair, Error> {
    let half_bits = bits / 2;
    if half_bits < 2 {
        return Err(Error::BitLengthTooSmall(half_bits));
    }

    let one = BigNum::one();
    loop {
        let p = find_prime(half_bits, rng);
        let q = loop {
            let candidate = find_prime(half_bits, rng);
            if candidate != p {
                break candidate;
            }
        };

        let n = &p * &q;
        let phi = &(&p - &one) * &(&q - &one);

        // phi % e == 0 is the cheap proxy for gcd(e, phi) != 1; on a bad
        // pairing the whole p/q search starts over
        if phi.rem_u64(PUBLIC_EXPONENT) == 0 {
            continue;
        }

        let e = BigNum::from(PUBLIC_EXPONENT);
        let d = mod_inverse(&e, &phi)?;

        return Ok(RsaKeyPair {
            public_key: RsaPublicKey { n: n.clone(), e },
            private_key: RsaPrivateKey { n, d, p, q },
            bit_length: bits,
        });
    }
}

/// Concurrent RSA key pair generation.
///
/// Two worker threads search for the two primes independently; each
/// loops over candidate/test cycles and hands its prime back through a
/// write-once slot (the thread's return value), so no lock is held
/// across the search and the workers never observe each other. A
/// duplicate second prime reruns only the second search. Unlike the
/// sequential path, an unacceptable exponent/modulus pairing is repaired
/// by stepping e upward by 2 instead of restarting the prime search;
/// the asymmetry is deliberate.
pub fn generate_keypair_concurrent(bits: u32) -> Result<RsaKeyPair, Error> {
    let half_bits = bits / 2;
    if half_bits < 2 {
        return Err(Error::BitLengthTooSmall(half_bits));
    }

    let spawn_search = || {
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            find_prime(half_bits, &mut rng)
        })
    };

    let p_worker = spawn_search();
    let q_worker = spawn_search();
    let p = p_worker.join().expect("prime search worker panicked");
    let mut q = q_worker.join().expect("prime search worker panicked");
    while q == p {
        q = spawn_search().join().expect("prime search worker panicked");
    }

    let one = BigNum::one();
    let two = BigNum::from(2u64);
    let n = &p * &q;
    let phi = &(&p - &one) * &(&q - &one);

    let mut e = BigNum::from(PUBLIC_EXPONENT);
    while gcd(&e, &phi) != one {
        e = &e + &two;
    }
    let d = mod_inverse(&e, &phi)?;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n: n.clone(), e },
        private_key: RsaPrivateKey { n, d, p, q },
        bit_length: bits,
    })
}
