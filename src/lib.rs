// rsa_engine - from-scratch arbitrary-precision integers and RSA
// Exports the integer engine, modular arithmetic, primality testing,
// key generation, and the radix-128 message codec

pub mod bignum;
pub mod codec;
pub mod error;
pub mod keygen;
pub mod modular;
pub mod prime;

pub use bignum::BigNum;
pub use codec::{decrypt_chunks, encrypt_chunks, sign_chunks, verify_chunks, CodecError};
pub use error::Error;
pub use keygen::{
    generate_keypair, generate_keypair_concurrent, random_odd_candidate, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey, PUBLIC_EXPONENT,
};
pub use modular::{gcd, mod_inverse, mod_pow, BarrettReducer};
pub use prime::is_probably_prime;
