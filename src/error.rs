// Error types for the big-integer engine and key generation

use thiserror::Error;

/// Errors raised by the integer engine and key generation.
///
/// These are programmer/input errors and surface at the point of
/// violation; transient outcomes of probabilistic search (a composite
/// candidate, a prime collision) are handled by retry loops and are
/// never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Numeric string contains a character other than an ASCII digit.
    #[error("invalid character {0:?} in numeric string")]
    InvalidDigit(char),

    /// Division or remainder with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Modular exponentiation or inversion with a zero modulus.
    #[error("modulus is zero")]
    ModulusZero,

    /// Random candidate generation needs at least two bits.
    #[error("bit length must be at least 2, got {0}")]
    BitLengthTooSmall(u32),
}
