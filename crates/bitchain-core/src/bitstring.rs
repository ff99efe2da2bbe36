//! Bitstring selecting one pool factor per chain position.

use std::fmt;
use std::str::FromStr;

use crate::evaluator::ChainError;

/// Non-empty sequence of bits, each 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bits: Vec<u8>,
}

impl Bitstring {
    /// Validate and wrap a sequence of bit values.
    pub fn new(bits: Vec<u8>) -> Result<Self, ChainError> {
        if bits.is_empty() {
            return Err(ChainError::InvalidInput(
                "bitstring must contain at least one bit".into(),
            ));
        }
        if let Some(i) = bits.iter().position(|&b| b > 1) {
            return Err(ChainError::InvalidInput(format!(
                "bit {i} has value {}, expected 0 or 1",
                bits[i]
            )));
        }
        Ok(Self { bits })
    }

    /// Build from booleans (`true` selects A1).
    pub fn from_bools<I: IntoIterator<Item = bool>>(bits: I) -> Result<Self, ChainError> {
        Self::new(bits.into_iter().map(u8::from).collect())
    }

    /// Chain length n.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false: a `Bitstring` holds at least one bit.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> Option<u8> {
        self.bits.get(i).copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits.iter().copied()
    }

    /// Number of positions selecting A1.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bits {
            write!(f, "{b}")?;
        }
        Ok(())
    }
}

/// Parses `"0110"`; whitespace and `_` separators are ignored.
impl FromStr for Bitstring {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for c in s.chars().filter(|c| !c.is_whitespace() && *c != '_') {
            match c {
                '0' => bits.push(0),
                '1' => bits.push(1),
                other => {
                    return Err(ChainError::InvalidInput(format!(
                        "invalid bit character {other:?}"
                    )))
                }
            }
        }
        Self::new(bits)
    }
}
