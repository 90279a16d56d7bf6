// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The fixed nucleotide alphabet and its index mapping.
//!
//! Every converted table is indexed positionally by this alphabet, so the
//! mapping is shared by all conversions and must never change order.

use crate::errors::Error;

/// A nucleotide of the fixed alphabet {A, C, G, T}.
///
/// The discriminant is the alphabet index used by all converted tables.
#[repr(usize)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

pub const ALPHABET: [Nucleotide; 4] = [
    Nucleotide::A,
    Nucleotide::C,
    Nucleotide::G,
    Nucleotide::T,
];

impl Nucleotide {
    /// Alphabet index of this nucleotide (0-3).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Nucleotide at the given alphabet index.
    ///
    /// # Panics
    /// Panics if `index` is not in 0..4.
    pub fn from_index(index: usize) -> Self {
        ALPHABET[index]
    }

    pub fn from_symbol(symbol: char) -> Result<Self, Error> {
        use Nucleotide::*;
        match symbol.to_ascii_uppercase() {
            'A' => Ok(A),
            'C' => Ok(C),
            'G' => Ok(G),
            'T' => Ok(T),
            _ => Err(Error::InvalidSymbol { symbol }),
        }
    }

    /// Like `from_symbol`, but for raw sequence bytes and without an error:
    /// ambiguous bases (N etc.) yield `None` and are skipped by callers.
    pub fn from_ascii(symbol: u8) -> Option<Self> {
        use Nucleotide::*;
        match symbol.to_ascii_uppercase() {
            b'A' => Some(A),
            b'C' => Some(C),
            b'G' => Some(G),
            b'T' => Some(T),
            _ => None,
        }
    }

    pub fn to_ascii(self) -> u8 {
        use Nucleotide::*;
        match self {
            A => b'A',
            C => b'C',
            G => b'G',
            T => b'T',
        }
    }

    pub fn symbol(self) -> char {
        self.to_ascii() as char
    }

    pub fn complement(self) -> Self {
        use Nucleotide::*;
        match self {
            A => T,
            C => G,
            G => C,
            T => A,
        }
    }
}
