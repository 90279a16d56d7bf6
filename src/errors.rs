// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid nucleotide symbol {symbol:?}, expected one of A, C, G, T")]
    InvalidSymbol { symbol: char },
    #[error("field {field} has zero total mass, cannot normalize into a distribution")]
    ZeroTotalMass { field: String },
    #[error("invalid CDF: {msg}")]
    InvalidCdf { msg: String },
    #[error("substitution table at read position {position} has no entry for base {symbol}")]
    MissingSubstitutionEntry { position: usize, symbol: char },
    #[error("exactly one of --model and --builtin must be given")]
    AmbiguousModel,
    #[error("abundance file contains duplicate name {name}")]
    DuplicateAbundanceName { name: String },
    #[error("bad abundance value {value} for {name}, must be positive")]
    InvalidAbundanceValue { name: String, value: f64 },
    #[error("unrecognized name {name} in abundance file, it matches no input sequence group")]
    UnknownAbundanceName { name: String },
    #[error("no abundances in file")]
    EmptyAbundanceFile,
    #[error("{requested} genomes were requested but only {found} genomes were found")]
    NotEnoughGenomes { requested: usize, found: usize },
    #[error("number of reads needs to be at least 1")]
    NoReadsRequested,
    #[error("found no input files")]
    NoInputFiles,
}
