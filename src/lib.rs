// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of sequencing error profiles into sampling-ready models,
//! and paired-end read simulation based on them.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate derive_builder;

pub mod alphabet;
pub mod cdf;
pub mod cli;
pub mod conversion;
pub mod errors;
pub mod model;
pub mod simulation;
