// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Abundance distributions over the simulated genomes.
//!
//! Each generator returns a normalized vector of length `n` with `nz`
//! non-zero values at random positions.

use rand::distributions::Distribution;
use rand::seq::index;
use rand::Rng;
use statrs::distribution::Normal;
use strum_macros::{Display, EnumString, EnumVariantNames, IntoStaticStr};

// Standard deviation of the normal distribution inside the lognormal.
const LOGNORMAL_SCALE: f64 = 1.5;

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Display, EnumString, EnumVariantNames, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum AbundanceDistribution {
    LogNormal,
    Uniform,
    HalfNormal,
    Exponential,
}

impl AbundanceDistribution {
    /// Generate a normalized abundance vector of length `n` with `nz`
    /// non-zero entries.
    pub fn generate<R: Rng>(self, n: usize, nz: usize, rng: &mut R) -> Vec<f64> {
        let normal = Normal::new(0.0, 1.0).expect("valid standard normal parameters");
        let mut values = vec![0.0; n];
        for i in index::sample(rng, n, nz) {
            values[i] = match self {
                AbundanceDistribution::LogNormal => (normal.sample(rng) * LOGNORMAL_SCALE).exp(),
                AbundanceDistribution::Uniform => 1.0,
                AbundanceDistribution::HalfNormal => normal.sample(rng).abs(),
                AbundanceDistribution::Exponential => -(1.0 - rng.gen::<f64>()).ln(),
            };
        }
        let total: f64 = values.iter().sum();
        for v in &mut values {
            *v /= total;
        }
        values
    }
}
