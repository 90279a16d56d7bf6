// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A validated cumulative distribution over a discrete range, used for
//! inverse-CDF sampling.

use std::convert::TryFrom;

use rand::Rng;

use crate::errors::Error;

/// Tolerance for the final cumulative value when validating a CDF.
pub const CDF_EPSILON: f64 = 1e-9;

/// A cumulative distribution over the indices `0..len`.
///
/// Values are non-negative, monotonically non-decreasing, and the final value
/// equals 1.0 within `CDF_EPSILON`. Serializes to a plain array;
/// deserialization re-validates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Cdf {
    inner: Vec<f64>,
}

impl Cdf {
    pub fn new(values: Vec<f64>) -> Result<Self, Error> {
        let invalid = |msg: String| Error::InvalidCdf { msg };
        let last = *values
            .last()
            .ok_or_else(|| invalid("got empty cdf".to_owned()))?;
        if (last - 1.0).abs() > CDF_EPSILON {
            return Err(invalid(format!("last element is {}, want 1", last)));
        }
        for (i, &v) in values.iter().enumerate() {
            if v < 0.0 {
                return Err(invalid(format!("cdf[{}]={}, want >=0", i, v)));
            }
            if i > 0 && values[i - 1] > v {
                return Err(invalid(format!(
                    "cdf[{}]>cdf[{}]: {}>{}",
                    i - 1,
                    i,
                    values[i - 1],
                    v
                )));
            }
        }
        Ok(Cdf { inner: values })
    }

    /// Draw an index according to this distribution: the first index whose
    /// cumulative value is at least a uniform draw from `[0, 1)`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let p = rng.gen::<f64>();
        // The final value may fall short of p by up to CDF_EPSILON.
        self.inner
            .partition_point(|&v| v < p)
            .min(self.inner.len() - 1)
    }

    pub fn values(&self) -> &[f64] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TryFrom<Vec<f64>> for Cdf {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self, Error> {
        Cdf::new(values)
    }
}

impl From<Cdf> for Vec<f64> {
    fn from(cdf: Cdf) -> Self {
        cdf.inner
    }
}
