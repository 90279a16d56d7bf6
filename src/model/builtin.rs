// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Built-in models that need no external profile.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::cdf::Cdf;
use crate::model::Model;

/// Insert size of the built-in models.
const INSERT_LEN: usize = 200;

/// Parameters of the basic model's base-call accuracy: normally distributed
/// with the given mean and standard deviation, capped at PHRED 40.
const BASIC_ACCURACY_MEAN: f64 = 0.999;
const BASIC_ACCURACY_SD: f64 = 0.01;
const MAX_PHRED: usize = 40;

impl Model {
    /// A basic model: fixed insert size, PHRED scores around Q30, uniform
    /// substitution to the three other bases, no indels.
    pub fn basic(read_len: usize) -> Self {
        Self::with_tables(
            "basic",
            read_len,
            basic_phred_cdf(),
            [
                must(vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]),
                must(vec![1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]),
                must(vec![1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0]),
                must(vec![1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0]),
            ],
        )
    }

    /// A perfect model: constant PHRED 40 and identity substitutions.
    pub fn perfect(read_len: usize) -> Self {
        Self::with_tables(
            "perfect",
            read_len,
            point_mass(MAX_PHRED + 1, MAX_PHRED),
            [
                point_mass(4, 0),
                point_mass(4, 1),
                point_mass(4, 2),
                point_mass(4, 3),
            ],
        )
    }

    fn with_tables(name: &str, read_len: usize, phred_cdf: Cdf, subst: [Cdf; 4]) -> Self {
        Model {
            name: name.to_owned(),
            read_len,
            insert_len: point_mass(INSERT_LEN + 1, INSERT_LEN),
            mean_count_forward: point_mass(1, 0),
            mean_count_reverse: point_mass(1, 0),
            quality_hist_forward: vec![vec![phred_cdf.clone(); read_len]],
            quality_hist_reverse: vec![vec![phred_cdf; read_len]],
            subst_choices_forward: vec![subst.clone(); read_len],
            subst_choices_reverse: vec![subst; read_len],
            ins_forward: vec![[0.0; 4]; read_len],
            ins_reverse: vec![[0.0; 4]; read_len],
            del_forward: vec![[0.0; 4]; read_len],
            del_reverse: vec![[0.0; 4]; read_len],
        }
    }
}

/// Wrap statically known-valid CDF values.
fn must(values: Vec<f64>) -> Cdf {
    Cdf::new(values).expect("valid built-in cdf")
}

/// A CDF of the given length with all mass on one index.
fn point_mass(len: usize, index: usize) -> Cdf {
    let mut values = vec![0.0; len];
    for v in &mut values[index..] {
        *v = 1.0;
    }
    must(values)
}

/// PHRED score distribution of the basic model: the score implied by a
/// normally distributed base-call accuracy, binned to whole scores and capped
/// at `MAX_PHRED`.
fn basic_phred_cdf() -> Cdf {
    let accuracy = Normal::new(BASIC_ACCURACY_MEAN, BASIC_ACCURACY_SD)
        .expect("valid accuracy distribution parameters");
    // Probability mass of each score: accuracy a maps to -10*log10(1-a),
    // so score q covers accuracies in [boundary(q-0.5), boundary(q+0.5)).
    let boundary = |q: f64| 1.0 - 10f64.powf(-q / 10.0);
    let mut cumulative = Vec::with_capacity(MAX_PHRED + 1);
    let mut acc = 0.0;
    for q in 0..=MAX_PHRED {
        let mass = if q == MAX_PHRED {
            // The cap lumps all higher accuracies into the final score.
            1.0 - accuracy.cdf(boundary(q as f64 - 0.5))
        } else if q == 0 {
            accuracy.cdf(boundary(0.5))
        } else {
            accuracy.cdf(boundary(q as f64 + 0.5)) - accuracy.cdf(boundary(q as f64 - 0.5))
        };
        acc += mass;
        cumulative.push(acc);
    }
    // Normalize out floating point drift in the final value.
    for v in &mut cumulative {
        *v /= acc;
    }
    must(cumulative)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_perfect_substitutions_are_identity() {
        let model = Model::perfect(3);
        for position in 0..3 {
            for (i, cdf) in model.subst_choices_forward[position].iter().enumerate() {
                let mut rng = StdRng::seed_from_u64(1);
                for _ in 0..10 {
                    assert_eq!(cdf.sample(&mut rng), i);
                }
            }
        }
    }

    #[test]
    fn test_basic_substitutions_avoid_origin() {
        let model = Model::basic(1);
        let mut rng = StdRng::seed_from_u64(1);
        for (i, cdf) in model.subst_choices_forward[0].iter().enumerate() {
            for _ in 0..100 {
                assert_ne!(cdf.sample(&mut rng), i);
            }
        }
    }

    #[test]
    fn test_basic_phred_cdf_concentrates_around_q30() {
        let cdf = basic_phred_cdf();
        assert_eq!(cdf.len(), MAX_PHRED + 1);
        // Accuracy 0.999 corresponds to PHRED 30; most mass within Q20-Q40.
        let values = cdf.values();
        assert!(values[19] < 0.05);
        assert!(values[40] > values[39]);
        let mut rng = StdRng::seed_from_u64(2);
        let q = cdf.sample(&mut rng);
        assert!((15..=40).contains(&q));
    }

    #[test]
    fn test_insert_size_is_fixed() {
        let model = Model::basic(5);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(model.insert_len.sample(&mut rng), INSERT_LEN);
        }
    }
}
