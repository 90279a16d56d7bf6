// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Convert an InSilicoSeq error profile into a sampling-ready model.
//!
//! The profile arrives as a mapping from field names to numeric arrays (the
//! native NumPy container is parsed by the caller). Each field is converted
//! independently: raw per-position probability tables become cumulative
//! distributions indexed by the fixed nucleotide alphabet.

use std::collections::HashMap;

use anyhow::Result;

use crate::alphabet::{Nucleotide, ALPHABET};
use crate::cdf::Cdf;
use crate::errors::Error;
use crate::model::Model;

/// Raw substitution data for one originating base: candidate target bases and
/// their probabilities, as two parallel sequences.
#[derive(Clone, Debug, Deserialize)]
pub struct SubstitutionEntry(pub Vec<char>, pub Vec<f64>);

/// A parsed source error profile, one numeric array per field.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceProfile {
    pub model: String,
    pub read_length: usize,
    pub insert_size: Vec<f64>,
    pub mean_count_forward: Vec<f64>,
    pub mean_count_reverse: Vec<f64>,
    pub quality_hist_forward: Vec<Vec<Vec<f64>>>,
    pub quality_hist_reverse: Vec<Vec<Vec<f64>>>,
    pub subst_choices_forward: Vec<HashMap<char, SubstitutionEntry>>,
    pub subst_choices_reverse: Vec<HashMap<char, SubstitutionEntry>>,
    pub ins_forward: Vec<HashMap<char, f64>>,
    pub ins_reverse: Vec<HashMap<char, f64>>,
    pub del_forward: Vec<HashMap<char, f64>>,
    pub del_reverse: Vec<HashMap<char, f64>>,
}

/// Convert the substitution entry of one originating base into a cumulative
/// distribution over the alphabet.
///
/// If no substitution was ever observed for the base (zero total mass), the
/// distribution collapses to a point mass on the originating base itself:
/// downstream sampling then always yields the base unchanged.
fn substitution_cdf(origin: Nucleotide, entry: &SubstitutionEntry) -> Result<Cdf> {
    let SubstitutionEntry(targets, probs) = entry;
    let mut values = [0.0f64; 4];
    for (&target, &prob) in targets.iter().zip(probs) {
        values[Nucleotide::from_symbol(target)?.index()] = prob;
    }
    for i in 1..values.len() {
        values[i] += values[i - 1];
    }
    let total = values[values.len() - 1];
    if total != 0.0 {
        for v in &mut values {
            *v /= total;
        }
    } else {
        for v in &mut values[origin.index()..] {
            *v = 1.0;
        }
    }
    Ok(Cdf::new(values.to_vec())?)
}

/// Convert the substitution entries of one read position into four cumulative
/// distributions ordered by the alphabet index of the originating base.
pub fn substitution_table(
    position: usize,
    entries: &HashMap<char, SubstitutionEntry>,
) -> Result<[Cdf; 4]> {
    let row = |origin: Nucleotide| -> Result<Cdf> {
        let entry = entries
            .get(&origin.symbol())
            .ok_or_else(|| Error::MissingSubstitutionEntry {
                position,
                symbol: origin.symbol(),
            })?;
        substitution_cdf(origin, entry)
    };
    Ok([
        row(Nucleotide::A)?,
        row(Nucleotide::C)?,
        row(Nucleotide::G)?,
        row(Nucleotide::T)?,
    ])
}

/// Scatter per-base indel probabilities into an alphabet-ordered array.
/// Absent bases default to 0; no normalization (the values are independent
/// per-position probabilities, not a distribution).
pub fn indel_vector(probs: &HashMap<char, f64>) -> Result<[f64; 4]> {
    let mut values = [0.0f64; 4];
    for (&symbol, &prob) in probs {
        values[Nucleotide::from_symbol(symbol)?.index()] = prob;
    }
    Ok(values)
}

/// Cumulative-sum raw per-bucket counts and divide by the grand total.
/// A zero grand total denotes a malformed profile and fails fast.
pub fn mean_count_cdf(counts: &[f64], field: &str) -> Result<Cdf> {
    let mut cumulative: Vec<f64> = counts
        .iter()
        .scan(0.0, |acc, &count| {
            *acc += count;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);
    if total == 0.0 {
        return Err(Error::ZeroTotalMass {
            field: field.to_owned(),
        }
        .into());
    }
    for v in &mut cumulative {
        *v /= total;
    }
    Ok(Cdf::new(cumulative)?)
}

/// Shape-preserving copy of a quality histogram (mean-quality bin x read
/// position x quality-score CDF). The innermost rows are already cumulative
/// and normalized in the source; wrapping them in `Cdf` validates that
/// assumption without transforming any value.
pub fn quality_histogram(hist: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Cdf>>> {
    hist.iter()
        .map(|bin| {
            bin.iter()
                .map(|row| Ok(Cdf::new(row.clone())?))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

fn substitution_tables(choices: &[HashMap<char, SubstitutionEntry>]) -> Result<Vec<[Cdf; 4]>> {
    choices
        .iter()
        .enumerate()
        .map(|(position, entries)| substitution_table(position, entries))
        .collect()
}

fn indel_vectors(probs: &[HashMap<char, f64>]) -> Result<Vec<[f64; 4]>> {
    probs.iter().map(indel_vector).collect()
}

/// Convert a parsed source profile into a model. Pure aggregation over the
/// per-field conversions; all-or-nothing per profile.
pub fn convert(profile: &SourceProfile) -> Result<Model> {
    Ok(Model {
        name: profile.model.clone(),
        read_len: profile.read_length,
        insert_len: Cdf::new(profile.insert_size.clone())?,
        mean_count_forward: mean_count_cdf(&profile.mean_count_forward, "mean_count_forward")?,
        mean_count_reverse: mean_count_cdf(&profile.mean_count_reverse, "mean_count_reverse")?,
        quality_hist_forward: quality_histogram(&profile.quality_hist_forward)?,
        quality_hist_reverse: quality_histogram(&profile.quality_hist_reverse)?,
        subst_choices_forward: substitution_tables(&profile.subst_choices_forward)?,
        subst_choices_reverse: substitution_tables(&profile.subst_choices_reverse)?,
        ins_forward: indel_vectors(&profile.ins_forward)?,
        ins_reverse: indel_vectors(&profile.ins_reverse)?,
        del_forward: indel_vectors(&profile.del_forward)?,
        del_reverse: indel_vectors(&profile.del_reverse)?,
    })
}
