// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A probabilistic model for randomizing reads.
//!
//! The model is the converted form of a source error profile (see
//! `conversion::profile`): all distributions are cumulative and indexed by
//! the fixed nucleotide alphabet. It serializes to the JSON layout consumed
//! by the simulator, and deserialization re-validates every CDF.

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use bio::alphabets::dna;
use bio::io::fastq;
use rand::Rng;

use crate::alphabet::Nucleotide;
use crate::cdf::Cdf;

pub mod builtin;

lazy_static! {
    /// Error probability per PHRED score, `10^(-q/10)`.
    static ref PHRED_TO_PROB: Vec<f64> =
        (0..100).map(|q| 10f64.powf(-(q as f64) / 10.0)).collect();
}

/// A model for randomizing paired-end reads.
///
/// Tables named `*_forward` apply to the forward mate, `*_reverse` to the
/// reverse mate. Substitution and indel tables are indexed by read position,
/// then by the alphabet index of the (originating) base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    pub read_len: usize,
    pub insert_len: Cdf,
    pub mean_count_forward: Cdf,
    pub mean_count_reverse: Cdf,
    pub quality_hist_forward: Vec<Vec<Cdf>>,
    pub quality_hist_reverse: Vec<Vec<Cdf>>,
    pub subst_choices_forward: Vec<[Cdf; 4]>,
    pub subst_choices_reverse: Vec<[Cdf; 4]>,
    pub ins_forward: Vec<[f64; 4]>,
    pub ins_reverse: Vec<[f64; 4]>,
    pub del_forward: Vec<[f64; 4]>,
    pub del_reverse: Vec<[f64; 4]>,
}

impl Model {
    /// Load a converted model from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_reader(File::open(path)?)?)
    }

    /// Sample one PHRED score per read position: first a mean-quality bin,
    /// then per-position scores from that bin's histogram.
    fn phred_scores<R: Rng>(&self, forward: bool, rng: &mut R) -> Vec<u8> {
        let mean_count = if forward {
            &self.mean_count_forward
        } else {
            &self.mean_count_reverse
        };
        let hist = if forward {
            &self.quality_hist_forward
        } else {
            &self.quality_hist_reverse
        };
        let bin = &hist[mean_count.sample(rng)];
        (0..self.read_len).map(|i| bin[i].sample(rng) as u8).collect()
    }

    /// Apply indels to `seq` and return the new sequence. Per position, the
    /// base is dropped with its deletion probability, and each alphabet base
    /// is appended with its insertion probability.
    fn introduce_indels<R: Rng>(&self, seq: &[u8], forward: bool, rng: &mut R) -> Vec<u8> {
        let (ins, del) = if forward {
            (&self.ins_forward, &self.del_forward)
        } else {
            (&self.ins_reverse, &self.del_reverse)
        };
        let mut result = Vec::with_capacity(seq.len() * 11 / 10);
        for (i, &base) in seq.iter().enumerate() {
            let origin = match Nucleotide::from_ascii(base) {
                Some(origin) => origin,
                None => continue,
            };
            if rng.gen::<f64>() > del[i][origin.index()] {
                result.push(base);
            }
            for (j, &prob) in ins[i].iter().enumerate() {
                if rng.gen::<f64>() < prob {
                    result.push(Nucleotide::from_index(j).to_ascii());
                }
            }
        }
        result
    }

    /// Apply substitutions to `seq` according to the given PHRED scores.
    fn introduce_substitutions<R: Rng>(
        &self,
        seq: &mut [u8],
        phreds: &[u8],
        forward: bool,
        rng: &mut R,
    ) {
        let subst = if forward {
            &self.subst_choices_forward
        } else {
            &self.subst_choices_reverse
        };
        for (i, base) in seq.iter_mut().enumerate() {
            if rng.gen::<f64>() < PHRED_TO_PROB[phreds[i] as usize] {
                if let Some(origin) = Nucleotide::from_ascii(*base) {
                    let choice = subst[i][origin.index()].sample(rng);
                    *base = Nucleotide::from_index(choice).to_ascii();
                }
            }
        }
    }

    /// Randomize a pair of reads from `seq`.
    /// Returns `None` if `seq` is too short for a read pair.
    pub fn simulate_read<R: Rng>(
        &self,
        seq: &[u8],
        rng: &mut R,
    ) -> Option<(fastq::Record, fastq::Record)> {
        if seq.len() < 2 * self.read_len {
            return None;
        }
        let interval_len = (2 * self.read_len + self.insert_len.sample(rng)).min(seq.len());
        let start = rng.gen_range(0..=seq.len() - interval_len);
        let mut bwd_start = start + interval_len - self.read_len;
        let mut fwd = seq[start..start + self.read_len].to_vec();
        let mut bwd = dna::revcomp(&seq[bwd_start..bwd_start + self.read_len]);

        fwd = self.introduce_indels(&fwd, true, rng);
        fwd.truncate(self.read_len);
        if fwd.len() < self.read_len {
            // Refill from the reference to keep the read length fixed.
            let missing = self.read_len - fwd.len();
            fwd.extend_from_slice(&seq[start + self.read_len..start + self.read_len + missing]);
        }

        bwd = self.introduce_indels(&bwd, true, rng);
        bwd.truncate(self.read_len);
        if bwd.len() < self.read_len {
            // Refill by extending the interval leftwards.
            let missing = self.read_len - bwd.len();
            bwd.extend_from_slice(&dna::revcomp(&seq[bwd_start - missing..bwd_start]));
            bwd_start -= missing;
        }

        let fwd_phreds = self.phred_scores(true, rng);
        let bwd_phreds = self.phred_scores(false, rng);
        self.introduce_substitutions(&mut fwd, &fwd_phreds, true, rng);
        self.introduce_substitutions(&mut bwd, &bwd_phreds, false, rng);

        // Read names are the 1-based start positions.
        let fwd_record = fastq::Record::with_attrs(
            &format!("{}", start + 1),
            None,
            &fwd,
            &phreds_to_ascii(&fwd_phreds),
        );
        let bwd_record = fastq::Record::with_attrs(
            &format!("{}", bwd_start + 1),
            None,
            &bwd,
            &phreds_to_ascii(&bwd_phreds),
        );
        Some((fwd_record, bwd_record))
    }
}

/// Encode PHRED scores as ASCII for text output.
fn phreds_to_ascii(phreds: &[u8]) -> Vec<u8> {
    phreds.iter().map(|&p| 33 + p).collect()
}
