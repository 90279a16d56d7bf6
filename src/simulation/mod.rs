// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Simulation of paired-end reads from FASTA references.
//!
//! References are grouped into genomes by a pattern over their record names.
//! Each genome receives an abundance (drawn or loaded from a table), and
//! reads are distributed over the sequences accordingly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use bio::io::{fasta, fastq};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::Rng;
use regex::Regex;

use crate::alphabet::Nucleotide;
use crate::errors::Error;
use crate::model::Model;

pub mod abundance;

use abundance::AbundanceDistribution;

#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct Simulator {
    model: Model,
    inputs: Vec<PathBuf>,
    output_prefix: String,
    /// Number of read pairs to generate over all genomes.
    num_pairs: usize,
    /// Number of genomes to simulate from; `None` means all.
    #[builder(default)]
    num_genomes: Option<usize>,
    /// Ignore genome lengths when distributing reads.
    #[builder(default)]
    ignore_length: bool,
    /// Write one interleaved file instead of two.
    #[builder(default)]
    single_output: bool,
    #[builder(default)]
    abundance_file: Option<PathBuf>,
    #[builder(default = "AbundanceDistribution::LogNormal")]
    distribution: AbundanceDistribution,
    /// Pattern by which to group contigs of the same genome.
    #[builder(default = "Regex::new(\".*\").unwrap()")]
    group_pattern: Regex,
    rng: StdRng,
}

impl Simulator {
    pub fn simulate(&mut self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::NoInputFiles.into());
        }
        if self.num_pairs == 0 {
            return Err(Error::NoReadsRequested.into());
        }

        info!("Reading sequence lengths");
        let seq_lens = self.read_sequence_lens()?;
        let mut group_lens: HashMap<String, usize> = HashMap::new();
        for (group, len) in &seq_lens {
            *group_lens.entry(group.clone()).or_insert(0) += len;
        }
        info!("{} genome groups found", group_lens.len());

        let num_genomes = match self.num_genomes {
            None | Some(0) => group_lens.len(),
            Some(n) => n,
        };
        if num_genomes > group_lens.len() {
            return Err(Error::NotEnoughGenomes {
                requested: num_genomes,
                found: group_lens.len(),
            }
            .into());
        }

        let group_ratios = if let Some(path) = self.abundance_file.clone() {
            info!("Loading abundances from {}", path.display());
            read_abundance_file(&path, &group_lens, self.ignore_length)?
        } else {
            info!("Drawing {} abundances", self.distribution);
            self.create_abundance(&group_lens, num_genomes)?
        };

        let mut writer1: fastq::Writer<std::fs::File>;
        let mut writer2: Option<fastq::Writer<std::fs::File>> = None;
        if self.single_output {
            writer1 = fastq::Writer::to_file(format!("{}.fastq", self.output_prefix))?;
        } else {
            writer1 = fastq::Writer::to_file(format!("{}_R1.fastq", self.output_prefix))?;
            writer2 = Some(fastq::Writer::to_file(format!(
                "{}_R2.fastq",
                self.output_prefix
            ))?);
        }

        info!("Generating reads");
        let mut serial = 0usize;
        let mut seq_lens = seq_lens.into_iter();
        for path in self.inputs.clone() {
            let reader = fasta::Reader::from_file(&path)?;
            for record in reader.records() {
                let record = record?;
                if !is_nucs(record.seq()) {
                    continue;
                }
                let (group, len) = seq_lens
                    .next()
                    .expect("sequence lengths cover all usable records");
                let group_reads =
                    group_ratios.get(&group).copied().unwrap_or(0.0) * self.num_pairs as f64;
                let seq_ratio = len as f64 / group_lens[&group] as f64;

                // Convert the fractional share to a whole number of pairs.
                let pairs = group_reads * seq_ratio;
                let mut num_pairs = pairs.floor() as usize;
                if self.rng.gen::<f64>() < pairs - pairs.floor() {
                    num_pairs += 1;
                }
                debug!("{}: {} read pairs", record.id(), num_pairs);

                for _ in 0..num_pairs {
                    let (fwd, bwd) = match self.model.simulate_read(record.seq(), &mut self.rng) {
                        Some(pair) => pair,
                        // Sequence is too short.
                        None => break,
                    };
                    let r1 = rename(&fwd, serial + 1, record.id());
                    let r2 = rename(&bwd, serial + 2, record.id());
                    writer1.write_record(&r1)?;
                    match writer2.as_mut() {
                        Some(writer) => writer.write_record(&r2)?,
                        None => writer1.write_record(&r2)?,
                    }
                    serial += 2;
                }
            }
        }
        info!("{} reads generated", serial);
        Ok(())
    }

    /// First pass over the inputs: group name and length of every usable
    /// (unambiguous) sequence, in input order.
    fn read_sequence_lens(&self) -> Result<Vec<(String, usize)>> {
        let mut result = Vec::new();
        for path in &self.inputs {
            let reader = fasta::Reader::from_file(path)?;
            for record in reader.records() {
                let record = record?;
                if !is_nucs(record.seq()) {
                    continue;
                }
                let group = self
                    .group_pattern
                    .find(record.id())
                    .map(|m| m.as_str().to_owned())
                    .unwrap_or_default();
                result.push((group, record.seq().len()));
            }
        }
        Ok(result)
    }

    /// Draw abundances for the genome groups and write the drawn table as
    /// TSV next to the output files.
    fn create_abundance(
        &mut self,
        group_lens: &HashMap<String, usize>,
        num_genomes: usize,
    ) -> Result<HashMap<String, f64>> {
        let path = format!("{}.abundances.tsv", self.output_prefix);
        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(&path)?;

        let names = group_lens.keys().sorted().collect_vec();
        let values = self
            .distribution
            .generate(names.len(), num_genomes, &mut self.rng);

        let mut ratios = HashMap::new();
        for (name, value) in names.into_iter().zip(values) {
            if value == 0.0 {
                continue;
            }
            let formatted = format!("{:.10}", value);
            writer.write_record(&[name.as_str(), formatted.as_str()])?;
            let mut ratio = value;
            if !self.ignore_length {
                ratio *= group_lens[name] as f64;
            }
            ratios.insert(name.clone(), ratio);
        }
        writer.flush()?;

        let total: f64 = ratios.values().sum();
        for v in ratios.values_mut() {
            *v /= total;
        }
        Ok(ratios)
    }
}

/// Load abundances from a TSV file of name/value rows.
fn read_abundance_file(
    path: &Path,
    group_lens: &HashMap<String, usize>,
    ignore_length: bool,
) -> Result<HashMap<String, f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;

    let mut result = HashMap::new();
    for row in reader.deserialize() {
        let (name, value): (String, f64) = row?;
        if result.contains_key(&name) {
            return Err(Error::DuplicateAbundanceName { name }.into());
        }
        if value <= 0.0 {
            return Err(Error::InvalidAbundanceValue { name, value }.into());
        }
        let len = *group_lens
            .get(&name)
            .ok_or_else(|| Error::UnknownAbundanceName { name: name.clone() })?;
        let mut ratio = value;
        if !ignore_length {
            ratio *= len as f64;
        }
        result.insert(name, ratio);
    }
    if result.is_empty() {
        return Err(Error::EmptyAbundanceFile.into());
    }

    let total: f64 = result.values().sum();
    for v in result.values_mut() {
        *v /= total;
    }
    Ok(result)
}

fn rename(record: &fastq::Record, serial: usize, reference: &str) -> fastq::Record {
    fastq::Record::with_attrs(
        &format!("{}.{}.{}", serial, record.id(), reference),
        None,
        record.seq(),
        record.qual(),
    )
}

fn is_nucs(seq: &[u8]) -> bool {
    seq.iter().all(|&base| Nucleotide::from_ascii(base).is_some())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_is_nucs() {
        assert!(is_nucs(b"ACGTacgt"));
        assert!(!is_nucs(b"ACGTN"));
    }

    fn write_abundances(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn group_lens() -> HashMap<String, usize> {
        vec![("g1".to_owned(), 100), ("g2".to_owned(), 300)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_read_abundance_file() {
        let file = write_abundances("g1\t0.5\ng2\t0.5\n");
        let ratios = read_abundance_file(file.path(), &group_lens(), true).unwrap();
        assert_relative_eq!(ratios["g1"], 0.5, epsilon = 1e-9);
        assert_relative_eq!(ratios["g2"], 0.5, epsilon = 1e-9);

        // Length-weighted: g2 is three times as long.
        let ratios = read_abundance_file(file.path(), &group_lens(), false).unwrap();
        assert_relative_eq!(ratios["g1"], 0.25, epsilon = 1e-9);
        assert_relative_eq!(ratios["g2"], 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_read_abundance_file_rejects_bad_input() {
        let duplicate = write_abundances("g1\t0.5\ng1\t0.5\n");
        assert!(read_abundance_file(duplicate.path(), &group_lens(), true).is_err());

        let negative = write_abundances("g1\t-0.5\n");
        assert!(read_abundance_file(negative.path(), &group_lens(), true).is_err());

        let unknown = write_abundances("g3\t0.5\n");
        assert!(read_abundance_file(unknown.path(), &group_lens(), true).is_err());

        let empty = write_abundances("");
        assert!(read_abundance_file(empty.path(), &group_lens(), true).is_err());
    }
}
