// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::{Display, EnumString, EnumVariantNames};

use crate::conversion::profile::{convert, SourceProfile};
use crate::errors;
use crate::model::Model;
use crate::simulation::abundance::AbundanceDistribution;
use crate::simulation::SimulatorBuilder;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "readmodel",
    about = "Convert sequencing error profiles into sampling-ready models and simulate reads with them.",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
pub struct Opt {
    #[structopt(
        short = "v",
        long = "verbose",
        global = true,
        help = "Verbose (debug level) logging."
    )]
    pub verbose: bool,
    #[structopt(subcommand)]
    pub command: Readmodel,
}

#[derive(Debug, StructOpt)]
pub enum Readmodel {
    #[structopt(
        name = "convert-profile",
        about = "Convert a parsed InSilicoSeq error profile into a model for simulation.",
        setting = structopt::clap::AppSettings::ColoredHelp
    )]
    ConvertProfile {
        #[structopt(
            short = "i",
            long,
            parse(from_os_str),
            help = "Source error profile (JSON)."
        )]
        input: PathBuf,
        #[structopt(
            short = "o",
            long,
            parse(from_os_str),
            help = "File that shall contain the converted model (JSON)."
        )]
        output: PathBuf,
    },
    #[structopt(
        name = "simulate",
        about = "Simulate paired-end reads from FASTA references with a given model.",
        setting = structopt::clap::AppSettings::ColoredHelp
    )]
    Simulate {
        #[structopt(
            long,
            parse(from_os_str),
            help = "Converted model (JSON) to simulate with."
        )]
        model: Option<PathBuf>,
        #[structopt(
            long,
            possible_values(BuiltinModel::VARIANTS),
            help = "Use a built-in model instead of a model file."
        )]
        builtin: Option<BuiltinModel>,
        #[structopt(
            long = "read-len",
            default_value = "125",
            help = "Read length of the built-in models."
        )]
        read_len: usize,
        #[structopt(
            short = "i",
            long = "input",
            parse(from_os_str),
            required = true,
            help = "FASTA files with reference sequences."
        )]
        inputs: Vec<PathBuf>,
        #[structopt(short = "o", long = "output", help = "Output file prefix.")]
        output: String,
        #[structopt(short = "n", long = "num-reads", help = "Number of reads.")]
        num_reads: usize,
        #[structopt(
            short = "u",
            long = "num-genomes",
            help = "Number of genomes to simulate from (default: all)."
        )]
        num_genomes: Option<usize>,
        #[structopt(
            long = "abundance-file",
            parse(from_os_str),
            help = "Use abundances from a TSV file instead of drawing them."
        )]
        abundance_file: Option<PathBuf>,
        #[structopt(
            long,
            possible_values(AbundanceDistribution::VARIANTS),
            default_value = "lognormal",
            help = "Distribution to draw abundances from."
        )]
        distribution: AbundanceDistribution,
        #[structopt(
            long = "group-pattern",
            default_value = ".*",
            help = "Pattern by which to group contigs of the same genome."
        )]
        group_pattern: String,
        #[structopt(long = "ignore-length", help = "Ignore genome lengths for read counts.")]
        ignore_length: bool,
        #[structopt(long = "single-output", help = "Write one output file instead of two.")]
        single_output: bool,
        #[structopt(long, help = "Seed for the random number generator (default: entropy).")]
        seed: Option<u64>,
    },
}

#[derive(Copy, Clone, Debug, Display, EnumString, EnumVariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinModel {
    Basic,
    Perfect,
}

impl BuiltinModel {
    pub fn instantiate(self, read_len: usize) -> Model {
        match self {
            BuiltinModel::Basic => Model::basic(read_len),
            BuiltinModel::Perfect => Model::perfect(read_len),
        }
    }
}

pub fn run(opt: Readmodel) -> Result<()> {
    match opt {
        Readmodel::ConvertProfile { input, output } => {
            info!("Reading source profile from {}", input.display());
            let profile: SourceProfile = serde_json::from_reader(File::open(&input)?)?;
            let model = convert(&profile)?;
            serde_json::to_writer(File::create(&output)?, &model)?;
            info!(
                "Converted model {} written to {}",
                model.name,
                output.display()
            );
        }
        Readmodel::Simulate {
            model,
            builtin,
            read_len,
            inputs,
            output,
            num_reads,
            num_genomes,
            abundance_file,
            distribution,
            group_pattern,
            ignore_length,
            single_output,
            seed,
        } => {
            let model = match (model, builtin) {
                (Some(path), None) => Model::from_path(path)?,
                (None, Some(builtin)) => builtin.instantiate(read_len),
                _ => return Err(errors::Error::AmbiguousModel.into()),
            };
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let mut simulator = SimulatorBuilder::default()
                .model(model)
                .inputs(inputs)
                .output_prefix(output)
                // Each pair is two reads.
                .num_pairs((num_reads + 1) / 2)
                .num_genomes(num_genomes)
                .ignore_length(ignore_length)
                .single_output(single_output)
                .abundance_file(abundance_file)
                .distribution(distribution)
                .group_pattern(Regex::new(&group_pattern)?)
                .rng(rng)
                .build()?;
            simulator.simulate()?;
        }
    }
    Ok(())
}
