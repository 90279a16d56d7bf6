use std::fs;
use std::path::Path;

use bio::io::fastq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;

use readmodel::model::Model;
use readmodel::simulation::SimulatorBuilder;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_fasta(path: &Path) {
    let mut content = String::from(">g1\n");
    content.push_str(&"G".repeat(450));
    // Ambiguous sequences are skipped entirely.
    content.push_str("\n>amb\nACGTNACGT\n");
    fs::write(path, content).unwrap();
}

fn read_records(path: impl AsRef<Path> + std::fmt::Debug) -> Vec<fastq::Record> {
    fastq::Reader::from_file(path)
        .unwrap()
        .records()
        .map(|r| r.unwrap())
        .collect()
}

#[test]
fn test_simulate_paired_output() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("refs.fasta");
    write_fasta(&fasta);
    let prefix = dir.path().join("out").to_str().unwrap().to_owned();

    let mut simulator = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta])
        .output_prefix(prefix.clone())
        .num_pairs(5)
        .rng(StdRng::seed_from_u64(42))
        .build()
        .unwrap();
    simulator.simulate().unwrap();

    let r1 = read_records(format!("{}_R1.fastq", prefix));
    let r2 = read_records(format!("{}_R2.fastq", prefix));
    assert_eq!(r1.len(), 5);
    assert_eq!(r2.len(), 5);

    for (i, (fwd, bwd)) in r1.iter().zip(&r2).enumerate() {
        assert_eq!(fwd.seq(), "G".repeat(125).as_bytes());
        assert_eq!(bwd.seq(), "C".repeat(125).as_bytes());
        assert_eq!(fwd.qual(), "I".repeat(125).as_bytes());
        // serial.position.reference, with serials counting over both mates
        assert_eq!(fwd.id(), format!("{}.1.g1", 2 * i + 1));
        assert_eq!(bwd.id(), format!("{}.326.g1", 2 * i + 2));
    }

    let abundances = fs::read_to_string(format!("{}.abundances.tsv", prefix)).unwrap();
    assert!(abundances.starts_with("g1\t"));
    assert_eq!(abundances.lines().count(), 1);
}

#[test]
fn test_simulate_single_output() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("refs.fasta");
    write_fasta(&fasta);
    let prefix = dir.path().join("out").to_str().unwrap().to_owned();

    let mut simulator = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta])
        .output_prefix(prefix.clone())
        .num_pairs(3)
        .single_output(true)
        .rng(StdRng::seed_from_u64(1))
        .build()
        .unwrap();
    simulator.simulate().unwrap();

    // Mates are interleaved into one file.
    let records = read_records(format!("{}.fastq", prefix));
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].seq(), "G".repeat(125).as_bytes());
    assert_eq!(records[1].seq(), "C".repeat(125).as_bytes());
}

#[test]
fn test_simulate_with_abundance_file() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("refs.fasta");
    write_fasta(&fasta);
    let table = dir.path().join("abundances.tsv");
    fs::write(&table, "g1\t1.0\n").unwrap();
    let prefix = dir.path().join("out").to_str().unwrap().to_owned();

    let mut simulator = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta])
        .output_prefix(prefix.clone())
        .num_pairs(4)
        .abundance_file(Some(table))
        .rng(StdRng::seed_from_u64(2))
        .build()
        .unwrap();
    simulator.simulate().unwrap();

    assert_eq!(read_records(format!("{}_R1.fastq", prefix)).len(), 4);
    // No table is written when abundances are given.
    assert!(!Path::new(&format!("{}.abundances.tsv", prefix)).exists());
}

#[test]
fn test_simulate_group_pattern() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("refs.fasta");
    let content = format!(
        ">genomeA.chr1\n{}\n>genomeA.chr2\n{}\n",
        "A".repeat(450),
        "C".repeat(450)
    );
    fs::write(&fasta, content).unwrap();
    let prefix = dir.path().join("out").to_str().unwrap().to_owned();

    let mut simulator = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta])
        .output_prefix(prefix.clone())
        .num_pairs(10)
        .group_pattern(Regex::new("genome[A-Z]+").unwrap())
        .rng(StdRng::seed_from_u64(3))
        .build()
        .unwrap();
    simulator.simulate().unwrap();

    // Both contigs belong to one group, so the abundance table has one row.
    let abundances = fs::read_to_string(format!("{}.abundances.tsv", prefix)).unwrap();
    assert!(abundances.starts_with("genomeA\t"));
    assert_eq!(abundances.lines().count(), 1);

    let r1 = read_records(format!("{}_R1.fastq", prefix));
    assert!(!r1.is_empty());
    for record in &r1 {
        assert!(record.id().ends_with(".chr1") || record.id().ends_with(".chr2"));
    }
}

#[test]
fn test_simulate_rejects_bad_requests() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("refs.fasta");
    write_fasta(&fasta);
    let prefix = dir.path().join("out").to_str().unwrap().to_owned();

    let mut no_inputs = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![])
        .output_prefix(prefix.clone())
        .num_pairs(5)
        .rng(StdRng::seed_from_u64(0))
        .build()
        .unwrap();
    assert!(no_inputs.simulate().is_err());

    let mut no_reads = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta.clone()])
        .output_prefix(prefix.clone())
        .num_pairs(0)
        .rng(StdRng::seed_from_u64(0))
        .build()
        .unwrap();
    assert!(no_reads.simulate().is_err());

    let mut too_many_genomes = SimulatorBuilder::default()
        .model(Model::perfect(125))
        .inputs(vec![fasta])
        .output_prefix(prefix)
        .num_pairs(5)
        .num_genomes(Some(7))
        .rng(StdRng::seed_from_u64(0))
        .build()
        .unwrap();
    assert!(too_many_genomes.simulate().is_err());
}
