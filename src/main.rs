//! Manager census CLI - Run analyses from JSON configuration.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use manager_census::compute::{
    GrowthTensor, ReplaySegmenter, ReplaySimulator, Segmenter, SignalSource, Simulator,
    Transcript, admit_seeds, compare_group, population_distribution,
};
use manager_census::report::{write_comparator_report, write_population_table};
use manager_census::schema::{AnalysisConfig, AnalysisTask, Seed, load_seeds};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Run a manager census analysis from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to analysis configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: AnalysisConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        eprintln!("Analysis failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &AnalysisConfig) -> Result<(), Box<dyn std::error::Error>> {
    let seeds = load_seeds(&config.seed_paths)?;
    let transcript = Transcript::load(&config.transcript_path)?;

    println!("Manager Census");
    println!("==============");
    println!(
        "Corpus: {} seeds from {} containers",
        seeds.len(),
        config.seed_paths.len()
    );
    println!("Transcript: {} recorded runs", transcript.runs.len());
    println!();

    let mut sim = ReplaySimulator::new(&transcript);
    let seg = ReplaySegmenter::new(&transcript);

    let start = Instant::now();
    let mut out = std::io::BufWriter::new(fs::File::create(&config.output_path)?);

    match &config.task {
        AnalysisTask::Population { tensor } => {
            let admitted = admit_seeds(&seg, &seeds, tensor.num_parts)?;
            println!(
                "Admitted {} seeds with {} parts each",
                admitted.len(),
                tensor.num_parts
            );

            let census = GrowthTensor::build(&mut sim, &admitted, tensor)?;
            let rows = population_distribution(&census)?;
            write_population_table(&mut out, &rows)?;

            println!(
                "Wrote {} sampled steps to {}",
                rows.len(),
                config.output_path.display()
            );
        }
        AnalysisTask::GuessByGrowth {
            groups,
            growth_steps,
            census_steps,
        } => {
            let signal = SignalSource::LifeGrowth {
                num_steps: *growth_steps,
            };
            run_comparator(&mut sim, &seg, &seeds, groups, &signal, *census_steps, &mut out)?;
            println!("Wrote growth report to {}", config.output_path.display());
        }
        AnalysisTask::GuessByCompetition {
            groups,
            competition,
            census_steps,
        } => {
            let signal = SignalSource::Competition(competition.clone());
            run_comparator(&mut sim, &seg, &seeds, groups, &signal, *census_steps, &mut out)?;
            println!(
                "Wrote competition report to {}",
                config.output_path.display()
            );
        }
    }

    out.flush()?;
    println!();
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());

    Ok(())
}

fn run_comparator<W: Write>(
    sim: &mut dyn Simulator,
    seg: &dyn Segmenter,
    seeds: &[Seed],
    groups: &[usize],
    signal: &SignalSource,
    census_steps: u64,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reports = Vec::new();

    for &group in groups {
        let group_report = compare_group(sim, seg, seeds, group, signal, census_steps)?;
        let tally = &group_report.tally;
        println!(
            "{} parts: {} seeds, {} with one manager, {} with unique max {}",
            group,
            tally.sample_size,
            tally.one_manager,
            tally.one_manager_max_signal,
            signal.noun()
        );
        reports.push(group_report);
    }

    write_comparator_report(out, &reports, signal.noun())?;
    Ok(())
}

fn print_example_config() {
    let config = AnalysisConfig::example();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
