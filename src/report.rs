//! Text report writers for the analysis results.
//!
//! The numeric content comes from `compute`; these functions only lay
//! it out. Population tables are tab-separated with one row per sampled
//! step; comparator reports are free-text blocks per seed followed by a
//! per-group summary.

use std::io::{self, Write};

use crate::compute::{GroupReport, StepDistribution};

fn bucket_label(managers: usize, workers: usize) -> String {
    format!(
        "{} manager{} and {} worker{}",
        managers,
        if managers == 1 { "" } else { "s" },
        workers,
        if workers == 1 { "" } else { "s" },
    )
}

/// Write the population table: a note line, a tab-separated header, and
/// one row per sampled step with buckets ordered from all-managers down
/// to all-workers.
pub fn write_population_table<W: Write>(
    w: &mut W,
    rows: &[StepDistribution],
) -> io::Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let num_parts = first.counts.len() - 1;

    writeln!(
        w,
        "\n\nNOTE: {} Seeds -- {} Parts per seed\n",
        first.num_seeds, num_parts
    )?;

    let mut header = vec!["step num".to_string()];
    for managers in (0..=num_parts).rev() {
        header.push(bucket_label(managers, num_parts - managers));
    }
    writeln!(w, "{}", header.join("\t"))?;

    for row in rows {
        let probabilities = row.probabilities();
        write!(w, "{}", row.step)?;
        for managers in (0..=num_parts).rev() {
            write!(w, "\t{:.3}", probabilities[managers])?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Write the comparator report for one or more part-count groups.
///
/// `noun` names the independent signal in the text ("growth" or
/// "fitness"). Groups without a single-manager seed render their
/// conditional probability as `undefined (0/0)`.
pub fn write_comparator_report<W: Write>(
    w: &mut W,
    reports: &[GroupReport],
    noun: &str,
) -> io::Result<()> {
    for report in reports {
        writeln!(w, "\n\n{} parts in seed\n", report.num_parts)?;

        for verdict in &report.verdicts {
            let signals: Vec<String> = verdict.signals.iter().map(f64::to_string).collect();
            writeln!(w, "{} of parts: {}", noun, signals.join(", "))?;

            let status: Vec<&str> = verdict
                .managers
                .iter()
                .map(|&m| if m { "1" } else { "0" })
                .collect();
            writeln!(w, "manager status: {}\n", status.join(", "))?;
        }

        let tally = &report.tally;
        match tally.conditional_probability() {
            Some(probability) => {
                writeln!(
                    w,
                    "p(manager max {} | exactly one manager) = {}",
                    noun, probability
                )?;
                writeln!(
                    w,
                    " = {} / {}\n",
                    tally.one_manager_max_signal, tally.one_manager
                )?;
            }
            None => {
                writeln!(
                    w,
                    "p(manager max {} | exactly one manager) = undefined (0/0)\n",
                    noun
                )?;
            }
        }

        writeln!(
            w,
            "p(one specific part | {} parts to choose from) = {}\n",
            report.num_parts,
            report.chance_probability()
        )?;
        writeln!(w, "total sample size = {}\n", tally.sample_size)?;
    }

    Ok(())
}
