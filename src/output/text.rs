//! Text output formatting
//!
//! Writes the report lines to any `Write` sink; the `print_*` wrappers write
//! to stdout. Nothing is written for a failed run, the caller only gets here
//! with a complete report.

use crate::config::Config;
use crate::experiment::{CircleReport, DiceReport};
use crate::partition::JobAssignment;
use crate::sampler::OutcomeCounts;
use crate::trajectory::Trajectory;
use crate::util::time::{calculate_rate, format_rate};
use std::io::{self, Write};

/// Dice report: header, one line per outcome, duration
pub fn write_dice_report<W: Write>(out: &mut W, report: &DiceReport, per_worker: bool) -> io::Result<()> {
    writeln!(out, "{} samples:", report.total_samples)?;
    writeln!(out)?;
    for outcome in OutcomeCounts::OUTCOMES {
        writeln!(
            out,
            "{}: {} {:.3}%",
            outcome,
            report.counts.count(outcome),
            report.percent(outcome)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "duration: {:.3}s", report.elapsed.as_secs_f64())?;

    if per_worker {
        writeln!(out)?;
        writeln!(out, "Per-worker:")?;
        for (job, counts) in report.per_job.iter().enumerate() {
            let slots = &counts.slots()[1..];
            let listed: Vec<String> = slots.iter().map(|c| c.to_string()).collect();
            writeln!(
                out,
                "  job {}: {} samples [{}]",
                job,
                counts.job_size(),
                listed.join(" ")
            )?;
        }
    }

    Ok(())
}

/// Circle report: one line per run, then `done`
pub fn write_circle_report<W: Write>(out: &mut W, report: &CircleReport, per_worker: bool) -> io::Result<()> {
    for run in &report.runs {
        writeln!(
            out,
            "P={} ⇒ π~{:.7}, Δ={:.7}, time= {:.3}s",
            run.samples,
            run.estimate,
            run.error,
            run.elapsed.as_secs_f64()
        )?;

        if per_worker {
            for ((job, &inside), &size) in run.per_job.iter().enumerate().zip(run.assignment.sizes()) {
                writeln!(out, "  job {}: {} of {} inside", job, inside, size)?;
            }
        }
    }
    writeln!(out, "done")?;

    Ok(())
}

pub fn write_trajectory<W: Write>(out: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    let landing = &trajectory.landing;
    writeln!(out, "flying time: {:.2}s", trajectory.flight_time)?;
    writeln!(out, "landing point: {:.2}/{:.2}/{:.2}m", landing.x, landing.y, landing.z)?;
    Ok(())
}

/// Dry-run summary: configuration and the job plans a run would dispatch
pub fn write_plan<W: Write>(out: &mut W, config: &Config, plans: &[JobAssignment]) -> io::Result<()> {
    writeln!(out, "Dry run: no workers started")?;
    writeln!(out, "  Backend: {}", config.workers.backend)?;
    writeln!(out, "  Workers: {}", config.workers.resolved_workers())?;
    for plan in plans {
        let sizes: Vec<String> = plan.sizes().iter().map(|s| s.to_string()).collect();
        writeln!(out, "  {} samples -> [{}]", plan.total(), sizes.join(", "))?;
    }
    Ok(())
}

/// One-line throughput summary for diagnostics
pub fn throughput_summary(samples: u64, elapsed: std::time::Duration) -> String {
    format!("{} samples/s", format_rate(calculate_rate(samples, elapsed)))
}

pub fn print_dice_report(report: &DiceReport, per_worker: bool) -> io::Result<()> {
    write_dice_report(&mut io::stdout().lock(), report, per_worker)
}

pub fn print_circle_report(report: &CircleReport, per_worker: bool) -> io::Result<()> {
    write_circle_report(&mut io::stdout().lock(), report, per_worker)
}

pub fn print_trajectory(trajectory: &Trajectory) -> io::Result<()> {
    write_trajectory(&mut io::stdout().lock(), trajectory)
}

pub fn print_plan(config: &Config, plans: &[JobAssignment]) -> io::Result<()> {
    write_plan(&mut io::stdout().lock(), config, plans)
}
