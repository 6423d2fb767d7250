//! `selfcal` CLI: scenario runs, layout comparison, noise and track-length
//! sweeps, and calibration of recorded detections.

use anyhow::Result;
use calib_core::{CalibrationErrors, CalibrationOutput, ErrorStats, NetworkCalibrator};
use clap::{Parser, Subcommand};
use sim::replay::{load_log, save_log, ObservationLog};
use sim::scenarios::{Scenario, ScenarioKind};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "selfcal", about = "Radar network self-calibration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a named layout, calibrate it and report errors.
    RunScenario {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Target process noise std dev (meters)
        #[arg(long, default_value_t = 0.5)]
        noise_std: f64,
        /// Radar measurement noise std dev (meters)
        #[arg(long, default_value_t = 0.5)]
        measurement_noise_std: f64,
        /// Recorded time steps per radar
        #[arg(long, default_value_t = 100)]
        steps: usize,
        /// Write calibration matrices and errors to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also save the observation log
        #[arg(long)]
        save_log: Option<PathBuf>,
    },
    /// Run every layout with the same seed and compare mean errors.
    Compare {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Mean errors over repeated trials for increasing noise levels.
    Sweep {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Trials per noise level
        #[arg(long, default_value_t = 20)]
        trials: u64,
        /// Noise std devs (process and measurement alike)
        #[arg(long, num_args = 1.., default_values_t = [0.1, 0.5, 1.0, 2.0])]
        levels: Vec<f64>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Mean errors over repeated trials for increasing track lengths.
    LengthSweep {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Trials per track length
        #[arg(long, default_value_t = 20)]
        trials: u64,
        /// Track lengths in time steps
        #[arg(long, num_args = 1.., default_values_t = [50, 100, 200, 500])]
        steps: Vec<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Calibrate recorded data: a directory of node detection frames or an
    /// observation log file.
    Calibrate {
        input: PathBuf,
        /// Report file (default: `<input dir>/calibration_output/calibration_results.txt`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunScenario {
            scenario,
            seed,
            noise_std,
            measurement_noise_std,
            steps,
            output,
            save_log: log_path,
        } => {
            let scenario = Scenario::build(scenario, seed)
                .with_noise(noise_std, measurement_noise_std)
                .with_steps(steps);
            run_scenario(&scenario, output.as_deref(), log_path.as_deref())?;
        }
        Commands::Compare { seed } => compare(seed)?,
        Commands::Sweep {
            scenario,
            trials,
            levels,
            seed,
        } => sweep(scenario, trials, &levels, seed)?,
        Commands::LengthSweep {
            scenario,
            trials,
            steps,
            seed,
        } => length_sweep(scenario, trials, &steps, seed)?,
        Commands::Calibrate { input, output } => calibrate(&input, output.as_deref())?,
    }

    Ok(())
}

/// Simulate, calibrate and score one scenario.
fn evaluate(scenario: &Scenario) -> Result<(ObservationLog, CalibrationOutput, CalibrationErrors)> {
    let run = scenario.run();
    let out = NetworkCalibrator::default().calibrate(&run.observations)?;
    let errors = CalibrationErrors::compute(&scenario.ground_truth(), &out.averaged)?;
    let log = ObservationLog {
        scenario_name: scenario.name.clone(),
        seed: Some(scenario.seed),
        radar_names: (0..scenario.layout.len()).map(|i| format!("R{}", i + 1)).collect(),
        layout: Some(scenario.layout.clone()),
        observations: run.observations,
    };
    Ok((log, out, errors))
}

fn run_scenario(scenario: &Scenario, output_path: Option<&Path>, log_path: Option<&Path>) -> Result<()> {
    println!(
        "Running scenario '{}' (seed={}, steps={}, noise={:.2}/{:.2} m)...",
        scenario.name,
        scenario.seed,
        scenario.num_steps,
        scenario.target.process_noise_std,
        scenario.measurement_noise_std,
    );

    let (log, out, errors) = evaluate(scenario)?;
    for advisory in &out.advisories {
        println!("warning: {advisory}");
    }
    print_stats("Position errors", &errors.position_stats, "m");
    print_stats("Orientation errors", &errors.orientation_stats, "°");
    println!("Calibration time: {} µs", out.total_time_us);

    if let Some(lpath) = log_path {
        save_log(&log, lpath)?;
        println!("Observation log saved to {}", lpath.display());
    }

    if let Some(opath) = output_path {
        let json = serde_json::json!({
            "scenario": scenario.name,
            "seed": scenario.seed,
            "calibration": out,
            "errors": errors,
        });
        std::fs::write(opath, serde_json::to_string_pretty(&json)?)?;
        println!("Results saved to {}", opath.display());
    }

    Ok(())
}

fn compare(seed: u64) -> Result<()> {
    println!("{:<10} {:>14} {:>18}", "layout", "mean pos (m)", "mean orient (°)");
    for kind in ScenarioKind::ALL {
        let scenario = Scenario::build(kind, seed);
        let (_, _, errors) = evaluate(&scenario)?;
        println!(
            "{:<10} {:>14.3} {:>18.3}",
            scenario.name, errors.position_stats.mean, errors.orientation_stats.mean
        );
    }
    Ok(())
}

/// Mean position / orientation error over `trials` seeds starting at `seed`.
fn trial_mean(trials: u64, seed: u64, make: impl Fn(u64) -> Scenario) -> Result<(f64, f64)> {
    anyhow::ensure!(trials > 0, "at least one trial is required");
    let (mut pos, mut ori) = (0.0, 0.0);
    for trial in 0..trials {
        let (_, _, errors) = evaluate(&make(seed.wrapping_add(trial)))?;
        pos += errors.position_stats.mean;
        ori += errors.orientation_stats.mean;
    }
    let n = trials as f64;
    Ok((pos / n, ori / n))
}

fn sweep(kind: ScenarioKind, trials: u64, levels: &[f64], seed: u64) -> Result<()> {
    println!("{:<10} {:>14} {:>18}", "noise (m)", "mean pos (m)", "mean orient (°)");
    for &level in levels {
        let (pos, ori) = trial_mean(trials, seed, |s| Scenario::build(kind, s).with_noise(level, level))?;
        println!("{:<10.2} {:>14.3} {:>18.3}", level, pos, ori);
    }
    Ok(())
}

fn length_sweep(kind: ScenarioKind, trials: u64, lengths: &[usize], seed: u64) -> Result<()> {
    println!("{:<10} {:>14} {:>18}", "steps", "mean pos (m)", "mean orient (°)");
    for &steps in lengths {
        let (pos, ori) = trial_mean(trials, seed, |s| Scenario::build(kind, s).with_steps(steps))?;
        println!("{:<10} {:>14.3} {:>18.3}", steps, pos, ori);
    }
    Ok(())
}

fn calibrate(input: &Path, output_path: Option<&Path>) -> Result<()> {
    let (names, observations, report_dir) = if input.is_dir() {
        let recorded = sim::load_detections(input)?;
        (recorded.nodes, recorded.observations, input.join("calibration_output"))
    } else {
        let log = load_log(input)?;
        let dir = input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("calibration_output");
        (log.radar_names, log.observations, dir)
    };
    anyhow::ensure!(
        names.len() == observations.num_radars(),
        "{} radar names for {} trajectories",
        names.len(),
        observations.num_radars()
    );
    println!(
        "Loaded {} radars, {} frames each",
        observations.num_radars(),
        observations.num_steps()
    );

    let out = NetworkCalibrator::default().calibrate(&observations)?;
    let report = format_report(&names, &out);

    let path = match output_path {
        Some(p) => p.to_path_buf(),
        None => {
            std::fs::create_dir_all(&report_dir)?;
            report_dir.join("calibration_results.txt")
        }
    };
    std::fs::write(&path, report)?;
    tracing::info!(path = %path.display(), "calibration report written");
    println!("Results saved to {}", path.display());
    Ok(())
}

/// Per-reference listing of the averaged poses of every other radar.
fn format_report(names: &[String], out: &CalibrationOutput) -> String {
    let rule = "=".repeat(60);
    let mut s = String::new();
    let _ = writeln!(s, "{rule}\nRADAR CALIBRATION RESULTS\n{rule}\n");
    for (i, reference) in names.iter().enumerate() {
        let _ = writeln!(s, "{reference} as Reference:\n{}", "-".repeat(50));
        for (k, node) in names.iter().enumerate() {
            if i == k {
                continue;
            }
            let p = out.averaged.translation[(i, k)];
            let _ = writeln!(
                s,
                "  {node}: Position=({:.2}, {:.2})m, Orientation={:.1}°, Residual={:.3}",
                p.re,
                p.im,
                out.averaged.rotation_deg[(i, k)],
                out.residuals[(i, k)],
            );
        }
        let _ = writeln!(s);
    }
    for advisory in &out.advisories {
        let _ = writeln!(s, "warning: {advisory}");
    }
    s
}

fn print_stats(label: &str, stats: &ErrorStats, unit: &str) {
    println!(
        "{label}: mean={:.3}{unit} std={:.3}{unit} min={:.3}{unit} max={:.3}{unit}",
        stats.mean, stats.std, stats.min, stats.max
    );
}
