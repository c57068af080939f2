//! Synthetic Telemetry Dataset Generator
//!
//! Generates labeled manufacturing telemetry for training and testing the
//! failure-prediction service. Simulates:
//! - Normal machine operation around nominal baselines
//! - Degradation windows leading to failure events (bearing-wear signature:
//!   rising kurtosis, upward-trending RMS vibration, temperature rise)
//! - Maintenance resets of the time-since-maintenance clock
//!
//! # Usage
//! ```bash
//! ./datagen --days 180 --seed 42 > telemetry_data.csv
//! ./datagen --format json --machines CNC-ALPHA-921 | head
//! ```

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::io::{self, Write};

use aegisops::config::MonitorConfig;

// ============================================================================
// Dataset Constants
// ============================================================================

/// Telemetry samples per day (5-minute intervals)
const SAMPLES_PER_DAY: usize = 288;
/// Minutes between samples
const SAMPLE_INTERVAL_MINUTES: i64 = 5;
/// Degradation window length used for the severity ramp (days)
const DEGRADATION_SPAN_DAYS: f64 = 5.0;
/// Days-before-failure labeled as positive for the 72h target
const POSITIVE_LABEL_DAYS: i64 = 3;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "datagen")]
#[command(about = "Synthetic telemetry dataset generator for AegisOps")]
#[command(version)]
struct Args {
    /// Days of data per machine
    #[arg(long, default_value = "180", value_parser = clap::value_parser!(u32).range(1..=1000))]
    days: u32,

    /// Probability that a given day ends in a failure event
    #[arg(long, default_value = "0.02")]
    failure_rate: f64,

    /// Output format: csv or json (JSON Lines)
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// Comma-separated machine IDs (default: the standard 8-machine roster)
    #[arg(long)]
    machines: Option<String>,

    /// Dataset start date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    start_date: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Sample Row
// ============================================================================

/// One labeled telemetry sample.
#[derive(Debug, serde::Serialize)]
struct Sample {
    timestamp: DateTime<Utc>,
    machine_id: String,
    vibration_rms: f64,
    vibration_peak: f64,
    vibration_kurtosis: f64,
    temperature: f64,
    temp_rate_of_change: f64,
    power_consumption: f64,
    power_deviation: f64,
    time_since_maintenance: f64,
    cumulative_cycles: u64,
    hour_of_day: u32,
    day_of_week: u32,
    /// 1 when a failure occurs within the next 72 hours
    failure_within_72h: u8,
    /// 1 on the samples at the failure point itself
    failure_event: u8,
}

const CSV_HEADER: &str = "timestamp,machine_id,vibration_rms,vibration_peak,\
vibration_kurtosis,temperature,temp_rate_of_change,power_consumption,\
power_deviation,time_since_maintenance,cumulative_cycles,hour_of_day,\
day_of_week,failure_within_72h,failure_event";

impl Sample {
    fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.2},{},{},{},{},{}",
            self.timestamp.to_rfc3339(),
            self.machine_id,
            self.vibration_rms,
            self.vibration_peak,
            self.vibration_kurtosis,
            self.temperature,
            self.temp_rate_of_change,
            self.power_consumption,
            self.power_deviation,
            self.time_since_maintenance,
            self.cumulative_cycles,
            self.hour_of_day,
            self.day_of_week,
            self.failure_within_72h,
            self.failure_event,
        )
    }
}

// ============================================================================
// Telemetry Profiles
// ============================================================================

/// Noise distributions shared by both operating profiles.
struct Noise {
    rms: Normal<f64>,
    peak: Normal<f64>,
    kurtosis: Normal<f64>,
    temperature: Normal<f64>,
    temp_rate: Normal<f64>,
    power: Normal<f64>,
    power_dev: Normal<f64>,
    degraded_rms: Normal<f64>,
    degraded_peak: Normal<f64>,
    degraded_kurtosis: Normal<f64>,
    degraded_temp_rate: Normal<f64>,
    degraded_power_dev: Normal<f64>,
}

impl Noise {
    fn new() -> Self {
        // Normal::new only fails on non-finite/negative sigma
        #[allow(clippy::unwrap_used)]
        Self {
            rms: Normal::new(0.0, 2.0).unwrap(),
            peak: Normal::new(0.0, 5.0).unwrap(),
            kurtosis: Normal::new(0.0, 0.3).unwrap(),
            temperature: Normal::new(0.0, 2.0).unwrap(),
            temp_rate: Normal::new(0.0, 0.5).unwrap(),
            power: Normal::new(0.0, 0.5).unwrap(),
            power_dev: Normal::new(0.0, 2.0).unwrap(),
            degraded_rms: Normal::new(0.0, 3.0).unwrap(),
            degraded_peak: Normal::new(0.0, 8.0).unwrap(),
            degraded_kurtosis: Normal::new(0.0, 0.5).unwrap(),
            degraded_temp_rate: Normal::new(0.0, 0.3).unwrap(),
            degraded_power_dev: Normal::new(0.0, 3.0).unwrap(),
        }
    }
}

/// Raw channel values before clamping and labeling.
struct Channels {
    vibration_rms: f64,
    vibration_peak: f64,
    vibration_kurtosis: f64,
    temperature: f64,
    temp_rate_of_change: f64,
    power_consumption: f64,
    power_deviation: f64,
}

/// Telemetry for normal operation.
fn normal_operation(noise: &Noise, rng: &mut StdRng) -> Channels {
    Channels {
        vibration_rms: 20.0 + noise.rms.sample(rng),
        vibration_peak: 35.0 + noise.peak.sample(rng),
        vibration_kurtosis: 3.2 + noise.kurtosis.sample(rng),
        temperature: 44.0 + noise.temperature.sample(rng),
        temp_rate_of_change: noise.temp_rate.sample(rng),
        power_consumption: 12.0 + noise.power.sample(rng),
        power_deviation: noise.power_dev.sample(rng),
    }
}

/// Telemetry inside a degradation window.
///
/// `progress` ramps 0..severity across the day; the pattern follows real
/// bearing degradation signatures (impulsive vibration shows first in
/// kurtosis, then RMS trends up and temperature follows).
fn degradation(noise: &Noise, rng: &mut StdRng, progress: f64) -> Channels {
    Channels {
        vibration_rms: 20.0 + progress * 35.0 + noise.degraded_rms.sample(rng),
        vibration_peak: 35.0 + progress * 50.0 + noise.degraded_peak.sample(rng),
        vibration_kurtosis: 3.2 + progress * 4.0 + noise.degraded_kurtosis.sample(rng),
        temperature: 44.0 + progress * 15.0 + noise.temperature.sample(rng),
        temp_rate_of_change: progress * 2.0 + noise.degraded_temp_rate.sample(rng),
        power_consumption: 12.0 + progress * 3.0 + noise.power.sample(rng),
        power_deviation: progress * 15.0 + noise.degraded_power_dev.sample(rng),
    }
}

// ============================================================================
// Per-Machine Generation
// ============================================================================

/// Inclusive (start_day, failure_day) degradation windows for one machine.
fn schedule_failures(days: u32, failure_rate: f64, rng: &mut StdRng) -> Vec<(i64, i64)> {
    let mut windows = Vec::new();
    for day in 0..i64::from(days) {
        if rng.gen::<f64>() < failure_rate {
            let lead = rng.gen_range(2..5);
            windows.push(((day - lead).max(0), day));
        }
    }
    windows
}

struct MachineStats {
    samples: usize,
    failure_events: usize,
    positive_labels: usize,
}

fn generate_machine<W: Write>(
    machine_id: &str,
    start: DateTime<Utc>,
    args: &Args,
    rng: &mut StdRng,
    out: &mut W,
) -> anyhow::Result<MachineStats> {
    let noise = Noise::new();
    let windows = schedule_failures(args.days, args.failure_rate, rng);
    let mut time_since_maintenance = 0.0_f64;
    let mut cumulative_cycles: u64 = rng.gen_range(50_000..150_000);
    let mut stats = MachineStats {
        samples: 0,
        failure_events: 0,
        positive_labels: 0,
    };

    for day in 0..i64::from(args.days) {
        let day_start = start + Duration::days(day);
        let days_until_failure = windows
            .iter()
            .find(|(s, e)| *s <= day && day <= *e)
            .map(|(_, e)| e - day);

        let mut rms_sum = 0.0;
        for i in 0..SAMPLES_PER_DAY {
            let ts = day_start + Duration::minutes(SAMPLE_INTERVAL_MINUTES * i as i64);
            let channels = match days_until_failure {
                Some(until) => {
                    let severity = 1.0 - (until as f64 / DEGRADATION_SPAN_DAYS);
                    let progress = (i as f64 / SAMPLES_PER_DAY as f64) * severity.max(0.0);
                    degradation(&noise, rng, progress)
                }
                None => normal_operation(&noise, rng),
            };
            rms_sum += channels.vibration_rms;

            let failure_within_72h =
                u8::from(days_until_failure.is_some_and(|u| u <= POSITIVE_LABEL_DAYS));
            let failure_event = u8::from(
                days_until_failure == Some(0) && i > SAMPLES_PER_DAY - 10,
            );
            stats.positive_labels += usize::from(failure_within_72h);
            stats.failure_events += usize::from(failure_event);
            stats.samples += 1;

            cumulative_cycles += rng.gen_range(1..5);
            let sample = Sample {
                timestamp: ts,
                machine_id: machine_id.to_string(),
                vibration_rms: channels.vibration_rms.max(0.0),
                vibration_peak: channels.vibration_peak.max(0.0),
                vibration_kurtosis: channels.vibration_kurtosis.max(2.0),
                temperature: channels.temperature.max(20.0),
                temp_rate_of_change: channels.temp_rate_of_change,
                power_consumption: channels.power_consumption.max(5.0),
                power_deviation: channels.power_deviation,
                time_since_maintenance: time_since_maintenance
                    + i as f64 * (SAMPLE_INTERVAL_MINUTES as f64 / 60.0),
                cumulative_cycles,
                hour_of_day: ts.hour(),
                day_of_week: ts.weekday().num_days_from_monday(),
                failure_within_72h,
                failure_event,
            };

            if args.format == "json" {
                serde_json::to_writer(&mut *out, &sample)?;
                writeln!(out)?;
            } else {
                sample.write_csv(out)?;
            }
        }

        // Maintenance resets: corrective after a bad vibration day, plus
        // occasional scheduled PM.
        let day_mean_rms = rms_sum / SAMPLES_PER_DAY as f64;
        if day_mean_rms > 50.0 || rng.gen::<f64>() < 0.01 {
            time_since_maintenance = 0.0;
        } else {
            time_since_maintenance += 24.0;
        }
    }

    Ok(stats)
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.format != "csv" && args.format != "json" {
        anyhow::bail!("unsupported format: {} (expected csv or json)", args.format);
    }

    let start_day = chrono::NaiveDate::parse_from_str(&args.start_date, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid --start-date {}: {}", args.start_date, e))?;
    let start = Utc.from_utc_datetime(&start_day.and_time(chrono::NaiveTime::MIN));

    let machines: Vec<String> = match &args.machines {
        Some(list) => list.split(',').map(|m| m.trim().to_string()).collect(),
        None => MonitorConfig::default().fleet.machines,
    };

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if args.format == "csv" {
        writeln!(out, "{CSV_HEADER}")?;
    }

    let mut total = MachineStats {
        samples: 0,
        failure_events: 0,
        positive_labels: 0,
    };
    for machine_id in &machines {
        tracing::info!(machine = %machine_id, "Generating telemetry");
        let stats = generate_machine(machine_id, start, &args, &mut rng, &mut out)?;
        total.samples += stats.samples;
        total.failure_events += stats.failure_events;
        total.positive_labels += stats.positive_labels;
    }
    out.flush()?;

    tracing::info!(
        samples = total.samples,
        failure_events = total.failure_events,
        positive_labels = total.positive_labels,
        class_balance = format!(
            "{:.2}%",
            100.0 * total.positive_labels as f64 / total.samples.max(1) as f64
        ),
        "Dataset generation complete"
    );
    Ok(())
}
