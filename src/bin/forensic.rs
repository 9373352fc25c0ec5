#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use forensic_harness::casework::{self, CaseworkConfig};
use forensic_harness::estimator::{
    estimate, CorrectionPoint, EstimatorConfig, Observation,
};
use forensic_harness::gateway::{ProviderGateway, StderrUsageSink};
use forensic_harness::knowledge;

#[derive(Parser)]
#[command(name = "forensic", version, about = "Forensic case analysis harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: parse report, estimate interval, analyze toxicology,
    /// generate narrative, write the report
    Analyze {
        /// Path to the free-text case report
        #[arg(long)]
        report: PathBuf,

        /// Output JSON report path
        #[arg(long)]
        out: PathBuf,

        /// Also write a formatted text rendering to this path
        #[arg(long)]
        text_out: Option<PathBuf>,

        /// OpenRouter model for evidence extraction
        #[arg(long, default_value = "google/gemini-2.5-flash")]
        model: String,

        /// OpenRouter model for opinion/literature narrative
        #[arg(long, default_value = "google/gemini-2.5-pro")]
        narrative_model: String,

        /// Skip the expert-opinion call
        #[arg(long)]
        no_opinion: bool,

        /// Skip the literature-review call
        #[arg(long)]
        no_literature: bool,
    },
    /// Deterministic postmortem interval estimate. No network.
    Estimate {
        /// Measured core body temperature, °C
        #[arg(long)]
        core_temp: f64,

        /// Ambient temperature at the scene, °C
        #[arg(long)]
        ambient_temp: f64,

        /// Baseline temperature at death, °C
        #[arg(long, default_value_t = 37.0)]
        reference_temp: f64,

        /// Free-text rigor mortis observation
        #[arg(long)]
        rigor: Option<String>,

        /// Average cooling rate, °C/hour
        #[arg(long, default_value_t = 0.7)]
        base_rate: f64,

        /// Ambient threshold separating cold from warm environments, °C
        #[arg(long, default_value_t = 20.0)]
        threshold: f64,

        /// Correction factor below the threshold
        #[arg(long, default_value_t = 1.2)]
        cold_factor: f64,

        /// Correction factor at/above the threshold
        #[arg(long, default_value_t = 0.8)]
        warm_factor: f64,

        /// Where the correction applies: rate or elapsed
        #[arg(long, value_enum, default_value = "rate")]
        correction: CliCorrection,
    },
    /// Dump the static medical knowledge base
    Knowledge {
        /// Show only one substance profile
        #[arg(long)]
        substance: Option<String>,
    },
}

/// CLI-facing correction point enum (clap::ValueEnum).
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliCorrection {
    Rate,
    Elapsed,
}

impl From<CliCorrection> for CorrectionPoint {
    fn from(c: CliCorrection) -> Self {
        match c {
            CliCorrection::Rate => CorrectionPoint::Rate,
            CliCorrection::Elapsed => CorrectionPoint::Elapsed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            report,
            out,
            text_out,
            model,
            narrative_model,
            no_opinion,
            no_literature,
        } => {
            let report_text = std::fs::read_to_string(&report)
                .map_err(|e| format!("cannot read {}: {e}", report.display()))?;

            let gateway = ProviderGateway::from_env(Arc::new(StderrUsageSink))?;
            let config = CaseworkConfig {
                extraction_model: model,
                narrative_model,
                no_opinion,
                no_literature,
                ..Default::default()
            };

            let case_report = casework::run_case(&gateway, &config, &report_text).await?;

            case_report.save_json(&out)?;
            println!("report written to {}", out.display());
            if let Some(text_path) = text_out {
                case_report.save_text(&text_path)?;
                println!("text rendering written to {}", text_path.display());
            }

            if let Some(interval) = &case_report.interval {
                println!(
                    "estimated interval: {:.1}h ({}, confidence {})",
                    interval.estimate.elapsed_hours,
                    interval.estimate.corroboration,
                    interval.estimate.confidence.as_str(),
                );
            }
            for warning in &case_report.warnings {
                eprintln!("warning: {warning}");
            }
        }
        Commands::Estimate {
            core_temp,
            ambient_temp,
            reference_temp,
            rigor,
            base_rate,
            threshold,
            cold_factor,
            warm_factor,
            correction,
        } => {
            let config = EstimatorConfig {
                base_rate,
                ambient_threshold: threshold,
                cold_factor,
                warm_factor,
                correction: correction.into(),
                ..Default::default()
            };

            let mut obs = Observation::new(core_temp, ambient_temp).with_reference(reference_temp);
            if let Some(signal) = rigor {
                obs = obs.with_rigor(signal);
            }

            let result = estimate(&config, &obs)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Knowledge { substance } => match substance {
            Some(name) => match knowledge::substance_profile(&name) {
                Some(profile) => println!("{}", serde_json::to_string_pretty(profile)?),
                None => return Err(format!("no profile for {name}").into()),
            },
            None => {
                let dump = serde_json::json!({
                    "substances": knowledge::SUBSTANCES,
                    "interactions": knowledge::INTERACTIONS,
                    "postmortem_changes": knowledge::POSTMORTEM_CHANGES,
                });
                println!("{}", serde_json::to_string_pretty(&dump)?);
            }
        },
    }

    Ok(())
}
