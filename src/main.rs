//! Social Security Benefit Engine CLI
//!
//! Command-line interface for benefit estimates. Results are printed as JSON;
//! persisting them is left to the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use ss_benefit_engine::benefits::fra;
use ss_benefit_engine::earnings::load_earnings;
use ss_benefit_engine::estimate::parse_birth_date;
use ss_benefit_engine::{
    BenefitEstimate, BenefitEstimator, EngineConfig, EstimateRequest, FullRetirementAge,
};

#[derive(Debug, Parser)]
#[command(name = "ss-engine", version, about = "Social Security benefit estimates and optimal claiming age")]
struct Cli {
    #[command(flatten)]
    assumptions: AssumptionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct AssumptionArgs {
    /// JSON engine config (tax years and valuation assumptions)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing tax_years.csv
    #[arg(long, global = true)]
    constants_dir: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[arg(long, global = true)]
    life_expectancy: Option<f64>,

    #[arg(long, global = true)]
    discount_rate: Option<f64>,

    #[arg(long, global = true)]
    cola: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Full Retirement Age for a birth year
    Fra {
        #[arg(long)]
        birth_year: i32,
    },
    /// Estimate from an earnings ledger CSV
    Estimate {
        #[arg(long)]
        birth_date: String,
        #[arg(long)]
        earnings: PathBuf,
    },
    /// Estimate from a single annual income assumed over a full career
    Manual {
        #[arg(long)]
        birth_date: String,
        #[arg(long)]
        income: f64,
    },
    /// Estimate from statement benefits quoted at claiming ages
    Anchors {
        #[arg(long)]
        birth_date: String,
        /// Benefit at a claiming age, as AGE=AMOUNT (repeatable)
        #[arg(long = "benefit", value_parser = parse_anchor)]
        benefits: Vec<(u8, f64)>,
        /// PIA quoted on the statement, if any
        #[arg(long)]
        pia: Option<f64>,
    },
    /// Estimate every client listed in a manifest CSV (client_id,birth_date,earnings_file)
    Batch {
        #[arg(long)]
        manifest: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    client_id: String,
    birth_date: String,
    earnings_file: PathBuf,
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimate: Option<BenefitEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FraOutput {
    birth_year: i32,
    full_retirement_age: FullRetirementAge,
    total_months: u32,
}

fn parse_anchor(value: &str) -> Result<(u8, f64), String> {
    let (age, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected AGE=AMOUNT, got {:?}", value))?;
    let age: u8 = age.trim().parse().map_err(|e| format!("bad age {:?}: {}", age, e))?;
    let amount: f64 = amount.trim().parse().map_err(|e| format!("bad amount {:?}: {}", amount, e))?;
    Ok((age, amount))
}

fn load_config(args: &AssumptionArgs) -> Result<EngineConfig> {
    let mut config = match (&args.config, &args.constants_dir) {
        (Some(path), _) => EngineConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (None, Some(dir)) => EngineConfig::from_csv_path(dir)
            .with_context(|| format!("Failed to load constants from {}", dir.display()))?,
        (None, None) => EngineConfig::default(),
    };

    if let Some(v) = args.life_expectancy {
        config.valuation.life_expectancy = v;
    }
    if let Some(v) = args.discount_rate {
        config.valuation.discount_rate = v;
    }
    if let Some(v) = args.cola {
        config.valuation.cola = v;
    }
    config.validate()?;
    Ok(config)
}

fn ledger_request(
    estimator: &BenefitEstimator,
    birth_date: &str,
    earnings: &Path,
    as_of: NaiveDate,
) -> Result<EstimateRequest> {
    let birth_date = parse_birth_date(birth_date, as_of)?;
    let ledger = load_earnings(earnings, &estimator.config().tax_years, as_of.year())
        .with_context(|| format!("Failed to load earnings {}", earnings.display()))?;
    Ok(EstimateRequest::new(birth_date, as_of).with_ledger(ledger))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let as_of = cli
        .assumptions
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let estimator = BenefitEstimator::new(load_config(&cli.assumptions)?);

    match cli.command {
        Command::Fra { birth_year } => {
            let age = fra::resolve(birth_year);
            print_json(&FraOutput {
                birth_year,
                full_retirement_age: age,
                total_months: age.total_months(),
            })
        }
        Command::Estimate { birth_date, earnings } => {
            let request = ledger_request(&estimator, &birth_date, &earnings, as_of)?;
            print_json(&estimator.estimate(&request)?)
        }
        Command::Manual { birth_date, income } => {
            let birth_date = parse_birth_date(&birth_date, as_of)?;
            let request = EstimateRequest::new(birth_date, as_of).with_manual_income(income);
            print_json(&estimator.estimate(&request)?)
        }
        Command::Anchors { birth_date, benefits, pia } => {
            if benefits.is_empty() && pia.is_none() {
                return Err(anyhow!("at least one --benefit or --pia is required"));
            }
            let birth_date = parse_birth_date(&birth_date, as_of)?;
            let mut request = EstimateRequest::new(birth_date, as_of)
                .with_anchor_benefits(benefits.into_iter().collect::<BTreeMap<_, _>>());
            request.primary_insurance_amount = pia;
            print_json(&estimator.estimate(&request)?)
        }
        Command::Batch { manifest } => {
            let mut reader = csv::Reader::from_path(&manifest)
                .with_context(|| format!("Failed to open manifest {}", manifest.display()))?;
            let rows: Vec<ManifestRow> = reader.deserialize().collect::<Result<_, _>>()?;

            // Earnings paths are relative to the manifest
            let base = manifest.parent().map(Path::to_path_buf).unwrap_or_default();

            let mut entries = Vec::with_capacity(rows.len());
            let mut pending = Vec::new();
            for (idx, row) in rows.iter().enumerate() {
                match ledger_request(&estimator, &row.birth_date, &base.join(&row.earnings_file), as_of) {
                    Ok(request) => pending.push((idx, request)),
                    Err(e) => entries.push((idx, Err(format!("{:#}", e)))),
                }
            }

            let requests: Vec<EstimateRequest> = pending.iter().map(|(_, r)| r.clone()).collect();
            let results = estimator.estimate_batch(&requests);
            for ((idx, _), result) in pending.iter().zip(results) {
                entries.push((*idx, result.map_err(|e| e.to_string())));
            }
            entries.sort_by_key(|(idx, _)| *idx);

            let output: Vec<BatchEntry> = entries
                .into_iter()
                .map(|(idx, result)| {
                    let client_id = rows[idx].client_id.clone();
                    match result {
                        Ok(estimate) => BatchEntry { client_id, estimate: Some(estimate), error: None },
                        Err(error) => BatchEntry { client_id, estimate: None, error: Some(error) },
                    }
                })
                .collect();
            print_json(&output)
        }
    }
}
