use crate::infra::{build_service, parse_profile};
use clap::Args;
use ev_siting::config::AppConfig;
use ev_siting::error::AppError;
use ev_siting::feasibility::{
    BatchRunner, BatchSummary, EvaluationOutcome, FeasibilityVerdict, Profile,
    SiteFeasibilityService,
};
use ev_siting::telemetry;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Street address or place name to screen
    #[arg(long)]
    pub(crate) address: String,
    /// Check profile (minimal or full); defaults to FEASIBILITY_PROFILE
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Option<Profile>,
    /// Print the outcome as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with an `address` column
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the CSV report (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Check profile (minimal or full); defaults to FEASIBILITY_PROFILE
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Option<Profile>,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    evaluate_address(&service, &args, &mut out).await
}

pub(crate) async fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let summary = run_batch_with(&service, &args).await?;
    eprintln!(
        "Evaluated {} address(es): {} feasible, {} unresolved",
        summary.evaluated, summary.feasible, summary.unresolved
    );
    Ok(())
}

fn load_service() -> Result<SiteFeasibilityService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    build_service(&config)
}

pub(crate) async fn evaluate_address<W: Write>(
    service: &SiteFeasibilityService,
    args: &EvaluateArgs,
    out: &mut W,
) -> Result<(), AppError> {
    let profile = args.profile.unwrap_or_else(|| service.default_profile());
    let outcome = service.evaluate_profile(&args.address, profile).await;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &outcome).map_err(io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    match &outcome {
        EvaluationOutcome::Evaluated(verdict) => render_verdict(verdict, out)?,
        EvaluationOutcome::Unresolved { address, reason } => {
            writeln!(out, "Could not evaluate '{}': {}", address, reason.summary())?
        }
    }
    Ok(())
}

fn render_verdict<W: Write>(verdict: &FeasibilityVerdict, out: &mut W) -> io::Result<()> {
    writeln!(out, "Site: {}", verdict.address())?;
    writeln!(out, "Coordinate: {}", verdict.coordinate())?;
    writeln!(out, "Profile: {}", verdict.profile().label())?;
    for check in verdict.checks() {
        let status = if check.passed { "PASS" } else { "FAIL" };
        writeln!(out, "  [{status}] {:<22} {}", check.check.label(), check.notes)?;
    }

    let defaulted = verdict.defaulted_checks();
    if !defaulted.is_empty() {
        let labels: Vec<&str> = defaulted.iter().map(|check| check.label()).collect();
        writeln!(out, "Defaults applied: {}", labels.join(", "))?;
    }
    writeln!(
        out,
        "Feasible: {}",
        if verdict.feasible() { "yes" } else { "no" }
    )
}

pub(crate) async fn run_batch_with(
    service: &SiteFeasibilityService,
    args: &BatchArgs,
) -> Result<BatchSummary, AppError> {
    let profile = args.profile.unwrap_or_else(|| service.default_profile());
    let reader = BufReader::new(File::open(&args.input)?);
    let runner = BatchRunner::new(service, profile);

    let summary = match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            runner.run(reader, writer).await?
        }
        None => runner.run(reader, io::stdout().lock()).await?,
    };
    Ok(summary)
}
