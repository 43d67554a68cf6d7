//! recursal — decision engine CLI for filha-maior-solteira appeal review

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use recursal_core::config::RulesConfig;
use recursal_core::types::{
    ArgumentCandidate, FeedbackLabel, FeedbackRecord, Finding, FindingCategory, Outcome,
    ResolvedArgumentSet,
};
use recursal_engine::pipeline::Engine;
use recursal_llm::{Classifier, ClassifyRequest, OpenAiClassifier};
use recursal_store::client::LogClient;
use recursal_store::feedback::FeedbackStore;
use recursal_store::fs::FsLogClient;
use recursal_store::http::HttpLogClient;
use recursal_store::report::summarize;
use recursal_store::retriever::retrieve;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "recursal", about = "Análise de recursos de pensão — filha maior solteira")]
struct Cli {
    /// Path to the decision rules file
    #[arg(long, default_value = "rules/decision_rules.json")]
    rules: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and verify the rule table, print its shape
    CheckRules,
    /// Evaluate one case from a JSON file (or a live classifier)
    Analyze {
        /// Case file: finding, defense text, and classifier candidates
        case: PathBuf,
        /// Call the configured classifier instead of reading candidates
        /// from the case file (requires OPENAI_API_KEY)
        #[arg(long)]
        classify: bool,
        /// Feedback store (path or URL); when set, attach the best exemplar
        #[arg(long)]
        store: Option<String>,
    },
    /// Append a reviewed case to the feedback store
    Feedback {
        /// Feedback store (path or URL)
        #[arg(long)]
        store: String,
        /// Case identifier (process or extract number)
        #[arg(long)]
        finding_code: String,
        /// Category label, e.g. "Apenas 1 filho"
        #[arg(long)]
        category: String,
        /// Comma-separated argument ids, e.g. "4,5"
        #[arg(long, default_value = "")]
        arguments: String,
        /// "procedente" or "improcedente"
        #[arg(long)]
        outcome: String,
        /// Mark the generated report as incorrect (requires --comment)
        #[arg(long)]
        incorrect: bool,
        /// Reviewer comment
        #[arg(long)]
        comment: Option<String>,
        /// File holding the generated report text
        #[arg(long)]
        generated_text: PathBuf,
    },
    /// Aggregate the feedback store into a review report
    Summary {
        /// Feedback store (path or URL)
        #[arg(long)]
        store: String,
    },
}

/// On-disk case description consumed by `analyze`.
#[derive(Deserialize)]
struct CaseFile {
    finding: Finding,
    #[serde(default)]
    defense_text: String,
    /// Extract text, only needed with --classify.
    #[serde(default)]
    extract_text: String,
    #[serde(default)]
    candidates: Vec<ArgumentCandidate>,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    finding_code: String,
    category: FindingCategory,
    reclassified_from: Option<FindingCategory>,
    arguments: Vec<u8>,
    inferred: Option<u8>,
    outcome: Outcome,
    rejections: Vec<String>,
    table_version: String,
    exemplar: Option<FeedbackRecord>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recursal=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CheckRules => {
            let config = RulesConfig::load(&cli.rules)?;
            let engine = Engine::new(&config)?;
            println!("rule table ok: version {}", engine.table_version());
            let mut per_category: Vec<(FindingCategory, usize)> = FindingCategory::ALL
                .iter()
                .map(|c| {
                    let count = config.rules.iter().filter(|r| r.category == *c).count();
                    (*c, count)
                })
                .collect();
            per_category.sort_by_key(|(_, n)| std::cmp::Reverse(*n));
            for (category, count) in per_category {
                println!("  {:<45} {} rule(s)", category.label(), count);
            }
        }

        Commands::Analyze { case, classify, store } => {
            let config = RulesConfig::load(&cli.rules)?;
            let engine = Engine::new(&config)?;

            let text = std::fs::read_to_string(&case)
                .with_context(|| format!("reading case file {}", case.display()))?;
            let mut case_file: CaseFile =
                serde_json::from_str(&text).context("parsing case file")?;

            if classify {
                let api_key = std::env::var("OPENAI_API_KEY")
                    .context("--classify requires OPENAI_API_KEY")?;
                let classifier = OpenAiClassifier::new(api_key);
                info!(classifier = classifier.name(), "classifying case");
                let classification = classifier
                    .classify(
                        ClassifyRequest {
                            extract_text: case_file.extract_text.clone(),
                            defense_text: case_file.defense_text.clone(),
                        },
                        None,
                    )
                    .await
                    .map_err(recursal_core::Error::from)?;
                case_file.finding.category = classification.category;
                case_file.candidates = classification.candidates;
                if !classification.unmapped.is_empty() {
                    warn!(
                        outros = ?classification.unmapped,
                        "classifier proposed arguments outside the catalog"
                    );
                }
            }

            let evaluation = engine.evaluate(
                &case_file.finding,
                &case_file.candidates,
                &case_file.defense_text,
            )?;

            let exemplar = match &store {
                Some(location) => {
                    let store = FeedbackStore::new(log_client(location));
                    retrieve(&store, evaluation.category, evaluation.outcome)
                        .await
                        .map_err(recursal_core::Error::from)?
                }
                None => None,
            };

            let output = AnalyzeOutput {
                finding_code: evaluation.finding_code,
                category: evaluation.category,
                reclassified_from: evaluation.reclassified.as_ref().map(|r| r.from),
                arguments: evaluation.arguments.iter().map(|id| id.0).collect(),
                inferred: evaluation.inferred.map(|id| id.0),
                outcome: evaluation.outcome,
                rejections: evaluation
                    .rejections
                    .iter()
                    .map(|r| format!("arg {}: {}", r.argument_id, r.reason))
                    .collect(),
                table_version: evaluation.table_version,
                exemplar,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Feedback {
            store,
            finding_code,
            category,
            arguments,
            outcome,
            incorrect,
            comment,
            generated_text,
        } => {
            let category = parse_category(&category)?;
            let outcome = parse_outcome(&outcome)?;
            let arguments = parse_arguments(&arguments)?;
            let label = if incorrect {
                FeedbackLabel::Incorrect
            } else {
                FeedbackLabel::Correct
            };
            let text = std::fs::read_to_string(&generated_text)
                .with_context(|| format!("reading {}", generated_text.display()))?;

            let record =
                FeedbackRecord::now(finding_code, category, arguments, outcome, label, comment, text);

            let store = FeedbackStore::new(log_client(&store));
            store
                .append(&record)
                .await
                .map_err(recursal_core::Error::from)?;
            println!("feedback recorded for {}", record.finding_code);
        }

        Commands::Summary { store } => {
            let store = FeedbackStore::new(log_client(&store));
            let records = store.load_all().await.map_err(recursal_core::Error::from)?;
            let report = summarize(&records);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Path stores get the file-backed client, URLs the HTTP one.
fn log_client(location: &str) -> Arc<dyn LogClient> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpLogClient::new(location))
    } else {
        Arc::new(FsLogClient::new(location))
    }
}

fn parse_category(input: &str) -> anyhow::Result<FindingCategory> {
    let category = FindingCategory::from_label(input);
    if category == FindingCategory::Unclassified
        && !input.trim().eq_ignore_ascii_case("achado não classificado")
        && input.trim().to_lowercase() != "unclassified"
    {
        anyhow::bail!("unknown category label: {input}");
    }
    Ok(category)
}

fn parse_outcome(input: &str) -> anyhow::Result<Outcome> {
    match input.trim().to_lowercase().as_str() {
        "procedente" => Ok(Outcome::Procedente),
        "improcedente" => Ok(Outcome::Improcedente),
        other => anyhow::bail!("unknown outcome: {other} (expected procedente/improcedente)"),
    }
}

fn parse_arguments(input: &str) -> anyhow::Result<ResolvedArgumentSet> {
    let mut set = ResolvedArgumentSet::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: u8 = part
            .parse()
            .with_context(|| format!("invalid argument id: {part}"))?;
        set.push(id.into());
    }
    Ok(set)
}
