//! certcheck CLI: manage and classify submissions without the web server.
//!
//! Reads the same environment (and `.env`) as the server, so it operates on
//! the same record file and upload folder.

use anyhow::Context;
use certcheck_cli::{init_tracing, truncate_string, UnloadedClassifier};
use certcheck_core::{Config, SubmissionFields};
use certcheck_services::{
    ClassificationService, DocumentClassifier, LocalStorage, OnnxClassifier, RecordStore,
    SubmissionRepository, SubmissionService, UploadValidator, UploadedFile,
};
use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "certcheck", about = "certcheck submission tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored submissions in upload order
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a submission and its stored file
    #[command(group(ArgGroup::new("target").required(true).args(["index", "id"])))]
    Delete {
        /// Zero-based position in the list
        #[arg(long)]
        index: Option<usize>,
        /// Record UUID
        #[arg(long)]
        id: Option<Uuid>,
    },
    /// Classify an image without storing it
    Classify {
        /// Path to the image
        file: PathBuf,
    },
    /// Store, record and classify a document like the upload form does
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        /// Path to the image
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn load_classifier(config: &Config) -> anyhow::Result<Arc<dyn DocumentClassifier>> {
    let classifier = OnnxClassifier::load(&config.model_path)
        .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;
    Ok(Arc::new(classifier))
}

async fn open_service(
    config: &Config,
    classifier: Arc<dyn DocumentClassifier>,
) -> anyhow::Result<SubmissionService> {
    let store = RecordStore::open(&config.details_file)
        .await
        .with_context(|| format!("Failed to open record store {}", config.details_file.display()))?;
    let storage = LocalStorage::new(&config.upload_folder)
        .await
        .context("Failed to prepare upload directory")?;

    Ok(SubmissionService::new(
        SubmissionRepository::new(store),
        Arc::new(storage),
        UploadValidator::from_config(config),
        ClassificationService::new(classifier, config.classifier_threshold),
    ))
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => {
            let unloaded = Arc::new(UnloadedClassifier::new(&config.model_path));
            let service = open_service(&config, unloaded).await?;
            let records = service.list().await?;

            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("No submissions");
            } else {
                println!(
                    "{:<5} {:<20} {:<10} {:<24} {:<20} {}",
                    "#", "NAME", "BRANCH", "EMAIL", "SUBJECT", "FILE"
                );
                for (index, record) in records.iter().enumerate() {
                    println!(
                        "{:<5} {:<20} {:<10} {:<24} {:<20} {}",
                        index,
                        truncate_string(&record.name, 20),
                        truncate_string(&record.branch, 10),
                        truncate_string(&record.email, 24),
                        truncate_string(&record.subject, 20),
                        record.filename
                    );
                }
            }
        }
        Commands::Delete { index, id } => {
            let unloaded = Arc::new(UnloadedClassifier::new(&config.model_path));
            let service = open_service(&config, unloaded).await?;

            let removed = match (index, id) {
                (Some(index), _) => service.delete_at(index).await?,
                (None, Some(id)) => service.delete_by_id(id).await?,
                (None, None) => None,
            };

            match removed {
                Some(record) => print_json(&record)?,
                None => println!("No matching submission"),
            }
        }
        Commands::Classify { file } => {
            let classification =
                ClassificationService::new(load_classifier(&config)?, config.classifier_threshold);
            let outcome = classification
                .classify_file(&file)
                .await
                .with_context(|| format!("Failed to classify {}", file.display()))?;
            print_json(&serde_json::json!({
                "file": file.display().to_string(),
                "verdict": outcome.verdict,
                "score": outcome.score,
            }))?;
        }
        Commands::Submit {
            name,
            branch,
            email,
            subject,
            file,
        } => {
            let service = open_service(&config, load_classifier(&config)?).await?;
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let owner = SubmissionFields {
                name,
                branch,
                email,
                subject,
            };

            let receipt = service
                .submit(owner, Some(UploadedFile::new(file_name(&file)?, data)))
                .await?;
            print_json(&serde_json::json!({
                "index": receipt.index,
                "record": receipt.record,
                "verdict": receipt.outcome.verdict,
                "score": receipt.outcome.score,
            }))?;
        }
    }

    Ok(())
}
