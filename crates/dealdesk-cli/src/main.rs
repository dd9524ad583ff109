//! Dealdesk CLI - a command line client for the deal-pipeline API.
//!
//! Set DEALDESK_API_TOKEN and DEALDESK_API_URL (or API_URL). Uses bearer
//! auth; set DEALDESK_TENANT_ID to scope requests to a tenant.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use dealdesk_api_client::{api::upload_documents_path, ApiClient};
use dealdesk_cli::{format_bytes, init_tracing, read_selected_files};
use dealdesk_core::{
    models::{ProspectFilter, ProspectKind},
    Notifier, TracingNotifier,
};
use dealdesk_upload::{render, PhaseView, UploadSession, UploadTarget};

#[derive(Parser)]
#[command(name = "dealdesk", about = "Deal-pipeline API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more documents with live progress
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Destination folder UUID
        #[arg(long)]
        folder: Option<Uuid>,
    },
    /// Folder operations
    Folder {
        #[command(subcommand)]
        sub: FolderCommands,
    },
    /// Document operations
    Documents {
        #[command(subcommand)]
        sub: DocumentCommands,
    },
    /// Prospect listings
    Prospects {
        #[command(subcommand)]
        sub: ProspectCommands,
    },
    /// Dropdown data sources
    Lookups {
        #[command(subcommand)]
        sub: LookupCommands,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder UUID
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// List folders under a parent (root level when omitted)
    List {
        /// Parent folder UUID
        #[arg(long)]
        parent: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// List documents with pagination and optional folder filter
    List {
        /// Maximum number of items
        #[arg(long, default_value = "20")]
        limit: i64,
        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: i64,
        /// Folder UUID
        #[arg(long)]
        folder: Option<Uuid>,
    },
    /// Delete a document by ID
    Delete {
        /// Document UUID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum ProspectCommands {
    /// List prospects of one kind with optional filters
    List {
        /// seller, buyer, partner, or employee
        kind: ProspectKind,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Industry filter
        #[arg(long)]
        industry: Option<String>,
        /// Currency filter
        #[arg(long)]
        currency: Option<String>,
        /// Page number
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        per_page: Option<u32>,
    },
}

#[derive(Subcommand)]
enum LookupCommands {
    /// List industry options
    Industries,
    /// List currency options
    Currencies,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn run_upload(
    client: &ApiClient,
    notifier: Arc<dyn Notifier>,
    paths: Vec<PathBuf>,
    folder: Option<Uuid>,
) -> anyhow::Result<()> {
    let selected = read_selected_files(&paths)?;

    let mut target = UploadTarget::new(upload_documents_path());
    if let Some(folder_id) = folder {
        target = target.with_folder(folder_id);
    }
    let session = UploadSession::new(Arc::new(client.upload_transport()), notifier, target);
    let mut rx = session.subscribe();

    session.select_files(selected);
    if let PhaseView::Selected { files, total_bytes } = render(&session.snapshot()) {
        println!(
            "Uploading {} file(s), {}:",
            files.len(),
            format_bytes(total_bytes)
        );
        for file in &files {
            println!("  {} ({})", file.name, format_bytes(file.size));
        }
    }

    if !session.start_upload() {
        anyhow::bail!("No files to upload");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                println!("Upload cancelled");
                return Ok(());
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = rx.borrow_and_update().clone();
                match render(&snapshot) {
                    PhaseView::Uploading { percent } => println!("  {}%", percent),
                    PhaseView::Succeeded { message } => {
                        session.done();
                        print_json(&serde_json::json!({ "success": true, "message": message }))?;
                        return Ok(());
                    }
                    PhaseView::Failed { error } => {
                        session.done();
                        anyhow::bail!("Upload failed: {}", error);
                    }
                    _ => {}
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let client = ApiClient::from_env(notifier.clone()).context(
        "Failed to create API client. Set DEALDESK_API_TOKEN and DEALDESK_API_URL (or API_URL)",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { files, folder } => {
            run_upload(&client, notifier, files, folder).await?;
        }
        Commands::Folder { sub } => match sub {
            FolderCommands::Create { name, parent } => {
                let response = client.create_folder(&name, parent).await?;
                print_json(&response)?;
            }
            FolderCommands::List { parent } => {
                let response = client.list_folders(parent).await?;
                print_json(&response)?;
            }
        },
        Commands::Documents { sub } => match sub {
            DocumentCommands::List {
                limit,
                offset,
                folder,
            } => {
                let response = client.list_documents(limit, offset, folder).await?;
                print_json(&response)?;
            }
            DocumentCommands::Delete { id } => {
                client.delete_document(id).await?;
                print_json(
                    &serde_json::json!({ "success": true, "message": format!("Document {} deleted", id) }),
                )?;
            }
        },
        Commands::Prospects { sub } => match sub {
            ProspectCommands::List {
                kind,
                search,
                industry,
                currency,
                page,
                per_page,
            } => {
                let filter = ProspectFilter {
                    search,
                    industry,
                    currency,
                    page,
                    per_page,
                };
                let response = client.list_prospects(kind, &filter).await?;
                print_json(&response)?;
            }
        },
        Commands::Lookups { sub } => match sub {
            LookupCommands::Industries => {
                let response = client.list_industries().await?;
                print_json(&response)?;
            }
            LookupCommands::Currencies => {
                let response = client.list_currencies().await?;
                print_json(&response)?;
            }
        },
    }

    Ok(())
}
