//! StickGen CLI — gallery and upload client for the StickGen API.
//!
//! Set STICKGEN_API_URL plus STICKGEN_USER_ID and STICKGEN_ACCESS_TOKEN
//! (the session resolved by the auth provider).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use stickgen_api_client::ApiClient;
use stickgen_app::{
    DetailViewController, EnvSessionProvider, GalleryDataSource, SessionGate, SessionStore,
    SystemClipboard,
};
use stickgen_cli::{init_tracing, truncate_string};
use stickgen_core::models::Animation;
use stickgen_core::{ClientConfig, ClientError, ErrorMetadata};

#[derive(Parser)]
#[command(name = "stickgen", about = "StickGen gallery and upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of your gallery
    Gallery {
        /// 1-based page index
        #[arg(long, default_value = "1")]
        page: usize,
        /// Items per page (defaults to STICKGEN_PAGE_SIZE or 9)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show the detail record for one panel
    Show {
        /// Panel UUID
        id: Uuid,
    },
    /// Download one item to a local file under its original filename
    Download {
        /// Animation UUID
        id: Uuid,
        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Fetch the raw binary from the download endpoint instead of
        /// decoding the listing payload
        #[arg(long)]
        remote: bool,
    },
    /// Build the share link for one item and copy it to the clipboard
    Share {
        /// Animation UUID
        id: Uuid,
        /// Print the link without touching the clipboard
        #[arg(long)]
        no_copy: bool,
    },
    /// Upload a stick-figure image for generation
    Upload {
        /// Path to the file to upload
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Row rendered for gallery listings: everything except the payload.
fn listing_row(item: &Animation) -> serde_json::Value {
    serde_json::json!({
        "animation_id": item.animation_id,
        "filename": truncate_string(&item.filename, 40),
        "content_type": item.content_type,
        "created_at": item.created_at,
    })
}

async fn find_item(
    api: &ApiClient,
    gate: &SessionGate,
    id: Uuid,
) -> Result<Animation, ClientError> {
    let session = gate.require_session().await?;
    let collection = api
        .fetch_gallery(&session, session.user_id, None, None)
        .await?;
    collection
        .into_iter()
        .find(|item| item.animation_id == id)
        .ok_or_else(|| ClientError::InvalidInput("Cartoon panel not found".to_string()))
}

async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let api = ApiClient::new(&config)?;
    let store = Arc::new(SessionStore::new(Arc::new(EnvSessionProvider)));
    store.refresh().await;
    let gate = SessionGate::new(store);

    match cli.command {
        Commands::Gallery { page, page_size } => {
            let page_size = page_size.unwrap_or(config.page_size);
            let session = gate.require_session().await?;
            let source = GalleryDataSource::new(api, gate.clone(), page_size);
            let gallery_page = source.fetch_page(session.user_id, page).await?;

            let rows: Vec<_> = gallery_page.items.iter().map(listing_row).collect();
            print_json(&serde_json::json!({
                "page": gallery_page.page_index,
                "page_size": gallery_page.page_size,
                "total": gallery_page.total_count,
                "has_more": gallery_page.has_more,
                "items": rows,
            }))?;
        }
        Commands::Show { id } => {
            let session = gate.require_session().await?;
            let panel = api.get_panel(&session, session.user_id, id).await?;
            print_json(&panel)?;
        }
        Commands::Download {
            id,
            out_dir,
            remote,
        } => {
            let item = find_item(&api, &gate, id).await?;

            let path = if remote {
                let session = gate.require_session().await?;
                let bytes = api
                    .download_animation(&session, session.user_id, id)
                    .await?;
                let target = out_dir.join(&item.filename);
                std::fs::write(&target, &bytes)
                    .with_context(|| format!("Write {}", target.display()))?;
                target
            } else {
                let mut controller = DetailViewController::new();
                controller.open(item);
                controller.download_to(&out_dir)?
            };

            print_json(&serde_json::json!({ "saved": path }))?;
        }
        Commands::Share { id, no_copy } => {
            let item = find_item(&api, &gate, id).await?;
            let url = stickgen_app::build_share_url(
                &config.app_origin,
                item.user_id,
                item.animation_id,
            );
            let mut controller = DetailViewController::new();
            controller.open(item);

            if no_copy {
                print_json(&serde_json::json!({ "share_url": url, "copied": false }))?;
            } else {
                // Clipboard failure is independent of link construction;
                // report both outcomes.
                match SystemClipboard::new() {
                    Ok(mut clipboard) => {
                        let url = controller.share(&config.app_origin, &mut clipboard)?;
                        print_json(&serde_json::json!({ "share_url": url, "copied": true }))?;
                    }
                    Err(err) => {
                        print_json(&serde_json::json!({
                            "share_url": url,
                            "copied": false,
                            "error": err.client_message(),
                        }))?;
                    }
                }
            }
        }
        Commands::Upload { file } => {
            let session = gate.require_session().await?;
            let mut pipeline = stickgen_app::UploadPipeline::new(api);
            pipeline.select_file(&file).await?;
            let response = pipeline.submit(Some(&session)).await?;
            print_json(&response)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let login_url = SessionGate::login_url(&config.app_origin);
    let cli = Cli::parse();

    match run(cli, config).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<ClientError>() {
            // Fail closed: no protected operation ran; send the user to
            // the login entry point.
            Some(ClientError::AuthMissing) => {
                eprintln!("Not logged in. Please sign in at {}", login_url);
                std::process::exit(1);
            }
            Some(client_err) => {
                eprintln!("{}", client_err.client_message());
                tracing::debug!("{}", client_err.detailed_message());
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}
