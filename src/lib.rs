use anyhow::{anyhow, Result};
use colored::*;
use dotenvy::dotenv;
use std::path::PathBuf;

pub mod config;
pub mod ebay;
pub mod gemini;
pub mod models;
pub mod utils;

use ebay::{AuthClient, ListingClient};
use gemini::GeminiClient;

// Re-exports for library consumers: common useful types
pub use config::Config;
pub use ebay::Environment;
pub use models::{DraftListing, GeneratedContent};

/// Run the tool: load `.env` and config, generate listing content from the
/// photos given on the command line, and create an eBay draft listing.
pub async fn run() -> Result<()> {
    // Load environment variables from .env
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(anyhow!(
            "usage: {} <photo1> [photo2] [photo3] ...",
            args.first().map(String::as_str).unwrap_or("ebay-draft-bot")
        ));
    }

    let photo_paths: Vec<PathBuf> = args[1..].iter().map(PathBuf::from).collect();
    for path in &photo_paths {
        if !path.exists() {
            return Err(anyhow!("photo not found: {}", path.display()));
        }
    }

    println!("Processing {} photo(s)...", photo_paths.len());

    let config = Config::load()?;

    println!("{}", "Generating listing content with Gemini...".cyan());
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.prompt.clone());
    let content = gemini.generate_listing_content(&photo_paths).await?;

    println!("\n{}", "=== Generated Content ===".bold());
    println!("Title: {}", content.title);
    println!("Description:\n{}", content.description);
    println!("{}\n", "=========================".bold());

    println!("{}", "Creating draft listing on eBay...".cyan());
    let auth = AuthClient::new(
        config.ebay_client_id.clone(),
        config.ebay_client_secret.clone(),
        config.ebay_refresh_token.clone(),
        config.environment,
    );

    let listing_client = ListingClient::new(auth);

    let draft = DraftListing {
        title: content.title,
        description: content.description,
        photo_paths,
    };

    let offer_id = listing_client.create_draft_listing(&draft).await?;

    println!("\n{}", "✓ Draft listing created successfully!".green().bold());
    println!("Offer ID: {offer_id}");
    println!("Environment: {}", config.environment.display_name());

    Ok(())
}
