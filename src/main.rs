use colored::*;

#[tokio::main]
async fn main() {
    if let Err(e) = ebay_draft_bot::run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
