use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "explorer-cli")]
#[command(about = "Query a running explorer proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy health
    Health,
    /// Look up a wallet address
    Wallet {
        address: String,
        /// Balance, contract check, recent transactions and tokens
        #[arg(long)]
        summary: bool,
    },
    /// Look up a transaction hash
    Tx {
        hash: String,
        /// Decoded values and receipt status
        #[arg(long)]
        details: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/');

    let path = match &cli.command {
        Commands::Health => "/health".to_string(),
        Commands::Wallet { address, summary: false } => format!("/api/wallet/{}", address),
        Commands::Wallet { address, summary: true } => format!("/api/wallet/{}/summary", address),
        Commands::Tx { hash, details: false } => format!("/api/transaction/{}", hash),
        Commands::Tx { hash, details: true } => format!("/api/transaction/{}/details", hash),
    };

    let res = reqwest::Client::new()
        .get(format!("{}{}", base, path))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                let code = body.get("code").and_then(Value::as_str).unwrap_or("unknown");
                let message = body.get("error").and_then(Value::as_str).unwrap_or(&text);
                eprintln!("{}: {}", code, message);
            }
            Err(_) => eprintln!("Response: {}", text),
        }
        std::process::exit(1);
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
