use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "data-cli")]
#[command(about = "Client for the resource server data endpoints", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:10000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value and print its id
    Set {
        /// Value to store
        data: String,
    },
    /// Fetch a stored value by id
    Get {
        /// Record id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Set { data } => {
            client
                .post(format!("{}/set_data", cli.url))
                .json(&serde_json::json!({ "data": data }))
                .send()
                .await?
        }
        Commands::Get { id } => {
            client
                .get(format!("{}/get_data", cli.url))
                .query(&[("id", id)])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", render_body(&text));
            }
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Pretty-print JSON bodies, pass anything else through.
fn render_body(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| text.to_string())
}
