use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the edge gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:10261")]
    url: String,

    /// Skip TLS verification (self-issued serving certificates).
    #[arg(short, long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness
    Health,
    /// Show gateway diagnostic status
    Status,
    /// Update the bootstrap join token
    UpdateToken { token: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/v1/healthz", cli.url)).send().await?;
            println!("{} {}", res.status(), res.text().await?);
        }
        Commands::Status => {
            let res = client.get(format!("{}/debug/status", cli.url)).send().await?;
            let body: serde_json::Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::UpdateToken { token } => {
            let res = client
                .post(format!("{}/v1/token", cli.url))
                .json(&serde_json::json!({ "jointoken": token }))
                .send()
                .await?;
            if res.status().is_success() {
                println!("join token updated");
            } else {
                eprintln!("update failed: {}", res.status());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
