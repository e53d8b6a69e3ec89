use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "bender-cli")]
#[command(about = "Operator CLI for the Bender site frontend", long_about = None)]
struct Cli {
    /// Base URL of a running bender-web instance.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Gateway path segment.
    #[arg(long, default_value = "api_proxy")]
    gateway: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the frontend is up
    Health,
    /// List skins known to the backend
    Skins,
    /// Show the backend API version
    Version,
    /// Send an arbitrary call through the gateway
    Call {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,
        /// Backend endpoint, e.g. `articles/7`
        endpoint: String,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let gateway = |endpoint: &str| format!("{}/{}/{}", base, cli.gateway, endpoint);

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/healthz", base)).send().await?,
        Commands::Skins => client.get(gateway("skins")).send().await?,
        Commands::Version => client.get(gateway("admin/version")).send().await?,
        Commands::Call {
            method,
            endpoint,
            data,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut request = client.request(method, gateway(endpoint.trim_matches('/')));
            if let Some(data) = data {
                let body: Value = serde_json::from_str(&data)?;
                request = request.json(&body);
            }
            request.send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
