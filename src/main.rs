use clap::Parser;
use dotenv::dotenv;
use std::env;
use tasks_client::app::AppContext;
use tasks_client::cli::repl::{self, Shell};
use tasks_client::{app_env, gateway, logging};
use tracing::info;

/// Manage your tasks from the terminal
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Base URL of the task backend
    #[arg(long, env = app_env::API_URL, default_value = "http://localhost:8000")]
    api_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    let cli = Cli::parse();

    let env_filter = logging::init_env_filter()?;
    let otel_exporter = match env::var(app_env::OTEL_SPAN_EXPORT_URL) {
        Ok(url) => Some(logging::init_exporter(&url)?),
        Err(_) => None,
    };
    logging::setup_logging_and_tracing(env_filter, otel_exporter.as_ref());

    info!(api_url = %cli.api_url, "starting task client");
    let ext_cxn = gateway::ExternalConnectivity::new(&cli.api_url)?;
    let mut shell = Shell::new(AppContext::new(ext_cxn));

    println!("Type `help` to see what you can do.");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    logging::flush_spans_after(
        otel_exporter,
        repl::run(&mut shell, stdin, tokio::io::stdout()),
    )
    .await?;

    Ok(())
}
