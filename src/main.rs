use anyhow::{Context, Result};
use nutriscan::analysis_client::{GeminiAnalysisClient, NutritionAnalyzer};
use nutriscan::app::{App, AppState};
use nutriscan::cli::{parse_args, Cli};
use nutriscan::config::AnalysisConfig;
use nutriscan::render::{render_state, LOADING_TEXT};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

const PROMPT: &str = "food> ";

fn print_state(state: &AppState, as_json: bool) -> Result<()> {
    match state {
        AppState::Success(record) if as_json => {
            let json = serde_json::to_string_pretty(record)
                .context("Failed to serialize nutrition record")?;
            println!("{}", json);
        }
        _ => println!("{}", render_state(state)),
    }
    Ok(())
}

async fn lookup<A: NutritionAnalyzer>(app: &mut App, analyzer: &A, query: &str, as_json: bool) -> Result<()> {
    if query.trim().is_empty() {
        return Ok(());
    }
    eprintln!("{}", LOADING_TEXT);
    let state = app.run_query(analyzer, query).await;
    print_state(state, as_json)
}

async fn interactive(app: &mut App, analyzer: &impl NutritionAnalyzer, as_json: bool) -> Result<()> {
    println!("{}", render_state(app.state()));
    println!("e.g., Avocado Toast, Grilled Salmon, Large Pizza Slice... (Ctrl-D to quit)");

    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        lookup(app, analyzer, &line, as_json).await?;
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = parse_args();
    nutriscan::logging::init(cli.verbose);

    let config = AnalysisConfig::from_env(&cli.api_key_env)
        .with_model(cli.model.clone())
        .with_base_url(cli.base_url.clone());
    let client = GeminiAnalysisClient::new(config);

    if cli.list_models {
        for model in client.provider().get_available_models() {
            println!("{:<20} {}", model.model_name, model.description);
        }
        return Ok(());
    }
    tracing::info!(model = client.model(), "nutriscan ready");

    let mut app = App::new();
    match cli.query.as_deref() {
        Some(query) => {
            lookup(&mut app, &client, query, cli.json).await?;
            if matches!(app.state(), AppState::Failure(_)) {
                std::process::exit(1);
            }
        }
        None => interactive(&mut app, &client, cli.json).await?,
    }

    Ok(())
}
