use clap::Parser;

use crate::api_connection::endpoints::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
use crate::config::API_KEY_ENV_VAR;

#[derive(Parser, Debug)]
#[command(author, version, about = "Look up calories and macronutrients for any food", long_about = None)]
pub struct Cli {
    /// Food to analyze; starts an interactive prompt when omitted
    #[arg(short, long)]
    pub query: Option<String>,

    /// Gemini model used for the analysis
    #[arg(short, long, default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    /// Environment variable holding the Gemini API key
    #[arg(long, default_value = API_KEY_ENV_VAR)]
    pub api_key_env: String,

    /// Base URL of the Gemini API
    #[arg(long, default_value = GEMINI_BASE_URL)]
    pub base_url: String,

    /// Print the record as JSON instead of the text view
    #[arg(long)]
    pub json: bool,

    /// List known models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
