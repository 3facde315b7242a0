use clap::Parser;
use deepchat_core::{PromptTemplate, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "deepchat")]
#[command(about = "Chat with DeepSeek-R1 on Azure AI, with rolling conversation history")]
#[command(version)]
pub struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Instruction template (general, coding)
    #[arg(short, long)]
    pub template: Option<PromptTemplate>,

    /// Endpoint URL, without /v1/chat/completions
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Deployment name to send with each request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Where to keep the conversation history
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Number of past exchanges to keep
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Keep history in memory only
    #[arg(long)]
    pub no_history: bool,

    /// Wait for the whole reply instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Skip the model information lookup at startup
    #[arg(long)]
    pub no_model_info: bool,

    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold
    #[arg(long)]
    pub top_p: Option<f32>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Color theme (dark, dracula, plain)
    #[arg(long, default_value = "dark")]
    pub theme: String,
}

impl Cli {
    /// Settings from the config file, with command-line flags on top.
    pub fn settings(&self) -> Settings {
        let mut settings = match self.config {
            Some(ref path) => Settings::load_from(path),
            None => Settings::load(),
        };
        self.apply(&mut settings);
        settings
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(template) = self.template {
            settings.template = template;
        }
        if let Some(ref endpoint) = self.endpoint {
            settings.llm.endpoint = Some(endpoint.clone());
        }
        if let Some(ref model) = self.model {
            settings.llm.model = Some(model.clone());
        }
        if let Some(ref path) = self.history_file {
            settings.history.path = path.clone();
        }
        if let Some(max) = self.max_history {
            settings.history.max_history = max;
        }
        if self.no_history {
            settings.history.enabled = false;
        }
        if let Some(temperature) = self.temperature {
            settings.sampling.temperature = temperature;
        }
        if let Some(top_p) = self.top_p {
            settings.sampling.top_p = top_p;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.sampling.max_tokens = max_tokens;
        }
    }
}
