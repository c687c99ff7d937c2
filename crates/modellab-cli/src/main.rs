mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modellab_client::{BackendClient, Orchestrator};
use modellab_core::{
    catalog, Action, FieldEdit, FormState, ModelLabConfig, OperationMode, Quantization,
    RequestOutcome, Task, BACKEND_URL_ENV,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modellab")]
#[command(about = "Model Lab - NLP inference, fine-tuning and anomaly requests", long_about = None)]
struct Cli {
    /// Backend base URL (overrides the config file and MODELLAB_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the NLP task catalog
    Tasks,

    /// List suggested models for a task
    Models {
        /// Task ID (e.g. text-generation)
        task: String,
    },

    /// Run inference
    Infer {
        /// Task ID
        #[arg(short, long)]
        task: String,

        /// Catalog model ID or any Hugging Face model name
        #[arg(short, long)]
        model: String,

        /// Input text (the question for question-answering)
        #[arg(short, long)]
        input: String,

        /// Context passage for question-answering
        #[arg(short, long)]
        context: Option<String>,

        /// Quantization option (none, dynamic_int8_cpu)
        #[arg(short, long, default_value = "none")]
        quantization: String,

        /// Max length for text generation
        #[arg(long)]
        max_length: Option<i64>,

        /// Beam count for text generation
        #[arg(long)]
        num_beams: Option<i64>,
    },

    /// Start a fine-tuning job
    Finetune {
        /// Task ID
        #[arg(short, long)]
        task: String,

        /// Catalog model ID or any Hugging Face model name
        #[arg(short, long)]
        model: String,

        /// Dataset name or path, as understood by the backend
        #[arg(short, long)]
        dataset: String,

        #[arg(long, default_value = "text")]
        text_column: String,

        #[arg(long, default_value = "label")]
        label_column: String,

        /// Only sent for question-answering
        #[arg(long, default_value = "context")]
        context_column: String,

        #[arg(short, long, default_value = "3")]
        epochs: u32,

        #[arg(short, long, default_value = "8")]
        batch_size: u32,

        /// Learning rate (e.g. 2e-5)
        #[arg(long, default_value = "2e-5")]
        learning_rate: String,

        /// Disable LoRA
        #[arg(long)]
        no_lora: bool,

        #[arg(long, default_value = "8")]
        lora_r: u32,

        #[arg(long, default_value = "16")]
        lora_alpha: u32,

        #[arg(long, default_value = "0.05")]
        lora_dropout: f64,

        /// Comma-separated module names
        #[arg(long, default_value = "q_proj,v_proj")]
        lora_target_modules: String,

        #[arg(long, default_value = "384")]
        max_seq_length: u32,

        /// Number of labels (omit to let the backend decide)
        #[arg(long)]
        num_labels: Option<String>,
    },

    /// Score a text with the anomaly detector
    Anomaly {
        /// Text to analyze
        #[arg(long)]
        text: String,

        #[arg(long, default_value = "sentence-transformers/all-MiniLM-L6-v2")]
        embedding_model: String,

        /// Autoencoder weights, relative to the backend host
        #[arg(long, default_value = "./saved_autoencoder.pth")]
        autoencoder_path: String,

        #[arg(long, default_value = "384")]
        embedding_dim: String,

        #[arg(long, default_value = "64")]
        encoding_dim: String,

        #[arg(long, default_value = "0.1")]
        threshold: String,
    },

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Tasks) => cmd_tasks(),
        Some(Commands::Models { task }) => cmd_models(task.parse()?),
        Some(Commands::Config) => cmd_config(&config)?,
        Some(
            command @ (Commands::Infer { .. }
            | Commands::Finetune { .. }
            | Commands::Anomaly { .. }),
        ) => {
            let state = form_for(command, &config)?;
            cmd_submit(&config, state).await?
        }
        None => session::run(&config).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ModelLabConfig> {
    let env_url = std::env::var(BACKEND_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let config = ModelLabConfig::resolve(cli.config.as_deref(), env_url, cli.backend_url.clone())?;
    tracing::debug!("Backend: {}", config.backend.base_url);
    Ok(config)
}

/// Translate a one-shot subcommand into the same actions the interactive session dispatches.
fn form_for(command: Commands, config: &ModelLabConfig) -> Result<FormState> {
    let mut state = FormState::from_defaults(&config.defaults);

    match command {
        Commands::Infer {
            task,
            model,
            input,
            context,
            quantization,
            max_length,
            num_beams,
        } => {
            let task: Task = task.parse()?;
            let quantization: Quantization = quantization.parse()?;
            state.apply(Action::SetMode(OperationMode::Inference));
            state.apply(Action::SetTask(Some(task)));
            for action in session::select_model(task, &model) {
                state.apply(action);
            }
            state.apply(Action::Edit(FieldEdit::InputText(input)));
            if let Some(context) = context {
                state.apply(Action::Edit(FieldEdit::ContextText(context)));
            }
            state.apply(Action::Edit(FieldEdit::Quantization(quantization)));
            if let Some(v) = max_length {
                state.apply(Action::Edit(FieldEdit::GenerationArg("max_length".to_string(), v)));
            }
            if let Some(v) = num_beams {
                state.apply(Action::Edit(FieldEdit::GenerationArg("num_beams".to_string(), v)));
            }
        }
        Commands::Finetune {
            task,
            model,
            dataset,
            text_column,
            label_column,
            context_column,
            epochs,
            batch_size,
            learning_rate,
            no_lora,
            lora_r,
            lora_alpha,
            lora_dropout,
            lora_target_modules,
            max_seq_length,
            num_labels,
        } => {
            let task: Task = task.parse()?;
            state.apply(Action::SetMode(OperationMode::Finetune));
            state.apply(Action::SetTask(Some(task)));
            for action in session::select_model(task, &model) {
                state.apply(action);
            }
            let edits = [
                FieldEdit::DatasetPath(dataset),
                FieldEdit::TextColumn(text_column),
                FieldEdit::LabelColumn(label_column),
                FieldEdit::ContextColumn(context_column),
                FieldEdit::Epochs(epochs),
                FieldEdit::BatchSize(batch_size),
                FieldEdit::LearningRate(learning_rate),
                FieldEdit::UseLora(!no_lora),
                FieldEdit::LoraRank(lora_r),
                FieldEdit::LoraAlpha(lora_alpha),
                FieldEdit::LoraDropout(lora_dropout),
                FieldEdit::LoraTargetModules(lora_target_modules),
                FieldEdit::MaxSeqLength(max_seq_length),
                FieldEdit::NumLabels(num_labels.unwrap_or_default()),
            ];
            for edit in edits {
                state.apply(Action::Edit(edit));
            }
        }
        Commands::Anomaly {
            text,
            embedding_model,
            autoencoder_path,
            embedding_dim,
            encoding_dim,
            threshold,
        } => {
            state.apply(Action::SetMode(OperationMode::Anomaly));
            let edits = [
                FieldEdit::AnomalyText(text),
                FieldEdit::EmbeddingModelName(embedding_model),
                FieldEdit::AutoencoderModelPath(autoencoder_path),
                FieldEdit::EmbeddingDim(embedding_dim),
                FieldEdit::EncodingDim(encoding_dim),
                FieldEdit::Threshold(threshold),
            ];
            for edit in edits {
                state.apply(Action::Edit(edit));
            }
        }
        Commands::Tasks | Commands::Models { .. } | Commands::Config => {
            anyhow::bail!("not a submit command")
        }
    }

    Ok(state)
}

async fn cmd_submit(config: &ModelLabConfig, state: FormState) -> Result<()> {
    let client = BackendClient::new(&config.backend.base_url);
    let mut orch = Orchestrator::with_state(client, state);

    println!();
    println!("Submitting to {}...", config.backend.base_url);

    let outcome = orch.submit().await;
    if let Some(err) = outcome.error() {
        anyhow::bail!("{}", err);
    }
    print_outcome(outcome);
    Ok(())
}

fn cmd_tasks() {
    println!();
    println!("NLP Tasks:");
    println!("{:-<65}", "");
    println!("  {:<24} {}", "ID", "Name");
    println!("{:-<65}", "");
    for task in Task::all() {
        println!("  {:<24} {}", task.id(), task.label());
    }
    println!();
}

fn cmd_models(task: Task) {
    let models = catalog(task);

    println!();
    println!("Suggested models for {}:", task.label());
    println!("{:-<80}", "");
    if models.is_empty() {
        println!("  (none - use a custom model name)");
    }
    for (i, m) in models.iter().enumerate() {
        println!("  {:<4} {:<50} {}", i + 1, m.id, m.display_name);
    }
    println!();
    println!("  Any other Hugging Face model name is accepted as a custom model.");
    println!();
}

fn cmd_config(config: &ModelLabConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

pub(crate) fn print_outcome(outcome: &RequestOutcome) {
    match outcome {
        RequestOutcome::Idle => {}
        RequestOutcome::Loading => println!("Processing your request..."),
        RequestOutcome::Success(body) => {
            println!("Results:");
            println!("{:-<40}", "");
            match serde_json::to_string_pretty(body) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", body),
            }
            println!();
        }
        RequestOutcome::Failure(message) => {
            println!("Error: {}", message);
            println!();
        }
    }
}
