//! Interactive session: each command maps onto one form action

use anyhow::{anyhow, bail, Result};
use modellab_client::{BackendClient, Orchestrator};
use modellab_core::{
    catalog, find_suggestion, Action, FieldEdit, FormState, ModelLabConfig, ModelSelection,
    OperationMode, Task,
};
use std::io::{self, BufRead, Write};

use crate::print_outcome;

pub async fn run(config: &ModelLabConfig) -> Result<()> {
    let client = BackendClient::new(&config.backend.base_url);
    let mut orch = Orchestrator::with_state(client, FormState::from_defaults(&config.defaults));

    display_welcome(&config.backend.base_url);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("[{}] > ", orch.state().operation_mode);
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "help" | "h" | "?" => display_help(),
            "tasks" => crate::cmd_tasks(),
            "models" => match orch.state().task {
                Some(task) => crate::cmd_models(task),
                None => println!("Select a task first (`task <id>`)."),
            },
            "show" => show_state(orch.state()),
            "submit" | "s" => {
                if orch.state().operation_mode.uses_model()
                    && orch.state().effective_model_name().is_empty()
                {
                    println!("Hint: pick a model with `model <id>` or `custom <name>`.");
                }
                let outcome = orch.submit().await;
                print_outcome(outcome);
            }
            "clear" | "cls" => {
                print!("\x1B[2J\x1B[1;1H");
                stdout.flush()?;
            }
            "exit" | "quit" | "q" => break,
            _ => match parse_command(&cmd, rest, orch.state()) {
                Ok(actions) => {
                    for action in actions {
                        orch.dispatch(action);
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
        }
    }

    Ok(())
}

/// Parse a form-editing command into the actions it stands for.
fn parse_command(cmd: &str, rest: &str, state: &FormState) -> Result<Vec<Action>> {
    match cmd {
        "mode" | "m" => {
            let mode: OperationMode = rest.parse()?;
            Ok(vec![Action::SetMode(mode)])
        }
        "task" | "t" => {
            let task = match rest {
                "" | "none" => None,
                id => Some(id.parse::<Task>()?),
            };
            Ok(vec![Action::SetTask(task)])
        }
        "model" => {
            let task = state
                .task
                .ok_or_else(|| anyhow!("Select a task first (`task <id>`)."))?;
            let choice = resolve_choice(task, rest)?;
            if let ModelSelection::Catalog(id) = &choice {
                if find_suggestion(task, id).is_none() {
                    bail!(
                        "'{}' is not a suggested model for {}; use `custom {}` instead",
                        id,
                        task,
                        id
                    );
                }
            }
            Ok(vec![Action::SelectModel(choice)])
        }
        "custom" => Ok(vec![
            Action::SelectModel(ModelSelection::Custom),
            Action::SetCustomModelName(rest.to_string()),
        ]),
        "lora" => match rest {
            "on" => Ok(vec![Action::Edit(FieldEdit::UseLora(true))]),
            "off" => Ok(vec![Action::Edit(FieldEdit::UseLora(false))]),
            _ => bail!("Usage: lora on|off"),
        },
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                bail!("Usage: set <field> <value>");
            }
            Ok(vec![Action::Edit(parse_edit(field, value.trim())?)])
        }
        _ => bail!("Unknown command: {}. Type 'help' for available commands.", cmd),
    }
}

/// Accept a 1-based catalog index as well as an ID or `custom`.
fn resolve_choice(task: Task, raw: &str) -> Result<ModelSelection> {
    if let Ok(index) = raw.parse::<usize>() {
        let models = catalog(task);
        if index == 0 || index > models.len() {
            bail!("Invalid model index: {}. Use 1-{}", index, models.len());
        }
        return Ok(ModelSelection::Catalog(models[index - 1].id.to_string()));
    }
    Ok(ModelSelection::from_choice(raw))
}

/// Actions that point the model picker at `name`: a catalog entry when the task
/// suggests it, otherwise a custom model name.
pub fn select_model(task: Task, name: &str) -> Vec<Action> {
    let name = name.trim();
    match find_suggestion(task, name) {
        Some(m) => vec![Action::SelectModel(ModelSelection::Catalog(m.id.to_string()))],
        None => vec![
            Action::SelectModel(ModelSelection::Custom),
            Action::SetCustomModelName(name.to_string()),
        ],
    }
}

fn parse_edit(field: &str, value: &str) -> Result<FieldEdit> {
    let text = || value.to_string();
    let uint = || {
        value
            .parse::<u32>()
            .map_err(|_| anyhow!("{} must be a non-negative integer", field))
    };

    let edit = match field {
        "input" | "input_text" | "question" => FieldEdit::InputText(text()),
        "context" | "context_text" => FieldEdit::ContextText(text()),
        "max_length" | "num_beams" => FieldEdit::GenerationArg(
            field.to_string(),
            value
                .parse()
                .map_err(|_| anyhow!("{} must be an integer", field))?,
        ),
        "quantization" => FieldEdit::Quantization(value.parse()?),
        "dataset" | "dataset_path" => FieldEdit::DatasetPath(text()),
        "text_column" => FieldEdit::TextColumn(text()),
        "label_column" => FieldEdit::LabelColumn(text()),
        "context_column" => FieldEdit::ContextColumn(text()),
        "epochs" => FieldEdit::Epochs(uint()?),
        "batch_size" => FieldEdit::BatchSize(uint()?),
        "learning_rate" | "lr" => FieldEdit::LearningRate(text()),
        "lora_r" => FieldEdit::LoraRank(uint()?),
        "lora_alpha" => FieldEdit::LoraAlpha(uint()?),
        "lora_dropout" => FieldEdit::LoraDropout(
            value
                .parse()
                .map_err(|_| anyhow!("lora_dropout must be a number"))?,
        ),
        "lora_target_modules" => FieldEdit::LoraTargetModules(text()),
        "max_seq_length" => FieldEdit::MaxSeqLength(uint()?),
        "num_labels" => FieldEdit::NumLabels(text()),
        "text" => FieldEdit::AnomalyText(text()),
        "embedding_model" | "embedding_model_name" => FieldEdit::EmbeddingModelName(text()),
        "autoencoder_path" | "autoencoder_model_path" => FieldEdit::AutoencoderModelPath(text()),
        "embedding_dim" => FieldEdit::EmbeddingDim(text()),
        "encoding_dim" => FieldEdit::EncodingDim(text()),
        "threshold" => FieldEdit::Threshold(text()),
        _ => bail!("Unknown field: {}", field),
    };
    Ok(edit)
}

fn show_state(state: &FormState) {
    println!();
    println!("Form:");
    println!("{:-<50}", "");
    println!("  Mode:            {}", state.operation_mode.label());

    match state.operation_mode {
        OperationMode::Inference | OperationMode::Finetune => {
            let task = state.task.map(|t| t.id()).unwrap_or("-");
            let model = match state.effective_model_name() {
                "" => "-",
                name => name,
            };
            println!("  Task:            {}", task);
            println!("  Model:           {}", model);
        }
        OperationMode::Anomaly => {}
    }

    match state.operation_mode {
        OperationMode::Inference => {
            let p = &state.inference;
            println!("  Input:           {}", p.input_text);
            if state.task.is_some_and(|t| t.is_qa()) {
                println!("  Context:         {}", p.context_text);
            }
            if state.task.is_some_and(|t| t.is_generation()) {
                for (k, v) in &p.generation_args {
                    println!("  {:<17}{}", format!("{}:", k), v);
                }
            }
            println!("  Quantization:    {}", p.quantization.label());
        }
        OperationMode::Finetune => {
            let p = &state.finetune;
            println!("  Dataset:         {}", p.dataset_path);
            println!("  Columns:         text={} label={}", p.text_column, p.label_column);
            if state.task.is_some_and(|t| t.is_qa()) {
                println!("  Context column:  {}", p.context_column);
            }
            println!("  Epochs:          {}", p.epochs);
            println!("  Batch size:      {}", p.batch_size);
            println!("  Learning rate:   {}", p.learning_rate);
            println!("  Max seq length:  {}", p.max_seq_length);
            let num_labels = if p.num_labels.is_empty() {
                "-"
            } else {
                p.num_labels.as_str()
            };
            println!("  Num labels:      {}", num_labels);
            if p.use_lora {
                let l = &p.lora_config;
                println!(
                    "  LoRA:            r={} alpha={} dropout={} modules={}",
                    l.r, l.alpha, l.dropout, l.target_modules
                );
            } else {
                println!("  LoRA:            off");
            }
        }
        OperationMode::Anomaly => {
            let p = &state.anomaly;
            println!("  Text:            {}", p.text);
            println!("  Embedding model: {}", p.embedding_model_name);
            println!("  Autoencoder:     {}", p.autoencoder_model_path);
            println!(
                "  Dims:            embedding={} encoding={}",
                p.embedding_dim, p.encoding_dim
            );
            println!("  Threshold:       {}", p.threshold);
        }
    }

    println!("  Ready to submit: {}", if state.can_submit() { "yes" } else { "no" });
    println!();
}

fn display_welcome(backend: &str) {
    println!();
    println!("  Model Lab");
    println!();
    println!("  Backend: {}", backend);
    println!();
    println!("  mode <inference|finetune|anomaly>   # Switch operation mode");
    println!("  task <id>                           # Pick an NLP task (`tasks` lists them)");
    println!("  model <#|id> / custom <name>        # Pick a model");
    println!("  set <field> <value>                 # Edit a field");
    println!("  show / submit                       # Review or send the form");
    println!("  help                                # Show all command options");
    println!();
}

fn display_help() {
    println!();
    println!("Available Commands:");
    println!("  mode, m <mode>         inference, finetune or anomaly (clears model and result)");
    println!("  tasks                  List the task catalog");
    println!("  task, t <id|none>      Select a task (clears model, input and result)");
    println!("  models                 List suggested models for the current task");
    println!("  model <#|id|custom>    Select a suggested model by index or ID");
    println!("  custom <name>          Use any Hugging Face model name");
    println!("  set <field> <value>    Edit a field:");
    println!("    inference:  input, context, max_length, num_beams, quantization");
    println!("    finetune:   dataset, text_column, label_column, context_column, epochs,");
    println!("                batch_size, learning_rate, lora_r, lora_alpha, lora_dropout,");
    println!("                lora_target_modules, max_seq_length, num_labels");
    println!("    anomaly:    text, embedding_model, autoencoder_path, embedding_dim,");
    println!("                encoding_dim, threshold");
    println!("  lora on|off            Toggle LoRA for fine-tuning");
    println!("  show                   Show the current form");
    println!("  submit, s              Send the form to the backend");
    println!("  clear, cls             Clear screen");
    println!("  help, h                Show this help message");
    println!("  exit, quit, q          Leave the session");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_model_prefers_catalog() {
        let actions = select_model(Task::TextGeneration, "gpt2");
        assert_eq!(
            actions,
            vec![Action::SelectModel(ModelSelection::Catalog("gpt2".to_string()))]
        );
    }

    #[test]
    fn test_select_model_falls_back_to_custom() {
        let actions = select_model(Task::Summarization, " facebook/bart-large-cnn ");
        assert_eq!(
            actions,
            vec![
                Action::SelectModel(ModelSelection::Custom),
                Action::SetCustomModelName("facebook/bart-large-cnn".to_string()),
            ]
        );
    }

    #[test]
    fn test_model_by_index() {
        let mut state = FormState::new();
        state.apply(Action::SetTask(Some(Task::TextGeneration)));
        let actions = parse_command("model", "2", &state).unwrap();
        assert_eq!(
            actions,
            vec![Action::SelectModel(ModelSelection::Catalog("distilgpt2".to_string()))]
        );
        assert!(parse_command("model", "9", &state).is_err());
    }

    #[test]
    fn test_model_outside_catalog_rejected() {
        let mut state = FormState::new();
        state.apply(Action::SetTask(Some(Task::TextGeneration)));
        assert!(parse_command("model", "bert-base-uncased", &state).is_err());
        assert!(parse_command("model", "custom", &state).is_ok());
    }

    #[test]
    fn test_model_requires_task() {
        assert!(parse_command("model", "gpt2", &FormState::new()).is_err());
    }

    #[test]
    fn test_set_parses_typed_fields() {
        assert_eq!(parse_edit("epochs", "5").unwrap(), FieldEdit::Epochs(5));
        assert_eq!(
            parse_edit("max_length", "120").unwrap(),
            FieldEdit::GenerationArg("max_length".to_string(), 120)
        );
        assert!(parse_edit("epochs", "five").is_err());
        assert!(parse_edit("colour", "red").is_err());
    }

    #[test]
    fn test_set_keeps_numeric_text_fields_raw() {
        assert_eq!(
            parse_edit("learning_rate", "abc").unwrap(),
            FieldEdit::LearningRate("abc".to_string())
        );
        assert_eq!(
            parse_edit("threshold", "0.1").unwrap(),
            FieldEdit::Threshold("0.1".to_string())
        );
    }

    #[test]
    fn test_set_value_may_contain_spaces() {
        let actions = parse_command("set", "input I loved this film", &FormState::new()).unwrap();
        assert_eq!(
            actions,
            vec![Action::Edit(FieldEdit::InputText("I loved this film".to_string()))]
        );
    }
}
