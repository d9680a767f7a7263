use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use intentbot::{ChatEngine, CsvInteractionRecorder, EngineConfig, Feedback, Session};

#[derive(Debug, Parser)]
#[command(name = "intentbot", about = "Intent-classifying chatbot")]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    corpus: Option<PathBuf>,

    #[arg(long)]
    chat_log: Option<PathBuf>,

    #[arg(long)]
    feedback_log: Option<PathBuf>,

    /// Fix response selection for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a conversation (default).
    Chat,
    /// Print the conversation log.
    History,
    /// Print the feedback log.
    Feedback,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(p) = &self.corpus {
            config.corpus_path = p.clone();
        }
        if let Some(p) = &self.chat_log {
            config.chat_log_path = p.clone();
        }
        if let Some(p) = &self.feedback_log {
            config.feedback_log_path = p.clone();
        }
        if self.seed.is_some() {
            config.response_seed = self.seed;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the conversation.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("intentbot=info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let config = cli.engine_config()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(config).await,
        Command::History => print_history(&config),
        Command::Feedback => print_feedback(&config),
    }
}

async fn chat(config: EngineConfig) -> Result<()> {
    tracing::info!("Training intent model...");
    // Fitting is CPU-bound; nothing is served until it completes.
    let engine = tokio::task::spawn_blocking(move || ChatEngine::bootstrap(config))
        .await
        .context("model training task panicked")?
        .context("engine startup failed")?;
    let engine = Arc::new(engine);

    let mut session = Session::new(engine.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Welcome to the chatbot. Please type a message and press Enter to start the conversation.");

    loop {
        prompt("You: ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let Some(outcome) = session.turn(&line) else {
            continue;
        };
        println!("Chatbot: {}", outcome.reply.text);

        if outcome.reply.ends_conversation {
            println!("{}", engine.config().farewell_message);
            break;
        }

        if let Some(feedback) = ask_feedback(&mut lines).await? {
            session.feedback(&outcome, feedback);
        }
    }

    let summary = session.finish();
    tracing::debug!(?summary, "Chat ended");
    Ok(())
}

async fn ask_feedback(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<Feedback>> {
    prompt("How was my response? [good/neutral/bad, Enter to skip]: ")?;
    let Some(answer) = lines.next_line().await? else {
        return Ok(None);
    };
    Ok(answer.parse::<Feedback>().ok())
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}

fn print_history(config: &EngineConfig) -> Result<()> {
    let recorder = CsvInteractionRecorder::unopened(&config.chat_log_path, &config.feedback_log_path);
    println!("Conversation History");
    for record in recorder.read_turns().context("reading conversation log")? {
        println!("User: {}", record.user_input);
        println!("Chatbot: {}", record.response);
        println!("Timestamp: {}", record.timestamp);
        println!("---");
    }
    Ok(())
}

fn print_feedback(config: &EngineConfig) -> Result<()> {
    let recorder = CsvInteractionRecorder::unopened(&config.chat_log_path, &config.feedback_log_path);
    println!("Feedback History");
    for record in recorder.read_feedback().context("reading feedback log")? {
        println!("User: {}", record.user_input);
        println!("Chatbot: {}", record.response);
        println!("Feedback: {}", record.feedback);
        println!("Timestamp: {}", record.timestamp);
        println!("---");
    }
    Ok(())
}
