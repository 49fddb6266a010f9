use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use bemfa_sync::sync;
use bemfa_sync::Attributes;
use bemfa_sync::Config;
use bemfa_sync::EntityState;
use bemfa_sync::LogLevel;
use bemfa_sync::Message;
use bemfa_sync::TopicSuffix;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::prelude::*;

/// Config file picked up from the working directory when `--config` is not given
const DEFAULT_CONFIG_PATH: &str = "bemfa-sync.toml";

#[derive(Debug, Parser)]
#[command(
    name = "bemfa-sync",
    version,
    about = "Translate between host entity state and bemfa messages"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level or lower
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode an entity state snapshot into the message to publish
    Encode {
        /// JSON state object `{"entity_id", "state", "attributes"}`, or `-` for stdin
        #[arg(long)]
        state_file: PathBuf,
    },

    /// Decode a received message into a service call
    Decode {
        #[arg(long)]
        entity_id: String,

        /// Message payload, e.g. `on#50#3000`
        #[arg(long)]
        payload: String,

        /// Current attributes of the entity as a JSON object
        #[arg(long)]
        attributes: Option<String>,

        /// Topic the payload arrived on, checked against the entity's device class
        #[arg(long)]
        topic: Option<String>,
    },
}

/// Outbound message for the transport to publish
#[derive(Debug, Serialize)]
struct Publish {
    topic: String,
    payload: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let floor = cli.verbose.then_some(LogLevel::Debug);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.logging.targets(floor))
        .init();

    match cli.command {
        Command::Encode { state_file } => encode(&config, &state_file),
        Command::Decode {
            entity_id,
            payload,
            attributes,
            topic,
        } => decode(&entity_id, &payload, attributes.as_deref(), topic.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH)),
        None => Ok(Config::default()),
    }
}

fn encode(config: &Config, state_file: &Path) -> anyhow::Result<()> {
    let contents = if state_file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read state from stdin")?;
        buf
    } else {
        std::fs::read_to_string(state_file)
            .with_context(|| format!("Failed to read state file {}", state_file.display()))?
    };

    let state: EntityState =
        serde_json::from_str(&contents).context("Failed to parse entity state")?;

    let adapter = sync::lookup_for_entity(&state.entity_id)?;
    let topic = config.topic_for(&state.entity_id, adapter.topic_suffix())?;
    let msg = adapter
        .generate_msg(&state)
        .with_context(|| format!("Failed to encode {}", state.entity_id))?;

    info!("Encoded {} for topic {}", state.entity_id, topic);

    let publish = Publish {
        topic,
        payload: msg.to_payload(),
    };
    println!("{}", serde_json::to_string_pretty(&publish)?);
    Ok(())
}

fn decode(
    entity_id: &str,
    payload: &str,
    attributes: Option<&str>,
    topic: Option<&str>,
) -> anyhow::Result<()> {
    let adapter = sync::lookup_for_entity(entity_id)?;

    if let Some(topic) = topic {
        match TopicSuffix::from_topic(topic) {
            Some(suffix) if suffix == adapter.topic_suffix() => {
                debug!("Topic {} matches {} adapter", topic, adapter.domain())
            }
            _ => warn!(
                "Topic {} is not a {} topic (expected suffix {})",
                topic,
                adapter.domain(),
                adapter.topic_suffix()
            ),
        }
    }

    let attributes: Attributes = match attributes {
        Some(json) => serde_json::from_str(json).context("Failed to parse attributes")?,
        None => Attributes::default(),
    };

    let msg = Message::parse(payload);
    let call = adapter
        .resolve_msg(&msg, &attributes)
        .with_context(|| format!("Failed to decode {:?} for {}", payload, entity_id))?;

    info!("Decoded {:?} to {}.{}", payload, call.domain, call.service);
    println!("{}", serde_json::to_string_pretty(&call)?);
    Ok(())
}
