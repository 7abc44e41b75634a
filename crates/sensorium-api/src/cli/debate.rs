//! Two-agent debate driven by needs.
//!
//! The agents subscribe to each other. Each keeps an inbox sensor on
//! `message_sent` that holds the latest message from its peer, and each turn
//! answers that message through the LLM. The reply's
//! `purpose_introspection` feeds back into the chosen need.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use sensorium_core::{Agent, Communicator, Sensor};
use sensorium_infra::config::resolve_api_key;
use sensorium_infra::llm::{ChatClient, LlmCommunicator};
use sensorium_types::agent::{AgentId, AgentStatus};
use sensorium_types::config::SensoriumConfig;
use sensorium_types::error::{CommError, SensorError};
use sensorium_types::event::{event_data, kind};
use sensorium_types::response::AgentResponse;

use super::build_agent;

/// Satiation event type processed when a peer message arrives.
pub const MESSAGE_RECEIVED: &str = "message_received";

#[derive(Debug, Args)]
pub struct DebateArgs {
    /// Profile that opens the debate (id or role name).
    pub first: String,

    /// Profile that answers first (id or role name).
    pub second: String,

    /// Opening question put to the first agent.
    #[arg(
        short,
        long,
        default_value = "Can an artificial mind have a genuine sense of purpose?"
    )]
    pub question: String,

    /// Number of rounds; each agent speaks once per round.
    #[arg(short, long, default_value_t = 2)]
    pub rounds: u32,

    /// Need moved by each reply's purpose introspection.
    #[arg(long, default_value = "life_purpose")]
    pub need: String,
}

/// One utterance in the debate.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub round: u32,
    pub speaker: AgentId,
    pub name: String,
    pub prompt: String,
    #[serde(flatten)]
    pub response: AgentResponse,
    /// Value of the debated need after the reply's impact, if the agent has it.
    pub need_value: Option<f64>,
}

/// An agent in the debate, with the inbox its peer's messages land in.
pub struct Debater {
    communicator: LlmCommunicator,
    inbox: Arc<Mutex<Option<String>>>,
}

impl Debater {
    pub fn new(agent: Agent, client: ChatClient) -> Self {
        let inbox = Arc::new(Mutex::new(None));
        let own_id = agent.id().clone();
        let slot = Arc::clone(&inbox);
        agent.on(
            kind::MESSAGE_SENT,
            Sensor::new(move |event| {
                if event.source() == &own_id {
                    return Ok(());
                }
                let content = event
                    .get("content")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SensorError::new("message_sent without content"))?;
                *slot.lock().expect("inbox lock poisoned") = Some(content.to_string());
                Ok(())
            }),
        );

        Self {
            communicator: LlmCommunicator::new(agent, client),
            inbox,
        }
    }

    pub fn agent(&self) -> &Agent {
        self.communicator.agent()
    }

    fn take_inbox(&self) -> Option<String> {
        self.inbox.lock().expect("inbox lock poisoned").take()
    }

    async fn take_turn(
        &self,
        round: u32,
        prompt: String,
        recipient: &AgentId,
        need: &str,
    ) -> Result<Turn, CommError> {
        let agent = self.agent();
        agent.set_status(AgentStatus::Working);
        let reply = self.communicator.respond(&prompt).await;
        agent.set_status(AgentStatus::Waiting);
        let response = reply?;

        let need_value = agent.apply_need_impact(need, response.purpose_introspection);
        agent.emit(
            kind::MESSAGE_SENT,
            Some(event_data(json!({
                "content": response.response,
                "emotion": response.emotional_introspection,
                "purpose_impact": response.purpose_introspection,
                "recipient": recipient,
            }))),
        );

        Ok(Turn {
            round,
            speaker: agent.id().clone(),
            name: agent.display_name(),
            prompt,
            response,
            need_value,
        })
    }
}

/// Run `rounds` exchanges, `first` speaking first each round.
///
/// `on_turn` sees every turn as soon as it is taken. The two agents must
/// have different ids.
pub async fn run_debate<F>(
    first: &Debater,
    second: &Debater,
    question: &str,
    rounds: u32,
    need: &str,
    mut on_turn: F,
) -> Result<Vec<Turn>>
where
    F: FnMut(&Turn),
{
    if first.agent().id() == second.agent().id() {
        bail!("an agent cannot debate itself ({})", first.agent().id());
    }

    first.agent().subscribe_to(second.agent());
    second.agent().subscribe_to(first.agent());
    first.agent().resume();
    second.agent().resume();

    let mut turns = Vec::new();
    for round in 1..=rounds {
        for (speaker, listener) in [(first, second), (second, first)] {
            let prompt = match speaker.take_inbox() {
                Some(message) => {
                    speaker
                        .agent()
                        .process_need_satisfaction(MESSAGE_RECEIVED, None);
                    message
                }
                None => question.to_string(),
            };
            let turn = speaker
                .take_turn(round, prompt, listener.agent().id(), need)
                .await?;
            on_turn(&turn);
            turns.push(turn);
        }
    }

    info!(rounds, turns = turns.len(), "debate finished");
    Ok(turns)
}

/// `snsr debate`
pub async fn debate(config: &SensoriumConfig, args: DebateArgs, json: bool) -> Result<()> {
    let first_agent = build_agent(config, &args.first, config.settings.clone())?;
    let second_agent = build_agent(config, &args.second, config.settings.clone())?;
    if first_agent.id() == second_agent.id() {
        bail!(
            "`{}` and `{}` name the same profile; pick two different agents",
            args.first,
            args.second
        );
    }

    let api_key = resolve_api_key(&config.llm)?;
    let first = Debater::new(first_agent, ChatClient::new(&config.llm, api_key.clone())?);
    let second = Debater::new(second_agent, ChatClient::new(&config.llm, api_key)?);

    if !json {
        println!();
        println!(
            "  {} {} vs {}",
            style("⚖").bold(),
            style(first.agent().display_name()).cyan().bold(),
            style(second.agent().display_name()).magenta().bold()
        );
        println!("  {}", style(&args.question).italic());
        println!();
    }

    let first_id = first.agent().id().clone();
    let turns = run_debate(&first, &second, &args.question, args.rounds, &args.need, |turn| {
        if !json {
            print_turn(turn, turn.speaker == first_id, &args.need);
        }
    })
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
    }
    Ok(())
}

fn print_turn(turn: &Turn, opener: bool, need: &str) {
    let name = if opener {
        style(&turn.name).cyan().bold()
    } else {
        style(&turn.name).magenta().bold()
    };
    println!(
        "  {} {}",
        name,
        style(format!(
            "(round {}, {}, purpose {:+.2})",
            turn.round, turn.response.emotional_introspection, turn.response.purpose_introspection
        ))
        .dim()
    );
    println!("  {}", turn.response.response);
    if let Some(value) = turn.need_value {
        println!(
            "  {}",
            style(format!("{need}: {:.0}%", value * 100.0)).dim()
        );
    }
    println!();
}
