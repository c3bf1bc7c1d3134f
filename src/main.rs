//! Terminal session for the guided conversation.
//!
//! Lines typed on stdin are sent to the conversation; `/report` asks for the
//! closing analysis, `/reset` starts over and `/quit` exits. Logs go to
//! stderr so they do not interleave with the dialogue.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use kinoko_sensei::adapters::ai::AnthropicChatClient;
use kinoko_sensei::application::{ConversationController, RevealOutcome, TurnOutcome};
use kinoko_sensei::config::{AppConfig, LoggingConfig};
use kinoko_sensei::domain::conversation::{AnalysisReport, Message, Phase};
use kinoko_sensei::ports::ChatClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let client = AnthropicChatClient::new(config.ai.anthropic()?)?;
    let controller = ConversationController::new(Arc::new(client), config.conversation.settings());

    tracing::info!(model = %config.ai.model, "session ready");
    println!("What has been on your mind lately? (/report, /reset, /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/reset" => {
                controller.reset().await;
                println!("-- new conversation --");
            }
            "/report" => match controller.request_report().await {
                Ok(Some(report)) => print_report(&report),
                Ok(None) => {}
                Err(err) => tracing::error!(error = %err, "report unavailable"),
            },
            text => {
                if let Err(err) = handle_turn(&controller, text).await {
                    tracing::error!(error = %err, "turn rejected");
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.is_json() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

async fn handle_turn<C>(
    controller: &ConversationController<C>,
    text: &str,
) -> Result<(), kinoko_sensei::application::ConversationError>
where
    C: ChatClient + 'static,
{
    let outcome = if controller.snapshot().await.phase() == Phase::Welcome {
        controller.start_conversation(text).await?
    } else {
        controller.submit_user_message(text).await?
    };

    match outcome {
        TurnOutcome::Recorded { .. } => println!("(noted; type /report when you are ready)"),
        TurnOutcome::Replied {
            reply,
            reveal_after,
        } => {
            print_message(&reply);

            if let Some(delay) = reveal_after {
                tokio::time::sleep(delay).await;
                if let RevealOutcome::Entered { marker, follow_up } =
                    controller.enter_reveal().await?
                {
                    print_message(&marker);
                    match follow_up.await {
                        Ok(Some(message)) => print_message(&message),
                        Ok(None) => {}
                        Err(err) => tracing::error!(error = %err, "reveal follow-up task failed"),
                    }
                }
            }
        }
        TurnOutcome::Ignored | TurnOutcome::Discarded => {}
    }

    Ok(())
}

fn print_message(message: &Message) {
    println!("\n{}\n", message.text());
}

fn print_report(report: &AnalysisReport) {
    println!("\n== Summary ==\n{}", report.summary());
    println!("\n== Problem ==\n{}", report.problem_definition());
    println!("\n== Tips ==");
    for tip in report.tips() {
        println!("- {}", tip);
    }
    println!("\n== Next step ==\n{}\n", report.next_step());
}
