mod config;
mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mediko_service::{Generators, OpenAiService};
use mediko_session::{Phase, Session, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::config::CliConfig;

const BACK: &[&str] = &[":atras", ":atrás", ":back"];
const RESET: &[&str] = &[":nueva", ":reset"];
const QUIT: &[&str] = &[":salir", ":quit"];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = CliConfig::parse();
    let config = cli.generator_config();
    config.validate()?;
    if !config.has_credential() {
        anyhow::bail!("missing API key: pass --api-key or set MEDIKO_API_KEY / OPENAI_API_KEY");
    }
    info!(base_url = %config.base_url, model = %config.model, "mediko starting");

    let service = Arc::new(OpenAiService::new(&config)?);
    let generators = Generators::new(service, &config);

    let mut session = Session::new(cli.session_limits());
    if cli.accept_terms {
        session.set_terms_accepted(true)?;
    }
    prompt(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if QUIT.contains(&input) {
            break;
        }
        if RESET.contains(&input) {
            session.reset();
            if cli.accept_terms {
                session.set_terms_accepted(true)?;
            }
            prompt(&session);
            continue;
        }
        if let Err(e) = step(&mut session, &generators, input).await {
            println!("⚠️  {}", render::user_message(&e));
        }
        prompt(&session);
    }

    info!(session = %session.id(), phase = %session.phase(), "mediko exiting");
    Ok(())
}

/// Apply one line of input to the session.
async fn step(
    session: &mut Session,
    generators: &Generators,
    input: &str,
) -> Result<(), SessionError> {
    match session.phase() {
        Phase::Idle if !session.terms_accepted() => {
            let accepted = matches!(input.to_lowercase().as_str(), "s" | "si" | "sí" | "y");
            session.set_terms_accepted(accepted)?;
            if !accepted {
                return Err(mediko_core::ValidationError::TermsNotAccepted.into());
            }
        }
        Phase::Idle => {
            println!("🩺 Preparando tus preguntas...");
            session.submit_description(&generators.questions, input).await?;
            println!("{}", render::QUESTIONS_INTRO);
        }
        Phase::Questioning { .. } => {
            if BACK.contains(&input) {
                session.back()?;
                return Ok(());
            }
            // An empty line keeps a pre-filled answer.
            if !input.is_empty() || session.buffer().is_empty() {
                session.set_buffer(input)?;
            }
            if session.advance()? == Phase::Reviewing {
                request_guidance(session, generators).await?;
            }
        }
        Phase::Reviewing => {
            if BACK.contains(&input) {
                session.back()?;
                return Ok(());
            }
            request_guidance(session, generators).await?;
        }
        Phase::Resolved => {
            println!("{}", render::NEW_GUIDANCE);
        }
    }
    Ok(())
}

async fn request_guidance(
    session: &mut Session,
    generators: &Generators,
) -> Result<(), SessionError> {
    println!("👨‍⚕️ Generando orientación...");
    let result = session.request_guidance(&generators.guidance).await?;
    println!("{}", render::guidance(result));
    Ok(())
}

/// Print what the user should type next.
fn prompt(session: &Session) {
    match session.phase() {
        Phase::Idle if !session.terms_accepted() => println!("{}", render::TERMS_PROMPT),
        Phase::Idle => {
            println!("{}", render::INTRO);
            println!("{}", render::description_limit(session));
        }
        Phase::Questioning { .. } => {
            if let Some(view) = render::question(session) {
                print!("{view}");
            }
            println!("{} · :atras para volver", render::remaining(session));
        }
        Phase::Reviewing => println!("{}", render::REVIEW_HINT),
        Phase::Resolved => {}
    }
}
