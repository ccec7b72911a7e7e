//! The `braindriver play` command.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use braindriver_core::funnel::FunnelEvent;
use braindriver_core::report::GameReport;
use braindriver_core::{Advance, Category, EngineError, GameSession, PoolBuilder, Question, Stage};
use braindriver_store::config::create_store;
use braindriver_store::PersistentRecorder;

const GAME_NAME: &str = "Brain Driver";

/// Parse `q1` or `q1,q2` (commas or whitespace between the two).
fn parse_answer(line: &str) -> Result<(Category, Option<Category>), String> {
    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [q1] => Ok((q1.parse()?, None)),
        [q1, q2] => Ok((q1.parse()?, Some(q2.parse()?))),
        [] => Err("empty answer".to_string()),
        _ => Err(format!("expected one or two systems, got {}", parts.len())),
    }
}

fn prompt(question: &Question, position: usize, total: usize) -> Result<()> {
    let hint = match question.stage() {
        Stage::One => "main system",
        Stage::Two => "controller,controlled",
    };
    print!(
        "[{position}/{total}] stage {} {} ({hint}): ",
        question.stage(),
        question.locale_key
    );
    std::io::stdout().flush().context("failed to flush stdout")
}

pub async fn execute(
    catalog_path: Option<PathBuf>,
    seed: Option<u64>,
    session_id: Option<String>,
    report_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, catalog) = super::load_setup(config_path.as_deref(), catalog_path)?;
    let builder = PoolBuilder::new(Arc::new(catalog), config.pool_size())?;

    let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let language = config.language.clone();
    let store = create_store(&config.store);
    let recorder = PersistentRecorder::spawn(store.clone(), &session_id, &language);

    FunnelEvent::IntroButtonClick.emit(&session_id, &language);

    let mut source = super::random_source(seed);
    let mut session = GameSession::start(&builder, &mut source);
    let total = session.questions().len();
    tracing::info!(
        session_id = %session_id,
        language = %language,
        questions = total,
        "game started"
    );
    println!("Session: {session_id}");
    println!("Stage 1: which system is driving? (reptilian, limbic, neocortex)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(question) = session.current().cloned() {
        prompt(&question, session.current_index() + 1, total)?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            println!();
            break;
        };

        let (q1, q2) = match parse_answer(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("Invalid answer: {e}");
                continue;
            }
        };

        match session.submit(&question.id, q1, q2).cloned() {
            Ok(answer) => {
                if session.answers().len() == 1 && answer.stage == Stage::One {
                    FunnelEvent::FirstQuestionChoiceStage1.emit(&session_id, &language);
                }
                println!(
                    "{}",
                    if answer.is_fully_correct() {
                        "Correct!"
                    } else {
                        "Not quite."
                    }
                );
                recorder.persist(&answer);
            }
            Err(EngineError::DuplicateAnswer(_)) => {
                let verdict = session
                    .answer_for(&question.id)
                    .map(|a| {
                        if a.is_fully_correct() {
                            "correct"
                        } else {
                            "not quite"
                        }
                    })
                    .unwrap_or("unknown");
                println!("Already submitted ({verdict}).");
            }
            Err(e) if e.is_recoverable() => {
                println!("Invalid answer: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        match session.advance() {
            Advance::EnteredStage2 { .. } => {
                FunnelEvent::Stage1Ended.emit(&session_id, &language);
                println!("Stage 2: who controls whom? (controller,controlled)");
            }
            Advance::Moved { .. } => {}
            Advance::Exhausted => {
                if question.stage() == Stage::One {
                    FunnelEvent::Stage1Ended.emit(&session_id, &language);
                }
            }
        }
    }

    let results = session.results();
    if session.is_finished() {
        FunnelEvent::Stage2Ended {
            results: results.clone(),
        }
        .emit(&session_id, &language);
    } else {
        println!(
            "Game abandoned after {} of {total} questions.",
            session.answers().len()
        );
    }

    println!();
    super::print_results(&results);
    println!(
        "{}",
        braindriver_core::report::share_message(&results, GAME_NAME)
    );

    if let Some(path) = report_path {
        GameReport::from_session(&session, &session_id, &language).save_json(&path)?;
        println!("Report written to {}", path.display());
    }

    recorder.flush().await;
    let stats = recorder.shutdown().await;
    tracing::debug!(
        store = store.name(),
        written = stats.written,
        failed = stats.failed,
        "recorder finished"
    );
    if stats.failed > 0 {
        eprintln!(
            "Warning: {} of {} decision(s) could not be saved to the {} store.",
            stats.failed,
            stats.written + stats.failed,
            store.name()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_pair() {
        assert_eq!(parse_answer("limbic").unwrap(), (Category::Limbic, None));
        assert_eq!(
            parse_answer(" neocortex , reptilian ").unwrap(),
            (Category::Neocortex, Some(Category::Reptilian))
        );
        assert_eq!(
            parse_answer("n l").unwrap(),
            (Category::Neocortex, Some(Category::Limbic))
        );
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_answer("").is_err());
        assert!(parse_answer("brainstem").is_err());
        assert!(parse_answer("r,l,n").is_err());
    }
}
