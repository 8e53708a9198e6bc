use serde_json::json;

use helix_scribe::adapters::create_generator;
use helix_scribe::ports::{EmbeddingGenerator, TextGenerator};
use helix_scribe::services::{GenerationOrchestrator, PromptAssembler};
use helix_scribe::{Generation, Result, StyleMode};

use super::{Session, print_json};

type DynOrchestrator = GenerationOrchestrator<dyn EmbeddingGenerator, dyn TextGenerator>;

fn orchestrator(session: &Session) -> Result<DynOrchestrator> {
    let generator = create_generator(&session.config)?;
    Ok(GenerationOrchestrator::new(session.store.clone(), generator)
        .with_decoding(session.config.decoding)
        .with_top_k(session.config.retrieval.top_k)
        .with_assembler(PromptAssembler::new(
            session.config.retrieval.exemplar_sentences,
        )))
}

fn report(session: &Session, question: &str, mode: &str, generation: &Generation) -> Result<()> {
    if session.json {
        print_json(&json!({ "question": question, "mode": mode, "result": generation }))
    } else {
        println!("{}", generation.as_text());
        Ok(())
    }
}

pub async fn run_single(
    session: &Session,
    question: &str,
    mode: StyleMode,
    max_tokens: Option<u32>,
) -> Result<()> {
    let max_tokens = max_tokens.unwrap_or(session.config.generation.max_tokens);
    let generation = orchestrator(session)?
        .generate_single(question, mode, max_tokens)
        .await?;
    report(session, question, mode.as_str(), &generation)
}

pub async fn run_two_stage(
    session: &Session,
    question: &str,
    max_tokens: Option<u32>,
) -> Result<()> {
    let max_tokens = max_tokens.unwrap_or(session.config.generation.max_tokens);
    let generation = orchestrator(session)?
        .generate_two_stage(question, max_tokens)
        .await?;
    report(session, question, "two-stage", &generation)
}
