use console::style;
use serde_json::json;

use helix_scribe::Result;
use helix_scribe::services::Retriever;

use super::{Session, print_json};

pub async fn run(session: &Session, query: &str, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(session.config.retrieval.top_k);
    let store = session.store.read().await;
    let retriever = Retriever::new(session.embedder.clone());
    let results = retriever.find_top_k(&*store, query, limit).await?;

    if session.json {
        let items = results
            .iter()
            .map(|r| {
                json!({
                    "id": r.id.index(),
                    "title": r.document.title,
                    "source": r.document.source,
                    "url": r.document.url,
                    "score": r.score,
                })
            })
            .collect::<Vec<_>>();
        return print_json(&json!({ "query": query, "count": items.len(), "results": items }));
    }

    if results.is_empty() {
        println!("No documents stored");
        return Ok(());
    }

    println!();
    println!("Query: \"{query}\"");
    println!();
    for (i, result) in results.iter().enumerate() {
        println!(
            "[{}] {} {}",
            i + 1,
            style(&result.document.title).bold(),
            style(format!("({:.3})", result.score)).dim()
        );
        println!("    Source: {}", result.document.source);
        if let Some(url) = &result.document.url {
            println!("    URL: {url}");
        }
    }
    println!();

    Ok(())
}
