use serde_json::json;

use helix_scribe::Result;

use super::{Session, print_json};

pub async fn run(session: &Session) -> Result<()> {
    let store = session.store.read().await;

    if session.json {
        return print_json(&json!({
            "documents": store.len(),
            "model": store.model_name(),
            "dimension": store.dimension(),
            "store_path": session.store_path,
        }));
    }

    println!("Documents:  {}", store.len());
    println!("Model:      {} ({} dims)", store.model_name(), store.dimension());
    println!("Store:      {}", session.store_path.display());

    Ok(())
}
