use std::path::PathBuf;

use console::style;
use serde_json::json;

use helix_scribe::Result;

use super::{Session, print_json};

pub async fn run(
    session: &Session,
    content: Option<String>,
    file: Option<PathBuf>,
    title: &str,
    source: &str,
    url: Option<String>,
) -> Result<()> {
    let content = match (content, file) {
        (Some(content), _) => content,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };

    let id = session
        .store
        .write()
        .await
        .add(title, &content, source, url)
        .await?;
    session.save().await?;

    if session.json {
        print_json(&json!({ "id": id.index(), "title": title, "source": source }))
    } else {
        println!("{} {id}: {title} ({source})", style("Added").green());
        Ok(())
    }
}
