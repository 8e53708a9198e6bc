use serde::Serialize;

/// Text returned when retrieval finds nothing to ground an answer in.
pub const INSUFFICIENT_CONTEXT: &str =
    "I don't have enough relevant articles in my knowledge base to answer this question.";

/// Outcome of a generation pipeline that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Generation {
    Text(String),
    InsufficientContext,
}

impl Generation {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::InsufficientContext => INSUFFICIENT_CONTEXT,
        }
    }

    pub const fn is_insufficient_context(&self) -> bool {
        matches!(self, Self::InsufficientContext)
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::InsufficientContext => INSUFFICIENT_CONTEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_text() {
        let g = Generation::InsufficientContext;
        assert!(g.is_insufficient_context());
        assert_eq!(g.as_text(), INSUFFICIENT_CONTEXT);
    }

    #[test]
    fn test_text_that_mentions_sentinel_is_still_text() {
        let g = Generation::Text(INSUFFICIENT_CONTEXT.to_string());
        assert!(!g.is_insufficient_context());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Generation::Text("hi".into())).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["text"], "hi");

        let json = serde_json::to_value(Generation::InsufficientContext).unwrap();
        assert_eq!(json["kind"], "insufficient_context");
    }
}
