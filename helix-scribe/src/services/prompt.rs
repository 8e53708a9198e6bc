use crate::domain::{Exemplar, PromptBundle, RankedResult, StyleMode};

pub const DEFAULT_EXEMPLAR_SENTENCES: usize = 3;
const EXEMPLAR_SEPARATOR: &str = "\n\n";

/// Result of prompt assembly. `InsufficientContext` means nothing was
/// retrieved and no generation request should be made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembledPrompt {
    Ready(PromptBundle),
    InsufficientContext,
}

/// Builds generation prompts from ranked documents.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    exemplar_sentences: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPLAR_SENTENCES)
    }
}

impl PromptAssembler {
    pub fn new(exemplar_sentences: usize) -> Self {
        Self {
            exemplar_sentences: exemplar_sentences.max(1),
        }
    }

    pub fn assemble(
        &self,
        question: &str,
        results: &[RankedResult<'_>],
        mode: StyleMode,
    ) -> AssembledPrompt {
        if results.is_empty() {
            return AssembledPrompt::InsufficientContext;
        }

        let exemplars = self.exemplar_block(results);
        let system = match mode {
            StyleMode::Baseline => baseline_instructions(&exemplars),
            StyleMode::Evasion => evasion_instructions(&exemplars),
        };

        AssembledPrompt::Ready(PromptBundle {
            system,
            exemplars,
            question: question.to_string(),
        })
    }

    pub fn exemplar(&self, result: &RankedResult<'_>) -> Exemplar {
        let sentences = split_sentences(&result.document.content);
        let take = sentences.len().min(self.exemplar_sentences);

        Exemplar {
            source: result.document.source.clone(),
            text: sentences[..take].join(" "),
        }
    }

    /// Numbered exemplars in rank order, most relevant first.
    pub fn exemplar_block(&self, results: &[RankedResult<'_>]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let exemplar = self.exemplar(result);
                format!("Example {} ({}): {}", i + 1, exemplar.source, exemplar.text)
            })
            .collect::<Vec<_>>()
            .join(EXEMPLAR_SEPARATOR)
    }

    /// User prompt for the second stage. The draft is embedded verbatim.
    pub fn rewrite_prompt(&self, draft: &str) -> String {
        format!(
            r"Rewrite this text to sound completely human. Make these specific changes:

1. Vary sentence lengths dramatically - mix very short sentences (3-8 words) with longer ones (20-30 words)
2. Use contractions naturally (it's, don't, won't, can't, etc.)
3. Start some sentences with conjunctions (But, And, So, Yet)
4. Include one rhetorical question
5. Add one sentence fragment (incomplete sentence)
6. Use slightly informal language and natural speech patterns
7. Include one parenthetical aside (like this)
8. Avoid repetitive sentence starters
9. Make it sound conversational, not robotic

Keep all the facts and meaning the same. Just make it sound like a real human wrote it.

TEXT TO REWRITE: {draft}"
        )
    }
}

fn baseline_instructions(exemplars: &str) -> String {
    format!(
        r"You are a human writer who has studied thousands of New York Times and Wall Street Journal articles.
Your writing style should mimic professional journalism with these characteristics:
- Varied sentence lengths and structures
- Natural transitions and flow
- Professional but accessible tone
- Occasional contractions and informal phrases
- Rich vocabulary but not overly complex
- Human-like imperfections and natural rhythm
- Have imperfection

Here are some examples of the writing style you should emulate:
{exemplars}

Write a single, well-crafted paragraph that answers the user's question in the style of these examples. Make it sound completely human and natural."
    )
}

fn evasion_instructions(exemplars: &str) -> String {
    format!(
        r#"You are a human journalist writing for a major newspaper. Write naturally and conversationally.

CRITICAL RULES:
- Vary sentence lengths dramatically (mix short punchy sentences with longer flowing ones)
- Use contractions naturally (it's, don't, won't, etc.)
- Include occasional rhetorical questions or asides
- Start some sentences with conjunctions (But, And, So)
- Use slightly imperfect grammar that sounds natural
- Include one sentence fragment
- Avoid repetitive sentence starters
- Write like you're talking to a friend, not a robot
- DO NOT INCLUDE EM DASHES "—" ANYWHERE IN YOUR OUTPUT AT ALL!
- Have imperfection

STYLE EXAMPLES TO EMULATE:
{exemplars}

Write a single paragraph answering the question. Sound completely human and natural."#
    )
}

/// Splits text into sentences, keeping each sentence's own terminator.
///
/// A sentence ends at a run of `.`, `!` or `?` (plus any closing quotes or
/// brackets) that is followed by whitespace or the end of the text. Trailing
/// text without a terminator counts as a final sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    const TERMINATORS: [char; 3] = ['.', '!', '?'];
    const CLOSERS: [char; 6] = ['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];

    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !TERMINATORS.contains(&c) {
            continue;
        }

        let mut end = text.len();
        while let Some(&(i, next)) = chars.peek() {
            if TERMINATORS.contains(&next) || CLOSERS.contains(&next) {
                chars.next();
            } else {
                end = i;
                break;
            }
        }

        let at_boundary = text[end..].chars().next().is_none_or(char::is_whitespace);
        if at_boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}
