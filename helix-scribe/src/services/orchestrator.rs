use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::DecodingConfig;
use crate::domain::{Generation, StyleMode};
use crate::error::{Result, ScribeError};
use crate::ports::{CompletionRequest, EmbeddingGenerator, TextGenerator};
use crate::services::prompt::{AssembledPrompt, PromptAssembler};
use crate::services::retriever::Retriever;
use crate::services::store::DocumentStore;

pub const DEFAULT_TOP_K: usize = 3;

/// Drives retrieval, prompt assembly and one or two completion requests.
pub struct GenerationOrchestrator<E, G>
where
    E: EmbeddingGenerator + ?Sized,
    G: TextGenerator + ?Sized,
{
    store: Arc<RwLock<DocumentStore<E>>>,
    assembler: PromptAssembler,
    generator: Arc<G>,
    decoding: DecodingConfig,
    top_k: usize,
}

impl<E, G> GenerationOrchestrator<E, G>
where
    E: EmbeddingGenerator + ?Sized,
    G: TextGenerator + ?Sized,
{
    /// Queries are embedded with the provider held by `store`.
    pub fn new(store: Arc<RwLock<DocumentStore<E>>>, generator: Arc<G>) -> Self {
        Self {
            store,
            assembler: PromptAssembler::default(),
            generator,
            decoding: DecodingConfig::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub const fn with_decoding(mut self, decoding: DecodingConfig) -> Self {
        self.decoding = decoding;
        self
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    #[must_use]
    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub const fn store(&self) -> &Arc<RwLock<DocumentStore<E>>> {
        &self.store
    }

    const fn temperature(&self, mode: StyleMode) -> f32 {
        match mode {
            StyleMode::Baseline => self.decoding.baseline_temperature,
            StyleMode::Evasion => self.decoding.evasion_temperature,
        }
    }

    async fn build_prompt(&self, question: &str, mode: StyleMode) -> Result<AssembledPrompt> {
        let store = self.store.read().await;
        let retriever = Retriever::new(Arc::clone(store.embedder()));
        let results = retriever.find_top_k(&*store, question, self.top_k).await?;
        Ok(self.assembler.assemble(question, &results, mode))
    }

    async fn dispatch(&self, request: &CompletionRequest, stage: &'static str) -> Result<String> {
        tracing::debug!(
            stage,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "dispatching completion request"
        );

        match self.generator.complete(request).await {
            Ok(text) => {
                tracing::debug!(stage, chars = text.len(), "completion succeeded");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(stage, error = %e, "completion failed");
                Err(match e {
                    ScribeError::GenerationService(_) => e,
                    other => ScribeError::GenerationService(other.to_string()),
                })
            }
        }
    }

    /// One completion request grounded in the top-ranked exemplars. Returns
    /// `Generation::InsufficientContext` without calling the service when
    /// nothing was retrieved.
    pub async fn generate_single(
        &self,
        question: &str,
        mode: StyleMode,
        max_tokens: u32,
    ) -> Result<Generation> {
        let bundle = match self.build_prompt(question, mode).await? {
            AssembledPrompt::Ready(bundle) => bundle,
            AssembledPrompt::InsufficientContext => {
                tracing::info!(%mode, "no documents retrieved, skipping generation");
                return Ok(Generation::InsufficientContext);
            }
        };

        let request = CompletionRequest::new(bundle.question, max_tokens, self.temperature(mode))
            .with_system(bundle.system);

        self.dispatch(&request, "draft").await.map(Generation::Text)
    }

    /// Baseline draft followed by a rewrite request. The rewrite is only
    /// issued when the draft produced text.
    pub async fn generate_two_stage(&self, question: &str, max_tokens: u32) -> Result<Generation> {
        let draft = match self
            .generate_single(question, StyleMode::Baseline, max_tokens)
            .await?
        {
            Generation::Text(draft) => draft,
            sentinel @ Generation::InsufficientContext => return Ok(sentinel),
        };

        let request = CompletionRequest::new(
            self.assembler.rewrite_prompt(&draft),
            max_tokens,
            self.decoding.rewrite_temperature,
        );

        self.dispatch(&request, "rewrite").await.map(Generation::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HashingEmbedder;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<CompletionRequest>>,
        fail_on_call: Option<usize>,
    }

    impl Recorder {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            let call = requests.len();
            if self.fail_on_call == Some(call) {
                return Err(ScribeError::Io(std::io::Error::other("connection reset")));
            }
            Ok(format!("response {call}"))
        }
    }

    async fn orchestrator(
        docs: &[(&str, &str)],
        generator: Arc<Recorder>,
    ) -> GenerationOrchestrator<HashingEmbedder, Recorder> {
        let mut store = DocumentStore::new(Arc::new(HashingEmbedder::default()));
        for (title, content) in docs {
            store.add(title, content, "NYT", None).await.unwrap();
        }
        GenerationOrchestrator::new(Arc::new(RwLock::new(store)), generator)
    }

    #[tokio::test]
    async fn test_single_uses_mode_temperature_and_system_prompt() {
        let recorder = Arc::new(Recorder::default());
        let orchestrator = orchestrator(
            &[("Work", "Remote work is changing offices. Cities feel it.")],
            Arc::clone(&recorder),
        )
        .await;

        let out = orchestrator
            .generate_single("How is remote work changing offices?", StyleMode::Evasion, 150)
            .await
            .unwrap();
        assert_eq!(out, Generation::Text("response 1".into()));

        let requests = recorder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 150);
        assert!((requests[0].temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(requests[0].user, "How is remote work changing offices?");
        assert!(requests[0].system.as_deref().unwrap().contains("CRITICAL RULES"));
    }

    #[tokio::test]
    async fn test_ranks_with_store_embedder() {
        let recorder = Arc::new(Recorder::default());
        let orchestrator = orchestrator(
            &[
                ("Schools", "Classrooms adopt tablets."),
                ("Climate", "Carbon pricing reshapes climate policy."),
            ],
            Arc::clone(&recorder),
        )
        .await;

        orchestrator
            .generate_single("climate policy", StyleMode::Baseline, 100)
            .await
            .unwrap();

        let system = recorder.requests()[0].system.clone().unwrap();
        assert!(system.contains("Example 1 (NYT): Carbon pricing reshapes climate policy."));
    }

    #[tokio::test]
    async fn test_two_stage_embeds_draft_in_rewrite() {
        let recorder = Arc::new(Recorder::default());
        let orchestrator = orchestrator(
            &[("Work", "Remote work is changing offices.")],
            Arc::clone(&recorder),
        )
        .await;

        let out = orchestrator
            .generate_two_stage("remote work", 200)
            .await
            .unwrap();
        assert_eq!(out.as_text(), "response 2");

        let requests = recorder.requests();
        assert_eq!(requests.len(), 2);
        assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
        assert!(requests[1].system.is_none());
        assert!(requests[1].user.ends_with("TEXT TO REWRITE: response 1"));
        assert!(requests[1].temperature > requests[0].temperature);
    }

    #[tokio::test]
    async fn test_failed_draft_skips_rewrite() {
        let recorder = Arc::new(Recorder::failing_on(1));
        let orchestrator =
            orchestrator(&[("Work", "Remote work.")], Arc::clone(&recorder)).await;

        let err = orchestrator
            .generate_two_stage("remote work", 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::GenerationService(_)));
        assert_eq!(recorder.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_rewrite_is_service_error() {
        let recorder = Arc::new(Recorder::failing_on(2));
        let orchestrator =
            orchestrator(&[("Work", "Remote work.")], Arc::clone(&recorder)).await;

        let err = orchestrator
            .generate_two_stage("remote work", 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::GenerationService(_)));
        assert_eq!(recorder.requests().len(), 2);
    }
}
