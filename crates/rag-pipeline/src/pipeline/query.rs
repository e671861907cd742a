use crate::config::Settings;
use crate::embedding::EmbeddingProvider;
use crate::index::VectorStore;
use crate::llm::{ChatMessage, LlmProvider};
use crate::utils::error::PipelineError;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: String,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub hits: Vec<RetrievedChunk>,
    pub answer: String,
}

pub struct QueryEngine {
    settings: Settings,
    store: VectorStore,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl QueryEngine {
    /// Open the persisted store; both store files must exist.
    pub fn open(
        settings: Settings,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self, PipelineError> {
        let store = VectorStore::open(&settings.store, settings.embedding.dimension)?;

        Ok(Self {
            settings,
            store,
            embedder,
            llm,
        })
    }

    /// Answer a question: embed it, retrieve the nearest chunks, and ask the
    /// LLM with those chunks as context.
    pub async fn answer(&self, question: &str) -> Result<QueryResult, PipelineError> {
        if self.store.is_empty() {
            return Err(PipelineError::EmptyStore);
        }

        info!("Answering question: {}", question);

        let retrieved = self.retrieve(question).await?;

        let prompt = build_prompt(&retrieved, question);

        let messages = vec![
            ChatMessage::system(self.settings.prompts.system_prompt.clone()),
            ChatMessage::user(prompt),
        ];

        let answer = self
            .llm
            .generate(messages)
            .await
            .map_err(|e| PipelineError::Llm(e.to_string()))?;

        Ok(QueryResult {
            hits: retrieved,
            answer,
        })
    }

    /// Embed the question and look up the nearest stored chunks
    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>, PipelineError> {
        let query_embedding = self
            .embedder
            .embed_single(question.to_string())
            .await
            .map_err(|e| PipelineError::Embedding(e.to_string()))?;

        let hits = self
            .store
            .search(&query_embedding, self.settings.retrieval.top_k)?;

        debug!("Retrieved {} chunks", hits.len());

        Ok(hits
            .iter()
            .filter_map(|hit| {
                self.store.chunk(hit.id).map(|chunk| RetrievedChunk {
                    content: chunk.content.clone(),
                    source: chunk.source.clone(),
                    distance: hit.distance,
                })
            })
            .collect())
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }
}

/// Assemble the grounding prompt: retrieved chunks as context, then the
/// question.
pub fn build_prompt(chunks: &[RetrievedChunk], question: &str) -> String {
    let context = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Context:\n{}\n\nQuestion: {}\nAnswer:", context, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::index::{StoredChunk, VectorStore};
    use crate::llm::MockLlmProvider;
    use chrono::Utc;
    use std::path::Path;

    fn chunk(content: &str) -> RetrievedChunk {
        RetrievedChunk {
            content: content.to_string(),
            source: "doc.txt".to_string(),
            distance: 0.5,
        }
    }

    fn test_settings(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.embedding.dimension = 2;
        settings.retrieval.top_k = 2;
        settings.store.chunks_path = dir.join("chunks.json");
        settings.store.index_path = dir.join("index.json");
        settings
    }

    fn seed_store(settings: &Settings, entries: &[(&str, [f32; 2])]) {
        let mut store = VectorStore::open_or_create(&settings.store, 2).unwrap();
        for (content, vector) in entries {
            store
                .append(
                    StoredChunk {
                        content: content.to_string(),
                        source: "seed.txt".to_string(),
                        ingested_at: Utc::now(),
                    },
                    vector.to_vec(),
                )
                .unwrap();
        }
        store.save().unwrap();
    }

    #[test]
    fn prompt_joins_chunks_with_blank_lines() {
        let chunks = vec![chunk("first chunk"), chunk("second chunk")];
        let prompt = build_prompt(&chunks, "what is this?");

        assert_eq!(
            prompt,
            "Context:\nfirst chunk\n\nsecond chunk\n\nQuestion: what is this?\nAnswer:"
        );
    }

    #[test]
    fn prompt_with_no_chunks_still_carries_question() {
        let prompt = build_prompt(&[], "anything?");
        assert!(prompt.starts_with("Context:\n"));
        assert!(prompt.contains("Question: anything?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[tokio::test]
    async fn empty_store_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        seed_store(&settings, &[]);

        // Neither the embedder nor the LLM may be called
        let engine = QueryEngine::open(
            settings,
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(MockLlmProvider::new()),
        )
        .unwrap();

        let result = engine.answer("anything?").await;
        assert!(matches!(result, Err(PipelineError::EmptyStore)));
    }

    #[tokio::test]
    async fn answer_retrieves_top_k_and_grounds_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        seed_store(
            &settings,
            &[
                ("apples grow on trees", [0.0, 0.0]),
                ("bananas are yellow", [10.0, 10.0]),
                ("cherries are red", [1.0, 1.0]),
            ],
        );

        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_single()
            .returning(|_| Ok(vec![0.4, 0.4]));

        let mut llm = MockLlmProvider::new();
        llm.expect_generate()
            .withf(|messages: &Vec<ChatMessage>| {
                messages.len() == 2
                    && messages[0].role == "system"
                    && messages[1].content.contains("apples grow on trees")
                    && messages[1].content.contains("Question: what fruit?")
            })
            .returning(|_| Ok("a grounded answer".to_string()));

        let engine = QueryEngine::open(settings, Arc::new(embedder), Arc::new(llm)).unwrap();
        let result = engine.answer("what fruit?").await.unwrap();

        // top_k = 2: nearest two of three chunks, closest first
        assert_eq!(result.hits.len(), 2);
        assert_eq!(result.hits[0].content, "apples grow on trees");
        assert_eq!(result.hits[1].content, "cherries are red");
        assert!(result.hits[0].distance < result.hits[1].distance);
        assert_eq!(result.hits[0].source, "seed.txt");
        assert_eq!(result.answer, "a grounded answer");
    }

    #[tokio::test]
    async fn embedder_failure_maps_to_embedding_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        seed_store(&settings, &[("one chunk", [0.0, 0.0])]);

        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_single()
            .returning(|_| Err(anyhow::anyhow!("encoder down")));

        let engine = QueryEngine::open(
            settings,
            Arc::new(embedder),
            Arc::new(MockLlmProvider::new()),
        )
        .unwrap();

        let result = engine.answer("q").await;
        assert!(matches!(result, Err(PipelineError::Embedding(_))));
    }

    #[tokio::test]
    async fn llm_failure_maps_to_llm_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        seed_store(&settings, &[("one chunk", [0.0, 0.0])]);

        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_single()
            .returning(|_| Ok(vec![0.0, 0.0]));

        let mut llm = MockLlmProvider::new();
        llm.expect_generate()
            .returning(|_| Err(anyhow::anyhow!("rate limited")));

        let engine = QueryEngine::open(settings, Arc::new(embedder), Arc::new(llm)).unwrap();

        let result = engine.answer("q").await;
        assert!(matches!(result, Err(PipelineError::Llm(_))));
    }
}
