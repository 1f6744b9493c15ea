use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use store::HashingEmbedder;

/// Maximum number of texts sent in a single embedding request.
const BATCH_SIZE: usize = 64;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds each text, preserving order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed_all(texts))
    }
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct RemoteEmbedder {
    http: reqwest::Client,
    url: Box<str>,
    model: Box<str>,
    key: Option<Box<str>>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(http: reqwest::Client, url: Box<str>, model: Box<str>, key: Option<Box<str>>) -> Self {
        Self { http, url, model, key }
    }

    async fn embed_batch(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut request = self.http.post(&*self.url).json(&EmbeddingRequest { model: &self.model, input });
        if let Some(key) = &self.key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.and_then(reqwest::Response::error_for_status).map_err(|err| {
            log::error!("embedding request failed: {err}");
            Error::Embedding
        })?;
        let EmbeddingResponse { mut data } = response.json().await.map_err(|err| {
            log::error!("unexpected embedding response: {err}");
            Error::Embedding
        })?;

        if data.len() != input.len() {
            log::error!("requested {} embeddings but received {}", input.len(), data.len());
            return Err(Error::Embedding);
        }

        data.sort_unstable_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
