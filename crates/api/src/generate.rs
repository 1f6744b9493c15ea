use crate::{
    embed::Embedder,
    error::{Error, Result},
};
use async_trait::async_trait;
use model::Question;
use serde::{Deserialize, Serialize};
use store::Collection;

/// Number of retrieved chunks given to the model as context.
const CONTEXT_CHUNKS: usize = 4;

/// Attempts allowed per requested question before giving up on the rest.
const ATTEMPTS_PER_QUESTION: usize = 3;

pub const MAX_QUESTIONS: usize = 10;

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Produces one question about `topic` grounded in `context`.
    async fn generate(&self, topic: &str, context: &str) -> Result<Question>;
}

fn system_prompt(topic: &str, context: &str) -> String {
    format!(
        "You are a subject matter expert on the topic: {topic}\n\
        \n\
        Follow the instructions to create a quiz question:\n\
        1. Generate a question based on the topic provided and context as key \"question\"\n\
        2. Provide 4 multiple choice answers to the question as a list of key-value pairs \"choices\"\n\
        3. Provide the correct answer for the question from the list of answers as key \"answer\"\n\
        4. Provide an explanation as to why the answer is correct as key \"explanation\"\n\
        \n\
        You must respond as a JSON object with the following structure:\n\
        {{\n\
          \"question\": \"<question>\",\n\
          \"choices\": [\n\
            {{\"key\": \"A\", \"value\": \"<choice>\"}},\n\
            {{\"key\": \"B\", \"value\": \"<choice>\"}},\n\
            {{\"key\": \"C\", \"value\": \"<choice>\"}},\n\
            {{\"key\": \"D\", \"value\": \"<choice>\"}}\n\
          ],\n\
          \"answer\": \"<answer key from choices list>\",\n\
          \"explanation\": \"<explanation as to why the answer is correct>\"\n\
        }}\n\
        \n\
        Context: {context}"
    )
}

/// Parses a model reply into a question, tolerating a surrounding markdown code fence.
pub fn parse_question(reply: &str) -> Result<Question> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(|fenced| fenced.trim_start_matches("json").trim())
        .unwrap_or(trimmed);
    serde_json::from_str(body).map_err(|err| {
        log::warn!("model reply is not a question record: {err}");
        Error::MalformedQuestion
    })
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct ChatGenerator {
    http: reqwest::Client,
    url: Box<str>,
    model: Box<str>,
    key: Option<Box<str>>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl ChatGenerator {
    pub fn new(http: reqwest::Client, url: Box<str>, model: Box<str>, key: Option<Box<str>>) -> Self {
        Self { http, url, model, key }
    }
}

#[async_trait]
impl QuestionSource for ChatGenerator {
    async fn generate(&self, topic: &str, context: &str) -> Result<Question> {
        let system = system_prompt(topic, context);
        let user = format!("Generate a quiz question about {topic}.");
        let body = ChatRequest {
            model: &self.model,
            messages: [Message { role: "system", content: &system }, Message { role: "user", content: &user }],
            temperature: 0.8,
        };

        let mut request = self.http.post(&*self.url).json(&body);
        if let Some(key) = &self.key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.and_then(reqwest::Response::error_for_status).map_err(|err| {
            log::error!("generation request failed: {err}");
            Error::Generation
        })?;
        let ChatResponse { choices } = response.json().await.map_err(|err| {
            log::error!("unexpected generation response: {err}");
            Error::Generation
        })?;

        let ChatChoice { message } = choices.into_iter().next().ok_or(Error::MalformedQuestion)?;
        parse_question(&message.content)
    }
}

/// Checks the user's quiz request, returning the trimmed topic.
pub fn validate_request(topic: &str, count: usize) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(Error::BlankTopic);
    }
    if !(1..=MAX_QUESTIONS).contains(&count) {
        return Err(Error::InvalidCount);
    }
    Ok(topic)
}

/// Retrieves context for `topic` from the collection and asks the source for `count`
/// questions. Malformed or repeated questions are retried a bounded number of times,
/// so the result may hold fewer than `count` records. Transport failures abort.
pub async fn generate_quiz(
    topic: &str,
    count: usize,
    collection: &Collection,
    embedder: &dyn Embedder,
    source: &dyn QuestionSource,
) -> Result<Vec<Question>> {
    let topic = validate_request(topic, count)?;
    let query = embedder.embed(&[topic.to_owned()]).await?.pop().ok_or(Error::Embedding)?;
    let context = collection
        .similarity_search_with_relevance_scores(&query, CONTEXT_CHUNKS)?
        .into_iter()
        .map(|(chunk, _)| &*chunk.text)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut questions = Vec::<Question>::with_capacity(count);
    for _ in 0..count * ATTEMPTS_PER_QUESTION {
        if questions.len() == count {
            break;
        }

        let question = match source.generate(topic, &context).await {
            Ok(question) => question,
            Err(Error::MalformedQuestion) => continue,
            Err(err) => return Err(err),
        };

        if let Err(reason) = question.validate() {
            log::warn!("discarding generated question: {reason}");
            continue;
        }

        if questions.iter().any(|existing| existing.question == question.question) {
            log::warn!("discarding repeated question: {}", question.question);
            continue;
        }

        questions.push(question);
    }

    Ok(questions)
}
