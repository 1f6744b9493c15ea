pub mod embed;
pub mod error;
pub mod generate;
pub mod ingest;

mod handler;
mod page;
mod util;

use bytes::Bytes;
use dashmap::DashMap;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    header::{HeaderValue, CONTENT_TYPE, SET_COOKIE},
    Method, Request, Response, StatusCode,
};
use model::Page;
use quiz::QuizSession;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use store::{CharacterSplitter, Collection};
use util::session::SessionId;

pub use embed::{Embedder, RemoteEmbedder};
pub use generate::{ChatGenerator, QuestionSource};
pub use reqwest;
pub use store::HashingEmbedder;

pub type Body = Full<Bytes>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Largest accepted PDF upload.
const MAX_UPLOAD: usize = 16 << 20;
/// Largest accepted form submission.
const MAX_FORM: usize = 16 << 10;

/// Everything one browser session owns. A session without a quiz is idle.
struct WebSession {
    /// Pages ingested so far and not yet discarded.
    pages: Vec<Page>,
    quiz: Option<QuizSession>,
    /// One-shot message for the next rendered page.
    notice: Option<Box<str>>,
    /// Bumped on every reset so that in-flight quiz builds can detect they are stale.
    generation: u64,
    last_seen: Instant,
}

impl WebSession {
    fn new() -> Self {
        Self { pages: Vec::new(), quiz: None, notice: None, generation: 0, last_seen: Instant::now() }
    }
}

type Registry = DashMap<SessionId, WebSession>;

/// Bounds on the memory held on behalf of browsers.
#[derive(Clone, Copy, Debug)]
pub struct SessionLimits {
    /// Sessions kept at once. The least recently seen one is evicted to make room.
    pub max_sessions: usize,
    /// Sessions untouched for this long are dropped.
    pub idle_timeout: Duration,
    /// Pending pages a single session may accumulate before it must be reset.
    pub max_pages: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self { max_sessions: 1024, idle_timeout: Duration::from_secs(2 * 60 * 60), max_pages: 2000 }
    }
}

/// The collaborators that turn pages into questions.
pub struct Pipeline {
    splitter: CharacterSplitter,
    embedder: Box<dyn Embedder>,
    source: Box<dyn QuestionSource>,
}

impl Pipeline {
    pub fn new(embedder: Box<dyn Embedder>, source: Box<dyn QuestionSource>) -> Self {
        Self { splitter: CharacterSplitter::default(), embedder, source }
    }

    /// Chunks and indexes the pages, then generates and starts a quiz. Nothing is
    /// returned unless every step succeeded.
    pub async fn build_quiz(&self, pages: &[Page], topic: &str, count: usize) -> error::Result<QuizSession> {
        let topic = generate::validate_request(topic, count)?;
        let chunks = self.splitter.split_pages(pages)?;
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.to_string()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        drop(texts);

        let collection = Collection::from_documents(chunks, vectors)?;
        log::info!("indexed {} chunks from {} pages", collection.len(), pages.len());

        let questions =
            generate::generate_quiz(topic, count, &collection, self.embedder.as_ref(), self.source.as_ref()).await?;
        Ok(QuizSession::start(questions)?)
    }
}

struct Inner {
    sessions: Registry,
    pipeline: Pipeline,
    limits: SessionLimits,
}

#[derive(Clone)]
pub struct App {
    inner: Arc<Inner>,
}

impl From<Pipeline> for App {
    fn from(pipeline: Pipeline) -> Self {
        Self::with_limits(pipeline, SessionLimits::default())
    }
}

async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, StatusCode>
where
    B: hyper::body::Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(StatusCode::PAYLOAD_TOO_LARGE),
        Err(_) => Err(StatusCode::BAD_REQUEST),
    }
}

impl App {
    pub fn with_limits(pipeline: Pipeline, limits: SessionLimits) -> Self {
        Self { inner: Arc::new(Inner { sessions: Registry::new(), pipeline, limits }) }
    }

    /// Serves one request. Failures are rendered as a bare status response.
    pub async fn respond<B>(&self, req: Request<B>) -> Response<Body>
    where
        B: hyper::body::Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let code = match self.try_respond(req).await {
            Ok(res) => return res,
            Err(code) => code,
        };

        let reason = code.canonical_reason().unwrap_or_default();
        let mut res = Response::new(Body::from(reason));
        *res.status_mut() = code;
        res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        res
    }

    /// Finds the caller's live session and marks it as recently seen.
    fn touch_session(&self, headers: &hyper::HeaderMap) -> Option<SessionId> {
        let sid = util::session::extract_session(headers)?;
        let mut entry = self.inner.sessions.get_mut(&sid)?;
        entry.last_seen = Instant::now();
        Some(sid)
    }

    /// Registers a new session, first dropping idle ones and evicting the least
    /// recently seen session when the registry is full.
    fn open_session(&self) -> SessionId {
        let sessions = &self.inner.sessions;
        let SessionLimits { max_sessions, idle_timeout, .. } = self.inner.limits;

        let now = Instant::now();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < idle_timeout);
        while sessions.len() >= max_sessions.max(1) {
            let Some(oldest) = sessions.iter().min_by_key(|entry| entry.last_seen).map(|entry| *entry.key()) else {
                break;
            };
            sessions.remove(&oldest);
            log::debug!("evicted session {oldest}");
        }

        let sid = SessionId::generate();
        sessions.insert(sid, WebSession::new());
        log::debug!("opened session {sid}");
        sid
    }

    async fn try_respond<B>(&self, req: Request<B>) -> Result<Response<Body>, StatusCode>
    where
        B: hyper::body::Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let known = self.touch_session(&parts.headers);
        let sessions = &self.inner.sessions;
        let path = parts.uri.path();

        // Reads never create a session. Only accepted state-changing requests do.
        let limit = match (&parts.method, path) {
            (&Method::GET, "/") => return handler::index(sessions, known),
            (&Method::GET, "/api/quiz") => return handler::view(sessions, known),
            (&Method::POST, "/documents") => MAX_UPLOAD,
            (&Method::POST, "/quiz" | "/submit" | "/navigate" | "/reset") => MAX_FORM,
            (_, "/" | "/api/quiz" | "/documents" | "/quiz" | "/submit" | "/navigate" | "/reset") => {
                return Err(StatusCode::METHOD_NOT_ALLOWED)
            }
            _ => return Err(StatusCode::NOT_FOUND),
        };
        let payload = read_body(body, limit).await?;

        let (sid, fresh) = match known {
            Some(sid) => (sid, false),
            None => (self.open_session(), true),
        };

        let mut res = match path {
            "/documents" => {
                let query = parts.uri.query().unwrap_or_default();
                handler::upload(sessions, sid, self.inner.limits.max_pages, query, &payload)
            }
            "/quiz" => handler::start(sessions, &self.inner.pipeline, sid, &payload).await,
            "/submit" => handler::submit(sessions, sid, &payload),
            "/navigate" => handler::navigate(sessions, sid, &payload),
            "/reset" => handler::reset(sessions, sid),
            _ => Err(StatusCode::NOT_FOUND),
        }?;

        if fresh {
            let cookie = HeaderValue::from_str(&sid.to_cookie()).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            res.headers_mut().append(SET_COOKIE, cookie);
        }

        Ok(res)
    }
}
