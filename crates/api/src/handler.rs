use crate::{
    error::Error,
    ingest, page,
    util::{form, session::SessionId},
    Body, Pipeline, Registry,
};
use hyper::{
    header::{HeaderValue, CONTENT_TYPE, LOCATION},
    Response, StatusCode,
};
use quiz::{error::Error as QuizError, Direction};

type Handled = Result<Response<Body>, StatusCode>;

const DEFAULT_SOURCE: &str = "document.pdf";

fn respond(code: StatusCode, mime: &'static str, body: String) -> Response<Body> {
    let mut res = Response::new(Body::from(body));
    *res.status_mut() = code;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(mime));
    res
}

fn html(body: String) -> Response<Body> {
    respond(StatusCode::OK, "text/html; charset=utf-8", body)
}

fn json(code: StatusCode, body: String) -> Response<Body> {
    respond(code, "application/json", body)
}

/// Sends the browser back to the main page after a state change.
fn redirect() -> Response<Body> {
    let mut res = Response::new(Body::default());
    *res.status_mut() = StatusCode::SEE_OTHER;
    res.headers_mut().insert(LOCATION, HeaderValue::from_static("/"));
    res
}

pub fn index(sessions: &Registry, sid: Option<SessionId>) -> Handled {
    let Some(mut entry) = sid.and_then(|sid| sessions.get_mut(&sid)) else {
        return Ok(html(page::render_upload(&[], None)));
    };
    let key = *entry.key();
    let session = &mut *entry;
    let notice = session.notice.take();

    let body = match &session.quiz {
        Some(quiz) => {
            let view = quiz.view().map_err(|err| {
                log::error!("session {key} has an unreadable cursor: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            page::render_question(&view, notice.as_deref())
        }
        None => page::render_upload(&session.pages, notice.as_deref()),
    };

    Ok(html(body))
}

/// The current question as JSON. Idle sessions have nothing to show.
pub fn view(sessions: &Registry, sid: Option<SessionId>) -> Handled {
    let entry = sid.and_then(|sid| sessions.get(&sid)).ok_or(StatusCode::NOT_FOUND)?;
    let quiz = entry.quiz.as_ref().ok_or(StatusCode::NOT_FOUND)?;
    let view = quiz.view().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let body = serde_json::to_string(&view).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(json(StatusCode::OK, body))
}

/// Adds the pages of one PDF to the session's pending documents, up to `max_pages` in total.
pub fn upload(sessions: &Registry, sid: SessionId, max_pages: usize, query: &str, pdf: &[u8]) -> Handled {
    let name = form::field(query.as_bytes(), "name");
    let source = name.as_deref().map(str::trim).filter(|name| !name.is_empty()).unwrap_or(DEFAULT_SOURCE);

    let pages = match ingest::load_pdf(source, pdf) {
        Ok(pages) => pages,
        Err(err) => return Ok(respond(StatusCode::UNPROCESSABLE_ENTITY, "text/plain; charset=utf-8", err.to_string())),
    };

    let count = pages.len();
    let mut entry = sessions.get_mut(&sid).ok_or(StatusCode::NOT_FOUND)?;
    if entry.pages.len() + count > max_pages {
        let err = Error::TooManyPages { limit: max_pages };
        log::warn!("session {sid} rejected {source}: {err}");
        return Ok(respond(StatusCode::PAYLOAD_TOO_LARGE, "text/plain; charset=utf-8", err.to_string()));
    }

    entry.pages.extend(pages);
    Ok(json(StatusCode::CREATED, format!("{{\"pages\":{count}}}")))
}

/// Builds a quiz from the pending pages. On failure the session keeps whatever state it
/// had and the reason is shown on the next page.
pub async fn start(sessions: &Registry, pipeline: &Pipeline, sid: SessionId, body: &[u8]) -> Handled {
    let topic = form::field(body, "topic").unwrap_or_default();
    let count = form::field(body, "count").and_then(|count| count.trim().parse().ok()).unwrap_or(0);

    // The registry guard must not live across the collaborator calls.
    let (pages, generation) = {
        let entry = sessions.get(&sid).ok_or(StatusCode::NOT_FOUND)?;
        (entry.pages.clone(), entry.generation)
    };
    let outcome = pipeline.build_quiz(&pages, &topic, count).await;

    let mut entry = sessions.get_mut(&sid).ok_or(StatusCode::NOT_FOUND)?;
    if entry.generation != generation {
        log::info!("session {sid} was reset while its quiz was being built");
        return Ok(redirect());
    }

    match outcome {
        Ok(quiz) => {
            log::info!("session {sid} started a quiz of {} questions on {}", quiz.len(), topic.trim());
            entry.quiz = Some(quiz);
            entry.notice = None;
        }
        Err(err) => {
            log::warn!("session {sid} could not start a quiz: {err}");
            entry.notice = Some(err.to_string().into_boxed_str());
        }
    }

    Ok(redirect())
}

pub fn submit(sessions: &Registry, sid: SessionId, body: &[u8]) -> Handled {
    let mut entry = sessions.get_mut(&sid).ok_or(StatusCode::NOT_FOUND)?;
    let session = &mut *entry;

    let Some(quiz) = session.quiz.as_mut() else {
        session.notice = Some(QuizError::EmptyBank.to_string().into_boxed_str());
        return Ok(redirect());
    };

    // Submitting with nothing selected leaves the question as it was.
    let Some(choice) = form::field(body, "choice") else {
        return Ok(redirect());
    };

    let grade = quiz.submit(&choice).map_err(|err| {
        log::error!("session {sid} cannot grade its current question: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    log::debug!("session {sid} answered question {}: correct={}", quiz.cursor() + 1, grade.correct);
    Ok(redirect())
}

pub fn navigate(sessions: &Registry, sid: SessionId, body: &[u8]) -> Handled {
    let direction = form::field(body, "direction")
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let direction = Direction::try_from(direction).map_err(|err| {
        log::warn!("session {sid} sent {err}");
        StatusCode::BAD_REQUEST
    })?;

    let mut entry = sessions.get_mut(&sid).ok_or(StatusCode::NOT_FOUND)?;
    let session = &mut *entry;
    match session.quiz.as_mut() {
        Some(quiz) => {
            quiz.navigate(direction);
        }
        None => session.notice = Some(QuizError::EmptyBank.to_string().into_boxed_str()),
    }

    Ok(redirect())
}

/// Discards the quiz and the pending documents, returning the session to idle.
pub fn reset(sessions: &Registry, sid: SessionId) -> Handled {
    let mut entry = sessions.get_mut(&sid).ok_or(StatusCode::NOT_FOUND)?;
    entry.quiz = None;
    entry.pages.clear();
    entry.notice = None;
    entry.generation += 1;
    Ok(redirect())
}
