use core::fmt::{self, Display};
use hyper::HeaderMap;

const COOKIE_NAME: &[u8] = b"sid";

/// Random identifier of one browser session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId([u8; 16]);

impl SessionId {
    pub fn generate() -> Self {
        Self(rand::random())
    }

    fn parse(hex_bytes: &[u8]) -> Option<Self> {
        let mut id = [0; 16];
        hex::decode_to_slice(hex_bytes, &mut id).ok()?;
        Some(Self(id))
    }

    /// Value for a `Set-Cookie` header that binds the browser to this session.
    pub fn to_cookie(self) -> String {
        format!("sid={self}; HttpOnly; SameSite=Lax; Path=/")
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Extracts the session ID from the `Cookie` headers, if present and well-formed.
pub fn extract_session(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(hyper::header::COOKIE)
        .iter()
        .flat_map(|value| value.as_bytes().split(|&byte| byte == b';'))
        .filter_map(|section| {
            let mid = section.iter().copied().position(|byte| byte == b'=')?;
            let (left, right) = section.split_at(mid);
            Some((left.trim_ascii(), right[1..].trim_ascii()))
        })
        .find_map(|(key, session)| (key == COOKIE_NAME).then_some(session))
        .and_then(SessionId::parse)
}

#[cfg(test)]
mod tests {
    use super::{extract_session, SessionId};
    use hyper::{
        header::{HeaderValue, COOKIE},
        HeaderMap,
    };

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let id = SessionId::generate();
        let found = extract_session(&headers(&format!("theme=dark; sid={id}; lang=en")));
        assert_eq!(found, Some(id));
    }

    #[test]
    fn rejects_missing_or_malformed_session() {
        assert_eq!(extract_session(&HeaderMap::new()), None);
        assert_eq!(extract_session(&headers("theme=dark")), None);
        assert_eq!(extract_session(&headers("sid=not-hex")), None);
        assert_eq!(extract_session(&headers("sid=abcd")), None);
    }

    #[test]
    fn cookie_round_trips_through_header() {
        let id = SessionId::generate();
        let cookie = id.to_cookie();
        let pair = cookie.split(';').next().unwrap();
        assert_eq!(extract_session(&headers(pair)), Some(id));
        assert!(cookie.contains("HttpOnly"));
    }
}
