use std::borrow::Cow;

/// Finds the first value of `name` in an `application/x-www-form-urlencoded` body.
pub fn field<'b>(body: &'b [u8], name: &str) -> Option<Cow<'b, str>> {
    form_urlencoded::parse(body).find_map(|(key, value)| (key == name).then_some(value))
}
