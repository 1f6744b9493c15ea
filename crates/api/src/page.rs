use core::fmt::Write;
use model::Page;
use quiz::View;

const STYLE: &str = "body{font-family:sans-serif;max-width:42rem;margin:2rem auto;padding:0 1rem}\
    .notice{padding:.75rem;border-radius:.25rem;background:#fdecea}\
    .correct{padding:.75rem;background:#e6f4ea}.incorrect{padding:.75rem;background:#fdecea}\
    fieldset{border:none;padding:0}label{display:block;margin:.35rem 0}";

const UPLOAD_SCRIPT: &str = r#"
document.getElementById('ingest').addEventListener('submit', async (event) => {
    event.preventDefault();
    const form = event.target;
    for (const file of document.getElementById('files').files) {
        const res = await fetch('/documents?name=' + encodeURIComponent(file.name), {
            method: 'POST',
            headers: { 'Content-Type': 'application/pdf' },
            body: file,
        });
        if (!res.ok) {
            alert(await res.text());
            return;
        }
    }
    form.submit();
});
"#;

/// Escapes text for use in HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
        <title>Quiz Builder</title><style>{STYLE}</style></head><body>{body}</body></html>"
    )
}

fn notice(html: &mut String, message: Option<&str>) {
    if let Some(message) = message {
        let _ = write!(html, "<p class=\"notice\" role=\"alert\">{}</p>", escape(message));
    }
}

/// The ingestion form shown while no quiz is in progress.
pub fn render_upload(pending: &[Page], message: Option<&str>) -> String {
    let mut html = String::from("<h1>Quiz Builder</h1>");
    notice(&mut html, message);
    html.push_str("<p>Select PDFs for ingestion, the topic for the quiz, and click Generate!</p>");

    if !pending.is_empty() {
        let mut sources: Vec<&str> = pending.iter().map(|page| &*page.source).collect();
        sources.dedup();
        let _ = write!(
            html,
            "<p>{} pages already loaded from {}.</p>",
            pending.len(),
            escape(&sources.join(", "))
        );
    }

    html.push_str(
        "<form id=\"ingest\" method=\"post\" action=\"/quiz\">\
        <label>PDF documents <input id=\"files\" type=\"file\" accept=\"application/pdf\" multiple></label>\
        <label>Topic for Generative Quiz \
        <input name=\"topic\" placeholder=\"Enter the topic of the document\" required></label>\
        <label>Number of Questions <input name=\"count\" type=\"number\" min=\"1\" max=\"10\" value=\"1\"></label>\
        <button type=\"submit\">Generate</button></form>",
    );
    let _ = write!(html, "<script>{UPLOAD_SCRIPT}</script>");
    layout(&html)
}

/// The current question with its choices, navigation, and any grading outcome.
pub fn render_question(view: &View<'_>, message: Option<&str>) -> String {
    let mut html = String::from("<h1>Generated Quiz Question:</h1>");
    notice(&mut html, message);

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/submit\"><p><strong>{}. {}</strong></p>\
        <fieldset><legend>Choose an answer</legend>",
        view.index + 1,
        escape(view.question)
    );
    for choice in view.choices {
        let rendered = escape(&choice.to_string());
        let _ = write!(html, "<label><input type=\"radio\" name=\"choice\" value=\"{rendered}\"> {rendered}</label>");
    }
    html.push_str("</fieldset><button type=\"submit\">Submit</button></form>");

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/navigate\">\
        <button name=\"direction\" value=\"-1\">Previous Question</button> \
        <button name=\"direction\" value=\"1\">Next Question</button></form>\
        <p>Question {} of {}</p>",
        view.index + 1,
        view.total
    );

    if let Some(grade) = view.grade {
        let (class, verdict) = if grade.correct { ("correct", "Correct!") } else { ("incorrect", "Incorrect!") };
        let _ = write!(
            html,
            "<div class=\"{class}\"><p>{verdict}</p><p>Explanation: {}</p></div>",
            escape(&grade.explanation)
        );
    }

    html.push_str("<form method=\"post\" action=\"/reset\"><button type=\"submit\">New Quiz</button></form>");
    layout(&html)
}
