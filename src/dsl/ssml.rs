use super::parser::{Style, Token};

const DEFAULT_PAUSE_MS: u32 = 300;

fn open_tag(style: Style) -> &'static str {
    match style {
        Style::Slow => r#"<prosody rate="slow">"#,
        Style::Fast => r#"<prosody rate="fast">"#,
        Style::Emphasis => r#"<emphasis level="strong">"#,
        Style::Spell => r#"<say-as interpret-as="characters">"#,
        Style::Whisper => r#"<prosody volume="x-soft">"#,
    }
}

fn close_tag(style: Style) -> &'static str {
    match style {
        Style::Emphasis => "</emphasis>",
        Style::Spell => "</say-as>",
        Style::Slow | Style::Fast | Style::Whisper => "</prosody>",
    }
}

/// Render tokens as a `<speak>` document. Stray closing tags are dropped and
/// unclosed ones are closed at the end, so the output is always well formed.
pub fn render(tokens: &[Token<'_>]) -> String {
    let mut out = String::from("<speak>");
    let mut open: Vec<Style> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => escape_into(&mut out, text),
            Token::Pause { ms } => {
                out.push_str(&format!(
                    r#"<break time="{}ms"/>"#,
                    ms.unwrap_or(DEFAULT_PAUSE_MS)
                ));
            }
            Token::Open(style) => {
                open.push(*style);
                out.push_str(open_tag(*style));
            }
            Token::Close(style) => {
                if open.last() == Some(style) {
                    open.pop();
                    out.push_str(close_tag(*style));
                }
            }
        }
    }

    while let Some(style) = open.pop() {
        out.push_str(close_tag(style));
    }

    out.push_str("</speak>");
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}
