use lazy_static::lazy_static;
use regex::Regex;

/// Longest break the speech API accepts.
pub const MAX_PAUSE_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Slow,
    Fast,
    Emphasis,
    Spell,
    Whisper,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Text(&'a str),
    Pause { ms: Option<u32> },
    Open(Style),
    Close(Style),
}

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(
        r"(?x)
        \[pause(?::(\d+))?\]                          # [pause] or [pause:500]
        |
        \[(/?)(slow|fast|emphasis|spell|whisper)\]    # paired style tags
        "
    )
    .expect("tag regex is valid");
}

/// Split markup into text runs and tags. Unrecognised brackets stay in text.
pub fn parse(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for cap in TAG_REGEX.captures_iter(input) {
        let Some(m) = cap.get(0) else { continue };

        if m.start() > last_end {
            tokens.push(Token::Text(&input[last_end..m.start()]));
        }
        last_end = m.end();

        if let Some(style) = cap.get(3) {
            let style = match style.as_str() {
                "slow" => Style::Slow,
                "fast" => Style::Fast,
                "emphasis" => Style::Emphasis,
                "spell" => Style::Spell,
                _ => Style::Whisper,
            };
            let closing = cap.get(2).map(|s| s.as_str() == "/").unwrap_or(false);
            tokens.push(if closing {
                Token::Close(style)
            } else {
                Token::Open(style)
            });
        } else {
            // The regex only admits digits, so a parse failure is overflow.
            let ms = cap.get(1).map(|ms| {
                ms.as_str()
                    .parse::<u32>()
                    .map_or(MAX_PAUSE_MS, |ms| ms.min(MAX_PAUSE_MS))
            });
            tokens.push(Token::Pause { ms });
        }
    }

    if last_end < input.len() {
        tokens.push(Token::Text(&input[last_end..]));
    }

    tokens
}

/// True when the text contains at least one recognised tag.
pub fn has_markup(input: &str) -> bool {
    TAG_REGEX.is_match(input)
}
