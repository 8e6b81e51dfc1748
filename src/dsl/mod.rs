pub mod parser;
pub mod ssml;

use crate::backends::SpeechInput;

/// Plain text goes to the backend unchanged; marked-up text becomes SSML.
pub fn to_speech_input(text: &str) -> SpeechInput {
    if parser::has_markup(text) {
        SpeechInput::Ssml(ssml::render(&parser::parse(text)))
    } else {
        SpeechInput::Text(text.to_string())
    }
}
