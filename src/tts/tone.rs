use std::fmt;
use std::str::FromStr;

use crate::backends::Prosody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Default,
    Slow,
    Fast,
    Happy,
    Sad,
    Excited,
    Calm,
    Whisper,
}

#[derive(thiserror::Error, Debug)]
#[error("Unsupported tone '{0}' (expected one of: default, slow, fast, happy, sad, excited, calm, whisper)")]
pub struct UnknownTone(pub String);

impl Tone {
    pub const ALL: [Tone; 8] = [
        Tone::Default,
        Tone::Slow,
        Tone::Fast,
        Tone::Happy,
        Tone::Sad,
        Tone::Excited,
        Tone::Calm,
        Tone::Whisper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Default => "default",
            Tone::Slow => "slow",
            Tone::Fast => "fast",
            Tone::Happy => "happy",
            Tone::Sad => "sad",
            Tone::Excited => "excited",
            Tone::Calm => "calm",
            Tone::Whisper => "whisper",
        }
    }

    pub fn prosody(self) -> Prosody {
        let (speaking_rate, pitch, volume_gain_db) = match self {
            Tone::Default => (1.0, 0.0, 0.0),
            Tone::Slow => (0.75, 0.0, 0.0),
            Tone::Fast => (1.25, 0.0, 0.0),
            Tone::Happy => (1.1, 2.0, 1.0),
            Tone::Sad => (0.85, -2.0, -2.0),
            Tone::Excited => (1.2, 4.0, 3.0),
            Tone::Calm => (0.9, -1.0, -1.0),
            Tone::Whisper => (0.9, -1.0, -6.0),
        };
        Prosody {
            speaking_rate,
            pitch,
            volume_gain_db,
        }
    }
}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Ok(Tone::Default);
        }
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Slow".parse::<Tone>().unwrap(), Tone::Slow);
        assert_eq!(" WHISPER ".parse::<Tone>().unwrap(), Tone::Whisper);
    }

    #[test]
    fn empty_tone_is_default() {
        assert_eq!("".parse::<Tone>().unwrap(), Tone::Default);
    }

    #[test]
    fn unknown_tone_is_rejected() {
        let err = "angry".parse::<Tone>().unwrap_err();
        assert!(err.to_string().contains("angry"));
    }

    #[test]
    fn names_round_trip() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>().unwrap(), tone);
        }
    }

    #[test]
    fn default_is_neutral() {
        let p = Tone::Default.prosody();
        assert_eq!((p.speaking_rate, p.pitch, p.volume_gain_db), (1.0, 0.0, 0.0));
        assert!(Tone::Slow.prosody().speaking_rate < 1.0);
        assert!(Tone::Fast.prosody().speaking_rate > 1.0);
        assert!(Tone::Whisper.prosody().volume_gain_db < 0.0);
    }
}
