//! Question narration. Fetches MP3 audio from the Google Translate TTS
//! endpoint (the same service the reference gTTS library wraps). Entirely
//! optional: the voice toggle or any synthesis failure degrades the feature
//! to an unavailable notice, never the process.

use thiserror::Error;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
const TTS_LANG: &str = "en";
const REQUEST_TIMEOUT_SECS: u64 = 10;
/// The TTS endpoint rejects long inputs; narration is clipped to this many
/// characters.
const MAX_TTS_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("voice narration is disabled")]
    Disabled,
    #[error("nothing to narrate")]
    EmptyText,
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

#[derive(Clone)]
pub struct Narrator {
    client: reqwest::Client,
    enabled: bool,
}

impl Narrator {
    pub fn new(enabled: bool) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Synthesizes the text to MP3 bytes.
    pub async fn narrate(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if !self.enabled {
            return Err(SpeechError::Disabled);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let text = clip_chars(text, MAX_TTS_CHARS);

        let response = self
            .client
            .get(TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", TTS_LANG),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Synthesis(format!(
                "TTS endpoint returned {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;
        if audio.is_empty() {
            return Err(SpeechError::Synthesis("empty audio response".to_string()));
        }
        Ok(audio.to_vec())
    }
}

fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_narrator_reports_unavailable() {
        let narrator = Narrator::new(false);
        assert!(matches!(
            narrator.narrate("Hello").await,
            Err(SpeechError::Disabled)
        ));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_any_request() {
        let narrator = Narrator::new(true);
        assert!(matches!(
            narrator.narrate("   ").await,
            Err(SpeechError::EmptyText)
        ));
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip_chars("hello", 10), "hello");
        assert_eq!(clip_chars("héllo wörld", 4), "héll");
    }
}
