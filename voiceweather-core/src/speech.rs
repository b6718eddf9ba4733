use std::path::PathBuf;

use reqwest::Client;
use tokio::process::Command;

use crate::error::SpeechError;
use crate::model::WeatherReport;
use crate::phrase;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
const AUDIO_FILE_NAME: &str = "weather.mp3";

/// Language tags accepted by the synthesis endpoint. Checked before any
/// I/O so an unsupported tag is a structured error, not a message to sniff.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "bg", "bn", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "fi", "fr", "gu",
    "hi", "hr", "hu", "id", "is", "it", "ja", "kn", "ko", "la", "lv", "ml", "mr", "ms", "my", "ne",
    "nl", "no", "pl", "pt", "pt-br", "ro", "ru", "si", "sk", "sq", "sr", "su", "sv", "sw", "ta",
    "te", "th", "tl", "tr", "uk", "ur", "vi", "zh-cn", "zh-tw",
];

pub fn is_supported_language(lang: &str) -> bool {
    SUPPORTED_LANGUAGES
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(lang))
}

/// Synthesizes a sentence to an MP3 clip and plays it through an external
/// player process. The clip lives in a temporary file for the duration of
/// playback and is removed afterwards.
#[derive(Debug, Clone)]
pub struct Announcer {
    http: Client,
    endpoint: String,
    player: String,
    audio_path: PathBuf,
}

impl Announcer {
    /// `player` is the playback command, e.g. `"mpg123 -q"`; the clip path
    /// is appended as its last argument.
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: TTS_URL.to_string(),
            player: player.into(),
            audio_path: std::env::temp_dir().join(AUDIO_FILE_NAME),
        }
    }

    /// Point the announcer at an alternative synthesis endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Write the clip somewhere other than the system temp directory.
    pub fn with_audio_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio_path = path.into();
        self
    }

    /// Resolve the language, format the sentence for the report, and speak it.
    pub async fn speak_weather(
        &self,
        weather: &WeatherReport,
        lang: &str,
    ) -> Result<bool, SpeechError> {
        let lang = phrase::resolve_language(lang);
        let sentence = phrase::format_phrase(lang, weather);
        self.announce(&sentence, lang).await
    }

    /// Speak a sentence. `Ok(true)` means the clip played to completion.
    ///
    /// An unsupported language tag is the only error that escapes; synthesis
    /// and playback failures are logged and reported as `Ok(false)`.
    pub async fn announce(&self, sentence: &str, lang: &str) -> Result<bool, SpeechError> {
        if !is_supported_language(lang) {
            return Err(SpeechError::UnsupportedLanguage(lang.to_string()));
        }

        tracing::info!("Starting voice assistant");

        match self.synthesize_and_play(sentence, lang).await {
            Ok(()) => {
                tracing::debug!("Shutting down voice assistant");
                Ok(true)
            }
            Err(err) => {
                tracing::error!("{err}");
                Ok(false)
            }
        }
    }

    async fn synthesize_and_play(&self, sentence: &str, lang: &str) -> Result<(), SpeechError> {
        let audio = self.synthesize(sentence, lang).await?;

        tokio::fs::write(&self.audio_path, &audio).await?;
        let played = self.play().await;

        // The clip is removed whether or not playback succeeded.
        if let Err(err) = tokio::fs::remove_file(&self.audio_path).await {
            tracing::warn!(
                path = %self.audio_path.display(),
                "Failed to remove audio file: {err}"
            );
        }

        played
    }

    async fn synthesize(&self, sentence: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
        tracing::debug!(%lang, "Synthesizing announcement");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", sentence),
            ])
            .send()
            .await
            .map_err(|err| SpeechError::Synthesis(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SpeechError::Synthesis(format!(
                "synthesis endpoint returned status {status}"
            )));
        }

        let audio = res
            .bytes()
            .await
            .map_err(|err| SpeechError::Synthesis(err.to_string()))?
            .to_vec();

        if audio.is_empty() {
            return Err(SpeechError::Synthesis(
                "synthesis endpoint returned an empty clip".to_string(),
            ));
        }

        Ok(audio)
    }

    async fn play(&self) -> Result<(), SpeechError> {
        let mut parts = self.player.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SpeechError::Playback("no audio player configured".to_string()))?;

        let status = Command::new(program)
            .args(parts)
            .arg(&self.audio_path)
            .status()
            .await
            .map_err(|err| SpeechError::Playback(format!("failed to launch '{program}': {err}")))?;

        if !status.success() {
            return Err(SpeechError::Playback(format!(
                "'{program}' exited with {status}"
            )));
        }

        Ok(())
    }
}
