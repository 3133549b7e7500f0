use crate::config::VoiceParams;
use crate::error::SpeechError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

const ESPEAK_BASE_WPM: f32 = 175.0;
const ESPEAK_BASE_PITCH: f32 = 50.0;

/// Speech synthesized on this machine.
#[async_trait]
pub trait LocalSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, voice: &VoiceParams) -> Result<(), SpeechError>;
}

/// Drives `espeak-ng` (or classic `espeak`) found on `PATH`.
pub struct EspeakSynthesizer {
    candidates: Vec<String>,
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::with_candidates(vec!["espeak-ng".to_string(), "espeak".to_string()])
    }
}

impl EspeakSynthesizer {
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    fn locate(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find_map(|program| which::which(program).ok())
    }
}

/// Maps language tags onto espeak voice names.
fn espeak_voice(language: &str) -> &str {
    match language.to_lowercase().as_str() {
        "zh" | "zh-cn" | "cmn" => "cmn",
        "zh-hk" | "yue" => "yue",
        _ => language,
    }
}

pub fn espeak_args(text: &str, voice: &VoiceParams) -> Vec<String> {
    let wpm = (ESPEAK_BASE_WPM * voice.rate).round() as u32;
    let pitch = (ESPEAK_BASE_PITCH * voice.pitch).round().clamp(0.0, 99.0) as u32;

    vec![
        "-v".to_string(),
        espeak_voice(&voice.language).to_string(),
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        text.to_string(),
    ]
}

#[async_trait]
impl LocalSynthesizer for EspeakSynthesizer {
    async fn speak(&self, text: &str, voice: &VoiceParams) -> Result<(), SpeechError> {
        let program = self.locate().ok_or_else(|| {
            SpeechError::LocalUnavailable(format!(
                "none of {} found in PATH",
                self.candidates.join(", ")
            ))
        })?;

        let status = Command::new(&program)
            .args(espeak_args(text, voice))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| SpeechError::LocalFailed(format!("{}: {}", program.display(), e)))?;

        if !status.success() {
            return Err(SpeechError::LocalFailed(format!(
                "{} exited with {}",
                program.display(),
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice_args() {
        let args = espeak_args("恭喜", &VoiceParams::default());
        assert_eq!(args, vec!["-v", "cmn", "-s", "140", "-p", "60", "恭喜"]);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let voice = VoiceParams {
            language: "en".to_string(),
            rate: 1.0,
            pitch: 3.0,
        };
        let args = espeak_args("hi", &voice);
        assert_eq!(args, vec!["-v", "en", "-s", "175", "-p", "99", "hi"]);
    }

    #[tokio::test]
    async fn test_unavailable_engine() {
        let synth = EspeakSynthesizer::with_candidates(vec!["wedlot-no-such-tts".to_string()]);
        let err = synth
            .speak("恭喜", &VoiceParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::LocalUnavailable(_)));
    }
}
