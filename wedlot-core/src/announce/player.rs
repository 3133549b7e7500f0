use crate::announce::provider::SpeechAudio;
use crate::error::SpeechError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Plays provider audio.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: &SpeechAudio) -> Result<(), SpeechError>;
}

/// Pipes audio into an external player such as `mpg123 -q -`.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl AudioSink for CommandPlayer {
    async fn play(&self, audio: &SpeechAudio) -> Result<(), SpeechError> {
        let path = which::which(&self.program)
            .map_err(|e| SpeechError::Playback(format!("{} not found: {}", self.program, e)))?;

        let mut child = Command::new(&path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Playback(format!("failed to start {}: {}", path.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&audio.bytes)
                .await
                .map_err(|e| SpeechError::Playback(format!("failed to feed player: {}", e)))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SpeechError::Playback(e.to_string()))?;
        if !status.success() {
            return Err(SpeechError::Playback(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> SpeechAudio {
        SpeechAudio {
            bytes: vec![0u8; 16],
            content_type: "audio/mpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_player() {
        let player = CommandPlayer::new("wedlot-no-such-player", vec![]);
        let err = player.play(&audio()).await.unwrap_err();
        assert!(matches!(err, SpeechError::Playback(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_player_exit_status_is_checked() {
        let ok = CommandPlayer::new("cat", vec![]);
        ok.play(&audio()).await.unwrap();

        let failing = CommandPlayer::new("false", vec![]);
        assert!(failing.play(&audio()).await.is_err());
    }
}
