//! Winner announcements.
//!
//! The networked provider is tried first; any failure there (transport,
//! status, non-audio payload or playback) falls back once to on-device
//! speech. Nothing here ever returns an error to the caller.

pub mod local;
pub mod player;
pub mod provider;
pub mod signing;

pub use local::{EspeakSynthesizer, LocalSynthesizer};
pub use player::{AudioSink, CommandPlayer};
pub use provider::{HttpSpeechProvider, SpeechAudio, SpeechProvider};
pub use signing::SignedRequest;

use crate::config::{SpeechConfig, VoiceParams};
use crate::error::{Result, SpeechError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

const BLESSING: &str = "让幸运之神为新人送上祝福。";

/// Builds the spoken phrase for one or two winners.
pub fn compose_phrase<S: AsRef<str>>(names: &[S]) -> Option<String> {
    match names {
        [a, b] => Some(format!(
            "{}恭喜{}和{}中奖！愿你们幸福美满！",
            BLESSING,
            a.as_ref(),
            b.as_ref()
        )),
        [a] => Some(format!("{}恭喜{}中奖！愿你幸福美满！", BLESSING, a.as_ref())),
        _ => None,
    }
}

/// Which path ended up delivering the announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnounceOutcome {
    Provider,
    Fallback,
    Skipped,
}

pub struct Announcer {
    provider: Option<Arc<dyn SpeechProvider>>,
    sink: Arc<dyn AudioSink>,
    local: Arc<dyn LocalSynthesizer>,
    voice: VoiceParams,
}

impl Announcer {
    pub fn new(
        provider: Option<Arc<dyn SpeechProvider>>,
        sink: Arc<dyn AudioSink>,
        local: Arc<dyn LocalSynthesizer>,
        voice: VoiceParams,
    ) -> Self {
        Self {
            provider,
            sink,
            local,
            voice,
        }
    }

    /// Wires the HTTP provider (when credentials are configured), the
    /// configured audio player and espeak.
    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        let provider: Option<Arc<dyn SpeechProvider>> = if config.has_credentials() {
            Some(Arc::new(HttpSpeechProvider::new(config.clone())?))
        } else {
            tracing::info!("No speech provider credentials, announcements use on-device speech");
            None
        };

        Ok(Self::new(
            provider,
            Arc::new(CommandPlayer::new(
                config.player.clone(),
                config.player_args.clone(),
            )),
            Arc::new(EspeakSynthesizer::default()),
            config.local_voice.clone(),
        ))
    }

    pub async fn announce<S: AsRef<str>>(&self, names: &[S]) -> AnnounceOutcome {
        match compose_phrase(names) {
            Some(text) => self.speak(&text).await,
            None => {
                tracing::warn!("Nothing to announce for {} names", names.len());
                AnnounceOutcome::Skipped
            }
        }
    }

    pub async fn speak(&self, text: &str) -> AnnounceOutcome {
        if let Some(provider) = &self.provider {
            match self.speak_remote(provider.as_ref(), text).await {
                Ok(()) => return AnnounceOutcome::Provider,
                Err(e) => tracing::warn!("Speech provider failed, using on-device speech: {}", e),
            }
        }

        match self.local.speak(text, &self.voice).await {
            Ok(()) => AnnounceOutcome::Fallback,
            Err(e) => {
                tracing::warn!("Announcement skipped: {}", e);
                AnnounceOutcome::Skipped
            }
        }
    }

    async fn speak_remote(
        &self,
        provider: &dyn SpeechProvider,
        text: &str,
    ) -> std::result::Result<(), SpeechError> {
        let audio = provider.synthesize(text).await?;
        self.sink.play(&audio).await
    }

    /// Fire-and-forget announcement on the runtime.
    pub fn spawn(self: &Arc<Self>, names: Vec<String>) -> JoinHandle<AnnounceOutcome> {
        let announcer = Arc::clone(self);
        tokio::spawn(async move { announcer.announce(&names).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls(AtomicUsize);

    impl Calls {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FakeProvider {
        calls: Calls,
        audio: bool,
    }

    #[async_trait]
    impl SpeechProvider for FakeProvider {
        async fn synthesize(&self, _text: &str) -> std::result::Result<SpeechAudio, SpeechError> {
            self.calls.hit();
            if self.audio {
                Ok(SpeechAudio {
                    bytes: vec![1, 2, 3],
                    content_type: "audio/mpeg".to_string(),
                })
            } else {
                Err(SpeechError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            }
        }
    }

    struct FakeSink {
        calls: Calls,
        ok: bool,
    }

    #[async_trait]
    impl AudioSink for FakeSink {
        async fn play(&self, _audio: &SpeechAudio) -> std::result::Result<(), SpeechError> {
            self.calls.hit();
            if self.ok {
                Ok(())
            } else {
                Err(SpeechError::Playback("no device".to_string()))
            }
        }
    }

    struct FakeLocal {
        calls: Calls,
        ok: bool,
        last_text: parking_lot::Mutex<Option<String>>,
    }

    #[async_trait]
    impl LocalSynthesizer for FakeLocal {
        async fn speak(&self, text: &str, voice: &VoiceParams) -> std::result::Result<(), SpeechError> {
            self.calls.hit();
            assert_eq!(voice, &VoiceParams::default());
            *self.last_text.lock() = Some(text.to_string());
            if self.ok {
                Ok(())
            } else {
                Err(SpeechError::LocalUnavailable("no engine".to_string()))
            }
        }
    }

    struct Rig {
        provider: Arc<FakeProvider>,
        sink: Arc<FakeSink>,
        local: Arc<FakeLocal>,
        announcer: Arc<Announcer>,
    }

    fn rig(provider_audio: bool, sink_ok: bool, local_ok: bool) -> Rig {
        let provider = Arc::new(FakeProvider {
            calls: Calls::default(),
            audio: provider_audio,
        });
        let sink = Arc::new(FakeSink {
            calls: Calls::default(),
            ok: sink_ok,
        });
        let local = Arc::new(FakeLocal {
            calls: Calls::default(),
            ok: local_ok,
            last_text: parking_lot::Mutex::new(None),
        });
        let announcer = Arc::new(Announcer::new(
            Some(provider.clone() as Arc<dyn SpeechProvider>),
            sink.clone(),
            local.clone(),
            VoiceParams::default(),
        ));
        Rig {
            provider,
            sink,
            local,
            announcer,
        }
    }

    #[test]
    fn test_compose_phrase() {
        assert_eq!(
            compose_phrase(&["张三", "李四"]).unwrap(),
            "让幸运之神为新人送上祝福。恭喜张三和李四中奖！愿你们幸福美满！"
        );
        assert_eq!(
            compose_phrase(&["张三"]).unwrap(),
            "让幸运之神为新人送上祝福。恭喜张三中奖！愿你幸福美满！"
        );
        let none: [&str; 0] = [];
        assert!(compose_phrase(&none).is_none());
        assert!(compose_phrase(&["a", "b", "c"]).is_none());
    }

    #[tokio::test]
    async fn test_provider_success_skips_fallback() {
        let rig = rig(true, true, true);
        let outcome = rig.announcer.announce(&["张三", "李四"]).await;

        assert_eq!(outcome, AnnounceOutcome::Provider);
        assert_eq!(rig.provider.calls.count(), 1);
        assert_eq!(rig.sink.calls.count(), 1);
        assert_eq!(rig.local.calls.count(), 0);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_once() {
        let rig = rig(false, true, true);
        let outcome = rig.announcer.announce(&["张三", "李四"]).await;

        assert_eq!(outcome, AnnounceOutcome::Fallback);
        assert_eq!(rig.provider.calls.count(), 1);
        assert_eq!(rig.sink.calls.count(), 0);
        assert_eq!(rig.local.calls.count(), 1);
        assert_eq!(
            rig.local.last_text.lock().as_deref(),
            Some("让幸运之神为新人送上祝福。恭喜张三和李四中奖！愿你们幸福美满！")
        );
    }

    #[tokio::test]
    async fn test_playback_failure_falls_back() {
        let rig = rig(true, false, true);
        assert_eq!(
            rig.announcer.announce(&["张三"]).await,
            AnnounceOutcome::Fallback
        );
        assert_eq!(rig.local.calls.count(), 1);
    }

    #[tokio::test]
    async fn test_everything_down_is_silent() {
        let rig = rig(false, false, false);
        assert_eq!(
            rig.announcer.announce(&["张三", "李四"]).await,
            AnnounceOutcome::Skipped
        );
        assert_eq!(rig.local.calls.count(), 1);
    }

    #[tokio::test]
    async fn test_no_provider_goes_straight_to_local() {
        let local = Arc::new(FakeLocal {
            calls: Calls::default(),
            ok: true,
            last_text: parking_lot::Mutex::new(None),
        });
        let sink = Arc::new(FakeSink {
            calls: Calls::default(),
            ok: true,
        });
        let announcer = Announcer::new(None, sink.clone(), local.clone(), VoiceParams::default());

        assert_eq!(
            announcer.announce(&["张三", "李四"]).await,
            AnnounceOutcome::Fallback
        );
        assert_eq!(sink.calls.count(), 0);
        assert_eq!(local.calls.count(), 1);
    }

    #[tokio::test]
    async fn test_spawned_announcement() {
        let rig = rig(false, true, true);
        let handle = rig
            .announcer
            .spawn(vec!["张三".to_string(), "李四".to_string()]);
        assert_eq!(handle.await.unwrap(), AnnounceOutcome::Fallback);
    }
}
