//! Desktop Media Engine Implementation
//!
//! Prepares local files by probing them with Symphonia and exposes a handle
//! whose position is driven by the runtime clock. Completion is signalled by a
//! timer task armed on `start` and cancelled on `pause`, `seek_to`, `stop` and
//! `release`.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    media::{MediaEngine, MediaEventListener, MediaHandle, MediaHandleEvent},
};
use core_async::sync::CancellationToken;
use core_async::time::{sleep, Instant};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, instrument, warn};

const FILE_SCHEME: &str = "file://";

/// File extensions the desktop engine will try to prepare.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "wav", "m4a", "aac", "opus", "wma", "aif", "aiff",
];

/// Symphonia-backed media engine for local files.
#[derive(Debug, Clone, Default)]
pub struct DesktopMediaEngine;

impl DesktopMediaEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Map a source identifier to a filesystem path.
fn resolve_path(source: &str) -> PathBuf {
    PathBuf::from(source.strip_prefix(FILE_SCHEME).unwrap_or(source))
}

/// `true` if `path` carries a known audio extension. Case-insensitive.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn map_probe_error(err: SymphoniaError) -> BridgeError {
    match err {
        SymphoniaError::Unsupported(what) => BridgeError::media("unsupported_format", what),
        SymphoniaError::IoError(e) => BridgeError::media("io_error", e.to_string()),
        other => BridgeError::media("decode_failed", other.to_string()),
    }
}

/// Probe the container and codec, returning the track duration if known.
fn probe_duration(path: &Path) -> Result<Option<Duration>> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BridgeError::NotFound(path.display().to_string()),
        _ => BridgeError::Io(e),
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let media_source = Box::new(file) as Box<dyn MediaSource>;
    let mss = MediaSourceStream::new(media_source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(map_probe_error)?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| BridgeError::media("no_audio_track", "No supported audio tracks"))?;

    // Fail preparation now rather than on first start if no decoder exists.
    symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(map_probe_error)?;

    let duration = match (track.codec_params.n_frames, track.codec_params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => {
            Some(Duration::from_secs_f64(frames as f64 / rate as f64))
        }
        _ => None,
    };

    Ok(duration)
}

#[async_trait]
impl MediaEngine for DesktopMediaEngine {
    async fn source_exists(&self, source: &str) -> bool {
        match tokio::fs::metadata(resolve_path(source)).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }

    #[instrument(skip(self, listener))]
    async fn prepare(
        &self,
        source: &str,
        listener: MediaEventListener,
    ) -> Result<Box<dyn MediaHandle>> {
        let path = resolve_path(source);
        if !is_audio_file(&path) {
            return Err(BridgeError::media(
                "unsupported_format",
                format!("{} is not an audio file", path.display()),
            ));
        }

        let duration = core_async::task::spawn_blocking(move || probe_duration(&path))
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Probe task failed: {}", e)))??;

        info!(?duration, "Prepared desktop media handle");
        Ok(Box::new(DesktopMediaHandle::new(source, duration, listener)))
    }
}

/// Clock-driven handle for a probed local file.
pub struct DesktopMediaHandle {
    source: String,
    duration: Option<Duration>,
    /// Position at the last start/pause/seek.
    offset: Duration,
    started_at: Option<Instant>,
    volume: f32,
    listener: MediaEventListener,
    completion: Option<CancellationToken>,
    released: bool,
}

impl DesktopMediaHandle {
    pub(crate) fn new(
        source: impl Into<String>,
        duration: Option<Duration>,
        listener: MediaEventListener,
    ) -> Self {
        Self {
            source: source.into(),
            duration,
            offset: Duration::ZERO,
            started_at: None,
            volume: 1.0,
            listener,
            completion: None,
            released: false,
        }
    }

    /// Last volume applied to this handle.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(BridgeError::NotAvailable(format!(
                "Media handle for {} was released",
                self.source
            )));
        }
        Ok(())
    }

    fn arm_completion(&mut self) -> Result<()> {
        let Some(duration) = self.duration else {
            return Ok(());
        };

        if !core_async::runtime::in_runtime() {
            return Err(BridgeError::NotAvailable(
                "Completion timer requires an async runtime".to_string(),
            ));
        }

        let remaining = duration.saturating_sub(self.offset);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let listener = Arc::clone(&self.listener);

        core_async::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = sleep(remaining) => listener(MediaHandleEvent::Completed),
            }
        });

        self.completion = Some(token);
        Ok(())
    }

    fn disarm_completion(&mut self) {
        if let Some(token) = self.completion.take() {
            token.cancel();
        }
    }
}

impl MediaHandle for DesktopMediaHandle {
    fn start(&mut self) -> Result<()> {
        self.ensure_live()?;
        if self.started_at.is_some() {
            return Ok(());
        }
        self.started_at = Some(Instant::now());
        self.arm_completion()
    }

    fn pause(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.offset = self.position();
        self.started_at = None;
        self.disarm_completion();
        Ok(())
    }

    fn stop(&mut self) {
        self.disarm_completion();
        self.started_at = None;
        self.offset = Duration::ZERO;
    }

    fn seek_to(&mut self, position: Duration) -> Result<()> {
        self.ensure_live()?;
        // A handle that ran to the end stays stopped after seeking.
        let was_playing = self.is_playing();
        self.disarm_completion();

        self.offset = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };

        if was_playing {
            self.started_at = Some(Instant::now());
            self.arm_completion()?;
        } else {
            self.started_at = None;
        }
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.ensure_live()?;
        if !level.is_finite() {
            return Err(BridgeError::OperationFailed(format!(
                "Invalid volume level: {}",
                level
            )));
        }
        self.volume = level.clamp(0.0, 1.0);
        debug!(volume = self.volume, "Volume applied");
        Ok(())
    }

    fn position(&self) -> Duration {
        let position = match self.started_at {
            Some(started) => self.offset + started.elapsed(),
            None => self.offset,
        };
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        if self.started_at.is_none() {
            return false;
        }
        match self.duration {
            Some(duration) => self.position() < duration,
            None => true,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.disarm_completion();
        self.started_at = None;
        self.released = true;
        debug!(source = %self.source, "Media handle released");
    }
}

impl Drop for DesktopMediaHandle {
    fn drop(&mut self) {
        if !self.released {
            warn!(source = %self.source, "Media handle dropped without release");
        }
        self.disarm_completion();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Build a mono 16-bit PCM WAV file of `seconds` length.
    fn wav_bytes(sample_rate: u32, seconds: u32) -> Vec<u8> {
        let data_len = sample_rate * seconds * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(44 + data_len as usize, 0);
        out
    }

    fn temp_file(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn recording_listener() -> (MediaEventListener, Arc<Mutex<Vec<MediaHandleEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let listener: MediaEventListener = Arc::new(move |event| {
            sink.lock().unwrap().push(event);
        });
        (listener, events)
    }

    #[tokio::test]
    async fn test_source_exists() {
        let engine = DesktopMediaEngine::new();
        let file = temp_file(".wav", &wav_bytes(8000, 1));
        let path = file.path().to_str().unwrap().to_string();

        assert!(engine.source_exists(&path).await);
        assert!(engine.source_exists(&format!("file://{}", path)).await);
        assert!(!engine.source_exists("/definitely/not/here.mp3").await);

        let dir = tempfile::tempdir().unwrap();
        assert!(!engine.source_exists(dir.path().to_str().unwrap()).await);
    }

    #[tokio::test]
    async fn test_prepare_wav_reports_duration() {
        let engine = DesktopMediaEngine::new();
        let file = temp_file(".wav", &wav_bytes(8000, 1));
        let (listener, _) = recording_listener();

        let mut handle = engine
            .prepare(file.path().to_str().unwrap(), listener)
            .await
            .unwrap();

        assert_eq!(handle.duration(), Some(Duration::from_secs(1)));
        assert_eq!(handle.position(), Duration::ZERO);
        assert!(!handle.is_playing());
        handle.release();
    }

    #[tokio::test]
    async fn test_prepare_garbage_is_media_error() {
        let engine = DesktopMediaEngine::new();
        let file = temp_file(".mp3", b"definitely not an mp3 stream");
        let (listener, _) = recording_listener();

        let result = engine.prepare(file.path().to_str().unwrap(), listener).await;
        assert!(matches!(result, Err(BridgeError::Media { .. })));
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("/music/a.mp3")));
        assert!(is_audio_file(Path::new("/music/B.FLAC")));
        assert!(is_audio_file(Path::new("take.aiff")));
        assert!(!is_audio_file(Path::new("/music/cover.jpg")));
        assert!(!is_audio_file(Path::new("/music/README")));
        assert!(!is_audio_file(Path::new("/music/.mp3/notes.txt")));
    }

    #[tokio::test]
    async fn test_prepare_rejects_non_audio_extension() {
        let engine = DesktopMediaEngine::new();
        let file = temp_file(".txt", &wav_bytes(8000, 1));
        let (listener, _) = recording_listener();

        let result = engine.prepare(file.path().to_str().unwrap(), listener).await;
        match result {
            Err(BridgeError::Media { code, .. }) => assert_eq!(code, "unsupported_format"),
            other => panic!("expected unsupported_format, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_prepare_missing_is_not_found() {
        let engine = DesktopMediaEngine::new();
        let (listener, _) = recording_listener();

        let result = engine.prepare("/definitely/not/here.wav", listener).await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_follows_clock() {
        let (listener, _) = recording_listener();
        let mut handle =
            DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(10)), listener);

        handle.start().unwrap();
        sleep(Duration::from_millis(400)).await;
        assert_eq!(handle.position(), Duration::from_millis(400));

        handle.pause().unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.position(), Duration::from_millis(400));
        assert!(!handle.is_playing());

        handle.seek_to(Duration::from_secs(3)).unwrap();
        assert_eq!(handle.position(), Duration::from_secs(3));
        assert!(!handle.is_playing());

        handle.seek_to(Duration::from_secs(60)).unwrap();
        assert_eq!(handle.position(), Duration::from_secs(10));
        handle.release();
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_at_end() {
        let (listener, events) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(1)), listener);

        handle.start().unwrap();
        sleep(Duration::from_millis(1100)).await;

        assert_eq!(*events.lock().unwrap(), vec![MediaHandleEvent::Completed]);
        assert!(!handle.is_playing());
        assert_eq!(handle.position(), Duration::from_secs(1));
        handle.release();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_completion() {
        let (listener, events) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(1)), listener);

        handle.start().unwrap();
        sleep(Duration::from_millis(500)).await;
        handle.pause().unwrap();
        sleep(Duration::from_secs(2)).await;
        assert!(events.lock().unwrap().is_empty());

        handle.start().unwrap();
        sleep(Duration::from_millis(600)).await;
        assert_eq!(events.lock().unwrap().len(), 1);
        handle.release();
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_while_playing_rearms_completion() {
        let (listener, events) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(5)), listener);

        handle.start().unwrap();
        handle.seek_to(Duration::from_millis(4500)).unwrap();
        assert!(handle.is_playing());

        sleep(Duration::from_millis(600)).await;
        assert_eq!(events.lock().unwrap().len(), 1);
        handle.release();
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_after_completion_stays_stopped() {
        let (listener, events) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(1)), listener);

        handle.start().unwrap();
        sleep(Duration::from_millis(1100)).await;
        assert_eq!(events.lock().unwrap().len(), 1);

        handle.seek_to(Duration::from_millis(200)).unwrap();
        sleep(Duration::from_millis(500)).await;

        assert!(!handle.is_playing());
        assert_eq!(handle.position(), Duration::from_millis(200));
        assert_eq!(events.lock().unwrap().len(), 1);

        handle.start().unwrap();
        assert!(handle.is_playing());
        handle.release();
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (listener, _) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", Some(Duration::from_secs(1)), listener);

        handle.release();
        handle.release();
        assert!(handle.start().is_err());
        assert!(handle.set_volume(0.5).is_err());
    }

    #[tokio::test]
    async fn test_volume_is_clamped() {
        let (listener, _) = recording_listener();
        let mut handle = DesktopMediaHandle::new("a.wav", None, listener);

        handle.set_volume(1.7).unwrap();
        assert_eq!(handle.volume(), 1.0);
        handle.set_volume(-0.2).unwrap();
        assert_eq!(handle.volume(), 0.0);
        assert!(handle.set_volume(f32::NAN).is_err());
        handle.release();
    }
}
