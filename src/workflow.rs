use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, HinglishError};
use crate::media::{self, MediaProcessorFactory, MediaProcessorTrait};
use crate::pipeline::TranslationPipeline;
use crate::subtitle::Dialect;
use crate::transcribe::{SubtitleArtifacts, TranscriberFactory, TranscriberTrait};
use crate::translate::{Alignment, BatchTranslator, ProviderFactory};

/// Language code that disables Hinglish translation
const ENGLISH: &str = "en";

/// Caller options for one transcription request
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Language passed to whisper (`auto` for detection)
    pub language: String,
    pub translate_to_hinglish: bool,
}

/// Result of a transcription request, as returned to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranscriptionOutcome {
    pub success: bool,
    pub filename: String,
    pub language: String,
    pub srt: Option<String>,
    pub vtt: Option<String>,
    /// Whether the upload went through ffmpeg
    pub converted: bool,
    /// Whether any subtitle text was actually translated
    pub translated_to_hinglish: bool,
}

/// Availability of the external collaborators
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DependencyStatus {
    pub executable_exists: bool,
    pub model_exists: bool,
    pub ffmpeg_available: bool,
    pub translation_available: bool,
}

/// Upload → normalize → transcribe → translate
pub struct Workflow {
    config: Config,
    transcriber: Box<dyn TranscriberTrait>,
    media: Box<dyn MediaProcessorTrait>,
    pipeline: TranslationPipeline,
    ffmpeg_available: bool,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let provider = ProviderFactory::from_config(&config.translate)?;
        let pipeline = TranslationPipeline::new(BatchTranslator::new(provider));
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        Ok(Self::with_components(config, transcriber, media, pipeline))
    }

    pub fn with_components(
        config: Config,
        transcriber: Box<dyn TranscriberTrait>,
        media: Box<dyn MediaProcessorTrait>,
        pipeline: TranslationPipeline,
    ) -> Self {
        let ffmpeg_available = media.is_available();

        Self {
            config,
            transcriber,
            media,
            pipeline,
            ffmpeg_available,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    pub fn model_name(&self) -> String {
        self.transcriber.model_name()
    }

    pub fn dependency_status(&self) -> DependencyStatus {
        DependencyStatus {
            executable_exists: self.transcriber.binary_exists(),
            model_exists: self.transcriber.model_exists(),
            ffmpeg_available: self.ffmpeg_available,
            translation_available: self.pipeline.is_available(),
        }
    }

    /// Log the state of every external dependency
    pub async fn log_startup_report(&self) {
        let status = self.dependency_status();
        let transcriber = &self.config.transcriber;

        if status.executable_exists {
            info!("Found: {}", transcriber.binary_path);
        } else {
            error!("{} not found!", transcriber.binary_path);
        }

        if status.model_exists {
            info!("Found: {}", transcriber.model_path);
        } else {
            error!("{} not found!", transcriber.model_path);
        }

        if status.ffmpeg_available {
            match self.media.get_version_info().await {
                Ok(version) => info!("Found: ffmpeg (video conversion enabled): {}", version),
                Err(_) => info!("Found: ffmpeg (video conversion enabled)"),
            }
        } else {
            warn!("ffmpeg not found (MP4 videos may not work)");
        }

        match self.pipeline.translator().provider() {
            Some(provider) => match provider.check_availability().await {
                Ok(()) => info!("{} translation available (Hinglish translation enabled)", provider.name()),
                Err(e) => warn!("{} translation configured but not reachable: {}", provider.name(), e),
            },
            None => warn!(
                "Translation not available (set {})",
                self.config.translate.api_key_env
            ),
        }
    }

    /// Transcribe a local media file
    pub async fn process_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &TranscribeOptions,
    ) -> Result<TranscriptionOutcome> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HinglishError::FileNotFound(path.display().to_string()));
        }

        let filename = path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let data = fs::read(path).await?;

        self.process_upload(&filename, &data, options).await
    }

    /// Transcribe uploaded bytes, translating the subtitles when asked to.
    ///
    /// All intermediate files live in a temporary directory removed on return.
    pub async fn process_upload(
        &self,
        filename: &str,
        data: &[u8],
        options: &TranscribeOptions,
    ) -> Result<TranscriptionOutcome> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("wav");

        let workspace = tempfile::Builder::new().prefix("hinglish-subs-").tempdir()?;
        let input_path = workspace.path().join(format!("input.{}", extension));
        fs::write(&input_path, data).await?;

        info!("Processing: {} ({} bytes)", filename, data.len());

        let converted = media::needs_conversion(extension);
        let audio_path = if converted {
            if !self.ffmpeg_available {
                return Err(HinglishError::FfmpegRequired);
            }
            let wav_path = workspace.path().join("converted.wav");
            self.media.convert_to_wav(&input_path, &wav_path).await?;
            wav_path
        } else {
            input_path
        };

        let output_prefix = workspace.path().join("transcript");
        let mut artifacts = self.transcriber
            .transcribe(&audio_path, &options.language, &output_prefix)
            .await?;

        if artifacts.is_empty() {
            return Err(HinglishError::NoSubtitles);
        }

        let translated = if options.language != ENGLISH
            && options.translate_to_hinglish
            && self.pipeline.is_available()
        {
            info!("Translating to Hinglish");
            self.translate_artifacts(&mut artifacts).await
        } else {
            false
        };

        info!("Transcription complete");

        Ok(TranscriptionOutcome {
            success: true,
            filename: filename.to_string(),
            language: options.language.clone(),
            srt: artifacts.srt,
            vtt: artifacts.vtt,
            converted,
            translated_to_hinglish: translated,
        })
    }

    /// Write the subtitles of an outcome as `<stem>.srt` / `<stem>.vtt`
    pub async fn save_outcome<P: AsRef<Path>>(
        &self,
        outcome: &TranscriptionOutcome,
        output_dir: P,
        stem: &str,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).await?;

        let mut written = Vec::new();
        for (dialect, text) in [(Dialect::Srt, &outcome.srt), (Dialect::Vtt, &outcome.vtt)] {
            let Some(text) = text else {
                continue;
            };
            let path = output_dir.join(format!("{}.{}", stem, dialect.extension()));
            fs::write(&path, text).await?;
            info!("Saved {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Translate one `.srt` / `.vtt` file into `output_path`
    pub async fn translate_subtitle_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<Alignment> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        if !input_path.exists() {
            return Err(HinglishError::FileNotFound(input_path.display().to_string()));
        }
        let dialect = Dialect::from_path(input_path)
            .ok_or_else(|| HinglishError::UnsupportedFormat(input_path.display().to_string()))?;

        let document = fs::read_to_string(input_path).await?;
        let output = self.pipeline.run(&document, dialect).await;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(output_path, &output.text).await?;
        debug!("{} -> {} ({:?})", input_path.display(), output_path.display(), output.alignment);

        Ok(output.alignment)
    }

    /// Translate every subtitle file below `input_dir`, mirroring the layout in `output_dir`.
    ///
    /// Returns the number of files written. Failures are logged and skipped.
    pub async fn translate_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<usize> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let files: Vec<PathBuf> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && Dialect::from_path(e.path()).is_some())
            .map(|e| e.path().to_path_buf())
            .collect();

        info!("Found {} subtitle files to translate", files.len());

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| HinglishError::Config(format!("Invalid progress template: {}", e)))?
            .progress_chars("#>-"));

        let mut written = 0;
        for path in files {
            let relative = pathdiff::diff_paths(&path, input_dir)
                .unwrap_or_else(|| PathBuf::from(path.file_name().unwrap_or_default()));
            pb.set_message(relative.display().to_string());

            match self.translate_subtitle_file(&path, output_dir.join(&relative)).await {
                Ok(_) => written += 1,
                Err(e) => warn!("Failed to translate {}: {}", path.display(), e),
            }
            pb.inc(1);
        }

        pb.finish_with_message("done");
        Ok(written)
    }

    /// Run the pipeline once per dialect; returns whether anything was translated
    pub async fn translate_artifacts(&self, artifacts: &mut SubtitleArtifacts) -> bool {
        let mut translated = false;

        for dialect in [Dialect::Srt, Dialect::Vtt] {
            let Some(document) = artifacts.get(dialect) else {
                continue;
            };
            if document.is_empty() {
                continue;
            }

            let output = self.pipeline.run(document, dialect).await;
            translated |= output.alignment.is_translated();
            *artifacts.get_mut(dialect) = Some(output.text);
        }

        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::sync::Arc;
    use crate::media::MockMediaProcessorTrait;
    use crate::transcribe::MockTranscriberTrait;
    use crate::translate::MockTranslationProvider;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nkya haal hai\n\n";
    const VTT: &str = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nkya haal hai\n\n";

    fn media(available: bool) -> MockMediaProcessorTrait {
        let mut media = MockMediaProcessorTrait::new();
        media.expect_is_available().return_const(available);
        media
    }

    fn transcriber_returning(srt: Option<&'static str>, vtt: Option<&'static str>) -> MockTranscriberTrait {
        let mut transcriber = MockTranscriberTrait::new();
        transcriber.expect_transcribe().returning(move |_, _, _| {
            Ok(SubtitleArtifacts {
                srt: srt.map(str::to_string),
                vtt: vtt.map(str::to_string),
            })
        });
        transcriber
    }

    fn translating_pipeline() -> TranslationPipeline {
        let mut provider = MockTranslationProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete()
            .returning(|_| Ok("[1] क्या हाल है".to_string()));
        TranslationPipeline::new(BatchTranslator::new(Some(Arc::new(provider))))
    }

    fn options(language: &str) -> TranscribeOptions {
        TranscribeOptions {
            language: language.to_string(),
            translate_to_hinglish: true,
        }
    }

    #[tokio::test]
    async fn test_wav_upload_is_translated() {
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber_returning(Some(SRT), Some(VTT))),
            Box::new(media(false)),
            translating_pipeline(),
        );

        let outcome = workflow.process_upload("clip.wav", b"RIFF", &options("hi")).await.unwrap();

        assert!(outcome.success);
        assert!(!outcome.converted);
        assert!(outcome.translated_to_hinglish);
        assert_eq!(
            outcome.srt.as_deref(),
            Some("1\n00:00:00,000 --> 00:00:02,000\nक्या हाल है")
        );
        // Two-line WebVTT cues are carried through as raw chunks
        assert_eq!(
            outcome.vtt.as_deref(),
            Some("WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nkya haal hai")
        );
    }

    #[tokio::test]
    async fn test_english_is_not_translated() {
        let mut provider = MockTranslationProvider::new();
        provider.expect_complete().times(0);
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber_returning(Some(SRT), None)),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::new(Some(Arc::new(provider)))),
        );

        let outcome = workflow.process_upload("clip.wav", b"RIFF", &options("en")).await.unwrap();

        assert!(!outcome.translated_to_hinglish);
        assert_eq!(outcome.srt.as_deref(), Some(SRT));
        assert_eq!(outcome.vtt, None);
    }

    #[tokio::test]
    async fn test_failed_translation_is_flagged_untranslated() {
        let mut provider = MockTranslationProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete()
            .times(2)
            .returning(|_| Err(HinglishError::TranslationUnavailable("down".to_string())));
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nkya haal hai";
        let vtt = "WEBVTT\n\ncue\n00:00:00.000 --> 00:00:02.000\nkya haal hai";
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber_returning(Some(srt), Some(vtt))),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::new(Some(Arc::new(provider)))),
        );

        let outcome = workflow.process_upload("clip.wav", b"RIFF", &options("auto")).await.unwrap();

        assert!(!outcome.translated_to_hinglish);
        assert_eq!(outcome.srt.as_deref(), Some(srt));
    }

    #[tokio::test]
    async fn test_video_without_ffmpeg_is_rejected() {
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(MockTranscriberTrait::new()),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::disabled()),
        );

        let err = workflow.process_upload("clip.MP4", b"....", &options("hi")).await.unwrap_err();
        assert!(matches!(err, HinglishError::FfmpegRequired));
    }

    #[tokio::test]
    async fn test_video_is_converted_before_transcription() {
        let mut media = media(true);
        media.expect_convert_to_wav()
            .withf(|input, output| {
                input.extension().is_some_and(|ext| ext == "mkv")
                    && output.extension().is_some_and(|ext| ext == "wav")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut transcriber = MockTranscriberTrait::new();
        transcriber.expect_transcribe()
            .withf(|audio, language, _| audio.ends_with("converted.wav") && language == "hi")
            .returning(|_, _, _| Ok(SubtitleArtifacts { srt: Some(SRT.to_string()), vtt: None }));

        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber),
            Box::new(media),
            TranslationPipeline::new(BatchTranslator::disabled()),
        );

        let outcome = workflow.process_upload("clip.mkv", b"....", &options("hi")).await.unwrap();
        assert!(outcome.converted);
        assert!(!outcome.translated_to_hinglish);
    }

    #[tokio::test]
    async fn test_no_subtitles_is_an_error() {
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber_returning(Some(""), None)),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::disabled()),
        );

        let err = workflow.process_upload("clip", b"RIFF", &options("hi")).await.unwrap_err();
        assert!(matches!(err, HinglishError::NoSubtitles));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(MockTranscriberTrait::new()),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::disabled()),
        );

        let err = workflow
            .process_file("/nonexistent/clip.wav", &options("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, HinglishError::FileNotFound(_)));
    }

    fn disabled_workflow() -> Workflow {
        Workflow::with_components(
            Config::default(),
            Box::new(MockTranscriberTrait::new()),
            Box::new(media(false)),
            TranslationPipeline::new(BatchTranslator::disabled()),
        )
    }

    #[tokio::test]
    async fn test_translate_subtitle_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let input = dir.child("talk.srt");
        input.write_str(SRT).unwrap();
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(MockTranscriberTrait::new()),
            Box::new(media(false)),
            translating_pipeline(),
        );

        let alignment = workflow
            .translate_subtitle_file(input.path(), dir.path().join("out/talk.srt"))
            .await
            .unwrap();

        assert!(alignment.is_translated());
        dir.child("out/talk.srt")
            .assert("1\n00:00:00,000 --> 00:00:02,000\nक्या हाल है");
    }

    #[tokio::test]
    async fn test_translate_unknown_extension() {
        let dir = assert_fs::TempDir::new().unwrap();
        let input = dir.child("notes.txt");
        input.write_str("hello").unwrap();

        let err = disabled_workflow()
            .translate_subtitle_file(input.path(), dir.path().join("notes.out"))
            .await
            .unwrap_err();
        assert!(matches!(err, HinglishError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_translate_directory_mirrors_layout() {
        let input = assert_fs::TempDir::new().unwrap();
        let output = assert_fs::TempDir::new().unwrap();
        input.child("a.srt").write_str(SRT).unwrap();
        input.child("season1/b.vtt").write_str(VTT).unwrap();
        input.child("season1/readme.md").write_str("# notes").unwrap();

        let written = disabled_workflow()
            .translate_directory(input.path(), output.path())
            .await
            .unwrap();

        assert_eq!(written, 2);
        // Without a provider documents pass through verbatim
        output.child("a.srt").assert(SRT);
        output.child("season1/b.vtt").assert(VTT);
        assert!(!output.child("season1/readme.md").path().exists());
    }

    #[tokio::test]
    async fn test_save_outcome() {
        let dir = assert_fs::TempDir::new().unwrap();
        let outcome = TranscriptionOutcome {
            success: true,
            filename: "clip.wav".to_string(),
            language: "hi".to_string(),
            srt: Some(SRT.to_string()),
            vtt: None,
            converted: false,
            translated_to_hinglish: false,
        };

        let written = disabled_workflow()
            .save_outcome(&outcome, dir.path(), "clip")
            .await
            .unwrap();

        assert_eq!(written, vec![dir.path().join("clip.srt")]);
        dir.child("clip.srt").assert(SRT);
        assert!(!dir.child("clip.vtt").path().exists());
    }

    #[test]
    fn test_dependency_status() {
        let mut transcriber = MockTranscriberTrait::new();
        transcriber.expect_binary_exists().return_const(true);
        transcriber.expect_model_exists().return_const(false);
        let workflow = Workflow::with_components(
            Config::default(),
            Box::new(transcriber),
            Box::new(media(true)),
            TranslationPipeline::new(BatchTranslator::disabled()),
        );

        assert_eq!(
            workflow.dependency_status(),
            DependencyStatus {
                executable_exists: true,
                model_exists: false,
                ffmpeg_available: true,
                translation_available: false,
            }
        );
    }
}
