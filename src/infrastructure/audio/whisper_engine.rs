use std::path::Path;

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_decoder::decode_audio_to_pcm;

/// Model size selector. Sizes map onto the matching `openai/whisper-*`
/// checkpoints; anything larger is outside chairside-latency territory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    #[default]
    Small,
}

impl WhisperModel {
    pub fn from_selector(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "tiny" => Some(Self::Tiny),
            "base" => Some(Self::Base),
            "small" => Some(Self::Small),
            _ => None,
        }
    }

    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Tiny => "openai/whisper-tiny",
            Self::Base => "openai/whisper-base",
            Self::Small => "openai/whisper-small",
        }
    }
}

/// Local Whisper engine on candle. Invocation parameters are fixed for
/// deterministic behavior across heterogeneous hardware: the language token
/// is pinned to English and weights run in f32 (no half precision).
pub struct WhisperEngine {
    // interior mutability for the decoder's kv cache; process-wide
    // serialization of invocations is the transcription service's gate
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

impl WhisperEngine {
    pub fn new(size: WhisperModel) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;
        let model_id = size.model_id();

        tracing::info!(device = ?device, model = model_id, "Loading Whisper model");

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let mel_repo = api.repo(Repo::new(
            "FL33TW00D-HF/whisper-base".to_string(),
            RepoType::Model,
        ));
        let mel_bytes_path = mel_repo
            .get("melfilters.bytes")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("melfilters.bytes: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!(model = model_id, "Whisper engine ready");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
        })
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperEngine {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let data = tokio::fs::read(audio_path).await?;
        let pcm = decode_audio_to_pcm(&data)?;

        // live chunks are a few seconds long, but a recorder hiccup can
        // deliver more than one model window at once
        let mut windows = Vec::new();
        for samples in pcm.chunks(m::N_SAMPLES) {
            let samples = if samples.len() < m::N_SAMPLES {
                let mut padded = samples.to_vec();
                padded.resize(m::N_SAMPLES, 0.0);
                padded
            } else {
                samples.to_vec()
            };

            let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
            let n_mel = self.config.num_mel_bins;
            let n_frames = mel_data.len() / n_mel;
            let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("mel tensor: {}", e)))?;
            windows.push(mel);
        }

        let mut segments: Vec<String> = Vec::new();
        let mut model = self.model.lock().await;

        for (i, mel) in windows.iter().enumerate() {
            tracing::debug!(window = i, "Decoding audio window");
            let text = decode_window(&mut model, &self.tokenizer, &self.device, mel)?;
            if !text.is_empty() {
                segments.push(text);
            }
        }

        let transcript = segments.join(" ");
        tracing::debug!(chars = transcript.len(), "Whisper decode finished");

        Ok(transcript)
    }
}

fn decode_window(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    mel: &Tensor,
) -> Result<String, TranscriptionError> {
    let sot_token = token_id(tokenizer, m::SOT_TOKEN)?;
    let english_token = token_id(tokenizer, "<|en|>")?;
    let transcribe_token = token_id(tokenizer, m::TRANSCRIBE_TOKEN)?;
    let no_timestamps_token = token_id(tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
    let eot_token = token_id(tokenizer, m::EOT_TOKEN)?;

    let audio_features = model
        .encoder
        .forward(mel, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("encoder: {}", e)))?;

    // fixed prompt: forced English, transcription task, no timestamps
    let mut tokens = vec![sot_token, english_token, transcribe_token, no_timestamps_token];
    let prefix_len = tokens.len();
    let max_tokens = 224;
    let mut decoded_text = String::new();

    for _ in 0..max_tokens {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?
            .unsqueeze(0)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, &audio_features, tokens.len() == prefix_len)
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("decoder: {}", e)))?;

        let logits = model
            .decoder
            .final_linear(
                &decoder_output
                    .squeeze(0)
                    .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?,
            )
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("linear: {}", e)))?;

        let seq_len = logits
            .dim(0)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;
        let last_logits = logits
            .get(seq_len - 1)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;

        let next_token = last_logits
            .argmax(0)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?
            .to_scalar::<u32>()
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;

        if next_token == eot_token {
            break;
        }

        tokens.push(next_token);

        if let Some(text) = tokenizer.id_to_token(next_token) {
            let text = text.replace("Ġ", " ").replace("▁", " ");
            decoded_text.push_str(&text);
        }
    }

    model.reset_kv_cache();

    Ok(decoded_text.trim().to_string())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        TranscriptionError::TranscriptionFailed(format!("token not found: {}", token))
    })
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
