use std::path::PathBuf;

use crate::infrastructure::audio::WhisperModel;

/// Runtime configuration, read from the process environment with defaults
/// for everything except the identity pair (which is only needed once the
/// persistence path goes remote).
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity: IdentitySettings,
    pub onedrive: OneDriveSettings,
    pub whisper: WhisperSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub tenant_id: String,
    pub client_id: String,
    pub token_cache_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OneDriveSettings {
    pub folder: String,
    pub fallback_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WhisperSettings {
    pub model: WhisperModel,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5002);

        let model = std::env::var("WHISPER_MODEL")
            .ok()
            .and_then(|v| WhisperModel::from_selector(&v))
            .unwrap_or_default();

        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port,
            },
            identity: IdentitySettings {
                tenant_id: std::env::var("MS_TENANT_ID").unwrap_or_default(),
                client_id: std::env::var("MS_CLIENT_ID").unwrap_or_default(),
                token_cache_path: PathBuf::from(".token_cache.json"),
            },
            onedrive: OneDriveSettings {
                folder: std::env::var("ONEDRIVE_FOLDER")
                    .unwrap_or_else(|_| "treatment-transcripts".to_string()),
                fallback_dir: std::env::var("FALLBACK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("local_out")),
            },
            whisper: WhisperSettings { model },
        }
    }
}
