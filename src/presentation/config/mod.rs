mod settings;

pub use settings::{
    IdentitySettings, OneDriveSettings, ServerSettings, Settings, WhisperSettings,
};
