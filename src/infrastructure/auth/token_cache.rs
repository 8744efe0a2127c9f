use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One cached identity-provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAccount {
    pub username: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheState {
    accounts: Vec<CachedAccount>,
}

/// Durable JSON blob of cached accounts at a fixed path. A corrupt or
/// unreadable blob loads as an empty cache, never an error. The file is
/// rewritten only when an acquisition actually changed state.
pub struct FileTokenCache {
    path: PathBuf,
    state: CacheState,
    dirty: bool,
}

impl FileTokenCache {
    pub fn load(path: PathBuf) -> Self {
        let state = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            state,
            dirty: false,
        }
    }

    pub fn first_account(&self) -> Option<&CachedAccount> {
        self.state.accounts.first()
    }

    /// Insert or replace the account for this username and mark the cache
    /// dirty. The most recently stored account becomes the first one.
    pub fn store_account(&mut self, account: CachedAccount) {
        self.state
            .accounts
            .retain(|a| a.username != account.username);
        self.state.accounts.insert(0, account);
        self.dirty = true;
    }

    pub fn has_state_changed(&self) -> bool {
        self.dirty
    }

    /// Persist the blob if an acquisition changed it; a no-op otherwise.
    pub fn save_if_changed(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let raw = serde_json::to_string_pretty(&self.state).map_err(io::Error::other)?;
        std::fs::write(&self.path, raw)?;
        self.dirty = false;
        Ok(())
    }
}
