//! Signal photo cache
//!
//! Uploads the two illustrative signal images once per deployment and keeps
//! the resulting Telegram file ids in a small JSON file, so signal responses
//! reuse the references instead of re-uploading the assets. A file id can be
//! invalidated by a bot-token change, in which case deleting the cache file
//! triggers a re-upload on the next start.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use teloxide::{Bot, prelude::*, types::{ChatId, FileId, InputFile}};
use tokio::fs;
use tracing::{info, warn, debug};
use crate::config::SignalsConfig;
use crate::utils::errors::Result;

const EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Logical asset slots, keyed by the rising/falling vocabulary of a deployment
const ASSETS: [(&str, &str); 2] = [("buy", "bot_buy"), ("sell", "bot_sell")];

/// Persisted file-id records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CachedFileIds {
    buy: Option<String>,
    sell: Option<String>,
}

/// File-id cache for the per-direction signal images
#[derive(Debug, Clone)]
pub struct SignalPhotoCache {
    assets_dir: PathBuf,
    cache_path: PathBuf,
}

impl SignalPhotoCache {
    pub fn new(config: &SignalsConfig) -> Self {
        Self {
            assets_dir: PathBuf::from(&config.assets_dir),
            cache_path: PathBuf::from(&config.file_id_cache),
        }
    }

    /// Map a direction onto its asset slot
    ///
    /// Both deployment vocabularies resolve to the same two images.
    fn slot_for_direction(direction: &str) -> Option<&'static str> {
        match direction {
            "HIGHER" | "BUY" => Some("buy"),
            "LOWER" | "SELL" => Some("sell"),
            _ => None,
        }
    }

    /// Cached file id for a direction, None when no upload succeeded yet
    ///
    /// The cache file is re-read per lookup so an operator can replace it
    /// without restarting the bot.
    pub async fn file_id_for(&self, direction: &str) -> Option<FileId> {
        let slot = Self::slot_for_direction(direction)?;
        let ids = self.load_ids().await;
        let id = match slot {
            "buy" => ids.buy,
            _ => ids.sell,
        };
        id.map(FileId)
    }

    /// Upload any asset that has no cached file id yet
    ///
    /// A missing asset file or a failed upload skips that slot; the signal
    /// response for that direction falls back to a text-only caption.
    pub async fn ensure_uploaded(&self, bot: &Bot, upload_chat_id: ChatId) -> Result<()> {
        let mut ids = self.load_ids().await;

        for (slot, asset_name) in ASSETS {
            let already_cached = match slot {
                "buy" => ids.buy.is_some(),
                _ => ids.sell.is_some(),
            };
            if already_cached {
                continue;
            }

            let Some(path) = self.find_asset(asset_name).await else {
                debug!(asset = asset_name, "Signal asset not found, skipping");
                continue;
            };

            match bot.send_photo(upload_chat_id, InputFile::file(&path)).await {
                Ok(message) => {
                    // Telegram returns several resolutions, keep the largest
                    let file_id = message
                        .photo()
                        .and_then(|sizes| sizes.last())
                        .map(|size| size.file.id.0.clone());
                    match file_id {
                        Some(id) => {
                            info!(asset = asset_name, "Signal asset uploaded and cached");
                            match slot {
                                "buy" => ids.buy = Some(id),
                                _ => ids.sell = Some(id),
                            }
                            self.save_ids(&ids).await?;
                        }
                        None => warn!(asset = asset_name, "Upload response carried no photo"),
                    }
                }
                Err(e) => {
                    warn!(asset = asset_name, error = %e, "Signal asset upload failed, skipping");
                }
            }
        }

        Ok(())
    }

    async fn find_asset(&self, name: &str) -> Option<PathBuf> {
        for ext in EXTENSIONS {
            let path = self.assets_dir.join(format!("{}.{}", name, ext));
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    async fn load_ids(&self) -> CachedFileIds {
        match fs::read_to_string(&self.cache_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => CachedFileIds::default(),
        }
    }

    async fn save_ids(&self, ids: &CachedFileIds) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(ids)?;
        fs::write(&self.cache_path, content).await?;
        Ok(())
    }
}

/// Read-side map of cached ids, used by tests and diagnostics
pub async fn read_cache_file(path: &Path) -> HashMap<String, Option<String>> {
    let ids: CachedFileIds = match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => CachedFileIds::default(),
    };
    HashMap::from([
        ("buy".to_string(), ids.buy),
        ("sell".to_string(), ids.sell),
    ])
}
