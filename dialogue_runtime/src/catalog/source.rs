//! Asset sources - where raw dialogue assets come from.

use dialogue_model::DialogueAsset;

use crate::error::{DialogueError, Result};

/// Encoding of a raw asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Json,
    Toml,
}

impl AssetFormat {
    /// Guess the format from a file name or path.
    pub fn from_extension(path: &str) -> Option<Self> {
        let extension = path.rsplit_once('.')?.1;
        if extension.eq_ignore_ascii_case("json") {
            Some(AssetFormat::Json)
        } else if extension.eq_ignore_ascii_case("toml") {
            Some(AssetFormat::Toml)
        } else {
            None
        }
    }
}

/// An undecoded dialogue asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
    /// Where the asset came from, used in diagnostics.
    pub origin: String,
    pub format: AssetFormat,
    pub contents: String,
}

impl RawAsset {
    pub fn new(
        origin: impl Into<String>,
        format: AssetFormat,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            format,
            contents: contents.into(),
        }
    }

    pub fn json(origin: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::new(origin, AssetFormat::Json, contents)
    }

    pub fn toml(origin: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::new(origin, AssetFormat::Toml, contents)
    }

    /// Decode the contents without structural validation.
    pub fn decode(&self) -> Result<DialogueAsset> {
        let decoded = match self.format {
            AssetFormat::Json => {
                serde_json::from_str::<DialogueAsset>(&self.contents).map_err(|e| e.to_string())
            }
            AssetFormat::Toml => {
                toml::from_str::<DialogueAsset>(&self.contents).map_err(|e| e.to_string())
            }
        };

        decoded.map_err(|reason| DialogueError::MalformedAsset {
            origin: self.origin.clone(),
            reason,
        })
    }
}

/// Supplies every raw dialogue asset the host knows about.
pub trait AssetSource {
    fn load_all(&self) -> Vec<RawAsset>;
}

/// Asset source backed by an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: Vec<RawAsset>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, asset: RawAsset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn push(&mut self, asset: RawAsset) {
        self.assets.push(asset);
    }
}

impl AssetSource for MemorySource {
    fn load_all(&self) -> Vec<RawAsset> {
        self.assets.clone()
    }
}
