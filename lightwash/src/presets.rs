use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::color::Rgb;
use crate::state::DeskSnapshot;

/// A named snapshot of the desk: six slider values plus the link flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub link: bool,
    pub left: Rgb,
    pub right: Rgb,
}

impl Preset {
    fn new(name: String, snapshot: DeskSnapshot) -> Preset {
        Preset {
            id: Uuid::new_v4(),
            name,
            link: snapshot.link,
            left: snapshot.left,
            right: snapshot.right,
        }
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        DeskSnapshot {
            left: self.left,
            right: self.right,
            link: self.link,
        }
    }
}

#[derive(Debug, Error)]
pub enum PresetStoreError {
    #[error("preset names cannot be empty")]
    EmptyName,
    #[error("no preset with id {0}")]
    NotFound(Uuid),
    #[error("preset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preset file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The on-disk preset list, persisted wholesale as JSON.
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<Preset>,
}

impl PresetStore {
    /// A missing file is an empty store, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<PresetStore, PresetStoreError> {
        let path = path.into();

        let presets = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| PresetStoreError::Format {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no preset file at {}, starting empty", path.display());
                vec![]
            }
            Err(source) => {
                return Err(PresetStoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        Ok(PresetStore { path, presets })
    }

    pub fn save(&self) -> Result<(), PresetStoreError> {
        let raw =
            serde_json::to_string_pretty(&self.presets).map_err(|source| {
                PresetStoreError::Format {
                    path: self.path.clone(),
                    source,
                }
            })?;

        fs::write(&self.path, raw).map_err(|source| PresetStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        snapshot: DeskSnapshot,
    ) -> Result<Preset, PresetStoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PresetStoreError::EmptyName);
        }

        let preset = Preset::new(name, snapshot);
        self.presets.push(preset.clone());

        Ok(preset)
    }

    /// Overwrites a preset in place, keeping its id and list position.
    pub fn update(
        &mut self,
        id: Uuid,
        name: impl Into<String>,
        snapshot: DeskSnapshot,
    ) -> Result<(), PresetStoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PresetStoreError::EmptyName);
        }

        let preset = self
            .presets
            .iter_mut()
            .find(|preset| preset.id == id)
            .ok_or(PresetStoreError::NotFound(id))?;

        preset.name = name;
        preset.link = snapshot.link;
        preset.left = snapshot.left;
        preset.right = snapshot.right;

        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Preset, PresetStoreError> {
        let index = self
            .presets
            .iter()
            .position(|preset| preset.id == id)
            .ok_or(PresetStoreError::NotFound(id))?;

        Ok(self.presets.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn first(&self) -> Option<&Preset> {
        self.presets.first()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
