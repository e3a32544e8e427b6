//! Caches the most recently opened face so consecutive inputs that
//! reference the same file and face index skip the reload.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::face::{FontLoader, FontSource};

pub struct FontHolder<'a> {
    loader: &'a dyn FontLoader,
    font: Option<Box<dyn FontSource>>,
    path: Option<PathBuf>,
    face_index: u32,
}

impl<'a> FontHolder<'a> {
    pub fn new(loader: &'a dyn FontLoader) -> Self {
        FontHolder {
            loader,
            font: None,
            path: None,
            face_index: 0,
        }
    }

    pub fn load(&mut self, path: &Path, face_index: u32) -> Result<&dyn FontSource> {
        if self.face_index != face_index || self.path.as_deref() != Some(path) {
            self.font = None;
        }
        let font = match self.font.take() {
            Some(font) => font,
            None => {
                let font = self.loader.open(path, face_index)?;
                self.path = Some(path.to_path_buf());
                self.face_index = face_index;
                font
            }
        };
        Ok(&**self.font.insert(font))
    }
}
