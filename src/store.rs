//! Named image table used by the control layer.
//!
//! Entries live in memory for the session. `add` overwrites silently and
//! nothing is ever evicted. The store is a plain owned value; callers sharing
//! it across threads wrap it in a lock.

use std::collections::HashMap;

use crate::error::{ProcessorError, ProcessorResult};
use crate::image::Image;

#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, Image>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `image` under `name`, returning the image it replaced.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(name = tracing::field::Empty, width = image.width(), height = image.height())
    )]
    pub fn add(&mut self, name: impl Into<String>, image: Image) -> Option<Image> {
        let name = name.into();
        tracing::Span::current().record("name", name.as_str());
        let replaced = self.images.insert(name, image);
        if replaced.is_some() {
            tracing::debug!("overwrote existing entry");
        }
        replaced
    }

    /// # Errors
    /// [`ProcessorError::NotFound`] if nothing is stored under `name`.
    pub fn get(&self, name: &str) -> ProcessorResult<&Image> {
        self.images
            .get(name)
            .ok_or_else(|| ProcessorError::not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// Stored names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
