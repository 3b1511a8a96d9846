//! Images, emotes and the image cache capability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::primitives::Size;

/// Opaque key of an image known to the [`ImageCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A loaded image. Dimensions are logical pixels at scale 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub width: f32,
    pub height: f32,
    pub animated: bool,
}

impl Image {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// The same picture at up to three resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub x1: Option<ImageId>,
    pub x2: Option<ImageId>,
    pub x3: Option<ImageId>,
}

impl ImageSet {
    pub fn single(id: impl Into<ImageId>) -> Self {
        Self {
            x1: Some(id.into()),
            ..Self::default()
        }
    }

    /// Best resolution for `image_scale`, falling back to smaller ones.
    pub fn pick(&self, image_scale: f32) -> Option<&ImageId> {
        let preferred = if image_scale > 3.999 {
            [&self.x3, &self.x2, &self.x1]
        } else if image_scale > 1.999 {
            [&self.x2, &self.x1, &self.x3]
        } else {
            [&self.x1, &self.x2, &self.x3]
        };
        preferred.into_iter().find_map(Option::as_ref)
    }
}

/// An inline emote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Emote {
    /// Text shown when the image is unavailable and copied with selections.
    pub name: String,
    pub images: ImageSet,
    #[serde(default)]
    pub tooltip: String,
}

impl Emote {
    pub fn new(name: impl Into<String>, images: ImageSet) -> Self {
        Self {
            name: name.into(),
            images,
            tooltip: String::new(),
        }
    }
}

/// Injected image lookup. `None` is an expected state (not loaded yet).
pub trait ImageCache {
    fn resolve(&self, id: &ImageId, scale: f32) -> Option<Image>;
}

/// In-memory cache keyed by id; every image is considered loaded.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageCache {
    images: HashMap<ImageId, Image>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<ImageId>, width: f32, height: f32) {
        self.insert_image(id, width, height, false);
    }

    pub fn insert_animated(&mut self, id: impl Into<ImageId>, width: f32, height: f32) {
        self.insert_image(id, width, height, true);
    }

    fn insert_image(&mut self, id: impl Into<ImageId>, width: f32, height: f32, animated: bool) {
        let id = id.into();
        self.images.insert(
            id.clone(),
            Image {
                id,
                width,
                height,
                animated,
            },
        );
    }

    pub fn remove(&mut self, id: &ImageId) -> Option<Image> {
        self.images.remove(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageCache for MemoryImageCache {
    fn resolve(&self, id: &ImageId, _scale: f32) -> Option<Image> {
        self.images.get(id).cloned()
    }
}
