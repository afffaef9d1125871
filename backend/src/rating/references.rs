use std::fs;
use std::path::{Path, PathBuf};

pub const REFERENCE_COUNT: usize = 10;

/// Every reference image is sent as JPEG, whatever its extension says.
pub const REFERENCE_MIME_TYPE: &str = "image/jpeg";

const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub file_name: String,
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl ReferenceImage {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
            mime_type: REFERENCE_MIME_TYPE,
        }
    }
}

/// Reference images loaded once at startup and shared read-only by every request.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    source_dir: PathBuf,
    images: Vec<ReferenceImage>,
}

impl ReferenceSet {
    pub fn from_images(source_dir: impl Into<PathBuf>, images: Vec<ReferenceImage>) -> Self {
        Self {
            source_dir: source_dir.into(),
            images,
        }
    }

    /// Loads the first ten images (by file name) from `dir`.
    ///
    /// Never fails: a missing directory or too few images leaves the set short,
    /// and rating requests are refused until a redeploy fixes it.
    pub fn load(dir: &Path) -> Self {
        let empty = Self::from_images(dir, Vec::new());

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!(
                    "Reference image directory '{}' not readable: {}. Create it and place the reference images there.",
                    dir.display(),
                    e
                );
                return empty;
            }
        };

        let mut file_names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_image_file_name(name))
            .collect();
        file_names.sort();

        if file_names.len() < REFERENCE_COUNT {
            log::warn!(
                "Found only {} reference images in '{}'. Expected {}.",
                file_names.len(),
                dir.display(),
                REFERENCE_COUNT
            );
            return empty;
        }

        log::info!(
            "Loading {} reference images from '{}'...",
            file_names.len(),
            dir.display()
        );

        let mut images = Vec::with_capacity(REFERENCE_COUNT);
        for file_name in file_names.into_iter().take(REFERENCE_COUNT) {
            match fs::read(dir.join(&file_name)) {
                Ok(data) => {
                    log::info!("Loaded: {} ({} bytes)", file_name, data.len());
                    images.push(ReferenceImage::new(file_name, data));
                }
                Err(e) => log::error!("Error loading reference image {}: {}", file_name, e),
            }
        }
        log::info!(
            "Finished loading reference images ({} of {}).",
            images.len(),
            REFERENCE_COUNT
        );

        Self::from_images(dir, images)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_ready(&self) -> bool {
        self.exemplar_images().is_some()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.images.iter().map(|image| image.file_name.clone()).collect()
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// The ten exemplar images in prompt order, or `None` while the set is short.
    pub fn exemplar_images(&self) -> Option<&[ReferenceImage; REFERENCE_COUNT]> {
        self.images.get(..REFERENCE_COUNT)?.try_into().ok()
    }
}

// Suffix match is case-sensitive: "HOUSE.JPG" is skipped.
fn is_image_file_name(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
