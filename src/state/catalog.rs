/// The list of sample images shown on the home screen
///
/// A `Catalog` is built once at startup and handed to the UI. It is never
/// mutated afterwards; every item keeps its id for the whole session.

use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::media::SourceRef;

/// Built-in samples: display name and image URL
const SAMPLES: [(&str, &str); 6] = [
    (
        "Pixellate",
        "https://res.cloudinary.com/streethub/image/upload/v1582220740/brand/5de79ed16da6d30003f79b00/zh1snrsot6zjpe6frkp8.jpg",
    ),
    (
        "Vignette",
        "https://photographylife.com/wp-content/uploads/2012/08/Hitech-100mm-Modular-Filter-Holder-Vignetting-28mm.jpg",
    ),
    ("Edges", "https://i.stack.imgur.com/k9zOF.png"),
    (
        "Gaussian Blur",
        "https://www.tutorialspoint.com/opencv/images/gaussian_blur.jpg",
    ),
    (
        "Unsharp Mask",
        "https://upload.wikimedia.org/wikipedia/commons/e/e6/Usm-unsharp-mask.png",
    ),
    (
        "Sepia Tone",
        "https://www.chasejarvis.com/wp-content/uploads/2012/03/parissepia.jpg",
    ),
];

/// Image extensions picked up from a sample folder
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// Represents a single image in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Unique, stable identifier
    pub id: u32,
    /// Name shown in the list (e.g., "Sepia Tone")
    pub name: String,
    /// Where the image is loaded from
    pub source: SourceRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and empty names
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(item.id));
            }
        }
        Ok(Self { items })
    }

    /// The six built-in samples, one per filter
    pub fn samples() -> Self {
        let items = SAMPLES
            .iter()
            .zip(0..)
            .map(|(&(name, url), id)| CatalogItem {
                id,
                name: name.to_string(),
                source: SourceRef::Url(url.to_string()),
            })
            .collect();
        Self { items }
    }

    /// Build the catalog described by the config
    ///
    /// Configured items replace the built-in samples; images found in
    /// `sample_dir` are appended after them.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let mut entries: Vec<(String, SourceRef)> = if config.items.is_empty() {
            SAMPLES
                .iter()
                .map(|&(name, url)| (name.to_string(), SourceRef::Url(url.to_string())))
                .collect()
        } else {
            config
                .items
                .iter()
                .map(|item| (item.name.clone(), SourceRef::parse(&item.source)))
                .collect()
        };

        if let Some(dir) = &config.sample_dir {
            entries.extend(scan_folder(dir));
        }

        let items = entries
            .into_iter()
            .zip(0..)
            .map(|((name, source), id)| CatalogItem { id, name, source })
            .collect();

        let catalog = Self::new(items)?;
        log::info!("🗂️  Catalog ready with {} items", catalog.len());
        Ok(catalog)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Look up an item by id
    pub fn get(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Find image files under `dir`, named after their file stem
fn scan_folder(dir: &Path) -> Vec<(String, SourceRef)> {
    log::info!("🔍 Scanning sample folder: {}", dir.display());

    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_image = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if !is_image {
            continue;
        }

        let name = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        found.push((name, SourceRef::Path(path.to_path_buf())));
    }

    log::info!("Found {} images in sample folder", found.len());
    found
}
