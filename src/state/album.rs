use chrono::{DateTime, Utc};
use image::DynamicImage;
use rusqlite::{types::Type, Connection};
use std::path::{Path, PathBuf};

use super::session::FilterState;
use crate::config::{OutputFormat, APP_DIR};
use crate::error::SaveError;
use crate::filter;

/// Anything that can persist a rendered image
pub trait OutputSink {
    fn save(
        &self,
        image: &DynamicImage,
        state: &FilterState,
        source_name: &str,
    ) -> Result<SavedPhoto, SaveError>;
}

/// A photo written to the album
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPhoto {
    /// Unique database ID
    pub id: i64,
    /// Full path to the image file
    pub path: PathBuf,
    /// Catalog name of the image it was rendered from
    pub source_name: String,
    /// Filter and intensity used
    pub state: FilterState,
    pub saved_at: DateTime<Utc>,
}

/// The PhotoAlbum stores saved renders: image files in one directory plus
/// an SQLite index of what was saved, from which source, with which filter.
pub struct PhotoAlbum {
    conn: Connection,
    dir: PathBuf,
    format: OutputFormat,
}

impl PhotoAlbum {
    /// Open (or create) the album in `dir`
    pub fn open(dir: &Path, format: OutputFormat) -> Result<Self, SaveError> {
        std::fs::create_dir_all(dir)?;

        let db_path = dir.join("album.db");
        let conn = Connection::open(&db_path)?;

        log::debug!("📁 Album database at: {}", db_path.display());

        let album = PhotoAlbum {
            conn,
            dir: dir.to_path_buf(),
            format,
        };
        album.init_schema()?;

        Ok(album)
    }

    /// Default album location in the user's data directory:
    /// - Linux: ~/.local/share/photo-filter/album
    /// - macOS: ~/Library/Application Support/photo-filter/album
    /// - Windows: %APPDATA%\photo-filter\album
    pub fn default_dir() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push(APP_DIR);
        path.push("album");
        Some(path)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                path            TEXT NOT NULL UNIQUE,
                source_name     TEXT NOT NULL,
                filter_kind     TEXT,
                settings_json   TEXT NOT NULL,
                saved_at        INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_saved_at
             ON photos(saved_at DESC)",
            [],
        )?;

        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get a count of photos in the album
    pub fn photo_count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))
    }

    /// All saved photos, newest first
    pub fn list_photos(&self) -> rusqlite::Result<Vec<SavedPhoto>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path, source_name, settings_json, saved_at
             FROM photos ORDER BY saved_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let path: String = row.get(1)?;
            let json: String = row.get(3)?;
            let saved_at: i64 = row.get(4)?;

            let state = FilterState::from_json(&json)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

            Ok(SavedPhoto {
                id: row.get(0)?,
                path: PathBuf::from(path),
                source_name: row.get(2)?,
                state,
                saved_at: DateTime::from_timestamp_millis(saved_at).unwrap_or_default(),
            })
        })?;

        rows.collect()
    }

    /// Remove entries whose image file no longer exists on disk
    pub fn verify_files(&self) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare("SELECT id, path FROM photos")?;

        let entries: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        let mut removed = 0;
        for (id, path) in entries {
            if !Path::new(&path).exists() {
                self.conn
                    .execute("DELETE FROM photos WHERE id = ?1", rusqlite::params![id])?;
                removed += 1;
            }
        }

        if removed > 0 {
            log::warn!("⚠️  Removed {} album entries with missing files", removed);
        }

        Ok(removed)
    }

    /// Pick a file name that is not taken yet
    fn next_path(&self, stem: &str, now: DateTime<Utc>) -> PathBuf {
        let ext = self.format.extension();
        let base = format!("{}_{}", now.format("%Y%m%d_%H%M%S%3f"), stem);

        let mut path = self.dir.join(format!("{base}.{ext}"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{base}_{n}.{ext}"));
            n += 1;
        }
        path
    }
}

impl OutputSink for PhotoAlbum {
    fn save(
        &self,
        image: &DynamicImage,
        state: &FilterState,
        source_name: &str,
    ) -> Result<SavedPhoto, SaveError> {
        let now = Utc::now();
        let stem = file_stem(source_name);
        let path = self.next_path(&stem, now);

        match self.format {
            // JPEG has no alpha channel
            OutputFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8())
                .save_with_format(&path, self.format.image_format())?,
            OutputFormat::Png => image.save_with_format(&path, self.format.image_format())?,
        }

        let json = state.to_json()?;
        let kind = state.kind.map(|k| k.display_name());
        let path_str = path.to_string_lossy().to_string();

        self.conn.execute(
            "INSERT INTO photos (path, source_name, filter_kind, settings_json, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![path_str, source_name, kind, json, now.timestamp_millis()],
        )?;

        log::info!("💾 Saved {}", path.display());

        Ok(SavedPhoto {
            id: self.conn.last_insert_rowid(),
            path,
            source_name: source_name.to_string(),
            state: *state,
            saved_at: DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now),
        })
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for PhotoAlbum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoAlbum")
            .field("dir", &self.dir)
            .field("format", &self.format)
            .finish()
    }
}

/// Lowercase file-name-safe version of a catalog name
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "photo".to_string()
    } else {
        stem.to_string()
    }
}

/// Render at full resolution and save, on the blocking pool
///
/// Opens its own connection, since the UI's album handle stays on the UI
/// thread. Resolves exactly once with the outcome; there is no retry.
pub async fn render_and_save(
    dir: PathBuf,
    format: OutputFormat,
    input: DynamicImage,
    state: FilterState,
    source_name: String,
) -> Result<SavedPhoto, SaveError> {
    tokio::task::spawn_blocking(move || {
        let image = filter::render(state.kind, state.intensity, &input)
            .ok_or(SaveError::NothingToSave)?;
        let album = PhotoAlbum::open(&dir, format)?;
        album.save(&image, &state, &source_name)
    })
    .await
    .map_err(|e| SaveError::Join(e.to_string()))?
}
