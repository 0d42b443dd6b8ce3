use iced::widget::image::Handle;
use iced::{Element, Task, Theme};
use image::DynamicImage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod error;
mod filter;
mod media;
mod state;
mod ui;

use config::AppConfig;
use filter::FilterKind;
use media::{source::fetch_image, DefaultSource, ImageSource};
use state::album::{self, PhotoAlbum};
use state::catalog::Catalog;
use state::session::DetailSession;
use ui::detail::DetailScreen;

/// Which screen is showing
enum Screen {
    List,
    Detail(DetailScreen),
}

/// Main application state
struct PhotoFilter {
    config: AppConfig,
    /// The sample list, fixed for the whole session
    catalog: Catalog,
    source: Arc<dyn ImageSource>,
    /// Where saved photos go (None if no data directory exists)
    album_dir: Option<PathBuf>,
    thumbnails: HashMap<u32, Handle>,
    screen: Screen,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Background thumbnail generation finished for a catalog item
    ThumbnailLoaded(u32, Result<Handle, String>),
    /// User picked an item from the list
    Open(u32),
    /// Background fetch of the full image finished
    ImageLoaded(u32, Result<Arc<DynamicImage>, String>),
    /// User picked a different filter
    FilterSelected(FilterKind),
    /// User moved the intensity slider
    IntensityChanged(f32),
    /// User clicked "Save"
    Save,
    /// Background save finished with the saved file path
    SaveComplete(Result<PathBuf, String>),
    /// User went back to the list
    Back,
}

impl PhotoFilter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load().unwrap_or_else(|e| {
            log::error!("⚠️  {}; using default settings", e);
            AppConfig::default()
        });

        let catalog = Catalog::from_config(&config).unwrap_or_else(|e| {
            log::error!("⚠️  {}; using built-in samples", e);
            Catalog::samples()
        });

        let source: Arc<dyn ImageSource> = Arc::new(DefaultSource::new(Duration::from_secs(
            config.http_timeout_secs,
        )));

        let album_dir = config.album_dir.clone().or_else(PhotoAlbum::default_dir);
        let status = match album_dir.as_deref().map(|dir| PhotoAlbum::open(dir, config.output_format)) {
            Some(Ok(album)) => {
                if let Err(e) = album.verify_files() {
                    log::warn!("⚠️  Could not verify album files: {}", e);
                }
                let count = album.photo_count().unwrap_or(0);
                log::info!("🎨 Photo Filter initialized, {} photos in {}", count, album.dir().display());
                if let Some(latest) = album.list_photos().ok().and_then(|photos| photos.into_iter().next()) {
                    log::debug!(
                        "Last saved: {} ({:?}) at {}",
                        latest.source_name,
                        latest.state.kind,
                        latest.saved_at
                    );
                }
                format!("Ready. {} photos in album.", count)
            }
            Some(Err(e)) => {
                log::error!("⚠️  Album unavailable: {}", e);
                format!("Album unavailable: {}", e)
            }
            None => {
                log::warn!("⚠️  No data directory, saving is disabled");
                "Saving is disabled: no data directory.".to_string()
            }
        };

        let size = config.thumbnail_size;
        let thumbnails = Task::batch(catalog.items().iter().map(|item| {
            let id = item.id;
            Task::perform(
                media::preview::generate_thumbnail(source.clone(), item.source.clone(), size),
                move |result| {
                    Message::ThumbnailLoaded(
                        id,
                        result.map(|img| ui::to_handle(&img)).map_err(|e| e.to_string()),
                    )
                },
            )
        }));

        (
            PhotoFilter {
                config,
                catalog,
                source,
                album_dir,
                thumbnails: HashMap::new(),
                screen: Screen::List,
                status,
            },
            thumbnails,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ThumbnailLoaded(id, result) => {
                match result {
                    Ok(handle) => {
                        self.thumbnails.insert(id, handle);
                    }
                    Err(e) => log::warn!("⚠️  Thumbnail for item {} failed: {}", id, e),
                }
                Task::none()
            }
            Message::Open(id) => {
                let Some(item) = self.catalog.get(id).cloned() else {
                    return Task::none();
                };

                log::info!("{}", item.name);
                self.status = format!("Loading {}...", item.name);

                let reference = item.source.clone();
                let session = DetailSession::new(
                    item,
                    self.config.default_intensity,
                    self.config.preview_max_edge,
                );
                self.screen = Screen::Detail(DetailScreen::new(session));

                Task::perform(fetch_image(self.source.clone(), reference), move |result| {
                    Message::ImageLoaded(id, result.map(Arc::new).map_err(|e| e.to_string()))
                })
            }
            Message::ImageLoaded(id, result) => {
                let Screen::Detail(detail) = &mut self.screen else {
                    return Task::none();
                };
                // The user may have gone back and opened another item meanwhile
                if detail.session.item().id != id {
                    return Task::none();
                }

                // Loading selects the default filter and renders the first preview
                match result {
                    Ok(img) => {
                        detail.session.load(Arc::unwrap_or_clone(img));
                        self.status = detail.session.item().name.clone();
                    }
                    Err(e) => {
                        detail.session.load_failed(e);
                        self.status = format!(
                            "Could not load image: {}",
                            detail.session.load_error().unwrap_or_default()
                        );
                    }
                }
                detail.refresh();
                Task::none()
            }
            Message::FilterSelected(kind) => {
                if let Screen::Detail(detail) = &mut self.screen {
                    log::info!("The filter is set: {}", kind);
                    detail.session.select_filter(kind);
                    detail.refresh();
                }
                Task::none()
            }
            Message::IntensityChanged(intensity) => {
                if let Screen::Detail(detail) = &mut self.screen {
                    detail.session.set_intensity(intensity);
                    detail.refresh();
                }
                Task::none()
            }
            Message::Save => {
                let Screen::Detail(detail) = &mut self.screen else {
                    return Task::none();
                };
                // The full-resolution source goes to the save task, which
                // renders it again with the same filter and intensity
                let Some(input) = detail.session.input().cloned() else {
                    return Task::none();
                };
                let Some(dir) = self.album_dir.clone() else {
                    self.status = format!("Oops! {}", error::SaveError::NoAlbumDir);
                    return Task::none();
                };

                // Disable the button until SaveComplete arrives
                detail.saving = true;
                self.status = "Saving...".to_string();

                Task::perform(
                    album::render_and_save(
                        dir,
                        self.config.output_format,
                        input,
                        detail.session.state(),
                        detail.session.item().name.clone(),
                    ),
                    |result| {
                        Message::SaveComplete(result.map(|photo| photo.path).map_err(|e| e.to_string()))
                    },
                )
            }
            Message::SaveComplete(result) => {
                if let Screen::Detail(detail) = &mut self.screen {
                    detail.saving = false;
                }
                match result {
                    Ok(path) => {
                        log::info!("Success!");
                        self.status = format!("✅ Saved to {}", path.display());
                    }
                    Err(e) => {
                        log::error!("Oops! {}", e);
                        self.status = format!("Oops! {}", e);
                    }
                }
                Task::none()
            }
            Message::Back => {
                self.screen = Screen::List;
                self.status = format!("{} filters", self.catalog.len());
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::List => ui::list::view(&self.catalog, &self.thumbnails, &self.status),
            Screen::Detail(detail) => detail.view(&self.status),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Initializes the logger.
///
/// Defaults to `info` for this crate; `RUST_LOG` overrides. The GPU and
/// text stacks under iced are kept at `warn`.
fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .filter_module("cosmic_text", log::LevelFilter::Warn)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> iced::Result {
    init_logger();

    iced::application("Photo Filter", PhotoFilter::update, PhotoFilter::view)
        .theme(PhotoFilter::theme)
        .centered()
        .run_with(PhotoFilter::new)
}
