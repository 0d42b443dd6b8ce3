use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, pick_list, row, slider, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::filter::{self, FilterKind, Parameter};
use crate::state::session::{DetailSession, Phase};
use crate::Message;

/// Edge of the square preview area
const PREVIEW_SIZE: f32 = 320.0;

/// Detail screen state: the filter session plus what the UI caches for it
pub struct DetailScreen {
    pub session: DetailSession,
    /// Handle for the current preview, rebuilt after every render
    preview: Option<Handle>,
    /// A save is in flight
    pub saving: bool,
}

impl DetailScreen {
    pub fn new(session: DetailSession) -> Self {
        Self {
            session,
            preview: None,
            saving: false,
        }
    }

    /// Rebuild the preview handle from the session's current image
    pub fn refresh(&mut self) {
        self.preview = self.session.display_image().map(super::to_handle);
    }

    pub fn view<'a>(&'a self, status: &'a str) -> Element<'a, Message> {
        let preview: Element<'a, Message> = match &self.preview {
            Some(handle) => image(handle.clone())
                .width(PREVIEW_SIZE)
                .height(PREVIEW_SIZE)
                .content_fit(ContentFit::Contain)
                .into(),
            None if self.session.load_error().is_some() => container(text("Image unavailable"))
                .width(PREVIEW_SIZE)
                .height(PREVIEW_SIZE)
                .center_x(PREVIEW_SIZE)
                .center_y(PREVIEW_SIZE)
                .into(),
            None => container(text("Loading…"))
                .width(PREVIEW_SIZE)
                .height(PREVIEW_SIZE)
                .center_x(PREVIEW_SIZE)
                .center_y(PREVIEW_SIZE)
                .into(),
        };

        let state = self.session.state();
        let loaded = self.session.is_loaded();

        let filter_picker = pick_list(FilterKind::ALL, state.kind, Message::FilterSelected)
            .placeholder("Choose a filter");

        let intensity = row![
            text("Intensity"),
            slider(0.0..=1.0, state.intensity, Message::IntensityChanged).step(0.01),
            text(format!("{:.2}", state.intensity)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let hint = match (self.session.phase(), state.kind) {
            (Phase::Unconfigured, _) if loaded => "No filter is selected".to_string(),
            (_, Some(kind)) => parameter_summary(kind, state.intensity),
            _ => String::new(),
        };

        let can_save = loaded && self.session.rendered().is_some() && !self.saving;
        let actions = row![
            button("Back").on_press(Message::Back).padding(10),
            button(if self.saving { "Saving…" } else { "Save" })
                .on_press_maybe(can_save.then_some(Message::Save))
                .padding(10),
        ]
        .spacing(20);

        let content = column![
            preview,
            text(&self.session.item().name).size(32),
            filter_picker,
            intensity,
            text(hint).size(14),
            actions,
            text(status).size(14),
        ]
        .spacing(20)
        .padding(25)
        .max_width(600)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }
}

/// One line listing the values the slider is driving, e.g. "radius 100.0"
fn parameter_summary(kind: FilterKind, intensity: f32) -> String {
    let configured = filter::configure(kind, intensity);
    Parameter::ALL
        .into_iter()
        .filter(|&p| kind.supports(p))
        .filter_map(|p| configured.settings.get(p).map(|v| format!("{} {:.1}", p.name(), v)))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_summary() {
        assert_eq!(parameter_summary(FilterKind::GaussianBlur, 0.5), "radius 100.0");
        assert_eq!(parameter_summary(FilterKind::SepiaTone, 0.2), "intensity 0.2");
        assert_eq!(
            parameter_summary(FilterKind::Vignette, 0.5),
            "intensity 0.5 · radius 100.0"
        );
    }
}
