use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};
use std::collections::HashMap;

use crate::state::catalog::{Catalog, CatalogItem};
use crate::Message;

/// Edge length of a list row thumbnail on screen
const ROW_THUMB: f32 = 100.0;

/// The home screen: one row per catalog item
pub fn view<'a>(
    catalog: &'a Catalog,
    thumbnails: &'a HashMap<u32, Handle>,
    status: &'a str,
) -> Element<'a, Message> {
    if catalog.is_empty() {
        return column![text("Filters").size(40), text("No images in the catalog.")]
            .spacing(20)
            .padding(20)
            .into();
    }

    let rows = Column::with_children(
        catalog
            .items()
            .iter()
            .map(|item| item_row(item, thumbnails.get(&item.id))),
    )
    .spacing(10);

    column![
        text("Filters").size(40),
        scrollable(rows).height(Length::Fill),
        text(status).size(14),
    ]
    .spacing(20)
    .padding(20)
    .into()
}

fn item_row<'a>(item: &'a CatalogItem, thumbnail: Option<&Handle>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Some(handle) => image(handle.clone())
            .width(ROW_THUMB)
            .height(ROW_THUMB)
            .into(),
        // Still loading, or the image could not be fetched
        None => container(text("…"))
            .width(ROW_THUMB)
            .height(ROW_THUMB)
            .center_x(ROW_THUMB)
            .center_y(ROW_THUMB)
            .into(),
    };

    button(
        row![picture, text(&item.name).size(20)]
            .spacing(20)
            .align_y(Alignment::Center),
    )
    .on_press(Message::Open(item.id))
    .width(Length::Fill)
    .padding(10)
    .into()
}
