use super::messages::Message;
use super::state::{
    App, INDICATOR_BOTTOM_OFFSET_PX, PAGE_SCROLL_ID, PARAGRAPH_SPACING_PX, SECTION_SPACING_PX,
    TOC_PANEL_WIDTH_PX,
};
use crate::document::Section;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::text::{LineHeight, Wrapping};
use iced::widget::{Column, button, column, container, row, scrollable, stack, text};
use iced::{Element, Length, Padding};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let sections: Vec<Element<'_, Message>> = self
            .document
            .sections
            .iter()
            .map(|section| self.section_view(section))
            .collect();

        let article = Column::with_children(sections)
            .spacing(SECTION_SPACING_PX)
            .max_width(self.config.content_max_width)
            .width(Length::Fill);

        let page = scrollable(
            container(article)
                .padding(self.config.content_padding)
                .width(Length::Fill)
                .align_x(Horizontal::Center),
        )
        .on_scroll(|viewport| Message::Scrolled {
            offset_y: viewport.absolute_offset().y,
            viewport_width: viewport.bounds().width,
            viewport_height: viewport.bounds().height,
            content_height: viewport.content_bounds().height,
        })
        .id(PAGE_SCROLL_ID.clone())
        .width(Length::Fill)
        .height(Length::Fill);

        let overlay = container(self.indicator_view())
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Bottom)
            .padding(Padding {
                top: 0.0,
                right: 0.0,
                bottom: f32::from(INDICATOR_BOTTOM_OFFSET_PX),
                left: 0.0,
            });

        stack![page, overlay].into()
    }

    fn section_view<'a>(&self, section: &'a Section) -> Element<'a, Message> {
        let mut body: Column<'a, Message> = column![
            text(section.title.as_str())
                .size(self.config.heading_size as f32)
                .line_height(LineHeight::Relative(super::state::HEADING_LINE_HEIGHT))
                .wrapping(Wrapping::WordOrGlyph)
        ]
        .spacing(PARAGRAPH_SPACING_PX);

        for paragraph in &section.paragraphs {
            body = body.push(
                text(paragraph.as_str())
                    .size(self.config.font_size as f32)
                    .line_height(LineHeight::Relative(self.config.line_spacing))
                    .wrapping(Wrapping::WordOrGlyph)
                    .width(Length::Fill),
            );
        }

        body.width(Length::Fill).into()
    }

    /// Floating pill with the index toggle and progress label, plus the index
    /// panel above it while open.
    fn indicator_view(&self) -> Element<'_, Message> {
        let mut overlay: Column<'_, Message> =
            Column::new().spacing(8).align_x(Horizontal::Center);

        if !self.indicator_mounted() {
            return overlay.into();
        }

        if self.toc.is_open() {
            overlay = overlay.push(self.toc_panel());
        }

        let arrow = if self.toc.is_open() { "▴" } else { "▾" };
        let pill = row![
            button(text(format!("Index {arrow}")))
                .style(button::text)
                .on_press(Message::ToggleToc),
            text(self.tracker.progress().to_string()),
        ]
        .spacing(12)
        .align_y(Vertical::Center);

        overlay = overlay.push(
            container(pill)
                .padding([6, 16])
                .style(container::rounded_box),
        );

        overlay.into()
    }

    fn toc_panel(&self) -> Element<'_, Message> {
        let entries = self.toc.entries().iter().map(|entry| {
            button(text(entry.title.as_str()).wrapping(Wrapping::WordOrGlyph))
                .style(button::text)
                .width(Length::Fill)
                .on_press(Message::NavigateTo(entry.id.clone()))
                .into()
        });

        let panel = column![text("Table of Contents").size(18)]
            .push(Column::with_children(entries).spacing(2))
            .spacing(8);

        container(panel)
            .padding(12)
            .width(TOC_PANEL_WIDTH_PX)
            .style(container::rounded_box)
            .into()
    }
}
