// Copyright (c) 2024 Mike Tsao

use crate::{prelude::*, types::u7};
use core::ops::RangeInclusive;
use eframe::{
    egui::{vec2, Widget},
    emath::RectTransform,
    epaint::{pos2, Rect, RectShape, Rounding, Shape},
};

/// An egui widget that draws a [VoiceActivityGrid]: one row per MIDI channel,
/// one column per key, with sounding voices lit.
#[derive(Debug)]
pub struct VoiceGridWidget<'a> {
    grid: &'a VoiceActivityGrid,
    keys: RangeInclusive<u8>,
    row_height: f32,
}
impl<'a> VoiceGridWidget<'a> {
    /// When nothing is sounding, show the three octaves around middle C.
    pub const DEFAULT_KEYS: RangeInclusive<u8> = 48..=84;

    /// Rows shorter than this are hard to see.
    const MIN_ROW_HEIGHT: f32 = 2.0;

    fn new(grid: &'a VoiceActivityGrid) -> Self {
        Self {
            grid,
            keys: Self::visible_keys(grid),
            row_height: 6.0,
        }
    }

    fn row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height.max(Self::MIN_ROW_HEIGHT);
        self
    }

    /// The columns to draw: the default span, widened to include any sounding
    /// key outside it.
    pub fn visible_keys(grid: &VoiceActivityGrid) -> RangeInclusive<u8> {
        match grid.key_range() {
            Some(active) => {
                (*active.start()).min(*Self::DEFAULT_KEYS.start())
                    ..=(*active.end()).max(*Self::DEFAULT_KEYS.end())
            }
            None => Self::DEFAULT_KEYS,
        }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(grid: &'a VoiceActivityGrid, row_height: f32) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| VoiceGridWidget::new(grid).row_height(row_height).ui(ui)
    }
}
impl<'a> eframe::egui::Widget for VoiceGridWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let rows = MidiChannel::COUNT as f32;
        let desired_size = vec2(ui.available_width(), self.row_height * rows);
        let (rect, response) = ui.allocate_exact_size(desired_size, eframe::egui::Sense::hover());

        let first_key = *self.keys.start() as f32;
        let columns = (*self.keys.end() - *self.keys.start()) as f32 + 1.0;
        let to_screen = RectTransform::from_to(
            Rect::from_x_y_ranges(first_key..=first_key + columns, 0.0..=rows),
            rect,
        );
        let visuals = ui.ctx().style().visuals.widgets.noninteractive;
        let lit = ui.visuals().selection.bg_fill;

        let mut shapes = vec![Shape::Rect(RectShape::filled(
            rect,
            visuals.rounding,
            visuals.bg_fill,
        ))];
        for channel in 0..MidiChannel::COUNT {
            let channel = MidiChannel::new(channel as u8);
            let row = channel.0 as f32;
            for key in self.grid.active_keys(channel) {
                if !self.keys.contains(&key.as_int()) {
                    continue;
                }
                let column = key.as_int() as f32;
                shapes.push(Shape::rect_filled(
                    Rect::from_min_max(
                        to_screen * pos2(column, row),
                        to_screen * pos2(column + 1.0, row + 1.0),
                    ),
                    Rounding::default(),
                    lit,
                ));
            }
        }
        ui.painter().extend(shapes);

        let count = self.grid.active_count();
        response.on_hover_text(match count {
            0 => "No voices".to_string(),
            1 => "1 voice".to_string(),
            n => format!("{n} voices"),
        })
    }
}

/// The label for a grid column, such as "C4" for key 60.
pub fn key_label(key: u7) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let key = key.as_int() as i16;
    format!("{}{}", NAMES[(key % 12) as usize], key / 12 - 1)
}
