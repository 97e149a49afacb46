use fltk::{
    app::{self, Sender},
    button::Button,
    enums::Event,
    frame::Frame,
    group::{Flex, FlexType},
    prelude::*,
    valuator::HorSlider,
};

use crate::app::messages::Message;
use crate::app::settings::{MAX_OPACITY, MIN_OPACITY};

pub const TOOLBAR_HEIGHT: i32 = 34;

pub struct Toolbar {
    pub row: Flex,
    pub opacity_slider: HorSlider,
}

/// Map a fractional slider position to a window opacity. Clamped to the
/// valid range and monotonic in the fraction.
pub fn opacity_from_fraction(fraction: f64) -> f64 {
    MIN_OPACITY + fraction.clamp(0.0, 1.0) * (MAX_OPACITY - MIN_OPACITY)
}

/// New/Open/Save/Find buttons plus the opacity slider. Must be called inside
/// an open group (the main window's column Flex).
pub fn build_toolbar(sender: &Sender<Message>, initial_opacity: f64) -> Toolbar {
    let mut row = Flex::default();
    row.set_type(FlexType::Row);
    row.set_margin(3);

    for (label, msg) in [
        ("New", Message::FileNew),
        ("Open", Message::FileOpen),
        ("Save", Message::FileSave),
        ("Find", Message::ShowFind),
    ] {
        let mut button = Button::default().with_label(label);
        row.fixed(&button, 64);
        let s = *sender;
        button.set_callback(move |_| s.send(msg.clone()));
    }

    let label = Frame::default().with_label("Opacity:");
    row.fixed(&label, 70);

    let mut opacity_slider = HorSlider::default();
    opacity_slider.set_bounds(MIN_OPACITY, MAX_OPACITY);
    opacity_slider.set_step(0.01, 1);
    opacity_slider.set_value(initial_opacity.clamp(MIN_OPACITY, MAX_OPACITY));

    // A direct click jumps the thumb to the click's fractional position
    // instead of requiring a drag; drags go through the same mapping.
    let s = *sender;
    opacity_slider.handle(move |slider, event| match event {
        Event::Push | Event::Drag => {
            let fraction = (app::event_x() - slider.x()) as f64 / slider.w().max(1) as f64;
            let value = opacity_from_fraction(fraction);
            slider.set_value(value);
            s.send(Message::SetOpacity(value));
            true
        }
        _ => false,
    });

    row.end();
    Toolbar {
        row,
        opacity_slider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_in_range() {
        for i in -10..=20 {
            let value = opacity_from_fraction(i as f64 / 10.0);
            assert!((MIN_OPACITY..=MAX_OPACITY).contains(&value));
        }
    }

    #[test]
    fn test_opacity_endpoints() {
        assert!((opacity_from_fraction(0.0) - MIN_OPACITY).abs() < 1e-9);
        assert!((opacity_from_fraction(1.0) - MAX_OPACITY).abs() < 1e-9);
        // positions outside the widget clamp to the endpoints
        assert!((opacity_from_fraction(-0.5) - MIN_OPACITY).abs() < 1e-9);
        assert!((opacity_from_fraction(1.5) - MAX_OPACITY).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_monotonic() {
        let mut prev = opacity_from_fraction(0.0);
        for i in 1..=100 {
            let value = opacity_from_fraction(i as f64 / 100.0);
            assert!(value >= prev);
            prev = value;
        }
    }
}
