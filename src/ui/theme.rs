use fltk::{
    enums::{Color, Font},
    menu::MenuBar,
    prelude::*,
    text::{StyleTableEntry, TextEditor},
    window::Window,
};

use crate::app::settings::ThemeName;

/// The fixed color set of one theme. Chrome colors cover the window, menu,
/// toolbar and tab bar; the rest map onto the editor and its style table.
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub caret: Color,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub search: Color,
    pub select_background: Color,
    pub select_foreground: Color,
    pub chrome_background: Color,
    pub chrome_foreground: Color,
}

pub fn palette(theme: ThemeName) -> Palette {
    match theme {
        ThemeName::Dark => Palette {
            background: Color::from_rgb(0, 0, 0),
            foreground: Color::from_rgb(255, 255, 255),
            caret: Color::from_rgb(255, 255, 255),
            keyword: Color::from_rgb(0, 255, 255),
            string: Color::from_rgb(0, 255, 0),
            comment: Color::from_rgb(170, 170, 170),
            search: Color::from_rgb(255, 215, 0),
            select_background: Color::from_rgb(85, 85, 85),
            select_foreground: Color::from_rgb(255, 255, 255),
            chrome_background: Color::from_rgb(35, 35, 35),
            chrome_foreground: Color::from_rgb(220, 220, 220),
        },
        ThemeName::Light => Palette {
            background: Color::from_rgb(255, 255, 255),
            foreground: Color::from_rgb(0, 0, 0),
            caret: Color::from_rgb(0, 0, 0),
            keyword: Color::from_rgb(0, 0, 255),
            string: Color::from_rgb(0, 128, 0),
            comment: Color::from_rgb(128, 128, 128),
            search: Color::from_rgb(200, 120, 0),
            select_background: Color::from_rgb(173, 216, 230),
            select_foreground: Color::from_rgb(0, 0, 0),
            chrome_background: Color::from_rgb(240, 240, 240),
            chrome_foreground: Color::from_rgb(0, 0, 0),
        },
    }
}

/// Style table for `set_highlight_data`, indexed by the style chars in
/// `app::highlight` ('A' plain, 'B' keyword, 'C' string, 'D' comment,
/// 'E' search).
pub fn style_table(palette: &Palette, font_size: i32) -> Vec<StyleTableEntry> {
    [
        palette.foreground,
        palette.keyword,
        palette.string,
        palette.comment,
        palette.search,
    ]
    .iter()
    .map(|&color| StyleTableEntry {
        color,
        font: Font::Courier,
        size: font_size,
    })
    .collect()
}

/// Recolor the chrome and the editor. Selection and caret colors are part of
/// the palette; syntax colors are reapplied by rebinding the style table.
pub fn apply_theme(
    editor: &mut TextEditor,
    window: &mut Window,
    menu: &mut MenuBar,
    palette: &Palette,
) {
    editor.set_color(palette.background);
    editor.set_text_color(palette.foreground);
    editor.set_cursor_color(palette.caret);
    editor.set_selection_color(palette.select_background);

    window.set_color(palette.chrome_background);
    window.set_label_color(palette.chrome_foreground);
    menu.set_color(palette.chrome_background);
    menu.set_text_color(palette.chrome_foreground);
    menu.set_selection_color(palette.select_background);

    editor.redraw();
    window.redraw();
    menu.redraw();
}
