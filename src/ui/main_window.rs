use fltk::{
    app::{self, Sender},
    enums::{Color, Event, EventState, Font, Key},
    group::{Flex, FlexType},
    menu::MenuBar,
    prelude::*,
    text::{TextEditor, WrapMode},
    window::Window,
};

use crate::app::messages::Message;
use crate::app::settings::{parse_geometry, Preferences};
use crate::ui::menu::build_menu;
use crate::ui::tab_bar::{TabBar, TAB_BAR_HEIGHT};
use crate::ui::toolbar::{build_toolbar, Toolbar, TOOLBAR_HEIGHT};

const MENU_HEIGHT: i32 = 30;

pub struct MainWidgets {
    pub window: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub toolbar: Toolbar,
    pub tab_bar: TabBar,
    pub editor: TextEditor,
}

pub fn build_main_window(sender: &Sender<Message>, prefs: &Preferences) -> MainWidgets {
    let (width, height) = parse_geometry(&prefs.geometry);

    let mut window = Window::new(100, 100, width, height, "Untitled - JotPad");
    window.set_xclass("jotpad");
    window.make_resizable(true);

    let mut flex = Flex::default_fill();
    flex.set_type(FlexType::Column);

    let mut menu = MenuBar::default();
    flex.fixed(&menu, MENU_HEIGHT);
    build_menu(&mut menu, sender);

    let toolbar = build_toolbar(sender, prefs.opacity);
    flex.fixed(&toolbar.row, TOOLBAR_HEIGHT);

    let tab_bar = TabBar::new(0, 0, width);
    flex.fixed(&tab_bar.group, TAB_BAR_HEIGHT);

    let mut editor = TextEditor::default();
    editor.set_text_font(Font::Courier);
    editor.set_text_size(prefs.font_size as i32);
    editor.set_linenumber_width(0);
    editor.wrap_mode(WrapMode::AtBounds, 0);
    editor.set_cursor_style(fltk::text::Cursor::Normal);
    editor.set_color(Color::Black);

    flex.end();
    window.end();
    window.resizable(&flex);

    install_editor_handler(&mut editor, sender);

    {
        let s = *sender;
        window.resize_callback(move |_, _, _, _, _| s.send(Message::ScheduleHighlight));
    }
    {
        let s = *sender;
        window.set_callback(move |_| {
            if app::event() == Event::Close {
                s.send(Message::Quit);
            }
        });
    }

    MainWidgets {
        window,
        flex,
        menu,
        toolbar,
        tab_bar,
        editor,
    }
}

/// Ctrl+wheel resizes the font; a plain wheel scrolls normally but still
/// nudges the highlighter since the visible region moved. Ctrl+F opens
/// find and Ctrl+Y redoes, neither of which FLTK binds by default.
fn install_editor_handler(editor: &mut TextEditor, sender: &Sender<Message>) {
    let s = *sender;
    editor.handle(move |_, event| match event {
        Event::MouseWheel => {
            if app::event_state().contains(EventState::Ctrl) {
                let delta = match app::event_dy() {
                    app::MouseWheel::Up => 1,
                    app::MouseWheel::Down => -1,
                    _ => 0,
                };
                if delta != 0 {
                    s.send(Message::FontSizeDelta(delta));
                }
                true
            } else {
                s.send(Message::ScheduleHighlight);
                false
            }
        }
        Event::KeyDown => {
            if app::event_state().contains(EventState::Ctrl) {
                if app::event_key() == Key::from_char('f') {
                    s.send(Message::ShowFind);
                    return true;
                }
                if app::event_key() == Key::from_char('y') {
                    s.send(Message::EditRedo);
                    return true;
                }
            }
            false
        }
        _ => false,
    });
}
