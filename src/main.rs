use fltk::{app, prelude::*};

use jotpad::app::highlight_controller::POLL_INTERVAL;
use jotpad::app::messages::Message;
use jotpad::app::settings::Preferences;
use jotpad::app::state::AppState;
use jotpad::ui::main_window::build_main_window;

fn main() {
    let fltk_app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let prefs = Preferences::load();
    let widgets = build_main_window(&sender, &prefs);
    let mut state = AppState::new(widgets, &prefs, sender);

    state.window.show();
    // Compositors only honor opacity on a mapped window.
    state.set_opacity(prefs.opacity);

    // Fixed-interval poll that drains pending highlight requests.
    {
        let s = sender;
        app::add_timeout3(POLL_INTERVAL, move |handle| {
            s.send(Message::PollTick);
            app::repeat_timeout3(POLL_INTERVAL, handle);
        });
    }

    while fltk_app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::FileNew => state.file_new(),
                Message::FileOpen => state.file_open(),
                Message::FileSave => state.file_save(),
                Message::FileSaveAs => state.file_save_as(),
                Message::Quit => {
                    if state.request_quit() {
                        fltk_app.quit();
                    }
                }

                Message::TabSelect(id) => state.switch_to_document(id),
                Message::TabClose(id) => state.close_tab(id),

                Message::EditUndo => state.editor.undo(),
                Message::EditRedo => state.editor.redo(),
                Message::EditCut => state.editor.cut(),
                Message::EditCopy => state.editor.copy(),
                Message::EditPaste => state.editor.paste(),
                Message::SelectAll => state.editor.kf_select_all(),
                Message::ShowFind => state.find(),

                Message::SetTheme(theme) => state.set_theme(theme),
                Message::SetOpacity(value) => state.set_opacity(value),
                Message::FontSizeDelta(delta) => state.font_delta(delta),

                Message::BufferModified(id) => state.buffer_modified(id),
                Message::ScheduleHighlight => state.schedule_highlight(),
                Message::DebounceElapsed(epoch) => state.debounce_elapsed(epoch),
                Message::PollTick => state.poll_highlight(),
                Message::HighlightReady(result) => state.apply_highlight(result),
            }
        }
    }
}
