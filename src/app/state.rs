use std::fs;
use std::path::Path;

use fltk::{
    app::Sender,
    dialog,
    menu::MenuBar,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use super::buffer_utils::buffer_text_no_leak;
use super::document::{Document, DocumentId};
use super::encoding;
use super::highlight::{self, HighlightResult, ScanJob};
use super::highlight_controller::HighlightController;
use super::messages::Message;
use super::settings::{Preferences, ThemeName, MAX_OPACITY, MIN_OPACITY};
use super::tab_manager::TabManager;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::MainWidgets;
use crate::ui::tab_bar::TabBar;
use crate::ui::theme;

/// Everything the dispatch loop mutates. All methods run on the UI thread;
/// worker threads only ever hand results back through the channel.
pub struct AppState {
    pub tab_manager: TabManager,
    pub tab_bar: TabBar,
    pub editor: TextEditor,
    pub window: Window,
    pub menu: MenuBar,
    sender: Sender<Message>,
    theme: ThemeName,
    font_size: i32,
    opacity: f64,
    highlight: HighlightController,
    last_open_directory: Option<String>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, prefs: &Preferences, sender: Sender<Message>) -> Self {
        let MainWidgets {
            window,
            flex: _,
            menu,
            toolbar: _,
            tab_bar,
            editor,
        } = widgets;

        let mut state = Self {
            tab_manager: TabManager::new(sender),
            tab_bar,
            editor,
            window,
            menu,
            sender,
            theme: prefs.theme,
            font_size: prefs.font_size.max(1) as i32,
            opacity: prefs.opacity.clamp(MIN_OPACITY, MAX_OPACITY),
            highlight: HighlightController::new(),
            last_open_directory: None,
        };

        state.tab_manager.add_untitled();
        state.apply_current_theme();
        state.bind_active_buffer();
        state.update_window_title();
        state.rebuild_tab_bar();
        state.schedule_highlight();
        state
    }

    // ---- tabs ----

    /// Point the shared editor widget at the active document's buffers.
    /// The style table carries the current theme and font size, so theme
    /// and font changes also go through here.
    fn bind_active_buffer(&mut self) {
        let Some(doc) = self.tab_manager.active_doc() else {
            return;
        };
        let palette = theme::palette(self.theme);
        let table = theme::style_table(&palette, self.font_size);
        self.editor.set_buffer(doc.buffer.clone());
        self.editor
            .set_highlight_data(doc.style_buffer.clone(), table);
    }

    pub fn switch_to_document(&mut self, id: DocumentId) {
        if let Some(doc) = self.tab_manager.active_doc_mut() {
            doc.cursor_position = self.editor.insert_position();
        }
        self.tab_manager.set_active(id);
        self.bind_active_buffer();
        if let Some(doc) = self.tab_manager.active_doc() {
            self.editor.set_insert_position(doc.cursor_position);
        }
        self.update_window_title();
        self.rebuild_tab_bar();
        self.schedule_highlight();
    }

    pub fn close_tab(&mut self, id: DocumentId) {
        // The last tab always stays open.
        if self.tab_manager.count() <= 1 {
            return;
        }
        let has_content = self
            .tab_manager
            .doc_by_id(id)
            .map(|d| d.has_content())
            .unwrap_or(false);
        if has_content {
            let name = self
                .tab_manager
                .doc_by_id(id)
                .map(|d| d.display_name.clone())
                .unwrap_or_default();
            match dialog::choice2_default(
                &format!("Save \"{}\" before closing?", name),
                "Save",
                "Don't Save",
                "Cancel",
            ) {
                Some(0) => {
                    self.switch_to_document(id);
                    self.file_save();
                    // A cancelled Save As leaves the document pathless;
                    // treat that as cancelling the close.
                    let saved = self
                        .tab_manager
                        .doc_by_id(id)
                        .is_some_and(|d| d.file_path.is_some());
                    if !saved {
                        return;
                    }
                }
                Some(1) => {}
                _ => return,
            }
        }
        self.tab_manager.remove(id);
        self.bind_active_buffer();
        self.update_window_title();
        self.rebuild_tab_bar();
        self.schedule_highlight();
    }

    fn update_window_title(&mut self) {
        let name = self
            .tab_manager
            .active_doc()
            .map(|d| d.display_name.clone())
            .unwrap_or_else(|| "Untitled".to_string());
        self.window.set_label(&format!("{} - JotPad", name));
    }

    fn rebuild_tab_bar(&mut self) {
        let palette = theme::palette(self.theme);
        self.tab_bar.rebuild(
            self.tab_manager.documents(),
            self.tab_manager.active_id(),
            &self.sender,
            &palette,
        );
    }

    // ---- file operations ----

    pub fn file_new(&mut self) {
        self.tab_manager.add_untitled();
        self.bind_active_buffer();
        self.update_window_title();
        self.rebuild_tab_bar();
        self.schedule_highlight();
    }

    pub fn file_open(&mut self) {
        let Some(path) = native_open_dialog(self.last_open_directory.as_deref()) else {
            return;
        };
        self.open_path(&path);
    }

    /// Open a file in a new tab, or switch to it if it is already open.
    pub fn open_path(&mut self, path: &str) {
        if let Some(existing) = self.tab_manager.find_by_path(path) {
            self.switch_to_document(existing);
            return;
        }
        match encoding::read_file_text(Path::new(path)) {
            Ok(content) => {
                self.last_open_directory = Path::new(path)
                    .parent()
                    .map(|p| p.to_string_lossy().to_string());
                self.tab_manager.add_from_file(path.to_string(), &content);
                self.bind_active_buffer();
                self.update_window_title();
                self.rebuild_tab_bar();
                self.schedule_highlight();
            }
            Err(err) => {
                dialog::alert_default(&format!("Could not open {}:\n{}", path, err));
            }
        }
    }

    pub fn file_save(&mut self) {
        let path = self
            .tab_manager
            .active_doc()
            .and_then(|d| d.file_path.clone());
        match path {
            Some(path) => {
                if let Some(doc) = self.tab_manager.active_doc_mut() {
                    if let Err(err) = save_document(doc, &path) {
                        dialog::alert_default(&format!("Could not save {}:\n{}", path, err));
                    }
                }
            }
            None => self.file_save_as(),
        }
    }

    pub fn file_save_as(&mut self) {
        let Some(path) = native_save_dialog(self.last_open_directory.as_deref()) else {
            return;
        };
        if let Some(doc) = self.tab_manager.active_doc_mut() {
            if let Err(err) = save_document(doc, &path) {
                dialog::alert_default(&format!("Could not save {}:\n{}", path, err));
                return;
            }
        }
        self.last_open_directory = Path::new(&path)
            .parent()
            .map(|p| p.to_string_lossy().to_string());
        self.update_window_title();
        self.rebuild_tab_bar();
    }

    /// Prompt per tab that still holds text, then persist preferences.
    /// Returns false if the user cancelled the exit.
    pub fn request_quit(&mut self) -> bool {
        let unsaved: Vec<DocumentId> = self
            .tab_manager
            .documents()
            .iter()
            .filter(|d| d.has_content())
            .map(|d| d.id)
            .collect();
        for id in unsaved {
            self.switch_to_document(id);
            let name = self
                .tab_manager
                .doc_by_id(id)
                .map(|d| d.display_name.clone())
                .unwrap_or_default();
            match dialog::choice2_default(
                &format!("Save \"{}\" before exiting?", name),
                "Save",
                "Don't Save",
                "Cancel",
            ) {
                Some(0) => {
                    self.file_save();
                    let saved = self
                        .tab_manager
                        .doc_by_id(id)
                        .is_some_and(|d| d.file_path.is_some());
                    if !saved {
                        return false;
                    }
                }
                Some(1) => {}
                _ => return false,
            }
        }
        self.save_preferences();
        true
    }

    fn save_preferences(&self) {
        let prefs = Preferences {
            theme: self.theme,
            font_size: self.font_size.max(1) as u32,
            geometry: format!("{}x{}", self.window.w(), self.window.h()),
            opacity: self.opacity,
        };
        if let Err(err) = prefs.save() {
            eprintln!("jotpad: failed to save settings: {}", err);
        }
    }

    // ---- view ----

    pub fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme;
        self.apply_current_theme();
        self.bind_active_buffer();
        self.rebuild_tab_bar();
        self.schedule_highlight();
    }

    fn apply_current_theme(&mut self) {
        let palette = theme::palette(self.theme);
        theme::apply_theme(&mut self.editor, &mut self.window, &mut self.menu, &palette);
    }

    pub fn set_opacity(&mut self, value: f64) {
        self.opacity = value.clamp(MIN_OPACITY, MAX_OPACITY);
        self.window.set_opacity(self.opacity);
    }

    pub fn font_delta(&mut self, delta: i32) {
        self.font_size = (self.font_size + delta).max(1);
        self.editor.set_text_size(self.font_size);
        self.bind_active_buffer();
        self.editor.redraw();
        self.schedule_highlight();
    }

    // ---- find ----

    /// Prompt for a needle and tag every occurrence across the whole buffer.
    pub fn find(&mut self) {
        let Some(needle) = dialog::input_default("Find:", "") else {
            return;
        };
        let Some(doc) = self.tab_manager.active_doc_mut() else {
            return;
        };
        apply_find(doc, &needle);
        self.editor.redraw();
    }

    // ---- highlighting ----

    pub fn schedule_highlight(&mut self) {
        self.highlight.schedule(&self.sender);
    }

    pub fn debounce_elapsed(&mut self, epoch: u64) {
        self.highlight.debounce_elapsed(epoch);
    }

    pub fn poll_highlight(&mut self) {
        let tab_manager = &self.tab_manager;
        let editor = &self.editor;
        let font_size = self.font_size;
        let sender = self.sender;
        self.highlight
            .poll(&sender, || scan_job(tab_manager, editor, font_size));
    }

    pub fn apply_highlight(&mut self, result: HighlightResult) {
        let active = self.tab_manager.active_id();
        if !self.highlight.scan_finished(result.doc, active) {
            return;
        }
        let Some(doc) = self.tab_manager.active_doc_mut() else {
            return;
        };
        // The buffer changed underneath the scan; a fresh request is
        // already pending from the modify callback.
        if doc.buffer.length().max(0) as usize != result.buffer_len {
            return;
        }
        let start = result.byte_start as i32;
        let end = start + result.style.len() as i32;
        doc.style_buffer.replace(start, end, &result.style);
        self.editor.redraw();
    }

    pub fn buffer_modified(&mut self, id: DocumentId) {
        if self.tab_manager.active_id() == Some(id) {
            self.schedule_highlight();
        }
    }
}

/// Write the buffer to `path`, always as UTF-8 whatever the source encoding
/// was on open. The document takes the path and display name only after the
/// write succeeds, so a failed save leaves it exactly as it was.
fn save_document(doc: &mut Document, path: &str) -> std::io::Result<()> {
    let text = buffer_text_no_leak(&doc.buffer);
    fs::write(path, text)?;
    doc.file_path = Some(path.to_string());
    doc.update_display_name();
    Ok(())
}

/// Tag every literal occurrence of `needle` across the whole buffer,
/// clearing the previous search tags first. An empty search term is a no-op.
fn apply_find(doc: &mut Document, needle: &str) {
    if needle.is_empty() {
        return;
    }
    let text = buffer_text_no_leak(&doc.buffer);
    doc.search_spans = highlight::search_spans(&text, needle);

    let mut style = buffer_text_no_leak(&doc.style_buffer).into_bytes();
    style.resize(text.len(), highlight::STYLE_PLAIN);
    highlight::apply_search_spans(&mut style, &doc.search_spans);
    // style chars are ASCII
    if let Ok(style) = String::from_utf8(style) {
        doc.style_buffer.set_text(&style);
    }
}

/// Snapshot the active document for a worker scan. The viewport is
/// approximated as one screenful either side of the caret line, with a
/// row height estimated from the font size.
fn scan_job(tabs: &TabManager, editor: &TextEditor, font_size: i32) -> Option<ScanJob> {
    let doc = tabs.active_doc()?;
    let text = buffer_text_no_leak(&doc.buffer);
    let caret_line = doc
        .buffer
        .count_lines(0, editor.insert_position())
        .max(0) as usize;
    let row_height = (font_size + 4).max(1);
    let rows = (editor.h() / row_height).max(1) as usize + 1;
    Some(ScanJob {
        doc: doc.id,
        text,
        caret_line,
        rows,
        search_spans: doc.search_spans.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_text(text: &str) -> Document {
        let (sender, _receiver) = fltk::app::channel::<Message>();
        let mut doc = Document::new_untitled(DocumentId(1), 1, sender);
        doc.buffer.set_text(text);
        doc
    }

    #[test]
    fn test_save_assigns_path_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut doc = doc_with_text("x = 1\n");

        save_document(&mut doc, path.to_str().unwrap()).unwrap();
        assert_eq!(doc.file_path.as_deref(), path.to_str());
        assert_eq!(doc.display_name, "out.txt");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_failed_save_leaves_document_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let mut doc = doc_with_text("x = 1\n");

        assert!(save_document(&mut doc, path.to_str().unwrap()).is_err());
        assert!(doc.file_path.is_none());
        assert_eq!(doc.display_name, "Untitled");
    }

    #[test]
    fn test_find_tags_all_occurrences() {
        let mut doc = doc_with_text("cat bat cat");
        apply_find(&mut doc, "cat");
        assert_eq!(doc.search_spans, vec![(0, 3), (8, 11)]);
        assert_eq!(doc.style_buffer.text(), "EEEAAAAAEEE");
    }

    #[test]
    fn test_empty_search_term_is_noop() {
        let mut doc = doc_with_text("cat bat cat");
        apply_find(&mut doc, "cat");
        let tagged = doc.style_buffer.text();

        apply_find(&mut doc, "");
        assert_eq!(doc.search_spans, vec![(0, 3), (8, 11)]);
        assert_eq!(doc.style_buffer.text(), tagged);
    }

    #[test]
    fn test_new_search_clears_previous_tags() {
        let mut doc = doc_with_text("cat bat");
        apply_find(&mut doc, "cat");
        apply_find(&mut doc, "bat");
        assert_eq!(doc.search_spans, vec![(4, 7)]);
        assert_eq!(doc.style_buffer.text(), "AAAAEEE");
    }
}
