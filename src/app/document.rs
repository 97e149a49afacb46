use fltk::app::Sender;
use fltk::text::TextBuffer;

use super::buffer_utils::buffer_text_no_leak;
use super::highlight::STYLE_PLAIN;
use super::messages::Message;
use super::text_ops::extract_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// One open tab: a text buffer, its parallel style buffer, and an optional
/// backing file path. The style buffer is kept the same length as the text
/// buffer by the modify callback, which also signals the dispatch loop so a
/// re-highlight can be scheduled.
pub struct Document {
    pub id: DocumentId,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
    pub file_path: Option<String>,
    pub display_name: String,
    pub cursor_position: i32,
    /// Byte spans tagged by the last find, overlaid on top of syntax styles.
    pub search_spans: Vec<(usize, usize)>,
}

impl Document {
    pub fn new_untitled(id: DocumentId, counter: u32, sender: Sender<Message>) -> Self {
        let display_name = if counter == 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled {}", counter)
        };
        Self::build(id, display_name, None, "", sender)
    }

    pub fn new_from_file(
        id: DocumentId,
        path: String,
        content: &str,
        sender: Sender<Message>,
    ) -> Self {
        let display_name = extract_filename(&path);
        Self::build(id, display_name, Some(path), content, sender)
    }

    fn build(
        id: DocumentId,
        display_name: String,
        file_path: Option<String>,
        content: &str,
        sender: Sender<Message>,
    ) -> Self {
        let mut buffer = TextBuffer::default();
        let mut style_buffer = TextBuffer::default();

        let mut style_buf = style_buffer.clone();
        buffer.add_modify_callback(move |pos, inserted, deleted, _restyled, _deleted_text| {
            if inserted > 0 || deleted > 0 {
                if inserted > 0 {
                    let filler: String = std::iter::repeat(char::from(STYLE_PLAIN))
                        .take(inserted as usize)
                        .collect();
                    style_buf.insert(pos, &filler);
                }
                if deleted > 0 {
                    style_buf.remove(pos, pos + deleted);
                }
                sender.send(Message::BufferModified(id));
            }
        });

        buffer.set_text(content);
        let plain: String = std::iter::repeat(char::from(STYLE_PLAIN))
            .take(content.len())
            .collect();
        style_buffer.set_text(&plain);

        Self {
            id,
            buffer,
            style_buffer,
            file_path,
            display_name,
            cursor_position: 0,
            search_spans: Vec::new(),
        }
    }

    /// Whether the buffer holds any non-whitespace text. Close and exit
    /// prompts key off this rather than an explicit modified flag.
    pub fn has_content(&self) -> bool {
        !buffer_text_no_leak(&self.buffer).trim().is_empty()
    }

    pub fn update_display_name(&mut self) {
        if let Some(ref path) = self.file_path {
            self.display_name = extract_filename(path);
        }
    }

    pub fn cleanup(&mut self) {
        self.buffer.set_text("");
        self.style_buffer.set_text("");
    }
}
