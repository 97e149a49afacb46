use fltk::app::Sender;
use fltk::text::TextBuffer;

use super::document::{Document, DocumentId};
use super::messages::Message;

pub struct TabManager {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
    untitled_counter: u32,
    sender: Sender<Message>,
}

impl TabManager {
    pub fn new(sender: Sender<Message>) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
            untitled_counter: 0,
            sender,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_untitled(&mut self) -> DocumentId {
        self.untitled_counter += 1;
        let id = self.next_document_id();
        let doc = Document::new_untitled(id, self.untitled_counter, self.sender.clone());
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn add_from_file(&mut self, path: String, content: &str) -> DocumentId {
        let id = self.next_document_id();
        let doc = Document::new_from_file(id, path, content, self.sender.clone());
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn active_doc(&self) -> Option<&Document> {
        let active_id = self.active_id?;
        self.documents.iter().find(|d| d.id == active_id)
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        let active_id = self.active_id?;
        self.documents.iter_mut().find(|d| d.id == active_id)
    }

    pub fn active_buffer(&self) -> Option<TextBuffer> {
        self.active_doc().map(|d| d.buffer.clone())
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.active_id = Some(id);
        }
    }

    /// Remove a document by id. Activates the nearest neighbor.
    /// Cleans up the buffer to free memory immediately.
    /// The last remaining document is never removed.
    pub fn remove(&mut self, id: DocumentId) {
        if self.documents.len() <= 1 {
            return;
        }
        let idx = match self.documents.iter().position(|d| d.id == id) {
            Some(i) => i,
            None => return,
        };
        let mut doc = self.documents.remove(idx);
        doc.cleanup();

        if self.active_id == Some(id) {
            if self.documents.is_empty() {
                self.active_id = None;
            } else {
                let new_idx = if idx >= self.documents.len() {
                    self.documents.len() - 1
                } else {
                    idx
                };
                self.active_id = Some(self.documents[new_idx].id);
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    /// Find a document by file path
    pub fn find_by_path(&self, path: &str) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TabManager {
        // Widget-free: TextBuffer and channels work without a shown window.
        let (sender, _receiver) = fltk::app::channel::<Message>();
        TabManager::new(sender)
    }

    #[test]
    fn test_untitled_naming() {
        let mut tabs = manager();
        let a = tabs.add_untitled();
        let b = tabs.add_untitled();
        assert_eq!(tabs.doc_by_id(a).unwrap().display_name, "Untitled");
        assert_eq!(tabs.doc_by_id(b).unwrap().display_name, "Untitled 2");
    }

    #[test]
    fn test_last_added_is_active() {
        let mut tabs = manager();
        tabs.add_untitled();
        let b = tabs.add_from_file("/tmp/notes.txt".to_string(), "hello");
        assert_eq!(tabs.active_id(), Some(b));
        assert_eq!(tabs.active_doc().unwrap().display_name, "notes.txt");
    }

    #[test]
    fn test_remove_activates_neighbor() {
        let mut tabs = manager();
        let a = tabs.add_untitled();
        let b = tabs.add_untitled();
        let c = tabs.add_untitled();
        tabs.set_active(b);
        tabs.remove(b);
        assert_eq!(tabs.count(), 2);
        // neighbor at the removed index
        assert_eq!(tabs.active_id(), Some(c));
        tabs.remove(c);
        assert_eq!(tabs.active_id(), Some(a));
    }

    #[test]
    fn test_last_tab_cannot_be_removed() {
        let mut tabs = manager();
        let a = tabs.add_untitled();
        tabs.remove(a);
        assert_eq!(tabs.count(), 1);
        assert_eq!(tabs.active_id(), Some(a));

        let b = tabs.add_untitled();
        tabs.remove(a);
        tabs.remove(b);
        assert_eq!(tabs.count(), 1);
        assert_eq!(tabs.active_id(), Some(b));
    }

    #[test]
    fn test_find_by_path() {
        let mut tabs = manager();
        let id = tabs.add_from_file("/tmp/a.py".to_string(), "");
        tabs.add_untitled();
        assert_eq!(tabs.find_by_path("/tmp/a.py"), Some(id));
        assert_eq!(tabs.find_by_path("/tmp/b.py"), None);
    }

    #[test]
    fn test_content_check() {
        let mut tabs = manager();
        let id = tabs.add_untitled();
        assert!(!tabs.doc_by_id(id).unwrap().has_content());
        tabs.doc_by_id_mut(id).unwrap().buffer.set_text("   \n  ");
        assert!(!tabs.doc_by_id(id).unwrap().has_content());
        tabs.doc_by_id_mut(id).unwrap().buffer.set_text("x = 1");
        assert!(tabs.doc_by_id(id).unwrap().has_content());
    }

    #[test]
    fn test_style_buffer_tracks_length() {
        let mut tabs = manager();
        let id = tabs.add_from_file("/tmp/a.py".to_string(), "abc");
        let doc = tabs.doc_by_id(id).unwrap();
        assert_eq!(doc.style_buffer.length(), doc.buffer.length());
    }
}
