use fltk::{app::Sender, button::Button, enums::FrameType, group::Group, prelude::*};

use crate::app::document::{Document, DocumentId};
use crate::app::messages::Message;
use crate::ui::theme::Palette;

pub const TAB_BAR_HEIGHT: i32 = 26;
const TAB_WIDTH: i32 = 150;
const CLOSE_WIDTH: i32 = 22;

/// A row of plain buttons, one per open document plus a close button each.
/// Rebuilt from scratch whenever the document list or active tab changes.
pub struct TabBar {
    pub group: Group,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32) -> Self {
        let mut group = Group::new(x, y, w, TAB_BAR_HEIGHT, None);
        group.set_frame(FrameType::FlatBox);
        group.end();
        Self { group }
    }

    pub fn rebuild(
        &mut self,
        documents: &[Document],
        active: Option<DocumentId>,
        sender: &Sender<Message>,
        palette: &Palette,
    ) {
        self.group.clear();
        self.group.set_color(palette.chrome_background);
        self.group.begin();

        let y = self.group.y();
        let x0 = self.group.x();
        for (i, doc) in documents.iter().enumerate() {
            let x = x0 + i as i32 * TAB_WIDTH;
            let is_active = active == Some(doc.id);

            let mut tab = Button::new(x, y, TAB_WIDTH - CLOSE_WIDTH, TAB_BAR_HEIGHT, None);
            tab.set_label(&doc.display_name);
            tab.set_frame(FrameType::ThinUpBox);
            if is_active {
                tab.set_color(palette.background);
                tab.set_label_color(palette.foreground);
            } else {
                tab.set_color(palette.chrome_background);
                tab.set_label_color(palette.chrome_foreground);
            }
            let s = *sender;
            let id = doc.id;
            tab.set_callback(move |_| s.send(Message::TabSelect(id)));

            let mut close = Button::new(x + TAB_WIDTH - CLOSE_WIDTH, y, CLOSE_WIDTH, TAB_BAR_HEIGHT, "x");
            close.set_frame(FrameType::ThinUpBox);
            close.set_color(palette.chrome_background);
            close.set_label_color(palette.chrome_foreground);
            let s = *sender;
            close.set_callback(move |_| s.send(Message::TabClose(id)));
        }

        self.group.end();
        self.group.redraw();
    }
}
