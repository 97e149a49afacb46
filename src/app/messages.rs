use super::document::DocumentId;
use super::highlight::HighlightResult;
use super::settings::ThemeName;

/// All messages that can be sent through the FLTK channel.
/// Each menu item, toolbar button and timer callback sends one of these;
/// the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    Quit,

    // Tabs
    TabSelect(DocumentId),
    TabClose(DocumentId),

    // Edit
    EditUndo,
    EditRedo,
    EditCut,
    EditCopy,
    EditPaste,
    SelectAll,
    ShowFind,

    // View
    SetTheme(ThemeName),
    SetOpacity(f64),
    FontSizeDelta(i32),

    // Highlighting
    BufferModified(DocumentId),
    ScheduleHighlight,
    DebounceElapsed(u64),
    PollTick,
    HighlightReady(HighlightResult),
}
