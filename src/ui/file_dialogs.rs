use fltk::dialog::{FileDialogType, NativeFileChooser};

const FILTER: &str = "Text Files\t*.txt\nAll Files\t*";

fn run_chooser(dialog_type: FileDialogType, directory: Option<&str>) -> Option<String> {
    let mut nfc = NativeFileChooser::new(dialog_type);
    nfc.set_filter(FILTER);
    if let Some(dir) = directory {
        let _ = nfc.set_directory(&dir);
    }
    nfc.show(); // blocks until close
    let filename = nfc.filename();
    let s = filename.to_string_lossy();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

pub fn native_open_dialog(directory: Option<&str>) -> Option<String> {
    run_chooser(FileDialogType::BrowseFile, directory)
}

pub fn native_save_dialog(directory: Option<&str>) -> Option<String> {
    run_chooser(FileDialogType::BrowseSaveFile, directory)
}
