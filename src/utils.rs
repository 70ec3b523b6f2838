#[cfg(windows)]
pub fn setup_console() {
    use windows_sys::Win32::System::Console::{
        GetStdHandle, GetConsoleMode, SetConsoleMode, SetConsoleOutputCP,
        STD_OUTPUT_HANDLE, ENABLE_VIRTUAL_TERMINAL_PROCESSING,
    };
    unsafe {
        SetConsoleOutputCP(65001);
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        let mut mode = 0;
        if GetConsoleMode(handle, &mut mode) != 0 {
            SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
        }
    }
}

#[cfg(not(windows))]
pub fn setup_console() {}

/// Flattens a tab-indented snapshot into plain lines for alert bodies.
pub fn strip_indentation(text: &str) -> String {
    text.replace('\t', "")
}

/// Pulls the contents of the first complete `<title>` element out of an
/// HTML body, if there is one.
pub fn extract_html_title(body: &str) -> Option<String> {
    if !body.contains("<title>") {
        return None;
    }
    let after_open = body.split("<title>").last()?;
    if !after_open.contains("</title>") {
        return None;
    }
    after_open
        .split("</title>")
        .next()
        .map(|title| title.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_tabs() {
        let text = "\ta line:\n\t\tindented";
        assert_eq!(strip_indentation(text), "a line:\nindented");
    }

    #[test]
    fn extracts_title_from_html() {
        let body = "<html><head><title>Site Administration</title></head><body/></html>";
        assert_eq!(extract_html_title(body).as_deref(), Some("Site Administration"));
    }

    #[test]
    fn missing_title_yields_none() {
        assert_eq!(extract_html_title("<html><body>no title</body></html>"), None);
    }

    #[test]
    fn unterminated_title_yields_none() {
        assert_eq!(extract_html_title("<html><title>half open"), None);
    }
}
