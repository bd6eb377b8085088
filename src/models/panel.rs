/// Snapshot of a visible detail panel: its DOM serialized to HTML plus the
/// rendered text, captured in one pass so field extraction runs without
/// further browser round-trips. The text read is best-effort; `None` means
/// the panel's visible text could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub html: String,
    pub text: Option<String>,
}

impl PanelSnapshot {
    pub fn new(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: Some(text.into()),
        }
    }

    pub fn without_text(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: None,
        }
    }
}
