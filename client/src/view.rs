//! Plain-text rendering of the session view.

use std::fmt::Write;

use crate::ViewModel;

/// Render the view: header, notice, form (when visible), then the list.
pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();
    out.push_str("Petitions\n");

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "> {notice}");
    }

    if view.state.form_visible() {
        out.push_str("--- New petition ---\n");
        let _ = writeln!(out, "Title: {}", view.title);
        let _ = writeln!(out, "Description: {}", view.description);
        out.push_str("--------------------\n");
    }

    if view.loading {
        out.push_str("Loading...\n");
    } else if let Some(error) = &view.load_error {
        let _ = writeln!(out, "Could not load petitions: {error}");
    } else if view.petitions.is_empty() {
        out.push_str("No petitions yet.\n");
    } else {
        for petition in &view.petitions {
            let _ = writeln!(out, "\n#{} {}", petition.id, petition.title);
            let _ = writeln!(out, "{}", petition.description);
            let _ = writeln!(out, "Signatures: {}", petition.signatures);
        }
    }

    out
}
