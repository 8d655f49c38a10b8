//! Text rendering of the tracker.
//!
//! The list view shows every record newest first; the form view shows the
//! draft while the tracker is editing.

use std::fmt::{self, Write as _};

use crate::certificate::{Certificate, Status, ACCEPTED_FILE_EXTENSIONS, NOTES_MAX_LEN};
use crate::config::ViewConfig;
use crate::form::Draft;
use crate::storage::Slot;
use crate::tracker::Tracker;

/// Render a status badge with its tone, e.g. `[✓ Earned] (success)`.
#[must_use]
pub fn badge(status: Status) -> String {
    format!("[{} {}] ({})", status.glyph(), status.label(), status.tone())
}

/// Render a progress bar of `width` cells followed by the percentage.
#[must_use]
pub fn progress_bar(progress: u8, width: usize) -> String {
    let progress = usize::from(progress.min(100));
    let filled = (progress * width + 50) / 100;
    format!(
        "[{}{}] {progress:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled)
    )
}

/// Run `write` against a fresh buffer.
fn collect(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write(&mut out);
    out
}

/// Render one record as a block of lines.
#[must_use]
pub fn render_certificate(cert: &Certificate, config: &ViewConfig) -> String {
    collect(|out| write_certificate(out, cert, config))
}

fn write_certificate(out: &mut String, cert: &Certificate, config: &ViewConfig) -> fmt::Result {
    writeln!(out, "{} {}", cert.name, badge(cert.status))?;
    writeln!(out, "  Provider:   {}", cert.provider)?;
    writeln!(
        out,
        "  Progress:   {}",
        progress_bar(cert.progress, config.progress_bar_width)
    )?;

    if let Some(date) = &cert.date_earned {
        writeln!(out, "  Earned:     {date}")?;
    }
    if let Some(date) = &cert.expiry_date {
        writeln!(out, "  Expires:    {date}")?;
    }
    if let Some(credential) = &cert.credential_id {
        writeln!(out, "  Credential: {credential}")?;
    }

    write_section(
        out,
        "Study materials",
        &cert.study_materials,
        config.show_empty_sections,
    )?;
    write_section(out, "Files", &cert.files, config.show_empty_sections)?;

    if !cert.notes.is_empty() {
        writeln!(out, "  Notes:")?;
        for line in cert.notes.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

fn write_section(out: &mut String, title: &str, items: &[String], show_empty: bool) -> fmt::Result {
    if items.is_empty() && !show_empty {
        return Ok(());
    }
    writeln!(out, "  {title}:")?;
    if items.is_empty() {
        writeln!(out, "    (none)")?;
    }
    for item in items {
        writeln!(out, "    - {item}")?;
    }
    Ok(())
}

/// Render the record list, newest first.
#[must_use]
pub fn render_list(records: &[Certificate], config: &ViewConfig) -> String {
    if records.is_empty() {
        return "No certificates yet. Use `certrack add` to track one.\n".to_string();
    }
    records
        .iter()
        .map(|cert| render_certificate(cert, config))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render records as a compact table.
#[must_use]
pub fn render_table(records: &[Certificate]) -> String {
    collect(|out| write_table(out, records))
}

fn write_table(out: &mut String, records: &[Certificate]) -> fmt::Result {
    let name_width = column_width("NAME", records.iter().map(|c| c.name.as_str()));
    let provider_width = column_width("PROVIDER", records.iter().map(|c| c.provider.as_str()));

    writeln!(
        out,
        "{:<name_width$}  {:<provider_width$}  {:<11}  {:>8}  EXPIRES",
        "NAME", "PROVIDER", "STATUS", "PROGRESS"
    )?;
    for cert in records {
        writeln!(
            out,
            "{:<name_width$}  {:<provider_width$}  {:<11}  {:>7}%  {}",
            cert.name,
            cert.provider,
            cert.status.to_string(),
            cert.progress,
            cert.expiry_date.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Render the draft as a form.
#[must_use]
pub fn render_form(draft: &Draft) -> String {
    collect(|out| write_form(out, draft))
}

fn write_form(out: &mut String, draft: &Draft) -> fmt::Result {
    writeln!(out, "Add New Certificate")?;
    writeln!(out, "  name:          {}", draft.name)?;
    writeln!(out, "  provider:      {}", draft.provider)?;
    writeln!(out, "  status:        {}", draft.status)?;
    writeln!(out, "  progress:      {}", draft.progress)?;
    writeln!(out, "  date-earned:   {}", draft.date_earned)?;
    writeln!(out, "  expiry-date:   {}", draft.expiry_date)?;
    writeln!(out, "  credential-id: {}", draft.credential_id)?;
    writeln!(out, "  materials:")?;
    for line in draft.study_materials.lines() {
        writeln!(out, "    {line}")?;
    }
    writeln!(
        out,
        "  notes:         {} ({}/{NOTES_MAX_LEN})",
        draft.notes,
        draft.notes.chars().count()
    )?;
    writeln!(
        out,
        "  files ({}):",
        ACCEPTED_FILE_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(" ")
    )?;
    for (index, name) in draft.files.iter().enumerate() {
        writeln!(out, "    {index}: {name}")?;
    }
    Ok(())
}

/// Render the whole tracker: the form when editing, then the list.
#[must_use]
pub fn render<S: Slot>(tracker: &Tracker<S>, config: &ViewConfig) -> String {
    let mut out = String::new();
    if tracker.is_editing() {
        out.push_str(&render_form(tracker.draft()));
        out.push('\n');
    }
    out.push_str(&render_list(tracker.records(), config));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(name: &str, status: Status, progress: u8) -> Certificate {
        Certificate {
            id: "1".to_string(),
            name: name.to_string(),
            provider: "CompTIA".to_string(),
            status,
            progress,
            date_earned: None,
            expiry_date: None,
            credential_id: None,
            study_materials: Vec::new(),
            notes: String::new(),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_badge() {
        assert_eq!(badge(Status::Earned), "[✓ Earned] (success)");
        assert_eq!(badge(Status::InProgress), "[◷ In Progress] (warning)");
        assert_eq!(badge(Status::Planned), "[▦ Planned] (info)");
        for status in Status::ALL {
            assert!(badge(status).contains(&status.tone().to_string()));
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]   0%");
        assert_eq!(progress_bar(50, 10), "[#####-----]  50%");
        assert_eq!(progress_bar(100, 10), "[##########] 100%");
        assert_eq!(progress_bar(255, 4), "[####] 100%");
    }

    #[test]
    fn test_render_certificate_minimal() {
        let text = render_certificate(&cert("CCNA", Status::Planned, 0), &ViewConfig::default());
        assert!(text.starts_with("CCNA [▦ Planned] (info)\n"));
        assert!(text.contains("Provider:   CompTIA"));
        assert!(!text.contains("Earned:"));
        assert!(!text.contains("Study materials"));
        assert!(!text.contains("Files"));
    }

    #[test]
    fn test_render_certificate_full() {
        let mut c = cert("Security+", Status::Earned, 100);
        c.date_earned = Some("2024-01-10".to_string());
        c.expiry_date = Some("2027-01-10".to_string());
        c.credential_id = Some("COMP001".to_string());
        c.study_materials = vec!["Book".to_string()];
        c.files = vec!["cert.pdf".to_string()];
        c.notes = "Passed first try".to_string();

        let text = render_certificate(&c, &ViewConfig::default());
        assert!(text.contains("Earned:     2024-01-10"));
        assert!(text.contains("Expires:    2027-01-10"));
        assert!(text.contains("Credential: COMP001"));
        assert!(text.contains("    - Book"));
        assert!(text.contains("    - cert.pdf"));
        assert!(text.contains("Passed first try"));
    }

    #[test]
    fn test_render_empty_sections_when_configured() {
        let config = ViewConfig {
            show_empty_sections: true,
            ..ViewConfig::default()
        };
        let text = render_certificate(&cert("CCNA", Status::Planned, 0), &config);
        assert!(text.contains("Study materials:\n    (none)"));
        assert!(text.contains("Files:\n    (none)"));
    }

    #[test]
    fn test_render_list_newest_first() {
        let records = vec![
            cert("Newer", Status::InProgress, 40),
            cert("Older", Status::Planned, 0),
        ];
        let text = render_list(&records, &ViewConfig::default());
        let newer = text.find("Newer").unwrap();
        let older = text.find("Older").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn test_render_list_empty() {
        let text = render_list(&[], &ViewConfig::default());
        assert!(text.contains("No certificates yet"));
    }

    #[test]
    fn test_render_table() {
        let mut c = cert("CISSP", Status::InProgress, 35);
        c.expiry_date = Some("2026-05-01".to_string());
        let text = render_table(&[c]);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("NAME"));
        let row = lines.next().unwrap();
        assert!(row.contains("CISSP"));
        assert!(row.contains("in-progress"));
        assert!(row.contains("35%"));
        assert!(row.contains("2026-05-01"));
    }

    #[test]
    fn test_render_tracker_shows_form_only_while_editing() {
        use crate::config::CorruptPolicy;
        use crate::storage::MemorySlot;
        use crate::store::RecordStore;

        let store = RecordStore::load(MemorySlot::new(), "certificates", CorruptPolicy::Fail)
            .unwrap();
        let mut tracker = Tracker::new(store);
        let config = ViewConfig::default();

        assert!(!render(&tracker, &config).contains("Add New Certificate"));

        tracker.open_form();
        let text = render(&tracker, &config);
        assert!(text.starts_with("Add New Certificate"));
        assert!(text.contains("No certificates yet"));
    }

    #[test]
    fn test_render_form() {
        let mut draft = Draft::new();
        draft.name = "CEH".to_string();
        draft.notes = "abc".to_string();
        draft.files = vec!["a.pdf".to_string(), "b.png".to_string()];

        let text = render_form(&draft);
        assert!(text.contains("name:          CEH"));
        assert!(text.contains("status:        planned"));
        assert!(text.contains("(3/500)"));
        assert!(text.contains("    0: a.pdf"));
        assert!(text.contains("    1: b.png"));
    }
}
