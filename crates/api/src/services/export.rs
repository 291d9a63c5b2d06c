//! Participant list PDF export.
//!
//! Renders the registrant list of an activity as a small self-contained
//! PDF document (A4, Helvetica) without touching disk or external state.
//! The writer emits just the objects a viewer needs: catalog, page tree,
//! one font and a content stream per page, plus a correct xref table.

use domain::models::{Activity, Registrant};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ROW_LEADING: f32 = 16.0;

// The first page loses vertical space to the title block.
const FIRST_PAGE_ROWS: usize = 40;
const CONT_PAGE_ROWS: usize = 45;

/// Download name for the participant list of an activity.
pub fn participants_filename(title: &str) -> String {
    format!("participants-{}.pdf", title_slug(title))
}

/// Download name for the guideline document of an activity.
pub fn guideline_filename(title: &str) -> String {
    format!("guideline-{}.pdf", title_slug(title))
}

/// First 30 characters of the title with spaces turned into dashes.
fn title_slug(title: &str) -> String {
    title
        .chars()
        .take(30)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Render the participant list of an activity as PDF bytes.
pub fn render_participant_list(activity: &Activity, registrants: &[Registrant]) -> Vec<u8> {
    let rows = participant_rows(registrants);
    let pages = paginate(&rows);
    let page_count = pages.len();

    // Object ids are fixed by position: 1 catalog, 2 page tree, 3 font,
    // then a content stream and page object pair per page.
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect();

    let mut writer = PdfWriter::new();
    writer.add_object("<< /Type /Catalog /Pages 2 0 R >>");
    writer.add_object(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    writer.add_object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>");

    for (i, page_rows) in pages.iter().enumerate() {
        let content = page_content(activity, page_rows, i == 0);
        writer.add_stream(&content);
        writer.add_object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            4 + 2 * i
        ));
    }

    writer.finish(1)
}

/// One formatted text line per registrant, numbered across pages.
fn participant_rows(registrants: &[Registrant]) -> Vec<String> {
    if registrants.is_empty() {
        return vec!["No participants registered.".to_string()];
    }

    registrants
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} | {} | {} | {}",
                i + 1,
                r.name,
                r.school,
                r.status.as_str(),
                if r.attended_at.is_some() { "Yes" } else { "No" }
            )
        })
        .collect()
}

/// Split rows into page-sized chunks.
fn paginate(rows: &[String]) -> Vec<&[String]> {
    if rows.len() <= FIRST_PAGE_ROWS {
        return vec![rows];
    }

    let (first, mut rest) = rows.split_at(FIRST_PAGE_ROWS);
    let mut pages = vec![first];
    while !rest.is_empty() {
        let take = rest.len().min(CONT_PAGE_ROWS);
        let (chunk, tail) = rest.split_at(take);
        pages.push(chunk);
        rest = tail;
    }
    pages
}

/// Build the content stream for one page.
fn page_content(activity: &Activity, rows: &[String], first_page: bool) -> String {
    let mut content = String::from("BT\n");
    let mut y = PAGE_HEIGHT - MARGIN;

    if first_page {
        content.push_str(&text_line(16.0, MARGIN, y, "Go Slides - Participant List"));
        y -= 24.0;
        content.push_str(&text_line(12.0, MARGIN, y, &activity.title));
        y -= 18.0;

        let date_line = match activity.date {
            Some(date) => format!("Activity date: {}", date.format("%d %B %Y")),
            None => "Activity date: TBA".to_string(),
        };
        content.push_str(&text_line(10.0, MARGIN, y, &date_line));
        y -= 28.0;
    }

    for row in rows {
        content.push_str(&text_line(9.0, MARGIN, y, row));
        y -= ROW_LEADING;
    }

    content.push_str("ET\n");
    content
}

fn text_line(size: f32, x: f32, y: f32, text: &str) -> String {
    format!("/F1 {} Tf 1 0 0 1 {} {} Tm ({}) Tj\n", size, x, y, escape_text(text))
}

/// Escape the characters PDF literal strings reserve.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Incremental PDF byte writer tracking object offsets for the xref table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn add_object(&mut self, body: &str) {
        let id = self.offsets.len() + 1;
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn add_stream(&mut self, content: &str) {
        let id = self.offsets.len() + 1;
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                id,
                content.len(),
                content
            )
            .as_bytes(),
        );
    }

    fn finish(mut self, root_id: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let object_count = self.offsets.len() + 1;

        self.buf
            .extend_from_slice(format!("xref\n0 {}\n", object_count).as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
                object_count, root_id, xref_offset
            )
            .as_bytes(),
        );

        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use domain::models::{ActivityKind, ActivityStatus, RegistrantStatus};
    use uuid::Uuid;

    fn test_activity() -> Activity {
        Activity {
            id: Uuid::new_v4(),
            year_id: Uuid::new_v4(),
            title: "Slide Design Sprint".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 5),
            kind: ActivityKind::Competition,
            status: ActivityStatus::Open,
            quota: Some(100),
            guideline_file: None,
            created_at: Utc::now(),
        }
    }

    fn test_registrant(name: &str) -> Registrant {
        Registrant {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            name: name.to_string(),
            school: "SMA 1".to_string(),
            phone: None,
            email: format!("{}@example.com", name.to_lowercase()),
            status: RegistrantStatus::Pending,
            check_in_code: Some("AbCdEfGh23456789".to_string()),
            attended_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_title_slug_truncates_and_dashes() {
        assert_eq!(title_slug("Slide Design Sprint"), "Slide-Design-Sprint");
        assert_eq!(
            title_slug("A very long activity title that keeps going"),
            "A-very-long-activity-title-tha"
        );
        assert_eq!(title_slug("NoSpaces"), "NoSpaces");
    }

    #[test]
    fn test_filenames() {
        assert_eq!(
            participants_filename("Quiz Bowl"),
            "participants-Quiz-Bowl.pdf"
        );
        assert_eq!(guideline_filename("Quiz Bowl"), "guideline-Quiz-Bowl.pdf");
    }

    #[test]
    fn test_render_produces_valid_pdf_shell() {
        let activity = test_activity();
        let registrants = vec![test_registrant("Budi"), test_registrant("Siti")];

        let bytes = render_participant_list(&activity, &registrants);
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("Slide Design Sprint"));
        assert!(text.contains("1. Budi | SMA 1 | pending | No"));
        assert!(text.contains("2. Siti | SMA 1 | pending | No"));
        assert!(text.contains("Activity date: 05 March 2025"));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let bytes = render_participant_list(&test_activity(), &[test_registrant("Budi")]);
        let text = String::from_utf8(bytes).unwrap();

        let startxref = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|line| line.parse::<usize>().ok())
            .unwrap();

        assert!(text[startxref..].starts_with("xref\n"));
    }

    #[test]
    fn test_long_lists_paginate() {
        let registrants: Vec<Registrant> = (0..100)
            .map(|i| test_registrant(&format!("Participant{}", i)))
            .collect();

        let bytes = render_participant_list(&test_activity(), &registrants);
        let text = String::from_utf8(bytes).unwrap();

        // 40 rows on the first page, 45 on the next, 15 on the last
        assert!(text.contains("/Count 3"));
        assert!(text.contains("100. Participant99"));
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let bytes = render_participant_list(&test_activity(), &[]);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("/Count 1"));
        assert!(text.contains("No participants registered."));
    }

    #[test]
    fn test_parentheses_in_title_are_escaped() {
        let mut activity = test_activity();
        activity.title = "Sprint (Finals)".to_string();

        let bytes = render_participant_list(&activity, &[]);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Sprint \\(Finals\\)"));
    }

    #[test]
    fn test_attended_marker() {
        let mut registrant = test_registrant("Budi");
        registrant.attended_at = Some(Utc::now());

        let bytes = render_participant_list(&test_activity(), &[registrant]);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("1. Budi | SMA 1 | pending | Yes"));
    }
}
