// src/report/pdf.rs

use std::fmt::Write as _;

use crate::report::layout::{Document, Font, PAGE_HEIGHT, PAGE_WIDTH, Page};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

/// Serializes a laid out document as PDF 1.4.
///
/// Uses the standard Helvetica fonts with WinAnsi encoding, so no font data
/// is embedded. Each page is a page object followed by its content stream.
pub fn to_pdf(doc: &Document) -> Vec<u8> {
    let page_count = doc.pages.len();
    let object_count = FIRST_PAGE_ID - 1 + page_count * 2;
    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = vec![0usize; object_count + 1];

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect();

    write_object(
        &mut out,
        &mut offsets,
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).as_bytes(),
    );
    write_object(
        &mut out,
        &mut offsets,
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        )
        .as_bytes(),
    );
    write_object(
        &mut out,
        &mut offsets,
        FONT_REGULAR_ID,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    write_object(
        &mut out,
        &mut offsets,
        FONT_BOLD_ID,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let mut info = b"<< /Title ".to_vec();
    info.extend(pdf_string(&doc.title));
    info.extend(b" /Producer (hr-evaluation) >>");
    write_object(&mut out, &mut offsets, INFO_ID, &info);

    for (i, page) in doc.pages.iter().enumerate() {
        let page_id = page_object_id(i);
        let content = content_stream(page);

        write_object(
            &mut out,
            &mut offsets,
            page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES_ID,
                PAGE_WIDTH,
                PAGE_HEIGHT,
                FONT_REGULAR_ID,
                FONT_BOLD_ID,
                page_id + 1
            )
            .as_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend(&content);
        stream.extend(b"\nendstream");
        write_object(&mut out, &mut offsets, page_id + 1, &stream);
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
    for offset in &offsets[1..] {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        object_count + 1,
        CATALOG_ID,
        INFO_ID,
        xref_offset
    );
    out.extend(xref.into_bytes());

    out
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + index * 2
}

fn write_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = out.len();
    out.extend(format!("{} 0 obj\n", id).into_bytes());
    out.extend(body);
    out.extend(b"\nendobj\n");
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut content = Vec::new();
    for run in &page.runs {
        let font = match run.font {
            Font::Regular => "F1",
            Font::Bold => "F2",
        };
        content.extend(
            format!(
                "BT /{} {:.1} Tf {:.2} {:.2} Td ",
                font, run.size, run.x, run.y
            )
            .into_bytes(),
        );
        content.extend(pdf_string(&run.text));
        content.extend(b" Tj ET\n");
    }
    content
}

/// Literal string in WinAnsi encoding, non-ASCII bytes written as octal escapes.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = vec![b'('];
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            _ => {
                let byte = win_ansi(c);
                if (0x20..0x7f).contains(&byte) {
                    out.push(byte);
                } else {
                    out.extend(format!("\\{:03o}", byte).into_bytes());
                }
            }
        }
    }
    out.push(b')');
    out
}

fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}
