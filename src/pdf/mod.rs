//! # PDF Serializer
//!
//! Takes the laid-out pages and writes a PDF 1.7 file.
//!
//! The writer only needs the small part of PDF a text transcript uses: a
//! page tree, Type1 references to the standard fonts (no embedding) and one
//! compressed content stream per page.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, content streams
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use chrono::{Local, NaiveDate};
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::WriteError;
use crate::font::{to_winansi, FontContext};
use crate::layout::{LayoutPage, TextDraw};
use crate::model::Metadata;

/// The serialization side of the drawing contract: turns positioned pages
/// into bytes.
pub trait DocumentWriter {
    fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        font_context: &FontContext,
    ) -> Result<Vec<u8>, WriteError>;
}

/// Writes pages as a PDF document.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing. Index = object number;
/// slot 0 is the free-list head and is never written.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn new() -> Self {
        // 0 = placeholder, 1 = Catalog, 2 = Pages
        Self {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

impl DocumentWriter for PdfWriter {
    fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        font_context: &FontContext,
    ) -> Result<Vec<u8>, WriteError> {
        if pages.is_empty() {
            return Err(WriteError::Serialize("document has no pages".to_string()));
        }

        let mut builder = PdfBuilder::new();

        let font_obj_ids: Vec<usize> = font_context
            .fonts()
            .iter()
            .map(|font| {
                builder.push(
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        font.pdf_name()
                    )
                    .into_bytes(),
                )
            })
            .collect();
        let font_resources = Self::build_font_resource_dict(&font_obj_ids);

        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Self::build_content_stream(page, font_context)?;
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(Self::build_info_dict(metadata).into_bytes());

        Ok(Self::serialize(&builder, info_obj_id))
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(page: &LayoutPage, font_context: &FontContext) -> Result<String, WriteError> {
        let mut stream = String::new();
        for draw in &page.elements {
            Self::write_text(&mut stream, draw, font_context)?;
        }
        Ok(stream)
    }

    fn write_text(stream: &mut String, draw: &TextDraw, font_context: &FontContext) -> Result<(), WriteError> {
        let index = font_context.resource_index(draw.font).ok_or_else(|| {
            WriteError::Font(format!("{} is not registered", draw.font.pdf_name()))
        })?;
        let _ = write!(
            stream,
            "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            draw.color.r,
            draw.color.g,
            draw.color.b,
            index,
            draw.font_size,
            draw.x,
            draw.y,
            Self::encode_text(&draw.text)
        );
        Ok(())
    }

    /// Encode text as the body of a WinAnsi literal string.
    fn encode_text(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    // Use octal escape for bytes outside ASCII printable range
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    fn build_font_resource_dict(font_obj_ids: &[usize]) -> String {
        font_obj_ids
            .iter()
            .enumerate()
            .map(|(i, obj_id)| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", Self::encode_text(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author ({}) ", Self::encode_text(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject ({}) ", Self::encode_text(subject));
        }
        let date = metadata
            .generated_on
            .unwrap_or_else(|| Local::now().date_naive());
        let _ = write!(
            info,
            "/CreationDate ({}) /Producer (transcript-pdf) /Creator (transcript-pdf) >>",
            Self::pdf_date(date)
        );
        info
    }

    /// Format a date as a PDF date string (`D:YYYYMMDD000000`).
    fn pdf_date(date: NaiveDate) -> String {
        format!("D:{}000000", date.format("%Y%m%d"))
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
