//! Mapping sniffed content onto the small set of types the tool emits.
//!
//! The tool only ever outputs MP3 (audio), PDF (document), and PNG/JPG
//! (image). Everything else is either relabeled into that set or dropped.

use super::sniff::SniffedType;

/// Broad grouping used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Audio,
    Document,
    Image,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Audio => "audio",
            Category::Document => "document",
            Category::Image => "image",
        }
    }
}

/// Resolved output identity for an accepted attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKind {
    /// Canonical extension used for saved files
    pub extension: &'static str,
    /// MIME type handed to preview/download collaborators
    pub mime_type: &'static str,
    pub category: Category,
}

const MP3: FileKind = FileKind {
    extension: "mp3",
    mime_type: "audio/mpeg",
    category: Category::Audio,
};

/// Every extension this tool will ever emit (plus `jpeg`, accepted as an
/// alias of `jpg` in saved-file names).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp3", "pdf", "png", "jpg", "jpeg"];

/// Resolve a sniffed type to an output kind, or `None` if the attachment
/// must be dropped.
///
/// M4A/MP4 audio is relabeled to mp3 rather than rejected: players treat
/// the two identically for these recordings, and the container suffix is
/// the only thing that changes.
///
/// `assume_audio` controls the fate of unrecognized content. Note apps
/// store voice recordings without any tag, so the default pipeline keeps
/// unknown bytes as audio; with `assume_audio` off they are dropped.
pub fn normalize(sniffed: SniffedType, assume_audio: bool) -> Option<FileKind> {
    match sniffed {
        SniffedType::Mp3 | SniffedType::M4a => Some(MP3),
        SniffedType::Unknown if assume_audio => Some(MP3),
        SniffedType::Unknown => None,
        SniffedType::Pdf => Some(FileKind {
            extension: "pdf",
            mime_type: "application/pdf",
            category: Category::Document,
        }),
        SniffedType::Png => Some(FileKind {
            extension: "png",
            mime_type: "image/png",
            category: Category::Image,
        }),
        SniffedType::Jpg => Some(FileKind {
            extension: "jpg",
            mime_type: "image/jpeg",
            category: Category::Image,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_types_all_become_mp3() {
        for sniffed in [SniffedType::Mp3, SniffedType::M4a, SniffedType::Unknown] {
            let kind = normalize(sniffed, true).unwrap();
            assert_eq!(kind.extension, "mp3");
            assert_eq!(kind.mime_type, "audio/mpeg");
            assert_eq!(kind.category, Category::Audio);
        }
    }

    #[test]
    fn pdf_png_jpg_keep_their_identity() {
        let pdf = normalize(SniffedType::Pdf, true).unwrap();
        assert_eq!((pdf.extension, pdf.mime_type), ("pdf", "application/pdf"));
        assert_eq!(pdf.category, Category::Document);

        let png = normalize(SniffedType::Png, true).unwrap();
        assert_eq!((png.extension, png.mime_type), ("png", "image/png"));
        assert_eq!(png.category, Category::Image);

        let jpg = normalize(SniffedType::Jpg, true).unwrap();
        assert_eq!((jpg.extension, jpg.mime_type), ("jpg", "image/jpeg"));
        assert_eq!(jpg.category, Category::Image);
    }

    #[test]
    fn unknown_is_dropped_without_assume_audio() {
        assert_eq!(normalize(SniffedType::Unknown, false), None);
    }

    #[test]
    fn every_accepted_kind_is_whitelisted() {
        for sniffed in [
            SniffedType::Mp3,
            SniffedType::M4a,
            SniffedType::Pdf,
            SniffedType::Png,
            SniffedType::Jpg,
            SniffedType::Unknown,
        ] {
            if let Some(kind) = normalize(sniffed, true) {
                assert!(ACCEPTED_EXTENSIONS.contains(&kind.extension));
            }
        }
    }
}
