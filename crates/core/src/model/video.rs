use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

//
// ─── PATTERNS ──────────────────────────────────────────────────────────────────
//

const MEDIA_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

const HOSTED_EMBED_BASE: &str = "https://www.youtube.com/embed/";

static EMBED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"embed/([A-Za-z0-9_-]{5,})").expect("embed pattern is valid")
});

static WATCH_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]v=([A-Za-z0-9_-]{5,})").expect("watch pattern is valid")
});

static SHORT_LINK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtu\.be/([A-Za-z0-9_-]{5,})").expect("short link pattern is valid")
});

//
// ─── VIDEO SOURCE ──────────────────────────────────────────────────────────────
//

/// Where a step's video lives, which decides the playback strategy.
///
/// Classification is total: every string maps to exactly one variant, and
/// `Unknown` is what remains when no pattern matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSource {
    /// Locally uploaded media file, played natively.
    Uploaded { url: String },
    /// Video on the hosting platform, addressed by its platform id.
    Hosted { video_id: String },
    /// Unrecognized reference, embedded as-is without a completion signal.
    Unknown { url: String },
}

impl VideoSource {
    /// Classify a raw video reference.
    ///
    /// Uploaded media wins over every hosted pattern.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if is_uploaded_media(raw) {
            return Self::Uploaded {
                url: raw.to_owned(),
            };
        }
        match hosted_video_id(raw) {
            Some(video_id) => Self::Hosted { video_id },
            None => Self::Unknown {
                url: raw.to_owned(),
            },
        }
    }

    /// URL a presentation layer should embed.
    #[must_use]
    pub fn embed_url(&self) -> String {
        match self {
            Self::Uploaded { url } | Self::Unknown { url } => url.clone(),
            Self::Hosted { video_id } => format!("{HOSTED_EMBED_BASE}{video_id}"),
        }
    }

    /// Whether playback of this source can report that it ended.
    #[must_use]
    pub fn emits_completion_signal(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }

    #[must_use]
    pub fn hosted_id(&self) -> Option<&str> {
        match self {
            Self::Hosted { video_id } => Some(video_id),
            _ => None,
        }
    }
}

/// Extract a hosting platform id from an embed, watch or short-link URL.
#[must_use]
pub fn hosted_video_id(raw: &str) -> Option<String> {
    [&*EMBED_ID, &*WATCH_ID, &*SHORT_LINK_ID]
        .into_iter()
        .find_map(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// An uploads path anywhere, or a media extension at the very end of the
/// reference. A trailing query string defeats the extension match.
fn is_uploaded_media(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    lower.contains("/uploads/")
        || lower
            .rsplit_once('.')
            .is_some_and(|(_, ext)| MEDIA_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosted(id: &str) -> VideoSource {
        VideoSource::Hosted {
            video_id: id.to_owned(),
        }
    }

    #[test]
    fn same_video_from_every_hosted_url_shape() {
        let shapes = [
            "https://www.youtube.com/embed/ViOZmtLvbXI",
            "https://www.youtube.com/watch?v=ViOZmtLvbXI",
            "https://www.youtube.com/watch?feature=share&v=ViOZmtLvbXI",
            "https://youtu.be/ViOZmtLvbXI",
            "https://www.youtube.com/embed/ViOZmtLvbXI?rel=0",
        ];
        for raw in shapes {
            assert_eq!(VideoSource::classify(raw), hosted("ViOZmtLvbXI"), "{raw}");
        }
    }

    #[test]
    fn uploads_path_wins_over_hosted_patterns() {
        let raw = "http://localhost:3002/uploads/embed/ViOZmtLvbXI";
        assert!(matches!(
            VideoSource::classify(raw),
            VideoSource::Uploaded { .. }
        ));
    }

    #[test]
    fn media_extension_classifies_as_uploaded() {
        for raw in [
            "https://cdn.example.com/lesson.MP4",
            "clips/intro.webm",
            "https://cdn.example.com/uploads/intro.ogg?t=30",
        ] {
            assert!(
                matches!(VideoSource::classify(raw), VideoSource::Uploaded { .. }),
                "{raw}"
            );
        }
    }

    #[test]
    fn extension_must_end_the_reference() {
        assert_eq!(
            VideoSource::classify("https://cdn.example.com/watch.ogg?v=ViOZmtLvbXI"),
            hosted("ViOZmtLvbXI")
        );
        assert!(matches!(
            VideoSource::classify("https://cdn.example.com/lesson.mp4?token=abc"),
            VideoSource::Unknown { .. }
        ));
    }

    #[test]
    fn unmatched_reference_is_unknown() {
        let source = VideoSource::classify("https://vimeo.com/12345");
        assert_eq!(
            source,
            VideoSource::Unknown {
                url: "https://vimeo.com/12345".into()
            }
        );
        assert!(!source.emits_completion_signal());
        assert_eq!(source.embed_url(), "https://vimeo.com/12345");
    }

    #[test]
    fn short_ids_are_not_hosted() {
        assert!(matches!(
            VideoSource::classify("https://youtu.be/abc"),
            VideoSource::Unknown { .. }
        ));
    }

    #[test]
    fn empty_string_is_unknown() {
        assert!(matches!(
            VideoSource::classify("  "),
            VideoSource::Unknown { .. }
        ));
    }

    #[test]
    fn hosted_embed_url_uses_platform_base() {
        assert_eq!(
            hosted("QrNi9FmdlxY").embed_url(),
            "https://www.youtube.com/embed/QrNi9FmdlxY"
        );
    }
}
