//! Playback backends adapted into one event stream.

use serde::Serialize;

use course_core::model::VideoSource;

/// Backend-neutral playback event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    Started,
    Paused,
    Ended,
    /// Buffering, cueing and other states that do not affect completion.
    Other,
}

impl PlaybackEvent {
    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// State codes reported by the hosted player's state-change callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostedPlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl HostedPlayerState {
    /// Map a raw callback code; unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

impl From<HostedPlayerState> for PlaybackEvent {
    fn from(state: HostedPlayerState) -> Self {
        match state {
            HostedPlayerState::Ended => Self::Ended,
            HostedPlayerState::Playing => Self::Started,
            HostedPlayerState::Paused => Self::Paused,
            HostedPlayerState::Unstarted
            | HostedPlayerState::Buffering
            | HostedPlayerState::Cued => Self::Other,
        }
    }
}

/// Events fired by a native media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaElementEvent {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    Error,
}

impl From<MediaElementEvent> for PlaybackEvent {
    fn from(event: MediaElementEvent) -> Self {
        match event {
            MediaElementEvent::Play => Self::Started,
            MediaElementEvent::Pause => Self::Paused,
            MediaElementEvent::Ended => Self::Ended,
            MediaElementEvent::TimeUpdate | MediaElementEvent::Error => Self::Other,
        }
    }
}

/// How a step's video should be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "player", rename_all = "snake_case")]
pub enum PlaybackPlan {
    /// Hosted player API; reports state changes.
    HostedPlayer { video_id: String, embed_url: String },
    /// Native media element; fires `ended`.
    NativeMedia { url: String },
    /// Plain embed; never reports completion.
    RawEmbed { url: String },
}

impl PlaybackPlan {
    #[must_use]
    pub fn for_source(source: &VideoSource) -> Self {
        match source {
            VideoSource::Uploaded { url } => Self::NativeMedia { url: url.clone() },
            VideoSource::Hosted { video_id } => Self::HostedPlayer {
                video_id: video_id.clone(),
                embed_url: source.embed_url(),
            },
            VideoSource::Unknown { url } => Self::RawEmbed { url: url.clone() },
        }
    }

    #[must_use]
    pub fn reports_completion(&self) -> bool {
        !matches!(self, Self::RawEmbed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_codes_adapt_to_events() {
        let ended = HostedPlayerState::from_code(0).map(PlaybackEvent::from);
        assert_eq!(ended, Some(PlaybackEvent::Ended));
        assert_eq!(
            HostedPlayerState::from_code(3).map(PlaybackEvent::from),
            Some(PlaybackEvent::Other)
        );
        assert_eq!(HostedPlayerState::from_code(4), None);
    }

    #[test]
    fn media_ended_adapts_to_ended() {
        assert!(PlaybackEvent::from(MediaElementEvent::Ended).is_ended());
        assert!(!PlaybackEvent::from(MediaElementEvent::Pause).is_ended());
    }

    #[test]
    fn plan_follows_source_classification() {
        let hosted = PlaybackPlan::for_source(&VideoSource::classify("https://youtu.be/ViOZmtLvbXI"));
        assert_eq!(
            hosted,
            PlaybackPlan::HostedPlayer {
                video_id: "ViOZmtLvbXI".into(),
                embed_url: "https://www.youtube.com/embed/ViOZmtLvbXI".into(),
            }
        );
        let native = PlaybackPlan::for_source(&VideoSource::classify("/uploads/a.webm"));
        assert!(matches!(native, PlaybackPlan::NativeMedia { .. }));
        let raw = PlaybackPlan::for_source(&VideoSource::classify("https://vimeo.com/1"));
        assert!(!raw.reports_completion());
    }
}
