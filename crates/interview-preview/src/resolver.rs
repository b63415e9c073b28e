use interview_types::CreativeAsset;
use serde::{Deserialize, Serialize};

/// Which preview layout an asset is shown with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Video,
    Facebook,
    #[serde(rename = "linkedin")]
    LinkedIn,
    Instagram,
    Generic,
}

const VIDEO_KEYWORDS: &[&str] = &["video"];
const FACEBOOK_KEYWORDS: &[&str] = &["facebook", "meta", "fb_"];
const LINKEDIN_KEYWORDS: &[&str] = &["linkedin"];
const INSTAGRAM_KEYWORDS: &[&str] = &["instagram", "ig_", "reel", "story", "tiktok", "shorts"];

/// Pick a renderer for `asset`. First match wins:
/// video → Facebook/Meta → LinkedIn → Instagram/short video → generic.
pub fn resolve_renderer(asset: &CreativeAsset) -> RendererKind {
    let artifact = lowercase(asset.artifact_type.as_deref());
    let format = lowercase(asset.format_id.as_deref());
    let channel = lowercase(asset.channel_id.as_deref());

    let has_video_url = asset.content_str("video_url").is_some();
    if has_video_url || contains_any(&[artifact.as_str(), format.as_str()], VIDEO_KEYWORDS) {
        return RendererKind::Video;
    }

    let placement = [format.as_str(), channel.as_str()];
    let kind = if contains_any(&placement, FACEBOOK_KEYWORDS) {
        RendererKind::Facebook
    } else if contains_any(&placement, LINKEDIN_KEYWORDS) {
        RendererKind::LinkedIn
    } else if contains_any(&placement, INSTAGRAM_KEYWORDS) {
        RendererKind::Instagram
    } else {
        RendererKind::Generic
    };

    tracing::trace!(
        "Resolved renderer {:?} for format={:?} channel={:?}",
        kind,
        asset.format_id,
        asset.channel_id
    );
    kind
}

fn lowercase(value: Option<&str>) -> String {
    value.unwrap_or_default().to_lowercase()
}

fn contains_any(haystacks: &[&str], keywords: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|hay| !hay.is_empty() && keywords.iter().any(|kw| hay.contains(kw)))
}
