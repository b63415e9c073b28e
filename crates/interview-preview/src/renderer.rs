use std::fmt;

use interview_types::CreativeAsset;
use serde::Serialize;
use serde_json::Value;

use crate::resolver::{resolve_renderer, RendererKind};

/// Media slot of a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewMedia {
    Image { url: String },
    Video { url: String, thumbnail_url: Option<String> },
    /// Explicit placeholder shown when the asset carries no media URL
    Unavailable,
}

/// Everything a preview needs to draw, already resolved from the asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewCard {
    pub kind: RendererKind,
    pub channel_label: &'static str,
    pub headline: Option<String>,
    pub body: Option<String>,
    pub call_to_action: Option<String>,
    pub hashtags: Vec<String>,
    pub media: PreviewMedia,
}

impl PreviewCard {
    pub fn has_media(&self) -> bool {
        !matches!(self.media, PreviewMedia::Unavailable)
    }
}

/// Turns a creative asset into a preview card for one channel
pub trait PreviewRenderer: Send + Sync {
    fn render(&self, asset: &CreativeAsset) -> PreviewCard;
}

/// Renderer driven by per-channel field fallback chains
#[derive(Debug, Clone, Copy)]
pub struct ChannelRenderer {
    kind: RendererKind,
    label: &'static str,
    headline: &'static [&'static str],
    body: &'static [&'static str],
    media: &'static [&'static str],
    cta: &'static [&'static str],
}

const CTA_FIELDS: &[&str] = &["call_to_action", "cta"];

pub const VIDEO_RENDERER: ChannelRenderer = ChannelRenderer {
    kind: RendererKind::Video,
    label: "Video",
    headline: &["title", "hook", "headline"],
    body: &["script", "caption", "body", "summary"],
    media: &["video_url", "media_url"],
    cta: CTA_FIELDS,
};

pub const FACEBOOK_RENDERER: ChannelRenderer = ChannelRenderer {
    kind: RendererKind::Facebook,
    label: "Facebook",
    headline: &["headline", "title"],
    body: &["primary_text", "body", "caption", "summary"],
    media: &["image_url", "media_url", "thumbnail_url"],
    cta: CTA_FIELDS,
};

pub const LINKEDIN_RENDERER: ChannelRenderer = ChannelRenderer {
    kind: RendererKind::LinkedIn,
    label: "LinkedIn",
    headline: &["headline", "title"],
    body: &["intro_text", "body", "caption", "summary"],
    media: &["image_url", "media_url"],
    cta: CTA_FIELDS,
};

pub const INSTAGRAM_RENDERER: ChannelRenderer = ChannelRenderer {
    kind: RendererKind::Instagram,
    label: "Instagram",
    headline: &["hook", "title"],
    body: &["caption", "body", "script", "summary"],
    media: &["image_url", "media_url", "thumbnail_url"],
    cta: CTA_FIELDS,
};

pub const GENERIC_RENDERER: ChannelRenderer = ChannelRenderer {
    kind: RendererKind::Generic,
    label: "Preview",
    headline: &["title", "headline"],
    body: &["body", "text", "caption", "script", "summary"],
    media: &["image_url", "media_url"],
    cta: CTA_FIELDS,
};

impl PreviewRenderer for ChannelRenderer {
    fn render(&self, asset: &CreativeAsset) -> PreviewCard {
        let media = match (self.kind, asset.first_content_str(self.media)) {
            (RendererKind::Video, Some(url)) => PreviewMedia::Video {
                url: url.to_string(),
                thumbnail_url: asset.first_content_str(&["thumbnail_url", "image_url"]).map(str::to_string),
            },
            (_, Some(url)) => PreviewMedia::Image { url: url.to_string() },
            (_, None) => PreviewMedia::Unavailable,
        };

        // A bare string content is the body itself
        let body = asset
            .first_content_str(self.body)
            .or_else(|| asset.content.as_str().map(str::trim).filter(|s| !s.is_empty()))
            .map(str::to_string);

        PreviewCard {
            kind: self.kind,
            channel_label: self.label,
            headline: asset.first_content_str(self.headline).map(str::to_string),
            body,
            call_to_action: asset.first_content_str(self.cta).map(str::to_string),
            hashtags: hashtags(&asset.content),
            media,
        }
    }
}

fn hashtags(content: &Value) -> Vec<String> {
    content
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(|t| t.trim().trim_start_matches('#'))
                .filter(|t| !t.is_empty())
                .map(|t| format!("#{}", t))
                .collect()
        })
        .unwrap_or_default()
}

pub fn renderer_for(kind: RendererKind) -> &'static ChannelRenderer {
    match kind {
        RendererKind::Video => &VIDEO_RENDERER,
        RendererKind::Facebook => &FACEBOOK_RENDERER,
        RendererKind::LinkedIn => &LINKEDIN_RENDERER,
        RendererKind::Instagram => &INSTAGRAM_RENDERER,
        RendererKind::Generic => &GENERIC_RENDERER,
    }
}

/// Resolve the renderer for `asset` and build its card
pub fn render_preview(asset: &CreativeAsset) -> PreviewCard {
    renderer_for(resolve_renderer(asset)).render(asset)
}

impl fmt::Display for PreviewCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.channel_label)?;
        if let Some(headline) = &self.headline {
            writeln!(f, "{}", headline)?;
        }
        match &self.body {
            Some(body) => writeln!(f, "{}", body)?,
            None => writeln!(f, "(no text available)")?,
        }
        if !self.hashtags.is_empty() {
            writeln!(f, "{}", self.hashtags.join(" "))?;
        }
        match &self.media {
            PreviewMedia::Image { url } => writeln!(f, "Image: {}", url)?,
            PreviewMedia::Video { url, .. } => writeln!(f, "Video: {}", url)?,
            PreviewMedia::Unavailable => writeln!(f, "Media unavailable")?,
        }
        if let Some(cta) = &self.call_to_action {
            write!(f, "> {}", cta)?;
        }
        Ok(())
    }
}
