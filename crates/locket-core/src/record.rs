//! Content model - asset references and committed records

use serde::{Deserialize, Serialize};

use crate::{ActorId, ContentId};

/// Kind of a deliverable asset, matching the transport's typed send
/// primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Video,
    Document,
    Audio,
    Image,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Video => "video",
            AssetKind::Document => "document",
            AssetKind::Audio => "audio",
            AssetKind::Image => "image",
        }
    }
}

/// Reference to one deliverable asset
///
/// The handle is an opaque transport-level capability string; the core
/// never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub handle: String,
}

impl AssetRef {
    pub fn new(kind: AssetKind, handle: impl Into<String>) -> Self {
        AssetRef {
            kind,
            handle: handle.into(),
        }
    }
}

/// A committed content record
///
/// Created only by the submission state machine on a successful finish;
/// immutable thereafter. A committed record always carries at least one
/// asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub title: String,
    /// Optional poster asset handle, sent as a best-effort preview.
    pub poster: Option<String>,
    /// Stored order is presentation order.
    pub assets: Vec<AssetRef>,
    /// Unix seconds at commit time.
    pub created_at: i64,
    pub created_by: ActorId,
}

impl ContentRecord {
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_str() {
        assert_eq!(AssetKind::Video.as_str(), "video");
        assert_eq!(AssetKind::Image.as_str(), "image");
    }

    #[test]
    fn test_record_json_shape() {
        let record = ContentRecord {
            id: ContentId::from("abc123"),
            title: "Movie X".into(),
            poster: Some("poster-handle".into()),
            assets: vec![AssetRef::new(AssetKind::Video, "file-1")],
            created_at: 1_700_000_000,
            created_by: ActorId::new(42),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["assets"][0]["kind"], "video");
        assert_eq!(json["created_by"], 42);
    }
}
