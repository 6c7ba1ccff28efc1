//! Request interception rule
//!
//! Pages only need their HTML and styles for text extraction; heavy or
//! active resources are failed before they hit the network.

use chromiumoxide::cdp::browser_protocol::network::ResourceType;

/// Resource categories the interception rule distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    Other,
}

/// Whether a request of this kind is aborted
#[must_use]
pub fn should_block(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::Image | ResourceKind::Media | ResourceKind::Font | ResourceKind::Script
    )
}

impl From<&ResourceType> for ResourceKind {
    fn from(resource_type: &ResourceType) -> Self {
        match resource_type {
            ResourceType::Document => Self::Document,
            ResourceType::Stylesheet => Self::Stylesheet,
            ResourceType::Image => Self::Image,
            ResourceType::Media => Self::Media,
            ResourceType::Font => Self::Font,
            ResourceType::Script => Self::Script,
            ResourceType::Xhr => Self::Xhr,
            ResourceType::Fetch => Self::Fetch,
            _ => Self::Other,
        }
    }
}
