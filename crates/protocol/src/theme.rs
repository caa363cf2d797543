use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the backend's active theme.
///
/// One token per pipeline stage, so backends can also derive stable
/// class names / styles from the token alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Compositor,
    Encode,
    Send,
    Receive,
    Decode,
    Blit,
    Display,

    Connector,
    GridLine,

    TextPrimary,
    TextMuted,

    Background,
}
