pub mod errors;
pub mod protocol;
pub mod types;

pub use errors::{ChorusError, ConfigError, WebViewError};
pub use protocol::{
    Bounds, FillInputsRequest, HostRequest, LayoutItem, PixelBounds, ReloadRequest,
    ScrollXPayload, SelectorEntry, UiMessage, WheelPayload,
};
pub use types::{Rect, SurfaceId, WindowKey};

pub type Result<T> = std::result::Result<T, ChorusError>;
