use std::sync::Arc;

mod desktop;

/// Opens an external URL outside the app window.
///
/// Drive links must land in the system browser, not in the embedded
/// webview, so the views go through this seam instead of an anchor tag.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;
