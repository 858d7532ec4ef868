use std::process::Command;

use super::UiLinkOpener;

pub struct DesktopLinkOpener;

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        // The browser has to come to the front: the user is expected to act
        // there (consent page, lecture file).
        #[cfg(target_os = "macos")]
        {
            if let Err(err) = Command::new("open").arg(url).spawn() {
                tracing::warn!(error = %err, url, "could not open link in browser");
            }
        }
        #[cfg(target_os = "windows")]
        {
            if let Err(err) = Command::new("cmd").args(["/C", "start", "", url]).spawn() {
                tracing::warn!(error = %err, url, "could not open link in browser");
            }
        }
        #[cfg(target_os = "linux")]
        {
            if let Err(err) = Command::new("xdg-open").arg(url).spawn() {
                tracing::warn!(error = %err, url, "could not open link in browser");
            }
        }
    }
}
