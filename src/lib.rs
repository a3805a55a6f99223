// RaidBot site
//
// Localized marketing pages, the language-change action, sitemap and the
// translation feed for the interactive client, served over the
// raidbot-core HTTP layer.

// Re-export core functionality
pub use raidbot_core::*;

// Re-export the supporting crates
pub use raidbot_config;
pub use raidbot_i18n;
pub use raidbot_log;

pub mod config;
pub mod site;

pub use config::SiteConfig;
pub use site::{Page, Site};

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::site::{Page, Site};
    pub use raidbot_core::{Application, Error, HttpRequest, HttpResponse, Router};
    pub use raidbot_i18n::{Catalog, Locale, LocaleCookie, LocaleResolver, Translator};
}
