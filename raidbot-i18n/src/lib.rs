//! Internationalization for the RaidBot site
//!
//! - **Locales**: the five supported codes, alias table and Accept-Language parsing
//! - **Catalog**: one immutable JSON tree per locale
//! - **Lookup**: dotted keys with default-locale and raw-key fallback
//! - **Resolution**: query, cookie, header, default
//! - **Client sync**: the interactive runtime's init/ready/change-language state machine
//! - **Audit**: report translation keys no source references
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raidbot_i18n::{Catalog, Locale, LocaleResolver};
//!
//! let catalog = Catalog::embedded()?;
//! let resolution = LocaleResolver::resolve_request(&request);
//!
//! let title = catalog.translate(resolution.locale, "pages.home.meta.title", &[]);
//! let rights = catalog.translate(resolution.locale, "footer.rights", &[("year", "2025")]);
//! ```

pub mod audit;
mod catalog;
mod cookie;
mod error;
mod locale;
mod resolver;
pub mod runtime;
mod translate;

pub use audit::{AuditReport, KeyScanner, KeyUsage, OutputFormat, collect_keys};
pub use catalog::{Catalog, TRANSLATIONS_FILE, locale_path};
pub use cookie::LocaleCookie;
pub use error::I18nError;
pub use locale::{LanguageTag, Locale, negotiate_locale, parse_accept_language};
pub use resolver::{LocaleResolver, QUERY_PARAM, Resolution, ResolutionSource};
pub use runtime::{
    CatalogRuntime, ClientHost, ClientSync, MemoryHost, RuntimeState, SyncPhase,
    TranslationRuntime,
};
pub use translate::{ControlItem, FaqItem, PageMeta, Translator, interpolate};

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Catalog, I18nError, Locale, LocaleCookie, LocaleResolver, Resolution, Result, Translator,
    };
}
