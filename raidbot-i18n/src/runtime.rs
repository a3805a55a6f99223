//! Client-side translation runtime synchronization.
//!
//! [`ClientSync`] owns the interactive side's view of the active locale:
//! it initializes a [`TranslationRuntime`] against the catalog, reconciles
//! it with the server-resolved locale and exposes the language switch.
//! A ceiling timer guarantees the UI becomes ready even if setup stalls;
//! the runtime's `init` keeps running on its own task past the ceiling and
//! later calls wait for it.

use crate::resolver::QUERY_PARAM;
use crate::{Catalog, I18nError, Locale, LocaleCookie, Result, Translator};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use raidbot_log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How long setup may run before the UI is forced ready.
pub const DEFAULT_INIT_CEILING: Duration = Duration::from_secs(2);

/// The translation engine the interactive side renders with.
#[async_trait]
pub trait TranslationRuntime: Send + Sync {
    /// Load the catalog. The runtime starts on the default locale.
    async fn init(&self, catalog: Arc<Catalog>) -> Result<()>;

    /// Switch the active locale.
    async fn change_language(&self, locale: Locale) -> Result<()>;

    /// Active locale, once initialized.
    fn language(&self) -> Option<Locale>;
}

/// Side effects outside the runtime: persistence, document, data reload.
#[async_trait]
pub trait ClientHost: Send + Sync {
    /// Store the preference so the next request resolves to `locale`.
    async fn persist_preference(&self, locale: Locale) -> Result<()>;

    /// Set the document-level `lang` attribute.
    fn set_document_language(&self, tag: &str);

    /// Reload the current view's server-derived data.
    async fn revalidate(&self);
}

/// In-memory runtime over a shared [`Catalog`].
#[derive(Default)]
pub struct CatalogRuntime {
    catalog: RwLock<Option<Arc<Catalog>>>,
    language: RwLock<Option<Locale>>,
}

impl CatalogRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translator for the active locale.
    pub fn translator(&self) -> Option<Translator> {
        let catalog = self.catalog.read().clone()?;
        let locale = (*self.language.read())?;
        Some(Translator::new(catalog, locale))
    }
}

#[async_trait]
impl TranslationRuntime for CatalogRuntime {
    async fn init(&self, catalog: Arc<Catalog>) -> Result<()> {
        *self.catalog.write() = Some(catalog);
        *self.language.write() = Some(Locale::DEFAULT);
        Ok(())
    }

    async fn change_language(&self, locale: Locale) -> Result<()> {
        let catalog = self.catalog.read().clone().ok_or(I18nError::NotInitialized)?;
        if !catalog.has_locale(locale) {
            debug!("No translations loaded for {}; lookups use {}", locale, Locale::DEFAULT);
        }
        *self.language.write() = Some(locale);
        Ok(())
    }

    fn language(&self) -> Option<Locale> {
        *self.language.read()
    }
}

/// Lifecycle phase of a [`ClientSync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncPhase {
    Uninitialized,
    Initializing,
    Ready,
    /// Ready after a failed setup, on the default locale if it could be applied.
    FallbackReady,
}

impl SyncPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, SyncPhase::Ready | SyncPhase::FallbackReady)
    }
}

/// Snapshot exposed to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeState {
    pub is_ready: bool,
    pub current_locale: Locale,
    pub initialization_error: Option<String>,
}

#[derive(Debug)]
struct SyncInner {
    phase: SyncPhase,
    /// Last locale the runtime accepted
    applied: Option<Locale>,
    error: Option<String>,
}

/// Result of `runtime.init`, published once by the init task.
type InitOutcome = Option<std::result::Result<(), String>>;

/// Drives one translation runtime for the lifetime of the application.
///
/// Construct once and share by `Arc`; the phase doubles as the guard
/// against concurrent initialization.
pub struct ClientSync {
    runtime: Arc<dyn TranslationRuntime>,
    host: Arc<dyn ClientHost>,
    catalog: Arc<Catalog>,
    ceiling: Duration,
    inner: Mutex<SyncInner>,
    init_tx: Mutex<Option<watch::Sender<InitOutcome>>>,
    init_rx: watch::Receiver<InitOutcome>,
}

impl ClientSync {
    pub fn new(
        runtime: Arc<dyn TranslationRuntime>,
        host: Arc<dyn ClientHost>,
        catalog: Arc<Catalog>,
    ) -> Self {
        let (init_tx, init_rx) = watch::channel(None);
        Self {
            runtime,
            host,
            catalog,
            ceiling: DEFAULT_INIT_CEILING,
            inner: Mutex::new(SyncInner {
                phase: SyncPhase::Uninitialized,
                applied: None,
                error: None,
            }),
            init_tx: Mutex::new(Some(init_tx)),
            init_rx,
        }
    }

    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn phase(&self) -> SyncPhase {
        self.inner.lock().phase
    }

    pub fn state(&self) -> RuntimeState {
        let inner = self.inner.lock();
        RuntimeState {
            is_ready: inner.phase.is_ready(),
            current_locale: inner.applied.unwrap_or(Locale::DEFAULT),
            initialization_error: inner.error.clone(),
        }
    }

    /// Bring the runtime up on `server_locale`, or on a supported `?lang=`
    /// from `query`, which takes precedence.
    ///
    /// Only the first call initializes. Calls while initialization is in
    /// flight return immediately; calls once ready wait for the runtime's
    /// `init` if the ceiling cut it short, then reconcile the active locale.
    pub async fn mount(&self, server_locale: Locale, query: &HashMap<String, String>) -> RuntimeState {
        let target = query
            .get(QUERY_PARAM)
            .and_then(|code| Locale::from_code(code))
            .unwrap_or(server_locale);

        let phase = {
            let mut inner = self.inner.lock();
            let phase = inner.phase;
            if phase == SyncPhase::Uninitialized {
                inner.phase = SyncPhase::Initializing;
            }
            phase
        };

        match phase {
            SyncPhase::Initializing => {
                debug!("Initialization already in flight, ignoring mount");
            }
            SyncPhase::Ready | SyncPhase::FallbackReady => self.reconcile(target).await,
            SyncPhase::Uninitialized => self.initialize(target).await,
        }

        self.state()
    }

    async fn initialize(&self, target: Locale) {
        self.start_init();
        let outcome = tokio::time::timeout(self.ceiling, self.setup(target)).await;

        let mut inner = self.inner.lock();
        match outcome {
            Ok(phase) => inner.phase = phase,
            Err(_) => {
                let err = I18nError::InitTimeout(self.ceiling);
                warn!(
                    "{}; continuing with {}",
                    err,
                    inner.applied.unwrap_or(Locale::DEFAULT)
                );
                inner.error = Some(err.to_string());
                inner.phase = SyncPhase::Ready;
            }
        }
    }

    /// Run `runtime.init` on its own task so the ceiling cannot cancel it.
    fn start_init(&self) {
        let Some(tx) = self.init_tx.lock().take() else {
            return;
        };
        let runtime = Arc::clone(&self.runtime);
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let outcome = runtime.init(catalog).await.map_err(|err| err.to_string());
            tx.send_replace(Some(outcome));
        });
    }

    /// Wait for the init task started by the first mount.
    async fn runtime_initialized(&self) -> Result<()> {
        let mut rx = self.init_rx.clone();
        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| I18nError::NotInitialized)?;
        match &*outcome {
            Some(Err(message)) => Err(I18nError::InitFailed(message.clone())),
            _ => Ok(()),
        }
    }

    /// Init, then apply `target`; the default locale on failure.
    async fn setup(&self, target: Locale) -> SyncPhase {
        let result = match self.runtime_initialized().await {
            Ok(()) => {
                self.record_applied(self.runtime.language().unwrap_or(Locale::DEFAULT));
                self.apply(target).await
            }
            Err(err) => Err(err),
        };

        let Err(err) = result else {
            info!("Translation runtime ready on {}", target);
            return SyncPhase::Ready;
        };

        error!("Translation runtime setup failed: {}", err);
        self.inner.lock().error = Some(err.to_string());

        if let Err(fallback_err) = self.apply(Locale::DEFAULT).await {
            error!(
                "Falling back to {} failed as well: {}",
                Locale::DEFAULT,
                fallback_err
            );
        }
        SyncPhase::FallbackReady
    }

    async fn reconcile(&self, target: Locale) {
        if let Err(err) = self.runtime_initialized().await {
            warn!("Could not reconcile runtime to {}: {}", target, err);
            return;
        }
        if self.runtime.language() == Some(target) {
            return;
        }
        if let Err(err) = self.apply(target).await {
            warn!("Could not reconcile runtime to {}: {}", target, err);
        }
    }

    /// Switch the runtime and the document language.
    async fn apply(&self, locale: Locale) -> Result<()> {
        self.runtime.change_language(locale).await?;
        self.record_applied(locale);
        self.host.set_document_language(locale.html_lang());
        Ok(())
    }

    fn record_applied(&self, locale: Locale) {
        self.inner.lock().applied = Some(locale);
    }

    /// Switch to `locale`, persist it and reload view data.
    ///
    /// Returns `false` when not ready or when any step fails; a failed
    /// persist rolls the runtime back to the previous locale.
    pub async fn change_language(&self, locale: Locale) -> bool {
        let previous = {
            let inner = self.inner.lock();
            if !inner.phase.is_ready() {
                warn!("Ignoring language change to {} before the runtime is ready", locale);
                return false;
            }
            inner.applied.unwrap_or(Locale::DEFAULT)
        };

        if let Err(err) = self.runtime_initialized().await {
            error!("Cannot switch to {}: {}", locale, err);
            return false;
        }

        if let Err(err) = self.runtime.change_language(locale).await {
            error!("Failed to switch runtime to {}: {}", locale, err);
            return false;
        }

        if let Err(err) = self.host.persist_preference(locale).await {
            error!("Failed to persist language {}: {}", locale, err);
            if let Err(rollback_err) = self.runtime.change_language(previous).await {
                error!("Rolling back to {} failed: {}", previous, rollback_err);
            }
            return false;
        }

        self.record_applied(locale);
        self.host.set_document_language(locale.html_lang());
        self.host.revalidate().await;
        info!("Language changed from {} to {}", previous, locale);
        true
    }
}

/// A [`ClientHost`] that keeps everything in memory.
///
/// Persisting stores the `Set-Cookie` value the server would have sent, so
/// the jar can be replayed as the `Cookie` header of the next request.
#[derive(Debug, Default)]
pub struct MemoryHost {
    cookie: LocaleCookie,
    jar: RwLock<Option<String>>,
    document_lang: RwLock<Option<String>>,
    revalidations: Mutex<usize>,
}

impl MemoryHost {
    pub fn new(cookie: LocaleCookie) -> Self {
        Self {
            cookie,
            ..Self::default()
        }
    }

    /// `Cookie` request header carrying the persisted preference.
    pub fn cookie_header(&self) -> Option<String> {
        let set_cookie = self.jar.read().clone()?;
        set_cookie.split(';').next().map(str::to_string)
    }

    pub fn document_language(&self) -> Option<String> {
        self.document_lang.read().clone()
    }

    pub fn revalidations(&self) -> usize {
        *self.revalidations.lock()
    }
}

#[async_trait]
impl ClientHost for MemoryHost {
    async fn persist_preference(&self, locale: Locale) -> Result<()> {
        *self.jar.write() = Some(self.cookie.serialize(locale));
        Ok(())
    }

    fn set_document_language(&self, tag: &str) {
        *self.document_lang.write() = Some(tag.to_string());
    }

    async fn revalidate(&self) {
        *self.revalidations.lock() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync() -> (ClientSync, Arc<MemoryHost>, Arc<CatalogRuntime>) {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let runtime = Arc::new(CatalogRuntime::new());
        let host = Arc::new(MemoryHost::new(LocaleCookie::default()));
        let sync = ClientSync::new(runtime.clone(), host.clone(), catalog);
        (sync, host, runtime)
    }

    #[tokio::test]
    async fn test_mount_applies_server_locale() {
        let (sync, host, runtime) = sync();
        assert_eq!(sync.phase(), SyncPhase::Uninitialized);
        assert!(!sync.state().is_ready);

        let state = sync.mount(Locale::Ru, &HashMap::new()).await;
        assert!(state.is_ready);
        assert_eq!(state.current_locale, Locale::Ru);
        assert_eq!(state.initialization_error, None);
        assert_eq!(runtime.language(), Some(Locale::Ru));
        assert_eq!(host.document_language().as_deref(), Some("ru"));
        assert_eq!(runtime.translator().unwrap().t("global.home"), "Главная");
    }

    #[tokio::test]
    async fn test_query_override_wins_on_mount() {
        let (sync, host, _) = sync();
        let query = HashMap::from([("lang".to_string(), "tw".to_string())]);

        let state = sync.mount(Locale::Ko, &query).await;
        assert_eq!(state.current_locale, Locale::Tw);
        assert_eq!(host.document_language().as_deref(), Some("zh-TW"));
    }

    #[tokio::test]
    async fn test_remount_only_reconciles() {
        let (sync, _, runtime) = sync();
        sync.mount(Locale::En, &HashMap::new()).await;

        let state = sync.mount(Locale::Ko, &HashMap::new()).await;
        assert_eq!(state.current_locale, Locale::Ko);
        assert_eq!(runtime.language(), Some(Locale::Ko));
        assert_eq!(sync.phase(), SyncPhase::Ready);
    }

    #[tokio::test]
    async fn test_change_language_requires_ready() {
        let (sync, host, _) = sync();
        assert!(!sync.change_language(Locale::Ko).await);
        assert_eq!(host.cookie_header(), None);
    }

    #[tokio::test]
    async fn test_change_language_persists_and_revalidates() {
        let (sync, host, _) = sync();
        sync.mount(Locale::En, &HashMap::new()).await;

        assert!(sync.change_language(Locale::Tw).await);
        assert_eq!(sync.state().current_locale, Locale::Tw);
        assert_eq!(host.cookie_header().as_deref(), Some("i18n=tw"));
        assert_eq!(host.document_language().as_deref(), Some("zh-TW"));
        assert_eq!(host.revalidations(), 1);
    }
}
