//! Remote quiz settings kept between runs.
//!
//! `setup` stores the resolved settings together with the question endpoint
//! URL built from them. A later remote quiz reuses that URL unless new
//! settings were given for it.

use url::Url;

use crate::models::{QuizSettings, SettingsOverrides};
use crate::storage::{StorageKey, Store, StoreExt};

use super::SourceError;
use super::opentdb::{API_BASE, build_api_url};

/// Resolve `overrides` on top of the saved settings and store both the
/// settings and their question endpoint URL.
pub fn save_setup(
    store: &dyn Store,
    overrides: &SettingsOverrides,
) -> Result<(QuizSettings, Url), SourceError> {
    let settings = resolve(store, overrides)?;
    let url = build_api_url(API_BASE, &settings)?;

    store.save(&StorageKey::Settings, &settings)?;
    store.save(&StorageKey::ApiUrl, url.as_str())?;
    log::info!("saved quiz settings {settings:?} for {url}");
    Ok((settings, url))
}

/// Question endpoint for a remote quiz: the saved URL when `overrides` is
/// empty, otherwise one built from freshly resolved settings.
pub fn quiz_url(store: &dyn Store, overrides: &SettingsOverrides) -> Result<Url, SourceError> {
    if overrides.is_empty() {
        if let Some(saved) = store.load::<String>(&StorageKey::ApiUrl)? {
            log::debug!("using saved question URL");
            return Ok(Url::parse(&saved)?);
        }
    }
    let settings = resolve(store, overrides)?;
    build_api_url(API_BASE, &settings)
}

fn resolve(store: &dyn Store, overrides: &SettingsOverrides) -> Result<QuizSettings, SourceError> {
    let persisted: Option<QuizSettings> = store.load(&StorageKey::Settings)?;
    Ok(QuizSettings::resolve(overrides, persisted.as_ref()))
}
