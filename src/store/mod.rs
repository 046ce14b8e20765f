//! Observable token stores with versioned, corruption-tolerant persistence.
//!
//! A store is shared as `Rc<TokenStore<T>>`; all methods take `&self` and
//! listeners run synchronously after the settings borrow has been released,
//! so a listener may read any store (including the one that changed).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::KeyValueStorage;
use crate::tokens::presets::{ColorPreset, TypographyPreset};
use crate::tokens::{BrandColorsSettings, SpacingSettings, TypographySettings};

mod colors;
pub mod error;
pub mod machine;
mod spacing;
mod typography;

pub use error::{StoreError, StoreResult};
pub use machine::{HydrationEvent, HydrationMachine, HydrationState, HydrationTransition};

pub type TypographyStore = TokenStore<TypographySettings>;
pub type BrandColorsStore = TokenStore<BrandColorsSettings>;
pub type SpacingStore = TokenStore<SpacingSettings>;

/// Shape-specific behaviour plugged into the shared [`TokenStore`] logic.
pub trait TokenSet: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    type Key: Copy + fmt::Debug + fmt::Display;
    type Patch;

    /// Section name used in diagnostics and envelopes.
    const NAME: &'static str;
    const STORAGE_KEY: &'static str;
    const SCHEMA_VERSION: u32;

    fn defaults() -> Self;

    /// Every key a structurally complete value must contain, in wire form.
    fn required_keys() -> Vec<&'static str>;

    fn apply_patch(&mut self, key: Self::Key, patch: Self::Patch) -> StoreResult<()>;

    /// Merge one externally sourced entry.
    fn apply_entry(&mut self, key: &str, value: &Value) -> StoreResult<()>;

    /// Structural check of a persisted entry (presence of nested numeric fields).
    fn validate_entry(key: &str, value: Option<&Value>) -> Result<(), String>;

    /// Upgrade persisted settings written with `from_version` in place.
    fn migrate(_settings: &mut Map<String, Value>, _from_version: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEntry {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub applied: Vec<String>,
    pub dropped: Vec<DroppedEntry>,
}

impl BatchReport {
    pub fn changed_anything(&self) -> bool {
        !self.applied.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    Restored { migrated_from: Option<u32> },
    Absent,
    Reset { reasons: Vec<String> },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedBlob<T> {
    settings: T,
    #[serde(default)]
    customized: bool,
    schema_version: u32,
}

pub struct TokenStore<T: TokenSet> {
    settings: RefCell<T>,
    machine: RefCell<HydrationMachine>,
    storage: Option<Rc<dyn KeyValueStorage>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<T>)>>,
    next_subscription: Cell<u64>,
}

impl<T: TokenSet> TokenStore<T> {
    /// In-memory store holding the defaults; nothing is persisted.
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_storage(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self::build(Some(storage))
    }

    fn build(storage: Option<Rc<dyn KeyValueStorage>>) -> Self {
        Self {
            settings: RefCell::new(T::defaults()),
            machine: RefCell::new(HydrationMachine::new()),
            storage,
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> T {
        self.settings.borrow().clone()
    }

    pub fn state(&self) -> HydrationState {
        self.machine.borrow().state()
    }

    pub fn hydration_history(&self) -> Vec<HydrationTransition> {
        self.machine.borrow().history().to_vec()
    }

    pub fn is_customized(&self) -> bool {
        *self.settings.borrow() != T::defaults()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Apply a typed patch to one entry. On error the settings are untouched.
    pub fn update(&self, key: T::Key, patch: T::Patch) -> StoreResult<()> {
        let mut next = self.snapshot();
        next.apply_patch(key, patch).inspect_err(|err| {
            tracing::warn!(set = T::NAME, %key, %err, "rejected token update");
        })?;
        self.commit(next);
        Ok(())
    }

    /// Merge externally sourced entries; unknown or malformed entries are dropped.
    pub fn batch_update(&self, entries: &Map<String, Value>) -> BatchReport {
        let mut next = self.snapshot();
        let mut report = BatchReport::default();
        for (key, value) in entries {
            match next.apply_entry(key, value) {
                Ok(()) => report.applied.push(key.clone()),
                Err(err) => {
                    tracing::warn!(set = T::NAME, key, %err, "dropping batch entry");
                    report.dropped.push(DroppedEntry {
                        key: key.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        if report.changed_anything() {
            self.commit(next);
        }
        report
    }

    pub fn reset_to_defaults(&self) {
        tracing::info!(set = T::NAME, "resetting tokens to defaults");
        self.commit(T::defaults());
    }

    /// Load from the attached storage; a store without storage keeps its defaults.
    pub fn hydrate(&self) -> HydrationOutcome {
        let raw = match &self.storage {
            Some(storage) => storage.get(T::STORAGE_KEY).unwrap_or_else(|err| {
                tracing::warn!(set = T::NAME, ?err, "failed to read persisted tokens");
                None
            }),
            None => None,
        };
        self.hydrate_from(raw.as_deref())
    }

    /// Run migration and structural validation over a persisted blob. Any failing
    /// required key resets the whole store to defaults.
    pub fn hydrate_from(&self, raw: Option<&str>) -> HydrationOutcome {
        self.advance(HydrationEvent::Begin);

        let outcome = match raw {
            None => {
                self.settings.replace(T::defaults());
                HydrationOutcome::Absent
            }
            Some(raw) => match restore::<T>(raw) {
                Ok((settings, migrated_from)) => {
                    self.settings.replace(settings);
                    HydrationOutcome::Restored { migrated_from }
                }
                Err(reasons) => {
                    tracing::warn!(
                        set = T::NAME,
                        ?reasons,
                        "persisted tokens corrupted; resetting to defaults"
                    );
                    self.settings.replace(T::defaults());
                    HydrationOutcome::Reset { reasons }
                }
            },
        };

        match &outcome {
            HydrationOutcome::Restored { migrated_from } => {
                self.advance(HydrationEvent::Validated);
                if migrated_from.is_some() {
                    self.persist();
                }
            }
            HydrationOutcome::Absent => self.advance(HydrationEvent::Corrupted),
            HydrationOutcome::Reset { .. } => {
                self.advance(HydrationEvent::Corrupted);
                self.persist();
            }
        }
        self.advance(HydrationEvent::Finish);
        tracing::debug!(set = T::NAME, ?outcome, "hydration finished");

        self.notify();
        outcome
    }

    fn advance(&self, event: HydrationEvent) {
        if let Err(err) = self.machine.borrow_mut().transition(event) {
            tracing::warn!(set = T::NAME, %err, "hydration state machine out of sync");
        }
    }

    fn commit(&self, next: T) {
        self.settings.replace(next);
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let settings = self.snapshot();
        let blob = PersistedBlob {
            customized: settings != T::defaults(),
            settings,
            schema_version: T::SCHEMA_VERSION,
        };
        let result = serde_json::to_string(&blob)
            .map_err(|err| err.to_string())
            .and_then(|serialized| {
                storage
                    .set(T::STORAGE_KEY, &serialized)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            tracing::warn!(set = T::NAME, %err, "failed to persist tokens");
        }
    }

    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl<T: TokenSet> Default for TokenStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenSet> fmt::Debug for TokenStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("set", &T::NAME)
            .field("state", &self.state())
            .field("settings", &*self.settings.borrow())
            .finish()
    }
}

/// The three stores an engine instance works with, shared by handle.
#[derive(Debug, Clone, Default)]
pub struct TokenStores {
    pub typography: Rc<TypographyStore>,
    pub colors: Rc<BrandColorsStore>,
    pub spacing: Rc<SpacingStore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationSummary {
    pub typography: HydrationOutcome,
    pub colors: HydrationOutcome,
    pub spacing: HydrationOutcome,
}

impl TokenStores {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_storage(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            typography: Rc::new(TypographyStore::with_storage(storage.clone())),
            colors: Rc::new(BrandColorsStore::with_storage(storage.clone())),
            spacing: Rc::new(SpacingStore::with_storage(storage)),
        }
    }

    pub fn hydrate_all(&self) -> HydrationSummary {
        HydrationSummary {
            typography: self.typography.hydrate(),
            colors: self.colors.hydrate(),
            spacing: self.spacing.hydrate(),
        }
    }

    pub fn reset_all(&self) {
        self.typography.reset_to_defaults();
        self.colors.reset_to_defaults();
        self.spacing.reset_to_defaults();
    }

    /// Apply a named typography preset through `batch_update`.
    pub fn apply_typography_preset(&self, preset: TypographyPreset) -> BatchReport {
        apply_preset(&*self.typography, &preset.settings())
    }

    pub fn apply_color_preset(&self, preset: ColorPreset) -> BatchReport {
        apply_preset(&*self.colors, &preset.colors())
    }
}

fn apply_preset<T: TokenSet>(store: &TokenStore<T>, settings: &T) -> BatchReport {
    match serde_json::to_value(settings) {
        Ok(Value::Object(entries)) => store.batch_update(&entries),
        Ok(other) => {
            tracing::warn!(set = T::NAME, ?other, "preset did not serialize to an object");
            BatchReport::default()
        }
        Err(err) => {
            tracing::warn!(set = T::NAME, %err, "failed to serialize preset");
            BatchReport::default()
        }
    }
}

/// Parse, migrate, validate and decode a persisted blob. `Err` lists every problem found.
fn restore<T: TokenSet>(raw: &str) -> Result<(T, Option<u32>), Vec<String>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| vec![format!("unparseable blob: {err}")])?;
    let Value::Object(mut blob) = value else {
        return Err(vec!["blob is not an object".to_string()]);
    };
    let Some(Value::Object(mut settings)) = blob.remove("settings") else {
        return Err(vec!["missing settings object".to_string()]);
    };

    let version = match blob.get("schemaVersion") {
        None => 1,
        Some(value) => value
            .as_u64()
            .and_then(|version| u32::try_from(version).ok())
            .ok_or_else(|| vec![format!("invalid schemaVersion {value}")])?,
    };
    if version > T::SCHEMA_VERSION {
        return Err(vec![format!(
            "schemaVersion {version} is newer than supported {}",
            T::SCHEMA_VERSION
        )]);
    }
    let migrated_from = (version < T::SCHEMA_VERSION).then_some(version);
    if migrated_from.is_some() {
        tracing::info!(
            set = T::NAME,
            from = version,
            to = T::SCHEMA_VERSION,
            "migrating persisted tokens"
        );
        T::migrate(&mut settings, version);
    }

    let reasons = check_entries::<T>(&mut settings);
    if !reasons.is_empty() {
        return Err(reasons);
    }

    let settings = serde_json::from_value(Value::Object(settings))
        .map_err(|err| vec![format!("settings do not decode: {err}")])?;
    Ok((settings, migrated_from))
}

/// Drop keys `T` does not know, then validate every required key. Returns one
/// `"<key>: <reason>"` line per failing key.
pub(crate) fn check_entries<T: TokenSet>(entries: &mut Map<String, Value>) -> Vec<String> {
    let required = T::required_keys();
    entries.retain(|key, _| {
        let known = required.contains(&key.as_str());
        if !known {
            tracing::warn!(set = T::NAME, key, "dropping unknown key");
        }
        known
    });

    required
        .iter()
        .filter_map(|key| {
            T::validate_entry(key, entries.get(*key))
                .err()
                .map(|reason| format!("{key}: {reason}"))
        })
        .collect()
}

/// `value.<field>` is present and numeric.
pub(crate) fn require_number(value: &Value, field: &str) -> Result<(), String> {
    match value.get(field) {
        Some(number) if number.is_number() => Ok(()),
        Some(_) => Err(format!("{field} is not numeric")),
        None => Err(format!("missing {field}")),
    }
}

/// `value` is an object whose `min` and `max` are numeric.
pub(crate) fn require_clamp(value: &Value) -> Result<(), String> {
    if !value.is_object() {
        return Err("expected a clamp object".to_string());
    }
    require_number(value, "min")?;
    require_number(value, "max")
}
