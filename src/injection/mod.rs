//! Keeps a single owned stylesheet in sync with the token stores.
//!
//! The first injection happens synchronously on [`InjectionScheduler::mount`];
//! later store changes restart a debounce window and only the trailing change
//! regenerates the stylesheet. The host drives time by calling
//! [`InjectionScheduler::poll`] (or [`InjectionScheduler::tick`]) at or after
//! [`InjectionScheduler::next_deadline`].

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::css::{generate, optimize};
use crate::store::{SubscriptionId, TokenStores};
use crate::tokens::{BrandColorsSettings, SpacingSettings, TypographySettings};

pub mod clock;
pub mod document;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document::{FileStyleSink, SinkError, SinkResult, StyleDocument, StyleElement, StyleSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No stylesheet has been injected yet; the next injection is immediate.
    Pending,
    Idle,
    Debouncing { deadline: Instant },
    Unmounted,
}

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    typography: SubscriptionId,
    colors: SubscriptionId,
    spacing: SubscriptionId,
}

struct SchedulerInner<S: StyleSink> {
    stores: TokenStores,
    sink: RefCell<S>,
    clock: Rc<dyn Clock>,
    debounce: Duration,
    element_id: String,
    state: Cell<SchedulerState>,
    injections: Cell<u64>,
    failures: Cell<u64>,
}

pub struct InjectionScheduler<S: StyleSink + 'static> {
    inner: Rc<SchedulerInner<S>>,
    subscriptions: Cell<Option<Subscriptions>>,
}

impl<S: StyleSink + 'static> InjectionScheduler<S> {
    pub fn new(
        stores: TokenStores,
        sink: S,
        clock: Rc<dyn Clock>,
        debounce: Duration,
        element_id: impl Into<String>,
    ) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                stores,
                sink: RefCell::new(sink),
                clock,
                debounce,
                element_id: element_id.into(),
                state: Cell::new(SchedulerState::Pending),
                injections: Cell::new(0),
                failures: Cell::new(0),
            }),
            subscriptions: Cell::new(None),
        }
    }

    pub fn from_config(
        stores: TokenStores,
        sink: S,
        clock: Rc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self::new(
            stores,
            sink,
            clock,
            config.debounce(),
            config.style_element_id.clone(),
        )
    }

    /// Subscribe to the stores and inject immediately.
    pub fn mount(&self) {
        if self.subscriptions.get().is_some() {
            tracing::debug!("injection scheduler already mounted");
            return;
        }
        if self.inner.state.get() == SchedulerState::Unmounted {
            self.inner.state.set(SchedulerState::Pending);
        }

        let stores = &self.inner.stores;
        let subscriptions = Subscriptions {
            typography: stores
                .typography
                .subscribe(change_listener::<S, TypographySettings>(&self.inner)),
            colors: stores
                .colors
                .subscribe(change_listener::<S, BrandColorsSettings>(&self.inner)),
            spacing: stores
                .spacing
                .subscribe(change_listener::<S, SpacingSettings>(&self.inner)),
        };
        self.subscriptions.set(Some(subscriptions));
        self.inner.on_change();
    }

    /// Cancel any pending injection and stop observing the stores.
    pub fn teardown(&self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            let stores = &self.inner.stores;
            stores.typography.unsubscribe(subscriptions.typography);
            stores.colors.unsubscribe(subscriptions.colors);
            stores.spacing.unsubscribe(subscriptions.spacing);
        }
        if let SchedulerState::Debouncing { .. } = self.inner.state.get() {
            tracing::debug!("cancelled pending style injection");
        }
        self.inner.state.set(SchedulerState::Unmounted);
    }

    pub fn state(&self) -> SchedulerState {
        self.inner.state.get()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.inner.state.get() {
            SchedulerState::Debouncing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Inject if the debounce window has elapsed at `now`. Returns whether it fired.
    pub fn poll(&self, now: Instant) -> bool {
        match self.inner.state.get() {
            SchedulerState::Debouncing { deadline } if now >= deadline => {
                self.inner.inject();
                true
            }
            _ => false,
        }
    }

    pub fn tick(&self) -> bool {
        self.poll(self.inner.clock.now())
    }

    /// Inject a pending change without waiting for the window to close.
    pub fn flush(&self) -> bool {
        match self.inner.state.get() {
            SchedulerState::Debouncing { .. } => {
                self.inner.inject();
                true
            }
            _ => false,
        }
    }

    /// Successful injections since construction.
    pub fn injection_count(&self) -> u64 {
        self.inner.injections.get()
    }

    pub fn failure_count(&self) -> u64 {
        self.inner.failures.get()
    }

    pub fn element_id(&self) -> &str {
        &self.inner.element_id
    }

    pub fn sink(&self) -> Ref<'_, S> {
        self.inner.sink.borrow()
    }
}

impl<S: StyleSink + 'static> Drop for InjectionScheduler<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn change_listener<S, T>(inner: &Rc<SchedulerInner<S>>) -> impl Fn(&T) + 'static
where
    S: StyleSink + 'static,
    T: 'static,
{
    let weak: Weak<SchedulerInner<S>> = Rc::downgrade(inner);
    move |_: &T| {
        if let Some(inner) = weak.upgrade() {
            inner.on_change();
        }
    }
}

impl<S: StyleSink> SchedulerInner<S> {
    fn on_change(&self) {
        match self.state.get() {
            SchedulerState::Pending => self.inject(),
            SchedulerState::Idle | SchedulerState::Debouncing { .. } => {
                let deadline = self.clock.now() + self.debounce;
                self.state.set(SchedulerState::Debouncing { deadline });
            }
            SchedulerState::Unmounted => {
                tracing::debug!("ignoring token change after teardown");
            }
        }
    }

    fn inject(&self) {
        let css = generate(
            &self.stores.colors.snapshot(),
            &self.stores.typography.snapshot(),
            &self.stores.spacing.snapshot(),
        );
        let report = optimize(&css);
        if !report.errors.is_empty() {
            tracing::debug!(issues = report.errors.len(), "stylesheet validation notes");
        }

        let result = self
            .sink
            .borrow_mut()
            .replace_style(&self.element_id, &report.optimized);
        match result {
            Ok(()) => {
                self.injections.set(self.injections.get() + 1);
                self.state.set(SchedulerState::Idle);
                tracing::debug!(
                    id = %self.element_id,
                    bytes = report.optimized_size,
                    ratio = report.compression_ratio,
                    "injected stylesheet"
                );
            }
            Err(err) => {
                self.failures.set(self.failures.get() + 1);
                // A failed first injection keeps the next change immediate.
                if self.state.get() != SchedulerState::Pending {
                    self.state.set(SchedulerState::Idle);
                }
                tracing::error!(
                    ?err,
                    id = %self.element_id,
                    "style injection failed; keeping previous stylesheet"
                );
            }
        }
    }
}
