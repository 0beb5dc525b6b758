//! Store-setup wizard.
//!
//! A linear five-step machine: platform select, store info, credentials,
//! sync, success. The first two steps gate on their inputs, step three hands
//! over to [`SetupWizard::connect`] which starts the sync simulation, and
//! the sync step advances itself on a timer until it lands on success.
//!
//! The simulation runs on a tokio task owned by the wizard; dropping the
//! wizard aborts the task, so a torn-down page never has a stray timer
//! mutating state behind it. Tests drive the timer deterministically with
//! `#[tokio::test(start_paused = true)]`.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use keymint_core::{ApiCredentials, CurrencyCode, Platform};

use crate::config::SyncConfig;

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    SelectPlatform,
    StoreInfo,
    Credentials,
    Syncing,
    Success,
}

impl Step {
    /// Total number of steps (progress dots in the view).
    pub const COUNT: u8 = 5;

    /// 1-based position for display.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::SelectPlatform => 1,
            Self::StoreInfo => 2,
            Self::Credentials => 3,
            Self::Syncing => 4,
            Self::Success => 5,
        }
    }

    const fn back(self) -> Self {
        match self {
            Self::SelectPlatform | Self::StoreInfo => Self::SelectPlatform,
            Self::Credentials => Self::StoreInfo,
            Self::Syncing => Self::Credentials,
            Self::Success => Self::Syncing,
        }
    }
}

/// Details collected across the first three steps.
#[derive(Debug, Clone)]
pub struct StoreDetails {
    pub platform: Option<Platform>,
    pub store_name: String,
    pub site_url: String,
    pub credentials: Option<ApiCredentials>,
    pub currency: CurrencyCode,
}

/// Point-in-time view of the wizard, published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub step: Step,
    /// Sync percentage, meaningful only during [`Step::Syncing`].
    pub progress: u8,
    pub syncing: bool,
    /// Set after the post-success delay; the caller should navigate away.
    pub redirect_ready: bool,
    /// Set when the user skipped setup; the caller decides where to go.
    pub abandoned: bool,
}

/// A step gate refused the requested action.
///
/// This is the recoverable, user-visible validation signal: the wizard
/// stays where it is and the view renders `message` next to the step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StepBlocked {
    pub step: Step,
    pub message: &'static str,
}

struct WizardState {
    step: Step,
    details: StoreDetails,
    progress: u8,
    syncing: bool,
    redirect_ready: bool,
    abandoned: bool,
}

/// Store-setup wizard state machine.
///
/// Owned by the application root and injected into the setup page; all
/// methods take `&self`.
pub struct SetupWizard {
    state: Arc<Mutex<WizardState>>,
    snapshot_tx: watch::Sender<WizardSnapshot>,
    sync_task: Mutex<Option<JoinHandle<()>>>,
    config: SyncConfig,
}

impl SetupWizard {
    /// Create a wizard at step one with empty details.
    #[must_use]
    pub fn new(config: SyncConfig, currency: CurrencyCode) -> Self {
        let state = WizardState {
            step: Step::SelectPlatform,
            details: StoreDetails {
                platform: None,
                store_name: String::new(),
                site_url: String::new(),
                credentials: None,
                currency,
            },
            progress: 0,
            syncing: false,
            redirect_ready: false,
            abandoned: false,
        };
        let (snapshot_tx, _) = watch::channel(snapshot_of(&state));
        Self {
            state: Arc::new(Mutex::new(state)),
            snapshot_tx,
            sync_task: Mutex::new(None),
            config,
        }
    }

    /// Record the selected platform (step one input).
    pub fn set_platform(&self, platform: Platform) {
        self.lock_state().details.platform = Some(platform);
        self.publish();
    }

    /// Record the store name and site URL (step two inputs).
    pub fn set_store_info(&self, store_name: impl Into<String>, site_url: impl Into<String>) {
        {
            let mut state = self.lock_state();
            state.details.store_name = store_name.into();
            state.details.site_url = site_url.into();
        }
        self.publish();
    }

    /// Record API credentials from the advanced pane (step three input).
    ///
    /// All-blank credentials are treated as "use redirect instead" and
    /// recorded as none.
    pub fn set_credentials(&self, credentials: ApiCredentials) {
        self.lock_state().details.credentials = if credentials.is_empty() {
            None
        } else {
            Some(credentials)
        };
        self.publish();
    }

    /// Record the preferred payout currency.
    pub fn set_currency(&self, currency: CurrencyCode) {
        self.lock_state().details.currency = currency;
        self.publish();
    }

    /// Advance one step, enforcing the per-step gates.
    ///
    /// # Errors
    ///
    /// Returns [`StepBlocked`] with a user-visible message when the current
    /// step's inputs are incomplete, or when the current step does not
    /// advance through `next` (connect handles step three; sync and success
    /// advance on their own).
    pub fn next(&self) -> Result<Step, StepBlocked> {
        let mut state = self.lock_state();
        let step = match state.step {
            Step::SelectPlatform => {
                if state.details.platform.is_none() {
                    return Err(StepBlocked {
                        step: Step::SelectPlatform,
                        message: "Select a platform",
                    });
                }
                Step::StoreInfo
            }
            Step::StoreInfo => {
                let details = &state.details;
                if details.store_name.trim().is_empty() || details.site_url.trim().is_empty() {
                    return Err(StepBlocked {
                        step: Step::StoreInfo,
                        message: "Fill all fields",
                    });
                }
                Step::Credentials
            }
            Step::Credentials => {
                return Err(StepBlocked {
                    step: Step::Credentials,
                    message: "Connect the store to continue",
                });
            }
            Step::Syncing => {
                return Err(StepBlocked {
                    step: Step::Syncing,
                    message: "Sync in progress",
                });
            }
            Step::Success => {
                return Err(StepBlocked {
                    step: Step::Success,
                    message: "Setup is already complete",
                });
            }
        };
        state.step = step;
        drop(state);
        self.publish();
        Ok(step)
    }

    /// Step back one step.
    ///
    /// A no-op at step one, at success, and while the sync simulation is
    /// running. Returns the (possibly unchanged) current step.
    pub fn previous(&self) -> Step {
        let step = {
            let mut state = self.lock_state();
            if !state.syncing && !matches!(state.step, Step::SelectPlatform | Step::Success) {
                state.step = state.step.back();
            }
            state.step
        };
        self.publish();
        step
    }

    /// Connect the store: transition from the credentials step into the
    /// sync simulation.
    ///
    /// Entering the sync step always resets progress to zero; a timer then
    /// raises it by the configured step per tick until it reaches 100, at
    /// which point the wizard lands on success and, after the configured
    /// delay, flags `redirect_ready`.
    ///
    /// # Errors
    ///
    /// Returns [`StepBlocked`] when called from any step other than
    /// credentials.
    pub fn connect(&self) -> Result<(), StepBlocked> {
        {
            let mut state = self.lock_state();
            if state.step != Step::Credentials {
                return Err(StepBlocked {
                    step: state.step,
                    message: "Connect is only available from the credentials step",
                });
            }
            state.step = Step::Syncing;
            state.progress = 0;
            state.syncing = true;
            info!(platform = ?state.details.platform, store = %state.details.store_name, "store sync started");
        }
        self.publish();
        self.spawn_sync_task();
        Ok(())
    }

    /// Skip setup (steps one to three only, never while syncing).
    ///
    /// Returns whether abandonment was signalled; the caller handles the
    /// navigation.
    pub fn skip(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.syncing || state.step > Step::Credentials {
                return false;
            }
            state.abandoned = true;
            info!(step = state.step.number(), "setup wizard skipped");
        }
        self.publish();
        true
    }

    /// Current snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        snapshot_of(&self.lock_state())
    }

    /// Copy of the collected store details.
    #[must_use]
    pub fn details(&self) -> StoreDetails {
        self.lock_state().details.clone()
    }

    /// Subscribe to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = snapshot_of(&self.lock_state());
        self.snapshot_tx.send_replace(snapshot);
    }

    fn spawn_sync_task(&self) {
        let state = Arc::clone(&self.state);
        let tx = self.snapshot_tx.clone();
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.tick);
            // The first tick completes immediately; progress starts moving
            // one full tick after connect, like the original interval.
            interval.tick().await;
            loop {
                interval.tick().await;
                let done = {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    state.progress = state.progress.saturating_add(config.step).min(100);
                    if state.progress >= 100 {
                        state.progress = 100;
                        state.syncing = false;
                        state.step = Step::Success;
                    }
                    tx.send_replace(snapshot_of(&state));
                    state.step == Step::Success
                };
                if done {
                    break;
                }
            }
            info!("store sync complete");

            tokio::time::sleep(config.success_redirect).await;
            {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                state.redirect_ready = true;
                tx.send_replace(snapshot_of(&state));
            }
        });

        let mut task = self.sync_task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for SetupWizard {
    /// Cancel the sync task so a torn-down wizard leaves no pending timer.
    fn drop(&mut self) {
        let mut task = self.sync_task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

fn snapshot_of(state: &WizardState) -> WizardSnapshot {
    WizardSnapshot {
        step: state.step,
        progress: state.progress,
        syncing: state.syncing,
        redirect_ready: state.redirect_ready,
        abandoned: state.abandoned,
    }
}
