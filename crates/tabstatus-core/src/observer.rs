//! The tab observer loop.
//!
//! Polls the focused tab on a fixed interval. A status may lag focus by up
//! to one interval.

use crate::auth::Auth;
use crate::host::{BrowserHost, PageInspector, TabId};
use crate::preferences::PreferenceStore;
use crate::publisher::{PresenceApi, PublishOutcome, Publisher};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What one iteration decided.
#[derive(Debug)]
pub enum Tick {
    NoTab,
    /// Same tab as the last publish.
    Unchanged,
    /// Browser-internal page.
    Internal,
    /// Sync is switched off or not yet authorized.
    Disabled,
    /// A publish was started for this tab. The handle is never awaited by
    /// the loop itself.
    Dispatched(TabId, JoinHandle<PublishOutcome>),
}

pub struct Observer<H, A, P> {
    host: Arc<H>,
    publisher: Arc<Publisher<H, A>>,
    prefs: P,
    auth: Arc<Auth>,
    interval: Duration,
    last_observed: Option<TabId>,
}

impl<H, A, P> Observer<H, A, P>
where
    H: BrowserHost + PageInspector + 'static,
    A: PresenceApi + 'static,
    P: PreferenceStore,
{
    pub fn new(host: Arc<H>, publisher: Publisher<H, A>, prefs: P, auth: Auth) -> Self {
        Self {
            host,
            publisher: Arc::new(publisher),
            prefs,
            auth: Arc::new(auth),
            interval: Duration::from_secs(1),
            last_observed: None,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn last_observed(&self) -> Option<&TabId> {
        self.last_observed.as_ref()
    }

    /// Run forever. Ends only when the runtime is torn down.
    pub async fn run(mut self) {
        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One iteration, without the trailing sleep.
    pub async fn tick(&mut self) -> Tick {
        let tab = match self.host.focused_tab().await {
            Ok(Some(tab)) => tab,
            Ok(None) => return Tick::NoTab,
            Err(e) => {
                warn!("reading focused tab failed: {e}");
                return Tick::NoTab;
            }
        };

        if self.last_observed.as_ref() == Some(&tab.id) {
            return Tick::Unchanged;
        }
        if tab.is_internal() {
            debug!(tab = %tab.id, "ignoring internal page");
            return Tick::Internal;
        }
        if !self.prefs.snapshot().sync_allowed() {
            debug!(tab = %tab.id, "sync disabled, not publishing");
            return Tick::Disabled;
        }

        debug!(tab = %tab.id, "focused tab changed");
        self.last_observed = Some(tab.id.clone());

        let publisher = Arc::clone(&self.publisher);
        let auth = Arc::clone(&self.auth);
        let id = tab.id.clone();
        let handle = tokio::spawn(async move { publisher.publish(&id, &auth).await });
        Tick::Dispatched(tab.id, handle)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
