use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tabstatus_cdp::{CdpClient, CdpHost};
use tabstatus_core::config::Config;
use tabstatus_core::{
    paths, CredentialAcquirer, FilePreferences, Observer, PreferenceStore, Publisher,
    RedactionTable, Sanitizer, SlackClient,
};
use tracing::{info, warn};

pub fn run(home: &Path, devtools_url: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load(home).context("failed to load config")?;
    let devtools_url = devtools_url.unwrap_or(&config.devtools_url).to_string();
    let store = FilePreferences::new(paths::preferences_path(home));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let client = CdpClient::new(&devtools_url)
            .with_context(|| format!("invalid DevTools endpoint '{devtools_url}'"))?;
        let host = Arc::new(CdpHost::new(client));

        let prefs = store.snapshot();
        let acquisition = CredentialAcquirer::new(config.service.clone())
            .close_delay(config.hidden_page_close_delay())
            .prefer_workspace(prefs.selected_workspace_id.clone())
            .acquire_with_workspaces(&host)
            .await
            .context("failed to acquire credentials from the browser")?;
        info!(
            team = acquisition.auth.team_domain(),
            workspaces = acquisition.workspaces.len(),
            "acquired credentials"
        );

        let workspaces = acquisition.workspaces;
        if let Err(e) = store.update(|p| {
            p.workspaces = workspaces;
            Ok(())
        }) {
            warn!("could not record workspaces: {e}");
        }
        if !prefs.authorized {
            warn!("status sync is not authorized yet; run `tabstatus prefs set authorized true`");
        }

        let api = SlackClient::new(
            config.service.api_base.clone(),
            config.service.session_cookie.clone(),
        );
        let sanitizer = Sanitizer::new(RedactionTable::with_extra(&config.redactions));
        let publisher = Publisher::new(Arc::clone(&host), api, sanitizer)
            .emoji(config.status_emoji.clone())
            .max_len(config.max_status_len);
        info!(devtools = %host.client().endpoint(), "watching the focused tab (Ctrl-C to stop)");
        let observer = Observer::new(host, publisher, store, acquisition.auth)
            .interval(config.poll_interval());

        tokio::select! {
            _ = observer.run() => {}
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                info!("stopping");
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}
