use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use tokio::{task::JoinHandle, time::timeout};
use url::Url;

use crate::{
    background::BackgroundService,
    cli::{Command, ProfileAction},
    config::AppConfig,
    content::{ContentScript, FormFiller, HtmlPage},
    db::{
        self,
        profile::{ProfileStore, SqliteProfileStore},
    },
    domain::QuickInfo,
    infrastructure::{
        directories::ResolvedPaths,
        shutdown::{self, CloseReason, Shutdown},
    },
    messaging::{BackgroundPort, TabId, TabPort, TabStatus},
    ui::{describe_field, OptionsController, PopupController, ScanState},
};

const PAGE_TAB: TabId = TabId(1);

pub struct FormFillerApp {
    paths: ResolvedPaths,
    config: Arc<AppConfig>,
    store: Arc<SqliteProfileStore>,
    background: Arc<BackgroundService>,
}

impl FormFillerApp {
    pub async fn initialize(config: AppConfig, paths: ResolvedPaths) -> Result<Self> {
        let config = Arc::new(config);
        let pool = db::init_pool(&paths.db_path).await?;
        let store = Arc::new(SqliteProfileStore::new(pool));

        let background = Arc::new(BackgroundService::new(
            store.clone(),
            config.badge.clone(),
        ));
        if background.on_installed().await? {
            tracing::info!(
                "first run: add your details with `profile set` or `profile import`"
            );
        }

        Ok(Self {
            paths,
            config,
            store,
            background,
        })
    }

    pub async fn run(self, command: Command) -> Result<()> {
        let result = match command {
            Command::Fill { page, out, url } => {
                let out = out.unwrap_or_else(|| filled_path(&page));
                self.run_page_session(&page, url.as_deref(), Some(out)).await
            }
            Command::Scan { page, url } => self.run_page_session(&page, url.as_deref(), None).await,
            Command::Profile { action } => self.run_profile(action).await,
        };

        let shutdown_timeout = Duration::from_secs(5);
        if timeout(shutdown_timeout, self.store.close()).await.is_err() {
            tracing::warn!(
                target: "store",
                "storage did not close within {:?}",
                shutdown_timeout
            );
        }
        result
    }

    /// Loads a page, attaches the page script and background relay, then
    /// drives them through the popup the way a user would. With `out` set
    /// the page is filled and written back.
    async fn run_page_session(
        &self,
        page_path: &Path,
        url: Option<&str>,
        out: Option<PathBuf>,
    ) -> Result<()> {
        let html = tokio::fs::read_to_string(page_path)
            .await
            .with_context(|| format!("failed to read page {}", page_path.display()))?;
        let page_url = resolve_page_url(page_path, url)?;
        tracing::info!(target: "session", url = %page_url, "page loaded");

        let shutdown = Shutdown::new();
        shutdown::install_signal_handlers(shutdown.clone());

        let (background_port, events) = BackgroundPort::channel();
        let mut background_handle = self.background.clone().spawn(events, shutdown.subscribe());
        background_port.tab_updated(PAGE_TAB, TabStatus::Loading);

        let content = &self.config.content;
        let filler = FormFiller::new(self.store.clone()).with_highlight(&content.highlight_border);
        let (tab_port, receiver) = TabPort::channel(PAGE_TAB, 8);
        let script = ContentScript::new(
            PAGE_TAB,
            HtmlPage::parse(&html).with_url(page_url.as_str()),
            filler,
            background_port.clone(),
            content.auto_scan_delay,
            content.highlight_duration,
        );
        let script_handle = script.spawn(receiver, shutdown.subscribe());
        background_port.tab_updated(PAGE_TAB, TabStatus::Complete);

        let popup = PopupController::new(tab_port, self.store.clone());
        let scan = popup.scan_current_page().await;
        println!("{}", scan.status);
        for field in &scan.fields {
            println!("  {}", describe_field(field));
        }

        let mut fill_failed = false;
        if out.is_some() {
            if scan.state == ScanState::Ready {
                fill_failed = popup.fill_form().await.is_err();
                println!("{}", popup.scan_current_page().await.status);
            } else {
                tracing::info!(target: "session", "nothing to fill");
            }
        }

        shutdown.trigger(CloseReason::Completed);
        let page = await_script(script_handle).await?;

        let shutdown_timeout = Duration::from_secs(5);
        let relay_wait = tokio::time::sleep(shutdown_timeout);
        tokio::pin!(relay_wait);
        tokio::select! {
            res = &mut background_handle => {
                if let Err(err) = res {
                    if err.is_panic() {
                        tracing::error!("background relay panicked");
                    }
                }
            }
            _ = &mut relay_wait => {
                tracing::warn!(
                    target: "background",
                    "background relay did not stop within {:?}; aborting",
                    shutdown_timeout
                );
                background_handle.abort();
            }
        }

        if let Some(badge) = self.background.badge(PAGE_TAB).filter(|b| !b.text.is_empty()) {
            println!("Badge: {}", badge.text);
        }

        if let Some(out) = out {
            tokio::fs::write(&out, page.render())
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(target: "session", path = %out.display(), "filled page written");
        }

        if fill_failed {
            bail!("form could not be filled");
        }
        Ok(())
    }

    async fn run_profile(&self, action: ProfileAction) -> Result<()> {
        let options = OptionsController::new(self.store.clone());
        match action {
            ProfileAction::Show => {
                let profile = options.load().await?;
                for (category, value) in profile.iter() {
                    println!("{:<24} {}", format!("{}:", category.label()), value);
                }
                match self.store.last_saved().await? {
                    Some(saved) => println!("\nLast saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC")),
                    None => println!("\nNothing saved yet"),
                }
            }
            ProfileAction::Set { field, value } => {
                let profile = options.set_field(field, &value).await?;
                println!("{}: {}", field.label(), profile.get(field));
            }
            ProfileAction::Quick { name, email, phone } => {
                // popup opened on a tab without a page script
                let (port, _receiver) = TabPort::channel(PAGE_TAB, 1);
                let popup = PopupController::new(port, self.store.clone());
                let current = popup.load_quick_info().await?;
                let info = QuickInfo {
                    full_name: name.unwrap_or(current.full_name),
                    email: email.unwrap_or(current.email),
                    phone: phone.unwrap_or(current.phone),
                };
                popup.save_quick_info(&info).await?;
            }
            ProfileAction::Import { file } => {
                options.import_file(&file).await?;
            }
            ProfileAction::Export { out } => {
                let out = out.unwrap_or_else(|| self.paths.export_path.clone());
                options.export_file(&out).await?;
                println!("{}", out.display());
            }
            ProfileAction::Clear { yes } => {
                if !yes {
                    bail!("refusing to delete all data without --yes");
                }
                options.clear_all_data().await?;
            }
        }
        Ok(())
    }
}

async fn await_script(handle: JoinHandle<HtmlPage>) -> Result<HtmlPage> {
    handle.await.map_err(|err| {
        if err.is_panic() {
            tracing::error!("content script panicked");
        }
        anyhow!("content script did not finish: {err}")
    })
}

/// Explicit addresses must be http(s); otherwise the page is addressed by
/// its file location.
fn resolve_page_url(page_path: &Path, url: Option<&str>) -> Result<Url> {
    if let Some(raw) = url {
        let parsed = Url::parse(raw).with_context(|| format!("invalid page url {raw}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("page url must use http or https: {raw}");
        }
        return Ok(parsed);
    }
    let absolute = page_path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", page_path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow!("cannot address {} as a file url", absolute.display()))
}

fn filled_path(page: &Path) -> PathBuf {
    let stem = page
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    page.with_file_name(format!("{stem}.filled.html"))
}
