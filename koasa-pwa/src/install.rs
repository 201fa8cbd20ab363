//! Install prompt flow.
//!
//! The platform fires an "installable" signal; the flow suppresses the
//! default browser prompt by retaining the signal, shows a custom
//! button instead, and replays the signal exactly once when the button
//! is clicked. After use — or once the app reports itself installed —
//! the signal is discarded for good.

// ── Types ───────────────────────────────────────────────────

/// User's choice on the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// The platform's retained `beforeinstallprompt` signal. Single-use:
/// the flow consumes it on the first replay.
pub trait InstallPrompt {
    /// Show the platform prompt and wait for the user's choice.
    fn prompt(&mut self) -> InstallOutcome;
}

/// The page's install button and confirmation notice.
pub trait InstallUi {
    fn show_button(&self);
    fn hide_button(&self);
    /// "App installed" confirmation notice.
    fn installed_notice(&self);
}

/// How the app is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Regular browser tab.
    Browser,
    /// Installed, app-like window.
    Standalone,
    Fullscreen,
    MinimalUi,
}

impl DisplayMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "standalone" => Self::Standalone,
            "fullscreen" => Self::Fullscreen,
            "minimal-ui" => Self::MinimalUi,
            _ => Self::Browser,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Standalone => "standalone",
            Self::Fullscreen => "fullscreen",
            Self::MinimalUi => "minimal-ui",
        }
    }

    /// Launched from the home screen — the app is already installed.
    pub fn is_installed_display(&self) -> bool {
        *self != Self::Browser
    }
}

/// Installation state, as far as this page can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// No retained signal.
    NotInstallable,
    /// Signal retained, custom button visible.
    Installable,
    /// Installed (accepted prompt or platform `appinstalled`).
    Installed,
}

/// The install prompt state machine.
pub struct InstallFlow {
    ui: Box<dyn InstallUi>,
    display_mode: DisplayMode,
    retained: Option<Box<dyn InstallPrompt>>,
    installed: bool,
}

// ── Implementation ──────────────────────────────────────────

impl InstallFlow {
    pub fn new(ui: Box<dyn InstallUi>, display_mode: DisplayMode) -> Self {
        Self {
            ui,
            display_mode,
            retained: None,
            installed: display_mode.is_installed_display(),
        }
    }

    pub fn state(&self) -> InstallState {
        if self.installed {
            InstallState::Installed
        } else if self.retained.is_some() {
            InstallState::Installable
        } else {
            InstallState::NotInstallable
        }
    }

    /// The platform reports the app is installable. Retaining the
    /// signal suppresses the default prompt; the custom button takes
    /// its place. In an installed display mode the signal is dropped
    /// outright.
    pub fn on_installable(&mut self, prompt: Box<dyn InstallPrompt>) {
        if self.installed {
            log::debug!("install signal ignored: already installed");
            return;
        }
        self.retained = Some(prompt);
        self.ui.show_button();
        log::info!("install prompt available ({})", self.display_mode.as_str());
    }

    /// Custom button clicked: replay the retained signal exactly once.
    /// With no retained signal this is a no-op.
    pub fn on_button_click(&mut self) -> Option<InstallOutcome> {
        let mut prompt = match self.retained.take() {
            Some(p) => p,
            None => {
                log::debug!("install click with no retained prompt");
                return None;
            }
        };

        let outcome = prompt.prompt();
        match outcome {
            InstallOutcome::Accepted => {
                self.installed = true;
                self.ui.installed_notice();
            }
            InstallOutcome::Dismissed => {
                log::debug!("install prompt dismissed");
            }
        }

        // Single-use either way: prompt discarded, button hidden.
        self.ui.hide_button();
        Some(outcome)
    }

    /// Platform `appinstalled` event (install may have happened outside
    /// our button, e.g. from the browser menu).
    pub fn on_app_installed(&mut self) {
        self.installed = true;
        self.retained = None;
        self.ui.hide_button();
        self.ui.installed_notice();
        log::info!("app installed");
    }
}

// ── Tests ───────────────────────────────────────────────────
