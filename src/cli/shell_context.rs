//! Shared runtime state for CLI interactions and command execution.

use dialoguer::theme::ColorfulTheme;
use envelope_config::{Config, ConfigManager};
use envelope_domain::Money;

use crate::{
    currency::{format_delta, format_money},
    errors::CliError,
    session::WalletSession,
    utils,
};

use super::{
    commands,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: WalletSession,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the wallet under the application home (`ENVELOPE_HOME`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = utils::app_home_dir();
        let manager = ConfigManager::with_base_dir(home.clone())?;
        let config = manager.load_effective()?;
        let session = WalletSession::open_home(&home, &config)?;
        Ok(Self::with_session(mode, session, config))
    }

    pub fn with_session(mode: CliMode, session: WalletSession, config: Config) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });
        Self {
            mode,
            registry,
            session,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("wallet {}> ", self.money(self.session.total_balance()))
    }

    pub(crate) fn money(&self, amount: Money) -> String {
        format_money(amount, &self.config.currency)
    }

    pub(crate) fn delta(&self, amount: Money) -> String {
        format_delta(amount, &self.config.currency)
    }
}
