//! One initialization pass against a live session.
//!
//! The pass runs two phases and then resets the session:
//!
//! 1. data collection: running and startup config, model name, interface
//!    status. Each result is kept as soon as it arrives; the first error ends
//!    the phase.
//! 2. structural parsing: build per-interface records, if both the status
//!    table and the running config are non-empty.
//!
//! Nothing here returns an error. Callers inspect the [`InitializationLog`]
//! and whatever data was gathered.

use log::{info, warn};
use serde::Serialize;

use crate::channel::Connector;
use crate::dialect;
use crate::error::{Error, SessionError};
use crate::interface::{self, InterfaceRecords};
use crate::parse::StatusTable;
use crate::session::Session;

/// Append-only record of phase outcomes, mirrored to the `log` facade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InitializationLog {
    entries: Vec<String>,
}

impl InitializationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn info(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        info!("{}", entry);
        self.entries.push(entry);
    }

    fn warn(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        warn!("{}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects device data through a borrowed session and builds the
/// per-interface model from it.
pub struct Initializer<'s, C: Connector> {
    session: &'s mut Session<C>,
    log: InitializationLog,
    running_config: Vec<String>,
    startup_config: Vec<String>,
    model_name: String,
    interfaces_status: StatusTable,
    records: InterfaceRecords,
}

impl<'s, C: Connector> Initializer<'s, C> {
    pub fn new(session: &'s mut Session<C>) -> Self {
        Self {
            session,
            log: InitializationLog::new(),
            running_config: Vec::new(),
            startup_config: Vec::new(),
            model_name: dialect::UNKNOWN_MODEL.to_string(),
            interfaces_status: StatusTable::new(),
            records: InterfaceRecords::default(),
        }
    }

    /// Run both phases, then quietly reset the session.
    pub async fn initialize(&mut self) {
        self.collect_data().await;
        self.build_records();
        self.quiet_reset().await;
    }

    async fn collect_data(&mut self) {
        match self.fetch().await {
            Ok(()) => self.log.info("Data collected successfully."),
            Err(e @ Error::Session(SessionError::NotConnected)) => self
                .log
                .warn(format!("SSH session not active during data collection: {e}")),
            Err(e) => self
                .log
                .warn(format!("Unexpected error during data collection: {e}")),
        }
    }

    async fn fetch(&mut self) -> crate::Result<()> {
        let (running, startup) = self.session.both_configs().await?;
        self.running_config = running;
        self.startup_config = startup;

        self.model_name = self.session.connected()?.model_name().await?;
        self.interfaces_status = self.session.connected()?.interfaces_status().await?;
        Ok(())
    }

    fn build_records(&mut self) {
        if self.interfaces_status.is_empty() || self.running_config.is_empty() {
            self.log.warn("Missing interfaces status or running config.");
            return;
        }

        self.records = interface::build_interfaces(&self.running_config, &self.interfaces_status);
        self.log.info(format!(
            "Initialized {} physical interface settings.",
            self.records.settings.len()
        ));
        self.log.info(format!(
            "Initialized {} current interface status objects.",
            self.records.status.len()
        ));
    }

    async fn quiet_reset(&mut self) {
        match self.session.reset().await {
            Ok(outcome) if outcome.is_established() => {}
            Ok(outcome) => self.log.warn(format!("Quiet reset failed: {outcome}")),
            Err(e) => self.log.warn(format!("Quiet reset skipped: {e}")),
        }
    }

    pub fn log(&self) -> &InitializationLog {
        &self.log
    }

    pub fn running_config(&self) -> &[String] {
        &self.running_config
    }

    pub fn startup_config(&self) -> &[String] {
        &self.startup_config
    }

    /// Model name, or `"Unknown"`.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn interfaces_status(&self) -> &StatusTable {
        &self.interfaces_status
    }

    pub fn records(&self) -> &InterfaceRecords {
        &self.records
    }

    /// Give up the session borrow, keeping the gathered data.
    pub fn into_report(self) -> InitializationReport {
        InitializationReport {
            log: self.log,
            running_config: self.running_config,
            startup_config: self.startup_config,
            model_name: self.model_name,
            interfaces_status: self.interfaces_status,
            records: self.records,
        }
    }
}

/// Everything one initialization pass gathered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializationReport {
    pub log: InitializationLog,
    pub running_config: Vec<String>,
    pub startup_config: Vec<String>,
    pub model_name: String,
    pub interfaces_status: StatusTable,
    pub records: InterfaceRecords,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::testing::{
        PASSWORD, ScriptedConnector, USERNAME, command, login, login_only,
    };
    use crate::session::{Credentials, SessionState, Timeouts};
    use tokio_test::io::Builder;

    const RUNNING: &str = "config-file-header\r\nswitch01\r\n!\r\n\
interface GigabitEthernet1\r\n description \"uplink\"\r\n speed 1000\r\n\
 switchport mode trunk\r\n switchport trunk allowed vlan 5,6\r\nexit\r\n\
interface GigabitEthernet2\r\n shutdown\r\nexit\r\n";

    const STARTUP: &str = "config-file-header\r\nswitch01\r\n";

    const SYSTEM: &str = "System Description:  CBS250-8T-E-2G 8-Port Gigabit Smart Switch\r\n";

    const STATUS: &str = "Port     Type         Duplex  Speed Neg      ctrl State       Pressure Mode\r\n\
-------- ------------ ------  ----- -------- ---- ----------- -------- -------\r\n\
gi1      1G-Copper    Full    1000  Enabled  Off  Up          Disabled On\r\n\
gi2      1G-Copper      --      --     --     --  Down           --     --\r\n\
Po1         --     --      --      --       --    Not Present\r\n";

    fn session(connector: ScriptedConnector) -> Session<ScriptedConnector> {
        Session::new(
            "10.0.0.2",
            connector,
            Credentials::new(USERNAME, PASSWORD),
            Timeouts::default(),
        )
    }

    fn running_transcript() -> tokio_test::io::Mock {
        let mut builder = Builder::new();
        login(&mut builder);
        command(&mut builder, "show running-config", RUNNING).build()
    }

    fn data_transcript(status: &str) -> tokio_test::io::Mock {
        let mut builder = Builder::new();
        login(&mut builder);
        command(&mut builder, "show startup-config", STARTUP);
        command(&mut builder, "show system", SYSTEM);
        command(&mut builder, "show interfaces status", status).build()
    }

    #[tokio::test]
    async fn test_full_pass() {
        let connector = ScriptedConnector::new()
            .with(running_transcript())
            .with(data_transcript(STATUS))
            .with(login_only());
        let mut session = session(connector);
        session.connect().await;

        let mut init = Initializer::new(&mut session);
        init.initialize().await;

        assert_eq!(
            init.log().entries(),
            [
                "Data collected successfully.",
                "Initialized 2 physical interface settings.",
                "Initialized 2 current interface status objects.",
            ]
        );
        assert_eq!(init.model_name(), "CBS250-8T-E-2G");
        assert_eq!(init.startup_config(), ["config-file-header", "switch01"]);
        assert_eq!(init.interfaces_status().len(), 3);

        let records = init.records();
        assert_eq!(records.settings["gi1"].description, "uplink");
        assert_eq!(records.settings["gi1"].allowed_vlans, vec![5, 6]);
        assert_eq!(records.settings["gi2"].admin_state.as_str(), "shutdown");
        assert_eq!(records.status["gi2"].link_state.as_deref(), Some("Down"));

        drop(init);
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(session.connector().remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_status_table() {
        let connector = ScriptedConnector::new()
            .with(running_transcript())
            .with(data_transcript("\r\n"))
            .with(login_only());
        let mut session = session(connector);
        session.connect().await;

        let mut init = Initializer::new(&mut session);
        init.initialize().await;

        assert_eq!(
            init.log().entries(),
            [
                "Data collected successfully.",
                "Missing interfaces status or running config.",
            ]
        );
        assert!(init.records().settings.is_empty());
        assert!(init.records().status.is_empty());
        assert_eq!(init.running_config().len(), 9);
    }

    #[tokio::test]
    async fn test_not_connected() {
        let mut session = session(ScriptedConnector::new());

        let mut init = Initializer::new(&mut session);
        init.initialize().await;

        let log: Vec<_> = init.log().iter().collect();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("SSH session not active during data collection: "));
        assert_eq!(log[1], "Missing interfaces status or running config.");
        assert!(log[2].starts_with("Quiet reset skipped: "));
        assert_eq!(init.model_name(), "Unknown");
        assert!(init.running_config().is_empty());
    }

    #[tokio::test]
    async fn test_collection_error_keeps_partial_data() {
        let mut data = Builder::new();
        login(&mut data);
        command(&mut data, "show startup-config", STARTUP);
        data.write(b"show system\n");

        let connector = ScriptedConnector::new()
            .with(running_transcript())
            .with(data.build())
            .with(login_only());
        let mut session = session(connector);
        session.connect().await;

        let mut init = Initializer::new(&mut session);
        init.initialize().await;

        let report = init.into_report();
        assert!(report.log.entries()[0].starts_with("Unexpected error during data collection: "));
        assert_eq!(report.log.entries()[1], "Missing interfaces status or running config.");
        assert_eq!(report.startup_config, vec!["config-file-header", "switch01"]);
        assert!(!report.running_config.is_empty());
        assert_eq!(report.model_name, "Unknown");
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_failed_reset_is_logged() {
        let connector = ScriptedConnector::new()
            .with(running_transcript())
            .with(data_transcript(STATUS));
        let mut session = session(connector);
        session.connect().await;

        let mut init = Initializer::new(&mut session);
        init.initialize().await;

        let last = init.log().entries().last().unwrap();
        assert!(last.starts_with("Quiet reset failed: Connection failed: "));
        drop(init);
        assert_eq!(session.state(), SessionState::Failed);
    }
}
