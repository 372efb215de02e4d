//! faucet state machine - pure, no side effects

use super::*;
use crate::address::{classify, RecipientKind};
use crate::amount::Amount;
use crate::dispatch::{TransactionResult, TransferRequest};
use crate::ens::{EnsError, EnsProfile, DEFAULT_DEBOUNCE};
use crate::monitor::ConnectionStatus;
use crate::request::{GenerationCounter, RequestState};
use crate::settings::{RpcConfig, SettingsDialog, PRESETS};
use ethers::types::Address;
use std::time::Duration;
use tracing::{debug, warn};

/// everything the form shows
#[derive(Clone, Debug)]
pub struct FaucetCore {
    // form
    pub recipient_input: String,
    pub recipient: RecipientKind,
    pub ens: RequestState<EnsProfile, EnsError>,
    pub amount: Amount,
    /// resolved on success, failed otherwise; both carry the banner
    pub transfer: RequestState<TransactionResult, TransactionResult>,

    // node
    pub rpc: RpcConfig,
    pub connection: RequestState<ConnectionStatus>,

    // settings dialog
    pub settings: SettingsDialog,
    pub settings_error: Option<String>,
    pub draft_test: RequestState<ConnectionStatus>,

    ens_generation: GenerationCounter,
    probe_generation: GenerationCounter,
    draft_generation: GenerationCounter,
    debounce: Duration,
}

impl Default for FaucetCore {
    fn default() -> Self {
        Self::new(RpcConfig::default())
    }
}

impl FaucetCore {
    /// `rpc` is the config loaded from storage
    pub fn new(rpc: RpcConfig) -> Self {
        Self {
            recipient_input: String::new(),
            recipient: RecipientKind::Empty,
            ens: RequestState::Idle,
            amount: Amount::default(),
            transfer: RequestState::Idle,
            rpc,
            connection: RequestState::Idle,
            settings: SettingsDialog::new(),
            settings_error: None,
            draft_test: RequestState::Idle,
            ens_generation: GenerationCounter::new(),
            probe_generation: GenerationCounter::new(),
            draft_generation: GenerationCounter::new(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// pure update function - returns effects to execute
    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        use Effect as E;
        use Event::*;

        match event {
            Started => vec![self.probe()],

            // ===== form =====
            RecipientChanged(input) => {
                let generation = self.ens_generation.advance();
                self.recipient = classify(&input);
                self.recipient_input = input;

                if self.recipient.is_ens() {
                    self.ens = RequestState::Pending;
                    vec![E::ScheduleEnsLookup {
                        generation,
                        delay: self.debounce,
                    }]
                } else {
                    self.ens = RequestState::Idle;
                    vec![]
                }
            }

            AmountChanged(amount) => {
                self.amount = amount;
                vec![]
            }

            SubmitClicked => {
                let Some(request) = self.transfer_request() else {
                    debug!("submit ignored, form not ready");
                    return vec![];
                };
                self.transfer = RequestState::Pending;
                vec![E::SubmitTransfer(request)]
            }

            ResultDismissed => {
                if !self.transfer.is_pending() {
                    self.transfer = RequestState::Idle;
                }
                vec![]
            }

            // ===== async completions =====
            EnsDebounceElapsed { generation } => {
                if !self.ens_generation.is_current(generation) {
                    return vec![];
                }
                match &self.recipient {
                    RecipientKind::EnsCandidate(name) => vec![E::ResolveEns {
                        generation,
                        name: name.clone(),
                    }],
                    _ => vec![],
                }
            }

            EnsResolved { generation, result } => {
                if !self.ens_generation.is_current(generation) {
                    debug!("dropping stale ens result {:?}", generation);
                    return vec![];
                }
                self.ens = result.into();
                vec![]
            }

            ProbeFinished { generation, status } => {
                if self.probe_generation.is_current(generation) {
                    self.connection = RequestState::Resolved(status);
                }
                vec![]
            }

            DraftTested { generation, status } => {
                if self.draft_generation.is_current(generation) && self.settings.is_open() {
                    self.draft_test = RequestState::Resolved(status);
                }
                vec![]
            }

            TransferFinished(result) => {
                if result.success {
                    self.transfer = RequestState::Resolved(result);
                    vec![E::Celebrate]
                } else {
                    self.transfer = RequestState::Failed(result);
                    vec![]
                }
            }

            SettingsPersisted(Ok(())) => vec![E::success("Settings saved")],

            SettingsPersisted(Err(e)) => {
                warn!("settings not persisted: {}", e);
                vec![E::error(format!("Could not save settings: {}", e))]
            }

            // ===== settings dialog =====
            SettingsOpened => {
                self.settings.open(&self.rpc);
                self.clear_draft_feedback();
                vec![]
            }

            SettingsHostEdited(host) => {
                self.edit_draft(|draft| draft.host = host);
                vec![]
            }

            SettingsPortEdited(port) => {
                self.edit_draft(|draft| draft.port = port);
                vec![]
            }

            SettingsTlsToggled(use_tls) => {
                self.edit_draft(|draft| draft.use_tls = use_tls);
                vec![]
            }

            PresetSelected(index) => {
                if let Some(preset) = PRESETS.get(index) {
                    self.settings.apply_preset(preset);
                    self.clear_draft_feedback();
                }
                vec![]
            }

            SettingsReset => {
                self.settings.reset();
                self.clear_draft_feedback();
                vec![]
            }

            SettingsTestClicked => {
                let Some(draft) = self.settings.draft() else {
                    return vec![];
                };
                match draft.to_config() {
                    Ok(config) => {
                        let generation = self.draft_generation.advance();
                        self.draft_test = RequestState::Pending;
                        self.settings_error = None;
                        vec![E::TestDraft { generation, config }]
                    }
                    Err(e) => {
                        self.settings_error = Some(e.to_string());
                        vec![]
                    }
                }
            }

            SettingsSaved => match self.settings.commit() {
                Ok(config) => {
                    self.rpc = config.clone();
                    self.clear_draft_feedback();
                    vec![E::PersistSettings(config), self.probe()]
                }
                Err(e) => {
                    self.settings_error = Some(e.to_string());
                    vec![]
                }
            },

            SettingsCancelled => {
                self.settings.cancel();
                self.clear_draft_feedback();
                vec![]
            }
        }
    }

    /// recipient address once known: literal, or a resolved ens name
    pub fn resolved_recipient(&self) -> Option<Address> {
        match &self.recipient {
            RecipientKind::Address(address) => Some(*address),
            RecipientKind::EnsCandidate(_) => self.ens.resolved().map(|p| p.address),
            RecipientKind::Empty | RecipientKind::Invalid => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.resolved_recipient().is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.transfer.is_pending()
    }

    /// outcome of the last finished submit
    pub fn last_result(&self) -> Option<&TransactionResult> {
        self.transfer.resolved().or_else(|| self.transfer.failed())
    }

    pub fn submit_label(&self) -> String {
        if self.is_submitting() {
            "Sending ETH...".into()
        } else {
            format!("Send {} ETH", self.amount)
        }
    }

    /// inline error under the recipient field
    pub fn recipient_error(&self) -> Option<String> {
        match &self.recipient {
            RecipientKind::Invalid => {
                Some("Please enter a valid Ethereum address or ENS name".into())
            }
            RecipientKind::EnsCandidate(_) => self.ens.failed().map(|e| e.to_string()),
            _ => None,
        }
    }

    /// helper line under the recipient field when there is no error
    pub fn recipient_hint(&self) -> String {
        match (&self.recipient, &self.ens) {
            (RecipientKind::EnsCandidate(name), RequestState::Pending) => {
                format!("Resolving {}...", name)
            }
            (RecipientKind::EnsCandidate(_), RequestState::Resolved(profile)) => {
                format!("Resolves to {:?}", profile.address)
            }
            _ => "Enter an Ethereum address or ENS name to receive ETH".into(),
        }
    }

    /// connection badge text
    pub fn connection_label(&self) -> String {
        match &self.connection {
            RequestState::Idle | RequestState::Pending => "Connecting...".into(),
            RequestState::Resolved(status) => status.label(),
            RequestState::Failed(e) => e.clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.resolved().is_some_and(|s| s.connected)
    }

    fn probe(&mut self) -> Effect {
        let generation = self.probe_generation.advance();
        self.connection = RequestState::Pending;
        Effect::ProbeConnection {
            generation,
            config: self.rpc.clone(),
        }
    }

    fn transfer_request(&self) -> Option<TransferRequest> {
        if !self.can_submit() {
            return None;
        }
        let recipient = self.resolved_recipient()?;
        let profile = match &self.recipient {
            RecipientKind::EnsCandidate(_) => self.ens.resolved(),
            _ => None,
        };
        Some(TransferRequest {
            config: self.rpc.clone(),
            recipient,
            amount: self.amount,
            ens_name: profile.map(|p| p.name.clone()),
            display_name: profile.and_then(|p| p.display_name.clone()),
        })
    }

    fn edit_draft(&mut self, edit: impl FnOnce(&mut crate::settings::SettingsDraft)) {
        if let Some(draft) = self.settings.draft_mut() {
            edit(draft);
            self.clear_draft_feedback();
        }
    }

    /// any draft change invalidates the error and an in-flight test
    fn clear_draft_feedback(&mut self) {
        self.settings_error = None;
        self.draft_test = RequestState::Idle;
        self.draft_generation.advance();
    }
}
