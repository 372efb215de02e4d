//! events - user input and async completions

use crate::amount::Amount;
use crate::dispatch::TransactionResult;
use crate::ens::{EnsError, EnsProfile};
use crate::monitor::ConnectionStatus;
use crate::request::Generation;

/// everything that can happen to the faucet
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// shell is up, run the startup probe
    Started,

    // ===== form =====
    RecipientChanged(String),

    AmountChanged(Amount),

    SubmitClicked,

    /// banner closed
    ResultDismissed,

    // ===== async completions =====
    EnsDebounceElapsed {
        generation: Generation,
    },

    EnsResolved {
        generation: Generation,
        result: Result<EnsProfile, EnsError>,
    },

    ProbeFinished {
        generation: Generation,
        status: ConnectionStatus,
    },

    DraftTested {
        generation: Generation,
        status: ConnectionStatus,
    },

    TransferFinished(TransactionResult),

    /// error text when the write failed
    SettingsPersisted(Result<(), String>),

    // ===== settings dialog =====
    SettingsOpened,
    SettingsHostEdited(String),
    SettingsPortEdited(String),
    SettingsTlsToggled(bool),
    /// index into the preset catalog
    PresetSelected(usize),
    SettingsReset,
    SettingsTestClicked,
    SettingsSaved,
    SettingsCancelled,
}
