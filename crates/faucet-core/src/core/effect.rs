//! effects - side effects requested by the core

use crate::dispatch::TransferRequest;
use crate::request::Generation;
use crate::settings::RpcConfig;
use std::time::Duration;

/// side effects the shell must execute
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    // ===== ens =====
    /// sleep for `delay`, then send `EnsDebounceElapsed { generation }`
    ScheduleEnsLookup {
        generation: Generation,
        delay: Duration,
    },

    /// resolve `name` and send `EnsResolved`
    ResolveEns {
        generation: Generation,
        name: String,
    },

    // ===== node =====
    /// probe the active endpoint and send `ProbeFinished`
    ProbeConnection {
        generation: Generation,
        config: RpcConfig,
    },

    /// probe the settings draft and send `DraftTested`
    TestDraft {
        generation: Generation,
        config: RpcConfig,
    },

    /// send the transfer and report `TransferFinished`
    SubmitTransfer(TransferRequest),

    // ===== settings =====
    /// write the config to durable storage and report `SettingsPersisted`
    PersistSettings(RpcConfig),

    // ===== ui feedback =====
    /// confetti
    Celebrate,

    ShowNotification {
        message: String,
        level: NotificationLevel,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl Effect {
    pub fn success(message: impl Into<String>) -> Self {
        Effect::ShowNotification {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Effect::ShowNotification {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}
