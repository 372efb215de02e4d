//! form, status chip, result banner and settings window

use crate::theme::PALETTE;
use eframe::egui::{self, Color32, RichText, TextEdit};
use egui_phosphor::regular as icons;
use faucet_core::dispatch::GETH_DEV_COMMAND;
use faucet_core::settings::SettingsDraft;
use faucet_core::{
    Amount, ConnectionStatus, EnsProfile, Event, FaucetCore, RequestState, TransactionResult,
    PRESETS,
};

const ACCENT: Color32 = PALETTE.accent;
const CORAL: Color32 = Color32::from_rgb(255, 107, 107);
const MUTED: Color32 = PALETTE.text_muted;
const SUCCESS: Color32 = PALETTE.success;
const WARNING: Color32 = Color32::from_rgb(230, 180, 90);
const ERROR: Color32 = PALETTE.error;

const RECIPIENT_PLACEHOLDER: &str = "0x742d35Cc6634C0532925a3b8D62B8bDD65b9b22d or name.eth";

/// chip state for a connection probe
#[derive(Debug, Clone, Copy, PartialEq)]
enum ChipState {
    Checking,
    Connected,
    Disconnected,
}

impl ChipState {
    fn of(state: &RequestState<ConnectionStatus>) -> Self {
        match state {
            RequestState::Idle | RequestState::Pending => ChipState::Checking,
            RequestState::Resolved(status) if status.connected => ChipState::Connected,
            RequestState::Resolved(_) | RequestState::Failed(_) => ChipState::Disconnected,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ChipState::Checking => icons::CIRCLE_NOTCH,
            ChipState::Connected => icons::PLUGS_CONNECTED,
            ChipState::Disconnected => icons::PLUGS,
        }
    }

    fn color(&self) -> Color32 {
        match self {
            ChipState::Checking => WARNING,
            ChipState::Connected => SUCCESS,
            ChipState::Disconnected => WARNING,
        }
    }
}

/// title, subtitle, connection chip and settings button
pub fn render_header(ui: &mut egui::Ui, core: &FaucetCore) -> Option<Event> {
    let mut event = None;

    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        ui.label(
            RichText::new(format!("{} ETH Faucet", icons::DROP))
                .heading()
                .color(ACCENT),
        );
        ui.label(
            RichText::new("Get free ETH for development on your local testnet").color(MUTED),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            // center the chip row
            let width = 280.0;
            ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));

            let state = ChipState::of(&core.connection);
            egui::Frame::none()
                .stroke(egui::Stroke::new(1.0, state.color()))
                .rounding(14.0)
                .inner_margin(egui::Margin::symmetric(12.0, 4.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("{} {}", state.icon(), core.connection_label()))
                            .color(state.color()),
                    );
                })
                .response
                .on_hover_text(core.rpc.endpoint_string());

            if ui
                .button(icons::GEAR)
                .on_hover_text("rpc settings")
                .clicked()
            {
                event = Some(Event::SettingsOpened);
            }
        });
        ui.add_space(12.0);
    });

    event
}

/// recipient, ens card, amount slider and submit button
pub fn render_form(ui: &mut egui::Ui, core: &FaucetCore) -> Vec<Event> {
    let mut events = Vec::new();

    egui::Frame::none()
        .fill(PALETTE.surface)
        .rounding(10.0)
        .inner_margin(egui::Margin::same(24.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.label(RichText::new("Recipient").size(16.0).strong());
            ui.add_space(4.0);

            let mut input = core.recipient_input.clone();
            let response = ui.add(
                TextEdit::singleline(&mut input)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(ui.available_width())
                    .hint_text(RECIPIENT_PLACEHOLDER),
            );
            if response.changed() {
                events.push(Event::RecipientChanged(input));
            }

            match core.recipient_error() {
                Some(error) => {
                    ui.label(RichText::new(error).small().color(ERROR));
                }
                None => {
                    ui.horizontal(|ui| {
                        if core.ens.is_pending() {
                            ui.spinner();
                        }
                        ui.label(RichText::new(core.recipient_hint()).small().color(MUTED));
                    });
                }
            }

            if let Some(profile) = core.ens.resolved() {
                ui.add_space(6.0);
                render_ens_card(ui, profile);
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(12.0);

            ui.label(
                RichText::new(format!("Amount: {} ETH", core.amount))
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(4.0);
            if let Some(amount) = render_amount_slider(ui, core.amount) {
                events.push(Event::AmountChanged(amount));
            }

            ui.add_space(20.0);

            let label = if core.is_submitting() {
                format!("{} {}", icons::CIRCLE_NOTCH, core.submit_label())
            } else {
                format!("{} {}", icons::PAPER_PLANE_TILT, core.submit_label())
            };
            let button = egui::Button::new(RichText::new(label).size(17.0).strong())
                .fill(PALETTE.accent_pressed)
                .min_size(egui::vec2(ui.available_width(), 48.0));
            if ui.add_enabled(core.can_submit(), button).clicked() {
                events.push(Event::SubmitClicked);
            }

            if let Some(result) = core.last_result() {
                ui.add_space(16.0);
                if let Some(event) = render_result(ui, result) {
                    events.push(event);
                }
            }
        });

    events
}

fn render_ens_card(ui: &mut egui::Ui, profile: &EnsProfile) {
    egui::Frame::none()
        .fill(Color32::from_rgb(24, 40, 48))
        .rounding(6.0)
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(icons::IDENTIFICATION_BADGE).size(20.0).color(ACCENT));
                ui.vertical(|ui| {
                    let title = profile.display_name.as_deref().unwrap_or(&profile.name);
                    ui.label(RichText::new(title).strong());
                    ui.label(
                        RichText::new(format!("{:?}", profile.address))
                            .monospace()
                            .small()
                            .color(MUTED),
                    );
                    if let Some(description) = &profile.description {
                        ui.label(RichText::new(description).small());
                    }
                    if let Some(avatar) = &profile.avatar {
                        if avatar.starts_with("http") {
                            ui.hyperlink_to(RichText::new("avatar").small(), avatar);
                        }
                    }
                });
            });
        });
}

/// returns the new amount when the slider moved
fn render_amount_slider(ui: &mut egui::Ui, current: Amount) -> Option<Amount> {
    let mut value = current.as_eth_f64();
    let min = Amount::MIN.as_eth_f64();
    let max = Amount::MAX.as_eth_f64();

    let response = ui.add(
        egui::Slider::new(&mut value, min..=max)
            .step_by(0.1)
            .fixed_decimals(1)
            .suffix(" ETH"),
    );

    // marks
    let width = ui.spacing().slider_width;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), egui::Sense::hover());
    for mark in Amount::MARKS {
        let t = ((mark.as_eth_f64() - min) / (max - min)) as f32;
        let x = rect.left() + t * rect.width();
        ui.painter().text(
            egui::pos2(x, rect.center().y),
            egui::Align2::CENTER_CENTER,
            format!("{} ETH", mark),
            egui::FontId::proportional(10.0),
            MUTED,
        );
    }

    let amount = Amount::from_eth_f64(value);
    (response.changed() && amount != current).then_some(amount)
}

/// success or failure banner with a copyable hash
pub fn render_result(ui: &mut egui::Ui, result: &TransactionResult) -> Option<Event> {
    let mut event = None;
    let (icon, color, fill) = if result.success {
        (icons::CHECK_CIRCLE, SUCCESS, Color32::from_rgb(28, 52, 38))
    } else {
        (icons::WARNING_CIRCLE, ERROR, Color32::from_rgb(58, 30, 32))
    };

    egui::Frame::none()
        .fill(fill)
        .rounding(6.0)
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(18.0).color(color));
                ui.add(egui::Label::new(RichText::new(&result.message).color(color)).wrap());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui.small_button(icons::X).clicked() {
                        event = Some(Event::ResultDismissed);
                    }
                });
            });

            if let Some(hash) = result.tx_hash_hex() {
                ui.add_space(6.0);
                egui::Frame::none()
                    .fill(Color32::from_black_alpha(40))
                    .rounding(4.0)
                    .inner_margin(egui::Margin::same(6.0))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new(format!("TX: {}", hash)).monospace().small());
                            if ui.small_button(format!("{} copy", icons::COPY)).clicked() {
                                ui.output_mut(|o| o.copied_text = hash.clone());
                            }
                        });
                    });
            }
        });

    event
}

/// geth dev command hint
pub fn render_footer(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(16.0);
        ui.label(
            RichText::new("Make sure your local geth instance is running with:")
                .small()
                .color(MUTED),
        );
        ui.horizontal(|ui| {
            ui.label(RichText::new(GETH_DEV_COMMAND).monospace().small());
            if ui.small_button(icons::COPY).on_hover_text("copy").clicked() {
                ui.output_mut(|o| o.copied_text = GETH_DEV_COMMAND.to_string());
            }
        });
    });
}

/// settings dialog; only shown while a draft exists
pub fn render_settings_window(ctx: &egui::Context, core: &FaucetCore) -> Vec<Event> {
    let mut events = Vec::new();
    let Some(draft) = core.settings.draft() else {
        return events;
    };

    let mut open = true;
    egui::Window::new(format!("{} rpc settings", icons::GEAR))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 320.0])
        .show(ctx, |ui| {
            render_settings_body(ui, core, draft, &mut events);
        });

    if !open {
        events.push(Event::SettingsCancelled);
    }
    events
}

fn render_settings_body(
    ui: &mut egui::Ui,
    core: &FaucetCore,
    draft: &SettingsDraft,
    events: &mut Vec<Event>,
) {
    // preset catalog
    let selected = draft.matching_preset().map(|p| p.name).unwrap_or("custom");
    egui::ComboBox::from_label("preset")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (index, preset) in PRESETS.iter().enumerate() {
                if ui.selectable_label(selected == preset.name, preset.name).clicked() {
                    events.push(Event::PresetSelected(index));
                }
            }
        });

    ui.add_space(8.0);

    egui::Grid::new("rpc_fields")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label(RichText::new("host").color(MUTED));
            let mut host = draft.host.clone();
            if ui
                .add(TextEdit::singleline(&mut host).hint_text("localhost"))
                .changed()
            {
                events.push(Event::SettingsHostEdited(host));
            }
            ui.end_row();

            ui.label(RichText::new("port").color(MUTED));
            let mut port = draft.port.clone();
            if ui
                .add(
                    TextEdit::singleline(&mut port)
                        .desired_width(80.0)
                        .hint_text("default"),
                )
                .changed()
            {
                events.push(Event::SettingsPortEdited(port));
            }
            ui.end_row();

            ui.label(RichText::new("tls").color(MUTED));
            let mut use_tls = draft.use_tls;
            if ui.checkbox(&mut use_tls, "use https").changed() {
                events.push(Event::SettingsTlsToggled(use_tls));
            }
            ui.end_row();
        });

    ui.add_space(8.0);
    match draft.to_config() {
        Ok(config) => {
            ui.label(RichText::new(config.endpoint_string()).monospace().small().color(MUTED));
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).small().color(ERROR));
        }
    }
    if let Some(error) = &core.settings_error {
        ui.label(RichText::new(error).small().color(ERROR));
    }

    // draft probe
    match &core.draft_test {
        RequestState::Idle => {}
        RequestState::Pending => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("checking...").small().color(MUTED));
            });
        }
        RequestState::Resolved(status) => {
            let color = if status.connected { SUCCESS } else { ERROR };
            ui.label(RichText::new(status.label()).small().color(color));
        }
        RequestState::Failed(e) => {
            ui.label(RichText::new(e).small().color(ERROR));
        }
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let test = egui::Button::new(format!("{} test", icons::ARROWS_CLOCKWISE));
        if ui.add_enabled(!core.draft_test.is_pending(), test).clicked() {
            events.push(Event::SettingsTestClicked);
        }
        if ui.button(format!("{} reset", icons::ARROW_COUNTER_CLOCKWISE)).clicked() {
            events.push(Event::SettingsReset);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let save = egui::Button::new(RichText::new(format!("{} save", icons::CHECK)).color(CORAL));
            if ui.add(save).clicked() {
                events.push(Event::SettingsSaved);
            }
            if ui.button("cancel").clicked() {
                events.push(Event::SettingsCancelled);
            }
        });
    });
}
