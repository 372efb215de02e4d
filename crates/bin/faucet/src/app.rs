//! egui shell: owns the core, feeds it events, runs its effects

use crate::confetti::Confetti;
use crate::executor::EffectExecutor;
use crate::widgets;
use crate::theme::PALETTE;
use eframe::egui::{self, RichText};
use faucet_core::rpc::EthersConnector;
use faucet_core::{
    ConnectionMonitor, Effect, EnsResolver, Event, FaucetConfig, FaucetCore, NotificationLevel,
    RpcConfig, SettingsStore, SledStore, TransactionDispatcher,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

/// how long a toast stays up
const TOAST_TTL: Duration = Duration::from_secs(5);

struct Toast {
    message: String,
    level: NotificationLevel,
    shown_at: Instant,
}

pub struct FaucetApp {
    core: FaucetCore,
    executor: EffectExecutor<SledStore>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    confetti: Confetti,
    toasts: Vec<Toast>,
    last_frame: Instant,

    // keeps the executor's tasks alive
    _runtime: tokio::runtime::Runtime,
}

impl FaucetApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        config: &FaucetConfig,
        settings: SettingsStore<SledStore>,
        rpc: RpcConfig,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let ctx = cc.egui_ctx.clone();
        let waker = Arc::new(move || ctx.request_repaint());

        let connector = Arc::new(EthersConnector);
        let resolver = EnsResolver::from_endpoints(config.ens_gateways.as_slice());
        info!("ens lookups via {} gateway(s)", resolver.gateway_count());

        let executor = EffectExecutor::new(
            runtime.handle().clone(),
            settings,
            resolver,
            ConnectionMonitor::new(connector.clone()).with_timeout(config.probe_timeout()),
            TransactionDispatcher::new(connector)
                .with_timeout(config.probe_timeout())
                .with_public_deployment(config.public_deployment),
            event_tx,
            waker,
        );

        let mut app = Self {
            core: FaucetCore::new(rpc).with_debounce(config.ens_debounce()),
            executor,
            event_rx,
            confetti: Confetti::new(),
            toasts: Vec::new(),
            last_frame: Instant::now(),
            _runtime: runtime,
        };
        app.handle_event(Event::Started);
        app
    }

    /// run the core and route its effects
    fn handle_event(&mut self, event: Event) {
        for effect in self.core.update(event) {
            match effect {
                Effect::Celebrate => self.confetti.start(),
                Effect::ShowNotification { message, level } => self.toasts.push(Toast {
                    message,
                    level,
                    shown_at: Instant::now(),
                }),
                other => self.executor.execute(other),
            }
        }
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        self.toasts.retain(|t| t.shown_at.elapsed() < TOAST_TTL);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let color = match toast.level {
                        NotificationLevel::Success => PALETTE.success,
                        NotificationLevel::Error => PALETTE.error,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new(&toast.message).color(color));
                    });
                }
            });
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}

impl eframe::App for FaucetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }

        let mut events = Vec::new();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            widgets::render_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(event) = widgets::render_header(ui, &self.core) {
                    events.push(event);
                }
                ui.vertical_centered(|ui| {
                    ui.set_max_width(560.0);
                    events.extend(widgets::render_form(ui, &self.core));
                });
            });
        });

        events.extend(widgets::render_settings_window(ctx, &self.core));

        for event in events {
            self.handle_event(event);
        }

        self.render_toasts(ctx);

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).min(Duration::from_millis(50));
        self.last_frame = now;
        if self.confetti.is_active() {
            self.confetti.step(dt, &mut rand::thread_rng());
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("confetti"),
            ));
            self.confetti.paint(&painter, ctx.screen_rect());
            ctx.request_repaint();
        }

        // spinners while anything is in flight
        if self.core.is_submitting() || self.core.ens.is_pending() || self.core.connection.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
