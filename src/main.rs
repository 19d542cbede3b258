mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{render_row, render_screen, Args, Command, HELP};
use voxclip::config::DeliveryKind;
use voxclip::{
    Clock, Config, Delivery, Identity, Inbox, LogDelivery, NatsDelivery, SessionCoordinator,
    SimulatedBackend, StaticIdentity, TokioClock,
};

/// The record screen plus the message list, driven from the terminal
struct Screen {
    coordinator: SessionCoordinator,
    inbox: Inbox,
    user_id: String,
}

impl Screen {
    /// Apply one command; returns false when the user asked to quit
    async fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Record => report(self.coordinator.on_record_tap().await),
            Command::Play => {
                report(self.coordinator.on_play_pause_tap().await.map(|_| ()))
            }
            Command::Discard => report(self.coordinator.on_discard().await),
            Command::Toggle(id) => {
                let selected = self.coordinator.toggle_recipient(&id);
                println!("{} {}", if selected { "picked" } else { "unpicked" }, id);
            }
            Command::Send => match self.coordinator.on_send_tap().await {
                Ok(envelope) => {
                    println!("sent to {}", envelope.recipients.join(", "));
                    if let Err(e) = self.inbox.insert(
                        envelope.clip_id.to_string(),
                        self.user_id.clone(),
                        envelope.sent_at,
                        envelope.duration_secs,
                    ) {
                        println!("! {}", e.user_message());
                    }
                }
                Err(e) => println!("! {}", e.user_message()),
            },
            Command::List => self.list(),
            Command::PlayRow(n) => match self.inbox.ids().get(n - 1) {
                Some(id) => {
                    if let Err(e) = self.inbox.toggle(id) {
                        println!("! {}", e.user_message());
                    }
                    self.list();
                }
                None => println!("! no row {}", n),
            },
            Command::Wait(duration) => self.pump_for(duration).await,
            Command::Status => {}
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(false),
        }

        println!("{}", render_screen(&self.coordinator.snapshot()));
        Ok(true)
    }

    fn list(&self) {
        if self.inbox.is_empty() {
            println!("(inbox empty)");
            return;
        }

        for (index, row) in self.inbox.snapshot(Utc::now()).iter().enumerate() {
            println!("{}", render_row(index, row));
        }
    }

    /// Let ticks flow for `duration`, printing each change
    async fn pump_for(&mut self, duration: std::time::Duration) {
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                source = self.coordinator.wait_tick() => {
                    self.coordinator.after_tick(source).await;
                    println!("{}", render_screen(&self.coordinator.snapshot()));
                }
                _ = self.inbox.next_tick() => self.list(),
            }
        }
    }

    async fn run_interactive(&mut self) -> Result<()> {
        println!("{}", HELP);
        println!("{}", render_screen(&self.coordinator.snapshot()));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(command) => {
                            if !self.handle(command).await? {
                                break;
                            }
                        }
                        Err(e) => println!("! {}", e),
                    }
                }
                source = self.coordinator.wait_tick() => {
                    self.coordinator.after_tick(source).await;
                    println!("{}", render_screen(&self.coordinator.snapshot()));
                }
                _ = self.inbox.next_tick() => self.list(),
            }
        }

        Ok(())
    }

    async fn run_script(&mut self, commands: Vec<Command>) -> Result<()> {
        for command in commands {
            println!("> {:?}", command);
            if !self.handle(command).await? {
                break;
            }
        }
        Ok(())
    }
}

fn report(result: voxclip::error::Result<()>) {
    if let Err(e) = result {
        println!("! {}", e.user_message());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.app.name, env!("CARGO_PKG_VERSION"));
    info!("Playback policy: {:?}", cfg.playback.policy);

    let identity: Arc<dyn Identity> = Arc::new(StaticIdentity::new(cfg.app.user_id.clone()));
    let user_id = identity
        .current_user_id()
        .context("No user signed in; set app.user_id")?;

    let delivery: Arc<dyn Delivery> = match cfg.delivery.kind {
        DeliveryKind::Log => Arc::new(LogDelivery::new(user_id.clone())),
        DeliveryKind::Nats => Arc::new(
            NatsDelivery::connect(&cfg.delivery.nats_url, user_id.clone())
                .await
                .context("Failed to set up clip delivery")?,
        ),
    };

    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

    let coordinator = SessionCoordinator::new(
        Arc::clone(&clock),
        Box::new(SimulatedBackend::new()),
        delivery,
        cfg.waveform.clone(),
    );
    let inbox = Inbox::new(clock, cfg.playback.policy, cfg.waveform.message_bars);

    let mut screen = Screen {
        coordinator,
        inbox,
        user_id,
    };

    let result = match args.script {
        Some(script) => {
            let commands = Command::parse_script(&script)?;
            screen.run_script(commands).await
        }
        None => screen.run_interactive().await,
    };

    screen.coordinator.shutdown().await;
    screen.inbox.pause_all();

    if let Err(e) = identity.sign_out() {
        warn!("Sign-out failed: {}", e);
    }

    result
}
