use std::io::{self, BufRead};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use dashboard_core::{update, AppState, Msg};
use dashboard_logging::{dash_debug, dash_info};
use log::LevelFilter;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command};
use super::ui::render;

const LOG_FILE: &str = "./dashboard.log";

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading dashboard configuration")?;
    dashboard_logging::initialize(
        config.log_destination.into(),
        LevelFilter::Info,
        Path::new(LOG_FILE),
    );
    dash_info!("Starting dashboard against {}", config.api_base_url);

    let settings = config.engine_settings()?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(settings, event_tx.clone()).context("starting engine")?;
    spawn_input_reader(event_tx).context("starting input reader")?;

    let mut app = App {
        state: AppState::with_page_limit(config.page_limit),
        runner,
    };
    println!("{}", commands::HELP);
    app.dispatch(Msg::ViewOpened);

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Quit => break,
        }
    }

    app.dispatch(Msg::ViewClosed);
    dash_info!("Dashboard closed");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if !effects.is_empty() {
            dash_debug!("Dispatching {} effect(s)", effects.len());
        }
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            print!("{}", render::render(&state.view()));
        }
        self.state = state;
    }
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("dashboard-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match commands::parse(&line) {
                    Command::Dispatch(msgs) => {
                        for msg in msgs {
                            if tx.send(AppEvent::Msg(msg)).is_err() {
                                return;
                            }
                        }
                    }
                    Command::Help => println!("{}", commands::HELP),
                    Command::Quit => break,
                    Command::Invalid(reason) => println!("{reason} (type 'help')"),
                }
            }
            let _ = tx.send(AppEvent::Quit);
        })?;
    Ok(())
}
