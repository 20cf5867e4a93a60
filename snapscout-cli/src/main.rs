//! SnapScout terminal client.
//!
//! Point the camera at a product (or upload a photo), get a price verdict, and
//! chat with the shopping assistant about it.
//!
//! ```bash
//! snapscout --camera-dir /tmp/frames
//! SNAPSCOUT_API_URL=http://192.168.1.20:5000 snapscout --verbose
//! ```

mod commands;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use render::Call;
use snapscout_capture::{CaptureController, FileCamera, Preview};
use snapscout_core::chat::suggested_prompt;
use snapscout_core::types::{ActiveTab, ImagePayload};
use snapscout_engine::{DropReason, Outcome, ViewStore};
use snapscout_runtime::{HttpBackend, Settings};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Shopping assistant in the terminal.
#[derive(Parser)]
#[command(name = "snapscout", version, about)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "SNAPSCOUT_API_URL")]
    api_url: Option<String>,

    /// Directory holding the latest camera frames (front.jpg / rear.jpg)
    #[arg(long)]
    camera_dir: Option<PathBuf>,

    /// Start with an empty chat instead of the assistant greeting
    #[arg(long)]
    no_greeting: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the panels on stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = match cli.api_url.as_deref() {
        Some(url) => Settings::with_api_url(url)?,
        None => Settings::from_env()?,
    };
    let backend = HttpBackend::new(&settings.client).context("create HTTP backend")?;
    log::info!("backend: {}", backend.base_url());
    let backend = Arc::new(backend);
    let store = if cli.no_greeting {
        ViewStore::new(backend)
    } else {
        ViewStore::with_greeting(backend)
    };

    let capture = match &cli.camera_dir {
        Some(dir) => {
            let camera = FileCamera::new(dir);
            log::info!("camera frames: {}", camera.dir().display());
            CaptureController::new(Arc::new(camera))
        }
        None => CaptureController::without_camera(),
    };

    Shell { store, capture }.run().await
}

struct Shell {
    store: ViewStore,
    capture: CaptureController,
}

impl Shell {
    async fn run(mut self) -> Result<()> {
        println!("SnapScout; type `help` for commands.");
        self.show();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{}", render::prompt(&self.store.snapshot()));
            std::io::stdout().flush().context("flush stdout")?;

            let Some(line) = lines.next_line().await.context("read stdin")? else {
                break;
            };
            let tab = self.store.snapshot().active_tab;
            match commands::parse(&line, tab) {
                Ok(Command::Quit) => break,
                Ok(cmd) => self.handle(cmd),
                Err(e) => println!("{e}"),
            }
        }

        self.capture.stop();
        Ok(())
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Capture => {
                if self.reject_if_busy("capture") {
                    return;
                }
                let previous = self.capture.still().cloned();
                match self.capture.capture() {
                    Ok(image) => self.detect(image, previous),
                    Err(e) => println!("capture failed: {e}"),
                }
            }
            Command::Upload(path) => {
                if self.reject_if_busy("upload") {
                    return;
                }
                let previous = self.capture.still().cloned();
                match self.capture.select_file(&path) {
                    Ok(image) => self.detect(image, previous),
                    Err(e) => println!("upload failed: {e}"),
                }
            }
            Command::Retake => {
                self.capture.retake();
                self.print_preview();
            }
            Command::Flip => {
                let facing = self.capture.switch_facing();
                println!("switched to {}", render::facing_name(facing));
            }
            Command::Tab(tab) => {
                self.store.set_tab(tab);
                self.show();
            }
            Command::Ask(question) => {
                let store = self.store.clone();
                self.spawn(Call::Ask, async move { store.ask(&question).await });
            }
            Command::Suggest(None) => print!("{}", render::suggestions()),
            Command::Suggest(Some(i)) => {
                if let Some(prompt) = suggested_prompt(i) {
                    self.say(prompt.to_string());
                }
            }
            Command::Health => {
                let store = self.store.clone();
                self.spawn(Call::Health, async move { store.check_health().await });
            }
            Command::Show => self.show(),
            Command::Help => println!("{}", render::HELP),
            Command::Say(text) => self.say(text),
            Command::Quit | Command::Empty => {}
        }
    }

    // The busy stage is reserved here, before anything runs in the background, so a
    // second capture typed right after this one is refused up front.
    fn detect(&mut self, image: ImagePayload, previous: Option<ImagePayload>) {
        let shown = render::preview(&Preview::Still(image.clone()));
        match self.store.try_submit_image(image) {
            Some(call) => {
                println!("{shown}");
                println!("analyzing...");
                self.spawn(Call::Detect, call);
            }
            None => {
                self.capture.restore_still(previous);
                println!(
                    "{}",
                    render::report(
                        Call::Detect,
                        &Outcome::Dropped(DropReason::Busy),
                        &self.store.snapshot()
                    )
                );
            }
        }
    }

    fn say(&self, text: String) {
        let store = self.store.clone();
        self.spawn(Call::Chat, async move { store.send_message(&text).await });
    }

    // Runs one transition in the background so the prompt stays usable while it is in
    // flight. The store itself drops intents that arrive while busy.
    fn spawn<F>(&self, call: Call, fut: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::spawn(async move {
            let outcome = fut.await;
            let text = render::report(call, &outcome, &store.snapshot());
            if !text.is_empty() {
                println!("\n{text}");
                print!("{}", render::prompt(&store.snapshot()));
                let _ = std::io::stdout().flush();
            }
        });
    }

    fn reject_if_busy(&self, what: &str) -> bool {
        let state = self.store.snapshot();
        if state.busy() {
            println!("{what}: still {}; try again when it finishes", state.stage.label());
            return true;
        }
        false
    }

    fn print_preview(&mut self) {
        match self.capture.preview() {
            Ok(p) => println!("{}", render::preview(&p)),
            Err(e) => println!("camera unavailable: {e}; use `upload <path>`"),
        }
    }

    fn show(&mut self) {
        let state = self.store.snapshot();
        match state.active_tab {
            ActiveTab::Capture => {
                let line = match self.capture.preview() {
                    Ok(p) => render::preview(&p),
                    Err(e) => format!("camera unavailable: {e}; use `upload <path>`"),
                };
                println!("{}", render::capture_panel(&state, &line));
            }
            ActiveTab::Chat => println!("{}", render::chat_panel(&state)),
        }
        if let Some(err) = &state.last_error {
            println!("last error: {err}");
        }
        println!("({} tab)", render::tab_title(state.active_tab));
    }
}
