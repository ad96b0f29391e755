//! Reports whether Chrome's text autosizer is running for a page.

use anyhow::{Result, anyhow};
use autosizing::{AutosizingError, AutosizingReport, WindowWidths, report};
use autosizing_chrome::args::{ProbeArgs, USAGE};
use autosizing_chrome::{
    ProbeConfig, child_frames, launch_browser, open_target, probe_frame, probe_page,
};
use autosizing_html::{HtmlDocument, TopWindow};
use env_logger::{Builder, Env};
use log::{error, info, warn};
use std::env;
use std::process::exit;
use tokio::runtime::Runtime;

/// Exit status when the top window could not be read.
const EXIT_ACCESS_DENIED: i32 = 2;

async fn probe_live(target: &str, frame: Option<usize>) -> Result<AutosizingReport> {
    let config = ProbeConfig::from_env();
    let browser = launch_browser(&config).await?;
    let outcome = async {
        let page = open_target(&browser, target, &config).await?;
        let snapshot = match frame {
            None => probe_page(&page).await?,
            Some(index) => {
                let frame_id = child_frames(&page)
                    .await?
                    .into_iter()
                    .nth(index)
                    .ok_or_else(|| anyhow!("Page has no child frame at index {index}"))?;
                probe_frame(&page, frame_id).await?
            }
        };
        Ok::<_, anyhow::Error>(report(&snapshot)?)
    }
    .await;
    if let Err(err) = browser.close().await {
        warn!("Failed to close browser: {err:#}");
    }
    outcome
}

fn run(args: ProbeArgs) -> Result<AutosizingReport> {
    match args {
        ProbeArgs::Static {
            path,
            inner_width,
            outer_width,
        } => {
            let top_window = TopWindow::SameOrigin(WindowWidths::new(inner_width, outer_width));
            let document = HtmlDocument::from_path(&path, top_window)?;
            Ok(report(&document)?)
        }
        ProbeArgs::Live { target, frame } => {
            let runtime = Runtime::new()?;
            runtime.block_on(probe_live(&target, frame))
        }
    }
}

#[allow(clippy::print_stdout, reason = "The report is the program's output")]
#[allow(clippy::print_stderr, reason = "Usage errors go to the terminal")]
fn main() {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"))
        .is_test(false)
        .try_init();

    let args = match ProbeArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}\n{USAGE}");
            exit(1);
        }
    };

    match run(args).and_then(|outcome| Ok((outcome, serde_json::to_string_pretty(&outcome)?))) {
        Ok((outcome, json)) => {
            info!("autosizing active: {}", outcome.active);
            println!("{json}");
        }
        Err(err) => {
            error!("error: {err:#}");
            if err.downcast_ref::<AutosizingError>().is_some() {
                exit(EXIT_ACCESS_DENIED);
            }
            exit(1);
        }
    }
}
