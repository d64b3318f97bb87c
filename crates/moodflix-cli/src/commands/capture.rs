use super::App;
use anyhow::{Context, Result, bail};
use moodflix_application::capture::{CaptureDeps, CapturePage, GateDecision};
use moodflix_core::recommendation::RecommendationResult;
use moodflix_infrastructure::{ReplayDetector, VirtualCamera};
use moodflix_interaction::RecommendationApiClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(
    app: &App,
    replay: &Path,
    looping: bool,
    duration_secs: Option<u64>,
) -> Result<()> {
    let mut detector = ReplayDetector::from_file(replay)
        .await
        .with_context(|| format!("Failed to load replay {}", replay.display()))?;
    if looping {
        detector = detector.looping();
    }
    tracing::info!("[Capture] Replaying {} frames", detector.len());

    let settings = app.config.capture.clone();
    let deps = CaptureDeps::new(
        app.session.clone(),
        Arc::new(VirtualCamera::new(settings.display_size())),
        Arc::new(detector),
        Arc::new(RecommendationApiClient::from_endpoints(&app.config.services)),
    )
    .with_settings(settings);

    let page = CapturePage::new(deps);
    let mut updates = page.watch_recommendations();

    if let GateDecision::Redirect { to, notice } = page.mount() {
        bail!("{} (run `moodflix login` first, web route {})", notice, to);
    }
    println!("Capturing. Press Ctrl-C to stop.");

    let deadline = async {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(result) = updates.borrow_and_update().clone() {
                    print_result(&result);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("[Capture] Interrupted");
                break;
            }
            _ = &mut deadline => break,
        }
    }

    page.unmount();
    println!("Capture stopped.");
    Ok(())
}

fn print_result(result: &RecommendationResult) {
    println!("Detected Emotion: {}", result.detected_emotion);
    if result.recommendations.is_empty() {
        println!("  (no recommendations)");
    }
    for title in &result.recommendations {
        println!("  - {}", title);
    }
}
