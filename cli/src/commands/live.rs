//! Live settings of a video.

use anyhow::{Context as _, Result};
use tracing::instrument;
use tube_admin_business::models::{LiveLatencyMode, LiveVideo};

use crate::context::AdminContext;
use crate::output::Output;

fn latency_label(mode: LiveLatencyMode) -> &'static str {
    match mode {
        LiveLatencyMode::Default => "Default",
        LiveLatencyMode::HighLatency => "High latency",
        LiveLatencyMode::SmallLatency => "Small latency",
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn origin_label(live: &LiveVideo) -> &'static str {
    if live.is_local() { "local" } else { "remote" }
}

#[instrument(skip_all, name = "live", fields(video_id = %video_id))]
pub async fn run_live(ctx: &AdminContext, video_id: &str) -> Result<()> {
    let out = Output::new();

    let live = ctx
        .client
        .get_live(video_id)
        .await
        .with_context(|| format!("Failed to load live settings of {video_id}"))?;

    out.header(format!("Live {video_id}"));
    out.divider(40);
    out.labeled_indent("Origin", origin_label(&live), 2);
    out.labeled_indent("RTMP URL", live.rtmp_url.as_deref().unwrap_or("-"), 2);
    out.labeled_indent("RTMPS URL", live.rtmps_url.as_deref().unwrap_or("-"), 2);
    out.labeled_indent(
        "Stream key",
        if live.is_local() { "(set)" } else { "-" },
        2,
    );
    out.labeled_indent("Permanent", yes_no(live.permanent_live), 2);
    out.labeled_indent("Save replay", yes_no(live.save_replay), 2);
    out.labeled_indent("Latency", latency_label(live.latency_mode), 2);
    Ok(())
}
