//! The `prepdesk scan` command.

use std::path::PathBuf;

use anyhow::Result;

use prepdesk_vision::probe::SidecarProbe;

pub fn execute(video: PathBuf) -> Result<()> {
    let outcome = prepdesk_vision::scan(&video, &SidecarProbe);

    println!("Video: {}", video.display());
    println!("Anomaly score: {:.0} / 100", outcome.anomaly_score);
    println!(
        "Flags: multi_face={} liveness_issues={} low_quality={} deepfake_risk={} lip_sync_issues={}",
        outcome.flags.multi_face,
        outcome.flags.liveness_issues,
        outcome.flags.low_quality,
        outcome.flags.deepfake_risk,
        outcome.flags.lip_sync_issues,
    );
    println!("{}", outcome.summary);

    Ok(())
}
