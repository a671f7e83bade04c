// Voice pipeline contract suite
//
// Needs a wav sample and a feedback message id to exercise the full upload →
// clone → synthesize path; without them the pipeline steps are skipped and
// only the read-only endpoints run.

use tokio_util::sync::CancellationToken;

use super::{login, Runner, SuiteReport, VerifyOptions};
use crate::api::voice::{FeedbackType, VoiceStatus};
use crate::api::{ApiClient, ApiError};
use crate::config::PollSettings;

pub async fn run(api: &ApiClient, opts: &VerifyOptions, poll: &PollSettings) -> SuiteReport {
    let mut run = Runner::new("voice");

    if !login(&mut run, api, opts).await {
        return run.finish();
    }

    let (Some(sample), Some(feedback_id)) = (&opts.sample, &opts.feedback_id) else {
        for name in [
            "upload voice sample",
            "monitor processing to a terminal status",
            "terminal status is synthesized",
            "encourage audio available",
            "criticize audio available",
        ] {
            run.skip(name);
        }
        if let Some(feedback_id) = &opts.feedback_id {
            let _ = run
                .step(
                    "list jobs for feedback",
                    false,
                    api.voice_jobs_for_feedback(feedback_id),
                )
                .await;
        }
        return run.finish();
    };

    // Uploading with a feedback id makes the backend start cloning on its own.
    let upload = run
        .step(
            "upload voice sample",
            true,
            api.upload_voice_sample(sample, Some(feedback_id)),
        )
        .await;
    let Some(upload) = upload else {
        return run.finish();
    };

    let cancel = CancellationToken::new();
    let job = run
        .step("monitor processing to a terminal status", true, async {
            api.monitor_voice_processing(&upload.voice_id, poll, &cancel, |job| {
                tracing::info!(status = ?job.status, "voice job status");
            })
            .await
            .map_err(|e| ApiError::UnexpectedShape(e.to_string()))
        })
        .await;

    if let Some(job) = &job {
        run.check(
            "terminal status is synthesized",
            job.status == VoiceStatus::Synthesized,
            &format!("job ended in {:?}", job.status),
        );
    }

    for (name, feedback_type) in [
        ("encourage audio available", FeedbackType::Encourage),
        ("criticize audio available", FeedbackType::Criticize),
    ] {
        if let Some(audio) = run
            .step(name, false, api.feedback_audio(feedback_id, feedback_type))
            .await
        {
            run.check(
                &format!("{name}: url present"),
                audio.map(|a| !a.url.is_empty()).unwrap_or(false),
                "no audio url returned",
            );
        }
    }

    run.finish()
}
