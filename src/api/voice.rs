// Voice feedback endpoints
// Sample upload, cosyvoice clone/synthesize, job status, per-type feedback
// audio, and the one-shot pipeline backend.

use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio_util::sync::CancellationToken;

use super::{ApiClient, ApiError, ApiResult};
use crate::config::PollSettings;
use crate::poll::{poll_until, PollError};
use crate::retry::with_fixed_retry;

/// Lifecycle of a cosyvoice job. `Error` is reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStatus {
    Uncloned,
    Cloning,
    Cloned,
    Synthesizing,
    Synthesized,
    Error,
}

impl VoiceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, VoiceStatus::Synthesized | VoiceStatus::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Encourage,
    Criticize,
}

impl FeedbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Encourage => "encourage",
            FeedbackType::Criticize => "criticize",
        }
    }
}

/// Server-side record of a voice cloning/synthesis pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceJob {
    #[serde(alias = "_id")]
    pub id: String,
    pub voice_id: String,
    #[serde(default)]
    pub feedback_id: Option<String>,
    pub status: VoiceStatus,
    #[serde(default, alias = "synthesized_encourage_url")]
    pub encourage_url: Option<String>,
    #[serde(default, alias = "synthesized_criticize_url")]
    pub criticize_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoiceJobWrapper {
    cosy_voice: VoiceJob,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoiceJobListWrapper {
    cosy_voices: Vec<VoiceJob>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceUpload {
    #[serde(alias = "voiceId")]
    pub voice_id: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Synthesized audio for one feedback type.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackAudio {
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub url: String,
    #[serde(default)]
    pub status: Option<VoiceStatus>,
}

/// Request for the pipeline backend's one-shot flow (text generation plus
/// clone-or-reuse plus synthesis).
#[derive(Debug, Clone, Serialize)]
pub struct ProcessFullRequest {
    pub audio_url: String,
    pub text_prompt: String,
    pub user_id: String,
    pub feedback_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessFullResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoiceIdLookup {
    #[serde(default)]
    pub voice_id: Option<String>,
}

impl ApiClient {
    /// Upload a voice sample. Passing a feedback id asks the backend to kick
    /// off cloning as soon as the upload lands.
    pub async fn upload_voice_sample(
        &self,
        path: &Path,
        feedback_id: Option<&str>,
    ) -> ApiResult<VoiceUpload> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample.wav".to_string());
        tracing::info!(%file_name, ?feedback_id, "Uploading voice sample");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Session(format!("failed to read {}: {e}", path.display())))?;

        let mut form = multipart::Form::new().part(
            "audioFile",
            multipart::Part::bytes(bytes).file_name(file_name),
        );
        if let Some(feedback_id) = feedback_id {
            form = form.text("feedback_id", feedback_id.to_string());
        }

        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/voice/upload"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    /// Kick off cloning for an uploaded sample.
    pub async fn clone_voice(&self, voice_id: &str, feedback_id: &str) -> ApiResult<VoiceJob> {
        tracing::info!(%voice_id, %feedback_id, "Requesting voice clone");
        let token = self.bearer()?;
        let wrapper: VoiceJobWrapper = self
            .send(
                self.http()
                    .post(self.url("/cosyvoice/clone"))
                    .bearer_auth(token)
                    .json(&serde_json::json!({
                        "voiceId": voice_id,
                        "feedbackId": feedback_id,
                    })),
            )
            .await?;
        Ok(wrapper.cosy_voice)
    }

    /// Kick off synthesis for a cloned voice.
    pub async fn synthesize_voice(&self, voice_id: &str, feedback_id: &str) -> ApiResult<VoiceJob> {
        tracing::info!(%voice_id, %feedback_id, "Requesting voice synthesis");
        let token = self.bearer()?;
        let wrapper: VoiceJobWrapper = self
            .send(
                self.http()
                    .post(self.url("/cosyvoice/synthesize"))
                    .bearer_auth(token)
                    .json(&serde_json::json!({
                        "voiceId": voice_id,
                        "feedbackId": feedback_id,
                    })),
            )
            .await?;
        Ok(wrapper.cosy_voice)
    }

    /// Current job state for a voice id.
    pub async fn voice_job(&self, voice_id: &str) -> ApiResult<VoiceJob> {
        let token = self.bearer()?;
        let wrapper: VoiceJobWrapper = self
            .send(
                self.http()
                    .get(self.url(&format!("/cosyvoice/voice/{voice_id}")))
                    .bearer_auth(token),
            )
            .await?;
        Ok(wrapper.cosy_voice)
    }

    /// All jobs recorded against a feedback message.
    pub async fn voice_jobs_for_feedback(&self, feedback_id: &str) -> ApiResult<Vec<VoiceJob>> {
        let token = self.bearer()?;
        let wrapper: VoiceJobListWrapper = self
            .send(
                self.http()
                    .get(self.url(&format!("/cosyvoice/feedback/{feedback_id}")))
                    .bearer_auth(token),
            )
            .await?;
        Ok(wrapper.cosy_voices)
    }

    /// Synthesized audio for a feedback message and type. A 404 means the
    /// audio simply is not ready and maps to `Ok(None)`; other failures are
    /// retried on a fixed 1s delay before giving up.
    pub async fn feedback_audio(
        &self,
        feedback_id: &str,
        feedback_type: FeedbackType,
    ) -> ApiResult<Option<FeedbackAudio>> {
        with_fixed_retry(|| async {
            let token = self.bearer()?;
            let result: ApiResult<FeedbackAudio> = self
                .send(
                    self.http()
                        .get(self.url(&format!("/cosyvoice/feedback/{feedback_id}/audio")))
                        .query(&[("type", feedback_type.as_str())])
                        .bearer_auth(token),
                )
                .await;
            match result {
                Ok(audio) => Ok(Some(audio)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Synthesized audio looked up by user rather than feedback message.
    pub async fn user_audio(
        &self,
        user_id: &str,
        feedback_type: FeedbackType,
    ) -> ApiResult<Option<FeedbackAudio>> {
        let token = self.bearer()?;
        let result: ApiResult<FeedbackAudio> = self
            .send(
                self.http()
                    .get(self.url(&format!("/cosyvoice/user/{user_id}/audio")))
                    .query(&[("type", feedback_type.as_str())])
                    .bearer_auth(token),
            )
            .await;
        match result {
            Ok(audio) => Ok(Some(audio)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// One-shot pipeline run on the pipeline backend.
    pub async fn process_full(
        &self,
        request: &ProcessFullRequest,
    ) -> ApiResult<ProcessFullResponse> {
        tracing::info!(user_id = %request.user_id, "Starting full voice pipeline");
        let token = self.bearer()?;
        self.send_flat(
            self.http()
                .post(self.pipeline("/process-full"))
                .bearer_auth(token)
                .json(request),
        )
        .await
    }

    /// The user's existing voice id on the pipeline backend, if any.
    pub async fn voice_id_for_user(&self, user_id: &str) -> ApiResult<Option<String>> {
        let token = self.bearer()?;
        let lookup: VoiceIdLookup = self
            .send_flat(
                self.http()
                    .get(self.pipeline("/get-voice-id"))
                    .query(&[("user_id", user_id)])
                    .bearer_auth(token),
            )
            .await?;
        Ok(lookup.voice_id)
    }

    /// Poll a voice job until it reaches a terminal status or the deadline
    /// passes. `on_status` sees every polled snapshot; the token cancels the
    /// wait between polls.
    pub async fn monitor_voice_processing(
        &self,
        voice_id: &str,
        settings: &PollSettings,
        cancel: &CancellationToken,
        mut on_status: impl FnMut(&VoiceJob),
    ) -> Result<VoiceJob, PollError<ApiError>> {
        tracing::info!(%voice_id, "Monitoring voice processing");
        poll_until(
            settings.interval(),
            settings.timeout(),
            cancel,
            || self.voice_job(voice_id),
            |job| {
                on_status(job);
                job.status.is_terminal()
            },
        )
        .await
    }
}
