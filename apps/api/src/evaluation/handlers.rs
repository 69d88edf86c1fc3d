//! Axum route handler for the Evaluation API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::evaluation::pipeline::{evaluate_resume, EvaluationResult};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// Fields collected from the multipart body. Presence is all that is checked.
#[derive(Debug, Default)]
struct EvaluateForm {
    file: Option<Bytes>,
    job_description: Option<String>,
}

/// POST /evaluate
///
/// Multipart form with a `file` upload (the resume) and a `job_description` text field.
/// Returns `{"Final_ATS_Score_Percentage": "<score>%"}`.
#[tracing::instrument(skip(state, multipart))]
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    // A body that is not multipart at all carries neither field.
    let multipart = multipart.map_err(|_| AppError::MissingFields)?;
    let form = read_form(multipart).await?;

    let (Some(file), Some(job_description)) = (form.file, form.job_description) else {
        return Err(AppError::MissingFields);
    };

    debug!(
        bytes = file.len(),
        jd_chars = job_description.len(),
        "Evaluating resume"
    );

    let result = evaluate_resume(&state, &file, &job_description).await?;
    Ok(Json(result))
}

/// Reads every part of the form. `file` must be a file upload; `job_description` a plain field.
/// When a field repeats, the first occurrence wins.
async fn read_form(mut multipart: Multipart) -> Result<EvaluateForm, AppError> {
    let mut form = EvaluateForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        let is_upload = field.file_name().is_some();

        match (name.as_deref(), is_upload) {
            (Some(FILE_FIELD), true) if form.file.is_none() => {
                form.file = Some(field.bytes().await?)
            }
            (Some(JOB_DESCRIPTION_FIELD), false) if form.job_description.is_none() => {
                form.job_description = Some(field.text().await?)
            }
            _ => {}
        }
    }

    Ok(form)
}
