//! Essay and annotation API routes
//!
//! Every annotation request opens a review session from storage, applies one
//! change and saves the whole set back. Writers hold the essay lock for the
//! whole load, change and save.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::annotations::{Annotation, NewAnnotation};
use crate::db::{AnnotationRepository, Essay, EssayRepository};
use crate::error::{AppError, Result};
use crate::html::{DomPoint, RenderedHtml};
use crate::review::ReviewSession;
use crate::state::AppState;
use crate::text::Selection;

/// Create the essays router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:essay_id", get(get_essay).put(put_essay))
        .route(
            "/:essay_id/annotations",
            get(list_annotations).post(create_annotation),
        )
        .route(
            "/:essay_id/annotations/:id",
            get(get_annotation)
                .put(update_annotation)
                .delete(delete_annotation),
        )
        .route("/:essay_id/render", get(render_essay))
        .route("/:essay_id/selection", post(resolve_selection))
}

#[derive(Debug, Deserialize)]
pub struct SubmitEssay {
    pub submission_text: String,
}

/// Clicked annotation with the text it covers
#[derive(Debug, Serialize)]
pub struct AnnotationDetail {
    pub annotation: Annotation,
    pub excerpt: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub segments: serde_json::Value,
    pub html: String,
}

/// Open a review session over the stored essay and annotations
async fn open_session(state: &AppState, essay_id: &str) -> Result<ReviewSession> {
    let essay = EssayRepository::new(state.db())
        .get(essay_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Essay not found: {}", essay_id)))?;

    let repo = AnnotationRepository::new(state.db());
    let session = ReviewSession::load(
        &repo,
        essay_id,
        essay.submission_text,
        state.config().annotations.overlap_policy,
    )
    .await?;

    Ok(session)
}

async fn save_session(state: &AppState, session: &ReviewSession) -> Result<()> {
    let repo = AnnotationRepository::new(state.db());
    session.save(&repo).await?;
    Ok(())
}

/// Get an essay
async fn get_essay(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
) -> Result<Json<Essay>> {
    let essay = EssayRepository::new(state.db())
        .get(&essay_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Essay not found: {}", essay_id)))?;
    Ok(Json(essay))
}

/// Create an essay or replace its text
async fn put_essay(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
    Json(data): Json<SubmitEssay>,
) -> Result<Json<Essay>> {
    let _guard = state.lock_essay(&essay_id).await;
    let essay = EssayRepository::new(state.db())
        .upsert(&essay_id, &data.submission_text)
        .await?;
    tracing::info!(essay_id, "Essay stored");
    Ok(Json(essay))
}

/// List annotations, ascending by start offset
async fn list_annotations(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
) -> Result<Json<Vec<Annotation>>> {
    let session = open_session(&state, &essay_id).await?;
    Ok(Json(session.annotations().iter().cloned().collect()))
}

/// Add an annotation
async fn create_annotation(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
    Json(draft): Json<NewAnnotation>,
) -> Result<(StatusCode, Json<Annotation>)> {
    let _guard = state.lock_essay(&essay_id).await;
    let mut session = open_session(&state, &essay_id).await?;
    let annotation = session.add(draft)?;
    save_session(&state, &session).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// Get an annotation together with its excerpt
async fn get_annotation(
    State(state): State<AppState>,
    Path((essay_id, id)): Path<(String, String)>,
) -> Result<Json<AnnotationDetail>> {
    let session = open_session(&state, &essay_id).await?;

    let mut clicked = None;
    session.click(&id, &mut |a: &Annotation| clicked = Some(a.clone()));
    let annotation =
        clicked.ok_or_else(|| AppError::NotFound(format!("Annotation not found: {}", id)))?;
    let excerpt = session.excerpt(&id).unwrap_or_default().to_string();

    Ok(Json(AnnotationDetail {
        annotation,
        excerpt,
    }))
}

/// Replace an annotation, or add it under this id
async fn update_annotation(
    State(state): State<AppState>,
    Path((essay_id, id)): Path<(String, String)>,
    Json(draft): Json<NewAnnotation>,
) -> Result<Json<Annotation>> {
    let _guard = state.lock_essay(&essay_id).await;
    let mut session = open_session(&state, &essay_id).await?;
    let annotation = session.update(&id, draft)?;
    save_session(&state, &session).await?;
    Ok(Json(annotation))
}

/// Delete an annotation
async fn delete_annotation(
    State(state): State<AppState>,
    Path((essay_id, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let _guard = state.lock_essay(&essay_id).await;
    let mut session = open_session(&state, &essay_id).await?;
    if !session.remove(&id) {
        return Err(AppError::NotFound(format!("Annotation not found: {}", id)));
    }
    save_session(&state, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Segments and highlighted HTML for the current annotations
async fn render_essay(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
) -> Result<Json<RenderResponse>> {
    let session = open_session(&state, &essay_id).await?;

    let segments = serde_json::to_value(session.segments())
        .map_err(|e| AppError::Internal(format!("Failed to serialize segments: {}", e)))?;
    let html = session.render_html(state.highlight());

    Ok(Json(RenderResponse { segments, html }))
}

/// Resolve a selection made in the rendered HTML.
///
/// Answers 204 when the selection is collapsed, empty or outside the text.
async fn resolve_selection(
    State(state): State<AppState>,
    Path(essay_id): Path<String>,
    Json(selection): Json<Selection<DomPoint>>,
) -> Result<Response> {
    let session = open_session(&state, &essay_id).await?;
    let view = RenderedHtml::parse(&session.render_html(state.highlight()), state.highlight())?;

    match session.resolve_selection(&view, Some(&selection)) {
        Some(resolved) => Ok(Json(resolved).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
