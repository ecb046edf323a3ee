use crate::error::AppError;
use crate::models::selection_types::FileCandidate;
use crate::services::analyze_client::{AnalyzeClient, HttpAnalyzeClient};
use crate::services::preview_service;
use crate::widget::{PatchBuffer, Target, UploadWidget, ViewPatch};
use std::path::Path;
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

/// Event the webview listens on to apply DOM updates.
pub const PATCH_EVENT: &str = "widget-patch";

const PICKER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

pub struct WidgetState(Mutex<UploadWidget<PatchBuffer>>);

impl WidgetState {
    pub fn new() -> Self {
        Self(Mutex::new(UploadWidget::new(PatchBuffer::new())))
    }
}

/// Runs `f` against the widget, then forwards whatever it rendered.
///
/// The lock is released before emitting, and never held across an await.
fn with_widget<R>(
    app: &AppHandle,
    state: &WidgetState,
    f: impl FnOnce(&mut UploadWidget<PatchBuffer>) -> R,
) -> Result<R, AppError> {
    let (out, patches) = {
        let mut widget = state
            .0
            .lock()
            .map_err(|_| AppError::from("Widget state lock poisoned"))?;
        let out = f(&mut widget);
        (out, widget.view_mut().drain())
    };
    emit_patches(app, &patches);
    Ok(out)
}

fn emit_patches(app: &AppHandle, patches: &[ViewPatch]) {
    if patches.is_empty() {
        return;
    }
    if let Err(e) = app.emit(PATCH_EVENT, patches) {
        tracing::error!(error = %e, "failed to emit widget patches");
    }
}

#[tauri::command]
pub fn drag_over(app: AppHandle, widget: State<'_, WidgetState>) -> Result<(), AppError> {
    with_widget(&app, &widget, |w| w.on_drag_over())
}

#[tauri::command]
pub fn drag_leave(app: AppHandle, widget: State<'_, WidgetState>) -> Result<(), AppError> {
    with_widget(&app, &widget, |w| w.on_drag_leave())
}

/// Files dropped onto the native window, delivered as paths.
///
/// Always reaches the widget so the drag highlight clears and an unreadable
/// path is rejected with the usual alert.
#[tauri::command]
pub async fn drop_paths(
    app: AppHandle,
    widget: State<'_, WidgetState>,
    paths: Vec<String>,
) -> Result<bool, AppError> {
    let files = match paths.first() {
        Some(path) => vec![preview_service::intake_path(Path::new(path)).await],
        None => Vec::new(),
    };
    with_widget(&app, &widget, |w| w.on_drop(files))
}

#[tauri::command]
pub fn drop_zone_click(
    app: AppHandle,
    widget: State<'_, WidgetState>,
    target: Target,
) -> Result<(), AppError> {
    with_widget(&app, &widget, |w| w.on_drop_zone_click(target))
}

#[tauri::command]
pub fn input_change(
    app: AppHandle,
    widget: State<'_, WidgetState>,
    files: Vec<FileCandidate>,
) -> Result<bool, AppError> {
    with_widget(&app, &widget, |w| w.on_file_input_change(files))
}

/// Native picker, for hosts without a usable `<input type="file">`.
#[tauri::command]
pub async fn pick_file(app: AppHandle, widget: State<'_, WidgetState>) -> Result<bool, AppError> {
    let (tx, rx) = oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Images", PICKER_EXTENSIONS)
        .pick_file(move |picked| {
            let _ = tx.send(picked);
        });

    let picked = rx
        .await
        .map_err(|_| AppError::from("File dialog closed without a result"))?;
    let Some(picked) = picked else {
        return Ok(false);
    };
    let path = picked.into_path().map_err(|e| AppError {
        message: format!("Unsupported file location: {}", e),
    })?;
    let file = preview_service::candidate_from_path(&path).await?;
    with_widget(&app, &widget, |w| w.on_file_input_change(vec![file]))
}

#[tauri::command]
pub fn remove_file(app: AppHandle, widget: State<'_, WidgetState>) -> Result<(), AppError> {
    with_widget(&app, &widget, |w| {
        w.on_remove_click();
    })
}

#[tauri::command]
pub async fn analyze(
    app: AppHandle,
    widget: State<'_, WidgetState>,
    client: State<'_, HttpAnalyzeClient>,
) -> Result<bool, AppError> {
    let Some(file) = with_widget(&app, &widget, |w| w.begin_analyze())? else {
        return Ok(false);
    };

    let outcome = client.analyze(&file).await;
    with_widget(&app, &widget, |w| w.finish_analyze(outcome))?;
    Ok(true)
}
