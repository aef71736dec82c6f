use axum::{
    Form, Router,
    extract::{FromRequestParts, Path, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use defaultwiki_core::{
    Deleted, EditView, FRONT_PAGE, Page, PageView, SettingsError, StoreError, TemplateError,
    Title,
};
use serde::Deserialize;
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets);

    Router::new()
        .route("/", get(front_page))
        .route("/view/{title}", get(view_page))
        .route("/edit/{title}", get(edit_page))
        .route("/save/{title}", post(save_page))
        .route("/delete/{title}", get(delete_page).post(delete_page))
        .route("/default/{title}", get(admin_page).post(update_admin))
        .nest_service("/assets", assets)
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    log::info!("URL Path Requested: {}", request.uri().path());
    next.run(request).await
}

/// The `{title}` path segment, rejected with a 404 unless it is path-safe.
pub struct ValidTitle(pub Title);

impl<S: Send + Sync> FromRequestParts<S> for ValidTitle {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found_response())?;

        Title::parse(&raw).map(ValidTitle).map_err(|e| {
            log::debug!("{}", e);
            not_found_response()
        })
    }
}

/// Failures that end a request with a 500.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Template(TemplateError),
    Settings(SettingsError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Template(err)
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::Settings(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Template(e) => write!(f, "{}", e),
            AppError::Settings(e) => write!(f, "{}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

async fn not_found() -> Response {
    not_found_response()
}

async fn front_page() -> Response {
    found(&format!("/view/{}", FRONT_PAGE))
}

async fn view_page(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Result<Response, AppError> {
    let page = match state.store.load(&title) {
        Ok(page) => page,
        Err(StoreError::NotFound(_)) => return Ok(found(&format!("/edit/{}", title))),
        Err(e) => return Err(e.into()),
    };

    let html = state.renderer.render_page(&page);
    let view = PageView::assemble(&page, html, None, state.settings.current());

    Ok(Html(state.templates.render("view", &view)?).into_response())
}

async fn edit_page(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Result<Response, AppError> {
    let page = match state.store.load(&title) {
        Ok(page) => page,
        Err(StoreError::NotFound(_)) => Page::empty(title),
        Err(e) => return Err(e.into()),
    };

    let view = EditView::new(&page, state.settings.current());
    Ok(Html(state.templates.render("edit", &view)?).into_response())
}

#[derive(Deserialize)]
struct SaveForm {
    #[serde(default)]
    body: String,
}

async fn save_page(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
    Form(form): Form<SaveForm>,
) -> Result<Response, AppError> {
    let location = format!("/view/{}", title);
    state.store.save(&Page::new(title, form.body))?;

    Ok(found(&location))
}

/// Always lands back on `/`, whether the page was removed, protected or
/// already gone.
async fn delete_page(State(state): State<AppState>, ValidTitle(title): ValidTitle) -> Response {
    match state.store.delete(&title) {
        Ok(Deleted::Removed) | Ok(Deleted::Protected) => {}
        Err(StoreError::NotFound(_)) => log::debug!("Nothing to delete for {}", title),
        Err(e) => log::error!("Failed to delete {}: {}", title, e),
    }

    found("/")
}

async fn admin_page(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Result<Response, AppError> {
    let pages = match title.as_str() {
        "admin" => None,
        "pages" => Some(state.store.list_titles()?),
        _ => return Ok(not_found_response()),
    };

    let view = PageView::admin(state.settings.current(), pages);
    Ok(Html(state.templates.render(title.as_str(), &view)?).into_response())
}

#[derive(Deserialize)]
struct AdminForm {
    #[serde(rename = "Name", default)]
    name: String,
}

async fn update_admin(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
    Form(form): Form<AdminForm>,
) -> Result<Response, AppError> {
    match title.as_str() {
        "admin" => {
            let mut settings = state.settings.current();
            settings.name = form.name;
            state.settings.update(&settings)?;
            log::info!("Updated settings");
        }
        "pages" => {}
        _ => return Ok(not_found_response()),
    }

    Ok(found(&format!("/default/{}", title)))
}
