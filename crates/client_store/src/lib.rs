use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use shared::domain::FormId;
use shared::protocol::{
    ApiErrorBody, FormListResponse, FormRecord, TemplateListResponse, TemplateRecord, UserProfile,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod endpoints;
pub mod error;

pub use error::StoreError;

/// Page size used when a store is built without an explicit limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
    pub limit: u32,
    pub total_results: u64,
}

impl PageCursor {
    fn with_limit(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total_results: 0,
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone)]
pub enum StoreEvent {
    ProfileUpdated,
    FormsUpdated { count: usize },
    SelectionChanged(FormId),
    TemplatesUpdated { count: usize },
    FetchFailed(StoreError),
}

/// One entry of the form picker: the label shown to the user paired with the
/// record to pass to [`FormStore::select_form`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormMenuItem {
    pub label: String,
    pub form: FormRecord,
}

#[derive(Debug, Clone)]
pub struct FormStoreSnapshot {
    pub profile: Option<UserProfile>,
    pub forms: Vec<FormRecord>,
    pub selected_form: Option<FormRecord>,
    pub page: PageCursor,
    pub loading: bool,
    pub last_error: Option<StoreError>,
}

impl FormStoreSnapshot {
    pub fn menu_items(&self) -> Vec<FormMenuItem> {
        menu_items(&self.forms)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateStoreSnapshot {
    pub templates: Vec<TemplateRecord>,
    pub loading: bool,
    pub last_error: Option<StoreError>,
}

impl TemplateStoreSnapshot {
    pub fn active_templates(&self) -> Vec<&TemplateRecord> {
        self.templates
            .iter()
            .filter(|template| template.is_active())
            .collect()
    }
}

#[derive(Serialize)]
struct FormListQuery {
    offset: u32,
    limit: u32,
}

struct FormStoreState {
    profile: Option<UserProfile>,
    forms: Vec<FormRecord>,
    selected_form: Option<FormRecord>,
    page: PageCursor,
    loading: bool,
    last_error: Option<StoreError>,
}

pub struct FormStore {
    http: Client,
    base_url: String,
    inner: Mutex<FormStoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl FormStore {
    pub fn new(base_url: impl Into<String>) -> Arc<Self> {
        Self::with_page_limit(base_url, DEFAULT_PAGE_LIMIT)
    }

    pub fn with_page_limit(base_url: impl Into<String>, page_limit: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url.into()),
            inner: Mutex::new(FormStoreState {
                profile: None,
                forms: Vec::new(),
                selected_form: None,
                page: PageCursor::with_limit(page_limit),
                loading: false,
                last_error: None,
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> FormStoreSnapshot {
        let state = self.inner.lock().await;
        FormStoreSnapshot {
            profile: state.profile.clone(),
            forms: state.forms.clone(),
            selected_form: state.selected_form.clone(),
            page: state.page,
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    pub async fn menu_items(&self) -> Vec<FormMenuItem> {
        let state = self.inner.lock().await;
        menu_items(&state.forms)
    }

    pub async fn fetch_profile(&self) {
        let outcome = self.request_profile().await;
        let event = {
            let mut state = self.inner.lock().await;
            match outcome {
                Ok(profile) => {
                    state.profile = Some(profile);
                    StoreEvent::ProfileUpdated
                }
                Err(err) => {
                    warn!(error = %err, "acc: profile fetch failed");
                    state.last_error = Some(err.clone());
                    StoreEvent::FetchFailed(err)
                }
            }
        };
        let _ = self.events.send(event);
    }

    /// Loads one page of forms at the current cursor into the collection.
    /// Returns `false` when a fetch is already in flight and nothing was done.
    pub async fn fetch_forms(&self, mode: FetchMode) -> bool {
        let (offset, limit) = {
            let mut state = self.inner.lock().await;
            if state.loading {
                info!("acc: form fetch already in flight; skipping duplicate trigger");
                return false;
            }
            state.loading = true;
            state.last_error = None;
            (state.page.offset, state.page.limit)
        };

        let outcome = self.request_forms(offset, limit).await;

        let event = {
            let mut state = self.inner.lock().await;
            let event = match outcome {
                Ok(page) => {
                    match mode {
                        FetchMode::Replace => state.forms = page.data,
                        FetchMode::Append => state.forms.extend(page.data),
                    }
                    // The cursor offset never moves here; advance_page is the
                    // only place that does.
                    state.page.total_results = page.pagination.total_results;
                    debug!(
                        count = state.forms.len(),
                        total = state.page.total_results,
                        "acc: forms updated"
                    );
                    StoreEvent::FormsUpdated {
                        count: state.forms.len(),
                    }
                }
                Err(err) => {
                    warn!(error = %err, "acc: form fetch failed");
                    state.last_error = Some(err.clone());
                    StoreEvent::FetchFailed(err)
                }
            };
            state.loading = false;
            event
        };
        let _ = self.events.send(event);
        true
    }

    pub async fn select_form(&self, form: FormRecord) {
        let form_id = form.id;
        {
            let mut state = self.inner.lock().await;
            state.selected_form = Some(form);
        }
        let _ = self.events.send(StoreEvent::SelectionChanged(form_id));
    }

    /// Moves the cursor to the next page. Nothing fetches implicitly; pair
    /// this with `fetch_forms(FetchMode::Append)` to load more.
    pub async fn advance_page(&self) {
        let mut state = self.inner.lock().await;
        state.page.offset = state.page.offset.saturating_add(state.page.limit);
    }

    async fn request_profile(&self) -> Result<UserProfile, StoreError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoints::ACC_ME))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(rejection_from(response).await);
        }
        response.json().await.map_err(transport_error)
    }

    async fn request_forms(&self, offset: u32, limit: u32) -> Result<FormListResponse, StoreError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoints::ACC_FORMS))
            .query(&FormListQuery { offset, limit })
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(rejection_from(response).await);
        }
        response.json().await.map_err(transport_error)
    }
}

struct TemplateStoreState {
    templates: Vec<TemplateRecord>,
    loading: bool,
    last_error: Option<StoreError>,
}

pub struct TemplateStore {
    http: Client,
    base_url: String,
    inner: Mutex<TemplateStoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl TemplateStore {
    pub fn new(base_url: impl Into<String>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url.into()),
            inner: Mutex::new(TemplateStoreState {
                templates: Vec::new(),
                loading: false,
                last_error: None,
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TemplateStoreSnapshot {
        let state = self.inner.lock().await;
        TemplateStoreSnapshot {
            templates: state.templates.clone(),
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    /// Templates whose status is currently active, recomputed from the
    /// collection on every call.
    pub async fn active_templates(&self) -> Vec<TemplateRecord> {
        let state = self.inner.lock().await;
        state
            .templates
            .iter()
            .filter(|template| template.is_active())
            .cloned()
            .collect()
    }

    /// Replaces the template collection from the backend. Unlike the form
    /// fetch there is no in-flight guard; a duplicate call costs a request
    /// but settles on the same replaced state.
    pub async fn fetch_templates(&self) {
        {
            let mut state = self.inner.lock().await;
            state.loading = true;
            state.last_error = None;
        }

        let outcome = self.request_templates().await;

        let event = {
            let mut state = self.inner.lock().await;
            let event = match outcome {
                Ok(templates) => {
                    state.templates = templates;
                    debug!(count = state.templates.len(), "acc: templates updated");
                    StoreEvent::TemplatesUpdated {
                        count: state.templates.len(),
                    }
                }
                Err(err) => {
                    warn!(error = %err, "acc: template fetch failed");
                    state.last_error = Some(err.clone());
                    StoreEvent::FetchFailed(err)
                }
            };
            state.loading = false;
            event
        };
        let _ = self.events.send(event);
    }

    async fn request_templates(&self) -> Result<Vec<TemplateRecord>, StoreError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoints::ACC_TEMPLATES))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            return Err(StoreError::ApplicationRejected {
                detail: format!("failed to fetch templates: {reason}"),
            });
        }
        let body: TemplateListResponse = response.json().await.map_err(transport_error)?;
        body.data.ok_or(StoreError::InvalidShape)
    }
}

fn menu_items(forms: &[FormRecord]) -> Vec<FormMenuItem> {
    forms
        .iter()
        .map(|form| FormMenuItem {
            label: form.name.clone(),
            form: form.clone(),
        })
        .collect()
}

fn normalize_base_url(raw: String) -> String {
    raw.trim_end_matches('/').to_string()
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

async fn rejection_from(response: reqwest::Response) -> StoreError {
    match response.json::<ApiErrorBody>().await {
        Ok(body) => StoreError::ApplicationRejected {
            detail: body.detail,
        },
        Err(err) => StoreError::Network(err.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
