//! Badge creation workflow
//!
//! A [`Workflow`] walks one user through selection, title generation,
//! confirmation and badge generation. Front ends drive it; the terminal
//! `create` command is one such driver.
//!
//! ```text
//! Idle -> Selecting -> TitlesRequested -> TitlesReady -> BadgeRequested -> Complete
//!                 \__________________ Error (resumable) _________________/
//! ```

pub mod candidates;
pub mod debounce;
pub mod selection;
pub mod session;

pub use candidates::TitleCandidates;
pub use debounce::SearchDebouncer;
pub use selection::{MAX_SELECTED, SelectionError, SelectionSet};
pub use session::{BadgeArtifact, SessionStore};

use thiserror::Error;

use crate::client::{GenerativeApi, Organization};
use crate::error::Result;
use crate::services::{self, SupportedNonprofit};
use crate::storage::ImageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Selecting,
    TitlesRequested,
    TitlesReady,
    BadgeRequested,
    Complete,
    Error,
}

/// A workflow step was invoked before its precondition held
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Select at least one nonprofit first")]
    EmptySelection,

    #[error("Choose a title first")]
    NoTitleChosen,
}

#[derive(Debug)]
pub struct Workflow {
    state: WorkflowState,
    /// State to return to once an error is dismissed
    resume: WorkflowState,
    error: Option<String>,
    selection: SelectionSet,
    titles: TitleCandidates,
    session: SessionStore,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            resume: WorkflowState::Idle,
            error: None,
            selection: SelectionSet::new(),
            titles: TitleCandidates::default(),
            session: SessionStore::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Message for the most recent failure, if it has not been cleared
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn titles(&self) -> &TitleCandidates {
        &self.titles
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Add an organization to the selection.
    ///
    /// Rejected adds leave the set untouched and record the message as the
    /// visible error without leaving the selecting step.
    pub fn add(&mut self, org: Organization) -> std::result::Result<(), SelectionError> {
        match self.selection.add(org) {
            Ok(()) => {
                self.error = None;
                self.titles = TitleCandidates::default();
                self.state = WorkflowState::Selecting;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.state = WorkflowState::Selecting;
                Err(e)
            }
        }
    }

    pub fn remove(&mut self, ein: &str) -> bool {
        let removed = self.selection.remove(ein);
        if removed {
            self.titles = TitleCandidates::default();
            self.state = if self.selection.is_empty() {
                WorkflowState::Idle
            } else {
                WorkflowState::Selecting
            };
        }
        removed
    }

    pub fn can_request_titles(&self) -> bool {
        !self.selection.is_empty()
            && !matches!(
                self.state,
                WorkflowState::TitlesRequested | WorkflowState::BadgeRequested
            )
    }

    /// Ask the text model for title candidates based on the current selection
    pub async fn request_titles(&mut self, api: &dyn GenerativeApi) -> Result<&TitleCandidates> {
        if self.selection.is_empty() {
            return Err(WorkflowError::EmptySelection.into());
        }

        self.error = None;
        self.state = WorkflowState::TitlesRequested;

        match services::generate_titles(api, &self.selection.names()).await {
            Ok(titles) => {
                self.titles = TitleCandidates::new(titles);
                self.state = WorkflowState::TitlesReady;
                Ok(&self.titles)
            }
            Err(e) => {
                self.fail(&e, WorkflowState::Selecting);
                Err(e)
            }
        }
    }

    /// Mark the title at `index` as the chosen one
    pub fn choose_title(&mut self, index: usize) -> bool {
        self.titles.choose(index)
    }

    pub fn can_generate_badge(&self) -> bool {
        self.titles.chosen().is_some() && self.state != WorkflowState::BadgeRequested
    }

    /// Generate the badge image, then render the page, then store the result.
    ///
    /// The session store is written only when both steps succeed. On failure
    /// the selection and titles are kept so the user can retry.
    pub async fn generate_badge(
        &mut self,
        api: &dyn GenerativeApi,
        store: &dyn ImageStore,
    ) -> Result<BadgeArtifact> {
        let title = self
            .titles
            .chosen()
            .map(str::to_string)
            .ok_or(WorkflowError::NoTitleChosen)?;

        self.error = None;
        self.state = WorkflowState::BadgeRequested;

        let nonprofits: Vec<SupportedNonprofit> = self
            .selection
            .iter()
            .map(|o| SupportedNonprofit {
                name: o.name.clone(),
            })
            .collect();

        let produced = async {
            let image = services::generate_badge(api, store, &title).await?;
            let page = services::render_page(api, &title, &nonprofits).await?;
            Ok::<_, crate::error::Error>(BadgeArtifact {
                title: title.clone(),
                image_reference: image.image_reference,
                palette: page.palette,
                page_markup: page.page_markup,
            })
        }
        .await;

        match produced {
            Ok(artifact) => {
                self.session.commit(artifact.clone());
                self.state = WorkflowState::Complete;
                log::info!("Badge complete for {:?}", artifact.title);
                Ok(artifact)
            }
            Err(e) => {
                self.fail(&e, WorkflowState::TitlesReady);
                Err(e)
            }
        }
    }

    /// Leave the error state and return to where the failure happened
    pub fn dismiss_error(&mut self) {
        self.error = None;
        if self.state == WorkflowState::Error {
            self.state = self.resume;
        }
    }

    fn fail(&mut self, err: &crate::error::Error, resume: WorkflowState) {
        log::warn!("Workflow step failed: {}", err);
        self.error = Some(err.to_string());
        self.resume = resume;
        self.state = WorkflowState::Error;
    }
}
