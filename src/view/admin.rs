use crate::application_port::SessionService;
use crate::domain_model::{SponsorList, SponsorRecord};
use crate::domain_port::{SponsorError, SponsorRepo};
use crate::view::{Nav, Route};
use std::sync::Arc;

/// The add/edit form, mirroring one sponsor record as free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorForm {
    pub name: String,
    pub logo: String,
    pub link: String,
}

impl SponsorForm {
    pub fn to_record(&self) -> SponsorRecord {
        SponsorRecord::new(&self.name, &self.logo, &self.link)
    }

    pub fn from_record(record: &SponsorRecord) -> Self {
        Self {
            name: record.name.clone(),
            logo: record.logo.clone(),
            link: record.link.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Sponsor management behind the session gate.
///
/// `editing` is view-local state, distinct from anything persisted: `None`
/// means the form adds a new record, `Some(index)` means it replaces the
/// record at that index. Record identity is positional, so a deletion
/// abandons any in-progress edit at or behind the deleted index.
pub struct AdminView {
    session: Arc<dyn SessionService>,
    repo: Arc<dyn SponsorRepo>,
    pub sponsors: SponsorList,
    pub form: SponsorForm,
    pub editing: Option<usize>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl AdminView {
    /// Mounting without a valid session bounces straight to the login view.
    pub fn mount(
        session: Arc<dyn SessionService>,
        repo: Arc<dyn SponsorRepo>,
    ) -> Result<Self, Nav> {
        if !session.is_authenticated() {
            return Err(Nav::Redirect(Route::Login));
        }
        let sponsors = repo.list();
        Ok(Self {
            session,
            repo,
            sponsors,
            form: SponsorForm::default(),
            editing: None,
            notice: None,
            error: None,
        })
    }

    /// Create or update, depending on edit mode. A successful mutation
    /// adopts the persisted list and resets the form.
    pub fn submit(&mut self) {
        self.notice = None;
        self.error = None;

        let record = self.form.to_record();
        let result = match self.editing {
            Some(index) => self
                .repo
                .update(index, record)
                .map(|list| (list, "Sponsor updated")),
            None => self.repo.create(record).map(|list| (list, "Sponsor added")),
        };

        match result {
            Ok((list, notice)) => {
                self.sponsors = list;
                self.form.clear();
                self.editing = None;
                self.notice = Some(notice.to_owned());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Pre-fill the form from an existing record.
    pub fn begin_edit(&mut self, index: usize) {
        let Some(record) = self.sponsors.get(index) else {
            self.error = Some(
                SponsorError::OutOfBounds {
                    index,
                    len: self.sponsors.len(),
                }
                .to_string(),
            );
            return;
        };
        self.form = SponsorForm::from_record(record);
        self.editing = Some(index);
        self.notice = None;
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    /// Delete a record. Every record at or behind the deleted index changes
    /// identity, so an edit in that range is abandoned.
    pub fn delete(&mut self, index: usize) {
        self.notice = None;
        self.error = None;
        match self.repo.delete(index) {
            Ok(list) => {
                self.sponsors = list;
                if self.editing.is_some_and(|editing| editing >= index) {
                    self.cancel_edit();
                }
                self.notice = Some("Sponsor deleted".to_owned());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Destroy the session and leave the admin area.
    pub fn logout(&mut self) -> Nav {
        if let Err(e) = self.session.logout() {
            tracing::warn!("logout failed: {e}");
        }
        Nav::Redirect(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::FakeSessionService;
    use crate::infra_store::{KvSponsorRepo, LocalStore};

    fn mounted() -> AdminView {
        let store = LocalStore::in_memory();
        let tab = Arc::new(store.tab());
        let repo = Arc::new(KvSponsorRepo::new(tab));
        AdminView::mount(Arc::new(FakeSessionService::logged_in()), repo).unwrap()
    }

    fn fill(view: &mut AdminView, name: &str) {
        view.form.name = name.to_owned();
        view.form.logo = format!("https://{name}.test/logo.png");
        view.form.link = format!("https://{name}.test");
    }

    #[test]
    fn test_mount_redirects_when_logged_out() {
        let store = LocalStore::in_memory();
        let repo = Arc::new(KvSponsorRepo::new(Arc::new(store.tab())));
        let result = AdminView::mount(Arc::new(FakeSessionService::new()), repo);
        assert!(matches!(result, Err(Nav::Redirect(Route::Login))));
    }

    #[test]
    fn test_add_mode_creates_and_resets_form() {
        let mut view = mounted();
        fill(&mut view, "acme");
        view.submit();

        assert_eq!(view.sponsors.len(), 1);
        assert_eq!(view.sponsors[0].name, "acme");
        assert_eq!(view.form, SponsorForm::default());
        assert_eq!(view.notice.as_deref(), Some("Sponsor added"));
        assert!(view.error.is_none());
    }

    #[test]
    fn test_incomplete_form_is_rejected_in_place() {
        let mut view = mounted();
        view.form.name = "acme".to_owned();
        view.submit();

        assert!(view.sponsors.is_empty());
        assert!(view.error.is_some());
        // The half-filled form sticks around for correction.
        assert_eq!(view.form.name, "acme");
    }

    #[test]
    fn test_edit_mode_updates_then_clears() {
        let mut view = mounted();
        fill(&mut view, "acme");
        view.submit();

        view.begin_edit(0);
        assert_eq!(view.editing, Some(0));
        assert_eq!(view.form.name, "acme");

        view.form.name = "globex".to_owned();
        view.submit();

        assert_eq!(view.editing, None);
        assert_eq!(view.sponsors[0].name, "globex");
        assert_eq!(view.notice.as_deref(), Some("Sponsor updated"));
    }

    #[test]
    fn test_delete_at_edit_index_cancels_edit() {
        let mut view = mounted();
        for name in ["a", "b", "c"] {
            fill(&mut view, name);
            view.submit();
        }

        view.begin_edit(2);
        view.delete(2);

        assert_eq!(view.sponsors.len(), 2);
        assert_eq!(view.editing, None);
        assert_eq!(view.form, SponsorForm::default());
    }

    #[test]
    fn test_delete_below_edit_index_cancels_edit() {
        let mut view = mounted();
        for name in ["a", "b", "c"] {
            fill(&mut view, name);
            view.submit();
        }

        // The record being edited keeps its contents but not its index.
        view.begin_edit(2);
        view.delete(0);
        assert_eq!(view.editing, None);
    }

    #[test]
    fn test_delete_above_edit_index_keeps_edit() {
        let mut view = mounted();
        for name in ["a", "b", "c"] {
            fill(&mut view, name);
            view.submit();
        }

        view.begin_edit(0);
        view.delete(2);
        assert_eq!(view.editing, Some(0));
        assert_eq!(view.form.name, "a");
    }

    #[test]
    fn test_cancel_edit_resets_form() {
        let mut view = mounted();
        fill(&mut view, "acme");
        view.submit();

        view.begin_edit(0);
        view.cancel_edit();
        assert_eq!(view.editing, None);
        assert_eq!(view.form, SponsorForm::default());
    }

    #[test]
    fn test_logout_redirects_to_login() {
        let session = Arc::new(FakeSessionService::logged_in());
        let store = LocalStore::in_memory();
        let repo = Arc::new(KvSponsorRepo::new(Arc::new(store.tab())));
        let mut view = AdminView::mount(session.clone(), repo).unwrap();

        assert_eq!(view.logout(), Nav::Redirect(Route::Login));
        assert!(!session.is_authenticated());
    }
}
