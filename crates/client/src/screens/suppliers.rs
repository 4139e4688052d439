//! Supplier administration: paginated list, search, form and delete confirmation.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use storefront_core::{DomainError, Entity, Page, PageRequest, SearchFields, SupplierId};
use storefront_parties::{Supplier, SupplierDraft};

use crate::context::AppContext;
use crate::error::ClientError;
use crate::export::{Exporter, export_rows};
use crate::mutation::{MutationCoordinator, MutationPlan};

/// Open create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierForm {
    /// `None` while creating.
    pub editing: Option<SupplierId>,
    pub draft: SupplierDraft,
}

pub struct SupplierScreen {
    ctx: AppContext,
    request: PageRequest,
    search: String,
    page: Option<Page<Supplier>>,
    prefetch: Option<JoinHandle<usize>>,
    form: Option<SupplierForm>,
    deleting: Option<Supplier>,
    form_mutation: MutationCoordinator,
    delete_mutation: MutationCoordinator,
    cancel: CancellationToken,
}

impl SupplierScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            request: PageRequest::first(ctx.config.supplier_page_size),
            search: String::new(),
            page: None,
            prefetch: None,
            form: None,
            deleting: None,
            form_mutation: ctx.mutation(),
            delete_mutation: ctx.mutation(),
            cancel: CancellationToken::new(),
            ctx,
        }
    }

    /// Load the current page (from cache when fresh). Its neighbours are
    /// prefetched in the background.
    ///
    /// A page past the end (e.g. after deleting the last row of the last
    /// page) falls back to the new last page.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let api = self.ctx.supplier_api.clone();
        let (page, prefetch) = self
            .ctx
            .cache
            .load_page(&mut self.request, move |request| {
                let api = api.clone();
                async move { api.list(request).await }
            })
            .await?;

        self.page = Some(page);
        self.prefetch = Some(prefetch);
        Ok(())
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ClientError> {
        self.request = PageRequest::new(page, self.request.limit)?;
        self.load().await
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn page(&self) -> Option<&Page<Supplier>> {
        self.page.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filters the loaded page only; no refetch.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Loaded rows matching the search term, in server order.
    pub fn visible(&self) -> Vec<&Supplier> {
        self.page
            .iter()
            .flat_map(|page| page.items.iter())
            .filter(|supplier| supplier.matches(&self.search))
            .collect()
    }

    pub fn total_items(&self) -> u64 {
        self.page.as_ref().map_or(0, |page| page.total)
    }

    pub fn total_pages(&self) -> u32 {
        self.page.as_ref().map_or(0, Page::total_pages)
    }

    /// Hand the visible rows to `exporter`.
    pub fn export(&self, exporter: &dyn Exporter) -> anyhow::Result<usize> {
        export_rows(exporter, &self.visible(), &self.ctx.config.messages.supplier_export_title)
    }

    pub fn open_create(&mut self) {
        self.form_mutation.reset();
        self.form = Some(SupplierForm {
            editing: None,
            draft: SupplierDraft::default(),
        });
    }

    pub fn open_edit(&mut self, supplier: &Supplier) {
        self.form_mutation.reset();
        self.form = Some(SupplierForm {
            editing: Some(supplier.supplier_id.clone()),
            draft: SupplierDraft::from(supplier),
        });
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn form(&self) -> Option<&SupplierForm> {
        self.form.as_ref()
    }

    pub fn form_error(&self) -> Option<String> {
        self.form_mutation.state().error
    }

    pub fn is_saving(&self) -> bool {
        self.form_mutation.is_pending()
    }

    /// Validate `draft` and create or update through the coordinator.
    ///
    /// Invalid drafts never reach the API. On success the form closes and
    /// the list reloads.
    pub async fn submit_form(&mut self, draft: SupplierDraft) -> Result<Supplier, ClientError> {
        let Some(form) = self.form.as_mut() else {
            return Err(DomainError::conflict("supplier form is not open").into());
        };
        form.draft = draft;
        form.draft.validate()?;

        let draft = form.draft.clone();
        let editing = form.editing.clone();
        let messages = &self.ctx.config.messages;
        let api = self.ctx.supplier_api.clone();

        let saved = match editing {
            None => {
                let plan = MutationPlan::for_entity::<Supplier>(
                    "supplier.create",
                    messages.supplier_created.clone(),
                    messages.supplier_create_failed.clone(),
                );
                self.form_mutation
                    .submit(&plan, &self.cancel, || async move { api.create(&draft).await })
                    .await?
            }
            Some(id) => {
                let plan = MutationPlan::for_entity::<Supplier>(
                    "supplier.update",
                    messages.supplier_updated.clone(),
                    messages.supplier_update_failed.clone(),
                );
                self.form_mutation
                    .submit(&plan, &self.cancel, || async move { api.update(&id, &draft).await })
                    .await?
            }
        };

        self.form = None;
        self.reload_after_write().await;
        Ok(saved)
    }

    pub fn request_delete(&mut self, supplier: &Supplier) {
        self.delete_mutation.reset();
        self.deleting = Some(supplier.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.deleting = None;
    }

    pub fn deleting(&self) -> Option<&Supplier> {
        self.deleting.as_ref()
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_mutation.is_pending()
    }

    /// Delete the supplier awaiting confirmation. The confirmation stays
    /// open when the delete fails.
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        let Some(target) = self.deleting.clone() else {
            return Ok(());
        };
        let messages = &self.ctx.config.messages;
        let plan = MutationPlan::for_entity::<Supplier>(
            "supplier.delete",
            messages.supplier_deleted.clone(),
            messages.supplier_delete_failed.clone(),
        );
        let api = self.ctx.supplier_api.clone();
        let id = target.id().clone();
        self.delete_mutation
            .submit(&plan, &self.cancel, || async move { api.delete(&id).await })
            .await?;

        self.deleting = None;
        self.reload_after_write().await;
        Ok(())
    }

    /// Leave the screen; in-flight writes are cancelled.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "supplier list reload failed");
        }
    }

    /// Wait for the last background prefetch; returns how many pages it loaded.
    #[cfg(test)]
    async fn settle_prefetch(&mut self) -> usize {
        match self.prefetch.take() {
            Some(handle) => handle.await.unwrap_or(0),
            None => 0,
        }
    }
}

impl Drop for SupplierScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(prefetch) = self.prefetch.take() {
            prefetch.abort();
        }
    }
}
