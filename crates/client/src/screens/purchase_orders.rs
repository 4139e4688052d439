//! Purchase-order administration.
//!
//! Same list behavior as the supplier screen, plus the supplier picker: a
//! supplier that already has an order on the loaded page cannot be chosen
//! for a new one.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use storefront_core::{
    DomainError, Entity, EntityType, Page, PageRequest, PurchaseOrderId, SearchFields, SupplierId,
};
use storefront_parties::Supplier;
use storefront_purchasing::{PurchaseOrder, PurchaseOrderDraft, SupplierExclusions};

use crate::context::AppContext;
use crate::error::ClientError;
use crate::export::{Exporter, export_rows};
use crate::mutation::{MutationCoordinator, MutationPlan};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseOrderForm {
    /// Order being edited and its current supplier; `None` while creating.
    pub editing: Option<(PurchaseOrderId, SupplierId)>,
    pub draft: PurchaseOrderDraft,
}

pub struct PurchaseOrderScreen {
    ctx: AppContext,
    request: PageRequest,
    search: String,
    page: Option<Page<PurchaseOrder>>,
    prefetch: Option<JoinHandle<usize>>,
    supplier_options: Option<Page<Supplier>>,
    form: Option<PurchaseOrderForm>,
    deleting: Option<PurchaseOrder>,
    form_mutation: MutationCoordinator,
    delete_mutation: MutationCoordinator,
    cancel: CancellationToken,
}

impl PurchaseOrderScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            request: PageRequest::first(ctx.config.purchase_order_page_size),
            search: String::new(),
            page: None,
            prefetch: None,
            supplier_options: None,
            form: None,
            deleting: None,
            form_mutation: ctx.mutation(),
            delete_mutation: ctx.mutation(),
            cancel: CancellationToken::new(),
            ctx,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let api = self.ctx.purchase_order_api.clone();
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

    pub fn page(&self) -> Option<&Page<PurchaseOrder>> {
        self.page.as_ref()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Matches order id, supplier name and phone, and creation date.
    pub fn visible(&self) -> Vec<&PurchaseOrder> {
        self.page
            .iter()
            .flat_map(|page| page.items.iter())
            .filter(|order| order.matches(&self.search))
            .collect()
    }

    pub fn total_items(&self) -> u64 {
        self.page.as_ref().map_or(0, |page| page.total)
    }

    pub fn total_pages(&self) -> u32 {
        self.page.as_ref().map_or(0, Page::total_pages)
    }

    pub fn export(&self, exporter: &dyn Exporter) -> anyhow::Result<usize> {
        export_rows(
            exporter,
            &self.visible(),
            &self.ctx.config.messages.purchase_order_export_title,
        )
    }

    pub fn open_detail(&self, order: &PurchaseOrder) {
        self.ctx.navigator.navigate(&order.detail_route());
    }

    /// Suppliers with an order on the loaded page, minus the supplier of the
    /// order being edited.
    pub fn exclusions(&self) -> SupplierExclusions {
        let exclusions = SupplierExclusions::from_orders(
            self.page.iter().flat_map(|page| page.items.iter()),
        );
        match self.form.as_ref().and_then(|form| form.editing.as_ref()) {
            Some((_, supplier_id)) => exclusions.allowing(supplier_id),
            None => exclusions,
        }
    }

    /// Load the picker's suppliers. They share the supplier cache family, so
    /// supplier writes refresh them too.
    pub async fn load_supplier_options(&mut self) -> Result<(), ClientError> {
        let request = PageRequest::first(self.ctx.config.supplier_option_limit);
        let api = self.ctx.supplier_api.clone();
        let options = self
            .ctx
            .cache
            .query(EntityType::Supplier, request, |request| async move {
                api.list(request).await
            })
            .await?;
        self.supplier_options = Some(options);
        Ok(())
    }

    pub fn supplier_options(&self) -> Vec<&Supplier> {
        match &self.supplier_options {
            Some(options) => self.exclusions().available(&options.items),
            None => Vec::new(),
        }
    }

    pub async fn open_create(&mut self) -> Result<(), ClientError> {
        self.form_mutation.reset();
        self.form = Some(PurchaseOrderForm::default());
        self.load_supplier_options().await
    }

    pub async fn open_edit(&mut self, order: &PurchaseOrder) -> Result<(), ClientError> {
        self.form_mutation.reset();
        self.form = Some(PurchaseOrderForm {
            editing: Some((order.purchase_order_id.clone(), order.supplier_id.clone())),
            draft: PurchaseOrderDraft::from(order),
        });
        self.load_supplier_options().await
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn form(&self) -> Option<&PurchaseOrderForm> {
        self.form.as_ref()
    }

    pub fn form_error(&self) -> Option<String> {
        self.form_mutation.state().error
    }

    pub fn select_supplier(&mut self, supplier_id: Option<SupplierId>) {
        if let Some(form) = self.form.as_mut() {
            form.draft.supplier_id = supplier_id;
        }
    }

    /// Create or update with the selected supplier.
    ///
    /// A missing or excluded supplier is reported to the user and never
    /// reaches the API.
    pub async fn submit_form(&mut self) -> Result<PurchaseOrder, ClientError> {
        let Some(form) = self.form.as_ref() else {
            return Err(DomainError::conflict("purchase order form is not open").into());
        };
        let messages = &self.ctx.config.messages;

        let exclusions = self.exclusions();
        if let Err(err) = form.draft.validate(&exclusions) {
            let message = match &err {
                DomainError::Conflict(_) => &messages.supplier_unavailable,
                _ => &messages.supplier_required,
            };
            tracing::debug!(error = %err, "purchase order draft rejected");
            self.ctx.notifier.error(message);
            return Err(err.into());
        }

        let draft = form.draft.clone();
        let editing = form.editing.clone();
        let api = self.ctx.purchase_order_api.clone();

        let saved = match editing {
            None => {
                let plan = MutationPlan::for_entity::<PurchaseOrder>(
                    "purchase_order.create",
                    messages.purchase_order_created.clone(),
                    messages.purchase_order_create_failed.clone(),
                );
                self.form_mutation
                    .submit(&plan, &self.cancel, || async move { api.create(&draft).await })
                    .await?
            }
            Some((id, _)) => {
                let plan = MutationPlan::for_entity::<PurchaseOrder>(
                    "purchase_order.update",
                    messages.purchase_order_updated.clone(),
                    messages.purchase_order_update_failed.clone(),
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

    pub fn request_delete(&mut self, order: &PurchaseOrder) {
        self.delete_mutation.reset();
        self.deleting = Some(order.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.deleting = None;
    }

    pub fn deleting(&self) -> Option<&PurchaseOrder> {
        self.deleting.as_ref()
    }

    pub fn delete_error(&self) -> Option<String> {
        self.delete_mutation.state().error
    }

    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        let Some(target) = self.deleting.clone() else {
            return Ok(());
        };
        let messages = &self.ctx.config.messages;
        let plan = MutationPlan::for_entity::<PurchaseOrder>(
            "purchase_order.delete",
            messages.purchase_order_deleted.clone(),
            messages.purchase_order_delete_failed.clone(),
        );
        let api = self.ctx.purchase_order_api.clone();
        let id = target.id().clone();
        self.delete_mutation
            .submit(&plan, &self.cancel, || async move { api.delete(&id).await })
            .await?;

        self.deleting = None;
        self.reload_after_write().await;
        Ok(())
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "purchase order list reload failed");
        }
    }
}

impl Drop for PurchaseOrderScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(prefetch) = self.prefetch.take() {
            prefetch.abort();
        }
    }
}
