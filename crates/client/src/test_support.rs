//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Notify;

use storefront_cart::{AddToCart, CartLine, Product};
use storefront_core::{Page, PageRequest, ProductId, PurchaseOrderId, SupplierId};
use storefront_parties::{Supplier, SupplierDraft};
use storefront_purchasing::{PurchaseOrder, PurchaseOrderDraft, SupplierSummary};

use crate::api::{CartApi, PurchaseOrderApi, SupplierApi};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::export::Exporter;
use crate::identity::Navigator;
use crate::notify::NotificationSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Success(m) => Some(m),
                Notification::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(m) => Some(m),
                Notification::Success(_) => None,
            })
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn success(&self, message: &str) {
        self.seen.lock().unwrap().push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.seen.lock().unwrap().push(Notification::Error(message.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[derive(Debug, Default)]
pub struct RecordingExporter {
    exports: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingExporter {
    pub fn exports(&self) -> Vec<(String, Vec<Value>)> {
        self.exports.lock().unwrap().clone()
    }
}

impl Exporter for RecordingExporter {
    fn export(&self, rows: &[Value], title: &str) -> anyhow::Result<()> {
        self.exports.lock().unwrap().push((title.to_string(), rows.to_vec()));
        Ok(())
    }
}

/// Cart endpoint that can be held open to observe the pending state.
#[derive(Debug, Default)]
pub struct FakeCartApi {
    calls: AtomicUsize,
    hold: AtomicBool,
    gate: Notify,
    fail_next: Mutex<Option<ApiError>>,
    server_cart: Mutex<Vec<CartLine>>,
}

impl FakeCartApi {
    /// Block subsequent calls until [`FakeCartApi::release`].
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.hold.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
        self.gate.notify_one();
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartApi for FakeCartApi {
    async fn add_to_cart(&self, request: &AddToCart) -> ApiResult<CartLine> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hold.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }

        let mut cart = self.server_cart.lock().unwrap();
        let line = match cart.iter_mut().find(|l| l.product_id == request.product_id) {
            Some(line) => {
                line.quantity += request.quantity;
                line.clone()
            }
            None => {
                let line = CartLine::new(request.product_id.clone(), request.quantity)
                    .map_err(|e| ApiError::validation([e.to_string()]))?;
                cart.push(line.clone());
                line
            }
        };
        Ok(line)
    }
}

fn page_from<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let start = ((request.page - 1) * request.limit) as usize;
    let window = items
        .iter()
        .skip(start)
        .take(request.limit as usize)
        .cloned()
        .collect();
    Page::new(window, request, items.len() as u64)
}

#[derive(Debug, Default)]
pub struct FakeSupplierApi {
    suppliers: Mutex<Vec<Supplier>>,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
    fail_writes: Mutex<Option<ApiError>>,
    next_id: AtomicUsize,
}

impl FakeSupplierApi {
    pub fn with(suppliers: Vec<Supplier>) -> Self {
        Self {
            suppliers: Mutex::new(suppliers),
            ..Self::default()
        }
    }

    pub fn fail_writes_with(&self, err: ApiError) {
        *self.fail_writes.lock().unwrap() = Some(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Supplier> {
        self.suppliers.lock().unwrap().clone()
    }

    fn begin_write(&self) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_writes.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SupplierApi for FakeSupplierApi {
    async fn list(&self, request: PageRequest) -> ApiResult<Page<Supplier>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let suppliers = self.suppliers.lock().unwrap();
        Ok(page_from(suppliers.as_slice(), request))
    }

    async fn create(&self, draft: &SupplierDraft) -> ApiResult<Supplier> {
        self.begin_write()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Supplier {
            supplier_id: SupplierId::parse(format!("new-{n}")).unwrap(),
            name: draft.name.clone(),
            phone_number: draft.phone_number.clone(),
            address: draft.address.clone(),
            products: Vec::new(),
        };
        self.suppliers.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &SupplierId, draft: &SupplierDraft) -> ApiResult<Supplier> {
        self.begin_write()?;
        let mut suppliers = self.suppliers.lock().unwrap();
        let supplier = suppliers
            .iter_mut()
            .find(|s| &s.supplier_id == id)
            .ok_or_else(|| ApiError::from_response(404, r#"{"message":"supplier not found"}"#))?;
        supplier.name = draft.name.clone();
        supplier.phone_number = draft.phone_number.clone();
        supplier.address = draft.address.clone();
        Ok(supplier.clone())
    }

    async fn delete(&self, id: &SupplierId) -> ApiResult<()> {
        self.begin_write()?;
        self.suppliers.lock().unwrap().retain(|s| &s.supplier_id != id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakePurchaseOrderApi {
    orders: Mutex<Vec<PurchaseOrder>>,
    suppliers: Mutex<Vec<Supplier>>,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
    fail_writes: Mutex<Option<ApiError>>,
    next_id: AtomicUsize,
}

impl FakePurchaseOrderApi {
    pub fn with(orders: Vec<PurchaseOrder>, suppliers: Vec<Supplier>) -> Self {
        Self {
            orders: Mutex::new(orders),
            suppliers: Mutex::new(suppliers),
            ..Self::default()
        }
    }

    pub fn fail_writes_with(&self, err: ApiError) {
        *self.fail_writes.lock().unwrap() = Some(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn begin_write(&self) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_writes.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn summary(&self, id: &SupplierId) -> ApiResult<SupplierSummary> {
        self.suppliers
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.supplier_id == id)
            .map(SupplierSummary::from)
            .ok_or_else(|| ApiError::validation(["supplier_id does not exist"]))
    }
}

#[async_trait]
impl PurchaseOrderApi for FakePurchaseOrderApi {
    async fn list(&self, request: PageRequest) -> ApiResult<Page<PurchaseOrder>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let orders = self.orders.lock().unwrap();
        Ok(page_from(orders.as_slice(), request))
    }

    async fn create(&self, draft: &PurchaseOrderDraft) -> ApiResult<PurchaseOrder> {
        self.begin_write()?;
        let supplier_id = draft
            .supplier_id
            .clone()
            .ok_or_else(|| ApiError::validation(["supplier_id should not be empty"]))?;
        let supplier = self.summary(&supplier_id)?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = PurchaseOrder {
            purchase_order_id: PurchaseOrderId::parse(format!("PO-NEW-{n}")).unwrap(),
            supplier_id,
            created_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
            supplier,
        };
        self.orders.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &PurchaseOrderId,
        draft: &PurchaseOrderDraft,
    ) -> ApiResult<PurchaseOrder> {
        self.begin_write()?;
        let supplier_id = draft
            .supplier_id
            .clone()
            .ok_or_else(|| ApiError::validation(["supplier_id should not be empty"]))?;
        let supplier = self.summary(&supplier_id)?;
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| &o.purchase_order_id == id)
            .ok_or_else(|| ApiError::from_response(404, ""))?;
        order.supplier_id = supplier_id;
        order.supplier = supplier;
        Ok(order.clone())
    }

    async fn delete(&self, id: &PurchaseOrderId) -> ApiResult<()> {
        self.begin_write()?;
        self.orders.lock().unwrap().retain(|o| &o.purchase_order_id != id);
        Ok(())
    }
}

pub fn supplier(id: &str, name: &str, phone: &str, address: &str) -> Supplier {
    Supplier {
        supplier_id: SupplierId::parse(id).unwrap(),
        name: name.to_string(),
        phone_number: phone.to_string(),
        address: address.to_string(),
        products: Vec::new(),
    }
}

pub fn purchase_order(id: &str, supplier: &Supplier, day: u32) -> PurchaseOrder {
    PurchaseOrder {
        purchase_order_id: PurchaseOrderId::parse(id).unwrap(),
        supplier_id: supplier.supplier_id.clone(),
        created_at: Utc.with_ymd_and_hms(2025, 6, day, 8, 0, 0).unwrap(),
        supplier: SupplierSummary::from(supplier),
    }
}

pub fn product(id: &str, end_stock: u32) -> Product {
    Product::new(ProductId::parse(id).unwrap(), format!("Product {id}"), end_stock)
}

/// Context wired to in-memory collaborators.
pub struct Harness {
    pub ctx: AppContext,
    pub cart_api: Arc<FakeCartApi>,
    pub supplier_api: Arc<FakeSupplierApi>,
    pub purchase_order_api: Arc<FakePurchaseOrderApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(config: ClientConfig, suppliers: Vec<Supplier>, orders: Vec<PurchaseOrder>) -> Self {
        storefront_observability::tracing::init(storefront_observability::tracing::LogFormat::Pretty);

        let cart_api = Arc::new(FakeCartApi::default());
        let supplier_api = Arc::new(FakeSupplierApi::with(suppliers.clone()));
        let purchase_order_api = Arc::new(FakePurchaseOrderApi::with(orders, suppliers));
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let ctx = AppContext::new(
            config,
            cart_api.clone(),
            supplier_api.clone(),
            purchase_order_api.clone(),
            notifier.clone(),
            navigator.clone(),
        );

        Self {
            ctx,
            cart_api,
            supplier_api,
            purchase_order_api,
            notifier,
            navigator,
        }
    }
}
