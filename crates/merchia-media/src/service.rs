//! Two-phase product image upload service.
//!
//! [`UploadService::new`] spawns a dispatcher task that receives accepted
//! jobs over an unbounded channel and drives each one on its own task: the
//! local file goes to the site media library first, then the product's image
//! list is rewritten with the new media in the primary slot. Per-product
//! exclusivity is enforced at submission through [`UploadRegistry`], and
//! every accepted job ends in exactly one completion event with its registry
//! slot released, whether it succeeds, fails, or times out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use merchia_core::models::{MediaDescriptor, ProductId};
use merchia_core::AppConfig;
use merchia_store::{ImageCache, MediaStore, ProductStore, SiteContext, StoreError};

use crate::error::UploadError;
use crate::job::{UploadEvent, UploadJob, UploadPhase};
use crate::registry::UploadRegistry;

/// Completion events are lossy for subscribers that fall this far behind.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tuning for the upload service.
#[derive(Debug, Clone)]
pub struct UploadServiceConfig {
    /// Optional limit applied to each remote phase. `None` waits as long as
    /// the store does.
    pub phase_timeout: Option<Duration>,
    /// Whether EXIF location data is stripped from uploaded images.
    pub strip_location: bool,
}

impl Default for UploadServiceConfig {
    fn default() -> Self {
        Self {
            phase_timeout: None,
            strip_location: true,
        }
    }
}

impl UploadServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            phase_timeout: config.upload_phase_timeout(),
            strip_location: config.strip_location,
        }
    }
}

/// Everything a running job needs, shared by the dispatcher and job tasks.
struct JobContext {
    media_store: Arc<dyn MediaStore>,
    product_store: Arc<dyn ProductStore>,
    image_cache: Arc<dyn ImageCache>,
    registry: UploadRegistry,
    event_tx: broadcast::Sender<UploadEvent>,
    phase_timeout: Option<Duration>,
}

/// Handle to the upload pipeline. Cloning shares the same service.
#[derive(Clone)]
pub struct UploadService {
    site: Arc<dyn SiteContext>,
    registry: UploadRegistry,
    job_tx: mpsc::UnboundedSender<UploadJob>,
    event_tx: broadcast::Sender<UploadEvent>,
    shutdown_tx: mpsc::Sender<()>,
    config: UploadServiceConfig,
}

impl UploadService {
    /// Creates the service and spawns its dispatcher task.
    pub fn new(
        media_store: Arc<dyn MediaStore>,
        product_store: Arc<dyn ProductStore>,
        image_cache: Arc<dyn ImageCache>,
        site: Arc<dyn SiteContext>,
        config: UploadServiceConfig,
    ) -> Self {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (event_tx, _event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let registry = UploadRegistry::new();

        let ctx = Arc::new(JobContext {
            media_store,
            product_store,
            image_cache,
            registry: registry.clone(),
            event_tx: event_tx.clone(),
            phase_timeout: config.phase_timeout,
        });

        tokio::spawn(Self::run_dispatcher(ctx, job_rx, shutdown_rx));

        Self {
            site,
            registry,
            job_tx,
            event_tx,
            shutdown_tx,
            config,
        }
    }

    /// Subscribes to completion events. Only events sent after this call are
    /// observed, and subscribers that lag too far behind miss events.
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    /// Starts a two-phase image upload for `product_id`.
    ///
    /// Returns as soon as the job is validated and queued; completion arrives
    /// as an [`UploadEvent`]. A missing or unusable local reference emits a
    /// failure event in addition to the returned error, so listeners observe
    /// the same outcome they would for a failure later in the pipeline. A
    /// product with an upload already in flight is rejected without an event.
    #[tracing::instrument(skip(self))]
    pub fn start_upload(
        &self,
        product_id: ProductId,
        local_uri: Option<&str>,
    ) -> Result<(), UploadError> {
        let site_id = self.site.selected_site();

        let Some(local_uri) = local_uri else {
            tracing::warn!(product_id = %product_id, "Upload requested without a local image reference");
            self.notify(product_id, true);
            return Err(UploadError::MissingLocalReference(product_id));
        };

        let descriptor = match MediaDescriptor::from_local_uri(
            site_id,
            product_id,
            local_uri,
            self.config.strip_location,
        ) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!(product_id = %product_id, error = %e, "Could not build a media descriptor");
                self.notify(product_id, true);
                return Err(UploadError::Descriptor(e));
            }
        };

        if !self.registry.try_claim(product_id, local_uri) {
            return Err(UploadError::AlreadyUploading(product_id));
        }

        let job = UploadJob {
            product_id,
            descriptor,
        };
        if self.job_tx.send(job).is_err() {
            self.registry.release(product_id);
            return Err(UploadError::ServiceClosed);
        }

        tracing::info!(product_id = %product_id, "Upload accepted");
        Ok(())
    }

    /// Whether an upload is in flight for this product.
    pub fn is_uploading_for_product(&self, product_id: ProductId) -> bool {
        self.registry.is_uploading_for_product(product_id)
    }

    /// Whether any upload is in flight.
    pub fn is_busy(&self) -> bool {
        self.registry.is_busy()
    }

    /// Current phase of the upload for `product_id`, if one is in flight.
    pub fn upload_phase(&self, product_id: ProductId) -> Option<UploadPhase> {
        self.registry.phase_for_product(product_id)
    }

    /// Signals the dispatcher to stop accepting jobs and exit.
    ///
    /// Returns immediately after sending the signal. Jobs already running
    /// continue to completion and still produce their events; jobs accepted
    /// but not yet started fail with an error event.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating upload service shutdown");
        let _ = self.shutdown_tx.send(()).await;
    }

    fn notify(&self, product_id: ProductId, is_error: bool) {
        let _ = self.event_tx.send(UploadEvent {
            product_id,
            is_error,
        });
    }

    async fn run_dispatcher(
        ctx: Arc<JobContext>,
        mut job_rx: mpsc::UnboundedReceiver<UploadJob>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Upload dispatcher started");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Upload dispatcher shutting down");
                    break;
                }
                maybe_job = job_rx.recv() => {
                    match maybe_job {
                        Some(job) => {
                            let ctx = ctx.clone();
                            tokio::spawn(async move {
                                Self::run_job(ctx, job).await;
                            });
                        }
                        None => break,
                    }
                }
            }
        }

        // Jobs accepted but never started still owe their terminal event.
        job_rx.close();
        while let Ok(job) = job_rx.try_recv() {
            tracing::warn!(product_id = %job.product_id, "Dropping queued upload at shutdown");
            ctx.registry.release(job.product_id);
            let _ = ctx.event_tx.send(UploadEvent {
                product_id: job.product_id,
                is_error: true,
            });
        }

        tracing::info!("Upload dispatcher stopped");
    }

    async fn run_job(ctx: Arc<JobContext>, job: UploadJob) {
        let product_id = job.product_id;
        let local_media_id = job.descriptor.local_id;
        let start = std::time::Instant::now();

        match Self::drive(&ctx, job).await {
            Ok(()) => {
                tracing::info!(
                    product_id = %product_id,
                    media_id = %local_media_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Product image upload completed"
                );
                ctx.registry.release(product_id);
                ctx.image_cache.refresh_product(product_id).await;
                let _ = ctx.event_tx.send(UploadEvent {
                    product_id,
                    is_error: false,
                });
            }
            Err(e) => {
                tracing::error!(
                    product_id = %product_id,
                    media_id = %local_media_id,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Product image upload failed"
                );
                ctx.registry.release(product_id);
                let _ = ctx.event_tx.send(UploadEvent {
                    product_id,
                    is_error: true,
                });
            }
        }
    }

    /// Runs both phases. No phase is retried; the first failure ends the job.
    async fn drive(ctx: &JobContext, job: UploadJob) -> Result<(), UploadError> {
        let UploadJob {
            product_id,
            descriptor,
        } = job;
        let site_id = descriptor.site_id;

        let uploaded = match Self::with_phase_timeout(
            ctx.phase_timeout,
            ctx.media_store.upload_media(site_id, &descriptor),
        )
        .await
        {
            Some(Ok(uploaded)) => uploaded,
            Some(Err(StoreError::Cancelled)) => return Err(UploadError::Cancelled),
            Some(Err(e)) => return Err(UploadError::Upload(e)),
            None => return Err(UploadError::TimedOut(UploadPhase::Uploading)),
        };

        ctx.registry.set_phase(product_id, UploadPhase::Attaching);
        tracing::debug!(
            product_id = %product_id,
            remote_media_id = %uploaded.media_id,
            "Media uploaded, attaching to product"
        );

        let product = match Self::with_phase_timeout(
            ctx.phase_timeout,
            ctx.product_store.fetch_product(site_id, product_id),
        )
        .await
        {
            Some(Ok(Some(product))) => product,
            Some(Ok(None)) => return Err(UploadError::ProductNotFound(product_id)),
            Some(Err(e)) => return Err(UploadError::Attach(e)),
            None => return Err(UploadError::TimedOut(UploadPhase::Attaching)),
        };

        // The new media takes the primary slot; existing images keep their
        // positions behind it, minus the one they replace.
        let mut images = vec![uploaded.to_image()];
        images.extend(product.images.into_iter().skip(1));

        match Self::with_phase_timeout(
            ctx.phase_timeout,
            ctx.product_store
                .update_product_images(site_id, product_id, images),
        )
        .await
        {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => Err(UploadError::Attach(e)),
            None => Err(UploadError::TimedOut(UploadPhase::Attaching)),
        }
    }

    async fn with_phase_timeout<F, T>(limit: Option<Duration>, future: F) -> Option<T>
    where
        F: std::future::Future<Output = T>,
    {
        match limit {
            Some(limit) => tokio::time::timeout(limit, future).await.ok(),
            None => Some(future.await),
        }
    }
}
