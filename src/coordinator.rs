//! Routing an upload to the two extraction pipelines.

use std::future::Future;
use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::error::{AdlensError, ErrorBody};
use crate::model::{BatchKind, BatchResult, SourceFile};
use crate::pipeline::{join_error, PipelineOptions, PsdPipeline, RasterPipeline};
use crate::psd::{AutoPsdParser, PsdParser};
use crate::vision::{HttpVisionClient, OfflineVision, VisionService};

/// Splits uploads by extension and runs both pipelines side by side.
///
/// Built once at startup; the vision client and PSD parser it holds are
/// shared by every request.
#[derive(Clone)]
pub struct Coordinator {
    raster: RasterPipeline,
    psd: PsdPipeline,
    options: PipelineOptions,
}

impl Coordinator {
    pub fn new(
        vision: Arc<dyn VisionService>,
        parser: Arc<dyn PsdParser>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            raster: RasterPipeline::new(vision, options),
            psd: PsdPipeline::new(parser, options),
            options,
        }
    }

    /// Builds the HTTP vision client when an endpoint is configured, and the
    /// offline one otherwise.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AdlensError> {
        let vision: Arc<dyn VisionService> = match HttpVisionClient::from_config(&config.vision)? {
            Some(client) => {
                tracing::info!(
                    target: crate::vision::TRACING_TARGET,
                    endpoint = %client.endpoint(),
                    "using vision service"
                );
                Arc::new(client)
            }
            None => {
                tracing::info!(
                    target: crate::vision::TRACING_TARGET,
                    "no vision endpoint configured, raster files get no detections"
                );
                Arc::new(OfflineVision)
            }
        };
        Ok(Self::new(
            vision,
            Arc::new(AutoPsdParser),
            PipelineOptions::from(config),
        ))
    }

    /// Analyses an upload.
    ///
    /// Files named `*.psd` (case-sensitive) go to the PSD pipeline and all
    /// others to the raster pipeline. Returns `[raster, psd]`; an empty
    /// partition still yields a well-formed batch, and a partition whose
    /// task dies yields an error batch without touching the other one.
    pub async fn analyse(&self, files: &[SourceFile]) -> [BatchResult; 2] {
        let (psd_files, raster_files): (Vec<SourceFile>, Vec<SourceFile>) =
            files.iter().cloned().partition(SourceFile::is_psd);

        tracing::info!(
            target: crate::pipeline::TRACING_TARGET,
            raster = raster_files.len(),
            psd = psd_files.len(),
            "analysing upload"
        );

        let raster = self.raster.clone();
        let psd = self.psd.clone();
        let (raster, psd) = tokio::join!(
            self.run_partition(BatchKind::Image, raster_files, |files| async move {
                raster.run(&files).await
            }),
            self.run_partition(BatchKind::Psd, psd_files, |files| async move {
                psd.run(&files).await
            }),
        );
        [raster, psd]
    }

    /// Runs one partition on its own task.
    async fn run_partition<F, Fut>(
        &self,
        kind: BatchKind,
        files: Vec<SourceFile>,
        run: F,
    ) -> BatchResult
    where
        F: FnOnce(Vec<SourceFile>) -> Fut,
        Fut: Future<Output = BatchResult> + Send + 'static,
    {
        if files.is_empty() {
            return BatchResult::empty(kind);
        }

        match tokio::spawn(run(files)).await {
            Ok(batch) => batch,
            Err(err) => {
                let err = join_error(err);
                tracing::error!(
                    target: crate::pipeline::TRACING_TARGET,
                    batch = ?kind,
                    error = %err,
                    "pipeline task failed"
                );
                BatchResult::failed(kind, ErrorBody::from_error(&err, self.options.dev_mode))
            }
        }
    }
}
