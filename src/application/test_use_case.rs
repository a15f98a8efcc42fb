// ============================================================
// Layer 2 — TestUseCase
// ============================================================
// Orchestrates a full evaluation run in order:
//
//   Step 1: Pick the device              (Layer 5 - ml)
//   Step 2: Resolve pretrained files     (Layer 6 - infra)
//   Step 3: Load tokenizer               (Layer 6 - infra)
//   Step 4: Load + serialize tables      (Layer 4 - data)
//   Step 5: Build model, load checkpoint (Layer 5 + 6)
//   Step 6: Build the data loader        (Layer 4 - data)
//   Step 7: Run the evaluation loop      (Layer 5 - ml)
//   Step 8: Write the result log         (Layer 6 - infra)

use anyhow::{anyhow, Result};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    prelude::*,
};
use std::path::PathBuf;

use crate::data::{
    batcher::TableBatcher,
    dataset::TableDataset,
    loader::JsonTableLoader,
    serializer::{Serialization, TableSerializer},
};
use crate::domain::traits::TableSource;
use crate::infra::{
    checkpoint::CheckpointLoader,
    config::EvalConfig,
    logger::ResultLogger,
    pretrained::{self, PretrainedBertConfig},
    tokenizer_store::TokenizerStore,
};
use crate::ml::{
    device::{available_accelerators, prepare_device, to_backend_device, EvalBackend},
    evaluator::{EvalReport, Evaluator},
    model::BertClassifier,
};

pub struct TestUseCase {
    config:     EvalConfig,
    checkpoint: PathBuf,
}

impl TestUseCase {
    pub fn new(config: EvalConfig) -> Self {
        let checkpoint = config.checkpoint_path();
        Self { config, checkpoint }
    }

    /// Evaluate a different checkpoint than the one in the config
    pub fn with_checkpoint(mut self, checkpoint: impl Into<PathBuf>) -> Self {
        self.checkpoint = checkpoint.into();
        self
    }

    /// Execute the full evaluation pipeline end to end
    pub fn execute(&self) -> Result<EvalReport> {
        // ── Step 1: Device ────────────────────────────────────────────────────
        let plan = prepare_device(self.config.num_gpu, available_accelerators());
        let device = to_backend_device(&plan);
        tracing::info!("Using device: {:?}", device);

        self.run::<EvalBackend>(&device)
    }

    /// Steps 2-8 on any backend.
    fn run<B: Backend>(&self, device: &B::Device) -> Result<EvalReport> {
        let cfg = &self.config;

        // ── Step 2: Pretrained architecture ───────────────────────────────────
        let files = pretrained::resolve(&cfg.pretrained_model_name)?;
        let model_cfg = PretrainedBertConfig::load(&files.config)?.classifier(cfg.num_labels);

        // ── Step 3: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::load(&files.tokenizer)?;

        // ── Step 4: Tables → samples → dataset ────────────────────────────────
        let tables = JsonTableLoader::new(cfg.test_dir()).load_all()?;
        let serializer = TableSerializer::new(
            &tokenizer,
            tokenizer.special_tokens(),
            Serialization::from_name(&cfg.table_serialization_type),
            cfg.dataset.num_rows,
            model_cfg.max_position_embeddings,
        );
        let dataset = TableDataset::new(serializer.serialize_all(&tables)?);
        tracing::info!(
            "Test set: {} samples, {} labelled columns",
            dataset.len(),
            dataset.label_count()
        );

        // ── Step 5: Model + checkpoint ────────────────────────────────────────
        let model: BertClassifier<B> = model_cfg.init(device);
        let model = CheckpointLoader::new(&self.checkpoint).load(model, device)?;
        tracing::info!(
            "Model ready: {} layers, hidden={}, labels={}",
            model_cfg.num_hidden_layers,
            model_cfg.hidden_size,
            model_cfg.num_labels
        );

        // ── Step 6: Data loader ───────────────────────────────────────────────
        let batcher = TableBatcher::<B>::new(device.clone());
        let mut builder = DataLoaderBuilder::new(batcher).batch_size(cfg.batch_size);
        if cfg.dataloader.num_workers > 0 {
            builder = builder.num_workers(cfg.dataloader.num_workers);
        }
        let loader = builder.build(dataset);

        // ── Step 7: Evaluate ──────────────────────────────────────────────────
        let evaluator = Evaluator::new(tokenizer.marker_id(), cfg.batch_size, cfg.num_labels);
        let report = evaluator.evaluate(&model, loader.iter())?;

        // ── Step 8: Result log ────────────────────────────────────────────────
        let logger = ResultLogger::new(&cfg.test_log_filename)?;
        write_report(&logger, &report, &cfg.metrics)?;
        tracing::info!("Results appended to '{}'", logger.path().display());

        Ok(report)
    }
}

/// Write the loss and every requested metric, in requested order.
pub fn write_report(logger: &ResultLogger, report: &EvalReport, metrics: &[String]) -> Result<()> {
    logger.info("--- --- ---", "TEST")?;
    logger.info(&format!("Loss: {};", report.loss), "LOSS")?;
    for metric in metrics {
        let score = report
            .metrics
            .get(metric)
            .ok_or_else(|| anyhow!("Metric '{}' was not computed", metric))?;
        logger.info(&format!("{} = {}", metric, score), "METRIC")?;
    }
    Ok(())
}
