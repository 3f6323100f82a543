use crate::config::FormatterConfig;
use crate::export::{FormattedScript, TextRenderer};
use crate::fingerprint::{calculate_config_hash, calculate_text_hash};
use crate::layout::{HeightMeasurer, MonospaceMeasurer, Pagination, Paginator, StyleResolver};
use crate::preprocessors::{PlainTextPreprocessor, TextPreprocessor};
use crate::processor::{ClassifiedLine, HintSource, NoHints, ScriptProcessor};
use crate::rules::validation::{ScriptValidator, ValidationReport};
use crate::types::*;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect each boundary on its own
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub raw_lines: Vec<String>,
    pub classified: Vec<ClassifiedLine>,
    pub heights: Vec<Option<f32>>,
    pub pagination: Option<Pagination>,
    /// Why pagination was not produced, if it wasn't
    pub pagination_error: Option<String>,
    pub validation: ValidationReport,
}

/// Wall-clock time spent in one pipeline stage
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

/// Stage timings for `--profile`. A disabled timer just runs the stages.
#[derive(Debug, Default)]
pub struct StageTimer {
    timings: Option<Vec<StageTiming>>,
}

impl StageTimer {
    pub fn disabled() -> Self {
        Self { timings: None }
    }

    pub fn enabled() -> Self {
        Self {
            timings: Some(Vec::new()),
        }
    }

    pub fn stage<R>(&mut self, stage: &'static str, run: impl FnOnce() -> R) -> R {
        let Some(timings) = self.timings.as_mut() else {
            return run();
        };
        let start = Instant::now();
        let result = run();
        let elapsed = start.elapsed();
        debug!("⏱️  {} took {:.3}ms", stage, millis(elapsed));
        timings.push(StageTiming { stage, elapsed });
        result
    }

    pub fn timings(&self) -> &[StageTiming] {
        self.timings.as_deref().unwrap_or(&[])
    }

    pub fn total(&self) -> Duration {
        self.timings().iter().map(|t| t.elapsed).sum()
    }

    /// One line per stage with its share of the whole run
    pub fn log_summary(&self) {
        if self.timings().is_empty() {
            return;
        }
        let total = self.total();
        info!("📊 {} stages in {:.3}ms", self.timings().len(), millis(total));
        for timing in self.timings() {
            let share = if total.is_zero() {
                0.0
            } else {
                timing.elapsed.as_secs_f64() / total.as_secs_f64() * 100.0
            };
            info!("   {:<12} {:>9.3}ms {:>5.1}%", timing.stage, millis(timing.elapsed), share);
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Text in, formatted script out: preprocess, classify, measure, paginate,
/// validate and summarize with one configuration
pub struct FormattingPipeline {
    config: FormatterConfig,
    config_hash: String,
    preprocessor: Box<dyn TextPreprocessor>,
    measurer: Box<dyn HeightMeasurer>,
    processor: ScriptProcessor,
    validator: ScriptValidator,
}

impl FormattingPipeline {
    /// Plain-text input measured with the monospace estimate
    pub fn new(config: FormatterConfig) -> Result<Self> {
        let measurer = MonospaceMeasurer::new(config.page.content_width());
        Self::new_with_dependencies(
            config,
            Box::new(PlainTextPreprocessor::new()),
            Box::new(measurer),
        )
    }

    /// Create pipeline with full dependency injection
    pub fn new_with_dependencies(
        config: FormatterConfig,
        preprocessor: Box<dyn TextPreprocessor>,
        measurer: Box<dyn HeightMeasurer>,
    ) -> Result<Self> {
        config.validate()?;
        let processor = ScriptProcessor::new(&config)?;
        let config_hash = calculate_config_hash(&config)?;
        Ok(Self {
            config,
            config_hash,
            preprocessor,
            measurer,
            processor,
            validator: ScriptValidator::new(),
        })
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn processor(&self) -> &ScriptProcessor {
        &self.processor
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::from_geometry(&self.config.page)
    }

    /// Format already-decoded text. Pagination failures are returned, not papered over.
    pub fn format_text(&self, text: &str, hints: &dyn HintSource) -> Result<FormattedScript> {
        self.run(text, hints, &mut StageTimer::disabled(), true)
    }

    pub fn format_text_with_profiling(
        &self,
        text: &str,
        hints: &dyn HintSource,
        enable_profiling: bool,
    ) -> Result<FormattedScript> {
        let mut timer = if enable_profiling {
            StageTimer::enabled()
        } else {
            StageTimer::disabled()
        };
        let result = self.run(text, hints, &mut timer, true);
        timer.log_summary();
        result
    }

    /// Single continuous flow without page breaks, for callers that cannot measure
    pub fn format_unpaginated(&self, text: &str, hints: &dyn HintSource) -> Result<FormattedScript> {
        self.run(text, hints, &mut StageTimer::disabled(), false)
    }

    /// Decode and format a file
    pub fn format_file(&self, path: &Path) -> Result<FormattedScript> {
        if !self.preprocessor.supports_file_type(path) {
            warn!(
                "⚠️  {} does not look like a {} file, trying anyway",
                path.display(),
                self.preprocessor.name()
            );
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = self.preprocessor.decode(&bytes)?;
        self.format_text(&text, &NoHints)
    }

    fn run(
        &self,
        text: &str,
        hints: &dyn HintSource,
        timer: &mut StageTimer,
        paginate: bool,
    ) -> Result<FormattedScript> {
        info!("📄 Formatting script ({} bytes)", text.len());

        let source_hash = timer.stage("fingerprint", || calculate_text_hash(text));
        let lines = timer.stage("split", || self.preprocessor.split_lines(text));
        let elements = timer.stage("classify", || {
            self.processor.process_script_with_hints(&lines, hints)
        });
        info!("📋 {} lines classified into {} elements", lines.len(), elements.len());

        let pagination = if paginate {
            let pagination = timer.stage("paginate", || {
                self.paginator()
                    .layout(&elements, &self.config.styles, self.measurer.as_ref())
            })?;
            Some(pagination)
        } else {
            info!("📜 Pagination skipped, producing a continuous flow");
            None
        };

        let validation = timer.stage("validate", || {
            self.validator.validate(&elements, pagination.as_ref())
        });

        let formatted = timer.stage("summarize", || {
            FormattedScript::new(elements, pagination, source_hash, self.config_hash.clone())
                .with_validation(validation)
        });

        info!(
            "✅ {} elements, {} scenes, {} pages",
            formatted.stats.total_elements, formatted.stats.scene_count, formatted.stats.page_count
        );
        Ok(formatted)
    }

    /// Run every stage and keep each boundary's output, pagination failures included
    pub fn capture_stages(&self, text: &str, hints: &dyn HintSource) -> Result<PipelineStages> {
        let raw_lines = self.preprocessor.split_lines(text);
        info!("📋 Stage 1: {} raw lines captured", raw_lines.len());

        let classified = self.processor.classify_lines(&raw_lines, hints);
        info!("📋 Stage 2: {} classified lines captured", classified.len());

        let elements: Vec<ScreenplayElement> =
            classified.iter().map(|line| line.element.clone()).collect();
        let heights: Vec<Option<f32>> = elements
            .iter()
            .map(|element| {
                let style = self.config.styles.style_of(element.element_type);
                self.measurer.height_of(element, &style)
            })
            .collect();
        info!("📋 Stage 3: {} heights measured", heights.len());

        let (pagination, pagination_error) = match self.paginator().paginate(&elements, &heights) {
            Ok(pagination) => {
                info!("📋 Stage 4: {} pages captured", pagination.page_count());
                (Some(pagination), None)
            }
            Err(e) => {
                info!("📋 Stage 4: pagination failed ({})", e);
                (None, Some(e.to_string()))
            }
        };

        let validation = self.validator.validate(&elements, pagination.as_ref());

        Ok(PipelineStages {
            raw_lines,
            classified,
            heights,
            pagination,
            pagination_error,
            validation,
        })
    }

    pub fn text_renderer(&self) -> TextRenderer<'_> {
        TextRenderer::new(
            &self.config.styles,
            self.config.page.content_width(),
            self.config.classification.assumed_line_width,
        )
    }

    /// Render in one of the export formats using this pipeline's styles and geometry
    pub fn render(&self, script: &FormattedScript, format: &str) -> Result<String> {
        script.render(format, &self.text_renderer())
    }

    pub fn save(&self, script: &FormattedScript, path: &str, format: &str) -> Result<()> {
        script.save_with_format(
            path,
            format,
            &self.config.styles,
            self.config.page.content_width(),
            self.config.classification.assumed_line_width,
        )
    }
}
