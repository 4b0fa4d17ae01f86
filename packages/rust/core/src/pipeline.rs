//! End-to-end generation pipeline: requirements → profile → plan →
//! theme → content → assembly → SEO → quality loop → bundle.
//!
//! The orchestrator owns the run: it checks cancellation at every
//! stage boundary, records stage timings, and is the single place
//! run-level issues are accumulated into the final quality report.
//! Callers receive either a bundle or one terminal error, mirrored on
//! the progress stream.

use std::sync::Arc;
use std::time::Instant;

use siteforge_content::{
    GenerateOptions, GenerativeClient, RetryPolicy, SectionProgress, generate_sections,
    regenerate_sections,
};
use siteforge_profiles::{IndustryProfile, ProfileRegistry, normalize, plan_pages, resolve};
use siteforge_quality::{evaluate, repair_targets};
use siteforge_shared::{
    BundleMeta, CURRENT_SCHEMA_VERSION, PipelineConfig, ProgressEvent, QualityIssue, Requirements,
    Result, RunId, SectionKind, SiteForgeError, Stage, StageTiming, WebsiteBundle,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument, warn};

use crate::assembler;
use crate::progress::ProgressEmitter;
use crate::seo;

/// Overall percentage at each stage transition. Generating fills the
/// band up to the assembling mark with per-section sub-events.
const PCT_VALIDATING: u8 = 5;
const PCT_RESOLVING: u8 = 12;
const PCT_PLANNING: u8 = 20;
const PCT_THEMING: u8 = 30;
const PCT_GENERATING: u8 = 35;
const PCT_ASSEMBLING: u8 = 80;
const PCT_ENRICHING: u8 = 88;
const PCT_SCORING: u8 = 92;
const PCT_REPAIRING: u8 = 94;
const PCT_RESCORING: u8 = 96;

/// Run the full generation pipeline.
///
/// Emits progress on `events`, honors `cancel` at stage boundaries and
/// inside generation, and enforces the overall run timeout. All
/// terminal outcomes (bundle, error, cancelled, timeout) are mirrored
/// as exactly one terminal progress event.
#[instrument(skip_all, fields(business = %raw.business_name))]
pub async fn generate_site(
    client: Arc<dyn GenerativeClient>,
    raw: Requirements,
    config: &PipelineConfig,
    events: mpsc::UnboundedSender<ProgressEvent>,
    cancel: watch::Receiver<bool>,
) -> Result<WebsiteBundle> {
    let emitter = ProgressEmitter::new(events);

    match tokio::time::timeout(config.run_timeout, run(client, raw, config, &emitter, cancel)).await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            let elapsed_ms = config.run_timeout.as_millis() as u64;
            emitter.error("run", format!("run exceeded the {elapsed_ms}ms time limit"));
            Err(SiteForgeError::Timeout {
                stage: "run".into(),
                elapsed_ms,
            })
        }
    }
}

async fn run(
    client: Arc<dyn GenerativeClient>,
    raw: Requirements,
    config: &PipelineConfig,
    emitter: &ProgressEmitter,
    cancel: watch::Receiver<bool>,
) -> Result<WebsiteBundle> {
    let run_id = RunId::new();
    let mut timer = StageTimer::new();
    let mut timings: Vec<StageTiming> = Vec::new();
    let mut run_issues: Vec<QualityIssue> = Vec::new();

    info!(%run_id, "starting generation run");

    // ---- Validating ----
    ensure_live(&cancel, Stage::Validating, emitter)?;
    emitter.stage(Stage::Validating, PCT_VALIDATING, "validating requirements");
    let requirements = match normalize(raw) {
        Ok(requirements) => Arc::new(requirements),
        Err(e) => {
            emitter.error(Stage::Validating.as_str(), e.to_string());
            return Err(e);
        }
    };
    timings.push(timer.lap(Stage::Validating));

    // ---- Resolving ----
    ensure_live(&cancel, Stage::Resolving, emitter)?;
    emitter.stage(Stage::Resolving, PCT_RESOLVING, "resolving industry profile");
    let registry = ProfileRegistry::new();
    let profile: Arc<IndustryProfile> = Arc::new(resolve(&registry, &requirements).clone());
    info!(profile = %profile.id, "industry profile resolved");
    timings.push(timer.lap(Stage::Resolving));

    // ---- Planning ----
    ensure_live(&cancel, Stage::Planning, emitter)?;
    emitter.stage(Stage::Planning, PCT_PLANNING, "planning pages and sections");
    let plans = plan_pages(&profile, &requirements);
    let section_count: usize = plans.iter().map(|p| p.sections.len()).sum();
    info!(pages = plans.len(), sections = section_count, "plan ready");
    timings.push(timer.lap(Stage::Planning));

    // ---- Theming ----
    ensure_live(&cancel, Stage::Theming, emitter)?;
    emitter.stage(Stage::Theming, PCT_THEMING, "synthesizing theme");
    let theme = Arc::new(siteforge_theme::synthesize(&profile, &requirements));
    timings.push(timer.lap(Stage::Theming));

    // ---- Generating ----
    ensure_live(&cancel, Stage::Generating, emitter)?;
    emitter.stage(
        Stage::Generating,
        PCT_GENERATING,
        format!("generating content for {section_count} sections"),
    );
    let options = GenerateOptions {
        concurrency: config.concurrency,
        retry: RetryPolicy {
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
        },
    };
    let generating_progress = BandedSectionProgress {
        emitter,
        stage: Stage::Generating,
        base: PCT_GENERATING,
        span: PCT_ASSEMBLING - PCT_GENERATING - 1,
    };
    let output = match generate_sections(
        client.clone(),
        &plans,
        &requirements,
        &profile,
        options,
        cancel.clone(),
        &generating_progress,
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            emit_failure(emitter, Stage::Generating, &e);
            return Err(e);
        }
    };
    run_issues.extend(output.issues);
    timings.push(timer.lap(Stage::Generating));

    // ---- Assembling ----
    ensure_live(&cancel, Stage::Assembling, emitter)?;
    emitter.stage(Stage::Assembling, PCT_ASSEMBLING, "assembling pages");
    let mut assembled = match assembler::assemble(&output.pages, &theme) {
        Ok(assembled) => assembled,
        Err(e) => {
            emitter.error(Stage::Assembling.as_str(), e.to_string());
            return Err(e);
        }
    };
    if !assembled.missing.is_empty() {
        warn!(missing = ?assembled.missing, "some pages could not be assembled");
    }
    timings.push(timer.lap(Stage::Assembling));

    // ---- Enriching ----
    ensure_live(&cancel, Stage::Enriching, emitter)?;
    emitter.stage(Stage::Enriching, PCT_ENRICHING, "deriving SEO metadata");
    seo::enrich(&mut assembled.pages, &requirements, &profile.keywords);
    timings.push(timer.lap(Stage::Enriching));

    // ---- Scoring and repair loop ----
    ensure_live(&cancel, Stage::Scoring, emitter)?;
    emitter.stage(Stage::Scoring, PCT_SCORING, "scoring bundle quality");
    let mut report = evaluate(&assembled.pages, &theme, config.quality_threshold);
    let mut rounds = 0u32;

    while !report.meets_thresholds && rounds < config.max_repair_rounds {
        let targets = repair_targets(&report, config.quality_threshold);
        if targets.is_empty() {
            break;
        }

        ensure_live(&cancel, Stage::Repairing, emitter)?;
        emitter.stage(
            Stage::Repairing,
            PCT_REPAIRING,
            format!("regenerating {} sections (round {})", targets.len(), rounds + 1),
        );
        let repair_progress = BandedSectionProgress {
            emitter,
            stage: Stage::Repairing,
            base: PCT_REPAIRING,
            span: PCT_RESCORING - PCT_REPAIRING,
        };
        let (regenerated, more_issues) = match regenerate_sections(
            client.clone(),
            &targets,
            &requirements,
            &profile,
            options,
            cancel.clone(),
            &repair_progress,
        )
        .await
        {
            Ok(result) => result,
            Err(e) => {
                emit_failure(emitter, Stage::Repairing, &e);
                return Err(e);
            }
        };
        run_issues.extend(more_issues);
        splice_repairs(&mut assembled.pages, regenerated);
        seo::enrich(&mut assembled.pages, &requirements, &profile.keywords);

        rounds += 1;
        emitter.stage(Stage::Scoring, PCT_RESCORING, "re-scoring after repair");
        report = evaluate(&assembled.pages, &theme, config.quality_threshold);
    }

    report.rounds_used = rounds;
    report.issues = merge_issues(run_issues, report.issues);
    timings.push(timer.lap(Stage::Scoring));

    // ---- Bundle ----
    let bundle = WebsiteBundle {
        run_id,
        business_name: requirements.business_name.clone(),
        theme,
        pages: assembled.pages,
        missing_pages: assembled.missing,
        meta: BundleMeta {
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: chrono::Utc::now(),
            tool_version: config.tool_version.clone(),
            timings,
            quality: report,
        },
    };

    emitter.complete(serde_json::json!({
        "run_id": bundle.run_id.to_string(),
        "pages": bundle.pages.len(),
        "missing_pages": bundle.missing_pages,
        "aggregate": bundle.meta.quality.aggregate,
        "meets_thresholds": bundle.meta.quality.meets_thresholds,
    }));

    info!(
        run_id = %bundle.run_id,
        pages = bundle.pages.len(),
        aggregate = bundle.meta.quality.aggregate,
        meets_thresholds = bundle.meta.quality.meets_thresholds,
        rounds = bundle.meta.quality.rounds_used,
        "generation run complete"
    );

    Ok(bundle)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fail the run if cancellation was requested.
fn ensure_live(
    cancel: &watch::Receiver<bool>,
    stage: Stage,
    emitter: &ProgressEmitter,
) -> Result<()> {
    if *cancel.borrow() {
        emitter.cancelled(stage);
        return Err(SiteForgeError::Cancelled {
            stage: stage.as_str().to_string(),
        });
    }
    Ok(())
}

/// Mirror a stage failure onto the progress stream, as cancelled or
/// error depending on the cause.
fn emit_failure(emitter: &ProgressEmitter, stage: Stage, error: &SiteForgeError) {
    match error {
        SiteForgeError::Cancelled { .. } => emitter.cancelled(stage),
        _ => emitter.error(stage.as_str(), error.to_string()),
    }
}

/// Replace repaired sections in place and refresh the page hashes.
fn splice_repairs(
    pages: &mut [siteforge_shared::PageArtifact],
    regenerated: Vec<((String, SectionKind), siteforge_shared::SectionContent)>,
) {
    for ((slug, kind), content) in regenerated {
        let Some(page) = pages.iter_mut().find(|p| p.slug == slug) else {
            continue;
        };
        if let Some(section) = page.sections.iter_mut().find(|s| s.kind == kind) {
            *section = content;
            page.content_hash = assembler::content_hash(&page.sections);
        }
    }
}

/// Run-level issues (generation fallback history) come first; scoring
/// issues that restate the same section's fallback state are dropped so
/// each degraded section is reported once.
fn merge_issues(run_issues: Vec<QualityIssue>, mut report_issues: Vec<QualityIssue>) -> Vec<QualityIssue> {
    let mut merged: Vec<QualityIssue> = Vec::new();
    for issue in run_issues {
        let duplicate = merged
            .iter()
            .any(|m| m.section == issue.section && m.message == issue.message);
        if !duplicate {
            merged.push(issue);
        }
    }
    report_issues.retain(|issue| {
        !(issue.message.contains("fallback")
            && merged.iter().any(|m| m.section == issue.section))
    });
    merged.append(&mut report_issues);
    merged
}

/// Measures wall-clock time per stage.
struct StageTimer {
    last: Instant,
}

impl StageTimer {
    fn new() -> Self {
        Self { last: Instant::now() }
    }

    fn lap(&mut self, stage: Stage) -> StageTiming {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last).as_millis() as u64;
        self.last = now;
        StageTiming {
            stage: stage.as_str().to_string(),
            elapsed_ms,
        }
    }
}

/// Maps completion-order section progress into a band of the overall
/// percentage scale.
struct BandedSectionProgress<'a> {
    emitter: &'a ProgressEmitter,
    stage: Stage,
    base: u8,
    span: u8,
}

impl SectionProgress for BandedSectionProgress<'_> {
    fn section_done(
        &self,
        page_slug: &str,
        kind: SectionKind,
        completed: usize,
        total: usize,
        fell_back: bool,
    ) {
        let pct = self.base + ((completed * self.span as usize) / total.max(1)) as u8;
        let note = if fell_back { " (fallback)" } else { "" };
        self.emitter.detail(
            self.stage,
            pct,
            format!("[{completed}/{total}] {page_slug}/{kind}{note}"),
        );
    }
}
