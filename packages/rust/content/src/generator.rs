//! Section content generation.
//!
//! For every planned section, obtains copy and an image directive from
//! the external generative capability through the unified
//! backoff-and-fallback policy. Sections fan out concurrently under a
//! semaphore; sub-progress is reported in completion order, labeled
//! with page/section identity. Fallback use is reported back to the
//! orchestrator as warning issues, never appended concurrently.

use std::sync::Arc;

use siteforge_profiles::{IndustryProfile, PagePlan};
use siteforge_shared::{
    ImageDirective, QualityCategory, QualityIssue, Requirements, Result, SectionContent,
    SectionKind, Severity, SiteForgeError,
};
use tokio::sync::{Semaphore, mpsc, watch};
use tracing::{debug, instrument};

use crate::client::{GenerativeClient, GenerativeKind, GenerativeRequest};
use crate::retry::{RetryPolicy, retry_with_fallback};

// ---------------------------------------------------------------------------
// Options and output
// ---------------------------------------------------------------------------

/// Knobs for one generation pass.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Maximum concurrent sections in flight.
    pub concurrency: u32,
    /// Retry policy applied per generative call.
    pub retry: RetryPolicy,
}

/// Generated content for one page, in planned section order.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Display title.
    pub title: String,
    /// Page slug.
    pub slug: String,
    /// Section content in plan order.
    pub sections: Vec<SectionContent>,
}

/// Output of a generation pass.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Per-page content in requested page order.
    pub pages: Vec<PageContent>,
    /// Warning issues for sections that used the deterministic fallback.
    pub issues: Vec<QualityIssue>,
}

/// Completion-order sub-progress for concurrently generating sections.
pub trait SectionProgress: Send + Sync {
    /// Called once per finished section, in completion order.
    fn section_done(
        &self,
        page_slug: &str,
        kind: SectionKind,
        completed: usize,
        total: usize,
        fell_back: bool,
    );
}

/// No-op progress for headless/test usage.
pub struct SilentSectionProgress;

impl SectionProgress for SilentSectionProgress {
    fn section_done(&self, _: &str, _: SectionKind, _: usize, _: usize, _: bool) {}
}

// ---------------------------------------------------------------------------
// Generation entry points
// ---------------------------------------------------------------------------

/// Generate content for every section of every planned page.
#[instrument(skip_all, fields(pages = plans.len()))]
pub async fn generate_sections(
    client: Arc<dyn GenerativeClient>,
    plans: &[PagePlan],
    requirements: &Arc<Requirements>,
    profile: &Arc<IndustryProfile>,
    options: GenerateOptions,
    cancel: watch::Receiver<bool>,
    progress: &dyn SectionProgress,
) -> Result<GenerationOutput> {
    let mut tasks = Vec::new();
    for (page_index, plan) in plans.iter().enumerate() {
        for (section_index, spec) in plan.sections.iter().enumerate() {
            tasks.push(SectionTask {
                page_index,
                section_index,
                page_slug: plan.slug.clone(),
                kind: spec.kind,
            });
        }
    }

    let results = run_tasks(client, tasks, requirements, profile, options, cancel, progress).await?;

    // Reassemble completion-order results into plan order.
    let mut pages: Vec<PageContent> = plans
        .iter()
        .map(|plan| PageContent {
            title: plan.title.clone(),
            slug: plan.slug.clone(),
            sections: vec![SectionContent {
                kind: SectionKind::Hero,
                headline: String::new(),
                body: String::new(),
                bullets: vec![],
                images: vec![],
                from_fallback: false,
            }; plan.sections.len()],
        })
        .collect();

    let mut issues = Vec::new();
    for done in results {
        if done.fell_back {
            issues.push(fallback_issue(&done));
        }
        pages[done.page_index].sections[done.section_index] = done.content;
    }

    Ok(GenerationOutput { pages, issues })
}

/// Re-generate only the given `(page_slug, kind)` targets, for the
/// quality repair loop. Returns regenerated content keyed the same way.
#[instrument(skip_all, fields(targets = targets.len()))]
pub async fn regenerate_sections(
    client: Arc<dyn GenerativeClient>,
    targets: &[(String, SectionKind)],
    requirements: &Arc<Requirements>,
    profile: &Arc<IndustryProfile>,
    options: GenerateOptions,
    cancel: watch::Receiver<bool>,
    progress: &dyn SectionProgress,
) -> Result<(Vec<((String, SectionKind), SectionContent)>, Vec<QualityIssue>)> {
    let tasks: Vec<SectionTask> = targets
        .iter()
        .enumerate()
        .map(|(i, (slug, kind))| SectionTask {
            page_index: 0,
            section_index: i,
            page_slug: slug.clone(),
            kind: *kind,
        })
        .collect();

    let results = run_tasks(client, tasks, requirements, profile, options, cancel, progress).await?;

    let mut issues = Vec::new();
    let mut out = Vec::with_capacity(results.len());
    for done in results {
        if done.fell_back {
            issues.push(fallback_issue(&done));
        }
        out.push(((done.page_slug.clone(), done.kind), done.content));
    }

    Ok((out, issues))
}

// ---------------------------------------------------------------------------
// Task execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SectionTask {
    page_index: usize,
    section_index: usize,
    page_slug: String,
    kind: SectionKind,
}

#[derive(Debug)]
struct SectionDone {
    page_index: usize,
    section_index: usize,
    page_slug: String,
    kind: SectionKind,
    content: SectionContent,
    fell_back: bool,
    attempts: u32,
}

/// Fan tasks out under the concurrency limit, collect in completion
/// order, and bail out promptly on cancellation.
async fn run_tasks(
    client: Arc<dyn GenerativeClient>,
    tasks: Vec<SectionTask>,
    requirements: &Arc<Requirements>,
    profile: &Arc<IndustryProfile>,
    options: GenerateOptions,
    cancel: watch::Receiver<bool>,
    progress: &dyn SectionProgress,
) -> Result<Vec<SectionDone>> {
    let total = tasks.len();
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1) as usize));
    let (tx, mut rx) = mpsc::unbounded_channel::<SectionDone>();

    for task in tasks {
        let client = client.clone();
        let requirements = requirements.clone();
        let profile = profile.clone();
        let sem = semaphore.clone();
        let tx = tx.clone();
        let mut task_cancel = cancel.clone();
        let retry = options.retry;

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            if *task_cancel.borrow() {
                return;
            }

            tokio::select! {
                done = generate_one(client, task, &requirements, &profile, retry) => {
                    // Receiver gone means the run was abandoned.
                    let _ = tx.send(done);
                }
                _ = wait_cancelled(&mut task_cancel) => {
                    // In-flight call is dropped; its result is discarded.
                }
            }
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(total);
    let mut completed = 0usize;
    let mut collect_cancel = cancel.clone();
    let cancel_wait = wait_cancelled(&mut collect_cancel);
    tokio::pin!(cancel_wait);

    while results.len() < total {
        tokio::select! {
            maybe = rx.recv() => {
                match maybe {
                    Some(done) => {
                        completed += 1;
                        progress.section_done(
                            &done.page_slug,
                            done.kind,
                            completed,
                            total,
                            done.fell_back,
                        );
                        results.push(done);
                    }
                    // All senders dropped without a result: only happens
                    // under cancellation.
                    None => {
                        return Err(SiteForgeError::Cancelled {
                            stage: "generating".into(),
                        });
                    }
                }
            }
            _ = &mut cancel_wait => {
                return Err(SiteForgeError::Cancelled {
                    stage: "generating".into(),
                });
            }
        }
    }

    Ok(results)
}

/// Resolves only when cancellation is actually requested. A dropped
/// sender means cancellation can never arrive, so this pends forever.
async fn wait_cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Generate one section: copy text, then an image directive where the
/// section kind carries imagery. Each capability call goes through the
/// retry-then-fallback policy, so this never fails transiently.
async fn generate_one(
    client: Arc<dyn GenerativeClient>,
    task: SectionTask,
    requirements: &Requirements,
    profile: &IndustryProfile,
    retry: RetryPolicy,
) -> SectionDone {
    let label = format!("{}/{}", task.page_slug, task.kind);
    let context = business_context(requirements);

    let text_request = GenerativeRequest {
        kind: GenerativeKind::Text,
        prompt: text_prompt(task.kind, requirements, profile),
        context: context.clone(),
    };

    let text = retry_with_fallback(
        retry,
        &label,
        |_attempt| {
            let client = client.clone();
            let request = text_request.clone();
            async move { client.generate(&request).await.map(|r| r.content) }
        },
        || fallback_copy(task.kind, requirements, profile),
    )
    .await;

    let mut content = parse_section_text(task.kind, &text.value);
    content.from_fallback = text.fell_back;
    let mut fell_back = text.fell_back;
    let mut attempts = text.attempts;

    if let Some(slot) = image_slot(task.kind) {
        let image_request = GenerativeRequest {
            kind: GenerativeKind::Image,
            prompt: image_prompt(task.kind, requirements, profile),
            context,
        };

        let image = retry_with_fallback(
            retry,
            &label,
            |_attempt| {
                let client = client.clone();
                let request = image_request.clone();
                async move { client.generate(&request).await.map(|r| r.content) }
            },
            || fallback_image_prompt(requirements, profile),
        )
        .await;

        fell_back = fell_back || image.fell_back;
        attempts = attempts.max(image.attempts);

        content.images.push(ImageDirective {
            prompt: image.value,
            alt: image_alt(task.kind, requirements),
            slot: slot.to_string(),
        });

        // Gallery sections carry the profile's remaining imagery
        // directions as additional slots, no extra calls needed.
        if task.kind == SectionKind::Gallery {
            for (i, direction) in profile.imagery.iter().skip(1).enumerate() {
                content.images.push(ImageDirective {
                    prompt: format!("{direction}, for {}", requirements.business_name),
                    alt: format!("{} gallery image {}", requirements.business_name, i + 2),
                    slot: format!("inline-{}", i + 2),
                });
            }
        }
    }

    debug!(
        page = %task.page_slug,
        section = %task.kind,
        fell_back,
        attempts,
        "section generated"
    );

    SectionDone {
        page_index: task.page_index,
        section_index: task.section_index,
        page_slug: task.page_slug,
        kind: task.kind,
        content,
        fell_back,
        attempts,
    }
}

fn fallback_issue(done: &SectionDone) -> QualityIssue {
    QualityIssue {
        category: QualityCategory::Content,
        severity: Severity::Warning,
        message: format!(
            "section {}/{} used template fallback copy after {} attempts",
            done.page_slug, done.kind, done.attempts
        ),
        section: Some(format!("{}/{}", done.page_slug, done.kind)),
        suggested_fix: Some("regenerate this section when the generative service recovers".into()),
    }
}

// ---------------------------------------------------------------------------
// Prompt building
// ---------------------------------------------------------------------------

/// Structured business context forwarded with every request.
fn business_context(requirements: &Requirements) -> serde_json::Value {
    serde_json::json!({
        "business_name": requirements.business_name,
        "business_type": requirements.business_type,
        "location": requirements.location,
        "audience": requirements.audience,
        "tone": requirements.tone,
        "services": requirements.services.iter().map(|s| &s.name).collect::<Vec<_>>(),
    })
}

/// Target word count per section kind.
fn word_count(kind: SectionKind) -> u32 {
    match kind {
        SectionKind::Hero => 40,
        SectionKind::About => 120,
        SectionKind::Services | SectionKind::Pricing => 100,
        SectionKind::Faq => 150,
        SectionKind::Testimonials | SectionKind::Team => 80,
        SectionKind::Gallery | SectionKind::SocialLinks => 30,
        SectionKind::ContactForm | SectionKind::CallToAction => 40,
    }
}

fn section_instruction(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Hero => "a hero section: a striking headline and a short value proposition",
        SectionKind::Services => "a services overview: an intro and one line per service",
        SectionKind::About => "an about section telling the business's story",
        SectionKind::Testimonials => "a testimonials section with two short customer quotes",
        SectionKind::Gallery => "a short gallery introduction",
        SectionKind::Faq => "a FAQ section with three relevant questions and answers",
        SectionKind::Team => "a team introduction highlighting expertise",
        SectionKind::Pricing => "a pricing overview framing value over cost",
        SectionKind::ContactForm => "a contact section inviting visitors to get in touch",
        SectionKind::SocialLinks => "a short line inviting visitors to follow on social media",
        SectionKind::CallToAction => "a closing call to action with one clear next step",
    }
}

/// Build the copy prompt for one section.
fn text_prompt(kind: SectionKind, requirements: &Requirements, profile: &IndustryProfile) -> String {
    let services = if requirements.services.is_empty() {
        String::from("not specified")
    } else {
        requirements
            .services
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Write {} for the website of {}, a {}.\n\
         Audience: {}. Services: {services}.\n\
         Tone: {}; {}.\n\
         Aim for about {} words.\n\
         Return the headline on the first line, then the body. Prefix list items with \"- \".",
        section_instruction(kind),
        requirements.business_name,
        if requirements.business_type.is_empty() {
            "local business"
        } else {
            &requirements.business_type
        },
        requirements.audience.as_deref().unwrap_or("general visitors"),
        requirements.tone.as_deref().unwrap_or("professional"),
        profile.tone_guidance,
        word_count(kind),
    )
}

/// Which asset slot a section's image fills, if any.
fn image_slot(kind: SectionKind) -> Option<&'static str> {
    match kind {
        SectionKind::Hero => Some("background"),
        SectionKind::About | SectionKind::Gallery => Some("inline"),
        _ => None,
    }
}

fn image_prompt(kind: SectionKind, requirements: &Requirements, profile: &IndustryProfile) -> String {
    let direction = profile
        .imagery
        .first()
        .map(String::as_str)
        .unwrap_or("professional photograph");
    format!(
        "Refine this image direction for the {} section of {}'s website: {direction}. \
         Return a single detailed image generation prompt.",
        kind, requirements.business_name,
    )
}

fn image_alt(kind: SectionKind, requirements: &Requirements) -> String {
    format!("{} {} image", requirements.business_name, kind.as_str().replace('_', " "))
}

// ---------------------------------------------------------------------------
// Fallbacks and parsing
// ---------------------------------------------------------------------------

/// Deterministic template copy used when retries are exhausted.
/// Never empty, derived from the profile's tone guidance and the
/// normalized requirements.
fn fallback_copy(kind: SectionKind, requirements: &Requirements, profile: &IndustryProfile) -> String {
    let name = &requirements.business_name;
    let location = requirements
        .location
        .as_deref()
        .map(|l| format!(" in {l}"))
        .unwrap_or_default();

    match kind {
        SectionKind::Hero => format!(
            "{name}\n\nQuality you can count on{location}. We put our customers first, every time."
        ),
        SectionKind::Services => {
            let mut body = format!("What we offer\n\nAt {name}, every service is delivered with care."
            );
            for service in &requirements.services {
                if service.description.is_empty() {
                    body.push_str(&format!("\n- {}", service.name));
                } else {
                    body.push_str(&format!("\n- {}: {}", service.name, service.description));
                }
            }
            body
        }
        SectionKind::About => format!(
            "About {name}\n\n{name} serves its community{location} with a simple promise: honest \
             work and real results. Our copy voice is {}.",
            profile.tone_guidance
        ),
        SectionKind::Testimonials => format!(
            "What our customers say\n\n- \"Working with {name} was a great decision.\"\n- \"Professional from start to finish.\""
        ),
        SectionKind::Gallery => format!("Our work\n\nA look at what {name} does best."),
        SectionKind::Faq => format!(
            "Frequently asked questions\n\n- How do I get started? Reach out through the contact \
             form and {name} will respond promptly.\n- Where are you located? We serve \
             customers{location}.\n- What makes you different? Care and consistency in every detail."
        ),
        SectionKind::Team => format!("Meet the team\n\nThe people behind {name} bring experience and dedication to every project."),
        SectionKind::Pricing => format!("Pricing\n\nFair, transparent pricing from {name}. Contact us for a tailored quote."),
        SectionKind::ContactForm => format!("Get in touch\n\nSend {name} a message and we will get back to you soon."),
        SectionKind::SocialLinks => format!("Follow along\n\nKeep up with {name} on social media."),
        SectionKind::CallToAction => format!("Ready to get started?\n\nContact {name} today."),
    }
}

fn fallback_image_prompt(requirements: &Requirements, profile: &IndustryProfile) -> String {
    let direction = profile
        .imagery
        .first()
        .map(String::as_str)
        .unwrap_or("professional photograph, natural light");
    format!("{direction}, representing {}", requirements.business_name)
}

/// Parse capability output into structured section content: first
/// non-empty line is the headline, `- `/`* ` lines become bullets, the
/// rest joins into the body.
fn parse_section_text(kind: SectionKind, text: &str) -> SectionContent {
    let mut headline = String::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut bullets: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if headline.is_empty() {
            headline = trimmed.trim_start_matches('#').trim().to_string();
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            bullets.push(item.trim().to_string());
        } else {
            body_lines.push(trimmed);
        }
    }

    if headline.is_empty() {
        headline = text.trim().to_string();
    }
    let mut body = body_lines.join(" ");
    if body.is_empty() {
        body = headline.clone();
    }

    SectionContent {
        kind,
        headline,
        body,
        bullets,
        images: vec![],
        from_fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenerativeResponse;
    use async_trait::async_trait;
    use siteforge_profiles::{ProfileRegistry, plan_pages};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn requirements() -> Arc<Requirements> {
        Arc::new(Requirements {
            business_name: "Aurora Design Studio".into(),
            business_type: "design studio".into(),
            location: Some("Portland".into()),
            audience: Some("small businesses".into()),
            tone: Some("professional".into()),
            services: vec![],
            pages: vec!["Home".into()],
            brand_colors: None,
            style_keywords: vec![],
            features: vec![],
        })
    }

    fn profile() -> Arc<IndustryProfile> {
        Arc::new(ProfileRegistry::new().get("creative").unwrap().clone())
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            concurrency: 4,
            retry: RetryPolicy {
                max_attempts: 3,
                backoff_base: std::time::Duration::from_millis(1),
            },
        }
    }

    fn no_cancel() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    /// Always succeeds with a canned blob.
    struct StaticClient;

    #[async_trait]
    impl GenerativeClient for StaticClient {
        async fn generate(&self, request: &GenerativeRequest) -> Result<GenerativeResponse> {
            Ok(GenerativeResponse {
                content: match request.kind {
                    GenerativeKind::Text => {
                        "Generated Headline\n\nGenerated body copy.\n- first\n- second".into()
                    }
                    GenerativeKind::Image => "a refined image prompt".into(),
                },
            })
        }
    }

    /// Always fails with a transient signal.
    struct DownClient;

    #[async_trait]
    impl GenerativeClient for DownClient {
        async fn generate(&self, _request: &GenerativeRequest) -> Result<GenerativeResponse> {
            Err(SiteForgeError::Generation("service unavailable".into()))
        }
    }

    /// Fails a fixed number of times, then succeeds.
    struct FlakyClient {
        failures: AtomicU32,
    }

    #[async_trait]
    impl GenerativeClient for FlakyClient {
        async fn generate(&self, _request: &GenerativeRequest) -> Result<GenerativeResponse> {
            if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| {
                if f > 0 { Some(f - 1) } else { None }
            }).is_ok() {
                return Err(SiteForgeError::Generation("rate limited".into()));
            }
            Ok(GenerativeResponse {
                content: "Third Attempt Headline\n\nBody from the succeeding attempt.".into(),
            })
        }
    }

    #[tokio::test]
    async fn all_sections_generated_in_plan_order() {
        let plans = plan_pages(&profile(), &requirements());
        let output = generate_sections(
            Arc::new(StaticClient),
            &plans,
            &requirements(),
            &profile(),
            options(),
            no_cancel(),
            &SilentSectionProgress,
        )
        .await
        .unwrap();

        assert_eq!(output.pages.len(), 1);
        let kinds: Vec<_> = output.pages[0].sections.iter().map(|s| s.kind).collect();
        let planned: Vec<_> = plans[0].sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, planned);
        assert!(output.issues.is_empty());
        for section in &output.pages[0].sections {
            assert_eq!(section.headline, "Generated Headline");
            assert!(!section.from_fallback);
        }
    }

    #[tokio::test]
    async fn hero_gets_an_image_directive() {
        let plans = plan_pages(&profile(), &requirements());
        let output = generate_sections(
            Arc::new(StaticClient),
            &plans,
            &requirements(),
            &profile(),
            options(),
            no_cancel(),
            &SilentSectionProgress,
        )
        .await
        .unwrap();

        let hero = &output.pages[0].sections[0];
        assert_eq!(hero.kind, SectionKind::Hero);
        assert_eq!(hero.images.len(), 1);
        assert_eq!(hero.images[0].slot, "background");
        assert_eq!(hero.images[0].prompt, "a refined image prompt");
        assert!(!hero.images[0].alt.is_empty());
    }

    #[tokio::test]
    async fn total_outage_falls_back_with_one_issue_per_section() {
        // The always-failing capability still yields non-empty copy for
        // every section, one warning issue each.
        let plans = plan_pages(&profile(), &requirements());
        let section_count = plans[0].sections.len();
        let output = generate_sections(
            Arc::new(DownClient),
            &plans,
            &requirements(),
            &profile(),
            options(),
            no_cancel(),
            &SilentSectionProgress,
        )
        .await
        .unwrap();

        assert_eq!(output.issues.len(), section_count);
        for section in &output.pages[0].sections {
            assert!(section.from_fallback);
            assert!(!section.headline.is_empty());
            assert!(!section.body.is_empty());
        }
        for issue in &output.issues {
            assert_eq!(issue.severity, Severity::Warning);
            assert!(issue.section.is_some());
        }
    }

    #[tokio::test]
    async fn third_attempt_success_records_no_issue() {
        // Scenario: fails twice, succeeds on the third attempt.
        let targets = vec![("home".to_string(), SectionKind::CallToAction)];
        let client = Arc::new(FlakyClient {
            failures: AtomicU32::new(2),
        });
        let (results, issues) = regenerate_sections(
            client,
            &targets,
            &requirements(),
            &profile(),
            options(),
            no_cancel(),
            &SilentSectionProgress,
        )
        .await
        .unwrap();

        assert!(issues.is_empty());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.headline, "Third Attempt Headline");
        assert!(!results[0].1.from_fallback);
    }

    #[tokio::test]
    async fn exhausted_retries_use_fallback_with_exactly_one_issue() {
        // Scenario: fails on all attempts for a single section.
        let targets = vec![("home".to_string(), SectionKind::CallToAction)];
        let (results, issues) = regenerate_sections(
            Arc::new(DownClient),
            &targets,
            &requirements(),
            &profile(),
            options(),
            no_cancel(),
            &SilentSectionProgress,
        )
        .await
        .unwrap();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].section.as_deref().unwrap().contains("call_to_action"));
        assert!(results[0].1.from_fallback);
        assert!(!results[0].1.headline.is_empty());
    }

    #[tokio::test]
    async fn cancellation_aborts_generation() {
        let plans = plan_pages(&profile(), &requirements());
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = generate_sections(
            Arc::new(StaticClient),
            &plans,
            &requirements(),
            &profile(),
            options(),
            rx,
            &SilentSectionProgress,
        )
        .await;

        assert!(matches!(result, Err(SiteForgeError::Cancelled { .. })));
    }

    #[test]
    fn parse_extracts_headline_body_bullets() {
        let content = parse_section_text(
            SectionKind::Services,
            "# Our Services\n\nEverything you need.\n- Branding\n- Web design\nMore body.",
        );
        assert_eq!(content.headline, "Our Services");
        assert_eq!(content.body, "Everything you need. More body.");
        assert_eq!(content.bullets, vec!["Branding", "Web design"]);
    }

    #[test]
    fn parse_never_yields_empty_copy() {
        let content = parse_section_text(SectionKind::Hero, "Just one line");
        assert_eq!(content.headline, "Just one line");
        assert_eq!(content.body, "Just one line");
    }

    #[test]
    fn fallback_copy_mentions_services() {
        let mut req = (*requirements()).clone();
        req.services = vec![siteforge_shared::ServiceOffering {
            name: "Brand Identity".into(),
            description: "logos and guidelines".into(),
        }];
        let copy = fallback_copy(SectionKind::Services, &req, &profile());
        assert!(copy.contains("Brand Identity"));
        assert!(copy.contains("logos and guidelines"));
    }
}
