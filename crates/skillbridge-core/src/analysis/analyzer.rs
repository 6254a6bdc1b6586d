//! Score aggregation and the analysis failure boundary.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::corpus::RoleCorpus;
use super::scorers::{default_scorers, ScoringContext, SubScorer};
use super::sections::SectionMap;
use super::{skills, strengths};
use crate::error::{AnalysisError, Result};
use crate::extract::{DocumentTextExtractor, TextExtractor, LOW_TEXT_THRESHOLD};
use crate::models::config::SkillbridgeConfig;
use crate::models::document::{AnalysisRequest, Document};
use crate::models::score::{ResumeScore, ScoreBreakdown};
use crate::timing::Stopwatch;

/// Detailed outcome of one analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The score returned to the caller.
    pub score: ResumeScore,
    /// Length of the extracted text in characters.
    pub extracted_length: usize,
    /// Sections found in the extracted text.
    pub sections: SectionMap,
    /// Analysis warnings.
    pub warnings: Vec<String>,
    /// Whether `score` is the fixed fallback result.
    pub used_fallback: bool,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

struct Scored {
    score: ResumeScore,
    sections: SectionMap,
    extracted_length: usize,
    warnings: Vec<String>,
}

/// Resume analysis pipeline: extraction, segmentation, scoring and skill matching.
///
/// Holds only immutable state and can be shared across threads.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    corpus: Arc<RoleCorpus>,
    extractor: Arc<dyn TextExtractor>,
    scorers: Vec<Arc<dyn SubScorer>>,
}

impl ResumeAnalyzer {
    /// Create an analyzer over the built-in corpus with default settings.
    pub fn new() -> Self {
        Self {
            corpus: RoleCorpus::builtin(),
            extractor: Arc::new(DocumentTextExtractor::new()),
            scorers: default_scorers(),
        }
    }

    /// Create an analyzer from a configuration.
    pub fn with_config(config: &SkillbridgeConfig) -> Result<Self> {
        let corpus = if config.analysis.extra_roles.is_empty() {
            RoleCorpus::builtin()
        } else {
            Arc::new(RoleCorpus::with_extra_roles(&config.analysis.extra_roles)?)
        };

        Ok(Self::new()
            .with_corpus(corpus)
            .with_extractor(DocumentTextExtractor::new().with_config(config.extraction.clone())))
    }

    /// Use a different role corpus.
    pub fn with_corpus(mut self, corpus: Arc<RoleCorpus>) -> Self {
        self.corpus = corpus;
        self
    }

    /// Use a different text extractor.
    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replace the scorer for the component `scorer` fills.
    pub fn with_scorer(mut self, scorer: impl SubScorer + 'static) -> Self {
        let component = scorer.component();
        self.scorers.retain(|s| s.component() != component);
        self.scorers.push(Arc::new(scorer));
        self
    }

    pub fn corpus(&self) -> &RoleCorpus {
        &self.corpus
    }

    /// Analyze a document for a role. Never fails.
    pub fn analyze(&self, document: &Document<'_>, role: &str) -> ResumeScore {
        self.analyze_detailed(document, role).score
    }

    /// Analyze a document for a full request.
    ///
    /// Academic year and branch are accepted but do not affect the score.
    pub fn analyze_request(
        &self,
        document: &Document<'_>,
        request: &AnalysisRequest,
    ) -> ResumeScore {
        debug!(
            "Request year={:?} branch={:?} (not used for scoring)",
            request.academic_year, request.branch
        );
        self.analyze(document, &request.role)
    }

    /// Analyze a document and report intermediate results.
    pub fn analyze_detailed(&self, document: &Document<'_>, role: &str) -> AnalysisReport {
        info!("Analyzing {} for role {:?}", document.file_name, role);
        self.guarded(|| {
            let text = self.extractor.extract(document);
            self.score_text(&text, role)
        })
    }

    /// Analyze already extracted text. Never fails.
    pub fn analyze_text(&self, text: &str, role: &str) -> ResumeScore {
        self.analyze_text_detailed(text, role).score
    }

    pub fn analyze_text_detailed(&self, text: &str, role: &str) -> AnalysisReport {
        self.guarded(|| self.score_text(text, role))
    }

    /// Run one analysis, converting errors and panics into the fallback result.
    fn guarded(&self, run: impl FnOnce() -> Result<Scored>) -> AnalysisReport {
        let stopwatch = Stopwatch::start();

        let outcome = match panic::catch_unwind(AssertUnwindSafe(run)) {
            Ok(result) => result,
            Err(payload) => Err(AnalysisError::Panicked(panic_message(payload.as_ref())).into()),
        };

        let processing_time_ms = stopwatch.elapsed_ms();
        match outcome {
            Ok(scored) => {
                info!(
                    "Analysis complete: score {} in {}ms",
                    scored.score.score, processing_time_ms
                );
                AnalysisReport {
                    score: scored.score,
                    extracted_length: scored.extracted_length,
                    sections: scored.sections,
                    warnings: scored.warnings,
                    used_fallback: false,
                    processing_time_ms,
                }
            }
            Err(e) => {
                warn!("Analysis failed, using fallback result: {}", e);
                AnalysisReport {
                    score: ResumeScore::fallback(),
                    extracted_length: 0,
                    sections: SectionMap::default(),
                    warnings: vec![e.to_string()],
                    used_fallback: true,
                    processing_time_ms,
                }
            }
        }
    }

    fn score_text(&self, text: &str, role: &str) -> Result<Scored> {
        let mut warnings = Vec::new();
        let extracted_length = text.chars().count();
        if extracted_length < LOW_TEXT_THRESHOLD {
            warn!(
                "Very short resume text ({} chars), may indicate a parsing issue",
                extracted_length
            );
            warnings.push(format!("very little text extracted ({extracted_length} characters)"));
        }

        let lower = text.to_lowercase();
        let sections = SectionMap::segment(text);
        debug!("Found {} sections", sections.len());

        let profile = self.corpus.profile(role);
        if profile.is_none() {
            debug!("No profile for role {:?}, using fallback constants", role);
        }

        let ctx = ScoringContext::new(text, &lower, &sections, role, profile);
        let mut breakdown = ScoreBreakdown::default();
        for scorer in &self.scorers {
            let component = scorer.component();
            let value = scorer.score(&ctx);
            if !value.is_finite() || value < 0.0 || value > component.max() {
                return Err(AnalysisError::ScoreOutOfRange {
                    component,
                    value,
                    max: component.max(),
                }
                .into());
            }
            breakdown.set(component, value);
        }
        debug!(
            "Breakdown: completeness={} relevance={} depth={} format={} (raw {})",
            breakdown.completeness,
            breakdown.role_relevance,
            breakdown.skill_depth,
            breakdown.format_quality,
            breakdown.total()
        );

        let role_skills = skills::matched_role_skills(profile, &lower);
        let technical_skills = skills::technical_skills(&self.corpus, profile, &lower);
        let missing_skills = skills::missing_skills(profile, &lower);
        let strengths = strengths::identify_strengths(
            profile.map(|_| role_skills.as_slice()),
            &technical_skills,
            &sections,
            &lower,
        );

        let score = ResumeScore {
            score: breakdown.overall(),
            strengths,
            missing_skills,
            technical_skills,
            breakdown,
        };

        let issues = score.validate();
        if !issues.is_empty() {
            return Err(AnalysisError::Malformed(issues).into());
        }

        Ok(Scored {
            score,
            sections,
            extracted_length,
            warnings,
        })
    }
}

impl Default for ResumeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorers::RoleRelevanceScorer;
    use crate::extract::pdf::tests::{build_pdf, text_at};
    use crate::models::config::RoleProfileConfig;
    use crate::models::score::{ScoreComponent, Strength, StrengthIcon};
    use pretty_assertions::assert_eq;

    const SCENARIO_B: &str = concat!(
        "Jane Doe | Software Engineer | jane@example.com\nEducation: Bachelor of Technology in ",
        "Computer Science, Indian Institute of Technology University, 2020 - 2024, GPA 9.1. ",
        "Coursework in algorithms, operating systems, databases and computer networks.\n",
        "Experience: Software Engineer Intern at Acme Corp, May 2023 - Dec 2023. I led a team of ",
        "four engineers building an internal analytics web application with a Python backend and ",
        "a React frontend, increased adoption by 40% across three departments, improved page ",
        "load time by 30% through SQL query tuning, and managed weekly releases with the product ",
        "team. Developed REST api endpoints for the reporting service and designed the data ",
        "model for audit logs. Backend Developer Intern at Beta Labs, Jan 2022 - Jun 2022. Built ",
        "a Python service that processed 2 million events per day, deployed it with Docker and ",
        "reduced infrastructure cost by 25%. Wrote unit test suites and raised test coverage ",
        "from 40% to 85%. Implemented a code review checklist adopted by the whole software ",
        "development team.\nSkills: Python, React, SQL, Docker\nAlso comfortable with Git, Linux, ",
        "Bash scripting and writing clear design documents for the team.\nProjects: Campus ",
        "Connect, a React and Python web application used by 3,000 students to share notes and ",
        "plan study groups. Optimized the SQL schema and created a Docker based deployment that ",
        "runs on a single small virtual machine. Expense Tracker, a mobile friendly web ",
        "application with a Python backend, built with a friend over a summer break; launched it ",
        "publicly and grew it to 500 monthly users through word of mouth and student forums.\n",
        "Certifications: Oracle Certified Associate Java Programmer (2022), Docker Certified ",
        "Associate (2023), first place in the inter-college hackathon (2022).\nInterests: chess, ",
        "long distance running, mentoring first year students in programming, and contributing ",
        "to open source Python libraries in my spare time. Languages: English, Hindi. References ",
        "available on request.\n",
    );

    struct PanickingScorer;

    impl SubScorer for PanickingScorer {
        fn component(&self) -> ScoreComponent {
            ScoreComponent::SkillDepth
        }

        fn score(&self, _ctx: &ScoringContext<'_>) -> f64 {
            panic!("scorer fault")
        }
    }

    struct NanScorer;

    impl SubScorer for NanScorer {
        fn component(&self) -> ScoreComponent {
            ScoreComponent::FormatQuality
        }

        fn score(&self, _ctx: &ScoringContext<'_>) -> f64 {
            f64::NAN
        }
    }

    struct OverflowingScorer;

    impl SubScorer for OverflowingScorer {
        fn component(&self) -> ScoreComponent {
            ScoreComponent::RoleRelevance
        }

        fn score(&self, _ctx: &ScoringContext<'_>) -> f64 {
            31.0
        }
    }

    #[test]
    fn test_empty_document() {
        let analyzer = ResumeAnalyzer::new();
        let document = Document::new(b"", "text/plain", "cv.txt");
        let result = analyzer.analyze(&document, "Software Engineer");

        assert_eq!(result.score, 35);
        assert_eq!(
            result.breakdown,
            ScoreBreakdown {
                completeness: 3.0,
                role_relevance: 10.0,
                skill_depth: 5.0,
                format_quality: 0.0,
            }
        );
        assert_eq!(
            result.strengths,
            vec![Strength::new("Well-Structured Resume", StrengthIcon::Briefcase)]
        );
        assert_eq!(
            result.missing_skills,
            vec!["Python", "Java", "C++", "JavaScript", "TypeScript"]
        );
        assert!(result.technical_skills.is_empty());
    }

    #[test]
    fn test_populated_resume() {
        let analyzer = ResumeAnalyzer::new();
        let report = analyzer.analyze_text_detailed(SCENARIO_B, "Software Engineer");
        let result = &report.score;

        assert!(!report.used_fallback);
        for skill in ["Python", "React", "SQL", "Docker"] {
            assert!(result.technical_skills.iter().any(|s| s == skill), "{skill}");
        }
        assert!(
            result
                .strengths
                .iter()
                .any(|s| ["Python", "React", "SQL", "Docker"].contains(&s.label.as_str()))
        );
        assert_eq!(result.breakdown.completeness, 24.0);
        assert_eq!(result.breakdown.role_relevance, 30.0);
        assert_eq!(result.breakdown.format_quality, 17.0);
        assert!(result.score >= 75, "score {} {:?}", result.score, result.breakdown);
    }

    #[test]
    fn test_sum_invariant_and_bounds() {
        let analyzer = ResumeAnalyzer::new();
        let roles = ["Software Engineer", "Data Analyst", "Product Manager", "ML Engineer", "Consultant"];
        for role in roles {
            let result = analyzer.analyze_text(SCENARIO_B, role);
            let raw = result.breakdown.total();
            assert_eq!(result.score, raw.clamp(35.0, 100.0).round() as u8);
            assert!((35..=100).contains(&result.score));
            assert!(!result.strengths.is_empty() && result.strengths.len() <= 4);
            assert!(result.missing_skills.len() <= 5);
            assert!(result.technical_skills.len() <= 25);
        }
    }

    #[test]
    fn test_unknown_role() {
        let result = ResumeAnalyzer::new().analyze_text(SCENARIO_B, "Consultant");
        assert_eq!(result.breakdown.role_relevance, 12.0);
        assert_eq!(result.breakdown.skill_depth, 10.0);
        assert!(result.missing_skills.is_empty());
        assert_eq!(
            result.strengths[0],
            Strength::new("Strong Academic Background", StrengthIcon::Graduation)
        );
        assert!(result.strengths.iter().all(|s| s.icon != StrengthIcon::Code));
    }

    #[test]
    fn test_deterministic() {
        let analyzer = ResumeAnalyzer::new();
        let document = Document::new(SCENARIO_B.as_bytes(), "text/plain", "cv.txt");
        assert_eq!(
            analyzer.analyze(&document, "Data Analyst"),
            analyzer.analyze(&document, "Data Analyst")
        );
    }

    #[test]
    fn test_present_role_skills_not_missing() {
        let analyzer = ResumeAnalyzer::new();
        let text = "Skills: C++, CI/CD, Node.js, REST API, Python";
        let result = analyzer.analyze_text(text, "Software Engineer");
        for skill in ["C++", "CI/CD", "Node.js", "REST API", "Python"] {
            assert!(result.technical_skills.iter().any(|s| s == skill), "{skill}");
            assert!(!result.missing_skills.iter().any(|s| s == skill), "{skill}");
        }
    }

    #[test]
    fn test_panicking_scorer_yields_fallback() {
        let analyzer = ResumeAnalyzer::new().with_scorer(PanickingScorer);
        let report = analyzer.analyze_text_detailed(SCENARIO_B, "Software Engineer");

        assert!(report.used_fallback);
        assert_eq!(report.score, ResumeScore::fallback());
        assert_eq!(report.score.score, 65);
        assert_eq!(report.score.breakdown, ScoreBreakdown::FALLBACK);
        assert!(report.warnings[0].contains("scorer fault"));
    }

    #[test]
    fn test_invalid_scores_yield_fallback() {
        let nan = ResumeAnalyzer::new().with_scorer(NanScorer);
        assert_eq!(nan.analyze_text(SCENARIO_B, "Software Engineer"), ResumeScore::fallback());

        let overflowing = ResumeAnalyzer::new().with_scorer(OverflowingScorer);
        assert_eq!(
            overflowing.analyze_text(SCENARIO_B, "Software Engineer"),
            ResumeScore::fallback()
        );
    }

    #[test]
    fn test_with_scorer_replaces_component() {
        let analyzer = ResumeAnalyzer::new().with_scorer(RoleRelevanceScorer);
        assert_eq!(analyzer.scorers.len(), 4);
    }

    #[test]
    fn test_pdf_document() {
        let mut ops = text_at(72, 700, "Skills");
        ops.extend(text_at(72, 680, "Python, SQL, Docker and Kubernetes"));
        let data = build_pdf(vec![ops]);

        let report = ResumeAnalyzer::new().analyze_detailed(
            &Document::new(&data, "application/pdf", "resume.pdf"),
            "Software Engineer",
        );
        assert!(!report.used_fallback);
        assert_eq!(
            report.sections.get(crate::analysis::SectionName::Skills),
            Some("Skills\nPython, SQL, Docker and Kubernetes")
        );
        assert_eq!(
            report.score.technical_skills,
            vec!["Python", "SQL", "Docker", "Kubernetes"]
        );
    }

    #[test]
    fn test_config_extra_roles() {
        let mut config = SkillbridgeConfig::default();
        config.analysis.extra_roles.push(RoleProfileConfig {
            name: "DevOps Engineer".to_string(),
            skills: vec!["Terraform".to_string(), "Ansible".to_string()],
            keywords: vec!["infrastructure".to_string()],
        });
        let analyzer = ResumeAnalyzer::with_config(&config).unwrap();
        let result = analyzer.analyze_text("Terraform for infrastructure", "DevOps Engineer");

        assert_eq!(result.missing_skills, vec!["Ansible"]);
        assert_eq!(result.breakdown.role_relevance, 30.0);
    }

    #[test]
    fn test_request_fields_are_inert() {
        let analyzer = ResumeAnalyzer::new();
        let document = Document::new(SCENARIO_B.as_bytes(), "text/plain", "cv.txt");
        let plain = analyzer.analyze(&document, "ML Engineer");
        let request = AnalysisRequest::new("ML Engineer")
            .with_academic_year("3")
            .with_branch("CSE");
        assert_eq!(analyzer.analyze_request(&document, &request), plain);
    }
}
