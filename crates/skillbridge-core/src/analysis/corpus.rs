//! Static role corpus: per-role skill and keyword lists plus a generic
//! technical-term list, with every term's matcher compiled once.

use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::debug;

use super::patterns::WordMatcher;
use crate::error::{Result, SkillbridgeError};
use crate::models::config::RoleProfileConfig;

const SOFTWARE_ENGINEER_SKILLS: &[&str] = &[
    "Python", "Java", "C++", "JavaScript", "TypeScript", "React", "Node.js",
    "SQL", "NoSQL", "System Design", "Data Structures", "Algorithms", "OOP",
    "Git", "Docker", "Kubernetes", "CI/CD", "Testing", "NumPy", "Pandas",
    "Matplotlib", "PyTorch", "TensorFlow", "Mathematica", "HTML", "CSS",
    "MongoDB", "PostgreSQL", "AWS", "Azure", "GCP", "REST API", "GraphQL",
];

const SOFTWARE_ENGINEER_KEYWORDS: &[&str] = &[
    "algorithm", "data structure", "design pattern", "software", "development",
    "programming", "backend", "frontend", "full stack", "microservice", "api",
    "rest", "sql", "nosql", "docker", "kubernetes", "ci/cd", "test", "react",
    "node", "python", "java", "c++", "web", "application", "code", "engineer",
];

const DATA_ANALYST_SKILLS: &[&str] = &[
    "SQL", "Python", "R", "Excel", "Tableau", "Power BI", "Pandas", "NumPy",
    "Statistics", "Data Visualization", "Matplotlib", "Seaborn", "SAS", "SPSS",
];

const DATA_ANALYST_KEYWORDS: &[&str] = &[
    "data analysis", "sql", "python", "pandas", "numpy", "excel", "tableau",
    "power bi", "statistics", "statistical", "sql query", "database",
    "data warehouse", "etl", "analytics", "business intelligence",
    "visualization", "regression", "forecast", "dashboard", "report",
];

const PRODUCT_MANAGER_SKILLS: &[&str] = &[
    "Product Strategy", "Roadmapping", "User Research", "Analytics",
    "Stakeholder Management", "Communication", "Agile", "Scrum", "Jira",
    "A/B Testing", "Market Research", "Wireframing", "Figma",
];

const PRODUCT_MANAGER_KEYWORDS: &[&str] = &[
    "product", "management", "strategy", "user research", "roadmap", "feature",
    "stakeholder", "requirement", "agile", "scrum", "ux", "user experience",
    "product design", "metrics", "kpi", "market", "launch", "mvp",
];

const ML_ENGINEER_SKILLS: &[&str] = &[
    "Python", "TensorFlow", "PyTorch", "Scikit-learn", "Machine Learning",
    "Deep Learning", "NLP", "Computer Vision", "Statistics", "Keras",
    "OpenCV", "Hugging Face", "LLM", "Neural Networks", "CNN", "RNN",
];

const ML_ENGINEER_KEYWORDS: &[&str] = &[
    "machine learning", "deep learning", "neural network", "nlp",
    "computer vision", "tensorflow", "pytorch", "scikit-learn", "python",
    "ml", "classification", "regression", "clustering", "model", "training",
    "feature engineering", "data preprocessing", "ai", "artificial intelligence",
];

/// Role-independent technical terms, lowercase.
const GENERIC_TERMS: &[&str] = &[
    // Languages
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang",
    "rust", "ruby", "php", "swift", "kotlin", "scala", "r", "matlab", "perl",
    // Web
    "react", "angular", "vue", "vue.js", "next.js", "nextjs", "node", "node.js",
    "express", "django", "flask", "spring", "spring boot", "laravel", "rails",
    "html", "css", "sass", "scss", "tailwind", "bootstrap", "jquery",
    // Databases
    "sql", "mysql", "postgresql", "postgres", "mongodb", "redis", "elasticsearch",
    "oracle", "sqlite", "dynamodb", "cassandra", "firebase", "supabase",
    // Cloud and DevOps
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "k8s",
    "jenkins", "gitlab", "github actions", "terraform", "ansible", "ci/cd",
    // Data science and ML
    "pandas", "numpy", "scipy", "matplotlib", "seaborn", "tensorflow", "pytorch",
    "keras", "scikit-learn", "sklearn", "opencv", "nlp", "machine learning",
    "deep learning", "data science", "artificial intelligence", "ai",
    // Tools
    "git", "jira", "confluence", "figma", "sketch", "adobe", "photoshop",
    "excel", "tableau", "power bi", "looker", "jupyter", "vscode",
    // Concepts
    "rest api", "graphql", "microservices", "agile", "scrum", "kanban",
    "oop", "tdd", "unit testing", "integration testing", "api",
];

const BUILTIN_PROFILES: &[(&str, &[&str], &[&str])] = &[
    ("Software Engineer", SOFTWARE_ENGINEER_SKILLS, SOFTWARE_ENGINEER_KEYWORDS),
    ("Data Analyst", DATA_ANALYST_SKILLS, DATA_ANALYST_KEYWORDS),
    ("Product Manager", PRODUCT_MANAGER_SKILLS, PRODUCT_MANAGER_KEYWORDS),
    ("ML Engineer", ML_ENGINEER_SKILLS, ML_ENGINEER_KEYWORDS),
];

lazy_static! {
    static ref BUILTIN: Arc<RoleCorpus> = Arc::new(RoleCorpus::from_tables(&[]).unwrap());
}

/// Skill and keyword lists for one role.
#[derive(Debug, Clone)]
pub struct RoleProfile {
    name: String,
    skills: Vec<WordMatcher>,
    keywords: Vec<WordMatcher>,
}

impl RoleProfile {
    pub fn new<S: AsRef<str>>(name: &str, skills: &[S], keywords: &[S]) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            skills: compile_terms(skills)?,
            keywords: compile_terms(keywords)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Skills in curated order.
    pub fn skills(&self) -> &[WordMatcher] {
        &self.skills
    }

    /// Keyword phrases in curated order.
    pub fn keywords(&self) -> &[WordMatcher] {
        &self.keywords
    }

    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(WordMatcher::term)
    }

    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(WordMatcher::term)
    }
}

/// Read-only lookup of role profiles and generic technical terms.
#[derive(Debug, Clone)]
pub struct RoleCorpus {
    profiles: Vec<RoleProfile>,
    generic: Vec<WordMatcher>,
}

impl RoleCorpus {
    /// The built-in corpus, compiled on first use and shared.
    pub fn builtin() -> Arc<RoleCorpus> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in corpus with extra profiles merged over it.
    ///
    /// An extra profile replaces a built-in profile of the same name.
    pub fn with_extra_roles(extra: &[RoleProfileConfig]) -> Result<Self> {
        Self::from_tables(extra)
    }

    fn from_tables(extra: &[RoleProfileConfig]) -> Result<Self> {
        let mut profiles = BUILTIN_PROFILES
            .iter()
            .map(|&(name, skills, keywords)| RoleProfile::new(name, skills, keywords))
            .collect::<Result<Vec<_>>>()?;

        for role in extra {
            let profile =
                RoleProfile::new(&role.name, role.skills.as_slice(), role.keywords.as_slice())?;
            match profiles.iter_mut().find(|p| p.name == role.name) {
                Some(existing) => *existing = profile,
                None => profiles.push(profile),
            }
            debug!("Loaded role profile: {}", role.name);
        }

        Ok(Self {
            profiles,
            generic: compile_terms(GENERIC_TERMS)?,
        })
    }

    /// Profile for an exact role name. Unknown roles are legal and yield `None`.
    pub fn profile(&self, role: &str) -> Option<&RoleProfile> {
        self.profiles.iter().find(|p| p.name == role)
    }

    pub fn has_profile(&self, role: &str) -> bool {
        self.profile(role).is_some()
    }

    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }

    /// Generic technical terms, lowercase, in corpus order.
    pub fn generic_terms(&self) -> &[WordMatcher] {
        &self.generic
    }
}

fn compile_terms<S: AsRef<str>>(terms: &[S]) -> Result<Vec<WordMatcher>> {
    terms
        .iter()
        .map(|term| {
            WordMatcher::new(term.as_ref()).map_err(|e| {
                SkillbridgeError::Config(format!("invalid term {:?}: {}", term.as_ref(), e))
            })
        })
        .collect()
}
