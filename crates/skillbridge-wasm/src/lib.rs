//! WASM bindings for resume scoring.
//!
//! This crate lets a browser UI run the analysis engine locally; documents
//! never leave the page.

use wasm_bindgen::prelude::*;

use skillbridge_core::analysis::{ACADEMIC_YEARS, BRANCHES, ROLE_MENU};
use skillbridge_core::{
    AnalysisRequest, Document, DocumentTextExtractor, ResumeAnalyzer, ResumeScore,
    SkillbridgeConfig, TextExtractor,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn build_request(role: String, year: Option<String>, branch: Option<String>) -> AnalysisRequest {
    let mut request = AnalysisRequest::new(role);
    if let Some(year) = year {
        request = request.with_academic_year(year);
    }
    if let Some(branch) = branch {
        request = request.with_branch(branch);
    }
    request
}

fn score_document(
    analyzer: &ResumeAnalyzer,
    data: &[u8],
    media_type: &str,
    file_name: &str,
    request: &AnalysisRequest,
) -> ResumeScore {
    analyzer.analyze_request(&Document::new(data, media_type, file_name), request)
}

/// Score a resume file.
///
/// `media_type` and `file_name` come from the browser `File`. Resolves to a
/// `ResumeScore`; the promise only rejects if the result cannot be converted.
#[wasm_bindgen(js_name = analyzeResume)]
pub async fn analyze_resume(
    data: js_sys::Uint8Array,
    media_type: String,
    file_name: String,
    role: String,
    year: Option<String>,
    branch: Option<String>,
) -> Result<JsValue, JsValue> {
    let bytes = data.to_vec();
    let request = build_request(role, year, branch);
    let score = score_document(
        &ResumeAnalyzer::new(),
        &bytes,
        &media_type,
        &file_name,
        &request,
    );
    to_js(&score)
}

/// Score already extracted text.
#[wasm_bindgen(js_name = analyzeText)]
pub fn analyze_text(text: &str, role: &str) -> Result<JsValue, JsValue> {
    to_js(&ResumeAnalyzer::new().analyze_text(text, role))
}

/// Extract plain text from a document.
#[wasm_bindgen(js_name = extractText)]
pub fn extract_text(data: &[u8], media_type: &str, file_name: &str) -> String {
    DocumentTextExtractor::new().extract(&Document::new(data, media_type, file_name))
}

/// Role, academic year and branch menus for the form.
#[wasm_bindgen(js_name = roleMenu)]
pub fn role_menu() -> Result<JsValue, JsValue> {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Menus {
        roles: Vec<&'static str>,
        academic_years: Vec<&'static str>,
        branches: Vec<&'static str>,
    }

    to_js(&Menus {
        roles: ROLE_MENU.to_vec(),
        academic_years: ACADEMIC_YEARS.to_vec(),
        branches: BRANCHES.to_vec(),
    })
}

/// Resume analyzer class for browser use.
#[wasm_bindgen]
pub struct ResumeAnalyzerJs {
    analyzer: ResumeAnalyzer,
}

#[wasm_bindgen]
impl ResumeAnalyzerJs {
    /// Create an analyzer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            analyzer: ResumeAnalyzer::new(),
        }
    }

    /// Create an analyzer from a JSON configuration string.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<ResumeAnalyzerJs, JsValue> {
        let config: SkillbridgeConfig =
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let analyzer =
            ResumeAnalyzer::with_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { analyzer })
    }

    /// Score a resume file.
    pub fn analyze(
        &self,
        data: &[u8],
        media_type: &str,
        file_name: &str,
        role: String,
        year: Option<String>,
        branch: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let request = build_request(role, year, branch);
        to_js(&score_document(
            &self.analyzer,
            data,
            media_type,
            file_name,
            &request,
        ))
    }

    /// Score a resume file and include sections, warnings and timing.
    #[wasm_bindgen(js_name = analyzeDetailed)]
    pub fn analyze_detailed(
        &self,
        data: &[u8],
        media_type: &str,
        file_name: &str,
        role: &str,
    ) -> Result<JsValue, JsValue> {
        let document = Document::new(data, media_type, file_name);
        to_js(&self.analyzer.analyze_detailed(&document, role))
    }

    /// Score already extracted text.
    #[wasm_bindgen(js_name = analyzeText)]
    pub fn analyze_text(&self, text: &str, role: &str) -> Result<JsValue, JsValue> {
        to_js(&self.analyzer.analyze_text(text, role))
    }

    /// Whether a role has a built-in or configured profile.
    #[wasm_bindgen(js_name = hasProfile)]
    pub fn has_profile(&self, role: &str) -> bool {
        self.analyzer.corpus().has_profile(role)
    }
}

impl Default for ResumeAnalyzerJs {
    fn default() -> Self {
        Self::new()
    }
}
