// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a single-file analysis request
pub fn validate_analyze_request(request: &AnalyzeRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a file-scoped chat request
pub fn validate_chat_request(request: &ChatRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a project-scoped chat request
pub fn validate_project_chat_request(request: &ProjectChatRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a repository URL before it is sent anywhere.
///
/// The backend only accepts public `https://github.com/{owner}/{repo}`
/// references, so malformed URLs are rejected client-side.
pub fn validate_repository_url(url_str: &str) -> Result<(), ApiContractError> {
    let url = url::Url::parse(url_str)?;
    if url.scheme() != "https" || url.host_str() != Some("github.com") {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "expected https://github.com/<owner>/<repo>, got {}",
            url_str
        )));
    }
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    if segments.len() < 2 {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "missing owner/repository path in {}",
            url_str
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use revu_domain_types::ModelChoice;

    #[test]
    fn empty_code_is_rejected() {
        let request = AnalyzeRequest {
            code: String::new(),
            model_choice: ModelChoice::Gpt4o,
        };
        assert!(validate_analyze_request(&request).is_err());
    }

    #[test]
    fn empty_question_is_rejected() {
        let request = ChatRequest {
            code: "print('hi')".to_string(),
            question: String::new(),
            session_id: "s-1".to_string(),
            model_choice: ModelChoice::Gpt4o,
        };
        assert!(validate_chat_request(&request).is_err());
    }

    #[test]
    fn repository_urls_must_point_at_github() {
        assert!(validate_repository_url("https://github.com/acme/demo").is_ok());
        assert!(validate_repository_url("https://github.com/acme/demo/tree/main").is_ok());
        assert!(validate_repository_url("https://gitlab.com/acme/demo").is_err());
        assert!(validate_repository_url("https://github.com/acme").is_err());
        assert!(validate_repository_url("not a url").is_err());
    }
}
