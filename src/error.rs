//! Errors raised while talking to PokeAPI or decoding its payloads.

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguished_for_logging() {
        let err = ApiError::NotFound("https://pokeapi.co/api/v2/pokemon/missingno".into());
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "not found: https://pokeapi.co/api/v2/pokemon/missingno"
        );
    }

    #[test]
    fn image_errors_are_not_not_found() {
        let err = ApiError::Image("unsupported format".into());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "image decode error: unsupported format");
    }

    #[test]
    fn parse_errors_convert() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ApiError = parse.into();
        assert!(err.to_string().starts_with("response parse error"));
    }
}
