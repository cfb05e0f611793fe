/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

use crate::document::{NamedSecurityScheme, SecurityScheme};
use crate::request::RequestView;
use crate::tree::ValidationError;

/// Report each declared scheme whose credential header is absent.
pub fn check_security(schemes: &[NamedSecurityScheme], request: &RequestView) -> Vec<ValidationError> {
    schemes
        .iter()
        .filter_map(|named| {
            let reason = match &named.scheme {
                SecurityScheme::ApiKeyHeader { header } => request
                    .header(header)
                    .is_none()
                    .then(|| format!("header '{header}' is missing")),
                SecurityScheme::Http { scheme } => match request.header("authorization") {
                    None => Some("authorization header is missing".to_string()),
                    Some(value) if !scheme.is_empty() && !has_scheme(value, scheme) => {
                        Some(format!("authorization header does not use the '{scheme}' scheme"))
                    }
                    Some(_) => None,
                },
                SecurityScheme::Unsupported { kind } => {
                    Some(format!("security scheme type '{kind}' cannot be checked"))
                }
            }?;
            Some(ValidationError::Security {
                scheme: named.name.clone(),
                reason,
            })
        })
        .collect()
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .split_whitespace()
        .next()
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, scheme: SecurityScheme) -> NamedSecurityScheme {
        NamedSecurityScheme {
            name: name.to_string(),
            scheme,
        }
    }

    #[test]
    fn test_api_key_header() {
        let schemes = vec![named(
            "api_key",
            SecurityScheme::ApiKeyHeader {
                header: "authorization".to_string(),
            },
        )];
        let request = RequestView::new("POST", "/delta/officers");
        let errors = check_security(&schemes, &request);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ValidationError::Security { scheme, .. } if scheme == "api_key"));

        let request = request.with_header("Authorization", "secret");
        assert!(check_security(&schemes, &request).is_empty());
    }

    #[test]
    fn test_http_bearer_scheme() {
        let schemes = vec![named(
            "bearer",
            SecurityScheme::Http {
                scheme: "bearer".to_string(),
            },
        )];
        let ok = RequestView::new("POST", "/").with_header("authorization", "Bearer abc");
        assert!(check_security(&schemes, &ok).is_empty());

        let wrong = RequestView::new("POST", "/").with_header("authorization", "Basic abc");
        assert_eq!(check_security(&schemes, &wrong).len(), 1);
    }
}
