/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

/// How security requirements declared on an operation are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthenticationMode {
    /// Skip every security check; authentication happens upstream.
    #[default]
    Noop,
    /// Report a security error for each declared scheme whose credential is absent.
    RequireCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Collect every violation instead of stopping at the first.
    pub multi_error: bool,
    pub authentication_mode: AuthenticationMode,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            multi_error: true,
            authentication_mode: AuthenticationMode::Noop,
        }
    }
}

impl ValidationOptions {
    pub fn first_error_only() -> Self {
        Self {
            multi_error: false,
            ..Self::default()
        }
    }
}
