//! Static service metadata for `GET /` and `GET /info`.

use serde::{Deserialize, Serialize};

/// Application name shown by `/info`.
pub const APPLICATION_NAME: &str = "DevSecOps Demo App";

/// Message shown by `/`.
pub const ROOT_MESSAGE: &str = "DevSecOps CI/CD Pipeline Demo Application";

/// Description shown by `/info`.
pub const DESCRIPTION: &str = "Production-grade CI/CD pipeline with security scanning";

/// Feature list shown by `/info`.
pub const FEATURES: [&str; 5] = [
    "SAST with CodeQL",
    "SCA with OWASP Dependency Check",
    "Container scanning with Trivy",
    "Automated testing",
    "Code quality enforcement",
];

/// Paths of the public endpoints, as listed by `/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointPaths {
    /// Liveness endpoint.
    pub health: String,
    /// Calculator endpoint.
    pub calculate: String,
    /// Information endpoint.
    pub info: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            health: "/health".to_string(),
            calculate: "/calculate".to_string(),
            info: "/info".to_string(),
        }
    }
}

/// Body of a `/` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDescription {
    /// Greeting message.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Public endpoint paths.
    pub endpoints: EndpointPaths,
}

/// Body of a `/info` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// Application display name.
    pub application: String,
    /// Service version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Advertised features.
    pub features: Vec<String>,
}

/// Source of the informational response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    version: String,
}

impl ServiceInfo {
    /// Creates service metadata reporting `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Returns the reported version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Body for `GET /`.
    #[must_use]
    pub fn description(&self) -> ServiceDescription {
        ServiceDescription {
            message: ROOT_MESSAGE.to_string(),
            version: self.version.clone(),
            endpoints: EndpointPaths::default(),
        }
    }

    /// Body for `GET /info`.
    #[must_use]
    pub fn application_info(&self) -> ApplicationInfo {
        ApplicationInfo {
            application: APPLICATION_NAME.to_string(),
            version: self.version.clone(),
            description: DESCRIPTION.to_string(),
            features: FEATURES.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_shape() {
        let json = serde_json::to_value(ServiceInfo::new("1.0.0").description()).unwrap();
        assert_eq!(
            json,
            json!({
                "message": "DevSecOps CI/CD Pipeline Demo Application",
                "version": "1.0.0",
                "endpoints": {
                    "health": "/health",
                    "calculate": "/calculate",
                    "info": "/info"
                }
            })
        );
    }

    #[test]
    fn test_application_info_shape() {
        let info = ServiceInfo::new("2.0.0").application_info();
        assert_eq!(info.application, "DevSecOps Demo App");
        assert_eq!(info.version, "2.0.0");
        assert_eq!(info.features.len(), 5);
        assert_eq!(info.features[0], "SAST with CodeQL");
        assert_eq!(info.features[4], "Code quality enforcement");
    }
}
