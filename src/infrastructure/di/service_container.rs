//! Service container for dependency injection
//!
//! Wires the label service to its filesystem and settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::LabelService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::EncodingPolicy;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Forest and tag file handling
    pub labels: LabelService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let labels = LabelService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            labels,
        }
    }

    /// Forest file from the command line, falling back to the configured one.
    pub fn forest_path(&self, explicit: Option<&Path>) -> ApplicationResult<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.settings.forest.clone())
            .ok_or(ApplicationError::NoForest)
    }

    /// Policy for a domain name, falling back to the configured default domain.
    pub fn policy(&self, domain: Option<&str>) -> ApplicationResult<EncodingPolicy> {
        let name = domain.unwrap_or(&self.settings.default_domain);
        Ok(self.settings.policy_for(name)?)
    }
}
