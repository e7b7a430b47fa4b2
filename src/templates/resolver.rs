// Template resolution with cascading lookup
//
// Resolution order:
// 1. Override directory (operator supplied, e.g. ~/.diagnosis/templates/)
// 2. Builtin - compiled-in default templates

use crate::templates::builtin;
use anyhow::{anyhow, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Template source indicating where a template was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// File in the override directory
    Override,
    /// Built-in template (compiled into the application)
    Builtin,
}

/// Resolved template info
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub name: String,
    pub content: String,
    pub source: TemplateSource,
    /// Path to the template file (if file-based)
    pub path: Option<PathBuf>,
}

/// Template resolver with cascading lookup
pub struct TemplateResolver {
    override_dir: Option<PathBuf>,
    cache: HashMap<String, ResolvedTemplate>,
}

impl TemplateResolver {
    /// Create a resolver that only knows builtin templates
    pub fn new() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Look for overrides in `dir` first. Files are named after the
    /// template (`executive_diagnosis.txt`, `diagnosis_email.html`, ...).
    pub fn with_override_dir(mut self, dir: &Path) -> Self {
        self.override_dir = Some(dir.to_path_buf());
        self
    }

    /// Resolve a template by name
    pub fn resolve(&mut self, name: &str) -> Result<ResolvedTemplate> {
        if let Some(cached) = self.cache.get(name) {
            debug!(
                "[templates] '{}' resolved from cache (source: {:?})",
                name, cached.source
            );
            return Ok(cached.clone());
        }

        let template = match self.try_override_template(name)? {
            Some(template) => {
                info!("[templates] '{}' resolved from override: {:?}", name, template.path);
                template
            }
            None => match builtin::get_builtin_template(name) {
                Some(content) => ResolvedTemplate {
                    name: name.to_string(),
                    content: content.to_string(),
                    source: TemplateSource::Builtin,
                    path: None,
                },
                None => return Err(anyhow!("Template '{}' not found in any location", name)),
            },
        };

        self.cache.insert(name.to_string(), template.clone());
        Ok(template)
    }

    fn override_path(&self, name: &str) -> Option<PathBuf> {
        self.override_dir.as_ref().map(|d| d.join(name))
    }

    fn try_override_template(&self, name: &str) -> Result<Option<ResolvedTemplate>> {
        if let Some(path) = self.override_path(name) {
            if path.is_file() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    anyhow!("Failed to read template '{}': {}", path.display(), e)
                })?;
                return Ok(Some(ResolvedTemplate {
                    name: name.to_string(),
                    content,
                    source: TemplateSource::Override,
                    path: Some(path),
                }));
            }
        }
        Ok(None)
    }
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_falls_back_to_builtin_template() {
        let mut resolver = TemplateResolver::new();
        let template = resolver.resolve(builtin::EXECUTIVE_DIAGNOSIS).unwrap();
        assert_eq!(template.source, TemplateSource::Builtin);
        assert!(template.content.contains("DIAGNÓSTICO EJECUTIVO"));
    }

    #[test]
    fn test_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(builtin::SUMMARY), "Custom {{ name }}").unwrap();

        let mut resolver = TemplateResolver::new().with_override_dir(temp_dir.path());
        let template = resolver.resolve(builtin::SUMMARY).unwrap();
        assert_eq!(template.source, TemplateSource::Override);
        assert_eq!(template.content, "Custom {{ name }}");

        // Names without an override file still come from the builtins
        let other = resolver.resolve(builtin::ACTION_PLANS).unwrap();
        assert_eq!(other.source, TemplateSource::Builtin);
    }

    #[test]
    fn test_missing_template_is_error() {
        let mut resolver = TemplateResolver::new();
        let result = resolver.resolve("nonexistent.txt");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_caches_templates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(builtin::SUMMARY);
        fs::write(&path, "first").unwrap();

        let mut resolver = TemplateResolver::new().with_override_dir(temp_dir.path());
        assert_eq!(resolver.resolve(builtin::SUMMARY).unwrap().content, "first");

        fs::write(&path, "second").unwrap();
        assert_eq!(resolver.resolve(builtin::SUMMARY).unwrap().content, "first");
    }
}
