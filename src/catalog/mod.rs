//! The salon's service menu: a structured YAML asset rendered to plain text for
//! the system instruction.

mod types;

pub use types::*;

use crate::{Error, Result, config::CatalogConfig};
use std::collections::HashSet;
use tracing::{debug, info};

const BUNDLED_CATALOG: &str = include_str!("../../catalog.yaml");

/// Loads the catalog named by config, or the bundled one, and validates it.
pub async fn load(config: &CatalogConfig) -> Result<ServiceCatalog> {
    let catalog = match &config.path {
        Some(path) => {
            debug!("Loading service catalog from: {}", path);
            let yaml = tokio::fs::read_to_string(path).await?;
            ServiceCatalog::from_yaml(&yaml)?
        }
        None => {
            debug!("Using bundled service catalog");
            ServiceCatalog::bundled()?
        }
    };

    info!(
        "Service catalog loaded with {} services in {} currency",
        catalog.services.len(),
        catalog.currency
    );

    Ok(catalog)
}

impl ServiceCatalog {
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(Error::catalog("currency must not be empty"));
        }

        if self.services.is_empty() {
            return Err(Error::catalog("catalog has no services"));
        }

        let mut seen = HashSet::new();
        for (index, service) in self.services.iter().enumerate() {
            if service.category.trim().is_empty() {
                return Err(Error::catalog(format!(
                    "service #{} has an empty category",
                    index + 1
                )));
            }
            if service.name.trim().is_empty() {
                return Err(Error::catalog(format!(
                    "service #{} in '{}' has an empty name",
                    index + 1,
                    service.category
                )));
            }
            if !service.price.is_finite() || service.price < 0.0 {
                return Err(Error::catalog(format!(
                    "'{}' has an invalid price: {}",
                    service.name, service.price
                )));
            }
            if service.duration_minutes == 0 {
                return Err(Error::catalog(format!(
                    "'{}' must last at least one minute",
                    service.name
                )));
            }
            if !seen.insert((service.category.as_str(), service.name.as_str())) {
                return Err(Error::catalog(format!(
                    "'{}' is listed twice under '{}'",
                    service.name, service.category
                )));
            }
        }

        Ok(())
    }

    /// Groups by category, keeping the order categories first appear in.
    pub fn render(&self) -> String {
        let mut groups: Vec<(&str, Vec<&ServiceEntry>)> = Vec::new();
        for service in &self.services {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == service.category.as_str())
            {
                Some((_, entries)) => entries.push(service),
                None => groups.push((service.category.as_str(), vec![service])),
            }
        }

        let mut out = String::new();
        for (i, (category, entries)) in groups.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("{}:\n", category));
            for entry in entries {
                out.push_str(&format!(
                    "- {}: {:.2} {} ({} min)\n",
                    entry.name, entry.price, self.currency, entry.duration_minutes
                ));
            }
        }
        out
    }
}
