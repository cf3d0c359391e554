//! Drives extraction package by package.
//!
//! Extraction parses and type-checks a whole package, so packages are handled
//! strictly one at a time: each result is normalized into the site before the
//! next extractor call starts.

use crate::error::DocsError;
use crate::extract::Extractor;
use crate::normalize::Normalizer;
use crate::output::SiteConfig;
use crate::packages::Package;
use tracing::{debug, warn};

/// What to do when extraction fails for one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; nothing is written.
    #[default]
    Abort,
    /// Log the failure, skip the package and carry on.
    KeepGoing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub skipped: usize,
    pub documented: usize,
}

pub fn run(
    packages: &[Package],
    extractor: &mut dyn Extractor,
    site: &mut SiteConfig,
    normalizer: &Normalizer,
    policy: FailurePolicy,
) -> Result<Summary, DocsError> {
    let mut summary = Summary::default();

    for package in packages {
        debug!("extracting {} from {}", package.name, package.entry.display());
        let result = extractor
            .extract(&package.entry)
            .and_then(|comments| match comments {
                Some(comments) => normalizer.apply(site, package, &comments),
                None => {
                    warn!("extractor returned nothing for {}", package.entry.display());
                    Ok(0)
                }
            });

        match (result, policy) {
            (Ok(filled), _) => {
                debug!("{}: {} entries filled", package.name, filled);
                summary.processed += 1;
            }
            (Err(e), FailurePolicy::KeepGoing) => {
                warn!("skipping {}: {}", package.name, e);
                summary.skipped += 1;
            }
            (Err(e), FailurePolicy::Abort) => return Err(e),
        }
    }

    summary.documented = site.entries().filter(|entry| entry.docs.is_some()).count();
    Ok(summary)
}
