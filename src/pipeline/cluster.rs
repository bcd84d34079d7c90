//! Clustering of near-duplicate owner names into canonical groups.

use crate::config::OwnerConfig;
use crate::pipeline::text::{normalize_owner, similarity};
use std::collections::HashMap;
use tracing::debug;

/// One group of owner-name strings judged to refer to the same entity.
/// The representative is the normalized form of the first name seen.
#[derive(Debug, Clone)]
pub struct OwnerCluster {
    pub representative: String,
    pub members: Vec<String>,
}

/// Groups owner names by edit-distance similarity against each cluster's
/// representative, with an optional substring-containment fallback.
///
/// Matching is order-dependent and deterministic: a fixed input order and
/// threshold always produce the same clusters.
#[derive(Debug, Clone)]
pub struct OwnerClusterer {
    threshold: f64,
    substring_fallback: bool,
}

impl OwnerClusterer {
    pub fn new(config: &OwnerConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            substring_fallback: config.substring_fallback,
        }
    }

    /// Fold an ordered sequence of raw owner names into clusters. Each name
    /// joins the first cluster whose representative it matches, or seeds a
    /// new cluster keyed by its own normalized form. Names that normalize to
    /// the empty string are skipped.
    pub fn cluster<'a, I>(&self, names: I) -> Vec<OwnerCluster>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut clusters: Vec<OwnerCluster> = Vec::new();

        for raw in names {
            let normalized = normalize_owner(raw);
            if normalized.is_empty() {
                continue;
            }

            match clusters
                .iter_mut()
                .find(|c| self.matches(&c.representative, &normalized))
            {
                Some(cluster) => {
                    debug!(
                        "Owner '{}' joined cluster '{}'",
                        normalized, cluster.representative
                    );
                    cluster.members.push(normalized);
                }
                None => {
                    clusters.push(OwnerCluster {
                        representative: normalized.clone(),
                        members: vec![normalized],
                    });
                }
            }
        }

        clusters
    }

    /// Flatten clusters into a `normalized name -> canonical representative`
    /// map used to stamp output features.
    pub fn canonical_map(clusters: &[OwnerCluster]) -> HashMap<String, String> {
        let mut mapping = HashMap::new();
        for cluster in clusters {
            for member in &cluster.members {
                mapping.insert(member.clone(), cluster.representative.clone());
            }
        }
        mapping
    }

    fn matches(&self, representative: &str, candidate: &str) -> bool {
        if similarity(representative, candidate) >= self.threshold {
            return true;
        }
        self.substring_fallback
            && (representative.contains(candidate) || candidate.contains(representative))
    }
}
