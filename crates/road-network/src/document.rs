//! JSON persistence of authored network state.
//!
//! Only authored data is stored: transforms, control points, cross-sections,
//! marking layouts and lock links. Meshes are regenerated on load.

use std::collections::HashMap;
use std::path::Path;

use road_core::error::{Result, RoadError};
use road_geometry::CubicBezier;
use road_math::Transform;
use road_profile::{CrossSectionProfile, LineSpec, RoadSettings};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::network::RoadNetwork;
use crate::segment::RoadSegment;
use crate::types::{CurveId, Endpoint};

/// Serialized form of a [`RoadNetwork`]. Locks refer to curves by their
/// position in `curves`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(default)]
    pub settings: RoadSettings,
    pub curves: Vec<CurveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub transform: Transform,
    /// Control points in the curve's local frame.
    pub control_points: CubicBezier,
    #[serde(default)]
    pub profile: CrossSectionProfile,
    #[serde(default)]
    pub lines: LineSpec,
    #[serde(default)]
    pub start_lock: Option<usize>,
    #[serde(default)]
    pub end_lock: Option<usize>,
}

impl RoadNetwork {
    pub fn to_document(&self) -> NetworkDocument {
        let index: HashMap<CurveId, usize> = self
            .curves
            .keys()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let curves = self
            .curves
            .values()
            .map(|seg| CurveRecord {
                transform: *seg.transform(),
                control_points: *seg.local_bezier(),
                profile: seg.profile.clone(),
                lines: seg.lines.clone(),
                start_lock: seg.start_lock.and_then(|id| index.get(&id).copied()),
                end_lock: seg.end_lock.and_then(|id| index.get(&id).copied()),
            })
            .collect();
        NetworkDocument {
            settings: self.settings.clone(),
            curves,
        }
    }

    /// Rebuild a network. Lock links are validated like interactive locks,
    /// so self-locks and cycles are rejected.
    pub fn from_document(document: NetworkDocument) -> Result<Self> {
        let mut network = RoadNetwork::new(document.settings);
        let ids: Vec<CurveId> = document
            .curves
            .iter()
            .map(|record| {
                let mut segment =
                    RoadSegment::with_settings(record.transform, record.control_points, &network.settings);
                segment.profile = record.profile.clone();
                segment.lines = record.lines.clone();
                network.curves.insert(segment)
            })
            .collect();

        for (i, record) in document.curves.iter().enumerate() {
            for (side, link) in [(Endpoint::Start, record.start_lock), (Endpoint::End, record.end_lock)] {
                let Some(target) = link else { continue };
                let target = *ids.get(target).ok_or_else(|| {
                    RoadError::Validation(format!(
                        "curve {} locks to missing curve {}",
                        i, target
                    ))
                })?;
                network.check_lock(ids[i], target)?;
                if let Some(seg) = network.curves.get_mut(ids[i]) {
                    seg.set_lock(side, Some(target));
                }
            }
        }

        for &id in &ids {
            network.regenerate(id)?;
        }
        info!(curves = ids.len(), "loaded road network");
        Ok(network)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: NetworkDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
