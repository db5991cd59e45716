// Dataset registry
// Fixed mapping from dataset name to catalogue constructor and feature
// extractor. Adding a dataset means one new entry here plus its catalogue
// and (if needed) extractor; the orchestrator never changes.

use std::path::Path;

use super::{ensemble, maestro, maps, musicnet, rhythm, DatasetError, DatasetInfo};
use crate::feature::{
    EnsembleExtractor, FeatureExtractor, MaestroExtractor, MapsExtractor, MusicNetExtractor,
    RhythmExtractor,
};

/// The supported dataset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Maps,
    Maestro,
    MusicNet,
    Su,
    SuTen,
    Urmp,
    Bach,
    Rhythm,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 8] = [
        DatasetKind::Maps,
        DatasetKind::Maestro,
        DatasetKind::MusicNet,
        DatasetKind::Su,
        DatasetKind::SuTen,
        DatasetKind::Urmp,
        DatasetKind::Bach,
        DatasetKind::Rhythm,
    ];

    /// The user-facing dataset name
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Maps => "Maps",
            DatasetKind::Maestro => "Maestro",
            DatasetKind::MusicNet => "MusicNet",
            DatasetKind::Su => "Su",
            DatasetKind::SuTen => "Su-10",
            DatasetKind::Urmp => "URMP",
            DatasetKind::Bach => "Bach",
            DatasetKind::Rhythm => "Rhythm",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, DatasetError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DatasetError::UnknownDataset(name.to_string()))
    }
}

/// One registry row: how to build the catalogue and which extractor family
/// handles the dataset
pub struct RegistryEntry {
    pub build_info: fn(&Path) -> Result<DatasetInfo, DatasetError>,
    pub extractor: fn() -> Box<dyn FeatureExtractor>,
}

/// Look up the registry entry for a dataset.
///
/// Several ensemble datasets share one extractor: their label format and
/// mixture convention match, so polymorphism follows the extraction strategy
/// rather than dataset identity.
pub fn resolve(kind: DatasetKind) -> RegistryEntry {
    match kind {
        DatasetKind::Maps => RegistryEntry {
            build_info: maps::build_info,
            extractor: || Box::new(MapsExtractor),
        },
        DatasetKind::Maestro => RegistryEntry {
            build_info: maestro::build_info,
            extractor: || Box::new(MaestroExtractor),
        },
        DatasetKind::MusicNet => RegistryEntry {
            build_info: musicnet::build_info,
            extractor: || Box::new(MusicNetExtractor),
        },
        DatasetKind::Su | DatasetKind::SuTen | DatasetKind::Urmp | DatasetKind::Bach => {
            RegistryEntry {
                build_info: ensemble::build_info,
                extractor: || Box::new(EnsembleExtractor),
            }
        }
        DatasetKind::Rhythm => RegistryEntry {
            build_info: rhythm::build_info,
            extractor: || Box::new(RhythmExtractor),
        },
    }
}
