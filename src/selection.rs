use std::collections::HashSet;
use std::fmt;

use rand::Rng;

use crate::allowlist::Allowlist;
use crate::domain::{AccessionId, FirstOnlyAccessions, Species, StrategyName, TaxonId};
use crate::error::SeqdbError;
use crate::mapping::{MappingStore, SpeciesEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesSelection {
    pub species: Species,
    pub taxa: HashSet<TaxonId>,
    pub accessions: HashSet<AccessionId>,
}

impl SpeciesSelection {
    pub fn empty(species: Species) -> Self {
        Self {
            species,
            taxa: HashSet::new(),
            accessions: HashSet::new(),
        }
    }

    pub fn keeps_taxon(&self, key: &str) -> bool {
        self.taxa.contains(key)
    }

    pub fn keeps_accession(&self, key: &str) -> bool {
        self.accessions.contains(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    species: Vec<SpeciesSelection>,
}

impl Selection {
    pub fn new(species: Vec<SpeciesSelection>) -> Self {
        Self { species }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesSelection> {
        self.species.iter()
    }

    pub fn get(&self, species: &Species) -> Option<&SpeciesSelection> {
        self.species.iter().find(|entry| &entry.species == species)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn taxon_count(&self) -> usize {
        self.species.iter().map(|entry| entry.taxa.len()).sum()
    }

    pub fn accession_count(&self) -> usize {
        self.species.iter().map(|entry| entry.accessions.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Full,
    FirstOnly { accessions: FirstOnlyAccessions },
    RandomSingle,
    RandomFraction { fraction: f64 },
    Allowlist(Allowlist),
}

impl Strategy {
    pub fn random_fraction(fraction: f64) -> Result<Self, SeqdbError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SeqdbError::InvalidFraction(fraction.to_string()));
        }
        Ok(Strategy::RandomFraction { fraction })
    }

    pub fn name(&self) -> StrategyName {
        match self {
            Strategy::Full => StrategyName::Full,
            Strategy::FirstOnly { .. } => StrategyName::FirstOnly,
            Strategy::RandomSingle => StrategyName::RandomSingle,
            Strategy::RandomFraction { .. } => StrategyName::RandomFraction,
            Strategy::Allowlist(_) => StrategyName::Allowlist,
        }
    }

    /// Derives a fresh selection from the mapping.
    ///
    /// Random strategies draw from `rng` species by species in mapping order,
    /// and within a species taxon by taxon, so a given generator state always
    /// yields the same selection.
    pub fn select<R: Rng>(&self, mapping: &MappingStore, rng: &mut R) -> Selection {
        let species = mapping
            .entries()
            .filter(|entry| match self {
                Strategy::Allowlist(allowlist) => allowlist.contains(&entry.species),
                _ => true,
            })
            .map(|entry| self.select_species(entry, rng))
            .collect();
        Selection::new(species)
    }

    fn select_species<R: Rng>(&self, entry: &SpeciesEntry, rng: &mut R) -> SpeciesSelection {
        let mut selection = SpeciesSelection::empty(entry.species.clone());

        match self {
            Strategy::Full | Strategy::Allowlist(_) => {
                selection.taxa = entry.taxa.iter().map(|t| t.taxon.clone()).collect();
                selection.accessions = entry.accessions().cloned().collect();
            }
            Strategy::FirstOnly { accessions } => {
                if let Some(first) = entry.taxa.first() {
                    selection.taxa.insert(first.taxon.clone());
                    selection.accessions = match accessions {
                        FirstOnlyAccessions::Species => entry.accessions().cloned().collect(),
                        FirstOnlyAccessions::Taxon => first.accessions.iter().cloned().collect(),
                    };
                }
            }
            Strategy::RandomSingle => {
                if !entry.taxa.is_empty() {
                    let chosen = &entry.taxa[rng.random_range(0..entry.taxa.len())];
                    selection.taxa.insert(chosen.taxon.clone());
                    selection.accessions = chosen.accessions.iter().cloned().collect();
                }
            }
            Strategy::RandomFraction { fraction } => {
                for taxon in &entry.taxa {
                    if rng.random::<f64>() < *fraction {
                        selection.taxa.insert(taxon.taxon.clone());
                        selection.accessions.extend(taxon.accessions.iter().cloned());
                    }
                }
            }
        }

        selection
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::FirstOnly { accessions } => match accessions {
                FirstOnlyAccessions::Species => write!(f, "first-only"),
                FirstOnlyAccessions::Taxon => write!(f, "first-only(taxon accessions)"),
            },
            Strategy::RandomFraction { fraction } => write!(f, "random-fraction({fraction})"),
            Strategy::Allowlist(allowlist) => write!(f, "allowlist({} species)", allowlist.len()),
            other => write!(f, "{}", other.name()),
        }
    }
}
