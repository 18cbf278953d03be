use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::domain::{AccessionId, Species, TaxonId};
use crate::error::SeqdbError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonEntry {
    pub taxon: TaxonId,
    pub accessions: Vec<AccessionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesEntry {
    pub species: Species,
    pub taxa: Vec<TaxonEntry>,
}

impl SpeciesEntry {
    pub fn accessions(&self) -> impl Iterator<Item = &AccessionId> {
        self.taxa.iter().flat_map(|entry| entry.accessions.iter())
    }
}

/// Species -> taxon -> accessions, in the order the mapping file lists them.
///
/// Read-only once loaded. Iteration order is significant: the first-only
/// strategy picks the first taxon, and outputs are written species by
/// species in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStore {
    species: Vec<SpeciesEntry>,
    index: HashMap<Species, usize>,
}

impl MappingStore {
    pub fn load(path: &Path) -> Result<Self, SeqdbError> {
        let content =
            fs::read_to_string(path).map_err(|_| SeqdbError::MappingRead(path.to_path_buf()))?;
        let store = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            species = store.len(),
            "loaded mapping"
        );
        Ok(store)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SeqdbError> {
        let raw: OrderedMap<String, OrderedMap<String, Vec<String>>> =
            serde_json::from_str(content).map_err(|err| SeqdbError::MappingParse(err.to_string()))?;

        let mut entries = Vec::with_capacity(raw.0.len());
        for (species, taxa) in raw.0 {
            let species: Species = species
                .parse()
                .map_err(|err: SeqdbError| SeqdbError::MappingParse(err.to_string()))?;
            let mut taxon_entries = Vec::with_capacity(taxa.0.len());
            for (taxon, accessions) in taxa.0 {
                let taxon: TaxonId = taxon
                    .parse()
                    .map_err(|err: SeqdbError| SeqdbError::MappingParse(err.to_string()))?;
                let accessions = accessions
                    .iter()
                    .map(|value| value.parse::<AccessionId>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|err| SeqdbError::MappingParse(err.to_string()))?;
                taxon_entries.push(TaxonEntry { taxon, accessions });
            }
            entries.push(SpeciesEntry {
                species,
                taxa: taxon_entries,
            });
        }

        let store = Self::from_entries(entries);
        let shared = store.shared_accessions();
        if shared > 0 {
            tracing::warn!(
                accessions = shared,
                "mapping lists accessions under more than one taxon"
            );
        }
        Ok(store)
    }

    pub fn from_entries(entries: Vec<SpeciesEntry>) -> Self {
        let mut species: Vec<SpeciesEntry> = Vec::with_capacity(entries.len());
        let mut index = HashMap::new();
        for entry in entries {
            match index.get(&entry.species) {
                Some(&position) => species[position] = entry,
                None => {
                    index.insert(entry.species.clone(), species.len());
                    species.push(entry);
                }
            }
        }
        Self { species, index }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SpeciesEntry> {
        self.species.iter()
    }

    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter().map(|entry| &entry.species)
    }

    pub fn get(&self, species: &Species) -> Option<&SpeciesEntry> {
        self.index.get(species).map(|&position| &self.species[position])
    }

    pub fn taxa_of(&self, species: &Species) -> Vec<&TaxonId> {
        self.get(species)
            .map(|entry| entry.taxa.iter().map(|taxon| &taxon.taxon).collect())
            .unwrap_or_default()
    }

    pub fn accessions_of(&self, species: &Species, taxon: &TaxonId) -> &[AccessionId] {
        self.get(species)
            .and_then(|entry| entry.taxa.iter().find(|candidate| &candidate.taxon == taxon))
            .map(|entry| entry.accessions.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_accessions_of(&self, species: &Species) -> Vec<&AccessionId> {
        self.get(species)
            .map(|entry| entry.accessions().collect())
            .unwrap_or_default()
    }

    pub fn shared_accessions(&self) -> usize {
        let mut seen = HashMap::<&AccessionId, usize>::new();
        for entry in &self.species {
            for taxon in &entry.taxa {
                for accession in &taxon.accessions {
                    *seen.entry(accession).or_default() += 1;
                }
            }
        }
        seen.values().filter(|count| **count > 1).count()
    }
}

struct OrderedMap<K, V>(Vec<(K, V)>);

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + PartialEq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for OrderedVisitor<K, V>
        where
            K: Deserialize<'de> + PartialEq,
            V: Deserialize<'de>,
        {
            type Value = OrderedMap<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut items: Vec<(K, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<K, V>()? {
                    match items.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(slot) => slot.1 = value,
                        None => items.push((key, value)),
                    }
                }
                Ok(OrderedMap(items))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}
