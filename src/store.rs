use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{Molecule, Species};
use crate::error::SeqdbError;

#[derive(Debug, Clone)]
pub struct SourceStore {
    protein_dir: Utf8PathBuf,
    nucleotide_dir: Utf8PathBuf,
}

impl SourceStore {
    pub fn new(protein_dir: Utf8PathBuf, nucleotide_dir: Utf8PathBuf) -> Self {
        Self {
            protein_dir,
            nucleotide_dir,
        }
    }

    pub fn source_path(&self, molecule: Molecule, species: &Species) -> Utf8PathBuf {
        let dir = match molecule {
            Molecule::Protein => &self.protein_dir,
            Molecule::Nucleotide => &self.nucleotide_dir,
        };
        dir.join(format!("{}_{species}", molecule.short_name()))
    }

    pub fn locate_source(&self, molecule: Molecule, species: &Species) -> Option<Utf8PathBuf> {
        let plain = self.source_path(molecule, species);
        if plain.as_std_path().is_file() {
            return Some(plain);
        }
        let compressed = Utf8PathBuf::from(format!("{plain}.gz"));
        compressed.as_std_path().is_file().then_some(compressed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPair {
    pub protein: Utf8PathBuf,
    pub nucleotide: Utf8PathBuf,
}

impl OutputPair {
    pub fn from_base(base: &Utf8Path) -> Self {
        Self {
            protein: Utf8PathBuf::from(format!("{base}_prot.fa")),
            nucleotide: Utf8PathBuf::from(format!("{base}_nucl.fa")),
        }
    }

    pub fn prepare(&self, fresh: bool) -> Result<(), SeqdbError> {
        for path in [&self.protein, &self.nucleotide] {
            if let Some(parent) = path.parent() {
                if !parent.as_str().is_empty() {
                    fs::create_dir_all(parent.as_std_path())
                        .map_err(|err| SeqdbError::Filesystem(format!("create {parent}: {err}")))?;
                }
            }
            if fresh && path.as_std_path().exists() {
                fs::remove_file(path.as_std_path())
                    .map_err(|err| SeqdbError::Filesystem(format!("remove {path}: {err}")))?;
            }
        }
        Ok(())
    }
}
