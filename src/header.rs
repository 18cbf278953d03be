use crate::domain::Molecule;

pub const RECORD_START: u8 = b'>';

pub fn is_header(line: &[u8]) -> bool {
    line.contains(&RECORD_START)
}

pub fn extract_key(molecule: Molecule, line: &str) -> Option<&str> {
    match molecule {
        Molecule::Protein => protein_key(line),
        Molecule::Nucleotide => nucleotide_key(line),
    }
}

/// Protein headers carry the taxon id as their second `_` field,
/// e.g. `>prot_562_hypothetical protein` -> `562`.
pub fn protein_key(line: &str) -> Option<&str> {
    let key = line.split('_').nth(1)?.trim();
    (!key.is_empty()).then_some(key)
}

pub fn nucleotide_key(line: &str) -> Option<&str> {
    let token = line.split_whitespace().next()?;
    let accession = token.strip_prefix(RECORD_START as char)?;
    let stem = accession.split('.').next().unwrap_or_default();
    (!stem.is_empty()).then_some(stem)
}
