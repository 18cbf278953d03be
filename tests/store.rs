use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use seqdb_sampler::domain::{Molecule, Species};
use seqdb_sampler::store::{OutputPair, SourceStore};

#[test]
fn layout_paths() {
    let store = SourceStore::new(Utf8PathBuf::from("prot"), Utf8PathBuf::from("nucl"));
    let species: Species = "escherichia_coli".parse().unwrap();

    assert_eq!(
        store.source_path(Molecule::Protein, &species),
        Utf8Path::new("prot/prot_escherichia_coli")
    );
    assert_eq!(
        store.source_path(Molecule::Nucleotide, &species),
        Utf8Path::new("nucl/nucl_escherichia_coli")
    );

    let outputs = OutputPair::from_base(Utf8Path::new("db_files/random_30_2"));
    assert_eq!(outputs.protein, Utf8Path::new("db_files/random_30_2_prot.fa"));
    assert_eq!(outputs.nucleotide, Utf8Path::new("db_files/random_30_2_nucl.fa"));
}

#[test]
fn locate_prefers_plain_over_gzip() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    fs::create_dir_all(root.join("prot")).unwrap();
    fs::create_dir_all(root.join("nucl")).unwrap();
    let store = SourceStore::new(root.join("prot"), root.join("nucl"));
    let species: Species = "x_y".parse().unwrap();

    assert_eq!(store.locate_source(Molecule::Protein, &species), None);

    fs::write(root.join("prot/prot_x_y.gz"), b"").unwrap();
    assert_eq!(
        store.locate_source(Molecule::Protein, &species),
        Some(root.join("prot/prot_x_y.gz"))
    );

    fs::write(root.join("prot/prot_x_y"), b"").unwrap();
    assert_eq!(
        store.locate_source(Molecule::Protein, &species),
        Some(root.join("prot/prot_x_y"))
    );
}

#[test]
fn prepare_clears_previous_outputs() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let outputs = OutputPair::from_base(&root.join("nested/dir/full"));

    outputs.prepare(true).unwrap();
    fs::write(&outputs.protein, ">old\n").unwrap();

    outputs.prepare(false).unwrap();
    assert!(outputs.protein.as_std_path().exists());

    outputs.prepare(true).unwrap();
    assert!(!outputs.protein.as_std_path().exists());
}
