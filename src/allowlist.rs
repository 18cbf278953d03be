use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::Species;
use crate::error::SeqdbError;

// Human gut bacterial culture collection, Nat. Biotechnol. (doi:10.1038/s41587-018-0008-8).
pub const GUT_MICROBIOTA_SPECIES: &[&str] = &[
    "eggerthella_lenta",
    "clostridium_symbiosum",
    "bacteroides_eggerthii",
    "lactobacillus_plantarum",
    "ruminococcus_lactaris",
    "enterococcus_avium",
    "parabacteroides_distasonis",
    "clostridium_leptum",
    "prevotella_sp",
    "coprococcus_sp",
    "anaerostipes_sp",
    "bacillus_coagulans",
    "lactobacillus_gasseri",
    "enterobacter_sp",
    "bacteroides_clarus",
    "parabacteroides_merdae",
    "enterococcus_durans",
    "lactococcus_lactis",
    "propionibacterium_sp",
    "anaerofustis_stercorihominis",
    "roseburia_inulinivorans",
    "clostridium_innocuum",
    "eubacterium_biforme",
    "enterococcus_faecalis",
    "holdemania_filiformis",
    "enterococcus_saccharolyticus",
    "roseburia_hominis",
    "clostridium_nexile",
    "ruminococcus_gnavus",
    "bacteroides_faecis",
    "clostridium_sp",
    "ruminococcus_bromii",
    "collinsella_intestinalis",
    "dorea_sp",
    "bacteroides_plebeius",
    "bacteroides_oleiciplenus",
    "bacteroides_sp",
    "parabacteroides_gordonii",
    "bifidobacterium_pseudolongum",
    "burkholderiales_bacterium",
    "clostridium_bolteae",
    "coprococcus_catus",
    "clostridium_asparagiforme",
    "streptococcus_lutetiensis",
    "bifidobacterium_stercoris",
    "acidaminococcus_sp",
    "parabacteroides_sp",
    "erysipelatoclostridium_ramosum",
    "clostridium_butyricum",
    "bifidobacterium_adolescentis",
    "odoribacter_sp",
    "tannerella_sp",
    "clostridium_clostridioforme",
    "clostridiales_bacterium",
    "bacteroides_stercoris",
    "solobacterium_moorei",
    "enterococcus_casseliflavus",
    "bacteroides_salyersiae",
    "ruminococcus_sp",
    "klebsiella_pneumoniae",
    "erysipelotrichaceae_bacterium",
    "coprobacillus_sp",
    "bacteroides_uniformis",
    "clostridium_perfringens",
    "lactobacillus_casei",
    "catenibacterium_sp",
    "dorea_formicigenerans",
    "clostridium_spiroforme",
    "lactobacillus_ruminis",
    "bacteroides_caccae",
    "roseburia_sp",
    "mitsuokella_multacida",
    "bacteroides_intestinalis",
    "prevotella_stercorea",
    "blautia_sp",
    "bacillus_licheniformis",
    "odoribacter_splanchnicus",
    "bifidobacterium_animalis",
    "bacteroides_fragilis",
    "bacteroides_cellulosilyticus",
    "fusobacterium_ulcerans",
    "citrobacter_sp",
    "bacillus_sonorensis",
    "faecalibacterium_prausnitzii",
    "bifidobacterium_pseudocatenulatum",
    "bacteroides_coprocola",
    "bacteroides_ovatus",
    "streptococcus_sp",
    "eubacterium_dolichum",
    "eubacterium_ventriosum",
    "staphylococcus_warneri",
    "bacteroides_coprophilus",
    "bacteroides_stercorirosoris",
    "eubacterium_hallii",
    "ruminococcus_torques",
    "ruminococcus_obeum",
    "clostridium_hathewayi",
    "enterobacter_cloacae",
    "alistipes_indistinctus",
    "bifidobacterium_bifidum",
    "dorea_longicatena",
    "coprococcus_eutactus",
    "fusobacterium_mortiferum",
    "enterococcus_asini",
    "firmicutes_bacterium",
    "bacteroides_xylanisolvens",
    "bacteroides_vulgatus",
    "clostridium_sordellii",
    "lachnospiraceae_bacterium",
    "lactobacillus_salivarius",
    "bifidobacterium_longum",
    "veillonella_atypica",
    "streptococcus_gordonii",
    "escherichia_coli",
    "veillonella_sp",
    "prevotella_copri",
    "paraprevotella_clara",
    "dielma_fastidiosa",
    "butyrateproducing_bacterium",
    "faecalibacterium_sp",
    "collinsella_tanakaei",
    "eubacterium_eligens",
    "faecalibacterium_cf",
    "butyricimonas_virosa",
    "streptococcus_parasanguinis",
    "veillonella_parvula",
    "bacillus_cereus",
    "megamonas_funiformis",
    "roseburia_intestinalis",
    "megamonas_rupellensis",
    "weissella_cibaria",
    "alistipes_sp",
    "bacteroides_thetaiotaomicron",
    "coprococcus_comes",
    "eubacterium_rectale",
    "clostridium_citroniae",
    "weissella_confusa",
    "fusobacterium_varium",
    "streptococcus_anginosus",
    "lactobacillus_fermentum",
    "bacteroides_nordii",
    "streptococcus_salivarius",
    "eubacterium_sp",
    "lactococcus_garvieae",
    "streptococcus_mutans",
    "streptococcus_equinus",
    "streptococcus_pasteurianus",
    "prevotella_disiens",
    "streptococcus_vestibularis",
    "lactobacillus_amylovorus",
    "paenibacillus_polymyxa",
    "bacteroides_dorei",
    "subdoligranulum_sp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    species: HashSet<String>,
}

impl Allowlist {
    pub fn new<I, S>(species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            species: species
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn gut_microbiota() -> Self {
        Self::new(GUT_MICROBIOTA_SPECIES)
    }

    pub fn from_file(path: &Path) -> Result<Self, SeqdbError> {
        let content =
            fs::read_to_string(path).map_err(|_| SeqdbError::AllowlistRead(path.to_path_buf()))?;
        Ok(Self::new(
            content
                .lines()
                .map(|line| line.split('#').next().unwrap_or_default())
                .filter(|line| !line.trim().is_empty()),
        ))
    }

    pub fn contains(&self, species: &Species) -> bool {
        self.species.contains(&species.as_str().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::gut_microbiota()
    }
}
