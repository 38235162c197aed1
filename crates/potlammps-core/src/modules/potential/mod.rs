//! `potential-LAMMPS` records: a potential's atom types, engine settings and
//! the term blocks used to build its LAMMPS command lines.

mod model;
mod parser;

pub use model::{AtomEntry, PotentialContent};

use super::pair_info::normalize_symbols;
use super::query::{QueryBackend, QueryField, QueryFilters, QueryKind};
use super::record::Record;
use super::traits::RecordKind;
use crate::common::{AtomicMassLookup, DocumentNode};
use crate::domain::{Artifact, PotentialError, PotentialResult, optional_string};
use parser::{build_potential_content, load_potential_content};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct PotentialLammpsKind;

const POTENTIAL_QUERY_FIELDS: [QueryField; 10] = [
    QueryField::content("key", "key", QueryKind::StrMatch),
    QueryField::content("id", "id", QueryKind::StrMatch),
    QueryField::content("potid", "potential.id", QueryKind::StrMatch),
    QueryField::content("potkey", "potential.key", QueryKind::StrMatch),
    QueryField::content("units", "units", QueryKind::StrMatch),
    QueryField::content("atom_style", "atom_style", QueryKind::StrMatch),
    QueryField::content("pair_style", "pair_style.type", QueryKind::StrMatch),
    QueryField::content("status", "status", QueryKind::StrMatch),
    QueryField::content("elements", "atom.element", QueryKind::InList),
    QueryField::content("symbols", "atom.symbol", QueryKind::InList),
];

impl RecordKind for PotentialLammpsKind {
    type Content = PotentialContent;

    const STYLE: &'static str = "potential_LAMMPS";
    const MODEL_ROOT: &'static str = "potential-LAMMPS";

    fn load_content(root: &DocumentNode<'_>) -> PotentialResult<PotentialContent> {
        load_potential_content(root)
    }

    fn build_content(content: &PotentialContent) -> Value {
        build_potential_content(content)
    }

    fn metadata(content: &PotentialContent) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("key".to_string(), optional_string(&content.key));
        meta.insert("id".to_string(), optional_string(&content.id));
        meta.insert("potkey".to_string(), optional_string(&content.potential_key));
        meta.insert("potid".to_string(), optional_string(&content.potential_id));
        meta.insert("units".to_string(), json!(content.units));
        meta.insert("atom_style".to_string(), json!(content.atom_style));
        meta.insert("pair_style".to_string(), json!(content.pair_style));
        meta.insert("status".to_string(), optional_string(&content.status));
        meta.insert("symbols".to_string(), json!(content.symbols));
        meta.insert("elements".to_string(), json!(content.elements));
        meta.insert("masses".to_string(), json!(content.masses));
        meta.insert("charges".to_string(), json!(content.charges));
        meta.insert(
            "artifacts".to_string(),
            Value::Array(
                content
                    .artifacts
                    .iter()
                    .map(|artifact| Value::Object(artifact.metadata()))
                    .collect(),
            ),
        );
        meta.insert("comments".to_string(), json!(content.comments));
        meta.insert("dois".to_string(), json!(content.dois));
        meta
    }

    fn query_fields() -> &'static [QueryField] {
        &POTENTIAL_QUERY_FIELDS
    }

    fn default_name(content: &PotentialContent) -> Option<String> {
        content.id.clone()
    }

    /// An `active` status also matches records that carry no status at all.
    fn prepare_filters(filters: &mut QueryFilters) {
        if let Some(status) = filters.get_mut("status") {
            if status.iter().any(|value| value.as_deref() == Some("active")) {
                status.push(None);
            }
        }
    }
}

/// A loaded potential together with the directory holding its parameter files.
///
/// `pot_dir` is the only setting that may change after loading; it is
/// prefixed to every `file` term when command lines are rendered.
#[derive(Default)]
pub struct PotentialLammps {
    record: Record<PotentialLammpsKind>,
    pot_dir: PathBuf,
}

impl PotentialLammps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pot_dir(pot_dir: impl Into<PathBuf>) -> Self {
        Self {
            record: Record::new(),
            pot_dir: pot_dir.into(),
        }
    }

    pub fn from_model(
        model: Value,
        name: Option<&str>,
        pot_dir: Option<&Path>,
    ) -> PotentialResult<Self> {
        Ok(Self {
            record: Record::from_model(model, name)?,
            pot_dir: pot_dir.map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    pub fn from_json_str(
        content: &str,
        name: Option<&str>,
        pot_dir: Option<&Path>,
    ) -> PotentialResult<Self> {
        Self::from_model(serde_json::from_str(content)?, name, pot_dir)
    }

    pub fn from_path(
        path: &Path,
        name: Option<&str>,
        pot_dir: Option<&Path>,
    ) -> PotentialResult<Self> {
        Ok(Self {
            record: Record::from_path(path, name)?,
            pot_dir: pot_dir.map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    /// Replaces the loaded content. `pot_dir` is reset to the working
    /// directory when not given.
    pub fn load_model(
        &mut self,
        model: Value,
        name: Option<&str>,
        pot_dir: Option<&Path>,
    ) -> PotentialResult<()> {
        self.record.load_model(model, name)?;
        self.pot_dir = pot_dir.map(Path::to_path_buf).unwrap_or_default();
        Ok(())
    }

    pub fn record(&self) -> &Record<PotentialLammpsKind> {
        &self.record
    }

    pub fn content(&self) -> PotentialResult<&PotentialContent> {
        self.record.content()
    }

    pub fn style(&self) -> &'static str {
        self.record.style()
    }

    pub fn model_root(&self) -> &'static str {
        self.record.model_root()
    }

    pub fn name(&self) -> Option<&str> {
        self.record.name()
    }

    pub fn pot_dir(&self) -> &Path {
        &self.pot_dir
    }

    pub fn set_pot_dir(&mut self, pot_dir: impl Into<PathBuf>) {
        self.pot_dir = pot_dir.into();
    }

    pub fn symbols(&self) -> PotentialResult<&[String]> {
        Ok(&self.content()?.symbols)
    }

    pub fn elements(&self) -> PotentialResult<&[String]> {
        Ok(&self.content()?.elements)
    }

    pub fn pair_style(&self) -> PotentialResult<&str> {
        Ok(&self.content()?.pair_style)
    }

    pub fn units(&self) -> PotentialResult<&str> {
        Ok(&self.content()?.units)
    }

    pub fn atom_style(&self) -> PotentialResult<&str> {
        Ok(&self.content()?.atom_style)
    }

    pub fn comments(&self) -> PotentialResult<&str> {
        Ok(&self.content()?.comments)
    }

    pub fn dois(&self) -> PotentialResult<&[String]> {
        Ok(&self.content()?.dois)
    }

    pub fn artifacts(&self) -> PotentialResult<&[Artifact]> {
        Ok(&self.content()?.artifacts)
    }

    pub fn fileurls(&self) -> PotentialResult<Vec<String>> {
        Ok(self.content()?.fileurls())
    }

    /// Symbol sets of every potential described by this record.
    pub fn symbolsets(&self) -> PotentialResult<Vec<Vec<String>>> {
        Ok(vec![self.symbols()?.to_vec()])
    }

    /// LAMMPS `print` commands echoing the comments, DOIs and download URLs.
    pub fn print_comments(&self) -> PotentialResult<String> {
        let content = self.content()?;
        let mut out = String::new();

        for line in content.comments.split('\n') {
            if !line.is_empty() {
                out.push_str(&format!("print \"{line}\"\n"));
            }
        }

        if !content.dois.is_empty() {
            out.push_str("print \"Publication(s) related to the potential:\"\n");
            for doi in &content.dois {
                out.push_str(&format!("print \"https://doi.org/{doi}\"\n"));
            }
        }

        let urls = content.fileurls();
        if !urls.is_empty() {
            out.push_str("print \"Parameter file(s) can be downloaded at:\"\n");
            for url in urls {
                out.push_str(&format!("print \"{url}\"\n"));
            }
        }
        Ok(out)
    }

    pub fn normalize_symbols(&self, symbols: &[String]) -> PotentialResult<Vec<String>> {
        normalize_symbols(self.symbols()?, symbols)
    }

    /// The requested symbols after normalization, or every stored symbol in
    /// stored order when none are requested.
    pub(crate) fn resolve_symbols(&self, symbols: Option<&[String]>) -> PotentialResult<Vec<String>> {
        match symbols {
            None => Ok(self.symbols()?.to_vec()),
            Some(symbols) => self.normalize_symbols(symbols),
        }
    }

    /// Mass of one stored symbol, consulting `lookup` only when the potential
    /// does not define it.
    pub(crate) fn symbol_mass<L>(&self, symbol: &str, prompt: bool, lookup: &L) -> PotentialResult<f64>
    where
        L: AtomicMassLookup + ?Sized,
    {
        let content = self.content()?;
        let index = content
            .symbol_index(symbol)
            .ok_or_else(|| PotentialError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;

        match content.masses[index] {
            Some(mass) => Ok(mass),
            None => {
                let element = &content.elements[index];
                lookup.atomic_mass(element, prompt).map_err(|error| {
                    warn!(%element, %error, "atomic mass lookup failed");
                    error.into()
                })
            }
        }
    }

    pub fn masses<L>(
        &self,
        symbols: Option<&[String]>,
        prompt: bool,
        lookup: &L,
    ) -> PotentialResult<Vec<f64>>
    where
        L: AtomicMassLookup + ?Sized,
    {
        self.resolve_symbols(symbols)?
            .iter()
            .map(|symbol| self.symbol_mass(symbol, prompt, lookup))
            .collect()
    }

    pub fn charges(&self, symbols: Option<&[String]>) -> PotentialResult<Vec<f64>> {
        let content = self.content()?;
        Ok(self
            .resolve_symbols(symbols)?
            .iter()
            .filter_map(|symbol| content.symbol_index(symbol))
            .map(|index| content.charges[index])
            .collect())
    }

    pub fn metadata(&self) -> PotentialResult<Map<String, Value>> {
        self.record.metadata()
    }

    pub fn build_model(&self) -> PotentialResult<Value> {
        self.record.build_model()
    }

    pub fn query<B: QueryBackend>(backend: B, filters: &QueryFilters) -> B::Output {
        Record::<PotentialLammpsKind>::query(backend, filters)
    }
}

#[cfg(test)]
mod tests {
    use super::PotentialLammps;
    use crate::common::{AtomicMassLookup, MassLookupError, MassTable};
    use crate::domain::PotentialError;
    use crate::modules::query::{DocumentQuery, QueryFilters, TableFilter};
    use serde_json::{Value, json};
    use std::cell::RefCell;

    fn document() -> Value {
        json!({"potential-LAMMPS": {
            "key": "a1b2",
            "id": "2004--Mishin-Y--Ni-Al--LAMMPS--ipr1",
            "potential": {"key": "p1", "id": "2004--Mishin-Y--Ni-Al", "doi": ["10.1016/j.actamat.2004.05.036"]},
            "units": "metal",
            "atom_style": "atomic",
            "atom": [{"element": "Ni"}, {"element": "Al", "mass": 26.98}],
            "pair_style": {"type": "eam/alloy"},
            "pair_coeff": {"term": [{"file": "Mishin-Ni-Al-2009.eam.alloy"}, {"symbols": "True"}]},
            "artifact": {"file": "Mishin-Ni-Al-2009.eam.alloy", "web-link": {"URL": "https://example.org/Mishin-Ni-Al-2009.eam.alloy"}},
            "comments": "Ni-Al EAM potential\n\nfrom the 2004 fit"
        }})
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    struct CountingLookup {
        calls: RefCell<Vec<(String, bool)>>,
    }

    impl AtomicMassLookup for CountingLookup {
        fn atomic_mass(&self, element: &str, interactive: bool) -> Result<f64, MassLookupError> {
            self.calls.borrow_mut().push((element.to_string(), interactive));
            Ok(58.6934)
        }
    }

    #[test]
    fn record_name_defaults_to_document_id() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        assert_eq!(potential.name(), Some("2004--Mishin-Y--Ni-Al--LAMMPS--ipr1"));
        assert_eq!(potential.style(), "potential_LAMMPS");
        assert_eq!(potential.model_root(), "potential-LAMMPS");
    }

    #[test]
    fn accessors_require_a_loaded_model() {
        let potential = PotentialLammps::with_pot_dir("pots");
        assert!(matches!(potential.comments(), Err(PotentialError::NoModelLoaded)));
        assert!(matches!(potential.dois(), Err(PotentialError::NoModelLoaded)));
        assert!(matches!(potential.fileurls(), Err(PotentialError::NoModelLoaded)));
        assert_eq!(potential.pot_dir(), std::path::Path::new("pots"));
    }

    #[test]
    fn print_comments_drops_blank_lines_and_lists_links() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        assert_eq!(
            potential.print_comments().expect("comments available"),
            concat!(
                "print \"Ni-Al EAM potential\"\n",
                "print \"from the 2004 fit\"\n",
                "print \"Publication(s) related to the potential:\"\n",
                "print \"https://doi.org/10.1016/j.actamat.2004.05.036\"\n",
                "print \"Parameter file(s) can be downloaded at:\"\n",
                "print \"https://example.org/Mishin-Ni-Al-2009.eam.alloy\"\n",
            )
        );
    }

    #[test]
    fn masses_use_lookup_only_for_undefined_entries() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        let lookup = CountingLookup {
            calls: RefCell::new(Vec::new()),
        };

        let masses = potential
            .masses(Some(strings(&["Al", "Ni"]).as_slice()), true, &lookup)
            .expect("masses resolve");
        assert_eq!(masses, vec![26.98, 58.6934]);
        assert_eq!(*lookup.calls.borrow(), vec![("Ni".to_string(), true)]);
    }

    #[test]
    fn failed_lookups_propagate() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        let error = potential
            .masses(None, false, &MassTable::new())
            .expect_err("Ni has no mass");
        assert!(matches!(error, PotentialError::MassLookup(MassLookupError::Unknown { .. })));
    }

    #[test]
    fn charges_follow_requested_order() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        assert_eq!(potential.charges(None).expect("charges"), vec![0.0, 0.0]);
        assert!(potential.charges(Some(strings(&["Cu"]).as_slice())).is_err());
    }

    #[test]
    fn metadata_exposes_flat_fields() {
        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        let meta = potential.metadata().expect("metadata available");

        assert_eq!(meta["potid"], json!("2004--Mishin-Y--Ni-Al"));
        assert_eq!(meta["pair_style"], json!("eam/alloy"));
        assert_eq!(meta["symbols"], json!(["Ni", "Al"]));
        assert_eq!(meta["masses"], json!([null, 26.98]));
        assert!(meta["status"].is_null());
        assert_eq!(meta["artifacts"][0]["filename"], json!("Mishin-Ni-Al-2009.eam.alloy"));
        assert_eq!(meta["dois"], json!(["10.1016/j.actamat.2004.05.036"]));
    }

    #[test]
    fn active_status_also_matches_absent_status() {
        let filters = QueryFilters::new().with("status", ["active"]).with("elements", ["Al"]);
        let query = PotentialLammps::query(DocumentQuery::mongo(), &filters);
        assert_eq!(
            query,
            json!({
                "content.potential-LAMMPS.status": {"$in": ["active", null]},
                "content.potential-LAMMPS.atom.element": {"$all": ["Al"]}
            })
        );

        let potential = PotentialLammps::from_model(document(), None, None).expect("loads");
        let rows = vec![potential.metadata().expect("metadata available")];
        let flags = PotentialLammps::query(TableFilter::new(&rows), &filters);
        assert_eq!(flags, vec![true]);
    }

    #[test]
    fn cdcs_queries_use_model_root_paths() {
        let filters = QueryFilters::new()
            .with("name", ["ignored"])
            .with("pair_style", ["eam/alloy"])
            .with("potid", ["2004--Mishin-Y--Ni-Al"]);
        let query = PotentialLammps::query(DocumentQuery::cdcs(), &filters);
        assert_eq!(
            query,
            json!({
                "potential-LAMMPS.potential.id": {"$in": ["2004--Mishin-Y--Ni-Al"]},
                "potential-LAMMPS.pair_style.type": {"$in": ["eam/alloy"]}
            })
        );
    }
}
