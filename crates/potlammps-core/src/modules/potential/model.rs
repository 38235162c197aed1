use crate::domain::{Artifact, CoeffBlock, CommandLine, Term};

/// One declared atom type of a potential.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomEntry {
    pub element: String,
    pub symbol: String,
    pub mass: Option<f64>,
    pub charge: f64,
}

/// Content of a `potential-LAMMPS` document, fixed once loaded.
///
/// `elements`, `symbols`, `masses` and `charges` are index-aligned: entry `i`
/// of each describes atom type `i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PotentialContent {
    pub key: Option<String>,
    pub id: Option<String>,
    pub potential_key: Option<String>,
    pub potential_id: Option<String>,
    pub status: Option<String>,
    pub units: String,
    pub atom_style: String,
    pub pair_style: String,
    pub pair_style_terms: Vec<Term>,
    pub pair_coeff_blocks: Vec<CoeffBlock>,
    pub commands: Vec<CommandLine>,
    pub elements: Vec<String>,
    pub symbols: Vec<String>,
    pub masses: Vec<Option<f64>>,
    pub charges: Vec<f64>,
    pub comments: String,
    pub dois: Vec<String>,
    pub artifacts: Vec<Artifact>,
}

impl PotentialContent {
    pub fn push_atom(&mut self, atom: AtomEntry) {
        self.elements.push(atom.element);
        self.symbols.push(atom.symbol);
        self.masses.push(atom.mass);
        self.charges.push(atom.charge);
    }

    pub fn atom_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|stored| stored == symbol)
    }

    pub fn atoms(&self) -> impl Iterator<Item = AtomEntry> + '_ {
        (0..self.atom_count()).map(|index| AtomEntry {
            element: self.elements[index].clone(),
            symbol: self.symbols[index].clone(),
            mass: self.masses[index],
            charge: self.charges[index],
        })
    }

    pub fn fileurls(&self) -> Vec<String> {
        self.artifacts
            .iter()
            .filter_map(|artifact| artifact.url.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AtomEntry, PotentialContent};

    #[test]
    fn atom_tables_stay_index_aligned() {
        let mut content = PotentialContent::default();
        content.push_atom(AtomEntry {
            element: "Al".to_string(),
            symbol: "Al".to_string(),
            mass: None,
            charge: 0.0,
        });
        content.push_atom(AtomEntry {
            element: "O".to_string(),
            symbol: "O2-".to_string(),
            mass: Some(15.999),
            charge: -2.0,
        });

        assert_eq!(content.atom_count(), 2);
        assert_eq!(content.symbol_index("O2-"), Some(1));
        assert_eq!(content.symbol_index("O"), None);
        let atoms: Vec<_> = content.atoms().collect();
        assert_eq!(atoms[1].charge, -2.0);
        assert_eq!(atoms[0].mass, None);
    }
}
