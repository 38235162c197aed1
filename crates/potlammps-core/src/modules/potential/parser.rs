use super::model::{AtomEntry, PotentialContent};
use crate::common::DocumentNode;
use crate::domain::{
    Artifact, CoeffBlock, CommandLine, PotentialError, PotentialResult, Term, WILDCARD,
    optional_string,
};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use tracing::{debug, trace};

pub(super) fn load_potential_content(root: &DocumentNode<'_>) -> PotentialResult<PotentialContent> {
    let potential = root.required_child("potential")?;
    let pair_style = root.required_child("pair_style")?;

    let mut content = PotentialContent {
        key: root.optional_str("key"),
        id: root.optional_str("id"),
        potential_key: potential.optional_str("key"),
        potential_id: potential.optional_str("id"),
        status: root.optional_str("status"),
        units: root.required_str("units")?,
        atom_style: root.required_str("atom_style")?,
        pair_style: pair_style.required_str("type")?,
        pair_style_terms: read_terms(&pair_style),
        comments: root.str_or("comments", ""),
        dois: potential.strings("doi"),
        artifacts: root.as_list("artifact").iter().map(read_artifact).collect(),
        ..PotentialContent::default()
    };

    let mut seen = HashSet::new();
    for (index, atom) in root.as_list("atom").iter().enumerate() {
        let entry = read_atom(index, atom)?;
        if !seen.insert(entry.symbol.clone()) {
            return Err(PotentialError::invalid_value(
                atom.path(),
                format!("symbol '{}' is declared more than once", entry.symbol),
            ));
        }
        content.push_atom(entry);
    }

    content.pair_coeff_blocks = root.as_list("pair_coeff").iter().map(read_coeff_block).collect();
    content.commands = root
        .as_list("command")
        .iter()
        .map(|command| CommandLine {
            terms: read_terms(command),
        })
        .collect();

    debug!(
        atoms = content.atom_count(),
        pair_style = %content.pair_style,
        coeff_blocks = content.pair_coeff_blocks.len(),
        commands = content.commands.len(),
        "read potential-LAMMPS content"
    );
    Ok(content)
}

fn read_atom(index: usize, atom: &DocumentNode<'_>) -> PotentialResult<AtomEntry> {
    let element = atom.optional_str("element");
    let symbol = atom.optional_str("symbol");
    let mass = atom.optional_f64("mass")?;
    let charge = atom.f64_or("charge", 0.0)?;

    let (element, symbol) = match (element, symbol) {
        (Some(element), Some(symbol)) => (element, symbol),
        (Some(element), None) => (element.clone(), element),
        (None, symbol) => {
            if mass.is_none() {
                return Err(PotentialError::MissingAtomField {
                    index,
                    field: "mass",
                });
            }
            let symbol = symbol.ok_or(PotentialError::MissingAtomField {
                index,
                field: "symbol",
            })?;
            (symbol.clone(), symbol)
        }
    };

    Ok(AtomEntry {
        element,
        symbol,
        mass,
        charge,
    })
}

fn read_terms(node: &DocumentNode<'_>) -> Vec<Term> {
    let mut terms = Vec::new();
    for term in node.as_list("term") {
        for (tag, value) in term.entries() {
            match Term::from_tag(tag, value) {
                Some(parsed) => terms.push(parsed),
                None => trace!(tag, path = term.path(), "skipping unrecognized term tag"),
            }
        }
    }
    terms
}

fn read_coeff_block(node: &DocumentNode<'_>) -> CoeffBlock {
    let interaction = node
        .child("interaction")
        .map(|interaction| interaction.strings("symbol"))
        .filter(|symbols| !symbols.is_empty())
        .unwrap_or_else(|| vec![WILDCARD.to_string(), WILDCARD.to_string()]);
    let is_many_body = !node.finds("symbols").is_empty();
    CoeffBlock::new(interaction, read_terms(node), is_many_body)
}

fn read_artifact(node: &DocumentNode<'_>) -> Artifact {
    Artifact {
        filename: node.optional_str("file"),
        label: node.optional_str("label"),
        url: node.optional_str("web-link.URL"),
    }
}

fn terms_value(terms: &[Term]) -> Value {
    Value::Array(
        terms
            .iter()
            .map(|term| {
                let mut entry = Map::new();
                entry.insert(term.tag().to_string(), term.to_value());
                Value::Object(entry)
            })
            .collect(),
    )
}

fn insert_optional(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if value.is_some() {
        map.insert(key.to_string(), optional_string(value));
    }
}

pub(super) fn build_potential_content(content: &PotentialContent) -> Value {
    let mut root = Map::new();
    insert_optional(&mut root, "key", &content.key);
    insert_optional(&mut root, "id", &content.id);

    let mut potential = Map::new();
    insert_optional(&mut potential, "key", &content.potential_key);
    insert_optional(&mut potential, "id", &content.potential_id);
    if !content.dois.is_empty() {
        potential.insert("doi".to_string(), json!(content.dois));
    }
    root.insert("potential".to_string(), Value::Object(potential));

    root.insert("units".to_string(), json!(content.units));
    root.insert("atom_style".to_string(), json!(content.atom_style));
    insert_optional(&mut root, "status", &content.status);

    let artifacts: Vec<Value> = content
        .artifacts
        .iter()
        .map(|artifact| {
            let mut entry = Map::new();
            insert_optional(&mut entry, "file", &artifact.filename);
            insert_optional(&mut entry, "label", &artifact.label);
            if let Some(url) = &artifact.url {
                entry.insert("web-link".to_string(), json!({ "URL": url }));
            }
            Value::Object(entry)
        })
        .collect();
    if !artifacts.is_empty() {
        root.insert("artifact".to_string(), Value::Array(artifacts));
    }

    let atoms: Vec<Value> = content
        .atoms()
        .map(|atom| {
            let mut entry = Map::new();
            entry.insert("element".to_string(), json!(atom.element));
            entry.insert("symbol".to_string(), json!(atom.symbol));
            if let Some(mass) = atom.mass {
                entry.insert("mass".to_string(), json!(mass));
            }
            if atom.charge != 0.0 {
                entry.insert("charge".to_string(), json!(atom.charge));
            }
            Value::Object(entry)
        })
        .collect();
    root.insert("atom".to_string(), Value::Array(atoms));

    root.insert(
        "pair_style".to_string(),
        json!({ "type": content.pair_style, "term": terms_value(&content.pair_style_terms) }),
    );

    let coeffs: Vec<Value> = content
        .pair_coeff_blocks
        .iter()
        .map(|block| {
            let mut entry = Map::new();
            if !block.is_wildcard() {
                entry.insert(
                    "interaction".to_string(),
                    json!({ "symbol": block.interaction }),
                );
            }
            entry.insert("term".to_string(), terms_value(&block.terms));
            Value::Object(entry)
        })
        .collect();
    root.insert("pair_coeff".to_string(), Value::Array(coeffs));

    if !content.commands.is_empty() {
        let commands: Vec<Value> = content
            .commands
            .iter()
            .map(|command| json!({ "term": terms_value(&command.terms) }))
            .collect();
        root.insert("command".to_string(), Value::Array(commands));
    }

    if !content.comments.is_empty() {
        root.insert("comments".to_string(), json!(content.comments));
    }

    Value::Object(root)
}
