//! # Equation Catalog
//!
//! Central registry of the empirical equations the calculator can solve.
//! Each entry carries the algebraic expression, the ordered variable list
//! (first entry is the defined quantity), unit labels, per-variable help
//! text and a literature citation.
//!
//! The catalog is data: definitions are deserialized from the embedded
//! `data/equations.json`, validated, and parsed into expression trees once.
//! Loading fails fast on authoring defects - an expression referencing an
//! undeclared symbol, a duplicate variable, an empty variable list - so a
//! process with a loaded catalog can trust every entry.
//!
//! ## Usage
//!
//! ```rust
//! use emcalc_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let def = catalog
//!     .lookup("Density (ρ) - Politzer equation")
//!     .unwrap();
//! assert_eq!(def.defined_variable(), "ρ");
//! assert_eq!(def.unit_of("ρ"), "g/cm³");
//! ```

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::errors::{CalcError, CalcResult};
use crate::expr::Expr;
use crate::parser::parse_expr;

/// The built-in equation set, in display order.
const BUILTIN_CATALOG_JSON: &str = include_str!("data/equations.json");

/// Catalog entry as authored in JSON, before validation.
#[derive(Debug, Clone, Deserialize)]
struct RawEquation {
    expr: String,
    variables: Vec<String>,
    #[serde(default)]
    units: HashMap<String, String>,
    #[serde(default)]
    tooltip: HashMap<String, String>,
    #[serde(default)]
    display_expr: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// A validated equation definition. Immutable once loaded.
///
/// `variables[0]` is the defined quantity: the equation states
/// `variables[0] = expr`.
#[derive(Debug, Clone)]
pub struct EquationDefinition {
    /// Unique human-readable name, used as the display key
    pub id: String,
    /// Ordered symbol list; first entry is the defined quantity
    pub variables: Vec<String>,
    /// Parsed right-hand side
    pub expr: Expr,
    /// The right-hand side as authored
    pub expr_text: String,
    /// Unit label per variable; missing entries mean unitless
    pub units: HashMap<String, String>,
    /// Optional help text per variable
    pub tooltips: HashMap<String, String>,
    /// Authored typeset rendering of the relationship
    pub display_expr: Option<String>,
    /// Literature citation
    pub source: Option<String>,
}

impl EquationDefinition {
    /// The quantity on the left-hand side of the underlying identity.
    pub fn defined_variable(&self) -> &str {
        &self.variables[0]
    }

    /// Unit label for `variable`; empty when none was declared.
    pub fn unit_of(&self, variable: &str) -> &str {
        self.units.get(variable).map(String::as_str).unwrap_or("")
    }

    /// Help text for `variable`, if any.
    pub fn tooltip_of(&self, variable: &str) -> Option<&str> {
        self.tooltips.get(variable).map(String::as_str)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }

    /// (variable, unit) pairs in declared order.
    pub fn variable_units(&self) -> Vec<(String, String)> {
        self.variables
            .iter()
            .map(|v| (v.clone(), self.unit_of(v).to_string()))
            .collect()
    }
}

/// The loaded, validated equation set. Pure data plus a lookup index;
/// iteration order matches the source document.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: IndexMap<String, EquationDefinition>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(BUILTIN_CATALOG_JSON).expect("built-in equation catalog must be valid")
});

impl Catalog {
    /// The built-in catalog, loaded and validated on first access.
    /// A defect in the embedded data aborts here, not at first solve.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Load a catalog from its JSON source format: a mapping from equation
    /// id to `{expr, variables, units, tooltip?, display_expr?, source?}`.
    /// Entry order is preserved for display.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let raw: IndexMap<String, RawEquation> = serde_json::from_str(json)
            .map_err(|e| CalcError::invalid_definition("<catalog>", e.to_string()))?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for (id, raw_eq) in raw {
            let def = validate_definition(id, raw_eq)?;
            entries.insert(def.id.clone(), def);
        }
        Ok(Catalog { entries })
    }

    /// Look up a definition by id.
    pub fn lookup(&self, equation_id: &str) -> CalcResult<&EquationDefinition> {
        self.entries
            .get(equation_id)
            .ok_or_else(|| CalcError::unknown_equation(equation_id))
    }

    /// Equation ids in source order. UI population relies on this order
    /// being stable across calls.
    pub fn equation_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquationDefinition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_definition(id: String, raw: RawEquation) -> CalcResult<EquationDefinition> {
    if raw.variables.is_empty() {
        return Err(CalcError::invalid_definition(&id, "variables list is empty"));
    }

    let mut seen = HashSet::new();
    for v in &raw.variables {
        if !seen.insert(v.as_str()) {
            return Err(CalcError::invalid_definition(
                &id,
                format!("duplicate variable '{v}'"),
            ));
        }
    }

    let expr = parse_expr(&id, &raw.expr)?;

    for name in expr.free_variables() {
        if !raw.variables.iter().any(|v| *v == name) {
            return Err(CalcError::expression_parse(
                &id,
                format!("expression references undeclared symbol '{name}'"),
            ));
        }
    }

    Ok(EquationDefinition {
        id,
        variables: raw.variables,
        expr,
        expr_text: raw.expr,
        units: raw.units,
        tooltips: raw.tooltip,
        display_expr: raw.display_expr,
        source: raw.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog
            .lookup("Detonation velocity (D) - Pepekin-Lebedev (PL) equation")
            .is_ok());
        assert!(catalog.lookup("Density (ρ) - Politzer equation").is_ok());
    }

    #[test]
    fn test_listing_order_is_stable_and_matches_source() {
        let catalog = Catalog::builtin();
        let ids = catalog.equation_ids();
        assert_eq!(
            ids[0],
            "Detonation velocity (D) - Pepekin-Lebedev (PL) equation"
        );
        // Repeated listing must not reorder
        assert_eq!(ids, catalog.equation_ids());
        // Source order, not alphabetical: the PL entry precedes the
        // Chapman-Jouguet entry in the document
        let pl = ids
            .iter()
            .position(|id| id.contains("Pepekin-Lebedev"))
            .unwrap();
        let cj = ids
            .iter()
            .position(|id| id.contains("Chapman-Jouguet"))
            .unwrap();
        assert!(pl < cj);
    }

    #[test]
    fn test_unknown_equation() {
        let err = Catalog::builtin().lookup("Not an equation").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_EQUATION");
    }

    #[test]
    fn test_defined_variable_is_first() {
        for def in Catalog::builtin().iter() {
            assert_eq!(def.defined_variable(), def.variables[0]);
        }
    }

    #[test]
    fn test_missing_unit_is_empty() {
        let def = Catalog::builtin()
            .lookup("Gurney velocity (√2E) - Hardesty-Kamlet (HK) equation")
            .unwrap();
        assert_eq!(def.unit_of("Φ"), "");
        assert_eq!(def.unit_of("G"), "km/s");
    }

    #[test]
    fn test_variable_units_in_declared_order() {
        let def = Catalog::builtin()
            .lookup("Density (ρ) - Politzer equation")
            .unwrap();
        let pairs = def.variable_units();
        assert_eq!(pairs[0], ("ρ".to_string(), "g/cm³".to_string()));
        assert_eq!(pairs[1].0, "M");
        assert_eq!(pairs[2].0, "V001");
        assert_eq!(pairs[3].0, "νσtot2");
    }

    #[test]
    fn test_empty_variables_rejected() {
        let json = r#"{"Bad": {"expr": "1.0", "variables": [], "units": {}}}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DEFINITION");
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let json = r#"{"Bad": {"expr": "x", "variables": ["y", "x", "x"], "units": {}}}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DEFINITION");
    }

    #[test]
    fn test_undeclared_symbol_rejected() {
        let json = r#"{"Bad": {"expr": "x + z", "variables": ["y", "x"], "units": {}}}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(err.error_code(), "EXPRESSION_PARSE");
    }

    #[test]
    fn test_malformed_expression_rejected() {
        let json = r#"{"Bad": {"expr": "x + ", "variables": ["y", "x"], "units": {}}}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(err.error_code(), "EXPRESSION_PARSE");
    }

    #[test]
    fn test_every_catalog_expression_uses_declared_symbols_only() {
        for def in Catalog::builtin().iter() {
            for name in def.expr.free_variables() {
                assert!(
                    def.has_variable(&name),
                    "{}: undeclared symbol {}",
                    def.id,
                    name
                );
            }
        }
    }
}
