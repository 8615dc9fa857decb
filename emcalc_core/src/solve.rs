//! # Solve API
//!
//! The request/response surface consumed by presentation layers: list the
//! catalog, fetch an equation's variables and units, and solve a named
//! equation for a chosen target variable given numeric bindings for every
//! other variable.
//!
//! One request is fully resolved (validate, isolate, evaluate) before
//! control returns. Either a complete `SolveResult` is produced or a typed
//! error is returned with nothing else mutated; there are no partial
//! results. Symbolic isolation is memoized per `(equation_id, target)`
//! since the solved form does not depend on the numeric inputs.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use emcalc_core::solve::solve_for;
//!
//! let inputs = HashMap::from([
//!     ("neff".to_string(), 1.0),
//!     ("Qcal".to_string(), 1200.0),
//!     ("ρ".to_string(), 1.8),
//! ]);
//!
//! let result = solve_for(
//!     "Detonation velocity (D) - Pepekin-Lebedev (PL) equation",
//!     "D",
//!     &inputs,
//! )
//! .unwrap();
//!
//! assert_eq!(result.unit, "km/s");
//! println!("{}", result.formatted); // D = 128.9077 km/s
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::errors::{CalcError, CalcResult};
use crate::eval;
use crate::format;
use crate::solver;

/// One calculation request. Invariant: `inputs` binds every variable of
/// the equation except `target_variable`, and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub equation_id: String,
    pub target_variable: String,
    pub inputs: HashMap<String, f64>,
}

/// A completed calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    pub equation_id: String,
    pub target_variable: String,
    /// Solved value at full f64 precision
    pub value: f64,
    /// Unit label of the target variable; empty when unitless
    pub unit: String,
    /// Plain-text solved form, `"target = <isolated expression>"`
    pub solved_expression: String,
    /// LaTeX rendering of the solved form
    pub solved_display: String,
    /// True when the isolation crossed an even power and the principal
    /// root was selected from a two-member root set
    pub multivalued: bool,
    /// Display line with 4-decimal precision, `"target = value unit"`
    pub formatted: String,
}

/// Equation ids in catalog source order.
pub fn list_equations() -> Vec<String> {
    Catalog::builtin().equation_ids()
}

/// (variable, unit) pairs for an equation, in declared order.
pub fn get_variables(equation_id: &str) -> CalcResult<Vec<(String, String)>> {
    Ok(Catalog::builtin().lookup(equation_id)?.variable_units())
}

/// Resolve a [`SolveRequest`] against the built-in catalog.
pub fn solve(request: &SolveRequest) -> CalcResult<SolveResult> {
    solve_for(
        &request.equation_id,
        &request.target_variable,
        &request.inputs,
    )
}

/// Solve `equation_id` for `target_variable` given bindings for every
/// other variable of the equation.
pub fn solve_for(
    equation_id: &str,
    target_variable: &str,
    inputs: &HashMap<String, f64>,
) -> CalcResult<SolveResult> {
    let def = Catalog::builtin().lookup(equation_id)?;

    // Input validation happens before any solving is attempted.
    if !def.has_variable(target_variable) {
        return Err(CalcError::unknown_variable(&def.id, target_variable));
    }
    for v in &def.variables {
        if v != target_variable && !inputs.contains_key(v) {
            return Err(CalcError::invalid_input(v, "", "missing required input"));
        }
    }
    for (key, value) in inputs {
        if key == target_variable {
            return Err(CalcError::invalid_input(
                key,
                value.to_string(),
                "target variable must not be bound",
            ));
        }
        if !def.has_variable(key) {
            return Err(CalcError::invalid_input(
                key,
                value.to_string(),
                "not a variable of this equation",
            ));
        }
        if !value.is_finite() {
            return Err(CalcError::invalid_input(
                key,
                value.to_string(),
                "value must be finite",
            ));
        }
    }

    let isolation = solver::isolate_cached(def, target_variable)?;
    let value = eval::evaluate(&isolation.expr, inputs)?;
    let unit = def.unit_of(target_variable).to_string();

    Ok(SolveResult {
        equation_id: def.id.clone(),
        target_variable: isolation.target.clone(),
        value,
        unit: unit.clone(),
        solved_expression: format::equation(target_variable, &isolation.expr),
        solved_display: format::equation_latex(target_variable, &isolation.expr),
        multivalued: isolation.multivalued,
        formatted: format::result_line(target_variable, value, &unit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PL: &str = "Detonation velocity (D) - Pepekin-Lebedev (PL) equation";
    const DENSITY: &str = "Density (ρ) - Politzer equation";
    const CJ: &str = "Detonation pressure (P) - Chapman-Jouguet approximation";
    const KJ_D: &str = "Detonation velocity (D) - Kamlet-Jacobs (KJ) equation";

    fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_pepekin_lebedev_for_defined_quantity() {
        let inputs = bindings(&[("neff", 1.0), ("Qcal", 1200.0), ("ρ", 1.8)]);
        let result = solve_for(PL, "D", &inputs).unwrap();

        let expected = 4.2 + 2.0 * 1.0 * 1200.0_f64.sqrt() * 1.8;
        assert!((result.value - expected).abs() < 1e-12);
        assert_eq!(result.unit, "km/s");
        assert_eq!(
            result.solved_expression,
            "D = 4.2 + 2*neff*sqrt(Qcal)*ρ"
        );
        assert_eq!(result.formatted, format!("D = {expected:.4} km/s"));
        assert!(!result.multivalued);
    }

    #[test]
    fn test_politzer_density_for_defined_quantity() {
        let inputs = bindings(&[("M", 100.0), ("V001", 50.0), ("νσtot2", 2.0)]);
        let result = solve_for(DENSITY, "ρ", &inputs).unwrap();

        let expected = 0.9183 * (100.0 / 50.0) + 0.0028 * 2.0 + 0.0443;
        assert!((result.value - expected).abs() < 1e-12);
        assert_eq!(result.unit, "g/cm³");
        assert_eq!(result.formatted, "ρ = 1.8865 g/cm³");
    }

    #[test]
    fn test_solve_for_non_defined_target_round_trips() {
        // Forward: D from Q; backward: Q from that D recovers the input.
        let forward = bindings(&[("N", 0.03), ("Mave", 27.0), ("Q", 1500.0), ("ρ0", 1.8)]);
        let d = solve_for(KJ_D, "D", &forward).unwrap().value;

        let backward = bindings(&[("N", 0.03), ("Mave", 27.0), ("D", d), ("ρ0", 1.8)]);
        let q = solve_for(KJ_D, "Q", &backward).unwrap();
        assert!((q.value - 1500.0).abs() < 1e-6);
        assert_eq!(q.unit, "cal/g");
    }

    #[test]
    fn test_multivalued_solve_picks_principal_root() {
        // P = ρ0 D² / 4 with ρ0 = 1.8, D = 8 gives P = 28.8; inverting for
        // D must return the positive root.
        let inputs = bindings(&[("P", 28.8), ("ρ0", 1.8)]);
        let result = solve_for(CJ, "D", &inputs).unwrap();
        assert!((result.value - 8.0).abs() < 1e-12);
        assert!(result.multivalued);
        assert_eq!(result.solved_expression, "D = sqrt(P*4/ρ0)");
    }

    #[test]
    fn test_repeated_solves_are_stable() {
        let inputs = bindings(&[("P", 28.8), ("ρ0", 1.8)]);
        let a = solve_for(CJ, "D", &inputs).unwrap();
        let b = solve_for(CJ, "D", &inputs).unwrap();
        assert_eq!(a.solved_expression, b.solved_expression);
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn test_unknown_equation() {
        let err = solve_for("No such equation", "x", &HashMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_EQUATION");
    }

    #[test]
    fn test_unknown_target_fails_before_solving() {
        let inputs = bindings(&[("neff", 1.0), ("Qcal", 1200.0), ("ρ", 1.8)]);
        let err = solve_for(PL, "Qx", &inputs).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIABLE");
    }

    #[test]
    fn test_missing_input_names_variable() {
        let inputs = bindings(&[("neff", 1.0), ("ρ", 1.8)]);
        let err = solve_for(PL, "D", &inputs).unwrap_err();
        match err {
            CalcError::InvalidInput { variable, .. } => assert_eq!(variable, "Qcal"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_input_rejected() {
        let inputs = bindings(&[
            ("neff", 1.0),
            ("Qcal", 1200.0),
            ("ρ", 1.8),
            ("bogus", 7.0),
        ]);
        let err = solve_for(PL, "D", &inputs).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_binding_for_target_rejected() {
        let inputs = bindings(&[
            ("neff", 1.0),
            ("Qcal", 1200.0),
            ("ρ", 1.8),
            ("D", 5.0),
        ]);
        let err = solve_for(PL, "D", &inputs).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let inputs = bindings(&[("neff", f64::NAN), ("Qcal", 1200.0), ("ρ", 1.8)]);
        let err = solve_for(PL, "D", &inputs).unwrap_err();
        match err {
            CalcError::InvalidInput { variable, .. } => assert_eq!(variable, "neff"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_domain_failure_returns_typed_error() {
        // Negative heat of detonation puts sqrt out of domain when solving
        // for the defined quantity.
        let inputs = bindings(&[("neff", 1.0), ("Qcal", -1.0), ("ρ", 1.8)]);
        let err = solve_for(PL, "D", &inputs).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_list_equations_matches_catalog_order() {
        let ids = list_equations();
        assert_eq!(ids, Catalog::builtin().equation_ids());
        assert!(!ids.is_empty());
    }

    #[test]
    fn test_get_variables_in_declared_order() {
        let vars = get_variables(PL).unwrap();
        let names: Vec<&str> = vars.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(names, ["D", "neff", "Qcal", "ρ"]);
        assert_eq!(vars[0].1, "km/s");
    }

    #[test]
    fn test_solve_request_round_trips_through_json() {
        let request = SolveRequest {
            equation_id: PL.to_string(),
            target_variable: "D".to_string(),
            inputs: bindings(&[("neff", 1.0), ("Qcal", 1200.0), ("ρ", 1.8)]),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: SolveRequest = serde_json::from_str(&json).unwrap();
        let result = solve(&parsed).unwrap();
        assert_eq!(result.target_variable, "D");
    }
}
