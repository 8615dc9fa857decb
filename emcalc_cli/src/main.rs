//! # Emcalc CLI Application
//!
//! Terminal front end for the energetic materials equation engine. Lists
//! the catalog, prompts for a target variable and the remaining inputs,
//! and prints the solved result together with the solved symbolic form.
//!
//! All calculation logic lives in `emcalc_core`; this binary only reads
//! stdin and formats output.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use emcalc_core::catalog::Catalog;
use emcalc_core::errors::CalcError;
use emcalc_core::eval::parse_input;
use emcalc_core::solve::solve_for;

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input.trim().to_string()),
        Err(_) => None,
    }
}

fn main() {
    println!("Emcalc - Energetic Materials Calculator");
    println!("=======================================");
    println!();

    let catalog = Catalog::builtin();
    let ids = catalog.equation_ids();

    loop {
        println!("Equations:");
        for (i, id) in ids.iter().enumerate() {
            println!("  [{}] {}", i + 1, id);
        }
        println!();

        let choice = match prompt_line("Equation number (q to quit): ") {
            Some(line) if line != "q" && !line.is_empty() => line,
            _ => break,
        };
        let Some(def) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ids.get(i))
            .and_then(|id| catalog.lookup(id).ok())
        else {
            println!("Not an equation number: {}", choice);
            println!();
            continue;
        };

        println!();
        println!("{}", def.id);
        println!("  {} = {}", def.defined_variable(), def.expr_text);
        if let Some(source) = &def.source {
            println!("  Source: {}", source);
        }
        println!();

        println!("Variables:");
        for (variable, unit) in def.variable_units() {
            let unit_label = if unit.is_empty() { String::new() } else { format!(" [{}]", unit) };
            match def.tooltip_of(&variable) {
                Some(tip) => println!("  {}{} - {}", variable, unit_label, tip),
                None => println!("  {}{}", variable, unit_label),
            }
        }
        println!();

        let Some(target) = prompt_line("Solve for: ") else {
            break;
        };
        if !def.has_variable(&target) {
            println!("'{}' is not a variable of this equation", target);
            println!();
            continue;
        }

        // Collect one binding per remaining variable; text is validated at
        // the core boundary so bad entries name the offending variable.
        let mut inputs: HashMap<String, f64> = HashMap::new();
        let mut aborted = false;
        for variable in def.variables.iter().filter(|v| **v != target) {
            let unit = def.unit_of(variable);
            let prompt = if unit.is_empty() {
                format!("  {} = ", variable)
            } else {
                format!("  {} [{}] = ", variable, unit)
            };
            loop {
                let Some(text) = prompt_line(&prompt) else {
                    aborted = true;
                    break;
                };
                match parse_input(variable, &text) {
                    Ok(value) => {
                        inputs.insert(variable.clone(), value);
                        break;
                    }
                    Err(e) => println!("  {}", e),
                }
            }
            if aborted {
                break;
            }
        }
        if aborted {
            break;
        }

        println!();
        match solve_for(&def.id, &target, &inputs) {
            Ok(result) => {
                println!("═══════════════════════════════════════");
                println!("  {}", result.formatted);
                println!("═══════════════════════════════════════");
                println!();
                println!("Solved form: {}", result.solved_expression);
                if result.multivalued {
                    println!("Note: even-power inversion; principal root shown");
                }
                println!();
                println!("JSON Output (for API use):");
                if let Ok(json) = serde_json::to_string_pretty(&result) {
                    println!("{}", json);
                }
            }
            Err(e) => {
                report_error(&e);
            }
        }
        println!();
    }
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(&e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}
