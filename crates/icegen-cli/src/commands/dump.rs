//! Dispatch tables and catch orders, as the generated code will see them.

use std::fmt::Write as _;
use std::path::PathBuf;

use icegen_compiler::analyze::{DispatchPlan, DispatchTarget, wire_throws};
use icegen_core::{DefKind, Unit};
use serde::Serialize;

use super::CliError;
use super::load::load_unit;

pub struct DumpArgs {
    pub input: PathBuf,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub types: Vec<TypeReport>,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub type_ids: Vec<String>,
    /// Index of the type's own id in `type_ids`.
    pub own_position: usize,
    pub operations: Vec<OperationReport>,
    pub catch_orders: Vec<CatchOrder>,
}

#[derive(Debug, Serialize)]
pub struct OperationReport {
    pub name: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct CatchOrder {
    pub operation: String,
    pub exceptions: Vec<String>,
}

pub fn run(args: DumpArgs) {
    let report = match load_unit(&args.input).and_then(|unit| build_report(&unit)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render(&report));
    }
}

/// One entry per non-local class or interface, in definition order.
pub fn build_report(unit: &Unit) -> Result<Report, CliError> {
    let mut types = Vec::new();
    for id in unit.ids() {
        let Some(def) = unit.get(id) else { continue };
        let DefKind::Class(class) = &def.kind else {
            continue;
        };
        if class.is_local {
            continue;
        }

        let plan = DispatchPlan::build(unit, id)?;
        let operations = plan
            .entries()
            .iter()
            .map(|entry| OperationReport {
                name: plan.resolve(entry.name).to_owned(),
                target: match entry.target {
                    DispatchTarget::Builtin => "builtin".to_owned(),
                    DispatchTarget::Own(_) => "own".to_owned(),
                    DispatchTarget::Inherited(op) => {
                        format!("inherited from {}", unit.scoped(op.class))
                    }
                },
            })
            .collect();

        let mut catch_orders = Vec::new();
        for op in &class.operations {
            let order = wire_throws(unit, op)?;
            if order.is_empty() {
                continue;
            }
            catch_orders.push(CatchOrder {
                operation: op.name.clone(),
                exceptions: order.into_iter().map(|e| unit.scoped(e)).collect(),
            });
        }

        types.push(TypeReport {
            name: def.scoped(),
            type_ids: plan.type_ids().into_iter().map(str::to_owned).collect(),
            own_position: plan.own_position(),
            operations,
            catch_orders,
        });
    }
    Ok(Report { types })
}

pub fn render(report: &Report) -> String {
    let mut out = String::new();
    for (i, ty) in report.types.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", ty.name);
        let _ = writeln!(out, "  type ids:");
        for (pos, id) in ty.type_ids.iter().enumerate() {
            let marker = if pos == ty.own_position { " *" } else { "" };
            let _ = writeln!(out, "    {pos}: {id}{marker}");
        }
        let _ = writeln!(out, "  operations:");
        for (pos, op) in ty.operations.iter().enumerate() {
            let _ = writeln!(out, "    {pos}: {} ({})", op.name, op.target);
        }
        for order in &ty.catch_orders {
            let _ = writeln!(
                out,
                "  catch {}: {}",
                order.operation,
                order.exceptions.join(", ")
            );
        }
    }
    out
}
