//! Executes scenarios against the pointer evaluator.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::EvalConfig;
use crate::core::{BinaryOp, Diagnostic, ObjectTable, SourceLocation};
use crate::eval::{PointerEvaluator, Value};
use crate::report::{DiagnosticReporter, Report, ReportAction};

use super::model::{Expr, Scenario, Step};

/// The process exit status for a value returned from `main`: its low byte.
pub fn exit_status_of(value: i64) -> u8 {
    value as u8
}

/// Result of a clean scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub name: Option<String>,
    /// The value of the `return` step, if one ran.
    pub returned: Option<i64>,
    /// What the program would exit with. Falling off the end returns 0.
    pub exit_status: u8,
    /// Number of steps evaluated.
    pub steps_run: usize,
}

enum StepError {
    Diagnostic(Diagnostic),
    /// Depends on a binding that failed earlier and was already reported.
    Poisoned,
}

impl From<Diagnostic> for StepError {
    fn from(diagnostic: Diagnostic) -> Self {
        StepError::Diagnostic(diagnostic)
    }
}

/// Variable bindings of a running scenario.
struct Frame<'a> {
    objects: &'a ObjectTable,
    evaluator: PointerEvaluator<'a, ObjectTable>,
    vars: HashMap<String, Value>,
    poisoned: HashSet<String>,
}

impl<'a> Frame<'a> {
    fn new(objects: &'a ObjectTable) -> Self {
        Self {
            objects,
            evaluator: PointerEvaluator::new(objects),
            vars: HashMap::new(),
            poisoned: HashSet::new(),
        }
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.poisoned.remove(name);
        self.vars.insert(name.to_string(), value);
    }

    fn poison(&mut self, name: &str) {
        self.vars.remove(name);
        self.poisoned.insert(name.to_string());
    }

    fn lookup(&self, name: &str) -> Result<Value, StepError> {
        if let Some(value) = self.vars.get(name) {
            return Ok(*value);
        }
        if self.poisoned.contains(name) {
            return Err(StepError::Poisoned);
        }
        Err(Diagnostic::UndefinedVariable { name: name.to_string() }.into())
    }

    fn eval(&self, expr: &Expr) -> Result<Value, StepError> {
        let eval = &self.evaluator;
        let value = match expr {
            Expr::Int(n) => Value::Int(*n),
            Expr::Var(name) => self.lookup(name)?,
            Expr::AddrOf(name) => Value::Pointer(self.objects.address_of(name)?),
            Expr::Decay(name) => Value::Pointer(self.objects.decay(name)?),
            Expr::Add(lhs, rhs) => eval.eval_binary(BinaryOp::Add, self.eval(lhs)?, self.eval(rhs)?)?,
            Expr::Sub(lhs, rhs) => eval.eval_binary(BinaryOp::Sub, self.eval(lhs)?, self.eval(rhs)?)?,
            Expr::Diff(lhs, rhs) => {
                let a = self.eval(lhs)?.as_pointer()?;
                let b = self.eval(rhs)?.as_pointer()?;
                Value::Int(eval.eval_pointer_diff(a, b)?)
            }
            Expr::Index(ptr, index) => {
                let p = self.eval(ptr)?.as_pointer()?;
                let i = self.eval(index)?.as_int()?;
                Value::Pointer(eval.eval_index(p, i)?)
            }
            Expr::Compare(op, lhs, rhs) => {
                eval.eval_binary(BinaryOp::Compare(*op), self.eval(lhs)?, self.eval(rhs)?)?
            }
            Expr::DerefCheck(ptr) => {
                let p = self.eval(ptr)?.as_pointer()?;
                eval.check_dereference(p)?;
                Value::Pointer(p)
            }
            Expr::Cast(ty, ptr) => {
                let p = self.eval(ptr)?.as_pointer()?;
                let stride = ty.element_size(self.objects.layout())?;
                Value::Pointer(p.with_element_size(stride)?)
            }
        };
        Ok(value)
    }
}

/// Run a scenario.
///
/// Returns the outcome when no diagnostic was raised, otherwise every report
/// gathered under the configured policy.
pub fn run_scenario(scenario: &Scenario, config: &EvalConfig) -> Result<ScenarioOutcome, Vec<Report>> {
    let mut reporter = DiagnosticReporter::new(config);
    let mut objects = ObjectTable::new(config.layout);

    for (index, decl) in scenario.objects.iter().enumerate() {
        if let Err(diagnostic) = objects.define(&decl.name, decl.ty.clone()) {
            reporter.record(diagnostic, SourceLocation::at_declaration(index));
        }
    }
    if reporter.has_diagnostics() {
        return Err(reporter.into_reports());
    }

    let mut frame = Frame::new(&objects);
    let mut returned = None;
    let mut steps_run = 0;

    for (index, step) in scenario.steps.iter().enumerate() {
        steps_run += 1;
        let location = SourceLocation::at_step(index);

        let (name, result) = match step {
            Step::Let(name, expr) => (Some(name), frame.eval(expr)),
            Step::Return(expr) => (None, frame.eval(expr).and_then(|v| Ok(Value::Int(v.as_int()?)))),
        };

        let action = match result {
            Ok(value) => {
                debug!(step = index, ?name, %value, "step evaluated");
                match name {
                    Some(name) => frame.bind(name, value),
                    None => returned = value.as_int().ok(),
                }
                ReportAction::Continue
            }
            Err(StepError::Poisoned) => {
                if let Some(name) = name {
                    frame.poison(name);
                }
                ReportAction::Continue
            }
            Err(StepError::Diagnostic(diagnostic)) => {
                if let Some(name) = name {
                    frame.poison(name);
                }
                reporter.record(diagnostic, location)
            }
        };

        if name.is_none() {
            if steps_run < scenario.steps.len() {
                debug!(skipped = scenario.steps.len() - steps_run, "steps after return are not run");
            }
            break;
        }
        if action == ReportAction::Stop {
            break;
        }
    }

    let outcome = ScenarioOutcome {
        name: scenario.name.clone(),
        returned,
        exit_status: returned.map(exit_status_of).unwrap_or(0),
        steps_run,
    };
    let outcome = reporter.into_result(outcome)?;
    info!(name = ?outcome.name, exit_status = outcome.exit_status, "scenario finished");
    Ok(outcome)
}
