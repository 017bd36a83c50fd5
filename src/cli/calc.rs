//! toolbelt calc command implementation

use crate::calc::{self, Calculator, Key, Screen, ERROR_TEXT};
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;

/// Options for `toolbelt calc eval`
pub struct EvalOptions {
    pub expression: String,
    pub output: OutputOptions,
}

/// Options for `toolbelt calc keys`
pub struct KeysOptions {
    pub sequence: String,
    pub storage: Storage,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct EvalReport {
    expression: String,
    result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(serde::Serialize)]
struct KeysReport {
    keys: usize,
    #[serde(flatten)]
    screen: Screen,
}

pub fn run_eval(options: EvalOptions) -> Result<()> {
    let report = match calc::evaluate(&options.expression) {
        Ok(value) => EvalReport {
            expression: options.expression.clone(),
            result: calc::format_number(value),
            value: Some(value),
            error: false,
            reason: None,
        },
        Err(err) => {
            tracing::debug!(expression = %options.expression, error = %err, "evaluation failed");
            EvalReport {
                expression: options.expression.clone(),
                result: ERROR_TEXT.to_string(),
                value: None,
                error: true,
                reason: Some(err.to_string()),
            }
        }
    };

    let mut human = HumanOutput::new(report.result.clone());
    if let Some(reason) = &report.reason {
        human.push_detail(reason.clone());
    }

    emit_success(options.output, "calc eval", &report, Some(&human))
}

pub fn run_keys(options: KeysOptions) -> Result<()> {
    let keys = Key::parse_sequence(&options.sequence)?;
    let config = Config::load_from_dir(options.storage.data_dir());

    let mut calculator = Calculator::new(config.calc.display_width);
    calculator.press_all(keys.iter().copied());
    let screen = calculator.screen();

    let report = KeysReport {
        keys: keys.len(),
        screen,
    };

    let mut human = HumanOutput::new(report.screen.current.clone());
    if !report.screen.total.is_empty() {
        human.push_summary("total", report.screen.total.clone());
    }

    emit_success(options.output, "calc keys", &report, Some(&human))
}
