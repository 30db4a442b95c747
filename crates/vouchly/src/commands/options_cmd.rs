//! Option table display.

use serde::Serialize;
use tabled::Tabled;

use vouchly_core::{OptionBounds, OptionKey, OptionStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct OptionInfo {
    key: OptionKey,
    default: u64,
    min: u64,
    max: u64,
    step: u64,
    unit: Option<&'static str>,
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Default")]
    default: u64,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Step")]
    step: u64,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&OptionInfo> for OptionRow {
    fn from(info: &OptionInfo) -> Self {
        Self {
            key: info.key.to_string(),
            default: info.default,
            range: format!("{}..={}", info.min, info.max),
            step: info.step,
            unit: info.unit.unwrap_or("-").into(),
        }
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let options: Vec<OptionInfo> = OptionStore::new()
        .all()
        .into_iter()
        .map(|(key, _)| {
            let OptionBounds {
                default,
                min,
                max,
                step,
                unit,
            } = key.bounds();
            OptionInfo {
                key,
                default,
                min,
                max,
                step,
                unit,
            }
        })
        .collect();

    let out = output::render_list(&global.output, &options, |info| OptionRow::from(info), |info| {
        info.key.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
