use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::models::{EnrichedProp, Prop};

/// Hard cap on dataset size. Anything larger than this is assumed to be
/// the wrong file rather than a legitimate props export.
pub const MAX_DATASET_ROWS: usize = 10_000;

/// One CSV row before validation. Every column is optional so that a
/// missing column or blank cell surfaces as a schema error naming the
/// field instead of a generic deserialize failure.
#[derive(Debug, Deserialize)]
struct RawProp {
    player: Option<String>,
    stat_type: Option<String>,
    line: Option<f64>,
    american_odds: Option<i32>,
    model_prob: Option<f64>,
}

impl RawProp {
    fn into_prop(self, row: usize) -> AnalyzeResult<Prop> {
        Ok(Prop {
            player: require(self.player, row, "player")?,
            stat_type: require(self.stat_type, row, "stat_type")?,
            line: require(self.line, row, "line")?,
            american_odds: require(self.american_odds, row, "american_odds")?,
            model_prob: require(self.model_prob, row, "model_prob")?,
        })
    }
}

fn require<T>(field: Option<T>, row: usize, name: &str) -> AnalyzeResult<T> {
    field.ok_or_else(|| AnalyzeError::Schema(format!("row {}: missing {}", row, name)))
}

/// Load and validate the props dataset from a CSV file.
pub fn load_props(path: &Path) -> AnalyzeResult<Vec<Prop>> {
    let file = File::open(path).map_err(|e| {
        AnalyzeError::DataUnavailable(format!("cannot open props file {}: {}", path.display(), e))
    })?;
    load_props_from_reader(file)
}

/// Load and validate props from any CSV reader. Rows come back in file
/// order; row numbers in errors are 1-based data rows (the header is
/// not counted).
pub fn load_props_from_reader<R: io::Read>(reader: R) -> AnalyzeResult<Vec<Prop>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut props = Vec::new();
    for (i, record) in rdr.deserialize::<RawProp>().enumerate() {
        let row = i + 1;
        let raw: RawProp =
            record.map_err(|e| AnalyzeError::Schema(format!("row {}: {}", row, e)))?;
        props.push(raw.into_prop(row)?);
        if props.len() > MAX_DATASET_ROWS {
            return Err(AnalyzeError::Schema(format!(
                "dataset exceeds {} rows",
                MAX_DATASET_ROWS
            )));
        }
    }
    Ok(props)
}

/// Export enriched props to a CSV file.
pub fn export_enriched_csv(props: &[EnrichedProp], path: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path))?;

    writeln!(
        file,
        "player,stat_type,line,american_odds,model_prob,implied_prob,true_prob,ev_per_dollar"
    )?;

    for prop in props {
        writeln!(
            file,
            "{},{},{},{},{:.4},{:.4},{:.4},{:.4}",
            prop.player,
            prop.stat_type,
            prop.line,
            prop.american_odds,
            prop.model_prob,
            prop.implied_prob,
            prop.true_prob,
            prop.ev_per_dollar
        )?;
    }

    Ok(())
}
