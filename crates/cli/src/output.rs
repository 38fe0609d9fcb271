use crate::error::CliError;
use grid_filter::CompiledQuery;
use serde::Serialize;
use std::fs;

fn render(compiled: &CompiledQuery, as_json: bool) -> Result<String, CliError> {
    if as_json {
        to_json(&compiled.summary())
    } else {
        Ok(compiled.to_sql())
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

pub fn write_compiled(compiled: &CompiledQuery, as_json: bool, path: &str) -> Result<(), CliError> {
    fs::write(path, render(compiled, as_json)?)?;
    Ok(())
}

pub fn print_compiled(compiled: &CompiledQuery, as_json: bool) -> Result<(), CliError> {
    println!("{}", render(compiled, as_json)?);
    Ok(())
}
