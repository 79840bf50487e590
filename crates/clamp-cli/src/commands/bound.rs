use clamp_tools::{bound, BoundedResult, EffectiveParams, LimitValue, DEFAULT_LIMIT};
use std::io::Read;
use std::path::Path;

pub fn run(
    file: Option<&Path>,
    limit: Option<&str>,
    regexp: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = bound_payload(&raw, limit, regexp)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.text);
        if result.truncated || !result.well_formed {
            tracing::info!(
                truncated = result.truncated,
                well_formed = result.well_formed,
                "bounded output is partial"
            );
        }
    }

    Ok(())
}

fn bound_payload(
    raw: &str,
    limit: Option<&str>,
    regexp: Option<&str>,
) -> anyhow::Result<BoundedResult> {
    let limit = limit.map(LimitValue::from).unwrap_or(LimitValue::from(DEFAULT_LIMIT));
    let params = EffectiveParams::new(limit, regexp)?;
    Ok(bound(raw, &params))
}
